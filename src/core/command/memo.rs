use serde::{Deserialize, Serialize};

use super::Command;
use super::table::{
    MoveObjects, RemoveTable, RestoreTable, move_objects, remove_objects, restore_objects,
    set_memos_active, set_tables_active, ui_snapshot,
};
use crate::core::document::Document;
use crate::core::helper::Id;
use crate::core::layout::{next_point, next_z_index};
use crate::core::observe::{ChangeLog, Field, Target};
use crate::core::schema::Memo;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct AddMemo {
    pub memo: Memo,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct RemoveMemo {
    pub memo_ids: Vec<Id>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct SelectMemo {
    pub memo_id: Id,
    pub ctrl_key: bool,
    pub z_index: u32,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ChangeMemoValue {
    pub memo_id: Id,
    pub value: String,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ResizeMemo {
    pub memo_id: Id,
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct RestoreMemo {
    pub memos: Vec<(usize, Memo)>,
}

pub fn add_memo(document: &Document) -> Command {
    let (top, left) = next_point(&document.canvas, document.tables(), document.memos());
    let mut memo = Memo::new();
    memo.ui.top = top;
    memo.ui.left = left;
    memo.ui.z_index = next_z_index(document.z_index);
    memo.ui.active = true;
    Command::AddMemo(AddMemo { memo })
}

/// Drag `memo_id` together with every selected table and memo
pub fn move_memo(document: &Document, move_x: f64, move_y: f64, memo_id: &str) -> Command {
    let table_ids = document
        .tables()
        .filter(|table| table.ui.active)
        .map(|table| table.id.clone())
        .collect();
    let mut memo_ids: Vec<Id> = document
        .memos()
        .filter(|memo| memo.ui.active)
        .map(|memo| memo.id.clone())
        .collect();
    if !memo_ids.iter().any(|id| id == memo_id) {
        memo_ids.push(memo_id.to_string());
    }
    Command::MoveMemo(MoveObjects {
        move_x,
        move_y,
        table_ids,
        memo_ids,
    })
}

pub fn remove_memo(memo_ids: Vec<Id>) -> Command {
    Command::RemoveMemo(RemoveMemo { memo_ids })
}

pub fn select_memo(document: &Document, memo_id: impl Into<Id>, ctrl_key: bool) -> Command {
    Command::SelectMemo(SelectMemo {
        memo_id: memo_id.into(),
        ctrl_key,
        z_index: next_z_index(document.z_index),
    })
}

pub fn select_end_memo() -> Command {
    Command::SelectEndMemo
}

pub fn select_all_memo() -> Command {
    Command::SelectAllMemo
}

pub fn change_memo_value(memo_id: impl Into<Id>, value: impl Into<String>) -> Command {
    Command::ChangeMemoValue(ChangeMemoValue {
        memo_id: memo_id.into(),
        value: value.into(),
    })
}

pub fn resize_memo(memo_id: impl Into<Id>, top: f64, left: f64, width: f64, height: f64) -> Command {
    Command::ResizeMemo(ResizeMemo {
        memo_id: memo_id.into(),
        top,
        left,
        width,
        height,
    })
}

pub(crate) fn execute_add_memo(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &AddMemo,
) -> Vec<Command> {
    tracing::debug!("execute_add_memo");
    let memo = &payload.memo;
    if document.memos.contains_key(&memo.id) {
        return Vec::new();
    }

    let selection = ui_snapshot(document, true, true);
    set_tables_active(document, changes, false);
    set_memos_active(document, changes, false);

    document.memos.insert(memo.id.clone(), memo.clone());
    changes.inserted(Target::Memos, &memo.id);
    document.raise_z_index(memo.ui.z_index);

    vec![remove_memo(vec![memo.id.clone()]), Command::RestoreUi(selection)]
}

pub(crate) fn execute_move_memo(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &MoveObjects,
) -> Vec<Command> {
    tracing::debug!("execute_move_memo");
    move_objects(document, changes, payload)
}

pub(crate) fn execute_remove_memo(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &RemoveMemo,
) -> Vec<Command> {
    tracing::debug!("execute_remove_memo");
    let RestoreTable { memos, .. } = remove_objects(document, changes, &[], &payload.memo_ids);
    vec![Command::RestoreMemo(RestoreMemo { memos })]
}

pub(crate) fn execute_restore_memo(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &RestoreMemo,
) -> Vec<Command> {
    tracing::debug!("execute_restore_memo");
    let RemoveTable { memo_ids, .. } = restore_objects(
        document,
        changes,
        &RestoreTable {
            memos: payload.memos.clone(),
            ..RestoreTable::default()
        },
    );
    vec![remove_memo(memo_ids)]
}

pub(crate) fn execute_select_memo(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &SelectMemo,
) -> Vec<Command> {
    tracing::debug!("execute_select_memo");
    if !document.memos.contains_key(&payload.memo_id) {
        return Vec::new();
    }

    let selection = ui_snapshot(document, true, true);
    if !payload.ctrl_key {
        set_tables_active(document, changes, false);
        set_memos_active(document, changes, false);
    }
    if let Some(memo) = document.memos.get_mut(&payload.memo_id) {
        let target = Target::Memo(memo.id.clone());
        changes.assign(&mut memo.ui.z_index, payload.z_index, &target, Field::ZIndex);
        changes.assign(&mut memo.ui.active, true, &target, Field::Active);
    }
    document.raise_z_index(payload.z_index);
    vec![Command::RestoreUi(selection)]
}

pub(crate) fn execute_select_end_memo(
    document: &mut Document,
    changes: &mut ChangeLog,
) -> Vec<Command> {
    tracing::debug!("execute_select_end_memo");
    let selection = ui_snapshot(document, false, true);
    set_memos_active(document, changes, false);
    vec![Command::RestoreUi(selection)]
}

pub(crate) fn execute_select_all_memo(
    document: &mut Document,
    changes: &mut ChangeLog,
) -> Vec<Command> {
    tracing::debug!("execute_select_all_memo");
    let selection = ui_snapshot(document, false, true);
    set_memos_active(document, changes, true);
    vec![Command::RestoreUi(selection)]
}

pub(crate) fn execute_change_memo_value(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &ChangeMemoValue,
) -> Vec<Command> {
    tracing::debug!("execute_change_memo_value");
    let Some(memo) = document.memos.get_mut(&payload.memo_id) else {
        return Vec::new();
    };
    let old = changes.assign(
        &mut memo.value,
        payload.value.clone(),
        &Target::Memo(memo.id.clone()),
        Field::Value,
    );
    vec![change_memo_value(payload.memo_id.clone(), old)]
}

pub(crate) fn execute_resize_memo(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &ResizeMemo,
) -> Vec<Command> {
    tracing::debug!("execute_resize_memo");
    let Some(memo) = document.memos.get_mut(&payload.memo_id) else {
        return Vec::new();
    };
    let target = Target::Memo(memo.id.clone());
    let ui = &mut memo.ui;
    let top = changes.assign(&mut ui.top, payload.top, &target, Field::Top);
    let left = changes.assign(&mut ui.left, payload.left, &target, Field::Left);
    let width = changes.assign(&mut ui.width, payload.width, &target, Field::Width);
    let height = changes.assign(&mut ui.height, payload.height, &target, Field::Height);
    vec![resize_memo(payload.memo_id.clone(), top, left, width, height)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_memo_deselects_and_inverse_removes() {
        let mut document = Document::new();
        let mut changes = ChangeLog::new();
        let Command::AddMemo(first) = add_memo(&document) else {
            panic!("expected AddMemo");
        };
        execute_add_memo(&mut document, &mut changes, &first);

        let Command::AddMemo(second) = add_memo(&document) else {
            panic!("expected AddMemo");
        };
        assert_eq!(second.memo.ui.top, first.memo.ui.top + 20.0);
        let inverse = execute_add_memo(&mut document, &mut changes, &second);
        assert!(!document.memo(&first.memo.id).unwrap().ui.active);

        for command in &inverse {
            command.execute(&mut document, &mut changes);
        }
        assert!(document.memo(&second.memo.id).is_none());
        assert!(document.memo(&first.memo.id).unwrap().ui.active);
    }

    #[test]
    fn test_resize_memo_inverse() {
        let mut document = Document::new();
        let mut changes = ChangeLog::new();
        let memo = Memo::new().with_id("m");
        document.memos.insert(memo.id.clone(), memo);

        let inverse = execute_resize_memo(
            &mut document,
            &mut changes,
            &ResizeMemo {
                memo_id: "m".into(),
                top: 10.0,
                left: 20.0,
                width: 300.0,
                height: 200.0,
            },
        );
        assert_eq!(document.memo("m").unwrap().ui.width, 300.0);
        inverse[0].execute(&mut document, &mut changes);
        assert_eq!(document.memo("m").unwrap().ui.width, 116.0);
    }
}
