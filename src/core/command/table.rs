use serde::{Deserialize, Serialize};

use super::Command;
use super::relationship::connects;
use crate::core::document::Document;
use crate::core::helper::Id;
use crate::core::layout::{Position, arrange_tables, input_width, next_point, next_z_index};
use crate::core::observe::{ChangeLog, Field, Target};
use crate::core::ordering::order_by_relationship;
use crate::core::schema::{Memo, Relationship, Table};

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct AddTable {
    pub table: Table,
}

/// Relative move of tables and memos
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct MoveObjects {
    pub move_x: f64,
    pub move_y: f64,
    pub table_ids: Vec<Id>,
    pub memo_ids: Vec<Id>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct RemoveTable {
    pub table_ids: Vec<Id>,
    pub memo_ids: Vec<Id>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct SelectTable {
    pub table_id: Id,
    /// Add to the selection instead of replacing it
    pub ctrl_key: bool,
    pub z_index: u32,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ChangeTableValue {
    pub table_id: Id,
    pub value: String,
}

/// Absolute placement of tables and memos
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct ArrangeTable {
    pub tables: Vec<Position>,
    pub memos: Vec<Position>,
}

/// Re-insert removed tables, their relationships and memos at their
/// former indices
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct RestoreTable {
    pub tables: Vec<(usize, Table)>,
    pub relationships: Vec<(usize, Relationship)>,
    pub memos: Vec<(usize, Memo)>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct UiState {
    pub id: Id,
    pub active: bool,
    pub z_index: u32,
}

/// Selection and stacking state to put back
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct RestoreUi {
    pub tables: Vec<UiState>,
    pub memos: Vec<UiState>,
    /// Document z-index high-water mark
    #[serde(default)]
    pub z_index: Option<u32>,
}

/// New empty table at the next free default position, selected and on top
pub fn add_table(document: &Document) -> Command {
    let (top, left) = next_point(&document.canvas, document.tables(), document.memos());
    let mut table = Table::new("").with_position(left, top);
    table.ui.z_index = next_z_index(document.z_index);
    table.ui.active = true;
    Command::AddTable(AddTable { table })
}

/// Drag `table_id` together with every selected table and memo
pub fn move_table(document: &Document, move_x: f64, move_y: f64, table_id: &str) -> Command {
    let mut table_ids: Vec<Id> = document
        .tables()
        .filter(|table| table.ui.active)
        .map(|table| table.id.clone())
        .collect();
    if !table_ids.iter().any(|id| id == table_id) {
        table_ids.push(table_id.to_string());
    }
    let memo_ids = document
        .memos()
        .filter(|memo| memo.ui.active)
        .map(|memo| memo.id.clone())
        .collect();
    Command::MoveTable(MoveObjects {
        move_x,
        move_y,
        table_ids,
        memo_ids,
    })
}

pub fn remove_table(table_ids: Vec<Id>) -> Command {
    Command::RemoveTable(RemoveTable {
        table_ids,
        memo_ids: Vec::new(),
    })
}

/// Remove every selected table and memo
pub fn remove_active(document: &Document) -> Command {
    Command::RemoveTable(RemoveTable {
        table_ids: document
            .tables()
            .filter(|table| table.ui.active)
            .map(|table| table.id.clone())
            .collect(),
        memo_ids: document
            .memos()
            .filter(|memo| memo.ui.active)
            .map(|memo| memo.id.clone())
            .collect(),
    })
}

pub fn select_table(document: &Document, table_id: impl Into<Id>, ctrl_key: bool) -> Command {
    Command::SelectTable(SelectTable {
        table_id: table_id.into(),
        ctrl_key,
        z_index: next_z_index(document.z_index),
    })
}

pub fn select_end_table() -> Command {
    Command::SelectEndTable
}

pub fn select_all_table() -> Command {
    Command::SelectAllTable
}

pub fn change_table_name(table_id: impl Into<Id>, value: impl Into<String>) -> Command {
    Command::ChangeTableName(ChangeTableValue {
        table_id: table_id.into(),
        value: value.into(),
    })
}

pub fn change_table_comment(table_id: impl Into<Id>, value: impl Into<String>) -> Command {
    Command::ChangeTableComment(ChangeTableValue {
        table_id: table_id.into(),
        value: value.into(),
    })
}

/// Re-arrange every table in relationship order
pub fn sort_table() -> Command {
    Command::SortTable
}

pub(super) fn ui_snapshot(document: &Document, tables: bool, memos: bool) -> RestoreUi {
    let state = |id: &Id, active: bool, z_index: u32| UiState {
        id: id.clone(),
        active,
        z_index,
    };
    RestoreUi {
        tables: if tables {
            document
                .tables
                .values()
                .map(|table| state(&table.id, table.ui.active, table.ui.z_index))
                .collect()
        } else {
            Vec::new()
        },
        memos: if memos {
            document
                .memos
                .values()
                .map(|memo| state(&memo.id, memo.ui.active, memo.ui.z_index))
                .collect()
        } else {
            Vec::new()
        },
        z_index: Some(document.z_index),
    }
}

pub(super) fn set_tables_active(document: &mut Document, changes: &mut ChangeLog, value: bool) {
    for table in document.tables.values_mut() {
        changes.assign(
            &mut table.ui.active,
            value,
            &Target::Table(table.id.clone()),
            Field::Active,
        );
    }
}

pub(super) fn set_memos_active(document: &mut Document, changes: &mut ChangeLog, value: bool) {
    for memo in document.memos.values_mut() {
        changes.assign(
            &mut memo.ui.active,
            value,
            &Target::Memo(memo.id.clone()),
            Field::Active,
        );
    }
}

/// Shared by table and memo moves
pub(super) fn move_objects(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &MoveObjects,
) -> Vec<Command> {
    let mut previous = ArrangeTable::default();
    for table_id in &payload.table_ids {
        let Some(table) = document.tables.get_mut(table_id) else {
            continue;
        };
        previous.tables.push(Position {
            id: table.id.clone(),
            top: table.ui.top,
            left: table.ui.left,
        });
        let target = Target::Table(table.id.clone());
        let top = table.ui.top + payload.move_y;
        let left = table.ui.left + payload.move_x;
        changes.assign(&mut table.ui.top, top, &target, Field::Top);
        changes.assign(&mut table.ui.left, left, &target, Field::Left);
    }
    for memo_id in &payload.memo_ids {
        let Some(memo) = document.memos.get_mut(memo_id) else {
            continue;
        };
        previous.memos.push(Position {
            id: memo.id.clone(),
            top: memo.ui.top,
            left: memo.ui.left,
        });
        let target = Target::Memo(memo.id.clone());
        let top = memo.ui.top + payload.move_y;
        let left = memo.ui.left + payload.move_x;
        changes.assign(&mut memo.ui.top, top, &target, Field::Top);
        changes.assign(&mut memo.ui.left, left, &target, Field::Left);
    }
    document.refresh_relationships(changes);
    vec![Command::ArrangeTable(previous)]
}

/// Remove tables and memos by id, cascading to relationships on the removed
/// tables. Returns what was removed with the former indices.
pub(super) fn remove_objects(
    document: &mut Document,
    changes: &mut ChangeLog,
    table_ids: &[Id],
    memo_ids: &[Id],
) -> RestoreTable {
    let mut removed = RestoreTable::default();

    for (index, (id, table)) in document.tables.iter().enumerate() {
        if table_ids.contains(id) {
            removed.tables.push((index, table.clone()));
        }
    }
    for (index, relationship) in document.relationships.values().enumerate() {
        if removed
            .tables
            .iter()
            .any(|(_, table)| relationship.touches(&table.id))
        {
            removed.relationships.push((index, relationship.clone()));
        }
    }
    for (index, (id, memo)) in document.memos.iter().enumerate() {
        if memo_ids.contains(id) {
            removed.memos.push((index, memo.clone()));
        }
    }

    for (index, relationship) in removed.relationships.iter().rev() {
        document.relationships.shift_remove_index(*index);
        changes.removed(Target::Relationships, &relationship.id);
    }
    for (index, table) in removed.tables.iter().rev() {
        document.tables.shift_remove_index(*index);
        changes.removed(Target::Tables, &table.id);
    }
    for (index, memo) in removed.memos.iter().rev() {
        document.memos.shift_remove_index(*index);
        changes.removed(Target::Memos, &memo.id);
    }

    let editor = &mut document.editor;
    let focused = editor
        .focus_table
        .as_ref()
        .is_some_and(|focus| table_ids.contains(&focus.table_id));
    if focused {
        editor.focus_table = None;
        editor.edit_table = None;
        changes.field(&Target::Editor, Field::FocusTable);
    }

    if !removed.tables.is_empty() {
        document.refresh_column_keys(changes);
        document.refresh_relationships(changes);
    }
    removed
}

/// Re-insert entities removed by [`remove_objects`], ascending by index
pub(super) fn restore_objects(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &RestoreTable,
) -> RemoveTable {
    let mut restored = RemoveTable::default();

    for (index, table) in &payload.tables {
        if document.tables.contains_key(&table.id) {
            continue;
        }
        let index = (*index).min(document.tables.len());
        document
            .tables
            .shift_insert(index, table.id.clone(), table.clone());
        changes.inserted(Target::Tables, &table.id);
        document.raise_z_index(table.ui.z_index);
        restored.table_ids.push(table.id.clone());
    }
    for (index, relationship) in &payload.relationships {
        if document.relationships.contains_key(&relationship.id)
            || !connects(document, relationship)
        {
            continue;
        }
        let index = (*index).min(document.relationships.len());
        document
            .relationships
            .shift_insert(index, relationship.id.clone(), relationship.clone());
        changes.inserted(Target::Relationships, &relationship.id);
    }
    for (index, memo) in &payload.memos {
        if document.memos.contains_key(&memo.id) {
            continue;
        }
        let index = (*index).min(document.memos.len());
        document
            .memos
            .shift_insert(index, memo.id.clone(), memo.clone());
        changes.inserted(Target::Memos, &memo.id);
        document.raise_z_index(memo.ui.z_index);
        restored.memo_ids.push(memo.id.clone());
    }

    document.refresh_column_keys(changes);
    document.refresh_relationships(changes);
    restored
}

pub(crate) fn execute_add_table(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &AddTable,
) -> Vec<Command> {
    tracing::debug!("execute_add_table");
    let table = &payload.table;
    if document.tables.contains_key(&table.id) {
        return Vec::new();
    }

    let selection = ui_snapshot(document, true, true);
    set_tables_active(document, changes, false);
    set_memos_active(document, changes, false);

    document.tables.insert(table.id.clone(), table.clone());
    changes.inserted(Target::Tables, &table.id);
    document.raise_z_index(table.ui.z_index);
    document.refresh_widths(changes);
    document.refresh_column_keys(changes);
    document.refresh_relationships(changes);

    vec![remove_table(vec![table.id.clone()]), Command::RestoreUi(selection)]
}

pub(crate) fn execute_move_table(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &MoveObjects,
) -> Vec<Command> {
    tracing::debug!("execute_move_table");
    move_objects(document, changes, payload)
}

pub(crate) fn execute_remove_table(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &RemoveTable,
) -> Vec<Command> {
    tracing::debug!("execute_remove_table");
    let removed = remove_objects(document, changes, &payload.table_ids, &payload.memo_ids);
    vec![Command::RestoreTable(removed)]
}

pub(crate) fn execute_restore_table(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &RestoreTable,
) -> Vec<Command> {
    tracing::debug!("execute_restore_table");
    let restored = restore_objects(document, changes, payload);
    vec![Command::RemoveTable(restored)]
}

pub(crate) fn execute_select_table(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &SelectTable,
) -> Vec<Command> {
    tracing::debug!("execute_select_table");
    if !document.tables.contains_key(&payload.table_id) {
        return Vec::new();
    }

    let selection = ui_snapshot(document, true, true);
    if !payload.ctrl_key {
        set_tables_active(document, changes, false);
        set_memos_active(document, changes, false);
    }
    if let Some(table) = document.tables.get_mut(&payload.table_id) {
        let target = Target::Table(table.id.clone());
        changes.assign(&mut table.ui.z_index, payload.z_index, &target, Field::ZIndex);
        changes.assign(&mut table.ui.active, true, &target, Field::Active);
    }
    document.raise_z_index(payload.z_index);
    vec![Command::RestoreUi(selection)]
}

pub(crate) fn execute_select_end_table(
    document: &mut Document,
    changes: &mut ChangeLog,
) -> Vec<Command> {
    tracing::debug!("execute_select_end_table");
    let selection = ui_snapshot(document, true, false);
    set_tables_active(document, changes, false);
    if document.editor.focus_table.take().is_some() {
        changes.field(&Target::Editor, Field::FocusTable);
    }
    vec![Command::RestoreUi(selection)]
}

pub(crate) fn execute_select_all_table(
    document: &mut Document,
    changes: &mut ChangeLog,
) -> Vec<Command> {
    tracing::debug!("execute_select_all_table");
    let selection = ui_snapshot(document, true, false);
    set_tables_active(document, changes, true);
    vec![Command::RestoreUi(selection)]
}

pub(crate) fn execute_change_table_name(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &ChangeTableValue,
) -> Vec<Command> {
    tracing::debug!("execute_change_table_name");
    let Some(table) = document.tables.get_mut(&payload.table_id) else {
        return Vec::new();
    };
    let target = Target::Table(table.id.clone());
    let old = changes.assign(&mut table.name, payload.value.clone(), &target, Field::Name);
    changes.assign(
        &mut table.ui.width_name,
        input_width(&payload.value),
        &target,
        Field::WidthName,
    );
    document.refresh_relationships(changes);
    vec![change_table_name(payload.table_id.clone(), old)]
}

pub(crate) fn execute_change_table_comment(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &ChangeTableValue,
) -> Vec<Command> {
    tracing::debug!("execute_change_table_comment");
    let Some(table) = document.tables.get_mut(&payload.table_id) else {
        return Vec::new();
    };
    let target = Target::Table(table.id.clone());
    let old = changes.assign(
        &mut table.comment,
        payload.value.clone(),
        &target,
        Field::Comment,
    );
    changes.assign(
        &mut table.ui.width_comment,
        input_width(&payload.value),
        &target,
        Field::WidthComment,
    );
    document.refresh_relationships(changes);
    vec![change_table_comment(payload.table_id.clone(), old)]
}

pub(crate) fn execute_sort_table(document: &mut Document, changes: &mut ChangeLog) -> Vec<Command> {
    tracing::debug!("execute_sort_table");
    let positions = {
        let ordered =
            order_by_relationship(document.tables.values(), document.relationships.values());
        arrange_tables(ordered, &document.canvas.show, document.canvas.width)
    };
    execute_arrange_table(
        document,
        changes,
        &ArrangeTable {
            tables: positions,
            memos: Vec::new(),
        },
    )
}

pub(crate) fn execute_arrange_table(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &ArrangeTable,
) -> Vec<Command> {
    tracing::debug!("execute_arrange_table");
    let mut previous = ArrangeTable::default();
    for position in &payload.tables {
        let Some(table) = document.tables.get_mut(&position.id) else {
            continue;
        };
        let target = Target::Table(table.id.clone());
        let top = changes.assign(&mut table.ui.top, position.top, &target, Field::Top);
        let left = changes.assign(&mut table.ui.left, position.left, &target, Field::Left);
        previous.tables.push(Position {
            id: position.id.clone(),
            top,
            left,
        });
    }
    for position in &payload.memos {
        let Some(memo) = document.memos.get_mut(&position.id) else {
            continue;
        };
        let target = Target::Memo(memo.id.clone());
        let top = changes.assign(&mut memo.ui.top, position.top, &target, Field::Top);
        let left = changes.assign(&mut memo.ui.left, position.left, &target, Field::Left);
        previous.memos.push(Position {
            id: position.id.clone(),
            top,
            left,
        });
    }
    document.refresh_relationships(changes);
    vec![Command::ArrangeTable(previous)]
}

pub(crate) fn execute_restore_ui(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &RestoreUi,
) -> Vec<Command> {
    tracing::debug!("execute_restore_ui");
    let mut previous = RestoreUi::default();
    for state in &payload.tables {
        let Some(table) = document.tables.get_mut(&state.id) else {
            continue;
        };
        let target = Target::Table(table.id.clone());
        previous.tables.push(UiState {
            id: state.id.clone(),
            active: changes.assign(&mut table.ui.active, state.active, &target, Field::Active),
            z_index: changes.assign(&mut table.ui.z_index, state.z_index, &target, Field::ZIndex),
        });
    }
    for state in &payload.memos {
        let Some(memo) = document.memos.get_mut(&state.id) else {
            continue;
        };
        let target = Target::Memo(memo.id.clone());
        previous.memos.push(UiState {
            id: state.id.clone(),
            active: changes.assign(&mut memo.ui.active, state.active, &target, Field::Active),
            z_index: changes.assign(&mut memo.ui.z_index, state.z_index, &target, Field::ZIndex),
        });
    }
    if let Some(mark) = payload.z_index {
        previous.z_index = Some(std::mem::replace(&mut document.z_index, mark));
    }
    vec![Command::RestoreUi(previous)]
}
