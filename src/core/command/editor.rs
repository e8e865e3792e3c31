//! Editor commands: focus, text editing and relationship drawing.
//! They change transient state only and return no inverse.

use serde::{Deserialize, Serialize};

use super::Command;
use super::relationship::add_relationship;
use crate::core::document::Document;
use crate::core::editor::{self as state, DrawStart, FocusType, MoveKey, move_focus};
use crate::core::helper::Id;
use crate::core::layout::Point;
use crate::core::observe::{ChangeLog, Field, Target};
use crate::core::schema::RelationshipType;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct FocusTable {
    pub table_id: Id,
    pub focus_type: FocusType,
    /// Table id for table fields, column id for column fields
    pub focus_id: Id,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct FocusMoveTable {
    pub key: MoveKey,
    pub shift_key: bool,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct EditTable {
    pub id: Id,
    pub focus_type: FocusType,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct DrawStartRelationship {
    pub relationship_type: RelationshipType,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct DrawStartAddRelationship {
    pub table_id: Id,
    pub x: f64,
    pub y: f64,
}

/// Cursor position while drawing
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct DrawRelationshipTo {
    pub x: f64,
    pub y: f64,
}

pub fn focus_table(table_id: impl Into<Id>) -> Command {
    let table_id = table_id.into();
    Command::FocusTable(FocusTable {
        focus_id: table_id.clone(),
        table_id,
        focus_type: FocusType::TableName,
    })
}

pub fn focus_column(
    table_id: impl Into<Id>,
    column_id: impl Into<Id>,
    focus_type: FocusType,
) -> Command {
    Command::FocusTable(FocusTable {
        table_id: table_id.into(),
        focus_type,
        focus_id: column_id.into(),
    })
}

pub fn focus_end_table() -> Command {
    Command::FocusEndTable
}

pub fn focus_move_table(key: MoveKey, shift_key: bool) -> Command {
    Command::FocusMoveTable(FocusMoveTable { key, shift_key })
}

pub fn edit_table(id: impl Into<Id>, focus_type: FocusType) -> Command {
    Command::EditTable(EditTable {
        id: id.into(),
        focus_type,
    })
}

pub fn edit_end_table() -> Command {
    Command::EditEndTable
}

pub fn draw_start_relationship(relationship_type: RelationshipType) -> Command {
    Command::DrawStartRelationship(DrawStartRelationship { relationship_type })
}

pub fn draw_start_add_relationship(table_id: impl Into<Id>, x: f64, y: f64) -> Command {
    Command::DrawStartAddRelationship(DrawStartAddRelationship {
        table_id: table_id.into(),
        x,
        y,
    })
}

pub fn draw_relationship(x: f64, y: f64) -> Command {
    Command::DrawRelationship(DrawRelationshipTo { x, y })
}

/// Finish drawing on `end_table_id`: connects the tables when a start table
/// was picked, then leaves drawing mode
pub fn draw_end_relationship(document: &Document, end_table_id: &str) -> Vec<Command> {
    let mut commands = match &document.editor.draw_relationship {
        Some(state::DrawRelationship {
            relationship_type,
            start: Some(start),
            ..
        }) => add_relationship(document, *relationship_type, &start.table_id, end_table_id),
        _ => Vec::new(),
    };
    commands.push(Command::DrawEndRelationship);
    commands
}

pub(crate) fn execute_focus_table(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &FocusTable,
) -> Vec<Command> {
    tracing::debug!("execute_focus_table");
    let Some(table) = document.tables.get(&payload.table_id) else {
        return Vec::new();
    };
    let column_focus = table.column(&payload.focus_id).is_some();
    let focus = state::FocusTable {
        table_id: payload.table_id.clone(),
        current_focus: payload.focus_type,
        current_focus_id: payload.focus_id.clone(),
        selected_column_ids: if column_focus {
            vec![payload.focus_id.clone()]
        } else {
            Vec::new()
        },
    };
    let editor = &mut document.editor;
    changes.assign(&mut editor.focus, true, &Target::Editor, Field::Focus);
    changes.assign(
        &mut editor.focus_table,
        Some(focus),
        &Target::Editor,
        Field::FocusTable,
    );
    Vec::new()
}

pub(crate) fn execute_focus_end_table(
    document: &mut Document,
    changes: &mut ChangeLog,
) -> Vec<Command> {
    tracing::debug!("execute_focus_end_table");
    let editor = &mut document.editor;
    changes.assign(&mut editor.focus, false, &Target::Editor, Field::Focus);
    changes.assign(&mut editor.focus_table, None, &Target::Editor, Field::FocusTable);
    changes.assign(&mut editor.edit_table, None, &Target::Editor, Field::EditTable);
    Vec::new()
}

pub(crate) fn execute_focus_move_table(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &FocusMoveTable,
) -> Vec<Command> {
    tracing::debug!("execute_focus_move_table");
    let Some(focus) = &document.editor.focus_table else {
        return Vec::new();
    };
    let Some(table) = document.tables.get(&focus.table_id) else {
        return Vec::new();
    };
    let moved = move_focus(
        focus,
        table,
        &document.canvas.show,
        &document.canvas.setting.column_order,
        payload.key,
        payload.shift_key,
    );
    changes.assign(
        &mut document.editor.focus_table,
        Some(moved),
        &Target::Editor,
        Field::FocusTable,
    );
    Vec::new()
}

pub(crate) fn execute_edit_table(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &EditTable,
) -> Vec<Command> {
    tracing::debug!("execute_edit_table");
    let known = document.tables.contains_key(&payload.id)
        || document
            .tables
            .values()
            .any(|table| table.column(&payload.id).is_some());
    if !known {
        return Vec::new();
    }
    changes.assign(
        &mut document.editor.edit_table,
        Some(state::EditTable {
            id: payload.id.clone(),
            focus_type: payload.focus_type,
        }),
        &Target::Editor,
        Field::EditTable,
    );
    Vec::new()
}

pub(crate) fn execute_edit_end_table(
    document: &mut Document,
    changes: &mut ChangeLog,
) -> Vec<Command> {
    tracing::debug!("execute_edit_end_table");
    changes.assign(
        &mut document.editor.edit_table,
        None,
        &Target::Editor,
        Field::EditTable,
    );
    Vec::new()
}

pub(crate) fn execute_draw_start_relationship(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &DrawStartRelationship,
) -> Vec<Command> {
    tracing::debug!("execute_draw_start_relationship");
    changes.assign(
        &mut document.editor.draw_relationship,
        Some(state::DrawRelationship {
            relationship_type: payload.relationship_type,
            start: None,
            end: Point::default(),
        }),
        &Target::Editor,
        Field::DrawRelationship,
    );
    Vec::new()
}

pub(crate) fn execute_draw_start_add_relationship(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &DrawStartAddRelationship,
) -> Vec<Command> {
    tracing::debug!("execute_draw_start_add_relationship");
    if !document.tables.contains_key(&payload.table_id) {
        return Vec::new();
    }
    let Some(draw) = &document.editor.draw_relationship else {
        return Vec::new();
    };
    let next = state::DrawRelationship {
        start: Some(DrawStart {
            table_id: payload.table_id.clone(),
            x: payload.x,
            y: payload.y,
        }),
        end: Point::new(payload.x, payload.y),
        ..draw.clone()
    };
    changes.assign(
        &mut document.editor.draw_relationship,
        Some(next),
        &Target::Editor,
        Field::DrawRelationship,
    );
    Vec::new()
}

pub(crate) fn execute_draw_relationship(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &DrawRelationshipTo,
) -> Vec<Command> {
    tracing::debug!("execute_draw_relationship");
    let Some(draw) = &mut document.editor.draw_relationship else {
        return Vec::new();
    };
    changes.assign(
        &mut draw.end,
        Point::new(payload.x, payload.y),
        &Target::Editor,
        Field::DrawRelationship,
    );
    Vec::new()
}

pub(crate) fn execute_draw_end_relationship(
    document: &mut Document,
    changes: &mut ChangeLog,
) -> Vec<Command> {
    tracing::debug!("execute_draw_end_relationship");
    changes.assign(
        &mut document.editor.draw_relationship,
        None,
        &Target::Editor,
        Field::DrawRelationship,
    );
    Vec::new()
}
