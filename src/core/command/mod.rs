//! Commands: immutable mutation requests against a [`Document`]
//!
//! Builders in the area modules produce [`Command`] values; they may read the
//! document but never change it. [`Command::execute`] runs the matching
//! executor, records every change into the batch's change log and returns the
//! commands that undo it, in the order they must be applied.

pub mod canvas;
pub mod column;
pub mod editor;
pub mod memo;
pub mod relationship;
pub mod table;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::document::Document;
use super::error::DispatchError;
use super::helper::Id;
use super::observe::ChangeLog;

pub use canvas::{
    ChangeCanvasShow, ChangeCanvasType, ChangeColumnCase, ChangeDatabase, ChangeDatabaseName,
    ChangeLanguage, ChangeRelationshipDataTypeSync, ChangeTableCase, MoveCanvas, MoveColumnOrder,
    ResizeCanvas,
};
pub use column::{
    AddColumn, ChangeColumnDataType, ChangeColumnFlag, ChangeColumnValue, MoveColumn,
    RemoveColumn, RestoreColumn, SortColumn,
};
pub use editor::{
    DrawRelationshipTo, DrawStartAddRelationship, DrawStartRelationship, EditTable,
    FocusMoveTable, FocusTable,
};
pub use memo::{AddMemo, ChangeMemoValue, RemoveMemo, ResizeMemo, RestoreMemo, SelectMemo};
pub use relationship::{
    AddRelationship, ChangeIdentification, ChangeRelationshipType, RemoveRelationship,
    RestoreRelationship,
};
pub use table::{
    AddTable, ArrangeTable, ChangeTableValue, MoveObjects, RemoveTable, RestoreTable, RestoreUi,
    SelectTable, UiState,
};

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum Command {
    // canvas
    MoveCanvas(MoveCanvas),
    ResizeCanvas(ResizeCanvas),
    ChangeCanvasShow(ChangeCanvasShow),
    ChangeDatabase(ChangeDatabase),
    ChangeDatabaseName(ChangeDatabaseName),
    ChangeCanvasType(ChangeCanvasType),
    ChangeLanguage(ChangeLanguage),
    ChangeTableCase(ChangeTableCase),
    ChangeColumnCase(ChangeColumnCase),
    ChangeRelationshipDataTypeSync(ChangeRelationshipDataTypeSync),
    MoveColumnOrder(MoveColumnOrder),

    // table
    AddTable(AddTable),
    MoveTable(MoveObjects),
    RemoveTable(RemoveTable),
    SelectTable(SelectTable),
    SelectEndTable,
    SelectAllTable,
    ChangeTableName(ChangeTableValue),
    ChangeTableComment(ChangeTableValue),
    SortTable,
    ArrangeTable(ArrangeTable),
    RestoreTable(RestoreTable),
    RestoreUi(RestoreUi),

    // column
    AddColumn(AddColumn),
    RemoveColumn(RemoveColumn),
    ChangeColumnName(ChangeColumnValue),
    ChangeColumnComment(ChangeColumnValue),
    ChangeColumnDataType(ChangeColumnDataType),
    ChangeColumnDefault(ChangeColumnValue),
    ChangeColumnAutoIncrement(ChangeColumnFlag),
    ChangeColumnPrimaryKey(ChangeColumnFlag),
    ChangeColumnUnique(ChangeColumnFlag),
    ChangeColumnNotNull(ChangeColumnFlag),
    MoveColumn(MoveColumn),
    SortColumn(SortColumn),
    RestoreColumn(RestoreColumn),

    // relationship
    AddRelationship(AddRelationship),
    RemoveRelationship(RemoveRelationship),
    ChangeRelationshipType(ChangeRelationshipType),
    ChangeIdentification(ChangeIdentification),
    RestoreRelationship(RestoreRelationship),

    // memo
    AddMemo(AddMemo),
    MoveMemo(MoveObjects),
    RemoveMemo(RemoveMemo),
    SelectMemo(SelectMemo),
    SelectEndMemo,
    SelectAllMemo,
    ChangeMemoValue(ChangeMemoValue),
    ResizeMemo(ResizeMemo),
    RestoreMemo(RestoreMemo),

    // editor
    FocusTable(FocusTable),
    FocusEndTable,
    FocusMoveTable(FocusMoveTable),
    EditTable(EditTable),
    EditEndTable,
    DrawStartRelationship(DrawStartRelationship),
    DrawStartAddRelationship(DrawStartAddRelationship),
    DrawRelationship(DrawRelationshipTo),
    DrawEndRelationship,

    // history
    Undo,
    Redo,
}

/// Undo the most recent recorded batch
pub fn undo() -> Command {
    Command::Undo
}

/// Redo the most recently undone batch
pub fn redo() -> Command {
    Command::Redo
}

impl Command {
    /// Editor commands change transient state only and are never recorded
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Command::FocusTable(_)
                | Command::FocusEndTable
                | Command::FocusMoveTable(_)
                | Command::EditTable(_)
                | Command::EditEndTable
                | Command::DrawStartRelationship(_)
                | Command::DrawStartAddRelationship(_)
                | Command::DrawRelationship(_)
                | Command::DrawEndRelationship
        )
    }

    /// History control, handled by the store rather than an executor
    pub fn is_control(&self) -> bool {
        matches!(self, Command::Undo | Command::Redo)
    }

    /// Apply the command, returning its inverse
    pub(crate) fn execute(&self, document: &mut Document, changes: &mut ChangeLog) -> Vec<Command> {
        match self {
            Command::MoveCanvas(payload) => canvas::execute_move_canvas(document, changes, payload),
            Command::ResizeCanvas(payload) => {
                canvas::execute_resize_canvas(document, changes, payload)
            }
            Command::ChangeCanvasShow(payload) => {
                canvas::execute_change_canvas_show(document, changes, payload)
            }
            Command::ChangeDatabase(payload) => {
                canvas::execute_change_database(document, changes, payload)
            }
            Command::ChangeDatabaseName(payload) => {
                canvas::execute_change_database_name(document, changes, payload)
            }
            Command::ChangeCanvasType(payload) => {
                canvas::execute_change_canvas_type(document, changes, payload)
            }
            Command::ChangeLanguage(payload) => {
                canvas::execute_change_language(document, changes, payload)
            }
            Command::ChangeTableCase(payload) => {
                canvas::execute_change_table_case(document, changes, payload)
            }
            Command::ChangeColumnCase(payload) => {
                canvas::execute_change_column_case(document, changes, payload)
            }
            Command::ChangeRelationshipDataTypeSync(payload) => {
                canvas::execute_change_relationship_data_type_sync(document, changes, payload)
            }
            Command::MoveColumnOrder(payload) => {
                canvas::execute_move_column_order(document, changes, payload)
            }

            Command::AddTable(payload) => table::execute_add_table(document, changes, payload),
            Command::MoveTable(payload) => table::execute_move_table(document, changes, payload),
            Command::RemoveTable(payload) => {
                table::execute_remove_table(document, changes, payload)
            }
            Command::SelectTable(payload) => {
                table::execute_select_table(document, changes, payload)
            }
            Command::SelectEndTable => table::execute_select_end_table(document, changes),
            Command::SelectAllTable => table::execute_select_all_table(document, changes),
            Command::ChangeTableName(payload) => {
                table::execute_change_table_name(document, changes, payload)
            }
            Command::ChangeTableComment(payload) => {
                table::execute_change_table_comment(document, changes, payload)
            }
            Command::SortTable => table::execute_sort_table(document, changes),
            Command::ArrangeTable(payload) => {
                table::execute_arrange_table(document, changes, payload)
            }
            Command::RestoreTable(payload) => {
                table::execute_restore_table(document, changes, payload)
            }
            Command::RestoreUi(payload) => table::execute_restore_ui(document, changes, payload),

            Command::AddColumn(payload) => column::execute_add_column(document, changes, payload),
            Command::RemoveColumn(payload) => {
                column::execute_remove_column(document, changes, payload)
            }
            Command::ChangeColumnName(payload) => {
                column::execute_change_column_name(document, changes, payload)
            }
            Command::ChangeColumnComment(payload) => {
                column::execute_change_column_comment(document, changes, payload)
            }
            Command::ChangeColumnDataType(payload) => {
                column::execute_change_column_data_type(document, changes, payload)
            }
            Command::ChangeColumnDefault(payload) => {
                column::execute_change_column_default(document, changes, payload)
            }
            Command::ChangeColumnAutoIncrement(payload) => {
                column::execute_change_column_auto_increment(document, changes, payload)
            }
            Command::ChangeColumnPrimaryKey(payload) => {
                column::execute_change_column_primary_key(document, changes, payload)
            }
            Command::ChangeColumnUnique(payload) => {
                column::execute_change_column_unique(document, changes, payload)
            }
            Command::ChangeColumnNotNull(payload) => {
                column::execute_change_column_not_null(document, changes, payload)
            }
            Command::MoveColumn(payload) => {
                column::execute_move_column(document, changes, payload)
            }
            Command::SortColumn(payload) => {
                column::execute_sort_column(document, changes, payload)
            }
            Command::RestoreColumn(payload) => {
                column::execute_restore_column(document, changes, payload)
            }

            Command::AddRelationship(payload) => {
                relationship::execute_add_relationship(document, changes, payload)
            }
            Command::RemoveRelationship(payload) => {
                relationship::execute_remove_relationship(document, changes, payload)
            }
            Command::ChangeRelationshipType(payload) => {
                relationship::execute_change_relationship_type(document, changes, payload)
            }
            Command::ChangeIdentification(payload) => {
                relationship::execute_change_identification(document, changes, payload)
            }
            Command::RestoreRelationship(payload) => {
                relationship::execute_restore_relationship(document, changes, payload)
            }

            Command::AddMemo(payload) => memo::execute_add_memo(document, changes, payload),
            Command::MoveMemo(payload) => memo::execute_move_memo(document, changes, payload),
            Command::RemoveMemo(payload) => memo::execute_remove_memo(document, changes, payload),
            Command::SelectMemo(payload) => memo::execute_select_memo(document, changes, payload),
            Command::SelectEndMemo => memo::execute_select_end_memo(document, changes),
            Command::SelectAllMemo => memo::execute_select_all_memo(document, changes),
            Command::ChangeMemoValue(payload) => {
                memo::execute_change_memo_value(document, changes, payload)
            }
            Command::ResizeMemo(payload) => memo::execute_resize_memo(document, changes, payload),
            Command::RestoreMemo(payload) => {
                memo::execute_restore_memo(document, changes, payload)
            }

            Command::FocusTable(payload) => {
                editor::execute_focus_table(document, changes, payload)
            }
            Command::FocusEndTable => editor::execute_focus_end_table(document, changes),
            Command::FocusMoveTable(payload) => {
                editor::execute_focus_move_table(document, changes, payload)
            }
            Command::EditTable(payload) => editor::execute_edit_table(document, changes, payload),
            Command::EditEndTable => editor::execute_edit_end_table(document, changes),
            Command::DrawStartRelationship(payload) => {
                editor::execute_draw_start_relationship(document, changes, payload)
            }
            Command::DrawStartAddRelationship(payload) => {
                editor::execute_draw_start_add_relationship(document, changes, payload)
            }
            Command::DrawRelationship(payload) => {
                editor::execute_draw_relationship(document, changes, payload)
            }
            Command::DrawEndRelationship => {
                editor::execute_draw_end_relationship(document, changes)
            }

            Command::Undo | Command::Redo => Vec::new(),
        }
    }
}

/// Reject a batch that would insert an id already present, checking the
/// commands in order so two adds of the same id in one batch are caught too
pub(crate) fn validate(document: &Document, commands: &[Command]) -> Result<(), DispatchError> {
    let mut tables: HashSet<&str> = document.tables.keys().map(String::as_str).collect();
    let mut relationships: HashSet<&str> =
        document.relationships.keys().map(String::as_str).collect();
    let mut memos: HashSet<&str> = document.memos.keys().map(String::as_str).collect();
    let mut columns: HashSet<(&str, &str)> = document
        .tables
        .values()
        .flat_map(|table| {
            table
                .columns
                .iter()
                .map(move |column| (table.id.as_str(), column.id.as_str()))
        })
        .collect();

    let duplicate = |kind: &'static str, id: &Id| DispatchError::DuplicateId {
        kind,
        id: id.clone(),
    };

    for command in commands {
        match command {
            Command::AddTable(payload) => {
                if !tables.insert(payload.table.id.as_str()) {
                    return Err(duplicate("table", &payload.table.id));
                }
                for column in &payload.table.columns {
                    if !columns.insert((payload.table.id.as_str(), column.id.as_str())) {
                        return Err(duplicate("column", &column.id));
                    }
                }
            }
            Command::AddColumn(payload) => {
                if !columns.insert((payload.table_id.as_str(), payload.column.id.as_str())) {
                    return Err(duplicate("column", &payload.column.id));
                }
            }
            Command::AddRelationship(payload) => {
                if !relationships.insert(payload.relationship.id.as_str()) {
                    return Err(duplicate("relationship", &payload.relationship.id));
                }
            }
            Command::AddMemo(payload) => {
                if !memos.insert(payload.memo.id.as_str()) {
                    return Err(duplicate("memo", &payload.memo.id));
                }
            }
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::{Column, Table};

    #[test]
    fn test_command_serializes_with_type_tag() {
        let command = canvas::move_canvas(10.0, 20.0);
        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(json["type"], "MoveCanvas");
        assert_eq!(json["data"]["scroll_top"], 10.0);

        let back: Command = serde_json::from_value(json).unwrap();
        assert_eq!(back, command);
    }

    #[test]
    fn test_validate_rejects_duplicate_within_batch() {
        let document = Document::new();
        let table = Table::new("a").with_id("t");
        let commands = vec![
            Command::AddTable(AddTable {
                table: table.clone(),
            }),
            Command::AddTable(AddTable { table }),
        ];
        assert_eq!(
            validate(&document, &commands),
            Err(DispatchError::DuplicateId {
                kind: "table",
                id: "t".into()
            })
        );
    }

    #[test]
    fn test_validate_rejects_existing_column() {
        let mut document = Document::new();
        let table = Table::new("a")
            .with_id("t")
            .add_column(Column::new("id", "int").with_id("c"));
        document.tables.insert(table.id.clone(), table);

        let commands = vec![Command::AddColumn(AddColumn {
            table_id: "t".into(),
            column: Column::new("again", "int").with_id("c"),
        })];
        assert!(validate(&document, &commands).is_err());
    }

    #[test]
    fn test_editor_commands_are_transient() {
        assert!(Command::FocusEndTable.is_transient());
        assert!(!Command::SelectEndTable.is_transient());
        assert!(undo().is_control());
    }
}
