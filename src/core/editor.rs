//! Transient editor state: keyboard focus, text editing and relationship drawing.
//!
//! Observed by the UI layer but never persisted, exported or recorded in history.

use serde::{Deserialize, Serialize};

use super::canvas::{ColumnType, Show};
use super::helper::Id;
use super::layout::Point;
use super::schema::{RelationshipType, Table};

#[derive(Clone, Debug, PartialEq, Default)]
pub struct EditorState {
    /// Whether the canvas holds keyboard focus
    pub focus: bool,
    /// Field currently being text-edited
    pub edit_table: Option<EditTable>,
    /// Keyboard focus cursor inside a table
    pub focus_table: Option<FocusTable>,
    /// Relationship being drawn
    pub draw_relationship: Option<DrawRelationship>,
}

/// Focusable fields of a table
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, derive_more::Display)]
#[serde(rename_all = "camelCase")]
pub enum FocusType {
    #[display("tableName")]
    TableName,
    #[display("tableComment")]
    TableComment,
    #[display("columnName")]
    ColumnName,
    #[display("columnDataType")]
    ColumnDataType,
    #[display("columnNotNull")]
    ColumnNotNull,
    #[display("columnDefault")]
    ColumnDefault,
    #[display("columnComment")]
    ColumnComment,
}

impl FocusType {
    fn from_column_type(column_type: ColumnType) -> Option<Self> {
        match column_type {
            ColumnType::ColumnName => Some(Self::ColumnName),
            ColumnType::ColumnDataType => Some(Self::ColumnDataType),
            ColumnType::ColumnNotNull => Some(Self::ColumnNotNull),
            ColumnType::ColumnDefault => Some(Self::ColumnDefault),
            ColumnType::ColumnComment => Some(Self::ColumnComment),
            ColumnType::ColumnPrimaryKey
            | ColumnType::ColumnUnique
            | ColumnType::ColumnAutoIncrement => None,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct EditTable {
    /// Table id for table fields, column id for column fields
    pub id: Id,
    pub focus_type: FocusType,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct FocusTable {
    pub table_id: Id,
    pub current_focus: FocusType,
    /// Table id when a table field is focused, column id otherwise
    pub current_focus_id: Id,
    pub selected_column_ids: Vec<Id>,
}

impl FocusTable {
    pub fn new(table_id: impl Into<Id>) -> Self {
        let table_id = table_id.into();
        Self {
            current_focus: FocusType::TableName,
            current_focus_id: table_id.clone(),
            table_id,
            selected_column_ids: Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum MoveKey {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Tab,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawRelationship {
    pub relationship_type: RelationshipType,
    pub start: Option<DrawStart>,
    pub end: Point,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawStart {
    pub table_id: Id,
    pub x: f64,
    pub y: f64,
}

/// Focus grid of a table: the header row, then one row per column, each row
/// holding the focusable fields currently shown in column-order
struct FocusGrid {
    header: Vec<FocusType>,
    column: Vec<FocusType>,
    column_ids: Vec<Id>,
}

impl FocusGrid {
    fn new(table: &Table, show: &Show, column_order: &[ColumnType]) -> Self {
        let mut header = vec![FocusType::TableName];
        if show.table_comment {
            header.push(FocusType::TableComment);
        }
        let column = column_order
            .iter()
            .filter(|column_type| show.column_type(**column_type))
            .filter_map(|column_type| FocusType::from_column_type(*column_type))
            .collect();
        Self {
            header,
            column,
            column_ids: table.columns.iter().map(|column| column.id.clone()).collect(),
        }
    }

    fn rows(&self) -> usize {
        self.column_ids.len() + 1
    }

    fn fields(&self, row: usize) -> &[FocusType] {
        if row == 0 { &self.header } else { &self.column }
    }

    fn locate(&self, focus: &FocusTable) -> (usize, usize) {
        let row = self
            .column_ids
            .iter()
            .position(|id| *id == focus.current_focus_id)
            .map(|index| index + 1)
            .unwrap_or(0);
        let col = self
            .fields(row)
            .iter()
            .position(|field| *field == focus.current_focus)
            .unwrap_or(0);
        (row, col)
    }

    fn id(&self, table_id: &str, row: usize) -> Id {
        if row == 0 {
            table_id.to_string()
        } else {
            self.column_ids[row - 1].clone()
        }
    }
}

/// Move the focus cursor one step. With `shift_key`, vertical moves extend
/// the column selection instead of replacing it.
pub fn move_focus(
    focus: &FocusTable,
    table: &Table,
    show: &Show,
    column_order: &[ColumnType],
    key: MoveKey,
    shift_key: bool,
) -> FocusTable {
    let grid = FocusGrid::new(table, show, column_order);
    let (mut row, mut col) = grid.locate(focus);
    let last_row = grid.rows() - 1;

    match key {
        MoveKey::ArrowUp => row = row.saturating_sub(1),
        MoveKey::ArrowDown => row = (row + 1).min(last_row),
        MoveKey::ArrowLeft => col = col.saturating_sub(1),
        MoveKey::ArrowRight => col += 1,
        MoveKey::Tab => {
            col += 1;
            if col >= grid.fields(row).len() {
                col = 0;
                row = if row == last_row { 0 } else { row + 1 };
            }
        }
    }

    let fields = grid.fields(row);
    let current_focus = if fields.is_empty() {
        FocusType::TableName
    } else {
        let previous = grid.fields(grid.locate(focus).0).get(col).copied();
        match (key, previous) {
            (MoveKey::ArrowUp | MoveKey::ArrowDown, Some(field)) if fields.contains(&field) => field,
            _ => fields[col.min(fields.len() - 1)],
        }
    };
    let current_focus_id = if fields.is_empty() {
        table.id.clone()
    } else {
        grid.id(&table.id, row)
    };

    let mut selected_column_ids = if shift_key {
        focus.selected_column_ids.clone()
    } else {
        Vec::new()
    };
    if row > 0 && !selected_column_ids.contains(&current_focus_id) {
        selected_column_ids.push(current_focus_id.clone());
    }

    FocusTable {
        table_id: table.id.clone(),
        current_focus,
        current_focus_id,
        selected_column_ids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::canvas::Setting;
    use crate::core::schema::Column;

    fn table() -> Table {
        Table::new("users")
            .with_id("t")
            .add_column(Column::new("id", "int").with_id("c1"))
            .add_column(Column::new("name", "string").with_id("c2"))
    }

    fn order() -> Vec<ColumnType> {
        Setting::default().column_order
    }

    #[test]
    fn test_move_down_from_header_selects_first_column() {
        let table = table();
        let focus = FocusTable::new("t");
        let moved = move_focus(&focus, &table, &Show::default(), &order(), MoveKey::ArrowDown, false);
        assert_eq!(moved.current_focus_id, "c1");
        assert_eq!(moved.current_focus, FocusType::ColumnName);
        assert_eq!(moved.selected_column_ids, vec!["c1".to_string()]);
    }

    #[test]
    fn test_shift_extends_selection() {
        let table = table();
        let focus = FocusTable::new("t");
        let show = Show::default();
        let first = move_focus(&focus, &table, &show, &order(), MoveKey::ArrowDown, false);
        let second = move_focus(&first, &table, &show, &order(), MoveKey::ArrowDown, true);
        assert_eq!(second.current_focus_id, "c2");
        assert_eq!(
            second.selected_column_ids,
            vec!["c1".to_string(), "c2".to_string()]
        );
    }

    #[test]
    fn test_up_from_header_stays() {
        let table = table();
        let focus = FocusTable::new("t");
        let moved = move_focus(&focus, &table, &Show::default(), &order(), MoveKey::ArrowUp, false);
        assert_eq!(moved.current_focus, FocusType::TableName);
        assert_eq!(moved.current_focus_id, "t");
        assert!(moved.selected_column_ids.is_empty());
    }

    #[test]
    fn test_right_moves_along_row_and_clamps() {
        let table = table();
        let show = Show::default();
        let focus = FocusTable {
            table_id: "t".into(),
            current_focus: FocusType::ColumnName,
            current_focus_id: "c1".into(),
            selected_column_ids: vec!["c1".into()],
        };
        let moved = move_focus(&focus, &table, &show, &order(), MoveKey::ArrowRight, false);
        assert_eq!(moved.current_focus, FocusType::ColumnDataType);

        let last = FocusTable {
            current_focus: FocusType::ColumnComment,
            ..focus
        };
        let moved = move_focus(&last, &table, &show, &order(), MoveKey::ArrowRight, false);
        assert_eq!(moved.current_focus, FocusType::ColumnComment);
    }

    #[test]
    fn test_tab_wraps_to_next_row() {
        let table = table();
        let show = Show::default();
        let focus = FocusTable {
            table_id: "t".into(),
            current_focus: FocusType::TableComment,
            current_focus_id: "t".into(),
            selected_column_ids: Vec::new(),
        };
        let moved = move_focus(&focus, &table, &show, &order(), MoveKey::Tab, false);
        assert_eq!(moved.current_focus, FocusType::ColumnName);
        assert_eq!(moved.current_focus_id, "c1");
    }
}
