use serde::{Deserialize, Serialize};

use super::helper::{Id, uuid};
use super::layout::input_width;

/// A table on the canvas
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Table {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub comment: String,
    /// Display order is insertion order
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub ui: TableUi,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct TableUi {
    pub top: f64,
    pub left: f64,
    pub width_name: f64,
    pub width_comment: f64,
    pub z_index: u32,
    pub active: bool,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: uuid(),
            ui: TableUi {
                width_name: input_width(&name),
                width_comment: input_width(""),
                z_index: 1,
                ..TableUi::default()
            },
            name,
            comment: String::new(),
            columns: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<Id>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_position(mut self, left: f64, top: f64) -> Self {
        self.ui.left = left;
        self.ui.top = top;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self.ui.width_comment = input_width(&self.comment);
        self
    }

    pub fn add_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.id == column_id)
    }

    pub fn column_mut(&mut self, column_id: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|column| column.id == column_id)
    }

    pub fn column_index(&self, column_id: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.id == column_id)
    }

    /// Find a column by name, returning its index
    pub fn find_column(&self, name: &str) -> Option<(usize, &Column)> {
        self.columns
            .iter()
            .enumerate()
            .find(|(_, column)| column.name == name)
    }

    pub fn primary_key_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|column| column.option.primary_key)
    }
}

/// A table column
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Column {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub comment: String,
    /// Logical type name (`int`, `string`, ...) or a native type written verbatim
    #[serde(default)]
    pub data_type: String,
    #[serde(default)]
    pub default: String,
    #[serde(default)]
    pub option: ColumnOption,
    #[serde(default)]
    pub ui: ColumnUi,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct ColumnOption {
    pub auto_increment: bool,
    pub primary_key: bool,
    pub unique: bool,
    pub not_null: bool,
}

/// Key markers and cached text widths used for layout
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct ColumnUi {
    pub active: bool,
    pub pk: bool,
    pub fk: bool,
    pub pfk: bool,
    pub width_name: f64,
    pub width_comment: f64,
    pub width_data_type: f64,
    pub width_default: f64,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        let name = name.into();
        let data_type = data_type.into();
        Self {
            id: uuid(),
            ui: ColumnUi {
                width_name: input_width(&name),
                width_comment: input_width(""),
                width_data_type: input_width(&data_type),
                width_default: input_width(""),
                ..ColumnUi::default()
            },
            name,
            comment: String::new(),
            data_type,
            default: String::new(),
            option: ColumnOption::default(),
        }
    }

    pub fn with_id(mut self, id: impl Into<Id>) -> Self {
        self.id = id.into();
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.option.primary_key = true;
        self.option.not_null = true;
        self.ui.pk = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.option.not_null = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.option.unique = true;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.option.auto_increment = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default = value.into();
        self.ui.width_default = input_width(&self.default);
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self.ui.width_comment = input_width(&self.comment);
        self
    }

    /// Primary-key columns are emitted as not-null regardless of the flag
    pub fn is_not_null(&self) -> bool {
        self.option.not_null || self.option.primary_key
    }

    /// Default clause value, suppressed by auto-increment
    pub fn effective_default(&self) -> Option<&str> {
        let default = self.default.trim();
        if self.option.auto_increment || default.is_empty() {
            None
        } else {
            Some(default)
        }
    }
}

/// Cardinality notation drawn at the relationship ends
#[derive(
    Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Default, derive_more::Display,
)]
pub enum RelationshipType {
    ZeroOneN,
    ZeroOne,
    ZeroN,
    OneOnly,
    #[default]
    OneN,
    One,
    N,
}

/// Side of a table a relationship end is attached to
#[derive(
    Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Default, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    #[display("top")]
    Top,
    #[display("bottom")]
    Bottom,
    #[display("left")]
    Left,
    #[display("right")]
    Right,
}

/// One end of a relationship: table, ordered columns and the drawn anchor
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct RelationshipPoint {
    pub table_id: Id,
    pub column_ids: Vec<Id>,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub direction: Direction,
}

impl RelationshipPoint {
    pub fn new(table_id: impl Into<Id>, column_ids: Vec<Id>) -> Self {
        Self {
            table_id: table_id.into(),
            column_ids,
            ..Self::default()
        }
    }
}

/// A relationship between a parent (`start`) and a child (`end`) table
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Relationship {
    pub id: Id,
    #[serde(default)]
    pub identification: bool,
    pub relationship_type: RelationshipType,
    pub start: RelationshipPoint,
    pub end: RelationshipPoint,
}

impl Relationship {
    pub fn new(
        relationship_type: RelationshipType,
        start: RelationshipPoint,
        end: RelationshipPoint,
    ) -> Self {
        Self {
            id: uuid(),
            identification: false,
            relationship_type,
            start,
            end,
        }
    }

    pub fn with_id(mut self, id: impl Into<Id>) -> Self {
        self.id = id.into();
        self
    }

    /// Whether either end is attached to `table_id`
    pub fn touches(&self, table_id: &str) -> bool {
        self.start.table_id == table_id || self.end.table_id == table_id
    }
}

/// A free-text note on the canvas
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Memo {
    pub id: Id,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub ui: MemoUi,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct MemoUi {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
    pub z_index: u32,
    pub active: bool,
}

impl Memo {
    pub fn new() -> Self {
        Self {
            id: uuid(),
            value: String::new(),
            ui: MemoUi {
                width: super::layout::SIZE_MEMO_WIDTH,
                height: super::layout::SIZE_MEMO_HEIGHT,
                z_index: 1,
                ..MemoUi::default()
            },
        }
    }

    pub fn with_id(mut self, id: impl Into<Id>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}

impl Default for Memo {
    fn default() -> Self {
        Self::new()
    }
}
