//! Geometry helpers for tables and memos
//!
//! Sizes are derived, never stored: a table's width comes from the cached text
//! widths of its name, comment and columns filtered by the canvas [`Show`]
//! flags, its height from the column count.

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

use super::canvas::{CanvasState, Show};
use super::helper::Id;
use super::schema::{Column, Memo, Table};

pub const SIZE_CANVAS_WIDTH: f64 = 2000.0;
pub const SIZE_CANVAS_HEIGHT: f64 = 2000.0;
/// Width of one display cell of text
pub const SIZE_FONT_WIDTH: f64 = 8.0;
pub const SIZE_MIN_WIDTH: f64 = 60.0;
pub const SIZE_TABLE_PADDING: f64 = 10.0;
/// Table header: name and comment inputs
pub const SIZE_TABLE_HEIGHT: f64 = 46.0;
pub const SIZE_COLUMN_HEIGHT: f64 = 25.0;
pub const SIZE_COLUMN_MARGIN_RIGHT: f64 = 10.0;
pub const SIZE_COLUMN_OPTION_NN: f64 = 35.0;
pub const SIZE_COLUMN_OPTION_AI: f64 = 27.0;
pub const SIZE_COLUMN_OPTION_QU: f64 = 26.0;
pub const SIZE_START_X: f64 = 50.0;
pub const SIZE_START_Y: f64 = 50.0;
pub const SIZE_START_ADD: f64 = 20.0;
pub const SIZE_MEMO_WIDTH: f64 = 116.0;
pub const SIZE_MEMO_HEIGHT: f64 = 100.0;
pub const SIZE_SORT_MARGIN: f64 = 80.0;

/// Rendered width of `text`
pub fn text_width(text: &str) -> f64 {
    UnicodeWidthStr::width(text) as f64 * SIZE_FONT_WIDTH
}

/// Width of an input field holding `text`, never below the minimum
pub fn input_width(text: &str) -> f64 {
    text_width(text).max(SIZE_MIN_WIDTH)
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Absolute placement of a table or memo
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Position {
    pub id: Id,
    pub top: f64,
    pub left: f64,
}

/// Corners of a table's bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinate {
    pub lt: Point,
    pub rt: Point,
    pub lb: Point,
    pub rb: Point,
}

impl Coordinate {
    pub fn width(&self) -> f64 {
        self.rt.x - self.lt.x
    }

    pub fn height(&self) -> f64 {
        self.lb.y - self.lt.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.lt.x + self.width() / 2.0,
            self.lt.y + self.height() / 2.0,
        )
    }

    fn contains(&self, point: Point) -> bool {
        self.lt.x < point.x && point.x < self.rt.x && self.lt.y < point.y && point.y < self.lb.y
    }
}

/// Maximum width per column field across a table, plus the row total
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ColumnWidth {
    pub width: f64,
    pub name: f64,
    pub comment: f64,
    pub data_type: f64,
    pub default: f64,
    pub not_null: f64,
    pub auto_increment: f64,
    pub unique: f64,
}

pub fn max_width_column(columns: &[Column], show: &Show) -> ColumnWidth {
    let mut column_width = ColumnWidth::default();
    for column in columns {
        column_width.name = column_width.name.max(column.ui.width_name);
        if show.column_comment {
            column_width.comment = column_width.comment.max(column.ui.width_comment);
        }
        if show.column_data_type {
            column_width.data_type = column_width.data_type.max(column.ui.width_data_type);
        }
        if show.column_default {
            column_width.default = column_width.default.max(column.ui.width_default);
        }
    }
    if show.column_not_null {
        column_width.not_null = SIZE_COLUMN_OPTION_NN;
    }
    if show.column_auto_increment {
        column_width.auto_increment = SIZE_COLUMN_OPTION_AI;
    }
    if show.column_unique {
        column_width.unique = SIZE_COLUMN_OPTION_QU;
    }

    column_width.width = [
        column_width.name,
        column_width.comment,
        column_width.data_type,
        column_width.default,
        column_width.not_null,
        column_width.auto_increment,
        column_width.unique,
    ]
    .iter()
    .filter(|width| **width != 0.0)
    .map(|width| width + SIZE_COLUMN_MARGIN_RIGHT)
    .sum();

    column_width
}

/// Row width of a table without columns
pub fn default_width_column(show: &Show) -> f64 {
    let field = SIZE_MIN_WIDTH + SIZE_COLUMN_MARGIN_RIGHT;
    let mut width = field;
    for shown in [show.column_comment, show.column_data_type, show.column_default] {
        if shown {
            width += field;
        }
    }
    if show.column_not_null {
        width += SIZE_COLUMN_OPTION_NN + SIZE_COLUMN_MARGIN_RIGHT;
    }
    if show.column_auto_increment {
        width += SIZE_COLUMN_OPTION_AI + SIZE_COLUMN_MARGIN_RIGHT;
    }
    if show.column_unique {
        width += SIZE_COLUMN_OPTION_QU + SIZE_COLUMN_MARGIN_RIGHT;
    }
    width
}

/// Content width of a table, excluding padding
pub fn table_width(table: &Table, show: &Show) -> f64 {
    let mut width = table.ui.width_name + SIZE_COLUMN_MARGIN_RIGHT;
    if show.table_comment {
        width += table.ui.width_comment + SIZE_COLUMN_MARGIN_RIGHT;
    }
    let rows = if table.columns.is_empty() {
        default_width_column(show)
    } else {
        max_width_column(&table.columns, show).width
    };
    width.max(rows)
}

/// Content height of a table, excluding padding
pub fn table_height(table: &Table) -> f64 {
    SIZE_TABLE_HEIGHT + table.columns.len() as f64 * SIZE_COLUMN_HEIGHT
}

pub fn coordinate(table: &Table, show: &Show) -> Coordinate {
    let width = table_width(table, show) + SIZE_TABLE_PADDING * 2.0;
    let height = table_height(table) + SIZE_TABLE_PADDING * 2.0;
    let (left, top) = (table.ui.left, table.ui.top);
    Coordinate {
        lt: Point::new(left, top),
        rt: Point::new(left + width, top),
        lb: Point::new(left, top + height),
        rb: Point::new(left + width, top + height),
    }
}

/// Highest z-index among tables and memos, at least 1
pub fn top_z_index<'a>(
    tables: impl IntoIterator<Item = &'a Table>,
    memos: impl IntoIterator<Item = &'a Memo>,
) -> u32 {
    tables
        .into_iter()
        .map(|table| table.ui.z_index)
        .chain(memos.into_iter().map(|memo| memo.ui.z_index))
        .fold(1, u32::max)
}

/// Next z-index above a document's high-water mark. Stays at `u32::MAX`
/// once the mark gets there.
pub fn next_z_index(mark: u32) -> u32 {
    mark.max(1).saturating_add(1)
}

/// First free default placement, starting at the scrolled origin and
/// stepping diagonally past any table or memo already there
pub fn next_point<'a>(
    canvas: &CanvasState,
    tables: impl IntoIterator<Item = &'a Table>,
    memos: impl IntoIterator<Item = &'a Memo>,
) -> (f64, f64) {
    let occupied: Vec<(f64, f64)> = tables
        .into_iter()
        .map(|table| (table.ui.top, table.ui.left))
        .chain(memos.into_iter().map(|memo| (memo.ui.top, memo.ui.left)))
        .collect();

    let mut point = (
        SIZE_START_Y + canvas.scroll_top,
        SIZE_START_X + canvas.scroll_left,
    );
    while occupied.contains(&point) {
        point.0 += SIZE_START_ADD;
        point.1 += SIZE_START_ADD;
    }
    point
}

/// Axis-aligned region of the canvas
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Area {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Area {
    pub fn viewport(canvas: &CanvasState, width: f64, height: f64) -> Self {
        Self {
            min_x: canvas.scroll_left,
            min_y: canvas.scroll_top,
            max_x: canvas.scroll_left + width,
            max_y: canvas.scroll_top + height,
        }
    }
}

/// Whether any corner of the table lies strictly inside `area`
pub fn table_in_area(area: &Area, table: &Table, show: &Show) -> bool {
    let coordinate = coordinate(table, show);
    let bounds = Coordinate {
        lt: Point::new(area.min_x, area.min_y),
        rt: Point::new(area.max_x, area.min_y),
        lb: Point::new(area.min_x, area.max_y),
        rb: Point::new(area.max_x, area.max_y),
    };
    [coordinate.lt, coordinate.rt, coordinate.lb, coordinate.rb]
        .into_iter()
        .any(|corner| bounds.contains(corner))
}

/// Lay tables out in rows, in the given order, wrapping at the canvas width
pub fn arrange_tables<'a>(
    tables: impl IntoIterator<Item = &'a Table>,
    show: &Show,
    canvas_width: f64,
) -> Vec<Position> {
    let mut positions = Vec::new();
    let mut left = SIZE_START_X;
    let mut top = SIZE_START_Y;
    let mut row_height: f64 = 0.0;

    for table in tables {
        let width = table_width(table, show) + SIZE_TABLE_PADDING * 2.0;
        let height = table_height(table) + SIZE_TABLE_PADDING * 2.0;
        if left > SIZE_START_X && left + width > canvas_width {
            top += row_height + SIZE_SORT_MARGIN;
            left = SIZE_START_X;
            row_height = 0.0;
        }
        positions.push(Position {
            id: table.id.clone(),
            top,
            left,
        });
        row_height = row_height.max(height);
        left += width + SIZE_SORT_MARGIN;
    }

    positions
}
