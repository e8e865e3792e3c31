use serde::{Deserialize, Serialize};

use super::Command;
use crate::core::canvas::{CanvasType, ColumnType, Database, Language, NameCase, ShowKey};
use crate::core::document::Document;
use crate::core::observe::{ChangeLog, Field, Target};

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct MoveCanvas {
    pub scroll_top: f64,
    pub scroll_left: f64,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ResizeCanvas {
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ChangeCanvasShow {
    pub show_key: ShowKey,
    pub value: bool,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ChangeDatabase {
    pub database: Database,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ChangeDatabaseName {
    pub value: String,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ChangeCanvasType {
    pub canvas_type: CanvasType,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ChangeLanguage {
    pub language: Language,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ChangeTableCase {
    pub name_case: NameCase,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ChangeColumnCase {
    pub name_case: NameCase,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ChangeRelationshipDataTypeSync {
    pub value: bool,
}

/// Move a column field kind to the slot currently held by another kind
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct MoveColumnOrder {
    pub column_type: ColumnType,
    pub target_column_type: ColumnType,
}

pub fn move_canvas(scroll_top: f64, scroll_left: f64) -> Command {
    Command::MoveCanvas(MoveCanvas {
        scroll_top,
        scroll_left,
    })
}

pub fn resize_canvas(width: f64, height: f64) -> Command {
    Command::ResizeCanvas(ResizeCanvas { width, height })
}

/// Toggle the visibility flag `show_key`
pub fn change_canvas_show(document: &Document, show_key: ShowKey) -> Command {
    Command::ChangeCanvasShow(ChangeCanvasShow {
        show_key,
        value: !document.canvas.show.get(show_key),
    })
}

pub fn change_database(database: Database) -> Command {
    Command::ChangeDatabase(ChangeDatabase { database })
}

pub fn change_database_name(value: impl Into<String>) -> Command {
    Command::ChangeDatabaseName(ChangeDatabaseName {
        value: value.into(),
    })
}

pub fn change_canvas_type(canvas_type: CanvasType) -> Command {
    Command::ChangeCanvasType(ChangeCanvasType { canvas_type })
}

pub fn change_language(language: Language) -> Command {
    Command::ChangeLanguage(ChangeLanguage { language })
}

pub fn change_table_case(name_case: NameCase) -> Command {
    Command::ChangeTableCase(ChangeTableCase { name_case })
}

pub fn change_column_case(name_case: NameCase) -> Command {
    Command::ChangeColumnCase(ChangeColumnCase { name_case })
}

pub fn change_relationship_data_type_sync(value: bool) -> Command {
    Command::ChangeRelationshipDataTypeSync(ChangeRelationshipDataTypeSync { value })
}

pub fn move_column_order(column_type: ColumnType, target_column_type: ColumnType) -> Command {
    Command::MoveColumnOrder(MoveColumnOrder {
        column_type,
        target_column_type,
    })
}

pub(crate) fn execute_move_canvas(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &MoveCanvas,
) -> Vec<Command> {
    tracing::debug!("execute_move_canvas");
    let canvas = &mut document.canvas;
    let scroll_top = changes.assign(
        &mut canvas.scroll_top,
        payload.scroll_top,
        &Target::Canvas,
        Field::ScrollTop,
    );
    let scroll_left = changes.assign(
        &mut canvas.scroll_left,
        payload.scroll_left,
        &Target::Canvas,
        Field::ScrollLeft,
    );
    vec![move_canvas(scroll_top, scroll_left)]
}

pub(crate) fn execute_resize_canvas(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &ResizeCanvas,
) -> Vec<Command> {
    tracing::debug!("execute_resize_canvas");
    let canvas = &mut document.canvas;
    let width = changes.assign(&mut canvas.width, payload.width, &Target::Canvas, Field::Width);
    let height = changes.assign(
        &mut canvas.height,
        payload.height,
        &Target::Canvas,
        Field::Height,
    );
    vec![resize_canvas(width, height)]
}

pub(crate) fn execute_change_canvas_show(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &ChangeCanvasShow,
) -> Vec<Command> {
    tracing::debug!("execute_change_canvas_show");
    let old = changes.assign(
        document.canvas.show.slot_mut(payload.show_key),
        payload.value,
        &Target::Canvas,
        Field::Show(payload.show_key),
    );
    document.refresh_relationships(changes);
    vec![Command::ChangeCanvasShow(ChangeCanvasShow {
        show_key: payload.show_key,
        value: old,
    })]
}

pub(crate) fn execute_change_database(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &ChangeDatabase,
) -> Vec<Command> {
    tracing::debug!("execute_change_database");
    let old = changes.assign(
        &mut document.canvas.database,
        payload.database,
        &Target::Canvas,
        Field::Database,
    );
    vec![change_database(old)]
}

pub(crate) fn execute_change_database_name(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &ChangeDatabaseName,
) -> Vec<Command> {
    tracing::debug!("execute_change_database_name");
    let old = changes.assign(
        &mut document.canvas.database_name,
        payload.value.clone(),
        &Target::Canvas,
        Field::DatabaseName,
    );
    vec![change_database_name(old)]
}

pub(crate) fn execute_change_canvas_type(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &ChangeCanvasType,
) -> Vec<Command> {
    tracing::debug!("execute_change_canvas_type");
    let old = changes.assign(
        &mut document.canvas.canvas_type,
        payload.canvas_type,
        &Target::Canvas,
        Field::CanvasType,
    );
    vec![change_canvas_type(old)]
}

pub(crate) fn execute_change_language(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &ChangeLanguage,
) -> Vec<Command> {
    tracing::debug!("execute_change_language");
    let old = changes.assign(
        &mut document.canvas.language,
        payload.language,
        &Target::Canvas,
        Field::Language,
    );
    vec![change_language(old)]
}

pub(crate) fn execute_change_table_case(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &ChangeTableCase,
) -> Vec<Command> {
    tracing::debug!("execute_change_table_case");
    let old = changes.assign(
        &mut document.canvas.table_case,
        payload.name_case,
        &Target::Canvas,
        Field::TableCase,
    );
    vec![change_table_case(old)]
}

pub(crate) fn execute_change_column_case(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &ChangeColumnCase,
) -> Vec<Command> {
    tracing::debug!("execute_change_column_case");
    let old = changes.assign(
        &mut document.canvas.column_case,
        payload.name_case,
        &Target::Canvas,
        Field::ColumnCase,
    );
    vec![change_column_case(old)]
}

pub(crate) fn execute_change_relationship_data_type_sync(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &ChangeRelationshipDataTypeSync,
) -> Vec<Command> {
    tracing::debug!("execute_change_relationship_data_type_sync");
    let old = changes.assign(
        &mut document.canvas.setting.relationship_data_type_sync,
        payload.value,
        &Target::Canvas,
        Field::RelationshipDataTypeSync,
    );
    vec![change_relationship_data_type_sync(old)]
}

pub(crate) fn execute_move_column_order(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &MoveColumnOrder,
) -> Vec<Command> {
    tracing::debug!("execute_move_column_order");
    let order = &mut document.canvas.setting.column_order;
    if payload.column_type == payload.target_column_type {
        return Vec::new();
    }
    let current = order.iter().position(|kind| *kind == payload.column_type);
    let target = order
        .iter()
        .position(|kind| *kind == payload.target_column_type);
    let (Some(current), Some(target)) = (current, target) else {
        return Vec::new();
    };

    let kind = order.remove(current);
    order.insert(target, kind);
    changes.field(&Target::Canvas, Field::ColumnOrder);

    vec![move_column_order(payload.column_type, order[current])]
}
