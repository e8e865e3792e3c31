use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use super::Command;
use crate::core::document::Document;
use crate::core::helper::Id;
use crate::core::layout::input_width;
use crate::core::observe::{ChangeLog, Field, Target};
use crate::core::schema::{Column, Relationship};

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct AddColumn {
    pub table_id: Id,
    pub column: Column,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct RemoveColumn {
    pub table_id: Id,
    pub column_ids: Vec<Id>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ChangeColumnValue {
    pub table_id: Id,
    pub column_id: Id,
    pub value: String,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ChangeColumnDataType {
    pub table_id: Id,
    pub column_id: Id,
    pub value: String,
    /// Propagate to columns linked through relationships
    pub sync: bool,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ChangeColumnFlag {
    pub table_id: Id,
    pub column_id: Id,
    pub value: bool,
}

/// Drop columns onto `target_column_id`
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct MoveColumn {
    pub table_id: Id,
    pub column_ids: Vec<Id>,
    pub target_table_id: Id,
    pub target_column_id: Id,
}

/// Put the columns of a table in the given order
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct SortColumn {
    pub table_id: Id,
    pub column_ids: Vec<Id>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct RestoreColumn {
    pub table_id: Id,
    pub columns: Vec<(usize, Column)>,
    /// Prior state of every relationship the removal touched
    pub relationships: Vec<(usize, Relationship)>,
}

pub fn add_column(table_id: impl Into<Id>) -> Command {
    Command::AddColumn(AddColumn {
        table_id: table_id.into(),
        column: Column::new("", ""),
    })
}

/// One new column on every selected table
pub fn add_column_to_active(document: &Document) -> Vec<Command> {
    document
        .tables()
        .filter(|table| table.ui.active)
        .map(|table| add_column(table.id.clone()))
        .collect()
}

pub fn remove_column(table_id: impl Into<Id>, column_ids: Vec<Id>) -> Command {
    Command::RemoveColumn(RemoveColumn {
        table_id: table_id.into(),
        column_ids,
    })
}

fn column_value(table_id: impl Into<Id>, column_id: impl Into<Id>, value: impl Into<String>) -> ChangeColumnValue {
    ChangeColumnValue {
        table_id: table_id.into(),
        column_id: column_id.into(),
        value: value.into(),
    }
}

pub fn change_column_name(
    table_id: impl Into<Id>,
    column_id: impl Into<Id>,
    value: impl Into<String>,
) -> Command {
    Command::ChangeColumnName(column_value(table_id, column_id, value))
}

pub fn change_column_comment(
    table_id: impl Into<Id>,
    column_id: impl Into<Id>,
    value: impl Into<String>,
) -> Command {
    Command::ChangeColumnComment(column_value(table_id, column_id, value))
}

pub fn change_column_default(
    table_id: impl Into<Id>,
    column_id: impl Into<Id>,
    value: impl Into<String>,
) -> Command {
    Command::ChangeColumnDefault(column_value(table_id, column_id, value))
}

/// Change a data type, synchronised across relationships when the canvas
/// setting asks for it
pub fn change_column_data_type(
    document: &Document,
    table_id: impl Into<Id>,
    column_id: impl Into<Id>,
    value: impl Into<String>,
) -> Command {
    Command::ChangeColumnDataType(ChangeColumnDataType {
        table_id: table_id.into(),
        column_id: column_id.into(),
        value: value.into(),
        sync: document.canvas.setting.relationship_data_type_sync,
    })
}

fn toggled(
    document: &Document,
    table_id: &str,
    column_id: &str,
    flag: impl Fn(&Column) -> bool,
) -> ChangeColumnFlag {
    ChangeColumnFlag {
        table_id: table_id.to_string(),
        column_id: column_id.to_string(),
        value: !document.column(table_id, column_id).is_some_and(flag),
    }
}

pub fn change_column_auto_increment(document: &Document, table_id: &str, column_id: &str) -> Command {
    Command::ChangeColumnAutoIncrement(toggled(document, table_id, column_id, |column| {
        column.option.auto_increment
    }))
}

pub fn change_column_primary_key(document: &Document, table_id: &str, column_id: &str) -> Command {
    Command::ChangeColumnPrimaryKey(toggled(document, table_id, column_id, |column| {
        column.option.primary_key
    }))
}

pub fn change_column_unique(document: &Document, table_id: &str, column_id: &str) -> Command {
    Command::ChangeColumnUnique(toggled(document, table_id, column_id, |column| {
        column.option.unique
    }))
}

pub fn change_column_not_null(document: &Document, table_id: &str, column_id: &str) -> Command {
    Command::ChangeColumnNotNull(toggled(document, table_id, column_id, |column| {
        column.option.not_null
    }))
}

pub fn move_column(
    table_id: impl Into<Id>,
    column_ids: Vec<Id>,
    target_table_id: impl Into<Id>,
    target_column_id: impl Into<Id>,
) -> Command {
    Command::MoveColumn(MoveColumn {
        table_id: table_id.into(),
        column_ids,
        target_table_id: target_table_id.into(),
        target_column_id: target_column_id.into(),
    })
}

pub(crate) fn execute_add_column(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &AddColumn,
) -> Vec<Command> {
    tracing::debug!("execute_add_column");
    let Some(table) = document.tables.get_mut(&payload.table_id) else {
        return Vec::new();
    };
    if table.column(&payload.column.id).is_some() {
        return Vec::new();
    }
    table.columns.push(payload.column.clone());
    changes.inserted(Target::Columns(payload.table_id.clone()), &payload.column.id);
    document.refresh_widths(changes);
    document.refresh_column_keys(changes);
    document.refresh_relationships(changes);
    vec![remove_column(
        payload.table_id.clone(),
        vec![payload.column.id.clone()],
    )]
}

pub(crate) fn execute_remove_column(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &RemoveColumn,
) -> Vec<Command> {
    tracing::debug!("execute_remove_column");
    let table_id = &payload.table_id;
    let Some(table) = document.tables.get_mut(table_id) else {
        return Vec::new();
    };

    let columns: Vec<(usize, Column)> = table
        .columns
        .iter()
        .enumerate()
        .filter(|(_, column)| payload.column_ids.contains(&column.id))
        .map(|(index, column)| (index, column.clone()))
        .collect();
    if columns.is_empty() {
        return Vec::new();
    }
    for (index, column) in columns.iter().rev() {
        table.columns.remove(*index);
        changes.removed(Target::Columns(table_id.clone()), &column.id);
    }

    let removed: HashSet<&str> = columns.iter().map(|(_, column)| column.id.as_str()).collect();
    let references = |table: &Id, ids: &[Id]| {
        table == table_id && ids.iter().any(|id| removed.contains(id.as_str()))
    };
    let relationships: Vec<(usize, Relationship)> = document
        .relationships
        .values()
        .enumerate()
        .filter(|(_, relationship)| {
            references(&relationship.start.table_id, &relationship.start.column_ids)
                || references(&relationship.end.table_id, &relationship.end.column_ids)
        })
        .map(|(index, relationship)| (index, relationship.clone()))
        .collect();

    for (index, _) in relationships.iter().rev() {
        let Some((_, relationship)) = document.relationships.get_index_mut(*index) else {
            continue;
        };
        let target = Target::Relationship(relationship.id.clone());
        for (point, field) in [
            (&mut relationship.start, Field::Start),
            (&mut relationship.end, Field::End),
        ] {
            if point.table_id == *table_id {
                let before = point.column_ids.len();
                point.column_ids.retain(|id| !removed.contains(id.as_str()));
                if point.column_ids.len() != before {
                    changes.field(&target, field);
                }
            }
        }
        if relationship.start.column_ids.is_empty() || relationship.end.column_ids.is_empty() {
            let id = relationship.id.clone();
            document.relationships.shift_remove_index(*index);
            changes.removed(Target::Relationships, &id);
        }
    }

    document.refresh_column_keys(changes);
    document.refresh_relationships(changes);
    vec![Command::RestoreColumn(RestoreColumn {
        table_id: table_id.clone(),
        columns,
        relationships,
    })]
}

pub(crate) fn execute_restore_column(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &RestoreColumn,
) -> Vec<Command> {
    tracing::debug!("execute_restore_column");
    let Some(table) = document.tables.get_mut(&payload.table_id) else {
        return Vec::new();
    };

    let mut column_ids = Vec::new();
    for (index, column) in &payload.columns {
        if table.column(&column.id).is_some() {
            continue;
        }
        let index = (*index).min(table.columns.len());
        table.columns.insert(index, column.clone());
        changes.inserted(Target::Columns(payload.table_id.clone()), &column.id);
        column_ids.push(column.id.clone());
    }

    for (index, relationship) in &payload.relationships {
        if let Some(current) = document.relationships.get_mut(&relationship.id) {
            let target = Target::Relationship(relationship.id.clone());
            changes.assign(
                &mut current.start,
                relationship.start.clone(),
                &target,
                Field::Start,
            );
            changes.assign(
                &mut current.end,
                relationship.end.clone(),
                &target,
                Field::End,
            );
        } else {
            let index = (*index).min(document.relationships.len());
            document
                .relationships
                .shift_insert(index, relationship.id.clone(), relationship.clone());
            changes.inserted(Target::Relationships, &relationship.id);
        }
    }

    document.refresh_column_keys(changes);
    document.refresh_relationships(changes);
    vec![remove_column(payload.table_id.clone(), column_ids)]
}

/// Apply `apply` to one column, returning the inverse built from the old value
fn change_column<T>(
    document: &mut Document,
    changes: &mut ChangeLog,
    table_id: &str,
    column_id: &str,
    apply: impl FnOnce(&mut Column, &mut ChangeLog, &Target) -> T,
) -> Option<T> {
    let column = document.tables.get_mut(table_id)?.column_mut(column_id)?;
    let target = Target::Column(table_id.to_string(), column.id.clone());
    Some(apply(column, changes, &target))
}

pub(crate) fn execute_change_column_name(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &ChangeColumnValue,
) -> Vec<Command> {
    tracing::debug!("execute_change_column_name");
    let old = change_column(
        document,
        changes,
        &payload.table_id,
        &payload.column_id,
        |column, changes, target| {
            changes.assign(
                &mut column.ui.width_name,
                input_width(&payload.value),
                target,
                Field::WidthName,
            );
            changes.assign(&mut column.name, payload.value.clone(), target, Field::Name)
        },
    );
    let Some(old) = old else {
        return Vec::new();
    };
    document.refresh_relationships(changes);
    vec![change_column_name(
        payload.table_id.clone(),
        payload.column_id.clone(),
        old,
    )]
}

pub(crate) fn execute_change_column_comment(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &ChangeColumnValue,
) -> Vec<Command> {
    tracing::debug!("execute_change_column_comment");
    let old = change_column(
        document,
        changes,
        &payload.table_id,
        &payload.column_id,
        |column, changes, target| {
            changes.assign(
                &mut column.ui.width_comment,
                input_width(&payload.value),
                target,
                Field::WidthComment,
            );
            changes.assign(
                &mut column.comment,
                payload.value.clone(),
                target,
                Field::Comment,
            )
        },
    );
    let Some(old) = old else {
        return Vec::new();
    };
    document.refresh_relationships(changes);
    vec![change_column_comment(
        payload.table_id.clone(),
        payload.column_id.clone(),
        old,
    )]
}

pub(crate) fn execute_change_column_default(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &ChangeColumnValue,
) -> Vec<Command> {
    tracing::debug!("execute_change_column_default");
    let old = change_column(
        document,
        changes,
        &payload.table_id,
        &payload.column_id,
        |column, changes, target| {
            changes.assign(
                &mut column.ui.width_default,
                input_width(&payload.value),
                target,
                Field::WidthDefault,
            );
            changes.assign(
                &mut column.default,
                payload.value.clone(),
                target,
                Field::Default,
            )
        },
    );
    let Some(old) = old else {
        return Vec::new();
    };
    document.refresh_relationships(changes);
    vec![change_column_default(
        payload.table_id.clone(),
        payload.column_id.clone(),
        old,
    )]
}

/// Columns reachable from `(table_id, column_id)` through index-aligned
/// relationship column pairs, in discovery order, excluding the origin
fn linked_columns(document: &Document, table_id: &str, column_id: &str) -> Vec<(Id, Id)> {
    let origin = (table_id.to_string(), column_id.to_string());
    let mut visited: HashSet<(Id, Id)> = HashSet::from([origin.clone()]);
    let mut queue = VecDeque::from([origin]);
    let mut linked = Vec::new();

    while let Some((table_id, column_id)) = queue.pop_front() {
        for relationship in document.relationships.values() {
            let pairs = relationship
                .start
                .column_ids
                .iter()
                .zip(&relationship.end.column_ids);
            for (start_column, end_column) in pairs {
                let next = if relationship.start.table_id == table_id && *start_column == column_id
                {
                    (relationship.end.table_id.clone(), end_column.clone())
                } else if relationship.end.table_id == table_id && *end_column == column_id {
                    (relationship.start.table_id.clone(), start_column.clone())
                } else {
                    continue;
                };
                if document.column(&next.0, &next.1).is_some() && visited.insert(next.clone()) {
                    linked.push(next.clone());
                    queue.push_back(next);
                }
            }
        }
    }

    linked
}

pub(crate) fn execute_change_column_data_type(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &ChangeColumnDataType,
) -> Vec<Command> {
    tracing::debug!("execute_change_column_data_type");
    let mut targets = vec![(payload.table_id.clone(), payload.column_id.clone())];
    if document
        .column(&payload.table_id, &payload.column_id)
        .is_none()
    {
        return Vec::new();
    }
    if payload.sync {
        targets.extend(linked_columns(
            document,
            &payload.table_id,
            &payload.column_id,
        ));
    }

    let mut inverse = Vec::new();
    for (table_id, column_id) in targets {
        let old = change_column(
            document,
            changes,
            &table_id,
            &column_id,
            |column, changes, target| {
                changes.assign(
                    &mut column.ui.width_data_type,
                    input_width(&payload.value),
                    target,
                    Field::WidthDataType,
                );
                changes.assign(
                    &mut column.data_type,
                    payload.value.clone(),
                    target,
                    Field::DataType,
                )
            },
        );
        if let Some(old) = old {
            inverse.push(Command::ChangeColumnDataType(ChangeColumnDataType {
                table_id,
                column_id,
                value: old,
                sync: false,
            }));
        }
    }

    document.refresh_relationships(changes);
    inverse
}

fn change_flag(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &ChangeColumnFlag,
    field: Field,
    slot: impl FnOnce(&mut Column) -> &mut bool,
) -> Option<ChangeColumnFlag> {
    let old = change_column(
        document,
        changes,
        &payload.table_id,
        &payload.column_id,
        |column, changes, target| changes.assign(slot(column), payload.value, target, field),
    )?;
    Some(ChangeColumnFlag {
        value: old,
        ..payload.clone()
    })
}

pub(crate) fn execute_change_column_auto_increment(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &ChangeColumnFlag,
) -> Vec<Command> {
    tracing::debug!("execute_change_column_auto_increment");
    change_flag(document, changes, payload, Field::AutoIncrement, |column| {
        &mut column.option.auto_increment
    })
    .map(Command::ChangeColumnAutoIncrement)
    .into_iter()
    .collect()
}

pub(crate) fn execute_change_column_unique(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &ChangeColumnFlag,
) -> Vec<Command> {
    tracing::debug!("execute_change_column_unique");
    change_flag(document, changes, payload, Field::Unique, |column| {
        &mut column.option.unique
    })
    .map(Command::ChangeColumnUnique)
    .into_iter()
    .collect()
}

pub(crate) fn execute_change_column_not_null(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &ChangeColumnFlag,
) -> Vec<Command> {
    tracing::debug!("execute_change_column_not_null");
    change_flag(document, changes, payload, Field::NotNull, |column| {
        &mut column.option.not_null
    })
    .map(Command::ChangeColumnNotNull)
    .into_iter()
    .collect()
}

/// Setting a primary key also sets not-null; key markers follow
pub(crate) fn execute_change_column_primary_key(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &ChangeColumnFlag,
) -> Vec<Command> {
    tracing::debug!("execute_change_column_primary_key");
    let Some(primary_key) = change_flag(document, changes, payload, Field::PrimaryKey, |column| {
        &mut column.option.primary_key
    }) else {
        return Vec::new();
    };
    let mut inverse = vec![Command::ChangeColumnPrimaryKey(primary_key)];

    if payload.value {
        let not_null = ChangeColumnFlag {
            value: true,
            ..payload.clone()
        };
        if let Some(old) = change_flag(document, changes, &not_null, Field::NotNull, |column| {
            &mut column.option.not_null
        }) {
            inverse.push(Command::ChangeColumnNotNull(old));
        }
    }

    document.refresh_column_keys(changes);
    inverse
}

pub(crate) fn execute_move_column(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &MoveColumn,
) -> Vec<Command> {
    tracing::debug!("execute_move_column");
    if payload.table_id != payload.target_table_id
        || payload.column_ids.contains(&payload.target_column_id)
    {
        return Vec::new();
    }
    let Some(table) = document.tables.get_mut(&payload.table_id) else {
        return Vec::new();
    };
    let Some(target_index) = table.column_index(&payload.target_column_id) else {
        return Vec::new();
    };
    let Some(first_index) = table
        .columns
        .iter()
        .position(|column| payload.column_ids.contains(&column.id))
    else {
        return Vec::new();
    };

    let previous: Vec<Id> = table.columns.iter().map(|column| column.id.clone()).collect();
    let (moving, mut remaining): (Vec<Column>, Vec<Column>) = std::mem::take(&mut table.columns)
        .into_iter()
        .partition(|column| payload.column_ids.contains(&column.id));

    let target_position = remaining
        .iter()
        .position(|column| column.id == payload.target_column_id)
        .unwrap_or(remaining.len());
    let insert_at = if target_index > first_index {
        target_position + 1
    } else {
        target_position
    };

    for column in &moving {
        changes.moved(Target::Columns(payload.table_id.clone()), &column.id);
    }
    remaining.splice(insert_at..insert_at, moving);
    table.columns = remaining;

    vec![Command::SortColumn(SortColumn {
        table_id: payload.table_id.clone(),
        column_ids: previous,
    })]
}

pub(crate) fn execute_sort_column(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &SortColumn,
) -> Vec<Command> {
    tracing::debug!("execute_sort_column");
    let Some(table) = document.tables.get_mut(&payload.table_id) else {
        return Vec::new();
    };

    let previous: Vec<Id> = table.columns.iter().map(|column| column.id.clone()).collect();
    let mut remaining = std::mem::take(&mut table.columns);
    let mut sorted = Vec::with_capacity(remaining.len());
    for column_id in &payload.column_ids {
        if let Some(index) = remaining.iter().position(|column| column.id == *column_id) {
            sorted.push(remaining.remove(index));
        }
    }
    sorted.extend(remaining);

    for (column, previous_id) in sorted.iter().zip(&previous) {
        if column.id != *previous_id {
            changes.moved(Target::Columns(payload.table_id.clone()), &column.id);
        }
    }
    table.columns = sorted;

    vec![Command::SortColumn(SortColumn {
        table_id: payload.table_id.clone(),
        column_ids: previous,
    })]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::DocumentData;
    use crate::core::schema::{RelationshipPoint, RelationshipType, Table};

    fn document() -> Document {
        Document::from_data(
            DocumentData::new()
                .with_table(
                    Table::new("users")
                        .with_id("users")
                        .add_column(Column::new("id", "int").with_id("users.id").primary_key())
                        .add_column(Column::new("name", "string").with_id("users.name")),
                )
                .with_table(
                    Table::new("orders")
                        .with_id("orders")
                        .with_position(400.0, 0.0)
                        .add_column(Column::new("id", "int").with_id("orders.id").primary_key())
                        .add_column(Column::new("user_id", "int").with_id("orders.user_id")),
                )
                .with_table(
                    Table::new("items")
                        .with_id("items")
                        .with_position(800.0, 0.0)
                        .add_column(Column::new("user_id", "int").with_id("items.user_id")),
                )
                .with_relationship(
                    Relationship::new(
                        RelationshipType::OneN,
                        RelationshipPoint::new("users", vec!["users.id".into()]),
                        RelationshipPoint::new("orders", vec!["orders.user_id".into()]),
                    )
                    .with_id("r1"),
                )
                .with_relationship(
                    Relationship::new(
                        RelationshipType::OneN,
                        RelationshipPoint::new("orders", vec!["orders.user_id".into()]),
                        RelationshipPoint::new("items", vec!["items.user_id".into()]),
                    )
                    .with_id("r2"),
                ),
        )
        .unwrap()
    }

    fn ids(document: &Document, table_id: &str) -> Vec<String> {
        document
            .table(table_id)
            .unwrap()
            .columns
            .iter()
            .map(|column| column.id.clone())
            .collect()
    }

    #[test]
    fn test_data_type_sync_is_transitive() {
        let mut document = document();
        let mut changes = ChangeLog::new();
        let command = change_column_data_type(&document, "users", "users.id", "long");
        let Command::ChangeColumnDataType(payload) = command else {
            panic!("expected ChangeColumnDataType");
        };
        assert!(payload.sync);

        let inverse = execute_change_column_data_type(&mut document, &mut changes, &payload);
        assert_eq!(inverse.len(), 3);
        assert_eq!(document.column("orders", "orders.user_id").unwrap().data_type, "long");
        assert_eq!(document.column("items", "items.user_id").unwrap().data_type, "long");
        assert_eq!(document.column("users", "users.name").unwrap().data_type, "string");
    }

    #[test]
    fn test_data_type_without_sync_changes_one_column() {
        let mut document = document();
        let mut changes = ChangeLog::new();
        let payload = ChangeColumnDataType {
            table_id: "users".into(),
            column_id: "users.id".into(),
            value: "long".into(),
            sync: false,
        };
        execute_change_column_data_type(&mut document, &mut changes, &payload);
        assert_eq!(document.column("orders", "orders.user_id").unwrap().data_type, "int");
    }

    #[test]
    fn test_remove_column_drops_emptied_relationship() {
        let mut document = document();
        let mut changes = ChangeLog::new();
        let inverse = execute_remove_column(
            &mut document,
            &mut changes,
            &RemoveColumn {
                table_id: "users".into(),
                column_ids: vec!["users.id".into()],
            },
        );
        assert!(document.relationship("r1").is_none());
        assert!(document.relationship("r2").is_some());

        let Command::RestoreColumn(restore) = &inverse[0] else {
            panic!("expected RestoreColumn");
        };
        execute_restore_column(&mut document, &mut changes, restore);
        assert_eq!(ids(&document, "users"), vec!["users.id", "users.name"]);
        let order: Vec<&str> = document.relationships().map(|r| r.id.as_str()).collect();
        assert_eq!(order, vec!["r1", "r2"]);
    }

    #[test]
    fn test_primary_key_sets_not_null_and_inverse_restores_both() {
        let mut document = document();
        let mut changes = ChangeLog::new();
        let payload = ChangeColumnFlag {
            table_id: "users".into(),
            column_id: "users.name".into(),
            value: true,
        };
        let inverse = execute_change_column_primary_key(&mut document, &mut changes, &payload);
        let column = document.column("users", "users.name").unwrap();
        assert!(column.option.primary_key && column.option.not_null);
        assert!(column.ui.pk);
        assert_eq!(inverse.len(), 2);

        for command in &inverse {
            command.execute(&mut document, &mut changes);
        }
        let column = document.column("users", "users.name").unwrap();
        assert!(!column.option.primary_key && !column.option.not_null);
        assert!(!column.ui.pk);
    }

    #[test]
    fn test_move_column_down_and_back() {
        let mut document = document();
        let mut changes = ChangeLog::new();
        let inverse = execute_move_column(
            &mut document,
            &mut changes,
            &MoveColumn {
                table_id: "users".into(),
                column_ids: vec!["users.id".into()],
                target_table_id: "users".into(),
                target_column_id: "users.name".into(),
            },
        );
        assert_eq!(ids(&document, "users"), vec!["users.name", "users.id"]);

        inverse[0].execute(&mut document, &mut changes);
        assert_eq!(ids(&document, "users"), vec!["users.id", "users.name"]);
    }

    #[test]
    fn test_move_column_across_tables_is_noop() {
        let mut document = document();
        let before = document.clone();
        let mut changes = ChangeLog::new();
        let inverse = execute_move_column(
            &mut document,
            &mut changes,
            &MoveColumn {
                table_id: "users".into(),
                column_ids: vec!["users.id".into()],
                target_table_id: "orders".into(),
                target_column_id: "orders.id".into(),
            },
        );
        assert!(inverse.is_empty());
        assert_eq!(document, before);
    }

    #[test]
    fn test_toggle_builders_read_current_value() {
        let document = document();
        let Command::ChangeColumnUnique(flag) = change_column_unique(&document, "users", "users.name")
        else {
            panic!("expected ChangeColumnUnique");
        };
        assert!(flag.value);
    }
}
