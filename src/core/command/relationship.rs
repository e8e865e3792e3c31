use serde::{Deserialize, Serialize};

use super::Command;
use super::column::AddColumn;
use crate::core::document::Document;
use crate::core::helper::{Id, Name, auto_name};
use crate::core::observe::{ChangeLog, Field, Target};
use crate::core::schema::{Column, Relationship, RelationshipPoint, RelationshipType};

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct AddRelationship {
    pub relationship: Relationship,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct RemoveRelationship {
    pub relationship_ids: Vec<Id>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ChangeRelationshipType {
    pub relationship_id: Id,
    pub value: RelationshipType,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ChangeIdentification {
    pub relationship_id: Id,
    pub value: bool,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct RestoreRelationship {
    pub relationships: Vec<(usize, Relationship)>,
}

/// Connect two tables: the start table's primary-key columns are copied into
/// new not-null columns of the end table. A start table without a primary
/// key first gets an `id` key column.
pub fn add_relationship(
    document: &Document,
    relationship_type: RelationshipType,
    start_table_id: &str,
    end_table_id: &str,
) -> Vec<Command> {
    let (Some(start), Some(end)) = (
        document.table(start_table_id),
        document.table(end_table_id),
    ) else {
        return Vec::new();
    };

    let mut commands = Vec::new();
    let mut end_names: Vec<Name> = end
        .columns
        .iter()
        .map(|column| Name::new(column.id.clone(), column.name.clone()))
        .collect();

    let mut keys: Vec<(Id, String, String)> = start
        .primary_key_columns()
        .map(|column| {
            (
                column.id.clone(),
                column.name.clone(),
                column.data_type.clone(),
            )
        })
        .collect();
    if keys.is_empty() {
        let names: Vec<Name> = start
            .columns
            .iter()
            .map(|column| Name::new(column.id.clone(), column.name.clone()))
            .collect();
        let column = Column::new(auto_name(&names, "", "id"), "int").primary_key();
        keys.push((
            column.id.clone(),
            column.name.clone(),
            column.data_type.clone(),
        ));
        if start_table_id == end_table_id {
            end_names.push(Name::new(column.id.clone(), column.name.clone()));
        }
        commands.push(Command::AddColumn(AddColumn {
            table_id: start_table_id.to_string(),
            column,
        }));
    }

    let mut end_column_ids = Vec::with_capacity(keys.len());
    for (_, name, data_type) in &keys {
        let column = Column::new(auto_name(&end_names, "", name), data_type.clone()).not_null();
        end_names.push(Name::new(column.id.clone(), column.name.clone()));
        end_column_ids.push(column.id.clone());
        commands.push(Command::AddColumn(AddColumn {
            table_id: end_table_id.to_string(),
            column,
        }));
    }

    let start_column_ids = keys.into_iter().map(|(id, _, _)| id).collect();
    commands.push(Command::AddRelationship(AddRelationship {
        relationship: Relationship::new(
            relationship_type,
            RelationshipPoint::new(start_table_id, start_column_ids),
            RelationshipPoint::new(end_table_id, end_column_ids),
        ),
    }));
    commands
}

pub fn remove_relationship(relationship_ids: Vec<Id>) -> Command {
    Command::RemoveRelationship(RemoveRelationship { relationship_ids })
}

pub fn change_relationship_type(
    relationship_id: impl Into<Id>,
    value: RelationshipType,
) -> Command {
    Command::ChangeRelationshipType(ChangeRelationshipType {
        relationship_id: relationship_id.into(),
        value,
    })
}

pub fn change_identification(relationship_id: impl Into<Id>, value: bool) -> Command {
    Command::ChangeIdentification(ChangeIdentification {
        relationship_id: relationship_id.into(),
        value,
    })
}

/// Both endpoint tables exist
pub(super) fn connects(document: &Document, relationship: &Relationship) -> bool {
    document.tables.contains_key(&relationship.start.table_id)
        && document.tables.contains_key(&relationship.end.table_id)
}

pub(crate) fn execute_add_relationship(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &AddRelationship,
) -> Vec<Command> {
    tracing::debug!("execute_add_relationship");
    let relationship = &payload.relationship;
    if document.relationships.contains_key(&relationship.id)
        || !connects(document, relationship)
    {
        return Vec::new();
    }
    document
        .relationships
        .insert(relationship.id.clone(), relationship.clone());
    changes.inserted(Target::Relationships, &relationship.id);
    document.refresh_column_keys(changes);
    document.refresh_relationships(changes);
    vec![remove_relationship(vec![relationship.id.clone()])]
}

pub(crate) fn execute_remove_relationship(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &RemoveRelationship,
) -> Vec<Command> {
    tracing::debug!("execute_remove_relationship");
    let removed: Vec<(usize, Relationship)> = document
        .relationships
        .values()
        .enumerate()
        .filter(|(_, relationship)| payload.relationship_ids.contains(&relationship.id))
        .map(|(index, relationship)| (index, relationship.clone()))
        .collect();

    for (index, relationship) in removed.iter().rev() {
        document.relationships.shift_remove_index(*index);
        changes.removed(Target::Relationships, &relationship.id);
    }
    if !removed.is_empty() {
        document.refresh_column_keys(changes);
        document.refresh_relationships(changes);
    }
    vec![Command::RestoreRelationship(RestoreRelationship {
        relationships: removed,
    })]
}

pub(crate) fn execute_restore_relationship(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &RestoreRelationship,
) -> Vec<Command> {
    tracing::debug!("execute_restore_relationship");
    let mut restored = Vec::new();
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
        restored.push(relationship.id.clone());
    }
    document.refresh_column_keys(changes);
    document.refresh_relationships(changes);
    vec![remove_relationship(restored)]
}

pub(crate) fn execute_change_relationship_type(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &ChangeRelationshipType,
) -> Vec<Command> {
    tracing::debug!("execute_change_relationship_type");
    let Some(relationship) = document.relationships.get_mut(&payload.relationship_id) else {
        return Vec::new();
    };
    let old = changes.assign(
        &mut relationship.relationship_type,
        payload.value,
        &Target::Relationship(relationship.id.clone()),
        Field::RelationshipType,
    );
    vec![change_relationship_type(payload.relationship_id.clone(), old)]
}

pub(crate) fn execute_change_identification(
    document: &mut Document,
    changes: &mut ChangeLog,
    payload: &ChangeIdentification,
) -> Vec<Command> {
    tracing::debug!("execute_change_identification");
    let Some(relationship) = document.relationships.get_mut(&payload.relationship_id) else {
        return Vec::new();
    };
    let old = changes.assign(
        &mut relationship.identification,
        payload.value,
        &Target::Relationship(relationship.id.clone()),
        Field::Identification,
    );
    vec![change_identification(payload.relationship_id.clone(), old)]
}
