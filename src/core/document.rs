//! The document: canvas settings, tables, relationships, memos and editor state
//!
//! Entities live in id-indexed ordered maps; map order is display order.
//! Mutation happens only through command executors, which borrow the document
//! mutably for one batch. Loading and saving go through [`DocumentData`].

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::canvas::CanvasState;
use super::editor::EditorState;
use super::error::DocumentError;
use super::helper::Id;
use super::layout::{input_width, top_z_index};
use super::observe::{ChangeLog, Field, Target};
use super::routing::relationship_sort;
use super::schema::{Column, Memo, Relationship, Table};

/// Serialized shape of a document
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct DocumentData {
    #[serde(default)]
    pub canvas: CanvasState,
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub memos: Vec<Memo>,
    /// Highest z-index ever handed out
    #[serde(default)]
    pub z_index: u32,
}

impl DocumentData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_canvas(mut self, canvas: CanvasState) -> Self {
        self.canvas = canvas;
        self
    }

    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationships.push(relationship);
        self
    }

    pub fn with_memo(mut self, memo: Memo) -> Self {
        self.memos.push(memo);
        self
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(try_from = "DocumentData", into = "DocumentData")]
pub struct Document {
    pub(crate) canvas: CanvasState,
    pub(crate) tables: IndexMap<Id, Table>,
    pub(crate) relationships: IndexMap<Id, Relationship>,
    pub(crate) memos: IndexMap<Id, Memo>,
    pub(crate) editor: EditorState,
    /// z-index high-water mark; only grows, except when undo puts it back
    pub(crate) z_index: u32,
}

fn index_unique<T>(
    items: Vec<T>,
    kind: &'static str,
    id: impl Fn(&T) -> &Id,
) -> Result<IndexMap<Id, T>, DocumentError> {
    let mut map = IndexMap::with_capacity(items.len());
    for item in items {
        let key = id(&item).clone();
        if map.contains_key(&key) {
            return Err(DocumentError::DuplicateId { kind, id: key });
        }
        map.insert(key, item);
    }
    Ok(map)
}

impl TryFrom<DocumentData> for Document {
    type Error = DocumentError;

    fn try_from(data: DocumentData) -> Result<Self, Self::Error> {
        for table in &data.tables {
            let mut seen = HashSet::new();
            for column in &table.columns {
                if !seen.insert(column.id.as_str()) {
                    return Err(DocumentError::DuplicateId {
                        kind: "column",
                        id: column.id.clone(),
                    });
                }
            }
        }

        let tables = index_unique(data.tables, "table", |table| &table.id)?;
        let mut relationships =
            index_unique(data.relationships, "relationship", |relationship| {
                &relationship.id
            })?;
        let memos = index_unique(data.memos, "memo", |memo| &memo.id)?;

        relationships.retain(|id, relationship| {
            let keep = tables.contains_key(&relationship.start.table_id)
                && tables.contains_key(&relationship.end.table_id);
            if !keep {
                tracing::warn!(relationship = %id, "dropping relationship to a missing table");
            }
            keep
        });

        let z_index = data
            .z_index
            .max(top_z_index(tables.values(), memos.values()));

        Ok(Self {
            canvas: data.canvas,
            tables,
            relationships,
            memos,
            editor: EditorState::default(),
            z_index,
        })
    }
}

impl From<Document> for DocumentData {
    fn from(document: Document) -> Self {
        Self {
            canvas: document.canvas,
            tables: document.tables.into_values().collect(),
            relationships: document.relationships.into_values().collect(),
            memos: document.memos.into_values().collect(),
            z_index: document.z_index,
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_canvas(canvas: CanvasState) -> Self {
        Self {
            canvas,
            ..Self::default()
        }
    }

    pub fn from_data(data: DocumentData) -> Result<Self, DocumentError> {
        Self::try_from(data)
    }

    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn canvas(&self) -> &CanvasState {
        &self.canvas
    }

    pub fn editor(&self) -> &EditorState {
        &self.editor
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn table(&self, table_id: &str) -> Option<&Table> {
        self.tables.get(table_id)
    }

    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.values()
    }

    pub fn relationship(&self, relationship_id: &str) -> Option<&Relationship> {
        self.relationships.get(relationship_id)
    }

    pub fn memos(&self) -> impl Iterator<Item = &Memo> {
        self.memos.values()
    }

    pub fn memo(&self, memo_id: &str) -> Option<&Memo> {
        self.memos.get(memo_id)
    }

    pub fn column(&self, table_id: &str, column_id: &str) -> Option<&Column> {
        self.tables.get(table_id)?.column(column_id)
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    pub fn memo_count(&self) -> usize {
        self.memos.len()
    }

    /// Highest z-index handed out so far. Deleting the top object does not
    /// lower it.
    pub fn z_index(&self) -> u32 {
        self.z_index
    }

    pub(crate) fn raise_z_index(&mut self, z_index: u32) {
        self.z_index = self.z_index.max(z_index);
    }

    /// Recompute the cached text widths of every table and column
    pub(crate) fn refresh_widths(&mut self, changes: &mut ChangeLog) {
        for table in self.tables.values_mut() {
            let target = Target::Table(table.id.clone());
            changes.assign(
                &mut table.ui.width_name,
                input_width(&table.name),
                &target,
                Field::WidthName,
            );
            changes.assign(
                &mut table.ui.width_comment,
                input_width(&table.comment),
                &target,
                Field::WidthComment,
            );
            for column in &mut table.columns {
                let target = Target::Column(table.id.clone(), column.id.clone());
                let ui = &mut column.ui;
                changes.assign(
                    &mut ui.width_name,
                    input_width(&column.name),
                    &target,
                    Field::WidthName,
                );
                changes.assign(
                    &mut ui.width_comment,
                    input_width(&column.comment),
                    &target,
                    Field::WidthComment,
                );
                changes.assign(
                    &mut ui.width_data_type,
                    input_width(&column.data_type),
                    &target,
                    Field::WidthDataType,
                );
                changes.assign(
                    &mut ui.width_default,
                    input_width(&column.default),
                    &target,
                    Field::WidthDefault,
                );
            }
        }
    }

    /// Re-route every relationship anchor, recording the ends that moved
    pub(crate) fn refresh_relationships(&mut self, changes: &mut ChangeLog) {
        let routes = relationship_sort(&self.tables, &self.relationships, &self.canvas.show);
        for route in routes {
            let Some(relationship) = self.relationships.get_mut(&route.id) else {
                continue;
            };
            let target = Target::Relationship(route.id.clone());
            if route.start.apply(&mut relationship.start) {
                changes.field(&target, Field::Start);
            }
            if route.end.apply(&mut relationship.end) {
                changes.field(&target, Field::End);
            }
        }
    }

    /// Recompute the derived pk/fk/pfk markers of every column
    pub(crate) fn refresh_column_keys(&mut self, changes: &mut ChangeLog) {
        let mut foreign: HashMap<&str, HashSet<&str>> = HashMap::new();
        for relationship in self.relationships.values() {
            foreign
                .entry(relationship.end.table_id.as_str())
                .or_default()
                .extend(relationship.end.column_ids.iter().map(String::as_str));
        }

        let mut updates = Vec::new();
        for table in self.tables.values() {
            let table_foreign = foreign.get(table.id.as_str());
            for (index, column) in table.columns.iter().enumerate() {
                let fk = table_foreign.is_some_and(|ids| ids.contains(column.id.as_str()));
                let primary_key = column.option.primary_key;
                let keys = (primary_key && !fk, fk && !primary_key, primary_key && fk);
                if keys != (column.ui.pk, column.ui.fk, column.ui.pfk) {
                    updates.push((table.id.clone(), index, keys));
                }
            }
        }

        for (table_id, index, (pk, fk, pfk)) in updates {
            let Some(column) = self
                .tables
                .get_mut(&table_id)
                .and_then(|table| table.columns.get_mut(index))
            else {
                continue;
            };
            column.ui.pk = pk;
            column.ui.fk = fk;
            column.ui.pfk = pfk;
            changes.field(&Target::Column(table_id.clone(), column.id.clone()), Field::Key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::{RelationshipPoint, RelationshipType};

    fn sample() -> DocumentData {
        DocumentData::new()
            .with_table(
                Table::new("users")
                    .with_id("users")
                    .add_column(Column::new("id", "int").with_id("users.id").primary_key()),
            )
            .with_table(
                Table::new("orders")
                    .with_id("orders")
                    .add_column(Column::new("user_id", "int").with_id("orders.user_id")),
            )
            .with_relationship(
                Relationship::new(
                    RelationshipType::OneN,
                    RelationshipPoint::new("users", vec!["users.id".into()]),
                    RelationshipPoint::new("orders", vec!["orders.user_id".into()]),
                )
                .with_id("r1"),
            )
            .with_memo(Memo::new().with_id("m1").with_value("note"))
    }

    #[test]
    fn test_json_roundtrip_keeps_order() {
        let document = Document::from_data(sample()).unwrap();
        let json = document.to_json().unwrap();
        let loaded = Document::from_json(&json).unwrap();
        assert_eq!(document, loaded);
        let names: Vec<&str> = loaded.tables().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["users", "orders"]);
    }

    #[test]
    fn test_duplicate_table_id_is_rejected() {
        let data = sample().with_table(Table::new("again").with_id("users"));
        let err = Document::from_data(data).unwrap_err();
        assert!(matches!(err, DocumentError::DuplicateId { kind: "table", .. }));
    }

    #[test]
    fn test_duplicate_column_id_is_rejected() {
        let data = DocumentData::new().with_table(
            Table::new("t")
                .add_column(Column::new("a", "int").with_id("c"))
                .add_column(Column::new("b", "int").with_id("c")),
        );
        assert!(Document::from_data(data).is_err());
    }

    #[test]
    fn test_relationship_to_missing_table_is_dropped() {
        let data = sample().with_relationship(
            Relationship::new(
                RelationshipType::One,
                RelationshipPoint::new("users", vec!["users.id".into()]),
                RelationshipPoint::new("ghost", vec!["x".into()]),
            )
            .with_id("r2"),
        );
        let document = Document::from_data(data).unwrap();
        assert_eq!(document.relationship_count(), 1);
        assert!(document.relationship("r2").is_none());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Document::from_json("{ not json"),
            Err(DocumentError::Json(_))
        ));
    }

    #[test]
    fn test_refresh_column_keys_marks_foreign_keys() {
        let mut document = Document::from_data(sample()).unwrap();
        let mut changes = ChangeLog::new();
        document.refresh_column_keys(&mut changes);

        let user_id = document.column("orders", "orders.user_id").unwrap();
        assert!(user_id.ui.fk);
        assert!(!user_id.ui.pk);
        let id = document.column("users", "users.id").unwrap();
        assert!(id.ui.pk);
        assert!(!id.ui.pfk);
        assert!(!changes.is_empty());
    }
}
