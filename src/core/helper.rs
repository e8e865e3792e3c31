//! Identifier and naming helpers shared by layout, commands and generators.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable opaque identifier of a table, column, relationship or memo.
pub type Id = String;

/// Generate a fresh identifier.
pub fn uuid() -> Id {
    Uuid::new_v4().to_string()
}

/// A name already taken, owned by the entity `id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    pub id: Id,
    pub name: String,
}

impl Name {
    pub fn new(id: impl Into<Id>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Return `name`, or `name` followed by the smallest counter that makes it
/// unique among `list`. Entries owned by `id` itself are ignored, so renaming
/// an entity to its current name keeps it unchanged.
pub fn auto_name(list: &[Name], id: &str, name: &str) -> String {
    let taken = |candidate: &str| {
        list.iter()
            .any(|item| item.id != id && item.name == candidate)
    };

    if !taken(name) {
        return name.to_string();
    }

    let mut num = 1usize;
    loop {
        let candidate = format!("{name}{num}");
        if !taken(&candidate) {
            return candidate;
        }
        num += 1;
    }
}

/// Registry of emitted names, used to keep generated identifiers unique.
/// Names are compared case-insensitively, since databases fold unquoted
/// identifiers.
#[derive(Clone, Debug, Default)]
pub struct NameRegistry {
    names: Vec<Name>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a unique variant of `name` and return it, keeping its case.
    pub fn reserve(&mut self, name: &str) -> String {
        let folded = name.to_lowercase();
        let unique = auto_name(&self.names, "", &folded);
        let suffix = &unique[folded.len()..];
        self.names.push(Name::new(uuid(), unique.clone()));
        format!("{name}{suffix}")
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
