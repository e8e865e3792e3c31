//! Table ordering used for placement and generation

use std::collections::HashSet;

use super::schema::{Relationship, Table};

/// Upper bound on settling passes; cycles are detected well before this
const MAX_PASSES: usize = 64;

/// One ordering pass: roots first, then each dependent moved in front of the
/// first table it points to.
fn order_pass<'a>(tables: &[&'a Table], relationships: &[&Relationship]) -> Vec<&'a Table> {
    let is_end = |table: &Table| {
        relationships
            .iter()
            .any(|relationship| relationship.end.table_id == table.id)
    };
    let (roots, mut dependents): (Vec<&Table>, Vec<&Table>) =
        tables.iter().copied().partition(|table| !is_end(table));

    for table in dependents.clone() {
        let end_ids: HashSet<&str> = relationships
            .iter()
            .filter(|relationship| relationship.start.table_id == table.id)
            .map(|relationship| relationship.end.table_id.as_str())
            .collect();

        let Some(current) = dependents.iter().position(|t| t.id == table.id) else {
            continue;
        };
        dependents.remove(current);

        let target = dependents
            .iter()
            .position(|t| end_ids.contains(t.id.as_str()))
            .unwrap_or(dependents.len());
        dependents.insert(target, table);
    }

    roots.into_iter().chain(dependents).collect()
}

fn ids(tables: &[&Table]) -> Vec<String> {
    tables.iter().map(|table| table.id.clone()).collect()
}

/// Order tables so relationship parents come before their children.
///
/// The pass is repeated until the order stops changing. If the passes cycle,
/// the lexicographically smallest order of the cycle is returned, which makes
/// the result independent of the input order within the cycle and the
/// function idempotent.
pub fn order_by_relationship<'a, 'r>(
    tables: impl IntoIterator<Item = &'a Table>,
    relationships: impl IntoIterator<Item = &'r Relationship>,
) -> Vec<&'a Table> {
    let relationships: Vec<&Relationship> = relationships.into_iter().collect();
    let mut current: Vec<&Table> = tables.into_iter().collect();
    let mut seen: Vec<Vec<String>> = vec![ids(&current)];

    for _ in 0..MAX_PASSES {
        let next = order_pass(&current, &relationships);
        let next_ids = ids(&next);
        if next_ids == seen[seen.len() - 1] {
            return next;
        }
        if let Some(start) = seen.iter().position(|state| *state == next_ids) {
            let canonical = seen[start..]
                .iter()
                .min()
                .cloned()
                .unwrap_or(next_ids);
            return canonical
                .iter()
                .filter_map(|id| next.iter().copied().find(|table| table.id == *id))
                .collect();
        }
        seen.push(next_ids);
        current = next;
    }

    current
}

/// Stable sort by lower-cased name
pub fn order_by_name_asc<'a>(tables: impl IntoIterator<Item = &'a Table>) -> Vec<&'a Table> {
    let mut tables: Vec<&Table> = tables.into_iter().collect();
    tables.sort_by_cached_key(|table| table.name.to_lowercase());
    tables
}
