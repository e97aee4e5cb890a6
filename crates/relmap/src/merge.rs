//! The graph merge engine: pure, state-free functions that wire
//! relationships onto already-materialized root objects.
//!
//! All three strategies preserve the root list's order and, within each
//! group, the first-seen order of the source list; callers rely on stable
//! ordering for pagination and display. A root whose id or join value is
//! null or non-positive is skipped silently, never an error: outer joins
//! legitimately produce partially-keyed rows.
//!
//! The functions are public so callers who hand-write SQL can merge
//! externally-obtained results directly.

use crate::{Model, Related};

use relmap_core::driver::Row;
use relmap_core::stmt::Value;
use relmap_core::Result;

use indexmap::IndexMap;

/// Populates a scalar to-one property on each root from its join-property
/// value: `root.<join_property>` holds the related object's id.
///
/// Unmatched, null, and non-positive join values leave the property unset.
pub fn merge_to_one<R: Model, C: Model>(
    roots: &mut [R],
    related: &[C],
    join_property: &str,
    target_property: &str,
) -> Result<()> {
    let id_property = C::meta().id.property;
    let mut by_id: IndexMap<i64, &C> = IndexMap::new();
    for item in related {
        if let Some(id) = item.get_property(id_property)?.as_positive_id() {
            by_id.entry(id).or_insert(item);
        }
    }

    for root in roots.iter_mut() {
        let Some(join_id) = root.get_property(join_property)?.as_positive_id() else {
            continue;
        };
        if let Some(item) = by_id.get(&join_id) {
            root.set_related(target_property, Related::one_of((*item).clone()))?;
        }
    }
    Ok(())
}

/// Groups the many side by its join-property value (the foreign key back to
/// the root) and assigns each root its own group, in source order. Roots
/// without a group receive an empty collection; no two roots ever share a
/// collection instance.
pub fn merge_to_many<R: Model, C: Model>(
    roots: &mut [R],
    many_side: Vec<C>,
    join_property: &str,
    target_property: &str,
) -> Result<()> {
    let mut groups: IndexMap<i64, Vec<C>> = IndexMap::new();
    for item in many_side {
        let Some(fk) = item.get_property(join_property)?.as_positive_id() else {
            continue;
        };
        groups.entry(fk).or_default().push(item);
    }

    assign_groups(roots, groups, target_property)
}

/// Like [`merge_to_many`], but grouping is driven by `(root id, related id)`
/// pairs parsed from join-table rows rather than a foreign key on the
/// related side. Pairs referencing an unknown related id are dropped.
pub fn merge_to_many_through<R: Model, C: Model>(
    roots: &mut [R],
    related: &[C],
    pairs: &[(i64, i64)],
    target_property: &str,
) -> Result<()> {
    let id_property = C::meta().id.property;
    let mut by_id: IndexMap<i64, &C> = IndexMap::new();
    for item in related {
        if let Some(id) = item.get_property(id_property)?.as_positive_id() {
            by_id.entry(id).or_insert(item);
        }
    }

    let mut groups: IndexMap<i64, Vec<C>> = IndexMap::new();
    for (root_id, related_id) in pairs {
        if *root_id <= 0 {
            continue;
        }
        if let Some(item) = by_id.get(related_id) {
            groups.entry(*root_id).or_default().push((*item).clone());
        }
    }

    assign_groups(roots, groups, target_property)
}

/// Reads `(root id, related id)` pairs from join-table columns of a result
/// set. Rows where either id is null or non-positive contribute no pair.
pub fn join_pairs(rows: &[Row], root_column: &str, related_column: &str) -> Vec<(i64, i64)> {
    rows.iter()
        .filter_map(|row| {
            let root_id = row.get(root_column).and_then(Value::as_positive_id)?;
            let related_id = row.get(related_column).and_then(Value::as_positive_id)?;
            Some((root_id, related_id))
        })
        .collect()
}

fn assign_groups<R: Model, C: Model>(
    roots: &mut [R],
    mut groups: IndexMap<i64, Vec<C>>,
    target_property: &str,
) -> Result<()> {
    let id_property = R::meta().id.property;
    for root in roots.iter_mut() {
        let Some(id) = root.get_property(id_property)?.as_positive_id() else {
            continue;
        };
        let group = groups.shift_remove(&id).unwrap_or_default();
        root.set_related(target_property, Related::many_of(group))?;
    }
    Ok(())
}
