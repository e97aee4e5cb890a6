mod support;

use relmap_sql::{QuerySignature, SelectBuilder, SqlCache, StatementKind};
use support::{customers, orders, to_one};

fn build(cache: &SqlCache, root_alias: Option<&str>, related_alias: Option<&str>) {
    let orders = orders();
    let customers = customers();
    let relation = to_one("Customer", related_alias, "customer_id", "customer");
    let builder = SelectBuilder::new(&orders, root_alias).relation(&relation, &customers);
    let signature = QuerySignature::query(StatementKind::Select, "Order", root_alias, Some(&relation));

    cache
        .get_or_build(signature, || builder.build())
        .unwrap();
}

#[test]
fn where_and_order_by_do_not_fragment_the_cache() {
    let cache = SqlCache::new();

    // Identical structure queried twice; per-call WHERE/ORDER BY fragments
    // are appended after the cache and never enter the key.
    build(&cache, Some("o"), Some("c"));
    build(&cache, Some("o"), Some("c"));

    assert_eq!(cache.len(), 1);
}

#[test]
fn alias_changes_produce_distinct_entries() {
    let cache = SqlCache::new();

    build(&cache, Some("o"), Some("c"));
    build(&cache, Some("ord"), Some("c"));
    // Adding an alias where none existed is a new shape too.
    build(&cache, None, Some("c"));

    assert_eq!(cache.len(), 3);
}

#[test]
fn statement_kind_keeps_select_and_count_apart() {
    let cache = SqlCache::new();
    let orders = orders();
    let customers = customers();
    let relation = to_one("Customer", Some("c"), "customer_id", "customer");
    let builder = SelectBuilder::new(&orders, Some("o")).relation(&relation, &customers);

    let select = QuerySignature::query(StatementKind::Select, "Order", Some("o"), Some(&relation));
    let count = QuerySignature::query(StatementKind::Count, "Order", Some("o"), Some(&relation));

    cache.get_or_build(select, || builder.build()).unwrap();
    cache.get_or_build(count, || builder.build_count()).unwrap();

    assert_eq!(cache.len(), 2);
}

#[test]
fn join_column_changes_produce_distinct_entries() {
    let cache = SqlCache::new();
    let orders = orders();
    let customers = customers();

    for join in ["customer_id", "status"] {
        // `status` is not a real foreign key but it is a mapped column, so
        // the builder accepts it; only the signature difference matters here.
        let relation = to_one("Customer", Some("c"), join, "customer");
        let builder = SelectBuilder::new(&orders, Some("o")).relation(&relation, &customers);
        let signature =
            QuerySignature::query(StatementKind::Select, "Order", Some("o"), Some(&relation));
        cache.get_or_build(signature, || builder.build()).unwrap();
    }

    assert_eq!(cache.len(), 2);
}
