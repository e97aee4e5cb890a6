mod support;

use support::{customer, order, Customer, Order};

use pretty_assertions::assert_eq;
use relmap::merge_to_one;

#[test]
fn populates_matching_roots() {
    let mut orders = vec![
        order(1, Some(10), "open"),
        order(2, Some(20), "shipped"),
        order(3, None, "draft"),
    ];
    let customers = vec![customer(10, "ada"), customer(20, "grace")];

    merge_to_one(&mut orders, &customers, "customer_id", "customer").unwrap();

    assert_eq!(orders[0].customer, Some(customer(10, "ada")));
    assert_eq!(orders[1].customer, Some(customer(20, "grace")));
    assert_eq!(orders[2].customer, None);
}

#[test]
fn foreign_key_without_related_object_stays_unpopulated() {
    let mut orders = vec![order(1, Some(99), "open")];
    let customers = vec![customer(10, "ada")];

    merge_to_one(&mut orders, &customers, "customer_id", "customer").unwrap();

    assert_eq!(orders[0].customer, None);
}

#[test]
fn first_related_object_wins_on_duplicate_ids() {
    let mut orders = vec![order(1, Some(10), "open")];
    let customers = vec![customer(10, "ada"), customer(10, "imposter")];

    merge_to_one(&mut orders, &customers, "customer_id", "customer").unwrap();

    assert_eq!(orders[0].customer, Some(customer(10, "ada")));
}

#[test]
fn shared_related_object_is_assigned_to_every_root() {
    let mut orders = vec![order(1, Some(10), "open"), order(2, Some(10), "open")];
    let customers = vec![customer(10, "ada")];

    merge_to_one(&mut orders, &customers, "customer_id", "customer").unwrap();

    assert_eq!(orders[0].customer, Some(customer(10, "ada")));
    assert_eq!(orders[1].customer, Some(customer(10, "ada")));
}

#[test]
fn unknown_join_property_is_an_error() {
    let mut orders = vec![order(1, Some(10), "open")];
    let customers: Vec<Customer> = vec![];

    let err = merge_to_one(&mut orders, &customers, "nope", "customer").unwrap_err();
    assert!(err.is_invalid_argument(), "{err}");
}

#[test]
fn empty_roots_are_a_no_op() {
    let mut orders: Vec<Order> = vec![];
    merge_to_one(&mut orders, &[customer(10, "ada")], "customer_id", "customer").unwrap();
    assert!(orders.is_empty());
}
