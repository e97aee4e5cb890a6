mod support;

use support::{order, order_line};

use pretty_assertions::assert_eq;
use relmap::merge_to_many;

#[test]
fn children_group_under_their_parent_in_arrival_order() {
    let mut orders = vec![order(1, None, "open"), order(2, None, "open")];
    let lines = vec![
        order_line(100, Some(1), 2),
        order_line(101, Some(1), 5),
        order_line(102, Some(2), 1),
    ];

    merge_to_many(&mut orders, lines, "order_id", "lines").unwrap();

    assert_eq!(
        orders[0].lines,
        vec![order_line(100, Some(1), 2), order_line(101, Some(1), 5)]
    );
    assert_eq!(orders[1].lines, vec![order_line(102, Some(2), 1)]);
}

#[test]
fn childless_parents_get_an_empty_list() {
    let mut orders = vec![order(1, None, "open"), order(2, None, "open")];
    let lines = vec![order_line(100, Some(1), 2)];

    merge_to_many(&mut orders, lines, "order_id", "lines").unwrap();

    assert_eq!(orders[0].lines.len(), 1);
    assert!(orders[1].lines.is_empty());
}

#[test]
fn children_of_unknown_parents_are_dropped() {
    let mut orders = vec![order(1, None, "open")];
    let lines = vec![order_line(100, Some(7), 2), order_line(101, None, 3)];

    merge_to_many(&mut orders, lines, "order_id", "lines").unwrap();

    assert!(orders[0].lines.is_empty());
}

#[test]
fn interleaved_children_keep_their_relative_order() {
    let mut orders = vec![order(1, None, "open"), order(2, None, "open")];
    let lines = vec![
        order_line(100, Some(2), 1),
        order_line(101, Some(1), 1),
        order_line(102, Some(2), 1),
        order_line(103, Some(1), 1),
    ];

    merge_to_many(&mut orders, lines, "order_id", "lines").unwrap();

    let ids = |lines: &[support::OrderLine]| {
        lines.iter().map(|l| l.order_line_id.unwrap()).collect::<Vec<_>>()
    };
    assert_eq!(ids(&orders[0].lines), vec![101, 103]);
    assert_eq!(ids(&orders[1].lines), vec![100, 102]);
}
