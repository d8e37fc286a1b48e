//! Boundary and failure behaviour: rejected operations leave no trace

use super::*;
use shared::models::{PaymentStatus, TableStatus};

// ========================================================================
// State machine boundaries
// ========================================================================

#[test]
fn test_skipping_a_step_is_rejected_without_mutation() {
    let floor = create_test_floor();
    let table = floor.add_table(1);
    let order = floor.open_example_order(&table.id);

    // Pending → Ready skips Cooking
    let result = floor.workflow.transition(&order.id, OrderStatus::Ready);
    assert!(matches!(result, Err(FloorError::InvalidTransition(_))));

    // Both order and table are untouched
    assert_eq!(floor.workflow.get_order(&order.id).unwrap().status, OrderStatus::Pending);
    assert_eq!(floor.ledger.get_table(&table.id).unwrap().status, TableStatus::Occupied);
}

#[test]
fn test_terminal_orders_reject_all_transitions() {
    let floor = create_test_floor();
    let table = floor.add_table(1);
    let order = floor.open_example_order(&table.id);
    floor.serve(&order.id);

    for to in [
        OrderStatus::Pending,
        OrderStatus::Cooking,
        OrderStatus::Ready,
        OrderStatus::Served,
        OrderStatus::Cancelled,
    ] {
        let result = floor.workflow.transition(&order.id, to);
        assert!(
            matches!(result, Err(FloorError::InvalidTransition(_))),
            "Served order accepted transition to {to}"
        );
    }

    // Cancelling a served order in particular must not free the table
    assert_eq!(floor.ledger.get_table(&table.id).unwrap().status, TableStatus::Served);
}

#[test]
fn test_empty_order_rejected() {
    let floor = create_test_floor();
    let table = floor.add_table(1);

    let result = floor.workflow.create_order(OrderCreate {
        table_id: table.id.clone(),
        staff_id: "waiter-1".to_string(),
        lines: vec![],
        notes: None,
    });
    assert!(matches!(result, Err(FloorError::InvalidOperation(_))));
    assert_eq!(floor.ledger.get_table(&table.id).unwrap().status, TableStatus::Free);
}

#[test]
fn test_zero_quantity_line_rejected() {
    let floor = create_test_floor();
    let table = floor.add_table(1);
    let item = floor.add_item("Cola", 2.99);

    let result = floor.workflow.create_order(OrderCreate {
        table_id: table.id.clone(),
        staff_id: "waiter-1".to_string(),
        lines: vec![line(&item.id, 0)],
        notes: None,
    });
    assert!(matches!(result, Err(FloorError::InvalidOperation(_))));
}

// ========================================================================
// Billing boundaries
// ========================================================================

#[test]
fn test_create_bill_requires_served_order() {
    let floor = create_test_floor();
    let table = floor.add_table(1);
    let order = floor.open_example_order(&table.id);
    floor.workflow.transition(&order.id, OrderStatus::Cooking).unwrap();

    let result = floor.billing.create_bill(BillCreate {
        order_id: order.id.clone(),
        cashier_id: "cashier-1".to_string(),
        tax_rate: 8.5,
        discount_amount: 0.0,
        service_charge: 0.0,
        payment_method: "cash".to_string(),
    });
    assert!(matches!(result, Err(FloorError::InvalidOperation(_))));
    assert!(floor.billing.get_bill_by_order(&order.id).unwrap().is_none());
}

#[test]
fn test_second_bill_for_order_rejected() {
    let floor = create_test_floor();
    let table = floor.add_table(1);
    let order = floor.open_example_order(&table.id);
    floor.serve(&order.id);

    let first = floor.bill(&order.id, 8.5);
    let second = floor.billing.create_bill(BillCreate {
        order_id: order.id.clone(),
        cashier_id: "cashier-2".to_string(),
        tax_rate: 0.0,
        discount_amount: 0.0,
        service_charge: 0.0,
        payment_method: "card".to_string(),
    });
    assert!(matches!(second, Err(FloorError::DuplicateBill(_))));

    // The original bill is untouched
    let loaded = floor.billing.get_bill(&first.id).unwrap();
    assert_eq!(loaded.tax_rate, 8.5);
    assert_eq!(loaded.cashier_id, "cashier-1");
}

#[test]
fn test_pay_twice_rejected() {
    let floor = create_test_floor();
    let table = floor.add_table(1);
    let order = floor.open_example_order(&table.id);
    floor.serve(&order.id);
    let bill = floor.bill(&order.id, 0.0);

    floor.billing.process_payment(&bill.id, None).unwrap();
    let again = floor.billing.process_payment(&bill.id, None);
    assert!(matches!(again, Err(FloorError::InvalidTransition(_))));
    assert_eq!(floor.ledger.get_table(&table.id).unwrap().status, TableStatus::Billed);
}

#[test]
fn test_refund_requires_paid_and_rejects_second_refund() {
    let floor = create_test_floor();
    let table = floor.add_table(1);
    let order = floor.open_example_order(&table.id);
    floor.serve(&order.id);
    let bill = floor.bill(&order.id, 0.0);

    // Pending bill cannot be refunded
    let early = floor.billing.refund_bill(&bill.id);
    assert!(matches!(early, Err(FloorError::InvalidTransition(_))));
    assert_eq!(
        floor.billing.get_bill(&bill.id).unwrap().payment_status,
        PaymentStatus::Pending
    );

    floor.billing.process_payment(&bill.id, None).unwrap();
    floor.billing.refund_bill(&bill.id).unwrap();

    // Refund is idempotent-rejecting
    let again = floor.billing.refund_bill(&bill.id);
    assert!(matches!(again, Err(FloorError::InvalidTransition(_))));
}

#[test]
fn test_bill_input_validation_blocks_creation() {
    let floor = create_test_floor();
    let table = floor.add_table(1);
    let order = floor.open_example_order(&table.id);
    floor.serve(&order.id);

    for (tax_rate, discount, service) in [
        (-1.0, 0.0, 0.0),
        (101.0, 0.0, 0.0),
        (0.0, -5.0, 0.0),
        (0.0, 0.0, -2.0),
        (f64::NAN, 0.0, 0.0),
    ] {
        let result = floor.billing.create_bill(BillCreate {
            order_id: order.id.clone(),
            cashier_id: "cashier-1".to_string(),
            tax_rate,
            discount_amount: discount,
            service_charge: service,
            payment_method: "cash".to_string(),
        });
        assert!(result.is_err(), "accepted tax={tax_rate} discount={discount} service={service}");
        assert!(floor.billing.get_bill_by_order(&order.id).unwrap().is_none());
    }
}

// ========================================================================
// Invariants under concurrency
// ========================================================================

#[test]
fn test_concurrent_create_order_exactly_one_wins() {
    let floor = create_test_floor();
    let table = floor.add_table(1);
    let item = floor.add_item("Cola", 2.99);

    let results: Vec<FloorResult<shared::models::Order>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..2)
            .map(|i| {
                let workflow = floor.workflow.clone();
                let table_id = table.id.clone();
                let item_id = item.id.clone();
                s.spawn(move || {
                    workflow.create_order(OrderCreate {
                        table_id,
                        staff_id: format!("waiter-{i}"),
                        lines: vec![line(&item_id, 1)],
                        notes: None,
                    })
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let winners: Vec<_> = results.iter().filter(|r| r.is_ok()).collect();
    assert_eq!(winners.len(), 1, "exactly one reservation must win");
    assert!(
        results
            .iter()
            .any(|r| matches!(r, Err(FloorError::TableUnavailable(_)))),
        "the loser must see TableUnavailable"
    );

    // The table ended up Occupied exactly once, bound to the winner
    let after = floor.ledger.get_table(&table.id).unwrap();
    assert_eq!(after.status, TableStatus::Occupied);
    let winner = results.into_iter().find_map(Result::ok).unwrap();
    assert_eq!(after.current_order_id.as_deref(), Some(winner.id.as_str()));
}

#[test]
fn test_operations_on_distinct_tables_are_independent() {
    let floor = create_test_floor();
    let item = floor.add_item("Cola", 2.99);
    let tables: Vec<_> = (1..=4).map(|n| floor.add_table(n)).collect();

    std::thread::scope(|s| {
        for (i, table) in tables.iter().enumerate() {
            let workflow = floor.workflow.clone();
            let table_id = table.id.clone();
            let item_id = item.id.clone();
            s.spawn(move || {
                let order = workflow
                    .create_order(OrderCreate {
                        table_id,
                        staff_id: format!("waiter-{i}"),
                        lines: vec![line(&item_id, 1)],
                        notes: None,
                    })
                    .unwrap();
                workflow.transition(&order.id, OrderStatus::Cooking).unwrap();
            });
        }
    });

    for table in &tables {
        assert_eq!(floor.ledger.get_table(&table.id).unwrap().status, TableStatus::Occupied);
    }
    assert_eq!(floor.workflow.statistics().unwrap().cooking_orders, 4);
}

// ========================================================================
// I1/I6 spot checks
// ========================================================================

#[test]
fn test_occupied_tables_always_reference_active_orders() {
    let floor = create_test_floor();
    let item = floor.add_item("Cola", 2.99);

    for number in 1..=3 {
        let table = floor.add_table(number);
        let order = floor
            .workflow
            .create_order(OrderCreate {
                table_id: table.id,
                staff_id: "waiter-1".to_string(),
                lines: vec![line(&item.id, 1)],
                notes: None,
            })
            .unwrap();
        if number == 2 {
            floor.workflow.cancel_order(&order.id).unwrap();
        }
    }

    for table in floor.ledger.list_tables().unwrap() {
        if table.status == TableStatus::Occupied {
            let order_id = table.current_order_id.expect("occupied table without order ref");
            let order = floor.workflow.get_order(&order_id).unwrap();
            assert!(order.status.is_active());
            assert_eq!(order.table_id, table.id);
        }
    }
}

#[test]
fn test_total_always_equals_sum_of_line_totals() {
    let floor = create_test_floor();
    let table = floor.add_table(1);
    let order = floor.open_example_order(&table.id);

    let sum: f64 = order.lines.iter().map(|l| l.line_total).sum();
    assert!((order.total_amount - sum).abs() < f64::EPSILON);
    assert_eq!(order.total_amount, 60.94);

    // Still true after every subsequent mutation
    floor.serve(&order.id);
    let served = floor.workflow.get_order(&order.id).unwrap();
    let sum: f64 = served.lines.iter().map(|l| l.line_total).sum();
    assert!((served.total_amount - sum).abs() < f64::EPSILON);
}
