//! End-to-end seating flows across all three engines

use super::*;
use shared::models::{PaymentStatus, TableStatus};

/// The full happy path with exact amounts:
/// CreateOrder (Free→Occupied) → Cooking → Ready → Served (table→Served)
/// → CreateBill (60.94 + 8.5% tax = 66.12) → ProcessPayment (table→Billed)
/// → Release (table→Free)
#[test]
fn test_full_seating_cycle() {
    let floor = create_test_floor();
    let table = floor.add_table(12);

    // Seat the guests
    let order = floor.open_example_order(&table.id);
    assert_eq!(order.total_amount, 60.94);
    assert_eq!(floor.ledger.get_table(&table.id).unwrap().status, TableStatus::Occupied);

    // Kitchen
    floor.workflow.transition(&order.id, OrderStatus::Cooking).unwrap();
    floor.workflow.transition(&order.id, OrderStatus::Ready).unwrap();
    floor.workflow.transition(&order.id, OrderStatus::Served).unwrap();
    assert_eq!(floor.ledger.get_table(&table.id).unwrap().status, TableStatus::Served);

    // Cashier prints the bill; table stays Served until payment
    let bill = floor.bill(&order.id, 8.5);
    assert_eq!(bill.subtotal, 60.94);
    assert_eq!(bill.tax_amount, 5.18);
    assert_eq!(bill.service_charge, 0.0);
    assert_eq!(bill.discount_amount, 0.0);
    assert_eq!(bill.total_amount, 66.12);
    assert_eq!(bill.payment_status, PaymentStatus::Pending);
    assert_eq!(floor.ledger.get_table(&table.id).unwrap().status, TableStatus::Served);

    // Payment settles the bill and bills the table
    let paid = floor.billing.process_payment(&bill.id, Some("card".to_string())).unwrap();
    assert_eq!(paid.payment_status, PaymentStatus::Paid);
    assert_eq!(paid.payment_method, "card");
    let billed = floor.ledger.get_table(&table.id).unwrap();
    assert_eq!(billed.status, TableStatus::Billed);
    // The order reference survives until release so the settled order
    // stays resolvable from the table
    assert_eq!(billed.current_order_id.as_deref(), Some(order.id.as_str()));

    // Bussing frees the table; this is an explicit step, never automatic
    floor.ledger.release(&table.id).unwrap();
    let freed = floor.ledger.get_table(&table.id).unwrap();
    assert_eq!(freed.status, TableStatus::Free);
    assert!(freed.current_order_id.is_none());
}

#[test]
fn test_table_reusable_after_release() {
    let floor = create_test_floor();
    let table = floor.add_table(3);

    let first = floor.open_example_order(&table.id);
    floor.serve(&first.id);
    let bill = floor.bill(&first.id, 0.0);
    floor.billing.process_payment(&bill.id, None).unwrap();
    floor.ledger.release(&table.id).unwrap();

    // Same table, next party
    let item = floor.add_item("Espresso", 1.80);
    let second = floor
        .workflow
        .create_order(OrderCreate {
            table_id: table.id.clone(),
            staff_id: "waiter-2".to_string(),
            lines: vec![line(&item.id, 2)],
            notes: Some("after-dinner coffees".to_string()),
        })
        .unwrap();

    let occupied = floor.ledger.get_table(&table.id).unwrap();
    assert_eq!(occupied.status, TableStatus::Occupied);
    assert_eq!(occupied.current_order_id.as_deref(), Some(second.id.as_str()));

    // The first seating's records are untouched
    assert_eq!(
        floor.workflow.get_order(&first.id).unwrap().status,
        OrderStatus::Served
    );
    assert_eq!(
        floor.billing.get_bill_by_order(&first.id).unwrap().unwrap().id,
        bill.id
    );
}

#[test]
fn test_cancel_mid_cooking_flow() {
    let floor = create_test_floor();
    let table = floor.add_table(5);
    let order = floor.open_example_order(&table.id);

    floor.workflow.transition(&order.id, OrderStatus::Cooking).unwrap();
    floor.workflow.cancel_order(&order.id).unwrap();

    assert_eq!(
        floor.workflow.get_order(&order.id).unwrap().status,
        OrderStatus::Cancelled
    );
    assert_eq!(floor.ledger.get_table(&table.id).unwrap().status, TableStatus::Free);

    // A cancelled order can never be billed
    let result = floor.billing.create_bill(BillCreate {
        order_id: order.id.clone(),
        cashier_id: "cashier-1".to_string(),
        tax_rate: 0.0,
        discount_amount: 0.0,
        service_charge: 0.0,
        payment_method: "cash".to_string(),
    });
    assert!(matches!(result, Err(FloorError::InvalidOperation(_))));
}

#[test]
fn test_refund_flow_leaves_table_alone() {
    let floor = create_test_floor();
    let table = floor.add_table(8);
    let order = floor.open_example_order(&table.id);
    floor.serve(&order.id);

    let bill = floor.bill(&order.id, 8.5);
    floor.billing.process_payment(&bill.id, None).unwrap();
    assert_eq!(floor.ledger.get_table(&table.id).unwrap().status, TableStatus::Billed);

    let refunded = floor.billing.refund_bill(&bill.id).unwrap();
    assert_eq!(refunded.payment_status, PaymentStatus::Refunded);

    // Table disposition after a refund is a staff decision; nothing moved
    assert_eq!(floor.ledger.get_table(&table.id).unwrap().status, TableStatus::Billed);
}
