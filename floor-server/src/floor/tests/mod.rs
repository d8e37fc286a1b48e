use super::*;
use crate::services::CatalogService;
use shared::models::{
    BillCreate, DiningTable, DiningTableCreate, MenuItem, MenuItemCreate, Order, OrderCreate,
    OrderLineInput, OrderStatus,
};
use std::sync::Arc;

mod test_boundary;
mod test_flows;

/// Engines wired over one in-memory store, exactly as at server startup
pub(crate) struct TestFloor {
    pub catalog: Arc<CatalogService>,
    pub ledger: Arc<TableLedger>,
    pub workflow: Arc<OrderWorkflow>,
    pub billing: Arc<BillingEngine>,
}

pub(crate) fn create_test_floor() -> TestFloor {
    let storage = FloorStorage::open_in_memory().unwrap();
    let catalog = Arc::new(CatalogService::new(storage.clone()).unwrap());
    let ledger = Arc::new(TableLedger::new(storage.clone()));
    let workflow = Arc::new(OrderWorkflow::new(
        storage.clone(),
        ledger.clone(),
        catalog.clone(),
    ));
    let billing = Arc::new(BillingEngine::new(storage, ledger.clone()));
    TestFloor {
        catalog,
        ledger,
        workflow,
        billing,
    }
}

pub(crate) fn line(menu_item_id: &str, quantity: i32) -> OrderLineInput {
    OrderLineInput {
        menu_item_id: menu_item_id.to_string(),
        quantity,
        special_instructions: None,
    }
}

impl TestFloor {
    pub fn add_item(&self, name: &str, price: f64) -> MenuItem {
        self.catalog
            .create_item(MenuItemCreate {
                name: name.to_string(),
                description: None,
                price,
                category: "main_course".to_string(),
                is_available: None,
            })
            .unwrap()
    }

    pub fn add_table(&self, number: u32) -> DiningTable {
        self.ledger
            .create_table(DiningTableCreate {
                number,
                capacity: 4,
            })
            .unwrap()
    }

    /// The worked example: 2×8.99 + 1×24.99 + 3×2.99 = 60.94
    pub fn open_example_order(&self, table_id: &str) -> Order {
        let pizza = self.add_item("Margherita", 8.99);
        let steak = self.add_item("Ribeye", 24.99);
        let cola = self.add_item("Cola", 2.99);

        self.workflow
            .create_order(OrderCreate {
                table_id: table_id.to_string(),
                staff_id: "waiter-1".to_string(),
                lines: vec![line(&pizza.id, 2), line(&steak.id, 1), line(&cola.id, 3)],
                notes: None,
            })
            .unwrap()
    }

    /// Drive an order from Pending all the way to Served
    pub fn serve(&self, order_id: &str) {
        self.workflow.transition(order_id, OrderStatus::Cooking).unwrap();
        self.workflow.transition(order_id, OrderStatus::Ready).unwrap();
        self.workflow.transition(order_id, OrderStatus::Served).unwrap();
    }

    /// Create a bill with the given tax rate and no discount/service charge
    pub fn bill(&self, order_id: &str, tax_rate: f64) -> shared::models::Bill {
        self.billing
            .create_bill(BillCreate {
                order_id: order_id.to_string(),
                cashier_id: "cashier-1".to_string(),
                tax_rate,
                discount_amount: 0.0,
                service_charge: 0.0,
                payment_method: "cash".to_string(),
            })
            .unwrap()
    }
}
