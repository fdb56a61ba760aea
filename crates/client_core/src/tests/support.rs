use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;
use shared::domain::{Order, OrderId, OrderItem, OrderStatus};

use crate::{notice::Toast, render::BoardView, surface::DisplaySurface};

pub fn order(id: i64, status: OrderStatus, created_at: &str) -> Order {
    Order {
        id: OrderId(id),
        order_number: format!("ORD20240101{id:04}"),
        status,
        items: vec![OrderItem {
            name: "Tea".to_string(),
            quantity: 2,
            unit_price: Decimal::new(150, 2),
        }],
        notes: None,
        total_amount: Decimal::new(300, 2),
        created_at: created_at.to_string(),
        updated_at: None,
    }
}

#[derive(Clone, Default)]
pub struct RecordingSurface {
    pub views: Arc<Mutex<Vec<BoardView>>>,
    pub toasts: Arc<Mutex<Vec<Toast>>>,
}

impl RecordingSurface {
    pub fn last_view(&self) -> BoardView {
        self.views
            .lock()
            .expect("views lock")
            .last()
            .cloned()
            .expect("at least one render")
    }

    pub fn notices(&self) -> Vec<crate::notice::Notice> {
        self.toasts
            .lock()
            .expect("toasts lock")
            .iter()
            .map(|toast| toast.notice.clone())
            .collect()
    }
}

impl DisplaySurface for RecordingSurface {
    fn render(&mut self, view: &BoardView) {
        self.views.lock().expect("views lock").push(view.clone());
    }

    fn notify(&mut self, toast: Toast) {
        self.toasts.lock().expect("toasts lock").push(toast);
    }
}
