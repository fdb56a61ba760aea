use serde::{Deserialize, Serialize};

use crate::domain::{Order, OrderId, OrderStatus};

/// Body of `PUT /api/orders/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDeleted {
    pub order_id: OrderId,
}

/// Notifications pushed by the backend over the realtime channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum PushEvent {
    NewOrder(Order),
    OrderUpdated(Order),
    OrderDeleted(OrderDeleted),
}

impl PushEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PushEvent::NewOrder(_) => "new_order",
            PushEvent::OrderUpdated(_) => "order_updated",
            PushEvent::OrderDeleted(_) => "order_deleted",
        }
    }

    pub fn order_id(&self) -> OrderId {
        match self {
            PushEvent::NewOrder(order) | PushEvent::OrderUpdated(order) => order.id,
            PushEvent::OrderDeleted(deleted) => deleted.order_id,
        }
    }
}
