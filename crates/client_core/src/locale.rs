//! Display strings for the board.

use std::{fmt, str::FromStr};

use shared::domain::OrderStatus;

use crate::notice::Notice;

/// Marker shown in place of an order time that could not be parsed.
pub const INVALID_TIME: &str = "invalid time";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    ZhTw,
    En,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "zh-tw" | "zh" => Ok(Locale::ZhTw),
            "en" | "en-us" => Ok(Locale::En),
            other => Err(format!("unsupported locale '{other}'")),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::ZhTw => f.write_str("zh-TW"),
            Locale::En => f.write_str("en"),
        }
    }
}

impl Locale {
    pub fn status_label(self, status: OrderStatus) -> &'static str {
        match (self, status) {
            (Locale::ZhTw, OrderStatus::Pending) => "待處理",
            (Locale::ZhTw, OrderStatus::Received) => "已接單",
            (Locale::ZhTw, OrderStatus::Cooking) => "烹調中",
            (Locale::ZhTw, OrderStatus::Ready) => "準備好",
            (Locale::ZhTw, OrderStatus::Completed) => "已完成",
            (Locale::ZhTw, OrderStatus::Unknown) => "未知",
            (Locale::En, OrderStatus::Pending) => "Pending",
            (Locale::En, OrderStatus::Received) => "Received",
            (Locale::En, OrderStatus::Cooking) => "Cooking",
            (Locale::En, OrderStatus::Ready) => "Ready",
            (Locale::En, OrderStatus::Completed) => "Completed",
            (Locale::En, OrderStatus::Unknown) => "Unknown",
        }
    }

    /// Label of the button that moves an order into `next`.
    pub fn action_label(self, next: OrderStatus) -> &'static str {
        match (self, next) {
            (Locale::ZhTw, OrderStatus::Received) => "👀 接單",
            (Locale::ZhTw, OrderStatus::Cooking) => "🍳 開始烹調",
            (Locale::ZhTw, OrderStatus::Ready) => "✅ 標記完成",
            (Locale::ZhTw, OrderStatus::Completed) => "✔️ 訂單送達",
            (Locale::En, OrderStatus::Received) => "👀 Accept",
            (Locale::En, OrderStatus::Cooking) => "🍳 Start cooking",
            (Locale::En, OrderStatus::Ready) => "✅ Mark ready",
            (Locale::En, OrderStatus::Completed) => "✔️ Delivered",
            (_, _) => "",
        }
    }

    pub fn delete_label(self) -> &'static str {
        match self {
            Locale::ZhTw => "🗑️ 刪除訂單",
            Locale::En => "🗑️ Delete order",
        }
    }

    pub fn delete_prompt(self) -> &'static str {
        match self {
            Locale::ZhTw => "確定要刪除此訂單嗎？此操作無法復原！",
            Locale::En => "Delete this order? This cannot be undone!",
        }
    }

    pub fn no_orders(self) -> &'static str {
        match self {
            Locale::ZhTw => "目前沒有訂單",
            Locale::En => "No orders",
        }
    }

    pub fn pending_count(self, count: usize) -> String {
        match self {
            Locale::ZhTw => format!("{count} 待處理"),
            Locale::En => format!("{count} pending"),
        }
    }

    pub fn items_heading(self) -> &'static str {
        match self {
            Locale::ZhTw => "項目：",
            Locale::En => "Items:",
        }
    }

    pub fn notes_label(self) -> &'static str {
        match self {
            Locale::ZhTw => "備註：",
            Locale::En => "Notes:",
        }
    }

    pub fn total_label(self) -> &'static str {
        match self {
            Locale::ZhTw => "總計：",
            Locale::En => "Total:",
        }
    }

    pub fn notice_text(self, notice: &Notice) -> String {
        match self {
            Locale::ZhTw => match notice {
                Notice::NewOrder => "收到新訂單！".to_string(),
                Notice::OrderRemoved => "訂單已刪除".to_string(),
                Notice::StatusUpdated => "訂單狀態更新成功".to_string(),
                Notice::OrderDeleted => "訂單已成功刪除".to_string(),
                Notice::LoadFailed => "載入訂單時發生錯誤".to_string(),
                Notice::UpdateFailed { reason: Some(reason) } => {
                    format!("更新訂單狀態失敗: {reason}")
                }
                Notice::UpdateFailed { reason: None } => "更新狀態時發生錯誤".to_string(),
                Notice::DeleteFailed { reason: Some(reason) } => format!("刪除訂單失敗: {reason}"),
                Notice::DeleteFailed { reason: None } => "刪除訂單時發生錯誤".to_string(),
                Notice::InvalidTransition { order_id, from, to } => format!(
                    "訂單 {order_id} 無法從「{}」變更為「{}」",
                    self.status_label(*from),
                    self.status_label(*to)
                ),
                Notice::OrderNotFound => "訂單已不存在，正在重新載入".to_string(),
                Notice::ConnectionLost => "無法連接到伺服器，請檢查網絡".to_string(),
            },
            Locale::En => match notice {
                Notice::NewOrder => "New order received!".to_string(),
                Notice::OrderRemoved => "Order removed".to_string(),
                Notice::StatusUpdated => "Order status updated".to_string(),
                Notice::OrderDeleted => "Order deleted".to_string(),
                Notice::LoadFailed => "Failed to load orders".to_string(),
                Notice::UpdateFailed { reason: Some(reason) } => {
                    format!("Failed to update order status: {reason}")
                }
                Notice::UpdateFailed { reason: None } => {
                    "An error occurred while updating the status".to_string()
                }
                Notice::DeleteFailed { reason: Some(reason) } => {
                    format!("Failed to delete order: {reason}")
                }
                Notice::DeleteFailed { reason: None } => {
                    "An error occurred while deleting the order".to_string()
                }
                Notice::InvalidTransition { order_id, from, to } => format!(
                    "Order {order_id} cannot move from {} to {}",
                    self.status_label(*from),
                    self.status_label(*to)
                ),
                Notice::OrderNotFound => "Order no longer exists, reloading".to_string(),
                Notice::ConnectionLost => {
                    "Cannot reach the server, please check the network".to_string()
                }
            },
        }
    }
}
