//! Transient notifications raised for staff.

use std::time::{Duration, Instant};

use shared::domain::{OrderId, OrderStatus};

/// How long a toast stays on screen.
pub const TOAST_LIFETIME: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    NewOrder,
    OrderRemoved,
    StatusUpdated,
    OrderDeleted,
    LoadFailed,
    UpdateFailed {
        reason: Option<String>,
    },
    DeleteFailed {
        reason: Option<String>,
    },
    InvalidTransition {
        order_id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    },
    OrderNotFound,
    ConnectionLost,
}

impl Notice {
    pub fn level(&self) -> NoticeLevel {
        match self {
            Notice::NewOrder | Notice::OrderRemoved | Notice::StatusUpdated | Notice::OrderDeleted => {
                NoticeLevel::Success
            }
            Notice::OrderNotFound | Notice::ConnectionLost => NoticeLevel::Warning,
            Notice::LoadFailed
            | Notice::UpdateFailed { .. }
            | Notice::DeleteFailed { .. }
            | Notice::InvalidTransition { .. } => NoticeLevel::Error,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub notice: Notice,
    pub raised_at: Instant,
}

impl Toast {
    pub fn new(notice: Notice) -> Self {
        Self {
            notice,
            raised_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.raised_at) >= TOAST_LIFETIME
    }
}
