//! Owns the board state and turns staff commands into backend calls.
//!
//! Commands never touch the cache directly. A successful call is recorded as an
//! awaited confirmation and the cache changes only when the matching push event
//! arrives; if it does not arrive in time the whole list is reloaded.

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use shared::domain::{Filter, OrderId, OrderStatus};
use tracing::{debug, info, warn};

use crate::{
    api::OrdersApi,
    error::BoardError,
    locale::Locale,
    notice::{Notice, Toast},
    reconcile::{reduce, BoardEvent, BoardState},
    render::BoardView,
    surface::DisplaySurface,
};

pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Explicit staff approval for irreversible actions.
pub trait Confirmer: Send + Sync {
    fn confirm(&self, order_id: OrderId, prompt: &str) -> bool;
}

/// An answer collected before the command reached the controller.
#[derive(Debug, Clone, Copy)]
pub struct Answered(pub bool);

impl Confirmer for Answered {
    fn confirm(&self, _order_id: OrderId, _prompt: &str) -> bool {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Accepted by the backend; waiting for the push confirmation.
    Sent,
    /// Accepted and already reflected in the cache.
    AlreadyApplied,
    /// Refused locally without contacting the backend.
    Refused,
    /// Staff declined the confirmation prompt.
    Cancelled,
    /// The order no longer exists; the board was reloaded.
    Reloaded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AwaitedChange {
    Status(OrderStatus),
    Deletion,
}

#[derive(Debug, Clone, Copy)]
struct Awaited {
    change: AwaitedChange,
    deadline: Instant,
}

pub struct BoardController<A: OrdersApi> {
    api: A,
    surface: Box<dyn DisplaySurface>,
    locale: Locale,
    state: BoardState,
    awaiting: HashMap<OrderId, Awaited>,
    confirmation_timeout: Duration,
}

impl<A: OrdersApi> BoardController<A> {
    pub fn new(api: A, surface: Box<dyn DisplaySurface>, locale: Locale, filter: Filter) -> Self {
        Self {
            api,
            surface,
            locale,
            state: BoardState::new(filter),
            awaiting: HashMap::new(),
            confirmation_timeout: DEFAULT_CONFIRMATION_TIMEOUT,
        }
    }

    pub fn with_confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = timeout;
        self
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn is_awaiting_confirmation(&self, order_id: OrderId) -> bool {
        self.awaiting.contains_key(&order_id)
    }

    pub fn render(&mut self) {
        let view = BoardView::project(&self.state, self.locale);
        self.surface.render(&view);
    }

    pub fn tick_surface(&mut self) {
        self.surface.tick();
    }

    fn notify(&mut self, notice: Notice) {
        self.surface.notify(Toast::new(notice));
    }

    /// Folds one event into the cache and re-renders.
    pub fn apply_event(&mut self, event: BoardEvent) {
        self.settle_awaited(&event);
        if let Some(notice) = reduce(&mut self.state, event) {
            self.notify(notice);
        }
        self.render();
    }

    fn settle_awaited(&mut self, event: &BoardEvent) {
        match event {
            BoardEvent::Updated(order) => {
                if let Some(awaited) = self.awaiting.get(&order.id) {
                    if awaited.change == AwaitedChange::Status(order.status) {
                        self.awaiting.remove(&order.id);
                        debug!(order_id = order.id.0, "controller: status change confirmed");
                    }
                }
            }
            BoardEvent::Deleted(order_id) => {
                if self.awaiting.get(order_id).map(|awaited| awaited.change)
                    == Some(AwaitedChange::Deletion)
                {
                    self.awaiting.remove(order_id);
                    debug!(order_id = order_id.0, "controller: deletion confirmed");
                }
            }
            BoardEvent::Reloaded(orders) => {
                let filter = self.state.filter();
                self.awaiting.retain(|order_id, awaited| {
                    let cached = orders.iter().find(|order| order.id == *order_id);
                    match (awaited.change, cached) {
                        (AwaitedChange::Deletion, None) => false,
                        (AwaitedChange::Status(status), Some(order)) => order.status != status,
                        // Absent from the filtered list: still awaited if the filter would show
                        // the new status, confirmed if the filter hides it.
                        (AwaitedChange::Status(status), None) => filter.matches(status),
                        (AwaitedChange::Deletion, Some(_)) => true,
                    }
                });
            }
            BoardEvent::Created(_) => {}
        }
    }

    /// Replaces the cache with the backend's list for the active filter.
    pub async fn reload_all(&mut self) {
        let filter = self.state.filter();
        match self.api.list_orders(filter).await {
            Ok(orders) => {
                info!(filter = %filter, count = orders.len(), "controller: orders reloaded");
                self.apply_event(BoardEvent::Reloaded(orders));
            }
            Err(err) => {
                warn!(filter = %filter, error = %err, "controller: order reload failed");
                self.notify(Notice::LoadFailed);
            }
        }
    }

    pub async fn set_filter(&mut self, filter: Filter) {
        info!(filter = %filter, "controller: filter changed");
        self.state.set_filter(filter);
        self.render();
        self.reload_all().await;
    }

    /// Requests the successor of the order's cached status.
    pub async fn advance(&mut self, order_id: OrderId) -> CommandOutcome {
        let Some(current) = self.state.get(order_id).map(|order| order.status) else {
            warn!(order_id = order_id.0, "controller: advance requested for uncached order");
            self.notify(Notice::OrderNotFound);
            self.reload_all().await;
            return CommandOutcome::Reloaded;
        };
        match current.next() {
            Some(next) => self.request_status_change(order_id, next).await,
            None => {
                warn!(order_id = order_id.0, status = %current, "controller: order has no next status");
                CommandOutcome::Refused
            }
        }
    }

    pub async fn request_status_change(
        &mut self,
        order_id: OrderId,
        next: OrderStatus,
    ) -> CommandOutcome {
        if let Some(order) = self.state.get(order_id) {
            if order.status.next() != Some(next) {
                let from = order.status;
                warn!(
                    order_id = order_id.0,
                    from = %from,
                    to = %next,
                    "controller: refusing non-linear status change"
                );
                self.notify(Notice::InvalidTransition {
                    order_id,
                    from,
                    to: next,
                });
                return CommandOutcome::Refused;
            }
        }

        match self.api.update_status(order_id, next).await {
            Ok(()) => {
                info!(order_id = order_id.0, status = %next, "controller: status change accepted");
                self.notify(Notice::StatusUpdated);
                let applied = self
                    .state
                    .get(order_id)
                    .is_some_and(|order| order.status == next);
                if applied {
                    CommandOutcome::AlreadyApplied
                } else {
                    self.await_change(order_id, AwaitedChange::Status(next));
                    CommandOutcome::Sent
                }
            }
            Err(err) => {
                self.handle_command_failure(order_id, err, |reason| Notice::UpdateFailed {
                    reason,
                })
                .await
            }
        }
    }

    pub async fn request_deletion(
        &mut self,
        order_id: OrderId,
        confirmer: &dyn Confirmer,
    ) -> CommandOutcome {
        if !confirmer.confirm(order_id, self.locale.delete_prompt()) {
            info!(order_id = order_id.0, "controller: deletion cancelled");
            return CommandOutcome::Cancelled;
        }

        match self.api.delete_order(order_id).await {
            Ok(()) => {
                info!(order_id = order_id.0, "controller: deletion accepted");
                self.notify(Notice::OrderDeleted);
                if self.state.get(order_id).is_none() {
                    CommandOutcome::AlreadyApplied
                } else {
                    self.await_change(order_id, AwaitedChange::Deletion);
                    CommandOutcome::Sent
                }
            }
            Err(err) => {
                self.handle_command_failure(order_id, err, |reason| Notice::DeleteFailed {
                    reason,
                })
                .await
            }
        }
    }

    async fn handle_command_failure(
        &mut self,
        order_id: OrderId,
        err: BoardError,
        notice: impl FnOnce(Option<String>) -> Notice,
    ) -> CommandOutcome {
        if err.is_not_found() {
            warn!(order_id = order_id.0, "controller: order missing on backend, reloading");
            self.notify(Notice::OrderNotFound);
            self.reload_all().await;
            return CommandOutcome::Reloaded;
        }
        warn!(order_id = order_id.0, error = %err, "controller: command failed");
        self.notify(notice(err.reason().map(str::to_string)));
        CommandOutcome::Failed
    }

    fn await_change(&mut self, order_id: OrderId, change: AwaitedChange) {
        self.awaiting.insert(
            order_id,
            Awaited {
                change,
                deadline: Instant::now() + self.confirmation_timeout,
            },
        );
    }

    /// Drops confirmations whose deadline passed and reloads once if any did.
    pub async fn expire_confirmations(&mut self, now: Instant) -> bool {
        let before = self.awaiting.len();
        self.awaiting.retain(|order_id, awaited| {
            let alive = awaited.deadline > now;
            if !alive {
                warn!(order_id = order_id.0, "controller: push confirmation missed");
            }
            alive
        });
        if self.awaiting.len() == before {
            return false;
        }
        self.reload_all().await;
        true
    }

    pub fn connection_lost(&mut self, reason: &str) {
        warn!(reason, "controller: realtime channel unavailable");
        self.notify(Notice::ConnectionLost);
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
