//! Local order cache and the reducer that keeps it in step with the backend.

use std::{cmp::Reverse, collections::HashSet};

use chrono::{DateTime, NaiveDateTime, Utc};
use shared::{
    domain::{Filter, Order, OrderId, OrderStatus},
    protocol::PushEvent,
};

use crate::notice::Notice;

#[derive(Debug, Clone, Default)]
pub struct BoardState {
    orders: Vec<Order>,
    filter: Filter,
}

impl BoardState {
    pub fn new(filter: Filter) -> Self {
        Self {
            orders: Vec::new(),
            filter,
        }
    }

    /// Cached orders, newest first.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn get(&self, order_id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| order.id == order_id)
    }

    pub fn visible(&self) -> impl Iterator<Item = &Order> {
        let filter = self.filter;
        self.orders
            .iter()
            .filter(move |order| filter.matches(order.status))
    }

    /// Pending orders across the whole cache, ignoring the active filter.
    pub fn pending_count(&self) -> usize {
        self.orders
            .iter()
            .filter(|order| order.status == OrderStatus::Pending)
            .count()
    }
}

/// Inputs folded into the cache.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent {
    Reloaded(Vec<Order>),
    Created(Order),
    Updated(Order),
    Deleted(OrderId),
}

impl From<PushEvent> for BoardEvent {
    fn from(event: PushEvent) -> Self {
        match event {
            PushEvent::NewOrder(order) => BoardEvent::Created(order),
            PushEvent::OrderUpdated(order) => BoardEvent::Updated(order),
            PushEvent::OrderDeleted(deleted) => BoardEvent::Deleted(deleted.order_id),
        }
    }
}

/// Applies one event to the cache and returns the notification it raises, if any.
///
/// Every branch is idempotent per order id so repeated or reordered delivery of
/// the same event converges to the same cache.
pub fn reduce(state: &mut BoardState, event: BoardEvent) -> Option<Notice> {
    match event {
        BoardEvent::Reloaded(orders) => {
            let mut seen = HashSet::with_capacity(orders.len());
            state.orders = orders
                .into_iter()
                .filter(|order| seen.insert(order.id))
                .collect();
            sort_newest_first(&mut state.orders);
            None
        }
        BoardEvent::Created(order) => {
            match state.orders.iter_mut().find(|cached| cached.id == order.id) {
                Some(cached) => *cached = order,
                None => state.orders.insert(0, order),
            }
            sort_newest_first(&mut state.orders);
            Some(Notice::NewOrder)
        }
        BoardEvent::Updated(order) => {
            match state.orders.iter_mut().find(|cached| cached.id == order.id) {
                Some(cached) => *cached = order,
                None => state.orders.push(order),
            }
            sort_newest_first(&mut state.orders);
            None
        }
        BoardEvent::Deleted(order_id) => {
            state.orders.retain(|order| order.id != order_id);
            Some(Notice::OrderRemoved)
        }
    }
}

fn sort_newest_first(orders: &mut [Order]) {
    // Stable; orders with unparseable timestamps sink to the bottom.
    orders.sort_by_cached_key(|order| Reverse(parse_timestamp(&order.created_at)));
}

/// Parses a backend timestamp. Offset-less values are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    raw.replacen(' ', "T", 1)
        .parse::<NaiveDateTime>()
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
#[path = "tests/reconcile_tests.rs"]
mod tests;
