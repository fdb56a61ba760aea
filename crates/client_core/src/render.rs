//! Projection of the cache into what the kitchen display shows.

use std::fmt::Write as _;

use chrono::{Local, TimeZone};
use rust_decimal::{Decimal, RoundingStrategy};
use shared::domain::{Filter, Order, OrderId, OrderStatus};
use tracing::warn;

use crate::{
    locale::{Locale, INVALID_TIME},
    reconcile::{parse_timestamp, BoardState},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub filter: Filter,
    pub pending_count: usize,
    pub pending_label: String,
    pub cards: Vec<OrderCard>,
    /// Placeholder text, present only when no card matches the filter.
    pub empty_placeholder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderCard {
    pub order_id: OrderId,
    pub order_number: String,
    pub status: OrderStatus,
    pub badge: StatusBadge,
    pub time: String,
    pub items_heading: String,
    pub lines: Vec<ItemLine>,
    pub notes: Option<String>,
    pub notes_label: String,
    pub total_label: String,
    pub total: String,
    pub action: Option<StatusAction>,
    pub delete_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBadge {
    pub label: String,
    pub css_class: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemLine {
    pub quantity: u32,
    pub name: String,
    pub subtotal: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusAction {
    pub next: OrderStatus,
    pub label: String,
    pub css_class: &'static str,
}

impl BoardView {
    pub fn project(state: &BoardState, locale: Locale) -> Self {
        Self::project_in(state, locale, &Local)
    }

    pub fn project_in<Tz: TimeZone>(state: &BoardState, locale: Locale, tz: &Tz) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let pending_count = state.pending_count();
        let cards: Vec<OrderCard> = state
            .visible()
            .map(|order| OrderCard::project(order, locale, tz))
            .collect();
        let empty_placeholder = cards
            .is_empty()
            .then(|| locale.no_orders().to_string());

        Self {
            filter: state.filter(),
            pending_count,
            pending_label: locale.pending_count(pending_count),
            cards,
            empty_placeholder,
        }
    }
}

impl OrderCard {
    fn project<Tz: TimeZone>(order: &Order, locale: Locale, tz: &Tz) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            order_id: order.id,
            order_number: order.order_number.clone(),
            status: order.status,
            badge: StatusBadge {
                label: locale.status_label(order.status).to_string(),
                css_class: badge_class(order.status),
            },
            time: format_order_time(order.id, &order.created_at, tz),
            items_heading: locale.items_heading().to_string(),
            lines: order
                .items
                .iter()
                .map(|item| ItemLine {
                    quantity: item.quantity,
                    name: item.name.clone(),
                    subtotal: format_money(item.subtotal()),
                })
                .collect(),
            notes: order
                .notes
                .as_deref()
                .map(str::trim)
                .filter(|notes| !notes.is_empty())
                .map(str::to_string),
            notes_label: locale.notes_label().to_string(),
            total_label: locale.total_label().to_string(),
            total: format_money(order.total_amount),
            action: order.status.next().map(|next| StatusAction {
                next,
                label: locale.action_label(next).to_string(),
                css_class: action_class(next),
            }),
            delete_label: locale.delete_label().to_string(),
        }
    }
}

pub fn format_money(amount: Decimal) -> String {
    format!(
        "{:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Local `HH:MM` of an order timestamp, or the invalid-time marker.
pub fn format_order_time<Tz: TimeZone>(order_id: OrderId, raw: &str, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match parse_timestamp(raw) {
        Some(created_at) => created_at.with_timezone(tz).format("%H:%M").to_string(),
        None => {
            warn!(order_id = order_id.0, created_at = raw, "render: unparseable order timestamp");
            INVALID_TIME.to_string()
        }
    }
}

fn badge_class(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "bg-warning",
        OrderStatus::Received => "bg-info",
        OrderStatus::Cooking => "bg-primary",
        OrderStatus::Ready => "bg-success",
        OrderStatus::Completed | OrderStatus::Unknown => "bg-secondary",
    }
}

fn action_class(next: OrderStatus) -> &'static str {
    match next {
        OrderStatus::Received => "btn-info",
        OrderStatus::Cooking => "btn-primary",
        OrderStatus::Ready => "btn-success",
        _ => "btn-secondary",
    }
}

/// Renders the board as an HTML fragment: pending counter, card list and placeholder.
pub fn render_html(view: &BoardView) -> String {
    let mut html = String::new();
    let _ = writeln!(
        html,
        r#"<span id="pending-count" class="badge bg-danger">{}</span>"#,
        escape_html(&view.pending_label)
    );
    html.push_str("<div id=\"orders-container\" class=\"row\">\n");
    for card in &view.cards {
        render_card(&mut html, card);
    }
    html.push_str("</div>\n");

    match &view.empty_placeholder {
        Some(text) => {
            let _ = writeln!(
                html,
                r#"<div id="no-orders" class="text-center">{}</div>"#,
                escape_html(text)
            );
        }
        None => html.push_str("<div id=\"no-orders\" class=\"text-center d-none\"></div>\n"),
    }
    html
}

fn render_card(html: &mut String, card: &OrderCard) {
    let _ = writeln!(
        html,
        r#"<div class="col-lg-4 col-md-6"><div class="order-card status-{status}" data-order-id="{id}">"#,
        status = card.status,
        id = card.order_id.0
    );
    let _ = writeln!(
        html,
        r#"<div class="order-header"><div class="order-number">{}</div><span class="badge {}">{}</span><div class="order-time">⏰ {}</div></div>"#,
        escape_html(&card.order_number),
        card.badge.css_class,
        escape_html(&card.badge.label),
        escape_html(&card.time)
    );

    let _ = writeln!(
        html,
        r#"<div class="order-items"><h6>{}</h6>"#,
        escape_html(&card.items_heading)
    );
    for line in &card.lines {
        let _ = writeln!(
            html,
            r#"<div class="order-item"><span>{}x {}</span><span class="text-success">${}</span></div>"#,
            line.quantity,
            escape_html(&line.name),
            line.subtotal
        );
    }
    html.push_str("</div>\n");

    if let Some(notes) = &card.notes {
        let _ = writeln!(
            html,
            r#"<div class="alert alert-info"><small><strong>{}</strong> {}</small></div>"#,
            escape_html(&card.notes_label),
            escape_html(notes)
        );
    }

    let _ = writeln!(
        html,
        r#"<div class="order-footer"><strong>{}<span class="order-total">${}</span></strong></div>"#,
        escape_html(&card.total_label),
        card.total
    );

    html.push_str("<div class=\"status-buttons\">");
    if let Some(action) = &card.action {
        let _ = write!(
            html,
            r#"<button class="btn {} btn-sm" data-action="status" data-order-id="{}" data-next-status="{}">{}</button>"#,
            action.css_class,
            card.order_id.0,
            action.next,
            escape_html(&action.label)
        );
    }
    html.push_str("</div>\n");
    let _ = writeln!(
        html,
        r#"<div><button class="btn btn-danger btn-sm" data-action="delete" data-order-id="{}">{}</button></div>"#,
        card.order_id.0,
        escape_html(&card.delete_label)
    );
    html.push_str("</div></div>\n");
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
