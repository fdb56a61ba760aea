use super::{format_board, html_page, HtmlFileSurface};

use std::{
    env, fs,
    time::{Duration, Instant, SystemTime, UNIX_EPOCH},
};

use client_core::{reduce, BoardEvent, BoardState, BoardView, DisplaySurface, Locale, Notice, Toast};
use rust_decimal::Decimal;
use shared::domain::{Filter, Order, OrderId, OrderItem, OrderStatus};

fn order(id: i64, status: OrderStatus) -> Order {
    Order {
        id: OrderId(id),
        order_number: format!("ORD{id:04}"),
        status,
        items: vec![OrderItem {
            name: "Fries <large>".to_string(),
            quantity: 2,
            unit_price: Decimal::new(150, 2),
        }],
        notes: Some("no salt".to_string()),
        total_amount: Decimal::new(300, 2),
        created_at: "2024-01-01T10:00:00Z".to_string(),
        updated_at: None,
    }
}

fn view_of(orders: Vec<Order>, filter: Filter, locale: Locale) -> BoardView {
    let mut state = BoardState::new(filter);
    reduce(&mut state, BoardEvent::Reloaded(orders));
    BoardView::project(&state, locale)
}

#[test]
fn terminal_board_lists_cards_with_actions() {
    let view = view_of(
        vec![order(1, OrderStatus::Pending), order(2, OrderStatus::Completed)],
        Filter::All,
        Locale::En,
    );
    let text = format_board(&view, &[], Locale::En);

    assert!(text.contains("Kitchen orders [all]  1 pending"));
    assert!(text.contains("#1 ORD0001  [Pending]"));
    assert!(text.contains("2x Fries <large>"));
    assert!(text.contains("$3.00"));
    assert!(text.contains("Notes: no salt"));
    assert!(text.contains("a 1: 👀 Accept"));
    assert!(text.contains("d 2: 🗑️ Delete order"));
    assert!(!text.contains("a 2:"));
}

#[test]
fn terminal_board_shows_placeholder_and_toasts() {
    let view = view_of(Vec::new(), Filter::Only(OrderStatus::Ready), Locale::ZhTw);
    let toasts = [Toast::new(Notice::NewOrder)];
    let text = format_board(&view, &toasts, Locale::ZhTw);

    assert!(text.contains("收到新訂單！"));
    assert!(text.contains("[ready]"));
    assert!(text.contains("目前沒有訂單"));
}

#[test]
fn html_page_escapes_toasts_and_wraps_fragment() {
    let view = view_of(vec![order(7, OrderStatus::Cooking)], Filter::All, Locale::En);
    let toasts = [Toast::new(Notice::UpdateFailed {
        reason: Some("<bad>".to_string()),
    })];
    let page = html_page(&view, &toasts, Locale::En);

    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.contains(r#"<div class="alert alert-danger">"#));
    assert!(page.contains("&lt;bad&gt;"));
    assert!(page.contains(r#"data-order-id="7""#));
    assert!(page.contains("Fries &lt;large&gt;"));
    assert!(page.trim_end().ends_with("</html>"));
}

#[test]
fn html_page_escapes_quotes_in_toasts() {
    let view = view_of(Vec::new(), Filter::All, Locale::En);
    let toasts = [Toast::new(Notice::DeleteFailed {
        reason: Some("can't \"delete\"".to_string()),
    })];
    let page = html_page(&view, &toasts, Locale::En);

    assert!(page.contains("can&#39;t &quot;delete&quot;"));
    assert!(!page.contains("can't"));
}

#[test]
fn html_surface_drops_expired_toasts_on_tick() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("kitchen_display_surface_test_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join("board.html");

    let mut surface = HtmlFileSurface::new(path.clone(), Locale::En);
    surface.render(&view_of(Vec::new(), Filter::All, Locale::En));
    assert!(fs::read_to_string(&path).expect("page").contains("No orders"));

    let stale = Toast {
        notice: Notice::ConnectionLost,
        raised_at: Instant::now()
            .checked_sub(Duration::from_secs(10))
            .expect("instant in the past"),
    };
    surface.notify(stale);
    assert!(fs::read_to_string(&path).expect("page").contains("alert-warning"));

    surface.tick();
    assert!(!fs::read_to_string(&path).expect("page").contains("alert-warning"));

    fs::remove_dir_all(temp_root).expect("cleanup");
}
