//! Terminal and HTML-file renditions of the board.

use std::{
    fmt::Write as _,
    fs,
    io::{self, Write as _},
    path::PathBuf,
    time::Instant,
};

use client_core::{
    escape_html, render_html, BoardView, DisplaySurface, Locale, NoticeLevel, Toast,
};
use tracing::warn;

const RESET: &str = "\x1B[0m";

fn level_color(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Success => "\x1B[32m",
        NoticeLevel::Warning => "\x1B[33m",
        NoticeLevel::Error => "\x1B[31m",
    }
}

/// Plain-text board with active toasts on top.
pub fn format_board(view: &BoardView, toasts: &[Toast], locale: Locale) -> String {
    let mut out = String::new();

    for toast in toasts {
        let _ = writeln!(
            out,
            "{}{}{RESET}",
            level_color(toast.notice.level()),
            locale.notice_text(&toast.notice)
        );
    }
    if !toasts.is_empty() {
        out.push('\n');
    }

    let _ = writeln!(out, "Kitchen orders [{}]  {}", view.filter, view.pending_label);
    out.push_str("------------------------------------------------\n");

    if let Some(placeholder) = &view.empty_placeholder {
        let _ = writeln!(out, "{placeholder}");
        return out;
    }

    for card in &view.cards {
        let _ = writeln!(
            out,
            "#{} {}  [{}]  ⏰ {}",
            card.order_id, card.order_number, card.badge.label, card.time
        );
        for line in &card.lines {
            let _ = writeln!(out, "  {}x {:<20} ${}", line.quantity, line.name, line.subtotal);
        }
        if let Some(notes) = &card.notes {
            let _ = writeln!(out, "  {} {}", card.notes_label, notes);
        }
        let _ = writeln!(out, "  {} ${}", card.total_label, card.total);

        match &card.action {
            Some(action) => {
                let _ = writeln!(
                    out,
                    "  a {id}: {}   d {id}: {}",
                    action.label,
                    card.delete_label,
                    id = card.order_id
                );
            }
            None => {
                let _ = writeln!(out, "  d {}: {}", card.order_id, card.delete_label);
            }
        }
        out.push('\n');
    }
    out
}

pub struct TerminalSurface {
    locale: Locale,
    view: Option<BoardView>,
    toasts: Vec<Toast>,
}

impl TerminalSurface {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            view: None,
            toasts: Vec::new(),
        }
    }

    fn redraw(&self) {
        let Some(view) = &self.view else {
            return;
        };
        let mut stdout = io::stdout().lock();
        // Move cursor to top-left and clear screen
        let _ = write!(stdout, "\x1B[H\x1B[0J");
        let _ = write!(stdout, "{}", format_board(view, &self.toasts, self.locale));
        let _ = stdout.flush();
    }
}

impl DisplaySurface for TerminalSurface {
    fn render(&mut self, view: &BoardView) {
        self.view = Some(view.clone());
        let now = Instant::now();
        self.toasts.retain(|toast| !toast.is_expired(now));
        self.redraw();
    }

    fn notify(&mut self, toast: Toast) {
        self.toasts.push(toast);
        self.redraw();
    }

    fn tick(&mut self) {
        let now = Instant::now();
        let before = self.toasts.len();
        self.toasts.retain(|toast| !toast.is_expired(now));
        if self.toasts.len() != before {
            self.redraw();
        }
    }
}

/// Full HTML page around the board fragment, with active toasts as alerts.
pub fn html_page(view: &BoardView, toasts: &[Toast], locale: Locale) -> String {
    let mut page = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <meta http-equiv=\"refresh\" content=\"2\">\n<title>Kitchen Orders</title>\n</head>\n<body>\n",
    );
    for toast in toasts {
        let class = match toast.notice.level() {
            NoticeLevel::Success => "alert-success",
            NoticeLevel::Warning => "alert-warning",
            NoticeLevel::Error => "alert-danger",
        };
        let _ = writeln!(
            page,
            r#"<div class="alert {class}">{}</div>"#,
            escape_html(&locale.notice_text(&toast.notice))
        );
    }
    page.push_str(&render_html(view));
    page.push_str("</body>\n</html>\n");
    page
}

/// Rewrites an HTML file on every render, for a browser pointed at it.
pub struct HtmlFileSurface {
    path: PathBuf,
    locale: Locale,
    view: Option<BoardView>,
    toasts: Vec<Toast>,
}

impl HtmlFileSurface {
    pub fn new(path: PathBuf, locale: Locale) -> Self {
        Self {
            path,
            locale,
            view: None,
            toasts: Vec::new(),
        }
    }

    fn write(&self) {
        let Some(view) = &self.view else {
            return;
        };
        if let Err(err) = fs::write(&self.path, html_page(view, &self.toasts, self.locale)) {
            warn!(path = %self.path.display(), error = %err, "surface: html write failed");
        }
    }
}

impl DisplaySurface for HtmlFileSurface {
    fn render(&mut self, view: &BoardView) {
        self.view = Some(view.clone());
        let now = Instant::now();
        self.toasts.retain(|toast| !toast.is_expired(now));
        self.write();
    }

    fn notify(&mut self, toast: Toast) {
        self.toasts.push(toast);
        self.write();
    }

    fn tick(&mut self) {
        let now = Instant::now();
        let before = self.toasts.len();
        self.toasts.retain(|toast| !toast.is_expired(now));
        if self.toasts.len() != before {
            self.write();
        }
    }
}

#[cfg(test)]
#[path = "tests/surface_tests.rs"]
mod tests;
