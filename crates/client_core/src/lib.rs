//! View-model of the kitchen order board.
//!
//! The board keeps a local cache of orders in step with the backend through a
//! full reload on connect, periodic reloads, and three push events. Staff
//! commands go to the backend over HTTP; the cache only changes when the
//! backend confirms through the push channel.

pub mod api;
pub mod controller;
pub mod error;
pub mod locale;
pub mod notice;
pub mod realtime;
pub mod reconcile;
pub mod render;
pub mod runtime;
pub mod surface;

pub use api::{HttpOrdersApi, OrdersApi};
pub use controller::{Answered, BoardController, CommandOutcome, Confirmer};
pub use error::BoardError;
pub use locale::Locale;
pub use notice::{Notice, NoticeLevel, Toast};
pub use realtime::{websocket_url, ChannelEvent, PushChannel};
pub use reconcile::{reduce, BoardEvent, BoardState};
pub use render::{escape_html, render_html, BoardView};
pub use runtime::{run_board, BoardCommand, RuntimeOptions};
pub use surface::DisplaySurface;

#[cfg(test)]
#[path = "tests/support.rs"]
mod tests_support;
