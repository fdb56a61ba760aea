//! Single-task event loop driving the board.

use std::time::{Duration, Instant};

use shared::domain::{Filter, OrderId, OrderStatus};
use tokio::{
    sync::mpsc,
    time::{interval, interval_at, Interval, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{
    api::OrdersApi,
    controller::{Answered, BoardController},
    realtime::ChannelEvent,
};

pub const DEFAULT_RELOAD_INTERVAL: Duration = Duration::from_secs(30);
const CONFIRMATION_CHECK_INTERVAL: Duration = Duration::from_secs(1);

/// Staff input delivered to the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardCommand {
    SetFilter(Filter),
    Advance(OrderId),
    SetStatus {
        order_id: OrderId,
        status: OrderStatus,
    },
    /// `confirmed` carries the answer to the deletion prompt.
    Delete {
        order_id: OrderId,
        confirmed: bool,
    },
    Reload,
    Shutdown,
}

#[derive(Debug, Clone, Copy)]
pub struct RuntimeOptions {
    pub reload_interval: Duration,
    pub confirmation_check_interval: Duration,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            reload_interval: DEFAULT_RELOAD_INTERVAL,
            confirmation_check_interval: CONFIRMATION_CHECK_INTERVAL,
        }
    }
}

/// Folds channel events, commands and timers into the controller until shutdown.
///
/// Pending channel events are always drained before the next command.
pub async fn run_board<A: OrdersApi>(
    controller: &mut BoardController<A>,
    mut channel: mpsc::Receiver<ChannelEvent>,
    mut commands: mpsc::Receiver<BoardCommand>,
    options: RuntimeOptions,
) {
    let mut reload_timer: Option<Interval> = None;
    let mut confirmation_timer = interval(options.confirmation_check_interval);
    confirmation_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut channel_open = true;

    controller.render();
    loop {
        tokio::select! {
            biased;
            event = channel.recv(), if channel_open => match event {
                Some(ChannelEvent::Connected) => {
                    info!("runtime: channel connected, reloading orders");
                    controller.reload_all().await;
                    reload_timer = Some(periodic(options.reload_interval));
                }
                Some(ChannelEvent::Push(event)) => controller.apply_event(event.into()),
                Some(ChannelEvent::Disconnected(reason)) => controller.connection_lost(&reason),
                None => {
                    warn!("runtime: realtime channel closed");
                    channel_open = false;
                }
            },
            command = commands.recv() => match command {
                Some(BoardCommand::Shutdown) | None => {
                    info!("runtime: shutting down");
                    break;
                }
                Some(command) => handle_command(controller, command).await,
            },
            _ = next_tick(&mut reload_timer) => {
                debug!("runtime: periodic reload");
                controller.reload_all().await;
            }
            _ = confirmation_timer.tick() => {
                controller.expire_confirmations(Instant::now()).await;
                controller.tick_surface();
            }
        }
    }
}

async fn handle_command<A: OrdersApi>(controller: &mut BoardController<A>, command: BoardCommand) {
    debug!(?command, "runtime: command received");
    match command {
        BoardCommand::SetFilter(filter) => controller.set_filter(filter).await,
        BoardCommand::Advance(order_id) => {
            controller.advance(order_id).await;
        }
        BoardCommand::SetStatus { order_id, status } => {
            controller.request_status_change(order_id, status).await;
        }
        BoardCommand::Delete {
            order_id,
            confirmed,
        } => {
            controller
                .request_deletion(order_id, &Answered(confirmed))
                .await;
        }
        BoardCommand::Reload => controller.reload_all().await,
        BoardCommand::Shutdown => {}
    }
}

fn periodic(period: Duration) -> Interval {
    let mut timer = interval_at(tokio::time::Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

async fn next_tick(timer: &mut Option<Interval>) {
    match timer {
        Some(timer) => {
            timer.tick().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
