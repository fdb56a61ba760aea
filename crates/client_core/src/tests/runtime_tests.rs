use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use shared::{
    domain::Order,
    protocol::{OrderDeleted, PushEvent},
};

use super::*;
use crate::{
    error::BoardError,
    locale::Locale,
    tests_support::{order, RecordingSurface},
};

#[derive(Clone, Default)]
struct FakeApi {
    orders: Arc<Mutex<Vec<Order>>>,
    list_calls: Arc<Mutex<Vec<Filter>>>,
    status_calls: Arc<Mutex<Vec<(OrderId, OrderStatus)>>>,
    delete_calls: Arc<Mutex<Vec<OrderId>>>,
}

impl FakeApi {
    fn list_count(&self) -> usize {
        self.list_calls.lock().expect("lock").len()
    }
}

#[async_trait]
impl OrdersApi for FakeApi {
    async fn list_orders(&self, filter: Filter) -> Result<Vec<Order>, BoardError> {
        self.list_calls.lock().expect("lock").push(filter);
        Ok(self.orders.lock().expect("lock").clone())
    }

    async fn update_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<(), BoardError> {
        self.status_calls
            .lock()
            .expect("lock")
            .push((order_id, status));
        Ok(())
    }

    async fn delete_order(&self, order_id: OrderId) -> Result<(), BoardError> {
        self.delete_calls.lock().expect("lock").push(order_id);
        Ok(())
    }
}

fn controller_with(api: FakeApi) -> (BoardController<FakeApi>, RecordingSurface) {
    let surface = RecordingSurface::default();
    let controller = BoardController::new(
        api,
        Box::new(surface.clone()),
        Locale::En,
        Filter::All,
    );
    (controller, surface)
}

#[tokio::test]
async fn connection_triggers_reload_then_push_events_apply() {
    let api = FakeApi::default();
    *api.orders.lock().expect("lock") = vec![order(1, OrderStatus::Pending, "2024-01-01T10:00:00")];
    let (mut controller, surface) = controller_with(api.clone());
    let (channel_tx, channel_rx) = mpsc::channel(16);
    let (command_tx, command_rx) = mpsc::channel(16);

    channel_tx.send(ChannelEvent::Connected).await.expect("send");
    channel_tx
        .send(ChannelEvent::Push(PushEvent::NewOrder(order(
            2,
            OrderStatus::Pending,
            "2024-01-01T11:00:00",
        ))))
        .await
        .expect("send");
    channel_tx
        .send(ChannelEvent::Push(PushEvent::OrderDeleted(OrderDeleted {
            order_id: OrderId(1),
        })))
        .await
        .expect("send");
    channel_tx
        .send(ChannelEvent::Disconnected("reset".to_string()))
        .await
        .expect("send");
    command_tx.send(BoardCommand::Shutdown).await.expect("send");

    run_board(
        &mut controller,
        channel_rx,
        command_rx,
        RuntimeOptions::default(),
    )
    .await;

    assert_eq!(api.list_count(), 1);
    let ids: Vec<i64> = controller
        .state()
        .orders()
        .iter()
        .map(|order| order.id.0)
        .collect();
    assert_eq!(ids, vec![2]);
    assert_eq!(surface.last_view().pending_count, 1);
    assert!(surface.notices().contains(&crate::notice::Notice::ConnectionLost));
}

#[tokio::test]
async fn commands_reach_the_backend() {
    let api = FakeApi::default();
    *api.orders.lock().expect("lock") = vec![order(1, OrderStatus::Received, "2024-01-01T10:00:00")];
    let (mut controller, _surface) = controller_with(api.clone());
    let (channel_tx, channel_rx) = mpsc::channel(16);
    let (command_tx, command_rx) = mpsc::channel(16);

    channel_tx.send(ChannelEvent::Connected).await.expect("send");
    for command in [
        BoardCommand::Advance(OrderId(1)),
        BoardCommand::Delete {
            order_id: OrderId(1),
            confirmed: false,
        },
        BoardCommand::Delete {
            order_id: OrderId(1),
            confirmed: true,
        },
        BoardCommand::SetFilter(Filter::Only(OrderStatus::Cooking)),
        BoardCommand::Shutdown,
    ] {
        command_tx.send(command).await.expect("send");
    }

    run_board(
        &mut controller,
        channel_rx,
        command_rx,
        RuntimeOptions::default(),
    )
    .await;

    assert_eq!(
        api.status_calls.lock().expect("lock").clone(),
        vec![(OrderId(1), OrderStatus::Cooking)]
    );
    assert_eq!(api.delete_calls.lock().expect("lock").clone(), vec![OrderId(1)]);
    assert_eq!(
        api.list_calls.lock().expect("lock").clone(),
        vec![Filter::All, Filter::Only(OrderStatus::Cooking)]
    );
}

#[tokio::test]
async fn periodic_reload_runs_after_connect() {
    let api = FakeApi::default();
    let (mut controller, _surface) = controller_with(api.clone());
    let (channel_tx, channel_rx) = mpsc::channel(16);
    let (command_tx, command_rx) = mpsc::channel(16);
    channel_tx.send(ChannelEvent::Connected).await.expect("send");

    let options = RuntimeOptions {
        reload_interval: Duration::from_millis(20),
        ..RuntimeOptions::default()
    };
    tokio::join!(
        run_board(&mut controller, channel_rx, command_rx, options),
        async {
            tokio::time::sleep(Duration::from_millis(150)).await;
            command_tx.send(BoardCommand::Shutdown).await.expect("send");
        }
    );

    assert!(api.list_count() >= 3, "reloads: {}", api.list_count());
}

#[tokio::test]
async fn dropped_command_stream_stops_the_loop() {
    let (mut controller, _surface) = controller_with(FakeApi::default());
    let (_channel_tx, channel_rx) = mpsc::channel::<ChannelEvent>(1);
    let (command_tx, command_rx) = mpsc::channel(1);
    drop(command_tx);

    run_board(
        &mut controller,
        channel_rx,
        command_rx,
        RuntimeOptions::default(),
    )
    .await;
}
