//! HTTP access to the orders backend.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use shared::{
    domain::{Filter, Order, OrderId, OrderStatus},
    error::ApiErrorBody,
    protocol::UpdateStatusRequest,
};
use tracing::{debug, warn};

use crate::error::BoardError;

#[async_trait]
pub trait OrdersApi: Send + Sync {
    async fn list_orders(&self, filter: Filter) -> Result<Vec<Order>, BoardError>;
    async fn update_status(&self, order_id: OrderId, status: OrderStatus)
        -> Result<(), BoardError>;
    async fn delete_order(&self, order_id: OrderId) -> Result<(), BoardError>;
}

pub struct HttpOrdersApi {
    http: Client,
    server_url: String,
}

impl HttpOrdersApi {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: impl Into<String>) -> Self {
        let server_url = server_url.into();
        Self {
            http,
            server_url: server_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }
}

#[async_trait]
impl OrdersApi for HttpOrdersApi {
    async fn list_orders(&self, filter: Filter) -> Result<Vec<Order>, BoardError> {
        let response = self
            .http
            .get(format!("{}/api/orders", self.server_url))
            .query(&[("filter", filter.as_query())])
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let records: Vec<serde_json::Value> = response.json().await?;
        let orders = decode_orders(records);
        debug!(filter = %filter, count = orders.len(), "orders: list fetched");
        Ok(orders)
    }

    async fn update_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<(), BoardError> {
        let response = self
            .http
            .put(format!("{}/api/orders/{}/status", self.server_url, order_id.0))
            .json(&UpdateStatusRequest { status })
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn delete_order(&self, order_id: OrderId) -> Result<(), BoardError> {
        let response = self
            .http
            .delete(format!("{}/api/orders/{}", self.server_url, order_id.0))
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}

/// Decodes each record on its own; one undecodable record is skipped, not fatal.
fn decode_orders(records: Vec<serde_json::Value>) -> Vec<Order> {
    records
        .into_iter()
        .filter_map(|record| {
            let id = record.get("id").cloned();
            match serde_json::from_value::<Order>(record) {
                Ok(order) => Some(order),
                Err(err) => {
                    warn!(id = ?id, error = %err, "orders: skipping undecodable record");
                    None
                }
            }
        })
        .collect()
}

async fn ensure_success(response: Response) -> Result<Response, BoardError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(BoardError::NotFound);
    }

    let body = response.text().await.unwrap_or_default();
    Err(classify_failure(status, &body))
}

pub(crate) fn classify_failure(status: StatusCode, body: &str) -> BoardError {
    if status == StatusCode::NOT_FOUND {
        return BoardError::NotFound;
    }
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => match parsed.reason() {
            Some(reason) => BoardError::Application {
                status,
                reason: reason.to_string(),
            },
            None => BoardError::Transport(format!("backend responded with {status}")),
        },
        Err(_) => BoardError::Transport(format!("backend responded with {status}")),
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
