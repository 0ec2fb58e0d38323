use std::sync::Arc;

use serde_json::Value;

use crate::api::Api;
use crate::client::{HttpGateway, RequestOptions};
use crate::types::request::ListQuery;

use super::{ensure_ok, unwrap_list, ListPage, ServiceError};

/// Shopping cart operations for the signed-in user.
pub struct CartService {
    gateway: Arc<HttpGateway>,
    api: Api,
}

impl CartService {
    pub fn new(gateway: Arc<HttpGateway>, api: Api) -> Self {
        Self { gateway, api }
    }

    pub async fn add(&self, body: Value) -> Result<Value, ServiceError> {
        let envelope = self
            .gateway
            .request(&self.api.cart(), RequestOptions::post(body).with_auth())
            .await?;
        ensure_ok(envelope, "Unable to add item to cart")
    }

    pub async fn update(&self, cart_item_id: &str, body: Value) -> Result<Value, ServiceError> {
        let envelope = self
            .gateway
            .request(
                &self.api.cart_item(cart_item_id),
                RequestOptions::patch(Some(body)).with_auth(),
            )
            .await?;
        ensure_ok(envelope, "Unable to update cart")
    }

    pub async fn remove(&self, cart_item_id: &str) -> Result<Value, ServiceError> {
        let envelope = self
            .gateway
            .request(
                &self.api.cart_item(cart_item_id),
                RequestOptions::delete().with_auth(),
            )
            .await?;
        ensure_ok(envelope, "Unable to remove item from cart")
    }

    /// Empties the whole cart.
    pub async fn clear(&self) -> Result<Value, ServiceError> {
        let envelope = self
            .gateway
            .request(&self.api.cart(), RequestOptions::delete().with_auth())
            .await?;
        ensure_ok(envelope, "Unable to clear cart")
    }

    pub async fn list(&self, query: &ListQuery) -> Result<ListPage, ServiceError> {
        let url = format!("{}{}", self.api.cart_list(), query.to_query_string());
        let envelope = self
            .gateway
            .request(&url, RequestOptions::get().with_auth())
            .await?;
        let payload = ensure_ok(envelope, "Unable to load cart")?;
        Ok(unwrap_list(payload))
    }
}
