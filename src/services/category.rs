use std::sync::Arc;

use serde_json::Value;

use crate::api::Api;
use crate::client::{HttpGateway, RequestOptions};
use crate::types::request::ListQuery;

use super::{ensure_ok, unwrap_array, unwrap_list, ListPage, ServiceError};

/// Category CRUD. Hard-error family: any HTTP failure is a
/// [`ServiceError`] with a normalized message.
pub struct CategoryService {
    gateway: Arc<HttpGateway>,
    api: Api,
}

impl CategoryService {
    pub fn new(gateway: Arc<HttpGateway>, api: Api) -> Self {
        Self { gateway, api }
    }

    pub async fn create(&self, body: Value) -> Result<Value, ServiceError> {
        let envelope = self
            .gateway
            .request(
                &self.api.category_create(),
                RequestOptions::post(body).with_auth(),
            )
            .await?;
        ensure_ok(envelope, "Unable to create category")
    }

    pub async fn update(&self, category_id: &str, body: Value) -> Result<Value, ServiceError> {
        let envelope = self
            .gateway
            .request(
                &self.api.category(category_id),
                RequestOptions::patch(Some(body)).with_auth(),
            )
            .await?;
        ensure_ok(envelope, "Unable to update category")
    }

    pub async fn delete(&self, category_id: &str) -> Result<Value, ServiceError> {
        let envelope = self
            .gateway
            .request(
                &self.api.category(category_id),
                RequestOptions::delete().with_auth(),
            )
            .await?;
        ensure_ok(envelope, "Unable to delete category")
    }

    pub async fn list(&self, query: &ListQuery) -> Result<ListPage, ServiceError> {
        let url = format!("{}{}", self.api.category_list(), query.to_query_string());
        let envelope = self
            .gateway
            .request(&url, RequestOptions::get().with_auth())
            .await?;
        let payload = ensure_ok(envelope, "Unable to load categories")?;
        Ok(unwrap_list(payload))
    }

    pub async fn get(&self, category_id: &str) -> Result<Value, ServiceError> {
        let envelope = self
            .gateway
            .request(
                &self.api.category(category_id),
                RequestOptions::get().with_auth(),
            )
            .await?;
        ensure_ok(envelope, "Unable to load category")
    }

    pub async fn all(&self) -> Result<Vec<Value>, ServiceError> {
        let envelope = self
            .gateway
            .request(&self.api.category_all(), RequestOptions::get().with_auth())
            .await?;
        let payload = ensure_ok(envelope, "Unable to load categories")?;
        Ok(unwrap_array(payload))
    }
}
