use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::api::Api;
use crate::client::{HttpGateway, RequestOptions};
use crate::types::request::{ListQuery, serialize_query};

use super::{api_error, ensure_ok, unwrap_array, unwrap_list, ListPage, ServiceError};

const DEFAULT_PAGE: u64 = 1;
const DEFAULT_LIMIT: u64 = 10;

/// Product catalog operations, including the per-product image set.
pub struct ProductService {
    gateway: Arc<HttpGateway>,
    api: Api,
}

impl ProductService {
    pub fn new(gateway: Arc<HttpGateway>, api: Api) -> Self {
        Self { gateway, api }
    }

    pub async fn create(&self, body: Value) -> Result<Value, ServiceError> {
        let envelope = self
            .gateway
            .request(
                &self.api.product_create(),
                RequestOptions::post(body).with_auth(),
            )
            .await?;
        ensure_ok(envelope, "Unable to create product")
    }

    pub async fn update(&self, product_id: &str, body: Value) -> Result<Value, ServiceError> {
        let envelope = self
            .gateway
            .request(
                &self.api.product(product_id),
                RequestOptions::patch(Some(body)).with_auth(),
            )
            .await?;
        ensure_ok(envelope, "Unable to update product")
    }

    pub async fn delete(&self, product_id: &str) -> Result<Value, ServiceError> {
        let envelope = self
            .gateway
            .request(
                &self.api.product(product_id),
                RequestOptions::delete().with_auth(),
            )
            .await?;
        ensure_ok(envelope, "Unable to delete product")
    }

    /// Paginated listing. Page and limit default to 1/10 when not given.
    pub async fn list(&self, query: &ListQuery) -> Result<ListPage, ServiceError> {
        let search = query.search.as_deref().unwrap_or("").trim().to_string();
        // The backend rejects a search term shorter than 2 characters but
        // still requires the parameter; two spaces pass its validation.
        let search = if search.chars().count() >= 2 {
            search
        } else {
            String::from("  ")
        };

        let qs = serialize_query(&[
            ("page", Some(query.page.unwrap_or(DEFAULT_PAGE).to_string())),
            ("limit", Some(query.limit.unwrap_or(DEFAULT_LIMIT).to_string())),
            ("search", Some(search)),
            (
                "includeDeleted",
                Some(query.include_deleted.unwrap_or(false).to_string()),
            ),
        ]);
        let url = format!("{}{}", self.api.product_list(), qs);

        let envelope = self
            .gateway
            .request(&url, RequestOptions::get().with_auth())
            .await?;
        let payload = ensure_ok(envelope, "Unable to load products")?;
        Ok(unwrap_list(payload))
    }

    pub async fn get(&self, product_id: &str) -> Result<Value, ServiceError> {
        let envelope = self
            .gateway
            .request(
                &self.api.product(product_id),
                RequestOptions::get().with_auth(),
            )
            .await?;
        ensure_ok(envelope, "Unable to load product")
    }

    pub async fn all(&self) -> Result<Vec<Value>, ServiceError> {
        let envelope = self
            .gateway
            .request(&self.api.product_all(), RequestOptions::get().with_auth())
            .await?;
        let payload = ensure_ok(envelope, "Unable to load products")?;
        Ok(unwrap_array(payload))
    }

    /// Uploads one or more image files, each as a `(file name, bytes)`
    /// pair, under the multipart key the backend expects.
    pub async fn upload_images(
        &self,
        product_id: &str,
        files: Vec<(String, Vec<u8>)>,
    ) -> Result<Value, ServiceError> {
        let mut form = Form::new();
        for (name, data) in files {
            form = form.part("images", Part::bytes(data).file_name(name));
        }

        let envelope = self
            .gateway
            .upload(&self.api.product_images(product_id), form, true)
            .await?;
        if !envelope.ok {
            return Err(api_error(envelope, "Unable to upload images"));
        }

        let payload = envelope.data;
        Ok(payload.get("data").cloned().unwrap_or(payload))
    }

    pub async fn list_images(&self, product_id: &str) -> Result<Vec<Value>, ServiceError> {
        let envelope = self
            .gateway
            .request(
                &self.api.product_images(product_id),
                RequestOptions::get().with_auth(),
            )
            .await?;
        let payload = ensure_ok(envelope, "Unable to load images")?;
        Ok(unwrap_array(payload))
    }

    pub async fn set_primary_image(
        &self,
        product_id: &str,
        image_id: &str,
    ) -> Result<Value, ServiceError> {
        let envelope = self
            .gateway
            .request(
                &self.api.product_primary_image(product_id, image_id),
                RequestOptions::patch(None).with_auth(),
            )
            .await?;
        ensure_ok(envelope, "Unable to set primary image")
    }

    pub async fn delete_image(
        &self,
        product_id: &str,
        image_id: &str,
    ) -> Result<Value, ServiceError> {
        let envelope = self
            .gateway
            .request(
                &self.api.product_image(product_id, image_id),
                RequestOptions::delete().with_auth(),
            )
            .await?;
        ensure_ok(envelope, "Unable to delete image")
    }
}
