use std::sync::Arc;

use serde_json::{json, Value};

use crate::api::Api;
use crate::client::{HttpGateway, RequestOptions};
use crate::types::request::RoleQuery;

use super::{ensure_ok, ServiceError};

/// Role administration: CRUD plus permission and user assignment.
pub struct RoleService {
    gateway: Arc<HttpGateway>,
    api: Api,
}

impl RoleService {
    pub fn new(gateway: Arc<HttpGateway>, api: Api) -> Self {
        Self { gateway, api }
    }

    pub async fn create(&self, body: Value) -> Result<Value, ServiceError> {
        let envelope = self
            .gateway
            .request(
                &self.api.role_create(),
                RequestOptions::post(body).with_auth(),
            )
            .await?;
        ensure_ok(envelope, "Unable to create role")
    }

    pub async fn update(&self, role_id: &str, body: Value) -> Result<Value, ServiceError> {
        let envelope = self
            .gateway
            .request(
                &self.api.role(role_id),
                RequestOptions::patch(Some(body)).with_auth(),
            )
            .await?;
        ensure_ok(envelope, "Unable to update role")
    }

    pub async fn delete(&self, role_id: &str) -> Result<Value, ServiceError> {
        let envelope = self
            .gateway
            .request(&self.api.role(role_id), RequestOptions::delete().with_auth())
            .await?;
        ensure_ok(envelope, "Unable to delete role")
    }

    /// Undoes a soft delete.
    pub async fn restore(&self, role_id: &str) -> Result<Value, ServiceError> {
        let envelope = self
            .gateway
            .request(
                &self.api.role_restore(role_id),
                RequestOptions::patch(None).with_auth(),
            )
            .await?;
        ensure_ok(envelope, "Unable to restore role")
    }

    /// Roles come back as a bare array, not a paginated wrapper.
    pub async fn list(&self, query: &RoleQuery) -> Result<Vec<Value>, ServiceError> {
        let url = format!("{}{}", self.api.role_list(), query.to_query_string());
        let envelope = self
            .gateway
            .request(&url, RequestOptions::get().with_auth())
            .await?;
        let payload = ensure_ok(envelope, "Unable to load roles")?;
        Ok(match payload {
            Value::Array(items) => items,
            _ => Vec::new(),
        })
    }

    pub async fn get(&self, role_id: &str) -> Result<Value, ServiceError> {
        let envelope = self
            .gateway
            .request(&self.api.role(role_id), RequestOptions::get().with_auth())
            .await?;
        ensure_ok(envelope, "Unable to load role")
    }

    pub async fn assign_permissions(
        &self,
        role_id: &str,
        permission_ids: &[String],
    ) -> Result<Value, ServiceError> {
        let body = json!({"permissionIds": permission_ids});
        let envelope = self
            .gateway
            .request(
                &self.api.role_permissions(role_id),
                RequestOptions::post(body).with_auth(),
            )
            .await?;
        ensure_ok(envelope, "Unable to assign permissions")
    }

    pub async fn assign_user_role(
        &self,
        user_id: &str,
        role_id: &str,
    ) -> Result<Value, ServiceError> {
        let body = json!({"roleId": role_id});
        let envelope = self
            .gateway
            .request(
                &self.api.role_user_roles(user_id),
                RequestOptions::put(Some(body)).with_auth(),
            )
            .await?;
        ensure_ok(envelope, "Unable to assign role to user")
    }
}
