//! Asynchronous users client implementation.

use crate::models::{User, UserCreateRequest, UserEditRequest, USER_ENVELOPE};
use crate::Result;
use onapp_core::client::{collection_path, member_path};
use onapp_core::envelope::{unwrap_many, unwrap_one, wrap};
use onapp_core::validate::{ensure_id, ensure_payload};
use onapp_core::{DeleteOptions, ListOptions, ServiceClient};
use reqwest::Method;
use std::collections::HashMap;
use tracing::info;
use url::Url;

const USERS_BASE_PATH: &str = "users";

/// Asynchronous client for OnApp user accounts.
#[derive(Debug, Clone)]
pub struct UsersClient {
    inner: ServiceClient,
}

impl UsersClient {
    /// Construct a client directly from the base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Ok(Self::from_service(ServiceClient::new(base_url)?))
    }

    /// Construct a client over an existing transport handle.
    #[must_use]
    pub fn from_service(inner: ServiceClient) -> Self {
        Self { inner }
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    /// List users in server order.
    pub async fn list(&self, options: &ListOptions) -> Result<Vec<User>> {
        let envelopes: Vec<HashMap<String, User>> = self
            .inner
            .get_json(&collection_path(USERS_BASE_PATH), &options.to_pairs())
            .await?;
        unwrap_many(USER_ENVELOPE, envelopes)
    }

    /// Fetch a single user.
    pub async fn get(&self, id: i64) -> Result<User> {
        ensure_id("id", id)?;

        let envelope: HashMap<String, User> = self
            .inner
            .get_json(&member_path(USERS_BASE_PATH, id), &[])
            .await?;
        unwrap_one(USER_ENVELOPE, envelope)
    }

    /// Create a user.
    pub async fn create(&self, request: &UserCreateRequest) -> Result<User> {
        ensure_payload("request", request)?;

        let body = wrap(USER_ENVELOPE, request);
        let envelope: HashMap<String, User> = self
            .inner
            .send_json(
                Method::POST,
                &collection_path(USERS_BASE_PATH),
                Some(&body),
                &[],
            )
            .await?;
        let user = unwrap_one(USER_ENVELOPE, envelope)?;

        info!(id = user.id, login = ?user.login, "user created");
        Ok(user)
    }

    /// Apply a partial update. The server replies without a body.
    pub async fn edit(&self, id: i64, request: &UserEditRequest) -> Result<()> {
        ensure_id("id", id)?;
        ensure_payload("request", request)?;

        let body = wrap(USER_ENVELOPE, request);
        self.inner
            .send_status(
                Method::PUT,
                &member_path(USERS_BASE_PATH, id),
                Some(&body),
                &[],
            )
            .await
    }

    /// Delete a user. With `force` set the user's resources are destroyed
    /// instead of blocking the deletion.
    pub async fn delete(&self, id: i64, options: Option<&DeleteOptions>) -> Result<()> {
        ensure_id("id", id)?;

        let params = options.map(DeleteOptions::to_pairs).unwrap_or_default();
        self.inner
            .send_status::<()>(
                Method::DELETE,
                &member_path(USERS_BASE_PATH, id),
                None,
                &params,
            )
            .await?;

        info!(id, "user delete accepted");
        Ok(())
    }
}
