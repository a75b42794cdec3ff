//! Asynchronous compute resources client implementation.

use crate::models::{
    Asset, ComputeResource, ComputeResourceCreateRequest, ComputeResourceEditRequest,
    ASSET_ENVELOPE, HYPERVISOR_ENVELOPE,
};
use crate::Result;
use onapp_core::client::{collection_path, member_path, API_FORMAT};
use onapp_core::envelope::{unwrap_many, unwrap_one, wrap};
use onapp_core::validate::{ensure_id, ensure_not_blank, ensure_path_segment, ensure_payload};
use onapp_core::{DeleteOptions, ListOptions, ServiceClient};
use reqwest::Method;
use std::collections::HashMap;
use tracing::info;
use url::Url;

const HYPERVISORS_BASE_PATH: &str = "hypervisors";
const ASSETS_BASE_PATH: &str = "settings/assets";

fn asset_hypervisors_path(mac: &str) -> String {
    format!("{ASSETS_BASE_PATH}/{mac}/{HYPERVISORS_BASE_PATH}{API_FORMAT}")
}

/// Asynchronous client for CloudBoot compute resources.
#[derive(Debug, Clone)]
pub struct ComputeResourcesClient {
    inner: ServiceClient,
}

impl ComputeResourcesClient {
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

    /// List compute resources in server order.
    pub async fn list(&self, options: &ListOptions) -> Result<Vec<ComputeResource>> {
        let envelopes: Vec<HashMap<String, ComputeResource>> = self
            .inner
            .get_json(&collection_path(HYPERVISORS_BASE_PATH), &options.to_pairs())
            .await?;
        unwrap_many(HYPERVISOR_ENVELOPE, envelopes)
    }

    /// Fetch a single compute resource.
    pub async fn get(&self, id: i64) -> Result<ComputeResource> {
        ensure_id("id", id)?;

        let envelope: HashMap<String, ComputeResource> = self
            .inner
            .get_json(&member_path(HYPERVISORS_BASE_PATH, id), &[])
            .await?;
        unwrap_one(HYPERVISOR_ENVELOPE, envelope)
    }

    /// Register the CloudBoot asset named by `request.mac` as a compute
    /// resource.
    pub async fn create(&self, request: &ComputeResourceCreateRequest) -> Result<ComputeResource> {
        ensure_payload("request", request)?;
        ensure_not_blank("mac", request.mac.as_deref())?;
        let mac = request.mac.as_deref().unwrap_or_default();
        ensure_path_segment("mac", mac)?;

        let body = wrap(HYPERVISOR_ENVELOPE, request);
        let envelope: HashMap<String, ComputeResource> = self
            .inner
            .send_json(Method::POST, &asset_hypervisors_path(mac), Some(&body), &[])
            .await?;
        let resource = unwrap_one(HYPERVISOR_ENVELOPE, envelope)?;

        info!(id = resource.id, mac, "compute resource created");
        Ok(resource)
    }

    /// Delete a compute resource.
    pub async fn delete(&self, id: i64, options: Option<&DeleteOptions>) -> Result<()> {
        ensure_id("id", id)?;

        let params = options.map(DeleteOptions::to_pairs).unwrap_or_default();
        self.inner
            .send_status::<()>(
                Method::DELETE,
                &member_path(HYPERVISORS_BASE_PATH, id),
                None,
                &params,
            )
            .await?;

        info!(id, "compute resource delete accepted");
        Ok(())
    }

    /// Apply a partial update. The server replies without a body.
    pub async fn edit(&self, id: i64, request: &ComputeResourceEditRequest) -> Result<()> {
        ensure_id("id", id)?;
        ensure_payload("request", request)?;

        let body = wrap(HYPERVISOR_ENVELOPE, request);
        self.inner
            .send_status(
                Method::PUT,
                &member_path(HYPERVISORS_BASE_PATH, id),
                Some(&body),
                &[],
            )
            .await
    }

    /// List CloudBoot assets that can be registered as compute resources.
    pub async fn available_assets(&self) -> Result<Vec<Asset>> {
        let envelopes: Vec<HashMap<String, Asset>> = self
            .inner
            .get_json(&collection_path(ASSETS_BASE_PATH), &[])
            .await?;
        unwrap_many(ASSET_ENVELOPE, envelopes)
    }
}
