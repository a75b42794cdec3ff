//! Asynchronous instance packages client implementation.

use crate::models::{
    InstancePackage, InstancePackageCreateRequest, InstancePackageEditRequest,
    INSTANCE_PACKAGE_ENVELOPE, INSTANCE_PACKAGE_OBJECT_TYPE,
};
use crate::Result;
use onapp_core::client::{collection_path, member_path};
use onapp_core::envelope::{unwrap_many, unwrap_one, wrap};
use onapp_core::validate::{ensure_id, ensure_payload};
use onapp_core::{DeleteOptions, Error, ListOptions, ServiceClient};
use onapp_transactions::{Transaction, TransactionFilter, TransactionsClient};
use reqwest::Method;
use std::collections::HashMap;
use tracing::{info, warn};
use url::Url;

const INSTANCE_PACKAGES_BASE_PATH: &str = "instance_packages";

/// Asynchronous client for OnApp instance packages.
#[derive(Debug, Clone)]
pub struct InstancePackagesClient {
    inner: ServiceClient,
    transactions: TransactionsClient,
}

impl InstancePackagesClient {
    /// Construct a client directly from the base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Ok(Self::from_service(ServiceClient::new(base_url)?))
    }

    /// Construct a client over an existing transport handle.
    #[must_use]
    pub fn from_service(inner: ServiceClient) -> Self {
        Self {
            transactions: TransactionsClient::from_service(inner.clone()),
            inner,
        }
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    /// List instance packages in server order.
    pub async fn list(&self, options: &ListOptions) -> Result<Vec<InstancePackage>> {
        let envelopes: Vec<HashMap<String, InstancePackage>> = self
            .inner
            .get_json(
                &collection_path(INSTANCE_PACKAGES_BASE_PATH),
                &options.to_pairs(),
            )
            .await?;
        unwrap_many(INSTANCE_PACKAGE_ENVELOPE, envelopes)
    }

    /// Fetch a single instance package.
    pub async fn get(&self, id: i64) -> Result<InstancePackage> {
        ensure_id("id", id)?;

        let envelope: HashMap<String, InstancePackage> = self
            .inner
            .get_json(&member_path(INSTANCE_PACKAGES_BASE_PATH, id), &[])
            .await?;
        unwrap_one(INSTANCE_PACKAGE_ENVELOPE, envelope)
    }

    /// Create an instance package and return the server's record of it.
    pub async fn create(&self, request: &InstancePackageCreateRequest) -> Result<InstancePackage> {
        ensure_payload("request", request)?;

        let body = wrap(INSTANCE_PACKAGE_ENVELOPE, request);
        let envelope: HashMap<String, InstancePackage> = self
            .inner
            .send_json(
                Method::POST,
                &collection_path(INSTANCE_PACKAGES_BASE_PATH),
                Some(&body),
                &[],
            )
            .await?;
        let package = unwrap_one(INSTANCE_PACKAGE_ENVELOPE, envelope)?;

        info!(id = package.id, "instance package created");
        Ok(package)
    }

    /// Apply a partial update. The server replies without a body.
    pub async fn edit(&self, id: i64, request: &InstancePackageEditRequest) -> Result<()> {
        ensure_id("id", id)?;
        ensure_payload("request", request)?;

        let body = wrap(INSTANCE_PACKAGE_ENVELOPE, request);
        self.inner
            .send_status(
                Method::PUT,
                &member_path(INSTANCE_PACKAGES_BASE_PATH, id),
                Some(&body),
                &[],
            )
            .await
    }

    /// Delete an instance package and return the transaction it started.
    ///
    /// `None` means the first page of transactions held nothing for the
    /// package. A lookup failure after the delete was accepted surfaces as
    /// [`Error::LookupFailed`].
    pub async fn delete(
        &self,
        id: i64,
        options: Option<&DeleteOptions>,
    ) -> Result<Option<Transaction>> {
        ensure_id("id", id)?;

        let params = options.map(DeleteOptions::to_pairs).unwrap_or_default();
        self.inner
            .send_status::<()>(
                Method::DELETE,
                &member_path(INSTANCE_PACKAGES_BASE_PATH, id),
                None,
                &params,
            )
            .await?;

        info!(id, "instance package delete accepted");

        let filter = TransactionFilter::for_parent(INSTANCE_PACKAGE_OBJECT_TYPE, id);
        self.transactions
            .latest_matching(&filter, self.inner.transaction_page_size())
            .await
            .map_err(|err| {
                warn!(id, error = %err, "transaction lookup failed");
                Error::LookupFailed(Box::new(err))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{any, body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> InstancePackagesClient {
        InstancePackagesClient::new(server.uri()).unwrap()
    }

    async fn refuse_everything(server: &MockServer) {
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn list_preserves_server_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/instance_packages.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"instance_package": {"id": 7, "label": "small", "cpus": 1, "memory": 512}},
                {"instance_package": {"id": 3, "label": "large", "cpus": 8, "memory": 16384}}
            ])))
            .mount(&server)
            .await;

        let packages = test_client(&server)
            .list(&ListOptions::default())
            .await
            .unwrap();
        let ids: Vec<i64> = packages.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![7, 3]);
        assert_eq!(packages[1].memory, Some(16384));
    }

    #[tokio::test]
    async fn list_forwards_pagination() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/instance_packages.json"))
            .and(query_param("page", "3"))
            .and(query_param("per_page", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let options = ListOptions {
            page: Some(3),
            per_page: Some(5),
        };
        assert!(test_client(&server).list(&options).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_unwraps_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/instance_packages/7.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "instance_package": {
                    "id": 7,
                    "label": "small",
                    "billing_plan_ids": [1, 2],
                    "created_at": "2024-02-01T10:00:00.000+00:00"
                }
            })))
            .mount(&server)
            .await;

        let package = test_client(&server).get(7).await.unwrap();
        assert_eq!(package.label.as_deref(), Some("small"));
        assert_eq!(package.billing_plan_ids, Some(vec![1, 2]));
        assert!(package.created_at.is_some());
    }

    #[tokio::test]
    async fn get_maps_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/instance_packages/99.json"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "errors": ["InstancePackage not found"]
            })))
            .mount(&server)
            .await;

        let err = test_client(&server).get(99).await.unwrap_err();
        assert_eq!(err, Error::NotFound("InstancePackage not found".into()));
    }

    #[tokio::test]
    async fn create_wraps_request_in_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/instance_packages.json"))
            .and(body_json(json!({
                "instance_package": {"label": "medium", "cpus": 2, "memory": 2048}
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "instance_package": {"id": 12, "label": "medium", "cpus": 2, "memory": 2048}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = InstancePackageCreateRequest {
            label: Some("medium".into()),
            cpus: Some(2),
            memory: Some(2048),
            ..Default::default()
        };
        let package = test_client(&server).create(&request).await.unwrap();
        assert_eq!(package.id, 12);
    }

    #[tokio::test]
    async fn empty_payloads_make_no_request() {
        let server = MockServer::start().await;
        refuse_everything(&server).await;

        let client = test_client(&server);
        let err = client
            .create(&InstancePackageCreateRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));

        let err = client
            .edit(7, &InstancePackageEditRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[tokio::test]
    async fn non_positive_ids_make_no_request() {
        let server = MockServer::start().await;
        refuse_everything(&server).await;

        let client = test_client(&server);
        let request = InstancePackageEditRequest {
            cpus: Some(4),
            ..Default::default()
        };
        assert!(client.get(0).await.is_err());
        assert!(client.edit(-1, &request).await.is_err());
        assert!(client.delete(0, None).await.is_err());
    }

    #[tokio::test]
    async fn edit_puts_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/instance_packages/7.json"))
            .and(body_json(json!({"instance_package": {"disk_size": 40}})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let request = InstancePackageEditRequest {
            disk_size: Some(40),
            ..Default::default()
        };
        test_client(&server).edit(7, &request).await.unwrap();
    }

    #[tokio::test]
    async fn delete_returns_package_transaction() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/instance_packages/7.json"))
            .and(query_param("force", "1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/transactions.json"))
            .and(query_param("parent_type", "InstancePackage"))
            .and(query_param("parent_id", "7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"transaction": {"id": 64, "action": "destroy_instance_package",
                    "parent_id": 7, "parent_type": "InstancePackage"}}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let options = DeleteOptions { force: Some(true) };
        let transaction = test_client(&server)
            .delete(7, Some(&options))
            .await
            .unwrap();
        assert_eq!(transaction.map(|t| t.id), Some(64));
    }

    #[tokio::test]
    async fn delete_without_transaction_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/instance_packages/8.json"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/transactions.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        assert!(test_client(&server).delete(8, None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_lookup_failure_is_reported_as_lookup_failed() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/instance_packages/8.json"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/transactions.json"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = test_client(&server).delete(8, None).await.unwrap_err();
        assert!(matches!(err, Error::LookupFailed(_)));
        assert!(err.action_accepted());
    }
}
