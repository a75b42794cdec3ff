//! Asynchronous transactions client implementation.

use crate::models::{Transaction, TransactionFilter, TRANSACTION_ENVELOPE};
use crate::Result;
use onapp_core::client::{collection_path, member_path};
use onapp_core::envelope::{unwrap_many, unwrap_one};
use onapp_core::validate::ensure_id;
use onapp_core::{ListOptions, ServiceClient};
use std::collections::HashMap;
use tracing::debug;
use url::Url;

const TRANSACTIONS_BASE_PATH: &str = "transactions";

/// Asynchronous client for OnApp transactions.
#[derive(Debug, Clone)]
pub struct TransactionsClient {
    inner: ServiceClient,
}

impl TransactionsClient {
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

    /// List transactions, newest first.
    pub async fn list(&self, options: &ListOptions) -> Result<Vec<Transaction>> {
        self.list_with(&options.to_pairs()).await
    }

    /// Fetch a single transaction by id.
    pub async fn get(&self, id: i64) -> Result<Transaction> {
        ensure_id("id", id)?;

        let envelope: HashMap<String, Transaction> = self
            .inner
            .get_json(&member_path(TRANSACTIONS_BASE_PATH, id), &[])
            .await?;
        unwrap_one(TRANSACTION_ENVELOPE, envelope)
    }

    /// Return the most recent transaction matching `filter`.
    ///
    /// One page of `per_page` records is requested with the filter applied
    /// server-side; the first record that also satisfies the filter locally
    /// is returned. `None` means no match on that page.
    pub async fn latest_matching(
        &self,
        filter: &TransactionFilter,
        per_page: u32,
    ) -> Result<Option<Transaction>> {
        let mut params = ListOptions::first_page(per_page).to_pairs();
        params.extend(filter.to_pairs());

        let transactions = self.list_with(&params).await?;
        let found = transactions.into_iter().find(|t| filter.matches(t));

        debug!(
            ?filter,
            transaction_id = found.as_ref().map(|t| t.id),
            "transaction lookup"
        );
        Ok(found)
    }

    async fn list_with(&self, params: &[(&'static str, String)]) -> Result<Vec<Transaction>> {
        let envelopes: Vec<HashMap<String, Transaction>> = self
            .inner
            .get_json(&collection_path(TRANSACTIONS_BASE_PATH), params)
            .await?;
        unwrap_many(TRANSACTION_ENVELOPE, envelopes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionStatus;
    use onapp_core::Error;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> TransactionsClient {
        TransactionsClient::new(server.uri()).unwrap()
    }

    #[tokio::test]
    async fn list_unwraps_envelopes_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/transactions.json"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"transaction": {"id": 9, "status": "running"}},
                {"transaction": {"id": 8, "status": "complete"}}
            ])))
            .mount(&server)
            .await;

        let options = ListOptions {
            page: Some(2),
            per_page: None,
        };
        let transactions = test_client(&server).list(&options).await.unwrap();
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].id, 9);
        assert_eq!(transactions[0].status(), TransactionStatus::Running);
        assert_eq!(transactions[1].id, 8);
    }

    #[tokio::test]
    async fn get_rejects_non_positive_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = test_client(&server).get(0).await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[tokio::test]
    async fn get_unwraps_single_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/transactions/31.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "transaction": {"id": 31, "action": "build_disk", "status": "failed"}
            })))
            .mount(&server)
            .await;

        let transaction = test_client(&server).get(31).await.unwrap();
        assert_eq!(transaction.action.as_deref(), Some("build_disk"));
        assert_eq!(transaction.status(), TransactionStatus::Failed);
    }

    #[tokio::test]
    async fn latest_matching_sends_filter_and_returns_newest() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/transactions.json"))
            .and(query_param("page", "1"))
            .and(query_param("per_page", "100"))
            .and(query_param("action", "reboot_virtual_server"))
            .and(query_param("associated_object_id", "42"))
            .and(query_param("associated_object_type", "VirtualMachine"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"transaction": {"id": 12, "action": "reboot_virtual_server",
                    "associated_object_id": 42, "associated_object_type": "VirtualMachine"}},
                {"transaction": {"id": 11, "action": "reboot_virtual_server",
                    "associated_object_id": 42, "associated_object_type": "VirtualMachine"}}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let filter = TransactionFilter::for_object("VirtualMachine", 42, "reboot_virtual_server");
        let found = test_client(&server)
            .latest_matching(&filter, 100)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, 12);
    }

    #[tokio::test]
    async fn latest_matching_skips_records_the_server_did_not_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/transactions.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"transaction": {"id": 20, "action": "build_disk",
                    "associated_object_id": 42, "associated_object_type": "Disk"}},
                {"transaction": {"id": 19, "parent_id": 3, "parent_type": "InstancePackage"}}
            ])))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let filter = TransactionFilter::for_parent("InstancePackage", 3);
        let found = client.latest_matching(&filter, 10).await.unwrap();
        assert_eq!(found.map(|t| t.id), Some(19));

        let filter = TransactionFilter::for_parent("InstancePackage", 4);
        assert!(client.latest_matching(&filter, 10).await.unwrap().is_none());
    }
}
