// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the PostgREST-style record store.
//!
//! Every method is one bounded network call; there are no transactions and
//! no retries here. Upserts rely on the endpoint's merge-duplicates
//! resolution against the primary key.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use bizrelay_config::model::StoreConfig;
use bizrelay_core::traits::adapter::{Adapter, AdapterType, HealthStatus};
use bizrelay_core::types::{Account, ConversationTurn, Counterpart};
use bizrelay_core::{RecordStore, RelayError};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::debug;

/// Record store client over a PostgREST-style REST endpoint.
#[derive(Debug, Clone)]
pub struct RestStore {
    client: reqwest::Client,
    base_url: String,
}

/// Row shape of the distinct-counterpart projection.
#[derive(Debug, Deserialize)]
struct CounterpartRow {
    counterpart_id: i64,
    counterpart_name: String,
}

impl RestStore {
    /// Creates a store client from config.
    ///
    /// Requires `store.url` and `store.service_key` to be set.
    pub fn new(config: &StoreConfig) -> Result<Self, RelayError> {
        let url = config
            .url
            .as_deref()
            .ok_or_else(|| RelayError::Config("store.url is required".into()))?;
        let service_key = config
            .service_key
            .as_deref()
            .ok_or_else(|| RelayError::Config("store.service_key is required".into()))?;

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {service_key}"))
            .map_err(|e| RelayError::Config(format!("invalid store.service_key: {e}")))?;
        auth.set_sensitive(true);
        let mut apikey = HeaderValue::from_str(service_key)
            .map_err(|e| RelayError::Config(format!("invalid store.service_key: {e}")))?;
        apikey.set_sensitive(true);
        headers.insert("apikey", apikey);
        headers.insert("authorization", auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| RelayError::Store { source: Box::new(e) })?;

        Ok(Self {
            client,
            base_url: format!("{}/rest/v1", url.trim_end_matches('/')),
        })
    }

    async fn fetch_accounts(
        &self,
        filter: (&str, String),
    ) -> Result<Vec<Account>, RelayError> {
        let response = self
            .client
            .get(format!("{}/accounts", self.base_url))
            .query(&[filter, ("select", "*".to_string())])
            .send()
            .await
            .map_err(|e| RelayError::Store { source: Box::new(e) })?;
        let response = check_status(response).await?;
        response
            .json::<Vec<Account>>()
            .await
            .map_err(|e| RelayError::Store { source: Box::new(e) })
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RelayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RelayError::Store {
        source: format!("store returned {status}: {body}").into(),
    })
}

#[async_trait]
impl Adapter for RestStore {
    fn name(&self) -> &str {
        "rest-store"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Store
    }

    async fn health_check(&self) -> Result<HealthStatus, RelayError> {
        let result = self
            .client
            .get(format!("{}/accounts", self.base_url))
            .query(&[("select", "user_id"), ("limit", "1")])
            .send()
            .await;
        match result {
            Ok(response) if response.status().is_success() => Ok(HealthStatus::Healthy),
            Ok(response) => Ok(HealthStatus::Unhealthy(format!(
                "store returned {}",
                response.status()
            ))),
            Err(e) => Ok(HealthStatus::Unhealthy(format!("store unreachable: {e}"))),
        }
    }
}

#[async_trait]
impl RecordStore for RestStore {
    async fn account(&self, user_id: i64) -> Result<Option<Account>, RelayError> {
        let mut accounts = self.fetch_accounts(("user_id", format!("eq.{user_id}"))).await?;
        Ok(accounts.drain(..).next())
    }

    async fn account_by_connection(
        &self,
        connection_id: &str,
    ) -> Result<Option<Account>, RelayError> {
        let mut accounts = self
            .fetch_accounts(("business_connection_id", format!("eq.{connection_id}")))
            .await?;
        Ok(accounts.drain(..).next())
    }

    async fn upsert_account(&self, account: &Account) -> Result<(), RelayError> {
        debug!(user_id = account.user_id, "upserting account");
        let response = self
            .client
            .post(format!("{}/accounts", self.base_url))
            .header("prefer", "resolution=merge-duplicates,return=minimal")
            .json(account)
            .send()
            .await
            .map_err(|e| RelayError::Store { source: Box::new(e) })?;
        check_status(response).await?;
        Ok(())
    }

    async fn append_turn(&self, turn: &ConversationTurn) -> Result<(), RelayError> {
        let response = self
            .client
            .post(format!("{}/turns", self.base_url))
            .header("prefer", "return=minimal")
            .json(turn)
            .send()
            .await
            .map_err(|e| RelayError::Store { source: Box::new(e) })?;
        check_status(response).await?;
        Ok(())
    }

    async fn recent_turns(
        &self,
        owner_id: i64,
        counterpart_id: i64,
        limit: u32,
    ) -> Result<Vec<ConversationTurn>, RelayError> {
        // The endpoint can only cut the window from the newest side, so ask
        // for newest-first and flip to chronological order locally.
        let response = self
            .client
            .get(format!("{}/turns", self.base_url))
            .query(&[
                ("owner_id", format!("eq.{owner_id}")),
                ("counterpart_id", format!("eq.{counterpart_id}")),
                ("order", "id.desc".to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await
            .map_err(|e| RelayError::Store { source: Box::new(e) })?;
        let response = check_status(response).await?;
        let mut turns = response
            .json::<Vec<ConversationTurn>>()
            .await
            .map_err(|e| RelayError::Store { source: Box::new(e) })?;
        turns.reverse();
        Ok(turns)
    }

    async fn distinct_counterparts(
        &self,
        owner_id: i64,
    ) -> Result<Vec<Counterpart>, RelayError> {
        let response = self
            .client
            .get(format!("{}/turns", self.base_url))
            .query(&[
                ("owner_id", format!("eq.{owner_id}")),
                ("select", "counterpart_id,counterpart_name".to_string()),
                ("order", "id.asc".to_string()),
            ])
            .send()
            .await
            .map_err(|e| RelayError::Store { source: Box::new(e) })?;
        let response = check_status(response).await?;
        let rows = response
            .json::<Vec<CounterpartRow>>()
            .await
            .map_err(|e| RelayError::Store { source: Box::new(e) })?;

        // First-seen name wins per counterpart.
        let mut seen = HashSet::new();
        let mut counterparts = Vec::new();
        for row in rows {
            if seen.insert(row.counterpart_id) {
                counterparts.push(Counterpart { id: row.counterpart_id, name: row.counterpart_name });
            }
        }
        Ok(counterparts)
    }

    async fn delete_turns(&self, owner_id: i64, counterpart_id: i64) -> Result<(), RelayError> {
        debug!(owner_id, counterpart_id, "clearing history");
        let response = self
            .client
            .delete(format!("{}/turns", self.base_url))
            .query(&[
                ("owner_id", format!("eq.{owner_id}")),
                ("counterpart_id", format!("eq.{counterpart_id}")),
            ])
            .send()
            .await
            .map_err(|e| RelayError::Store { source: Box::new(e) })?;
        check_status(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizrelay_core::types::Role;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store_for(server: &MockServer) -> RestStore {
        RestStore::new(&StoreConfig {
            url: Some(server.uri()),
            service_key: Some("service-key".into()),
            request_timeout_secs: 5,
        })
        .unwrap()
    }

    fn turn_json(role: &str, content: &str) -> serde_json::Value {
        serde_json::json!({
            "owner_id": 1,
            "counterpart_id": 7,
            "counterpart_name": "@jane",
            "role": role,
            "content": content,
        })
    }

    #[test]
    fn new_requires_url_and_key() {
        assert!(RestStore::new(&StoreConfig::default()).is_err());
        assert!(RestStore::new(&StoreConfig {
            url: Some("https://db.example".into()),
            service_key: None,
            request_timeout_secs: 5,
        })
        .is_err());
    }

    #[tokio::test]
    async fn account_lookup_sends_auth_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/accounts"))
            .and(query_param("user_id", "eq.42"))
            .and(header("apikey", "service-key"))
            .and(header("authorization", "Bearer service-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "user_id": 42,
                "language": "en",
                "ai_model": "m1",
                "system_prompt": "p",
            }])))
            .mount(&server)
            .await;

        let store = store_for(&server);
        let account = store.account(42).await.unwrap().unwrap();
        assert_eq!(account.user_id, 42);
        assert_eq!(account.ai_model, "m1");
    }

    #[tokio::test]
    async fn missing_account_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/accounts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let store = store_for(&server);
        assert!(store.account(42).await.unwrap().is_none());
        assert!(store.account_by_connection("conn-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upsert_sends_merge_duplicates_prefer() {
        let server = MockServer::start().await;
        // The comma-separated prefer value arrives as two header values.
        Mock::given(method("POST"))
            .and(path("/rest/v1/accounts"))
            .and(header("prefer", "resolution=merge-duplicates"))
            .and(header("prefer", "return=minimal"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let store = store_for(&server);
        let account = Account::new(42, None, true);
        store.upsert_account(&account).await.unwrap();
    }

    #[tokio::test]
    async fn recent_turns_flips_to_chronological_order() {
        let server = MockServer::start().await;
        // Endpoint returns newest first.
        Mock::given(method("GET"))
            .and(path("/rest/v1/turns"))
            .and(query_param("order", "id.desc"))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                turn_json("assistant", "third"),
                turn_json("user", "second"),
                turn_json("user", "first"),
            ])))
            .mount(&server)
            .await;

        let store = store_for(&server);
        let turns = store.recent_turns(1, 7, 10).await.unwrap();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0].content, "first");
        assert_eq!(turns[2].content, "third");
        assert_eq!(turns[2].role, Role::Assistant);
    }

    #[tokio::test]
    async fn distinct_counterparts_dedupes_first_seen() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/turns"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"counterpart_id": 7, "counterpart_name": "@jane"},
                {"counterpart_id": 8, "counterpart_name": "Bob"},
                {"counterpart_id": 7, "counterpart_name": "@jane-renamed"},
            ])))
            .mount(&server)
            .await;

        let store = store_for(&server);
        let counterparts = store.distinct_counterparts(1).await.unwrap();
        assert_eq!(counterparts.len(), 2);
        assert_eq!(counterparts[0], Counterpart { id: 7, name: "@jane".into() });
        assert_eq!(counterparts[1], Counterpart { id: 8, name: "Bob".into() });
    }

    #[tokio::test]
    async fn delete_turns_scopes_to_owner_and_counterpart() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/turns"))
            .and(query_param("owner_id", "eq.1"))
            .and(query_param("counterpart_id", "eq.7"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let store = store_for(&server);
        store.delete_turns(1, 7).await.unwrap();
    }

    #[tokio::test]
    async fn non_success_status_is_a_store_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/turns"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let store = store_for(&server);
        let turn = ConversationTurn {
            owner_id: 1,
            counterpart_id: 7,
            counterpart_name: "@jane".into(),
            role: Role::User,
            content: "hi".into(),
            created_at: None,
        };
        let err = store.append_turn(&turn).await.unwrap_err();
        assert!(err.to_string().contains("store error"));
    }
}
