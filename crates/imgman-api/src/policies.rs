//! Image Manager policy operations.
//!
//! # Design
//! - `ImageManager` owns the signed session for the lifetime of one invocation.
//! - Every operation refreshes the `Luna-Token` header before calling out.
//! - Policies pass through as raw JSON; nothing is parsed or validated locally.

use imgman_edgegrid::{ApiResult, EdgeGridClient};
use serde_json::{Map, Value};

use crate::network::{Network, NetworkTarget};

/// Header carrying the policy-set identifier.
pub const LUNA_TOKEN_HEADER: &str = "Luna-Token";

const NETWORK_ROOT: &str = "/imaging/v2/network";

/// Collection path for one network.
#[must_use]
pub fn policies_path(network: Network) -> String {
    format!("{NETWORK_ROOT}/{network}/policies")
}

/// Path of a single named policy on one network.
#[must_use]
pub fn policy_path(network: Network, name: &str) -> String {
    format!("{}/{name}", policies_path(network))
}

/// Append `?accountSwitchKey=<key>` when a key is present.
///
/// This is plain concatenation: a path that already carries a query string
/// ends up with two `?` separators.
#[must_use]
pub fn with_account_switch_key(path: String, account_key: &str) -> String {
    if account_key.is_empty() {
        path
    } else {
        format!("{path}?accountSwitchKey={account_key}")
    }
}

/// Policy operations over a signed session.
pub struct ImageManager {
    client: EdgeGridClient,
}

impl ImageManager {
    /// Wrap an established session.
    #[must_use]
    pub const fn new(client: EdgeGridClient) -> Self {
        Self { client }
    }

    /// List the policies deployed on `network`.
    ///
    /// # Errors
    ///
    /// Propagates any signing, transport, or classified HTTP failure.
    pub async fn list_policies(
        &mut self,
        luna_token: &str,
        network: Network,
        account_key: &str,
    ) -> ApiResult<Value> {
        self.client.set_header(LUNA_TOKEN_HEADER, luna_token)?;
        let path = with_account_switch_key(policies_path(network), account_key);
        self.client.get(&path, &[]).await
    }

    /// Retrieve one policy from `network`.
    ///
    /// # Errors
    ///
    /// Propagates any signing, transport, or classified HTTP failure.
    pub async fn get_policy(
        &mut self,
        luna_token: &str,
        name: &str,
        network: Network,
        account_key: &str,
    ) -> ApiResult<Value> {
        self.client.set_header(LUNA_TOKEN_HEADER, luna_token)?;
        let path = with_account_switch_key(policy_path(network, name), account_key);
        tracing::info!(policy = name, %network, "retrieving policy");
        self.client.get(&path, &[]).await
    }

    /// Create or replace one policy on `network` with the raw JSON `body`.
    ///
    /// # Errors
    ///
    /// Propagates any signing, transport, or classified HTTP failure.
    pub async fn set_policy(
        &mut self,
        luna_token: &str,
        name: &str,
        body: &str,
        network: Network,
        account_key: &str,
    ) -> ApiResult<Value> {
        self.client.set_header(LUNA_TOKEN_HEADER, luna_token)?;
        let path = with_account_switch_key(policy_path(network, name), account_key);
        tracing::info!(policy = name, %network, "updating policy");
        self.client.put(&path, body, &[]).await
    }

    /// Delete one policy from every network in `target`.
    ///
    /// The result maps each network name to that network's response.
    ///
    /// # Errors
    ///
    /// Propagates the first signing, transport, or classified HTTP failure.
    pub async fn delete_policy(
        &mut self,
        luna_token: &str,
        name: &str,
        target: NetworkTarget,
        account_key: &str,
    ) -> ApiResult<Value> {
        self.client.set_header(LUNA_TOKEN_HEADER, luna_token)?;
        tracing::info!(policy = name, %target, "deleting policy");

        let mut results = Map::new();
        for network in target.networks() {
            let path = with_account_switch_key(policy_path(*network, name), account_key);
            let result = self.client.delete(&path).await?;
            results.insert(network.as_str().to_string(), result);
        }
        Ok(Value::Object(results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use httpmock::prelude::*;
    use imgman_edgegrid::{ApiError, CallerOptions, Credentials};
    use serde_json::json;

    const POLICY_SET: &str = "example-policy-set";

    fn manager(server: &MockServer) -> Result<ImageManager> {
        let credentials = Credentials::new("localhost", "ctoken", "csecret", "atoken");
        let base_url = server
            .base_url()
            .parse()
            .map_err(|_| anyhow!("valid URL"))?;
        let client =
            EdgeGridClient::with_base_url(credentials, base_url, CallerOptions::default())?;
        Ok(ImageManager::new(client))
    }

    #[test]
    fn account_key_is_appended_once_when_present() {
        let path = policies_path(Network::Staging);
        assert_eq!(path, "/imaging/v2/network/staging/policies");
        assert_eq!(with_account_switch_key(path.clone(), ""), path);
        assert_eq!(
            with_account_switch_key(path, "1-ABCDE"),
            "/imaging/v2/network/staging/policies?accountSwitchKey=1-ABCDE"
        );
        assert_eq!(
            policy_path(Network::Production, "thumbs"),
            "/imaging/v2/network/production/policies/thumbs"
        );
    }

    #[tokio::test]
    async fn list_policies_targets_network_with_token() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/imaging/v2/network/production/policies")
                .query_param("accountSwitchKey", "1-ABCDE")
                .header("luna-token", POLICY_SET)
                .header_exists("authorization");
            then.status(200).json_body(json!({
                "items": [{"id": "p1", "dateCreated": "2021-01-01", "user": "u1"}]
            }));
        });

        let mut manager = manager(&server)?;
        let result = manager
            .list_policies(POLICY_SET, Network::Production, "1-ABCDE")
            .await?;

        mock.assert();
        assert_eq!(result["items"][0]["id"], "p1");
        Ok(())
    }

    #[tokio::test]
    async fn get_policy_hits_exactly_one_network() -> Result<()> {
        let server = MockServer::start_async().await;
        let staging = server.mock(|when, then| {
            when.method(GET).path("/imaging/v2/network/staging/policies/thumbs");
            then.status(200).json_body(json!({"id": "thumbs"}));
        });
        let production = server.mock(|when, then| {
            when.method(GET)
                .path("/imaging/v2/network/production/policies/thumbs");
            then.status(200).json_body(json!({"id": "thumbs"}));
        });

        let mut manager = manager(&server)?;
        manager
            .get_policy(POLICY_SET, "thumbs", Network::Staging, "")
            .await?;

        staging.assert_calls(1);
        production.assert_calls(0);
        Ok(())
    }

    #[tokio::test]
    async fn set_then_get_round_trips_body() -> Result<()> {
        let server = MockServer::start_async().await;
        let policy = json!({"breakpoints": {"widths": [320, 640, 1024]}, "output": {"quality": 80}});
        let body = serde_json::to_string(&policy)?;

        let put = server.mock(|when, then| {
            when.method(PUT)
                .path("/imaging/v2/network/staging/policies/hero")
                .header("content-type", "application/json")
                .json_body(policy.clone());
            then.status(201)
                .json_body(json!({"operationPerformed": "CREATED", "id": "hero"}));
        });
        let mut stored = policy.clone();
        stored["id"] = json!("hero");
        stored["version"] = json!(1);
        let get = server.mock(|when, then| {
            when.method(GET).path("/imaging/v2/network/staging/policies/hero");
            then.status(200).json_body(stored.clone());
        });

        let mut manager = manager(&server)?;
        manager
            .set_policy(POLICY_SET, "hero", &body, Network::Staging, "")
            .await?;
        let fetched = manager
            .get_policy(POLICY_SET, "hero", Network::Staging, "")
            .await?;

        put.assert();
        get.assert();
        assert_eq!(fetched["breakpoints"], policy["breakpoints"]);
        assert_eq!(fetched["output"], policy["output"]);
        Ok(())
    }

    #[tokio::test]
    async fn delete_both_aggregates_by_network() -> Result<()> {
        let server = MockServer::start_async().await;
        let staging = server.mock(|when, then| {
            when.method(DELETE)
                .path("/imaging/v2/network/staging/policies/old")
                .query_param("accountSwitchKey", "K");
            then.status(200).json_body(json!({"operationPerformed": "DELETED"}));
        });
        let production = server.mock(|when, then| {
            when.method(DELETE)
                .path("/imaging/v2/network/production/policies/old")
                .query_param("accountSwitchKey", "K");
            then.status(204);
        });

        let mut manager = manager(&server)?;
        let result = manager
            .delete_policy(POLICY_SET, "old", NetworkTarget::Both, "K")
            .await?;

        staging.assert();
        production.assert();
        assert_eq!(
            result,
            json!({
                "staging": {"operationPerformed": "DELETED"},
                "production": {}
            })
        );
        Ok(())
    }

    #[tokio::test]
    async fn delete_single_network_keys_result_by_that_network() -> Result<()> {
        let server = MockServer::start_async().await;
        let production = server.mock(|when, then| {
            when.method(DELETE)
                .path("/imaging/v2/network/production/policies/old");
            then.status(204);
        });
        let staging = server.mock(|when, then| {
            when.method(DELETE).path("/imaging/v2/network/staging/policies/old");
            then.status(204);
        });

        let mut manager = manager(&server)?;
        let result = manager
            .delete_policy(POLICY_SET, "old", NetworkTarget::Production, "")
            .await?;

        production.assert_calls(1);
        staging.assert_calls(0);
        assert_eq!(result, json!({"production": {}}));
        Ok(())
    }

    #[tokio::test]
    async fn missing_policy_surfaces_not_found_with_path() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET)
                .path("/imaging/v2/network/production/policies/ghost");
            then.status(404).json_body(json!({"detail": "not here"}));
        });

        let mut manager = manager(&server)?;
        let err = manager
            .get_policy(POLICY_SET, "ghost", Network::Production, "")
            .await
            .err()
            .ok_or_else(|| anyhow!("expected not found"))?;

        assert!(matches!(err, ApiError::NotFound { .. }));
        assert!(
            err.to_string()
                .contains("/imaging/v2/network/production/policies/ghost")
        );
        Ok(())
    }
}
