//! # Casper RPC Client
//!
//! This module provides the RPC client implementation for communicating with a
//! Casper node. It defines a trait for the RPC operations the helpers need and
//! a concrete JSON-RPC over HTTP implementation.
//!
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::deploy::{Deploy, DeployHash};
use crate::error::CasperHelperError;
use crate::response::GetDeployResponse;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

const JSON_RPC_VERSION: &str = "2.0";
const PUT_DEPLOY_METHOD: &str = "account_put_deploy";
const GET_DEPLOY_METHOD: &str = "info_get_deploy";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Interface for RPC operations with a Casper node.
///
/// This trait defines the core operations that any RPC client must implement,
/// providing an abstraction layer that allows for different implementations,
/// including mock implementations for testing.
#[async_trait::async_trait]
pub trait RpcClient: Send + Sync {
    async fn put_deploy(&self, deploy: &Deploy) -> Result<DeployHash, CasperHelperError>;
    async fn get_deploy(
        &self,
        deploy_hash: &DeployHash,
    ) -> Result<GetDeployResponse, CasperHelperError>;
}

#[derive(Serialize)]
struct JsonRpcRequest<'a, P> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Deserialize)]
struct JsonRpcResponse<R> {
    result: Option<R>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

impl From<JsonRpcError> for CasperHelperError {
    fn from(err: JsonRpcError) -> Self {
        let message = match err.data {
            Some(data) => format!("{} (code {}): {}", err.message, err.code, data),
            None => format!("{} (code {})", err.message, err.code),
        };
        Self::DeployRejected(message)
    }
}

#[derive(Serialize)]
struct PutDeployParams<'a> {
    deploy: &'a Deploy,
}

#[derive(Deserialize)]
struct PutDeployResult {
    deploy_hash: DeployHash,
}

#[derive(Serialize)]
struct GetDeployParams<'a> {
    deploy_hash: &'a DeployHash,
}

/// JSON-RPC client talking to a node's `/rpc` endpoint.
pub struct ExternalRpcClient {
    client: reqwest::Client,
    url: reqwest::Url,
    next_id: AtomicU64,
}

impl ExternalRpcClient {
    /// Creates a new client for the node at `host:port`.
    ///
    /// `host` may carry a scheme (`https://node.example`); plain hosts use `http`.
    ///
    /// # Errors
    ///
    /// Returns `CasperHelperError::NetworkRequestFailed` if the address is not a
    /// valid URL or the HTTP client cannot be initialized.
    pub fn new(host: &str, port: u16) -> Result<Self, CasperHelperError> {
        let base = if host.contains("://") {
            host.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", host)
        };
        let url = reqwest::Url::parse(&format!("{}:{}/rpc", base, port)).map_err(|e| {
            CasperHelperError::NetworkRequestFailed(format!(
                "Invalid node address {}:{}: {}",
                host, port, e
            ))
        })?;

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                CasperHelperError::NetworkRequestFailed(format!("Failed to create client: {}", e))
            })?;

        Ok(Self {
            client,
            url,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn call<P, R>(&self, method: &str, params: P) -> Result<R, CasperHelperError>
    where
        P: Serialize + Send,
        R: DeserializeOwned,
    {
        let request = JsonRpcRequest {
            jsonrpc: JSON_RPC_VERSION,
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        debug!(method, id = request.id, url = %self.url, "sending rpc request");

        let response = self
            .client
            .post(self.url.clone())
            .json(&request)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| CasperHelperError::NetworkRequestFailed(format!("Error: {}", e)))?;

        let body: JsonRpcResponse<R> = response.json().await.map_err(|e| {
            CasperHelperError::NetworkRequestFailed(format!("Invalid rpc response: {}", e))
        })?;

        match (body.result, body.error) {
            (_, Some(error)) => Err(error.into()),
            (Some(result), None) => Ok(result),
            (None, None) => Err(CasperHelperError::NetworkRequestFailed(format!(
                "Rpc response to {} has neither result nor error",
                method
            ))),
        }
    }
}

#[async_trait::async_trait]
impl RpcClient for ExternalRpcClient {
    /// Submits a signed deploy and returns the hash acknowledged by the node.
    async fn put_deploy(&self, deploy: &Deploy) -> Result<DeployHash, CasperHelperError> {
        let result: PutDeployResult = self
            .call(PUT_DEPLOY_METHOD, PutDeployParams { deploy })
            .await?;
        Ok(result.deploy_hash)
    }

    /// Fetches a deploy together with its execution results.
    async fn get_deploy(
        &self,
        deploy_hash: &DeployHash,
    ) -> Result<GetDeployResponse, CasperHelperError> {
        self.call(GET_DEPLOY_METHOD, GetDeployParams { deploy_hash })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{mock_deploy_builder, mock_signer1, serve_json_once};
    use serde_json::json;

    #[test]
    fn test_new() {
        let client = ExternalRpcClient::new("deploy.casperlabs.io", 40401).unwrap();
        assert_eq!(client.url(), "http://deploy.casperlabs.io:40401/rpc");

        let client = ExternalRpcClient::new("https://node.example/", 7777).unwrap();
        assert_eq!(client.url(), "https://node.example:7777/rpc");
    }

    #[test]
    fn test_new_invalid_host() {
        let res = ExternalRpcClient::new("bad host name", 7777);
        assert!(matches!(
            res.err().unwrap(),
            CasperHelperError::NetworkRequestFailed(_)
        ));
    }

    #[tokio::test]
    async fn test_put_deploy() {
        let deploy = mock_deploy_builder().build().unwrap().sign(&mock_signer1());
        let (port, request) = serve_json_once(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": { "api_version": "1.5.6", "deploy_hash": deploy.hash().to_string() }
        }))
        .await;

        let client = ExternalRpcClient::new("127.0.0.1", port).unwrap();
        let hash = client.put_deploy(&deploy).await.unwrap();
        assert_eq!(&hash, deploy.hash());

        let request = request.await.unwrap();
        assert_eq!(request["jsonrpc"], "2.0");
        assert_eq!(request["method"], PUT_DEPLOY_METHOD);
        assert_eq!(request["params"]["deploy"]["hash"], deploy.hash().to_string());
    }

    #[tokio::test]
    async fn test_get_deploy() {
        let deploy = mock_deploy_builder().build().unwrap();
        let (port, request) = serve_json_once(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": { "api_version": "1.5.6", "execution_results": [] }
        }))
        .await;

        let client = ExternalRpcClient::new("127.0.0.1", port).unwrap();
        let response = client.get_deploy(deploy.hash()).await.unwrap();
        assert!(response.execution_results.is_empty());

        let request = request.await.unwrap();
        assert_eq!(request["method"], GET_DEPLOY_METHOD);
        assert_eq!(request["params"]["deploy_hash"], deploy.hash().to_string());
    }

    #[tokio::test]
    async fn test_rpc_error_response() {
        let deploy = mock_deploy_builder().build().unwrap();
        let (port, _request) = serve_json_once(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32008, "message": "invalid deploy", "data": "expired" }
        }))
        .await;

        let client = ExternalRpcClient::new("127.0.0.1", port).unwrap();
        let err = client.put_deploy(&deploy).await.unwrap_err();
        assert_eq!(
            err,
            CasperHelperError::DeployRejected(
                "invalid deploy (code -32008): \"expired\"".to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = ExternalRpcClient::new("127.0.0.1", port).unwrap();
        let deploy = mock_deploy_builder().build().unwrap();
        let res = client.get_deploy(deploy.hash()).await;
        assert!(matches!(
            res.err().unwrap(),
            CasperHelperError::NetworkRequestFailed(_)
        ));
    }
}
