use crate::deploy::{Deploy, DeployHash};
use crate::error::CasperHelperError;
use crate::response::GetDeployResponse;
use crate::rpc::RpcClient;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, RwLock};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use super::mock_pending_response;

/// Scripted RPC client. `put_deploy` echoes the deploy hash unless a result is
/// set; `get_deploy` pops queued results and reports a pending deploy once the
/// queue is drained.
pub struct MockRpcClient {
    put_deploy_result: RwLock<Option<Result<DeployHash, CasperHelperError>>>,
    get_deploy_results: Mutex<VecDeque<Result<GetDeployResponse, CasperHelperError>>>,
    submitted: Mutex<Vec<Deploy>>,
    get_deploy_calls: Mutex<usize>,
}

impl MockRpcClient {
    pub fn new() -> Self {
        Self {
            put_deploy_result: RwLock::new(None),
            get_deploy_results: Mutex::new(VecDeque::new()),
            submitted: Mutex::new(Vec::new()),
            get_deploy_calls: Mutex::new(0),
        }
    }

    pub fn with_put_deploy_result(self, result: Result<DeployHash, CasperHelperError>) -> Self {
        *self.put_deploy_result.write().unwrap() = Some(result);
        self
    }

    pub fn with_get_deploy_results(
        self,
        results: Vec<Result<GetDeployResponse, CasperHelperError>>,
    ) -> Self {
        self.get_deploy_results.lock().unwrap().extend(results);
        self
    }

    pub fn submitted_deploys(&self) -> Vec<Deploy> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn get_deploy_calls(&self) -> usize {
        *self.get_deploy_calls.lock().unwrap()
    }
}

#[async_trait]
impl RpcClient for MockRpcClient {
    async fn put_deploy(&self, deploy: &Deploy) -> Result<DeployHash, CasperHelperError> {
        self.submitted.lock().unwrap().push(deploy.clone());
        let result = self.put_deploy_result.read().unwrap();
        match result.as_ref() {
            Some(res) => res.clone(),
            None => Ok(*deploy.hash()),
        }
    }

    async fn get_deploy(
        &self,
        _deploy_hash: &DeployHash,
    ) -> Result<GetDeployResponse, CasperHelperError> {
        *self.get_deploy_calls.lock().unwrap() += 1;
        let next = self.get_deploy_results.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(mock_pending_response()))
    }
}

/// Serves a single HTTP request on a local port, answering with `body`.
///
/// Returns the port and a handle resolving to the JSON body of the request
/// that was received.
pub async fn serve_json_once(body: serde_json::Value) -> (u16, JoinHandle<serde_json::Value>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_http_body(&mut stream).await;

        let payload = body.to_string();
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            payload.len(),
            payload
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();

        serde_json::from_slice(&request).unwrap()
    });

    (port, handle)
}

async fn read_http_body(stream: &mut tokio::net::TcpStream) -> Vec<u8> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let read = stream.read(&mut chunk).await.unwrap();
        assert!(read > 0, "connection closed before the request was complete");
        buffer.extend_from_slice(&chunk[..read]);

        let Some(header_end) = buffer.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let headers = String::from_utf8_lossy(&buffer[..header_end]).to_lowercase();
        let content_length = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .map(|value| value.trim().parse::<usize>().unwrap())
            .unwrap_or(0);

        let body_start = header_end + 4;
        if buffer.len() >= body_start + content_length {
            return buffer[body_start..body_start + content_length].to_vec();
        }
    }
}
