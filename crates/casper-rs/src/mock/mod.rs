pub mod fs;
pub mod rpc;

pub use fs::MockFileReader;
pub use rpc::{serve_json_once, MockRpcClient};

use crate::args::{encode_string, RuntimeArgs};
use crate::deploy::DeployBuilder;
use crate::env::{Env, EnvConfigs};
use crate::response::GetDeployResponse;
use crate::signer::Signer;
use ed25519_dalek::SigningKey;
use serde_json::json;
use std::sync::Arc;

pub const MOCK_SECRET_KEY_1: &str =
    "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
pub const MOCK_SECRET_KEY_2: &str =
    "4ccd089b28ff96da9db6c346ec114e0f5b8a319f35aba624da8cf6ed4fb8a6fb";

pub const MOCK_CHAIN_NAME: &str = "casper-test";
pub const MOCK_TIMESTAMP: u64 = 1_592_549_507_000;

fn signer_from_hex(secret: &str) -> Signer {
    let bytes: [u8; 32] = hex::decode(secret).unwrap().try_into().unwrap();
    Signer::new(SigningKey::from_bytes(&bytes))
}

pub fn mock_signer1() -> Signer {
    signer_from_hex(MOCK_SECRET_KEY_1)
}

pub fn mock_signer2() -> Signer {
    signer_from_hex(MOCK_SECRET_KEY_2)
}

pub fn mock_session_args() -> RuntimeArgs {
    vec![encode_string("method", "relay_and_verify")].into()
}

/// A builder with every field pinned, so repeated builds hash identically.
pub fn mock_deploy_builder() -> DeployBuilder {
    DeployBuilder::new(mock_signer1().public_key(), MOCK_CHAIN_NAME)
        .with_session(vec![0, 97, 115, 109], mock_session_args())
        .with_payment_amount(2_000_000)
        .with_timestamp(MOCK_TIMESTAMP)
}

pub fn mock_env(client: MockRpcClient) -> (Env, Arc<MockRpcClient>) {
    let client = Arc::new(client);
    let env = Env::with_rpc_client(
        EnvConfigs {
            host: "127.0.0.1".to_string(),
            port: 7777,
            chain_name: MOCK_CHAIN_NAME.to_string(),
        },
        client.clone(),
    );
    (env, client)
}

pub fn mock_pending_response() -> GetDeployResponse {
    GetDeployResponse {
        api_version: Some("1.5.6".to_string()),
        execution_results: Vec::new(),
    }
}

fn mock_processed_response(result: serde_json::Value) -> GetDeployResponse {
    serde_json::from_value(json!({
        "api_version": "1.5.6",
        "execution_results": [{ "block_hash": "ab".repeat(32), "result": result }]
    }))
    .unwrap()
}

pub fn mock_success_response() -> GetDeployResponse {
    mock_processed_response(json!({ "Success": { "cost": "1482952" } }))
}

pub fn mock_failure_response(error_message: &str) -> GetDeployResponse {
    mock_processed_response(json!({
        "Failure": { "cost": "2000000", "error_message": error_message }
    }))
}
