use casper_helpers_example::{packet::OraclePacket, relay_and_verify_args, POCKET_HEX};
use casper_rs::{DeployRequest, Env, EnvConfigs};
use dotenv::dotenv;
use std::{env, error::Error};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Node connection, defaulting to the public deploy endpoint
    let host = env::var("CASPER_NODE_HOST").unwrap_or_else(|_| "deploy.casperlabs.io".to_string());
    let port: u16 = env::var("CASPER_NODE_PORT")
        .unwrap_or_else(|_| "40401".to_string())
        .parse()?;
    let chain_name = env::var("CASPER_CHAIN_NAME").unwrap_or_else(|_| "casper-test".to_string());

    let env = Env::new(EnvConfigs {
        host,
        port,
        chain_name,
    })?;

    // Sender account and its key file
    let from_addr = env::var("CASPER_FROM_ADDR").expect("CASPER_FROM_ADDR must be set in .env file");
    let private_key =
        env::var("CASPER_PRIVATE_KEY_PATH").unwrap_or_else(|_| "counter.private.key".to_string());
    let session = env::var("CASPER_SESSION_PATH").unwrap_or_else(|_| {
        "contract/target/wasm32-unknown-unknown/release/contract.wasm".to_string()
    });

    let packet = OraclePacket::from_hex(POCKET_HEX)?;
    let storage_key = packet.req.storage_key()?;
    info!(
        client_id = %packet.req.client_id,
        request_id = packet.res.request_id,
        %storage_key,
        "relaying oracle packet"
    );

    let args = relay_and_verify_args(&packet)?;
    let request =
        DeployRequest::new(from_addr, private_key, session, args, 2_000_000).with_gas_price(10);

    let deploy_hash = env.submit_deploy(request).await?;
    println!("Deploy submitted: {}", deploy_hash);

    Ok(())
}
