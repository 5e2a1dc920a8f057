use casper_rs::{
    encode_byte_list, encode_string, DeployRequest, Env, EnvConfigs, PollConfigs, RuntimeArgs,
};
use dotenv::from_path;
use std::{env, path::Path};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    from_path(Path::new("examples/.env")).ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let from_addr = env::var("CASPER_FROM_ADDR").expect("CASPER_FROM_ADDR must be set in .env file");
    let private_key = env::var("CASPER_PRIVATE_KEY_PATH")
        .expect("CASPER_PRIVATE_KEY_PATH must be set in .env file");
    let session = env::var("CASPER_SESSION_PATH")
        .unwrap_or_else(|_| "contract/target/wasm32-unknown-unknown/release/contract.wasm".to_string());

    // Connects to the node
    let env = Env::new(EnvConfigs {
        host: "localhost".to_string(),
        port: 7777,
        chain_name: "casper-net-1".to_string(),
    })?;

    // Session arguments are read by the contract in this order
    let args: RuntimeArgs = vec![
        encode_string("method", "ping"),
        encode_byte_list("bytes", b"hello casper"),
    ]
    .into();

    let request = DeployRequest::new(from_addr, private_key, session, args, 2_000_000)
        .with_gas_price(10);
    let deploy_hash = env.submit_deploy(request).await?;
    println!("Deploy submitted: {}", deploy_hash);

    let status = env
        .wait_for_deploy_processed(&deploy_hash, PollConfigs::default())
        .await?;
    let block_hash = status.into_result()?;
    println!("Deploy executed in block {}", block_hash);

    Ok(())
}
