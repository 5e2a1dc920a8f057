use casper_rs::{DeployHash, DeployStatus, Env, EnvConfigs, PollConfigs};
use dotenv::dotenv;
use std::{env, error::Error, time::Duration};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let deploy_hash: DeployHash = env::args()
        .nth(1)
        .expect("usage: status <deploy-hash> [timeout-secs]")
        .parse()?;
    let timeout = match env::args().nth(2) {
        Some(secs) => Duration::from_secs(secs.parse()?),
        None => PollConfigs::default().timeout,
    };

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

    let poll = PollConfigs {
        timeout,
        ..PollConfigs::default()
    };
    match env.wait_for_deploy_processed(&deploy_hash, poll).await? {
        DeployStatus::Processed { block_hash, result } if result.is_success() => {
            println!("Deploy {} executed in block {} (cost {})", deploy_hash, block_hash, result.cost());
        }
        DeployStatus::Processed { block_hash, result } => {
            println!("Deploy {} failed in block {}: {:?}", deploy_hash, block_hash, result);
        }
        DeployStatus::Pending => println!("Deploy {} is still pending", deploy_hash),
    }

    Ok(())
}
