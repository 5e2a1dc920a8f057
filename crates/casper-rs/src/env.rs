use crate::{
    args::RuntimeArgs,
    contract::Contract,
    deploy::{Deploy, DeployHash, DEFAULT_GAS_PRICE},
    error::CasperHelperError,
    fs::{DefaultFileReader, FileReader},
    response::{DeployStatus, GetDeployResponse},
    rpc::{ExternalRpcClient, RpcClient},
    signer::{PublicKey, Signer},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

#[derive(Clone, Debug)]
pub struct EnvConfigs {
    pub host: String,
    pub port: u16,
    pub chain_name: String,
}

/// How often and for how long to poll a submitted deploy.
#[derive(Clone, Copy, Debug)]
pub struct PollConfigs {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollConfigs {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            timeout: Duration::from_secs(180),
        }
    }
}

/// Everything needed to submit one session deploy on behalf of an account.
#[derive(Clone, Debug)]
pub struct DeployRequest {
    /// Sender account, as a hex public key with or without the `01` tag.
    pub from_addr: String,
    /// Path of the sender's private key file.
    pub private_key: String,
    /// Path of the session WASM module.
    pub session: String,
    pub session_args: RuntimeArgs,
    pub gas_price: u64,
    pub payment_amount: u64,
}

impl DeployRequest {
    /// Creates a request paying `payment_amount` motes at the default gas price.
    pub fn new(
        from_addr: impl Into<String>,
        private_key: impl Into<String>,
        session: impl Into<String>,
        session_args: RuntimeArgs,
        payment_amount: u64,
    ) -> Self {
        Self {
            from_addr: from_addr.into(),
            private_key: private_key.into(),
            session: session.into(),
            session_args,
            gas_price: DEFAULT_GAS_PRICE,
            payment_amount,
        }
    }

    pub fn with_gas_price(mut self, gas_price: u64) -> Self {
        self.gas_price = gas_price;
        self
    }

    pub fn with_payment_amount(mut self, payment_amount: u64) -> Self {
        self.payment_amount = payment_amount;
        self
    }
}

/// Client handle for one node and chain.
#[derive(Clone)]
pub struct Env {
    pub(crate) rpc_client: Arc<dyn RpcClient + Send + Sync>,
    pub(crate) configs: EnvConfigs,
}

impl Env {
    pub fn new(configs: EnvConfigs) -> Result<Self, CasperHelperError> {
        let client = ExternalRpcClient::new(&configs.host, configs.port)?;
        Ok(Self {
            rpc_client: Arc::new(client),
            configs,
        })
    }

    pub fn with_rpc_client(
        configs: EnvConfigs,
        rpc_client: Arc<dyn RpcClient + Send + Sync>,
    ) -> Self {
        Self {
            rpc_client,
            configs,
        }
    }

    pub fn chain_name(&self) -> &str {
        &self.configs.chain_name
    }

    pub fn configs(&self) -> &EnvConfigs {
        &self.configs
    }

    /// Validates a signed deploy and hands it to the node.
    pub async fn send_deploy(&self, deploy: &Deploy) -> Result<DeployHash, CasperHelperError> {
        deploy.validate()?;
        if deploy.header().chain_name() != self.chain_name() {
            return Err(CasperHelperError::InvalidArgument(format!(
                "Deploy targets chain {}, client is configured for {}",
                deploy.header().chain_name(),
                self.chain_name()
            )));
        }

        info!(deploy_hash = %deploy.hash(), account = %deploy.header().account(), "submitting deploy");
        let hash = self.rpc_client.put_deploy(deploy).await.map_err(|e| {
            warn!(deploy_hash = %deploy.hash(), error = %e, "deploy submission failed");
            match e {
                // The node reports bad approvals as a plain rpc error
                CasperHelperError::DeployRejected(message)
                    if mentions_authorization(&message) =>
                {
                    CasperHelperError::Unauthorized(message)
                }
                other => other,
            }
        })?;

        if &hash != deploy.hash() {
            warn!(expected = %deploy.hash(), received = %hash, "node acknowledged a different deploy hash");
        }
        Ok(hash)
    }

    pub async fn get_deploy(
        &self,
        deploy_hash: &DeployHash,
    ) -> Result<GetDeployResponse, CasperHelperError> {
        self.rpc_client.get_deploy(deploy_hash).await
    }

    /// Loads the sender's key and session module from disk, then builds,
    /// signs and submits the deploy.
    pub async fn submit_deploy(
        &self,
        request: DeployRequest,
    ) -> Result<DeployHash, CasperHelperError> {
        self.submit_deploy_with(request, &DefaultFileReader).await
    }

    pub async fn submit_deploy_with(
        &self,
        request: DeployRequest,
        reader: &dyn FileReader,
    ) -> Result<DeployHash, CasperHelperError> {
        let from_addr: PublicKey = request.from_addr.parse().map_err(|e| {
            CasperHelperError::InvalidArgument(format!(
                "Invalid sender address {}: {}",
                request.from_addr, e
            ))
        })?;

        let signer = Signer::from_key_file(&request.private_key, reader)?;
        if signer.public_key() != from_addr {
            return Err(CasperHelperError::Unauthorized(format!(
                "Key {} does not belong to sender {}",
                request.private_key, from_addr
            )));
        }

        let contract = Contract::from_reader(&request.session, reader)?;
        contract
            .deploy(
                self,
                &signer,
                request.session_args,
                request.gas_price,
                request.payment_amount,
            )
            .await
    }

    /// Polls the node until the deploy shows up in a block.
    ///
    /// Returns the processed status whether execution succeeded or failed; use
    /// [`DeployStatus::into_result`] to treat a failed execution as an error.
    pub async fn wait_for_deploy_processed(
        &self,
        deploy_hash: &DeployHash,
        poll: PollConfigs,
    ) -> Result<DeployStatus, CasperHelperError> {
        let started = Instant::now();
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            let status = self.get_deploy(deploy_hash).await?.status();
            if let DeployStatus::Processed { block_hash, result } = &status {
                info!(
                    %deploy_hash,
                    %block_hash,
                    success = result.is_success(),
                    cost = result.cost(),
                    "deploy processed"
                );
                return Ok(status);
            }

            if started.elapsed() >= poll.timeout {
                warn!(%deploy_hash, attempts, "gave up waiting for deploy");
                return Err(CasperHelperError::Timeout(format!(
                    "Deploy {} not processed after {:?}",
                    deploy_hash, poll.timeout
                )));
            }

            debug!(%deploy_hash, attempts, "deploy pending");
            let remaining = poll.timeout.saturating_sub(started.elapsed());
            sleep(poll.interval.min(remaining)).await;
        }
    }
}

fn mentions_authorization(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("approval") || message.contains("signature")
}
