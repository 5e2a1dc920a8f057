use crate::{
    args::RuntimeArgs,
    deploy::{DeployBuilder, DeployHash},
    env::Env,
    error::CasperHelperError,
    fs::{DefaultFileReader, FileReader},
    signer::Signer,
};

/// Session WASM executed in the context of the deploying account.
pub struct Contract {
    wasm_bytes: Vec<u8>,
}

impl Contract {
    pub fn new(wasm_path: &str) -> Result<Self, CasperHelperError> {
        Self::from_reader(wasm_path, &DefaultFileReader)
    }

    pub fn from_reader(
        wasm_path: &str,
        reader: &dyn FileReader,
    ) -> Result<Self, CasperHelperError> {
        let wasm_bytes = reader.read(wasm_path)?;
        if wasm_bytes.is_empty() {
            return Err(CasperHelperError::InvalidArgument(format!(
                "Session module {} is empty",
                wasm_path
            )));
        }

        Ok(Self { wasm_bytes })
    }

    pub fn wasm_bytes(&self) -> &[u8] {
        &self.wasm_bytes
    }

    /// Builds a deploy running this module with `args`, signs it with
    /// `signer` and submits it through `env`.
    pub async fn deploy(
        &self,
        env: &Env,
        signer: &Signer,
        args: RuntimeArgs,
        gas_price: u64,
        payment_amount: u64,
    ) -> Result<DeployHash, CasperHelperError> {
        let deploy = DeployBuilder::new(signer.public_key(), env.chain_name())
            .with_session(self.wasm_bytes.clone(), args)
            .with_gas_price(gas_price)
            .with_payment_amount(payment_amount)
            .build()?
            .sign(signer);

        env.send_deploy(&deploy).await
    }
}
