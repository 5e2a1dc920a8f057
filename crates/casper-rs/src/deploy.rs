//! # Deploys
//!
//! A deploy bundles a header, a payment, a session (module bytes plus named
//! arguments) and the approvals of its signers. The header commits to the
//! payment and session through `body_hash`, and the deploy hash is the hash
//! of the header, so any change to the arguments changes the deploy hash.
use std::{fmt, str::FromStr, time::Duration, time::SystemTime, time::UNIX_EPOCH};

use crate::args::RuntimeArgs;
use crate::bytesrepr::{self, ToBytes};
use crate::crypto::{blake2b_hash, Digest};
use crate::error::CasperHelperError;
use crate::signer::{Approval, PublicKey, Signer};
use serde::{Deserialize, Serialize};

pub const DEFAULT_GAS_PRICE: u64 = 1;
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// Identifier the node returns for a submitted deploy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeployHash(Digest);

impl DeployHash {
    pub fn new(digest: Digest) -> Self {
        Self(digest)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }

    pub fn inner(&self) -> &Digest {
        &self.0
    }
}

impl fmt::Display for DeployHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DeployHash {
    type Err = CasperHelperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

mod hex_bytes {
    use serde::Serializer;

    pub fn serialize<S: Serializer, T: AsRef<[u8]>>(
        bytes: &T,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes.as_ref()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployHeader {
    account: PublicKey,
    timestamp: u64,
    ttl: u64,
    gas_price: u64,
    body_hash: Digest,
    chain_name: String,
}

impl DeployHeader {
    pub fn account(&self) -> &PublicKey {
        &self.account
    }

    /// Milliseconds since the Unix epoch.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Time to live, in milliseconds.
    pub fn ttl(&self) -> u64 {
        self.ttl
    }

    pub fn gas_price(&self) -> u64 {
        self.gas_price
    }

    pub fn body_hash(&self) -> &Digest {
        &self.body_hash
    }

    pub fn chain_name(&self) -> &str {
        &self.chain_name
    }
}

impl ToBytes for DeployHeader {
    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), CasperHelperError> {
        self.account.write_bytes(writer)?;
        self.timestamp.write_bytes(writer)?;
        self.ttl.write_bytes(writer)?;
        self.gas_price.write_bytes(writer)?;
        self.body_hash.0.write_bytes(writer)?;
        self.chain_name.write_bytes(writer)
    }
}

/// Amount of motes the sender is willing to pay for execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payment {
    amount: u64,
}

impl Payment {
    pub fn amount(&self) -> u64 {
        self.amount
    }
}

impl ToBytes for Payment {
    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), CasperHelperError> {
        self.amount.write_bytes(writer)
    }
}

/// The WASM module to execute and the arguments passed to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    #[serde(serialize_with = "hex_bytes::serialize")]
    module_bytes: Vec<u8>,
    args: RuntimeArgs,
}

impl Session {
    pub fn new(module_bytes: Vec<u8>, args: RuntimeArgs) -> Self {
        Self { module_bytes, args }
    }

    pub fn module_bytes(&self) -> &[u8] {
        &self.module_bytes
    }

    pub fn args(&self) -> &RuntimeArgs {
        &self.args
    }
}

impl ToBytes for Session {
    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), CasperHelperError> {
        bytesrepr::write_byte_vec(writer, &self.module_bytes)?;
        self.args.write_bytes(writer)
    }
}

/// A fully assembled deploy. Built once by [`DeployBuilder`]; signing returns
/// a new value rather than mutating in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deploy {
    hash: DeployHash,
    header: DeployHeader,
    payment: Payment,
    session: Session,
    approvals: Vec<Approval>,
}

impl Deploy {
    pub fn hash(&self) -> &DeployHash {
        &self.hash
    }

    pub fn header(&self) -> &DeployHeader {
        &self.header
    }

    pub fn payment(&self) -> &Payment {
        &self.payment
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn approvals(&self) -> &[Approval] {
        &self.approvals
    }

    /// Returns the deploy with `signer`'s approval appended. Signing twice
    /// with the same key adds a single approval.
    pub fn sign(mut self, signer: &Signer) -> Self {
        let approval = signer.sign(&self.hash);
        if !self.approvals.contains(&approval) {
            self.approvals.push(approval);
        }
        self
    }

    pub fn is_signed_by(&self, key: &PublicKey) -> bool {
        self.approvals.iter().any(|approval| &approval.signer == key)
    }

    /// Recomputes both hashes and verifies every approval.
    pub fn validate(&self) -> Result<(), CasperHelperError> {
        let body_hash = body_hash(&self.payment, &self.session)?;
        if body_hash != self.header.body_hash {
            return Err(CasperHelperError::InvalidArgument(format!(
                "Body hash mismatch: header has {}, body hashes to {}",
                self.header.body_hash, body_hash
            )));
        }

        let hash = deploy_hash(&self.header)?;
        if hash != self.hash {
            return Err(CasperHelperError::InvalidArgument(format!(
                "Deploy hash mismatch: deploy has {}, header hashes to {}",
                self.hash, hash
            )));
        }

        if self.approvals.is_empty() {
            return Err(CasperHelperError::Unauthorized(
                "Deploy has no approvals".to_string(),
            ));
        }

        self.approvals
            .iter()
            .try_for_each(|approval| approval.verify(&self.hash))
    }
}

fn body_hash(payment: &Payment, session: &Session) -> Result<Digest, CasperHelperError> {
    let mut buffer = payment.to_bytes()?;
    session.write_bytes(&mut buffer)?;
    Ok(blake2b_hash(&buffer))
}

fn deploy_hash(header: &DeployHeader) -> Result<DeployHash, CasperHelperError> {
    Ok(DeployHash(blake2b_hash(&header.to_bytes()?)))
}

#[derive(Clone)]
pub struct DeployBuilder {
    pub account: PublicKey,
    pub chain_name: String,
    pub gas_price: u64,
    pub payment_amount: u64,
    pub ttl: Duration,
    pub timestamp: Option<u64>,
    pub session: Option<Session>,
}

impl DeployBuilder {
    pub fn new(account: PublicKey, chain_name: impl Into<String>) -> Self {
        Self {
            account,
            chain_name: chain_name.into(),
            gas_price: DEFAULT_GAS_PRICE,
            payment_amount: 0,
            ttl: DEFAULT_TTL,
            timestamp: None,
            session: None,
        }
    }

    pub fn with_session(mut self, module_bytes: Vec<u8>, args: RuntimeArgs) -> Self {
        self.session = Some(Session::new(module_bytes, args));
        self
    }

    pub fn with_gas_price(mut self, gas_price: u64) -> Self {
        self.gas_price = gas_price;
        self
    }

    pub fn with_payment_amount(mut self, payment_amount: u64) -> Self {
        self.payment_amount = payment_amount;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Pins the header timestamp, in milliseconds since the Unix epoch.
    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn build(self) -> Result<Deploy, CasperHelperError> {
        let session = self.session.ok_or_else(|| {
            CasperHelperError::DeployBuildFailed("Session code not set".to_string())
        })?;
        if self.chain_name.is_empty() {
            return Err(CasperHelperError::DeployBuildFailed(
                "Chain name must not be empty".to_string(),
            ));
        }
        if self.gas_price == 0 {
            return Err(CasperHelperError::DeployBuildFailed(
                "Gas price must be greater than zero".to_string(),
            ));
        }
        if self.payment_amount == 0 {
            return Err(CasperHelperError::DeployBuildFailed(
                "Payment amount must be greater than zero".to_string(),
            ));
        }

        let timestamp = match self.timestamp {
            Some(timestamp) => timestamp,
            None => now_millis()?,
        };
        let ttl = u64::try_from(self.ttl.as_millis()).map_err(|_| {
            CasperHelperError::DeployBuildFailed("Time to live is too large".to_string())
        })?;

        let payment = Payment {
            amount: self.payment_amount,
        };
        let header = DeployHeader {
            account: self.account,
            timestamp,
            ttl,
            gas_price: self.gas_price,
            body_hash: body_hash(&payment, &session)?,
            chain_name: self.chain_name,
        };
        let hash = deploy_hash(&header)?;

        Ok(Deploy {
            hash,
            header,
            payment,
            session,
            approvals: Vec::new(),
        })
    }
}

fn now_millis() -> Result<u64, CasperHelperError> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| CasperHelperError::DeployBuildFailed(format!("System clock error: {}", e)))?;
    u64::try_from(elapsed.as_millis())
        .map_err(|_| CasperHelperError::DeployBuildFailed("System clock overflow".to_string()))
}
