mod args;
mod bytesrepr;
mod clvalue;
mod contract;
mod crypto;
mod deploy;
mod env;
mod error;
mod fs;
#[cfg(test)]
mod mock;
mod response;
mod rpc;
mod signer;

pub use args::{encode_byte_list, encode_string, try_encode_byte_list, NamedArg, RuntimeArgs};
pub use clvalue::{CLList, CLType, CLValue};
pub use contract::Contract;
pub use crypto::{blake2b_hash, Digest};
pub use deploy::{
    Deploy, DeployBuilder, DeployHash, DeployHeader, Payment, Session, DEFAULT_GAS_PRICE,
    DEFAULT_TTL,
};
pub use env::{DeployRequest, Env, EnvConfigs, PollConfigs};
pub use error::CasperHelperError;
pub use fs::{DefaultFileReader, FileReader};
pub use response::{BlockExecutionResult, DeployStatus, ExecutionResult, GetDeployResponse};
pub use rpc::{ExternalRpcClient, RpcClient};
pub use signer::{Approval, PublicKey, Signature, Signer};

// traits
pub use bytesrepr::ToBytes;
pub use clvalue::IntoCLValue;
