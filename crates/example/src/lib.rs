//! Relays an oracle proof to the bridge contract through a session deploy.
pub mod packet;

use casper_rs::{encode_byte_list, encode_string, CasperHelperError, RuntimeArgs};
use packet::OraclePacket;

/// Entry point of the bridge contract that verifies and stores a proof.
pub const RELAY_AND_VERIFY: &str = "relay_and_verify";

/// A resolved price request from the `front_end` client, OBI-encoded.
pub const POCKET_HEX: &str = "0000000966726f6e745f656e6400000000000000010000000f00000003425443000000003b9aca00000000000000000400000000000000020000000966726f6e745f656e6400000000000034fd0000000000000004000000005eec6083000000005eec608701000000080000000000000000";

/// Session arguments selecting `relay_and_verify` with the encoded packet.
pub fn relay_and_verify_args(packet: &OraclePacket) -> Result<RuntimeArgs, CasperHelperError> {
    Ok(vec![
        encode_string("method", RELAY_AND_VERIFY),
        encode_byte_list("bytes", &packet.encode()?),
    ]
    .into())
}
