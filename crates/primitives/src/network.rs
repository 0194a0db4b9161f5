use crate::Felt;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The StarkNet network a node is bound to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    /// The StarkNet mainnet.
    #[default]
    Mainnet,
    /// The Goerli testnet.
    Goerli,
    /// The second Goerli testnet.
    Goerli2,
    /// The integration network used to test upcoming StarkNet versions.
    Integration,
}

impl Network {
    /// Returns the chain id of the network as an ASCII short string.
    ///
    /// The integration network shares the Goerli chain id.
    pub fn chain_id(&self) -> Felt {
        match self {
            Self::Mainnet => short_string(b"SN_MAIN"),
            Self::Goerli | Self::Integration => short_string(b"SN_GOERLI"),
            Self::Goerli2 => short_string(b"SN_GOERLI2"),
        }
    }
}

/// Encodes an ASCII short string as a right aligned big endian felt.
fn short_string(ascii: &[u8]) -> Felt {
    debug_assert!(ascii.len() <= 31);
    let mut bytes = [0u8; 32];
    bytes[32 - ascii.len()..].copy_from_slice(ascii);
    Felt::from_bytes_be(&bytes)
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mainnet => "mainnet",
            Self::Goerli => "goerli",
            Self::Goerli2 => "goerli2",
            Self::Integration => "integration",
        };
        f.write_str(name)
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "goerli" => Ok(Self::Goerli),
            "goerli2" => Ok(Self::Goerli2),
            "integration" => Ok(Self::Integration),
            _ => Err(format!("unknown network: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_round_trips_through_from_str() {
        for network in
            [Network::Mainnet, Network::Goerli, Network::Goerli2, Network::Integration]
        {
            assert_eq!(network.to_string().parse::<Network>(), Ok(network));
        }
    }

    #[test]
    fn integration_shares_the_goerli_chain_id() {
        assert_eq!(Network::Integration.chain_id(), Network::Goerli.chain_id());
        assert_ne!(Network::Mainnet.chain_id(), Network::Goerli.chain_id());
    }
}
