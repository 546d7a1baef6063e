use alloy::primitives::{Address, address};
use serde::{Deserialize, Serialize};

pub const FANTOM_CHAIN_ID: u64 = 250;
pub const FANTOM_RPC_URL: &str = "https://rpc.ftm.tools/";
pub const RARITY_SUBGRAPH_URL: &str = "https://api.thegraph.com/subgraphs/name/eabz/rarity";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalAddresses {
    pub rarity: Address,
    pub names: Address,
    pub gold: Address,
}

pub const FANTOM_ADDRESSES: PortalAddresses = PortalAddresses {
    rarity: address!("0xce761D788DF608BD21bdd59d6f4B54b2e27F25Bb"),
    names: address!("0x4c40CE3fb33A6781c903Bc830804DE4195Cc966f"),
    gold: address!("0x2069B76Afe6b734Fb65D1d099E7ec64ee9CC76B2"),
};

impl Default for PortalAddresses {
    fn default() -> Self {
        FANTOM_ADDRESSES
    }
}

/// Contracts the portal talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalContract {
    /// Summoner NFT contract (summon, adventure, experience)
    Rarity,
    /// Summoner naming contract
    Names,
    /// Gold token contract
    Gold,
}

impl PortalAddresses {
    pub fn address(&self, contract: PortalContract) -> Address {
        match contract {
            PortalContract::Rarity => self.rarity,
            PortalContract::Names => self.names,
            PortalContract::Gold => self.gold,
        }
    }
}
