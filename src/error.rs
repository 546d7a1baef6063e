use alloy::primitives::{Address, TxHash, U256};
use thiserror::Error;

/// Failure kinds callers can match on after downcasting an `eyre::Report`.
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("no provider is active, type connect first")]
    NoLibrary,

    #[error("no signer available for account {0}")]
    MissingSigner(Address),

    #[error("no injected wallet found, set RARITY_PRIVATE_KEY to connect")]
    NoInjectedWallet,

    #[error("unsupported chain id {actual}, expected {expected}")]
    UnsupportedChain { expected: u64, actual: u64 },

    #[error("transaction {0} reverted")]
    Reverted(TxHash),

    #[error("summoner {summoner}'s name was not updated after {attempts} reads")]
    NameTimeout { summoner: U256, attempts: u32 },

    #[error("summoner index query failed: {0}")]
    Index(String),
}
