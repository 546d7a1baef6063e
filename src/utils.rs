use std::time::Duration;

use alloy::{
    network::EthereumWallet,
    primitives::{U256, utils::format_units},
    providers::ProviderBuilder,
    signers::local::PrivateKeySigner,
};

use crate::types::{PublicProvider, WalletProvider};

/// Decimal scale of the gold token.
pub const GOLD_DECIMALS: u8 = 18;

pub fn get_wallet_provider(
    signer: PrivateKeySigner,
    rpc_url: impl ToString,
) -> eyre::Result<WalletProvider> {
    let wallet = EthereumWallet::from(signer);
    let url = rpc_url.to_string().parse()?;

    let provider = ProviderBuilder::new().wallet(wallet).on_http(url);

    Ok(provider)
}

pub fn get_public_provider(rpc_url: impl ToString) -> eyre::Result<PublicProvider> {
    let url = rpc_url.to_string().parse()?;

    let provider = ProviderBuilder::new().on_http(url);

    Ok(provider)
}

/// Fixed-interval pause used for UI pacing and read-after-write polling.
pub async fn wait(interval: Duration) {
    tokio::time::sleep(interval).await;
}

/// Renders base units as a decimal amount, keeping at least one fractional
/// digit: `1.0`, `0.25`, `12.5`.
pub fn format_amount(amount: U256, decimals: u8) -> eyre::Result<String> {
    let formatted = format_units(amount, decimals)?;
    let Some((whole, fraction)) = formatted.split_once('.') else {
        return Ok(format!("{formatted}.0"));
    };

    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        Ok(format!("{whole}.0"))
    } else {
        Ok(format!("{whole}.{fraction}"))
    }
}
