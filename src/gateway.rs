use std::future::Future;

use alloy::{
    network::ReceiptResponse as _,
    primitives::{Address, TxHash, U256},
    providers::DynProvider,
    rpc::types::TransactionReceipt,
};
use tracing::debug;

use crate::{
    addresses::{PortalAddresses, PortalContract},
    connection::Connection,
    contracts::{Rarity, RarityGold, RarityNames},
    error::PortalError,
};

/// A contract binding that can be constructed from an address and provider.
pub trait ContractInterface: Sized {
    fn bind(address: Address, provider: DynProvider) -> Self;
}

/// Binds `C` at `address` to the connected account's signer, or read-only to
/// the connection's provider when no account is connected. A fresh handle is
/// built on every call.
pub fn get_contract<C: ContractInterface>(
    connection: &Connection,
    address: Address,
) -> eyre::Result<C> {
    let library = connection.library.as_ref().ok_or(PortalError::NoLibrary)?;

    let provider = match connection.account {
        Some(account) => library
            .signer(account)
            .ok_or(PortalError::MissingSigner(account))?,
        None => library.read_only(),
    };

    Ok(C::bind(address, provider))
}

pub trait RarityContract: Send + Sync {
    fn summon(&self, class: u8) -> impl Future<Output = eyre::Result<TxHash>> + Send;

    fn adventure(&self, summoner: U256) -> impl Future<Output = eyre::Result<TxHash>> + Send;

    fn xp(&self, summoner: U256) -> impl Future<Output = eyre::Result<U256>> + Send;

    fn level(&self, summoner: U256) -> impl Future<Output = eyre::Result<U256>> + Send;

    fn xp_required(&self, level: U256) -> impl Future<Output = eyre::Result<U256>> + Send;

    fn adventurers_log(&self, summoner: U256)
    -> impl Future<Output = eyre::Result<U256>> + Send;

    fn owner_of(&self, summoner: U256) -> impl Future<Output = eyre::Result<Address>> + Send;
}

pub trait NamesContract: Send + Sync {
    fn set_name(
        &self,
        summoner: U256,
        name: String,
    ) -> impl Future<Output = eyre::Result<TxHash>> + Send;

    fn summoner_name(&self, summoner: U256) -> impl Future<Output = eyre::Result<String>> + Send;
}

pub trait GoldContract: Send + Sync {
    fn claimable(&self, summoner: U256) -> impl Future<Output = eyre::Result<U256>> + Send;

    fn claim(&self, summoner: U256) -> impl Future<Output = eyre::Result<TxHash>> + Send;
}

/// Hands out contract handles bound to a connection.
pub trait Gateway: Send + Sync {
    type Rarity: RarityContract;
    type Names: NamesContract;
    type Gold: GoldContract;

    fn rarity(&self, connection: &Connection) -> eyre::Result<Self::Rarity>;

    fn names(&self, connection: &Connection) -> eyre::Result<Self::Names>;

    fn gold(&self, connection: &Connection) -> eyre::Result<Self::Gold>;
}

pub struct RarityHandle(Rarity::RarityInstance<DynProvider>);

pub struct NamesHandle(RarityNames::RarityNamesInstance<DynProvider>);

pub struct GoldHandle(RarityGold::RarityGoldInstance<DynProvider>);

macro_rules! impl_contract_interface {
    ($handle:ident, $contract:ident) => {
        impl ContractInterface for $handle {
            fn bind(address: Address, provider: DynProvider) -> Self {
                $handle($contract::new(address, provider))
            }
        }
    };
}

impl_contract_interface!(RarityHandle, Rarity);
impl_contract_interface!(NamesHandle, RarityNames);
impl_contract_interface!(GoldHandle, RarityGold);

fn confirmed(receipt: TransactionReceipt) -> eyre::Result<TxHash> {
    let tx = receipt.transaction_hash;
    if !receipt.status() {
        return Err(PortalError::Reverted(tx).into());
    }
    debug!(%tx, block = ?receipt.block_number, "transaction confirmed");
    Ok(tx)
}

impl RarityContract for RarityHandle {
    async fn summon(&self, class: u8) -> eyre::Result<TxHash> {
        let receipt = self
            .0
            .summon(U256::from(class))
            .send()
            .await?
            .get_receipt()
            .await?;

        confirmed(receipt)
    }

    async fn adventure(&self, summoner: U256) -> eyre::Result<TxHash> {
        let receipt = self
            .0
            .adventure(summoner)
            .send()
            .await?
            .get_receipt()
            .await?;

        confirmed(receipt)
    }

    async fn xp(&self, summoner: U256) -> eyre::Result<U256> {
        Ok(self.0.xp(summoner).call().await?)
    }

    async fn level(&self, summoner: U256) -> eyre::Result<U256> {
        Ok(self.0.level(summoner).call().await?)
    }

    async fn xp_required(&self, level: U256) -> eyre::Result<U256> {
        Ok(self.0.xp_required(level).call().await?)
    }

    async fn adventurers_log(&self, summoner: U256) -> eyre::Result<U256> {
        Ok(self.0.adventurers_log(summoner).call().await?)
    }

    async fn owner_of(&self, summoner: U256) -> eyre::Result<Address> {
        Ok(self.0.ownerOf(summoner).call().await?)
    }
}

impl NamesContract for NamesHandle {
    async fn set_name(&self, summoner: U256, name: String) -> eyre::Result<TxHash> {
        let receipt = self
            .0
            .set_name(summoner, name)
            .send()
            .await?
            .get_receipt()
            .await?;

        confirmed(receipt)
    }

    async fn summoner_name(&self, summoner: U256) -> eyre::Result<String> {
        Ok(self.0.summoner_name(summoner).call().await?)
    }
}

impl GoldContract for GoldHandle {
    async fn claimable(&self, summoner: U256) -> eyre::Result<U256> {
        Ok(self.0.claimable(summoner).call().await?)
    }

    async fn claim(&self, summoner: U256) -> eyre::Result<TxHash> {
        let receipt = self
            .0
            .claim(summoner)
            .send()
            .await?
            .get_receipt()
            .await?;

        confirmed(receipt)
    }
}

/// Production gateway binding the portal's three contracts over alloy.
#[derive(Debug, Clone, Default)]
pub struct ContractGateway {
    pub addresses: PortalAddresses,
}

impl ContractGateway {
    pub fn new(addresses: PortalAddresses) -> Self {
        Self { addresses }
    }
}

impl Gateway for ContractGateway {
    type Rarity = RarityHandle;
    type Names = NamesHandle;
    type Gold = GoldHandle;

    fn rarity(&self, connection: &Connection) -> eyre::Result<RarityHandle> {
        get_contract(connection, self.addresses.address(PortalContract::Rarity))
    }

    fn names(&self, connection: &Connection) -> eyre::Result<NamesHandle> {
        get_contract(connection, self.addresses.address(PortalContract::Names))
    }

    fn gold(&self, connection: &Connection) -> eyre::Result<GoldHandle> {
        get_contract(connection, self.addresses.address(PortalContract::Gold))
    }
}
