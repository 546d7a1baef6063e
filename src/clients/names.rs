use std::{sync::Arc, time::Duration};

use alloy::primitives::{TxHash, U256};
use tracing::{debug, info};

use crate::{
    connection::ConnectionProvider,
    error::PortalError,
    gateway::{Gateway, NamesContract},
    printer::Printer,
    types::Summoner,
    utils,
};

/// How often, and how many times, a rename is read back before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: 60,
        }
    }
}

/// Client for the summoner naming contract.
pub struct NamesClient<G> {
    gateway: Arc<G>,
    connection: ConnectionProvider,

    pub poll: PollSettings,
}

impl<G> Clone for NamesClient<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            connection: self.connection.clone(),
            poll: self.poll,
        }
    }
}

/// Display name of a summoner: its on-chain name, or `summoner <id>`.
pub fn format_name(summoner: &Summoner) -> String {
    match &summoner.name {
        Some(name) if !name.is_empty() => name.clone(),
        _ => format!("summoner {}", summoner.id),
    }
}

impl<G: Gateway> NamesClient<G> {
    pub fn new(gateway: Arc<G>, connection: ConnectionProvider, poll: PollSettings) -> Self {
        Self {
            gateway,
            connection,
            poll,
        }
    }

    /// Renames a summoner and waits until the new name can be read back.
    ///
    /// Some endpoints serve reads from replicas that lag behind the block the
    /// write landed in, so the name is polled every `poll.interval` for up to
    /// `poll.max_attempts` reads. Exhausting them yields
    /// [`PortalError::NameTimeout`].
    pub async fn set_name(
        &self,
        summoner: U256,
        name: &str,
        print: &dyn Printer,
    ) -> eyre::Result<TxHash> {
        print.print(&format!("changing summoner {summoner}'s name to {name}..."));

        let contract = self.gateway.names(&self.connection.current().await)?;
        info!(%summoner, name, "setting summoner name");
        let tx = contract.set_name(summoner, name.to_string()).await?;

        self.wait_for_name(&contract, summoner, name).await?;

        print.print(&format!("summoner {summoner}'s name was changed to {name}"));
        Ok(tx)
    }

    async fn wait_for_name(
        &self,
        contract: &G::Names,
        summoner: U256,
        name: &str,
    ) -> eyre::Result<()> {
        let attempts = self.poll.max_attempts.max(1);
        for attempt in 1..=attempts {
            let observed = contract.summoner_name(summoner).await?;
            if observed == name {
                debug!(%summoner, attempt, "name change observed");
                return Ok(());
            }

            debug!(%summoner, attempt, observed = %observed, "name not updated yet");
            if attempt < attempts {
                utils::wait(self.poll.interval).await;
            }
        }

        Err(PortalError::NameTimeout { summoner, attempts }.into())
    }

    /// On-chain name of a summoner, `None` when it was never named.
    pub async fn get_name(&self, summoner: U256) -> eyre::Result<Option<String>> {
        let contract = self.gateway.names(&self.connection.current().await)?;
        let name = contract.summoner_name(summoner).await?;

        Ok(Some(name).filter(|name| !name.is_empty()))
    }
}
