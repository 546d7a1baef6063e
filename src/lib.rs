use std::{sync::Arc, time::Duration};

use clients::{
    gold::GoldClient,
    names::{NamesClient, PollSettings},
    rarity::RarityClient,
};
use commands::{Command, NOT_CONNECTED, ParseError, SummonerAction, SummonersAction, help_text};
use config::PortalConfig;
use connection::{ConnectionProvider, Connector};
use gateway::{ContractGateway, Gateway};
use index::{SubgraphIndex, SummonerIndex};
use printer::Printer;
use storage::{CONNECTOR_KEY, LocalStorage};
use tracing::{error, info, warn};

pub mod addresses;
pub mod clients;
pub mod commands;
pub mod config;
pub mod connection;
pub mod contracts;
pub mod error;
pub mod gateway;
pub mod index;
pub mod printer;
pub mod storage;
pub mod types;
pub mod utils;

pub use error::PortalError;

/// The terminal portal: maps typed commands onto the rarity, names and gold
/// clients and reports through a print callback.
pub struct PortalClient<G = ContractGateway, I = SubgraphIndex> {
    pub connection: ConnectionProvider,
    pub rarity: RarityClient<G, I>,
    pub names: NamesClient<G>,
    pub gold: GoldClient<G, I>,

    storage: LocalStorage,
    settle_interval: Duration,
}

pub type DefaultPortalClient = PortalClient<ContractGateway, SubgraphIndex>;

impl PortalClient {
    pub fn new(config: &PortalConfig) -> eyre::Result<Self> {
        let storage = match &config.storage_path {
            Some(path) => LocalStorage::open(path)?,
            None => LocalStorage::in_memory(),
        };

        Ok(Self::with_parts(
            ContractGateway::new(config.addresses),
            SubgraphIndex::new(&config.subgraph_url),
            ConnectionProvider::new(config.connector_settings()),
            storage,
            config.settle_interval(),
            config.name_poll(),
        ))
    }
}

impl<G: Gateway, I: SummonerIndex> PortalClient<G, I> {
    pub fn with_parts(
        gateway: G,
        index: I,
        connection: ConnectionProvider,
        storage: LocalStorage,
        settle_interval: Duration,
        poll: PollSettings,
    ) -> Self {
        let gateway = Arc::new(gateway);
        let index = Arc::new(index);

        let names = NamesClient::new(gateway.clone(), connection.clone(), poll);
        let rarity = RarityClient::new(gateway.clone(), index, connection.clone(), names.clone());
        let gold = GoldClient::new(gateway, connection.clone(), rarity.clone());

        Self {
            connection,
            rarity,
            names,
            gold,
            storage,
            settle_interval,
        }
    }

    pub fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    /// Reconnects with the remembered connector when nothing is active,
    /// falling back to the read-only network. A failed activation forgets
    /// the remembered connector.
    pub async fn startup(&self) -> eyre::Result<()> {
        let connection = self.connection.current().await;
        if connection.error.is_some() {
            self.storage.set(CONNECTOR_KEY, Connector::Network.storage_value())?;
        }
        if connection.account.is_some() || connection.active {
            return Ok(());
        }

        let connector = match connection.error {
            None => Connector::from_storage(self.storage.get(CONNECTOR_KEY).as_deref()),
            Some(_) => Connector::Network,
        };
        self.connection.activate(connector, false).await?;

        if self.connection.current().await.error.is_some() {
            self.storage.set(CONNECTOR_KEY, Connector::Network.storage_value())?;
            if connector == Connector::Injected {
                self.connection.activate(Connector::Network, false).await?;
            }
        }

        Ok(())
    }

    pub async fn connect(&self, print: &dyn Printer) {
        match self.connection.current().await.account {
            Some(account) => print.print(&format!("connected to {account}")),
            None => self.login(print).await,
        }
    }

    /// Activates the wallet connector. Failures are printed, never returned.
    pub async fn login(&self, print: &dyn Printer) {
        print.print("connecting...");

        if let Err(err) = self.try_login(print).await {
            warn!(error = %err, "login failed");
            if let Err(err) = self.storage.set(CONNECTOR_KEY, Connector::Network.storage_value())
            {
                warn!(error = %err, "could not clear remembered connector");
            }
            print.print(&err.to_string());
        }
    }

    async fn try_login(&self, print: &dyn Printer) -> eyre::Result<()> {
        self.connection.activate(Connector::Injected, true).await?;
        self.storage
            .set(CONNECTOR_KEY, Connector::Injected.storage_value())?;
        utils::wait(self.settle_interval).await;

        match self.connection.current().await.account {
            Some(account) => print.print(&format!("connected to {account}")),
            None => print.print("no account available"),
        }
        Ok(())
    }

    /// Drops the connected account and falls back to the read-only network.
    /// Always confirms; storage or reconnection failures are only logged.
    pub async fn disconnect(&self, print: &dyn Printer) {
        if self.connection.current().await.account.is_some() {
            self.connection.deactivate().await;
            if let Err(err) = self.storage.set(CONNECTOR_KEY, Connector::Network.storage_value())
            {
                warn!(error = %err, "could not clear remembered connector");
            }
            if let Err(err) = self.startup().await {
                warn!(error = %err, "could not fall back to the network connector");
            }
        }

        print.print("account disconnected");
    }

    /// Connectivity gate: prints guidance and returns false when no account
    /// is connected right now.
    pub async fn check(&self, print: &dyn Printer) -> bool {
        if self.connection.current().await.account.is_none() {
            print.print(NOT_CONNECTED);
            return false;
        }
        true
    }

    /// Runs a parsed command. Domain failures are returned to the caller.
    pub async fn execute(&self, command: Command, print: &dyn Printer) -> eyre::Result<()> {
        if command.name().requires_connection() && !self.check(print).await {
            return Ok(());
        }

        info!(command = %command.name(), "executing command");
        match command {
            Command::Help => print.print(&help_text()),
            Command::Connect => self.connect(print).await,
            Command::Disconnect => self.disconnect(print).await,
            Command::Summon(class) => {
                self.rarity.summon(class, print).await?;
            }
            Command::Summoners(SummonersAction::List) => {
                self.rarity.list(print).await?;
            }
            Command::Summoners(SummonersAction::Adventure) => {
                self.rarity.adventure_all(print).await?;
            }
            Command::Summoners(SummonersAction::Gold) => {
                self.gold.claim_gold_all(print).await?;
            }
            Command::Summoner {
                id,
                action: SummonerAction::Name(name),
            } => {
                self.names.set_name(id, &name, print).await?;
            }
        }

        Ok(())
    }

    /// Parses and runs one line of terminal input, printing every outcome,
    /// errors included. Returns whether the command ran to completion.
    pub async fn run(&self, line: &str, print: &dyn Printer) -> bool {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(ParseError::Empty) => return true,
            Err(ParseError::Usage { command, message }) => {
                if !command.requires_connection() || self.check(print).await {
                    print.print(&message);
                }
                return false;
            }
            Err(err @ ParseError::Unknown(_)) => {
                print.print(&err.to_string());
                return false;
            }
        };

        if command.name().requires_connection() && !self.check(print).await {
            return false;
        }

        match self.execute(command, print).await {
            Ok(()) => true,
            Err(err) => {
                error!(error = %err, "command failed");
                print.print(&format!("error: {err}"));
                false
            }
        }
    }
}
