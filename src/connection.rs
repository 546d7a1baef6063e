use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use alloy::{
    primitives::Address,
    providers::{DynProvider, Provider as _},
    signers::local::PrivateKeySigner,
};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::{
    error::PortalError,
    types::{PublicProvider, WalletProvider},
    utils,
};

/// Strategy used to obtain a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    /// The user's own signing wallet.
    Injected,
    /// Read-only JSON-RPC endpoint.
    Network,
}

impl Connector {
    /// Value remembered in local storage after this connector is used.
    pub fn storage_value(self) -> &'static str {
        match self {
            Connector::Injected => "injected",
            Connector::Network => "",
        }
    }

    pub fn from_storage(value: Option<&str>) -> Self {
        match value {
            Some("injected") => Connector::Injected,
            _ => Connector::Network,
        }
    }
}

/// Provider handle behind a connection.
#[derive(Clone)]
pub enum Library {
    Signer {
        provider: WalletProvider,
        account: Address,
    },
    ReadOnly(PublicProvider),
}

impl Library {
    /// Provider able to sign for `account`, if this library holds its key.
    pub fn signer(&self, account: Address) -> Option<DynProvider> {
        match self {
            Library::Signer {
                provider,
                account: owner,
            } if *owner == account => Some(provider.clone().erased()),
            _ => None,
        }
    }

    pub fn read_only(&self) -> DynProvider {
        match self {
            Library::Signer { provider, .. } => provider.clone().erased(),
            Library::ReadOnly(provider) => provider.clone().erased(),
        }
    }
}

impl fmt::Debug for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Library::Signer { account, .. } => {
                f.debug_struct("Signer").field("account", account).finish()
            }
            Library::ReadOnly(_) => f.write_str("ReadOnly"),
        }
    }
}

/// Snapshot of the wallet/network connection.
#[derive(Debug, Clone, Default)]
pub struct Connection {
    pub account: Option<Address>,
    pub library: Option<Library>,
    pub active: bool,
    pub error: Option<String>,
    pub connector: Option<Connector>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

#[derive(Debug, Clone)]
pub struct ConnectorSettings {
    pub rpc_url: String,
    pub chain_id: u64,
    pub private_key: Option<String>,
    /// Reject injected wallets whose endpoint reports another chain.
    pub verify_chain: bool,
}

/// Shared owner of the connection state. Clones observe the same state, so
/// every holder sees the latest snapshot through [`ConnectionProvider::current`].
#[derive(Clone)]
pub struct ConnectionProvider {
    state: Arc<RwLock<Connection>>,
    connecting: Arc<AtomicBool>,
    settings: Arc<ConnectorSettings>,
}

impl ConnectionProvider {
    pub fn new(settings: ConnectorSettings) -> Self {
        Self::from_connection(settings, Connection::default())
    }

    pub fn from_connection(settings: ConnectorSettings, connection: Connection) -> Self {
        Self {
            state: Arc::new(RwLock::new(connection)),
            connecting: Arc::new(AtomicBool::new(false)),
            settings: Arc::new(settings),
        }
    }

    pub fn settings(&self) -> &ConnectorSettings {
        &self.settings
    }

    pub async fn current(&self) -> Connection {
        self.state.read().await.clone()
    }

    pub async fn replace(&self, connection: Connection) {
        *self.state.write().await = connection;
    }

    pub async fn status(&self) -> ConnectionStatus {
        if self.connecting.load(Ordering::SeqCst) {
            return ConnectionStatus::Connecting;
        }

        let connection = self.state.read().await;
        if connection.error.is_some() {
            ConnectionStatus::Error
        } else if connection.account.is_some() {
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::Disconnected
        }
    }

    /// Activates `connector`. With `throw_errors` the failure is returned and
    /// the previous state kept; otherwise it is recorded in `error`.
    pub async fn activate(&self, connector: Connector, throw_errors: bool) -> eyre::Result<()> {
        info!(?connector, "activating connector");
        self.connecting.store(true, Ordering::SeqCst);
        let opened = self.open(connector).await;
        self.connecting.store(false, Ordering::SeqCst);

        match opened {
            Ok(connection) => {
                info!(account = ?connection.account, "connector active");
                self.replace(connection).await;
                Ok(())
            }
            Err(err) if throw_errors => Err(err),
            Err(err) => {
                warn!(?connector, error = %err, "connector activation failed");
                let mut state = self.state.write().await;
                state.active = false;
                state.error = Some(err.to_string());
                Ok(())
            }
        }
    }

    pub async fn deactivate(&self) {
        info!("deactivating connector");
        self.replace(Connection::default()).await;
    }

    async fn open(&self, connector: Connector) -> eyre::Result<Connection> {
        match connector {
            Connector::Injected => {
                let key = self
                    .settings
                    .private_key
                    .as_deref()
                    .ok_or(PortalError::NoInjectedWallet)?;
                let signer: PrivateKeySigner = key.trim().parse()?;
                let account = signer.address();
                let provider = utils::get_wallet_provider(signer, &self.settings.rpc_url)?;

                if self.settings.verify_chain {
                    let actual = provider.get_chain_id().await?;
                    if actual != self.settings.chain_id {
                        return Err(PortalError::UnsupportedChain {
                            expected: self.settings.chain_id,
                            actual,
                        }
                        .into());
                    }
                }

                Ok(Connection {
                    account: Some(account),
                    library: Some(Library::Signer { provider, account }),
                    active: true,
                    error: None,
                    connector: Some(Connector::Injected),
                })
            }
            Connector::Network => {
                let provider = utils::get_public_provider(&self.settings.rpc_url)?;

                Ok(Connection {
                    account: None,
                    library: Some(Library::ReadOnly(provider)),
                    active: true,
                    error: None,
                    connector: Some(Connector::Network),
                })
            }
        }
    }
}
