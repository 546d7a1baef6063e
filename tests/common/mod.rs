#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use alloy::primitives::{Address, B256, TxHash, U256, address};
use chrono::Utc;
use rarity_portal::{
    PortalClient,
    clients::names::PollSettings,
    connection::{Connection, ConnectionProvider, ConnectorSettings},
    error::PortalError,
    gateway::{Gateway, GoldContract, NamesContract, RarityContract},
    index::SummonerIndex,
    printer::Printer,
    storage::LocalStorage,
    types::{IndexedSummoner, SummonerClass},
};

pub const ALICE: Address = address!("0x00000000000000000000000000000000000a11ce");
pub const BOB: Address = address!("0x0000000000000000000000000000000000000b0b");

/// First anvil development key.
pub const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write {
    Summon(u8),
    Adventure(U256),
    SetName(U256, String),
    Claim(U256),
}

#[derive(Debug, Default)]
pub struct ChainState {
    pub writes: Vec<Write>,
    pub owners: HashMap<U256, Address>,
    pub xp: HashMap<U256, U256>,
    /// On-chain levels; unset summoners are level 1.
    pub levels: HashMap<U256, U256>,
    pub xp_required: HashMap<U256, U256>,
    pub logs: HashMap<U256, U256>,
    pub names: HashMap<U256, String>,
    pub claimable: HashMap<U256, U256>,
    pub failing: HashSet<U256>,
    /// Name written but not yet visible to reads.
    pub pending_name: Option<(U256, String)>,
    /// Reads that still return the old name after a rename.
    pub stale_name_reads: u32,
    pub name_reads: u32,
    pub bound_accounts: Vec<Option<Address>>,
}

/// In-process stand-in for the three contracts.
#[derive(Debug, Clone, Default)]
pub struct MockChain {
    state: Arc<Mutex<ChainState>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, ChainState> {
        self.state.lock().unwrap()
    }

    pub fn writes(&self) -> Vec<Write> {
        self.state().writes.clone()
    }

    /// Registers a summoner owned by `owner` with the given progress and log.
    pub fn add_summoner(&self, id: u64, owner: Address, xp: u64, log: U256) {
        let mut state = self.state();
        let id = U256::from(id);
        state.owners.insert(id, owner);
        state.xp.insert(id, U256::from(xp));
        state.logs.insert(id, log);
    }

    fn record(&self, write: Write) -> eyre::Result<TxHash> {
        let mut state = self.state();
        let failing = match &write {
            Write::Adventure(id) | Write::Claim(id) | Write::SetName(id, _) => {
                state.failing.contains(id)
            }
            Write::Summon(_) => false,
        };
        if failing {
            return Err(PortalError::Reverted(B256::ZERO).into());
        }
        state.writes.push(write);
        Ok(B256::with_last_byte(state.writes.len() as u8))
    }
}

impl RarityContract for MockChain {
    async fn summon(&self, class: u8) -> eyre::Result<TxHash> {
        self.record(Write::Summon(class))
    }

    async fn adventure(&self, summoner: U256) -> eyre::Result<TxHash> {
        self.record(Write::Adventure(summoner))
    }

    async fn xp(&self, summoner: U256) -> eyre::Result<U256> {
        Ok(self.state().xp.get(&summoner).copied().unwrap_or_default())
    }

    async fn level(&self, summoner: U256) -> eyre::Result<U256> {
        Ok(self
            .state()
            .levels
            .get(&summoner)
            .copied()
            .unwrap_or(U256::from(1)))
    }

    async fn xp_required(&self, level: U256) -> eyre::Result<U256> {
        Ok(self
            .state()
            .xp_required
            .get(&level)
            .copied()
            .unwrap_or(U256::from(1000)))
    }

    async fn adventurers_log(&self, summoner: U256) -> eyre::Result<U256> {
        Ok(self.state().logs.get(&summoner).copied().unwrap_or_default())
    }

    async fn owner_of(&self, summoner: U256) -> eyre::Result<Address> {
        Ok(self
            .state()
            .owners
            .get(&summoner)
            .copied()
            .unwrap_or_default())
    }
}

impl NamesContract for MockChain {
    async fn set_name(&self, summoner: U256, name: String) -> eyre::Result<TxHash> {
        let tx = self.record(Write::SetName(summoner, name.clone()))?;
        self.state().pending_name = Some((summoner, name));
        Ok(tx)
    }

    async fn summoner_name(&self, summoner: U256) -> eyre::Result<String> {
        let mut state = self.state();
        state.name_reads += 1;

        let pending_here = matches!(&state.pending_name, Some((id, _)) if *id == summoner);
        if pending_here {
            if state.stale_name_reads > 0 {
                state.stale_name_reads -= 1;
            } else if let Some((id, name)) = state.pending_name.take() {
                state.names.insert(id, name);
            }
        }

        Ok(state.names.get(&summoner).cloned().unwrap_or_default())
    }
}

impl GoldContract for MockChain {
    async fn claimable(&self, summoner: U256) -> eyre::Result<U256> {
        Ok(self
            .state()
            .claimable
            .get(&summoner)
            .copied()
            .unwrap_or_default())
    }

    async fn claim(&self, summoner: U256) -> eyre::Result<TxHash> {
        let tx = self.record(Write::Claim(summoner))?;
        self.state().claimable.insert(summoner, U256::ZERO);
        Ok(tx)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockGateway {
    pub chain: MockChain,
}

impl Gateway for MockGateway {
    type Rarity = MockChain;
    type Names = MockChain;
    type Gold = MockChain;

    fn rarity(&self, connection: &Connection) -> eyre::Result<MockChain> {
        self.chain.state().bound_accounts.push(connection.account);
        Ok(self.chain.clone())
    }

    fn names(&self, connection: &Connection) -> eyre::Result<MockChain> {
        self.chain.state().bound_accounts.push(connection.account);
        Ok(self.chain.clone())
    }

    fn gold(&self, connection: &Connection) -> eyre::Result<MockChain> {
        self.chain.state().bound_accounts.push(connection.account);
        Ok(self.chain.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockIndex {
    rows: Arc<Mutex<Vec<IndexedSummoner>>>,
    fail: Arc<Mutex<bool>>,
    queries: Arc<Mutex<Vec<Address>>>,
}

impl MockIndex {
    pub fn with_rows(rows: Vec<IndexedSummoner>) -> Self {
        let index = Self::default();
        *index.rows.lock().unwrap() = rows;
        index
    }

    pub fn failing() -> Self {
        let index = Self::default();
        *index.fail.lock().unwrap() = true;
        index
    }

    pub fn queries(&self) -> Vec<Address> {
        self.queries.lock().unwrap().clone()
    }
}

impl SummonerIndex for MockIndex {
    async fn summoners(&self, owner: Address) -> eyre::Result<Vec<IndexedSummoner>> {
        self.queries.lock().unwrap().push(owner);
        if *self.fail.lock().unwrap() {
            return Err(PortalError::Index("index unavailable".to_string()).into());
        }
        Ok(self.rows.lock().unwrap().clone())
    }
}

pub fn row(id: u64, owner: Address, class: SummonerClass, level: u64) -> IndexedSummoner {
    IndexedSummoner {
        id: U256::from(id),
        owner,
        class,
        level: U256::from(level),
    }
}

/// Collects everything printed, in order.
#[derive(Debug, Default)]
pub struct Transcript {
    lines: Mutex<Vec<String>>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }
}

impl Printer for Transcript {
    fn print(&self, message: &str) {
        self.lines.lock().unwrap().push(message.to_string());
    }
}

pub fn settings(private_key: Option<&str>) -> ConnectorSettings {
    ConnectorSettings {
        rpc_url: "http://127.0.0.1:8545".to_string(),
        chain_id: 250,
        private_key: private_key.map(str::to_string),
        verify_chain: false,
    }
}

pub fn connected(account: Address) -> ConnectionProvider {
    ConnectionProvider::from_connection(
        settings(None),
        Connection {
            account: Some(account),
            active: true,
            ..Default::default()
        },
    )
}

pub fn fast_poll(max_attempts: u32) -> PollSettings {
    PollSettings {
        interval: Duration::from_millis(1),
        max_attempts,
    }
}

pub fn portal(
    chain: &MockChain,
    index: MockIndex,
    connection: ConnectionProvider,
) -> PortalClient<MockGateway, MockIndex> {
    portal_with_storage(chain, index, connection, LocalStorage::in_memory())
}

pub fn portal_with_storage(
    chain: &MockChain,
    index: MockIndex,
    connection: ConnectionProvider,
    storage: LocalStorage,
) -> PortalClient<MockGateway, MockIndex> {
    PortalClient::with_parts(
        MockGateway {
            chain: chain.clone(),
        },
        index,
        connection,
        storage,
        Duration::ZERO,
        fast_poll(10),
    )
}

/// Adventure log timestamp `seconds` from now.
pub fn log_in(seconds: i64) -> U256 {
    U256::from((Utc::now().timestamp() + seconds) as u64)
}
