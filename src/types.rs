use std::{fmt, str::FromStr};

use alloy::{
    network::EthereumWallet,
    primitives::{Address, TxHash, U256},
    providers::{
        Identity, RootProvider,
        fillers::{
            BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller,
            WalletFiller,
        },
    },
};

pub type WalletProvider = FillProvider<
    JoinFill<
        JoinFill<
            Identity,
            JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
        >,
        WalletFiller<EthereumWallet>,
    >,
    RootProvider,
>;

pub type PublicProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider,
>;

/// Summoner classes in on-chain catalog order. Index 0 is the sentinel
/// `none` and can never be summoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SummonerClass {
    None,
    Barbarian,
    Bard,
    Cleric,
    Druid,
    Fighter,
    Monk,
    Paladin,
    Ranger,
    Rogue,
    Sorcerer,
    Wizard,
}

impl SummonerClass {
    pub const CATALOG: [SummonerClass; 12] = [
        SummonerClass::None,
        SummonerClass::Barbarian,
        SummonerClass::Bard,
        SummonerClass::Cleric,
        SummonerClass::Druid,
        SummonerClass::Fighter,
        SummonerClass::Monk,
        SummonerClass::Paladin,
        SummonerClass::Ranger,
        SummonerClass::Rogue,
        SummonerClass::Sorcerer,
        SummonerClass::Wizard,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SummonerClass::None => "none",
            SummonerClass::Barbarian => "barbarian",
            SummonerClass::Bard => "bard",
            SummonerClass::Cleric => "cleric",
            SummonerClass::Druid => "druid",
            SummonerClass::Fighter => "fighter",
            SummonerClass::Monk => "monk",
            SummonerClass::Paladin => "paladin",
            SummonerClass::Ranger => "ranger",
            SummonerClass::Rogue => "rogue",
            SummonerClass::Sorcerer => "sorcerer",
            SummonerClass::Wizard => "wizard",
        }
    }

    /// Position in the catalog, which is also the id the contract expects.
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::CATALOG.get(i).copied())
    }

    /// The eleven summonable classes, sentinel excluded.
    pub fn summonable() -> impl Iterator<Item = SummonerClass> {
        Self::CATALOG.into_iter().skip(1)
    }
}

impl fmt::Display for SummonerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SummonerClass {
    type Err = eyre::Report;

    /// Case-insensitive; rejects the `none` sentinel.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::summonable()
            .find(|class| class.label() == wanted)
            .ok_or_else(|| eyre::eyre!("unknown summoner class: {s}"))
    }
}

/// A row from the off-chain index, before on-chain enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedSummoner {
    pub id: U256,
    pub owner: Address,
    pub class: SummonerClass,
    pub level: U256,
}

/// Snapshot of one summoner for the lifetime of a single listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summoner {
    pub id: U256,
    pub owner: Address,
    pub class: SummonerClass,
    pub level: U256,
    pub xp: U256,
    pub xp_required: U256,
    /// Unix timestamp at which the next adventure becomes possible.
    pub log: U256,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdventureOutcome {
    Adventured(TxHash),
    Resting { next: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    Claimed { amount: U256, tx: TxHash },
    NothingToClaim,
}

/// Per-summoner results of a batch operation, in listing order.
#[derive(Debug)]
pub struct BatchReport<T> {
    pub results: Vec<(U256, eyre::Result<T>)>,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
        }
    }
}

impl<T> BatchReport<T> {
    pub fn push(&mut self, summoner: U256, result: eyre::Result<T>) {
        self.results.push((summoner, result));
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn succeeded(&self) -> impl Iterator<Item = (&U256, &T)> {
        self.results
            .iter()
            .filter_map(|(id, result)| result.as_ref().ok().map(|value| (id, value)))
    }

    pub fn failed(&self) -> impl Iterator<Item = (&U256, &eyre::Report)> {
        self.results
            .iter()
            .filter_map(|(id, result)| result.as_ref().err().map(|err| (id, err)))
    }
}
