use std::sync::Arc;

use alloy::primitives::{Address, TxHash, U256};
use chrono::{DateTime, TimeDelta, Utc};
use futures::future::try_join_all;
use itertools::Itertools as _;
use tracing::{debug, info, warn};

use crate::{
    clients::names::{NamesClient, format_name},
    connection::ConnectionProvider,
    gateway::{Gateway, RarityContract},
    index::SummonerIndex,
    printer::Printer,
    types::{AdventureOutcome, BatchReport, IndexedSummoner, Summoner, SummonerClass},
};

pub const PROGRESS_SEGMENTS: usize = 11;
const FILLED: &str = "\u{2588}";
const EMPTY: &str = "\u{2591}";

const MINUTES_IN_DAY: f64 = 1440.0;
const MINUTES_IN_MONTH: f64 = 43200.0;
const MINUTES_IN_YEAR: f64 = 525600.0;

/// Labels of the summonable classes, in catalog order.
pub fn get_classes() -> Vec<&'static str> {
    SummonerClass::summonable().map(SummonerClass::label).collect()
}

pub fn class_list() -> String {
    SummonerClass::summonable().map(SummonerClass::label).join(", ")
}

/// Level progress in whole percent, rounded half up. A zero requirement
/// counts as complete.
pub fn progress_percent(xp: U256, xp_required: U256) -> u64 {
    if xp_required.is_zero() {
        return 100;
    }

    let percent = xp
        .saturating_mul(U256::from(100))
        .saturating_add(xp_required / U256::from(2))
        / xp_required;
    u64::try_from(percent).unwrap_or(u64::MAX)
}

/// Eleven-segment bar with one filled block per 10% reached, e.g.
/// `██████░░░░░ 55%`. Zero progress renders no filled blocks.
pub fn level_progress(xp: U256, xp_required: U256) -> String {
    let progress = progress_percent(xp, xp_required);
    let filled = if progress == 0 {
        0
    } else {
        usize::try_from(progress / 10 + 1)
            .unwrap_or(PROGRESS_SEGMENTS)
            .min(PROGRESS_SEGMENTS)
    };

    format!(
        "{}{} {progress}%",
        FILLED.repeat(filled),
        EMPTY.repeat(PROGRESS_SEGMENTS - filled)
    )
}

/// Moment an adventure log timestamp refers to.
pub fn adventure_time(log: U256) -> DateTime<Utc> {
    u64::try_from(log)
        .ok()
        .and_then(|secs| i64::try_from(secs).ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// A summoner may adventure once its log lies strictly in the past.
pub fn is_eligible(log: U256, now: DateTime<Utc>) -> bool {
    now > adventure_time(log)
}

/// `now` when the log is not in the future, otherwise e.g. `in 3 hours`.
pub fn next_adventure(log: U256, now: DateTime<Utc>) -> String {
    let remaining = adventure_time(log).signed_duration_since(now);
    if remaining <= TimeDelta::zero() {
        return "now".to_string();
    }

    format!("in {}", format_distance(remaining))
}

/// Distance in the single largest fitting unit: seconds below a minute,
/// minutes below an hour, hours below a day, days below 30 days, months
/// below a year, then years. Values are rounded half up.
pub fn format_distance(delta: TimeDelta) -> String {
    let seconds = delta.abs().num_milliseconds() as f64 / 1000.0;
    let minutes = seconds / 60.0;

    let (value, unit) = if minutes < 1.0 {
        (seconds.round(), "second")
    } else if minutes < 60.0 {
        (minutes.round(), "minute")
    } else if minutes < MINUTES_IN_DAY {
        ((minutes / 60.0).round(), "hour")
    } else if minutes < MINUTES_IN_MONTH {
        ((minutes / MINUTES_IN_DAY).round(), "day")
    } else if minutes < MINUTES_IN_YEAR {
        let months = (minutes / MINUTES_IN_MONTH).round();
        if months >= 12.0 {
            (1.0, "year")
        } else {
            (months, "month")
        }
    } else {
        ((minutes / MINUTES_IN_YEAR).round(), "year")
    };

    let value = value as u64;
    if value == 1 {
        format!("1 {unit}")
    } else {
        format!("{value} {unit}s")
    }
}

/// Human-readable listing block for one summoner.
pub fn describe(summoner: &Summoner, now: DateTime<Utc>) -> String {
    let name = summoner
        .name
        .as_ref()
        .map(|name| format!("name: {name}\n"))
        .unwrap_or_default();

    format!(
        "id: {}\n{name}class: {}\nnext adventure: {}\nlevel: {}\nlevel progress: {}\n",
        summoner.id,
        summoner.class,
        next_adventure(summoner.log, now),
        summoner.level,
        level_progress(summoner.xp, summoner.xp_required),
    )
}

/// Client for the summoner contract and the off-chain summoner index.
pub struct RarityClient<G, I> {
    gateway: Arc<G>,
    index: Arc<I>,
    connection: ConnectionProvider,

    pub names: NamesClient<G>,
}

impl<G, I> Clone for RarityClient<G, I> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            index: self.index.clone(),
            connection: self.connection.clone(),
            names: self.names.clone(),
        }
    }
}

impl<G: Gateway, I: SummonerIndex> RarityClient<G, I> {
    pub fn new(
        gateway: Arc<G>,
        index: Arc<I>,
        connection: ConnectionProvider,
        names: NamesClient<G>,
    ) -> Self {
        Self {
            gateway,
            index,
            connection,
            names,
        }
    }

    pub async fn summon(&self, class: SummonerClass, print: &dyn Printer) -> eyre::Result<TxHash> {
        print.print(&format!("summoning {class}..."));

        let contract = self.gateway.rarity(&self.connection.current().await)?;
        info!(%class, id = class.index(), "summoning");
        let tx = contract.summon(class.index()).await?;

        print.print(&format!("{class} has been summoned"));
        Ok(tx)
    }

    /// Summoners owned by the connected account, enriched with fresh
    /// on-chain level, experience, adventure log and name.
    ///
    /// Index rows whose on-chain owner is no longer the account are dropped,
    /// so a lagging index never yields summoners that cannot be acted on.
    /// With `print`, a block per summoner is printed.
    pub async fn get_summoners(&self, print: Option<&dyn Printer>) -> eyre::Result<Vec<Summoner>> {
        if let Some(print) = print {
            print.print("listing all summoners...");
        }

        let connection = self.connection.current().await;
        let Some(account) = connection.account else {
            return Ok(Vec::new());
        };

        let rows = self.index.summoners(account).await?;
        let contract = self.gateway.rarity(&connection)?;

        let enriched =
            try_join_all(rows.into_iter().map(|row| self.enrich(&contract, account, row))).await?;
        let summoners: Vec<Summoner> = enriched.into_iter().flatten().collect();

        if let Some(print) = print {
            if summoners.is_empty() {
                print.print("no summoners found");
            }
            let now = Utc::now();
            for summoner in &summoners {
                print.print(&describe(summoner, now));
            }
        }

        Ok(summoners)
    }

    pub async fn list(&self, print: &dyn Printer) -> eyre::Result<Vec<Summoner>> {
        self.get_summoners(Some(print)).await
    }

    async fn enrich(
        &self,
        contract: &G::Rarity,
        account: Address,
        row: IndexedSummoner,
    ) -> eyre::Result<Option<Summoner>> {
        let (owner, xp, level, log, name) = tokio::try_join!(
            contract.owner_of(row.id),
            contract.xp(row.id),
            contract.level(row.id),
            contract.adventurers_log(row.id),
            self.names.get_name(row.id),
        )?;

        if owner != account {
            debug!(id = %row.id, %owner, %account, "index row no longer owned, skipping");
            return Ok(None);
        }
        if level != row.level {
            debug!(id = %row.id, indexed = %row.level, %level, "index level is stale");
        }
        let xp_required = contract.xp_required(level).await?;

        Ok(Some(Summoner {
            id: row.id,
            owner,
            class: row.class,
            level,
            xp,
            xp_required,
            log,
            name,
        }))
    }

    /// Sends one summoner adventuring if its freshly read log allows it.
    pub async fn adventure(
        &self,
        summoner: &Summoner,
        print: &dyn Printer,
    ) -> eyre::Result<AdventureOutcome> {
        let contract = self.gateway.rarity(&self.connection.current().await)?;
        let log = contract.adventurers_log(summoner.id).await?;
        let name = format_name(summoner);
        let now = Utc::now();

        if !is_eligible(log, now) {
            let next = next_adventure(log, now);
            print.print(&format!("{name} can go on an adventure {next}"));
            return Ok(AdventureOutcome::Resting { next });
        }

        print.print(&format!("{name} is going on an adventure..."));
        info!(id = %summoner.id, "adventuring");
        let tx = contract.adventure(summoner.id).await?;
        print.print(&format!("{name} completed their adventure"));

        Ok(AdventureOutcome::Adventured(tx))
    }

    /// Adventures every owned summoner, one at a time in listing order. A
    /// failing summoner is reported and the rest still run.
    pub async fn adventure_all(
        &self,
        print: &dyn Printer,
    ) -> eyre::Result<BatchReport<AdventureOutcome>> {
        let summoners = self.get_summoners(None).await?;
        if summoners.is_empty() {
            print.print("no summoners found");
        }

        let mut report = BatchReport::default();
        for summoner in &summoners {
            let result = self.adventure(summoner, print).await;
            if let Err(err) = &result {
                warn!(id = %summoner.id, error = %err, "adventure failed");
                print.print(&format!(
                    "{} could not go on an adventure: {err}",
                    format_name(summoner)
                ));
            }
            report.push(summoner.id, result);
        }

        Ok(report)
    }
}
