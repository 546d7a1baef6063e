use std::future::Future;

use alloy::primitives::{Address, U256};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::{
    error::PortalError,
    types::{IndexedSummoner, SummonerClass},
};

const GET_SUMMONERS: &str = r#"
query GetSummoners($owner: Bytes!) {
  summoners(where: { owner: $owner }) {
    id
    owner
    _class
    _level
  }
}
"#;

/// Off-chain lookup of the summoners owned by an account.
pub trait SummonerIndex: Send + Sync {
    /// `Ok(vec![])` means the index has no rows for `owner`; a failed query
    /// is an error.
    fn summoners(
        &self,
        owner: Address,
    ) -> impl Future<Output = eyre::Result<Vec<IndexedSummoner>>> + Send;
}

#[derive(Debug, Clone)]
pub struct SubgraphIndex {
    client: reqwest::Client,
    url: String,
}

impl SubgraphIndex {
    pub fn new(url: impl ToString) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.to_string(),
        }
    }
}

/// The graph serialises `BigInt` as strings, but numbers are accepted too.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Numeric {
    Text(String),
    Number(u64),
}

impl Numeric {
    fn to_u256(&self) -> eyre::Result<U256> {
        match self {
            Numeric::Text(text) => text.parse::<U256>().map_err(|err| {
                PortalError::Index(format!("bad number {text:?}: {err}")).into()
            }),
            Numeric::Number(number) => Ok(U256::from(*number)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SummonerRow {
    id: Numeric,
    owner: Address,
    #[serde(rename = "_class")]
    class: Numeric,
    #[serde(rename = "_level")]
    level: Numeric,
}

impl TryFrom<SummonerRow> for IndexedSummoner {
    type Error = eyre::Report;

    fn try_from(row: SummonerRow) -> eyre::Result<Self> {
        let class = row.class.to_u256()?;
        let class = u64::try_from(class)
            .ok()
            .and_then(SummonerClass::from_index)
            .ok_or_else(|| PortalError::Index(format!("unknown class {class}")))?;

        Ok(IndexedSummoner {
            id: row.id.to_u256()?,
            owner: row.owner,
            class,
            level: row.level.to_u256()?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct GraphError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct SummonersData {
    #[serde(default)]
    summoners: Option<Vec<SummonerRow>>,
}

#[derive(Debug, Deserialize)]
struct GraphResponse {
    data: Option<SummonersData>,
    #[serde(default)]
    errors: Vec<GraphError>,
}

/// Converts a raw `GetSummoners` response body into index rows.
pub fn parse_summoners(body: serde_json::Value) -> eyre::Result<Vec<IndexedSummoner>> {
    let response: GraphResponse = serde_json::from_value(body)
        .map_err(|err| PortalError::Index(format!("malformed response: {err}")))?;

    if !response.errors.is_empty() {
        let messages: Vec<_> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(PortalError::Index(messages.join("; ")).into());
    }

    response
        .data
        .and_then(|data| data.summoners)
        .unwrap_or_default()
        .into_iter()
        .map(IndexedSummoner::try_from)
        .collect()
}

impl SummonerIndex for SubgraphIndex {
    async fn summoners(&self, owner: Address) -> eyre::Result<Vec<IndexedSummoner>> {
        // the graph stores owners as lowercase bytes
        let owner = format!("{owner:#x}");
        debug!(url = %self.url, %owner, "querying summoner index");

        let response = self
            .client
            .post(&self.url)
            .json(&json!({
                "query": GET_SUMMONERS,
                "variables": { "owner": owner },
            }))
            .send()
            .await
            .map_err(|err| PortalError::Index(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PortalError::Index(format!("index responded with {status}")).into());
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|err| PortalError::Index(err.to_string()))?;

        let rows = parse_summoners(body)?;
        debug!(count = rows.len(), "summoner index returned rows");
        Ok(rows)
    }
}
