use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    clients::{names::format_name, rarity::RarityClient},
    connection::ConnectionProvider,
    gateway::{Gateway, GoldContract},
    index::SummonerIndex,
    printer::Printer,
    types::{BatchReport, ClaimOutcome, Summoner},
    utils::{self, GOLD_DECIMALS},
};

/// Client for the gold contract.
pub struct GoldClient<G, I> {
    gateway: Arc<G>,
    connection: ConnectionProvider,

    rarity: RarityClient<G, I>,
}

impl<G, I> Clone for GoldClient<G, I> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            connection: self.connection.clone(),
            rarity: self.rarity.clone(),
        }
    }
}

impl<G: Gateway, I: SummonerIndex> GoldClient<G, I> {
    pub fn new(gateway: Arc<G>, connection: ConnectionProvider, rarity: RarityClient<G, I>) -> Self {
        Self {
            gateway,
            connection,
            rarity,
        }
    }

    /// Claims the summoner's accrued gold, if any.
    pub async fn claim_gold(
        &self,
        summoner: &Summoner,
        print: &dyn Printer,
    ) -> eyre::Result<ClaimOutcome> {
        let contract = self.gateway.gold(&self.connection.current().await)?;
        let claimable = contract.claimable(summoner.id).await?;
        let name = format_name(summoner);

        if claimable.is_zero() {
            print.print(&format!("{name} has no gold to claim"));
            return Ok(ClaimOutcome::NothingToClaim);
        }

        let amount = utils::format_amount(claimable, GOLD_DECIMALS)?;
        print.print(&format!("{name} is claiming {amount} gold"));
        info!(id = %summoner.id, %claimable, "claiming gold");
        let tx = contract.claim(summoner.id).await?;
        print.print(&format!("{name} claimed {amount} gold"));

        Ok(ClaimOutcome::Claimed {
            amount: claimable,
            tx,
        })
    }

    /// Claims gold for every owned summoner, one at a time in listing order.
    pub async fn claim_gold_all(
        &self,
        print: &dyn Printer,
    ) -> eyre::Result<BatchReport<ClaimOutcome>> {
        let summoners = self.rarity.get_summoners(None).await?;
        if summoners.is_empty() {
            print.print("no summoners found");
        }

        let mut report = BatchReport::default();
        for summoner in &summoners {
            let result = self.claim_gold(summoner, print).await;
            if let Err(err) = &result {
                warn!(id = %summoner.id, error = %err, "gold claim failed");
                print.print(&format!(
                    "{} could not claim gold: {err}",
                    format_name(summoner)
                ));
            }
            report.push(summoner.id, result);
        }

        Ok(report)
    }
}
