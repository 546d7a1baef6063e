mod common;

use alloy::primitives::U256;
use chrono::{TimeDelta, Utc};
use common::{ALICE, BOB, MockChain, MockIndex, Transcript, Write, connected, log_in, portal, row};
use rarity_portal::{
    PortalError,
    clients::rarity::{
        format_distance, get_classes, is_eligible, level_progress, next_adventure,
        progress_percent,
    },
    types::{AdventureOutcome, SummonerClass},
};

fn bar(filled: usize) -> String {
    format!("{}{}", "\u{2588}".repeat(filled), "\u{2591}".repeat(11 - filled))
}

#[test]
fn test_classes_exclude_sentinel_in_catalog_order() {
    let classes = get_classes();

    assert_eq!(classes.len(), 11);
    assert_eq!(classes.first(), Some(&"barbarian"));
    assert_eq!(classes.last(), Some(&"wizard"));
    assert!(!classes.contains(&"none"));

    for (position, label) in classes.iter().enumerate() {
        let class: SummonerClass = label.parse().unwrap();
        assert_eq!(class.index() as usize, position + 1);
    }
}

#[test]
fn test_class_parsing_is_case_insensitive_and_rejects_none() {
    assert_eq!("Wizard".parse::<SummonerClass>().unwrap(), SummonerClass::Wizard);
    assert_eq!("BARD".parse::<SummonerClass>().unwrap(), SummonerClass::Bard);
    assert!("none".parse::<SummonerClass>().is_err());
    assert!("necromancer".parse::<SummonerClass>().is_err());
}

#[test]
fn test_level_progress_bar() {
    let hundred = U256::from(100);

    assert_eq!(level_progress(U256::ZERO, hundred), format!("{} 0%", bar(0)));
    assert_eq!(level_progress(hundred, hundred), format!("{} 100%", bar(11)));
    assert_eq!(level_progress(U256::from(55), hundred), format!("{} 55%", bar(6)));
    assert_eq!(level_progress(U256::from(9), hundred), format!("{} 9%", bar(1)));
    assert_eq!(level_progress(U256::from(10), hundred), format!("{} 10%", bar(2)));
}

#[test]
fn test_progress_rounds_half_up() {
    // 0.5% rounds up, 0.4975% rounds down
    assert_eq!(progress_percent(U256::from(1), U256::from(200)), 1);
    assert_eq!(progress_percent(U256::from(1), U256::from(201)), 0);
    // 54.5% -> 55%
    assert_eq!(progress_percent(U256::from(109), U256::from(200)), 55);
    assert_eq!(progress_percent(U256::from(5), U256::ZERO), 100);
}

#[test]
fn test_progress_bar_caps_beyond_level_requirement() {
    let line = level_progress(U256::from(250), U256::from(100));
    assert_eq!(line, format!("{} 250%", bar(11)));
}

#[test]
fn test_format_distance_units() {
    assert_eq!(format_distance(TimeDelta::seconds(1)), "1 second");
    assert_eq!(format_distance(TimeDelta::seconds(45)), "45 seconds");
    assert_eq!(format_distance(TimeDelta::seconds(90)), "2 minutes");
    assert_eq!(format_distance(TimeDelta::minutes(1)), "1 minute");
    assert_eq!(format_distance(TimeDelta::hours(3)), "3 hours");
    assert_eq!(format_distance(TimeDelta::minutes(150)), "3 hours");
    assert_eq!(format_distance(TimeDelta::hours(23)), "23 hours");
    assert_eq!(format_distance(TimeDelta::days(2)), "2 days");
    assert_eq!(format_distance(TimeDelta::days(45)), "2 months");
    assert_eq!(format_distance(TimeDelta::days(364)), "1 year");
    assert_eq!(format_distance(TimeDelta::days(800)), "2 years");
    assert_eq!(format_distance(TimeDelta::hours(-3)), "3 hours");
}

#[test]
fn test_next_adventure_and_eligibility() {
    let now = Utc::now();
    let past = U256::from((now.timestamp() - 10) as u64);
    let future = U256::from((now.timestamp() + 3 * 3600 + 30) as u64);

    assert!(is_eligible(past, now));
    assert_eq!(next_adventure(past, now), "now");

    assert!(!is_eligible(future, now));
    assert_eq!(next_adventure(future, now), "in 3 hours");
}

#[tokio::test]
async fn test_summon_writes_catalog_index() -> eyre::Result<()> {
    let chain = MockChain::new();
    let portal = portal(&chain, MockIndex::default(), connected(ALICE));
    let out = Transcript::new();

    for class in SummonerClass::summonable() {
        portal.rarity.summon(class, &out).await?;
    }

    let expected: Vec<Write> = (1..=11).map(Write::Summon).collect();
    assert_eq!(chain.writes(), expected);
    assert!(out.contains("summoning fighter..."));
    assert!(out.contains("fighter has been summoned"));

    Ok(())
}

#[tokio::test]
async fn test_list_prints_enriched_summoners() -> eyre::Result<()> {
    let chain = MockChain::new();
    chain.add_summoner(7, ALICE, 55, U256::ZERO);
    chain.add_summoner(8, ALICE, 0, log_in(3 * 3600 + 30));
    {
        let mut state = chain.state();
        state.xp_required.insert(U256::from(1), U256::from(100));
        state.names.insert(U256::from(7), "Galdur".to_string());
    }
    let index = MockIndex::with_rows(vec![
        row(7, ALICE, SummonerClass::Wizard, 1),
        row(8, ALICE, SummonerClass::Monk, 1),
    ]);
    let portal = portal(&chain, index.clone(), connected(ALICE));
    let out = Transcript::new();

    let summoners = portal.rarity.list(&out).await?;

    assert_eq!(index.queries(), vec![ALICE]);
    assert_eq!(summoners.len(), 2);
    assert_eq!(summoners[0].name.as_deref(), Some("Galdur"));
    assert_eq!(summoners[0].xp, U256::from(55));
    assert_eq!(summoners[1].name, None);

    let lines = out.lines();
    assert_eq!(lines[0], "listing all summoners...");
    assert_eq!(
        lines[1],
        format!(
            "id: 7\nname: Galdur\nclass: wizard\nnext adventure: now\nlevel: 1\nlevel progress: {} 55%\n",
            bar(6)
        )
    );
    assert!(lines[2].starts_with("id: 8\nclass: monk\nnext adventure: in 3 hours\n"));
    assert!(chain.writes().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_listing_drops_rows_no_longer_owned() -> eyre::Result<()> {
    let chain = MockChain::new();
    chain.add_summoner(1, ALICE, 0, U256::ZERO);
    chain.add_summoner(2, BOB, 0, U256::ZERO);
    let index = MockIndex::with_rows(vec![
        row(1, ALICE, SummonerClass::Bard, 1),
        row(2, ALICE, SummonerClass::Bard, 1),
    ]);
    let portal = portal(&chain, index, connected(ALICE));

    let summoners = portal.rarity.get_summoners(None).await?;

    assert_eq!(summoners.len(), 1);
    assert_eq!(summoners[0].id, U256::from(1));

    Ok(())
}

#[tokio::test]
async fn test_empty_index_lists_nothing() -> eyre::Result<()> {
    let chain = MockChain::new();
    let portal = portal(&chain, MockIndex::default(), connected(ALICE));
    let out = Transcript::new();

    let summoners = portal.rarity.list(&out).await?;

    assert!(summoners.is_empty());
    assert!(out.contains("no summoners found"));

    Ok(())
}

#[tokio::test]
async fn test_index_failure_is_not_an_empty_listing() {
    let chain = MockChain::new();
    let portal = portal(&chain, MockIndex::failing(), connected(ALICE));

    let err = portal.rarity.get_summoners(None).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<PortalError>(),
        Some(PortalError::Index(_))
    ));
}

#[tokio::test]
async fn test_adventure_when_eligible_writes_once() -> eyre::Result<()> {
    let chain = MockChain::new();
    chain.add_summoner(3, ALICE, 0, log_in(-60));
    let portal = portal(
        &chain,
        MockIndex::with_rows(vec![row(3, ALICE, SummonerClass::Rogue, 1)]),
        connected(ALICE),
    );
    let summoners = portal.rarity.get_summoners(None).await?;
    let out = Transcript::new();

    let outcome = portal.rarity.adventure(&summoners[0], &out).await?;

    assert!(matches!(outcome, AdventureOutcome::Adventured(_)));
    assert_eq!(chain.writes(), vec![Write::Adventure(U256::from(3))]);
    assert_eq!(
        out.lines(),
        vec![
            "summoner 3 is going on an adventure...".to_string(),
            "summoner 3 completed their adventure".to_string(),
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_adventure_when_resting_prints_remaining_time() -> eyre::Result<()> {
    let chain = MockChain::new();
    chain.add_summoner(4, ALICE, 0, log_in(3 * 3600 + 30));
    chain
        .state()
        .names
        .insert(U256::from(4), "Mira".to_string());
    let portal = portal(
        &chain,
        MockIndex::with_rows(vec![row(4, ALICE, SummonerClass::Druid, 2)]),
        connected(ALICE),
    );
    let summoners = portal.rarity.get_summoners(None).await?;
    let out = Transcript::new();

    let outcome = portal.rarity.adventure(&summoners[0], &out).await?;

    assert_eq!(
        outcome,
        AdventureOutcome::Resting {
            next: "in 3 hours".to_string()
        }
    );
    assert!(chain.writes().is_empty());
    assert_eq!(out.lines(), vec!["Mira can go on an adventure in 3 hours"]);

    Ok(())
}

#[tokio::test]
async fn test_adventure_rereads_log_instead_of_listing_value() -> eyre::Result<()> {
    let chain = MockChain::new();
    chain.add_summoner(5, ALICE, 0, U256::ZERO);
    let portal = portal(
        &chain,
        MockIndex::with_rows(vec![row(5, ALICE, SummonerClass::Cleric, 1)]),
        connected(ALICE),
    );
    let summoners = portal.rarity.get_summoners(None).await?;
    assert!(summoners[0].log.is_zero());

    // adventured elsewhere after the listing was taken
    chain.state().logs.insert(U256::from(5), log_in(86_400));

    let outcome = portal.rarity.adventure(&summoners[0], &Transcript::new()).await?;

    assert!(matches!(outcome, AdventureOutcome::Resting { .. }));
    assert!(chain.writes().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_adventure_all_writes_eligible_in_listing_order() -> eyre::Result<()> {
    let chain = MockChain::new();
    chain.add_summoner(10, ALICE, 0, log_in(-3600));
    chain.add_summoner(11, ALICE, 0, log_in(7200));
    chain.add_summoner(12, ALICE, 0, U256::ZERO);
    let index = MockIndex::with_rows(vec![
        row(10, ALICE, SummonerClass::Fighter, 1),
        row(11, ALICE, SummonerClass::Fighter, 1),
        row(12, ALICE, SummonerClass::Fighter, 1),
    ]);
    let portal = portal(&chain, index, connected(ALICE));
    let out = Transcript::new();

    let report = portal.rarity.adventure_all(&out).await?;

    assert_eq!(
        chain.writes(),
        vec![
            Write::Adventure(U256::from(10)),
            Write::Adventure(U256::from(12)),
        ]
    );
    assert_eq!(report.len(), 3);
    assert_eq!(report.succeeded().count(), 3);
    assert!(out.contains("summoner 11 can go on an adventure in 2 hours"));

    Ok(())
}

#[tokio::test]
async fn test_adventure_all_continues_past_a_failure() -> eyre::Result<()> {
    let chain = MockChain::new();
    chain.add_summoner(20, ALICE, 0, U256::ZERO);
    chain.add_summoner(21, ALICE, 0, U256::ZERO);
    chain.add_summoner(22, ALICE, 0, U256::ZERO);
    chain.state().failing.insert(U256::from(21));
    let index = MockIndex::with_rows(vec![
        row(20, ALICE, SummonerClass::Paladin, 1),
        row(21, ALICE, SummonerClass::Paladin, 1),
        row(22, ALICE, SummonerClass::Paladin, 1),
    ]);
    let portal = portal(&chain, index, connected(ALICE));
    let out = Transcript::new();

    let report = portal.rarity.adventure_all(&out).await?;

    assert_eq!(
        chain.writes(),
        vec![
            Write::Adventure(U256::from(20)),
            Write::Adventure(U256::from(22)),
        ]
    );
    let failed: Vec<_> = report.failed().map(|(id, _)| *id).collect();
    assert_eq!(failed, vec![U256::from(21)]);
    assert!(out.contains("summoner 21 could not go on an adventure"));

    Ok(())
}

#[tokio::test]
async fn test_listing_reads_level_from_chain() -> eyre::Result<()> {
    let chain = MockChain::new();
    chain.add_summoner(6, ALICE, 100, U256::ZERO);
    {
        let mut state = chain.state();
        state.levels.insert(U256::from(6), U256::from(3));
        state.xp_required.insert(U256::from(1), U256::from(100));
        state.xp_required.insert(U256::from(3), U256::from(200));
    }
    // index still reports the level before the summoner levelled up
    let index = MockIndex::with_rows(vec![row(6, ALICE, SummonerClass::Ranger, 1)]);
    let portal = portal(&chain, index, connected(ALICE));
    let out = Transcript::new();

    let summoners = portal.rarity.list(&out).await?;

    assert_eq!(summoners[0].level, U256::from(3));
    assert_eq!(summoners[0].xp_required, U256::from(200));
    assert!(out.contains(&format!("level: 3\nlevel progress: {} 50%", bar(6))));

    Ok(())
}
