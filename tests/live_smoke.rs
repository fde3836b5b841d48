use std::sync::Arc;

use riot_trends::StatisticsPipeline;
use riot_trends::auth::EnvCredentials;
use riot_trends::riot::{MatchIdQuery, RiotClient};

fn live_tests_enabled() -> bool {
    std::env::var("RIOT_LIVE_TESTS").ok().as_deref() == Some("1")
}

fn live_target() -> Option<(String, String)> {
    let platform = std::env::var("RIOT_PLATFORM").ok()?;
    let puuid = std::env::var("RIOT_PUUID").ok()?;
    Some((platform, puuid))
}

#[tokio::test]
#[ignore]
async fn live_match_listing_smoke() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();
    if !live_tests_enabled() {
        return Ok(());
    }

    let (Ok(credentials), Some((platform, puuid))) = (EnvCredentials::from_env(), live_target())
    else {
        return Ok(());
    };
    let client = RiotClient::builder()
        .platform(platform)
        .credentials(Arc::new(credentials))
        .build()?;

    let query = MatchIdQuery {
        max_ids: 5,
        page_size: 5,
        ..MatchIdQuery::default()
    };
    let ids = client.match_ids(&puuid, &query).await?;
    assert!(ids.len() <= 5);

    if let Some(id) = ids.first() {
        let detail = client.match_detail(id).await?;
        assert!(detail.participant(&puuid).is_some());
    }

    Ok(())
}

#[tokio::test]
#[ignore]
async fn live_statistics_smoke() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();
    if !live_tests_enabled() {
        return Ok(());
    }

    let (Ok(credentials), Some((platform, puuid))) = (EnvCredentials::from_env(), live_target())
    else {
        return Ok(());
    };
    let client = RiotClient::builder()
        .platform(platform.clone())
        .credentials(Arc::new(credentials))
        .build()?;

    let response = StatisticsPipeline::new(Arc::new(client), platform)
        .statistics(&puuid)
        .await?;
    assert_eq!(response.statistics.len(), 5);
    assert!(
        response
            .gameplay
            .chart_statistics
            .metrics
            .iter()
            .all(|s| s.points.len() == 12)
    );

    Ok(())
}
