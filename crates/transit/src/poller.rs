//! Per-feed realtime polling loops (C4). One task per enabled feed; every
//! tick fetches the feed's three URLs in parallel and hands whatever
//! succeeded to the merger. A failing URL never takes down the tick, a
//! failing feed never touches another feed's shard.

use std::{sync::Arc, time::Duration};

use gtfs::realtime;
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{
    config::FeedConfig,
    manager::TransitManager,
    realtime_cache::FeedUpdate,
};

/// Upper bound on one tick's worth of fetching; individual requests are
/// already capped at ten seconds by the realtime client.
const TICK_DEADLINE: Duration = Duration::from_secs(15);

pub(crate) fn spawn_feed_poller(
    manager: Arc<TransitManager>,
    feed: FeedConfig,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(feed.effective_refresh_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        log::info!(
            "polling feed {} every {:?}",
            feed.id,
            feed.effective_refresh_interval()
        );
        loop {
            tokio::select! {
                _ = manager.shutdown_token().cancelled() => break,
                _ = ticker.tick() => {}
            }
            poll_feed_once(&manager, &feed).await;
        }
        log::debug!("feed {} poller stopped", feed.id);
    })
}

/// One tick: fetch all three URLs in parallel under the tick deadline and
/// apply the successful families.
pub(crate) async fn poll_feed_once(manager: &TransitManager, feed: &FeedConfig) {
    let tick_token = manager.shutdown_token().child_token();
    let update =
        match tokio::time::timeout(TICK_DEADLINE, fetch_feed(feed, &tick_token))
            .await
        {
            Ok(update) => update,
            Err(_) => {
                tick_token.cancel();
                log::warn!("feed {} tick exceeded its deadline, skipping", feed.id);
                return;
            }
        };

    if update.trip_updates.is_none()
        && update.vehicles.is_none()
        && update.alerts.is_none()
    {
        return;
    }
    manager.apply_realtime_update(&feed.id, update).await;
}

async fn fetch_feed(feed: &FeedConfig, cancel: &CancellationToken) -> FeedUpdate {
    let (trip_updates, vehicles, alerts) = tokio::join!(
        fetch_family(feed, &feed.trip_updates_url, "trip updates", cancel),
        fetch_family(feed, &feed.vehicle_positions_url, "vehicle positions", cancel),
        fetch_family(feed, &feed.service_alerts_url, "service alerts", cancel),
    );
    FeedUpdate {
        trip_updates: trip_updates.map(|payload| payload.trip_updates),
        vehicles: vehicles.map(|payload| payload.vehicles),
        alerts: alerts.map(|payload| payload.alerts),
    }
}

/// `None` when the URL is unset or this tick's fetch failed; failures are
/// logged and retried on the next tick.
async fn fetch_family(
    feed: &FeedConfig,
    url: &Option<String>,
    what: &str,
    cancel: &CancellationToken,
) -> Option<realtime::RealtimePayload> {
    let url = url.as_deref().filter(|url| !url.is_empty())?;
    match realtime::fetch_payload(url, &feed.headers, cancel).await {
        Ok(payload) => Some(payload),
        Err(why) => {
            log::warn!("feed {} {} fetch failed: {}", feed.id, what, why);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn feed(vehicle_positions_url: Option<&str>) -> FeedConfig {
        FeedConfig {
            id: "test-feed".to_owned(),
            trip_updates_url: None,
            vehicle_positions_url: vehicle_positions_url.map(str::to_owned),
            service_alerts_url: Some(String::new()),
            headers: HashMap::new(),
            refresh_interval: 30,
            enabled: true,
        }
    }

    #[tokio::test]
    async fn unset_and_empty_urls_yield_no_families() {
        let update = fetch_feed(&feed(None), &CancellationToken::new()).await;
        assert!(update.trip_updates.is_none());
        assert!(update.vehicles.is_none());
        assert!(update.alerts.is_none());
    }

    #[tokio::test]
    async fn a_failing_url_is_reported_as_a_missing_family() {
        // Nothing listens on this TEST-NET address; the other families'
        // absence must not turn into empty payloads.
        let cancel = CancellationToken::new();
        cancel.cancel();
        let update = fetch_feed(
            &feed(Some("http://192.0.2.1/vp.pb")),
            &cancel,
        )
        .await;
        assert!(update.vehicles.is_none());
        assert!(update.trip_updates.is_none());
    }
}
