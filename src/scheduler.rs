use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior};

use crate::config::PollerConfig;
use crate::notifier::Notifier;
use crate::orders::OrderFeed;
use crate::utils::error::Result;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PollStats {
    pub ticks: u64,
    pub feeds_polled: u64,
    pub feed_failures: u64,
    pub messages_sent: u64,
    pub delivery_failures: u64,
    pub last_tick: Option<DateTime<Utc>>,
}

/// Polls every order feed on a fixed interval and forwards whatever they
/// report to the notifier.
///
/// Ticks are independent: nothing is remembered between them, so an order
/// that stays in a feed is announced again on the next tick.
pub struct OrderPoller {
    feeds: Vec<Box<dyn OrderFeed>>,
    notifier: Box<dyn Notifier>,
    interval: Duration,
    stats: PollStats,
}

impl OrderPoller {
    pub fn new(
        feeds: Vec<Box<dyn OrderFeed>>,
        notifier: Box<dyn Notifier>,
        config: &PollerConfig,
    ) -> Self {
        Self {
            feeds,
            notifier,
            interval: Duration::from_secs(config.interval_secs),
            stats: PollStats::default(),
        }
    }

    pub fn stats(&self) -> &PollStats {
        &self.stats
    }

    /// One pass over all feeds. Feed and delivery failures are logged and
    /// counted, never returned.
    pub async fn tick(&mut self) {
        self.stats.ticks += 1;
        self.stats.last_tick = Some(Utc::now());

        for feed in &self.feeds {
            self.stats.feeds_polled += 1;

            let messages = match feed.poll().await {
                Ok(messages) => messages,
                Err(e) => {
                    self.stats.feed_failures += 1;
                    tracing::warn!(feed = feed.name(), error = %e, "Order feed poll failed");
                    continue;
                }
            };

            if messages.is_empty() {
                tracing::info!(feed = feed.name(), "No new orders");
                continue;
            }

            for message in &messages {
                match self.notifier.notify(message).await {
                    Ok(_) => self.stats.messages_sent += 1,
                    Err(e) => {
                        self.stats.delivery_failures += 1;
                        tracing::warn!(feed = feed.name(), error = %e, "Failed to deliver order notification");
                    }
                }
            }
        }
    }

    /// Ticks immediately, then once per interval until Ctrl-C.
    pub async fn run(&mut self) -> Result<()> {
        tracing::info!(
            feeds = self.feeds.len(),
            notifier = self.notifier.name(),
            interval_secs = self.interval.as_secs(),
            "Order poller started"
        );

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);
        self.run_until(&mut interval, shutdown).await?;

        tracing::info!(
            ticks = self.stats.ticks,
            messages_sent = self.stats.messages_sent,
            feed_failures = self.stats.feed_failures,
            "Order poller stopped"
        );
        Ok(())
    }

    /// Ticks until `shutdown` resolves. The same future is polled across
    /// iterations, so a signal raised during a tick ends the loop right after it.
    async fn run_until<F>(&mut self, interval: &mut Interval, mut shutdown: Pin<&mut F>) -> Result<()>
    where
        F: Future<Output = std::io::Result<()>>,
    {
        loop {
            tokio::select! {
                _ = interval.tick() => self.tick().await,
                signal = &mut shutdown => {
                    signal?;
                    return Ok(());
                }
            }
        }
    }
}
