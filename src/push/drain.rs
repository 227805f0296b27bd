//! The single consumer of the push queue.
//!
//! A wake runs passes until the queue is empty. A pass walks the queue by
//! index: a throttled request stays in place and the walk moves past it,
//! anything else (delivered or hard failure) is removed. The attempt counter
//! survives across passes and wakes so the rate limit holds between bursts.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::core::config::PushSettings;
use crate::push::queue::PushQueue;
use crate::telegram::api::{Delivery, Messenger};

/// What a single pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    pub delivered: usize,
    pub failed: usize,
    pub throttled: usize,
}

pub struct PushWorker {
    queue: Arc<PushQueue>,
    messenger: Arc<dyn Messenger>,
    settings: PushSettings,
    attempts: usize,
    pauses: usize,
}

impl PushWorker {
    pub fn new(queue: Arc<PushQueue>, messenger: Arc<dyn Messenger>, settings: PushSettings) -> Self {
        Self {
            queue,
            messenger,
            settings,
            attempts: 0,
            pauses: 0,
        }
    }

    /// How many times the worker has paused for the rate limit
    pub fn pauses(&self) -> usize {
        self.pauses
    }

    /// One walk over the queue.
    pub async fn drain_pass(&mut self) -> PassStats {
        let mut stats = PassStats::default();
        let mut index = 0;

        while let Some(request) = self.queue.get(index).await {
            self.throttle().await;
            self.attempts += 1;

            let delivery = self
                .messenger
                .send_text(request.chat_id, &request.body, request.markup.as_ref())
                .await;

            match delivery {
                Delivery::Throttled => {
                    stats.throttled += 1;
                    index += 1;
                }
                Delivery::Delivered => {
                    stats.delivered += 1;
                    self.queue.remove(index).await;
                }
                Delivery::Failed(reason) => {
                    log::error!("Dropping push to chat {}: {}", request.chat_id, reason);
                    stats.failed += 1;
                    self.queue.remove(index).await;
                }
            }
        }

        stats
    }

    /// Runs passes until nothing is left.
    pub async fn drain(&mut self) {
        let mut passes = 0;
        while !self.queue.is_empty().await {
            passes += 1;
            let stats = self.drain_pass().await;
            log::debug!(
                "Push pass {}: {} delivered, {} failed, {} throttled",
                passes,
                stats.delivered,
                stats.failed,
                stats.throttled
            );
        }
    }

    /// Waits for wake signals until every sender is gone.
    pub async fn run(mut self, mut wake: mpsc::Receiver<()>) {
        log::info!(
            "Push worker started (batch size {}, pause {}s)",
            self.settings.batch_size,
            self.settings.pause_secs
        );
        while wake.recv().await.is_some() {
            self.drain().await;
        }
        log::info!("Push worker stopped");
    }

    async fn throttle(&mut self) {
        if self.attempts >= self.settings.batch_size.max(1) {
            log::debug!("Sent {} push requests, pausing {}s", self.attempts, self.settings.pause_secs);
            tokio::time::sleep(self.settings.pause()).await;
            self.attempts = 0;
            self.pauses += 1;
        }
    }
}
