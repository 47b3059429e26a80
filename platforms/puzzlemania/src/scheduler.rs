//! Round-robin cycle scheduler
//!
//! Processes the identity set strictly sequentially, forever. Per identity
//! and cycle: up to `login.max_attempts` login attempts, each bound to its
//! own freshly built client. Proxied attempts draw uniformly at random from
//! the whole pool so a dead assigned proxy cannot burn the entire budget;
//! the final attempt always runs direct.

use crate::auth;
use crate::campaign;
use crate::client::AttemptClient;
use crate::config::PuzzleConfig;
use crate::identity::Identity;
use crate::report;
use anyhow::Result;
use core_logic::{short_address, Clock, ProxyDescriptor};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Terminal state of one identity within one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityOutcome {
    /// Login succeeded and the task engine ran (its own failures are logged,
    /// not escalated)
    Done,
    /// Every login attempt failed; the identity sat out this cycle
    Skipped,
}

pub struct Scheduler {
    config: PuzzleConfig,
    identities: Vec<Identity>,
    pool: Vec<ProxyDescriptor>,
    clock: Arc<dyn Clock>,
}

impl Scheduler {
    pub fn new(
        config: PuzzleConfig,
        identities: Vec<Identity>,
        pool: Vec<ProxyDescriptor>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            identities,
            pool,
            clock,
        }
    }

    /// Perpetual loop: one full pass, then sleep out the cycle remainder.
    pub async fn run_forever(&self) -> Result<()> {
        loop {
            let started = self.clock.now_millis();
            self.run_pass().await;
            let elapsed = self.clock.now_millis().saturating_sub(started);
            self.wait_for_next_cycle(elapsed).await;
        }
    }

    /// One pass over every identity, in input order, with pacing between.
    pub async fn run_pass(&self) {
        for identity in &self.identities {
            let short = short_address(identity.address());
            info!("Processing account {}", short);

            match self.process_identity(identity).await {
                IdentityOutcome::Done => {}
                IdentityOutcome::Skipped => {
                    warn!("Account {} skipped for this cycle", short);
                }
            }

            // Pacing between identities keeps the remote API unburst
            self.clock
                .sleep(Duration::from_millis(self.config.timing.pacing_delay_ms))
                .await;
        }
    }

    async fn process_identity(&self, identity: &Identity) -> IdentityOutcome {
        let short = short_address(identity.address());
        let budget = self.config.login.max_attempts.max(1);

        for attempt in 1..=budget {
            let dialer = self.select_dialer(attempt, budget);
            let client = match AttemptClient::build(&self.config, dialer.as_ref()) {
                Ok(client) => client,
                Err(e) => {
                    error!("[{}] attempt {}/{}: client build failed: {:#}", short, attempt, budget, e);
                    continue;
                }
            };

            match auth::login(&client, &self.config, identity, self.clock.as_ref()).await {
                Ok(session) => {
                    info!(
                        "[{}] login succeeded on attempt {}/{} as {}",
                        short, attempt, budget, session.display_name
                    );
                    if let Err(e) =
                        campaign::run_cycle(&client, &self.config, &session, self.clock.as_ref())
                            .await
                    {
                        error!("[{}] cycle aborted: {:#}", short, e);
                    }
                    return IdentityOutcome::Done;
                }
                Err(e) => {
                    error!("[{}] login attempt {}/{} failed: {:#}", short, attempt, budget, e);
                }
            }
        }

        IdentityOutcome::Skipped
    }

    /// Dialer policy: every attempt but the last draws uniformly at random
    /// from the full pool; the last attempt (and an empty pool) runs direct.
    fn select_dialer(&self, attempt: u32, budget: u32) -> Option<ProxyDescriptor> {
        if attempt == budget || self.pool.is_empty() {
            return None;
        }
        let index = rand::thread_rng().gen_range(0..self.pool.len());
        Some(self.pool[index].clone())
    }

    /// Sleeps out `cycle − elapsed` (clamped at zero), re-rendering the
    /// countdown once per tick. The sleep primitive is the injected clock, so
    /// tests run this without real waiting.
    async fn wait_for_next_cycle(&self, elapsed_ms: u64) {
        let mut remaining = self.config.timing.cycle_ms.saturating_sub(elapsed_ms);
        if remaining == 0 {
            return;
        }
        info!(
            "Pass finished in {}, next cycle in {}",
            core_logic::format_countdown(elapsed_ms),
            core_logic::format_countdown(remaining)
        );

        let tick = self.config.timing.countdown_tick_ms.max(1);
        while remaining > 0 {
            report::render_countdown(remaining);
            let step = tick.min(remaining);
            self.clock.sleep(Duration::from_millis(step)).await;
            remaining -= step;
        }
        report::finish_countdown();
    }
}
