//! The emission loop: one structured log record per tick.

use crate::config::Config;
use crate::generator::sampler::{entropy_rng, sample_bounded_int, sample_pick};
use crate::shutdown::ShutdownSignal;
use rand_pcg::Pcg64Dxsm;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::info;

/// The predefined set of random strings.
pub static VOCABULARY: [&str; 10] = [
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa",
];

/// Returns the first `num_strings` vocabulary entries.
///
/// Sizes beyond the vocabulary length clamp to the full vocabulary;
/// non-positive sizes yield an empty slice (every tick then carries an
/// empty string field).
pub fn effective_vocabulary(num_strings: i64) -> &'static [&'static str] {
    if num_strings <= 0 {
        return &[];
    }
    let n = (num_strings as usize).min(VOCABULARY.len());
    &VOCABULARY[..n]
}

/// Generates one structured record per tick until cancelled.
///
/// Owns its random stream and tick counter; neither is shared, so ticks
/// are strictly sequential and need no synchronization.
pub struct Emitter {
    cfg: Config,
    rng: Pcg64Dxsm,
    count: u64,
}

impl Emitter {
    /// Creates an emitter with a wall-clock-seeded random stream.
    pub fn new(cfg: Config) -> Self {
        Self::with_rng(cfg, entropy_rng())
    }

    /// Creates an emitter over a caller-supplied random stream, for
    /// reproducible runs and tests.
    pub fn with_rng(cfg: Config, rng: Pcg64Dxsm) -> Self {
        Self { cfg, rng, count: 0 }
    }

    /// Number of ticks emitted so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Runs the emission loop, blocking until the shutdown signal fires.
    ///
    /// The first tick lands one full period after start. Cancellation wins
    /// a race with a pending tick timer, so no record is emitted once the
    /// signal has been observed; a tick already in progress completes.
    pub async fn run(&mut self, mut shutdown: ShutdownSignal) {
        let period = self.cfg.sleep_duration;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            interval = ?period,
            max_number = self.cfg.max_number,
            num_strings = self.cfg.num_strings,
            "loop started"
        );

        loop {
            tokio::select! {
                // Biased so cancellation beats a simultaneously ready tick.
                biased;
                _ = shutdown.wait() => {
                    info!(total_ticks = self.count, "loop stopped");
                    return;
                }
                _ = ticker.tick() => self.tick(),
            }
        }
    }

    /// One tick: bump the counter, sample, emit.
    fn tick(&mut self) {
        self.count += 1;

        let random_number = sample_bounded_int(&mut self.rng, self.cfg.max_number);
        let random_string =
            sample_pick(&mut self.rng, effective_vocabulary(self.cfg.num_strings));

        info!(count = self.count, random_number, random_string, "tick");
    }
}
