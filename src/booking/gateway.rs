//! Where a validated booking goes. The shipped gateway only simulates the
//! network round trip.

use std::time::Duration;

use anyhow::{Result, bail};

use crate::models::BookingPayload;
use crate::random::{RandomSource, ThreadRandom};

pub trait BookingGateway {
    async fn send(&mut self, payload: &BookingPayload) -> Result<()>;
}

/// Sleeps for a fixed latency, then fails with probability `failure_rate`.
pub struct SimulatedGateway {
    latency: Duration,
    failure_rate: f64,
    rng: Box<dyn RandomSource>,
}

impl SimulatedGateway {
    pub const DEFAULT_LATENCY: Duration = Duration::from_millis(2000);
    pub const DEFAULT_FAILURE_RATE: f64 = 0.05;

    #[must_use]
    pub fn new(latency: Duration, failure_rate: f64) -> Self {
        Self {
            latency,
            failure_rate: failure_rate.clamp(0.0, 1.0),
            rng: Box::new(ThreadRandom),
        }
    }

    #[must_use]
    pub fn with_random(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LATENCY, Self::DEFAULT_FAILURE_RATE)
    }
}

impl BookingGateway for SimulatedGateway {
    #[tracing::instrument(name = "simulated_submit", skip_all, fields(fields = payload.fields.len()))]
    async fn send(&mut self, payload: &BookingPayload) -> Result<()> {
        tokio::time::sleep(self.latency).await;
        if self.rng.unit() < self.failure_rate {
            tracing::debug!("Injected submission failure");
            bail!("Submission failed");
        }
        Ok(())
    }
}
