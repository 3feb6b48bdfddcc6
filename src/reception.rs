use rand::Rng;
use tracing::{debug, instrument};

use crate::{error::Result, error_model::ErrorModel, mode::Mode};

/// Result of one reception attempt.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReceptionOutcome {
    /// Probability that header and payload both survive.
    pub success_rate: f64,
    /// Whether the frame was received on this draw.
    pub received: bool,
}

/// Decides frame receptions with an error model.
///
/// Draws one uniform sample per frame instead of per bit: a frame is lost when
/// the sample lands above its chunk success rate.
#[derive(Clone, Debug, Default)]
pub struct ReceptionDecider<M> {
    model: M,
}

impl<M: ErrorModel> ReceptionDecider<M> {
    /// Creates a decider backed by `model`.
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// The error model in use.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Whether a frame sent in `mode` at linear `snr` is received.
    #[instrument(level = "trace", skip(self, rng, mode))]
    pub fn decide<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        mode: &Mode,
        header_bit_length: u32,
        payload_bit_length: u32,
        snr: f64,
    ) -> Result<ReceptionOutcome> {
        let success_rate = self
            .model
            .success_rate(mode, header_bit_length, payload_bit_length, snr)?;

        let r: f64 = rng.random();
        let received = r < success_rate;
        debug!(success_rate, received, "Reception decided");

        Ok(ReceptionOutcome {
            success_rate,
            received,
        })
    }
}
