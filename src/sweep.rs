//! Success rate over a grid of SNRs.

use indicatif::ProgressBar;
use rayon::prelude::*;
use tracing::trace;

use crate::{
    common::db_to_linear,
    error::{Error, Result},
    error_model::ErrorModel,
    mode::Mode,
};

/// Evenly spaced SNRs in decibels, both ends included.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnrGrid {
    min_db: f64,
    max_db: f64,
    step_db: f64,
}

impl SnrGrid {
    /// Creates a grid from `min_db` to `max_db` every `step_db`.
    pub fn new(min_db: f64, max_db: f64, step_db: f64) -> Result<Self> {
        if !(step_db > 0.0) || !step_db.is_finite() {
            return Err(Error::Config(format!(
                "SNR step must be positive, got {step_db}"
            )));
        }
        if !(max_db >= min_db) {
            return Err(Error::Config(format!(
                "empty SNR range {min_db}..{max_db} dB"
            )));
        }

        Ok(Self {
            min_db,
            max_db,
            step_db,
        })
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        ((self.max_db - self.min_db) / self.step_db + 1e-9).floor() as usize + 1
    }

    /// Never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The `i`th SNR, in decibels.
    pub fn db(&self, i: usize) -> f64 {
        self.min_db + i as f64 * self.step_db
    }
}

/// One evaluated grid point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepPoint {
    /// SNR in decibels
    pub snr_db: f64,
    /// Linear SNR passed to the error model
    pub snr: f64,
    /// Header and payload success rate
    pub success_rate: f64,
}

/// Evaluates `model` for a frame in `mode` at every SNR of `grid`.
///
/// Points are computed in parallel and returned in ascending SNR order.
pub fn sweep_success_rates<M: ErrorModel + Sync>(
    model: &M,
    mode: &Mode,
    header_bit_length: u32,
    payload_bit_length: u32,
    grid: &SnrGrid,
    progress: Option<&ProgressBar>,
) -> Result<Vec<SweepPoint>> {
    (0..grid.len())
        .into_par_iter()
        .map(|i| {
            let snr_db = grid.db(i);
            let snr = db_to_linear(snr_db);
            let success_rate =
                model.success_rate(mode, header_bit_length, payload_bit_length, snr)?;
            trace!(snr_db, success_rate, "Sweep point");

            if let Some(progress) = progress {
                progress.inc(1);
            }

            Ok(SweepPoint {
                snr_db,
                snr,
                success_rate,
            })
        })
        .collect()
}

/// Lowest SNR of a sweep whose success rate reaches `target`.
pub fn threshold_snr_db(points: &[SweepPoint], target: f64) -> Option<f64> {
    points
        .iter()
        .find(|point| point.success_rate >= target)
        .map(|point| point.snr_db)
}
