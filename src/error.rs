//! Error types for mode construction and success-rate computation.

use thiserror::Error;

use crate::common::{Bps, Hz};

/// Top-level error type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A parameter lies outside the set the standard defines for it.
    #[error("unsupported parameter: {0}")]
    Unsupported(#[from] UnsupportedParameter),

    /// Malformed user supplied configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Parameters outside the standard-defined supported set.
///
/// Each of these aborts the single computation that hit it; nothing is ever
/// substituted silently.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnsupportedParameter {
    /// Channel bandwidth not defined for the PHY.
    #[error("bandwidth {0} Hz")]
    Bandwidth(Hz),

    /// Carrier frequency other than 2.4 GHz or 5 GHz.
    #[error("carrier frequency {0} Hz")]
    CarrierFrequency(Hz),

    /// Short slot time only exists in the 2.4 GHz band.
    #[error("short slot time is not defined for {0} Hz carrier frequency")]
    ShortSlotTime(Hz),

    /// DSSS / HR-DSSS data rate outside 1, 2, 5.5 and 11 Mbit/s.
    #[error("data rate {0} bps")]
    DataRate(Bps),

    /// HT carries one to four spatial streams.
    #[error("{0} spatial streams")]
    SpatialStreams(usize),

    /// HT uses one or two BCC encoders.
    #[error("{0} BCC encoders")]
    BccEncoders(u32),
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
