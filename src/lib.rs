//! IEEE 802.11 PHY link-quality and frame-timing model

#![forbid(unsafe_code, unused_must_use)]
#![warn(clippy::all, missing_docs)]

/// Units, shared constants and timing helpers.
pub mod common;

/// Error types.
pub mod error;

/// Success rate of frames over a noisy channel.
pub mod error_model;

/// PHY mode parameters.
pub mod mode;

/// Modulation and code descriptors.
pub mod modulation;

/// Frame reception decisions.
pub mod reception;

/// SNR sweeps.
pub mod sweep;

pub use error::{Error, Result, UnsupportedParameter};
pub use error_model::{ErrorModel, ErrorModelKind, NistErrorModel, YansErrorModel};
pub use mode::{ChunkModulation, Mode};
pub use modulation::{ConvolutionalCode, SubcarrierModulation};
