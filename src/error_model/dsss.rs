//! Closed-form DSSS and HR/DSSS chunk success rates.
//!
//! The CCK curves are empirical fits of simulated BER over SNR; above
//! [`SNR_PERFECT`] the link is error free and below [`SNR_IMPOSSIBLE`] every
//! bit is a coin flip.

use std::f64::consts::{PI, SQRT_2};

use tracing::trace;

use crate::{
    common::{Bps, DSSS_CHIP_RATE},
    error::{Result, UnsupportedParameter},
    mode::dsss::{RATE_1_MBPS, RATE_2_MBPS, RATE_5_5_MBPS, RATE_11_MBPS},
};

/// Linear SNR above which the CCK fits report no errors.
pub const SNR_PERFECT: f64 = 10.0;

/// Linear SNR below which the CCK fits report a BER of one half.
pub const SNR_IMPOSSIBLE: f64 = 0.1;

/// Barker coded modes run at 1 Msymbol/s.
const BARKER_SYMBOL_RATE: f64 = 1_000_000.0;

/// Differential QPSK bit error approximation for Eb/N0 `x`.
pub fn dqpsk_ber(x: f64) -> f64 {
    let ber = ((SQRT_2 + 1.0) / (8.0 * PI * SQRT_2).sqrt())
        * (1.0 / x.sqrt())
        * (-(2.0 - SQRT_2) * x).exp();
    ber.min(0.5)
}

/// DBPSK, 1 Mbit/s.
pub fn dbpsk_success_rate(snr: f64, nbits: u32) -> f64 {
    let eb_n0 = snr * DSSS_CHIP_RATE / BARKER_SYMBOL_RATE;
    let ber = 0.5 * (-eb_n0).exp();
    trace!(snr, ber, "dbpsk");
    (1.0 - ber).powf(nbits as f64)
}

/// DQPSK, 2 Mbit/s.
pub fn dqpsk_success_rate(snr: f64, nbits: u32) -> f64 {
    let eb_n0 = snr * DSSS_CHIP_RATE / BARKER_SYMBOL_RATE / 2.0;
    let ber = dqpsk_ber(eb_n0);
    trace!(snr, ber, "dqpsk");
    (1.0 - ber).powf(nbits as f64)
}

/// DQPSK-CCK, 5.5 Mbit/s.
pub fn cck_5_5_success_rate(snr: f64, nbits: u32) -> f64 {
    let ber = if snr > SNR_PERFECT {
        0.0
    } else if snr < SNR_IMPOSSIBLE {
        0.5
    } else {
        let a1 = 5.3681634344056195e-1;
        let a2 = 3.3092430025608586e-3;
        let a3 = 4.1654372361004000e-1;
        let a4 = 1.0288981434358866e0;
        a1 * (-((snr - a2) / a3).powf(a4)).exp()
    };
    trace!(snr, ber, "cck 5.5");
    (1.0 - ber).powf(nbits as f64)
}

/// DQPSK-CCK, 11 Mbit/s.
pub fn cck_11_success_rate(snr: f64, nbits: u32) -> f64 {
    let ber = if snr > SNR_PERFECT {
        0.0
    } else if snr < SNR_IMPOSSIBLE {
        0.5
    } else {
        let a1 = 7.9056742265333456e-3;
        let a2 = -1.8397449399176360e-1;
        let a3 = 1.0740689468707241e0;
        let a4 = 1.0523316904502553e0;
        let a5 = 3.0552298746496687e-1;
        let a6 = 2.2032715128698435e0;
        (a1 * snr * snr + a2 * snr + a3) / (snr * snr * snr + a4 * snr * snr + a5 * snr + a6)
    };
    trace!(snr, ber, "cck 11");
    (1.0 - ber).powf(nbits as f64)
}

/// Success rate of `nbits` sent at `bitrate`.
pub fn chunk_success_rate(bitrate: Bps, nbits: u32, snr: f64) -> Result<f64> {
    if bitrate == RATE_1_MBPS {
        Ok(dbpsk_success_rate(snr, nbits))
    } else if bitrate == RATE_2_MBPS {
        Ok(dqpsk_success_rate(snr, nbits))
    } else if bitrate == RATE_5_5_MBPS {
        Ok(cck_5_5_success_rate(snr, nbits))
    } else if bitrate == RATE_11_MBPS {
        Ok(cck_11_success_rate(snr, nbits))
    } else {
        Err(UnsupportedParameter::DataRate(bitrate).into())
    }
}
