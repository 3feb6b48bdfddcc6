//! Analytic BER of convolutionally coded OFDM subcarriers.
//!
//! The coded error probability is the union bound over the first one or two
//! terms of the code's distance spectrum, `ad_free * Pd(d_free)` plus
//! `ad_free_plus_one * Pd(d_free + 1)` for QAM.

use statrs::function::{erf::erfc, factorial};
use tracing::trace;

use crate::{
    common::{Bps, Hz},
    modulation::{ConvolutionalCode, SubcarrierModulation},
};

use super::ErrorModel;

/// Distance spectrum terms used by the union bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FreeDistance {
    /// d_free
    pub d_free: u32,
    /// Paths at d_free
    pub ad_free: u32,
    /// Paths at d_free + 1; BPSK uses only the first term.
    pub ad_free_plus_one: Option<u32>,
}

impl FreeDistance {
    const fn bpsk(d_free: u32, ad_free: u32) -> Self {
        Self {
            d_free,
            ad_free,
            ad_free_plus_one: None,
        }
    }

    const fn qam(d_free: u32, ad_free: u32, ad_free_plus_one: u32) -> Self {
        Self {
            d_free,
            ad_free,
            ad_free_plus_one: Some(ad_free_plus_one),
        }
    }
}

/// Distance spectrum for a modulation / code rate pair.
pub const fn free_distance(
    modulation: SubcarrierModulation,
    code: ConvolutionalCode,
) -> FreeDistance {
    use SubcarrierModulation::*;

    match modulation {
        Bpsk if code.is_rate(1, 2) => FreeDistance::bpsk(10, 11),
        Bpsk => FreeDistance::bpsk(5, 8),
        Qpsk | Qam16 if code.is_rate(1, 2) => FreeDistance::qam(10, 11, 0),
        Qpsk | Qam16 => FreeDistance::qam(5, 8, 31),
        Qam64 if code.is_rate(2, 3) => FreeDistance::qam(6, 1, 16),
        Qam64 => FreeDistance::qam(5, 8, 31),
    }
}

/// BPSK bit error rate.
pub fn bpsk_ber(snr: f64, signal_spread: f64, phy_rate: Bps) -> f64 {
    let eb_n0 = snr * signal_spread / phy_rate;
    let ber = 0.5 * erfc(eb_n0.sqrt());
    trace!(snr, ber, "bpsk");
    ber
}

/// Square `m`-QAM bit error rate (QPSK is `m = 4`).
pub fn qam_ber(snr: f64, m: u32, signal_spread: f64, phy_rate: Bps) -> f64 {
    let m = m as f64;
    let eb_n0 = snr * signal_spread / phy_rate;
    let z = ((1.5 * m.log2() * eb_n0) / (m - 1.0)).sqrt();
    let z1 = (1.0 - 1.0 / m.sqrt()) * erfc(z);
    let ber = (1.0 - (1.0 - z1).powi(2)) / m.log2();
    trace!(m, phy_rate, snr, ber, "qam");
    ber
}

/// `C(n, k) p^k (1 - p)^(n - k)`.
///
/// The coefficient is taken in floating point so large `n` loses precision
/// gracefully instead of overflowing an integer factorial.
pub fn binomial(k: u32, p: f64, n: u32) -> f64 {
    factorial::binomial(n as u64, k as u64) * p.powi(k as i32) * (1.0 - p).powi((n - k) as i32)
}

/// Probability that the decoder picks a wrong path at Hamming distance `d`.
///
/// For even `d` a tie (`d / 2` errors) goes the wrong way half the time.
pub fn calculate_pd(ber: f64, d: u32) -> f64 {
    if d % 2 == 0 {
        let tie = 0.5 * binomial(d / 2, ber, d);
        (d / 2 + 1..d).map(|i| binomial(i, ber, d)).sum::<f64>() + tie
    } else {
        ((d + 1) / 2..d).map(|i| binomial(i, ber, d)).sum()
    }
}

/// Success rate of `nbits` of coded BPSK.
pub fn fec_bpsk_success_rate(
    snr: f64,
    nbits: u32,
    signal_spread: f64,
    phy_rate: Bps,
    d_free: u32,
    ad_free: u32,
) -> f64 {
    let ber = bpsk_ber(snr, signal_spread, phy_rate);
    if ber == 0.0 {
        return 1.0;
    }

    let pmu = (ad_free as f64 * calculate_pd(ber, d_free)).min(1.0);
    (1.0 - pmu).powf(nbits as f64)
}

/// Success rate of `nbits` of coded `m`-QAM.
#[allow(clippy::too_many_arguments)]
pub fn fec_qam_success_rate(
    snr: f64,
    nbits: u32,
    signal_spread: f64,
    phy_rate: Bps,
    m: u32,
    d_free: u32,
    ad_free: u32,
    ad_free_plus_one: u32,
) -> f64 {
    let ber = qam_ber(snr, m, signal_spread, phy_rate);
    if ber == 0.0 {
        return 1.0;
    }

    let pmu = ad_free as f64 * calculate_pd(ber, d_free)
        + ad_free_plus_one as f64 * calculate_pd(ber, d_free + 1);
    (1.0 - pmu.min(1.0)).powf(nbits as f64)
}

/// Union-bound error model of the YANS simulator.
#[derive(Clone, Copy, Debug, Default)]
pub struct YansErrorModel;

impl ErrorModel for YansErrorModel {
    fn ofdm_chunk_success_rate(
        &self,
        modulation: SubcarrierModulation,
        code: ConvolutionalCode,
        nbits: u32,
        gross_bitrate: Bps,
        bandwidth: Hz,
        snr: f64,
    ) -> f64 {
        let signal_spread = bandwidth as f64;
        let FreeDistance {
            d_free,
            ad_free,
            ad_free_plus_one,
        } = free_distance(modulation, code);

        match (modulation, ad_free_plus_one) {
            (SubcarrierModulation::Bpsk, _) | (_, None) => {
                fec_bpsk_success_rate(snr, nbits, signal_spread, gross_bitrate, d_free, ad_free)
            }
            (_, Some(ad_free_plus_one)) => fec_qam_success_rate(
                snr,
                nbits,
                signal_spread,
                gross_bitrate,
                modulation.constellation_size(),
                d_free,
                ad_free,
                ad_free_plus_one,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::MHZ_20;
    use SubcarrierModulation::*;

    #[test_log::test]
    fn test_free_distance_table() {
        use ConvolutionalCode as C;
        use FreeDistance as F;

        assert_eq!(free_distance(Bpsk, C::RATE_1_2), F::bpsk(10, 11));
        assert_eq!(free_distance(Bpsk, C::RATE_3_4), F::bpsk(5, 8));
        assert_eq!(free_distance(Qpsk, C::RATE_1_2), F::qam(10, 11, 0));
        assert_eq!(free_distance(Qpsk, C::RATE_3_4), F::qam(5, 8, 31));
        assert_eq!(free_distance(Qam16, C::RATE_1_2), F::qam(10, 11, 0));
        assert_eq!(free_distance(Qam16, C::RATE_3_4), F::qam(5, 8, 31));
        assert_eq!(free_distance(Qam64, C::RATE_2_3), F::qam(6, 1, 16));
        assert_eq!(free_distance(Qam64, C::RATE_3_4), F::qam(5, 8, 31));
        assert_eq!(free_distance(Qam64, C::RATE_5_6), F::qam(5, 8, 31));
    }

    #[test_log::test]
    fn test_bpsk_ber_limits() {
        assert!((bpsk_ber(0.0, 20e6, 12e6) - 0.5).abs() < 1e-12);
        assert_eq!(bpsk_ber(1e4, 20e6, 12e6), 0.0);

        let mut previous = 0.5;
        for step in 1..100 {
            let ber = bpsk_ber(step as f64 * 0.05, 20e6, 12e6);
            assert!(ber <= previous);
            previous = ber;
        }
    }

    #[test_log::test]
    fn test_qam_ber_limits() {
        // erfc(0) = 1: QPSK starts at 3/8
        assert!((qam_ber(0.0, 4, 20e6, 24e6) - 0.375).abs() < 1e-12);
        assert_eq!(qam_ber(1e5, 64, 20e6, 72e6), 0.0);

        for m in [4, 16, 64] {
            let mut previous = 1.0;
            for step in 0..100 {
                let ber = qam_ber(step as f64 * 0.5, m, 20e6, 24e6);
                assert!(ber <= previous, "m = {m}");
                previous = ber;
            }
        }
    }

    #[test_log::test]
    fn test_binomial() {
        assert!((binomial(2, 0.5, 4) - 6.0 / 16.0).abs() < 1e-12);
        assert_eq!(binomial(0, 0.0, 5), 1.0);
        assert_eq!(binomial(5, 1.0, 5), 1.0);
    }

    #[test_log::test]
    fn test_binomial_past_u32_factorial_overflow() {
        // 13! no longer fits in 32 bits.
        let p: f64 = 0.1;
        let expected = 1716.0 * p.powi(6) * (1.0 - p).powi(7);
        assert!((binomial(6, p, 13) - expected).abs() < 1e-15);

        // Far beyond any integer factorial.
        let c_40_20 = factorial::binomial(40, 20);
        assert!((c_40_20 - 137_846_528_820.0).abs() < 1.0);
    }

    #[test_log::test]
    fn test_pd_even_and_odd() {
        let ber = 0.01;

        let tie = 0.5 * binomial(5, ber, 10);
        let expected_even = (6..10).map(|i| binomial(i, ber, 10)).sum::<f64>() + tie;
        assert!((calculate_pd(ber, 10) - expected_even).abs() < 1e-18);

        let expected_odd = (3..5).map(|i| binomial(i, ber, 5)).sum::<f64>();
        assert!((calculate_pd(ber, 5) - expected_odd).abs() < 1e-18);
    }

    #[test_log::test]
    fn test_zero_ber_is_lossless() {
        let bpsk = fec_bpsk_success_rate(1e4, 1_000_000, 20e6, 12e6, 10, 11);
        assert_eq!(bpsk, 1.0);

        let qam = fec_qam_success_rate(1e5, 1_000_000, 20e6, 72e6, 64, 6, 1, 16);
        assert_eq!(qam, 1.0);
    }

    #[test_log::test]
    fn test_success_rate_decreases_with_length() {
        let model = YansErrorModel;
        let code = ConvolutionalCode::RATE_3_4;
        let short = model.ofdm_chunk_success_rate(Qam16, code, 100, 48e6, MHZ_20, 40.0);
        let long = model.ofdm_chunk_success_rate(Qam16, code, 10_000, 48e6, MHZ_20, 40.0);
        assert!(short >= long);
        assert!(long > 0.0 && short <= 1.0);
    }
}
