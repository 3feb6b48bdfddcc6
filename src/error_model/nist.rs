//! NIST error model for coded OFDM.
//!
//! BER is taken directly from the linear SNR per modulation and the coded
//! error probability from the union bound polynomials of the 802.11 mother
//! code and its punctured rates.

use statrs::function::erf::erfc;
use tracing::trace;

use crate::{
    common::{Bps, Hz},
    modulation::{ConvolutionalCode, SubcarrierModulation},
};

use super::ErrorModel;

/// Puncturing class selecting the union bound polynomial.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Puncturing {
    /// Rate 1/2, b = 1
    Rate1_2,
    /// Rate 2/3, b = 2
    Rate2_3,
    /// Rate 3/4, b = 3
    Rate3_4,
}

impl Puncturing {
    /// Polynomial used for `code` on `modulation`.
    pub const fn select(modulation: SubcarrierModulation, code: ConvolutionalCode) -> Self {
        match modulation {
            SubcarrierModulation::Qam64 if code.is_rate(2, 3) => Self::Rate2_3,
            SubcarrierModulation::Qam64 => Self::Rate3_4,
            _ if code.is_rate(1, 2) => Self::Rate1_2,
            _ => Self::Rate3_4,
        }
    }

    fn b_value(self) -> f64 {
        match self {
            Self::Rate1_2 => 1.0,
            Self::Rate2_3 => 2.0,
            Self::Rate3_4 => 3.0,
        }
    }
}

/// Uncoded bit error rate of `modulation` at linear `snr`.
pub fn ber(modulation: SubcarrierModulation, snr: f64) -> f64 {
    let ber = match modulation {
        SubcarrierModulation::Bpsk => 0.5 * erfc(snr.sqrt()),
        SubcarrierModulation::Qpsk => 0.5 * erfc((snr / 2.0).sqrt()),
        SubcarrierModulation::Qam16 => 0.75 * 0.5 * erfc((snr / (5.0 * 2.0)).sqrt()),
        SubcarrierModulation::Qam64 => 7.0 / 12.0 * 0.5 * erfc((snr / (21.0 * 2.0)).sqrt()),
    };
    trace!(%modulation, snr, ber, "nist");
    ber
}

/// Evaluates `sum(c_i * d^e_i)` over `(c_i, e_i)`.
fn spectrum(d: f64, terms: &[(f64, i32)]) -> f64 {
    terms.iter().map(|&(c, e)| c * d.powi(e)).sum()
}

/// Coded bit error probability for raw BER `p`, clamped to one.
pub fn coded_error_probability(p: f64, puncturing: Puncturing) -> f64 {
    let d = (4.0 * p * (1.0 - p)).sqrt();
    let b = puncturing.b_value();

    let pe = match puncturing {
        Puncturing::Rate1_2 => {
            0.5 * spectrum(
                d,
                &[
                    (36.0, 10),
                    (211.0, 12),
                    (1404.0, 14),
                    (11633.0, 16),
                    (77433.0, 18),
                    (502690.0, 20),
                    (3322763.0, 22),
                    (21292910.0, 24),
                    (134365911.0, 26),
                ],
            )
        }
        Puncturing::Rate2_3 => {
            1.0 / (2.0 * b)
                * spectrum(
                    d,
                    &[
                        (3.0, 6),
                        (70.0, 7),
                        (285.0, 8),
                        (1276.0, 9),
                        (6160.0, 10),
                        (27128.0, 11),
                        (117019.0, 12),
                        (498860.0, 13),
                        (2103891.0, 14),
                        (8784123.0, 15),
                    ],
                )
        }
        Puncturing::Rate3_4 => {
            1.0 / (2.0 * b)
                * spectrum(
                    d,
                    &[
                        (42.0, 5),
                        (201.0, 6),
                        (1492.0, 7),
                        (10469.0, 8),
                        (62935.0, 9),
                        (379644.0, 10),
                        (2253373.0, 11),
                        (13073811.0, 12),
                        (75152755.0, 13),
                        (428005675.0, 14),
                    ],
                )
        }
    };

    pe.min(1.0)
}

/// Error model validated against NIST measurements of 802.11a.
#[derive(Clone, Copy, Debug, Default)]
pub struct NistErrorModel;

impl ErrorModel for NistErrorModel {
    fn ofdm_chunk_success_rate(
        &self,
        modulation: SubcarrierModulation,
        code: ConvolutionalCode,
        nbits: u32,
        _gross_bitrate: Bps,
        _bandwidth: Hz,
        snr: f64,
    ) -> f64 {
        let ber = ber(modulation, snr);
        if ber == 0.0 {
            return 1.0;
        }

        let pe = coded_error_probability(ber, Puncturing::select(modulation, code));
        (1.0 - pe).powf(nbits as f64)
    }
}
