use tracing::{debug, instrument};

use crate::{
    common::{Bps, Hz},
    error::Result,
    mode::{ChunkModulation, Mode},
    modulation::{ConvolutionalCode, SubcarrierModulation},
};

/// Closed-form DSSS / HR-DSSS success rates
pub mod dsss;

/// NIST error model
pub mod nist;

/// YANS error model
pub mod yans;

pub use nist::NistErrorModel;
pub use yans::YansErrorModel;

/// Maps an SNR and a segment's modulation to the probability that the
/// segment is received without an uncorrectable error.
///
/// Implementors supply the coded OFDM formula; DSSS and the composition of
/// header and payload are shared.
pub trait ErrorModel {
    /// Success rate of `nbits` convolutionally coded OFDM bits.
    fn ofdm_chunk_success_rate(
        &self,
        modulation: SubcarrierModulation,
        code: ConvolutionalCode,
        nbits: u32,
        gross_bitrate: Bps,
        bandwidth: Hz,
        snr: f64,
    ) -> f64;

    /// Success rate of `nbits` DSSS / HR-DSSS bits sent at `bitrate`.
    fn dsss_chunk_success_rate(&self, bitrate: Bps, nbits: u32, snr: f64) -> Result<f64> {
        dsss::chunk_success_rate(bitrate, nbits, snr)
    }

    /// Success rate of one segment, at most one.
    fn chunk_success_rate(&self, chunk: &ChunkModulation, nbits: u32, snr: f64) -> Result<f64> {
        let rate = match *chunk {
            ChunkModulation::Ofdm {
                modulation,
                code,
                gross_bitrate,
                bandwidth,
            } => self.ofdm_chunk_success_rate(
                modulation,
                code,
                nbits,
                gross_bitrate,
                bandwidth,
                snr,
            ),
            ChunkModulation::Dsss { bitrate } => self.dsss_chunk_success_rate(bitrate, nbits, snr)?,
        };

        Ok(rate.min(1.0))
    }

    /// Probability that both the header and the payload of a frame sent in
    /// `mode` survive a linear `snr`.
    #[instrument(level = "trace", skip(self, mode))]
    fn success_rate(
        &self,
        mode: &Mode,
        header_bit_length: u32,
        payload_bit_length: u32,
        snr: f64,
    ) -> Result<f64> {
        let header = self.chunk_success_rate(&mode.header_chunk(), header_bit_length, snr)?;
        let payload = self.chunk_success_rate(&mode.data_chunk(), payload_bit_length, snr)?;
        debug!(header, payload, "Chunk success rates");

        Ok(header * payload)
    }
}

/// Selects one of the error models at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ErrorModelKind {
    /// [`YansErrorModel`]
    #[default]
    Yans,
    /// [`NistErrorModel`]
    Nist,
}

impl ErrorModel for ErrorModelKind {
    fn ofdm_chunk_success_rate(
        &self,
        modulation: SubcarrierModulation,
        code: ConvolutionalCode,
        nbits: u32,
        gross_bitrate: Bps,
        bandwidth: Hz,
        snr: f64,
    ) -> f64 {
        let model: &dyn ErrorModel = match self {
            Self::Yans => &YansErrorModel,
            Self::Nist => &NistErrorModel,
        };
        model.ofdm_chunk_success_rate(modulation, code, nbits, gross_bitrate, bandwidth, snr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::*,
        error::{Error, UnsupportedParameter},
        mode::{dsss::DsssMode, ofdm::OfdmMode},
    };
    use ConvolutionalCode as C;
    use SubcarrierModulation::*;

    #[test_log::test]
    fn test_success_rate_is_product_of_chunks() {
        let mode: Mode = OfdmMode::new(Qpsk, C::RATE_3_4, MHZ_20).unwrap().into();
        let snr = db_to_linear(8.0);

        let header = YansErrorModel.chunk_success_rate(&mode.header_chunk(), 24, snr).unwrap();
        let payload = YansErrorModel.chunk_success_rate(&mode.data_chunk(), 8000, snr).unwrap();
        let total = YansErrorModel.success_rate(&mode, 24, 8000, snr).unwrap();

        assert!((total - header * payload).abs() < 1e-15);
        assert!(header >= total);
    }

    #[test_log::test]
    fn test_dsss_mode_dispatch() {
        let mode: Mode = DsssMode::new(1e6).unwrap().into();
        let rate = NistErrorModel.success_rate(&mode, 48, 8000, 1.0).unwrap();
        assert!(rate > 0.0 && rate <= 1.0);
    }

    #[test_log::test]
    fn test_unsupported_dsss_rate_aborts() {
        let chunk = ChunkModulation::Dsss { bitrate: 3e6 };
        assert_eq!(
            YansErrorModel.chunk_success_rate(&chunk, 8, 1.0),
            Err(Error::Unsupported(UnsupportedParameter::DataRate(3e6)))
        );
    }

    #[test_log::test]
    fn test_kind_delegates() {
        let mode: Mode = OfdmMode::new(Qam16, C::RATE_1_2, MHZ_20).unwrap().into();
        let snr = db_to_linear(12.0);

        assert_eq!(
            ErrorModelKind::Yans.success_rate(&mode, 24, 4000, snr),
            YansErrorModel.success_rate(&mode, 24, 4000, snr)
        );
        assert_eq!(
            ErrorModelKind::Nist.success_rate(&mode, 24, 4000, snr),
            NistErrorModel.success_rate(&mode, 24, 4000, snr)
        );
    }
}
