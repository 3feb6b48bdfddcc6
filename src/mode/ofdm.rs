//! Clause 18 (802.11a) OFDM modes in the 5 GHz band.
//!
//! The 20 MHz timing is stretched by two at 10 MHz and by four at 5 MHz
//! channel spacing. Slot and SIFS times are the 5 GHz values; ERP-OFDM
//! timing in the 2.4 GHz band is not modelled.

use std::time::Duration;

use crate::{
    common::*,
    error::{Result, UnsupportedParameter},
    modulation::{ConvolutionalCode, SubcarrierModulation},
};

/// N_SD
pub const DATA_SUBCARRIERS: u32 = 48;

/// N_SP
pub const PILOT_SUBCARRIERS: u32 = 4;

/// RATE, reserved, LENGTH, parity and tail bits of the SIGNAL field.
pub const SIGNAL_BIT_LENGTH: u32 = 4 + 1 + 12 + 1 + 6;

fn timing_scale(bandwidth: Hz) -> Result<u32> {
    match bandwidth {
        MHZ_20 => Ok(1),
        MHZ_10 => Ok(2),
        MHZ_5 => Ok(4),
        other => Err(UnsupportedParameter::Bandwidth(other).into()),
    }
}

/// The SIGNAL (L-SIG) field: one BPSK 1/2 symbol.
#[derive(Clone, Debug, PartialEq)]
pub struct OfdmSignalMode {
    bandwidth: Hz,
    scale: u32,
}

impl OfdmSignalMode {
    /// Creates the SIGNAL mode of a `bandwidth` channel.
    pub fn new(bandwidth: Hz) -> Result<Self> {
        Ok(Self {
            bandwidth,
            scale: timing_scale(bandwidth)?,
        })
    }

    /// Channel bandwidth.
    pub fn bandwidth(&self) -> Hz {
        self.bandwidth
    }

    /// SIGNAL is BPSK modulated.
    pub fn modulation(&self) -> SubcarrierModulation {
        SubcarrierModulation::Bpsk
    }

    /// SIGNAL is rate 1/2 coded.
    pub fn code(&self) -> ConvolutionalCode {
        ConvolutionalCode::RATE_1_2
    }

    /// 24 bits.
    pub fn bit_length(&self) -> u32 {
        SIGNAL_BIT_LENGTH
    }

    /// One symbol.
    pub fn duration(&self) -> Duration {
        self.symbol_interval()
    }

    /// 4 us at 20 MHz.
    pub fn symbol_interval(&self) -> Duration {
        self.scale * micros(4)
    }

    /// Coded bits per symbol over the symbol interval.
    pub fn gross_bitrate(&self) -> Bps {
        bitrate(DATA_SUBCARRIERS, self.symbol_interval())
    }

    /// 6, 3 or 1.5 Mbit/s.
    pub fn net_bitrate(&self) -> Bps {
        self.gross_bitrate() * self.code().code_rate()
    }
}

/// The DATA field.
#[derive(Clone, Debug, PartialEq)]
pub struct OfdmDataMode {
    modulation: SubcarrierModulation,
    code: ConvolutionalCode,
    bandwidth: Hz,
    scale: u32,
}

impl OfdmDataMode {
    /// Creates a data mode of a `bandwidth` channel.
    pub fn new(
        modulation: SubcarrierModulation,
        code: ConvolutionalCode,
        bandwidth: Hz,
    ) -> Result<Self> {
        Ok(Self {
            modulation,
            code,
            bandwidth,
            scale: timing_scale(bandwidth)?,
        })
    }

    /// Subcarrier modulation.
    pub fn modulation(&self) -> SubcarrierModulation {
        self.modulation
    }

    /// Convolutional code.
    pub fn code(&self) -> ConvolutionalCode {
        self.code
    }

    /// Channel bandwidth.
    pub fn bandwidth(&self) -> Hz {
        self.bandwidth
    }

    /// 4 us at 20 MHz.
    pub fn symbol_interval(&self) -> Duration {
        self.scale * micros(4)
    }

    /// N_CBPS
    pub fn coded_bits_per_symbol(&self) -> u32 {
        self.modulation.code_word_size() * DATA_SUBCARRIERS
    }

    /// N_DBPS
    pub fn data_bits_per_symbol(&self) -> u32 {
        self.code.decoded_length(self.coded_bits_per_symbol())
    }

    /// SERVICE + tail + payload, saturating at `u32::MAX`.
    pub fn bit_length(&self, payload_bits: u32) -> u32 {
        (SERVICE_BITS + TAIL_BITS_PER_ENCODER)
            .saturating_add(payload_bits)
    }

    /// Whole symbols needed for `payload_bits`, times the symbol interval.
    pub fn duration(&self, payload_bits: u32) -> Duration {
        let symbols = symbol_count(self.bit_length(payload_bits), self.data_bits_per_symbol());
        symbols * self.symbol_interval()
    }

    /// Coded bits per symbol over the symbol interval.
    pub fn gross_bitrate(&self) -> Bps {
        bitrate(self.coded_bits_per_symbol(), self.symbol_interval())
    }

    /// Gross bitrate scaled by the code rate.
    pub fn net_bitrate(&self) -> Bps {
        self.gross_bitrate() * self.code.code_rate()
    }
}

/// A complete OFDM mode.
#[derive(Clone, Debug, PartialEq)]
pub struct OfdmMode {
    signal_mode: OfdmSignalMode,
    data_mode: OfdmDataMode,
}

impl OfdmMode {
    /// Creates the mode; SIGNAL uses the data field's channel.
    pub fn new(
        modulation: SubcarrierModulation,
        code: ConvolutionalCode,
        bandwidth: Hz,
    ) -> Result<Self> {
        Ok(Self {
            signal_mode: OfdmSignalMode::new(bandwidth)?,
            data_mode: OfdmDataMode::new(modulation, code, bandwidth)?,
        })
    }

    /// The header is the SIGNAL field.
    pub fn header_mode(&self) -> &OfdmSignalMode {
        &self.signal_mode
    }

    /// Data mode.
    pub fn data_mode(&self) -> &OfdmDataMode {
        &self.data_mode
    }

    /// Ten short plus two long training symbols; 16 us at 20 MHz.
    pub fn preamble_duration(&self) -> Duration {
        self.signal_mode.scale * micros(16)
    }

    /// aSlotTime
    pub fn slot_time(&self) -> Duration {
        match self.signal_mode.scale {
            1 => micros(9),
            2 => micros(13),
            _ => micros(21),
        }
    }

    /// aSIFSTime
    pub fn sifs_time(&self) -> Duration {
        self.signal_mode.scale * micros(16)
    }

    /// Preamble, SIGNAL and DATA.
    pub fn duration(&self, payload_bits: u32) -> Duration {
        self.preamble_duration()
            + self.signal_mode.duration()
            + self.data_mode.duration(payload_bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use ConvolutionalCode as C;
    use SubcarrierModulation::*;

    #[test_log::test]
    fn test_signal_mode() {
        let signal = OfdmSignalMode::new(MHZ_20).unwrap();
        assert_eq!(signal.bit_length(), 24);
        assert_eq!(signal.duration(), micros(4));
        assert!((signal.net_bitrate() - 6e6).abs() < 1e-3);

        let signal = OfdmSignalMode::new(MHZ_5).unwrap();
        assert_eq!(signal.duration(), micros(16));
        assert!((signal.net_bitrate() - 1.5e6).abs() < 1e-3);
    }

    #[test_log::test]
    fn test_unsupported_bandwidth() {
        assert_eq!(
            OfdmSignalMode::new(MHZ_40),
            Err(Error::Unsupported(UnsupportedParameter::Bandwidth(MHZ_40)))
        );
    }

    #[test_log::test]
    fn test_data_rates() {
        let rates = [
            (Bpsk, C::RATE_1_2, 6e6),
            (Bpsk, C::RATE_3_4, 9e6),
            (Qpsk, C::RATE_1_2, 12e6),
            (Qpsk, C::RATE_3_4, 18e6),
            (Qam16, C::RATE_1_2, 24e6),
            (Qam16, C::RATE_3_4, 36e6),
            (Qam64, C::RATE_2_3, 48e6),
            (Qam64, C::RATE_3_4, 54e6),
        ];

        for (modulation, code, expected) in rates {
            let mode = OfdmDataMode::new(modulation, code, MHZ_20).unwrap();
            assert!(
                (mode.net_bitrate() - expected).abs() < 1e-3,
                "{modulation} {code}"
            );
        }
    }

    #[test_log::test]
    fn test_frame_duration() {
        let mode = OfdmMode::new(Qam64, C::RATE_3_4, MHZ_20).unwrap();
        // 216 data bits per symbol, 1500 byte payload -> 56 symbols
        assert_eq!(mode.data_mode().duration(12_000), 56 * micros(4));
        let expected = micros(16) + micros(4) + 56 * micros(4);
        assert_eq!(mode.duration(12_000), expected);
    }

    #[test_log::test]
    fn test_data_bit_length_saturates() {
        let mode = OfdmMode::new(Qpsk, C::RATE_1_2, MHZ_20).unwrap();
        assert_eq!(mode.data_mode().bit_length(1000), 1022);
        assert_eq!(mode.data_mode().bit_length(u32::MAX - 10), u32::MAX);
    }

    #[test_log::test]
    fn test_mac_timing() {
        let mode = OfdmMode::new(Bpsk, C::RATE_1_2, MHZ_20).unwrap();
        assert_eq!(mode.slot_time(), micros(9));
        assert_eq!(mode.sifs_time(), micros(16));

        let mode = OfdmMode::new(Bpsk, C::RATE_1_2, MHZ_10).unwrap();
        assert_eq!(mode.slot_time(), micros(13));
        assert_eq!(mode.sifs_time(), micros(32));
    }
}
