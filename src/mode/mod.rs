use std::time::Duration;

use crate::{
    common::{Bps, Hz},
    error::Result,
    modulation::{ConvolutionalCode, SubcarrierModulation},
};

/// DSSS and HR/DSSS modes
pub mod dsss;

/// HT modes
pub mod ht;

/// 802.11a OFDM modes
pub mod ofdm;

use dsss::{DsssMode, HrDsssMode};
use ht::HtMode;
use ofdm::OfdmMode;

/// A transmission mode of one of the supported PHY variants.
#[derive(Clone, Debug)]
pub enum Mode {
    /// 802.11 DSSS, 1 and 2 Mbit/s
    Dsss(DsssMode),
    /// 802.11b HR/DSSS
    HrDsss(HrDsssMode),
    /// 802.11a OFDM at 5, 10 or 20 MHz
    Ofdm(OfdmMode),
    /// 802.11n HT
    Ht(HtMode),
}

/// What the error model needs to know about one segment of a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChunkModulation {
    /// Convolutionally coded OFDM subcarriers.
    Ofdm {
        /// Subcarrier modulation
        modulation: SubcarrierModulation,
        /// Convolutional code
        code: ConvolutionalCode,
        /// Coded bitrate, the BER formulas' PHY rate
        gross_bitrate: Bps,
        /// Channel bandwidth, the BER formulas' signal spread
        bandwidth: Hz,
    },
    /// DSSS / CCK, selected by bitrate.
    Dsss {
        /// Bitrate of the segment
        bitrate: Bps,
    },
}

impl Mode {
    /// Header (PLCP header, SIGNAL or HT-SIG) segment parameters.
    pub fn header_chunk(&self) -> ChunkModulation {
        match self {
            Self::Dsss(mode) => ChunkModulation::Dsss {
                bitrate: mode.header_bitrate(),
            },
            Self::HrDsss(mode) => ChunkModulation::Dsss {
                bitrate: mode.header_bitrate(),
            },
            Self::Ofdm(mode) => {
                let header = mode.header_mode();
                ChunkModulation::Ofdm {
                    modulation: header.modulation(),
                    code: header.code(),
                    gross_bitrate: header.gross_bitrate(),
                    bandwidth: header.bandwidth(),
                }
            }
            Self::Ht(mode) => {
                let header = mode.header_mode();
                ChunkModulation::Ofdm {
                    modulation: header.modulation(),
                    code: header.code(),
                    gross_bitrate: header.gross_bitrate(),
                    bandwidth: header.base().bandwidth(),
                }
            }
        }
    }

    /// Payload segment parameters.
    pub fn data_chunk(&self) -> ChunkModulation {
        match self {
            Self::Dsss(mode) => ChunkModulation::Dsss {
                bitrate: mode.data_bitrate(),
            },
            Self::HrDsss(mode) => ChunkModulation::Dsss {
                bitrate: mode.data_bitrate(),
            },
            Self::Ofdm(mode) => {
                let data = mode.data_mode();
                ChunkModulation::Ofdm {
                    modulation: data.modulation(),
                    code: data.code(),
                    gross_bitrate: data.gross_bitrate(),
                    bandwidth: data.bandwidth(),
                }
            }
            Self::Ht(mode) => {
                let data = mode.data_mode();
                ChunkModulation::Ofdm {
                    modulation: data.modulation(),
                    code: data.code(),
                    gross_bitrate: data.gross_bitrate(),
                    bandwidth: data.base().bandwidth(),
                }
            }
        }
    }

    /// Bits of the header segment.
    pub fn header_bit_length(&self) -> u32 {
        match self {
            Self::Dsss(mode) => mode.header_bit_length(),
            Self::HrDsss(mode) => mode.header_bit_length(),
            Self::Ofdm(mode) => mode.header_mode().bit_length(),
            Self::Ht(mode) => mode.header_mode().bit_length(),
        }
    }

    /// Bits of the payload segment carrying `payload_bits` of data.
    pub fn data_bit_length(&self, payload_bits: u32) -> u32 {
        match self {
            Self::Dsss(_) | Self::HrDsss(_) => payload_bits,
            Self::Ofdm(mode) => mode.data_mode().bit_length(payload_bits),
            Self::Ht(mode) => mode.data_mode().bit_length(payload_bits),
        }
    }

    /// On-air duration of a frame carrying `payload_bits`.
    pub fn duration(&self, payload_bits: u32) -> Duration {
        match self {
            Self::Dsss(mode) => mode.duration(payload_bits),
            Self::HrDsss(mode) => mode.duration(payload_bits),
            Self::Ofdm(mode) => mode.duration(payload_bits),
            Self::Ht(mode) => mode.duration(payload_bits),
        }
    }

    /// aSlotTime
    pub fn slot_time(&self) -> Result<Duration> {
        match self {
            Self::Dsss(mode) => Ok(mode.slot_time()),
            Self::HrDsss(mode) => Ok(mode.slot_time()),
            Self::Ofdm(mode) => Ok(mode.slot_time()),
            Self::Ht(mode) => mode.slot_time(),
        }
    }

    /// aSIFSTime
    pub fn sifs_time(&self) -> Result<Duration> {
        match self {
            Self::Dsss(mode) => Ok(mode.sifs_time()),
            Self::HrDsss(mode) => Ok(mode.sifs_time()),
            Self::Ofdm(mode) => Ok(mode.sifs_time()),
            Self::Ht(mode) => mode.sifs_time(),
        }
    }
}

impl From<DsssMode> for Mode {
    fn from(mode: DsssMode) -> Self {
        Self::Dsss(mode)
    }
}

impl From<HrDsssMode> for Mode {
    fn from(mode: HrDsssMode) -> Self {
        Self::HrDsss(mode)
    }
}

impl From<OfdmMode> for Mode {
    fn from(mode: OfdmMode) -> Self {
        Self::Ofdm(mode)
    }
}

impl From<HtMode> for Mode {
    fn from(mode: HtMode) -> Self {
        Self::Ht(mode)
    }
}
