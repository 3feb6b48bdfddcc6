//! DSSS (802.11) and HR/DSSS (802.11b) modes.

use std::time::Duration;

use crate::{
    common::*,
    error::{Result, UnsupportedParameter},
};

/// PLCP header: SIGNAL, SERVICE, LENGTH and CRC.
pub const PLCP_HEADER_BITS: u32 = 8 + 8 + 16 + 16;

/// 1 Mbit/s
pub const RATE_1_MBPS: Bps = 1_000_000.0;
/// 2 Mbit/s
pub const RATE_2_MBPS: Bps = 2_000_000.0;
/// 5.5 Mbit/s
pub const RATE_5_5_MBPS: Bps = 5_500_000.0;
/// 11 Mbit/s
pub const RATE_11_MBPS: Bps = 11_000_000.0;

/// PLCP preamble length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PreambleType {
    /// 144 bit SYNC + SFD, header at 1 Mbit/s
    Long,
    /// 72 bit SYNC + SFD, header at 2 Mbit/s
    Short,
}

impl PreambleType {
    fn preamble_bits(self) -> u32 {
        match self {
            Self::Long => 144,
            Self::Short => 72,
        }
    }

    fn header_bitrate(self) -> Bps {
        match self {
            Self::Long => RATE_1_MBPS,
            Self::Short => RATE_2_MBPS,
        }
    }
}

/// Airtime of `bits` at `bitrate`, rounded up to whole microseconds.
fn airtime(bits: u32, bitrate: Bps) -> Duration {
    micros((bits as f64 * 1e6 / bitrate).ceil() as u64)
}

/// Barker coded DBPSK / DQPSK mode.
#[derive(Clone, Debug, PartialEq)]
pub struct DsssMode {
    data_bitrate: Bps,
}

impl DsssMode {
    /// Creates a 1 or 2 Mbit/s mode.
    pub fn new(data_bitrate: Bps) -> Result<Self> {
        if data_bitrate != RATE_1_MBPS && data_bitrate != RATE_2_MBPS {
            return Err(UnsupportedParameter::DataRate(data_bitrate).into());
        }
        Ok(Self { data_bitrate })
    }

    /// The PLCP header is always DBPSK at 1 Mbit/s.
    pub fn header_bitrate(&self) -> Bps {
        RATE_1_MBPS
    }

    /// Payload bitrate.
    pub fn data_bitrate(&self) -> Bps {
        self.data_bitrate
    }

    /// 48 bits.
    pub fn header_bit_length(&self) -> u32 {
        PLCP_HEADER_BITS
    }

    /// 192 us: long preamble plus header.
    pub fn plcp_duration(&self) -> Duration {
        let bits = PreambleType::Long.preamble_bits() + PLCP_HEADER_BITS;
        airtime(bits, RATE_1_MBPS)
    }

    /// Payload airtime.
    pub fn data_duration(&self, payload_bits: u32) -> Duration {
        airtime(payload_bits, self.data_bitrate)
    }

    /// PLCP plus payload.
    pub fn duration(&self, payload_bits: u32) -> Duration {
        self.plcp_duration() + self.data_duration(payload_bits)
    }

    /// aSlotTime
    pub fn slot_time(&self) -> Duration {
        micros(20)
    }

    /// aSIFSTime
    pub fn sifs_time(&self) -> Duration {
        micros(10)
    }
}

/// CCK mode, with a long or short PLCP preamble.
#[derive(Clone, Debug, PartialEq)]
pub struct HrDsssMode {
    data_bitrate: Bps,
    preamble_type: PreambleType,
}

impl HrDsssMode {
    /// Creates a mode; the short preamble does not carry 1 Mbit/s payloads.
    pub fn new(data_bitrate: Bps, preamble_type: PreambleType) -> Result<Self> {
        let supported: &[Bps] = match preamble_type {
            PreambleType::Long => &[RATE_1_MBPS, RATE_2_MBPS, RATE_5_5_MBPS, RATE_11_MBPS],
            PreambleType::Short => &[RATE_2_MBPS, RATE_5_5_MBPS, RATE_11_MBPS],
        };
        if !supported.contains(&data_bitrate) {
            return Err(UnsupportedParameter::DataRate(data_bitrate).into());
        }

        Ok(Self {
            data_bitrate,
            preamble_type,
        })
    }

    /// Long or short.
    pub fn preamble_type(&self) -> PreambleType {
        self.preamble_type
    }

    /// 1 Mbit/s after a long preamble, 2 Mbit/s after a short one.
    pub fn header_bitrate(&self) -> Bps {
        self.preamble_type.header_bitrate()
    }

    /// Payload bitrate.
    pub fn data_bitrate(&self) -> Bps {
        self.data_bitrate
    }

    /// 48 bits.
    pub fn header_bit_length(&self) -> u32 {
        PLCP_HEADER_BITS
    }

    /// Preamble at 1 Mbit/s plus header at the header bitrate.
    pub fn plcp_duration(&self) -> Duration {
        airtime(self.preamble_type.preamble_bits(), RATE_1_MBPS)
            + airtime(PLCP_HEADER_BITS, self.header_bitrate())
    }

    /// Payload airtime.
    pub fn data_duration(&self, payload_bits: u32) -> Duration {
        airtime(payload_bits, self.data_bitrate)
    }

    /// PLCP plus payload.
    pub fn duration(&self, payload_bits: u32) -> Duration {
        self.plcp_duration() + self.data_duration(payload_bits)
    }

    /// aSlotTime
    pub fn slot_time(&self) -> Duration {
        micros(20)
    }

    /// aSIFSTime
    pub fn sifs_time(&self) -> Duration {
        micros(10)
    }
}
