use std::time::Duration;

use crate::error::{Error, Result};

/// Frequency in hertz.
pub type Hz = u64;

/// Bitrate in bits per second.
pub type Bps = f64;

/// 5 MHz channel
pub const MHZ_5: Hz = 5_000_000;

/// 10 MHz channel
pub const MHZ_10: Hz = 10_000_000;

/// 20 MHz channel
pub const MHZ_20: Hz = 20_000_000;

/// 40 MHz channel
pub const MHZ_40: Hz = 40_000_000;

/// 2.4 GHz ISM band carrier
pub const GHZ_2_4: Hz = 2_400_000_000;

/// 5 GHz band carrier
pub const GHZ_5: Hz = 5_000_000_000;

/// DSSS chip rate, used as the signal spread of the DSSS closed forms.
pub const DSSS_CHIP_RATE: f64 = 22_000_000.0;

/// Bits in the SERVICE field preceding every OFDM/HT payload.
pub const SERVICE_BITS: u32 = 16;

/// Tail bits flushed per BCC encoder.
pub const TAIL_BITS_PER_ENCODER: u32 = 6;

/// aMPDUMaxLength, in octets.
pub const MPDU_MAX_LENGTH: u32 = 65_535;

/// Shorthand for a whole number of microseconds.
pub const fn micros(us: u64) -> Duration {
    Duration::from_micros(us)
}

/// Bits per second carried by `bits` per `interval`.
pub fn bitrate(bits: u32, interval: Duration) -> Bps {
    bits as f64 / interval.as_secs_f64()
}

/// Linear SNR from decibels.
pub fn db_to_linear(db: f64) -> f64 {
    10.0_f64.powf(db / 10.0)
}

/// Number of symbols of `bits_per_symbol` needed to carry `bits`.
pub fn symbol_count(bits: u32, bits_per_symbol: u32) -> u32 {
    bits.div_ceil(bits_per_symbol.max(1))
}

/// Bits in a payload of `octets`, which must fit in one MPDU.
pub fn payload_bits(octets: u32) -> Result<u32> {
    if octets > MPDU_MAX_LENGTH {
        return Err(Error::Config(format!(
            "payload of {octets} octets exceeds the {MPDU_MAX_LENGTH} octet MPDU limit"
        )));
    }

    Ok(octets * 8)
}
