//! High-throughput (802.11n) PHY modes.
//!
//! Field and timing names follow clause 20 of IEEE 802.11-2012: Table 20-5
//! for timing related constants, Table 20-11 for the HT-SIG layout and
//! Table 20-25 for the MIMO PHY characteristics.

use std::{sync::OnceLock, time::Duration};

use crate::{
    common::*,
    error::{Error, Result, UnsupportedParameter},
    modulation::{ConvolutionalCode, SubcarrierModulation},
};

use super::ofdm::OfdmSignalMode;

const DFT_PERIOD_NS: u64 = 3_200;

/// DFT period, T_DFT
pub const DFT_PERIOD: Duration = Duration::from_nanos(DFT_PERIOD_NS);

/// Guard interval, T_GI
pub const GI_DURATION: Duration = Duration::from_nanos(DFT_PERIOD_NS / 4);

/// Short guard interval, T_GIS
pub const SHORT_GI_DURATION: Duration = Duration::from_nanos(DFT_PERIOD_NS / 8);

/// Symbol interval, T_SYM
pub const SYMBOL_INTERVAL: Duration = Duration::from_nanos(DFT_PERIOD_NS + DFT_PERIOD_NS / 4);

/// Short GI symbol interval, T_SYMS
pub const SHORT_GI_SYMBOL_INTERVAL: Duration =
    Duration::from_nanos(DFT_PERIOD_NS + DFT_PERIOD_NS / 8);

/// MCS 32 is the 40 MHz duplicate format with its own subcarrier layout.
const DUPLICATE_MCS: u32 = 32;

/// HT-SIG sub-fields and their widths in bits (HT-SIG_1 then HT-SIG_2).
pub const HT_SIG_FIELDS: [(&str, u32); 13] = [
    ("MCS", 7),
    ("CBW 20/40", 1),
    ("HT length", 16),
    ("Smoothing", 1),
    ("Not sounding", 1),
    ("Reserved", 1),
    ("Aggregation", 1),
    ("STBC", 2),
    ("FEC coding", 1),
    ("Short GI", 1),
    ("Number of extension spatial streams", 2),
    ("CRC", 8),
    ("Tail bits", 6),
];

/// Guard interval inserted between OFDM symbols.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GuardInterval {
    /// 400 ns
    Short,
    /// 800 ns
    Long,
}

impl GuardInterval {
    /// Length of the guard interval itself.
    pub const fn duration(self) -> Duration {
        match self {
            Self::Short => SHORT_GI_DURATION,
            Self::Long => GI_DURATION,
        }
    }

    /// DFT period plus this guard interval.
    pub const fn symbol_interval(self) -> Duration {
        match self {
            Self::Short => SHORT_GI_SYMBOL_INTERVAL,
            Self::Long => SYMBOL_INTERVAL,
        }
    }
}

/// HT preamble layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PreambleFormat {
    /// Receivable by non-HT stations; carries the legacy fields.
    Mixed,
    /// All non-HT fields are omitted.
    Greenfield,
}

/// Configuration shared by the HT-SIG and HT data modes.
///
/// The two bitrates are pure functions of the immutable fields, so they are
/// computed on first read and kept in single-assignment cells.
#[derive(Clone, Debug)]
pub struct HtModeBase {
    bandwidth: Hz,
    guard_interval: GuardInterval,
    mcs: u32,
    spatial_streams: usize,
    net_bitrate: OnceLock<Bps>,
    gross_bitrate: OnceLock<Bps>,
}

impl HtModeBase {
    fn new(
        mcs: u32,
        spatial_streams: usize,
        bandwidth: Hz,
        guard_interval: GuardInterval,
    ) -> Result<Self> {
        if bandwidth != MHZ_20 && bandwidth != MHZ_40 {
            return Err(UnsupportedParameter::Bandwidth(bandwidth).into());
        }

        Ok(Self {
            bandwidth,
            guard_interval,
            mcs,
            spatial_streams,
            net_bitrate: OnceLock::new(),
            gross_bitrate: OnceLock::new(),
        })
    }

    /// Channel bandwidth.
    pub fn bandwidth(&self) -> Hz {
        self.bandwidth
    }

    /// Guard interval type.
    pub fn guard_interval(&self) -> GuardInterval {
        self.guard_interval
    }

    /// Modulation and coding scheme index.
    pub fn mcs(&self) -> u32 {
        self.mcs
    }

    /// N_SS
    pub fn spatial_streams(&self) -> usize {
        self.spatial_streams
    }

    /// N_SD
    pub fn data_subcarriers(&self) -> u32 {
        match (self.bandwidth, self.mcs) {
            (MHZ_40, DUPLICATE_MCS) => 48,
            (MHZ_40, _) => 108,
            _ => 52,
        }
    }

    /// N_SP
    pub fn pilot_subcarriers(&self) -> u32 {
        match (self.bandwidth, self.mcs) {
            (MHZ_40, DUPLICATE_MCS) => 4,
            (MHZ_40, _) => 6,
            _ => 4,
        }
    }

    /// Data plus pilot subcarriers.
    pub fn total_subcarriers(&self) -> u32 {
        self.data_subcarriers() + self.pilot_subcarriers()
    }

    /// Symbol interval for this mode's guard interval.
    pub fn symbol_interval(&self) -> Duration {
        self.guard_interval.symbol_interval()
    }

    fn cached_gross_bitrate(&self, coded_bits_per_subcarrier: u32) -> Bps {
        *self.gross_bitrate.get_or_init(|| {
            bitrate(
                coded_bits_per_subcarrier * self.data_subcarriers(),
                self.symbol_interval(),
            )
        })
    }

    fn cached_net_bitrate(&self, coded_bits_per_subcarrier: u32, code: ConvolutionalCode) -> Bps {
        *self.net_bitrate.get_or_init(|| {
            self.cached_gross_bitrate(coded_bits_per_subcarrier) * code.code_rate()
        })
    }
}

/// The HT-SIG field.
#[derive(Clone, Debug)]
pub struct HtSignalMode {
    base: HtModeBase,
    modulation: SubcarrierModulation,
    code: ConvolutionalCode,
}

impl HtSignalMode {
    /// Creates the HT-SIG mode announcing `mcs`.
    pub fn new(mcs: u32, bandwidth: Hz, guard_interval: GuardInterval) -> Result<Self> {
        Ok(Self {
            base: HtModeBase::new(mcs, 1, bandwidth, guard_interval)?,
            modulation: SubcarrierModulation::Bpsk,
            code: ConvolutionalCode::RATE_1_2,
        })
    }

    /// Shared HT parameters.
    pub fn base(&self) -> &HtModeBase {
        &self.base
    }

    /// HT-SIG is BPSK modulated.
    pub fn modulation(&self) -> SubcarrierModulation {
        self.modulation
    }

    /// HT-SIG is rate 1/2 coded.
    pub fn code(&self) -> ConvolutionalCode {
        self.code
    }

    /// STBC is not modelled; the field always announces zero.
    pub fn stbc(&self) -> u32 {
        0
    }

    /// Sum of the HT-SIG sub-field widths.
    pub fn bit_length(&self) -> u32 {
        HT_SIG_FIELDS.iter().map(|(_, bits)| bits).sum()
    }

    /// HT-SIG spans two long guard interval symbols, whatever the base's
    /// guard interval.
    pub fn duration(&self) -> Duration {
        2 * SYMBOL_INTERVAL
    }

    /// Coded bits per symbol over the base's symbol interval.
    ///
    /// Unlike [`duration`](Self::duration) this follows the configured guard
    /// interval, so a short GI signal mode reports the short GI rate.
    pub fn gross_bitrate(&self) -> Bps {
        self.base
            .cached_gross_bitrate(self.modulation.code_word_size())
    }

    /// Gross bitrate scaled by the code rate.
    pub fn net_bitrate(&self) -> Bps {
        self.base
            .cached_net_bitrate(self.modulation.code_word_size(), self.code)
    }
}

/// HT preamble, including the HT-SIG and (mixed format) L-SIG fields.
#[derive(Clone, Debug)]
pub struct HtPreambleMode {
    signal_mode: HtSignalMode,
    legacy_signal_mode: Option<OfdmSignalMode>,
    format: PreambleFormat,
    spatial_streams: usize,
    ht_long_trainings: u32,
}

impl HtPreambleMode {
    /// Creates a preamble training `spatial_streams` streams.
    ///
    /// The mixed format needs the legacy signal mode, the greenfield format
    /// ignores it.
    pub fn new(
        signal_mode: HtSignalMode,
        legacy_signal_mode: Option<OfdmSignalMode>,
        format: PreambleFormat,
        spatial_streams: usize,
    ) -> Result<Self> {
        if !(1..=4).contains(&spatial_streams) {
            return Err(UnsupportedParameter::SpatialStreams(spatial_streams).into());
        }
        if format == PreambleFormat::Mixed && legacy_signal_mode.is_none() {
            return Err(Error::Config(
                "mixed format preamble requires a legacy signal mode".into(),
            ));
        }

        let space_time_streams = spatial_streams as u32 + signal_mode.stbc();
        let ht_long_trainings = long_trainings(space_time_streams);

        Ok(Self {
            signal_mode,
            legacy_signal_mode,
            format,
            spatial_streams,
            ht_long_trainings,
        })
    }

    /// The HT-SIG mode.
    pub fn signal_mode(&self) -> &HtSignalMode {
        &self.signal_mode
    }

    /// The L-SIG mode, if any.
    pub fn legacy_signal_mode(&self) -> Option<&OfdmSignalMode> {
        self.legacy_signal_mode.as_ref()
    }

    /// Mixed or greenfield.
    pub fn format(&self) -> PreambleFormat {
        self.format
    }

    /// Spatial streams the HT-LTFs train.
    pub fn spatial_streams(&self) -> usize {
        self.spatial_streams
    }

    /// N_LTF
    pub fn ht_long_trainings(&self) -> u32 {
        self.ht_long_trainings
    }

    /// GI2
    pub fn double_gi_duration(&self) -> Duration {
        2 * GI_DURATION
    }

    /// L-SIG
    pub fn legacy_signal_duration(&self) -> Duration {
        self.legacy_signal_mode
            .as_ref()
            .map_or(SYMBOL_INTERVAL, OfdmSignalMode::duration)
    }

    /// L-STF
    pub fn non_ht_short_training_duration(&self) -> Duration {
        10 * DFT_PERIOD / 4
    }

    /// HT-GF-STF
    pub fn greenfield_short_training_duration(&self) -> Duration {
        10 * DFT_PERIOD / 4
    }

    /// L-LTF
    pub fn non_ht_long_training_duration(&self) -> Duration {
        2 * DFT_PERIOD + self.double_gi_duration()
    }

    /// HT-STF
    pub fn ht_short_training_duration(&self) -> Duration {
        micros(4)
    }

    /// HT-LTF1
    pub fn first_ht_long_training_duration(&self) -> Duration {
        match self.format {
            PreambleFormat::Mixed => micros(4),
            PreambleFormat::Greenfield => micros(8),
        }
    }

    /// HT-LTFs, s = 2, 3, .., n
    pub fn subsequent_ht_long_training_duration(&self) -> Duration {
        micros(4)
    }

    /// Sum of every field of the preamble, in transmission order.
    pub fn duration(&self) -> Duration {
        let ht_ltfs = self.first_ht_long_training_duration()
            + self.subsequent_ht_long_training_duration() * (self.ht_long_trainings - 1);

        match self.format {
            // L-STF -> L-LTF -> L-SIG -> HT-SIG -> HT-STF -> HT-LTF1 -> .. -> HT-LTFn
            PreambleFormat::Mixed => {
                self.non_ht_short_training_duration()
                    + self.non_ht_long_training_duration()
                    + self.legacy_signal_duration()
                    + self.signal_mode.duration()
                    + self.ht_short_training_duration()
                    + ht_ltfs
            }
            // HT-GF-STF -> HT-LTF1 -> HT-SIG -> HT-LTF2 -> .. -> HT-LTFn
            PreambleFormat::Greenfield => {
                self.greenfield_short_training_duration() + self.signal_mode.duration() + ht_ltfs
            }
        }
    }
}

/// Training symbols equal the space-time streams, except three need four.
fn long_trainings(space_time_streams: u32) -> u32 {
    if space_time_streams == 3 {
        4
    } else {
        space_time_streams
    }
}

/// The HT data field.
#[derive(Clone, Debug)]
pub struct HtDataMode {
    base: HtModeBase,
    code: ConvolutionalCode,
    stream_modulations: [Option<SubcarrierModulation>; 4],
    bcc_encoders: u32,
}

impl HtDataMode {
    /// Creates a data mode; absent spatial streams are `None`.
    pub fn new(
        mcs: u32,
        bcc_encoders: u32,
        code: ConvolutionalCode,
        stream_modulations: [Option<SubcarrierModulation>; 4],
        bandwidth: Hz,
        guard_interval: GuardInterval,
    ) -> Result<Self> {
        let spatial_streams = stream_modulations.iter().flatten().count();
        if spatial_streams == 0 {
            return Err(UnsupportedParameter::SpatialStreams(spatial_streams).into());
        }
        if !(1..=2).contains(&bcc_encoders) {
            return Err(UnsupportedParameter::BccEncoders(bcc_encoders).into());
        }

        Ok(Self {
            base: HtModeBase::new(mcs, spatial_streams, bandwidth, guard_interval)?,
            code,
            stream_modulations,
            bcc_encoders,
        })
    }

    /// Shared HT parameters.
    pub fn base(&self) -> &HtModeBase {
        &self.base
    }

    /// Convolutional code of the data field.
    pub fn code(&self) -> ConvolutionalCode {
        self.code
    }

    /// Modulation of spatial stream `index` (0 based), if present.
    pub fn stream_modulation(&self, index: usize) -> Option<SubcarrierModulation> {
        self.stream_modulations.get(index).copied().flatten()
    }

    /// Modulation of the first present stream.
    pub fn modulation(&self) -> SubcarrierModulation {
        self.stream_modulations
            .iter()
            .flatten()
            .copied()
            .next()
            .unwrap_or(SubcarrierModulation::Bpsk)
    }

    /// SERVICE field width.
    pub fn service_bit_length(&self) -> u32 {
        SERVICE_BITS
    }

    /// Six tail bits per encoder.
    pub fn tail_bit_length(&self) -> u32 {
        TAIL_BITS_PER_ENCODER * self.bcc_encoders
    }

    /// N_ES
    pub fn bcc_encoders(&self) -> u32 {
        self.bcc_encoders
    }

    fn coded_bits_per_subcarrier(&self) -> u32 {
        self.stream_modulations
            .iter()
            .flatten()
            .map(|m| m.code_word_size())
            .sum()
    }

    /// N_CBPS, summed over all spatial streams.
    pub fn coded_bits_per_symbol(&self) -> u32 {
        self.coded_bits_per_subcarrier() * self.base.data_subcarriers()
    }

    /// N_DBPS
    pub fn data_bits_per_symbol(&self) -> u32 {
        self.code.decoded_length(self.coded_bits_per_symbol())
    }

    /// SERVICE + tail + payload, saturating at `u32::MAX`.
    pub fn bit_length(&self, payload_bits: u32) -> u32 {
        (self.service_bit_length() + self.tail_bit_length())
            .saturating_add(payload_bits)
    }

    /// Whole symbols needed for `payload_bits`, times the symbol interval.
    pub fn duration(&self, payload_bits: u32) -> Duration {
        let symbols = symbol_count(self.bit_length(payload_bits), self.data_bits_per_symbol());
        symbols * self.base.symbol_interval()
    }

    /// Coded bits per symbol over the symbol interval.
    pub fn gross_bitrate(&self) -> Bps {
        self.base
            .cached_gross_bitrate(self.coded_bits_per_subcarrier())
    }

    /// Gross bitrate scaled by the code rate.
    pub fn net_bitrate(&self) -> Bps {
        self.base
            .cached_net_bitrate(self.coded_bits_per_subcarrier(), self.code)
    }
}

/// Slot, SIFS and short slot times of one band.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CarrierTiming {
    /// aSlotTime
    pub slot_time: Duration,
    /// aSIFSTime
    pub sifs_time: Duration,
    /// Short slot time, where the band defines one.
    pub short_slot_time: Option<Duration>,
}

const TIMING_2_4_GHZ: CarrierTiming = CarrierTiming {
    slot_time: micros(20),
    sifs_time: micros(10),
    short_slot_time: Some(micros(9)),
};

const TIMING_5_GHZ: CarrierTiming = CarrierTiming {
    slot_time: micros(9),
    sifs_time: micros(16),
    short_slot_time: None,
};

/// Timing constants keyed on the carrier frequency.
pub fn carrier_timing(carrier_frequency: Hz) -> Result<&'static CarrierTiming> {
    match carrier_frequency {
        GHZ_2_4 => Ok(&TIMING_2_4_GHZ),
        GHZ_5 => Ok(&TIMING_5_GHZ),
        other => Err(UnsupportedParameter::CarrierFrequency(other).into()),
    }
}

/// A complete HT mode: preamble, data field and carrier.
#[derive(Clone, Debug)]
pub struct HtMode {
    preamble_mode: HtPreambleMode,
    data_mode: HtDataMode,
    carrier_frequency: Hz,
}

impl HtMode {
    /// Combines a preamble and a data mode on `carrier_frequency`.
    ///
    /// HT-SIG must span the data field's channel and the preamble must train
    /// exactly the data field's spatial streams.
    pub fn new(
        preamble_mode: HtPreambleMode,
        data_mode: HtDataMode,
        carrier_frequency: Hz,
    ) -> Result<Self> {
        let signal_bandwidth = preamble_mode.signal_mode().base().bandwidth();
        let data_bandwidth = data_mode.base().bandwidth();
        if signal_bandwidth != data_bandwidth {
            return Err(Error::Config(format!(
                "HT-SIG spans {signal_bandwidth} Hz, data field spans {data_bandwidth} Hz"
            )));
        }

        let trained_streams = preamble_mode.spatial_streams();
        let data_streams = data_mode.base().spatial_streams();
        if trained_streams != data_streams {
            return Err(Error::Config(format!(
                "preamble trains {trained_streams} streams, data field carries {data_streams}"
            )));
        }

        Ok(Self {
            preamble_mode,
            data_mode,
            carrier_frequency,
        })
    }

    /// Preamble mode.
    pub fn preamble_mode(&self) -> &HtPreambleMode {
        &self.preamble_mode
    }

    /// Data mode.
    pub fn data_mode(&self) -> &HtDataMode {
        &self.data_mode
    }

    /// The header is the HT-SIG field.
    pub fn header_mode(&self) -> &HtSignalMode {
        self.preamble_mode.signal_mode()
    }

    /// The L-SIG mode, if the preamble carries one.
    pub fn legacy_signal_mode(&self) -> Option<&OfdmSignalMode> {
        self.preamble_mode.legacy_signal_mode()
    }

    /// Carrier frequency.
    pub fn carrier_frequency(&self) -> Hz {
        self.carrier_frequency
    }

    /// aSlotTime
    pub fn slot_time(&self) -> Result<Duration> {
        Ok(carrier_timing(self.carrier_frequency)?.slot_time)
    }

    /// aSIFSTime
    pub fn sifs_time(&self) -> Result<Duration> {
        Ok(carrier_timing(self.carrier_frequency)?.sifs_time)
    }

    /// Short slot time; only the 2.4 GHz band defines it.
    pub fn short_slot_time(&self) -> Result<Duration> {
        carrier_timing(self.carrier_frequency)?
            .short_slot_time
            .ok_or_else(|| {
                UnsupportedParameter::ShortSlotTime(self.carrier_frequency).into()
            })
    }

    /// aRIFSTime
    pub fn rifs_time(&self) -> Duration {
        micros(2)
    }

    /// aCCATime, upper bound
    pub fn cca_time(&self) -> Duration {
        micros(4)
    }

    /// aPHY-RX-START-Delay
    pub fn phy_rx_start_delay(&self) -> Duration {
        micros(33)
    }

    /// aRxTxTurnaroundTime, upper bound
    pub fn rx_tx_turnaround_time(&self) -> Duration {
        micros(2)
    }

    /// aPreambleLength
    pub fn preamble_length(&self) -> Duration {
        micros(16)
    }

    /// aPLCPHeaderLength
    pub fn plcp_header_length(&self) -> Duration {
        micros(4)
    }

    /// aCWmin
    pub fn cw_min(&self) -> u32 {
        15
    }

    /// aCWmax
    pub fn cw_max(&self) -> u32 {
        1023
    }

    /// aMPDUMaxLength, in octets
    pub fn mpdu_max_length(&self) -> u32 {
        MPDU_MAX_LENGTH
    }

    /// Preamble plus data field.
    pub fn duration(&self, payload_bits: u32) -> Duration {
        self.preamble_mode.duration() + self.data_mode.duration(payload_bits)
    }
}
