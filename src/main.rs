use clap::{Parser, ValueEnum};
use dotenvy::dotenv;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wifi_phy_model::{
    ConvolutionalCode, Error, ErrorModelKind, Mode, Result, SubcarrierModulation,
    UnsupportedParameter,
    common::{Hz, MHZ_20, payload_bits},
    mode::{
        dsss::{DsssMode, HrDsssMode, PreambleType},
        ht::{GuardInterval, HtDataMode, HtMode, HtPreambleMode, HtSignalMode, PreambleFormat},
        ofdm::{OfdmMode, OfdmSignalMode},
    },
    sweep::{SnrGrid, sweep_success_rates, threshold_snr_db},
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Phy {
    Dsss,
    HrDsss,
    Ofdm,
    Ht,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Gi {
    Short,
    Long,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Preamble {
    Mixed,
    Greenfield,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Model {
    Yans,
    Nist,
}

/// Chunk success rate of an 802.11 PHY mode over an SNR sweep
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// PHY family
    #[arg(long, value_enum, default_value_t = Phy::Ht)]
    phy: Phy,

    /// Subcarrier modulation (OFDM / HT)
    #[arg(long, default_value = "qam16")]
    modulation: SubcarrierModulation,

    /// Code rate as k/n (OFDM / HT)
    #[arg(long, default_value = "3/4")]
    code_rate: ConvolutionalCode,

    /// MCS index announced in HT-SIG
    #[arg(long, default_value_t = 4)]
    mcs: u32,

    /// Spatial streams (HT)
    #[arg(long, default_value_t = 1)]
    streams: usize,

    /// Channel bandwidth in MHz
    #[arg(long, default_value_t = 20)]
    bandwidth_mhz: u64,

    /// Guard interval (HT)
    #[arg(long, value_enum, default_value_t = Gi::Long)]
    guard_interval: Gi,

    /// Preamble format (HT)
    #[arg(long, value_enum, default_value_t = Preamble::Mixed)]
    preamble: Preamble,

    /// Carrier frequency in GHz (HT), 2.4 or 5
    #[arg(long, default_value_t = 5.0)]
    carrier_ghz: f64,

    /// Data rate in Mbit/s (DSSS / HR-DSSS)
    #[arg(long, default_value_t = 11.0)]
    dsss_rate_mbps: f64,

    /// Use the short PLCP preamble (HR-DSSS)
    #[arg(long)]
    short_preamble: bool,

    /// Error model
    #[arg(long, value_enum, default_value_t = Model::Yans)]
    error_model: Model,

    /// Payload length in bytes
    #[arg(long, default_value_t = 1500)]
    payload_bytes: u32,

    /// Lowest SNR in dB
    #[arg(long, default_value_t = -5.0, allow_hyphen_values = true)]
    snr_min_db: f64,

    /// Highest SNR in dB
    #[arg(long, default_value_t = 35.0, allow_hyphen_values = true)]
    snr_max_db: f64,

    /// SNR step in dB
    #[arg(long, default_value_t = 1.0)]
    snr_step_db: f64,
}

fn build_ht_mode(args: &Args, bandwidth: Hz) -> Result<Mode> {
    if !(1..=4).contains(&args.streams) {
        return Err(UnsupportedParameter::SpatialStreams(args.streams).into());
    }

    let guard_interval = match args.guard_interval {
        Gi::Short => GuardInterval::Short,
        Gi::Long => GuardInterval::Long,
    };
    let format = match args.preamble {
        Preamble::Mixed => PreambleFormat::Mixed,
        Preamble::Greenfield => PreambleFormat::Greenfield,
    };
    let carrier_frequency = (args.carrier_ghz * 1e9).round() as Hz;

    let mut streams = [None; 4];
    streams[..args.streams].fill(Some(args.modulation));

    let signal_mode = HtSignalMode::new(args.mcs, bandwidth, guard_interval)?;
    let legacy_signal_mode = OfdmSignalMode::new(MHZ_20)?;
    let preamble_mode =
        HtPreambleMode::new(signal_mode, Some(legacy_signal_mode), format, args.streams)?;
    let data_mode = HtDataMode::new(
        args.mcs,
        1,
        args.code_rate,
        streams,
        bandwidth,
        guard_interval,
    )?;

    let mode = HtMode::new(preamble_mode, data_mode, carrier_frequency)?;
    Ok(mode.into())
}

fn build_mode(args: &Args) -> Result<Mode> {
    let bandwidth = args.bandwidth_mhz * 1_000_000;
    let dsss_rate = args.dsss_rate_mbps * 1e6;

    Ok(match args.phy {
        Phy::Dsss => DsssMode::new(dsss_rate)?.into(),
        Phy::HrDsss => {
            let preamble_type = if args.short_preamble {
                PreambleType::Short
            } else {
                PreambleType::Long
            };
            HrDsssMode::new(dsss_rate, preamble_type)?.into()
        }
        Phy::Ofdm => OfdmMode::new(args.modulation, args.code_rate, bandwidth)?.into(),
        Phy::Ht => build_ht_mode(args, bandwidth)?,
    })
}

fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=error", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let mode = build_mode(&args)?;
    let model = match args.error_model {
        Model::Yans => ErrorModelKind::Yans,
        Model::Nist => ErrorModelKind::Nist,
    };

    let payload_bits = payload_bits(args.payload_bytes)?;
    let header_bit_length = mode.header_bit_length();
    let payload_bit_length = mode.data_bit_length(payload_bits);
    let grid = SnrGrid::new(args.snr_min_db, args.snr_max_db, args.snr_step_db)?;
    info!(?mode, header_bit_length, payload_bit_length, "Sweeping");

    let progress = ProgressBar::new(grid.len() as u64).with_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} SNR points")
            .map_err(|e| Error::Config(e.to_string()))?,
    );
    let points = sweep_success_rates(
        &model,
        &mode,
        header_bit_length,
        payload_bit_length,
        &grid,
        Some(&progress),
    )?;
    progress.finish_and_clear();

    println!("frame duration: {:?}", mode.duration(payload_bits));
    if let (Ok(slot), Ok(sifs)) = (mode.slot_time(), mode.sifs_time()) {
        println!("slot time: {slot:?}, SIFS: {sifs:?}");
    }
    println!("{:>8} {:>14}", "SNR dB", "success rate");
    for point in &points {
        println!("{:>8.2} {:>14.6e}", point.snr_db, point.success_rate);
    }
    if let Some(threshold) = threshold_snr_db(&points, 0.9) {
        println!("90% success at {threshold:.2} dB");
    }

    Ok(())
}
