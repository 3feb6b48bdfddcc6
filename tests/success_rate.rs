use rand::{Rng, SeedableRng, rngs::StdRng};

use wifi_phy_model::{
    ConvolutionalCode, ErrorModel, Mode, NistErrorModel, SubcarrierModulation, YansErrorModel,
    common::*,
    mode::{
        dsss::{DsssMode, HrDsssMode, PreambleType, RATE_1_MBPS, RATE_5_5_MBPS, RATE_11_MBPS},
        ht::{GuardInterval, HtDataMode, HtMode, HtPreambleMode, HtSignalMode, PreambleFormat},
        ofdm::{OfdmMode, OfdmSignalMode},
    },
};

fn ht_mode(
    modulation: SubcarrierModulation,
    code: ConvolutionalCode,
    streams: usize,
    bandwidth: Hz,
) -> Mode {
    let gi = GuardInterval::Long;
    let mut stream_modulations = [None; 4];
    stream_modulations[..streams].fill(Some(modulation));

    let signal = HtSignalMode::new(0, bandwidth, gi).unwrap();
    let legacy = OfdmSignalMode::new(MHZ_20).unwrap();
    let preamble =
        HtPreambleMode::new(signal, Some(legacy), PreambleFormat::Mixed, streams).unwrap();
    let data = HtDataMode::new(0, 1, code, stream_modulations, bandwidth, gi).unwrap();

    HtMode::new(preamble, data, GHZ_2_4).unwrap().into()
}

fn all_modes() -> Vec<Mode> {
    use ConvolutionalCode as C;
    use SubcarrierModulation::*;

    vec![
        DsssMode::new(RATE_1_MBPS).unwrap().into(),
        DsssMode::new(2e6).unwrap().into(),
        HrDsssMode::new(RATE_5_5_MBPS, PreambleType::Long).unwrap().into(),
        HrDsssMode::new(RATE_11_MBPS, PreambleType::Short).unwrap().into(),
        OfdmMode::new(Bpsk, C::RATE_1_2, MHZ_20).unwrap().into(),
        OfdmMode::new(Bpsk, C::RATE_3_4, MHZ_10).unwrap().into(),
        OfdmMode::new(Qpsk, C::RATE_3_4, MHZ_20).unwrap().into(),
        OfdmMode::new(Qam16, C::RATE_1_2, MHZ_5).unwrap().into(),
        OfdmMode::new(Qam64, C::RATE_2_3, MHZ_20).unwrap().into(),
        OfdmMode::new(Qam64, C::RATE_3_4, MHZ_20).unwrap().into(),
        ht_mode(Bpsk, C::RATE_1_2, 1, MHZ_20),
        ht_mode(Qam16, C::RATE_3_4, 2, MHZ_20),
        ht_mode(Qam64, C::RATE_5_6, 1, MHZ_40),
        ht_mode(Qam64, C::RATE_2_3, 3, MHZ_40),
    ]
}

fn models() -> [&'static dyn ErrorModel; 2] {
    [&YansErrorModel, &NistErrorModel]
}

#[test_log::test]
fn test_success_rate_is_a_probability() {
    let mut rng = StdRng::seed_from_u64(1);

    for model in models() {
        for mode in all_modes() {
            for _ in 0..200 {
                let snr = 10.0_f64.powf(rng.random_range(-3.0..4.0));
                let payload = rng.random_range(0..20_000);
                let header_bits = mode.header_bit_length();
                let payload_bits = mode.data_bit_length(payload);
                let rate = model.success_rate(&mode, header_bits, payload_bits, snr).unwrap();
                assert!((0.0..=1.0).contains(&rate), "{mode:?} at {snr}: {rate}");
            }
        }
    }
}

#[test_log::test]
fn test_monotonic_in_snr() {
    for model in models() {
        for mode in all_modes() {
            let mut previous = 0.0;
            for step in 0..=160 {
                let snr = db_to_linear(-10.0 + step as f64 * 0.25);
                let rate = model.success_rate(&mode, mode.header_bit_length(), 8000, snr).unwrap();
                assert!(rate >= previous - 1e-12, "{mode:?} at {snr}");
                previous = rate;
            }
        }
    }
}

#[test_log::test]
fn test_monotonic_in_bit_length() {
    let mut rng = StdRng::seed_from_u64(2);

    for model in models() {
        for mode in all_modes() {
            let snr = db_to_linear(rng.random_range(0.0..25.0));
            let mut previous = 1.0;
            for payload in (0..40_000).step_by(1000) {
                let header_bits = mode.header_bit_length();
                let rate = model.success_rate(&mode, header_bits, payload, snr).unwrap();
                assert!(rate <= previous + 1e-12, "{mode:?} at {payload} bits");
                previous = rate;
            }
        }
    }
}

#[test_log::test]
fn test_lossless_at_high_snr() {
    for model in models() {
        for mode in all_modes() {
            let rate = model.success_rate(&mode, mode.header_bit_length(), 1_000_000, 1e7).unwrap();
            assert_eq!(rate, 1.0, "{mode:?}");
        }
    }
}

#[test_log::test]
fn test_header_only_frame() {
    let code = ConvolutionalCode::RATE_5_6;
    let mode = ht_mode(SubcarrierModulation::Qam64, code, 1, MHZ_20);
    let snr = db_to_linear(6.0);

    let header_only = YansErrorModel.success_rate(&mode, 48, 0, snr).unwrap();
    let header = YansErrorModel
        .chunk_success_rate(&mode.header_chunk(), 48, snr)
        .unwrap();
    assert_eq!(header_only, header);
}

#[test_log::test]
fn test_ht_frame_timing() {
    let code = ConvolutionalCode::RATE_1_2;
    let mode = ht_mode(SubcarrierModulation::Bpsk, code, 1, MHZ_20);

    // 36 us mixed preamble + ceil((16 + 6 + 8) / 26) symbols
    assert_eq!(mode.duration(8), micros(36) + 2 * micros(4));
    assert_eq!(mode.slot_time(), Ok(micros(20)));
    assert_eq!(mode.sifs_time(), Ok(micros(10)));
}
