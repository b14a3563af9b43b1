// Host-side tests for session configuration and the frame clock.

use std::sync::Arc;
use std::time::Duration;

use deriva_core::constants::*;
use deriva_core::*;

#[test]
fn defaults_validate_and_match_game_tuning() {
    let config = SessionConfig::default();
    config.validate().unwrap();
    assert_eq!(
        config.reducer,
        ReducerConfig::WeightedBand {
            bins: 512,
            band: 6
        }
    );
    assert_eq!(config.smoothing_rate, 1.0);
    let channels: Vec<ChannelId> = config.channels.iter().map(|c| c.channel).collect();
    assert_eq!(channels, [ChannelId::NEAR, ChannelId::FAR]);
}

#[test]
fn strategy_names_parse() {
    let cases = [
        ("weighted", 512),
        ("Weighted-Band", 512),
        ("regression", 512),
        (" regression-slope ", 512),
        ("onset", 64),
        ("onset-threshold", 64),
    ];
    for (name, bins) in cases {
        let r: ReducerConfig = name.parse().unwrap();
        assert_eq!(r.bins(), bins, "{name}");
        r.build().unwrap();
    }
    assert_eq!(
        "loudness".parse::<ReducerConfig>().unwrap_err(),
        ConfigError::UnknownReducer("loudness".into())
    );
}

#[test]
fn invalid_reducer_parameters_are_rejected() {
    let band = SessionConfig::default().with_reducer(ReducerConfig::WeightedBand {
        bins: 64,
        band: 6,
    });
    assert!(matches!(
        band.validate(),
        Err(ConfigError::BandOutOfRange { band: 6, .. })
    ));

    let onset = SessionConfig::default().with_reducer(ReducerConfig::OnsetThreshold(OnsetParams {
        subbands: 3,
        ..OnsetParams::default()
    }));
    assert!(matches!(
        onset.validate(),
        Err(ConfigError::UnevenSubbands { .. })
    ));
}

#[test]
fn smoothing_rate_must_be_positive_and_finite() {
    for rate in [0.0, -1.0, f32::NAN, f32::INFINITY] {
        let config = SessionConfig::default().with_smoothing_rate(rate);
        assert!(config.validate().is_err(), "rate {rate}");
    }
}

#[test]
fn channels_must_be_present_and_unique() {
    let mut config = SessionConfig::default();
    config.channels.clear();
    assert_eq!(config.validate(), Err(ConfigError::NoChannels));

    let mut config = SessionConfig::default();
    let dup = config.channels[0].clone();
    config.channels.push(dup);
    assert_eq!(config.validate(), Err(ConfigError::DuplicateChannel(0)));
}

#[test]
fn ramp_palettes_are_checked() {
    let mut config = SessionConfig::default();
    config.channels[1].palette = PaletteConfig::Ramp(vec![
        ControlPoint::new(0.0, Rgb::BLACK),
        ControlPoint::new(0.0, Rgb::WHITE),
    ]);
    assert_eq!(
        config.validate(),
        Err(ConfigError::Palette(InterpolationError::DuplicateAbscissa {
            x: 0.0
        }))
    );

    let shared = Arc::new(
        ColorInterpolator::build(&[
            ControlPoint::new(0.0, FAR_LOW_COLOR),
            ControlPoint::new(0.5, Rgb::new(0.5, 0.2, 0.6)),
            ControlPoint::new(1.0, FAR_HIGH_COLOR),
        ])
        .unwrap(),
    );
    for c in config.channels.iter_mut() {
        c.palette = PaletteConfig::Shared(Arc::clone(&shared));
    }
    config.validate().unwrap();
    let session = AnalysisSession::from_config(&config).unwrap();
    assert!(matches!(
        session.smoother(ChannelId::FAR).unwrap().target(),
        ColorTarget::Ramp(_)
    ));
}

#[test]
fn default_palettes_are_displayable() {
    for c in [NEAR_LOW_COLOR, NEAR_HIGH_COLOR, FAR_LOW_COLOR, FAR_HIGH_COLOR] {
        for v in c.to_array() {
            assert!((0.0..=1.0).contains(&v));
        }
    }
    assert_eq!(NEAR_HIGH_COLOR.to_hex(), "#ffffff");
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn analysis_constants_are_consistent() {
    assert_eq!(ONSET_BINS % ONSET_SUBBANDS, 0);
    assert!(ONSET_WINDOW > 0);
    assert!(ONSET_MULTIPLIER > 1.0);
    // band 6 must fit the weighted spectrum
    assert!((1usize << (DEFAULT_BAND + 2)) - 2 <= WEIGHTED_BAND_BINS);
    assert!(REGRESSION_BINS >= 3);
    assert!(SCALAR_RATE_BOOST > 1.0);
    assert!(MAX_FRAME_DT_SEC > 0.0);
}

#[test]
fn frame_clock_starts_at_zero_and_clamps() {
    let mut clock = FrameClock::with_max_step(0.001);
    assert_eq!(clock.tick(), 0.0);
    std::thread::sleep(Duration::from_millis(5));
    assert_eq!(clock.tick(), 0.001);

    clock.reset();
    assert_eq!(clock.tick(), 0.0);

    let mut clock = FrameClock::new();
    clock.tick();
    std::thread::sleep(Duration::from_millis(2));
    let dt = clock.tick();
    assert!(dt > 0.0 && dt <= MAX_FRAME_DT_SEC);
}
