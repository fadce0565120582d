//! Link configuration validation tests

use rf_joystick_link::config::{
    ConfigError, Debounce, LinkConfig, SamplerConfig, SchedulerConfig, SupervisorConfig,
};
use rf_joystick_link::frame::FrameCodec;
use rf_joystick_link::LinkReceiver;

fn with_timing(interval_ms: u32, timeout_ms: u32) -> LinkConfig {
    LinkConfig {
        scheduler: SchedulerConfig { keepalive_interval_ms: interval_ms },
        supervisor: SupervisorConfig { timeout_ms },
        ..LinkConfig::default()
    }
}

#[test]
fn test_zero_interval_rejected() {
    assert_eq!(with_timing(0, 3_000).validate(), Err(ConfigError::ZeroKeepaliveInterval));
}

#[test]
fn test_timeout_margin() {
    // Exactly 1.5x is accepted
    assert_eq!(with_timing(2_000, 3_000).validate(), Ok(()));
    assert_eq!(
        with_timing(2_000, 2_999).validate(),
        Err(ConfigError::TimeoutTooShort { timeout_ms: 2_999, interval_ms: 2_000 })
    );
    // Timeout equal to interval would flap on every jittered keepalive
    assert!(with_timing(1_000, 1_000).validate().is_err());
}

#[test]
fn test_sampler_limits() {
    let mut config = LinkConfig::default();
    config.sampler.averaging = 0;
    assert_eq!(config.validate(), Err(ConfigError::AveragingOutOfRange(0)));

    config.sampler.averaging = 17;
    assert_eq!(config.validate(), Err(ConfigError::AveragingOutOfRange(17)));

    config.sampler = SamplerConfig::with_smoothing(1024);
    assert_eq!(config.validate(), Err(ConfigError::SmoothingOutOfRange(1024)));

    config.sampler = SamplerConfig {
        debounce: Debounce::StableTicks(0),
        ..SamplerConfig::default()
    };
    assert_eq!(config.validate(), Err(ConfigError::ZeroDebounceTicks));
}

#[test]
fn test_preamble_collision() {
    let config = LinkConfig {
        keepalive_preamble: 0xAA,
        ..LinkConfig::default()
    };
    assert_eq!(config.validate(), Err(ConfigError::PreambleCollision(0xAA)));
}

#[test]
fn test_custom_preamble_reaches_codec() {
    let config = LinkConfig { keepalive_preamble: 0xC3, ..LinkConfig::default() };
    assert_eq!(config.validate(), Ok(()));

    let rx = LinkReceiver::from_config(&config);
    assert_eq!(*rx.codec(), FrameCodec::new(0xC3));
    assert!(rx.codec().is_known_preamble(0xC3));
    assert!(!rx.codec().is_known_preamble(0xE0));
}

#[test]
fn test_error_messages() {
    assert_eq!(
        ConfigError::TimeoutTooShort { timeout_ms: 1_000, interval_ms: 2_000 }.to_string(),
        "link timeout 1000 ms must be at least 1.5x the keepalive interval 2000 ms"
    );
    assert_eq!(
        ConfigError::PreambleCollision(0xAA).to_string(),
        "keepalive preamble 0xaa collides with the status preamble"
    );
}
