//! Configuration loading tests

use coin_alert::config::{Config, LogFormat};
use std::time::Duration;

#[test]
fn test_config_example_parses() {
    let config: Config = toml::from_str(include_str!("../../config.toml.example")).unwrap();
    config.validate().unwrap();

    assert_eq!(config.server.bind_addr.port(), 8080);
    assert_eq!(config.price.currency_pair, "BTC-USD");
    assert_eq!(config.price.refresh_interval(), Duration::from_secs(5));
    assert_eq!(config.telemetry.log_format, LogFormat::Pretty);
    assert!(config.telemetry.metrics_port.is_none());
}

#[test]
fn test_config_round_trips_through_display() {
    let config = Config::default();
    let rendered = toml::to_string_pretty(&config).unwrap();
    let parsed: Config = toml::from_str(&rendered).unwrap();

    assert_eq!(parsed.server.bind_addr, config.server.bind_addr);
    assert_eq!(parsed.store.key_prefix, config.store.key_prefix);
}
