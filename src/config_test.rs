use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn empty_lookup_yields_defaults() {
    let cfg = AppConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(cfg, AppConfig::default());
    assert_eq!(cfg.port, 3001);
    assert_eq!(cfg.bind_addr, DEFAULT_BIND_ADDR);
    assert_eq!(cfg.reveal.thinking_delay, Duration::from_millis(800));
    assert_eq!(cfg.reveal.reply_delay, Duration::from_millis(1500));
    assert_eq!(cfg.reveal.tick, Duration::from_millis(30));
    assert_eq!(cfg.reveal.settle_delay, Duration::from_millis(500));
    assert_eq!(cfg.reveal.cleanup_delay, Duration::from_millis(100));
}

#[test]
fn overrides_are_parsed() {
    let cfg = AppConfig::from_lookup(lookup_from(&[
        ("PORT", "8080"),
        ("BIND_ADDR", "0.0.0.0"),
        ("FINCHAT_SIDEBAR_WIDTH", "320.5"),
        ("FINCHAT_REVEAL_TICK_MS", " 10 "),
        ("FINCHAT_THINKING_DELAY_MS", "0"),
    ]))
    .unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0");
    assert!((cfg.sidebar.width - 320.5).abs() < f64::EPSILON);
    assert_eq!(cfg.reveal.tick, Duration::from_millis(10));
    assert_eq!(cfg.reveal.thinking_delay, Duration::ZERO);
}

#[test]
fn malformed_port_is_rejected() {
    let err = AppConfig::from_lookup(lookup_from(&[("PORT", "not-a-port")])).unwrap_err();
    assert_eq!(err, ConfigError::Invalid { var: "PORT", value: "not-a-port".into() });
}

#[test]
fn non_positive_sidebar_width_is_rejected() {
    let err = AppConfig::from_lookup(lookup_from(&[("FINCHAT_SIDEBAR_WIDTH", "-5")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "FINCHAT_SIDEBAR_WIDTH", .. }));
}

#[test]
fn zero_reveal_tick_is_rejected() {
    let err = AppConfig::from_lookup(lookup_from(&[("FINCHAT_REVEAL_TICK_MS", "0")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "FINCHAT_REVEAL_TICK_MS", .. }));
}
