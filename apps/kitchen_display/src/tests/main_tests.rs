use super::{Args, Settings};

use clap::Parser;
use client_core::Locale;
use shared::domain::{Filter, OrderStatus};

#[test]
fn cli_flags_override_loaded_settings() {
    let args = Args::parse_from([
        "kitchen_display",
        "--server-url",
        "http://10.0.0.5:5000",
        "--filter",
        "pending",
        "--locale",
        "en",
        "--assume-yes",
    ]);
    let settings = args.apply(Settings {
        reload_interval_secs: 12,
        ..Settings::default()
    });

    assert_eq!(settings.server_url, "http://10.0.0.5:5000");
    assert_eq!(settings.filter, Filter::Only(OrderStatus::Pending));
    assert_eq!(settings.locale, Locale::En);
    assert!(settings.assume_yes);
    assert_eq!(settings.reload_interval_secs, 12);
}

#[test]
fn absent_flags_keep_loaded_settings() {
    let args = Args::parse_from(["kitchen_display"]);
    let loaded = Settings {
        server_url: "http://from-file:1".into(),
        assume_yes: true,
        ..Settings::default()
    };
    assert_eq!(args.apply(loaded.clone()), loaded);
}

#[test]
fn rejects_unknown_filter() {
    assert!(Args::try_parse_from(["kitchen_display", "--filter", "burnt"]).is_err());
}
