//! Integration tests for `FLAG[N]` token handling on the thread-local
//! configuration.

use logging::{
    DebugFlag, InfoFlag, VerbosityConfig, apply_debug_flag, apply_info_flag, current_config,
    debug_gte, info_gte, init,
};

#[test]
fn tokens_refine_verbose_level() {
    init(VerbosityConfig::from_verbose_level(1));
    assert!(!debug_gte(DebugFlag::Filter, 1));

    apply_debug_flag("filter2").unwrap();
    apply_info_flag("scan").unwrap();

    assert!(debug_gte(DebugFlag::Filter, 2));
    assert!(info_gte(InfoFlag::Scan, 1));
    assert!(info_gte(InfoFlag::Rules, 1));
}

#[test]
fn zero_level_disables_flag() {
    init(VerbosityConfig::from_verbose_level(2));
    assert!(info_gte(InfoFlag::Skip, 2));

    apply_info_flag("skip0").unwrap();

    assert!(!info_gte(InfoFlag::Skip, 1));
    assert_eq!(current_config().info.skip, 0);
}

#[test]
fn unknown_tokens_leave_config_untouched() {
    init(VerbosityConfig::default());

    let err = apply_debug_flag("recv").unwrap_err();
    assert!(err.contains("recv"));
    assert!(apply_info_flag("").is_err());
    assert_eq!(current_config(), VerbosityConfig::default());
}

#[cfg(feature = "serde")]
#[test]
fn config_serializes_as_flag_map() {
    let config = VerbosityConfig::from_verbose_level(2);
    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(json["info"]["skip"], 2);
    assert_eq!(json["debug"]["dup"], 1);

    let back: VerbosityConfig = serde_json::from_value(json).unwrap();
    assert_eq!(back, config);
}
