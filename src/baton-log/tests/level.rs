use std::str::FromStr;

use baton_log::Level;

#[test]
fn ordering_runs_from_fatal_to_debug() {
    assert!(Level::Fatal < Level::Error);
    assert!(Level::Error < Level::Warn);
    assert!(Level::Warn < Level::Info);
    assert!(Level::Info < Level::Debug);
}

#[test]
fn parses_tags_case_insensitively() {
    assert_eq!(Level::from_str("warn").unwrap(), Level::Warn);
    assert_eq!(Level::from_str("FATAL").unwrap(), Level::Fatal);
    assert_eq!("Info".parse::<Level>().unwrap(), Level::Info);
    assert!("verbose".parse::<Level>().is_err());
}

#[test]
fn display_matches_the_record_tag() {
    for level in Level::ALL {
        assert_eq!(level.to_string(), level.as_str());
    }
}

#[test]
fn converts_between_facade_levels() {
    assert_eq!(Level::from(log::Level::Error), Level::Error);
    assert_eq!(Level::from(log::Level::Trace), Level::Debug);

    assert_eq!(log::Level::from(Level::Fatal), log::Level::Error);
    assert_eq!(log::Level::from(Level::Warn), log::Level::Warn);

    assert_eq!(Level::Fatal.to_level_filter(), log::LevelFilter::Off);
    assert_eq!(Level::Info.to_level_filter(), log::LevelFilter::Info);
    assert_eq!(Level::Debug.to_level_filter(), log::LevelFilter::Trace);
}
