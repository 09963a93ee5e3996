//! Property tests for environment overrides.

use std::collections::HashMap;

use proptest::prelude::*;

use stylepipe::config::{with_env_overrides, Config};

fn env(pairs: &[(&str, String)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    move |key| map.get(key).cloned()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Browser lists are split on commas, trimmed, and never
    /// contain empty queries.
    #[test]
    fn property_browsers_are_trimmed_and_non_empty(
        queries in proptest::collection::vec("[ a-z0-9.>%]{0,12}", 0..5)
    ) {
        let raw = queries.join(",");
        let config = with_env_overrides(
            Config::default(),
            env(&[("STYLEPIPE_BROWSERS", raw.clone())]),
        );

        let expected: Vec<String> = queries
            .iter()
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .collect();

        if expected.is_empty() {
            prop_assert_eq!(config.prefix.browsers, Config::default().prefix.browsers);
        } else {
            prop_assert_eq!(config.prefix.browsers, expected);
        }
    }

    /// PROPERTY: A bad debounce value never panics and leaves the default.
    #[test]
    fn property_debounce_parse_never_panics(raw in "(?s).{0,24}") {
        let config = with_env_overrides(
            Config::default(),
            env(&[("STYLEPIPE_DEBOUNCE_MS", raw.clone())]),
        );

        match raw.trim().parse::<u64>() {
            Ok(ms) => prop_assert_eq!(config.watch.debounce_ms, ms),
            Err(_) => prop_assert_eq!(config.watch.debounce_ms, Config::default().watch.debounce_ms),
        }
    }
}
