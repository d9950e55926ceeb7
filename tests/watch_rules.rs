// tests/watch_rules.rs

mod common;

use std::collections::BTreeSet;

use common::{init_tracing, test_settings};

use stagehand::watch::RuleSet;
use stagehand::types::AssetClass;

fn names(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn style_path_matches_exactly_the_style_task() {
    init_tracing();

    let rules = RuleSet::from_settings(&test_settings().paths).unwrap();

    let matched = rules.match_path("src/styles/app.scss");
    assert_eq!(matched.tasks, names(&["style"]));
    assert_eq!(matched.classes.into_iter().collect::<Vec<_>>(), vec![AssetClass::Style]);
}

#[test]
fn script_path_matches_exactly_the_script_task() {
    init_tracing();

    let rules = RuleSet::from_settings(&test_settings().paths).unwrap();

    let matched = rules.match_path("src/scripts/app.js");
    assert_eq!(matched.tasks, names(&["script"]));
}

#[test]
fn unrelated_path_matches_nothing() {
    init_tracing();

    let rules = RuleSet::from_settings(&test_settings().paths).unwrap();

    assert!(rules.match_path("README.md").is_empty());
    assert!(rules.match_path("src/styles/app.scss.swp").is_empty());
}

#[test]
fn pages_and_partials_both_map_to_the_template_task() {
    init_tracing();

    let rules = RuleSet::from_settings(&test_settings().paths).unwrap();

    assert_eq!(rules.match_path("src/pages/about.html").tasks, names(&["template"]));
    assert_eq!(rules.match_path("src/partials/nav.html").tasks, names(&["template"]));
    assert_eq!(rules.match_path("src/layouts/default.html").tasks, names(&["template"]));
}

#[test]
fn overlapping_rules_union_their_target_tasks() {
    init_tracing();

    let mut settings = test_settings();
    // A deliberately broad static rule that also covers style sources.
    settings.paths.assets = vec!["src/**/*".to_string()];
    let rules = RuleSet::from_settings(&settings.paths).unwrap();

    let matched = rules.match_path("src/styles/app.scss");
    assert_eq!(matched.tasks, names(&["copy", "style"]));
    assert!(matched.classes.contains(&AssetClass::Static));
    assert!(matched.classes.contains(&AssetClass::Style));
}

#[test]
fn empty_asset_patterns_produce_no_static_rule() {
    init_tracing();

    let mut settings = test_settings();
    settings.paths.assets.clear();
    let rules = RuleSet::from_settings(&settings.paths).unwrap();

    assert_eq!(rules.rules().len(), 3);
    assert!(rules.match_path("src/assets/logo.svg").is_empty());
}

#[test]
fn invalid_glob_is_a_config_error() {
    init_tracing();

    let mut settings = test_settings();
    settings.paths.styles = vec!["src/styles/[".to_string()];
    let err = RuleSet::from_settings(&settings.paths).unwrap_err();
    assert!(matches!(err, stagehand::errors::StagehandError::Config(_)));
}
