//! Integration tests for sift-query.
//!
//! Tests the full path from query text to compiled match-terms:
//! parse -> compile -> inspect the collection.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use sift_config::Config;
use sift_matching::{EntryStatistics, MatchingQueryTerms};
use sift_query::{CompileOptions, parse};
use sift_terms::{TermPipeline, build_pipeline};

/// Parses and compiles `input` with default options.
fn compile(input: &str) -> MatchingQueryTerms {
    let query = parse(input).unwrap();
    let mut terms = MatchingQueryTerms::new();
    query.compile(&mut terms);
    terms
}

/// Weights of the compiled operators, in order.
fn weights(terms: &MatchingQueryTerms) -> Vec<f64> {
    terms.iter().map(|t| t.properties.weight).collect()
}

#[test]
fn test_empty_collection() {
    let terms = MatchingQueryTerms::new();
    assert_eq!(terms.len(), 0);
    assert!(terms.matching_terms().is_empty());
    assert!(compile("").is_empty());
}

#[test]
fn test_single_term() {
    let terms = compile("term1");
    assert_eq!(terms.len(), 1);
    assert_eq!(terms.keys(), vec!["term1"]);
    assert_eq!(terms.term_weight("term1"), Some(1.0));
    assert!(terms.statistics("term1").is_none());
}

#[test]
fn test_two_terms_keep_order() {
    let terms = compile("zebra crossing");
    assert_eq!(terms.keys(), vec!["zebra", "crossing"]);
    assert_eq!(weights(&terms), vec![1.0, 1.0]);
}

#[test]
fn test_identical_terms_merge() {
    let terms = compile("zebra zebra");
    assert_eq!(terms.len(), 1);
    assert_eq!(terms.term_weight("zebra"), Some(2.0));
}

#[test]
fn test_weighted_terms_merge() {
    let terms = compile("zebra^0.1 zebra^0.2");
    assert_eq!(terms.len(), 1);
    let weight = terms.term_weight("zebra").unwrap();
    assert!((weight - 0.3).abs() < 0.001, "weight was {weight}");
}

#[test]
fn test_field_term_does_not_merge() {
    let terms = compile("zebra field:zebra");
    assert_eq!(terms.len(), 2);
    assert_eq!(terms.keys(), vec!["zebra", "field:zebra"]);
}

#[test]
fn test_synonym_canonical_text() {
    let terms = compile("{term1 term2}");
    assert_eq!(terms.len(), 1);
    assert_eq!(terms.keys(), vec!["#syn(term1 term2)"]);
}

#[test]
fn test_weighted_two_terms() {
    let terms = compile("zebra^0.5 crossing^1.0");
    assert_eq!(terms.keys(), vec!["zebra", "crossing"]);
    assert_eq!(weights(&terms), vec![0.5, 1.0]);
}

#[test]
fn test_statistics_round_trip() {
    let mut terms = compile("t1 t2");
    assert!(terms.statistics("t1").is_none());
    assert!(terms.statistics("t2").is_none());

    assert!(terms.set_statistics("t1", EntryStatistics::new(2, 1, 100)));
    assert!(terms.set_statistics("t2", EntryStatistics::new(40, 100, 102)));

    let first = terms.statistics("t1").unwrap();
    assert_eq!(
        (first.term_id, first.document_frequency, first.frequency),
        (2, 1, 100)
    );
    let second = terms.statistics("t2").unwrap();
    assert_eq!(
        (second.term_id, second.document_frequency, second.frequency),
        (40, 100, 102)
    );
}

#[test]
fn test_first_required_flag_wins() {
    let terms = compile("+zebra zebra -zebra");
    assert_eq!(terms.len(), 1);
    let term = terms.get("zebra").unwrap();
    assert_eq!(term.properties.required, Some(true));
    assert_eq!(term.properties.weight, 3.0);

    let terms = compile("zebra +zebra");
    assert_eq!(terms.get("zebra").unwrap().properties.required, None);
}

#[test]
fn test_phrase_and_window_operators() {
    let terms = compile("\"zebra crossing\" \"zebra crossing\"~8 title:\"zebra crossing\"");
    assert_eq!(
        terms.keys(),
        vec![
            "#1(zebra crossing)",
            "#uw8(zebra crossing)",
            "title:#1(zebra crossing)"
        ]
    );
}

#[test]
fn test_compile_options_apply_to_every_clause() {
    let query = parse("Zebra^2 +crossing body:stripes").unwrap();
    let mut terms = MatchingQueryTerms::new();
    let options = CompileOptions::default()
        .field("title")
        .required(false)
        .weight(0.5);
    query.compile_with(&mut terms, &options);

    assert_eq!(terms.keys(), vec!["title:zebra", "title:crossing", "body:stripes"]);
    assert_eq!(weights(&terms), vec![1.0, 0.5, 0.5]);
    assert!(terms.iter().all(|t| t.properties.required == Some(false)));
}

#[test]
fn test_compile_into_existing_collection() {
    let mut terms = compile("zebra");
    parse("zebra crossing").unwrap().compile(&mut terms);
    assert_eq!(terms.keys(), vec!["zebra", "crossing"]);
    assert_eq!(terms.term_weight("zebra"), Some(2.0));
}

#[test]
fn test_default_config_matches_default_pipeline() {
    let config = Config::default();
    let configured = build_pipeline(&config.pipeline.stages).unwrap();
    assert_eq!(configured.stage_names(), TermPipeline::default().stage_names());
    assert_eq!(config.pipeline.max_term_length, sift_terms::DEFAULT_MAX_TERM_LENGTH);
    assert_eq!(sift_config::DEFAULT_MAX_TERM_LENGTH, sift_terms::DEFAULT_MAX_TERM_LENGTH);
}
