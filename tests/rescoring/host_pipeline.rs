//! Host pipeline: settings -> request -> rescore -> re-sort -> explain

use crate::common::*;
use serde_json::json;
use strata_maxsim::{
    parse_rescore_request, MaxSimRescorer, RescoreError, RescoreSettings, Rescorer,
    SETTINGS_FILE_NAME,
};
use tempfile::TempDir;

fn request(window: u64) -> serde_json::Value {
    json!({
        "window_size": window,
        "maxsim": {
            "query_vectors": [[1.0, 0.0], [0.0, 1.0]],
            "field": FIELD
        }
    })
}

#[test]
fn settings_file_drives_request_defaults() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(SETTINGS_FILE_NAME),
        "window_size = 2\nweight = 0.5\nsimilarity = \"cosine\"\n",
    )
    .unwrap();

    let settings = RescoreSettings::load_or_create(dir.path()).unwrap();
    let config = parse_rescore_request(
        &json!({"maxsim": {"query_vectors": [[1.0, 0.0]], "field": FIELD}}),
        &settings,
    )
    .unwrap();

    assert_eq!(config.window_size(), 2);
    assert_eq!(config.weight(), 0.5);
    assert_eq!(config.similarity(), SimilarityKind::Cosine);
}

#[test]
fn default_settings_file_is_created_once() {
    let dir = TempDir::new().unwrap();
    let first = RescoreSettings::load_or_create(dir.path()).unwrap();
    let written = std::fs::read_to_string(dir.path().join(SETTINGS_FILE_NAME)).unwrap();
    let second = RescoreSettings::load_or_create(dir.path()).unwrap();

    assert_eq!(first, second);
    assert_eq!(written, RescoreSettings::default_toml());
}

#[test]
fn rescore_top_docs_then_caller_resorts() {
    init_tracing();
    // Upstream order 0,1,2,3; late-interaction strength 1,3,2 for the window
    let store = scaled_store(&[1.0, 3.0, 2.0, 10.0]);
    let config = parse_rescore_request(&request(3), &RescoreSettings::default()).unwrap();

    let mut response = top_docs(4, 10.0);
    let stats = MaxSimRescorer
        .rescore_top_docs(&mut response, &config, &store)
        .unwrap();
    assert_eq!(stats.window, 3);

    // Kernel output keeps upstream order
    let docs: Vec<u64> = response.score_docs.iter().map(|sd| sd.doc).collect();
    assert_eq!(docs, vec![0, 1, 2, 3]);
    let scores: Vec<f32> = response.score_docs.iter().map(|sd| sd.score).collect();
    assert_eq!(scores, vec![2.0, 6.0, 4.0, 7.0]);

    // Caller-side re-sort, stable for ties
    response.score_docs.sort_by(|a, b| b.score.total_cmp(&a.score));
    let docs: Vec<u64> = response.score_docs.iter().map(|sd| sd.doc).collect();
    assert_eq!(docs, vec![3, 1, 2, 0]);
}

#[test]
fn explain_every_windowed_hit() {
    let mut store_with_gap = scaled_store(&[1.0, 3.0]);
    store_with_gap.remove(DocId::new(1), FIELD);
    let config = parse_rescore_request(&request(10), &RescoreSettings::default()).unwrap();
    let rescorer: Box<dyn Rescorer> = Box::new(MaxSimRescorer);

    let mut candidates = ranked(2, 5.0);
    rescorer
        .rescore(&mut candidates, &config, &store_with_gap)
        .unwrap();

    for candidate in &candidates {
        let fresh = Candidate::new(candidate.doc_id, candidate.original_score);
        let explanation = rescorer.explain(&fresh, &config, &store_with_gap).unwrap();
        assert_eq!(explanation.final_score, candidate.new_score);
    }

    let missing = rescorer
        .explain(&candidates[1], &config, &store_with_gap)
        .unwrap();
    assert!(!missing.matched);
    assert_eq!(missing.final_score, 4.0);
}

#[test]
fn malformed_request_surfaces_config_error() {
    let settings = RescoreSettings::default();
    let bad = json!({
        "window_size": 5,
        "maxsim": {"query_vectors": [[1.0, 0.0], [1.0]], "field": FIELD}
    });
    let err = parse_rescore_request(&bad, &settings).unwrap_err();
    assert!(err.is_config_error());
    assert!(matches!(err, RescoreError::InvalidConfig { .. }));

    let bad = json!({
        "window_size": 5,
        "maxsim": {"query_vectors": [], "field": FIELD, "similarity": "l2"}
    });
    let err = parse_rescore_request(&bad, &settings).unwrap_err();
    assert!(matches!(err, RescoreError::UnknownSimilarityKind { .. }));
}
