//! Parallel rescoring over disjoint shard lists

use crate::common::*;
use std::sync::Arc;
use std::thread;
use strata_maxsim::{rescore, MaxSimRescorer, RescoreStats, VectorLookup};

#[test]
fn shards_match_sequential_rescoring() {
    init_tracing();
    let scales: Vec<f32> = (0..64).map(|i| 0.5 + (i % 7) as f32).collect();
    let store = scaled_store(&scales);
    let config = RescoreConfig::builder(identity_query(), FIELD)
        .with_weight(0.25)
        .with_window_size(8)
        .build()
        .unwrap();

    let mut parallel: Vec<Vec<Candidate>> = (0..8)
        .map(|s| {
            (0..8u64)
                .map(|i| {
                    Candidate::new(DocId::new(s * 8 + i), 20.0 - i as f32).with_shard(s as u32)
                })
                .collect()
        })
        .collect();
    let mut sequential = parallel.clone();

    let results = MaxSimRescorer.rescore_shards(&mut parallel, &config, &store);
    for shard in &mut sequential {
        rescore(shard, &config, &store).unwrap();
    }

    assert!(results.iter().all(|r| matches!(
        r,
        Ok(RescoreStats {
            window: 8,
            rescored: 8,
            skipped: 0
        })
    )));
    assert_eq!(parallel, sequential);
}

#[test]
fn concurrent_calls_share_one_lookup() {
    let store: Arc<dyn VectorLookup> = Arc::new(scaled_store(&[1.0, 2.0, 3.0, 4.0]));
    let config = Arc::new(RescoreConfig::new(identity_query(), FIELD).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            let config = Arc::clone(&config);
            thread::spawn(move || {
                let mut list = ranked(4, 9.0);
                rescore(&mut list, &config, &store).unwrap();
                list.iter().map(|c| c.new_score).collect::<Vec<f32>>()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), vec![2.0, 4.0, 6.0, 8.0]);
    }
}

#[test]
fn failing_shard_is_isolated() {
    let mut store = scaled_store(&[1.0, 1.0, 1.0]);
    store.insert(DocId::new(2), FIELD, VectorSet::empty());
    let config = RescoreConfig::new(identity_query(), FIELD).unwrap();

    let mut shards = vec![
        vec![Candidate::new(DocId::new(0), 5.0)],
        vec![
            Candidate::new(DocId::new(1), 5.0),
            Candidate::new(DocId::new(2), 4.0),
        ],
    ];
    let results = MaxSimRescorer.rescore_shards(&mut shards, &config, &store);

    assert!(results[0].is_ok());
    assert!(results[1].is_err());
    assert_eq!(shards[0][0].new_score, 2.0);
    assert_eq!(shards[1][0].new_score, 5.0);
    assert_eq!(shards[1][1].new_score, 4.0);
}
