//! Configs shipped between nodes as bytes

use crate::common::*;
use std::io::Cursor;
use strata_maxsim::{
    decode_config, encode_config, read_config, rescore, write_config, LimitError, Limits,
    RescoreError,
};

fn shipped_config() -> RescoreConfig {
    RescoreConfig::builder(identity_query(), FIELD)
        .with_similarity(SimilarityKind::Cosine)
        .with_weight(0.6)
        .with_window_size(2)
        .build()
        .unwrap()
}

#[test]
fn remote_node_reproduces_scores() {
    let coordinator = shipped_config();
    let bytes = encode_config(&coordinator).unwrap();
    let on_shard = decode_config(&bytes).unwrap();
    assert_eq!(on_shard, coordinator);

    let store = scaled_store(&[2.0, 5.0, 1.0]);
    let mut local = ranked(3, 3.0);
    let mut remote = ranked(3, 3.0);
    rescore(&mut local, &coordinator, &store).unwrap();
    rescore(&mut remote, &on_shard, &store).unwrap();
    assert_eq!(local, remote);
}

#[test]
fn several_configs_in_one_stream() {
    let a = shipped_config();
    let b = RescoreConfig::new(VectorSet::new(vec![vec![0.5; 4]]), "other").unwrap();

    let mut stream = Vec::new();
    write_config(&a, &mut stream).unwrap();
    write_config(&b, &mut stream).unwrap();

    let mut cursor = Cursor::new(stream);
    let limits = Limits::default();
    assert_eq!(read_config(&mut cursor, &limits).unwrap(), a);
    assert_eq!(read_config(&mut cursor, &limits).unwrap(), b);
    assert!(read_config(&mut cursor, &limits).is_err());
}

#[test]
fn oversized_query_rejected_on_receive() {
    let many = VectorSet::new(vec![vec![1.0, 0.0]; 9]);
    let config = RescoreConfig::new(many, FIELD).unwrap();
    let bytes = encode_config(&config).unwrap();

    let err = read_config(&mut Cursor::new(bytes), &Limits::with_small_limits()).unwrap_err();
    assert!(matches!(
        err,
        RescoreError::Limit(LimitError::TooManyVectors { actual: 9, max: 8 })
    ));
}
