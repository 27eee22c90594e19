//! Tests for generator parameter structs

use std::sync::Arc;

use apophenia::config::{LinearParams, PermutationParams, SequenceParams, ZipfParams};
use apophenia::{AesSequence, GeneratorError, Linear, Permutation, Sequence, Zipf};

#[test]
fn test_zipf_params_from_json() {
    let json = r#"{"q": 1.5, "max": 100}"#;
    let params: ZipfParams = serde_json::from_str(json).unwrap();

    assert_eq!(params.q, 1.5);
    assert_eq!(params.v, 1.0, "v should default to 1");
    assert_eq!(params.seed, 0);
    assert_eq!(params.max, 100);
}

#[test]
fn test_linear_params_from_json() {
    let params: LinearParams = serde_json::from_str(r#"{"max": 10}"#).unwrap();
    assert_eq!(params.min, 0, "min should default to 0");
    assert_eq!(params.max, 10);

    let params: LinearParams = serde_json::from_str(r#"{"min": -20, "max": -10, "seed": 2}"#).unwrap();
    let mut linear = params.build(Arc::new(AesSequence::new(0))).unwrap();
    for i in 0..100 {
        assert!((-20..-10).contains(&linear.nth(i)));
    }
}

#[test]
fn test_params_build_same_generators_as_constructors() {
    let seq = Arc::new(SequenceParams { seed: 31 }.build());

    let mut from_params = PermutationParams { max: 500, seed: 2 }
        .build(Arc::clone(&seq))
        .unwrap();
    let mut direct = Permutation::new(500, 2, Arc::clone(&seq)).unwrap();
    for i in 0..50 {
        assert_eq!(from_params.nth(i), direct.nth(i));
    }

    let mut from_params = ZipfParams {
        q: 1.3,
        v: 2.0,
        max: 50,
        seed: 1,
    }
    .build(Arc::clone(&seq))
    .unwrap();
    let mut direct = Zipf::new(1.3, 2.0, 50, 1, Arc::clone(&seq)).unwrap();
    for i in 0..50 {
        assert_eq!(from_params.nth(i), direct.nth(i));
    }

    let mut from_params = LinearParams {
        min: -3,
        max: 7,
        seed: 4,
    }
    .build(Arc::clone(&seq))
    .unwrap();
    let mut direct = Linear::new(-3, 7, 4, seq).unwrap();
    for i in 0..50 {
        assert_eq!(from_params.nth(i), direct.nth(i));
    }
}

#[test]
fn test_sequence_params_seed() {
    let mut built = SequenceParams { seed: -5 }.build();
    let mut direct = AesSequence::new(-5);
    assert_eq!(built.current_seed(), -5);
    assert_eq!(built.next_uint64(), direct.next_uint64());
}

#[test]
fn test_invalid_params_surface_errors() {
    let seq = Arc::new(AesSequence::new(0));

    let err = PermutationParams { max: 0, seed: 0 }
        .build(Arc::clone(&seq))
        .unwrap_err();
    assert_eq!(err, GeneratorError::InvalidDomain { max: 0 });

    let err = ZipfParams {
        q: 0.9,
        v: 1.0,
        max: 10,
        seed: 0,
    }
    .build(seq)
    .unwrap_err();
    assert!(matches!(err, GeneratorError::InvalidParameter { name: "q", .. }));
    assert_eq!(
        err.to_string(),
        "Invalid parameter: q = 0.9 (must be greater than 1)"
    );
}

#[test]
fn test_params_round_trip_json() {
    let params = PermutationParams { max: 10_000, seed: 3 };
    let json = serde_json::to_string(&params).unwrap();
    let back: PermutationParams = serde_json::from_str(&json).unwrap();
    assert_eq!(back, params);
}
