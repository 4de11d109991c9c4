//! Configuration round trips and validation

use robust_drift::{
    DetectorConfig, DriftDetector, Error, FhddmParameters, HddmAParameters, MddmGParameters, SeqDrift2Parameters,
    TestType, TimedDetector,
};

#[test]
fn test_json_round_trip() {
    for config in DetectorConfig::all_defaults() {
        let json = serde_json::to_string(&config).unwrap();
        let parsed: DetectorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}

#[test]
fn test_missing_fields_fall_back_to_defaults() {
    let config: DetectorConfig = serde_json::from_str(r#"{"algorithm": "FHDDM", "n": 50}"#).unwrap();
    assert_eq!(config, DetectorConfig::Fhddm(FhddmParameters { n: 50, delta: 1e-6 }));

    let config: DetectorConfig = serde_json::from_str(r#"{"algorithm": "SeqDrift2"}"#).unwrap();
    assert_eq!(config, DetectorConfig::SeqDrift2(SeqDrift2Parameters::default()));

    let config: DetectorConfig = serde_json::from_str(r#"{"algorithm": "NO_DETECTION"}"#).unwrap();
    assert_eq!(config.build().unwrap().algorithm_name(), "NO_DETECTION");
}

#[test]
fn test_test_type_names() {
    let config: DetectorConfig =
        serde_json::from_str(r#"{"algorithm": "HDDM.A.test", "test_type": "one-sided"}"#).unwrap();
    assert_eq!(
        config,
        DetectorConfig::HddmA(HddmAParameters {
            test_type: TestType::OneSided,
            ..Default::default()
        })
    );
}

#[test]
fn test_unknown_algorithm_rejected() {
    assert!(serde_json::from_str::<DetectorConfig>(r#"{"algorithm": "PAGE_HINKLEY"}"#).is_err());
    assert!(matches!(
        DetectorConfig::from_json(r#"{"algorithm": "PAGE_HINKLEY"}"#),
        Err(Error::Other(_))
    ));
}

#[test]
fn test_config_list_from_json() {
    let configs = DetectorConfig::list_from_json(
        r#"[{"algorithm": "DDM"}, {"algorithm": "CUSUM", "lambda": 40}, {"algorithm": "NO_DETECTION"}]"#,
    )
    .unwrap();
    let stems: Vec<String> = configs
        .iter()
        .map(|config| TimedDetector::new(config.build().unwrap()).file_stem())
        .collect();
    assert_eq!(stems, ["DDM.30", "CUSUM.30.0.005.40", "NO_DETECTION"]);

    // parses, but validation is left to build
    let config = DetectorConfig::from_json(r#"{"algorithm": "ADWIN", "delta": 2.0}"#).unwrap();
    assert!(matches!(config.build(), Err(Error::InvalidParameter(_))));
}

#[test]
fn test_invalid_parameters_fail_at_build() {
    let invalid = [
        r#"{"algorithm": "DDM", "min_instance": 0}"#,
        r#"{"algorithm": "EWMA", "lambda": 1.5}"#,
        r#"{"algorithm": "FHDDMS", "m": 0}"#,
        r#"{"algorithm": "HDDM.W.test", "drift_confidence": 0.0}"#,
        r#"{"algorithm": "MDDM.G", "ratio": 0.5}"#,
        r#"{"algorithm": "ADWIN", "delta": 2.0}"#,
        r#"{"algorithm": "SeqDrift2", "block_size": 0}"#,
    ];
    for json in invalid {
        let config: DetectorConfig = serde_json::from_str(json).unwrap();
        assert!(config.build().is_err(), "{json} should not build");
    }
}

#[test]
fn test_mddm_display_name_is_derived() {
    let config = DetectorConfig::MddmG(MddmGParameters {
        n: 64,
        ..Default::default()
    });
    let detector = config.build().unwrap();
    assert_eq!(detector.display_name(), "MDDM.G.64");
    assert_eq!(detector.algorithm_name(), "MDDM.G");
    assert_eq!(detector.settings().id, "64.1E-06");
}
