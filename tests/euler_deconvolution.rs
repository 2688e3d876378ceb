//! Euler deconvolution of a synthetic dipole survey

mod common;

use common::assert_close;
use gravmag::synthetic::{SyntheticSurvey, SyntheticSurveyConfig};
use gravmag::{EulerDeconvolution, GravMagError};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_euler_with_numeric_derivatives() {
    let config = SyntheticSurveyConfig::default();
    let survey = SyntheticSurvey::generate(&config).unwrap();

    let mut euler = EulerDeconvolution::new(3.0);
    euler
        .fit(
            &survey.coordinates,
            survey.tfa.values(),
            &survey.d_east,
            &survey.d_north,
            &survey.d_up,
        )
        .unwrap();

    let location = euler.location().unwrap();
    for (estimated, expected) in location.iter().zip(config.dipole.iter()) {
        assert_close(*estimated, *expected, 1e-3, 1e-3);
    }
    assert_close(euler.base_level().unwrap(), config.base_level, 1e-3, 1e-3);

    let report = euler.report().unwrap();
    assert_eq!(report.rows_used, 321 * 401);
    assert_eq!(report.structural_index, 3.0);
}

#[test]
fn test_serial_survey_matches_parallel() {
    let config = SyntheticSurveyConfig {
        spacing: 2000.0,
        ..Default::default()
    };
    let parallel = SyntheticSurvey::generate(&config).unwrap();
    let serial = SyntheticSurvey::generate(&SyntheticSurveyConfig {
        parallel: false,
        ..config
    })
    .unwrap();
    // a single dipole has nothing to split across workers
    assert_eq!(parallel.tfa, serial.tfa);
}

#[test]
fn test_unfitted_estimator_has_no_estimates() {
    let euler = EulerDeconvolution::new(2.0);
    assert_eq!(euler.structural_index(), 2.0);
    assert!(euler.location().is_none());
    assert!(euler.base_level().is_none());
    assert!(euler.report().is_none());
}

#[test]
fn test_config_loaded_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "region": {{"west": -50000.0, "east": 50000.0, "south": -40000.0, "north": 40000.0}},
            "spacing": 1000.0,
            "dipole": [5000.0, -2000.0, -8000.0],
            "base_level": -35.0
        }}"#
    )
    .unwrap();

    let config = SyntheticSurveyConfig::from_json_file(file.path()).unwrap();
    assert_eq!(config.spacing, 1000.0);
    assert_eq!(config.base_level, -35.0);
    assert_eq!(config.height, 500.0);
    assert!(config.parallel);

    let survey = SyntheticSurvey::generate(&config).unwrap();
    assert_eq!(survey.tfa.dim(), (81, 101));
    let fit = survey.fit_euler(3.0).unwrap();
    assert_eq!(fit.rows_used, 81 * 101);
    for value in fit.location.iter().chain(std::iter::once(&fit.base_level)) {
        assert!(value.is_finite());
    }
}

#[test]
fn test_config_errors() {
    let missing = SyntheticSurveyConfig::from_json_file("/nonexistent/survey.json");
    assert!(matches!(missing, Err(GravMagError::IoError(_))));

    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{{ \"spacing\": \"wide\" }}").unwrap();
    let invalid = SyntheticSurveyConfig::from_json_file(file.path());
    assert!(matches!(invalid, Err(GravMagError::ConfigError(_))));
}

#[test]
fn test_fit_report_serializes() {
    let config = SyntheticSurveyConfig {
        spacing: 2000.0,
        ..Default::default()
    };
    let fit = SyntheticSurvey::generate(&config)
        .unwrap()
        .fit_euler(3.0)
        .unwrap();
    let json = serde_json::to_value(&fit).unwrap();
    assert_eq!(json["structural_index"], 3.0);
    assert_eq!(json["location"].as_array().unwrap().len(), 3);
    assert!(json["base_level"].is_number());
}
