//! Serializable detector configuration
//!
//! Configurations are tagged by algorithm name and every parameter falls
//! back to its default, so `{"algorithm": "FHDDM", "n": 50}` is a complete
//! configuration.

use crate::detector::Detector;
use anyhow::Context;
use crate::no_detection::NoDetection;
use drift_adwin::{AdwinDetector, AdwinParameters};
use drift_control::*;
use drift_core::Result;
use drift_hoeffding::*;
use drift_mcdiarmid::{MddmAParameters, MddmDetector, MddmEParameters, MddmGParameters};
use drift_seq::{SeqDrift2Detector, SeqDrift2Parameters};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configuration of any detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "algorithm")]
pub enum DetectorConfig {
    #[serde(rename = "DDM")]
    Ddm(DdmParameters),
    #[serde(rename = "EDDM")]
    Eddm(EddmParameters),
    #[serde(rename = "RDDM")]
    Rddm(RddmParameters),
    #[serde(rename = "CUSUM")]
    Cusum(CusumParameters),
    #[serde(rename = "EWMA")]
    Ewma(EwmaParameters),
    #[serde(rename = "FHDDM")]
    Fhddm(FhddmParameters),
    #[serde(rename = "FHDDMS")]
    Fhddms(FhddmsParameters),
    #[serde(rename = "FHDDMS.add")]
    FhddmsAdd(FhddmsParameters),
    #[serde(rename = "HDDM.A.test")]
    HddmA(HddmAParameters),
    #[serde(rename = "HDDM.W.test")]
    HddmW(HddmWParameters),
    #[serde(rename = "MDDM.A")]
    MddmA(MddmAParameters),
    #[serde(rename = "MDDM.G")]
    MddmG(MddmGParameters),
    #[serde(rename = "MDDM.E")]
    MddmE(MddmEParameters),
    #[serde(rename = "ADWIN")]
    Adwin(AdwinParameters),
    #[serde(rename = "SeqDrift2")]
    SeqDrift2(SeqDrift2Parameters),
    #[serde(rename = "NO_DETECTION")]
    NoDetection,
}

impl DetectorConfig {
    /// Parse a JSON configuration
    ///
    /// Syntax errors and unknown algorithms surface as [`drift_core::Error::Other`]
    /// carrying the parser message. Parameter validation still happens in
    /// [`DetectorConfig::build`].
    pub fn from_json(json: &str) -> Result<Self> {
        let config = serde_json::from_str(json).context("invalid detector configuration")?;
        Ok(config)
    }

    /// Parse a JSON array of configurations, one detector per element
    pub fn list_from_json(json: &str) -> Result<Vec<Self>> {
        let configs = serde_json::from_str(json).context("invalid detector configuration list")?;
        Ok(configs)
    }

    /// Default configuration of every detector
    pub fn all_defaults() -> Vec<DetectorConfig> {
        vec![
            DetectorConfig::Ddm(Default::default()),
            DetectorConfig::Eddm(Default::default()),
            DetectorConfig::Rddm(Default::default()),
            DetectorConfig::Cusum(Default::default()),
            DetectorConfig::Ewma(Default::default()),
            DetectorConfig::Fhddm(Default::default()),
            DetectorConfig::Fhddms(Default::default()),
            DetectorConfig::FhddmsAdd(Default::default()),
            DetectorConfig::HddmA(Default::default()),
            DetectorConfig::HddmW(Default::default()),
            DetectorConfig::MddmA(Default::default()),
            DetectorConfig::MddmG(Default::default()),
            DetectorConfig::MddmE(Default::default()),
            DetectorConfig::Adwin(Default::default()),
            DetectorConfig::SeqDrift2(Default::default()),
            DetectorConfig::NoDetection,
        ]
    }

    /// Algorithm name of the configured detector
    pub fn algorithm_name(&self) -> &'static str {
        match self {
            DetectorConfig::Ddm(_) => "DDM",
            DetectorConfig::Eddm(_) => "EDDM",
            DetectorConfig::Rddm(_) => "RDDM",
            DetectorConfig::Cusum(_) => "CUSUM",
            DetectorConfig::Ewma(_) => "EWMA",
            DetectorConfig::Fhddm(_) => "FHDDM",
            DetectorConfig::Fhddms(_) => "FHDDMS",
            DetectorConfig::FhddmsAdd(_) => "FHDDMS.add",
            DetectorConfig::HddmA(_) => "HDDM.A.test",
            DetectorConfig::HddmW(_) => "HDDM.W.test",
            DetectorConfig::MddmA(_) => "MDDM.A",
            DetectorConfig::MddmG(_) => "MDDM.G",
            DetectorConfig::MddmE(_) => "MDDM.E",
            DetectorConfig::Adwin(_) => "ADWIN",
            DetectorConfig::SeqDrift2(_) => "SeqDrift2",
            DetectorConfig::NoDetection => "NO_DETECTION",
        }
    }

    /// Validate the configuration and construct the detector
    pub fn build(&self) -> Result<Detector> {
        let detector: Detector = match self.clone() {
            DetectorConfig::Ddm(p) => DdmDetector::new(p)?.into(),
            DetectorConfig::Eddm(p) => EddmDetector::new(p)?.into(),
            DetectorConfig::Rddm(p) => RddmDetector::new(p)?.into(),
            DetectorConfig::Cusum(p) => CusumDetector::new(p)?.into(),
            DetectorConfig::Ewma(p) => EwmaDetector::new(p)?.into(),
            DetectorConfig::Fhddm(p) => FhddmDetector::new(p)?.into(),
            DetectorConfig::Fhddms(p) => FhddmsDetector::new(p)?.into(),
            DetectorConfig::FhddmsAdd(p) => FhddmsAddDetector::new(p)?.into(),
            DetectorConfig::HddmA(p) => HddmADetector::new(p)?.into(),
            DetectorConfig::HddmW(p) => HddmWDetector::new(p)?.into(),
            DetectorConfig::MddmA(p) => MddmDetector::new(p)?.into(),
            DetectorConfig::MddmG(p) => MddmDetector::new(p)?.into(),
            DetectorConfig::MddmE(p) => MddmDetector::new(p)?.into(),
            DetectorConfig::Adwin(p) => AdwinDetector::new(p)?.into(),
            DetectorConfig::SeqDrift2(p) => SeqDrift2Detector::new(p)?.into(),
            DetectorConfig::NoDetection => NoDetection.into(),
        };
        debug!(algorithm = self.algorithm_name(), "detector built");
        Ok(detector)
    }
}
