//! Closed set of detectors behind one type
//!
//! A harness that runs several detectors side by side stores them as
//! `Vec<TimedDetector<Detector>>`; dispatch is a `match`, no boxing needed.

use crate::no_detection::NoDetection;
use drift_adwin::AdwinDetector;
use drift_control::{CusumDetector, DdmDetector, EddmDetector, EwmaDetector, RddmDetector};
use drift_core::{DetectorSettings, DriftDetector, Signal};
use drift_hoeffding::{FhddmDetector, FhddmsAddDetector, FhddmsDetector, HddmADetector, HddmWDetector};
use drift_mcdiarmid::MddmDetector;
use drift_seq::SeqDrift2Detector;

/// Every detector of the workspace
#[derive(Debug, Clone)]
pub enum Detector {
    Ddm(DdmDetector),
    Eddm(EddmDetector),
    Rddm(RddmDetector),
    Cusum(CusumDetector),
    Ewma(EwmaDetector),
    Fhddm(FhddmDetector),
    Fhddms(FhddmsDetector),
    FhddmsAdd(FhddmsAddDetector),
    HddmA(HddmADetector),
    HddmW(HddmWDetector),
    Mddm(MddmDetector),
    Adwin(AdwinDetector),
    SeqDrift2(SeqDrift2Detector),
    NoDetection(NoDetection),
}

macro_rules! dispatch {
    ($self:expr, $d:ident => $body:expr) => {
        match $self {
            Detector::Ddm($d) => $body,
            Detector::Eddm($d) => $body,
            Detector::Rddm($d) => $body,
            Detector::Cusum($d) => $body,
            Detector::Ewma($d) => $body,
            Detector::Fhddm($d) => $body,
            Detector::Fhddms($d) => $body,
            Detector::FhddmsAdd($d) => $body,
            Detector::HddmA($d) => $body,
            Detector::HddmW($d) => $body,
            Detector::Mddm($d) => $body,
            Detector::Adwin($d) => $body,
            Detector::SeqDrift2($d) => $body,
            Detector::NoDetection($d) => $body,
        }
    };
}

impl DriftDetector for Detector {
    fn algorithm_name(&self) -> &'static str {
        dispatch!(self, d => d.algorithm_name())
    }

    fn run(&mut self, is_correct: bool) -> Signal {
        dispatch!(self, d => d.run(is_correct))
    }

    fn reset(&mut self) {
        dispatch!(self, d => d.reset())
    }

    fn settings(&self) -> DetectorSettings {
        dispatch!(self, d => d.settings())
    }

    fn display_name(&self) -> String {
        dispatch!(self, d => d.display_name())
    }

    fn minimum_sample_size(&self) -> usize {
        dispatch!(self, d => d.minimum_sample_size())
    }
}

macro_rules! impl_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Detector {
                fn from(detector: $ty) -> Self {
                    Detector::$variant(detector)
                }
            }
        )*
    };
}

impl_from!(
    Ddm(DdmDetector),
    Eddm(EddmDetector),
    Rddm(RddmDetector),
    Cusum(CusumDetector),
    Ewma(EwmaDetector),
    Fhddm(FhddmDetector),
    Fhddms(FhddmsDetector),
    FhddmsAdd(FhddmsAddDetector),
    HddmA(HddmADetector),
    HddmW(HddmWDetector),
    Mddm(MddmDetector),
    Adwin(AdwinDetector),
    SeqDrift2(SeqDrift2Detector),
    NoDetection(NoDetection),
);
