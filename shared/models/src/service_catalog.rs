//! Grooming service catalog.
//!
//! Main services and add-on services offered on the appointment form, with the
//! static label tables used when presenting raw service codes to the groomer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ModelError;

/// Code-to-label table for main services.
pub static MAIN_SERVICE_LABELS: &[(&str, &str)] = &[
    ("full-groom", "Full Groom"),
    ("sanitary-groom", "Sanitary Groom"),
];

/// Code-to-label table for additional services.
pub static ADDITIONAL_SERVICE_LABELS: &[(&str, &str)] = &[
    ("teeth-brushing", "Teeth Brushing"),
    ("nail-filing", "Nail Filing"),
    ("paw-nose-balm", "Paw & Nose Balm"),
    ("medicated-bath", "Medicated Bath"),
    ("anal-gland-expression", "Anal Gland Expression"),
    ("de-shedding", "De-shedding"),
    ("de-skunk-bath", "De-skunk Bath Treatment"),
    ("flea-tick-treatment", "Flea & Tick Treatment"),
];

fn lookup_label<'a>(table: &'static [(&'static str, &'static str)], code: &'a str) -> &'a str {
    for (known, label) in table {
        if *known == code {
            return label;
        }
    }
    code
}

/// Human-readable label for a main service code. Unknown codes are returned as-is.
pub fn main_service_label(code: &str) -> &str {
    lookup_label(MAIN_SERVICE_LABELS, code)
}

/// Human-readable label for an additional service code. Unknown codes are returned as-is.
pub fn additional_service_label(code: &str) -> &str {
    lookup_label(ADDITIONAL_SERVICE_LABELS, code)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MainService {
    FullGroom,
    SanitaryGroom,
}

impl MainService {
    pub const ALL: [MainService; 2] = [MainService::FullGroom, MainService::SanitaryGroom];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullGroom => "full-groom",
            Self::SanitaryGroom => "sanitary-groom",
        }
    }

    pub fn label(&self) -> &'static str {
        lookup_label(MAIN_SERVICE_LABELS, self.as_str())
    }
}

impl fmt::Display for MainService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MainService {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|service| service.as_str() == s)
            .ok_or_else(|| ModelError::UnknownService(s.to_string()))
    }
}

/// Add-on services. Ordering follows the form's checkbox order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdditionalService {
    TeethBrushing,
    NailFiling,
    PawNoseBalm,
    MedicatedBath,
    AnalGlandExpression,
    DeShedding,
    DeSkunkBath,
    FleaTickTreatment,
}

impl AdditionalService {
    pub const ALL: [AdditionalService; 8] = [
        AdditionalService::TeethBrushing,
        AdditionalService::NailFiling,
        AdditionalService::PawNoseBalm,
        AdditionalService::MedicatedBath,
        AdditionalService::AnalGlandExpression,
        AdditionalService::DeShedding,
        AdditionalService::DeSkunkBath,
        AdditionalService::FleaTickTreatment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TeethBrushing => "teeth-brushing",
            Self::NailFiling => "nail-filing",
            Self::PawNoseBalm => "paw-nose-balm",
            Self::MedicatedBath => "medicated-bath",
            Self::AnalGlandExpression => "anal-gland-expression",
            Self::DeShedding => "de-shedding",
            Self::DeSkunkBath => "de-skunk-bath",
            Self::FleaTickTreatment => "flea-tick-treatment",
        }
    }

    pub fn label(&self) -> &'static str {
        lookup_label(ADDITIONAL_SERVICE_LABELS, self.as_str())
    }
}

impl fmt::Display for AdditionalService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdditionalService {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|service| service.as_str() == s)
            .ok_or_else(|| ModelError::UnknownService(s.to_string()))
    }
}
