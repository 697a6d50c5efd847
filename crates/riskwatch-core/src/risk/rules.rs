//! Scoring rule table
//!
//! Banded categories list their bands highest first; the first matching band
//! is the only one that fires. Reason strings are part of the audit contract
//! (trace diffs compare them exactly) and must stay stable per band.

use crate::model::PatientSnapshot;

/// One scoring band of a category
pub struct Band {
    pub reason: &'static str,
    pub points: u32,
    pub matches: fn(&PatientSnapshot) -> bool,
}

/// A category of mutually exclusive bands
pub struct Category {
    pub name: &'static str,
    pub bands: &'static [Band],
}

/// Substrings that mark a chronic condition as scoring
pub const CHRONIC_MARKERS: [&str; 3] = ["diabetes", "copd", "cardiac"];

pub const AGE: Category = Category {
    name: "age",
    bands: &[
        Band {
            reason: "Age >75 (+2)",
            points: 2,
            matches: |s| s.age > 75,
        },
        Band {
            reason: "Age 60-75 (+1)",
            points: 1,
            matches: |s| (60..=75).contains(&s.age),
        },
    ],
};

pub const HEART_RATE: Category = Category {
    name: "heart_rate",
    bands: &[
        Band {
            reason: "HR >120 (+2)",
            points: 2,
            matches: |s| s.heart_rate > 120,
        },
        Band {
            reason: "HR 100-120 (+1)",
            points: 1,
            matches: |s| (100..=120).contains(&s.heart_rate),
        },
    ],
};

pub const SYSTOLIC_BP: Category = Category {
    name: "systolic_bp",
    bands: &[Band {
        reason: "Systolic BP <90 (+2)",
        points: 2,
        // 0 is the unrecorded default
        matches: |s| s.systolic_bp > 0 && s.systolic_bp < 90,
    }],
};

pub const SPO2: Category = Category {
    name: "spo2",
    bands: &[
        Band {
            reason: "SpO2 <90 (+2)",
            points: 2,
            matches: |s| s.spo2 < 90,
        },
        Band {
            reason: "SpO2 90-93 (+1)",
            points: 1,
            matches: |s| (90..=93).contains(&s.spo2),
        },
    ],
};

pub const TEMPERATURE: Category = Category {
    name: "temperature",
    bands: &[
        Band {
            reason: "Temp >39 (+2)",
            points: 2,
            matches: |s| s.temperature > 39.0,
        },
        Band {
            reason: "Temp 38-39 (+1)",
            points: 1,
            matches: |s| (38.0..=39.0).contains(&s.temperature),
        },
    ],
};

pub const RESPIRATORY_RATE: Category = Category {
    name: "respiratory_rate",
    bands: &[Band {
        reason: "Resp Rate >24 (+1)",
        points: 1,
        matches: |s| s.respiratory_rate > 24,
    }],
};

pub const ER_VISITS: Category = Category {
    name: "er_visits",
    bands: &[
        Band {
            reason: "ER Visits >3 (+2)",
            points: 2,
            matches: |s| s.er_visits > 3,
        },
        Band {
            reason: "ER Visits 2-3 (+1)",
            points: 1,
            matches: |s| (2..=3).contains(&s.er_visits),
        },
    ],
};

/// Banded categories evaluated before the chronic-condition rule
pub const VITALS: [&Category; 6] = [
    &AGE,
    &HEART_RATE,
    &SYSTOLIC_BP,
    &SPO2,
    &TEMPERATURE,
    &RESPIRATORY_RATE,
];

/// Banded categories evaluated after the chronic-condition rule
pub const HISTORY: [&Category; 1] = [&ER_VISITS];

/// Independent lab flag rules, +1 each
pub const LAB_FLAGS: [Band; 3] = [
    Band {
        reason: "Elevated WBC (+1)",
        points: 1,
        matches: |s| s.wbc_flag,
    },
    Band {
        reason: "High Creatinine (+1)",
        points: 1,
        matches: |s| s.creatinine_flag,
    },
    Band {
        reason: "High CRP (+1)",
        points: 1,
        matches: |s| s.crp_flag,
    },
];

impl Category {
    /// The single band that fires for this snapshot, if any
    pub fn matching_band(&self, snapshot: &PatientSnapshot) -> Option<&'static Band> {
        self.bands.iter().find(|band| (band.matches)(snapshot))
    }
}

/// Trimmed condition text when it names a scoring condition
pub fn scoring_condition(condition: &str) -> Option<&str> {
    let trimmed = condition.trim();
    let lowered = trimmed.to_lowercase();
    CHRONIC_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
        .then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bands_are_exclusive() {
        let s = PatientSnapshot {
            heart_rate: 150,
            ..PatientSnapshot::default()
        };
        let band = HEART_RATE.matching_band(&s).map(|b| b.reason);
        assert_eq!(band, Some("HR >120 (+2)"));
    }

    #[test]
    fn test_band_edges() {
        let at = |age| PatientSnapshot {
            age,
            ..PatientSnapshot::default()
        };
        assert!(AGE.matching_band(&at(59)).is_none());
        assert_eq!(AGE.matching_band(&at(60)).map(|b| b.points), Some(1));
        assert_eq!(AGE.matching_band(&at(75)).map(|b| b.points), Some(1));
        assert_eq!(AGE.matching_band(&at(76)).map(|b| b.points), Some(2));
    }

    #[test]
    fn test_temperature_boundaries_inclusive() {
        let at = |temperature| PatientSnapshot {
            temperature,
            ..PatientSnapshot::default()
        };
        assert!(TEMPERATURE.matching_band(&at(37.9)).is_none());
        assert_eq!(TEMPERATURE.matching_band(&at(38.0)).map(|b| b.points), Some(1));
        assert_eq!(TEMPERATURE.matching_band(&at(39.0)).map(|b| b.points), Some(1));
        assert_eq!(TEMPERATURE.matching_band(&at(39.1)).map(|b| b.points), Some(2));
    }

    #[test]
    fn test_unrecorded_bp_does_not_score() {
        let mut s = PatientSnapshot::default();
        assert!(SYSTOLIC_BP.matching_band(&s).is_none());
        s.systolic_bp = 85;
        assert!(SYSTOLIC_BP.matching_band(&s).is_some());
        s.systolic_bp = 90;
        assert!(SYSTOLIC_BP.matching_band(&s).is_none());
    }

    #[test]
    fn test_scoring_condition_matching() {
        assert_eq!(scoring_condition("  Diabetes Type 2 "), Some("Diabetes Type 2"));
        assert_eq!(scoring_condition("Severe COPD"), Some("Severe COPD"));
        assert_eq!(scoring_condition("cardiac arrhythmia"), Some("cardiac arrhythmia"));
        assert_eq!(scoring_condition("Asthma"), None);
    }
}
