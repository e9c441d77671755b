//! Psychological metrics correction.
//!
//! Discipline and tilt-control scores arrive from an external scorer and
//! may violate the coupling contract: the two values may not diverge by
//! more than 30 points, and the extreme pairings (discipline above 90 with
//! tilt below 10, or the mirror) are forbidden. Violations are corrected,
//! never rejected; each correction is recorded as a warning string.

use serde::{Deserialize, Serialize};

/// Maximum allowed |discipline − tilt|.
const MAX_GAP: f64 = 30.0;

/// Corrected, invariant-safe score pair. Produced by one pure call and
/// never mutated afterward; raw scores are not exposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PsychologicalMetrics {
    pub discipline_level: f64,
    pub tilt_control: f64,
    pub validation_warnings: Vec<String>,
}

/// Correct a raw discipline/tilt pair.
///
/// Idempotent: re-applying to an already-corrected pair returns the same
/// values and no new warnings.
pub fn correct(raw_discipline: f64, raw_tilt: f64) -> PsychologicalMetrics {
    let mut warnings = Vec::new();
    let mut discipline = clamp_score(raw_discipline);
    let mut tilt = clamp_score(raw_tilt);

    (discipline, tilt) = enforce_gap(discipline, tilt, &mut warnings);

    if discipline > 90.0 && tilt < 10.0 {
        warnings.push(format!(
            "tiltControl raised from {tilt:.1} to 10.0 to exit the high-discipline/low-tilt region"
        ));
        tilt = 10.0;
        (discipline, tilt) = enforce_gap(discipline, tilt, &mut warnings);
    } else if discipline < 10.0 && tilt > 90.0 {
        warnings.push(format!(
            "tiltControl lowered from {tilt:.1} to 90.0 to exit the low-discipline/high-tilt region"
        ));
        tilt = 90.0;
        (discipline, tilt) = enforce_gap(discipline, tilt, &mut warnings);
    }

    PsychologicalMetrics {
        discipline_level: discipline,
        tilt_control: tilt,
        validation_warnings: warnings,
    }
}

fn clamp_score(raw: f64) -> f64 {
    if raw.is_finite() {
        raw.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Pull the value farther from the midpoint toward the other until the gap
/// is exactly [`MAX_GAP`]. On an exact tie the discipline value moves.
fn enforce_gap(discipline: f64, tilt: f64, warnings: &mut Vec<String>) -> (f64, f64) {
    if (discipline - tilt).abs() <= MAX_GAP {
        return (discipline, tilt);
    }

    let discipline_extremity = (discipline - 50.0).abs();
    let tilt_extremity = (tilt - 50.0).abs();

    if discipline_extremity >= tilt_extremity {
        let adjusted = if discipline > tilt {
            tilt + MAX_GAP
        } else {
            tilt - MAX_GAP
        };
        warnings.push(format!(
            "disciplineLevel adjusted from {discipline:.1} to {adjusted:.1} \
             to hold the discipline/tilt gap at {MAX_GAP:.0}"
        ));
        (adjusted, tilt)
    } else {
        let adjusted = if tilt > discipline {
            discipline + MAX_GAP
        } else {
            discipline - MAX_GAP
        };
        warnings.push(format!(
            "tiltControl adjusted from {tilt:.1} to {adjusted:.1} \
             to hold the discipline/tilt gap at {MAX_GAP:.0}"
        ));
        (discipline, adjusted)
    }
}
