//! Cobb angle averaging and curve-pattern classification
//!
//! Each of the three regional angles is labelled Straight (≤ threshold) or
//! Bent; the label triple maps onto a named pattern.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Degrees at or below which a region counts as straight
pub const DEFAULT_THRESHOLD: f64 = 5.0;

/// Proximal thoracic, main thoracic and lumbar Cobb angles in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CobbAngles {
    pub proximal_thoracic: f64,
    pub main_thoracic: f64,
    pub lumbar: f64,
}

impl CobbAngles {
    pub fn new(proximal_thoracic: f64, main_thoracic: f64, lumbar: f64) -> Self {
        Self {
            proximal_thoracic,
            main_thoracic,
            lumbar,
        }
    }

    fn as_array(&self) -> [f64; 3] {
        [self.proximal_thoracic, self.main_thoracic, self.lumbar]
    }
}

/// Group a flat list into per-frame triples; `None` unless the length is a
/// non-zero multiple of three
pub fn angle_triples(values: &[f64]) -> Option<Vec<CobbAngles>> {
    if values.is_empty() || values.len() % 3 != 0 {
        return None;
    }
    Some(
        values
            .chunks_exact(3)
            .map(|c| CobbAngles::new(c[0], c[1], c[2]))
            .collect(),
    )
}

/// Mean of per-frame predictions; zeros when there are none
pub fn mean_angles(samples: &[CobbAngles]) -> CobbAngles {
    let count = samples.len().max(1) as f64;
    let sum = samples.iter().fold([0.0; 3], |mut acc, s| {
        for (a, v) in acc.iter_mut().zip(s.as_array()) {
            *a += v;
        }
        acc
    });
    CobbAngles::new(sum[0] / count, sum[1] / count, sum[2] / count)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bend {
    Straight,
    Bent,
}

impl Bend {
    pub fn of(angle: f64, threshold: f64) -> Self {
        if angle <= threshold {
            Bend::Straight
        } else {
            Bend::Bent
        }
    }
}

impl fmt::Display for Bend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bend::Straight => write!(f, "Straight"),
            Bend::Bent => write!(f, "Bent"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurvePattern {
    Normal,
    Thoracic,
    DoubleThoracic,
    DoubleMajor,
    TripleCurve,
    Lumbar,
    Undefined,
}

impl CurvePattern {
    pub fn from_bends(bends: [Bend; 3]) -> Self {
        use Bend::{Bent as B, Straight as S};
        match bends {
            [S, S, S] => CurvePattern::Normal,
            [S, B, S] => CurvePattern::Thoracic,
            [B, B, S] => CurvePattern::DoubleThoracic,
            [S, B, B] => CurvePattern::DoubleMajor,
            [B, B, B] => CurvePattern::TripleCurve,
            [S, S, B] => CurvePattern::Lumbar,
            _ => CurvePattern::Undefined,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CurvePattern::Normal => "Normal",
            CurvePattern::Thoracic => "Thoracic",
            CurvePattern::DoubleThoracic => "Double thoracic",
            CurvePattern::DoubleMajor => "Double major",
            CurvePattern::TripleCurve => "Triple curve",
            CurvePattern::Lumbar => "Lumbar",
            CurvePattern::Undefined => "Undefined",
        }
    }
}

impl fmt::Display for CurvePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    pub angles: CobbAngles,
    pub bends: [Bend; 3],
    pub pattern: CurvePattern,
}

impl Classification {
    /// Label triple joined with dashes, e.g. `Straight-Bent-Straight`
    pub fn pattern_string(&self) -> String {
        self.bends
            .iter()
            .map(Bend::to_string)
            .collect::<Vec<_>>()
            .join("-")
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.pattern, self.pattern_string())
    }
}

pub fn classify(angles: CobbAngles, threshold: f64) -> Classification {
    let values = angles.as_array();
    let bends = values.map(|v| Bend::of(v, threshold));
    Classification {
        angles,
        bends,
        pattern: CurvePattern::from_bends(bends),
    }
}

/// Average per-frame predictions, then classify the mean
pub fn classify_frames(samples: &[CobbAngles], threshold: f64) -> Classification {
    classify(mean_angles(samples), threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_inclusive() {
        assert_eq!(Bend::of(5.0, 5.0), Bend::Straight);
        assert_eq!(Bend::of(5.01, 5.0), Bend::Bent);
    }

    #[test]
    fn test_pattern_table() {
        let cases = [
            ((1.0, 2.0, 3.0), CurvePattern::Normal),
            ((1.0, 20.0, 3.0), CurvePattern::Thoracic),
            ((15.0, 20.0, 3.0), CurvePattern::DoubleThoracic),
            ((1.0, 20.0, 30.0), CurvePattern::DoubleMajor),
            ((15.0, 20.0, 30.0), CurvePattern::TripleCurve),
            ((1.0, 2.0, 30.0), CurvePattern::Lumbar),
            ((15.0, 2.0, 3.0), CurvePattern::Undefined),
            ((15.0, 2.0, 30.0), CurvePattern::Undefined),
        ];
        for ((a, b, c), expected) in cases {
            let result = classify(CobbAngles::new(a, b, c), 8.0);
            assert_eq!(result.pattern, expected, "{a} {b} {c}");
        }
    }

    #[test]
    fn test_pattern_string() {
        let result = classify(CobbAngles::new(3.0, 12.0, 4.0), DEFAULT_THRESHOLD);
        assert_eq!(result.pattern_string(), "Straight-Bent-Straight");
        assert_eq!(result.to_string(), "Thoracic (Straight-Bent-Straight)");
    }

    #[test]
    fn test_frames_are_averaged_before_classifying() {
        // The first frame alone reads as normal; the mean is thoracic
        let frames = angle_triples(&[2.0, 4.0, 1.0, 4.0, 20.0, 3.0]).unwrap();
        assert_eq!(classify(frames[0], 8.0).pattern, CurvePattern::Normal);
        let result = classify_frames(&frames, 8.0);
        assert_eq!(result.angles, CobbAngles::new(3.0, 12.0, 2.0));
        assert_eq!(result.pattern, CurvePattern::Thoracic);
    }

    #[test]
    fn test_angle_triples_need_whole_frames() {
        assert_eq!(angle_triples(&[]), None);
        assert_eq!(angle_triples(&[1.0, 2.0]), None);
        assert_eq!(angle_triples(&[1.0, 2.0, 3.0]).map(|v| v.len()), Some(1));
    }

    #[test]
    fn test_mean_angles() {
        assert_eq!(mean_angles(&[]), CobbAngles::default());
        let mean = mean_angles(&[
            CobbAngles::new(10.0, 20.0, 30.0),
            CobbAngles::new(20.0, 40.0, 0.0),
        ]);
        assert_eq!(mean, CobbAngles::new(15.0, 30.0, 15.0));
    }
}
