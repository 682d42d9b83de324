//! Spine visualization
//!
//! Decorative model of a spine with an adjustable curvature pattern. A frame
//! is a pure function of (severity, curve type, elapsed time): 18 vertebrae
//! laid out along a fixed vertical span, displaced horizontally by one or
//! two Gaussian bumps plus a slow breathing sway. Nothing here is a medical
//! computation.

use crate::{Error, Result};
use scls_common::config::SpineConfig;
use scls_common::language::Localized;
use scls_common::Language;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

pub const CANVAS_WIDTH: f64 = 400.0;
pub const CANVAS_HEIGHT: f64 = 600.0;
pub const VERTEBRA_COUNT: usize = 18;

const CENTER_X: f64 = CANVAS_WIDTH / 2.0;
const TOP_Y: f64 = CANVAS_HEIGHT * 0.18;
const BOTTOM_Y: f64 = CANVAS_HEIGHT * 0.88;

/// Half-width of the finite difference used for vertebra rotation
const TANGENT_DT: f64 = 0.002;

/// Curvature pattern
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveType {
    /// Straight spine, no displacement at any severity
    Healthy,
    /// Single bump, upper third: A·g(t, 0.38, 0.12)
    Thoracic,
    /// Single bump, lower part: A·g(t, 0.78, 0.12)
    Lumbar,
    /// Single wide bump, middle: A·g(t, 0.58, 0.20)
    Thoracolumbar,
    /// S-curve: 0.9A·g(t, 0.33, 0.11) − 0.9A·g(t, 0.75, 0.11)
    #[default]
    Combined,
}

const CURVE_LABELS: [Localized<&str>; 5] = [
    Localized::new("정상", "Healthy"),
    Localized::new("흉추", "Thoracic"),
    Localized::new("요추", "Lumbar"),
    Localized::new("흉요추", "Thoraco-Lumbar"),
    Localized::new("S자형 (이중)", "Double Major (S)"),
];

impl CurveType {
    pub fn all_variants() -> &'static [CurveType] {
        &[
            CurveType::Healthy,
            CurveType::Thoracic,
            CurveType::Lumbar,
            CurveType::Thoracolumbar,
            CurveType::Combined,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CurveType::Healthy => "healthy",
            CurveType::Thoracic => "thoracic",
            CurveType::Lumbar => "lumbar",
            CurveType::Thoracolumbar => "thoracolumbar",
            CurveType::Combined => "combined",
        }
    }

    /// Label for the curve type selector
    pub fn label(&self, language: Language) -> &'static str {
        let index = match self {
            CurveType::Healthy => 0,
            CurveType::Thoracic => 1,
            CurveType::Lumbar => 2,
            CurveType::Thoracolumbar => 3,
            CurveType::Combined => 4,
        };
        *CURVE_LABELS[index].get(language)
    }

    /// Bump displacement at normalized position `t` for amplitude `a`
    fn displacement(&self, t: f64, a: f64) -> f64 {
        match self {
            CurveType::Healthy => 0.0,
            CurveType::Thoracic => a * gauss(t, 0.38, 0.12),
            CurveType::Lumbar => a * gauss(t, 0.78, 0.12),
            CurveType::Thoracolumbar => a * gauss(t, 0.58, 0.20),
            CurveType::Combined => a * 0.90 * gauss(t, 0.33, 0.11) - a * 0.90 * gauss(t, 0.75, 0.11),
        }
    }
}

impl FromStr for CurveType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "healthy" | "normal" => Ok(CurveType::Healthy),
            "thoracic" => Ok(CurveType::Thoracic),
            "lumbar" => Ok(CurveType::Lumbar),
            "thoracolumbar" | "thoraco-lumbar" | "thoraco_lumbar" => Ok(CurveType::Thoracolumbar),
            "combined" | "s" | "double" => Ok(CurveType::Combined),
            _ => Err(Error::InvalidInput(format!("unknown curve type '{}'", s))),
        }
    }
}

impl fmt::Display for CurveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unnormalized Gaussian bump with peak 1 at `mu`
pub fn gauss(t: f64, mu: f64, sigma: f64) -> f64 {
    let z = (t - mu) / sigma;
    (-0.5 * z * z).exp()
}

/// Horizontal offset from the centre line at normalized position `t`
///
/// Healthy curves and zero amplitude are exactly zero; everything else gets
/// the bump plus a breathing sway bounded by `min(3, 0.07A)`.
pub fn curve_offset(curve: CurveType, t: f64, amplitude: f64, time_ms: u64) -> f64 {
    if curve == CurveType::Healthy || amplitude == 0.0 {
        return 0.0;
    }
    let sway = (time_ms as f64 * 0.0008 + t * 3.2).sin() * (amplitude * 0.07).min(3.0);
    curve.displacement(t, amplitude) + sway
}

/// Visualization inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSpineParams")]
pub struct SpineParams {
    severity: u8,
    curve: CurveType,
    max_severity: u8,
}

impl SpineParams {
    /// Severity is clamped to `0..=max_severity`
    pub fn new(severity: u8, curve: CurveType, max_severity: u8) -> Self {
        Self {
            severity: severity.min(max_severity),
            curve,
            max_severity,
        }
    }

    pub fn from_config(config: &SpineConfig) -> Self {
        Self::new(config.default_severity, CurveType::default(), config.max_severity)
    }

    pub fn severity(&self) -> u8 {
        self.severity
    }

    pub fn curve(&self) -> CurveType {
        self.curve
    }

    pub fn max_severity(&self) -> u8 {
        self.max_severity
    }

    pub fn set_severity(&mut self, severity: u8) {
        self.severity = severity.min(self.max_severity);
    }

    pub fn set_curve(&mut self, curve: CurveType) {
        self.curve = curve;
    }

    /// The severity slider has no effect on a healthy spine
    pub fn severity_adjustable(&self) -> bool {
        self.curve != CurveType::Healthy
    }

    /// Bump amplitude in canvas pixels
    pub fn amplitude(&self) -> f64 {
        f64::from(self.severity)
    }

    /// Angle shown in the floating indicator
    pub fn angle_label(&self) -> u8 {
        if self.curve == CurveType::Healthy {
            0
        } else {
            self.severity
        }
    }
}

#[derive(Deserialize)]
struct RawSpineParams {
    severity: u8,
    curve: CurveType,
    max_severity: u8,
}

impl From<RawSpineParams> for SpineParams {
    fn from(raw: RawSpineParams) -> Self {
        Self::new(raw.severity, raw.curve, raw.max_severity)
    }
}

impl Default for SpineParams {
    fn default() -> Self {
        Self::from_config(&SpineConfig::default())
    }
}

/// One vertebra in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertebra {
    pub x: f64,
    pub y: f64,
    /// Degrees; 180 when the spine is locally vertical
    pub rotation: f64,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpineFrame {
    pub vertebrae: Vec<Vertebra>,
    /// Polyline through all vertebrae, `M x,y L x,y ...`
    pub path: String,
    pub glow_opacity: f64,
    pub angle_label: u8,
}

impl SpineFrame {
    /// Horizontal displacement of each vertebra from the centre line
    pub fn offsets(&self) -> Vec<f64> {
        self.vertebrae.iter().map(|v| v.x - CENTER_X).collect()
    }
}

/// Vertebra rotation in degrees at normalized position `t`
///
/// Central difference over `t ± 0.002`, clamped to the span; 180 means
/// locally vertical.
pub fn vertebra_rotation(curve: CurveType, t: f64, amplitude: f64, time_ms: u64) -> f64 {
    let x_at = |t: f64| curve_offset(curve, t, amplitude, time_ms);
    let xl = x_at((t - TANGENT_DT).max(0.0));
    let xr = x_at((t + TANGENT_DT).min(1.0));
    let dy = (BOTTOM_Y - TOP_Y) * TANGENT_DT * 2.0;
    dy.atan2(xr - xl).to_degrees() + 90.0
}

/// Compute the frame for `params` at `time_ms`
pub fn render(params: &SpineParams, time_ms: u64) -> SpineFrame {
    let curve = params.curve();
    let a = params.amplitude();
    let span = BOTTOM_Y - TOP_Y;

    let mut vertebrae = Vec::with_capacity(VERTEBRA_COUNT);
    let mut segments = Vec::with_capacity(VERTEBRA_COUNT);

    for i in 0..VERTEBRA_COUNT {
        let t = i as f64 / (VERTEBRA_COUNT - 1) as f64;
        let y = TOP_Y + t * span;
        let x = CENTER_X + curve_offset(curve, t, a, time_ms);
        let rotation = vertebra_rotation(curve, t, a, time_ms);

        vertebrae.push(Vertebra { x, y, rotation });
        segments.push(format!("{}{:.1},{:.1}", if i == 0 { 'M' } else { 'L' }, x, y));
    }

    SpineFrame {
        vertebrae,
        path: segments.join(" "),
        glow_opacity: if params.severity() == 0 { 0.0 } else { 0.2 },
        angle_label: params.angle_label(),
    }
}

/// Free-running animation clock for the breathing sway
///
/// Advances by a fixed frame step while running. Stopping cancels further
/// ticks; the elapsed time is kept so a restart continues smoothly.
#[derive(Debug, Clone)]
pub struct SpineAnimation {
    time_ms: u64,
    frame_ms: u64,
    running: bool,
}

impl SpineAnimation {
    pub fn new(frame_ms: u64) -> Self {
        Self {
            time_ms: 0,
            frame_ms,
            running: false,
        }
    }

    pub fn start(&mut self) {
        if !self.running {
            debug!("Spine animation started at {}ms", self.time_ms);
            self.running = true;
        }
    }

    pub fn stop(&mut self) {
        if self.running {
            debug!("Spine animation stopped at {}ms", self.time_ms);
            self.running = false;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn time_ms(&self) -> u64 {
        self.time_ms
    }

    /// Advance one frame; `None` once stopped
    pub fn tick(&mut self) -> Option<u64> {
        if !self.running {
            return None;
        }
        self.time_ms = self.time_ms.saturating_add(self.frame_ms);
        Some(self.time_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_healthy_is_straight_at_every_severity() {
        for severity in 0..=60 {
            let params = SpineParams::new(severity, CurveType::Healthy, 60);
            for time in [0, 16, 12_345] {
                let frame = render(&params, time);
                assert_eq!(frame.vertebrae.len(), VERTEBRA_COUNT);
                assert!(frame.offsets().iter().all(|o| *o == 0.0));
                assert!(frame.vertebrae.iter().all(|v| (v.rotation - 180.0).abs() < 1e-9));
                assert_eq!(frame.angle_label, 0);
            }
        }
    }

    #[test]
    fn test_combined_has_opposite_peaks() {
        for severity in 1..=60u8 {
            let a = f64::from(severity);
            for time in [0, 1000, 5000] {
                let upper = curve_offset(CurveType::Combined, 0.33, a, time);
                let lower = curve_offset(CurveType::Combined, 0.75, a, time);
                assert!(upper > 0.0, "severity {} time {}", severity, time);
                assert!(lower < 0.0, "severity {} time {}", severity, time);
            }
        }
    }

    #[test]
    fn test_zero_severity_is_straight() {
        let frame = render(&SpineParams::new(0, CurveType::Thoracic, 60), 500);
        assert!(frame.offsets().iter().all(|o| *o == 0.0));
        assert_eq!(frame.glow_opacity, 0.0);
    }

    #[test]
    fn test_sway_is_bounded() {
        for curve in CurveType::all_variants() {
            for time in (0..10_000).step_by(160) {
                let t = 0.5;
                let still = curve.displacement(t, 60.0);
                let moving = curve_offset(*curve, t, 60.0, time);
                assert!((moving - still).abs() <= 3.0 + 1e-9);
            }
        }
    }

    #[test]
    fn test_path_format() {
        let frame = render(&SpineParams::new(30, CurveType::Healthy, 60), 0);
        assert!(frame.path.starts_with("M200.0,108.0 L200.0,132.7 "));
        assert!(frame.path.ends_with("L200.0,528.0"));
        assert_eq!(frame.path.matches('L').count(), VERTEBRA_COUNT - 1);
    }

    #[test]
    fn test_vertebrae_span() {
        let frame = render(&SpineParams::default(), 0);
        assert!((frame.vertebrae[0].y - 108.0).abs() < 1e-9);
        assert!((frame.vertebrae[VERTEBRA_COUNT - 1].y - 528.0).abs() < 1e-9);
        assert_eq!(frame.glow_opacity, 0.2);
        assert_eq!(frame.angle_label, 30);
    }

    #[test]
    fn test_deterministic() {
        let params = SpineParams::new(45, CurveType::Lumbar, 60);
        assert_eq!(render(&params, 777), render(&params, 777));
    }

    #[test]
    fn test_severity_clamped() {
        let mut params = SpineParams::new(90, CurveType::Thoracic, 60);
        assert_eq!(params.severity(), 60);
        params.set_severity(200);
        assert_eq!(params.severity(), 60);
        params.set_curve(CurveType::Healthy);
        assert!(!params.severity_adjustable());
    }

    #[test]
    fn test_deserialized_severity_is_clamped() {
        let params: SpineParams = serde_json::from_str(
            r#"{"severity": 200, "curve": "thoracic", "max_severity": 60}"#,
        )
        .unwrap();
        assert_eq!(params.severity(), 60);
        assert_eq!(params.curve(), CurveType::Thoracic);
    }

    #[test]
    fn test_rotation_follows_bump_tangent() {
        let a = 60.0;

        // Vertical at the thoracic peak, up to the small sway slope
        let peak = vertebra_rotation(CurveType::Thoracic, 0.38, a, 0);
        assert!((peak - 180.0).abs() < 1.0, "peak rotation {}", peak);

        // Opposite tilt on the two flanks of the bump
        let frame = render(&SpineParams::new(60, CurveType::Thoracic, 60), 0);
        let upper = frame.vertebrae[4].rotation;
        let lower = frame.vertebrae[9].rotation;
        assert!(upper < 170.0, "upper flank {}", upper);
        assert!(lower > 190.0, "lower flank {}", lower);

        // Matches the central difference written out by hand
        let t = 6.0 / 17.0 - 0.1;
        let dx = curve_offset(CurveType::Thoracic, t + 0.002, a, 0)
            - curve_offset(CurveType::Thoracic, t - 0.002, a, 0);
        let expected = (2.0 * 0.002 * 420.0_f64).atan2(dx).to_degrees() + 90.0;
        let actual = vertebra_rotation(CurveType::Thoracic, t, a, 0);
        assert!((actual - expected).abs() < 1e-9);
    }

    #[test]
    fn test_defaults() {
        let params = SpineParams::default();
        assert_eq!(params.severity(), 30);
        assert_eq!(params.curve(), CurveType::Combined);
    }

    #[test]
    fn test_parse_and_labels() {
        assert_eq!("Combined".parse::<CurveType>().unwrap(), CurveType::Combined);
        assert_eq!(
            "thoraco-lumbar".parse::<CurveType>().unwrap(),
            CurveType::Thoracolumbar
        );
        assert!("kyphosis".parse::<CurveType>().is_err());
        assert_eq!(CurveType::Healthy.label(Language::Ko), "정상");
        assert_eq!(CurveType::Combined.label(Language::En), "Double Major (S)");
    }

    #[test]
    fn test_animation_clock() {
        let mut anim = SpineAnimation::new(16);
        assert_eq!(anim.tick(), None);
        anim.start();
        assert_eq!(anim.tick(), Some(16));
        assert_eq!(anim.tick(), Some(32));
        anim.stop();
        assert_eq!(anim.tick(), None);
        assert_eq!(anim.time_ms(), 32);
        anim.start();
        assert_eq!(anim.tick(), Some(48));
    }
}
