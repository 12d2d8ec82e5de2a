//! Chart configuration.
//!
//! Every section has defaults matching the published chart, so a host may
//! pass a partial JSON object (or nothing at all) and only override what it
//! needs:
//!
//! ```json
//! { "motion": { "duration_ms": 250 }, "tree": { "root": { "name": "Ada" } } }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, SunburstError};
use crate::layout::palette::parse_hex_color;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SunburstConfig {
    pub tree: TreeConfig,
    pub layout: LayoutConfig,
    pub style: StyleConfig,
    pub motion: MotionConfig,
    pub center_label: CenterLabelConfig,
    pub interaction: InteractionConfig,
}

impl SunburstConfig {
    /// Parse a (possibly partial) JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: SunburstConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check values that would otherwise only fail while rendering.
    pub fn validate(&self) -> Result<()> {
        if self.style.palette.is_empty() {
            return Err(SunburstError::EmptyPalette);
        }
        for color in &self.style.palette {
            parse_hex_color(color)?;
        }

        let layout = &self.layout;
        positive("layout.viewport_fraction", layout.viewport_fraction)?;
        positive("layout.ring_count", layout.ring_count)?;
        non_negative("layout.pad_angle", layout.pad_angle)?;
        non_negative("layout.ring_gap", layout.ring_gap)?;
        non_negative("layout.view_padding", layout.view_padding)?;

        positive("motion.duration_ms", self.motion.duration_ms)?;
        positive("motion.slow_duration_ms", self.motion.slow_duration_ms)?;

        let center = &self.center_label;
        positive("center_label.min_font_size", center.min_font_size)?;
        positive("center_label.max_font_size", center.max_font_size)?;
        if center.min_font_size > center.max_font_size {
            return Err(SunburstError::InvalidSetting {
                field: "center_label.min_font_size",
                reason: "must not exceed max_font_size",
            });
        }
        // The fitting loop only terminates when every step shrinks.
        if !(center.shrink_step > 0.0 && center.shrink_step < 1.0) {
            return Err(SunburstError::InvalidSetting {
                field: "center_label.shrink_step",
                reason: "must lie strictly between 0 and 1",
            });
        }
        positive("center_label.width_fraction", center.width_fraction)?;
        positive("center_label.height_fraction", center.height_fraction)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SunburstError::InvalidSetting { field, reason: "must be finite and positive" })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SunburstError::InvalidSetting { field, reason: "must be finite and not negative" })
    }
}

/// Identity of the fixed root node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootIdentity {
    pub name: String,
    pub email: Option<String>,
    pub current_role: Option<String>,
}

impl Default for RootIdentity {
    fn default() -> Self {
        Self {
            name: "John Stasko".to_string(),
            email: Some("stasko@cc.gatech.edu".to_string()),
            current_role: Some(String::new()),
        }
    }
}

/// Keywords used to find the semantic columns of the sheet.
///
/// A header matches a keyword when its normalized form (lowercase, without
/// spaces, `_` or `-`) contains the normalized keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnKeywords {
    pub name: Vec<String>,
    pub advisees: Vec<String>,
    pub email: Vec<String>,
    pub role: Vec<String>,
    pub start_year: Vec<String>,
    pub end_year: Vec<String>,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for ColumnKeywords {
    fn default() -> Self {
        Self {
            name: words(&["name"]),
            advisees: words(&["phd student", "advisee"]),
            email: words(&["email"]),
            role: words(&["role"]),
            start_year: words(&["start"]),
            end_year: words(&["completion", "end year"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub root: RootIdentity,
    pub columns: ColumnKeywords,
    /// Separator between names in the advisee cell.
    pub advisee_separator: char,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            root: RootIdentity::default(),
            columns: ColumnKeywords::default(),
            advisee_separator: ';',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Share of the smaller viewport side the chart may use.
    pub viewport_fraction: f64,
    /// Ring unit = usable size / ring_count.
    pub ring_count: f64,
    /// Upper bound of the angular pad between sibling arcs (radians).
    pub pad_angle: f64,
    /// Radial gap left between rings (pixels).
    pub ring_gap: f64,
    /// Extra room around the outermost ring in the view box.
    pub view_padding: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            viewport_fraction: 0.9,
            ring_count: 12.0,
            pad_angle: 0.007,
            ring_gap: 1.0,
            view_padding: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub base_opacity: f64,
    /// Opacity lost per ring below depth 1.
    pub depth_falloff: f64,
    /// Lower bound of the depth factor.
    pub min_depth_factor: f64,
    /// Minimum angular x radial area for a label to be shown.
    pub label_area_threshold: f64,
    /// Label font size relative to ring thickness.
    pub label_font_factor: f64,
    /// Font size assumed by label truncation, relative to ring thickness.
    pub truncate_font_factor: f64,
    /// Estimated character width relative to font size.
    pub char_width_factor: f64,
    /// Gradient stops for the depth-1 branch colors (`#rrggbb`).
    pub palette: Vec<String>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            base_opacity: 0.6,
            depth_falloff: 0.3,
            min_depth_factor: 0.3,
            label_area_threshold: 0.02,
            label_font_factor: 0.08,
            truncate_font_factor: 0.09,
            char_width_factor: 0.8,
            palette: words(&[
                "#DEDDD9", "#FFE873", "#B3B5C5", "#C2B9CA", "#C3D5C9", "#BEB9B3", "#E26C42",
                "#8EAAB8", "#DEDDD9",
            ]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub duration_ms: f64,
    /// Used when the slow modifier (alt key) is held.
    pub slow_duration_ms: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self { duration_ms: 400.0, slow_duration_ms: 1000.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CenterLabelConfig {
    pub max_font_size: f64,
    pub min_font_size: f64,
    /// Multiplicative step applied while the text does not fit.
    pub shrink_step: f64,
    /// Allowed text width as a multiple of the ring unit.
    pub width_fraction: f64,
    /// Allowed text height as a multiple of the ring unit.
    pub height_fraction: f64,
    pub font_family: String,
}

impl Default for CenterLabelConfig {
    fn default() -> Self {
        Self {
            max_font_size: 14.0,
            min_font_size: 4.0,
            shrink_step: 0.9,
            width_fraction: 1.6,
            height_fraction: 0.8,
            font_family: "sans-serif".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Viewports at most this wide use tap interaction.
    pub touch_breakpoint: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self { touch_breakpoint: 768.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let cfg = SunburstConfig::from_json(r#"{"motion": {"duration_ms": 250}}"#).unwrap();
        assert_eq!(cfg.motion.duration_ms, 250.0);
        assert_eq!(cfg.motion.slow_duration_ms, 1000.0);
        assert_eq!(cfg.tree.root.name, "John Stasko");
        assert_eq!(cfg.layout, LayoutConfig::default());
    }

    #[test]
    fn test_empty_object_is_default() {
        let cfg = SunburstConfig::from_json("{}").unwrap();
        assert_eq!(cfg, SunburstConfig::default());
    }

    #[test]
    fn test_bad_palette_rejected() {
        let err = SunburstConfig::from_json(r##"{"style": {"palette": ["#12"]}}"##).unwrap_err();
        assert!(matches!(err, SunburstError::InvalidColor(_)));

        let err = SunburstConfig::from_json(r#"{"style": {"palette": []}}"#).unwrap_err();
        assert!(matches!(err, SunburstError::EmptyPalette));
    }

    fn rejected_field(json: &str) -> &'static str {
        match SunburstConfig::from_json(json) {
            Err(SunburstError::InvalidSetting { field, .. }) => field,
            other => panic!("expected InvalidSetting for {}, got {:?}", json, other),
        }
    }

    #[test]
    fn test_shrink_step_must_shrink() {
        for step in ["1.0", "1.5", "0.0", "-0.5"] {
            let json = format!(r#"{{"center_label": {{"shrink_step": {}}}}}"#, step);
            assert_eq!(rejected_field(&json), "center_label.shrink_step");
        }
        assert!(SunburstConfig::from_json(r#"{"center_label": {"shrink_step": 0.5}}"#).is_ok());
    }

    #[test]
    fn test_font_range_checked() {
        assert_eq!(
            rejected_field(r#"{"center_label": {"min_font_size": 0}}"#),
            "center_label.min_font_size"
        );
        assert_eq!(
            rejected_field(r#"{"center_label": {"max_font_size": -2}}"#),
            "center_label.max_font_size"
        );
        assert_eq!(
            rejected_field(r#"{"center_label": {"min_font_size": 20, "max_font_size": 10}}"#),
            "center_label.min_font_size"
        );
    }

    #[test]
    fn test_layout_and_motion_must_be_positive() {
        assert_eq!(rejected_field(r#"{"layout": {"ring_count": 0}}"#), "layout.ring_count");
        assert_eq!(rejected_field(r#"{"layout": {"ring_count": -12}}"#), "layout.ring_count");
        assert_eq!(
            rejected_field(r#"{"layout": {"viewport_fraction": 0}}"#),
            "layout.viewport_fraction"
        );
        assert_eq!(rejected_field(r#"{"layout": {"pad_angle": -1}}"#), "layout.pad_angle");
        assert_eq!(rejected_field(r#"{"motion": {"duration_ms": 0}}"#), "motion.duration_ms");
        assert_eq!(
            rejected_field(r#"{"motion": {"slow_duration_ms": -1}}"#),
            "motion.slow_duration_ms"
        );

        // NaN cannot come from JSON, but a config built in code can carry one.
        let mut cfg = SunburstConfig::default();
        cfg.layout.ring_count = f64::NAN;
        assert!(matches!(
            cfg.validate(),
            Err(SunburstError::InvalidSetting { field: "layout.ring_count", .. })
        ));
        cfg.layout.ring_count = f64::INFINITY;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = SunburstConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SunburstError::Config(_)));
    }
}
