use std::collections::BTreeSet;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::{
    analysis::{
        alignment::{AlignmentTolerance, UnmatchedPolicy},
        classify::MedianScope,
        merge::CoordinateSpace,
    },
    consts::*,
};

/// How member line texts are joined inside a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextJoin {
    #[default]
    Space,
    Newline,
}

impl TextJoin {
    pub const fn separator(&self) -> &'static str {
        match self {
            TextJoin::Space => " ",
            TextJoin::Newline => "\n",
        }
    }
}

/// Thresholds and policies of the reconstruction.
///
/// Every field has a default; a config file only needs to name what it
/// changes.
///
/// ```
/// use reflow_core::config::ReflowConfigBuilder;
///
/// let config = ReflowConfigBuilder::default()
///     .max_gap_ratio(1.2)
///     .merge_cross_page(true)
///     .build()
///     .unwrap();
/// assert_eq!(config.tol_px, 4.0);
/// assert!(config.merge_cross_page);
/// ```
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(default, build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct ReflowConfig {
    /// Absolute vertical slack for joining lines; default margin tolerance.
    pub tol_px: f32,
    /// Left-margin tolerance, `tol_px` when unset.
    #[builder(setter(strip_option))]
    pub left_tol: Option<f32>,
    /// Right-margin tolerance, `tol_px` when unset.
    #[builder(setter(strip_option))]
    pub right_tol: Option<f32>,
    pub max_gap_ratio: f32,
    pub indent_threshold: f32,
    pub left_percentile: f32,
    pub right_percentile: f32,
    pub title_factor: f32,
    pub merge_cross_page: bool,
    pub coordinates: CoordinateSpace,
    pub unmatched: UnmatchedPolicy,
    pub median_scope: MedianScope,
    pub joiner: TextJoin,
    /// Pages to process; all pages when unset.
    #[builder(setter(into, strip_option))]
    pub pages: Option<BTreeSet<u32>>,
}

impl Default for ReflowConfig {
    fn default() -> Self {
        Self {
            tol_px: TOL_PX,
            left_tol: None,
            right_tol: None,
            max_gap_ratio: MAX_GAP_RATIO,
            indent_threshold: INDENT_THRESHOLD,
            left_percentile: LEFT_PERCENTILE,
            right_percentile: RIGHT_PERCENTILE,
            title_factor: TITLE_FACTOR,
            merge_cross_page: false,
            coordinates: CoordinateSpace::default(),
            unmatched: UnmatchedPolicy::default(),
            median_scope: MedianScope::default(),
            joiner: TextJoin::default(),
            pages: None,
        }
    }
}

impl ReflowConfig {
    /// Percentile margins, one tolerance for both margins, `left` fallback.
    pub fn canonical() -> Self {
        Self::default()
    }

    /// Thresholds tuned for high-DPI scans of printed books: extreme-edge
    /// margins, wide margin tolerances with a right side that absorbs OCR
    /// cropping, lines off both margins read as centered, and paragraphs
    /// fused across page breaks.
    pub fn scanned_book() -> Self {
        Self {
            left_tol: Some(SCANNED_LEFT_TOL),
            right_tol: Some(SCANNED_RIGHT_TOL),
            left_percentile: 0.0,
            right_percentile: 100.0,
            merge_cross_page: true,
            unmatched: UnmatchedPolicy::Center,
            ..Self::default()
        }
    }

    pub fn alignment_tolerance(&self) -> AlignmentTolerance {
        AlignmentTolerance {
            left: self.left_tol.unwrap_or(self.tol_px),
            right: self.right_tol.unwrap_or(self.tol_px),
        }
    }

    pub fn separator(&self) -> &'static str {
        self.joiner.separator()
    }
}

impl ReflowConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("left_percentile", self.left_percentile),
            ("right_percentile", self.right_percentile),
        ] {
            if let Some(p) = value {
                if !(0.0..=100.0).contains(&p) {
                    return Err(format!("{name} must lie in [0, 100], got {p}"));
                }
            }
        }

        let left = self.left_percentile.unwrap_or(LEFT_PERCENTILE);
        let right = self.right_percentile.unwrap_or(RIGHT_PERCENTILE);
        if left > right {
            return Err(format!(
                "left_percentile ({left}) must not exceed right_percentile ({right})"
            ));
        }

        for (name, value) in [
            ("tol_px", self.tol_px),
            ("indent_threshold", self.indent_threshold),
            ("left_tol", self.left_tol.flatten()),
            ("right_tol", self.right_tol.flatten()),
        ] {
            if let Some(v) = value {
                if v.is_nan() || v < 0.0 {
                    return Err(format!("{name} must be non-negative, got {v}"));
                }
            }
        }

        for (name, value) in [
            ("max_gap_ratio", self.max_gap_ratio),
            ("title_factor", self.title_factor),
        ] {
            if let Some(v) = value {
                if v.is_nan() || v <= 0.0 {
                    return Err(format!("{name} must be positive, got {v}"));
                }
            }
        }

        if let Some(Some(pages)) = &self.pages {
            if pages.contains(&0) {
                return Err("page numbers start at 1".to_string());
            }
        }

        Ok(())
    }
}
