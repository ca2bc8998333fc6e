use serde::{Deserialize, Serialize};

use crate::analysis::{bbox::Bbox, margin::Margins};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Right,
    Center,
    Justified,
}

impl Alignment {
    pub const fn name(&self) -> &str {
        match self {
            Alignment::Left => "left",
            Alignment::Right => "right",
            Alignment::Center => "center",
            Alignment::Justified => "justified",
        }
    }
}

/// What a line that reaches neither margin is labelled as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchedPolicy {
    /// `center` when both margin gaps agree within tolerance, `left` otherwise.
    #[default]
    Left,
    /// Always `center`.
    Center,
}

/// Slack allowed when matching a line edge against each margin.
///
/// The left tolerance also bounds the difference between the two gaps of a
/// centered line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentTolerance {
    pub left: f32,
    pub right: f32,
}

impl AlignmentTolerance {
    pub fn uniform(tol: f32) -> Self {
        Self {
            left: tol,
            right: tol,
        }
    }
}

/// Labels a line box relative to its page margins.
///
/// A line close to both margins is justified before anything else, so a full
/// measure line is never mistaken for a centered one.
///
/// # Arguments
///
/// * `bbox` - Box of the line to label
/// * `margins` - Left and right margins of the line's page
/// * `tol` - Slack against each margin
/// * `unmatched` - Label for a line that reaches neither margin
///
/// # Returns
///
/// * `Justified` - both edges sit on their margins
/// * `Right` - only the right edge does
/// * `Left` - only the left edge does, or neither under [`UnmatchedPolicy::Left`]
///   with unequal gaps
/// * `Center` - neither does and the policy or equal gaps call it centered
///
/// # Example
/// ```
/// use reflow_core::analysis::alignment::*;
/// use reflow_core::analysis::{bbox::Bbox, margin::Margins};
///
/// let margins = Margins { left: 0.0, right: 100.0 };
/// let tol = AlignmentTolerance::uniform(4.0);
/// let line = Bbox::from_corners([30.0, 0.0, 70.0, 10.0]);
/// assert_eq!(classify(&line, &margins, tol, UnmatchedPolicy::Left), Alignment::Center);
/// ```
pub fn classify(
    bbox: &Bbox,
    margins: &Margins,
    tol: AlignmentTolerance,
    unmatched: UnmatchedPolicy,
) -> Alignment {
    let left_gap = (bbox.min.x - margins.left).abs();
    let right_gap = (margins.right - bbox.max.x).abs();

    match (left_gap <= tol.left, right_gap <= tol.right) {
        (true, true) => Alignment::Justified,
        (false, true) => Alignment::Right,
        (true, false) => Alignment::Left,
        (false, false) => match unmatched {
            UnmatchedPolicy::Left if (left_gap - right_gap).abs() <= tol.left => {
                Alignment::Center
            }
            UnmatchedPolicy::Left => Alignment::Left,
            UnmatchedPolicy::Center => Alignment::Center,
        },
    }
}
