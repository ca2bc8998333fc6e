use crate::layout::element::Line;

/// Estimated horizontal extent of a page's text area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margins {
    pub left: f32,
    pub right: f32,
}

/// Percentile of `values` using linear interpolation between closest ranks.
///
/// The rank of percentile `p` over `n` ascending values is `p / 100 * (n - 1)`;
/// a fractional rank interpolates between its two neighbours. `p` is clamped to
/// `[0, 100]`. Returns `None` for an empty slice.
///
/// # Example
/// ```
/// use reflow_core::analysis::margin::percentile;
/// let left = percentile(&[40.0, 0.0, 30.0, 10.0, 20.0], 5.0).unwrap();
/// assert!((left - 2.0).abs() < 1e-5);
/// assert_eq!(percentile(&[7.0], 95.0), Some(7.0));
/// assert_eq!(percentile(&[], 50.0), None);
/// ```
pub fn percentile(values: &[f32], p: f32) -> Option<f32> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f32::total_cmp);

    let rank = p.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f32;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f32;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Estimates a page's margins from the left edges and right edges of its lines.
///
/// The left margin is the `left_percentile` of all `x1`, the right margin the
/// `right_percentile` of all `x2`. The right margin never lies left of the left
/// margin.
///
/// # Arguments
///
/// * `lines` - All lines of one page
/// * `left_percentile` - Percentile of the left edges, in `[0, 100]`
/// * `right_percentile` - Percentile of the right edges, in `[0, 100]`
///
/// # Returns
///
/// The page margins, or `None` for a page without lines.
///
/// # Example
/// ```
/// use reflow_core::{Bbox, Line};
/// use reflow_core::analysis::margin::estimate_margins;
///
/// let lines = [
///     Line::new(0, 1, Bbox::from_corners([50.0, 0.0, 550.0, 12.0]), "full"),
///     Line::new(1, 1, Bbox::from_corners([75.0, 16.0, 300.0, 28.0]), "short"),
/// ];
/// let margins = estimate_margins(&lines, 0.0, 100.0).unwrap();
/// assert_eq!((margins.left, margins.right), (50.0, 550.0));
/// ```
pub fn estimate_margins<'a>(
    lines: impl IntoIterator<Item = &'a Line>,
    left_percentile: f32,
    right_percentile: f32,
) -> Option<Margins> {
    let (lefts, rights): (Vec<f32>, Vec<f32>) = lines
        .into_iter()
        .map(|l| (l.bbox.min.x, l.bbox.max.x))
        .unzip();

    let left = percentile(&lefts, left_percentile)?;
    let right = percentile(&rights, right_percentile)?;

    Some(Margins {
        left,
        right: right.max(left),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::bbox::Bbox;

    fn line(x1: f32, x2: f32) -> Line {
        Line::new(0, 1, Bbox::from_corners([x1, 0.0, x2, 10.0]), "t")
    }

    #[test]
    fn test_percentile_linear_interpolation() {
        let values = [0.0, 10.0, 20.0, 30.0, 40.0];

        // rank = 0.05 * 4 = 0.2 -> 0 + 10 * 0.2
        assert!((percentile(&values, 5.0).unwrap() - 2.0).abs() < 1e-5);
        // rank = 0.95 * 4 = 3.8 -> 30 + 10 * 0.8
        assert!((percentile(&values, 95.0).unwrap() - 38.0).abs() < 1e-5);
        // exact ranks
        assert_eq!(percentile(&values, 50.0), Some(20.0));
        assert_eq!(percentile(&values, 0.0), Some(0.0));
        assert_eq!(percentile(&values, 100.0), Some(40.0));
        // out of range percentiles are clamped
        assert_eq!(percentile(&values, 150.0), Some(40.0));
    }

    #[test]
    fn test_percentile_ignores_input_order() {
        let shuffled = [30.0, 0.0, 40.0, 20.0, 10.0];
        assert!((percentile(&shuffled, 5.0).unwrap() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_margins_absorb_outliers() {
        // 20 body lines between 100 and 500 and one stray mark far left
        let mut lines: Vec<Line> = (0..20).map(|_| line(100.0, 500.0)).collect();
        lines.push(line(3.0, 9.0));

        let margins = estimate_margins(&lines, 5.0, 95.0).unwrap();
        assert_eq!(margins.left, 100.0);
        assert_eq!(margins.right, 500.0);

        // min/max variant is dragged by the stray mark
        let extremes = estimate_margins(&lines, 0.0, 100.0).unwrap();
        assert_eq!(extremes.left, 3.0);
        assert_eq!(extremes.right, 500.0);
    }

    #[test]
    fn test_margins_degenerate_pages() {
        assert_eq!(estimate_margins(std::iter::empty(), 5.0, 95.0), None);

        let single = [line(42.0, 300.0)];
        assert_eq!(
            estimate_margins(&single, 5.0, 95.0),
            Some(Margins {
                left: 42.0,
                right: 300.0
            })
        );
    }

    #[test]
    fn test_margins_are_ordered() {
        let lines = [line(0.0, 5.0), line(200.0, 210.0), line(400.0, 401.0)];
        for (lp, rp) in [(5.0, 95.0), (0.0, 100.0), (100.0, 0.0), (50.0, 50.0)] {
            let margins = estimate_margins(&lines, lp, rp).unwrap();
            assert!(margins.left <= margins.right, "{lp}/{rp}: {margins:?}");
        }
    }
}
