use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    analysis::grouping::reference_height,
    config::ReflowConfig,
    layout::{element::Block, page::PageFrame},
};

/// How vertical coordinates relate across pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSpace {
    /// Every page starts again at its own origin. The gap across a page
    /// break is measured with the next page's text area stacked directly
    /// below the previous one's.
    #[default]
    PageRelative,
    /// Coordinates keep growing from one page to the next.
    Document,
}

/// Vertical gap between the trailing block of `previous` and the leading
/// block of `current`, and the reference height it is compared to.
pub fn boundary_gap(
    trailing: &Block,
    leading: &Block,
    previous: &PageFrame,
    current: &PageFrame,
    coordinates: CoordinateSpace,
) -> (f32, f32) {
    match coordinates {
        CoordinateSpace::PageRelative => {
            let below = previous.bottom - trailing.last_line().bbox().max.y;
            let above = leading.bbox.min.y - current.top;
            let height = trailing
                .extent_on_page(previous.page_no)
                .map_or_else(|| trailing.last_line().bbox().height(), |b| b.height());

            (below + above, reference_height(height))
        }
        CoordinateSpace::Document => (
            leading.bbox.min.y - trailing.bbox.max.y,
            reference_height(trailing.bbox.height()),
        ),
    }
}

/// Fuses the last block emitted so far with the first block of the page
/// that follows it, when both read as one paragraph split by the page break.
///
/// The pair merges when merging is enabled, the pages are consecutive, the
/// trailing block ends on `previous`, both blocks share an alignment, and the
/// gap across the break stays within `max_gap_ratio` of the reference height
/// (see [`boundary_gap`]). Only the immediate trailing/leading pair is
/// considered.
///
/// # Arguments
///
/// * `emitted` - Blocks of the pages already processed; the last one is the trailing block
/// * `previous` - Frame of the page the trailing block must end on
/// * `blocks` - Blocks of the current page; the first one is the leading block
/// * `current` - Frame of the current page
/// * `config` - Merge switch, gap ratio, coordinate space and text separator
///
/// # Returns
///
/// `true` when the leading block was removed from `blocks` and absorbed into
/// the trailing block. Under [`CoordinateSpace::PageRelative`] the trailing
/// block keeps its first-page box.
pub fn merge_boundary(
    emitted: &mut [Block],
    previous: &PageFrame,
    blocks: &mut Vec<Block>,
    current: &PageFrame,
    config: &ReflowConfig,
) -> bool {
    if !config.merge_cross_page || previous.page_no.checked_add(1) != Some(current.page_no) {
        return false;
    }

    let (Some(trailing), Some(leading)) = (emitted.last_mut(), blocks.first()) else {
        return false;
    };

    if trailing.pages.last != previous.page_no || trailing.alignment != leading.alignment {
        return false;
    }

    let (gap, reference) = boundary_gap(trailing, leading, previous, current, config.coordinates);
    let ratio = gap / reference;
    if ratio > config.max_gap_ratio {
        debug!(
            from = previous.page_no,
            to = current.page_no,
            gap,
            ratio,
            "page break separates paragraphs"
        );
        return false;
    }

    let leading = blocks.remove(0);
    debug!(
        from = previous.page_no,
        to = current.page_no,
        gap,
        ratio,
        alignment = leading.alignment.name(),
        "fusing paragraph across page break"
    );
    trailing.absorb(leading, config.separator(), config.coordinates);

    true
}
