use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    config::ReflowConfig,
    layout::element::{Block, BlockKind},
};

/// Population over which the median line size is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedianScope {
    #[default]
    Document,
    /// Lines of the block's first page.
    Page,
}

/// Median of `values`; the mean of the two middle values for an even count.
pub fn median(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f32::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// `true` when the text has cased letters and none of them is lowercase.
///
/// ```
/// use reflow_core::analysis::classify::is_all_caps;
/// assert!(is_all_caps("KAPITEL 3: DIE REISE"));
/// assert!(!is_all_caps("Kapitel 3"));
/// assert!(!is_all_caps("1914–1918"));
/// ```
pub fn is_all_caps(text: &str) -> bool {
    let mut cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        cased |= c.is_uppercase();
    }
    cased
}

/// Heading when the block's largest line outgrows `title_factor` times the
/// median line size, or when it is set in capitals.
pub fn classify_block(block: &Block, median_size: f32, title_factor: f32) -> BlockKind {
    let oversized = median_size > 0.0 && block.max_line_size() > title_factor * median_size;

    if oversized || is_all_caps(&block.text) {
        BlockKind::Heading
    } else {
        BlockKind::Paragraph
    }
}

/// Sets the kind of every block.
pub fn classify_blocks(blocks: &mut [Block], config: &ReflowConfig) {
    let sizes = blocks
        .iter()
        .flat_map(|b| b.lines())
        .map(|l| (l.line.page, l.line.size()));

    let medians: BTreeMap<u32, f32> = match config.median_scope {
        MedianScope::Document => {
            let all: Vec<f32> = sizes.map(|(_, size)| size).collect();
            let Some(m) = median(&all) else {
                return;
            };
            blocks.iter().map(|b| (b.pages.first, m)).collect()
        }
        MedianScope::Page => {
            let mut by_page: BTreeMap<u32, Vec<f32>> = BTreeMap::new();
            for (page, size) in sizes {
                by_page.entry(page).or_default().push(size);
            }
            by_page
                .into_iter()
                .filter_map(|(page, sizes)| median(&sizes).map(|m| (page, m)))
                .collect()
        }
    };

    for block in blocks.iter_mut() {
        let m = medians.get(&block.pages.first).copied().unwrap_or(0.0);
        block.kind = classify_block(block, m, config.title_factor);
    }
}
