use std::collections::HashSet;

use tracing::debug;

use crate::{analysis::margin::Margins, layout::element::AlignedLine};

/// Emits one debug event per line alignment decision.
///
/// Lines are identified by their input index, so a line seen twice in the
/// same run is reported once and nothing is recorded on the line itself.
#[derive(Debug, Default)]
pub struct AlignmentLog {
    seen: HashSet<usize>,
}

impl AlignmentLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs the decision for `line`; returns `false` if it was already logged.
    pub fn record(&mut self, line: &AlignedLine, margins: &Margins) -> bool {
        if !self.seen.insert(line.line.index) {
            return false;
        }

        let bbox = line.bbox();
        debug!(
            target: "reflow_core::align",
            index = line.line.index,
            page = line.line.page,
            y = bbox.min.y,
            left_gap = bbox.min.x - margins.left,
            right_gap = margins.right - bbox.max.x,
            alignment = line.alignment.name(),
            text = %preview(&line.line.text),
            "classified line"
        );

        true
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// First 60 characters of a line's text.
fn preview(text: &str) -> &str {
    match text.char_indices().nth(60) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
