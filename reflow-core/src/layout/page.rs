use crate::{
    analysis::{bbox::Bbox, margin::Margins},
    layout::element::{AlignedLine, Line},
};

/// Geometry summary of one page's text area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFrame {
    pub page_no: u32,
    pub margins: Margins,
    /// Smallest `y1` among the page's lines.
    pub top: f32,
    /// Largest `y2` among the page's lines.
    pub bottom: f32,
}

impl PageFrame {
    /// Frame of a page, or `None` when it has no lines.
    pub fn measure(page_no: u32, lines: &[Line], margins: Margins) -> Option<Self> {
        let extent = Bbox::union_all(lines.iter().map(|l| &l.bbox))?;

        Some(Self {
            page_no,
            margins,
            top: extent.min.y,
            bottom: extent.max.y,
        })
    }
}

/// A page's classified lines in reading order.
#[derive(Debug, Clone)]
pub struct Page {
    pub frame: PageFrame,
    pub lines: Vec<AlignedLine>,
}

impl Page {
    /// Sorts lines by `(y1, x1)`, falling back to input order on ties.
    pub fn sort_reading_order(&mut self) {
        self.lines.sort_by(|a, b| {
            a.bbox()
                .min
                .y
                .total_cmp(&b.bbox().min.y)
                .then(a.bbox().min.x.total_cmp(&b.bbox().min.x))
                .then(a.line.index.cmp(&b.line.index))
        });
    }
}
