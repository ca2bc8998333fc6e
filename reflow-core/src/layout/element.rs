use serde::{Serialize, Serializer};

use crate::analysis::{alignment::Alignment, bbox::Bbox, merge::CoordinateSpace};

/// A validated OCR text line.
#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct Line {
    /// Position of the record in the input, used as record identity.
    #[serde(skip)]
    pub index: usize,
    pub page: u32,
    pub bbox: Bbox,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
}

impl Line {
    pub fn new(index: usize, page: u32, bbox: Bbox, text: impl Into<String>) -> Self {
        Self {
            index,
            page,
            bbox,
            text: text.into(),
            font_size: None,
        }
    }

    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = Some(font_size);
        self
    }

    /// Typographic size of the line: the reported font size, or the box
    /// height when the front end gave none.
    pub fn size(&self) -> f32 {
        self.font_size.unwrap_or_else(|| self.bbox.height())
    }
}

/// A line together with the alignment assigned against its page margins.
#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct AlignedLine {
    #[serde(flatten)]
    pub line: Line,
    pub alignment: Alignment,
}

impl AlignedLine {
    pub fn new(line: Line, alignment: Alignment) -> Self {
        Self { line, alignment }
    }

    pub fn bbox(&self) -> &Bbox {
        &self.line.bbox
    }
}

/// Pages covered by a block. A block that was fused across page breaks
/// spans `first..=last`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageSpan {
    pub first: u32,
    pub last: u32,
}

impl PageSpan {
    pub fn single(page: u32) -> Self {
        Self {
            first: page,
            last: page,
        }
    }

    pub fn is_single(&self) -> bool {
        self.first == self.last
    }
}

impl Serialize for PageSpan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_single() {
            serializer.serialize_u32(self.first)
        } else {
            [self.first, self.last].serialize(serializer)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Heading,
    Paragraph,
}

/// A reconstructed paragraph or heading.
///
/// Always holds at least one line and `text` joins their texts in reading
/// order. `bbox` is the union of the boxes of the lines on `pages.first`, plus
/// those of later pages when the document shares one coordinate space.
#[derive(Clone, Debug)]
pub struct Block {
    pub(crate) pages: PageSpan,
    pub(crate) bbox: Bbox,
    pub(crate) text: String,
    pub(crate) alignment: Alignment,
    pub(crate) kind: BlockKind,
    lines: Vec<AlignedLine>,
    indent: f32,
}

impl Block {
    /// Opens a block from its first line.
    pub fn open(line: AlignedLine) -> Self {
        Self {
            pages: PageSpan::single(line.line.page),
            bbox: line.line.bbox,
            text: line.line.text.clone(),
            alignment: line.alignment,
            kind: BlockKind::Paragraph,
            indent: line.line.bbox.min.x,
            lines: vec![line],
        }
    }

    /// Appends a line, extending text, box and indent. Alignment is left to
    /// the caller.
    pub fn push(&mut self, line: AlignedLine, separator: &str) {
        self.text.push_str(separator);
        self.text.push_str(&line.line.text);
        self.bbox.extend(&line.line.bbox);
        self.indent = self.indent.min(line.line.bbox.min.x);
        self.lines.push(line);
    }

    /// Consumes `other` (the continuation of this block on a later page).
    ///
    /// With page-relative coordinates the continuation's box lives in another
    /// page's frame, so `bbox` keeps describing the first page only.
    pub fn absorb(&mut self, other: Block, separator: &str, coordinates: CoordinateSpace) {
        self.text.push_str(separator);
        self.text.push_str(&other.text);
        if coordinates == CoordinateSpace::Document {
            self.bbox.extend(&other.bbox);
        }
        self.indent = self.indent.min(other.indent);
        self.pages.last = self.pages.last.max(other.pages.last);
        self.lines.extend(other.lines);
    }

    pub fn pages(&self) -> PageSpan {
        self.pages
    }

    pub fn bbox(&self) -> &Bbox {
        &self.bbox
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn lines(&self) -> &[AlignedLine] {
        &self.lines
    }

    pub fn first_line(&self) -> &AlignedLine {
        &self.lines[0]
    }

    pub fn last_line(&self) -> &AlignedLine {
        &self.lines[self.lines.len() - 1]
    }

    /// Smallest left edge seen among the block's lines.
    pub fn indent(&self) -> f32 {
        self.indent
    }

    pub fn max_line_size(&self) -> f32 {
        self.lines
            .iter()
            .map(|l| l.line.size())
            .fold(f32::NEG_INFINITY, f32::max)
    }

    /// Union of the boxes of the lines lying on `page`.
    pub fn extent_on_page(&self, page: u32) -> Option<Bbox> {
        Bbox::union_all(
            self.lines
                .iter()
                .filter(|l| l.line.page == page)
                .map(AlignedLine::bbox),
        )
    }
}
