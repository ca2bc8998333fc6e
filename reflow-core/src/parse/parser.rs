use std::{collections::BTreeMap, io::Read};

use snafu::{ResultExt, ensure};
use tracing::*;

use crate::{
    analysis::{
        alignment::classify,
        classify::classify_blocks,
        grouping::group_lines,
        margin::estimate_margins,
        merge::merge_boundary,
        trace::AlignmentLog,
    },
    config::{ReflowConfig, ReflowConfigBuilder},
    error::{ConfigSnafu, EmptySelectionSnafu, MalformedInputSnafu, ReflowError},
    layout::{
        element::{AlignedLine, Block, Line},
        page::{Page, PageFrame},
    },
    parse::input::{IngestConfig, read_lines},
};

/// Rebuilds paragraphs and headings from the OCR lines of a document.
///
/// ```
/// use reflow_core::{BlockParser, ReflowConfig};
///
/// let json = r#"[
///     {"page": 1, "bbox": [50, 100, 550, 112], "text": "Es war einmal"},
///     {"page": 1, "bbox": [50, 116, 300, 128], "text": "ein Kind."}
/// ]"#;
/// let blocks = BlockParser::new(ReflowConfig::canonical())
///     .parse_json(json.as_bytes())
///     .unwrap();
/// assert_eq!(blocks.len(), 1);
/// assert_eq!(blocks[0].text(), "Es war einmal ein Kind.");
/// ```
#[derive(Debug, Clone, Default)]
pub struct BlockParser {
    pub config: ReflowConfig,
    pub ingest: IngestConfig,
}

impl BlockParser {
    pub fn new(config: ReflowConfig) -> Self {
        Self {
            config,
            ingest: IngestConfig::default(),
        }
    }

    /// Builds the parser from a config builder, surfacing validation errors.
    pub fn from_builder(builder: &ReflowConfigBuilder) -> Result<Self, ReflowError> {
        let config = builder.build().context(ConfigSnafu)?;
        Ok(Self::new(config))
    }

    pub fn with_ingest(mut self, ingest: IngestConfig) -> Self {
        self.ingest = ingest;
        self
    }

    /// Decodes line records from `reader` and reconstructs their blocks.
    pub fn parse_json<R: Read>(&self, reader: R) -> Result<Vec<Block>, ReflowError> {
        self.parse_source(reader, "<reader>")
    }

    /// Like [`BlockParser::parse_json`], naming the input `source` in errors.
    pub fn parse_source<R: Read>(&self, reader: R, source: &str) -> Result<Vec<Block>, ReflowError> {
        let lines = read_lines(reader, source, &self.ingest)?;
        self.parse(lines)
    }

    /// Reconstructs blocks from validated lines.
    ///
    /// Pages are processed in ascending order; every page is grouped on its
    /// own and then offered to the cross-page merge against the page before
    /// it. Blocks come out ordered by first page, then top edge.
    ///
    /// # Arguments
    ///
    /// * `lines` - Lines of any number of pages, in any order
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Block>)` - Blocks with alignment and kind assigned
    /// * `Err(ReflowError::MalformedInput)` - A line has page 0 or an invalid box
    /// * `Err(ReflowError::EmptySelection)` - The page filter matches no page
    #[instrument(skip_all, fields(lines = lines.len()))]
    pub fn parse(&self, lines: Vec<Line>) -> Result<Vec<Block>, ReflowError> {
        let mut pages: BTreeMap<u32, Vec<Line>> = BTreeMap::new();
        for line in lines {
            ensure!(
                line.page >= 1,
                MalformedInputSnafu {
                    index: line.index,
                    page: line.page,
                    reason: "page numbers start at 1",
                }
            );
            ensure!(
                line.bbox.is_well_formed(),
                MalformedInputSnafu {
                    index: line.index,
                    page: line.page,
                    reason: format!(
                        "bbox {:?} must be finite with x1 <= x2 and y1 <= y2",
                        line.bbox.to_corners()
                    ),
                }
            );
            pages.entry(line.page).or_default().push(line);
        }

        let pages = self.select_pages(pages)?;
        info!("reflowing {} pages", pages.len());

        let mut log = AlignmentLog::new();
        let mut emitted: Vec<Block> = Vec::new();
        let mut previous: Option<PageFrame> = None;
        let mut merges = 0;

        for (page_no, lines) in pages {
            let Some(page) = self.prepare_page(page_no, lines, &mut log) else {
                continue;
            };

            let frame = page.frame;
            let mut blocks = group_lines(page.lines, &self.config);
            debug!(page = page_no, blocks = blocks.len(), "grouped page");

            if let Some(previous) = &previous {
                if merge_boundary(&mut emitted, previous, &mut blocks, &frame, &self.config) {
                    merges += 1;
                }
            }

            emitted.extend(blocks);
            previous = Some(frame);
        }

        classify_blocks(&mut emitted, &self.config);

        info!(
            "reconstructed {} blocks from {} lines ({} cross-page merges)",
            emitted.len(),
            log.len(),
            merges
        );

        Ok(emitted)
    }

    fn select_pages(
        &self,
        pages: BTreeMap<u32, Vec<Line>>,
    ) -> Result<BTreeMap<u32, Vec<Line>>, ReflowError> {
        let Some(requested) = &self.config.pages else {
            return Ok(pages);
        };

        let available: Vec<u32> = pages.keys().copied().collect();
        let selected: BTreeMap<u32, Vec<Line>> = pages
            .into_iter()
            .filter(|(page, _)| requested.contains(page))
            .collect();

        ensure!(
            !selected.is_empty(),
            EmptySelectionSnafu {
                requested: requested.iter().copied().collect::<Vec<_>>(),
                available,
            }
        );

        Ok(selected)
    }

    /// Measures a page, labels its lines and puts them in reading order.
    fn prepare_page(&self, page_no: u32, lines: Vec<Line>, log: &mut AlignmentLog) -> Option<Page> {
        let margins = estimate_margins(
            &lines,
            self.config.left_percentile,
            self.config.right_percentile,
        )?;
        let frame = PageFrame::measure(page_no, &lines, margins)?;

        debug!(
            page = page_no,
            lines = lines.len(),
            left = margins.left,
            right = margins.right,
            "estimated margins"
        );

        let tolerance = self.config.alignment_tolerance();
        let lines = lines
            .into_iter()
            .map(|line| {
                let alignment = classify(&line.bbox, &margins, tolerance, self.config.unmatched);
                let aligned = AlignedLine::new(line, alignment);
                log.record(&aligned, &margins);
                aligned
            })
            .collect();

        let mut page = Page { frame, lines };
        page.sort_reading_order();

        Some(page)
    }
}
