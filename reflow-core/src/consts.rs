/// Absolute vertical slack, in page units, under which two lines are
/// considered touching regardless of their height.
///
/// Also the default tolerance used when matching a line edge against the
/// estimated page margins. The value 4 matches the typical jitter of OCR line
/// boxes rendered at 300–400 DPI.
pub const TOL_PX: f32 = 4.0;

/// Maximum ratio between the vertical gap separating two lines and the height
/// of the upper line for both lines to still belong to the same paragraph.
///
/// Normal leading sits well below 1.0; a blank line between paragraphs pushes
/// the ratio above 1.5 for most body fonts.
/// - Lower values (1.0-1.2): more paragraph breaks, tight line spacing only
/// - Higher values (1.5+): loosely set paragraphs survive, but headings may
///   glue onto the following paragraph
pub const MAX_GAP_RATIO: f32 = 1.3;

/// Maximum horizontal drift of a line's left edge from the block's established
/// indent for the line to continue the block when alignments disagree.
pub const INDENT_THRESHOLD: f32 = 25.0;

/// Percentile of left edges used as the page's left margin.
///
/// A low percentile rather than the minimum keeps a stray mark or a
/// mis-cropped line from dragging the margin outwards.
pub const LEFT_PERCENTILE: f32 = 5.0;

/// Percentile of right edges used as the page's right margin.
pub const RIGHT_PERCENTILE: f32 = 95.0;

/// Multiplier over the median line size above which a block is a heading.
pub const TITLE_FACTOR: f32 = 1.4;

/// Left-margin tolerance of the scanned book preset.
///
/// Scans of old print drift by a few dozen pixels between lines, so the
/// indent threshold doubles as the margin tolerance.
pub const SCANNED_LEFT_TOL: f32 = INDENT_THRESHOLD;

/// Right-margin tolerance of the scanned book preset.
///
/// OCR engines routinely crop the last glyphs of a justified line, so the
/// right edge gets a much wider slack than the left one.
pub const SCANNED_RIGHT_TOL: f32 = 50.0;

/// Height substituted for a zero-height reference line when computing gap
/// ratios.
pub const MIN_REFERENCE_HEIGHT: f32 = 1.0;
