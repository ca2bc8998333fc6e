use crate::{
    analysis::alignment::Alignment,
    config::ReflowConfig,
    consts::MIN_REFERENCE_HEIGHT,
    layout::element::{AlignedLine, Block},
};

/// Outcome of offering a line to the open block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Join {
    /// The line continues the block.
    Accept,
    /// The line continues the block, which takes over the line's alignment:
    /// its single right-aligned line was an indented opening line.
    Promote,
    /// The line opens a new block.
    Reject,
}

/// Height used as denominator of a gap ratio; zero heights become 1.
pub fn reference_height(height: f32) -> f32 {
    if height > 0.0 {
        height
    } else {
        MIN_REFERENCE_HEIGHT
    }
}

/// Decides whether `line` continues `block`.
///
/// The vertical gap to the block's most recent line must be within `tol_px`
/// or within `max_gap_ratio` of that line's height. Given an acceptable gap the
/// line joins when it shares the block's alignment or its left edge stays
/// within `indent_threshold` of the block's indent.
///
/// # Arguments
///
/// * `block` - The open block
/// * `line` - Next line in reading order
/// * `config` - Gap and indent thresholds
///
/// # Returns
///
/// * `Join::Promote` - the block holds one right-aligned line and `line` is
///   left or justified, so the block was an indented paragraph opening
/// * `Join::Accept` - `line` continues the block
/// * `Join::Reject` - `line` opens a new block
pub fn decide(block: &Block, line: &AlignedLine, config: &ReflowConfig) -> Join {
    let last = block.last_line();
    let gap = line.bbox().min.y - last.bbox().max.y;
    let reference = reference_height(last.bbox().height());

    let gap_ok = gap.abs() <= config.tol_px || gap / reference <= config.max_gap_ratio;
    if !gap_ok {
        return Join::Reject;
    }

    if block.lines().len() == 1
        && block.alignment == Alignment::Right
        && matches!(line.alignment, Alignment::Left | Alignment::Justified)
    {
        return Join::Promote;
    }

    let same_alignment = line.alignment == block.alignment;
    let indent_ok = (line.bbox().min.x - block.indent()).abs() <= config.indent_threshold;

    if same_alignment || indent_ok {
        Join::Accept
    } else {
        Join::Reject
    }
}

/// Groups one page's lines, already in reading order, into blocks.
///
/// Single forward pass: each line either joins the open block or closes it
/// and opens the next one.
pub fn group_lines(
    lines: impl IntoIterator<Item = AlignedLine>,
    config: &ReflowConfig,
) -> Vec<Block> {
    let separator = config.separator();
    let mut blocks = Vec::new();
    let mut current: Option<Block> = None;

    for line in lines {
        let Some(mut block) = current.take() else {
            current = Some(Block::open(line));
            continue;
        };

        match decide(&block, &line, config) {
            Join::Reject => {
                blocks.push(block);
                current = Some(Block::open(line));
            }
            join => {
                if join == Join::Promote || line.alignment == Alignment::Justified {
                    block.alignment = line.alignment;
                }
                block.push(line, separator);
                current = Some(block);
            }
        }
    }

    blocks.extend(current);
    blocks
}
