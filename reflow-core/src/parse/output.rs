use std::io::Write;

use serde::Serialize;
use snafu::ResultExt;

use crate::{
    analysis::{alignment::Alignment, bbox::Bbox},
    error::{IoWriteSnafu, JsonWriteSnafu, ReflowError},
    layout::element::{AlignedLine, Block, BlockKind, PageSpan},
};

/// Serialized view of a [`Block`].
#[derive(Debug, Serialize)]
pub struct BlockRecord<'a> {
    pub pages: PageSpan,
    pub bbox: Bbox,
    pub text: &'a str,
    pub alignment: Alignment,
    pub kind: BlockKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<&'a [AlignedLine]>,
}

impl<'a> BlockRecord<'a> {
    pub fn new(block: &'a Block, with_lines: bool) -> Self {
        Self {
            pages: block.pages(),
            bbox: *block.bbox(),
            text: block.text(),
            alignment: block.alignment(),
            kind: block.kind(),
            lines: with_lines.then(|| block.lines()),
        }
    }
}

/// Writes `blocks` as a pretty-printed JSON array followed by a newline.
pub fn write_blocks<W: Write>(
    mut writer: W,
    blocks: &[Block],
    with_lines: bool,
    path: &str,
) -> Result<(), ReflowError> {
    let records: Vec<BlockRecord> = blocks
        .iter()
        .map(|b| BlockRecord::new(b, with_lines))
        .collect();

    serde_json::to_writer_pretty(&mut writer, &records).context(JsonWriteSnafu { path })?;
    writer.write_all(b"\n").context(IoWriteSnafu { path })?;
    writer.flush().context(IoWriteSnafu { path })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::{analysis::merge::CoordinateSpace, layout::element::Line};

    fn block(index: usize, page: u32, corners: [f32; 4], text: &str) -> Block {
        Block::open(AlignedLine::new(
            Line::new(index, page, Bbox::from_corners(corners), text),
            Alignment::Left,
        ))
    }

    fn written(blocks: &[Block], with_lines: bool) -> Value {
        let mut out = Vec::new();
        write_blocks(&mut out, blocks, with_lines, "test").unwrap();
        assert!(out.ends_with(b"\n"));
        serde_json::from_slice(&out).unwrap()
    }

    #[test]
    fn test_block_records() {
        let mut merged = block(0, 1, [50.0, 680.0, 500.0, 700.0], "über die");
        merged.absorb(
            block(1, 2, [50.0, 30.0, 500.0, 50.0], "Grenze"),
            " ",
            CoordinateSpace::PageRelative,
        );

        let value = written(&[merged], false);

        assert_eq!(
            value,
            json!([{
                "pages": [1, 2],
                "bbox": [50.0, 680.0, 500.0, 700.0],
                "text": "über die Grenze",
                "alignment": "left",
                "kind": "paragraph"
            }])
        );
    }

    #[test]
    fn test_block_records_with_lines() {
        let value = written(&[block(4, 3, [10.0, 20.0, 30.0, 40.0], "solo")], true);

        assert_eq!(value[0]["pages"], json!(3));
        assert_eq!(
            value[0]["lines"],
            json!([{
                "page": 3,
                "bbox": [10.0, 20.0, 30.0, 40.0],
                "text": "solo",
                "alignment": "left"
            }])
        );
    }

    #[test]
    fn test_non_ascii_written_verbatim() {
        let mut out = Vec::new();
        write_blocks(&mut out, &[block(0, 1, [0.0, 0.0, 1.0, 1.0], "Straße")], false, "test").unwrap();
        assert!(String::from_utf8(out).unwrap().contains("Straße"));
    }
}
