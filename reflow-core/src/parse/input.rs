use std::{io::Read, sync::LazyLock};

use glam::Vec2;
use regex::Regex;
use serde::Deserialize;
use snafu::{ResultExt, ensure};
use tracing::*;

use crate::{
    analysis::bbox::Bbox,
    error::{JsonReadSnafu, MalformedInputSnafu, ReflowError},
    layout::element::Line,
};

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Text clean-up applied while ingesting line records.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Collapse whitespace runs into one space and trim the ends.
    pub collapse_whitespace: bool,
    /// Drop control characters left over after whitespace handling.
    pub trim_control_chars: bool,
    /// Repair mojibake and similar encoding damage.
    pub fix_text: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            collapse_whitespace: true,
            trim_control_chars: false,
            fix_text: false,
        }
    }
}

impl IngestConfig {
    pub fn normalize(&self, text: &str) -> String {
        let mut text = if self.fix_text {
            plsfix::fix_text(text, None)
        } else {
            text.to_string()
        };

        if self.collapse_whitespace {
            text = WHITESPACE.replace_all(text.trim(), " ").into_owned();
        }

        if self.trim_control_chars {
            text = text.chars().filter(|c| !c.is_control()).collect();
        }

        text
    }
}

/// A line record as produced by the OCR front end.
///
/// Both `bbox: [x1, y1, x2, y2]` and the older `x, y, w, h` layout are
/// accepted, as are the front end's Spanish field names.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLine {
    #[serde(default, alias = "pagina")]
    pub page: Option<i64>,
    #[serde(default)]
    pub bbox: Option<Vec<f32>>,
    #[serde(default)]
    pub x: Option<f32>,
    #[serde(default)]
    pub y: Option<f32>,
    #[serde(default)]
    pub w: Option<f32>,
    #[serde(default)]
    pub h: Option<f32>,
    #[serde(default, alias = "texto")]
    pub text: Option<String>,
    #[serde(default)]
    pub font_size: Option<f32>,
}

impl RawLine {
    /// Checks the record and turns it into a [`Line`] with the given text.
    pub fn validate(self, index: usize, text: String) -> Result<Line, ReflowError> {
        let page = match self.page {
            Some(p) if p >= 1 && p <= u32::MAX as i64 => p as u32,
            Some(p) => {
                return MalformedInputSnafu {
                    index,
                    page: None::<u32>,
                    reason: format!("page must be a positive integer, got {p}"),
                }
                .fail();
            }
            None => {
                return MalformedInputSnafu {
                    index,
                    page: None::<u32>,
                    reason: "missing page",
                }
                .fail();
            }
        };

        let bbox = match (self.bbox, self.x, self.y, self.w, self.h) {
            (Some(corners), ..) => {
                let corners: [f32; 4] = corners.as_slice().try_into().map_err(|_| {
                    MalformedInputSnafu {
                        index,
                        page,
                        reason: format!("bbox needs 4 coordinates, got {}", corners.len()),
                    }
                    .build()
                })?;
                Bbox::from_corners(corners)
            }
            (None, Some(x), Some(y), Some(w), Some(h)) => {
                Bbox::new_from_min_size(Vec2::new(x, y), Vec2::new(w, h))
            }
            _ => {
                return MalformedInputSnafu {
                    index,
                    page,
                    reason: "missing bbox",
                }
                .fail();
            }
        };

        ensure!(
            bbox.is_well_formed(),
            MalformedInputSnafu {
                index,
                page,
                reason: format!(
                    "bbox {:?} must be finite with x1 <= x2 and y1 <= y2",
                    bbox.to_corners()
                ),
            }
        );

        if let Some(size) = self.font_size {
            ensure!(
                size.is_finite() && size > 0.0,
                MalformedInputSnafu {
                    index,
                    page,
                    reason: format!("font_size must be positive, got {size}"),
                }
            );
        }

        Ok(Line {
            index,
            page,
            bbox,
            text,
            font_size: self.font_size,
        })
    }
}

/// Validates decoded records into lines.
///
/// The first malformed record aborts the whole batch. Records whose text is
/// empty after normalisation are skipped.
pub fn ingest(records: Vec<RawLine>, config: &IngestConfig) -> Result<Vec<Line>, ReflowError> {
    let mut lines = Vec::with_capacity(records.len());

    for (index, mut record) in records.into_iter().enumerate() {
        let Some(raw_text) = record.text.take() else {
            return MalformedInputSnafu {
                index,
                page: record.page.and_then(|p| u32::try_from(p).ok()),
                reason: "missing text",
            }
            .fail();
        };

        let text = config.normalize(&raw_text);
        let line = record.validate(index, text)?;

        if line.text.is_empty() {
            debug!(index, page = line.page, "skipping line without text");
            continue;
        }

        lines.push(line);
    }

    Ok(lines)
}

/// Decodes a JSON array of line records from `reader` and validates it.
///
/// `source` names the input in error messages.
pub fn read_lines<R: Read>(
    reader: R,
    source: &str,
    config: &IngestConfig,
) -> Result<Vec<Line>, ReflowError> {
    let records: Vec<RawLine> =
        serde_json::from_reader(reader).context(JsonReadSnafu { path: source })?;
    info!("decoded {} line records from {}", records.len(), source);

    ingest(records, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(json: &str) -> Result<Vec<Line>, ReflowError> {
        read_lines(json.as_bytes(), "test", &IngestConfig::default())
    }

    #[test]
    fn test_read_bbox_records() {
        let lines = read(
            r#"[
                {"page": 1, "bbox": [10, 20, 110, 32], "text": "Erste Zeile"},
                {"page": 2, "bbox": [10, 40, 90, 52], "text": "Zweite", "font_size": 11.5}
            ]"#,
        )
        .unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].index, 0);
        assert_eq!(lines[0].page, 1);
        assert_eq!(lines[0].bbox.to_corners(), [10.0, 20.0, 110.0, 32.0]);
        assert_eq!(lines[0].text, "Erste Zeile");
        assert_eq!(lines[1].font_size, Some(11.5));
    }

    #[test]
    fn test_read_legacy_records() {
        // front end output: Spanish keys, extra fields, x/y/w/h geometry
        let lines = read(
            r#"[
                {"pagina": 3, "x": 5, "y": 6, "w": 100, "h": 12, "texto": "alt",
                 "alineacion": "izquierda", "tipo": "linea"}
            ]"#,
        )
        .unwrap();

        assert_eq!(lines[0].page, 3);
        assert_eq!(lines[0].bbox.to_corners(), [5.0, 6.0, 105.0, 18.0]);
        assert_eq!(lines[0].text, "alt");
    }

    #[test]
    fn test_malformed_records() {
        let cases = [
            (r#"[{"page": 1, "text": "no box"}]"#, "missing bbox"),
            (r#"[{"page": 1, "bbox": [0, 0, 10, 10]}]"#, "missing text"),
            (r#"[{"bbox": [0, 0, 10, 10], "text": "t"}]"#, "missing page"),
            (r#"[{"page": 0, "bbox": [0, 0, 10, 10], "text": "t"}]"#, "positive"),
            (r#"[{"page": 1, "bbox": [0, 0, 10], "text": "t"}]"#, "4 coordinates"),
            (r#"[{"page": 1, "bbox": [20, 0, 10, 10], "text": "t"}]"#, "x1 <= x2"),
            (r#"[{"page": 1, "bbox": [0, 0, 10, 10], "text": "t", "font_size": 0}]"#, "font_size"),
        ];

        for (json, expected) in cases {
            let err = read(json).unwrap_err();
            assert!(
                matches!(err, ReflowError::MalformedInput { index: 0, .. }),
                "{json}: {err}"
            );
            assert!(err.to_string().contains(expected), "{json}: {err}");
        }
    }

    #[test]
    fn test_malformed_reports_index_and_page() {
        let err = read(
            r#"[
                {"page": 1, "bbox": [0, 0, 10, 10], "text": "ok"},
                {"page": 4, "bbox": [0, 30, 10, 10], "text": "upside down"}
            ]"#,
        )
        .unwrap_err();

        match err {
            ReflowError::MalformedInput { index, page, .. } => {
                assert_eq!(index, 1);
                assert_eq!(page, Some(4));
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_invalid_json() {
        let err = read("{not json").unwrap_err();
        assert!(matches!(err, ReflowError::JsonRead { .. }));
    }

    #[test]
    fn test_blank_text_is_skipped() {
        let lines = read(
            r#"[
                {"page": 1, "bbox": [0, 0, 10, 10], "text": "   "},
                {"page": 1, "bbox": [0, 20, 10, 30], "text": "kept"}
            ]"#,
        )
        .unwrap();

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].index, 1);
    }

    #[test]
    fn test_normalize() {
        let default = IngestConfig::default();
        assert_eq!(default.normalize("  zwei \t Wörter\n"), "zwei Wörter");

        let raw = IngestConfig {
            collapse_whitespace: false,
            ..IngestConfig::default()
        };
        assert_eq!(raw.normalize(" a  b "), " a  b ");

        let strict = IngestConfig {
            trim_control_chars: true,
            ..IngestConfig::default()
        };
        assert_eq!(strict.normalize("a\u{0007}b"), "ab");
    }
}
