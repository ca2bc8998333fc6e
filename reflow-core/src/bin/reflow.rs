use std::collections::BTreeSet;
use std::error::Error;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use snafu::ResultExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

use reflow_core::analysis::merge::CoordinateSpace;
use reflow_core::error::{ConfigSnafu, IoReadSnafu, IoWriteSnafu, ReflowError};
use reflow_core::{
    BlockParser, IngestConfig, ReflowConfig, ReflowConfigBuilder, TextJoin, write_blocks,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    Canonical,
    ScannedBook,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Coordinates {
    PageRelative,
    Document,
}

impl From<Coordinates> for CoordinateSpace {
    fn from(value: Coordinates) -> Self {
        match value {
            Coordinates::PageRelative => CoordinateSpace::PageRelative,
            Coordinates::Document => CoordinateSpace::Document,
        }
    }
}

#[derive(Parser)]
#[command(name = "reflow")]
#[command(about = "Rebuild paragraphs and headings from OCR line detections")]
struct Args {
    #[arg(help = "Input JSON file with OCR line records")]
    input: String,

    #[arg(short, long, help = "Output JSON file [default: <input>_blocks.json]")]
    output: Option<String>,

    #[arg(long, num_args = 1.., help = "Only process these pages (1-based)")]
    pages: Vec<u32>,

    #[arg(long, value_enum, default_value = "canonical", help = "Threshold preset")]
    preset: Preset,

    #[arg(long, help = "Absolute vertical slack and default margin tolerance")]
    tol_px: Option<f32>,

    #[arg(long, help = "Maximum gap to line height ratio for joining lines")]
    max_gap: Option<f32>,

    #[arg(long, help = "Maximum left edge drift for joining lines")]
    indent_threshold: Option<f32>,

    #[arg(long, help = "Left margin tolerance")]
    left_tol: Option<f32>,

    #[arg(long, help = "Right margin tolerance")]
    right_tol: Option<f32>,

    #[arg(long, help = "Heading size factor over the median line size")]
    title_factor: Option<f32>,

    #[arg(long, help = "Fuse paragraphs split by a page break")]
    merge_cross_page: bool,

    #[arg(long, value_enum, help = "How vertical coordinates relate across pages")]
    coordinates: Option<Coordinates>,

    #[arg(long, help = "Join block lines with newlines instead of spaces")]
    newline: bool,

    #[arg(long, help = "Repair mis-decoded text while reading")]
    fix_text: bool,

    #[arg(long, help = "Include member lines in the output")]
    with_lines: bool,

    #[arg(long, help = "Log every alignment and merge decision")]
    debug_align: bool,

    #[arg(long, help = "Emit logs as JSON")]
    log_json: bool,
}

impl Args {
    fn config(&self) -> Result<ReflowConfig, ReflowError> {
        let preset = match self.preset {
            Preset::Canonical => ReflowConfig::canonical(),
            Preset::ScannedBook => ReflowConfig::scanned_book(),
        };

        let mut builder = ReflowConfigBuilder::default();
        builder
            .tol_px(self.tol_px.unwrap_or(preset.tol_px))
            .max_gap_ratio(self.max_gap.unwrap_or(preset.max_gap_ratio))
            .indent_threshold(self.indent_threshold.unwrap_or(preset.indent_threshold))
            .left_percentile(preset.left_percentile)
            .right_percentile(preset.right_percentile)
            .title_factor(self.title_factor.unwrap_or(preset.title_factor))
            .merge_cross_page(self.merge_cross_page || preset.merge_cross_page)
            .coordinates(self.coordinates.map_or(preset.coordinates, Into::into))
            .unmatched(preset.unmatched)
            .median_scope(preset.median_scope)
            .joiner(if self.newline {
                TextJoin::Newline
            } else {
                preset.joiner
            });

        if let Some(tol) = self.left_tol.or(preset.left_tol) {
            builder.left_tol(tol);
        }
        if let Some(tol) = self.right_tol.or(preset.right_tol) {
            builder.right_tol(tol);
        }
        if !self.pages.is_empty() {
            builder.pages(self.pages.iter().copied().collect::<BTreeSet<u32>>());
        }

        builder.build().context(ConfigSnafu)
    }

    fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(output) => PathBuf::from(output),
            None => default_output(Path::new(&self.input)),
        }
    }
}

/// `<dir>/<stem>_blocks.json` next to the input.
fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "lines".to_string(), |s| s.to_string_lossy().into_owned());
    input.with_file_name(format!("{stem}_blocks.json"))
}

fn init_tracing(args: &Args) {
    let default_filter = if args.debug_align {
        "info,reflow_core=debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if args.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(&args);

    let config = args.config()?;
    let output = args.output_path();
    let output_label = output.display().to_string();

    info!("Input: {}", args.input);
    info!("Output: {}", output_label);

    let ingest = IngestConfig {
        fix_text: args.fix_text,
        ..IngestConfig::default()
    };

    let file = File::open(&args.input).context(IoReadSnafu {
        path: args.input.as_str(),
    })?;
    let parser = BlockParser::new(config).with_ingest(ingest);
    let blocks = parser.parse_source(BufReader::new(file), &args.input)?;

    let file = File::create(&output).context(IoWriteSnafu {
        path: output_label.as_str(),
    })?;
    write_blocks(BufWriter::new(file), &blocks, args.with_lines, &output_label)?;

    info!("Wrote {} blocks to {}", blocks.len(), output_label);
    Ok(())
}
