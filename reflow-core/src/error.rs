use snafu::prelude::*;

use crate::config::ReflowConfigBuilderError;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ReflowError {
    #[snafu(display(
        "Malformed line record #{} (page {}): {}",
        index,
        page.map_or_else(|| "unknown".to_string(), |p| p.to_string()),
        reason
    ))]
    MalformedInput {
        index: usize,
        page: Option<u32>,
        reason: String,
    },
    #[snafu(display(
        "Page selection {:?} matches none of the pages present {:?}",
        requested,
        available
    ))]
    EmptySelection {
        requested: Vec<u32>,
        available: Vec<u32>,
    },
    #[snafu(display("Invalid configuration: {}", source))]
    Config { source: ReflowConfigBuilderError },
    #[snafu(display("Decode line records from `{}` error: {}", path, source))]
    JsonRead {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Encode blocks to `{}` error: {}", path, source))]
    JsonWrite {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Read `{}` error: {}", path, source))]
    IoRead {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Write `{}` error: {}", path, source))]
    IoWrite {
        source: std::io::Error,
        path: String,
    },
}
