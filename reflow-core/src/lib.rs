pub mod analysis;
pub mod config;
pub mod consts;
pub mod error;
pub mod layout;
pub mod parse;

// Re-export commonly used types
pub use analysis::{alignment::Alignment, bbox::Bbox};
pub use config::{ReflowConfig, ReflowConfigBuilder, TextJoin};
pub use error::ReflowError;
pub use layout::element::{Block, BlockKind, Line, PageSpan};
pub use parse::{
    input::{IngestConfig, read_lines},
    output::{BlockRecord, write_blocks},
    parser::BlockParser,
};
