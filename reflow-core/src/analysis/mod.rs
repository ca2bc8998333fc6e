pub mod alignment;
pub mod bbox;
pub mod classify;
pub mod grouping;
pub mod margin;
pub mod merge;
pub mod trace;
