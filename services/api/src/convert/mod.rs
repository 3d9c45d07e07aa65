//! services/api/src/convert/mod.rs
//!
//! The file-conversion pipeline: extraction stub, pure templates, and the
//! dispatcher that ties them together. Conversion here is deliberately a
//! placeholder - format-flavored text generation, not real transcoding.

pub mod dispatch;
pub mod extract;
pub mod template;

pub use dispatch::{convert_file, merge_files, split_file, ConvertError, SPLIT_PAGE_COUNT};
