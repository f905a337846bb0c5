pub mod blocks;
pub mod inline;

pub use blocks::{Block, parse_blocks};
pub use inline::{InlineRun, format_inline};
