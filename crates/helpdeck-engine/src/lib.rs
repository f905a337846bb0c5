pub mod io;
pub mod models;
pub mod parsing;
pub mod render;
pub mod session;
pub mod text;

// Re-export key types for easier usage
pub use io::*;
pub use models::document::*;
pub use parsing::{blocks::*, inline::*};
pub use render::*;
pub use session::*;
