mod callbacks;
mod driver;
mod error_handler;

pub use callbacks::{CstBuilder, SemanticActions};
pub use driver::Parser;
pub use error_handler::ErrorHandler;
