mod callbacks;
mod char_reader;
mod driver;

pub use callbacks::{NullOldActions, OldActions, SymbolFactory};
pub use char_reader::CharReader;
pub use driver::Lexer;
