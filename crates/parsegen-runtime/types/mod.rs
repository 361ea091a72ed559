mod charset;
mod compiled_lexer;
mod compiled_parser;
mod dfa;
mod line_tracker;
mod nfa;
mod parse_entry;
mod symbol_instance;
mod token;

pub use charset::{CharClass, Charset, CharCategorizer};
pub use compiled_lexer::CompiledLexer;
pub use compiled_parser::{CompiledParser, ProductionInfo};
pub use dfa::{Dfa, DfaId, DfaNode, ReservedWordTable};
pub use line_tracker::{LineTracker, SourceLineInfo};
pub use nfa::{Nfa, NfaId, NfaArc, TerminalTag};
pub use parse_entry::{ActionId, ParseTable, ParserEntry, ProductionId, StateId, SymbolId, Transition};
pub use symbol_instance::{Symbol, SymbolKind};
pub use token::Token;
