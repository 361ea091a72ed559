/// The closed type-tag enum every encoded value leads with, unless it is a
/// back-reference (an id `>= FIRST_BACK_REFERENCE` pointing at an
/// already-encoded object instead).
///
/// Tag values are part of the on-disk format and must never be reordered —
/// appending a new variant at the end is fine, renumbering is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TypeTag {
  Null = 1,
  Int = 2,
  Bool = 3,
  Char = 4,
  String = 5,
  Hashtable = 6,
  Encoding = 7,
  UnicodeCategory = 8,
  SymType = 9,
  Charset = 10,
  TokClassDef = 11,
  Action = 12,
  Dfa = 13,
  ResWds = 14,
  ParserOldAction = 15,
  ParserSimpleAction = 16,
  ParserShift = 17,
  ParserReduce = 18,
  ParseState = 19,
  ParsingInfo = 20,
  CSymbol = 21,
  Literal = 22,
  Production = 23,
  Eof = 24,
}

/// Back-reference ids start here, so that they are never confused with a
/// tag byte even if the tag list grows.
pub const FIRST_BACK_REFERENCE: u32 = 101;

impl TypeTag {
  pub fn from_u8(b: u8) -> Option<Self> {
    Some(match b {
      1 => Self::Null,
      2 => Self::Int,
      3 => Self::Bool,
      4 => Self::Char,
      5 => Self::String,
      6 => Self::Hashtable,
      7 => Self::Encoding,
      8 => Self::UnicodeCategory,
      9 => Self::SymType,
      10 => Self::Charset,
      11 => Self::TokClassDef,
      12 => Self::Action,
      13 => Self::Dfa,
      14 => Self::ResWds,
      15 => Self::ParserOldAction,
      16 => Self::ParserSimpleAction,
      17 => Self::ParserShift,
      18 => Self::ParserReduce,
      19 => Self::ParseState,
      20 => Self::ParsingInfo,
      21 => Self::CSymbol,
      22 => Self::Literal,
      23 => Self::Production,
      24 => Self::Eof,
      _ => return None,
    })
  }
}
