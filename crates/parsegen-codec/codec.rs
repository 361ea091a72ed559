use std::collections::{BTreeMap, BTreeSet};

use parsegen_core::CompiledLexParse;
use parsegen_runtime::types::{CharCategorizer, CharClass, Charset, CompiledLexer, CompiledParser, Dfa, DfaNode, ParserEntry, ProductionInfo, ReservedWordTable};
use parsegen_runtime::RuntimeResult;

use crate::reader::Reader;
use crate::tag::TypeTag;
use crate::writer::Writer;

/// The version string every encoded stream leads with: "the
/// tool's textual on-disk form is preserved... version header '4.5'" —
/// kept for interop even though this workspace's payload is binary, not
/// the teacher's comma-separated-integers text format.
pub const VERSION: &str = "4.5";

pub fn encode(compiled: &CompiledLexParse) -> Vec<u8> {
  let mut w = Writer::new();
  w.write_version(VERSION);
  encode_lexer(&mut w, &compiled.lexer);
  encode_parser(&mut w, &compiled.parser);
  w.into_bytes()
}

pub fn decode(bytes: &[u8]) -> RuntimeResult<CompiledLexParse> {
  let mut r = Reader::new(bytes);
  r.read_version(VERSION)?;
  let lexer = decode_lexer(&mut r)?;
  let parser = decode_parser(&mut r)?;
  Ok(CompiledLexParse { lexer, parser })
}

fn class_from_u8(b: u8) -> RuntimeResult<CharClass> {
  Ok(match b {
    0 => CharClass::Upper,
    1 => CharClass::Lower,
    2 => CharClass::Letter,
    3 => CharClass::Digit,
    4 => CharClass::Number,
    5 => CharClass::Symbol,
    6 => CharClass::Punctuation,
    7 => CharClass::WhiteSpace,
    8 => CharClass::Separator,
    _ => CharClass::Other,
  })
}

fn encode_charset(w: &mut Writer, cs: &Charset) {
  w.write_tag(TypeTag::Charset);
  w.write_int(cs.category as u32);
  w.write_char(cs.representative);
  w.write_int(cs.distinguished.len() as u32);
  for c in &cs.distinguished {
    w.write_char(*c);
  }
}

fn decode_charset(r: &mut Reader) -> RuntimeResult<Charset> {
  r.enter(TypeTag::Charset)?;
  let category = class_from_u8(r.read_int()? as u8)?;
  let representative = r.read_char()?;
  let count = r.read_int()?;
  let mut distinguished = BTreeSet::new();
  for _ in 0..count {
    distinguished.insert(r.read_char()?);
  }
  Ok(Charset::from_parts(category, representative, distinguished))
}

fn encode_reserved_words(w: &mut Writer, table: &ReservedWordTable) {
  w.write_tag(TypeTag::ResWds);
  w.write_bool(table.case_fold);
  w.write_int(table.words.len() as u32);
  for (word, class_name) in &table.words {
    w.write_string(word);
    w.write_string(class_name);
  }
}

fn decode_reserved_words(r: &mut Reader) -> RuntimeResult<ReservedWordTable> {
  r.enter(TypeTag::ResWds)?;
  let case_fold = r.read_bool()?;
  let count = r.read_int()?;
  let mut words = BTreeMap::new();
  for _ in 0..count {
    let word = r.read_string()?;
    let class_name = r.read_string()?;
    words.insert(word, class_name);
  }
  Ok(ReservedWordTable { case_fold, words })
}

fn encode_dfa(w: &mut Writer, dfa: &Dfa) {
  w.write_tag(TypeTag::Dfa);
  w.write_int(dfa.nodes.len() as u32);
  for node in &dfa.nodes {
    w.write_int(node.transitions.len() as u32);
    for (&ch, &target) in &node.transitions {
      w.write_char(ch);
      w.write_int(target);
    }
    w.write_int(node.actions.len() as u32);
    for &action in &node.actions {
      w.write_int(action);
    }
    match &node.class_name {
      Some(name) => {
        w.write_bool(true);
        w.write_string(name);
      }
      None => w.write_bool(false),
    }
    match node.reserved_words {
      Some(idx) => {
        w.write_bool(true);
        w.write_int(idx as u32);
      }
      None => w.write_bool(false),
    }
  }
  w.write_int(dfa.start);
  w.write_int(dfa.reserved_word_tables.len() as u32);
  for table in &dfa.reserved_word_tables {
    encode_reserved_words(w, table);
  }
}

fn decode_dfa(r: &mut Reader) -> RuntimeResult<Dfa> {
  r.enter(TypeTag::Dfa)?;
  let node_count = r.read_int()?;
  let mut nodes = Vec::with_capacity(node_count as usize);
  for id in 0..node_count {
    let transition_count = r.read_int()?;
    let mut transitions = BTreeMap::new();
    for _ in 0..transition_count {
      let ch = r.read_char()?;
      let target = r.read_int()?;
      transitions.insert(ch, target);
    }
    let action_count = r.read_int()?;
    let mut actions = Vec::with_capacity(action_count as usize);
    for _ in 0..action_count {
      actions.push(r.read_int()?);
    }
    let class_name = if r.read_bool()? { Some(r.read_string()?) } else { None };
    let reserved_words = if r.read_bool()? { Some(r.read_int()? as usize) } else { None };
    nodes.push(DfaNode { id, transitions, actions, class_name, reserved_words });
  }
  let start = r.read_int()?;
  let table_count = r.read_int()?;
  let mut reserved_word_tables = Vec::with_capacity(table_count as usize);
  for _ in 0..table_count {
    reserved_word_tables.push(decode_reserved_words(r)?);
  }
  Ok(Dfa { nodes, start, reserved_word_tables })
}

fn encode_lexer(w: &mut Writer, lexer: &CompiledLexer) {
  let charsets: Vec<&Charset> = lexer.categorizer.charsets().collect();
  w.write_int(charsets.len() as u32);
  for cs in charsets {
    encode_charset(w, cs);
  }
  encode_dfa(w, &lexer.dfa);
  w.write_int(lexer.starts.len() as u32);
  for (name, id) in &lexer.starts {
    w.write_string(name);
    w.write_int(*id);
  }
  w.write_bool(lexer.using_eof);
}

fn decode_lexer(r: &mut Reader) -> RuntimeResult<CompiledLexer> {
  let charset_count = r.read_int()?;
  let mut charsets = Vec::with_capacity(charset_count as usize);
  for _ in 0..charset_count {
    charsets.push(decode_charset(r)?);
  }
  let categorizer = CharCategorizer::from_charsets(charsets);
  let dfa = decode_dfa(r)?;
  let start_count = r.read_int()?;
  let mut starts = BTreeMap::new();
  for _ in 0..start_count {
    let name = r.read_string()?;
    let id = r.read_int()?;
    starts.insert(name, id);
  }
  let using_eof = r.read_bool()?;
  Ok(CompiledLexer { dfa, categorizer, starts, using_eof })
}

fn encode_entry(w: &mut Writer, entry: &ParserEntry) {
  match entry {
    ParserEntry::Shift { target, pre_action } => {
      w.write_tag(TypeTag::ParserShift);
      w.write_int(*target);
      match pre_action {
        Some(action) => {
          w.write_bool(true);
          w.write_int(*action);
        }
        None => w.write_bool(false),
      }
    }
    ParserEntry::Reduce { production, pop_depth, action } => {
      w.write_tag(TypeTag::ParserReduce);
      w.write_int(*production);
      w.write_int(*pop_depth);
      w.write_int(*action);
    }
    ParserEntry::Accept { production } => {
      w.write_tag(TypeTag::Eof);
      w.write_int(*production);
    }
  }
}

fn decode_entry(r: &mut Reader) -> RuntimeResult<ParserEntry> {
  let tag_word = r.read_type_tag()?;
  match tag_word {
    TypeTag::ParserShift => {
      let target = r.read_int()?;
      let pre_action = if r.read_bool()? { Some(r.read_int()?) } else { None };
      Ok(ParserEntry::Shift { target, pre_action })
    }
    TypeTag::ParserReduce => {
      let production = r.read_int()?;
      let pop_depth = r.read_int()?;
      let action = r.read_int()?;
      Ok(ParserEntry::Reduce { production, pop_depth, action })
    }
    TypeTag::Eof => {
      let production = r.read_int()?;
      Ok(ParserEntry::Accept { production })
    }
    other => Err(parsegen_runtime::RuntimeError::UnknownType(other as u8)),
  }
}

fn encode_parser(w: &mut Writer, parser: &CompiledParser) {
  w.write_tag(TypeTag::ParsingInfo);
  w.write_int(parser.table.len() as u32);
  for (&(state, symbol), entry) in parser.table.iter() {
    w.write_int(state);
    w.write_int(symbol);
    encode_entry(w, entry);
  }
  w.write_int(parser.start_state);
  w.write_int(parser.terminal_ids.len() as u32);
  for (name, id) in &parser.terminal_ids {
    w.write_string(name);
    w.write_int(*id);
  }
  w.write_int(parser.error_symbol_id);
  w.write_int(parser.productions.len() as u32);
  for (id, info) in &parser.productions {
    w.write_int(*id);
    w.write_tag(TypeTag::Production);
    w.write_string(&info.nonterminal_name);
    w.write_int(info.nonterminal_id);
  }
}

fn decode_parser(r: &mut Reader) -> RuntimeResult<CompiledParser> {
  r.enter(TypeTag::ParsingInfo)?;
  let entry_count = r.read_int()?;
  let mut entries = Vec::with_capacity(entry_count as usize);
  for _ in 0..entry_count {
    let state = r.read_int()?;
    let symbol = r.read_int()?;
    let entry = decode_entry(r)?;
    entries.push(((state, symbol), entry));
  }
  let table = entries.into_iter().collect();

  let start_state = r.read_int()?;
  let terminal_count = r.read_int()?;
  let mut terminal_ids = BTreeMap::new();
  for _ in 0..terminal_count {
    let name = r.read_string()?;
    let id = r.read_int()?;
    terminal_ids.insert(name, id);
  }
  let error_symbol_id = r.read_int()?;
  let production_count = r.read_int()?;
  let mut productions = BTreeMap::new();
  for _ in 0..production_count {
    let id = r.read_int()?;
    r.enter(TypeTag::Production)?;
    let nonterminal_name = r.read_string()?;
    let nonterminal_id = r.read_int()?;
    productions.insert(id, ProductionInfo { nonterminal_name, nonterminal_id });
  }

  Ok(CompiledParser { table, start_state, terminal_ids, error_symbol_id, productions })
}

#[cfg(test)]
mod test {
  use super::*;
  use parsegen_core::grammar::{Grammar, SymbolKind};
  use parsegen_core::journal::LexParseConfig;
  use parsegen_core::regex::Regex;
  use parsegen_core::LexRule;

  fn sample() -> CompiledLexParse {
    let rules = vec![
      LexRule::new(0, Regex::Char('=')).with_class("ASSIGN"),
      LexRule::new(1, Regex::Concat(vec![Regex::Char('='), Regex::Char('=')])).with_class("EQ"),
      LexRule::new(2, Regex::Plus(Box::new(Regex::Named(CharClass::Digit)))).with_class("NUM"),
    ];

    let mut g = Grammar::new();
    let e = g.declare_symbol("E", SymbolKind::Nonterminal);
    let eq = g.declare_symbol("EQ", SymbolKind::Terminal);
    let num = g.declare_symbol("NUM", SymbolKind::Terminal);
    g.add_production(e, vec![num, eq, num]);
    g.add_production(e, vec![num]);
    g.set_start_symbol(e);
    g.finish();

    let (compiled, _journal) = parsegen_core::compile(&rules, &g, LexParseConfig::new());
    compiled
  }

  #[test]
  fn round_trips_a_compiled_lexer_and_parser() {
    let compiled = sample();
    let bytes = encode(&compiled);
    let decoded = decode(&bytes).expect("decode must succeed on freshly-encoded bytes");

    assert_eq!(decoded.lexer.dfa.nodes.len(), compiled.lexer.dfa.nodes.len());
    assert_eq!(decoded.lexer.starts, compiled.lexer.starts);
    assert_eq!(decoded.parser.table.len(), compiled.parser.table.len());
    assert_eq!(decoded.parser.terminal_ids, compiled.parser.terminal_ids);
  }

  #[test]
  fn serialization_fixpoint_is_stable() {
    let compiled = sample();
    let once = encode(&compiled);
    let decoded = decode(&once).unwrap();
    let twice = encode(&decoded);
    assert_eq!(once, twice);
  }

  #[test]
  fn version_mismatch_is_rejected() {
    let mut w = Writer::new();
    w.write_version("9.9");
    let bytes = w.into_bytes();
    let err = decode(&bytes).unwrap_err();
    assert!(matches!(err, parsegen_runtime::RuntimeError::SerializationMismatch { .. }));
  }
}
