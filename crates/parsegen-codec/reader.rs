use parsegen_runtime::{RuntimeError, RuntimeResult};

use crate::tag::{TypeTag, FIRST_BACK_REFERENCE};

/// Decodes the stream [`crate::writer::Writer`] produces.
///
/// Strings are the only back-referenced object kind this codec currently
/// round-trips (see `Writer`'s doc comment); the registry here is a plain
/// append-only `Vec<String>` indexed by `id - FIRST_BACK_REFERENCE`, filled
/// the first time each string is decoded and consulted on every repeat.
pub struct Reader<'a> {
  buf: &'a [u8],
  pos: usize,
  strings: Vec<String>,
}

impl<'a> Reader<'a> {
  pub fn new(buf: &'a [u8]) -> Self {
    Self { buf, pos: 0, strings: Vec::new() }
  }

  fn take(&mut self, n: usize) -> RuntimeResult<&'a [u8]> {
    let end = self.pos + n;
    let slice = self.buf.get(self.pos..end).ok_or_else(|| RuntimeError::InternalInvariant("unexpected end of encoded stream".to_string()))?;
    self.pos = end;
    Ok(slice)
  }

  fn read_u32(&mut self) -> RuntimeResult<u32> {
    let bytes = self.take(4)?;
    Ok(u32::from_le_bytes(bytes.try_into().unwrap()))
  }

  fn read_str_raw(&mut self) -> RuntimeResult<String> {
    let len = self.read_u32()? as usize;
    let mut units = Vec::with_capacity(len);
    for _ in 0..len {
      units.push(u16::from_le_bytes(self.take(2)?.try_into().unwrap()));
    }
    String::from_utf16(&units).map_err(|_| RuntimeError::InternalInvariant("malformed UTF-16 string in encoded stream".to_string()))
  }

  pub fn read_version(&mut self, expected: &'static str) -> RuntimeResult<()> {
    let found = self.read_str_raw()?;
    if found != expected {
      return Err(RuntimeError::SerializationMismatch { expected, found });
    }
    Ok(())
  }

  /// Reads the next discriminant and resolves it to a [`TypeTag`] directly,
  /// erroring if it turns out to be a back-reference (callers that expect a
  /// fresh, untagged-by-reference value — like `read_int`/`read_bool` — use
  /// this).
  fn expect_tag(&mut self, expected: TypeTag) -> RuntimeResult<()> {
    let discriminant = self.read_u32()?;
    match TypeTag::from_u8(discriminant as u8) {
      Some(tag) if tag == expected => Ok(()),
      _ => Err(RuntimeError::UnknownType(discriminant as u8)),
    }
  }

  pub fn read_int(&mut self) -> RuntimeResult<u32> {
    self.expect_tag(TypeTag::Int)?;
    self.read_u32()
  }

  pub fn read_bool(&mut self) -> RuntimeResult<bool> {
    self.expect_tag(TypeTag::Bool)?;
    Ok(self.take(1)?[0] != 0)
  }

  pub fn read_char(&mut self) -> RuntimeResult<char> {
    self.expect_tag(TypeTag::Char)?;
    let len = self.take(1)?[0] as usize;
    let mut units = Vec::with_capacity(len);
    for _ in 0..len {
      units.push(u16::from_le_bytes(self.take(2)?.try_into().unwrap()));
    }
    String::from_utf16(&units)
      .ok()
      .and_then(|s| s.chars().next())
      .ok_or_else(|| RuntimeError::InternalInvariant("malformed UTF-16 char in encoded stream".to_string()))
  }

  /// Reads a string, resolving a back-reference against the registry if the
  /// discriminant turns out to be one instead of a fresh `String` tag.
  pub fn read_string(&mut self) -> RuntimeResult<String> {
    let discriminant = self.read_u32()?;
    if discriminant >= FIRST_BACK_REFERENCE {
      let index = (discriminant - FIRST_BACK_REFERENCE) as usize;
      return self.strings.get(index).cloned().ok_or_else(|| RuntimeError::InternalInvariant(format!("dangling back-reference {discriminant}")));
    }
    match TypeTag::from_u8(discriminant as u8) {
      Some(TypeTag::String) => {
        let value = self.read_str_raw()?;
        self.strings.push(value.clone());
        Ok(value)
      }
      _ => Err(RuntimeError::UnknownType(discriminant as u8)),
    }
  }

  pub fn read_encoding(&mut self) -> RuntimeResult<String> {
    self.expect_tag(TypeTag::Encoding)?;
    let name = self.read_str_raw()?;
    crate::encoding::resolve(&name)?;
    Ok(name)
  }

  pub fn peek_is_null(&mut self) -> RuntimeResult<bool> {
    let save = self.pos;
    let discriminant = self.read_u32()?;
    self.pos = save;
    Ok(discriminant == TypeTag::Null as u32)
  }

  pub fn read_null(&mut self) -> RuntimeResult<()> {
    self.expect_tag(TypeTag::Null)
  }

  pub fn enter(&mut self, tag: TypeTag) -> RuntimeResult<()> {
    self.expect_tag(tag)
  }

  /// Reads the next discriminant as a bare [`TypeTag`], for call sites that
  /// branch on which variant of a sum type follows (e.g. `ParserShift` vs
  /// `ParserReduce` vs `Eof`/Accept).
  pub fn read_type_tag(&mut self) -> RuntimeResult<TypeTag> {
    let discriminant = self.read_u32()?;
    TypeTag::from_u8(discriminant as u8).ok_or(RuntimeError::UnknownType(discriminant as u8))
  }
}
