use parsegen_runtime::{RuntimeError, RuntimeResult};

/// The small set of IANA encoding names the codec recognizes without
/// pulling in a full charset-conversion dependency. Strings in this workspace are
/// always UTF-8 internally; this check only guards the `Encoding` record
/// some serialized streams carry for interop with tables produced
/// elsewhere.
const KNOWN_ENCODINGS: &[&str] = &["us-ascii", "ascii", "utf-7", "utf-8", "utf-16", "utf-16le", "utf-16be"];

pub fn resolve(name: &str) -> RuntimeResult<()> {
  let lower = name.to_ascii_lowercase();
  if KNOWN_ENCODINGS.contains(&lower.as_str()) {
    Ok(())
  } else {
    Err(RuntimeError::UnknownEncoding(name.to_string()))
  }
}
