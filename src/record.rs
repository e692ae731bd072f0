use crate::error::MalformedKind;

/// A parsed (key, reading) pair. Transient: exists only between the parser
/// and the fold into the store.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord<'a> {
    pub key: &'a str,
    pub reading: f64,
}

/// Parse one raw line into a record.
///
/// The line must contain exactly one occurrence of `sep`, a non-empty key on
/// the left and a base-10 decimal reading on the right. Pure: no side
/// effects, no allocation.
pub fn parse_record(line: &str, sep: char) -> Result<RawRecord<'_>, MalformedKind> {
    let (key, rest) = line.split_once(sep).ok_or(MalformedKind::MissingSeparator)?;

    if rest.contains(sep) {
        return Err(MalformedKind::WrongArity);
    }
    if key.is_empty() {
        return Err(MalformedKind::EmptyKey);
    }

    let reading: f64 = rest.trim().parse().map_err(|_| MalformedKind::BadReading)?;
    Ok(RawRecord { key, reading })
}
