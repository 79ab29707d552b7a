//! Decoders locating the bytes of each kind of field.
//!
//! Every decoder starts at the field's first byte and returns the number of
//! bytes the field occupies, failing if the field would extend past the end
//! of the view.

use crate::schema::{FieldSpec, Schema};

use super::{
    fspec::{self, ITEMS_PER_OCTET},
    view::{ByteView, OutOfBounds},
};

/// A present field located within a record.
#[derive(Debug, Clone, Copy)]
pub struct Located<'a> {
    /// Nesting depth: zero for record items, one for their subfields, and so
    /// on.
    pub depth: usize,
    /// Position of the field within its schema.
    pub index: usize,
    pub name: &'a str,
    pub spec: &'a FieldSpec,
    /// Offset of the field's first byte within the view.
    pub offset: usize,
    pub bytes: &'a [u8],
}

/// Decode a field of any kind at `depth`.
///
/// Subfields of compound fields are published to `o` as they are located,
/// deepest first.
pub fn decode<'a>(
    r: &ByteView<'a>,
    offset: usize,
    spec: &'a FieldSpec,
    depth: usize,
    o: &mut impl FnMut(Located<'a>),
) -> Result<usize, OutOfBounds> {
    match spec {
        FieldSpec::Fixed { length } => fixed(r, offset, *length),
        FieldSpec::Rep { length } => repetitive(r, offset, *length),
        FieldSpec::Compound { subfields } => compound(r, offset, subfields, depth, o),
        FieldSpec::Ref | FieldSpec::Spf => explicit(r, offset),
    }
}

/// Decode a fixed-length field.
pub fn fixed(r: &ByteView, offset: usize, length: usize) -> Result<usize, OutOfBounds> {
    r.slice(offset, length)?;
    Ok(length)
}

/// Decode a repetitive field: a count byte `n`, followed by `n` repetitions of
/// `length` bytes.
pub fn repetitive(r: &ByteView, offset: usize, length: usize) -> Result<usize, OutOfBounds> {
    let n = usize::from(r.byte(offset)?);

    let total = n
        .checked_mul(length)
        .and_then(|x| x.checked_add(1))
        .ok_or(OutOfBounds {
            offset,
            len: usize::MAX,
            available: r.len(),
        })?;

    r.slice(offset, total)?;
    Ok(total)
}

/// Decode an explicit-length field (reserved expansion or special purpose): a
/// length byte `n`, followed by `n` bytes.
pub fn explicit(r: &ByteView, offset: usize) -> Result<usize, OutOfBounds> {
    let total = 1 + usize::from(r.byte(offset)?);

    r.slice(offset, total)?;
    Ok(total)
}

/// Decode a compound field at `depth`: a nested FSPEC followed by the present
/// subfields, each decoded by its own rule.
///
/// Subfields past the nested FSPEC's item count are absent.
pub fn compound<'a>(
    r: &ByteView<'a>,
    offset: usize,
    subfields: &'a Schema,
    depth: usize,
    o: &mut impl FnMut(Located<'a>),
) -> Result<usize, OutOfBounds> {
    let count = fspec::decode_length(r, offset)?;
    let mut cursor = offset + count / ITEMS_PER_OCTET;

    for (index, item) in subfields.iter().enumerate().take(count) {
        if !fspec::is_present(r, offset, index)? {
            continue;
        }

        let len = decode(r, cursor, &item.spec, depth + 1, o)?;

        o(Located {
            depth: depth + 1,
            index,
            name: &item.name,
            spec: &item.spec,
            offset: cursor,
            bytes: r.slice(cursor, len)?,
        });

        cursor += len;
    }

    Ok(cursor - offset)
}
