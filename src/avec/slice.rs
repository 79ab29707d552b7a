//! Slice-based decoder implementation.

use alloc::string::String;

use either::Either::{Left, Right};
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    sans::{
        Decoder,
        field::Located,
        header::{FspecError, HEADER_LEN, HeaderError},
        items::{DoneError, ItemError},
        view::{ByteView, OutOfBounds},
    },
    schema::SchemaSource,
};

use super::{DecodedRecord, FromFields, Options};

/// Errors occurring while decoding from a slice.
#[derive(Debug, Error)]
pub enum Error {
    /// The slice is too short to hold a record header.
    #[error("Record of {0} bytes is too short to hold a header.")]
    Truncated(usize),
    /// The declared record length differs from the slice length.
    #[error("The length field ({declared}) and the actual size ({actual}) do not match.")]
    LengthMismatch { declared: usize, actual: usize },
    /// No schema is known for the record category.
    #[error("No schema is defined for category {0}.")]
    UnknownCategory(u8),
    /// The top-level FSPEC item count differs from the schema.
    #[error(
        "The number of fields defined in the FSPEC ({fspec_items}) does not match the schema ({schema_items})."
    )]
    FspecSchemaMismatch {
        fspec_items: usize,
        schema_items: usize,
    },
    /// A span extends past the end of the record.
    #[error("Item {item} is malformed: {source}")]
    OutOfBounds { item: String, source: OutOfBounds },
    /// Decoding ran past the declared record length.
    #[error(
        "Decoded position ({cursor}) after item {item} exceeds the declared length ({declared})."
    )]
    Overrun {
        item: String,
        cursor: usize,
        declared: usize,
    },
    /// Bytes remain after the last item.
    #[error("Decoded position ({cursor}) falls short of the declared length ({declared}).")]
    Incomplete { cursor: usize, declared: usize },
}

impl From<HeaderError> for Error {
    fn from(err: HeaderError) -> Self {
        match err {
            HeaderError::LengthMismatch { declared, actual } => {
                Self::LengthMismatch { declared, actual }
            }
        }
    }
}

impl From<FspecError> for Error {
    fn from(err: FspecError) -> Self {
        match err {
            FspecError::OutOfBounds(source) => Self::OutOfBounds {
                item: "FSPEC".into(),
                source,
            },
            FspecError::SchemaMismatch {
                fspec_items,
                schema_items,
            } => Self::FspecSchemaMismatch {
                fspec_items,
                schema_items,
            },
        }
    }
}

impl From<DoneError> for Error {
    fn from(err: DoneError) -> Self {
        match err {
            DoneError::Incomplete { cursor, declared } => Self::Incomplete { cursor, declared },
        }
    }
}

/// Validate a record held in a slice against the schemas in `s`, publishing
/// located fields to a receiver.
///
/// This method is also re-exported as `astval::avec::decode_slice`.
///
/// Returns the number of bytes accounted for.
pub fn decode(
    r: &[u8],
    s: &impl SchemaSource,
    o: &mut impl FromFields,
) -> Result<usize, Error> {
    decode_with(r, s, o, Options::default())
}

/// Validate a record held in a slice, as [`decode`], with explicit options.
pub fn decode_with(
    r: &[u8],
    s: &impl SchemaSource,
    o: &mut impl FromFields,
    options: Options,
) -> Result<usize, Error> {
    let header = r
        .first_chunk::<HEADER_LEN>()
        .ok_or(Error::Truncated(r.len()))?;

    let (category, state) = Decoder::advance(*header, r.len())?;

    debug!(category, length = state.declared(), "decoding record");
    o.add_header(category, state.declared());

    let schema = s.schema(category).ok_or(Error::UnknownCategory(category))?;

    let view = ByteView::new(r);
    let (count, state) = state.advance(&view, schema.len())?;

    debug!(items = count, "decoded FSPEC");

    let mut state = Left(state);

    for item in schema {
        let current = match state {
            Left(current) => current,
            Right(_) => break,
        };

        let index = current.index();
        let mut publish = |field: Located<'_>| {
            trace!(depth = field.depth, name = field.name, offset = field.offset, "located");
            o.add_field(&field);
        };

        let (span, successor) = current
            .advance(&view, &item.spec, &mut publish)
            .map_err(|err| with_item(err, &item.name))?;

        match span {
            Some((offset, len)) => {
                let field = Located {
                    depth: 0,
                    index,
                    name: &item.name,
                    spec: &item.spec,
                    offset,
                    bytes: &r[offset..offset + len],
                };
                publish(field);
            }
            None => o.add_absent(index, &item.name),
        }

        state = successor;
    }

    let done = match state {
        Right(done) => done,
        Left(current) => {
            return Err(Error::FspecSchemaMismatch {
                fspec_items: count,
                schema_items: current.index(),
            });
        }
    };

    Ok(done.advance(options.exact_length)?)
}

/// Validate a record held in a slice, collecting its structure.
pub fn decode_record(r: &[u8], s: &impl SchemaSource) -> Result<DecodedRecord, Error> {
    let mut record = DecodedRecord::default();
    decode(r, s, &mut record)?;
    Ok(record)
}

fn with_item(err: ItemError, item: &str) -> Error {
    match err {
        ItemError::OutOfBounds(source) => Error::OutOfBounds {
            item: item.into(),
            source,
        },
        ItemError::Overrun { cursor, declared } => Error::Overrun {
            item: item.into(),
            cursor,
            declared,
        },
    }
}
