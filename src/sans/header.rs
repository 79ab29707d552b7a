//! States processing the record header and top-level FSPEC.

use thiserror::Error;
use zerocopy::{FromBytes, byteorder::big_endian::U16};

use super::{
    fspec::{self, ITEMS_PER_OCTET},
    items::Item,
    view::{ByteView, OutOfBounds},
};

/// Size of the record header: category and declared length.
pub const HEADER_LEN: usize = 3;

/// An error advancing over a record header.
#[derive(Debug, Error)]
pub enum HeaderError {
    /// The declared record length differs from the bytes available.
    #[error("Declared length ({declared}) does not match actual size ({actual}).")]
    LengthMismatch { declared: usize, actual: usize },
}

/// State token to decode a record header.
#[derive(Debug)]
pub struct RecordHeader;

impl RecordHeader {
    /// Transition to another state by decoding a record header, given the
    /// number of bytes in the record.
    ///
    /// Returns the category, and a successor state token.
    pub fn advance(r: [u8; HEADER_LEN], actual: usize) -> Result<(u8, Fspec), HeaderError> {
        #[repr(C, packed)]
        #[derive(FromBytes)]
        struct Header {
            category: u8,
            length: U16,
        }

        let Header { category, length } = zerocopy::transmute!(r);

        let declared = usize::from(length.get());
        if declared != actual {
            Err(HeaderError::LengthMismatch { declared, actual })?;
        }

        Ok((category, Fspec { declared }))
    }
}

/// An error advancing over a top-level FSPEC.
#[derive(Debug, Error)]
pub enum FspecError {
    /// The FSPEC extends past the end of the record.
    #[error("FSPEC is unterminated: {0}")]
    OutOfBounds(#[from] OutOfBounds),
    /// The FSPEC encodes a different number of items than the schema defines.
    #[error("FSPEC encodes {fspec_items} items, but the schema defines {schema_items}.")]
    SchemaMismatch {
        fspec_items: usize,
        schema_items: usize,
    },
}

/// State token to decode the top-level FSPEC.
#[derive(Debug)]
pub struct Fspec {
    declared: usize,
}

impl Fspec {
    /// The record length declared in the header.
    pub fn declared(&self) -> usize {
        self.declared
    }

    /// Transition to another state by decoding the FSPEC following the header
    /// of the record in `r`, given the number of items in the record's schema.
    ///
    /// Returns the number of items encoded, and a successor state token for the
    /// first item.
    pub fn advance(self, r: &ByteView, schema_items: usize) -> Result<(usize, Item), FspecError> {
        let fspec_items = fspec::decode_length(r, HEADER_LEN)?;

        if fspec_items != schema_items {
            Err(FspecError::SchemaMismatch {
                fspec_items,
                schema_items,
            })?;
        }

        let item = Item {
            index: 0,
            count: fspec_items,
            cursor: HEADER_LEN + fspec_items / ITEMS_PER_OCTET,
            declared: self.declared,
        };

        Ok((fspec_items, item))
    }
}
