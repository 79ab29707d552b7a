//! States processing the items of a record.

use either::Either::{self, Left, Right};
use thiserror::Error;

use crate::schema::FieldSpec;

use super::{
    field::{self, Located},
    fspec,
    header::HEADER_LEN,
    view::{ByteView, OutOfBounds},
};

/// An error advancing over an item.
#[derive(Debug, Error)]
pub enum ItemError {
    /// The item extends past the end of the view.
    #[error(transparent)]
    OutOfBounds(#[from] OutOfBounds),
    /// The cursor passed the declared record length.
    #[error("Decoded position ({cursor}) exceeds the declared length ({declared}).")]
    Overrun { cursor: usize, declared: usize },
}

/// State token to decode the item at the next position in the schema.
#[derive(Debug)]
pub struct Item {
    pub(super) index: usize,
    pub(super) count: usize,
    pub(super) cursor: usize,
    pub(super) declared: usize,
}

impl Item {
    /// Position of this item in the schema.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Offset at which this item would begin, if present.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Transition to another state by decoding this item of the record in `r`,
    /// described by `spec`. Subfields of compound items are published to `o`.
    ///
    /// Returns the offset and length of the item if it is present, and a
    /// successor state token.
    pub fn advance<'a>(
        self,
        r: &ByteView<'a>,
        spec: &'a FieldSpec,
        o: &mut impl FnMut(Located<'a>),
    ) -> Result<(Option<(usize, usize)>, Either<Item, Done>), ItemError> {
        let offset = self.cursor;

        let span = if fspec::is_present(r, HEADER_LEN, self.index)? {
            let len = field::decode(r, offset, spec, 0, o)?;
            Some((offset, len))
        } else {
            None
        };

        let cursor = offset + span.map_or(0, |(_, len)| len);
        if cursor > self.declared {
            Err(ItemError::Overrun {
                cursor,
                declared: self.declared,
            })?;
        }

        let index = self.index + 1;

        let successor = if index < self.count {
            Left(Item {
                index,
                cursor,
                ..self
            })
        } else {
            Right(Done {
                cursor,
                declared: self.declared,
            })
        };

        Ok((span, successor))
    }
}

/// An error completing a record.
#[derive(Debug, Error)]
pub enum DoneError {
    /// Bytes remain after the last item.
    #[error("Decoded position ({cursor}) falls short of the declared length ({declared}).")]
    Incomplete { cursor: usize, declared: usize },
}

/// State token to complete a record once every item is decoded.
#[derive(Debug)]
pub struct Done {
    cursor: usize,
    declared: usize,
}

impl Done {
    /// Complete the record, checking the final cursor against the declared
    /// length if `exact` is set.
    ///
    /// Returns the final cursor.
    pub fn advance(self, exact: bool) -> Result<usize, DoneError> {
        if exact && self.cursor != self.declared {
            Err(DoneError::Incomplete {
                cursor: self.cursor,
                declared: self.declared,
            })?;
        }

        Ok(self.cursor)
    }
}
