//! Convenience interfaces for common decoding patterns.
//!
//! The functions in this module validate records held in slices or files,
//! publishing each located field to the [`FromFields`] trait. To keep the
//! structure of a record for later use, decode into a [`DecodedRecord`].

use alloc::{string::String, vec::Vec};

use crate::sans::field::Located;

#[cfg(feature = "std")]
pub mod file;
pub mod slice;

#[cfg(feature = "std")]
pub use file::decode as decode_file;
pub use slice::decode as decode_slice;

/// Options controlling how strictly a record is validated.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    /// Require the last item to end exactly at the declared record length.
    ///
    /// When unset, a record is only rejected if decoding runs past its
    /// declared length, and trailing bytes are tolerated.
    pub exact_length: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self { exact_length: true }
    }
}

/// Receive the fields located in a record.
///
/// Fields are published once their extent is known, so the subfields of a
/// compound field arrive before the field itself.
///
/// The default implementation of each method ignores received values.
#[allow(unused_variables)]
pub trait FromFields {
    /// Add the record header.
    fn add_header(&mut self, category: u8, length: usize) {}
    /// Add a field flagged present, located at `field.offset`.
    fn add_field(&mut self, field: &Located<'_>) {}
    /// Add a record item flagged absent in the FSPEC.
    fn add_absent(&mut self, index: usize, name: &str) {}
}

/// Validate without receiving any fields.
impl FromFields for () {}

/// The structure of a validated record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedRecord {
    pub category: u8,
    pub length: usize,
    /// Present record items, in schema order.
    pub items: Vec<DecodedField>,
    /// Subfields awaiting their parent, deepest last.
    pending: Vec<(usize, DecodedField)>,
}

/// A present field of a validated record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedField {
    pub index: usize,
    pub name: String,
    pub kind: &'static str,
    pub offset: usize,
    /// The bytes of the field, including any length, count or FSPEC prefix.
    pub data: Vec<u8>,
    /// Present subfields of a compound field, in schema order.
    pub subfields: Vec<DecodedField>,
}

impl DecodedField {
    /// Find a present subfield by name.
    pub fn subfield(&self, name: &str) -> Option<&DecodedField> {
        self.subfields.iter().find(|f| f.name == name)
    }
}

impl DecodedRecord {
    /// Find a present record item by name.
    pub fn item(&self, name: &str) -> Option<&DecodedField> {
        self.items.iter().find(|f| f.name == name)
    }
}

impl FromFields for DecodedRecord {
    /// Start a new record, discarding anything kept from an earlier one.
    fn add_header(&mut self, category: u8, length: usize) {
        *self = Self {
            category,
            length,
            ..Self::default()
        };
    }

    fn add_field(&mut self, field: &Located<'_>) {
        // Children sit at the tail of the pending list, one level deeper.
        let split = self
            .pending
            .iter()
            .rposition(|(depth, _)| *depth <= field.depth)
            .map_or(0, |i| i + 1);

        let decoded = DecodedField {
            index: field.index,
            name: field.name.into(),
            kind: field.spec.kind(),
            offset: field.offset,
            data: field.bytes.to_vec(),
            subfields: self.pending.drain(split..).map(|(_, f)| f).collect(),
        };

        if field.depth == 0 {
            self.items.push(decoded);
        } else {
            self.pending.push((field.depth, decoded));
        }
    }
}
