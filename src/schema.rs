//! User Application Profiles: the ordered field lists selected by a record's
//! category.
//!
//! A [`Schema`] is built once, either programmatically or (with the `serde`
//! feature) from a JSON document, and is only read while decoding. A
//! [`Catalog`] maps categories to schemas and may be shared between threads
//! decoding records in parallel.

use alloc::{collections::BTreeMap, string::String, vec::Vec};

#[cfg(all(feature = "std", feature = "serde"))]
pub mod dir;
#[cfg(feature = "serde")]
pub mod json;

/// The layout rule of a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSpec {
    /// A field of exactly `length` bytes.
    Fixed { length: usize },
    /// A count byte followed by that many repetitions of `length` bytes.
    Rep { length: usize },
    /// A nested FSPEC followed by the present subfields.
    Compound { subfields: Schema },
    /// Reserved expansion field: a length byte followed by that many bytes.
    Ref,
    /// Special purpose field: a length byte followed by that many bytes.
    Spf,
}

impl FieldSpec {
    /// The name of this kind of field, as written in schema documents.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldSpec::Fixed { .. } => "Fixed",
            FieldSpec::Rep { .. } => "Rep",
            FieldSpec::Compound { .. } => "Compound",
            FieldSpec::Ref => "REF",
            FieldSpec::Spf => "SPF",
        }
    }
}

/// A named entry in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaItem {
    pub name: String,
    pub spec: FieldSpec,
}

/// An ordered list of named fields.
///
/// The order is significant: item `i` is flagged by FSPEC bit `i`, and
/// present items appear in the record in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    items: Vec<SchemaItem>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, returning the extended schema.
    pub fn with(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.push(name, spec);
        self
    }

    /// Append a field.
    pub fn push(&mut self, name: impl Into<String>, spec: FieldSpec) {
        self.items.push(SchemaItem {
            name: name.into(),
            spec,
        });
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, SchemaItem> {
        self.items.iter()
    }

    /// Find a field by name.
    pub fn get(&self, name: &str) -> Option<&SchemaItem> {
        self.items.iter().find(|item| item.name == name)
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a SchemaItem;
    type IntoIter = core::slice::Iter<'a, SchemaItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Resolve a record category to its schema.
pub trait SchemaSource {
    /// Retrieve the schema for a category, if one exists.
    fn schema(&self, category: u8) -> Option<&Schema>;
}

impl SchemaSource for BTreeMap<u8, Schema> {
    fn schema(&self, category: u8) -> Option<&Schema> {
        self.get(&category)
    }
}

impl<T: SchemaSource + ?Sized> SchemaSource for &T {
    fn schema(&self, category: u8) -> Option<&Schema> {
        (**self).schema(category)
    }
}

/// A set of schemas keyed by category.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    schemas: BTreeMap<u8, Schema>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the schema for a category, returning any schema it replaces.
    pub fn insert(&mut self, category: u8, schema: Schema) -> Option<Schema> {
        self.schemas.insert(category, schema)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// The categories with a schema, in ascending order.
    pub fn categories(&self) -> impl Iterator<Item = u8> + '_ {
        self.schemas.keys().copied()
    }
}

impl SchemaSource for Catalog {
    fn schema(&self, category: u8) -> Option<&Schema> {
        self.schemas.get(&category)
    }
}
