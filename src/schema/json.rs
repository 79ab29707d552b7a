//! Loading schemas from JSON profile documents.
//!
//! _Requires Cargo feature `serde`._
//!
//! A document is an object mapping field names, in FSPEC order, to
//! descriptors tagged by `"Type"`:
//!
//! ```json
//! {
//!     "I048/010": { "Type": "Fixed", "Length": 2 },
//!     "I048/130": { "Type": "Compound", "Subfields": {
//!         "SRL": { "Type": "Fixed", "Length": "1" }
//!     } },
//!     "I048/250": { "Type": "Rep", "Length": 8 },
//!     "RE": { "Type": "REF" },
//!     "SP": { "Type": "SPF" }
//! }
//! ```
//!
//! `Length` may be written as a number or a numeric string. Attributes not
//! needed to locate a field are ignored.

use alloc::string::{String, ToString};
use core::fmt;

use serde::{
    Deserialize, Deserializer,
    de::{self, MapAccess, Visitor},
};
use thiserror::Error;

use super::{Catalog, FieldSpec, Schema};

/// An error in a well-formed JSON document describing a schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A field length was zero.
    #[error("Field length must be positive.")]
    ZeroLength,
    /// A field length string was not a number.
    #[error("Invalid field length ({0:?}).")]
    InvalidLength(String),
    /// A name was used for more than one field.
    #[error("Duplicate field name ({0}).")]
    DuplicateName(String),
}

impl Schema {
    /// Parse a schema from a JSON document.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl Catalog {
    /// Parse a JSON document and add it as the schema for a category,
    /// returning any schema it replaces.
    pub fn insert_json(
        &mut self,
        category: u8,
        s: &str,
    ) -> Result<Option<Schema>, serde_json::Error> {
        Ok(self.insert(category, Schema::from_json(s)?))
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        d.deserialize_map(SchemaVisitor)
    }
}

struct SchemaVisitor;

impl<'de> Visitor<'de> for SchemaVisitor {
    type Value = Schema;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of field names to field descriptors")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Schema, A::Error> {
        let mut schema = Schema::new();

        while let Some((name, spec)) = map.next_entry::<String, FieldSpec>()? {
            if schema.get(&name).is_some() {
                return Err(de::Error::custom(SchemaError::DuplicateName(name)));
            }
            schema.push(name, spec);
        }

        Ok(schema)
    }
}

impl<'de> Deserialize<'de> for FieldSpec {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let spec = match Descriptor::deserialize(d)? {
            Descriptor::Fixed { length } => FieldSpec::Fixed {
                length: length.parse().map_err(de::Error::custom)?,
            },
            Descriptor::Rep { length } => FieldSpec::Rep {
                length: length.parse().map_err(de::Error::custom)?,
            },
            Descriptor::Compound { subfields } => FieldSpec::Compound { subfields },
            Descriptor::Ref {} => FieldSpec::Ref,
            Descriptor::Spf {} => FieldSpec::Spf,
        };

        Ok(spec)
    }
}

#[derive(Deserialize)]
#[serde(tag = "Type")]
enum Descriptor {
    Fixed {
        #[serde(rename = "Length")]
        length: Length,
    },
    Rep {
        #[serde(rename = "Length")]
        length: Length,
    },
    Compound {
        #[serde(rename = "Subfields")]
        subfields: Schema,
    },
    #[serde(rename = "REF")]
    Ref {},
    #[serde(rename = "SPF")]
    Spf {},
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Length {
    Number(u64),
    Text(String),
}

impl Length {
    fn parse(self) -> Result<usize, SchemaError> {
        let n = match self {
            Length::Number(n) => {
                usize::try_from(n).map_err(|_| SchemaError::InvalidLength(n.to_string()))?
            }
            Length::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| SchemaError::InvalidLength(s.clone()))?,
        };

        if n == 0 {
            Err(SchemaError::ZeroLength)?;
        }

        Ok(n)
    }
}
