#![no_std]

//! A structural validator for ASTERIX surveillance data records.
//!
//! An ASTERIX record carries a category byte, a declared length and a
//! presence bitmap (FSPEC) selecting fields from the category's User
//! Application Profile. Astval walks a record field-by-field against that
//! profile and confirms every byte is accounted for. Field contents are
//! located, not interpreted.
//!
//! Most users should begin with the functions in the [`avec`] module, fed
//! with profiles from a [`schema::Catalog`]. If these prove insufficient,
//! consider driving the state machine in the [`sans`] module directly.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `std`: enable file-based decoding and directory catalogs (default).
//! - `serde`: enable loading profiles from JSON documents (default).
//! - `cli`: build the `astval` command-line validator.

extern crate alloc;

pub mod avec;
pub mod sans;
pub mod schema;
