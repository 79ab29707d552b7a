//! Internal finite-state machine for implementing decoders.
//!
//! This module is intended for applications that need fine control over
//! decoder internals, such as validating records embedded in a larger buffer.
//! See [`crate::avec`] for implementations covering common decoding patterns.
//!
//! # Architecture
//!
//! All states are represented by a non-copy token. Transition to another state
//! by calling the token's `advance` method, which returns a successor state
//! token along with any extracted data. A record is decoded in the order:
//!
//! 1. [`header::RecordHeader`] reads the category and declared length, and
//!    checks the declared length against the bytes available.
//! 2. The application resolves the category to a [`crate::schema::Schema`].
//! 3. [`header::Fspec`] counts the items in the top-level FSPEC and checks the
//!    count against the schema.
//! 4. [`items::Item`] is advanced once per schema item, in schema order.
//! 5. [`items::Done`] checks the final cursor against the declared length.
//!
//! Only the initial state, re-exported for convenience as [`Decoder`], can be
//! constructed.
//!
//! The state machine does not look up schemas, and does not guarantee the
//! same schema is supplied to every state. Both are the caller's
//! responsibility.
//!
//! The primitive decoders the states are built from are exposed in the
//! [`view`], [`fspec`] and [`field`] modules.

pub mod field;
pub mod fspec;
pub mod header;
pub mod items;
pub mod view;

/// Entrypoint to the finite-state machine.
pub type Decoder = header::RecordHeader;
