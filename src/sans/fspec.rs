//! Decoding of field specification (FSPEC) presence bitmaps.
//!
//! Each FSPEC octet carries seven presence flags, most-significant first, and
//! a field extension flag in its least-significant bit announcing another
//! octet. Item `i` is therefore found in octet `i / 7` under the mask
//! `0x80 >> (i % 7)`.

use alloc::vec::Vec;

use tartan_bitfield::bitfield;

use super::view::{ByteView, OutOfBounds};

/// Presence flags carried by a single FSPEC octet.
pub const ITEMS_PER_OCTET: usize = 7;

bitfield! {
    struct FspecOctet(u8) {
        [0] extends,
        [1..8] presence: u8,
    }
}

/// Count the items encoded by the FSPEC starting at `offset`.
///
/// The count is always a positive multiple of [`ITEMS_PER_OCTET`]; the FSPEC
/// occupies `count / ITEMS_PER_OCTET` octets. Scanning stops at the end of the
/// view, so a run of extension flags reaching past it is an error.
pub fn decode_length(r: &ByteView, offset: usize) -> Result<usize, OutOfBounds> {
    let mut octets = 0;

    loop {
        let octet = FspecOctet(r.byte(offset + octets)?);
        octets += 1;

        if !octet.extends() {
            break Ok(octets * ITEMS_PER_OCTET);
        }
    }
}

/// Check whether item `index` is flagged present in the FSPEC starting at
/// `offset`.
///
/// The caller is responsible for keeping `index` below the count returned by
/// [`decode_length`]; past it, this reads whatever follows the FSPEC.
pub fn is_present(r: &ByteView, offset: usize, index: usize) -> Result<bool, OutOfBounds> {
    let octet = FspecOctet(r.byte(offset + index / ITEMS_PER_OCTET)?);
    let mask = 0x40 >> (index % ITEMS_PER_OCTET);

    Ok(octet.presence() & mask != 0)
}

/// Encode presence flags as FSPEC octets.
///
/// The flags are padded with absent items to a multiple of
/// [`ITEMS_PER_OCTET`]. An empty sequence encodes as a single empty octet.
pub fn encode(present: impl IntoIterator<Item = bool>) -> Vec<u8> {
    let mut octets = Vec::new();

    for (i, flag) in present.into_iter().enumerate() {
        if i % ITEMS_PER_OCTET == 0 {
            if let Some(last) = octets.last_mut() {
                *last |= 0x01;
            }
            octets.push(0);
        }
        if flag {
            if let Some(last) = octets.last_mut() {
                *last |= 0x80 >> (i % ITEMS_PER_OCTET);
            }
        }
    }

    if octets.is_empty() {
        octets.push(0);
    }

    octets
}
