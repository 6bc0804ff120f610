//! Canonical seal preimage for deterministic block hashing.
//!
//! The self-hash of a block is computed over a canonical CBOR map of all
//! fields except the hash itself (RFC 8949 Core Deterministic Encoding:
//! integer keys in ascending order, smallest valid integer encodings,
//! definite lengths only). Identical field values therefore produce
//! identical preimage bytes on every platform, which is what makes the
//! chain tamper-evident.

/// Preimage field keys. Keys 0-23 encode as single bytes in CBOR.
mod keys {
    pub const HEIGHT: u64 = 0;
    pub const PREVIOUS_HASH: u64 = 1;
    pub const TIME: u64 = 2;
    pub const BODY: u64 = 3;
}

/// Encode the seal preimage for a block.
///
/// Pure function of its inputs; the stored hash field is excluded by
/// construction.
pub fn seal_preimage(
    height: u64,
    previous_hash: Option<&[u8; 32]>,
    time: i64,
    body: &[u8],
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(64 + body.len());

    // Map header: four entries, keys emitted in ascending order.
    encode_uint(&mut buf, 5, 4);

    encode_uint(&mut buf, 0, keys::HEIGHT);
    encode_uint(&mut buf, 0, height);

    encode_uint(&mut buf, 0, keys::PREVIOUS_HASH);
    match previous_hash {
        Some(hash) => encode_bytes(&mut buf, hash),
        None => buf.push(0xf6), // CBOR null
    }

    encode_uint(&mut buf, 0, keys::TIME);
    encode_int(&mut buf, time);

    encode_uint(&mut buf, 0, keys::BODY);
    encode_bytes(&mut buf, body);

    buf
}

/// Encode a signed integer (major types 0 and 1).
fn encode_int(buf: &mut Vec<u8>, n: i64) {
    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        encode_uint(buf, 1, (-1 - n) as u64);
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffffffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a byte string (major type 2).
fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}
