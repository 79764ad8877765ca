use bytes::{Bytes, BytesMut};

use crate::constants;

/// The precomputed boundary match table: the full `CRLF--<boundary>` byte
/// pattern plus a membership table over the bytes occurring anywhere in it.
///
/// Built once per [`init_with_boundary`](crate::MultipartParser::init_with_boundary)
/// call; immutable afterwards.
#[derive(Debug, Clone)]
pub(crate) struct Boundary {
    pattern: Bytes,
    chars: [bool; 256],
}

impl Boundary {
    pub(crate) fn build(boundary: &str) -> crate::Result<Boundary> {
        if boundary.is_empty() {
            return Err(crate::Error::InvalidBoundary);
        }

        let mut pattern = BytesMut::with_capacity(constants::BOUNDARY_PREFIX.len() + boundary.len());
        pattern.extend_from_slice(constants::BOUNDARY_PREFIX);
        pattern.extend_from_slice(boundary.as_bytes());

        let mut chars = [false; 256];
        for &b in pattern.iter() {
            chars[b as usize] = true;
        }

        Ok(Boundary {
            pattern: pattern.freeze(),
            chars,
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.pattern.len()
    }

    pub(crate) fn byte(&self, idx: usize) -> u8 {
        self.pattern[idx]
    }

    /// Whether `b` occurs anywhere in the pattern. Used as the fast-reject
    /// test while scanning part data.
    pub(crate) fn contains(&self, b: u8) -> bool {
        self.chars[b as usize]
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.pattern
    }
}
