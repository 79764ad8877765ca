//! A push (sans-io) parser for `multipart/form-data` and other multipart
//! streams (RFC 1521/2046).
//!
//! The parser consumes raw body bytes in arbitrarily fragmented chunks and
//! synchronously reports part boundaries, header ranges and part data to a
//! [`MultipartEvents`] sink — it performs no I/O, never buffers the whole
//! message, and a boundary split across two chunks is resolved through a
//! fixed-size lookbehind buffer.
//!
//! # Examples
//!
//! ```
//! use multipush::{MultipartEvents, MultipartParser};
//!
//! #[derive(Default)]
//! struct Collect {
//!     parts: usize,
//!     data: Vec<u8>,
//! }
//!
//! impl MultipartEvents for Collect {
//!     fn on_part_begin(&mut self) {
//!         self.parts += 1;
//!     }
//!
//!     fn on_part_data(&mut self, data: &[u8]) {
//!         self.data.extend_from_slice(data);
//!     }
//! }
//!
//! let content_type = "multipart/form-data; boundary=X-BOUNDARY";
//! let body = b"--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"my_field\"\r\n\r\nabcd\r\n--X-BOUNDARY--";
//!
//! let boundary = multipush::parse_boundary(content_type).unwrap();
//! let mut parser = MultipartParser::with_boundary(&boundary, Collect::default()).unwrap();
//!
//! // Chunks may be split at any byte offset; one write here for brevity.
//! assert_eq!(parser.write(body), body.len());
//! parser.end().unwrap();
//!
//! let collected = parser.into_events();
//! assert_eq!(collected.parts, 1);
//! assert_eq!(&collected.data, b"abcd");
//! ```

pub use error::Error;
pub use events::MultipartEvents;
pub use parser::MultipartParser;
pub use state::State;

mod boundary;
mod constants;
mod error;
mod events;
mod parser;
mod state;

/// A Result type often returned from methods that can have `multipush` errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Parses the `Content-Type` header to extract the boundary value.
///
/// Any `multipart/*` subtype is accepted.
pub fn parse_boundary<T: AsRef<str>>(content_type: T) -> crate::Result<String> {
    let m = content_type
        .as_ref()
        .parse::<mime::Mime>()
        .map_err(Error::DecodeContentType)?;

    if m.type_() != mime::MULTIPART {
        return Err(Error::NoMultipart);
    }

    m.get_param(mime::BOUNDARY)
        .map(|name| name.as_str().to_owned())
        .ok_or(Error::NoBoundary)
}
