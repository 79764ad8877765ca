use std::fmt::{self, Debug, Display, Formatter};

use derive_more::Display;

/// A set of errors that can occur while initializing the parser or driving a
/// multipart stream through it.
#[derive(Display)]
#[non_exhaustive]
pub enum Error {
    /// The boundary string handed to
    /// [`init_with_boundary`](crate::MultipartParser::init_with_boundary) was
    /// empty.
    #[display(fmt = "invalid multipart boundary")]
    InvalidBoundary,

    /// The stream violated multipart syntax. `offset` is the index of the
    /// offending byte within the chunk that was being written.
    #[display(fmt = "malformed multipart input at byte {}", offset)]
    MalformedInput { offset: usize },

    /// [`end`](crate::MultipartParser::end) was called before the closing
    /// boundary was seen; the input was truncated mid-part or mid-boundary.
    #[display(fmt = "stream ended unexpectedly: {}", state)]
    StreamEndedUnexpectedly { state: String },

    /// The `Content-Type` header is not a `multipart/*` type.
    #[display(fmt = "Content-Type is not a multipart type")]
    NoMultipart,

    /// Failed to convert the `Content-Type` to [`mime::Mime`] type.
    #[display(fmt = "Failed to convert Content-Type to `mime::Mime` type: {}", _0)]
    DecodeContentType(mime::FromStrError),

    /// No boundary found in `Content-Type` header.
    #[display(fmt = "multipart boundary not found in Content-Type")]
    NoBoundary,
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl std::error::Error for Error {}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string().eq(&other.to_string())
    }
}

impl Eq for Error {}
