/// Callbacks fired synchronously from [`write`](crate::MultipartParser::write)
/// as the stream is recognized.
///
/// Every method has a no-op default body, so an implementation only overrides
/// the events it cares about; `()` implements the trait as the does-nothing
/// sink. The parser owns its sink for its whole lifetime, including across
/// re-initializations.
///
/// Byte-range callbacks (`on_header_field`, `on_header_value`, `on_part_data`)
/// receive a slice that is valid only for the duration of the call: it borrows
/// either the chunk currently being written or the parser's internal
/// lookbehind buffer, never both. A value that starts in one `write` call and
/// ends in the next is reported as two separate invocations; callers that need
/// it contiguous must concatenate the fragments themselves.
///
/// A callback must not call back into `write` or `end` on the same parser
/// instance.
pub trait MultipartEvents {
    /// A new part has begun; its headers follow.
    fn on_part_begin(&mut self) {}

    /// A fragment of a header field name.
    fn on_header_field(&mut self, _data: &[u8]) {}

    /// A fragment of a header value.
    fn on_header_value(&mut self, _data: &[u8]) {}

    /// The current header line is complete.
    fn on_header_end(&mut self) {}

    /// The blank line ending the header block was seen; part data follows.
    fn on_headers_end(&mut self) {}

    /// A fragment of the current part's body.
    fn on_part_data(&mut self, _data: &[u8]) {}

    /// The current part is complete.
    fn on_part_end(&mut self) {}

    /// The closing boundary was fully recognized; the stream is done.
    fn on_end(&mut self) {}
}

impl MultipartEvents for () {}
