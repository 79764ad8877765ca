use std::fmt::{self, Debug, Formatter};

use bytes::BytesMut;

use crate::boundary::Boundary;
use crate::constants;
use crate::state::{Flags, State};
use crate::MultipartEvents;

/// A push parser for multipart streams.
///
/// The parser is fed raw body bytes through [`write`](MultipartParser::write)
/// in chunks of any size and fragmentation, and reports part boundaries,
/// header ranges and part data to its [`MultipartEvents`] sink as they are
/// recognized — single pass, constant memory, no I/O of its own. A boundary
/// match that straddles two chunks is held in a fixed lookbehind buffer until
/// it either completes or falls apart, so chunk boundaries never change what
/// is reported, only how it is fragmented.
///
/// One instance parses one stream; instances share no state, so concurrent
/// streams each get their own parser. `write` must run to completion before
/// the next `write` or [`end`](MultipartParser::end) call on the same
/// instance, and callbacks must not re-enter the parser.
///
/// # Examples
///
/// ```
/// use multipush::{MultipartEvents, MultipartParser};
///
/// #[derive(Default)]
/// struct Collect {
///     data: Vec<u8>,
/// }
///
/// impl MultipartEvents for Collect {
///     fn on_part_data(&mut self, data: &[u8]) {
///         self.data.extend_from_slice(data);
///     }
/// }
///
/// let body = b"--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"my_field\"\r\n\r\nabcd\r\n--X-BOUNDARY--";
/// let mut parser = MultipartParser::with_boundary("X-BOUNDARY", Collect::default()).unwrap();
/// assert_eq!(parser.write(body), body.len());
/// parser.end().unwrap();
/// assert_eq!(&parser.into_events().data, b"abcd");
/// ```
pub struct MultipartParser<E> {
    events: E,
    boundary: Option<Boundary>,
    lookbehind: BytesMut,
    state: State,
    index: usize,
    flags: Flags,
    header_field_mark: Option<usize>,
    header_value_mark: Option<usize>,
    part_data_mark: Option<usize>,
}

impl Default for MultipartParser<()> {
    fn default() -> Self {
        MultipartParser::new(())
    }
}

impl<E: MultipartEvents> MultipartParser<E> {
    /// Creates an uninitialized parser around the given event sink.
    ///
    /// The parser consumes nothing until
    /// [`init_with_boundary`](MultipartParser::init_with_boundary) is called.
    pub fn new(events: E) -> MultipartParser<E> {
        MultipartParser {
            events,
            boundary: None,
            lookbehind: BytesMut::new(),
            state: State::Uninitialized,
            index: 0,
            flags: Flags::default(),
            header_field_mark: None,
            header_value_mark: None,
            part_data_mark: None,
        }
    }

    /// Creates a parser and initializes it with `boundary` in one step.
    pub fn with_boundary(boundary: &str, events: E) -> crate::Result<MultipartParser<E>> {
        let mut parser = MultipartParser::new(events);
        parser.init_with_boundary(boundary)?;
        Ok(parser)
    }

    /// Builds the boundary match table for `boundary` (without the leading
    /// `--`, i.e. the value of the `boundary` parameter of the `Content-Type`
    /// header) and resets the parser to its initial state.
    ///
    /// Re-initializing fully resets the derived state — match cursor, flags,
    /// lookbehind — but keeps the event sink. An empty boundary fails with
    /// [`Error::InvalidBoundary`](crate::Error::InvalidBoundary) and leaves
    /// the instance uninitialized.
    pub fn init_with_boundary(&mut self, boundary: &str) -> crate::Result<()> {
        self.boundary = None;
        self.state = State::Uninitialized;
        self.index = 0;
        self.flags = Flags::default();
        self.lookbehind = BytesMut::new();
        self.header_field_mark = None;
        self.header_value_mark = None;
        self.part_data_mark = None;

        let boundary = Boundary::build(boundary)?;

        #[cfg(feature = "log")]
        log::trace!("multipart parser initialized, {} byte boundary pattern", boundary.len());

        let mut lookbehind = BytesMut::with_capacity(boundary.len() + constants::LOOKBEHIND_EXTRA);
        lookbehind.resize(boundary.len() + constants::LOOKBEHIND_EXTRA, 0);

        self.lookbehind = lookbehind;
        self.boundary = Some(boundary);
        self.state = State::Start;

        Ok(())
    }

    /// Drives the state machine over `buf` and returns the number of bytes
    /// consumed.
    ///
    /// On success this is `buf.len()`. A shorter count is the index of the
    /// byte that violated multipart syntax; the parser is then stuck in a
    /// non-recoverable error state and further writes consume nothing. An
    /// uninitialized parser also consumes nothing.
    pub fn write(&mut self, buf: &[u8]) -> usize {
        let len = buf.len();
        let boundary = match self.boundary.clone() {
            Some(boundary) => boundary,
            None => return 0,
        };
        let boundary_len = boundary.len();

        let mut state = self.state;
        let mut index = self.index;
        let mut flags = self.flags;
        let mut i = 0;

        while i < len {
            let mut c = buf[i];

            match state {
                State::Uninitialized | State::ParserError => return i,
                State::Start => {
                    // The CRLF before the very first boundary is optional, so
                    // matching starts past it; a mismatch below retries the
                    // byte against the pattern's CR.
                    index = 2;
                    state = State::StartBoundary;
                    continue;
                }
                State::StartBoundary => {
                    if index == boundary_len {
                        if c == constants::HYPHEN {
                            flags.last_boundary = true;
                        } else if c != constants::CR {
                            return self.syntax_error(i);
                        }
                        index += 1;
                    } else if index == boundary_len + 1 {
                        if flags.last_boundary && c == constants::HYPHEN {
                            self.events.on_end();
                            state = State::End;
                        } else if !flags.last_boundary && c == constants::LF {
                            index = 0;
                            flags = Flags::default();
                            self.events.on_part_begin();
                            state = State::HeaderFieldStart;
                        } else {
                            return self.syntax_error(i);
                        }
                    } else if c == boundary.byte(index) {
                        index += 1;
                    } else {
                        index = usize::from(c == constants::CR);
                    }
                }
                State::HeaderFieldStart => {
                    state = State::HeaderField;
                    self.header_field_mark = Some(i);
                    index = 0;
                    continue;
                }
                State::HeaderField => {
                    if c == constants::CR {
                        // Blank line: the header block is over. Whatever was
                        // marked as a field name is discarded unreported.
                        self.header_field_mark = None;
                        state = State::HeadersAlmostDone;
                    } else {
                        index += 1;
                        if c == constants::HYPHEN {
                            // allowed in header names
                        } else if c == constants::COLON {
                            if index == 1 {
                                // empty header field name
                                return self.syntax_error(i);
                            }
                            if let Some(mark) = self.header_field_mark.take() {
                                if mark != i {
                                    self.events.on_header_field(&buf[mark..i]);
                                }
                            }
                            state = State::HeaderValueStart;
                        } else if !(c | 0x20).is_ascii_lowercase() {
                            return self.syntax_error(i);
                        }
                    }
                }
                State::HeaderValueStart => {
                    if c != constants::SPACE {
                        self.header_value_mark = Some(i);
                        state = State::HeaderValue;
                        continue;
                    }
                }
                State::HeaderValue => {
                    if c == constants::CR {
                        if let Some(mark) = self.header_value_mark.take() {
                            if mark != i {
                                self.events.on_header_value(&buf[mark..i]);
                            }
                        }
                        self.events.on_header_end();
                        state = State::HeaderValueAlmostDone;
                    } else {
                        // Value bytes need no per-byte work, jump to the next CR.
                        match memchr::memchr(constants::CR, &buf[i + 1..]) {
                            Some(pos) => {
                                i += 1 + pos;
                                continue;
                            }
                            None => break,
                        }
                    }
                }
                State::HeaderValueAlmostDone => {
                    if c != constants::LF {
                        return self.syntax_error(i);
                    }
                    state = State::HeaderFieldStart;
                }
                State::HeadersAlmostDone => {
                    if c != constants::LF {
                        return self.syntax_error(i);
                    }
                    self.events.on_headers_end();
                    state = State::PartDataStart;
                }
                State::PartDataStart => {
                    // The CRLF that closed the header block doubles as the
                    // leading CRLF of the next delimiter, so the candidate
                    // starts two pattern bytes in. No data mark yet: if the
                    // part is nothing but a delimiter, no data event fires.
                    state = State::PartData;
                    index = 2;
                    flags.implied_crlf = true;
                    continue;
                }
                State::PartData => {
                    let prev_index = index;

                    if index == 0 {
                        // Skip ahead over bytes that occur nowhere in the
                        // boundary pattern; none of them can begin a match.
                        i += boundary_len - 1;
                        while i < len && !boundary.contains(buf[i]) {
                            i += boundary_len;
                        }
                        i -= boundary_len - 1;
                        if i >= len {
                            break;
                        }
                        c = buf[i];
                    }

                    if index < boundary_len {
                        if boundary.byte(index) == c {
                            if index == 0 {
                                if let Some(mark) = self.part_data_mark.take() {
                                    if mark != i {
                                        self.events.on_part_data(&buf[mark..i]);
                                    }
                                }
                                flags.implied_crlf = false;
                            }
                            index += 1;
                        } else {
                            index = 0;
                        }
                    } else if index == boundary_len {
                        index += 1;
                        if c == constants::CR {
                            flags.part_boundary = true;
                        } else if c == constants::HYPHEN {
                            flags.last_boundary = true;
                        } else {
                            index = 0;
                        }
                    } else {
                        // index == boundary_len + 1: the byte after CR or `-`
                        // decides whether the boundary is real.
                        if flags.part_boundary {
                            index = 0;
                            if c == constants::LF {
                                flags = Flags::default();
                                self.events.on_part_end();
                                self.events.on_part_begin();
                                state = State::HeaderFieldStart;
                                i += 1;
                                continue;
                            }
                            flags.part_boundary = false;
                        } else if flags.last_boundary {
                            if c == constants::HYPHEN {
                                self.events.on_part_end();
                                self.events.on_end();
                                state = State::End;
                            } else {
                                index = 0;
                                flags.last_boundary = false;
                            }
                        } else {
                            index = 0;
                        }
                    }

                    if index > 0 {
                        // Withhold the byte; it may still turn out to be part
                        // of the boundary.
                        self.lookbehind[index - 1] = c;
                    } else if prev_index > 0 {
                        // The candidate fell apart: everything withheld was
                        // part data after all, minus any implied CRLF seed.
                        let held_from = if flags.implied_crlf { 2 } else { 0 };
                        flags.implied_crlf = false;
                        if held_from < prev_index {
                            self.events.on_part_data(&self.lookbehind[held_from..prev_index]);
                        }
                        self.part_data_mark = Some(i);
                        // Re-examine the byte that broke the match, it may
                        // open a new candidate.
                        continue;
                    }
                }
                State::End => {
                    // Epilogue bytes after the closing boundary are ignored.
                }
            }

            i += 1;
        }

        if let Some(mark) = self.header_field_mark {
            if mark < len {
                self.events.on_header_field(&buf[mark..len]);
            }
            self.header_field_mark = Some(0);
        }
        if let Some(mark) = self.header_value_mark {
            if mark < len {
                self.events.on_header_value(&buf[mark..len]);
            }
            self.header_value_mark = Some(0);
        }
        if let Some(mark) = self.part_data_mark {
            if mark < len {
                self.events.on_part_data(&buf[mark..len]);
            }
            self.part_data_mark = Some(0);
        }

        self.state = state;
        self.index = index;
        self.flags = flags;

        len
    }

    /// Like [`write`](MultipartParser::write), but turns the short-count
    /// signal into a typed [`Error::MalformedInput`](crate::Error::MalformedInput).
    pub fn write_all(&mut self, buf: &[u8]) -> crate::Result<()> {
        let consumed = self.write(buf);
        if consumed == buf.len() {
            Ok(())
        } else {
            Err(crate::Error::MalformedInput { offset: consumed })
        }
    }

    /// Asserts that the stream ended where it was allowed to.
    ///
    /// Succeeds only after the closing boundary was fully recognized; any
    /// other state means the input was truncated, and the error carries the
    /// [`explain`](MultipartParser::explain) label of where parsing stopped.
    pub fn end(&mut self) -> crate::Result<()> {
        match self.state {
            State::End => Ok(()),
            _ => Err(crate::Error::StreamEndedUnexpectedly {
                state: self.explain(),
            }),
        }
    }

    /// Renders the current state for error messages, e.g. `"state = END"`.
    pub fn explain(&self) -> String {
        format!("state = {}", self.state)
    }

    /// The current parser state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Borrows the event sink.
    pub fn events(&self) -> &E {
        &self.events
    }

    /// Mutably borrows the event sink.
    pub fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }

    /// Consumes the parser and returns its event sink.
    pub fn into_events(self) -> E {
        self.events
    }

    fn syntax_error(&mut self, at: usize) -> usize {
        #[cfg(feature = "log")]
        log::trace!("malformed multipart input at byte {}", at);

        self.state = State::ParserError;
        at
    }
}

impl<E> Debug for MultipartParser<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultipartParser")
            .field("state", &self.state)
            .field("index", &self.index)
            .field("flags", &self.flags)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_parser_is_inert() {
        let parser = MultipartParser::new(());
        assert!(parser.boundary.is_none());
        assert_eq!(parser.state, State::Uninitialized);
        assert_eq!(parser.index, 0);
        assert_eq!(parser.flags, Flags::default());
        assert!(parser.lookbehind.is_empty());
        assert_eq!(parser.explain(), "state = UNINITIALIZED");
    }

    #[test]
    fn test_uninitialized_write_consumes_nothing() {
        let mut parser = MultipartParser::new(());
        assert_eq!(parser.write(b"--abc\r\n"), 0);
        assert_eq!(parser.state(), State::Uninitialized);
    }

    #[test]
    fn test_init_builds_boundary_table() {
        let mut parser = MultipartParser::new(());
        parser.init_with_boundary("abc").unwrap();

        let boundary = parser.boundary.as_ref().unwrap();
        assert_eq!(boundary.as_bytes(), &[13, 10, 45, 45, 97, 98, 99][..]);
        assert_eq!(parser.state(), State::Start);
        assert_eq!(parser.lookbehind.len(), boundary.len() + constants::LOOKBEHIND_EXTRA);
    }

    #[test]
    fn test_init_with_empty_boundary_leaves_parser_unusable() {
        let mut parser = MultipartParser::new(());
        parser.init_with_boundary("abc").unwrap();
        assert_eq!(
            parser.init_with_boundary("").unwrap_err(),
            crate::Error::InvalidBoundary
        );
        assert_eq!(parser.state(), State::Uninitialized);
        assert_eq!(parser.write(b"--abc"), 0);
    }

    #[test]
    fn test_mismatched_first_boundary_is_not_an_error() {
        // A lookalike prefix that diverges mid-boundary simply resets the
        // match; only a bad byte after a full match is a syntax error.
        let mut parser = MultipartParser::new(());
        parser.init_with_boundary("abc").unwrap();
        assert_eq!(parser.write(b"--ad\0"), 5);
        assert_eq!(parser.state(), State::StartBoundary);
    }

    #[test]
    fn test_end_before_terminal_state_fails() {
        let mut parser = MultipartParser::new(());
        parser.init_with_boundary("abc").unwrap();

        let err = parser.end().unwrap_err();
        assert_eq!(
            err,
            crate::Error::StreamEndedUnexpectedly {
                state: "state = START".to_owned()
            }
        );

        parser.state = State::End;
        assert!(parser.end().is_ok());
    }

    #[test]
    fn test_malformed_header_reports_offending_byte() {
        let mut parser = MultipartParser::new(());
        parser.init_with_boundary("abc").unwrap();

        // The space inside the header name is the offending byte.
        let input = b"--abc\r\nBad Header: x\r\n";
        let offset = input.iter().position(|&b| b == b' ').unwrap();
        assert_eq!(parser.write(input), offset);
        assert_eq!(parser.state(), State::ParserError);
        assert_eq!(parser.explain(), "state = PARSER_ERROR");

        // The parser is stuck; further writes consume nothing.
        assert_eq!(parser.write(b"more"), 0);
    }

    #[test]
    fn test_write_all_wraps_short_count() {
        let mut parser = MultipartParser::new(());
        parser.init_with_boundary("abc").unwrap();

        let err = parser.write_all(b"--abc\r\n:empty\r\n").unwrap_err();
        assert_eq!(err, crate::Error::MalformedInput { offset: 7 });
    }
}
