use std::fmt::{self, Display, Formatter};

/// The parsing states of [`MultipartParser`](crate::MultipartParser).
///
/// Exactly one state is current at any time. `End` is the only state in which
/// [`end`](crate::MultipartParser::end) succeeds; `ParserError` is the
/// non-recoverable sentinel entered on malformed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Uninitialized,
    Start,
    StartBoundary,
    HeaderFieldStart,
    HeaderField,
    HeaderValueStart,
    HeaderValue,
    HeaderValueAlmostDone,
    HeadersAlmostDone,
    PartDataStart,
    PartData,
    End,
    ParserError,
}

impl State {
    /// Diagnostic label for this state, as rendered by
    /// [`explain`](crate::MultipartParser::explain).
    pub fn as_str(&self) -> &'static str {
        match self {
            State::Uninitialized => "UNINITIALIZED",
            State::Start => "START",
            State::StartBoundary => "START_BOUNDARY",
            State::HeaderFieldStart => "HEADER_FIELD_START",
            State::HeaderField => "HEADER_FIELD",
            State::HeaderValueStart => "HEADER_VALUE_START",
            State::HeaderValue => "HEADER_VALUE",
            State::HeaderValueAlmostDone => "HEADER_VALUE_ALMOST_DONE",
            State::HeadersAlmostDone => "HEADERS_ALMOST_DONE",
            State::PartDataStart => "PART_DATA_START",
            State::PartData => "PART_DATA",
            State::End => "END",
            State::ParserError => "PARSER_ERROR",
        }
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sub-modes of the state machine, kept as named booleans so the transition
/// function stays exhaustively checkable.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Flags {
    /// A fully matched boundary was followed by CR, announcing another part.
    pub(crate) part_boundary: bool,
    /// A fully matched boundary was followed by `-`, announcing the closing
    /// boundary.
    pub(crate) last_boundary: bool,
    /// The current candidate match was seeded by the CRLF that terminated the
    /// header block; those two pattern positions were never part data.
    pub(crate) implied_crlf: bool,
}
