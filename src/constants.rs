pub(crate) const CR: u8 = b'\r';
pub(crate) const LF: u8 = b'\n';
pub(crate) const HYPHEN: u8 = b'-';
pub(crate) const COLON: u8 = b':';
pub(crate) const SPACE: u8 = b' ';

/// Every boundary is matched on the wire as `CRLF--<boundary>`.
pub(crate) const BOUNDARY_PREFIX: &'static [u8] = b"\r\n--";

/// Slack past the boundary pattern length so the lookbehind buffer can also
/// hold the trailing CR or dash of a candidate match.
pub(crate) const LOOKBEHIND_EXTRA: usize = 8;
