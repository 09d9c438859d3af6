use std::borrow::Cow;

use bytes::Bytes;

const STATUS_OK: u8 = b'+';
const CRLF: &[u8] = b"\r\n";
const TERMINATOR: &[u8] = b".\r\n";

/// Shape of the reply a command expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    SingleLine,
    MultiLine,
}

/// Progress of a reply that is still being accumulated.
///
/// Offsets index into the accumulated buffer. `status_end` points just past
/// the CRLF of the status line, `data_end` just before the CRLF that precedes
/// the terminator line.
#[derive(Debug, PartialEq, Eq)]
pub enum FrameState {
    Incomplete,
    SingleLine { status_end: usize },
    MultiLine { status_end: usize, data_end: usize },
    Error { status_end: usize },
}

/// Classifies the bytes received so far.
///
/// Nothing is decided before the status line is complete, so the status
/// marker is only ever inspected on a non-empty buffer. An error reply is
/// therefore reported once its whole status line has arrived, not at its
/// first byte, and no part of it is left unread. A multi-line reply
/// ends with a line holding a single dot, which means `.\r\n` directly after
/// a CRLF. A data line that merely ends in a dot does not end the frame.
pub fn scan(buffer: &[u8], kind: ReplyKind) -> FrameState {
    let Some(status_end) = find_crlf(buffer).map(|pos| pos + CRLF.len()) else {
        return FrameState::Incomplete;
    };
    if buffer[0] != STATUS_OK {
        return FrameState::Error { status_end };
    }
    match kind {
        ReplyKind::SingleLine => FrameState::SingleLine { status_end },
        ReplyKind::MultiLine => {
            if buffer.len() < status_end + TERMINATOR.len() || !buffer.ends_with(TERMINATOR) {
                return FrameState::Incomplete;
            }
            let terminator_start = buffer.len() - TERMINATOR.len();
            if !buffer[..terminator_start].ends_with(CRLF) {
                return FrameState::Incomplete;
            }
            let data_end = if terminator_start > status_end {
                terminator_start - CRLF.len()
            } else {
                status_end
            };
            FrameState::MultiLine {
                status_end,
                data_end,
            }
        }
    }
}

fn find_crlf(buffer: &[u8]) -> Option<usize> {
    buffer.windows(CRLF.len()).position(|window| window == CRLF)
}

/// One complete, successful reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    status: Bytes,
    data: Bytes,
}

impl Frame {
    pub fn single_line(status: Bytes) -> Self {
        Self {
            status,
            data: Bytes::new(),
        }
    }

    pub fn multi_line(status: Bytes, data: Bytes) -> Self {
        Self { status, data }
    }

    /// Status line including its CRLF.
    pub fn status(&self) -> &[u8] {
        &self.status
    }

    /// Status line without CRLF, lossily decoded.
    pub fn status_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(trim_crlf(&self.status))
    }

    /// Data block of a multi-line reply with terminator and its preceding
    /// CRLF removed. Empty for single-line replies.
    pub fn data(&self) -> &Bytes {
        &self.data
    }
}

pub fn trim_crlf(line: &[u8]) -> &[u8] {
    line.strip_suffix(CRLF).unwrap_or(line)
}
