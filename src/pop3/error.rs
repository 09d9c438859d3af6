use std::{io, time::Duration};

use bytes::Bytes;
use thiserror::Error;

use crate::pop3::{ListEntry, MessageNumber, SessionState};

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim_end().to_string()
}

/// Failure while waiting for one reply frame.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("reading reply failed after {} bytes: {source}", partial.len())]
    Read { source: io::Error, partial: Bytes },
    #[error("server replied with error: {}", lossy(reply))]
    Protocol { reply: Bytes },
    #[error("no complete reply within {timeout:?} ({} bytes received)", partial.len())]
    Timeout { timeout: Duration, partial: Bytes },
    #[error("frame reader is no longer running")]
    ReaderGone,
}

/// Failure of a single command exchange.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("writing {command} failed: {source}")]
    Write {
        command: &'static str,
        source: io::Error,
    },
    #[error("wrote {written} of {expected} bytes of {command}")]
    SizeMismatch {
        command: &'static str,
        written: usize,
        expected: usize,
    },
    #[error(transparent)]
    Reply(#[from] FrameError),
}

impl CommandError {
    /// Whether the connection can no longer be trusted after this failure.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Write { .. } | Self::SizeMismatch { .. } => true,
            Self::Reply(FrameError::Read { .. } | FrameError::ReaderGone) => true,
            Self::Reply(FrameError::Protocol { .. } | FrameError::Timeout { .. }) => false,
        }
    }

    /// Server reply text carried by the failure, if any.
    pub fn reply_text(&self) -> Option<String> {
        match self {
            Self::Reply(FrameError::Protocol { reply }) => Some(lossy(reply)),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
#[error("malformed LIST line {line:?} after {} entries", parsed.len())]
pub struct MalformedListing {
    pub line: String,
    pub parsed: Vec<ListEntry>,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("connecting to server failed: {0}")]
    Connect(io::Error),
    #[error("greeting rejected: {0}")]
    GreetingRejected(FrameError),
    #[error("username {user} rejected: {source}")]
    UserRejected { user: String, source: CommandError },
    #[error("password rejected: {source}")]
    PasswordRejected { source: CommandError },
    #[error("session is {state:?}, not ready")]
    NotReady { state: SessionState },
    #[error("LIST failed: {0}")]
    List(CommandError),
    #[error(transparent)]
    MalformedListing(#[from] MalformedListing),
    #[error("STAT failed: {0}")]
    Stat(CommandError),
    #[error("malformed STAT reply {}", lossy(reply))]
    MalformedStat { reply: Bytes },
    #[error("deleting message {number} failed: {source}")]
    Delete {
        number: MessageNumber,
        source: CommandError,
    },
    #[error("UIDL for message {number} failed: {source}")]
    Uid {
        number: MessageNumber,
        source: CommandError,
    },
    #[error("malformed UIDL reply for message {number}: {}", lossy(reply))]
    MalformedUid { number: MessageNumber, reply: Bytes },
    #[error("retrieving message {number} failed: {source}")]
    Retrieve {
        number: MessageNumber,
        source: CommandError,
    },
    #[error("message {number} is not a parseable mail: {source}")]
    MalformedMessage {
        number: MessageNumber,
        source: mailparse::MailParseError,
    },
    #[error("{command} failed: {source}")]
    Command {
        command: &'static str,
        source: CommandError,
    },
}
