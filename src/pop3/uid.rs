use std::fmt::{Debug, Display, Formatter, Result};

use bytes::Bytes;

use crate::pop3::frame::trim_crlf;

/// Unique identifier of a message, stable across sessions.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Uid(Bytes);

impl Uid {
    pub fn new(raw: Bytes) -> Self {
        Self(raw)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Extracts the identifier from a `+OK <n> <uid>` status line: the text
    /// after the last space. `None` if there is no space or nothing after it.
    pub fn from_uidl_reply(status: &Bytes) -> Option<Self> {
        let line = trim_crlf(status);
        let start = line.iter().rposition(|&b| b == b' ')? + 1;
        if start == line.len() {
            None
        } else {
            Some(Self::new(status.slice(start..line.len())))
        }
    }
}

impl Display for Uid {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", String::from_utf8_lossy(self.as_bytes()))
    }
}

impl Debug for Uid {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_tuple("Uid").field(&self.to_string()).finish()
    }
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use rstest::*;

    use super::*;

    #[rstest]
    #[case(b"+OK 1 whqtswO00WBw418f9t5JxYwZ\r\n", "whqtswO00WBw418f9t5JxYwZ")]
    #[case(b"+OK 2 QhdPYR:00WBw1Ph7x7\r\n", "QhdPYR:00WBw1Ph7x7")]
    #[case(b"+OK 3 abc", "abc")]
    fn test_uid_is_text_after_last_space(#[case] reply: &'static [u8], #[case] uid: &str) {
        let parsed = assert_some!(Uid::from_uidl_reply(&Bytes::from_static(reply)));
        assert_eq!(uid.as_bytes(), parsed.as_bytes());
        assert_eq!(uid, parsed.to_string());
    }

    #[rstest]
    #[case(b"+OK\r\n")]
    #[case(b"+OK 1 \r\n")]
    fn test_reply_without_uid_is_rejected(#[case] reply: &'static [u8]) {
        assert_none!(Uid::from_uidl_reply(&Bytes::from_static(reply)));
    }
}
