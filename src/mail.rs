use std::fmt::{Debug, Formatter, Result};

use bytes::Bytes;
use mailparse::{MailHeaderMap, MailParseError, ParsedMail};

use crate::pop3::Uid;

/// A retrieved message together with its unique identifier.
pub struct Mail {
    raw: Bytes,
    uid: Uid,
    body_offset: usize,
}

impl Mail {
    /// Fails if `raw` does not start with a parseable header block.
    pub fn assemble(raw: Bytes, uid: Uid) -> std::result::Result<Self, MailParseError> {
        let (_, body_offset) = mailparse::parse_headers(&raw)?;

        Ok(Self {
            raw,
            uid,
            body_offset,
        })
    }

    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    pub fn uid(&self) -> &Uid {
        &self.uid
    }

    /// Header block including the blank line that ends it.
    pub fn header(&self) -> &[u8] {
        &self.raw[..self.body_offset]
    }

    pub fn body(&self) -> &[u8] {
        &self.raw[self.body_offset..]
    }

    pub fn parse(&self) -> std::result::Result<ParsedMail<'_>, MailParseError> {
        mailparse::parse_mail(&self.raw)
    }

    pub fn subject(&self) -> Option<String> {
        self.parse()
            .ok()
            .and_then(|mail| mail.headers.get_first_value("Subject"))
    }
}

impl Debug for Mail {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_struct("Mail")
            .field("uid", &self.uid)
            .field("size", &self.raw.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use rstest::*;

    use super::*;

    #[fixture]
    fn mail() -> Mail {
        let raw = Bytes::from_static(
            b"Subject: hi\r\nFrom: alice@example.org\r\n\r\nbody text\r\nsecond line",
        );
        assert_ok!(Mail::assemble(raw, Uid::new(Bytes::from_static(b"abc"))))
    }

    #[rstest]
    fn test_header_and_body_are_split_at_blank_line(mail: Mail) {
        assert_eq!(
            b"Subject: hi\r\nFrom: alice@example.org\r\n\r\n",
            mail.header()
        );
        assert_eq!(b"body text\r\nsecond line", mail.body());
        assert_eq!(mail.raw().len(), mail.header().len() + mail.body().len());
    }

    #[rstest]
    fn test_subject_is_read_from_headers(mail: Mail) {
        assert_eq!(Some("hi".to_string()), mail.subject());
    }

    #[rstest]
    fn test_parsed_mail_exposes_body(mail: Mail) {
        let parsed = assert_ok!(mail.parse());
        let body = assert_ok!(parsed.get_body());
        assert_starts_with!(body, "body text");
    }

    #[rstest]
    fn test_uid_travels_with_mail(mail: Mail) {
        assert_eq!("abc", mail.uid().to_string());
    }
}
