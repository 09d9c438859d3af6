use std::str::FromStr;

use derive_getters::Getters;
use nom::{
    IResult,
    bytes::complete::tag,
    character::complete::{char, digit1, not_line_ending},
    combinator::{all_consuming, map, map_res, opt},
    sequence::{preceded, separated_pair, terminated, tuple},
};

use crate::pop3::{MalformedListing, MessageNumber, frame::trim_crlf};

/// One line of a `LIST` reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct ListEntry {
    number: MessageNumber,
    size: u64,
}

impl ListEntry {
    pub fn new(number: MessageNumber, size: u64) -> Self {
        Self { number, size }
    }
}

/// Reply to `STAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct MailboxStat {
    count: u32,
    size: u64,
}

fn number<T: FromStr>(input: &str) -> IResult<&str, T> {
    map_res(digit1, str::parse)(input)
}

fn list_line(input: &str) -> IResult<&str, ListEntry> {
    map(
        separated_pair(number, char(' '), number),
        |(number, size)| ListEntry::new(number, size),
    )(input)
}

fn stat_line(input: &str) -> IResult<&str, MailboxStat> {
    map(
        preceded(
            tag("+OK "),
            terminated(
                separated_pair(number, char(' '), number),
                opt(preceded(char(' '), not_line_ending)),
            ),
        ),
        |(count, size)| MailboxStat { count, size },
    )(input)
}

// marker SP size SP text
fn retr_status(input: &str) -> IResult<&str, usize> {
    map(
        tuple((tag("+OK"), char(' '), number, char(' '), not_line_ending)),
        |(_, _, size, _, _)| size,
    )(input)
}

/// Parses the data block of a `LIST` reply, one `<number> <size>` per line.
///
/// On the first malformed line the entries parsed so far are handed back
/// together with the offending line.
pub fn parse_listing(data: &[u8]) -> Result<Vec<ListEntry>, MalformedListing> {
    let mut parsed = Vec::new();
    if data.is_empty() {
        return Ok(parsed);
    }
    for line in String::from_utf8_lossy(data).split("\r\n") {
        match all_consuming(list_line)(line) {
            Ok((_, entry)) => parsed.push(entry),
            Err(_) => {
                return Err(MalformedListing {
                    line: line.to_string(),
                    parsed,
                });
            }
        }
    }

    Ok(parsed)
}

pub fn parse_stat(status: &[u8]) -> Option<MailboxStat> {
    let line = std::str::from_utf8(trim_crlf(status)).ok()?;
    all_consuming(stat_line)(line).ok().map(|(_, stat)| stat)
}

/// Size announced in a `RETR` status line such as `+OK 58 octets`.
pub fn declared_size(status: &[u8]) -> Option<usize> {
    let line = std::str::from_utf8(trim_crlf(status)).ok()?;
    all_consuming(retr_status)(line).ok().map(|(_, size)| size)
}

/// Cuts `data` down to the declared size when the server sent more than it
/// announced. Anything else is returned untouched.
pub fn truncate_to_declared(status: &[u8], data: &bytes::Bytes) -> bytes::Bytes {
    match declared_size(status) {
        Some(size) if size < data.len() => data.slice(..size),
        _ => data.clone(),
    }
}
