use std::{
    fmt::{Display, Formatter, Result},
    num::NonZeroU32,
    str::FromStr,
};

use thiserror::Error;

/// Position of a message in the maildrop for the current session.
///
/// Numbers shift once messages are deleted, so they must not be kept across
/// a `DELE`.
#[derive(Debug, PartialEq, Clone, Copy, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct MessageNumber(NonZeroU32);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("message numbers are positive integers, got {0:?}")]
pub struct InvalidMessageNumber(String);

impl Display for MessageNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        self.0.fmt(f)
    }
}

impl TryFrom<u32> for MessageNumber {
    type Error = InvalidMessageNumber;

    fn try_from(value: u32) -> std::result::Result<Self, Self::Error> {
        NonZeroU32::new(value)
            .map(Self)
            .ok_or_else(|| InvalidMessageNumber(value.to_string()))
    }
}

impl FromStr for MessageNumber {
    type Err = InvalidMessageNumber;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse::<NonZeroU32>()
            .map(Self)
            .map_err(|_| InvalidMessageNumber(s.to_string()))
    }
}

impl From<MessageNumber> for u32 {
    fn from(value: MessageNumber) -> Self {
        value.0.get()
    }
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use rstest::*;

    use super::*;

    #[rstest]
    fn test_message_number_displays_correctly() {
        assert_eq!("42", assert_ok!(MessageNumber::try_from(42)).to_string());
    }

    #[rstest]
    #[case("0")]
    #[case("-1")]
    #[case("one")]
    #[case("")]
    fn test_invalid_message_numbers_are_rejected(#[case] input: &str) {
        assert_err!(input.parse::<MessageNumber>());
    }

    #[rstest]
    fn test_message_number_from_and_to_u32_is_consistent() {
        let number = assert_ok!(MessageNumber::try_from(3));
        assert_eq!(number, assert_ok!("3".parse::<MessageNumber>()));
        assert_eq!(3, u32::from(number));
        assert_err!(MessageNumber::try_from(0));
    }
}
