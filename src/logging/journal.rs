use std::{env, io, os::fd::AsFd as _};

use log::Level;

/// Whether stderr is the stream systemd attached to the journal.
///
/// systemd exports `$JOURNAL_STREAM` as `<device>:<inode>` of that stream
/// (see `systemd.exec(5)`), which is compared against stderr's own.
pub fn stderr_is_journal() -> bool {
    let Some(journal_stream) = env::var_os("JOURNAL_STREAM") else {
        return false;
    };
    let Some(expected) = parse_journal_stream(&journal_stream.to_string_lossy()) else {
        return false;
    };

    rustix::fs::fstat(io::stderr().as_fd()).is_ok_and(|stat| {
        let device = u64::try_from(stat.st_dev).ok();
        let inode = u64::try_from(stat.st_ino).ok();
        (device, inode) == (Some(expected.0), Some(expected.1))
    })
}

fn parse_journal_stream(value: &str) -> Option<(u64, u64)> {
    let (device, inode) = value.split_once(':')?;

    Some((device.parse().ok()?, inode.parse().ok()?))
}

/// syslog priority understood by journald as a `<n>` line prefix.
pub fn priority(level: Level) -> u8 {
    match level {
        Level::Error => 3,
        Level::Warn => 4,
        Level::Info => 6,
        Level::Debug | Level::Trace => 7,
    }
}

#[cfg(test)]
mod tests {
    use rstest::*;

    use super::*;

    #[rstest]
    #[case("8:12345", Some((8, 12345)))]
    #[case("8", None)]
    #[case("a:1", None)]
    #[case("", None)]
    fn test_journal_stream_is_parsed(#[case] value: &str, #[case] parsed: Option<(u64, u64)>) {
        assert_eq!(parsed, parse_journal_stream(value));
    }

    #[rstest]
    #[case(Level::Error, 3)]
    #[case(Level::Info, 6)]
    #[case(Level::Trace, 7)]
    fn test_levels_map_to_syslog_priorities(#[case] level: Level, #[case] expected: u8) {
        assert_eq!(expected, priority(level));
    }
}
