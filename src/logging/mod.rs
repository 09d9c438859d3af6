mod journal;

use std::{io::Write as _, time::SystemTime};

use anstyle::{AnsiColor, Effects};
use env_logger::Env;

/// Sets up `env_logger`, filtered by `RUST_LOG` and defaulting to `info`.
/// Every line names `account` so parallel runs stay distinguishable.
pub fn init(account: Option<&str>) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    let account = account.map(|account| format!("{account} ")).unwrap_or_default();

    if journal::stderr_is_journal() {
        builder.format(move |buf, record| {
            writeln!(
                buf,
                "<{}>{}{}: {}",
                journal::priority(record.level()),
                account,
                record.target(),
                record.args()
            )
        });
    } else {
        let subtle = AnsiColor::BrightBlack.on_default();
        builder.format(move |buf, record| {
            write!(buf, "{subtle}[{subtle:#}")?;
            match jiff::Timestamp::try_from(SystemTime::now()) {
                Ok(now) => write!(buf, "{now:.3} ")?,
                Err(_) => write!(buf, "timestamp_error ")?,
            }
            let level_style = match record.level() {
                log::Level::Error => AnsiColor::Red.on_default().effects(Effects::BOLD),
                log::Level::Warn => AnsiColor::Yellow.on_default(),
                log::Level::Info => AnsiColor::Green.on_default(),
                log::Level::Debug => AnsiColor::Blue.on_default(),
                log::Level::Trace => AnsiColor::Cyan.on_default(),
            };
            write!(
                buf,
                "{level_style}{}{level_style:#} {account}{}",
                record.level(),
                record.target(),
            )?;
            if let Some(line) = record.line() {
                write!(buf, ":{line}")?;
            }
            write!(buf, "{subtle}]{subtle:#} ")?;
            writeln!(buf, "{}", record.args())
        });
    }
    builder.init();
}
