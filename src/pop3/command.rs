use std::{
    fmt::{Display, Formatter, Result},
    io,
    time::Duration,
};

use log::debug;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::pop3::{
    CommandError, FrameError, MessageNumber,
    frame::{Frame, ReplyKind},
    frame_reader::FrameReader,
    timeout_guard::TimeoutGuard,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    User(&'a str),
    Pass(&'a str),
    Stat,
    List,
    Uidl(MessageNumber),
    Retr(MessageNumber),
    Dele(MessageNumber),
    Noop,
    Rset,
    Quit,
}

impl Command<'_> {
    pub fn keyword(&self) -> &'static str {
        match self {
            Command::User(_) => "USER",
            Command::Pass(_) => "PASS",
            Command::Stat => "STAT",
            Command::List => "LIST",
            Command::Uidl(_) => "UIDL",
            Command::Retr(_) => "RETR",
            Command::Dele(_) => "DELE",
            Command::Noop => "NOOP",
            Command::Rset => "RSET",
            Command::Quit => "QUIT",
        }
    }

    pub fn reply_kind(&self) -> ReplyKind {
        match self {
            Command::List | Command::Retr(_) => ReplyKind::MultiLine,
            _ => ReplyKind::SingleLine,
        }
    }

    /// Wire form including CRLF.
    pub fn encode(&self) -> String {
        let keyword = self.keyword();
        match self {
            Command::User(argument) | Command::Pass(argument) => {
                format!("{keyword} {argument}\r\n")
            }
            Command::Uidl(number) | Command::Retr(number) | Command::Dele(number) => {
                format!("{keyword} {number}\r\n")
            }
            Command::Stat | Command::List | Command::Noop | Command::Rset | Command::Quit => {
                format!("{keyword}\r\n")
            }
        }
    }
}

// Used for logging, so the password never shows up.
impl Display for Command<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Command::Pass(_) => write!(f, "PASS <password>"),
            _ => write!(f, "{}", self.encode().trim_end()),
        }
    }
}

/// Writes commands and collects their replies on one connection.
#[derive(Debug)]
pub struct CommandChannel<W> {
    writer: W,
    reader: FrameReader,
}

impl<W> CommandChannel<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new<R>(reader: R, writer: W) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        Self {
            writer,
            reader: FrameReader::spawn(reader),
        }
    }

    /// Sends one command line. A short write is not resumed.
    pub async fn send(&mut self, command: &Command<'_>) -> std::result::Result<(), CommandError> {
        debug!("{command}");
        let line = command.encode();
        let written = self
            .writer
            .write(line.as_bytes())
            .await
            .map_err(|source| CommandError::Write {
                command: command.keyword(),
                source,
            })?;
        if written != line.len() {
            return Err(CommandError::SizeMismatch {
                command: command.keyword(),
                written,
                expected: line.len(),
            });
        }
        self.writer
            .flush()
            .await
            .map_err(|source| CommandError::Write {
                command: command.keyword(),
                source,
            })
    }

    /// Waits for a reply without sending anything first.
    pub async fn receive(
        &mut self,
        kind: ReplyKind,
        timeout: Duration,
    ) -> std::result::Result<Frame, FrameError> {
        TimeoutGuard::new(timeout).read(&self.reader, kind).await
    }

    /// Sends `command` and waits at most `timeout` for its reply.
    pub async fn call(
        &mut self,
        command: &Command<'_>,
        timeout: Duration,
    ) -> std::result::Result<Frame, CommandError> {
        self.send(command).await?;
        let frame = self.receive(command.reply_kind(), timeout).await?;

        Ok(frame)
    }

    pub async fn shutdown(self) -> io::Result<()> {
        let Self { mut writer, reader } = self;
        let result = writer.shutdown().await;
        reader.stop().await;

        result
    }
}
