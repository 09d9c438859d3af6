use std::time::Duration;

use bytes::Bytes;
use log::{debug, trace, warn};
use tokio::{
    io::{AsyncRead, AsyncWrite, ReadHalf, WriteHalf},
    net::TcpStream,
};

use crate::{
    mail::Mail,
    pop3::{
        CommandError, Error, FrameError, ListEntry, MailboxStat, MessageNumber, Timeouts, Uid,
        command::{Command, CommandChannel},
        frame::{Frame, ReplyKind},
        reply::{parse_listing, parse_stat, truncate_to_declared},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    /// Greeting received, nothing sent yet.
    Authenticating,
    /// Username accepted.
    Authenticated,
    Ready,
    Closed,
}

/// An authenticated POP3 session on one connection.
///
/// Commands are strictly request/reply; `&mut self` on every operation keeps
/// a single command in flight. Share a session behind a mutex if needed.
#[derive(Debug)]
pub struct Session<S> {
    channel: Option<CommandChannel<WriteHalf<S>>>,
    state: SessionState,
    timeouts: Timeouts,
}

impl Session<TcpStream> {
    pub async fn connect(
        host: &str,
        port: u16,
        user: &str,
        password: &str,
        timeouts: Timeouts,
    ) -> Result<Self, Error> {
        debug!("Connecting to {host}:{port}");
        let stream = TcpStream::connect((host, port))
            .await
            .map_err(Error::Connect)?;

        Self::handshake(stream, user, password, timeouts).await
    }
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    /// Runs greeting, `USER` and `PASS` on an already connected stream.
    /// Any failure drops the connection; no half-authenticated session is
    /// ever returned.
    pub async fn handshake(
        stream: S,
        user: &str,
        password: &str,
        timeouts: Timeouts,
    ) -> Result<Self, Error> {
        let (reader, writer): (ReadHalf<S>, WriteHalf<S>) = tokio::io::split(stream);
        let mut session = Self {
            channel: Some(CommandChannel::new(reader, writer)),
            state: SessionState::Disconnected,
            timeouts,
        };

        let greeting = session
            .receive(ReplyKind::SingleLine, timeouts.greeting())
            .await
            .map_err(Error::GreetingRejected)?;
        trace!("greeting = {:?}", greeting.status_text());
        session.transition(SessionState::Authenticating);

        session
            .call(&Command::User(user), timeouts.command())
            .await
            .map_err(|source| Error::UserRejected {
                user: user.to_string(),
                source,
            })?;
        session.transition(SessionState::Authenticated);

        session
            .call(&Command::Pass(password), timeouts.command())
            .await
            .map_err(|source| Error::PasswordRejected { source })?;
        session.transition(SessionState::Ready);

        Ok(session)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub async fn list(&mut self) -> Result<Vec<ListEntry>, Error> {
        self.ensure_ready()?;
        let frame = self
            .call(&Command::List, self.timeouts.list())
            .await
            .map_err(Error::List)?;

        Ok(parse_listing(frame.data())?)
    }

    pub async fn stat(&mut self) -> Result<MailboxStat, Error> {
        self.ensure_ready()?;
        let frame = self
            .call(&Command::Stat, self.timeouts.command())
            .await
            .map_err(Error::Stat)?;

        parse_stat(frame.status()).ok_or_else(|| Error::MalformedStat {
            reply: Bytes::copy_from_slice(frame.status()),
        })
    }

    pub async fn delete(&mut self, number: MessageNumber) -> Result<(), Error> {
        self.ensure_ready()?;
        self.call(&Command::Dele(number), self.timeouts.command())
            .await
            .map_err(|source| Error::Delete { number, source })?;

        Ok(())
    }

    pub async fn uid(&mut self, number: MessageNumber) -> Result<Uid, Error> {
        self.ensure_ready()?;
        let frame = self
            .call(&Command::Uidl(number), self.timeouts.uidl())
            .await
            .map_err(|source| Error::Uid { number, source })?;
        let status = Bytes::copy_from_slice(frame.status());

        Uid::from_uidl_reply(&status).ok_or(Error::MalformedUid {
            number,
            reply: status,
        })
    }

    /// Raw bytes of a message, cut to the size the server announced if it
    /// sent more than that.
    pub async fn retrieve(&mut self, number: MessageNumber) -> Result<Bytes, Error> {
        self.ensure_ready()?;
        let frame = self
            .call(&Command::Retr(number), self.timeouts.retrieve())
            .await
            .map_err(|source| Error::Retrieve { number, source })?;
        trace!(
            "{} bytes for message {number}, status {:?}",
            frame.data().len(),
            frame.status_text()
        );

        Ok(truncate_to_declared(frame.status(), frame.data()))
    }

    /// `RETR` followed by `UIDL`. Both have to succeed.
    pub async fn get_mail(&mut self, number: MessageNumber) -> Result<Mail, Error> {
        let raw = self.retrieve(number).await?;
        let uid = self.uid(number).await?;

        Mail::assemble(raw, uid).map_err(|source| Error::MalformedMessage { number, source })
    }

    pub async fn noop(&mut self) -> Result<(), Error> {
        self.simple(Command::Noop).await
    }

    /// Unmarks all messages marked as deleted in this session.
    pub async fn reset(&mut self) -> Result<(), Error> {
        self.simple(Command::Rset).await
    }

    /// Sends `QUIT` and releases the connection. Failures are only logged.
    pub async fn close(&mut self) {
        if self.state == SessionState::Ready {
            match self.call(&Command::Quit, self.timeouts.command()).await {
                Ok(_) => debug!("logged out"),
                Err(e) => warn!("QUIT failed: {e}"),
            }
        }
        self.release().await;
    }

    async fn simple(&mut self, command: Command<'_>) -> Result<(), Error> {
        self.ensure_ready()?;
        self.call(&command, self.timeouts.command())
            .await
            .map_err(|source| Error::Command {
                command: command.keyword(),
                source,
            })?;

        Ok(())
    }

    fn ensure_ready(&self) -> Result<(), Error> {
        if self.state == SessionState::Ready {
            Ok(())
        } else {
            Err(Error::NotReady { state: self.state })
        }
    }

    async fn receive(&mut self, kind: ReplyKind, timeout: Duration) -> Result<Frame, FrameError> {
        let channel = self.channel.as_mut().ok_or(FrameError::ReaderGone)?;
        let result = channel.receive(kind, timeout).await;
        if let Err(FrameError::Read { .. }) = &result {
            self.release().await;
        }

        result
    }

    async fn call(&mut self, command: &Command<'_>, timeout: Duration) -> Result<Frame, CommandError> {
        let channel = self.channel.as_mut().ok_or(FrameError::ReaderGone)?;
        let result = channel.call(command, timeout).await;
        match &result {
            Err(e) if e.is_fatal() => {
                warn!("{command} broke the connection: {e}");
                self.release().await;
            }
            Err(e) => debug!("{command} rejected: {}", e.reply_text().unwrap_or_default()),
            Ok(_) => {}
        }

        result
    }

    async fn release(&mut self) {
        let shutdown = match self.channel.take() {
            Some(channel) => channel.shutdown().await,
            None => Ok(()),
        };
        if let Err(e) = shutdown {
            trace!("shutting down connection failed: {e}");
        }
        self.transition(SessionState::Closed);
    }

    fn transition(&mut self, state: SessionState) {
        trace!("session {:?} -> {state:?}", self.state);
        self.state = state;
    }
}
