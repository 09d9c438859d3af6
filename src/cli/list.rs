use std::io::Write;

use anyhow::Result;
use log::info;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::pop3::{MessageNumber, Session};

pub async fn list<S>(session: &mut Session<S>, out: &mut impl Write) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    for entry in session.list().await? {
        writeln!(out, "{} {}", entry.number(), entry.size())?;
    }

    Ok(())
}

pub async fn stat<S>(session: &mut Session<S>, out: &mut impl Write) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let stat = session.stat().await?;
    writeln!(out, "{} messages, {} octets", stat.count(), stat.size())?;

    Ok(())
}

pub async fn uid<S>(
    session: &mut Session<S>,
    number: MessageNumber,
    out: &mut impl Write,
) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let uid = session.uid(number).await?;
    writeln!(out, "{number} {uid}")?;

    Ok(())
}

pub async fn check<S>(session: &mut Session<S>) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    session.noop().await?;
    info!("server accepted credentials");

    Ok(())
}
