use anyhow::Result;
use log::info;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::pop3::{MessageNumber, Session};

/// Marks `numbers` as deleted. The server only removes them once the session
/// is closed; with `dry_run` the marks are reset before that.
pub async fn delete<S>(
    session: &mut Session<S>,
    numbers: &[MessageNumber],
    dry_run: bool,
) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    for number in numbers {
        session.delete(*number).await?;
        info!("marked message {number} as deleted");
    }
    if dry_run {
        session.reset().await?;
        info!("dry run, unmarked all messages again");
    }

    Ok(())
}
