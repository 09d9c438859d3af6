use std::{fs, io::Write, path::Path};

use anyhow::{Context as _, Result};
use log::info;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::pop3::{MessageNumber, Session};

/// Retrieves one message and writes its raw bytes to `output`, or to `out`
/// when no file is given.
pub async fn fetch<S>(
    session: &mut Session<S>,
    number: MessageNumber,
    output: Option<&Path>,
    out: &mut impl Write,
) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let mail = session.get_mail(number).await?;
    info!(
        "message {number}: uid {}, subject {:?}, {} header and {} body octets",
        mail.uid(),
        mail.subject().unwrap_or_default(),
        mail.header().len(),
        mail.body().len()
    );

    if let Some(output) = output {
        fs::write(output, mail.raw())
            .with_context(|| format!("writing message to {} failed", output.display()))?;
    } else {
        out.write_all(mail.raw())?;
    }

    Ok(())
}
