mod delete;
mod fetch;
mod list;

use std::io::stdout;

use anyhow::{Context as _, Result};
use log::{debug, info};

use crate::{
    Action, Args,
    config::Config,
    pop3::{Session, Timeouts},
};

pub async fn run(args: &Args, config: &Config) -> Result<()> {
    let account = config.account(&args.account)?;
    let password = account.auth().password()?;
    let mut session = Session::connect(
        account.host(),
        account.port(),
        account.auth().user(),
        &password,
        Timeouts::from(account.timeouts()),
    )
    .await
    .with_context(|| format!("logging in to {} failed", account.host()))?;
    info!("logged in to {} as {}", account.host(), account.auth().user());

    let mut out = stdout().lock();
    let result = match &args.action {
        Action::List => list::list(&mut session, &mut out).await,
        Action::Stat => list::stat(&mut session, &mut out).await,
        Action::Uid { number } => list::uid(&mut session, *number, &mut out).await,
        Action::Check => list::check(&mut session).await,
        Action::Fetch { number, output } => {
            fetch::fetch(&mut session, *number, output.as_deref(), &mut out).await
        }
        Action::Delete { numbers, dry_run } => {
            delete::delete(&mut session, numbers, *dry_run).await
        }
    };
    session.close().await;
    debug!("session ended {:?}", session.state());

    result
}
