use std::time::Duration;

use log::debug;
use tokio_util::sync::CancellationToken;

use crate::pop3::{
    FrameError,
    frame::{Frame, ReplyKind},
    frame_reader::{FrameReader, ReadOutcome},
};

/// Bounds how long a single frame read may take.
#[derive(Debug, Clone, Copy)]
pub struct TimeoutGuard {
    timeout: Duration,
}

impl TimeoutGuard {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Reads one frame or gives up after the configured timeout.
    ///
    /// On expiry the read is cancelled and its acknowledgement awaited, so the
    /// reader task is idle again before this returns. An abandoned read can
    /// therefore never consume bytes of a later reply. The bound is best
    /// effort only in that a chunk already handed over by the transport still
    /// lands in the partial bytes of the abandoned frame.
    pub async fn read(&self, reader: &FrameReader, kind: ReplyKind) -> Result<Frame, FrameError> {
        let cancel = CancellationToken::new();
        let _cancel_on_exit = cancel.clone().drop_guard();
        let mut pending = reader.request(kind, cancel.clone()).await?;

        let outcome = tokio::select! {
            outcome = &mut pending => outcome,
            () = tokio::time::sleep(self.timeout) => {
                debug!("no complete reply within {:?}, cancelling read", self.timeout);
                cancel.cancel();
                pending.await
            }
        };

        match outcome.map_err(|_| FrameError::ReaderGone)? {
            ReadOutcome::Complete(frame) => Ok(frame),
            ReadOutcome::Failed(error) => Err(error),
            ReadOutcome::Cancelled { partial } => Err(FrameError::Timeout {
                timeout: self.timeout,
                partial,
            }),
        }
    }
}
