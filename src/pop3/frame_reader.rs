use std::io;

use bytes::{Bytes, BytesMut};
use log::trace;
use tokio::{
    io::{AsyncRead, AsyncReadExt},
    sync::{mpsc, oneshot},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

use crate::pop3::{
    FrameError,
    frame::{Frame, FrameState, ReplyKind, scan},
};

const READ_CHUNK: usize = 1024;

/// What the reader task hands back for one request.
#[derive(Debug)]
pub enum ReadOutcome {
    Complete(Frame),
    Failed(FrameError),
    Cancelled { partial: Bytes },
}

struct ReadRequest {
    kind: ReplyKind,
    cancel: CancellationToken,
    reply: oneshot::Sender<ReadOutcome>,
}

/// Handle to the task that owns the read half of the connection.
///
/// The task is the only owner of the accumulation buffer. Callers only ever
/// see finished outcomes, delivered over a oneshot channel per request.
#[derive(Debug)]
pub struct FrameReader {
    requests: mpsc::Sender<ReadRequest>,
    task: JoinHandle<()>,
}

impl FrameReader {
    pub fn spawn<R>(reader: R) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (requests, incoming) = mpsc::channel(1);
        let task = tokio::spawn(serve(reader, incoming));

        Self { requests, task }
    }

    /// Queues a read of one frame. The returned receiver resolves once the
    /// frame is complete, has failed or `cancel` was triggered.
    pub async fn request(
        &self,
        kind: ReplyKind,
        cancel: CancellationToken,
    ) -> Result<oneshot::Receiver<ReadOutcome>, FrameError> {
        let (reply, outcome) = oneshot::channel();
        self.requests
            .send(ReadRequest {
                kind,
                cancel,
                reply,
            })
            .await
            .map_err(|_| FrameError::ReaderGone)?;

        Ok(outcome)
    }

    /// Stops the reader task and waits until it has released the read half.
    pub async fn stop(self) {
        drop(self.requests);
        if let Err(e) = self.task.await {
            trace!("frame reader ended abnormally: {e}");
        }
    }
}

async fn serve<R>(mut reader: R, mut requests: mpsc::Receiver<ReadRequest>)
where
    R: AsyncRead + Unpin,
{
    let mut buffer = BytesMut::with_capacity(READ_CHUNK);
    while let Some(ReadRequest {
        kind,
        cancel,
        reply,
    }) = requests.recv().await
    {
        buffer.clear();
        let finished = tokio::select! {
            biased;
            () = cancel.cancelled() => None,
            result = read_frame(&mut reader, &mut buffer, kind) => Some(result),
        };
        let outcome = match finished {
            Some(Ok(frame)) => ReadOutcome::Complete(frame),
            Some(Err(e)) => ReadOutcome::Failed(e),
            None => {
                trace!("read cancelled after {} bytes", buffer.len());
                ReadOutcome::Cancelled {
                    partial: buffer.split().freeze(),
                }
            }
        };
        if reply.send(outcome).is_err() {
            trace!("nobody waits for the reply anymore");
        }
    }
    trace!("frame reader stopped");
}

/// Reads chunks until `buffer` holds one complete frame.
///
/// Each chunk read is cancel safe, so dropping this future between reads
/// leaves no byte unaccounted for: everything received sits in `buffer`.
pub async fn read_frame<R>(
    reader: &mut R,
    buffer: &mut BytesMut,
    kind: ReplyKind,
) -> Result<Frame, FrameError>
where
    R: AsyncRead + Unpin,
{
    let mut chunk = [0u8; READ_CHUNK];
    loop {
        let read = match reader.read(&mut chunk).await {
            Ok(0) => {
                return Err(FrameError::Read {
                    source: io::ErrorKind::UnexpectedEof.into(),
                    partial: buffer.split().freeze(),
                });
            }
            Ok(read) => read,
            Err(source) => {
                return Err(FrameError::Read {
                    source,
                    partial: buffer.split().freeze(),
                });
            }
        };
        buffer.extend_from_slice(&chunk[..read]);
        trace!("accumulated {} bytes", buffer.len());

        match scan(buffer, kind) {
            FrameState::Incomplete => {}
            FrameState::SingleLine { status_end } => {
                let status = buffer.split_to(status_end).freeze();
                if !buffer.is_empty() {
                    trace!("discarding {} bytes after status line", buffer.len());
                    buffer.clear();
                }
                return Ok(Frame::single_line(status));
            }
            FrameState::MultiLine {
                status_end,
                data_end,
            } => {
                let raw = buffer.split().freeze();
                return Ok(Frame::multi_line(
                    raw.slice(..status_end),
                    raw.slice(status_end..data_end),
                ));
            }
            FrameState::Error { .. } => {
                return Err(FrameError::Protocol {
                    reply: buffer.split().freeze(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        pin::Pin,
        task::{Context, Poll},
    };

    use assertables::*;
    use rstest::*;
    use tokio::io::ReadBuf;

    use super::*;

    /// Hands out exactly one chunk per read, then end of stream.
    struct Chunked {
        chunks: VecDeque<&'static [u8]>,
    }

    impl Chunked {
        fn new(chunks: &[&'static str]) -> Self {
            Self {
                chunks: chunks.iter().map(|chunk| chunk.as_bytes()).collect(),
            }
        }
    }

    impl AsyncRead for Chunked {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            if let Some(chunk) = self.chunks.pop_front() {
                buf.put_slice(chunk);
            }
            Poll::Ready(Ok(()))
        }
    }

    #[rstest]
    #[case(&["+OK 2 messages\r\n1 120\r\n2 455\r\n.", "\r\n"])]
    #[case(&["+OK 2 messages\r\n1 120\r\n2 455\r\n", ".\r\n"])]
    #[case(&["+OK 2 messages\r\n1 120\r\n2 455\r", "\n.", "\r", "\n"])]
    #[case(&["+", "OK 2 messages\r", "\n1 120\r\n2 455\r\n.\r\n"])]
    #[tokio::test]
    async fn test_split_terminator_is_detected(#[case] chunks: &[&'static str]) {
        let mut reader = Chunked::new(chunks);
        let mut buffer = BytesMut::new();

        let frame = assert_ok!(read_frame(&mut reader, &mut buffer, ReplyKind::MultiLine).await);

        assert_eq!(b"+OK 2 messages\r\n", frame.status());
        assert_eq!(&b"1 120\r\n2 455"[..], frame.data());
        assert!(buffer.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn test_dot_at_line_end_is_not_a_terminator() {
        let mut reader = Chunked::new(&["+OK\r\nSubject: hi.\r\n", "\r\nbody.\r\n", ".\r\n"]);
        let mut buffer = BytesMut::new();

        let frame = assert_ok!(read_frame(&mut reader, &mut buffer, ReplyKind::MultiLine).await);

        assert_eq!(&b"Subject: hi.\r\n\r\nbody."[..], frame.data());
    }

    #[rstest]
    #[tokio::test]
    async fn test_error_reply_is_protocol_error() {
        let mut reader = Chunked::new(&["-ERR no", " such message\r\n"]);
        let mut buffer = BytesMut::new();

        let error = assert_err!(read_frame(&mut reader, &mut buffer, ReplyKind::MultiLine).await);

        assert!(
            matches!(&error, FrameError::Protocol { reply } if reply == &b"-ERR no such message\r\n"[..])
        );
    }

    #[rstest]
    #[tokio::test]
    async fn test_end_of_stream_carries_partial_reply() {
        let mut reader = Chunked::new(&["+OK\r\n1 1"]);
        let mut buffer = BytesMut::new();

        let error = assert_err!(read_frame(&mut reader, &mut buffer, ReplyKind::MultiLine).await);

        match error {
            FrameError::Read { source, partial } => {
                assert_eq!(io::ErrorKind::UnexpectedEof, source.kind());
                assert_eq!(&b"+OK\r\n1 1"[..], partial);
            }
            other => panic!("expected read failure, got {other:?}"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn test_single_line_stops_at_status_line() {
        let mut reader = Chunked::new(&["+OK 1 ", "whqtswO00WBw418f9t5JxYwZ\r\n"]);
        let mut buffer = BytesMut::new();

        let frame = assert_ok!(read_frame(&mut reader, &mut buffer, ReplyKind::SingleLine).await);

        assert_eq!("+OK 1 whqtswO00WBw418f9t5JxYwZ", frame.status_text());
    }

    #[rstest]
    #[tokio::test]
    async fn test_reader_task_serves_consecutive_requests() {
        let reader = FrameReader::spawn(Chunked::new(&["+OK\r\n", "+OK 1 abc\r\n"]));

        for expected in ["+OK", "+OK 1 abc"] {
            let pending = assert_ok!(
                reader
                    .request(ReplyKind::SingleLine, CancellationToken::new())
                    .await
            );
            match assert_ok!(pending.await) {
                ReadOutcome::Complete(frame) => assert_eq!(expected, frame.status_text()),
                other => panic!("expected complete frame, got {other:?}"),
            }
        }
        reader.stop().await;
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn test_cancelled_request_returns_partial_bytes() {
        let (client, mut server) = tokio::io::duplex(64);
        let reader = FrameReader::spawn(client);
        tokio::io::AsyncWriteExt::write_all(&mut server, b"+OK 1 ")
            .await
            .expect("duplex should accept bytes");
        let cancel = CancellationToken::new();

        let pending = assert_ok!(reader.request(ReplyKind::SingleLine, cancel.clone()).await);
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        cancel.cancel();

        match assert_ok!(pending.await) {
            ReadOutcome::Cancelled { partial } => assert_eq!(&b"+OK 1 "[..], partial),
            other => panic!("expected cancellation, got {other:?}"),
        }
        reader.stop().await;
    }
}
