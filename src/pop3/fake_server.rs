use std::time::Duration;

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt, DuplexStream},
    task::JoinHandle,
};

/// One scripted action of the fake server.
pub enum Step {
    Send(&'static str),
    Expect(&'static str),
    Stall(Duration),
    Hangup,
}

/// Plays `steps` on the server side of an in-memory connection.
///
/// Once the script is through, everything else the client writes is
/// collected until it shuts down its side and returned from the handle.
pub fn spawn(steps: Vec<Step>) -> (DuplexStream, JoinHandle<String>) {
    let (client, mut server) = tokio::io::duplex(4096);
    let handle = tokio::spawn(async move {
        for step in steps {
            match step {
                Step::Send(reply) => server
                    .write_all(reply.as_bytes())
                    .await
                    .expect("client should still be connected"),
                Step::Expect(line) => {
                    let mut received = vec![0; line.len()];
                    server
                        .read_exact(&mut received)
                        .await
                        .expect("command should arrive");
                    assert_eq!(line, String::from_utf8_lossy(&received));
                }
                Step::Stall(duration) => tokio::time::sleep(duration).await,
                Step::Hangup => return String::new(),
            }
        }
        let mut rest = Vec::new();
        if let Err(e) = server.read_to_end(&mut rest).await {
            panic!("reading leftovers should succeed: {e}");
        }
        String::from_utf8_lossy(&rest).into_owned()
    });

    (client, handle)
}

pub fn login() -> Vec<Step> {
    vec![
        Step::Send("+OK POP3 ready\r\n"),
        Step::Expect("USER alice\r\n"),
        Step::Send("+OK\r\n"),
        Step::Expect("PASS secret\r\n"),
        Step::Send("+OK\r\n"),
    ]
}
