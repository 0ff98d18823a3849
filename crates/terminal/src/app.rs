use std::io::Write;

use chatterbox::storage::KeyValueStore;
use chatterbox::{ChatSession, PendingReply};
use rand::Rng;
use snafu::{ResultExt, Snafu};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use crate::commands::{Command, HELP_TEXT};
use crate::view::TerminalView;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AppError {
    #[snafu(display("failed to read from standard input"))]
    ReadInput {
        stage: &'static str,
        source: std::io::Error,
    },
}

pub type AppResult<T> = Result<T, AppError>;

/// Drives a session from `input` until `/quit`, or until input ends and
/// every pending reply has landed.
pub async fn run<S, W, R, I>(
    session: &mut ChatSession<S, TerminalView<W>, R>,
    input: I,
) -> AppResult<()>
where
    S: KeyValueStore,
    W: Write,
    R: Rng,
    I: AsyncBufRead + Unpin,
{
    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel::<PendingReply>();
    let mut lines = input.lines();
    let mut input_open = true;
    let mut outstanding = 0usize;

    loop {
        if !input_open && outstanding == 0 {
            break;
        }

        tokio::select! {
            line = lines.next_line(), if input_open => {
                let Some(line) = line.context(ReadInputSnafu {
                    stage: "read-input-line",
                })?
                else {
                    tracing::debug!(outstanding, "input closed; waiting for pending replies");
                    input_open = false;
                    continue;
                };

                match Command::parse(&line) {
                    Command::Quit => break,
                    Command::Help => session.view_mut().notice(HELP_TEXT),
                    Command::Unknown(name) => session
                        .view_mut()
                        .notice(&format!("unknown command /{name}; try /help")),
                    Command::Event(event) => {
                        if let Some(pending) = session.handle(event) {
                            outstanding += 1;
                            spawn_reply_timer(reply_tx.clone(), pending);
                        }
                    }
                }
            }
            Some(pending) = reply_rx.recv() => {
                outstanding = outstanding.saturating_sub(1);
                session.deliver_reply(pending);
            }
            else => break,
        }
    }

    Ok(())
}

/// One-shot timer per reply; nothing cancels it once armed.
fn spawn_reply_timer(reply_tx: mpsc::UnboundedSender<PendingReply>, pending: PendingReply) {
    tokio::spawn(async move {
        tokio::time::sleep(pending.delay()).await;
        // The loop may already be gone after /quit.
        let _ = reply_tx.send(pending);
    });
}
