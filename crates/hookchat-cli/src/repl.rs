//! Interactive line-oriented chat loop.

use hookchat_client::ChatRunner;
use hookchat_core::{ConversationMessage, HookchatError, Role, MAX_MESSAGE_CHARS};
use hookchat_session::SessionContext;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const HELP: &str = "\
Commands:
  /clear     clear the conversation
  /new       start a new session
  /stats     show message counts
  /session   show the session id and status
  /ping      test the webhook connection
  /help      show this help
  /quit      exit (Ctrl-D also works)
Ctrl-C cancels a reply that is still loading, or exits at the prompt.";

/// One line of user input.
#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Quit,
    Clear,
    NewSession,
    Stats,
    Session,
    Ping,
    Help,
    Unknown(&'a str),
    Message(&'a str),
    Empty,
}

pub fn parse_command(line: &str) -> Command<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }
    match trimmed {
        "/quit" | "/exit" => Command::Quit,
        "/clear" => Command::Clear,
        "/new" => Command::NewSession,
        "/stats" => Command::Stats,
        "/session" => Command::Session,
        "/ping" => Command::Ping,
        "/help" | "/?" => Command::Help,
        cmd if cmd.starts_with('/') && !cmd.contains(char::is_whitespace) => {
            Command::Unknown(cmd)
        }
        _ => Command::Message(line),
    }
}

/// Renders one log entry.
pub fn render_message<W: Write>(out: &mut W, message: &ConversationMessage) -> std::io::Result<()> {
    let who = match message.role() {
        Role::User => "You",
        Role::Assistant => "Assistant",
    };
    writeln!(out, "{who} • {}", message.display_time())?;
    writeln!(out, "{}", message.content())?;
    writeln!(out)
}

/// Forwards every Ctrl-C for the life of the process.
///
/// Installing the handler once replaces the default SIGINT behavior, so the
/// chat loop decides what an interrupt means: cancel a loading reply, or
/// leave when idle.
pub fn ctrl_c_events() -> mpsc::Receiver<()> {
    let (tx, rx) = mpsc::channel(4);
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if tx.send(()).await.is_err() {
                break;
            }
        }
    });
    rx
}

/// Reads lines from `input` until EOF, `/quit`, or an interrupt at the
/// prompt, running a turn per message.
///
/// An interrupt while a reply is loading cancels that exchange and keeps the
/// loop going. A closed `interrupts` channel simply disables interrupts.
pub async fn run_repl<R, W>(
    runner: &ChatRunner,
    session: &mut SessionContext,
    prompt: &str,
    input: R,
    out: &mut W,
    mut interrupts: mpsc::Receiver<()>,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    for message in session.messages() {
        render_message(out, message)?;
    }

    let mut lines = input.lines();
    loop {
        write!(out, "{prompt}")?;
        out.flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            Some(()) = interrupts.recv() => {
                debug!("Interrupted at prompt");
                writeln!(out)?;
                break;
            }
        };
        let Some(line) = line else {
            writeln!(out)?;
            break;
        };

        match parse_command(&line) {
            Command::Empty => {}
            Command::Quit => break,
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Unknown(cmd) => writeln!(out, "Unknown command {cmd}, try /help")?,
            Command::Clear => {
                session.clear();
                writeln!(out, "Conversation cleared.")?;
                render_message(out, session.last())?;
            }
            Command::NewSession => {
                session.new_session();
                writeln!(out, "New session {}.", session.session_id())?;
                render_message(out, session.last())?;
            }
            Command::Stats => {
                let stats = session.stats();
                writeln!(
                    out,
                    "Sent: {}  Received: {}  Total: {}",
                    stats.user_messages, stats.assistant_messages, stats.total_messages
                )?;
            }
            Command::Session => {
                let status = if session.is_busy() { "Processing" } else { "Ready" };
                writeln!(out, "Session: {} • {status}", session.session_id())?;
            }
            Command::Ping => {
                let result = runner.client().ping(session.session_id()).await;
                if result.success() {
                    writeln!(out, "Connected (attempt {})", result.attempt)?;
                } else {
                    writeln!(out, "Failed: {}", result.content)?;
                }
            }
            Command::Message(text) => {
                writeln!(out, "Thinking...")?;
                out.flush()?;

                let cancel = CancellationToken::new();
                let outcome = {
                    let turn = runner.run(session, text, &cancel);
                    tokio::pin!(turn);
                    loop {
                        tokio::select! {
                            outcome = &mut turn => break outcome,
                            Some(()) = interrupts.recv() => {
                                debug!("Interrupted while waiting for a reply");
                                cancel.cancel();
                            }
                        }
                    }
                };

                match outcome {
                    Ok(_) => render_message(out, session.last())?,
                    Err(HookchatError::Validation(reason)) => writeln!(
                        out,
                        "Please enter a message of 1 to {MAX_MESSAGE_CHARS} characters ({reason})."
                    )?,
                    Err(e) => {
                        warn!(error = %e, "Turn rejected");
                        writeln!(out, "{e}")?;
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use hookchat_client::{RetryPolicy, WebhookClient, WebhookPayload, WebhookResponse, WebhookTransport};
    use hookchat_core::{ErrorKind, HookchatResult};
    use std::sync::Arc;

    struct UpperTransport;

    #[async_trait]
    impl WebhookTransport for UpperTransport {
        async fn post(&self, payload: &WebhookPayload) -> HookchatResult<WebhookResponse> {
            Ok(WebhookResponse {
                status: 200,
                content_type: "application/json".into(),
                body: reply_body(&payload.message.to_uppercase()),
            })
        }
    }

    fn reply_body(text: &str) -> String {
        format!(r#"[{{"output": "{text}"}}]"#)
    }

    fn runner() -> ChatRunner {
        ChatRunner::new(WebhookClient::with_transport(
            Arc::new(UpperTransport),
            RetryPolicy::default(),
        ))
    }

    /// Raises an interrupt as soon as a request starts, then never answers.
    struct StallTransport {
        interrupt: mpsc::Sender<()>,
    }

    #[async_trait]
    impl WebhookTransport for StallTransport {
        async fn post(&self, _payload: &WebhookPayload) -> HookchatResult<WebhookResponse> {
            let _ = self.interrupt.send(()).await;
            std::future::pending().await
        }
    }

    /// An interrupt channel whose sender is already gone.
    fn no_interrupts() -> mpsc::Receiver<()> {
        mpsc::channel(1).1
    }

    async fn drive(script: &str, session: &mut SessionContext) -> String {
        let mut out = Vec::new();
        run_repl(&runner(), session, "> ", script.as_bytes(), &mut out, no_interrupts())
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("/quit"), Command::Quit);
        assert_eq!(parse_command("  /clear "), Command::Clear);
        assert_eq!(parse_command("/new"), Command::NewSession);
        assert_eq!(parse_command("   "), Command::Empty);
        assert_eq!(parse_command("/bogus"), Command::Unknown("/bogus"));
        assert_eq!(parse_command("hello"), Command::Message("hello"));
        // a slash followed by text is a message, not a command
        assert_eq!(parse_command("/ vs \\"), Command::Message("/ vs \\"));
    }

    #[tokio::test]
    async fn test_chat_round_trip() {
        let mut session = SessionContext::new("Welcome!");
        let output = drive("hello there\n/stats\n/quit\n", &mut session).await;

        assert!(output.contains("Welcome!"));
        assert!(output.contains("HELLO THERE"));
        assert!(output.contains("Sent: 1  Received: 2  Total: 3"));
        assert_eq!(session.message_count(), 3);
    }

    #[tokio::test]
    async fn test_clear_and_new_session() {
        let mut session = SessionContext::new("Welcome!");
        let before = session.session_id().to_string();
        let output = drive("one\n/clear\ntwo\n/new\n", &mut session).await;

        assert!(output.contains("Conversation cleared."));
        assert_ne!(session.session_id(), before);
        assert_eq!(session.message_count(), 1);
    }

    #[tokio::test]
    async fn test_oversized_message_is_refused() {
        let mut session = SessionContext::new("Welcome!");
        let script = format!("{}\n", "x".repeat(MAX_MESSAGE_CHARS + 1));
        let output = drive(&script, &mut session).await;

        assert!(output.contains("Please enter a message"));
        assert_eq!(session.message_count(), 1);
    }

    #[tokio::test]
    async fn test_interrupt_at_prompt_exits() {
        // input stays open, so only the interrupt can end the loop
        let (_writer, reader) = tokio::io::duplex(64);
        let (tx, rx) = mpsc::channel(1);
        tx.send(()).await.unwrap();

        let mut session = SessionContext::new("Welcome!");
        let mut out = Vec::new();
        run_repl(
            &runner(),
            &mut session,
            "> ",
            tokio::io::BufReader::new(reader),
            &mut out,
            rx,
        )
        .await
        .unwrap();

        assert_eq!(session.message_count(), 1);
    }

    #[tokio::test]
    async fn test_interrupt_cancels_loading_reply() {
        let (tx, rx) = mpsc::channel(1);
        let runner = ChatRunner::new(WebhookClient::with_transport(
            Arc::new(StallTransport { interrupt: tx }),
            RetryPolicy::default(),
        ));

        let mut session = SessionContext::new("Welcome!");
        let mut out = Vec::new();
        run_repl(&runner, &mut session, "> ", "hello\n/stats\n".as_bytes(), &mut out, rx)
            .await
            .unwrap();
        let output = String::from_utf8(out).unwrap();

        assert!(output.contains(ErrorKind::Cancelled.apology()));
        // the loop kept going after the cancelled turn
        assert!(output.contains("Sent: 1  Received: 2  Total: 3"));
        assert!(!session.is_busy());
        assert_eq!(session.last().content(), ErrorKind::Cancelled.apology());
    }
}
