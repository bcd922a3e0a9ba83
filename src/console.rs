use std::io::Write;

use tokio::io::{stdin, AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};

/// Lifecycle of the serving process, driven by console input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Running,
    ShuttingDown,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Stop,
    Empty,
    Invalid(String),
}

pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        Command::Empty
    } else if trimmed.eq_ignore_ascii_case("stop") {
        Command::Stop
    } else {
        Command::Invalid(trimmed.to_string())
    }
}

/// Read commands from stdin until `stop` is received, then signal shutdown.
///
/// Invalid input keeps the process in `Running` and re-prompts; empty lines
/// re-prompt silently.
pub async fn command_loop(shutdown: watch::Sender<bool>) {
    let mut lines = BufReader::new(stdin()).lines();
    let mut lifecycle = Lifecycle::Running;

    while lifecycle == Lifecycle::Running {
        print!("> ");
        let _ = std::io::stdout().flush();

        match lines.next_line().await {
            Ok(Some(line)) => match parse_command(&line) {
                Command::Stop => {
                    info!("stop command received, shutting down");
                    lifecycle = Lifecycle::ShuttingDown;
                    let _ = shutdown.send(true);
                }
                Command::Empty => {}
                Command::Invalid(cmd) => println!("invalid command: {cmd}"),
            },
            // stdin closed; the server stays up until a signal arrives.
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "failed to read console input");
                break;
            }
        }
    }
}

/// Resolves when either the console requests shutdown or the process receives
/// a termination signal.
pub async fn shutdown_signal(mut shutdown: watch::Receiver<bool>) {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
        info!("received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let stop = async {
        let _ = shutdown.changed().await;
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
        _ = stop => {},
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::watch;

    use super::{parse_command, shutdown_signal, Command};

    #[test]
    fn stop_is_case_insensitive_and_trimmed() {
        assert_eq!(parse_command("stop"), Command::Stop);
        assert_eq!(parse_command("STOP"), Command::Stop);
        assert_eq!(parse_command("  Stop  "), Command::Stop);
    }

    #[test]
    fn empty_input_is_not_a_command() {
        assert_eq!(parse_command(""), Command::Empty);
        assert_eq!(parse_command("   "), Command::Empty);
    }

    #[test]
    fn anything_else_is_invalid() {
        assert_eq!(parse_command("halt"), Command::Invalid("halt".into()));
        assert_eq!(parse_command(" stop now "), Command::Invalid("stop now".into()));
    }

    #[tokio::test]
    async fn shutdown_signal_resolves_on_stop() {
        let (tx, rx) = watch::channel(false);
        let waiter = tokio::spawn(shutdown_signal(rx));
        tx.send(true).unwrap();
        waiter.await.unwrap();
    }
}
