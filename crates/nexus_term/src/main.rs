//! Nexus terminal chat client.
//!
//! Connects to the executor's WebSocket at `ws://<host>/ws/<session>`, sends
//! each stdin line as a request and prints every response as it arrives.
//! Piped input works too: `echo "hi" | nexus-term` waits for the reply.
//!
//! Examples:
//!   nexus-term
//!   nexus-term --host executor.local:8000 --tls
//!   nexus-term --config ./nexus.json
//!   nexus-term paths

use std::io;
use std::path::PathBuf;
use std::process;

use nexus_chat::context::StaticContext;
use nexus_chat::ChatClient;
use tokio::io::BufReader;
use tracing::info;

mod chat_loop;
mod config;
mod socket;
mod terminal_view;

use config::{AppPaths, TermConfig};
use socket::SocketConnector;
use terminal_view::TerminalView;

#[derive(Debug, Default, PartialEq, Eq)]
struct ChatOptions {
    host: Option<String>,
    tls: bool,
    config: Option<PathBuf>,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Chat(ChatOptions),
    Paths,
    Help,
}

fn usage() -> ! {
    eprintln!("nexus-term (talks to the Nexus executor @ ws://127.0.0.1:8000 by default)");
    eprintln!("Usage: nexus-term [--host host:port] [--tls] [--config path] [command]\n");
    eprintln!("Commands:");
    eprintln!("  (none)                      Start an interactive chat session");
    eprintln!("  paths                       Show config directory and config file path");
    eprintln!("  help                        Show this message");
    eprintln!("\nEach line typed on stdin is sent as one message.");
    process::exit(1);
}

fn parse_args(args: Vec<String>) -> Result<Command, String> {
    let mut opts = ChatOptions::default();
    let mut command: Option<String> = None;
    let mut it = args.into_iter();

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--host" => {
                let host = it.next().ok_or("--host needs a value (host:port)")?;
                opts.host = Some(host);
            }
            "--tls" => opts.tls = true,
            "--config" => {
                let path = it.next().ok_or("--config needs a path")?;
                opts.config = Some(PathBuf::from(path));
            }
            "-h" | "--help" => return Ok(Command::Help),
            flag if flag.starts_with("--") => return Err(format!("unknown flag: {flag}")),
            other => {
                if command.is_some() {
                    return Err(format!("unexpected argument: {other}"));
                }
                command = Some(other.to_string());
            }
        }
    }

    match command.as_deref() {
        None => Ok(Command::Chat(opts)),
        Some("paths") => Ok(Command::Paths),
        Some("help") => Ok(Command::Help),
        Some(other) => Err(format!("unknown command: {other}")),
    }
}

fn print_paths() -> Result<(), config::ConfigError> {
    let paths = AppPaths::new()?;
    println!("Config directory: {}", paths.config_dir().display());
    println!("Config file: {}", paths.config_file().display());
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// Main
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout carries the transcript.
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let opts = match parse_args(std::env::args().skip(1).collect()) {
        Ok(Command::Chat(opts)) => opts,
        Ok(Command::Paths) => {
            print_paths()?;
            return Ok(());
        }
        Ok(Command::Help) => usage(),
        Err(msg) => {
            eprintln!("{msg}");
            usage();
        }
    };

    let config_path = match opts.config {
        Some(path) => path,
        None => AppPaths::new()?.config_file(),
    };
    let mut config = TermConfig::load_or_default(&config_path)?;
    if let Some(host) = opts.host {
        config.host = host;
    }
    if opts.tls {
        config.secure = true;
    }
    info!("Config loaded from {}", config_path.display());

    let endpoint = config.endpoint();
    let (mut connector, mut events) = SocketConnector::new();
    let mut client = ChatClient::connect(
        &mut connector,
        &endpoint,
        TerminalView::new(io::stdout()),
        StaticContext::new(config.context),
    )?;
    info!(
        "Session {} -> {}",
        client.session(),
        endpoint.url_for(client.session())
    );

    let stdin = BufReader::new(tokio::io::stdin());
    tokio::select! {
        result = chat_loop::run_session(&mut client, stdin, &mut events) => result?,
        _ = tokio::signal::ctrl_c() => info!("Interrupted"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_args_starts_chat_with_defaults() {
        assert_eq!(parse_args(vec![]), Ok(Command::Chat(ChatOptions::default())));
    }

    #[test]
    fn flags_override_config() {
        let cmd = parse_args(args(&["--host", "exec:9000", "--tls", "--config", "x.json"])).unwrap();
        assert_eq!(
            cmd,
            Command::Chat(ChatOptions {
                host: Some("exec:9000".to_string()),
                tls: true,
                config: Some(PathBuf::from("x.json")),
            })
        );
    }

    #[test]
    fn commands_and_errors() {
        assert_eq!(parse_args(args(&["paths"])), Ok(Command::Paths));
        assert_eq!(parse_args(args(&["--help"])), Ok(Command::Help));
        assert!(parse_args(args(&["--host"])).is_err());
        assert!(parse_args(args(&["--verbose"])).is_err());
        assert!(parse_args(args(&["status"])).is_err());
        assert!(parse_args(args(&["paths", "extra"])).is_err());
    }
}
