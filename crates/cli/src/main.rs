pub mod command;
pub mod config;
pub mod error;
pub mod generator;
pub mod graph_io;
pub mod session;
pub mod types;

use std::env;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use command::{Command, HELP};
use session::Session;
use types::{ActiveGraph, DataSource, GraphKind};

#[tokio::main]
async fn main() {
    let (source, config_path) = parse_args();
    let config = match &config_path {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    }
    .expect("Failed to load config");

    init_tracing(&config.logging.filter);

    let initial = match &source {
        DataSource::Empty(kind) => ActiveGraph::new(*kind),
        DataSource::File(kind, path) => match graph_io::read_graph(path, *kind) {
            Ok(graph) => graph,
            Err(e) => {
                eprintln!("Failed to load {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
    };

    let mut session = Session::new(initial, &config);
    info!(?source, "Session started");

    println!("{}", HELP);
    let stdin = BufReader::new(tokio::io::stdin());
    if let Err(e) = run_loop(&mut session, stdin, interrupt).await {
        eprintln!("Input loop stopped: {}", e);
    }

    println!("Session closed.");
}

/// Completes on Ctrl-C. A failed listener never completes.
async fn interrupt() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Reads commands until `quit`, end of input or an interrupt at the prompt.
/// Command failures are reported and the loop keeps going.
///
/// `interrupt` is called once per prompt, so a Ctrl-C that cancelled a
/// running command does not also end the loop.
async fn run_loop<R, F, Fut>(
    session: &mut Session,
    input: R,
    mut interrupt: F,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    let mut lines = input.lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = interrupt() => {
                println!();
                info!("Interrupted at the prompt");
                break;
            }
        };
        let Some(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                eprintln!("Error: {}", e);
                continue;
            }
        };
        debug!(?command, "Dispatching command");

        let quit = command == Command::Quit;
        match session.execute(command).await {
            Ok(output) => println!("{}", output),
            Err(e) => eprintln!("Error: {}", e),
        }
        if quit {
            break;
        }
    }

    Ok(())
}

/// `RUST_LOG` wins over the configured filter. Logs go to stderr.
fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Parse command-line arguments:
/// `cost-graph [directed|undirected] [graph-file] [--config <path>]`
fn parse_args() -> (DataSource, Option<PathBuf>) {
    let args: Vec<String> = env::args().collect();
    let mut positional: Vec<&str> = Vec::new();
    let mut config_path = None;

    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        if arg == "--config" {
            match rest.next() {
                Some(path) => config_path = Some(PathBuf::from(path)),
                None => usage(&args[0]),
            }
        } else {
            positional.push(arg);
        }
    }

    let kind = match positional.first() {
        Some(k) => k.parse::<GraphKind>().unwrap_or_else(|_| usage(&args[0])),
        None => GraphKind::Directed,
    };

    let source = match positional.as_slice() {
        [] | [_] => DataSource::Empty(kind),
        [_, path] => DataSource::File(kind, PathBuf::from(*path)),
        _ => usage(&args[0]),
    };

    (source, config_path)
}

fn usage(program: &str) -> ! {
    eprintln!(
        "Usage: {} [directed|undirected] [graph-file] [--config <path>]\n  - directed|undirected: kind of the working graph (default directed)\n  - graph-file: load the initial graph from a file\n  - --config: configuration file (default crates/cli/Config.toml)",
        program
    );
    std::process::exit(1);
}
