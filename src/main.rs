//! Interactive calculator.
//!
//! With trailing words, runs a single command and exits:
//!
//! ```bash
//! calclog add 3 5
//! calclog --history calc.db load
//! ```

#![allow(clippy::print_stdout)]

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::Context;
use clap::Parser;
use tracing::info;

use calclog::{
    cli::{FRAME_WIDTH, center_text, parse_line, render},
    config,
    dispatch::{Calculator, EXIT_MESSAGE, Output},
    persist::HistoryFormat,
    telemetry,
};

/// Two-operand calculator with undoable, savable history
#[derive(Parser, Debug)]
#[command(name = "calclog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (defaults to ./calclog.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// History file used by `save` and `load`
    #[arg(long)]
    history: Option<PathBuf>,

    /// History encoding (json or sqlite); inferred from the extension when omitted
    #[arg(long)]
    format: Option<HistoryFormat>,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Run one command and exit, e.g. `add 3 5`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = config::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(path) = cli.history {
        cfg.history.path = path;
    }
    if let Some(format) = cli.format {
        cfg.history.format = Some(format);
    }
    telemetry::init(&cfg.logging, cli.verbose).context("initializing logging")?;
    telemetry::install_panic_hook();

    let mut calculator = Calculator::from_config(&cfg);
    info!(destination = %calculator.destination().path.display(), "calculator ready");

    if !cli.command.is_empty() {
        if let Some((command, args)) = parse_line(&cli.command.join(" ")) {
            println!("{}", render(&calculator.execute_command(&command, &args), FRAME_WIDTH));
        }
        return Ok(());
    }

    run_repl(&mut calculator)
}

fn run_repl(calculator: &mut Calculator) -> anyhow::Result<()> {
    let rule = "=".repeat(FRAME_WIDTH);
    println!("\n{rule}");
    println!("{}", center_text("Welcome to the Interactive Calculator!", FRAME_WIDTH));
    println!("{rule}\n");
    println!("{}\n", center_text("Type 'help' for a list of commands.", FRAME_WIDTH));

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();
    loop {
        print!(">>> Enter command: ");
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            println!("{}", render(&Output::Message(EXIT_MESSAGE.to_string()), FRAME_WIDTH));
            return Ok(());
        }

        let Some((command, args)) = parse_line(&line) else {
            continue;
        };
        let output = calculator.execute_command(&command, &args);
        println!("{}", render(&output, FRAME_WIDTH));

        if matches!(command.as_str(), "exit" | "quit") {
            return Ok(());
        }
    }
}
