use std::{
    any::Any,
    fmt::Write as _,
    panic::{AssertUnwindSafe, catch_unwind},
    sync::Arc,
};

use hashbrown::HashMap;
use tracing::{debug, warn};

use crate::{
    config::Config,
    core::{Calculation, History},
    error::{CalcError, CalcResult},
    operations::{Operation, OperationRegistry},
    persist::Destination,
    types::{Number, Operand},
};

use super::output::Output;

/// Message returned by `exit` and `quit`.
pub const EXIT_MESSAGE: &str = "Exiting the calculator. Goodbye!";

/// Non-arithmetic commands handled by the dispatcher itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Show the help text.
    Help,
    /// Leave the interactive loop.
    Exit,
    /// Remove the last calculation.
    Undo,
    /// Remove every calculation.
    Clear,
    /// Write the ledger to disk.
    Save,
    /// Replace the ledger from disk.
    Load,
    /// Return the ledger.
    History,
}

impl ControlCommand {
    /// Reserved names, including both exit aliases.
    pub const NAMES: [(&'static str, ControlCommand); 8] = [
        ("help", Self::Help),
        ("exit", Self::Exit),
        ("quit", Self::Exit),
        ("undo", Self::Undo),
        ("clear", Self::Clear),
        ("save", Self::Save),
        ("load", Self::Load),
        ("history", Self::History),
    ];
}

#[derive(Debug, Clone)]
enum Handler {
    Control(ControlCommand),
    Operation(Arc<dyn Operation>),
}

/// Command dispatcher owning one history ledger.
///
/// Instances share nothing; each has its own ledger, registry and default
/// destination.
#[derive(Debug)]
pub struct Calculator {
    history: History,
    registry: OperationRegistry,
    commands: HashMap<String, Handler>,
    destination: Destination,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator {
    /// Dispatcher over the built-in operations, saving to `history.json`.
    pub fn new() -> Self {
        Self::with_registry(OperationRegistry::load(), Destination::default())
    }

    /// Dispatcher using the configured history destination.
    pub fn from_config(config: &Config) -> Self {
        Self::with_registry(OperationRegistry::load(), config.history.destination())
    }

    /// Dispatcher over an arbitrary operation registry.
    pub fn with_registry(registry: OperationRegistry, destination: Destination) -> Self {
        let mut commands = HashMap::new();
        for (name, control) in ControlCommand::NAMES {
            commands.insert(name.to_string(), Handler::Control(control));
        }
        for entry in registry.entries() {
            let name = &*entry.command;
            if commands.contains_key(name) {
                warn!(command = name, "operation shadowed by control command");
                continue;
            }
            if let Some(op) = registry.get(name) {
                commands.insert(name.to_string(), Handler::Operation(op));
            }
        }

        Self {
            history: History::new(registry.lookup()),
            registry,
            commands,
            destination,
        }
    }

    /// Runs one command. Never panics and never returns an error type:
    /// failures come back as `Output::Message("Error: ...")`.
    pub fn execute_command(&mut self, name: &str, args: &[Operand]) -> Output {
        let Some(handler) = self.commands.get(name).cloned() else {
            debug!(command = name, "unknown command");
            return Output::error(CalcError::UnknownCommand(name.to_string()));
        };

        match handler {
            Handler::Control(control) => self.run_control(control, args),
            Handler::Operation(op) => match self.run_operation(op, args) {
                Ok(result) => Output::Number(result),
                Err(err) => {
                    warn!(command = name, error = %err, "command failed");
                    Output::error(err)
                }
            },
        }
    }

    /// Help text listing every operation and control command.
    pub fn help_text(&self) -> String {
        let mut text = String::from("Available commands:\n\nOperation Commands:\n");
        for entry in self.registry.entries() {
            if matches!(self.commands.get(&*entry.command), Some(Handler::Operation(_))) {
                let _ = writeln!(text, "- {}: {}", entry.command, entry.summary);
            }
        }
        text.push_str(
            "\nHistory Commands:\n\
             - undo: Undo the last calculation\n\
             - clear: Clear the calculation history\n\
             - history: Read the calculation history\n\
             \n\
             File Commands:\n\
             - save [path]: Save the current history to a file\n\
             - load [path]: Load history from a file\n\
             \n\
             General Commands:\n\
             - help: Display this help message\n\
             - exit/quit: Exit the calculator",
        );
        text
    }

    /// Ledger owned by this dispatcher.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Registered operations.
    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// Default destination for `save` and `load`.
    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Replaces the default destination.
    pub fn set_destination(&mut self, destination: Destination) {
        self.destination = destination;
    }

    /// Every command name the dispatcher accepts, sorted.
    pub fn command_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn run_operation(&mut self, op: Arc<dyn Operation>, args: &[Operand]) -> CalcResult<Number> {
        let [a, b] = args else {
            return Err(CalcError::InvalidArity {
                expected: 2,
                got: args.len(),
            });
        };
        let operation = op.name().to_string();
        let mut calc = Calculation::new(op, a.clone(), b.clone())?;

        // Plugin operations are foreign code; a panic becomes an error string.
        let result = catch_unwind(AssertUnwindSafe(|| calc.execute())).map_err(|payload| {
            CalcError::Panicked {
                operation,
                message: panic_message(payload.as_ref()),
            }
        })??;

        self.history.add(calc);
        Ok(result)
    }

    fn run_control(&mut self, control: ControlCommand, args: &[Operand]) -> Output {
        match control {
            ControlCommand::Help => Output::Message(self.help_text()),
            ControlCommand::Exit => Output::Message(EXIT_MESSAGE.to_string()),
            ControlCommand::Undo => match self.history.undo() {
                Ok(calc) => Output::Message(format!("Undone: {calc}")),
                Err(err) => Output::Message(err.to_string()),
            },
            ControlCommand::Clear => {
                self.history.clear();
                Output::Message("History cleared.".to_string())
            }
            ControlCommand::History => Output::History(self.history.get_history().to_vec()),
            ControlCommand::Save => {
                let dest = match self.destination_for(args) {
                    Ok(dest) => dest,
                    Err(err) => return Output::error(err),
                };
                match self.history.save(&dest) {
                    Ok(_) => Output::Message(format!("History saved to {}.", dest.path.display())),
                    Err(err) => Output::error(err),
                }
            }
            ControlCommand::Load => {
                let dest = match self.destination_for(args) {
                    Ok(dest) => dest,
                    Err(err) => return Output::error(err),
                };
                match self.history.load(&dest) {
                    Ok(_) => Output::Message(format!("History loaded from {}.", dest.path.display())),
                    Err(err) => Output::error(err),
                }
            }
        }
    }

    /// No argument means the default destination. A bare number is a file
    /// name too, since the line tokenizer turns `save 2024` into an int.
    fn destination_for(&self, args: &[Operand]) -> CalcResult<Destination> {
        match args {
            [] => Ok(self.destination.clone()),
            [Operand::Text(path)] => Ok(Destination::infer(path)),
            [arg @ (Operand::Int(_) | Operand::Float(_))] => Ok(Destination::infer(arg.to_string())),
            [Operand::Null] => Err(CalcError::InvalidPath("null".to_string())),
            _ => Err(CalcError::InvalidPath(format!("{} arguments", args.len()))),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
