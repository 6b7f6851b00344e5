use std::{borrow::Cow, collections::BTreeSet, fmt, sync::Arc};

use hashbrown::HashMap;
use tracing::{debug, info};

use super::{
    builtin::{Addition, Division, Modulus, Multiplication, Power, Subtraction},
    traits::Operation,
};

/// Constructor for a registered operation.
pub type OperationFactory = fn() -> Arc<dyn Operation>;

/// One `(command name -> operation)` registration.
#[derive(Clone)]
pub struct OperationEntry {
    /// Command name typed by the user.
    pub command: Cow<'static, str>,
    /// One-line description shown in help output.
    pub summary: Cow<'static, str>,
    /// Builds the operation instance.
    pub factory: OperationFactory,
}

impl OperationEntry {
    /// Creates an entry from static strings, usable in const tables.
    pub const fn new(
        command: &'static str,
        summary: &'static str,
        factory: OperationFactory,
    ) -> Self {
        Self {
            command: Cow::Borrowed(command),
            summary: Cow::Borrowed(summary),
            factory,
        }
    }
}

impl fmt::Debug for OperationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationEntry")
            .field("command", &self.command)
            .field("summary", &self.summary)
            .finish_non_exhaustive()
    }
}

fn addition() -> Arc<dyn Operation> {
    Arc::new(Addition)
}

fn subtraction() -> Arc<dyn Operation> {
    Arc::new(Subtraction)
}

fn multiplication() -> Arc<dyn Operation> {
    Arc::new(Multiplication)
}

fn division() -> Arc<dyn Operation> {
    Arc::new(Division)
}

fn power() -> Arc<dyn Operation> {
    Arc::new(Power)
}

fn modulus() -> Arc<dyn Operation> {
    Arc::new(Modulus)
}

/// Registration table for the operations shipped with the crate.
///
/// New operations are added here (or passed to
/// [`OperationRegistry::from_entries`]); the dispatcher never names them.
pub const BUILTIN_OPERATIONS: &[OperationEntry] = &[
    OperationEntry::new("add", "Add two numbers", addition),
    OperationEntry::new("subtract", "Subtract the second number from the first", subtraction),
    OperationEntry::new("multiply", "Multiply two numbers", multiplication),
    OperationEntry::new("divide", "Divide the first number by the second", division),
    OperationEntry::new("power", "Raise the first number to the power of the second", power),
    OperationEntry::new("modulus", "Remainder of the first number divided by the second", modulus),
];

/// Name-indexed set of instantiated operations.
#[derive(Debug, Clone, Default)]
pub struct OperationRegistry {
    entries: Vec<OperationEntry>,
    instances: Vec<Arc<dyn Operation>>,
    by_command: HashMap<String, usize>,
}

impl OperationRegistry {
    /// Loads the built-in registration table.
    pub fn load() -> Self {
        Self::from_entries(BUILTIN_OPERATIONS.iter().cloned())
    }

    /// Builds a registry from an arbitrary registration list.
    pub fn from_entries(entries: impl IntoIterator<Item = OperationEntry>) -> Self {
        let mut registry = Self::default();
        for entry in entries {
            registry.register(entry);
        }
        info!(operations = ?registry.command_names().collect::<Vec<_>>(), "operations loaded");
        registry
    }

    /// Adds an entry. A command name registered twice keeps its original
    /// position and takes the newer implementation.
    pub fn register(&mut self, entry: OperationEntry) {
        let instance = (entry.factory)();
        if let Some(&idx) = self.by_command.get(&*entry.command) {
            self.instances[idx] = instance;
            self.entries[idx] = entry;
            return;
        }
        self.by_command
            .insert(entry.command.to_string(), self.entries.len());
        self.entries.push(entry);
        self.instances.push(instance);
    }

    /// Looks up an operation by command name.
    pub fn get(&self, command: &str) -> Option<Arc<dyn Operation>> {
        let found = self
            .by_command
            .get(command)
            .map(|&idx| Arc::clone(&self.instances[idx]));
        if found.is_none() {
            debug!(command, "operation not found");
        }
        found
    }

    /// Registered command names.
    pub fn list(&self) -> BTreeSet<String> {
        self.command_names().map(str::to_string).collect()
    }

    /// Entries in registration order.
    pub fn entries(&self) -> &[OperationEntry] {
        &self.entries
    }

    /// Number of registered operations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds the lookup table used to resolve persisted operation names.
    pub fn lookup(&self) -> OperationLookup {
        let mut lookup = OperationLookup::default();
        for (entry, op) in self.entries.iter().zip(&self.instances) {
            lookup.insert(op.name(), Arc::clone(op));
            lookup.insert(&entry.command, Arc::clone(op));
        }
        lookup
    }

    fn command_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| &*e.command)
    }
}

/// Case-insensitive name -> operation table owned by a history ledger.
///
/// Resolves both operation names (`addition`) and command names (`add`).
#[derive(Debug, Clone, Default)]
pub struct OperationLookup {
    by_name: HashMap<String, Arc<dyn Operation>>,
}

impl OperationLookup {
    /// Adds or replaces an alias.
    pub fn insert(&mut self, name: &str, op: Arc<dyn Operation>) {
        self.by_name.insert(name.to_lowercase(), op);
    }

    /// Resolves a persisted operation name.
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn Operation>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }
}
