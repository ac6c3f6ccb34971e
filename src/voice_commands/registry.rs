// Command registry - page-scoped and global handler tables plus dispatch

use super::lexicon::{Command, CommandKey};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

/// Handler for a command; receives the section payload when one was spoken
pub type CommandHandler = Arc<dyn Fn(Option<u8>) + Send + Sync>;

/// Registry shared between the shell, the screens, and the session manager
pub type SharedRegistry = Arc<Mutex<CommandRegistry>>;

/// Mapping from command key to handler
#[derive(Clone, Default)]
pub struct CommandTable {
    handlers: HashMap<CommandKey, CommandHandler>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn on<F>(mut self, key: CommandKey, handler: F) -> Self
    where
        F: Fn(Option<u8>) + Send + Sync + 'static,
    {
        self.insert(key, Arc::new(handler));
        self
    }

    pub fn insert(&mut self, key: CommandKey, handler: CommandHandler) {
        self.handlers.insert(key, handler);
    }

    pub fn get(&self, key: CommandKey) -> Option<&CommandHandler> {
        self.handlers.get(&key)
    }

    pub fn contains(&self, key: CommandKey) -> bool {
        self.handlers.contains_key(&key)
    }

    /// Registered keys, sorted by name for stable listings
    pub fn keys(&self) -> Vec<CommandKey> {
        let mut keys: Vec<_> = self.handlers.keys().copied().collect();
        keys.sort_by_key(|k| k.as_str());
        keys
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for CommandTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandTable")
            .field("keys", &self.keys())
            .finish()
    }
}

/// Which table (if any) handled a dispatched command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// Page-scoped handler ran
    Page,
    /// Global handler ran
    Global,
    /// Explicit page lookup for a section jump ran
    SectionFallback,
    /// Nothing registered for this key; dropped
    Unhandled,
}

/// Identifies one page registration; a stale token cannot clear a newer page's table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageToken(u64);

/// Two-tier command table: page handlers shadow global ones
#[derive(Debug, Default)]
pub struct CommandRegistry {
    global: CommandTable,
    page: CommandTable,
    generation: u64,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedRegistry {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Replace the global table (rebuilt by the shell when its dependencies change)
    pub fn set_global(&mut self, table: CommandTable) {
        crate::debug!("Global commands set: {:?}", table.keys());
        self.global = table;
    }

    /// Replace the page table wholesale
    pub fn register_page(&mut self, table: CommandTable) -> PageToken {
        self.generation += 1;
        crate::debug!(
            "Page commands registered (generation {}): {:?}",
            self.generation,
            table.keys()
        );
        self.page = table;
        PageToken(self.generation)
    }

    /// Empty the page table
    pub fn clear_page(&mut self) {
        self.generation += 1;
        self.page = CommandTable::new();
    }

    /// Clear the page table only if `token` is still the live registration
    pub fn clear_page_if_current(&mut self, token: PageToken) -> bool {
        if token.0 != self.generation {
            crate::trace!("Ignoring clear for stale page registration {}", token.0);
            return false;
        }
        self.clear_page();
        true
    }

    pub fn page(&self) -> &CommandTable {
        &self.page
    }

    pub fn global(&self) -> &CommandTable {
        &self.global
    }

    /// Find the handler for `command`: page table, then global table, then the explicit
    /// page-only lookup for section jumps
    pub fn resolve(&self, command: &Command) -> Option<(CommandHandler, DispatchOutcome)> {
        if let Some(handler) = self.page.get(command.key) {
            return Some((handler.clone(), DispatchOutcome::Page));
        }
        if let Some(handler) = self.global.get(command.key) {
            return Some((handler.clone(), DispatchOutcome::Global));
        }
        if command.key == CommandKey::GoToSection && command.payload.is_some() {
            return self
                .page
                .get(CommandKey::GoToSection)
                .map(|h| (h.clone(), DispatchOutcome::SectionFallback));
        }
        None
    }
}

/// Dispatch `command` through `registry`
///
/// The handler is cloned out and the lock released before it runs, so handlers are free
/// to register or clear page commands themselves.
pub fn dispatch(registry: &Mutex<CommandRegistry>, command: Command) -> DispatchOutcome {
    let resolved = registry.lock().resolve(&command);
    match resolved {
        Some((handler, outcome)) => {
            crate::debug!("Dispatching {} via {:?}", command.key, outcome);
            handler(command.payload);
            outcome
        }
        None => {
            crate::debug!("No handler for {}, ignoring", command.key);
            DispatchOutcome::Unhandled
        }
    }
}

/// Scoped page registration; dropping it clears the page table it installed
///
/// A screen holds one of these for as long as it is mounted, so its commands can never
/// outlive it.
pub struct PageRegistration {
    registry: Weak<Mutex<CommandRegistry>>,
    token: PageToken,
}

impl PageRegistration {
    pub fn register(registry: &SharedRegistry, table: CommandTable) -> Self {
        let token = registry.lock().register_page(table);
        Self {
            registry: Arc::downgrade(registry),
            token,
        }
    }

    pub fn token(&self) -> PageToken {
        self.token
    }
}

impl Drop for PageRegistration {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().clear_page_if_current(self.token);
        }
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
