// Voice commands module - phrase lexicon, debounce, and the handler registry

pub mod debounce;
pub mod lexicon;
pub mod registry;

pub use debounce::CommandDebouncer;
pub use lexicon::{resolve, Command, CommandKey};
pub use registry::{
    dispatch, CommandRegistry, CommandTable, DispatchOutcome, PageRegistration, SharedRegistry,
};

use serde::Serialize;

/// One row of the spoken-command help listing
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CommandListing {
    pub key: CommandKey,
    pub phrases: Vec<&'static str>,
    /// True when the active screen handles it rather than the global table
    pub page_scoped: bool,
}

/// Commands currently reachable by voice, page-scoped entries first
pub fn available_commands(registry: &CommandRegistry) -> Vec<CommandListing> {
    let page = registry.page();
    let global = registry.global();

    let mut listing: Vec<CommandListing> = page
        .keys()
        .into_iter()
        .map(|key| CommandListing {
            key,
            phrases: lexicon::phrases_for(key),
            page_scoped: true,
        })
        .collect();

    listing.extend(
        global
            .keys()
            .into_iter()
            .filter(|key| !page.contains(*key))
            .map(|key| CommandListing {
                key,
                phrases: lexicon::phrases_for(key),
                page_scoped: false,
            }),
    );
    listing
}
