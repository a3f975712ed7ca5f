//! Event handling for a running page.

/// Intent and timer loop
pub mod event_loop;
/// Intent handler registry
pub mod handlers;
/// Intents delivered to the page
pub mod intent;
/// Page state shared by handlers
pub mod site;

pub use event_loop::{
    RunSummary,
    read_intents,
    run,
};
pub use handlers::{
    Dispatcher,
    Handler,
};
pub use intent::{
    Intent,
    IntentKind,
};
pub use site::{
    Environment,
    Outcome,
    Site,
};
