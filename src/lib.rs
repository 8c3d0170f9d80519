#![doc(test(attr(deny(warnings))))]

//! Recruit Wizard walks a municipality through a 地域おこし協力隊 recruitment
//! listing step by step, previews it as Markdown/HTML, and offers question
//! assistants that draft individual fields.
//!
//! The state machines live in `recruit-core`; this crate is the terminal
//! front end that drives them.

pub mod cli;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Installs the global tracing subscriber once and logs startup.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Recruit Wizard tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_is_idempotent() {
        super::init();
        super::init();
    }
}
