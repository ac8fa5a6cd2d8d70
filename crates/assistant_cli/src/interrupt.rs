//! Ctrl-C handling.
//!
//! # Invariants
//! - An interrupt ends the session the way `exit` does.
//! - Applied changes are already stored when the interrupt arrives, since
//!   modules save after every change. Unconfirmed edits are dropped.

use assistant_core::flush_logging;
use log::{info, warn};

/// Conventional exit status for a process ended by SIGINT.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

pub fn install(farewell: &'static str) {
    let installed = ctrlc::set_handler(move || {
        info!("event=interrupt module=cli status=ok");
        flush_logging();
        println!("\n{farewell}");
        std::process::exit(INTERRUPTED_EXIT_CODE);
    });
    if let Err(err) = installed {
        warn!("event=interrupt_install module=cli status=error error={err}");
    }
}
