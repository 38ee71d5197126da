//! # Robolog CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, while this file
//! only invokes `cli::run()` and handles process termination.
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/robolog/src/cli/)                        │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring, prompts, exit codes (commands.rs)        │
//! │  - Terminal tables and JSON (render.rs)                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/robologapp/src/api.rs)                   │
//! │  - Row numbers → record indexes                             │
//! │  - Dispatches to command modules                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (crates/robologapp/src/commands/*)           │
//! │  - Business rules over the workbook                         │
//! │  - No knowledge of stdout/stderr or process exits           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Testing Approach
//!
//! - **Commands layer**: unit tests against the in-memory backend.
//! - **API layer**: row addressing and warning collection.
//! - **CLI layer**: argument parsing and rendering unit tests, plus end-to-end
//!   runs of the binary against a temporary workbook (`tests/cli_e2e.rs`).

mod cli;

fn main() {
    match cli::run() {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
