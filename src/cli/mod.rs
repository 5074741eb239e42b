//! # CLI Module
//!
//! ## Commands
//!
//! ### `serve`
//!
//! Run the management API and the dynamic mock routes:
//!
//! ```bash
//! amock serve --addr 0.0.0.0:3000
//! ```
//!
//! ### `generate`
//!
//! Generate one batch from the terminal; `--dry-run` prints it without saving:
//!
//! ```bash
//! amock generate --description "users with name, email and age" --dry-run
//! ```
//!
//! ### `list` / `delete`
//!
//! ```bash
//! amock list
//! amock delete 01J9Z3W6Q0Y4S8M1Y2T3V4W5X6
//! ```
//!
//! Every command accepts `--config <FILE>` and `--data-dir <DIR>`; backend
//! settings come from `OPENAI_API_KEY`, `OPENAI_BASE_URL` and `OPENAI_MODEL`
//! or the matching flags.

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run_cli, Cli, Commands, ModelArgs};
