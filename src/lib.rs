//! Profile-based home environment management engine.
//!
//! homeenv keeps personal environment configuration ("profiles") in a
//! directory of per-profile descriptors and activates them per machine:
//! symlinks and copies into `$HOME`, PATH entries, and environment
//! variables, gated by declarative selector expressions over hostname,
//! username, and filesystem facts.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]** — parse profile descriptors and selector expressions
//! - **[`effects`]** — idempotent `check + apply` primitives (symlinks, copies)
//! - **[`install`]** / **[`emit`]** — apply one profile's effects; render
//!   shell statements for all active profiles
//! - **[`commands`]** — top-level subcommand orchestration (`install`,
//!   `profile`, `list`, `edit`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod effects;
pub mod emit;
pub mod error;
pub mod expand;
pub mod install;
pub mod logging;
