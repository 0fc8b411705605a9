//! Credential-gated, three-step intake wizard.
//!
//! The crate keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (answer record, field patches,
//!   field relevance, step sequencing). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting collaborators (configuration, token storage,
//!   HTTP verification, submission sinks). Behind traits so tests can script them.
//!
//! Orchestration modules ([`session`], [`context`], [`submit`], [`fill`])
//! combine the two into the gate-then-wizard flow used by the CLI and the UI
//! server.

pub mod context;
pub mod core;
pub mod exit_codes;
pub mod fill;
pub mod io;
pub mod logging;
pub mod session;
pub mod submit;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
