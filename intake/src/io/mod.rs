//! I/O helpers: configuration, token storage, verification and submission.

pub mod config;
pub mod patch_file;
pub mod submitter;
pub mod token_store;
pub mod verifier;
