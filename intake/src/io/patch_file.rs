//! Answer patch files: a TOML list of field assignments.
//!
//! ```toml
//! [[patch]]
//! field = "partner_mode"
//! value = "new"
//!
//! [[patch]]
//! field = "partner_name"
//! value = "Lucia"
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::fields::FieldPatch;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatchFile {
    #[serde(default)]
    pub patch: Vec<FieldPatch>,
}

pub fn parse_patches(contents: &str) -> Result<Vec<FieldPatch>> {
    let file: PatchFile = toml::from_str(contents).context("parse answer patches")?;
    Ok(file.patch)
}

pub fn load_patches(path: &Path) -> Result<Vec<FieldPatch>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_patches(&contents).with_context(|| format!("load {}", path.display()))
}
