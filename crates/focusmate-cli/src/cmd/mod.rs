//! Command handlers, one module per command family.

pub mod completions;
pub mod deadline;
pub mod focus;
pub mod friend;
pub mod init;
pub mod msg;
pub mod picture;
pub mod user;

use anyhow::{Context, Result, bail};
use rusqlite::Connection;
use std::path::PathBuf;

use crate::output::OutputMode;
use focusmate_core::config;

/// Shared state handed to every command handler.
pub struct Ctx<'a> {
    pub conn: &'a mut Connection,
    pub output: OutputMode,
    /// The global `--user` override, if given.
    pub user_flag: Option<i64>,
}

impl Ctx<'_> {
    /// The user a command acts as: `--user` flag, else the config default.
    ///
    /// # Errors
    ///
    /// Fails when neither source provides an id.
    pub fn acting_user(&self) -> Result<i64> {
        if let Some(id) = self.user_flag {
            return Ok(id);
        }
        if let Some(id) = config::load_user_config()?.default_user {
            return Ok(id);
        }
        bail!("no acting user: pass --user <id> or set default_user in the focusmate config")
    }
}

/// Resolve the store path: `--db` flag, `FOCUSMATE_DB` env, config file,
/// then the platform data directory.
///
/// # Errors
///
/// Fails when no source yields a path (no flag, no env, no config, and no
/// resolvable platform data directory).
pub fn resolve_store_path(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    if let Ok(path) = std::env::var("FOCUSMATE_DB") {
        return Ok(PathBuf::from(path));
    }
    let config = config::load_user_config().context("load focusmate config")?;
    if let Some(path) = config.store_path {
        return Ok(path);
    }
    config::default_store_path()
        .context("no store path: pass --db, set FOCUSMATE_DB, or configure store_path")
}
