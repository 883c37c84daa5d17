//! `fm init` — create the store and report where it lives.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::output::{OutputMode, render};
use focusmate_core::db::migrations;

#[derive(Args, Debug)]
pub struct InitArgs {}

#[derive(Serialize)]
struct InitReport {
    store: String,
    schema_version: u32,
}

pub fn run_init(
    _args: &InitArgs,
    conn: &rusqlite::Connection,
    store_path: &Path,
    output: OutputMode,
) -> Result<()> {
    // The store was created/migrated on open; just confirm.
    let report = InitReport {
        store: store_path.display().to_string(),
        schema_version: migrations::current_schema_version(conn)?,
    };

    render(output, &report, |report, w| {
        writeln!(
            w,
            "initialized store at {} (schema v{})",
            report.store, report.schema_version
        )
    })
}

#[cfg(test)]
mod tests {
    use super::InitArgs;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: InitArgs,
    }

    #[test]
    fn init_takes_no_arguments() {
        assert!(Wrapper::try_parse_from(["test"]).is_ok());
        assert!(Wrapper::try_parse_from(["test", "--bogus"]).is_err());
    }
}
