//! `fm picture` — proof-of-work photos, stored as raw bytes.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use super::Ctx;
use crate::output::render;
use focusmate_core::picture;

#[derive(Subcommand, Debug)]
pub enum PictureCommand {
    /// Store an image file.
    Add(AddArgs),

    /// List stored pictures.
    List,

    /// Write a stored picture back out to a file.
    Export(ExportArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Image file to read.
    #[arg(long)]
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Picture id (as shown by `fm picture list`).
    pub id: i64,

    /// Destination file.
    #[arg(long)]
    pub out: PathBuf,
}

pub fn run_picture(command: &PictureCommand, ctx: &mut Ctx<'_>) -> Result<()> {
    let user_id = ctx.acting_user()?;
    match command {
        PictureCommand::Add(args) => {
            let bytes = std::fs::read(&args.file)
                .with_context(|| format!("read image {}", args.file.display()))?;
            let id = picture::add_picture(ctx.conn, user_id, &bytes)?;
            render(
                ctx.output,
                &serde_json::json!({ "id": id, "byte_len": bytes.len() }),
                |_, w| writeln!(w, "stored picture {id} ({} bytes)", bytes.len()),
            )
        }
        PictureCommand::List => {
            let infos = picture::list_pictures(ctx.conn, user_id)?;
            render(ctx.output, &infos, |infos, w| {
                if infos.is_empty() {
                    return writeln!(w, "no pictures stored");
                }
                for info in infos {
                    writeln!(w, "{:>4}  {} bytes", info.id, info.byte_len)?;
                }
                Ok(())
            })
        }
        PictureCommand::Export(args) => {
            let bytes = picture::get_picture(ctx.conn, args.id)?;
            std::fs::write(&args.out, &bytes)
                .with_context(|| format!("write image {}", args.out.display()))?;
            render(
                ctx.output,
                &serde_json::json!({ "id": args.id, "out": args.out.display().to_string() }),
                |_, w| writeln!(w, "wrote picture {} to {}", args.id, args.out.display()),
            )
        }
    }
}
