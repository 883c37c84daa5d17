//! `fm user` — identity, presence, and the record summary.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use serde::Serialize;
use std::io::Write;

use super::Ctx;
use crate::output::{pretty_kv, render};
use focusmate_core::user;

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Create a user and print the assigned id.
    Create(CreateArgs),

    /// Show a user's profile.
    Show,

    /// Flip the studying flag friends see.
    Status(StatusArgs),

    /// Show badge balance and today's focus minutes.
    Record(RecordArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Display name.
    #[arg(long)]
    pub name: String,

    /// Optional flair shown next to the name.
    #[arg(long)]
    pub title: Option<String>,
}

#[derive(Args, Debug)]
#[command(group = clap::ArgGroup::new("state").required(true).args(["on", "off"]))]
pub struct StatusArgs {
    /// Mark the user as currently studying.
    #[arg(long)]
    pub on: bool,

    /// Mark the user as idle.
    #[arg(long)]
    pub off: bool,
}

#[derive(Args, Debug)]
pub struct RecordArgs {
    /// Day to summarize (defaults to today).
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Serialize)]
struct CreatedUser {
    user_id: i64,
    name: String,
}

pub fn run_user(command: &UserCommand, ctx: &mut Ctx<'_>) -> Result<()> {
    match command {
        UserCommand::Create(args) => {
            let user_id = user::create_user(ctx.conn, &args.name, args.title.as_deref())?;
            render(
                ctx.output,
                &CreatedUser {
                    user_id,
                    name: args.name.clone(),
                },
                |created, w| writeln!(w, "created user {} ({})", created.user_id, created.name),
            )
        }
        UserCommand::Show => {
            let profile = user::get_user(ctx.conn, ctx.acting_user()?)?;
            render(ctx.output, &profile, |profile, w| {
                pretty_kv(w, "id", profile.user_id.to_string())?;
                pretty_kv(w, "name", &profile.name)?;
                if let Some(ref title) = profile.title {
                    pretty_kv(w, "title", title)?;
                }
                pretty_kv(w, "badges", profile.badge_count().to_string())?;
                pretty_kv(
                    w,
                    "studying",
                    if profile.is_studying { "yes" } else { "no" },
                )
            })
        }
        UserCommand::Status(args) => {
            let user_id = ctx.acting_user()?;
            let studying = args.on;
            user::set_studying(ctx.conn, user_id, studying)?;
            render(
                ctx.output,
                &serde_json::json!({ "user_id": user_id, "is_studying": studying }),
                |_, w| {
                    writeln!(
                        w,
                        "user {user_id} is now {}",
                        if studying { "studying" } else { "idle" }
                    )
                },
            )
        }
        UserCommand::Record(args) => {
            let user_id = ctx.acting_user()?;
            let date = args.date.unwrap_or_else(|| chrono::Local::now().date_naive());
            let status = user::record_status(ctx.conn, user_id, date)?;
            render(ctx.output, &status, |status, w| {
                pretty_kv(w, "badges", status.badge_count.to_string())?;
                pretty_kv(w, "minutes today", status.minutes_today.to_string())?;
                pretty_kv(
                    w,
                    "studying",
                    if status.is_studying { "yes" } else { "no" },
                )
            })
        }
    }
}
