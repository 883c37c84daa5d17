//! `fm friend` — friend edges and presence.

use anyhow::Result;
use clap::{Args, Subcommand};
use std::io::Write;

use super::Ctx;
use crate::output::render;
use focusmate_core::friend;

#[derive(Subcommand, Debug)]
pub enum FriendCommand {
    /// Add a friend (visible in your list only).
    Add(FriendIdArg),

    /// Remove a friend.
    Remove(FriendIdArg),

    /// List friend ids.
    List,

    /// Show friends' presence: who is studying, and for how long.
    Status,
}

#[derive(Args, Debug)]
pub struct FriendIdArg {
    /// The friend's user id.
    pub friend_id: i64,
}

pub fn run_friend(command: &FriendCommand, ctx: &mut Ctx<'_>) -> Result<()> {
    let user_id = ctx.acting_user()?;
    match command {
        FriendCommand::Add(args) => {
            friend::add_friend(ctx.conn, user_id, args.friend_id)?;
            render(
                ctx.output,
                &serde_json::json!({ "user_id": user_id, "friend_id": args.friend_id }),
                |_, w| writeln!(w, "added friend {}", args.friend_id),
            )
        }
        FriendCommand::Remove(args) => {
            friend::remove_friend(ctx.conn, user_id, args.friend_id)?;
            render(
                ctx.output,
                &serde_json::json!({ "user_id": user_id, "removed": args.friend_id }),
                |_, w| writeln!(w, "removed friend {}", args.friend_id),
            )
        }
        FriendCommand::List => {
            let ids = friend::list_friends(ctx.conn, user_id)?;
            render(
                ctx.output,
                &serde_json::json!({ "friend_ids": &ids }),
                |_, w| {
                    if ids.is_empty() {
                        return writeln!(w, "no friends yet");
                    }
                    for id in &ids {
                        writeln!(w, "{id}")?;
                    }
                    Ok(())
                },
            )
        }
        FriendCommand::Status => {
            let statuses = friend::friend_statuses(ctx.conn, user_id)?;
            render(ctx.output, &statuses, |statuses, w| {
                if statuses.is_empty() {
                    return writeln!(w, "no friends yet");
                }
                for status in statuses {
                    let presence = match status.current_timer_seconds {
                        Some(secs) if status.is_studying => {
                            format!("studying for {}m{:02}s", secs / 60, secs % 60)
                        }
                        _ => "idle".to_string(),
                    };
                    writeln!(w, "{:>4}  {:<16} {}", status.friend_id, status.name, presence)?;
                }
                Ok(())
            })
        }
    }
}
