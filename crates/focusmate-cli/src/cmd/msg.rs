//! `fm msg` — badge-gated nudges between friends.

use anyhow::Result;
use clap::{Args, Subcommand};
use std::io::Write;

use super::Ctx;
use crate::output::render;
use focusmate_core::message;

#[derive(Subcommand, Debug)]
pub enum MsgCommand {
    /// Send a message (costs one badge).
    Send(SendArgs),

    /// Show the newest unread message, without consuming it.
    Unread,

    /// Mark a message read.
    Read(ReadArgs),
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Receiving user id.
    #[arg(long)]
    pub to: i64,

    /// Message body.
    #[arg(long)]
    pub content: String,
}

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Message id (as shown by `fm msg unread`).
    pub id: i64,
}

pub fn run_msg(command: &MsgCommand, ctx: &mut Ctx<'_>) -> Result<()> {
    let user_id = ctx.acting_user()?;
    match command {
        MsgCommand::Send(args) => {
            let sent = message::send_message(ctx.conn, user_id, args.to, &args.content)?;
            render(ctx.output, &sent, |sent, w| {
                writeln!(
                    w,
                    "sent message {} to user {} (one badge spent)",
                    sent.id, sent.receiver_id
                )
            })
        }
        MsgCommand::Unread => {
            let unread = message::latest_unread(ctx.conn, user_id)?;
            render(
                ctx.output,
                &serde_json::json!({
                    "has_unread": unread.is_some(),
                    "data": &unread,
                }),
                |_, w| match &unread {
                    Some(msg) => {
                        writeln!(w, "#{} from {}: {}", msg.id, msg.sender_name, msg.content)
                    }
                    None => writeln!(w, "no unread messages"),
                },
            )
        }
        MsgCommand::Read(args) => {
            message::mark_read(ctx.conn, args.id)?;
            render(
                ctx.output,
                &serde_json::json!({ "id": args.id, "is_read": true }),
                |_, w| writeln!(w, "marked message {} read", args.id),
            )
        }
    }
}
