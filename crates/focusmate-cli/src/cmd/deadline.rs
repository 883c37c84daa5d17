//! `fm deadline` — the ordered to-do list.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use std::io::Write;

use super::Ctx;
use crate::output::{pretty_rule, render};
use focusmate_core::deadline;
use focusmate_core::model::DeadlineItem;

#[derive(Subcommand, Debug)]
pub enum DeadlineCommand {
    /// Add an item at the end of the list.
    Add(AddArgs),

    /// List items: ranked first, completed last. Repairs stale ranks.
    List,

    /// Edit an item's task text and due date.
    Edit(EditArgs),

    /// Mark an item completed.
    Done(IdArg),

    /// Mark a completed item as open again.
    Undo(IdArg),

    /// Toggle the "working on this now" marker.
    Doing(DoingArgs),

    /// Delete an item.
    Remove(IdArg),

    /// Write explicit positions, e.g. `fm deadline reorder 7=1 3=2`.
    Reorder(ReorderArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// What needs doing.
    #[arg(long)]
    pub task: String,

    /// Due date (ISO, e.g. 2025-03-01).
    #[arg(long)]
    pub due: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Item id.
    pub id: i64,

    /// New task text.
    #[arg(long)]
    pub task: String,

    /// New due date; omit to clear it.
    #[arg(long)]
    pub due: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct IdArg {
    /// Item id.
    pub id: i64,
}

#[derive(Args, Debug)]
pub struct DoingArgs {
    /// Item id.
    pub id: i64,

    /// Clear the marker instead of setting it.
    #[arg(long)]
    pub off: bool,
}

#[derive(Args, Debug)]
pub struct ReorderArgs {
    /// `id=position` pairs, applied verbatim as one batch.
    #[arg(required = true, value_name = "ID=POS")]
    pub positions: Vec<String>,
}

/// Parse one `id=position` pair.
fn parse_position(raw: &str) -> Result<(i64, i64)> {
    let (id, pos) = raw
        .split_once('=')
        .with_context(|| format!("expected ID=POS, got '{raw}'"))?;
    let id: i64 = id
        .trim()
        .parse()
        .with_context(|| format!("bad item id in '{raw}'"))?;
    let pos: i64 = pos
        .trim()
        .parse()
        .with_context(|| format!("bad position in '{raw}'"))?;
    Ok((id, pos))
}

fn write_item_line(w: &mut dyn Write, item: &DeadlineItem) -> std::io::Result<()> {
    let marker = if item.is_done {
        "[x]"
    } else if item.is_doing {
        "[>]"
    } else {
        "[ ]"
    };
    let due = item
        .due_date
        .map_or_else(String::new, |d| format!("  (due {d})"));
    writeln!(
        w,
        "{:>4}  {} #{} {}{}",
        if item.is_done {
            "-".to_string()
        } else {
            item.display_order.to_string()
        },
        marker,
        item.id,
        item.task,
        due
    )
}

pub fn run_deadline(command: &DeadlineCommand, ctx: &mut Ctx<'_>) -> Result<()> {
    let user_id = ctx.acting_user()?;
    match command {
        DeadlineCommand::Add(args) => {
            let item = deadline::add_item(ctx.conn, user_id, &args.task, args.due)?;
            render(ctx.output, &item, |item, w| {
                writeln!(w, "added #{} at position {}", item.id, item.display_order)
            })
        }
        DeadlineCommand::List => {
            let items = deadline::list(ctx.conn, user_id)?;
            render(ctx.output, &items, |items, w| {
                if items.is_empty() {
                    return writeln!(w, "no deadline items");
                }
                for item in items.iter().filter(|item| !item.is_done) {
                    write_item_line(w, item)?;
                }
                if items.iter().any(|item| item.is_done) {
                    pretty_rule(w)?;
                    for item in items.iter().filter(|item| item.is_done) {
                        write_item_line(w, item)?;
                    }
                }
                Ok(())
            })
        }
        DeadlineCommand::Edit(args) => {
            deadline::edit_item(ctx.conn, user_id, args.id, &args.task, args.due)?;
            render(
                ctx.output,
                &serde_json::json!({ "id": args.id, "ok": true }),
                |_, w| writeln!(w, "edited #{}", args.id),
            )
        }
        DeadlineCommand::Done(args) => {
            deadline::set_done(ctx.conn, user_id, args.id, true)?;
            render(
                ctx.output,
                &serde_json::json!({ "id": args.id, "is_done": true }),
                |_, w| writeln!(w, "completed #{}", args.id),
            )
        }
        DeadlineCommand::Undo(args) => {
            deadline::set_done(ctx.conn, user_id, args.id, false)?;
            render(
                ctx.output,
                &serde_json::json!({ "id": args.id, "is_done": false }),
                |_, w| writeln!(w, "reopened #{}", args.id),
            )
        }
        DeadlineCommand::Doing(args) => {
            deadline::set_doing(ctx.conn, user_id, args.id, !args.off)?;
            render(
                ctx.output,
                &serde_json::json!({ "id": args.id, "is_doing": !args.off }),
                |_, w| writeln!(w, "marked #{} {}", args.id, if args.off { "idle" } else { "doing" }),
            )
        }
        DeadlineCommand::Remove(args) => {
            deadline::remove_item(ctx.conn, user_id, args.id)?;
            render(
                ctx.output,
                &serde_json::json!({ "id": args.id, "removed": true }),
                |_, w| writeln!(w, "removed #{}", args.id),
            )
        }
        DeadlineCommand::Reorder(args) => {
            let positions = args
                .positions
                .iter()
                .map(|raw| parse_position(raw))
                .collect::<Result<Vec<_>>>()?;
            deadline::reorder(ctx.conn, user_id, &positions)?;
            render(
                ctx.output,
                &serde_json::json!({ "updated": positions.len() }),
                |_, w| writeln!(w, "reordered {} items", positions.len()),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DeadlineCommand, parse_position};
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(subcommand)]
        command: DeadlineCommand,
    }

    #[test]
    fn add_parses_task_and_due() {
        let w = Wrapper::try_parse_from([
            "test", "add", "--task", "read", "--due", "2025-03-01",
        ])
        .expect("parse");
        assert!(matches!(w.command, DeadlineCommand::Add(args) if args.due.is_some()));
    }

    #[test]
    fn bad_due_date_is_rejected() {
        assert!(
            Wrapper::try_parse_from(["test", "add", "--task", "x", "--due", "yesterday"])
                .is_err()
        );
    }

    #[test]
    fn reorder_requires_at_least_one_pair() {
        assert!(Wrapper::try_parse_from(["test", "reorder"]).is_err());
        assert!(Wrapper::try_parse_from(["test", "reorder", "3=1"]).is_ok());
    }

    #[test]
    fn position_pairs_parse() {
        assert_eq!(parse_position("7=2").expect("parse"), (7, 2));
        assert_eq!(parse_position(" 7 = 2 ").expect("parse"), (7, 2));
        assert!(parse_position("7").is_err());
        assert!(parse_position("a=2").is_err());
        assert!(parse_position("7=b").is_err());
    }

    #[test]
    fn doing_off_flag_parses() {
        let w = Wrapper::try_parse_from(["test", "doing", "4", "--off"]).expect("parse");
        assert!(matches!(w.command, DeadlineCommand::Doing(args) if args.off && args.id == 4));
    }
}
