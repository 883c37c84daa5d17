//! `fm focus` — save sessions and read the hourly record.

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Args, Subcommand};
use std::io::Write;

use super::Ctx;
use crate::output::{pretty_kv, pretty_section, render};
use focusmate_core::focus;

#[derive(Subcommand, Debug)]
pub enum FocusCommand {
    /// Save a finished focus session.
    Save(SaveArgs),

    /// Show the hourly record for one day.
    Record(RecordArgs),

    /// Show per-day totals over a date range.
    Totals(TotalsArgs),
}

#[derive(Args, Debug)]
pub struct SaveArgs {
    /// Session length in seconds.
    #[arg(long)]
    pub seconds: i64,

    /// Optional note about the session (logged, not stored).
    #[arg(long)]
    pub note: Option<String>,

    /// Session end instant (ISO, e.g. 2025-03-01T15:53:00); defaults to now.
    /// Useful for backfilling from another device's clock.
    #[arg(long)]
    pub end: Option<NaiveDateTime>,
}

#[derive(Args, Debug)]
pub struct RecordArgs {
    /// Day to show (defaults to today).
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct TotalsArgs {
    /// First day, inclusive.
    #[arg(long)]
    pub from: NaiveDate,

    /// Last day, inclusive (defaults to today).
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

pub fn run_focus(command: &FocusCommand, ctx: &mut Ctx<'_>) -> Result<()> {
    let user_id = ctx.acting_user()?;
    match command {
        FocusCommand::Save(args) => {
            let end = args
                .end
                .unwrap_or_else(|| chrono::Local::now().naive_local());
            let outcome =
                focus::save_session(ctx.conn, user_id, end, args.seconds, args.note.as_deref())?;
            render(ctx.output, &outcome, |outcome, w| {
                pretty_kv(w, "minutes", outcome.total_minutes.to_string())?;
                pretty_kv(w, "badge earned", if outcome.badge_earned { "yes" } else { "no" })?;
                for segment in &outcome.segments {
                    writeln!(
                        w,
                        "  {} {:02}:00  +{} min",
                        segment.date, segment.hour, segment.minutes
                    )?;
                }
                Ok(())
            })
        }
        FocusCommand::Record(args) => {
            let date = args.date.unwrap_or_else(|| chrono::Local::now().date_naive());
            let hours = focus::daily_record(ctx.conn, user_id, date)?;
            let total: i64 = hours.iter().sum();
            render(
                ctx.output,
                &serde_json::json!({
                    "user_id": user_id,
                    "date": date.to_string(),
                    "hours": hours,
                    "total_minutes": total,
                }),
                |_, w| {
                    pretty_section(w, &date.to_string())?;
                    for (hour, minutes) in hours.iter().enumerate() {
                        if *minutes > 0 {
                            writeln!(w, "{hour:02}:00  {minutes:>2} min")?;
                        }
                    }
                    writeln!(w, "total  {total} min")
                },
            )
        }
        FocusCommand::Totals(args) => {
            let to = args.to.unwrap_or_else(|| chrono::Local::now().date_naive());
            let totals = focus::range_totals(ctx.conn, user_id, args.from, to)?;
            render(ctx.output, &totals, |totals, w| {
                if totals.is_empty() {
                    return writeln!(w, "no focus recorded in range");
                }
                for day in totals {
                    writeln!(w, "{}  {:>3} min", day.date, day.minutes)?;
                }
                Ok(())
            })
        }
    }
}
