#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use output::OutputMode;
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use focusmate_core::error::DomainError;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "focusmate: deadlines, focus sessions, badges, and friends",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Store path (overrides FOCUSMATE_DB and the config file).
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Act as this user (overrides the config default).
    #[arg(short, long, global = true, value_name = "ID")]
    user: Option<i64>,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags, env, and TTY detection.
    fn output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Initialize the focusmate store",
        after_help = "EXAMPLES:\n    # Create the store in the default location\n    fm init\n\n    # Create it somewhere specific\n    fm --db ./focusmate.sqlite3 init"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        about = "Manage users",
        after_help = "EXAMPLES:\n    # Create a user\n    fm user create --name mei\n\n    # Start a study run as user 1\n    fm --user 1 user status --on"
    )]
    User {
        #[command(subcommand)]
        command: cmd::user::UserCommand,
    },

    #[command(
        about = "Manage the deadline list",
        after_help = "EXAMPLES:\n    # Add and list\n    fm --user 1 deadline add --task \"read chapter 4\" --due 2025-03-02\n    fm --user 1 deadline list\n\n    # Drag item 7 to the top\n    fm --user 1 deadline reorder 7=1 3=2 5=3"
    )]
    Deadline {
        #[command(subcommand)]
        command: cmd::deadline::DeadlineCommand,
    },

    #[command(
        about = "Save focus sessions and read records",
        after_help = "EXAMPLES:\n    # Save a 90-minute session that just ended\n    fm --user 1 focus save --seconds 5400\n\n    # Today's hourly record\n    fm --user 1 focus record"
    )]
    Focus {
        #[command(subcommand)]
        command: cmd::focus::FocusCommand,
    },

    #[command(
        about = "Manage friends and see who is studying",
        after_help = "EXAMPLES:\n    fm --user 1 friend add 2\n    fm --user 1 friend status"
    )]
    Friend {
        #[command(subcommand)]
        command: cmd::friend::FriendCommand,
    },

    #[command(
        about = "Send and read badge-gated messages",
        after_help = "EXAMPLES:\n    # Spend a badge to nudge a friend\n    fm --user 1 msg send --to 2 --content \"your turn!\"\n\n    # Poll for the newest unread message\n    fm --user 2 msg unread"
    )]
    Msg {
        #[command(subcommand)]
        command: cmd::msg::MsgCommand,
    },

    #[command(
        about = "Store and export proof-of-work photos",
        after_help = "EXAMPLES:\n    fm --user 1 picture add --file desk.jpg\n    fm --user 1 picture export 1 --out out.jpg"
    )]
    Picture {
        #[command(subcommand)]
        command: cmd::picture::PictureCommand,
    },

    #[command(about = "Generate shell completion scripts")]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("FOCUSMATE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "focusmate=debug,info"
        } else {
            "focusmate=info,warn"
        })
    });

    let format = env::var("FOCUSMATE_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry.with(fmt::layer().json().with_ansi(false)).init();
        }
        _ => {
            registry.with(fmt::layer().compact()).init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = cli.output_mode();

    if let Commands::Completions(args) = &cli.command {
        let mut command = Cli::command();
        return cmd::completions::run_completions(args.shell, &mut command);
    }

    let store_path = cmd::resolve_store_path(cli.db.clone())?;
    let mut conn = focusmate_core::db::open_store(&store_path)?;
    let mut ctx = cmd::Ctx {
        conn: &mut conn,
        output,
        user_flag: cli.user,
    };

    let result = match &cli.command {
        Commands::Init(args) => cmd::init::run_init(args, ctx.conn, &store_path, output),
        Commands::User { command } => cmd::user::run_user(command, &mut ctx),
        Commands::Deadline { command } => cmd::deadline::run_deadline(command, &mut ctx),
        Commands::Focus { command } => cmd::focus::run_focus(command, &mut ctx),
        Commands::Friend { command } => cmd::friend::run_friend(command, &mut ctx),
        Commands::Msg { command } => cmd::msg::run_msg(command, &mut ctx),
        Commands::Picture { command } => cmd::picture::run_picture(command, &mut ctx),
        Commands::Completions(_) => unreachable!("handled before store open"),
    };

    // Domain rejections carry stable codes; render them instead of a trace.
    if let Err(error) = result {
        if let Some(domain) = error.downcast_ref::<DomainError>() {
            output::render_error(output, &domain.into())?;
            std::process::exit(1);
        }
        return Err(error);
    }

    Ok(())
}
