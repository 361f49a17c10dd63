#![forbid(unsafe_code)]

mod actor;
mod cmd;
mod output;

use clap::{Parser, Subcommand};
use output::{CliError, OutputMode};
use std::env;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "claimdesk: customer support claim tracker",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Act as this registered user (email; falls back to CLAIMDESK_ACTOR).
    #[arg(long, global = true)]
    actor: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }

    fn actor_flag(&self) -> Option<&str> {
        self.actor.as_deref()
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Initialize a claimdesk workspace",
        after_help = "EXAMPLES:\n    # Initialize in the current directory\n    claimdesk init"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        about = "File a new claim",
        after_help = "EXAMPLES:\n    # File a claim against project 3\n    claimdesk --actor cora@client.example create --project 3 \"VPN drops every few minutes\""
    )]
    Create(cmd::claim::CreateArgs),

    #[command(about = "List claims")]
    List(cmd::claim::ListArgs),

    #[command(about = "Show one claim")]
    Show(cmd::claim::ShowArgs),

    #[command(
        about = "Apply a lifecycle change to a claim",
        after_help = "EXAMPLES:\n    # Start work and route to an area\n    claimdesk update 7 --status in_progress --area 1\n\n    # Resolve\n    claimdesk update 7 --status resolved --resolution \"Upgraded router firmware\"\n\n    # Re-route (a reason is required)\n    claimdesk update 7 --area 2 --reason \"escalated to networks\""
    )]
    Update(cmd::claim::UpdateArgs),

    #[command(about = "Add an internal comment to a claim")]
    Comment(cmd::comment::CommentArgs),

    #[command(about = "Log work performed on a claim")]
    Action(cmd::comment::ActionArgs),

    #[command(
        about = "Show a claim's event history",
        after_help = "EXAMPLES:\n    # The full internal timeline\n    claimdesk timeline 7\n\n    # What the client sees\n    claimdesk timeline 7 --public"
    )]
    Timeline(cmd::timeline::TimelineArgs),

    #[command(about = "Client feedback on a claim")]
    Feedback(cmd::feedback::FeedbackArgs),

    #[command(about = "Manage areas and sub-areas")]
    Area(cmd::area::AreaArgs),

    #[command(about = "Manage users")]
    User(cmd::user::UserArgs),

    #[command(about = "Manage projects")]
    Project(cmd::project::ProjectArgs),

    #[command(about = "Repair an event timestamp (imported history only)")]
    Backfill(cmd::backfill::BackfillArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("CLAIMDESK_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "claimdesk=debug,info"
        } else {
            "claimdesk=info,warn"
        })
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = std::env::current_dir()?;
    let output = cli.output_mode();

    let command_result = match cli.command {
        Commands::Init(ref args) => cmd::init::run_init(args, output, &project_root),
        Commands::Create(ref args) => {
            cmd::claim::run_create(args, cli.actor_flag(), output, &project_root)
        }
        Commands::List(ref args) => {
            cmd::claim::run_list(args, cli.actor_flag(), output, &project_root)
        }
        Commands::Show(ref args) => cmd::claim::run_show(args, output, &project_root),
        Commands::Update(ref args) => {
            cmd::claim::run_update(args, cli.actor_flag(), output, &project_root)
        }
        Commands::Comment(ref args) => {
            cmd::comment::run_comment(args, cli.actor_flag(), output, &project_root)
        }
        Commands::Action(ref args) => {
            cmd::comment::run_action(args, cli.actor_flag(), output, &project_root)
        }
        Commands::Timeline(ref args) => cmd::timeline::run_timeline(args, output, &project_root),
        Commands::Feedback(ref args) => {
            cmd::feedback::run_feedback(args, cli.actor_flag(), output, &project_root)
        }
        Commands::Area(ref args) => cmd::area::run_area(args, output, &project_root),
        Commands::User(ref args) => cmd::user::run_user(args, output, &project_root),
        Commands::Project(ref args) => cmd::project::run_project(args, output, &project_root),
        Commands::Backfill(ref args) => cmd::backfill::run_backfill(args, output, &project_root),
    };

    if let Err(err) = command_result {
        output::render_error(output, &CliError::new(format!("{err:#}")))?;
        std::process::exit(1);
    }
    Ok(())
}
