#![forbid(unsafe_code)]

mod cmd;
mod output;
mod workspace;

use clap::{CommandFactory, Parser, Subcommand};
use lectio_core::config;
use output::OutputMode;
use std::env;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "lectio: a daily reading-plan tracker",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags, env, user config, and TTY.
    fn output_mode(&self) -> OutputMode {
        let user_config = config::load_user_config();
        output::resolve_output_mode(self.format, self.json, user_config.output.as_deref())
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Project",
        about = "Initialize a lectio project",
        long_about = "Initialize a lectio project in the current directory.",
        after_help = "EXAMPLES:\n    # Initialize a project in the current directory\n    lct init\n\n    # Emit machine-readable output\n    lct init --json"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        next_help_heading = "Project",
        about = "List available reading plans",
        after_help = "EXAMPLES:\n    # List plans\n    lct plans"
    )]
    Plans,

    #[command(
        next_help_heading = "Session",
        about = "Sign in under a display name",
        after_help = "EXAMPLES:\n    # Sign in\n    lct signin \"Jane\"\n\n    # Emit machine-readable output\n    lct signin \"Jane\" --json"
    )]
    Signin(cmd::auth::SigninArgs),

    #[command(next_help_heading = "Session", about = "Sign out of the current session")]
    Signout,

    #[command(next_help_heading = "Session", about = "Show the signed-in user")]
    Whoami,

    #[command(
        next_help_heading = "Reading",
        about = "Show a day's readings",
        long_about = "Show a day's readings with completion state, navigation, and comments.",
        after_help = "EXAMPLES:\n    # Show where you left off (first incomplete day)\n    lct show\n\n    # Show a specific day\n    lct show --date 3/5\n\n    # Emit machine-readable output\n    lct show --date 3/5 --json"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Reading",
        about = "Mark a reading as completed",
        after_help = "EXAMPLES:\n    # Check off a reading\n    lct check mcheyne-64-2\n\n    # Emit machine-readable output\n    lct check mcheyne-64-2 --json"
    )]
    Check(cmd::check::CheckArgs),

    #[command(
        next_help_heading = "Reading",
        about = "Mark a reading as not completed",
        after_help = "EXAMPLES:\n    # Uncheck a reading\n    lct uncheck mcheyne-64-2"
    )]
    Uncheck(cmd::check::CheckArgs),

    #[command(
        next_help_heading = "Reading",
        about = "Show plan completion progress",
        after_help = "EXAMPLES:\n    # Progress on the configured plan\n    lct progress\n\n    # Emit machine-readable output\n    lct progress --json"
    )]
    Progress(cmd::progress::ProgressArgs),

    #[command(
        next_help_heading = "Social",
        about = "Post a comment on a day's readings",
        after_help = "EXAMPLES:\n    # Comment on March 5th\n    lct comment add 3/5 \"Loved the Psalm today\""
    )]
    Comment(cmd::comment::CommentArgs),

    #[command(
        next_help_heading = "Social",
        about = "Show a day's comment thread",
        after_help = "EXAMPLES:\n    # Read the thread for March 5th\n    lct comments 3/5"
    )]
    Comments(cmd::comment::CommentsArgs),

    #[command(
        next_help_heading = "Social",
        about = "Show the recent activity feed",
        long_about = "Show the recent activity feed, newest first, with cursor pagination.",
        after_help = "EXAMPLES:\n    # First page\n    lct activity\n\n    # Next page, using the cursor the first page printed\n    lct activity --cursor 61a52f00.2a"
    )]
    Activity(cmd::activity::ActivityArgs),

    #[command(
        next_help_heading = "Project",
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    lct completions bash\n\n    # Generate zsh completions\n    lct completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("LECTIO_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "lectio=debug,info"
        } else {
            "lectio=info,warn"
        })
    });

    let format = env::var("LECTIO_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

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

    let project_root = std::env::current_dir()?;
    let output = cli.output_mode();

    match cli.command {
        Commands::Init(ref args) => cmd::init::run_init(args, output, &project_root),
        Commands::Plans => cmd::plans::run_plans(output),
        Commands::Signin(ref args) => cmd::auth::run_signin(args, output, &project_root),
        Commands::Signout => cmd::auth::run_signout(output, &project_root),
        Commands::Whoami => cmd::auth::run_whoami(output, &project_root),
        Commands::Show(ref args) => cmd::show::run_show(args, output, &project_root),
        Commands::Check(ref args) => cmd::check::run_check(args, output, &project_root),
        Commands::Uncheck(ref args) => cmd::check::run_uncheck(args, output, &project_root),
        Commands::Progress(ref args) => cmd::progress::run_progress(args, output, &project_root),
        Commands::Comment(ref args) => cmd::comment::run_comment(args, output, &project_root),
        Commands::Comments(ref args) => cmd::comment::run_comments(args, output, &project_root),
        Commands::Activity(ref args) => cmd::activity::run_activity(args, output, &project_root),
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_parses_globally() {
        let cli = Cli::parse_from(["lct", "--json", "plans"]);
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Plans));
    }

    #[test]
    fn json_flag_after_subcommand() {
        let cli = Cli::parse_from(["lct", "progress", "--json"]);
        assert!(cli.json);
    }

    #[test]
    fn format_flag_parses() {
        let cli = Cli::parse_from(["lct", "--format", "text", "activity"]);
        assert_eq!(cli.format, Some(OutputMode::Text));
    }

    #[test]
    fn check_takes_a_reading_id() {
        let cli = Cli::parse_from(["lct", "check", "mcheyne-64-2"]);
        let Commands::Check(args) = cli.command else {
            panic!("expected check command");
        };
        assert_eq!(args.id, "mcheyne-64-2");
    }
}
