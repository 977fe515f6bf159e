#![forbid(unsafe_code)]

mod actor;
mod cmd;
mod output;

use clap::{Parser, Subcommand};
use output::OutputMode;
use std::env;
use ticketdesk_core::config;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "td: support-ticket tracker",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Act as this user (skips env and config resolution).
    #[arg(long, global = true)]
    actor: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Get the actor flag as an Option<&str> for resolution.
    fn actor_flag(&self) -> Option<&str> {
        self.actor.as_deref()
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Setup",
        about = "Initialize a ticket store",
        long_about = "Create .ticketdesk/ with a default config and an empty ticket store.",
        after_help = "EXAMPLES:\n    # Initialize in the current directory\n    td init\n\n    # Emit machine-readable output\n    td init --json"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Manage registered users",
        long_about = "Register users and administrators, or list them.\n\n\
                      This command is not gated: anyone who can write the project \
                      directory can register users or grant --admin.",
        after_help = "EXAMPLES:\n    # Register an administrator\n    td user add root --admin\n\n    # List users\n    td user list"
    )]
    User(cmd::user::UserArgs),

    #[command(
        next_help_heading = "Tickets",
        about = "Submit a new ticket",
        long_about = "Submit a new ticket as the current actor. The ticket starts as new.",
        after_help = "EXAMPLES:\n    # Report a bug\n    td create --application portal --description \"Login fails\"\n\n    # Request a feature with tags\n    td create --type feature --application portal \\\n        --description \"Dark mode\" --tag ui --tag theme"
    )]
    Create(cmd::create::CreateArgs),

    #[command(
        next_help_heading = "Tickets",
        about = "Edit ticket attributes",
        long_about = "Edit type, priority, application, description or tags. \
                      Allowed for administrators and the submitter.",
        after_help = "EXAMPLES:\n    # Raise the priority\n    td update 12 --priority high\n\n    # Replace tags\n    td update 12 --tag billing --tag eur"
    )]
    Update(cmd::update::UpdateArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show one ticket",
        long_about = "Show a ticket with its parent, children and the follow-ups you may see.",
        after_help = "EXAMPLES:\n    # Show a ticket\n    td show 12\n\n    # Emit machine-readable output\n    td show 12 --json"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Read",
        about = "List tickets",
        long_about = "List tickets newest first with optional filters and paging.",
        after_help = "EXAMPLES:\n    # Open tickets\n    td list --open\n\n    # My tickets\n    td list --user alice --role either\n\n    # Search descriptions\n    td list --query crash --limit 10"
    )]
    List(cmd::list::ListArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Accept a ticket",
        long_about = "Move an open ticket to accepted. Administrators only.",
        after_help = "EXAMPLES:\n    # Accept a ticket\n    td accept 12"
    )]
    Accept(cmd::accept::AcceptArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Assign a ticket",
        long_about = "Assign an open ticket to a registered user. Administrators only.",
        after_help = "EXAMPLES:\n    # Assign to bob\n    td assign 12 bob\n\n    # With a note\n    td assign 12 bob --comment \"Billing expert\""
    )]
    Assign(cmd::assign::AssignArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Close a ticket",
        long_about = "Close an open ticket with a required comment. Administrators only.",
        after_help = "EXAMPLES:\n    # Close as fixed\n    td close 12 --comment \"Fixed in 2.3.1\"\n\n    # Close as a duplicate of #7\n    td close 12 --comment \"Same as #7\" --duplicate-of 7"
    )]
    Close(cmd::close::CloseArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Reopen a ticket",
        long_about = "Reopen a closed or duplicate ticket with a required comment. \
                      Administrators only.",
        after_help = "EXAMPLES:\n    # Reopen\n    td reopen 12 --comment \"Regressed in 2.4\""
    )]
    Reopen(cmd::reopen::ReopenArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Split a ticket in two",
        long_about = "Split an open ticket into two new child tickets. Unset child fields \
                      inherit from the parent. Administrators only.",
        after_help = "EXAMPLES:\n    # Split by priority\n    td split 12 --first-priority high --second-priority low\n\n    # Split with new descriptions\n    td split 12 --first-description \"Import is slow\" \\\n        --second-description \"Export is slow\""
    )]
    Split(cmd::split::SplitArgs),

    #[command(
        next_help_heading = "Collaboration",
        about = "Comment on a ticket",
        long_about = "Append a follow-up. Internal notes are hidden from users who are \
                      neither administrators nor the submitter.",
        after_help = "EXAMPLES:\n    # Public comment\n    td comment 12 \"Seeing this too\"\n\n    # Internal note\n    td comment 12 \"Customer is on the legacy plan\" --internal"
    )]
    Comment(cmd::comment::CommentArgs),

    #[command(
        next_help_heading = "Collaboration",
        about = "List follow-ups on a ticket",
        long_about = "List the follow-ups on a ticket that the current actor may see, newest first.",
        after_help = "EXAMPLES:\n    # Show follow-ups\n    td comments 12"
    )]
    Comments(cmd::comments::CommentsArgs),

    #[command(
        next_help_heading = "Collaboration",
        about = "Vote for a ticket",
        long_about = "Cast one vote for a ticket. Repeat votes by the same user are ignored.",
        after_help = "EXAMPLES:\n    # Vote\n    td vote 12"
    )]
    Vote(cmd::vote::VoteArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show values available to list filters",
        long_about = "Show every declared status, priority and type, plus the application, \
                      submitter and assignee values present in the store.",
        after_help = "EXAMPLES:\n    # All filters\n    td filters\n\n    # Without the type filter\n    td filters --without-type"
    )]
    Filters(cmd::filters::FiltersArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show tag usage",
        long_about = "List tags with the number of tickets carrying each, most used first.",
        after_help = "EXAMPLES:\n    # Tag cloud\n    td tags"
    )]
    Tags,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TICKETDESK_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "ticketdesk=debug,info"
        } else {
            "ticketdesk=info,warn"
        })
    });

    let format = env::var("TICKETDESK_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr; stdout carries command output.
    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = env::current_dir()?;
    let effective = config::resolve_config(&project_root, cli.json)?;
    let output = OutputMode::from_resolved(&effective.resolved_output);
    let actor = cli.actor_flag();

    match cli.command {
        Commands::Init(ref args) => cmd::init::run_init(args, output, &project_root),
        Commands::User(ref args) => cmd::user::run_user(args, output, &project_root),
        Commands::Create(ref args) => cmd::create::run_create(args, actor, output, &project_root),
        Commands::Update(ref args) => cmd::update::run_update(args, actor, output, &project_root),
        Commands::Show(ref args) => cmd::show::run_show(args, actor, output, &project_root),
        Commands::List(ref args) => cmd::list::run_list(args, output, &project_root),
        Commands::Accept(ref args) => cmd::accept::run_accept(args, actor, output, &project_root),
        Commands::Assign(ref args) => cmd::assign::run_assign(args, actor, output, &project_root),
        Commands::Close(ref args) => cmd::close::run_close(args, actor, output, &project_root),
        Commands::Reopen(ref args) => cmd::reopen::run_reopen(args, actor, output, &project_root),
        Commands::Split(ref args) => cmd::split::run_split(args, actor, output, &project_root),
        Commands::Comment(ref args) => {
            cmd::comment::run_comment(args, actor, output, &project_root)
        }
        Commands::Comments(ref args) => {
            cmd::comments::run_comments(args, actor, output, &project_root)
        }
        Commands::Vote(ref args) => cmd::vote::run_vote(args, actor, output, &project_root),
        Commands::Filters(ref args) => cmd::filters::run_filters(args, output, &project_root),
        Commands::Tags => cmd::tags::run_tags(output, &project_root),
    }
}
