#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use dashcal_core::config::{EffectiveConfig, resolve_config};
use dashcal_core::error::ErrorCode;
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use std::env;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "dashcal: calendar grid, event overlay, and date/time pickers",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Output format. Defaults to pretty on a terminal and text when piped.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Calendar",
        about = "Show a month grid",
        long_about = "Show one month as whole Sunday-first weeks with events overlaid on their days.",
        after_help = "EXAMPLES:\n    # Show the current month\n    dcal grid\n\n    # Show February 2025 with events and a pinned today\n    dcal grid --month 2025-02 --events events.json --today 2025-02-14\n\n    # Emit machine-readable output\n    dcal grid --month 2025-02 --format json"
    )]
    Grid(cmd::grid::GridArgs),

    #[command(
        next_help_heading = "Calendar",
        about = "Index an event file",
        long_about = "Group events by day and report the records whose dates could not be parsed.",
        after_help = "EXAMPLES:\n    # List every indexed day\n    dcal events --file events.json\n\n    # Look up one day\n    dcal events --file events.json --date 2025-06-24"
    )]
    Events(cmd::events::EventsArgs),

    #[command(
        next_help_heading = "Pickers",
        about = "Snap an angle onto the clock face",
        long_about = "Convert a dial angle, or a pointer offset from the dial center, to an hour or minute.",
        after_help = "EXAMPLES:\n    # 45 degrees on the hour ring\n    dcal dial --angle 45\n\n    # A pointer below and left of center on the minute ring\n    dcal dial --x -20 --y 35 --mode minute\n\n    # List the hour labels on a dial of radius 100\n    dcal dial --angle 0 --marks 100"
    )]
    Dial(cmd::dial::DialArgs),

    #[command(
        next_help_heading = "Pickers",
        about = "Script the time picker",
        long_about = "Drive the analog time picker through a sequence of actions and report the result.",
        after_help = "EXAMPLES:\n    # Open on 00:30 and apply it unchanged\n    dcal time --value 00:30 open apply\n\n    # Pick 2:45 PM on the dial\n    dcal time --value 09:00 open angle=45 pm toggle angle=270 apply\n\n    # Type the minute, then dismiss with an outside click\n    dcal time open edit=minute type=15 outside"
    )]
    Time(cmd::time::TimeArgs),

    #[command(
        next_help_heading = "Pickers",
        about = "Script the date picker",
        long_about = "Drive the calendar date picker through a sequence of actions and report the result.",
        after_help = "EXAMPLES:\n    # Pick a day next month\n    dcal date --today 2025-06-10 open next select=2025-07-04\n\n    # Jump through the year and month lists\n    dcal date open years year=2027 months month=3\n\n    # Nothing before the minimum date is selectable\n    dcal date --min 2030-01-15 open"
    )]
    Date(cmd::date::DateArgs),

    #[command(
        next_help_heading = "Shell",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    dcal completions bash\n\n    # Generate zsh completions\n    dcal completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("DASHCAL_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "dashcal=debug,info"
        } else {
            "dashcal=info,warn"
        })
    });

    let format = env::var("DASHCAL_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

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

fn run(cli: Cli, config: &EffectiveConfig, output: OutputMode) -> anyhow::Result<()> {
    let max_visible = config.project.calendar.max_visible_events;
    match cli.command {
        Commands::Grid(args) => cmd::grid::run_grid(&args, max_visible, output),
        Commands::Events(args) => cmd::events::run_events(&args, output),
        Commands::Dial(args) => cmd::dial::run_dial(&args, output),
        Commands::Time(args) => cmd::time::run_time(&args, output),
        Commands::Date(args) => cmd::date::run_date(
            &args,
            config.project.date_picker.year_span,
            max_visible,
            output,
        ),
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
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
    let config = match resolve_config(&project_root, cli.json) {
        Ok(config) => config,
        Err(err) => {
            let mode = cli
                .format
                .unwrap_or(if cli.json { OutputMode::Json } else { OutputMode::Text });
            let mut error = CliError::from_anyhow(&err);
            if error.error_code.is_none() {
                error = CliError::with_code(error.message, ErrorCode::ConfigParseError);
            }
            render_error(mode, &error)?;
            std::process::exit(1);
        }
    };
    let output = resolve_output_mode(cli.format, &config.resolved_output);
    tracing::debug!(?output, root = %project_root.display(), "resolved config");

    if let Err(err) = run(cli, &config, output) {
        tracing::debug!("command failed: {err:#}");
        render_error(output, &CliError::from_anyhow(&err))?;
        std::process::exit(1);
    }
    Ok(())
}
