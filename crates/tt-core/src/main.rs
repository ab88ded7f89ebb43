//! Ticket Triage Core - review CLI
//!
//! The main entry point for tt-core, handling:
//! - Mock session generation (seeded or random)
//! - Ticket statistics and the review queue
//! - Ticket mutation handlers
//! - Dashboard tabs and the use-case catalogue

use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;
use tt_common::{
    format_error_human, Error, OutputFormat, Priority, StructuredError, TicketId, TicketStatus,
    SCHEMA_VERSION,
};
use tt_core::config::{load_config, validate_config, ConfigError, ConfigOptions, ResolvedConfig};
use tt_core::dashboard::{Dashboard, DashboardTab};
use tt_core::exit_codes::ExitCode;
use tt_core::logging::{
    event_names, generate_run_id, init_logging, LogConfig, LogContext, LogLevel, Stage,
};
use tt_core::mock::MockDataset;
use tt_core::output::{self, markdown};
use tt_core::store::{TicketEdit, TriageStore};
use tt_core::tickets::{open_queue, TicketFilter};
use tt_core::use_cases::{self, UseCasePage, USE_CASES};

/// Ticket Triage Core - review AI triage suggestions on a mock ticket set
#[derive(Parser)]
#[command(name = "tt-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Override config directory
    #[arg(long, global = true, env = "TICKET_TRIAGE_CONFIG")]
    config: Option<PathBuf>,

    /// Number of mock tickets to generate
    #[arg(long, global = true)]
    count: Option<usize>,

    /// Seed for a reproducible dataset
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Ticket statistics snapshot
    Stats,

    /// Review queue and ticket details
    Tickets(TicketsArgs),

    /// Apply an edit to a ticket and record the change
    Apply(ApplyArgs),

    /// Render one dashboard tab
    Dashboard(DashboardArgs),

    /// Browse the use-case catalogue
    UseCases(UseCasesArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
struct TicketsArgs {
    #[command(subcommand)]
    command: TicketsCommands,
}

#[derive(Subcommand, Debug)]
enum TicketsCommands {
    /// List tickets (Open and In Progress unless --all or --status)
    List {
        /// Case-insensitive match on description or ID
        #[arg(long)]
        search: Option<String>,

        /// Exact status (e.g. "In Progress", in-progress)
        #[arg(long)]
        status: Option<String>,

        /// Include every status
        #[arg(long)]
        all: bool,
    },

    /// Show one ticket with its change history
    Show {
        /// Ticket ID (e.g. INC100000)
        id: String,
    },
}

#[derive(Args, Debug)]
struct ApplyArgs {
    #[command(subcommand)]
    edit: ApplyCommands,
}

#[derive(Subcommand, Debug)]
enum ApplyCommands {
    /// Change the assignment group
    Reassign { id: String, group: String },

    /// Change the priority
    Priority { id: String, priority: String },

    /// Replace the short description
    Describe { id: String, text: String },

    /// Change the assignee
    Assignee { id: String, name: String },

    /// Record a validation verdict
    Validate { id: String, verdict: Verdict },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Verdict {
    Valid,
    Invalid,
}

#[derive(Args, Debug)]
struct DashboardArgs {
    /// Tab to render
    #[arg(long, default_value = "summary")]
    tab: DashboardTab,
}

#[derive(Args, Debug)]
struct UseCasesArgs {
    #[command(subcommand)]
    command: UseCasesCommands,
}

#[derive(Subcommand, Debug)]
enum UseCasesCommands {
    /// List all use cases
    List,

    /// Show a use case by ID or path
    Show { id: String },
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show the resolved configuration
    Show,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            let _ = err.print();
            std::process::exit(code.as_i32());
        }
    };

    let log_config = LogConfig::from_env(
        LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet),
        None,
    );
    init_logging(&log_config);

    let ctx = LogContext::new(generate_run_id()).with_seed(cli.global.seed);
    let exit_code = {
        let _run = ctx.span().entered();
        tracing::debug!(
            event = event_names::RUN_STARTED,
            stage = %Stage::Init,
            version = env!("CARGO_PKG_VERSION"),
            "run started"
        );
        let exit_code = run(&cli, &ctx);
        tracing::debug!(
            event = event_names::RUN_FINISHED,
            exit_code = exit_code.as_i32(),
            "run finished"
        );
        exit_code
    };

    std::process::exit(exit_code.as_i32());
}

fn run(cli: &Cli, ctx: &LogContext) -> ExitCode {
    let global = &cli.global;

    if let Commands::Version = cli.command {
        return print_version(global);
    }
    if let Commands::UseCases(args) = &cli.command {
        return run_use_cases(global, ctx, args);
    }

    let resolved = match resolve_config(global) {
        Ok(resolved) => resolved,
        Err(e) => {
            tracing::error!(
                event = event_names::CONFIG_ERROR,
                stage = %Stage::Init,
                error = %e,
                "config error"
            );
            return report_error(global, &Error::from(e));
        }
    };

    if let Commands::Config(ConfigArgs {
        command: ConfigCommands::Show,
    }) = &cli.command
    {
        return emit(
            global,
            ctx,
            "config show",
            &resolved,
            || markdown::config(&resolved),
            || config_summary(&resolved),
        );
    }

    let mut store = generate_session(&resolved);

    let result = match &cli.command {
        Commands::Stats => run_stats(global, ctx, &store),
        Commands::Tickets(args) => run_tickets(global, ctx, &store, args),
        Commands::Apply(args) => run_apply(global, ctx, &mut store, args),
        Commands::Dashboard(args) => run_dashboard(global, ctx, &store, &resolved, args),
        Commands::Version | Commands::UseCases(_) | Commands::Config(_) => Ok(ExitCode::Clean),
    };

    result.unwrap_or_else(|e| report_error(global, &e))
}

/// Load `triage.toml`, then apply CLI overrides and re-validate.
fn resolve_config(global: &GlobalOpts) -> Result<ResolvedConfig, ConfigError> {
    let options = ConfigOptions {
        config_dir: global.config.clone(),
        config_path: None,
    };
    let mut resolved = load_config(&options)?;

    match &resolved.config_path {
        Some(path) => tracing::info!(
            event = event_names::CONFIG_LOADED,
            stage = %Stage::Init,
            path = %path.display(),
            "config loaded"
        ),
        None => tracing::debug!(
            event = event_names::CONFIG_DEFAULT_USED,
            stage = %Stage::Init,
            "using default config"
        ),
    }

    if let Some(count) = global.count {
        resolved.config.ticket_count = count;
    }
    if global.seed.is_some() {
        resolved.config.seed = global.seed;
    }
    validate_config(&resolved.config)?;

    Ok(resolved)
}

fn generate_session(resolved: &ResolvedConfig) -> TriageStore {
    let config = &resolved.config;
    let dataset = MockDataset::generate(config.ticket_count, config.seed, Utc::now());

    tracing::info!(
        event = event_names::SESSION_GENERATED,
        stage = %Stage::Generate,
        tickets = dataset.tickets.len(),
        changes = dataset.changes.len(),
        "session generated"
    );

    TriageStore::from_dataset(dataset).with_actor(config.actor.clone())
}

fn parse_ticket_id(raw: &str) -> Result<TicketId, Error> {
    raw.parse()
}

fn run_stats(global: &GlobalOpts, ctx: &LogContext, store: &TriageStore) -> Result<ExitCode, Error> {
    let stats = store.stats();
    Ok(emit(
        global,
        ctx,
        "stats",
        &stats,
        || markdown::stats(&stats),
        || output::stats_summary(&stats),
    ))
}

fn run_tickets(
    global: &GlobalOpts,
    ctx: &LogContext,
    store: &TriageStore,
    args: &TicketsArgs,
) -> Result<ExitCode, Error> {
    match &args.command {
        TicketsCommands::List {
            search,
            status,
            all,
        } => {
            let status = status
                .as_deref()
                .map(str::parse::<TicketStatus>)
                .transpose()?;
            let filter = TicketFilter {
                search: search.clone(),
                status,
            };
            let base = if *all || status.is_some() {
                store.tickets().iter().collect::<Vec<_>>()
            } else {
                open_queue(store.tickets())
            };
            let listed: Vec<_> = base.into_iter().filter(|t| filter.matches(t)).collect();

            Ok(emit(
                global,
                ctx,
                "tickets list",
                &listed,
                || markdown::ticket_list(&listed),
                || output::ticket_list_summary(&listed, store.tickets().len()),
            ))
        }
        TicketsCommands::Show { id } => {
            let ticket = store.ticket(&parse_ticket_id(id)?)?;
            Ok(emit(
                global,
                ctx,
                "tickets show",
                ticket,
                || markdown::ticket(ticket),
                || output::ticket_summary(ticket),
            ))
        }
    }
}

fn run_apply(
    global: &GlobalOpts,
    ctx: &LogContext,
    store: &mut TriageStore,
    args: &ApplyArgs,
) -> Result<ExitCode, Error> {
    let (id, edit) = match &args.edit {
        ApplyCommands::Reassign { id, group } => (id, TicketEdit::Reassign(group.clone())),
        ApplyCommands::Priority { id, priority } => {
            (id, TicketEdit::SetPriority(priority.parse::<Priority>()?))
        }
        ApplyCommands::Describe { id, text } => (id, TicketEdit::UpdateDescription(text.clone())),
        ApplyCommands::Assignee { id, name } => (id, TicketEdit::ReassignOwner(name.clone())),
        ApplyCommands::Validate { id, verdict } => {
            (id, TicketEdit::Validate(matches!(verdict, Verdict::Valid)))
        }
    };
    let id = parse_ticket_id(id)?;

    let ticket = store.apply(&id, edit).inspect_err(|_| {
        tracing::warn!(
            event = event_names::TICKET_NOT_FOUND,
            stage = %Stage::Apply,
            ticket_id = %id,
            "ticket not found"
        );
    })?;

    Ok(emit(
        global,
        ctx,
        "apply",
        ticket,
        || markdown::ticket(ticket),
        || output::ticket_summary(ticket),
    ))
}

fn run_dashboard(
    global: &GlobalOpts,
    ctx: &LogContext,
    store: &TriageStore,
    resolved: &ResolvedConfig,
    args: &DashboardArgs,
) -> Result<ExitCode, Error> {
    let dashboard = Dashboard::build(store, store.now())
        .with_drilldown_rows(resolved.config.drilldown_rows);
    let view = dashboard.view(args.tab);

    tracing::debug!(
        event = event_names::DASHBOARD_RENDERED,
        stage = %Stage::Render,
        tab = %args.tab,
        "dashboard rendered"
    );

    Ok(emit(
        global,
        ctx,
        "dashboard",
        &view,
        || markdown::tab(&view),
        || output::tab_summary(&view),
    ))
}

fn run_use_cases(global: &GlobalOpts, ctx: &LogContext, args: &UseCasesArgs) -> ExitCode {
    match &args.command {
        UseCasesCommands::List => emit(
            global,
            ctx,
            "use-cases list",
            &USE_CASES,
            || markdown::use_cases(&USE_CASES),
            || format!("{} use cases", USE_CASES.len()),
        ),
        UseCasesCommands::Show { id } => {
            let page = use_cases::resolve_route(id);
            match &page {
                UseCasePage::Found { .. } => emit(
                    global,
                    ctx,
                    "use-cases show",
                    &page,
                    || markdown::use_case_page(&page),
                    || output::use_case_page_summary(&page),
                ),
                UseCasePage::NotFound { requested } => {
                    if global.format == OutputFormat::Md {
                        println!("{}", markdown::use_case_page(&page).trim_end());
                    }
                    report_error(
                        global,
                        &Error::UseCaseNotFound {
                            id: requested.clone(),
                        },
                    )
                }
            }
        }
    }
}

/// Render `data` to stdout in the requested format.
fn emit(
    global: &GlobalOpts,
    ctx: &LogContext,
    command: &str,
    data: &impl serde::Serialize,
    markdown: impl FnOnce() -> String,
    summary: impl FnOnce() -> String,
) -> ExitCode {
    match output::render(
        global.format,
        command,
        &ctx.run_id,
        Utc::now(),
        data,
        markdown,
        summary,
    ) {
        Ok(text) => {
            println!("{}", text.trim_end());
            ExitCode::Clean
        }
        Err(e) => report_error(global, &e),
    }
}

fn use_color(global: &GlobalOpts) -> bool {
    !global.no_color && std::io::stderr().is_terminal()
}

/// Report a domain error on stderr and pick the exit code.
fn report_error(global: &GlobalOpts, err: &Error) -> ExitCode {
    let exit_code = ExitCode::for_error(err);
    if exit_code.is_internal_error() {
        tracing::error!(event = event_names::INTERNAL_ERROR, error = %err, "command failed");
    } else {
        tracing::debug!(code = err.code(), error = %err, "command rejected");
    }

    match global.format {
        OutputFormat::Json => {
            let structured = StructuredError::from(err).with_context("exit_code", exit_code.code_name());
            eprintln!("{}", structured.to_json());
        }
        OutputFormat::Md | OutputFormat::Summary => {
            eprintln!("{}", format_error_human(err, use_color(global)));
        }
    }
    exit_code
}

fn config_summary(resolved: &ResolvedConfig) -> String {
    let source = resolved
        .config_path
        .as_ref()
        .map_or_else(|| "defaults".to_string(), |p| p.display().to_string());
    format!(
        "ticket_count={} seed={} actor={:?} source={}",
        resolved.config.ticket_count,
        resolved
            .config
            .seed
            .map_or_else(|| "random".to_string(), |s| s.to_string()),
        resolved.config.actor,
        source
    )
}

fn print_version(global: &GlobalOpts) -> ExitCode {
    let version_info = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "tt_core_version": env!("CARGO_PKG_VERSION"),
        "rust_version": env!("CARGO_PKG_RUST_VERSION"),
    });

    match global.format {
        OutputFormat::Json => println!("{}", version_info),
        OutputFormat::Md | OutputFormat::Summary => {
            println!("tt-core {}", env!("CARGO_PKG_VERSION"));
            println!("schema version: {}", SCHEMA_VERSION);
        }
    }
    ExitCode::Clean
}
