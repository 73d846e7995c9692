//! Channel configuration CLI entrypoint.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bridge_channel_config::cli::{Cli, Commands, OutputFormatter};
use bridge_channel_config::config::{
    find_config_file, ChannelConfig, ConfigHasher, ConfigParser, ConfigValidator,
};
use bridge_channel_config::error::{ChannelConfigError, ExecuteError, Result};
use bridge_channel_config::planner::{
    plan_for_config, BatchFileExecutor, DryRunExecutor, Environment, InvocationPlan, PlanExecutor,
    TransactionExecutor,
};
use bridge_channel_config::registry::ArtifactLoader;
use bridge_channel_config::state::{
    CompletionState, LocalStateStore, RunHistoryEntry, RunOperation, StateStore, STATE_DIR,
};

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            if e.is_pre_execution() {
                eprintln!("No invocation was issued.");
            }
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    let formatter = OutputFormatter::new(cli.output);

    match cli.command {
        Commands::Validate { warnings } => cmd_validate(cli.config.as_ref(), warnings, &formatter),
        Commands::Plan => cmd_plan(cli.config.as_ref(), &formatter).await,
        Commands::Apply {
            yes,
            force,
            batch_file,
        } => cmd_apply(cli.config.as_ref(), yes, force, batch_file, &formatter).await,
        Commands::Status => cmd_status(cli.config.as_ref(), &formatter).await,
        Commands::Reset { step, all, yes } => cmd_reset(cli.config.as_ref(), step, all, yes).await,
    }
}

/// Everything a command needs after loading configuration.
struct Context {
    config: ChannelConfig,
    parser: ConfigParser,
    env: Environment,
    base_dir: PathBuf,
}

/// Validate configuration.
fn cmd_validate(
    config_path: Option<&PathBuf>,
    show_warnings: bool,
    formatter: &OutputFormatter,
) -> Result<()> {
    let (config, _, _) = load_config(config_path)?;

    let result = ConfigValidator::new().check(&config);
    println!("{}", formatter.format_validation(&result, show_warnings));

    if result.is_valid() {
        eprintln!("\nConfiguration summary:");
        eprintln!("  Network: {}", config.network);
        eprintln!("  Deployments: {}", config.deployments_dir);
        eprintln!("  Step: {}", config.step_id);
        eprintln!(
            "  Config hash: {}",
            ConfigHasher::short_hash(&ConfigHasher::new().hash_config(&config))
        );
        Ok(())
    } else {
        ConfigValidator::new().validate(&config).map(|_| ())
    }
}

/// Show the invocation plan.
async fn cmd_plan(config_path: Option<&PathBuf>, formatter: &OutputFormatter) -> Result<()> {
    let ctx = load_context(config_path)?;
    let plan = build_plan(&ctx).await?;
    let plan_hash = ConfigHasher::new().hash_plan(&plan);

    println!("{}", formatter.format_plan(&plan, &plan_hash));
    Ok(())
}

/// Execute the invocation plan.
async fn cmd_apply(
    config_path: Option<&PathBuf>,
    auto_approve: bool,
    force: bool,
    batch_file: Option<PathBuf>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let ctx = load_context(config_path)?;
    let store = state_store(&ctx);

    let mut state = store
        .load()
        .await?
        .unwrap_or_else(|| CompletionState::new(&ctx.config.network));

    if state.is_complete(&ctx.config.step_id) && !force {
        eprintln!(
            "Step '{}' already completed. Use --force to run it again.",
            ctx.config.step_id
        );
        return Ok(());
    }

    let plan = build_plan(&ctx).await?;
    let plan_hash = ConfigHasher::new().hash_plan(&plan);
    println!("{}", formatter.format_plan(&plan, &plan_hash));

    if !auto_approve && !confirm("Do you want to apply this plan? [y/N]: ", "y")? {
        eprintln!("Apply cancelled.");
        return Ok(());
    }

    let executor: Box<dyn TransactionExecutor> = match batch_file {
        Some(path) => Box::new(BatchFileExecutor::new(path)),
        None => Box::new(DryRunExecutor::new()),
    };

    let result = PlanExecutor::new(executor.as_ref(), ctx.config.step_id.as_str())
        .with_force(force)
        .execute(&plan, &plan_hash, &mut state)
        .await?;

    store.save(&state).await?;
    println!("{}", formatter.format_execution(&result));

    if result.success {
        Ok(())
    } else {
        Err(ExecuteError::Aborted {
            reason: format!("{} of {} invocations failed", result.failed, plan.len()),
        }
        .into())
    }
}

/// Show completion state.
async fn cmd_status(config_path: Option<&PathBuf>, formatter: &OutputFormatter) -> Result<()> {
    let ctx = load_context(config_path)?;
    let store = state_store(&ctx);

    match store.load().await? {
        Some(state) => println!("{}", formatter.format_state(&state)),
        None => eprintln!("No state found."),
    }
    Ok(())
}

/// Remove completion markers.
async fn cmd_reset(
    config_path: Option<&PathBuf>,
    step: Option<String>,
    all: bool,
    auto_approve: bool,
) -> Result<()> {
    let ctx = load_context(config_path)?;
    let store = state_store(&ctx);

    if all {
        if !store.exists().await? {
            eprintln!("No state found.");
            return Ok(());
        }
        let prompt = "This deletes all completion state. Type 'reset' to confirm: ";
        if !auto_approve && !confirm(prompt, "reset")? {
            eprintln!("Reset cancelled.");
            return Ok(());
        }
        store.delete().await?;
        eprintln!("State deleted.");
        return Ok(());
    }

    let step_id = step.unwrap_or_else(|| ctx.config.step_id.clone());
    let Some(mut state) = store.load().await? else {
        eprintln!("No state found.");
        return Ok(());
    };

    let Some(record) = state.reset_step(&step_id) else {
        eprintln!("Step '{step_id}' is not marked complete.");
        return Ok(());
    };

    if !auto_approve && !confirm(&format!("Reset step '{step_id}'? [y/N]: "), "y")? {
        eprintln!("Reset cancelled.");
        return Ok(());
    }

    state.add_history(RunHistoryEntry::new(
        Uuid::new_v4(),
        RunOperation::Reset,
        &step_id,
        &record.plan_hash,
        Vec::new(),
    ));
    store.save(&state).await?;
    eprintln!("Step '{step_id}' reset.");
    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Resolves the configuration file path.
fn resolve_config_path(config_path: Option<&PathBuf>) -> Result<PathBuf> {
    config_path.map_or_else(|| find_config_file("."), |path| Ok(path.clone()))
}

/// Loads the configuration file, `.env`, and the environment snapshot.
fn load_config(config_path: Option<&PathBuf>) -> Result<(ChannelConfig, ConfigParser, Environment)> {
    let config_file = resolve_config_path(config_path)?;
    debug!("Loading configuration from: {}", config_file.display());

    let base_dir = config_file.parent().unwrap_or_else(|| Path::new("."));
    let parser = ConfigParser::new().with_base_path(base_dir);
    parser.load_dotenv()?;

    let env = ConfigParser::environment_snapshot();
    let config = parser.load_with_env(&config_file, &env)?;

    Ok((config, parser, env))
}

/// Loads and validates configuration.
fn load_context(config_path: Option<&PathBuf>) -> Result<Context> {
    let (config, parser, env) = load_config(config_path)?;
    ConfigValidator::new().validate(&config)?;

    let base_dir = parser.resolve_path(".");
    Ok(Context {
        config,
        parser,
        env,
        base_dir,
    })
}

/// Creates the state store for the configured network.
fn state_store(ctx: &Context) -> Box<dyn StateStore> {
    let store = ctx.config.state.path.as_ref().map_or_else(
        || LocalStateStore::with_base_dir(ctx.base_dir.join(STATE_DIR).join(&ctx.config.network)),
        |path| LocalStateStore::with_state_path(ctx.parser.resolve_path(path)),
    );
    debug!(
        "Using {} state store at {}",
        store.backend_type(),
        store.path().display()
    );
    Box::new(store)
}

/// Reads deployment records and builds the plan.
async fn build_plan(ctx: &Context) -> Result<InvocationPlan> {
    let loader = ArtifactLoader::new(ctx.parser.resolve_path(&ctx.config.deployments_dir));
    plan_for_config(&ctx.config, &ctx.env, &loader).await
}

/// Prompts on stderr and compares the answer.
fn confirm(prompt: &str, expected: &str) -> std::result::Result<bool, ChannelConfigError> {
    eprint!("{prompt}");
    std::io::stderr().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case(expected))
}
