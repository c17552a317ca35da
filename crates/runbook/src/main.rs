//! runbook: saved shell commands for your projects.
//!
//! Main entry point for the application.

mod repl;

use anyhow::{Context, Result};
use commands::{JsonFileStore, Scope};
use once_cell::sync::Lazy;
use repl::ReplCommand;
use runbook_workspace::{resolve_project_root, Workspace};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Application startup time for performance monitoring
static STARTUP_TIME: Lazy<Instant> = Lazy::new(Instant::now);

/// Initialize required directories (cross-platform).
fn init_paths() -> Result<()> {
    let config_dir = runbook_paths::config_dir();
    let data_dir = runbook_paths::data_dir();

    std::fs::create_dir_all(config_dir)
        .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

    debug!(
        "Initialized paths - config: {:?}, data: {:?}",
        config_dir, data_dir
    );
    Ok(())
}

/// Check if debug mode is enabled via environment variable.
fn is_debug_mode() -> bool {
    std::env::var("RUNBOOK_DEBUG").is_ok()
}

/// Initialize the logging system. Logs go to stderr so they never mix with
/// the prompt or session output.
fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default_filter = if is_debug_mode() {
        "runbook=trace,commands=trace,runbook_workspace=trace,info"
    } else {
        "runbook=info,commands=info,warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();

    if is_debug_mode() {
        info!(
            "runbook v{} starting up (DEBUG MODE ENABLED)",
            env!("CARGO_PKG_VERSION")
        );
        info!("Set RUST_LOG for custom log levels, e.g. RUST_LOG=commands=trace");
    } else {
        info!("runbook v{} starting up", env!("CARGO_PKG_VERSION"));
    }
}

/// Print a label, then read one trimmed line from stdin.
fn prompt_line(label: &str) -> Result<String> {
    print!("{}", label);
    std::io::stdout().flush().context("Failed to flush stdout")?;
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("Failed to read input")?;
    Ok(line.trim().to_string())
}

fn confirm(question: &str) -> bool {
    matches!(
        prompt_line(&format!("{} [y/N]: ", question)).as_deref(),
        Ok("y" | "Y" | "yes")
    )
}

fn print_list(workspace: &Workspace) {
    let items = workspace.items();
    if items.is_empty() {
        println!("No saved commands yet. Type 'add' to create one.");
        return;
    }
    for (position, item) in items.iter().enumerate() {
        println!(
            "{:>3}. {:<24} {}  ({})",
            position + 1,
            item.label,
            item.detail,
            item.scope_label
        );
    }
}

fn print_help() {
    println!("  list              show saved commands");
    println!("  add               save a new command");
    println!("  edit <n>          edit command n");
    println!("  delete <n>        delete command n");
    println!("  run <n>           send command n to the terminal session");
    println!("  new <n>           send command n to a fresh terminal session");
    println!("  autorun           toggle submitting commands automatically");
    println!("  refresh           reload commands from disk");
    println!("  open <dir>        switch to another project");
    println!("  quit              exit");
}

fn add_flow(workspace: &Workspace) -> Result<()> {
    let name = prompt_line("Command name: ")?;
    let command = prompt_line("Command: ")?;
    let scope = if confirm("Global command (available in all projects)?") {
        Scope::Global
    } else {
        Scope::Local
    };

    workspace.add_command(&name, &command, scope)?;
    println!("Command \"{}\" saved successfully", name);
    Ok(())
}

fn edit_flow(workspace: &Workspace, index: usize) -> Result<()> {
    let Some(original) = workspace.entry_at(index) else {
        println!("No command at that position");
        return Ok(());
    };

    let name = match prompt_line(&format!("Command name [{}]: ", original.name))? {
        ref entered if entered.is_empty() => original.name.clone(),
        entered => entered,
    };
    let command = match prompt_line(&format!("Command [{}]: ", original.command))? {
        ref entered if entered.is_empty() => original.command.clone(),
        entered => entered,
    };
    let scope = match prompt_line("Global command? [y/n, enter keeps current]: ")?.as_str() {
        "y" | "Y" | "yes" => Scope::Global,
        "n" | "N" | "no" => Scope::Local,
        _ => original.scope(),
    };

    workspace.edit_command(&original, &name, &command, scope)?;
    println!("Command \"{}\" saved successfully", name);
    Ok(())
}

/// Run one parsed prompt command. Returns false when the app should exit.
fn execute(workspace: &mut Workspace, command: ReplCommand) -> Result<bool> {
    match command {
        ReplCommand::List => print_list(workspace),
        ReplCommand::Add => add_flow(workspace)?,
        ReplCommand::Edit(index) => edit_flow(workspace, index)?,
        ReplCommand::Delete(index) => {
            let Some(entry) = workspace.entry_at(index) else {
                println!("No command at that position");
                return Ok(true);
            };
            if workspace.delete_command(&entry, confirm)? {
                println!("Command \"{}\" deleted", entry.name);
            }
        }
        ReplCommand::Run(index) => {
            let Some(entry) = workspace.entry_at(index) else {
                println!("No command at that position");
                return Ok(true);
            };
            workspace.send_to_current(&entry)?;
            debug!("Dispatched '{}' to the current session", entry.name);
        }
        ReplCommand::RunInNew(index) => {
            let Some(entry) = workspace.entry_at(index) else {
                println!("No command at that position");
                return Ok(true);
            };
            workspace.send_to_new(&entry)?;
            debug!("Dispatched '{}' to a new session", entry.name);
        }
        ReplCommand::ToggleAutoRun => {
            let enabled = workspace.toggle_auto_run()?;
            println!(
                "Auto Run: {}",
                if enabled { "Enabled" } else { "Disabled" }
            );
        }
        ReplCommand::Refresh => {
            workspace.refresh();
            println!("Commands refreshed");
        }
        ReplCommand::Open(path) => {
            let root = std::fs::canonicalize(&path)
                .with_context(|| format!("Cannot open {:?}", path))?;
            println!("Project: {}", root.display());
            workspace.set_project_root(Some(root));
        }
        ReplCommand::Help => print_help(),
        ReplCommand::Quit => return Ok(false),
    }
    Ok(true)
}

fn startup_project_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    resolve_project_root(&cwd)
}

fn main() {
    let _ = *STARTUP_TIME;

    init_logging();

    if let Err(e) = init_paths() {
        error!("Failed to initialize paths: {}", e);
    }
    if let Err(e) = settings::ensure_config_file() {
        error!("Failed to create config file: {}", e);
    }

    let project_root = startup_project_root();
    match &project_root {
        Some(root) => info!("Project root: {:?}", root),
        None => info!("No project found; only global commands are available"),
    }

    let mut workspace = Workspace::new(
        Arc::new(JsonFileStore::at_default_location()),
        project_root,
    );

    // Registry handlers run under the registry lock, so the subscriber only
    // flips a flag; the loop re-renders once the current action finishes.
    let dirty = Arc::new(AtomicBool::new(false));
    let flag = dirty.clone();
    workspace.subscribe(move || flag.store(true, Ordering::SeqCst));

    println!(
        "runbook v{} - saved commands for your projects",
        env!("CARGO_PKG_VERSION")
    );
    println!("Type 'help' for commands.");
    print_list(&workspace);
    info!("Ready in {:?}", STARTUP_TIME.elapsed());

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        if std::io::stdout().flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        match repl::parse(&line) {
            Ok(command) => match execute(&mut workspace, command) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => println!("error: {:#}", e),
            },
            Err(message) => println!("{}", message),
        }

        if dirty.swap(false, Ordering::SeqCst) {
            print_list(&workspace);
        }
    }

    info!("Shutting down");
}
