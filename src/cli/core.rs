//! Shell context, command registry, and the handlers behind every command.

use std::{collections::HashMap, fs, io, path::PathBuf};

use chrono::{DateTime, Local, Utc};
use dialoguer::theme::ColorfulTheme;
use strsim::levenshtein;
use thiserror::Error;
use tracing::warn;

use crate::{
    config::{Config, ConfigManager},
    core::services::{ServiceError, SummaryService},
    core::StateManager,
    currency::format_amount,
    errors::LedgerError,
    ledger::{MovementKind, SplitTarget},
    storage::JsonStore,
    utils::persistence,
};

use super::help;
use super::io as cli_io;
use super::output;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<LoopControl, CommandError>;
pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// Fatal shell failures; everything else is reported and the loop continues.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
}

/// Per-command failures, reported to the user without ending the session.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
}

#[derive(Clone)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandDefinition {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandDefinition>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new(definitions: Vec<CommandDefinition>) -> Self {
        let mut commands = HashMap::new();
        let mut order = Vec::new();
        for definition in definitions {
            order.push(definition.name);
            commands.insert(definition.name, definition);
        }
        Self { commands, order }
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.order
            .iter()
            .filter_map(move |name| self.commands.get(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }
}

fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "show",
            "Show bucket balances and the recomputed total",
            "show",
            cmd_show,
        ),
        CommandDefinition::new(
            "income",
            "Register an income movement",
            "income <amount> [auto|ahorro|personales|inversion]",
            cmd_income,
        ),
        CommandDefinition::new(
            "expense",
            "Register an expense movement",
            "expense <amount> [ahorro|personales|inversion]",
            cmd_expense,
        ),
        CommandDefinition::new(
            "history",
            "List recent movements, newest first",
            "history [count]",
            cmd_history,
        ),
        CommandDefinition::new(
            "toggle-split",
            "Toggle the 10/25/65 auto-split default for income",
            "toggle-split",
            cmd_toggle_split,
        ),
        CommandDefinition::new(
            "snapshot",
            "Save a named snapshot of the current state",
            "snapshot [name]",
            cmd_snapshot,
        ),
        CommandDefinition::new("snapshots", "List saved snapshots", "snapshots", cmd_snapshots),
        CommandDefinition::new(
            "restore",
            "Replace the state with a saved snapshot",
            "restore <position>",
            cmd_restore,
        ),
        CommandDefinition::new(
            "export",
            "Write the state to a portable JSON file",
            "export [path]",
            cmd_export,
        ),
        CommandDefinition::new(
            "import",
            "Replace the state from an exported JSON file",
            "import <path>",
            cmd_import,
        ),
        CommandDefinition::new(
            "reset",
            "Reset balances to the built-in initial values",
            "reset",
            cmd_reset,
        ),
        CommandDefinition::new("help", "Show available commands", "help [command]", cmd_help),
        CommandDefinition::new("exit", "Leave the shell", "exit", cmd_exit),
    ]
}

/// Shared CLI runtime state: the state manager, config, and dispatch table.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    manager: StateManager,
    config: Config,
    theme: ColorfulTheme,
    pub running: bool,
    pub last_command: Option<String>,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let store = JsonStore::new_default()?;
        let manager = StateManager::load(Box::new(store));
        let config = match ConfigManager::new().and_then(|cm| cm.load()) {
            Ok(config) => config,
            Err(err) => {
                warn!(%err, "could not load config, using defaults");
                Config::default()
            }
        };
        Ok(Self {
            mode,
            registry: CommandRegistry::new(definitions()),
            manager,
            config,
            theme: ColorfulTheme::default(),
            running: true,
            last_command: None,
        })
    }

    /// Builds a context over an explicit store, bypassing the default data
    /// directory. Used by integration tests.
    pub fn with_manager(mode: CliMode, manager: StateManager) -> Self {
        Self {
            mode,
            registry: CommandRegistry::new(definitions()),
            manager,
            config: Config::default(),
            theme: ColorfulTheme::default(),
            running: true,
            last_command: None,
        }
    }

    pub fn manager(&self) -> &StateManager {
        &self.manager
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn prompt(&self) -> String {
        "finance> ".to_string()
    }

    pub(crate) fn dispatch(&mut self, command: &str, args: &[&str]) -> CommandResult {
        let Some(handler) = self.registry.get(command).map(|entry| entry.handler) else {
            self.suggest_command(command);
            return Ok(LoopControl::Continue);
        };
        handler(self, args)
    }

    fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, input), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true).map_err(|err| match err {
            CommandError::Dialoguer(inner) => CliError::Dialoguer(inner),
            CommandError::Io(inner) => CliError::Io(inner),
            other => CliError::Io(io::Error::new(io::ErrorKind::Other, other.to_string())),
        })
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::InvalidArguments(message) => cli_io::print_warning(message),
            other => cli_io::print_error(other),
        }
    }

    /// Destructive operations ask first in interactive mode; a scripted
    /// command is its own consent.
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, default)
    }

    fn amount(&self, value: f64) -> String {
        format!("{}{}", self.config.currency_symbol, format_amount(value))
    }
}

fn format_local(date: DateTime<Utc>) -> String {
    date.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

fn cmd_show(ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let summary = SummaryService::buckets(ctx.manager.state());
    output::section("Balances");
    for row in &summary.rows {
        cli_io::print_info(format!("  {:<22} {:>14}", row.label, ctx.amount(row.balance)));
    }
    cli_io::print_info(format!("  {:<22} {:>14}", "Total", ctx.amount(summary.total)));
    cli_io::print_info(format!(
        "Auto-split (10/25/65) for income: {}",
        if ctx.manager.state().auto_split {
            "enabled"
        } else {
            "disabled"
        }
    ));
    Ok(LoopControl::Continue)
}

fn register_movement(
    ctx: &mut ShellContext,
    args: &[&str],
    kind: MovementKind,
    usage: &str,
) -> CommandResult {
    let amount = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments(format!("Usage: {usage}")))?;
    let target = match args.get(1) {
        Some(raw) => match raw.parse::<SplitTarget>() {
            Ok(target) => target,
            Err(err) => {
                cli_io::print_warning(format!("{err}; applying the automatic routing rules"));
                SplitTarget::Auto
            }
        },
        None if kind == MovementKind::Income && !ctx.manager.state().auto_split => {
            return Err(CommandError::InvalidArguments(
                "Auto-split is off; name a bucket or pass `auto` explicitly".into(),
            ));
        }
        None => SplitTarget::Auto,
    };

    match ctx.manager.register_movement(amount, kind, target) {
        Ok(movement) => {
            cli_io::print_success(format!(
                "{} of {} registered ({}). Total: {}",
                movement.kind,
                ctx.amount(movement.value),
                movement.target,
                ctx.amount(ctx.manager.state().total()),
            ));
            Ok(LoopControl::Continue)
        }
        Err(ServiceError::InvalidAmount) => {
            cli_io::print_warning("Nothing registered: amount must be a non-zero number.");
            Ok(LoopControl::Continue)
        }
        Err(err) => Err(err.into()),
    }
}

fn cmd_income(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    register_movement(
        ctx,
        args,
        MovementKind::Income,
        "income <amount> [auto|ahorro|personales|inversion]",
    )
}

fn cmd_expense(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    register_movement(
        ctx,
        args,
        MovementKind::Expense,
        "expense <amount> [ahorro|personales|inversion]",
    )
}

fn cmd_history(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let limit = match args.first() {
        Some(raw) => raw.parse::<usize>().map_err(|_| {
            CommandError::InvalidArguments("Usage: history [count]".into())
        })?,
        None => 10,
    };
    let movements = SummaryService::recent(ctx.manager.state(), limit);
    if movements.is_empty() {
        cli_io::print_info("No movements yet.");
        return Ok(LoopControl::Continue);
    }
    output::section("History");
    for movement in movements {
        cli_io::print_info(format!(
            "  {}  {:<8} {:>12}  ({})",
            format_local(movement.date),
            movement.kind.to_string(),
            ctx.amount(movement.value),
            movement.target,
        ));
    }
    Ok(LoopControl::Continue)
}

fn cmd_toggle_split(ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let enabled = ctx.manager.toggle_auto_split();
    cli_io::print_success(format!(
        "Auto-split {} for future income.",
        if enabled { "enabled" } else { "disabled" }
    ));
    Ok(LoopControl::Continue)
}

fn cmd_snapshot(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = if args.is_empty() {
        if ctx.mode == CliMode::Script {
            return Err(CommandError::InvalidArguments(
                "Usage: snapshot <name>".into(),
            ));
        }
        cli_io::prompt_text(&ctx.theme, "Name for this snapshot")?
    } else {
        args.join(" ")
    };

    match ctx.manager.save_snapshot(&name) {
        Ok(snapshot) => {
            cli_io::print_success(format!("Snapshot `{}` saved.", snapshot.name));
            Ok(LoopControl::Continue)
        }
        Err(ServiceError::EmptyName) => {
            cli_io::print_warning("Snapshot not saved: name must not be empty.");
            Ok(LoopControl::Continue)
        }
        Err(err) => Err(err.into()),
    }
}

fn cmd_snapshots(ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let snapshots = ctx.manager.snapshots();
    if snapshots.is_empty() {
        cli_io::print_info("No snapshots saved yet.");
        return Ok(LoopControl::Continue);
    }
    output::section("Snapshots");
    for (position, snapshot) in snapshots.iter().enumerate() {
        cli_io::print_info(format!(
            "  {:>2}. {}  ({})",
            position + 1,
            snapshot.name,
            format_local(snapshot.date),
        ));
    }
    Ok(LoopControl::Continue)
}

fn cmd_restore(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let position: usize = args
        .first()
        .and_then(|raw| raw.parse().ok())
        .filter(|&p| p >= 1)
        .ok_or_else(|| CommandError::InvalidArguments("Usage: restore <position>".into()))?;
    let index = position - 1;

    let Some((name, date)) = ctx
        .manager
        .snapshots()
        .get(index)
        .map(|snapshot| (snapshot.name.clone(), snapshot.date))
    else {
        cli_io::print_warning(format!(
            "No snapshot at position {position}. Use `snapshots` to list them."
        ));
        return Ok(LoopControl::Continue);
    };

    let prompt = format!(
        "Import snapshot `{}` saved {}? This replaces the current balances.",
        name,
        format_local(date)
    );
    if !ctx.confirm(&prompt, false)? {
        cli_io::print_info("Restore cancelled.");
        return Ok(LoopControl::Continue);
    }

    ctx.manager.restore_snapshot(index)?;
    cli_io::print_success(format!("Snapshot `{name}` imported."));
    Ok(LoopControl::Continue)
}

fn cmd_export(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = args
        .first()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(persistence::default_export_name(Utc::now())));
    persistence::save_state_to_file(ctx.manager.state(), &path)?;
    cli_io::print_success(format!("State exported to {}.", path.display()));
    Ok(LoopControl::Continue)
}

fn cmd_import(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("Usage: import <path>".into()))?;
    let text = fs::read_to_string(path)?;
    let state = match persistence::import_state(&text) {
        Ok(state) => state,
        Err(err @ (ServiceError::Parse(_) | ServiceError::InvalidShape)) => {
            cli_io::print_error(format!("Import failed: {err}. Nothing changed."));
            return Ok(LoopControl::Continue);
        }
        Err(err) => return Err(err.into()),
    };

    if !ctx.confirm(
        "Replace the current balances with the imported data?",
        false,
    )? {
        cli_io::print_info("Import cancelled.");
        return Ok(LoopControl::Continue);
    }

    ctx.manager.replace_state(state);
    cli_io::print_success(format!("State imported from {path}."));
    Ok(LoopControl::Continue)
}

fn cmd_reset(ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !ctx.confirm(
        "Reset balances to the built-in initial values? The history is discarded.",
        false,
    )? {
        cli_io::print_info("Reset cancelled.");
        return Ok(LoopControl::Continue);
    }
    ctx.manager.reset();
    cli_io::print_success("Balances reset to the initial values.");
    Ok(LoopControl::Continue)
}

fn cmd_help(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first() {
        Some(name) => match ctx.registry.get(&name.to_lowercase()) {
            Some(entry) => help::print_command(entry),
            None => cli_io::print_warning(format!("Unknown command `{name}`.")),
        },
        None => help::print_overview(&ctx.registry),
    }
    Ok(LoopControl::Continue)
}

fn cmd_exit(_ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Ok(LoopControl::Exit)
}
