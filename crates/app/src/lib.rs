//! dynvar - render dynamic variable templates from the command line
//!
//! Loads a session config, starts a session on the system clock and renders
//! either the conversation start fields or a set of tool calls.

pub mod cli;
mod report;

use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::{Context, bail};
use dynvar_application::variable_resolver::catalog;
use dynvar_application::{RenderConversationStart, ResolveToolCall, Session, StartSession};
use dynvar_domain::SessionConfig;
use dynvar_infrastructure::{SystemClock, load_session_config, to_json_stable};

pub use cli::Cli;
pub use report::Report;

/// Runs the command and returns what should be printed to stdout.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded, the session fails to
/// start, or a field fails to resolve under the fail policy.
pub fn run(cli: &Cli) -> anyhow::Result<String> {
    if cli.list_system {
        return Ok(render_catalog());
    }

    let Some(path) = cli.config.as_deref() else {
        bail!("no session config given; pass --config or set DYNVAR_CONFIG");
    };
    let config = load_session_config(path)
        .with_context(|| format!("loading session config {}", path.display()))?;

    render(cli, config)
}

/// Starts a session from `config` and renders it per `cli`.
///
/// # Errors
///
/// Returns an error if the session fails to start or a field fails to
/// resolve under the fail policy.
pub fn render(cli: &Cli, mut config: SessionConfig) -> anyhow::Result<String> {
    if let Some(policy) = cli.on_unresolved {
        config.settings.on_unresolved = policy;
    }

    let session = StartSession::new(Arc::new(SystemClock::new()))
        .execute(config)
        .context("starting session")?;
    let report = build_report(&session, &cli.tools)?;

    if cli.json {
        Ok(to_json_stable(&report)?)
    } else {
        Ok(report.to_text())
    }
}

fn build_report(session: &Session, tools: &[String]) -> anyhow::Result<Report> {
    if tools.is_empty() {
        let output = RenderConversationStart::new(session).execute()?;
        return Ok(Report::conversation_start(session, output));
    }

    let use_case = ResolveToolCall::new(session);
    let outputs = tools
        .iter()
        .map(|tool| use_case.execute(tool))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Report::tool_calls(session, outputs))
}

fn render_catalog() -> String {
    let mut out = String::new();
    for info in catalog() {
        let cadence = if info.has_live_source { "live" } else { "snapshot" };
        let _ = writeln!(
            out,
            "{:<28} {:<9} {} (e.g. {})",
            info.name, cadence, info.description, info.example
        );
    }
    out
}
