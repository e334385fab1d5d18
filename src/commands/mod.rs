// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Bodies of the `docker-env` subcommands.
//!
//! Every command works on a resolved [`RootConfig`]: the machines it names
//! are the hosts a command acts on. Commands that change hosts save them
//! back to the store one after the other once the action has run on all
//! of them.

pub mod create;
pub mod info;
pub mod rm;
pub mod status;
pub mod version;

pub use create::create;
pub use info::info;
pub use rm::rm;
pub use status::status;
pub use version::version;

use crate::config::RootConfig;
use crate::engine::{Action, ActionDispatcher};
use crate::errors::CommandError;
use crate::observability::messages::host::HostMissing;
use crate::observability::messages::StructuredLog;
use crate::traits::HostProvider;

/// What every command needs: the provider, the resolved environment and
/// the dispatcher used to fan actions out.
pub struct CommandContext<'a> {
    pub api: &'a dyn HostProvider,
    pub config: &'a RootConfig,
    pub dispatcher: ActionDispatcher,
}

impl<'a> CommandContext<'a> {
    pub fn new(api: &'a dyn HostProvider, config: &'a RootConfig, dispatcher: ActionDispatcher) -> Self {
        Self {
            api,
            config,
            dispatcher,
        }
    }
}

/// Run `action` on every host of the environment.
///
/// With `ignore_missing`, hosts absent from the store are logged and
/// skipped; otherwise any missing host aborts before anything runs. Every
/// host is saved afterwards, then the per-host failures are returned
/// together.
pub async fn run_for_hosts(
    ctx: &CommandContext<'_>,
    action: Action,
    ignore_missing: bool,
) -> Result<(), CommandError> {
    let machines = &ctx.config.machines;
    let hosts = if ignore_missing {
        machines.load_existing_hosts(ctx.api, |name| HostMissing { name }.log())?
    } else {
        machines.load_hosts(ctx.api)?
    };

    let report = ctx.dispatcher.dispatch(action, hosts).await;

    if action.mutates() {
        for host in &report.hosts {
            ctx.api.save(host).map_err(CommandError::Save)?;
        }
    }

    report.errors.into_result()?;
    Ok(())
}

pub async fn start(ctx: &CommandContext<'_>) -> Result<(), CommandError> {
    run_for_hosts(ctx, Action::Start, false).await
}

pub async fn stop(ctx: &CommandContext<'_>) -> Result<(), CommandError> {
    run_for_hosts(ctx, Action::Stop, true).await
}

pub async fn kill(ctx: &CommandContext<'_>) -> Result<(), CommandError> {
    run_for_hosts(ctx, Action::Kill, true).await
}

pub async fn restart(ctx: &CommandContext<'_>) -> Result<(), CommandError> {
    run_for_hosts(ctx, Action::Restart, false).await
}

pub async fn upgrade(ctx: &CommandContext<'_>) -> Result<(), CommandError> {
    run_for_hosts(ctx, Action::Upgrade, false).await
}

/// Print the address of every host, one per line.
pub async fn ip(ctx: &CommandContext<'_>) -> Result<(), CommandError> {
    run_for_hosts(ctx, Action::Ip, false).await
}
