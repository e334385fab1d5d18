// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use tracing::info;

use crate::commands::CommandContext;
use crate::errors::CommandError;
use crate::observability::messages::host::{HostOperationFailed, HostRemoved};
use crate::observability::messages::StructuredLog;

/// Remove every existing machine of the environment.
///
/// A host the provider fails to remove keeps its record, unless `force` is
/// set. Failures are logged per host and never fail the command.
pub async fn rm(ctx: &CommandContext<'_>, force: bool) -> Result<(), CommandError> {
    let hosts = ctx.config.machines.load_existing_hosts(ctx.api, |name| {
        info!(host = name, "Nothing to do: host does not exist");
    })?;

    for mut host in hosts {
        if let Err(e) = host.driver.remove().await {
            HostOperationFailed {
                operation: "provider removal",
                host: &host.name,
                error: &e,
            }
            .log();
            if !force {
                continue;
            }
        }

        match ctx.api.remove(&host.name) {
            Ok(()) => HostRemoved { name: &host.name }.log(),
            Err(e) => HostOperationFailed {
                operation: "store removal",
                host: &host.name,
                error: &e,
            }
            .log(),
        }
    }

    Ok(())
}
