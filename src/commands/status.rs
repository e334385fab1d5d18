// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::io::Write;
use tracing::warn;

use crate::commands::CommandContext;
use crate::errors::{CommandError, ProviderError};
use crate::observability::messages::host::HostOperationFailed;
use crate::observability::messages::StructuredLog;
use crate::traits::HostState;

const HEADER: [&str; 5] = ["NAME", "DRIVER", "STATE", "URL", "ERRORS"];
const NO_ERRORS: &str = "(none)";
const COLUMN_PADDING: usize = 3;

/// Write a table of every host with its state and URL.
///
/// All hosts must exist. A host whose state cannot be read shows the error
/// in the last column, except "host is not running" which is left blank.
pub async fn status<W: Write>(ctx: &CommandContext<'_>, out: &mut W) -> Result<(), CommandError> {
    let hosts = ctx.config.machines.load_hosts(ctx.api)?;

    let mut rows = vec![HEADER.map(String::from)];
    for host in &hosts {
        let mut url = String::new();
        let mut error = NO_ERRORS.to_string();

        let state = match host.driver.get_state().await {
            Ok(state) => {
                match host.driver.get_url().await {
                    Ok(u) => url = u,
                    Err(e) => warn!(host = %host.name, error = %e, "Error getting URL"),
                }
                state
            }
            Err(e) => {
                HostOperationFailed {
                    operation: "state query",
                    host: &host.name,
                    error: &e,
                }
                .log();
                error = match e {
                    ProviderError::HostNotRunning => String::new(),
                    e => e.to_string(),
                };
                HostState::None
            }
        };

        rows.push([
            host.name.clone(),
            host.driver_name.clone(),
            state.to_string(),
            url,
            error,
        ]);
    }

    write_table(out, &rows)?;
    Ok(())
}

/// Left-aligned columns separated by at least [`COLUMN_PADDING`] spaces.
fn write_table<W: Write>(out: &mut W, rows: &[[String; 5]]) -> std::io::Result<()> {
    let mut widths = [0usize; 5];
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    for row in rows {
        let mut line = String::new();
        for (i, cell) in row.iter().enumerate() {
            if i + 1 == row.len() {
                line.push_str(cell);
            } else {
                line.push_str(&format!("{:<width$}", cell, width = widths[i] + COLUMN_PADDING));
            }
        }
        writeln!(out, "{}", line.trim_end())?;
    }
    out.flush()
}
