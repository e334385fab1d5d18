// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Semaphore};
use tracing::Instrument;

use crate::config::consts::DEFAULT_MAX_CONCURRENCY;
use crate::engine::Action;
use crate::errors::{ActionError, ActionErrors, ProviderError};
use crate::host::Host;
use crate::observability::messages::dispatch::{
    ActionFailed, ActionSucceeded, ActionTaskLost, DispatchCompleted, DispatchStarted,
};
use crate::observability::messages::StructuredLog;

/// What a worker sends back: the host it owned and how the action went.
struct ActionOutcome {
    host: Host,
    result: Result<(), ProviderError>,
    duration: Duration,
}

/// The result of running one action on a set of hosts.
#[derive(Debug)]
pub struct DispatchReport {
    /// The hosts handed back by their workers, in completion order.
    pub hosts: Vec<Host>,
    /// One entry per failed host; empty when every host succeeded.
    pub errors: ActionErrors,
}

/// Runs one action on many hosts at once.
///
/// Every host is moved into its own task, so no two tasks ever touch the
/// same host. At most `max_concurrency` of them run the action at the same
/// time; the rest wait on a semaphore. Results come back through a single
/// channel, and a failure on one host never stops the others.
///
/// ## No cancellation
/// There is no timeout: a remote call that never returns blocks the
/// dispatch. Tasks that panic are reported as failures of their host.
#[derive(Debug, Clone)]
pub struct ActionDispatcher {
    max_concurrency: usize,
}

impl Default for ActionDispatcher {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENCY)
    }
}

impl ActionDispatcher {
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            max_concurrency: max_concurrency.max(1), // Ensure at least 1
        }
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Run `action` once on every host and collect the failures.
    pub async fn dispatch(&self, action: Action, hosts: Vec<Host>) -> DispatchReport {
        let host_count = hosts.len();
        let started = Instant::now();
        let start_msg = DispatchStarted {
            action: action.as_str(),
            host_count,
            max_concurrency: self.max_concurrency,
        };
        start_msg.log();
        let span = start_msg.span("dispatch");

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let (tx, mut rx) = mpsc::channel::<ActionOutcome>(host_count.max(1));
        let mut pending: Vec<String> = Vec::with_capacity(host_count);

        for mut host in hosts {
            pending.push(host.name.clone());
            let semaphore = semaphore.clone();
            let tx = tx.clone();

            let task = async move {
                // The semaphore is never closed, so acquiring cannot fail.
                let _permit = semaphore.acquire_owned().await.ok();
                let began = Instant::now();
                let result = host.run(action).await;
                let outcome = ActionOutcome {
                    host,
                    result,
                    duration: began.elapsed(),
                };
                // The receiver lives until every sender is gone.
                let _ = tx.send(outcome).await;
            };
            tokio::spawn(task.instrument(span.clone()));
        }
        drop(tx);

        let mut report = DispatchReport {
            hosts: Vec::with_capacity(host_count),
            errors: ActionErrors::default(),
        };

        while let Some(outcome) = rx.recv().await {
            let name = outcome.host.name.clone();
            if let Some(i) = pending.iter().position(|p| *p == name) {
                pending.swap_remove(i);
            }

            match outcome.result {
                Ok(()) => ActionSucceeded {
                    action: action.as_str(),
                    host: &name,
                    duration: outcome.duration,
                }
                .log(),
                Err(source) => {
                    ActionFailed {
                        action: action.as_str(),
                        host: &name,
                        error: &source,
                    }
                    .log();
                    report.errors.push(ActionError {
                        action,
                        host: name,
                        source,
                    });
                }
            }
            report.hosts.push(outcome.host);
        }

        for host in pending {
            ActionTaskLost {
                action: action.as_str(),
                host: &host,
            }
            .log();
            report.errors.push(ActionError {
                action,
                source: ProviderError::Operation {
                    host: host.clone(),
                    operation: action.as_str(),
                    reason: "the worker ended without a result".to_string(),
                },
                host,
            });
        }

        DispatchCompleted {
            action: action.as_str(),
            host_count,
            failed: report.errors.len(),
            duration: started.elapsed(),
        }
        .log();

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_concurrency_is_at_least_one() {
        assert_eq!(ActionDispatcher::new(0).max_concurrency(), 1);
        assert_eq!(ActionDispatcher::new(3).max_concurrency(), 3);
        assert_eq!(ActionDispatcher::default().max_concurrency(), DEFAULT_MAX_CONCURRENCY);
    }

    #[tokio::test]
    async fn test_empty_host_set() {
        let report = ActionDispatcher::new(4).dispatch(Action::Start, Vec::new()).await;
        assert!(report.hosts.is_empty());
        assert!(report.errors.is_empty());
    }
}
