// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::str::FromStr;

/// The operations that can be fanned out across hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ConfigureAuth,
    Start,
    Stop,
    Restart,
    Kill,
    Upgrade,
    /// Read-only: prints the host's address.
    Ip,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::ConfigureAuth,
        Action::Start,
        Action::Stop,
        Action::Restart,
        Action::Kill,
        Action::Upgrade,
        Action::Ip,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::ConfigureAuth => "configureAuth",
            Action::Start => "start",
            Action::Stop => "stop",
            Action::Restart => "restart",
            Action::Kill => "kill",
            Action::Upgrade => "upgrade",
            Action::Ip => "ip",
        }
    }

    /// Whether the action changes the host, so it must be saved afterwards.
    pub fn mutates(&self) -> bool {
        !matches!(self, Action::Ip)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| format!("unknown action '{}'", s))
    }
}
