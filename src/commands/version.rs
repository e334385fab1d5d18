// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::io::Write;

use crate::errors::CommandError;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version<W: Write>(out: &mut W) -> Result<(), CommandError> {
    writeln!(out, "docker-env version {}", VERSION)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_line() {
        let mut out = Vec::new();
        version(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), format!("docker-env version {}\n", VERSION));
    }
}
