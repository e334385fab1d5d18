// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::io::Write;

use crate::config::RootConfig;
use crate::errors::CommandError;

/// Describe the resolved environment.
///
/// Lists the machine names; with `tree`, dumps the whole resolved
/// configuration as YAML instead.
pub fn info<W: Write>(config: &RootConfig, tree: bool, out: &mut W) -> Result<(), CommandError> {
    if tree {
        out.write_all(serde_yaml::to_string(config)?.as_bytes())?;
    } else {
        for name in config.machines.names() {
            writeln!(out, "{}", name)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::StubProvider;
    use crate::commands::test_support::environment;

    fn render(config: &RootConfig, tree: bool) -> String {
        let mut out = Vec::new();
        info(config, tree, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_lists_machine_names() {
        let api = StubProvider::new("/store");
        let config = environment(&api);

        assert_eq!(render(&config, false), "db\nweb-1\nweb-2\nweb-3\n");
    }

    #[test]
    fn test_tree_is_the_resolved_configuration() {
        let api = StubProvider::new("/store");
        let config = environment(&api);

        let dump = render(&config, true);
        let value: serde_yaml::Value = serde_yaml::from_str(&dump).unwrap();

        let web_3 = &value["machines"]["web-3"];
        assert_eq!(web_3["instances"].as_str(), Some("1"));
        assert_eq!(web_3["driver"]["stub"]["ip"].as_str(), Some("10.0.0.3"));
        assert_eq!(web_3["engine"]["install-url"].as_str(), Some("https://get.docker.com"));
        assert_eq!(web_3["auth"]["cert-dir"].as_str(), Some("/store/certs"));
    }
}
