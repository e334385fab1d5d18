// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use tracing::info;

use crate::commands::CommandContext;
use crate::errors::CommandError;
use crate::observability::messages::host::HostCreated;
use crate::observability::messages::StructuredLog;

/// Create every machine of the environment and save it.
///
/// All hosts are built first, so a machine that already exists or has no
/// usable driver aborts before anything is provisioned. Hosts are then
/// created one at a time; the first failure stops the command.
pub async fn create(ctx: &CommandContext<'_>) -> Result<(), CommandError> {
    let hosts = ctx.config.machines.new_hosts(ctx.api)?;

    for mut host in hosts {
        info!(host = %host.name, "Bringing host up");
        ctx.api
            .create(&mut host)
            .await
            .map_err(|source| CommandError::Create {
                name: host.name.clone(),
                source,
            })?;
        ctx.api.save(&host).map_err(CommandError::Save)?;

        HostCreated {
            name: &host.name,
            driver: &host.driver_name,
        }
        .log();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::StubProvider;
    use crate::commands::test_support::environment;
    use crate::config::RootConfig;
    use crate::engine::ActionDispatcher;
    use crate::errors::ProviderError;
    use crate::traits::HostState;

    #[tokio::test]
    async fn test_create_provisions_and_saves_every_machine() {
        let api = StubProvider::new("/store");
        let config = environment(&api);

        create(&CommandContext::new(&api, &config, ActionDispatcher::default()))
            .await
            .unwrap();

        assert_eq!(api.stored_names(), vec!["db", "web-1", "web-2", "web-3"]);
        for name in api.stored_names() {
            assert_eq!(api.stats().state(&name), HostState::Running, "{}", name);
        }

        let web_2 = api.record("web-2").unwrap();
        assert_eq!(web_2.driver_name, "stub");
        assert_eq!(web_2.driver_flags.string("stub-ip").as_deref(), Some("10.0.0.2"));
        assert_eq!(web_2.options.auth.cert_dir, "/store/certs");
        let db = api.record("db").unwrap();
        assert_eq!(db.driver_flags.string("stub-ip").as_deref(), Some("10.0.0.100"));
    }

    #[tokio::test]
    async fn test_create_refuses_existing_hosts() {
        let api = StubProvider::new("/store");
        let config = environment(&api);
        let ctx = CommandContext::new(&api, &config, ActionDispatcher::default());
        create(&ctx).await.unwrap();

        let err = create(&ctx).await.unwrap_err();

        assert!(matches!(
            err,
            CommandError::Provider(ProviderError::HostAlreadyExists(ref name)) if name == "db"
        ));
        assert_eq!(api.stats().calls_for("create").len(), 4);
    }

    #[tokio::test]
    async fn test_create_reports_the_failing_host() {
        let api = StubProvider::new("/store");
        let mut config = RootConfig::new();
        config
            .merge_document("machines:\n  bad:\n    driver:\n      stub:\n        fail: true\n")
            .unwrap();
        config.populate(&api).unwrap();

        let err = create(&CommandContext::new(&api, &config, ActionDispatcher::default()))
            .await
            .unwrap_err();

        assert!(err.to_string().starts_with("error attempting to create bad:"), "{}", err);
        assert!(api.stored_names().is_empty());
    }
}
