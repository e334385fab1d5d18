// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand};
use std::env;
use std::io;
use std::path::PathBuf;

use docker_env::backends::filestore::{LocalProvider, ProviderSettings};
use docker_env::commands::{self, CommandContext};
use docker_env::config::consts::DEFAULT_MAX_CONCURRENCY;
use docker_env::config::{load_config, parse_bool};
use docker_env::engine::ActionDispatcher;
use docker_env::observability::init_tracing;

const DEBUG_ENV: &str = "DOCKER_ENV_DEBUG";

#[derive(Parser)]
#[command(name = "docker-env", version)]
#[command(about = "Create and manage fleets of Docker hosts from declarative environment files", long_about = None)]
struct Cli {
    /// Directory holding the docker-env documents
    #[arg(short = 'd', long = "dir", env = "DOCKER_ENV_DIR", default_value = ".", global = true)]
    dir: PathBuf,

    /// Define or override a variable
    #[arg(short = 'X', long = "var", value_name = "NAME=VALUE", global = true)]
    vars: Vec<String>,

    /// Root of the machine store [default: ~/.docker/machine]
    #[arg(short = 's', long, env = "DOCKER_ENV_STORAGE_PATH", global = true)]
    storage_path: Option<PathBuf>,

    /// Token for GitHub API requests
    #[arg(long, env = "DOCKER_ENV_GITHUB_API_TOKEN", global = true)]
    github_api_token: Option<String>,

    /// Use the built-in SSH client
    #[arg(long, env = "DOCKER_ENV_NATIVE_SSH", global = true)]
    native_ssh: bool,

    /// Enable debug logging (also DOCKER_ENV_DEBUG=true)
    #[arg(short = 'D', long, global = true)]
    debug: bool,

    /// Hosts acted upon at the same time
    #[arg(
        short = 'j',
        long,
        env = "DOCKER_ENV_MAX_CONCURRENCY",
        default_value_t = DEFAULT_MAX_CONCURRENCY,
        global = true
    )]
    max_concurrency: usize,

    #[command(subcommand)]
    command: Command,
}

/// Documents to load on top of `docker-env.yml`, by name:
/// `staging` loads `docker-env-staging.yml`.
#[derive(Args)]
struct Environment {
    names: Vec<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Create and provision every machine
    Create(Environment),
    /// Remove every machine
    Rm {
        /// Remove the local record even if the machine cannot be removed
        #[arg(short, long)]
        force: bool,
        #[command(flatten)]
        env: Environment,
    },
    /// Start every machine
    Start(Environment),
    /// Stop every machine
    Stop(Environment),
    /// Kill every machine
    Kill(Environment),
    /// Restart every machine
    Restart(Environment),
    /// Upgrade the Docker engine of every machine
    Upgrade(Environment),
    /// Print the address of every machine
    Ip(Environment),
    /// Show the state of every machine
    Status(Environment),
    /// Describe the resolved environment
    Info {
        /// Dump the whole resolved configuration
        #[arg(short, long)]
        tree: bool,
        #[command(flatten)]
        env: Environment,
    },
    /// Print the version
    Version,
}

impl Command {
    fn environment(&self) -> Option<&Environment> {
        match self {
            Command::Create(env)
            | Command::Start(env)
            | Command::Stop(env)
            | Command::Kill(env)
            | Command::Restart(env)
            | Command::Upgrade(env)
            | Command::Ip(env)
            | Command::Status(env)
            | Command::Rm { env, .. }
            | Command::Info { env, .. } => Some(env),
            Command::Version => None,
        }
    }
}

/// `DOCKER_ENV_DEBUG`, when set, must be a boolean.
fn debug_from_env() -> anyhow::Result<bool> {
    match env::var(DEBUG_ENV) {
        Ok(value) => parse_bool(&value)
            .ok_or_else(|| anyhow!("invalid value '{}' for {}", value, DEBUG_ENV)),
        Err(_) => Ok(false),
    }
}

fn provider_settings(cli: &Cli) -> anyhow::Result<ProviderSettings> {
    let storage_path = match &cli.storage_path {
        Some(path) => path.clone(),
        None => dirs::home_dir()
            .context("cannot determine the home directory; use --storage-path")?
            .join(".docker")
            .join("machine"),
    };

    Ok(ProviderSettings {
        storage_path,
        github_api_token: cli.github_api_token.clone(),
        native_ssh: cli.native_ssh,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let debug_env = debug_from_env()?;
    init_tracing(cli.debug || debug_env);

    let Some(environment) = cli.command.environment() else {
        commands::version(&mut io::stdout())?;
        return Ok(());
    };

    let settings = provider_settings(&cli)?;
    let api = LocalProvider::new(settings);

    let mut config = load_config(&cli.dir, environment.names.as_slice())
        .with_context(|| format!("loading environment from {}", cli.dir.display()))?;
    config.apply_var_definitions(cli.vars.as_slice())?;
    config.populate(&api)?;

    let ctx = CommandContext::new(&api, &config, ActionDispatcher::new(cli.max_concurrency));
    match &cli.command {
        Command::Create(_) => commands::create(&ctx).await?,
        Command::Rm { force, .. } => commands::rm(&ctx, *force).await?,
        Command::Start(_) => commands::start(&ctx).await?,
        Command::Stop(_) => commands::stop(&ctx).await?,
        Command::Kill(_) => commands::kill(&ctx).await?,
        Command::Restart(_) => commands::restart(&ctx).await?,
        Command::Upgrade(_) => commands::upgrade(&ctx).await?,
        Command::Ip(_) => commands::ip(&ctx).await?,
        Command::Status(_) => commands::status(&ctx, &mut io::stdout()).await?,
        Command::Info { tree, .. } => commands::info(&config, *tree, &mut io::stdout())?,
        Command::Version => commands::version(&mut io::stdout())?,
    }

    Ok(())
}
