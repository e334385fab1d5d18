/// Base name of environment documents: `docker-env.yml`, `docker-env-<name>.yml`
pub const DEFAULT_BASENAME: &str = "docker-env";
/// Extensions tried, in order, for every document
pub const CONFIG_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

/// Placeholder replaced by the instance index when a machine is replicated
pub const INDEX_VAR: &str = "#";

/// Default Docker engine installer
pub const DEFAULT_ENGINE_INSTALL_URL: &str = "https://get.docker.com";
pub const DEFAULT_ENGINE_STORAGE_DRIVER: &str = "aufs";
pub const DEFAULT_ENGINE_TLS_VERIFY: bool = true;

/// Address the swarm manager listens on
pub const DEFAULT_SWARM_HOST: &str = "tcp://0.0.0.0:3376";
pub const DEFAULT_SWARM_IMAGE: &str = "swarm:latest";
pub const DEFAULT_SWARM_STRATEGY: &str = "spread";

pub const CA_CERT_FILE: &str = "ca.pem";
pub const CA_KEY_FILE: &str = "ca-key.pem";
pub const CLIENT_CERT_FILE: &str = "cert.pem";
pub const CLIENT_KEY_FILE: &str = "key.pem";
pub const SERVER_CERT_FILE: &str = "server.pem";
pub const SERVER_KEY_FILE: &str = "server-key.pem";

pub const DEFAULT_MACHINE_CPUS: u32 = 2;
/// Memory in MB
pub const DEFAULT_MACHINE_MEMORY: u32 = 2048;

/// Hosts acted upon at the same time by the dispatcher
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;
