// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::consts::{CONFIG_EXTENSIONS, DEFAULT_BASENAME};
use crate::config::root::RootConfig;
use crate::errors::ConfigError;
use crate::observability::messages::config::DocumentLoaded;
use crate::observability::messages::StructuredLog;

/// Read and merge the first of `<dir>/<basename>.yml` and `.yaml` that
/// exists. Returns the loaded path, or `None` when neither exists.
fn load_document(
    config: &mut RootConfig,
    dir: &Path,
    basename: &str,
) -> Result<Option<PathBuf>, ConfigError> {
    for extension in CONFIG_EXTENSIONS {
        let path = dir.join(format!("{}.{}", basename, extension));
        tracing::debug!("Trying to load '{}'", path.display());

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(source) => return Err(ConfigError::Io { path, source }),
        };

        let mut document = RootConfig::new();
        if let Err(e) = document.merge_document(&content) {
            return Err(match e {
                ConfigError::Document(source) => ConfigError::Parse { path, source },
                other => other,
            });
        }
        config.merge(document);

        DocumentLoaded { path: &path }.log();
        return Ok(Some(path));
    }
    Ok(None)
}

/// Load the environment documents found in `dir`.
///
/// `docker-env.yml` (or `.yaml`) is loaded when present. Then, for every
/// `NAME` in `names`, `docker-env-NAME.yml` is merged on top and must exist.
/// At least one document has to be found.
pub fn load_config<P: AsRef<Path>, S: AsRef<str>>(
    dir: P,
    names: &[S],
) -> Result<RootConfig, ConfigError> {
    let dir = dir.as_ref();
    let mut config = RootConfig::new();
    let mut loaded = 0;

    if load_document(&mut config, dir, DEFAULT_BASENAME)?.is_some() {
        loaded += 1;
    }

    for name in names {
        let name = name.as_ref();
        let basename = format!("{}-{}", DEFAULT_BASENAME, name);
        if load_document(&mut config, dir, &basename)?.is_none() {
            return Err(ConfigError::MissingConfigFile {
                name: name.to_string(),
                dir: dir.to_path_buf(),
            });
        }
        loaded += 1;
    }

    if loaded == 0 {
        return Err(ConfigError::NoConfigFiles(dir.to_path_buf()));
    }
    Ok(config)
}
