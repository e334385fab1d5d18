// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod auth;
mod driver;
mod engine;
mod loader;
mod machine;
mod options;
mod root;
mod swarm;

pub mod consts;
pub mod substitution;

pub use auth::AuthConfig;
pub use driver::DriverConfig;
pub use engine::EngineConfig;
pub use loader::load_config;
pub use machine::{MachineConfig, MachineConfigMap};
pub use options::{parse_bool, parse_string_list, OptionsMap};
pub use root::{RootConfig, VarsMap};
pub use substitution::{
    has_var, has_vars, replace_all_string_func, replace_all_string_map, replace_vars, Substitute,
};
pub use swarm::SwarmConfig;
