// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_yaml::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::backends::none::NoneDriver;
use crate::errors::ProviderError;
use crate::host::{AuthOptions, EngineOptions, Host, HostRecord};
use crate::traits::{BaseDriverOptions, CreateFlag, Driver, DriverFlags, HostProvider, HostState};

/// The "remote side" shared by every stub driver of a provider: machine
/// states, a call log and concurrency counters.
#[derive(Debug, Default)]
pub struct StubStats {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: Mutex<Vec<(String, &'static str)>>,
    states: Mutex<HashMap<String, HostState>>,
}

impl StubStats {
    /// Highest number of operations seen running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// `(machine, operation)` pairs, in call order.
    pub fn calls(&self) -> Vec<(String, &'static str)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, operation: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|(_, op)| *op == operation)
            .map(|(machine, _)| machine)
            .collect()
    }

    fn enter(&self, machine: &str, operation: &'static str) {
        self.calls.lock().unwrap().push((machine.to_string(), operation));
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    /// State of a machine; `None` until it has been created.
    pub fn state(&self, machine: &str) -> HostState {
        self.states
            .lock()
            .unwrap()
            .get(machine)
            .copied()
            .unwrap_or(HostState::None)
    }

    fn set_state(&self, machine: &str, state: HostState) {
        self.states.lock().unwrap().insert(machine.to_string(), state);
    }
}

/// A driver that only records what it is asked to do.
///
/// Flags: `stub-ip` (address reported), `stub-delay-ms` (latency of every
/// operation) and the `stub-fail` switch (every operation fails).
#[derive(Debug)]
pub struct StubDriver {
    machine_name: String,
    ip: String,
    delay: Duration,
    fail: bool,
    stats: Arc<StubStats>,
}

impl StubDriver {
    pub fn new(machine_name: impl Into<String>, stats: Arc<StubStats>) -> Self {
        Self {
            machine_name: machine_name.into(),
            ip: "127.0.0.1".to_string(),
            delay: Duration::ZERO,
            fail: false,
            stats,
        }
    }

    async fn operation(&self, operation: &'static str) -> Result<(), ProviderError> {
        self.stats.enter(&self.machine_name, operation);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.stats.exit();

        if self.fail {
            return Err(ProviderError::Operation {
                host: self.machine_name.clone(),
                operation,
                reason: "simulated failure".to_string(),
            });
        }
        Ok(())
    }

    async fn transition(&mut self, operation: &'static str, state: HostState) -> Result<(), ProviderError> {
        self.operation(operation).await?;
        self.stats.set_state(&self.machine_name, state);
        Ok(())
    }
}

#[async_trait]
impl Driver for StubDriver {
    fn driver_name(&self) -> &str {
        "stub"
    }

    fn machine_name(&self) -> &str {
        &self.machine_name
    }

    fn create_flags(&self) -> Vec<CreateFlag> {
        vec![
            CreateFlag::new("stub-ip", Some(Value::String("127.0.0.1".to_string()))),
            CreateFlag::new("stub-delay-ms", Some(Value::Number(0.into()))),
            CreateFlag::new("stub-fail", None),
        ]
    }

    fn set_config_from_flags(&mut self, flags: &DriverFlags) -> Result<(), ProviderError> {
        if let Some(ip) = flags.string("stub-ip") {
            self.ip = ip;
        }
        if let Some(value) = flags.get("stub-delay-ms") {
            let ms = flags
                .u64("stub-delay-ms")
                .ok_or_else(|| ProviderError::InvalidFlags(format!("stub-delay-ms: {:?}", value)))?;
            self.delay = Duration::from_millis(ms);
        }
        self.fail = flags.bool("stub-fail").unwrap_or(false);
        Ok(())
    }

    fn flags(&self) -> DriverFlags {
        let mut flags = DriverFlags::new();
        flags.insert("stub-ip", Value::String(self.ip.clone()));
        flags.insert("stub-delay-ms", Value::Number((self.delay.as_millis() as u64).into()));
        flags.insert("stub-fail", Value::Bool(self.fail));
        flags
    }

    async fn create(&mut self) -> Result<(), ProviderError> {
        self.transition("create", HostState::Running).await
    }

    async fn start(&mut self) -> Result<(), ProviderError> {
        self.transition("start", HostState::Running).await
    }

    async fn stop(&mut self) -> Result<(), ProviderError> {
        self.transition("stop", HostState::Stopped).await
    }

    async fn restart(&mut self) -> Result<(), ProviderError> {
        self.transition("restart", HostState::Running).await
    }

    async fn kill(&mut self) -> Result<(), ProviderError> {
        self.transition("kill", HostState::Stopped).await
    }

    async fn remove(&mut self) -> Result<(), ProviderError> {
        self.transition("remove", HostState::None).await
    }

    async fn upgrade(&mut self, _engine: &EngineOptions) -> Result<(), ProviderError> {
        self.operation("upgrade").await
    }

    async fn configure_auth(&mut self, _auth: &AuthOptions) -> Result<(), ProviderError> {
        self.operation("configureAuth").await
    }

    async fn get_ip(&self) -> Result<String, ProviderError> {
        self.operation("ip").await?;
        Ok(self.ip.clone())
    }

    async fn get_url(&self) -> Result<String, ProviderError> {
        if self.stats.state(&self.machine_name) != HostState::Running {
            return Err(ProviderError::HostNotRunning);
        }
        Ok(format!("tcp://{}:2376", self.ip))
    }

    async fn get_state(&self) -> Result<HostState, ProviderError> {
        if self.fail {
            return Err(ProviderError::Operation {
                host: self.machine_name.clone(),
                operation: "state",
                reason: "simulated failure".to_string(),
            });
        }
        Ok(self.stats.state(&self.machine_name))
    }
}

/// A driver whose every operation fails, or panics when built with
/// [`FailingDriver::panicking`].
#[derive(Debug)]
pub struct FailingDriver {
    machine_name: String,
    panics: bool,
}

impl FailingDriver {
    pub fn new(machine_name: impl Into<String>) -> Self {
        Self {
            machine_name: machine_name.into(),
            panics: false,
        }
    }

    pub fn panicking(machine_name: impl Into<String>) -> Self {
        Self {
            panics: true,
            ..Self::new(machine_name)
        }
    }

    fn failure(&self, operation: &'static str) -> ProviderError {
        if self.panics {
            panic!("{} panicked on '{}'", operation, self.machine_name);
        }
        ProviderError::Operation {
            host: self.machine_name.clone(),
            operation,
            reason: "driver always fails".to_string(),
        }
    }
}

#[async_trait]
impl Driver for FailingDriver {
    fn driver_name(&self) -> &str {
        "failing"
    }

    fn machine_name(&self) -> &str {
        &self.machine_name
    }

    fn create_flags(&self) -> Vec<CreateFlag> {
        Vec::new()
    }

    fn set_config_from_flags(&mut self, _flags: &DriverFlags) -> Result<(), ProviderError> {
        Ok(())
    }

    fn flags(&self) -> DriverFlags {
        DriverFlags::new()
    }

    async fn create(&mut self) -> Result<(), ProviderError> {
        Err(self.failure("create"))
    }

    async fn start(&mut self) -> Result<(), ProviderError> {
        Err(self.failure("start"))
    }

    async fn stop(&mut self) -> Result<(), ProviderError> {
        Err(self.failure("stop"))
    }

    async fn restart(&mut self) -> Result<(), ProviderError> {
        Err(self.failure("restart"))
    }

    async fn kill(&mut self) -> Result<(), ProviderError> {
        Err(self.failure("kill"))
    }

    async fn remove(&mut self) -> Result<(), ProviderError> {
        Err(self.failure("remove"))
    }

    async fn upgrade(&mut self, _engine: &EngineOptions) -> Result<(), ProviderError> {
        Err(self.failure("upgrade"))
    }

    async fn configure_auth(&mut self, _auth: &AuthOptions) -> Result<(), ProviderError> {
        Err(self.failure("configureAuth"))
    }

    async fn get_ip(&self) -> Result<String, ProviderError> {
        Err(self.failure("ip"))
    }

    async fn get_url(&self) -> Result<String, ProviderError> {
        Err(self.failure("url"))
    }

    async fn get_state(&self) -> Result<HostState, ProviderError> {
        Err(self.failure("state"))
    }
}

/// An in-memory provider knowing the `stub`, `failing` and `none` drivers.
pub struct StubProvider {
    store_path: PathBuf,
    store: Mutex<HashMap<String, HostRecord>>,
    stats: Arc<StubStats>,
}

impl StubProvider {
    pub fn new(store_path: impl Into<PathBuf>) -> Self {
        Self {
            store_path: store_path.into(),
            store: Mutex::new(HashMap::new()),
            stats: Arc::new(StubStats::default()),
        }
    }

    pub fn stats(&self) -> &StubStats {
        &self.stats
    }

    /// A host bound to a stub driver, not yet saved.
    pub fn stub_host(&self, name: &str, flags: &DriverFlags) -> Host {
        let mut driver = StubDriver::new(name, self.stats.clone());
        driver.set_config_from_flags(flags).unwrap();
        Host::new(Box::new(driver))
    }

    pub fn stored_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.store.lock().unwrap().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn record(&self, name: &str) -> Option<HostRecord> {
        self.store.lock().unwrap().get(name).cloned()
    }
}

#[async_trait]
impl HostProvider for StubProvider {
    fn store_path(&self) -> &Path {
        &self.store_path
    }

    fn load_plugin(&self, name: &str, bare_driver_data: &[u8]) -> Result<Box<dyn Driver>, ProviderError> {
        let base: BaseDriverOptions = serde_json::from_slice(bare_driver_data)?;
        match name {
            "stub" => Ok(Box::new(StubDriver::new(base.machine_name, self.stats.clone()))),
            "failing" => Ok(Box::new(FailingDriver::new(base.machine_name))),
            "none" => Ok(Box::new(NoneDriver::new(base.machine_name))),
            _ => Err(ProviderError::NotLoadable(name.to_string())),
        }
    }

    fn exists(&self, name: &str) -> Result<bool, ProviderError> {
        Ok(self.store.lock().unwrap().contains_key(name))
    }

    fn load(&self, name: &str) -> Result<Host, ProviderError> {
        let record = self
            .record(name)
            .ok_or_else(|| ProviderError::HostDoesNotExist(name.to_string()))?;
        record.into_host(self)
    }

    fn save(&self, host: &Host) -> Result<(), ProviderError> {
        self.store
            .lock()
            .unwrap()
            .insert(host.name.clone(), host.to_record());
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<(), ProviderError> {
        self.store
            .lock()
            .unwrap()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| ProviderError::HostDoesNotExist(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_driver_state_transitions() {
        let stats = Arc::new(StubStats::default());
        let mut driver = StubDriver::new("db", stats.clone());

        assert_eq!(driver.get_state().await.unwrap(), HostState::None);
        assert!(matches!(driver.get_url().await, Err(ProviderError::HostNotRunning)));

        driver.start().await.unwrap();
        assert_eq!(driver.get_state().await.unwrap(), HostState::Running);
        assert_eq!(driver.get_url().await.unwrap(), "tcp://127.0.0.1:2376");

        driver.kill().await.unwrap();
        assert_eq!(driver.get_state().await.unwrap(), HostState::Stopped);
        assert_eq!(stats.calls_for("start"), vec!["db".to_string()]);
    }

    #[test]
    fn test_store_round_trip_keeps_flags() {
        let api = StubProvider::new("/store");
        let mut flags = DriverFlags::new();
        flags.insert("stub-ip", Value::String("10.3.3.3".to_string()));
        flags.insert("stub-fail", Value::Bool(true));
        let host = api.stub_host("cache", &flags);

        api.save(&host).unwrap();
        let loaded = api.load("cache").unwrap();

        assert_eq!(loaded.name, "cache");
        assert_eq!(loaded.driver_name, "stub");
        assert_eq!(loaded.driver.flags().string("stub-ip").as_deref(), Some("10.3.3.3"));
        assert_eq!(loaded.driver.flags().bool("stub-fail"), Some(true));
    }

    #[test]
    fn test_missing_hosts() {
        let api = StubProvider::new("/store");
        assert!(!api.exists("ghost").unwrap());
        assert!(api.load("ghost").unwrap_err().is_not_exist());
        assert!(api.remove("ghost").unwrap_err().is_not_exist());
    }
}
