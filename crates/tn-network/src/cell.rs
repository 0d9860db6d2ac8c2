//! Load-once holder for a process-wide network.

use std::sync::OnceLock;

use crate::{NetworkConfig, NetworkError, NetworkResult, RouteNetwork};

/// A [`RouteNetwork`] that can be initialized exactly once.
///
/// ```rust,ignore
/// static NETWORK: NetworkCell = NetworkCell::new();
///
/// NETWORK.init(include_str!("trails.geojson"), NetworkConfig::default())?;
/// let net = NETWORK.get().expect("initialized at startup");
/// ```
pub struct NetworkCell {
    inner: OnceLock<RouteNetwork>,
}

impl NetworkCell {
    pub const fn new() -> Self {
        Self { inner: OnceLock::new() }
    }

    /// Build and store the network.  A second call is a contract violation
    /// and returns [`NetworkError::AlreadyInitialized`] without parsing.
    pub fn init(&self, source: &str, config: NetworkConfig) -> NetworkResult<&RouteNetwork> {
        self.init_with(|| RouteNetwork::initialize(source, config))
    }

    /// Like [`init`](Self::init) with a custom constructor.
    pub fn init_with(
        &self,
        build: impl FnOnce() -> NetworkResult<RouteNetwork>,
    ) -> NetworkResult<&RouteNetwork> {
        if self.inner.get().is_some() {
            return Err(NetworkError::AlreadyInitialized);
        }
        if self.inner.set(build()?).is_err() {
            // Lost a race with another initializer.
            return Err(NetworkError::AlreadyInitialized);
        }
        self.inner.get().ok_or(NetworkError::AlreadyInitialized)
    }

    pub fn get(&self) -> Option<&RouteNetwork> {
        self.inner.get()
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.get().is_some()
    }
}

impl Default for NetworkCell {
    fn default() -> Self {
        Self::new()
    }
}
