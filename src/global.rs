//! Process-wide state: the loaded config and the shared RPC handle.
//!
//! Both are set once during startup and read-only afterwards; the flow has
//! no other shared mutable state.

use once_cell::sync::{Lazy, OnceCell};
use std::sync::{Arc, RwLock};

use crate::config::Config;
use crate::errors::PublishError;
use crate::rpc::RpcHandle;

static CONFIGS: Lazy<RwLock<Option<Config>>> = Lazy::new(|| RwLock::new(None));

static RPC_HANDLE: OnceCell<Arc<RpcHandle>> = OnceCell::new();

/// Store the loaded config for the rest of the process
pub fn set_configs(config: Config) {
    if let Ok(mut guard) = CONFIGS.write() {
        *guard = Some(config);
    }
}

/// Read a copy of the loaded config
pub fn read_configs() -> Result<Config, PublishError> {
    match CONFIGS.read() {
        Ok(guard) => guard
            .clone()
            .ok_or_else(|| PublishError::Config("Config not loaded yet".to_string())),
        Err(_) => Err(PublishError::Config("Config lock poisoned".to_string())),
    }
}

/// Initialize the shared RPC handle from the loaded config.
/// Subsequent calls are no-ops; the first handle wins.
pub fn init_rpc(config: &Config) -> Arc<RpcHandle> {
    RPC_HANDLE
        .get_or_init(|| Arc::new(RpcHandle::new(&config.rpc_url)))
        .clone()
}

/// Get the shared RPC handle
pub fn get_rpc() -> Result<Arc<RpcHandle>, PublishError> {
    RPC_HANDLE
        .get()
        .cloned()
        .ok_or_else(|| PublishError::Rpc("RPC handle not initialized".to_string()))
}
