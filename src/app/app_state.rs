//! Usage: Shared Tauri state wiring for the proxy manager, management bridge,
//! and connect coordinator.

use crate::domain::connect::{ConnectConfig, ConnectCoordinator};
use crate::proxy::management::ManagementBridge;
use crate::proxy::ProxyManager;
use crate::shared::error::AppResult;
use std::sync::{Arc, Mutex};

pub(crate) struct ProxyState(pub(crate) Arc<Mutex<ProxyManager>>);

pub(crate) struct BridgeState(pub(crate) Arc<ManagementBridge>);

pub(crate) struct ConnectState(pub(crate) Arc<ConnectCoordinator<ManagementBridge>>);

/// Builds the managed state graph: one proxy manager, one bridge over it, one
/// coordinator driving the bridge.
pub(crate) fn build() -> AppResult<(ProxyState, BridgeState, ConnectState)> {
    let manager = Arc::new(Mutex::new(ProxyManager::default()));
    let bridge = Arc::new(ManagementBridge::new(Arc::clone(&manager))?);
    let coordinator = Arc::new(ConnectCoordinator::new(
        Arc::clone(&bridge),
        ConnectConfig::default(),
    ));
    Ok((
        ProxyState(manager),
        BridgeState(bridge),
        ConnectState(coordinator),
    ))
}
