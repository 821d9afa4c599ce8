/*!
 * Session Orchestration
 * Toggle, pick and status sequencing over a BluetoothControl
 */

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::control::{connect_device, BluetoothControl};
use crate::error::Result;
use crate::menu::{Selection, SelectionMenu};
use crate::scan::spawn_discovery;
use crate::status::LinkStatus;
use crate::store::LastDeviceStore;

/// Current adapter power and whether any device is connected.
pub async fn probe<C>(control: &C) -> Result<LinkStatus>
where
    C: BluetoothControl + ?Sized,
{
    let powered = control.is_powered().await?;
    let connected = control.is_connected(None).await?;
    tracing::debug!("Link status: powered={} connected={}", powered, connected);
    Ok(LinkStatus { powered, connected })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    Connect,
    PowerOff,
}

pub fn plan_toggle(status: LinkStatus) -> ToggleAction {
    if status.powered && status.connected {
        ToggleAction::PowerOff
    } else {
        ToggleAction::Connect
    }
}

/// Connects to `address` unless already powered and connected, in which case
/// the adapter is switched off.
pub async fn toggle<C>(control: &C, status: LinkStatus, address: &str) -> Result<ToggleAction>
where
    C: BluetoothControl + ?Sized,
{
    let action = plan_toggle(status);
    match action {
        ToggleAction::Connect => connect_device(control, address, status.connected).await?,
        ToggleAction::PowerOff => control.power_off().await?,
    }
    Ok(action)
}

/// Lets the user pick a device from a live menu, connects to it and stores
/// it as the last device. Returns `None` when the menu closed without a pick.
pub async fn pick(
    control: Arc<dyn BluetoothControl>,
    menu: &SelectionMenu,
    store: &LastDeviceStore,
    status: LinkStatus,
    cancel: &CancellationToken,
) -> Result<Option<Selection>> {
    let known = control.devices().await?;
    tracing::debug!("{} known device(s) before discovery", known.len());

    let discovery_cancel = cancel.child_token();
    let discovery = spawn_discovery(control.clone(), discovery_cancel.clone());

    let picked = menu.run(control.clone(), cancel).await;

    discovery_cancel.cancel();
    if let Err(e) = discovery.await {
        tracing::warn!("Discovery task failed: {}", e);
    }

    let Some(selection) = picked? else {
        tracing::info!("No device selected");
        return Ok(None);
    };

    tracing::info!("Selected {} ({})", selection.name, selection.address);
    connect_device(control.as_ref(), &selection.address, status.connected).await?;
    store.save(&selection.address)?;

    Ok(Some(selection))
}
