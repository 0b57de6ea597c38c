//! Push device subscription commands.
//!
//! The email channel links itself to the push player stored here. A browser
//! records it after push registration; the CLI sets it by hand.

use anyhow::Result;

use crate::models::DeviceSubscription;
use crate::store::Store;

/// Print the stored push device subscription as JSON.
pub fn show(store: &dyn Store) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&store.device_subscription()?)?
    );
    Ok(())
}

/// Record `device_id` as the push player, keeping the other fields.
///
/// An empty id clears the stored device.
pub fn set(store: &dyn Store, device_id: &str) -> Result<DeviceSubscription> {
    let mut subscription = store.device_subscription()?;
    subscription.device_id = (!device_id.is_empty()).then(|| device_id.to_string());
    store.set_device_subscription(subscription.clone())?;
    log::info!("Device id set to {:?}", subscription.device_id);
    Ok(subscription)
}
