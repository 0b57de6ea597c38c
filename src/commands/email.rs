//! Email channel commands.
//!
//! ```bash
//! pushsync email set user@example.com --auth-hash <hmac>
//! pushsync email logout
//! ```

use anyhow::Result;

use super::Services;
use crate::channel::SecondaryChannel;

/// Register `address` on the email channel and print the email player id.
///
/// Returns the subscription id, or `None` when the server did not assign one.
pub async fn set(services: &Services, address: &str, auth_hash: Option<&str>) -> Result<Option<String>> {
    let address = address.trim();
    if address.is_empty() {
        anyhow::bail!("Email address must not be empty");
    }

    let subscription_id = services.email.set_identifier(address, auth_hash).await?;
    match &subscription_id {
        Some(id) => println!("{}", id),
        None => eprintln!("Server did not assign an email player id"),
    }
    Ok(subscription_id)
}

/// Log out of the email channel. Returns whether the server accepted it.
pub async fn logout(services: &Services) -> bool {
    let ok = services.email.logout().await;
    if ok {
        println!("Logged out");
    } else {
        eprintln!("Email logout failed; see log for details");
    }
    ok
}
