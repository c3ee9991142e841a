//! Current user endpoint (/auth/me)

use anyhow::Result;

use super::client::ApiClient;
use crate::storage::KeyValueStore;

/// Fetch and display the signed-in user.
pub async fn whoami<S: KeyValueStore>(client: &ApiClient<'_, S>) -> Result<()> {
    let me = client.current_user().await?;

    let role = me
        .role
        .as_ref()
        .map_or_else(|| "(none)".to_string(), ToString::to_string);

    println!();
    println!("Name:  {}", me.name.as_deref().unwrap_or("(none)"));
    println!("Email: {}", me.email);
    println!("Role:  {}", role);
    println!("ID:    {}", me.id);

    Ok(())
}
