//! API key management commands.

use anyhow::Result;
use clap::Subcommand;
use console::style;

use crate::http::extractors::auth::mint_api_key;
use crate::state::AppState;

#[derive(Subcommand)]
pub enum KeyCommand {
    /// Mint a new API key for a user.
    Create {
        /// User id (as issued by the identity provider) the key acts as.
        #[arg(long)]
        user: String,

        /// Label for the key.
        #[arg(long, default_value = "default")]
        name: String,
    },
}

/// Mint a key and print it once.
pub async fn create_key(state: &AppState, user: &str, name: &str, json: bool) -> Result<()> {
    let key = mint_api_key(state, user, name).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "user_id": user,
                "name": name,
                "key": key,
            }))?
        );
        return Ok(());
    }

    println!();
    println!(
        "  {} API key for '{}' (save this -- it won't be shown again):",
        style("🔑").bold(),
        style(user).cyan()
    );
    println!();
    println!("  {}", style(&key).yellow().bold());
    println!();
    Ok(())
}
