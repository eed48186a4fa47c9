//! Service status command.

use anyhow::Result;
use console::style;

use parley_core::chat::repository::ChatRepository;

use crate::state::AppState;

/// Display service status.
///
/// Shows chat and message counts, the data directory, and the configured
/// chatflow engine endpoint.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let chats = state.chat_service.chat_repo().count_chats().await?;
    let messages = state.chat_service.chat_repo().count_messages().await?;

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "chats": chats,
            "messages": messages,
            "chatflow_base_url": state.config.chatflow.base_url,
            "default_chatflow_id": state.config.chatflow.default_chatflow_id,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Parley v{}",
        style("⚡").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("  {}", style("── Chats ──").dim());
    println!("  Chats:    {}", style(chats).bold());
    println!("  Messages: {}", style(messages).bold());
    println!();

    println!("  {}", style("── Engine ──").dim());
    println!("  Endpoint: {}", state.config.chatflow.base_url);
    match &state.config.chatflow.default_chatflow_id {
        Some(id) => println!("  Default flow: {id}"),
        None => println!("  Default flow: {}", style("none").dim()),
    }
    println!();

    println!("  Data dir: {}", state.data_dir.display());
    println!();

    Ok(())
}
