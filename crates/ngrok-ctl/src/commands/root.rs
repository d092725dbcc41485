//! Root command implementation

use anyhow::{Context, Result};

use ngrok_api::Session;

use crate::output::print_error;

/// Print the agent's root info document
pub async fn root_command(session: &Session) -> Result<()> {
    let root = match session.get_root().await {
        Ok(root) => root,
        Err(e) => {
            print_error(&format!("Failed to query {}: {}", session.api_url(), e));
            return Err(e.into());
        }
    };

    let pretty = serde_json::to_string_pretty(&root).context("Failed to format response")?;
    println!("{}", pretty);

    Ok(())
}
