//! Get command implementation

use anyhow::Result;

use ngrok_api::Session;

use crate::output::{format_tunnel, print_error};

/// Show a single tunnel by name
pub async fn get_command(session: &Session, name: &str) -> Result<()> {
    match session.get_tunnel(name).await {
        Ok(tunnel) => {
            println!("{}", format_tunnel(&tunnel));
            Ok(())
        }
        Err(e) => {
            print_error(&format!("Failed to get tunnel {}: {}", name, e));
            Err(e.into())
        }
    }
}
