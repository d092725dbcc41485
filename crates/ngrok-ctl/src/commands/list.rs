//! List command implementation

use anyhow::Result;

use ngrok_api::{Session, Tunnel};

use crate::output::{format_tunnels, print_error};

/// Execute the list command
pub async fn list_command(session: &Session, proto: Option<&str>, long: bool) -> Result<()> {
    let tunnels = match session.get_tunnels().await {
        Ok(t) => t,
        Err(e) => {
            print_error(&format!("Failed to list tunnels: {}", e));
            return Err(e.into());
        }
    };

    let shown: Vec<&Tunnel> = tunnels
        .iter()
        .filter(|t| proto.map(|p| t.proto() == p).unwrap_or(true))
        .collect();

    println!("{}", format_tunnels(&shown, long));

    Ok(())
}
