//! Any command implementation

use anyhow::Result;

use ngrok_api::Session;

use crate::output::print_error;

/// Print a randomly chosen tunnel with the given protocol
pub async fn any_command(session: &Session, proto: &str) -> Result<()> {
    let tunnels = match session.get_tunnels().await {
        Ok(t) => t,
        Err(e) => {
            print_error(&format!("Failed to list tunnels: {}", e));
            return Err(e.into());
        }
    };

    match tunnels.any_tunnel(proto) {
        Ok(tunnel) => {
            println!("{}", tunnel);
            Ok(())
        }
        Err(e) => {
            print_error(&e.to_string());
            Err(e.into())
        }
    }
}
