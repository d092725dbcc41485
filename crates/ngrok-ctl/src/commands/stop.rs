//! Stop command implementation

use anyhow::Result;

use ngrok_api::Session;

use crate::output::{print_error, print_success};

/// Stop each named tunnel, continuing past failures
pub async fn stop_command(session: &Session, names: &[String]) -> Result<()> {
    let mut errors = Vec::new();

    for name in names {
        match session.stop_tunnel(name).await {
            Ok(()) => {
                print_success(&format!("Stopped tunnel: {}", name));
            }
            Err(e) => {
                print_error(&format!("Failed to stop tunnel {}: {}", name, e));
                errors.push((name.clone(), e));
            }
        }
    }

    if !errors.is_empty() {
        anyhow::bail!("Failed to stop {} tunnel(s)", errors.len());
    }

    Ok(())
}
