//! Output formatting utilities for the CLI
//!
//! Tables for tunnel listings, a key/value block for a single tunnel, and
//! colored status messages.

use tabled::{settings::Style, Table, Tabled};

use ngrok_api::Tunnel;

/// Format tunnels as an ASCII table
///
/// The long form adds the API resource path of each tunnel. Returns
/// "No active tunnels" for an empty slice.
pub fn format_tunnels(tunnels: &[&Tunnel], long: bool) -> String {
    if tunnels.is_empty() {
        return "No active tunnels".to_string();
    }

    #[derive(Tabled)]
    struct TunnelRow {
        #[tabled(rename = "NAME")]
        name: String,
        #[tabled(rename = "PROTO")]
        proto: String,
        #[tabled(rename = "PUBLIC URL")]
        public_url: String,
    }

    #[derive(Tabled)]
    struct TunnelRowLong {
        #[tabled(rename = "NAME")]
        name: String,
        #[tabled(rename = "PROTO")]
        proto: String,
        #[tabled(rename = "PUBLIC URL")]
        public_url: String,
        #[tabled(rename = "URI")]
        uri: String,
    }

    if long {
        let rows: Vec<TunnelRowLong> = tunnels
            .iter()
            .map(|t| TunnelRowLong {
                name: t.name().to_string(),
                proto: t.proto().to_string(),
                public_url: t.public_url().to_string(),
                uri: t.uri().to_string(),
            })
            .collect();

        Table::new(rows).with(Style::rounded()).to_string()
    } else {
        let rows: Vec<TunnelRow> = tunnels
            .iter()
            .map(|t| TunnelRow {
                name: t.name().to_string(),
                proto: t.proto().to_string(),
                public_url: t.public_url().to_string(),
            })
            .collect();

        Table::new(rows).with(Style::rounded()).to_string()
    }
}

/// Format one tunnel as aligned key/value lines
pub fn format_tunnel(tunnel: &Tunnel) -> String {
    format!(
        "Name:       {}\nProto:      {}\nPublic URL: {}\nURI:        {}",
        tunnel.name(),
        tunnel.proto(),
        tunnel.public_url(),
        tunnel.uri()
    )
}

/// Print a success message in green with a checkmark prefix
pub fn print_success(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stdout = std::io::stdout();
    let _ = crossterm::execute!(
        stdout,
        SetForegroundColor(Color::Green),
        Print("✓ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print an error message in red with an X prefix
///
/// Goes to stderr.
pub fn print_error(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stderr = std::io::stderr();
    let _ = crossterm::execute!(
        stderr,
        SetForegroundColor(Color::Red),
        Print("✗ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print a warning message in yellow
pub fn print_warning(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stderr = std::io::stderr();
    let _ = crossterm::execute!(
        stderr,
        SetForegroundColor(Color::Yellow),
        Print("⚠ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}
