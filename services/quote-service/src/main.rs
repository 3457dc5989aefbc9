use anyhow::Result;
use grooming_quote_service::{create_app, AppState, SmtpClient};
use grooming_utils::{init_logging, AppConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration ({}), using defaults", e);
        AppConfig::default()
    });

    init_logging(&config.logging)?;
    info!("Starting The Grooming Spot quote service");

    let email = &config.email;
    if email.credentials().is_none() || email.sender_mailbox().is_err() || email.recipient().is_err() {
        warn!(
            smtp_host = %email.smtp_host,
            "Email settings are incomplete; appointment requests will fail until they are configured"
        );
    }

    let mailer = Arc::new(SmtpClient::new(config.email.clone()));
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let app = create_app(AppState::new(config, mailer));

    let listener = TcpListener::bind(&addr).await?;
    info!("Quote service listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
