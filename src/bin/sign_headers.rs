//! Prints the Wizzio authentication headers for one instant.
//!
//! Usage: `sign_headers ["YYYY-MM-DD HH:MM:SS.ffffff"]`
//!
//! Without an argument the current local time is used. Credentials come from
//! `WIZZIO_API_KEY` / `WIZZIO_API_SECRET` (a `.env` file is honoured).

use rust_wizzio_lead::config::Config;
use rust_wizzio_lead::models::MappedLead;
use rust_wizzio_lead::signing;
use std::env;

fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let credentials = config.credentials()?;

    let timestamp = env::args()
        .nth(1)
        .unwrap_or_else(signing::current_timestamp);
    let signed = signing::sign(&credentials, timestamp, MappedLead::new())?;

    println!("POST {}", config.push_lead_url());
    println!("Api-Key: {}", signed.api_key);
    println!("DateTime: {}", signed.timestamp);
    println!("Authorization: {}", signed.authorization_header);

    Ok(())
}
