//! Time command implementation.

use anyhow::Result;
use klines_lib::prelude::*;
use klines_lib::time::format_ms;

/// Print the exchange server time and its offset from the local clock.
pub(crate) async fn server_time(base_url: Option<String>) -> Result<()> {
    let mut config = ClientConfig::default();
    if let Some(base_url) = base_url {
        config = config.with_base_url(base_url);
    }
    let client = KlinesClient::new(config)?;

    let server = client.server_time().await?;
    let local = chrono::Utc::now().timestamp_millis();

    println!("Server time: {} ({server})", format_ms(server));
    println!("Offset:      {} ms", server - local);
    Ok(())
}
