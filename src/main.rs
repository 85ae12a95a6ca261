//! wedding-wishes server binary.
//!
//! Configuration comes from an optional TOML file named by `APP_CONFIG`,
//! overridden by `APP_PORT`, `APP_NAME`, `SUPABASE_URL` and `SUPABASE_KEY`.

use wedding_wishes::config;
use wedding_wishes::lifecycle::startup;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_from_env()?;
    startup::run(config).await?;
    Ok(())
}
