mod cmd;
pub mod conf;
pub mod error;
pub mod pkg;
mod prelude;
pub mod token;

use tracing_subscriber::{EnvFilter, fmt};

use crate::prelude::Result;

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    cmd::run().await?;
    Ok(())
}
