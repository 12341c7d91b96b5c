use anyhow::Result;

use crate::api;
use crate::core::{AppConfig, Variant};

pub async fn run(host: String, port: String, variant: Option<Variant>) -> Result<()> {
    let config = AppConfig::load(variant)?;
    api::serve(host, port, config).await
}
