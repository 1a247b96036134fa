use anyhow::Result;
use std::path::Path;

use crate::ui;
use ytd_core::{Config, Session};

pub async fn run(url: &str, json: bool, config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;
    let session = Session::from_config(&config)?;

    let metadata = ui::with_spinner("Fetching video info...", session.resolve(url)).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
        return Ok(());
    }

    ui::print_summary(&metadata);
    ui::print_variant_table(&metadata);
    Ok(())
}
