use crate::context::AppContext;
use crate::output::Output;
use crate::CatalogCommands;
use color_eyre::Result;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Table};
use tv_annotate_core::normalize;
use tv_annotate_models::CatalogEntry;

pub async fn run_catalog(cmd: CatalogCommands, output: &Output) -> Result<()> {
    // Catalog browsing never needs the enrichment client
    let ctx = AppContext::load(false, output)?;

    match cmd {
        CatalogCommands::List => {
            let entries = ctx.catalog.all();
            if output.is_human() {
                output.info(format!("{} films in the Oscar catalog", entries.len()));
                output.println(render_table(entries.iter()).to_string());
            } else {
                output.json(&serde_json::to_value(entries)?);
            }
        }
        CatalogCommands::Lookup { title } => {
            let key = normalize(&title);
            let entries = ctx.catalog.lookup(&key);
            if output.is_human() {
                if entries.is_empty() {
                    output.warn(format!("No catalog entry matches {:?}", title));
                    return Ok(());
                }
                if entries.len() > 1 {
                    output.info(format!(
                        "{} entries share this title; a broadcast needs a year in its description to match",
                        entries.len()
                    ));
                }
                output.println(render_table(entries.iter().copied()).to_string());
            } else {
                output.json(&serde_json::to_value(&entries)?);
            }
        }
    }

    Ok(())
}

fn render_table<'a>(entries: impl Iterator<Item = &'a CatalogEntry>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Title", "Localized", "Year", "Wins", "Nominations"]);
    for entry in entries {
        table.add_row(vec![
            entry.title_en.clone(),
            entry.title_bg.clone().unwrap_or_default(),
            entry.year.map_or_else(String::new, |y| y.to_string()),
            entry.winner_count().to_string(),
            entry.nominee_count().to_string(),
        ]);
    }
    table
}
