use crate::context::AppContext;
use crate::output::Output;
use chrono::NaiveDate;
use color_eyre::Result;
use owo_colors::OwoColorize;

pub async fn run_annotate(date: Option<NaiveDate>, no_enrich: bool, output: &Output) -> Result<()> {
    let ctx = AppContext::load(!no_enrich, output)?;
    let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());

    let window = ctx.window();
    let broadcasts = window.day_broadcasts(date)?;
    if broadcasts.is_empty() {
        output.warn(format!(
            "No programs stored for {} (looked in {})",
            date,
            ctx.programs_dir().display()
        ));
        return Ok(());
    }

    let annotator = ctx.annotator();
    let annotated = annotator.annotate_all(&broadcasts).await;
    ctx.persist_enrichment(output);

    if output.is_human() {
        let hits = annotated.iter().filter(|a| a.is_annotated()).count();
        output.info(format!(
            "{}: {} broadcasts, {} with Oscar films",
            date,
            annotated.len(),
            hits
        ));
        for item in &annotated {
            let Some(oscar) = &item.oscar else {
                continue;
            };
            output.println(format!(
                "  {} {}  {}  {} ({}, {} wins / {} nominations)",
                item.broadcast.time.format("%H:%M"),
                item.broadcast.channel_name.bold(),
                item.broadcast.title,
                oscar.title_en,
                oscar.year.map_or_else(|| "—".to_string(), |y| y.to_string()),
                oscar.winner,
                oscar.nominee,
            ));
        }
    } else {
        output.json(&serde_json::to_value(&annotated)?);
    }

    Ok(())
}
