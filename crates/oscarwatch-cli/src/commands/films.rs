use crate::context::AppContext;
use crate::output::Output;
use color_eyre::Result;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Table};
use indicatif::{ProgressBar, ProgressStyle};
use tv_annotate_models::GroupedFilm;

pub async fn run_films(days: Option<u32>, no_enrich: bool, output: &Output) -> Result<()> {
    let ctx = AppContext::load(!no_enrich, output)?;
    let days = days.unwrap_or(ctx.config.window.days);
    let today = chrono::Local::now().date_naive();

    let window = ctx.window();
    let broadcasts = window.collect(today, days);
    if broadcasts.is_empty() {
        output.warn(format!(
            "No programs stored in the last {} days (looked in {})",
            days,
            ctx.programs_dir().display()
        ));
        return Ok(());
    }

    let progress = if output.is_human() {
        let pb = ProgressBar::new(broadcasts.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("{spinner} annotating {pos}/{len} broadcasts")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Some(pb)
    } else {
        None
    };

    let annotator = ctx.annotator();
    let mut annotated = Vec::with_capacity(broadcasts.len());
    for broadcast in &broadcasts {
        annotated.push(annotator.annotate(broadcast).await);
        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    ctx.persist_enrichment(output);

    let films = tv_annotate_core::aggregate(&annotated);

    if output.is_human() {
        if films.is_empty() {
            output.info(format!("No Oscar films in the last {} days", days));
            return Ok(());
        }
        output.info(format!(
            "{} Oscar films across {} broadcasts in the last {} days",
            films.len(),
            broadcasts.len(),
            days
        ));
        output.println(render_table(&films).to_string());
    } else {
        output.json(&serde_json::to_value(&films)?);
    }

    Ok(())
}

fn render_table(films: &[GroupedFilm]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Film", "Year", "Oscars", "Airings", "Next/Last"]);
    for film in films {
        let name = match &film.title_en {
            Some(en) if *en != film.title => format!("{} ({})", film.title, en),
            _ => film.title.clone(),
        };
        let latest = film
            .broadcasts
            .first()
            .map(|r| format!("{} {} {}", r.date, r.time.format("%H:%M"), r.channel_name))
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(name),
            Cell::new(film.year.map_or_else(String::new, |y| y.to_string())),
            Cell::new(format!("{} wins / {} noms", film.winner, film.nominee)),
            Cell::new(film.broadcasts.len().to_string()),
            Cell::new(latest),
        ]);
    }
    table
}
