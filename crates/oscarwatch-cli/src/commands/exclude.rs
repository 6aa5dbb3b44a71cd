use crate::output::Output;
use crate::{ExcludeCommands, ScopeArg};
use chrono::{NaiveDate, NaiveTime};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Table};
use dialoguer::Confirm;
use std::sync::Arc;
use tv_annotate_config::PathManager;
use tv_annotate_core::{ExclusionStore, FsDocumentStore, Removal};
use tv_annotate_models::{timefmt, ExclusionRule, ExclusionScope};

pub async fn run_exclude(cmd: ExcludeCommands, output: &Output) -> Result<()> {
    // Exclusion administration needs no catalog; open just the store
    let paths = PathManager::default();
    std::fs::create_dir_all(paths.data_dir())?;
    let store = ExclusionStore::open(
        Arc::new(FsDocumentStore::new(paths.data_dir())),
        "exclusions.json",
    )?;

    match cmd {
        ExcludeCommands::Add {
            title,
            scope,
            channel,
            date,
            time,
            note,
        } => {
            let mut rule = build_rule(title, scope, channel, date, time)?;
            if let Some(note) = note {
                rule = rule.with_description(note);
            }
            store.add(rule.clone())?;
            output.success(format!(
                "Excluded {:?} at {} scope",
                rule.title,
                scope_name(scope)
            ));
        }
        ExcludeCommands::Remove {
            title,
            scope,
            channel,
            date,
            time,
            yes,
        } => {
            let rule = build_rule(title, scope, channel, date, time)?;
            if !yes && output.is_human() {
                let confirmed = Confirm::new()
                    .with_prompt(format!(
                        "Remove {} exclusion for {:?}?",
                        scope_name(scope),
                        rule.title
                    ))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    output.info("Aborted");
                    return Ok(());
                }
            }
            match store.remove(&rule)? {
                Removal::Removed => {
                    output.success(format!("Removed exclusion for {:?}", rule.title))
                }
                Removal::NotFound => {
                    output.warn(format!("No matching exclusion rule for {:?}", rule.title))
                }
            }
        }
        ExcludeCommands::List => {
            let rules = store.list();
            if output.is_human() {
                if rules.is_empty() {
                    output.info("No exclusion rules");
                    return Ok(());
                }
                let mut table = Table::new();
                table.load_preset(UTF8_FULL_CONDENSED);
                table.set_header(vec!["Title", "Scope", "Channel", "Date", "Time", "Note"]);
                for rule in &rules {
                    table.add_row(vec![
                        rule.title.clone(),
                        scope_label(rule.scope).to_string(),
                        rule.channel_id.clone().unwrap_or_default(),
                        rule.date.map_or_else(String::new, |d| d.to_string()),
                        rule.time
                            .map_or_else(String::new, |t| t.format("%H:%M").to_string()),
                        rule.description.clone().unwrap_or_default(),
                    ]);
                }
                output.println(table.to_string());
            } else {
                output.json(&serde_json::to_value(&rules)?);
            }
        }
    }

    Ok(())
}

fn build_rule(
    title: String,
    scope: ScopeArg,
    channel: Option<String>,
    date: Option<NaiveDate>,
    time: Option<String>,
) -> Result<ExclusionRule> {
    let time = match time {
        Some(raw) => Some(parse_time(&raw)?),
        None => None,
    };
    match scope {
        ScopeArg::Global => Ok(ExclusionRule::global(title)),
        ScopeArg::Channel => {
            let channel = channel.ok_or_else(|| eyre!("channel scope requires --channel"))?;
            Ok(ExclusionRule::channel(title, channel))
        }
        ScopeArg::Broadcast => {
            let channel = channel.ok_or_else(|| eyre!("broadcast scope requires --channel"))?;
            let date = date.ok_or_else(|| eyre!("broadcast scope requires --date"))?;
            let time = time.ok_or_else(|| eyre!("broadcast scope requires --time"))?;
            Ok(ExclusionRule::broadcast(title, channel, date, time))
        }
    }
}

fn parse_time(raw: &str) -> Result<NaiveTime> {
    timefmt::parse(raw).ok_or_else(|| eyre!("Invalid time {:?}, expected HH:MM", raw))
}

fn scope_name(scope: ScopeArg) -> &'static str {
    match scope {
        ScopeArg::Broadcast => "broadcast",
        ScopeArg::Channel => "channel",
        ScopeArg::Global => "global",
    }
}

fn scope_label(scope: ExclusionScope) -> &'static str {
    match scope {
        ExclusionScope::Broadcast => "broadcast",
        ExclusionScope::Channel => "channel",
        ExclusionScope::Global => "global",
    }
}
