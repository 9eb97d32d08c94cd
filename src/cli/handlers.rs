use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::cli::commands::{Cli, Commands, DumpArgs};
use crate::cli::output::{DumpEntryJson, StatsJson};
use crate::io::payload_io;
use crate::model::timestamp::format_clock_time;
use crate::timeline::{FilterKind, FilterState, Timeline, entry_summary};
use crate::util::unicode::sanitize_snippet;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let buffer = payload_io::load_payload(&cli.payload)?;
    let mut timeline = Timeline::new(buffer);

    match cli.command {
        None => Ok(()), // no subcommand → TUI, handled in main.rs
        Some(Commands::Stats) => cmd_stats(&timeline, cli.json),
        Some(Commands::Dump(args)) => cmd_dump(&mut timeline, &args, cli.json),
    }
}

// ---------------------------------------------------------------------------
// stats
// ---------------------------------------------------------------------------

fn cmd_stats(timeline: &Timeline, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for item in timeline.buffer() {
        *counts.entry(item.kind.label().to_string()).or_default() += 1;
    }
    let tags: IndexMap<String, Vec<String>> = timeline
        .tag_index()
        .iter()
        .map(|(k, vs)| (k.clone(), vs.iter().cloned().collect()))
        .collect();

    if json {
        let out = StatsJson {
            items: timeline.buffer().len(),
            timeline_entries: timeline.expanded().len(),
            counts,
            tags,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "buffer: {} items, {} timeline entries",
        timeline.buffer().len(),
        timeline.expanded().len()
    );
    for (kind, count) in &counts {
        println!("  {:<8} {}", kind, count);
    }
    if !tags.is_empty() {
        println!("tags:");
        for (key, values) in &tags {
            println!("  {}: {}", key, values.join(", "));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// dump
// ---------------------------------------------------------------------------

fn cmd_dump(
    timeline: &mut Timeline,
    args: &DumpArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = filter_from_args(args)?;
    timeline.refilter(filter);

    if json {
        let entries: Vec<DumpEntryJson> = (0..timeline.display().len())
            .filter_map(|pos| {
                let (entry, source) = timeline.item_at_display(pos)?;
                Some(DumpEntryJson {
                    position: pos,
                    original_index: entry.original_index,
                    kind: entry.kind.label(source).to_string(),
                    timestamp: format_clock_time(entry.timestamp_ms),
                    summary: sanitize_snippet(&entry_summary(entry, source)),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for line in dump_lines(timeline) {
        println!("{}", line);
    }
    Ok(())
}

/// Build the filter from `--kind` / `--tag KEY=VALUE` arguments.
fn filter_from_args(args: &DumpArgs) -> Result<FilterState, Box<dyn std::error::Error>> {
    let mut filter = FilterState::default();
    if !args.kinds.is_empty() {
        filter.active_kinds.clear();
        for name in &args.kinds {
            let kind = match name.as_str() {
                "event" => FilterKind::Event,
                "query" => FilterKind::Query,
                "prompt" => FilterKind::Prompt,
                "other" => FilterKind::Other,
                unknown => {
                    return Err(format!(
                        "unknown kind '{}' (expected event, query, prompt, or other)",
                        unknown
                    )
                    .into());
                }
            };
            filter.active_kinds.insert(kind);
        }
    }
    for spec in &args.tags {
        let Some((key, value)) = spec.split_once('=') else {
            return Err(format!("invalid tag filter '{}' (expected KEY=VALUE)", spec).into());
        };
        filter.toggle_tag_value(key, value);
    }
    Ok(filter)
}

/// The text rendering of the current display sequence, one line per entry.
fn dump_lines(timeline: &Timeline) -> Vec<String> {
    (0..timeline.display().len())
        .filter_map(|pos| {
            let (entry, source) = timeline.item_at_display(pos)?;
            let indent = if entry.kind == crate::timeline::DisplayKind::PromptCompletion {
                "  "
            } else {
                ""
            };
            Some(format!(
                "{:<5} {}  {:<17} {}{}",
                format!("#{}", pos),
                format_clock_time(entry.timestamp_ms),
                entry.kind.label(source),
                indent,
                sanitize_snippet(&entry_summary(entry, source)),
            ))
        })
        .collect()
}
