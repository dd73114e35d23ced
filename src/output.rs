use crate::notify::SlackPayload;
use crate::types::ChannelTarget;
use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct PreviewEntry<'a> {
    target: String,
    payload: SlackPayload<'a>,
}

/// Render what a live run would post: one entry per configured target.
pub fn build_preview(summary: &str, channels: &[ChannelTarget]) -> Result<String> {
    let entries: Vec<PreviewEntry> = channels
        .iter()
        .map(|target| PreviewEntry {
            target: target.to_string(),
            payload: SlackPayload::new(summary, target),
        })
        .collect();
    serde_json::to_string_pretty(&entries).context("serializing dry-run preview")
}

pub fn print_dry_run(summary: &str, channels: &[ChannelTarget]) -> Result<()> {
    println!("--- Dry-run: summary that would be posted ---");
    println!("{}", summary);
    if channels.is_empty() {
        println!("(no Slack channels configured)");
        return Ok(());
    }
    println!("--- Payloads ---");
    println!("{}", build_preview(summary, channels)?);
    Ok(())
}
