// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only commands: `list`, `recent`, `status`

use anyhow::Result;
use vigil_core::{Event, EventObject};

use crate::client::DaemonClient;
use crate::output::{self, OutputFormat};

pub async fn list(client: &DaemonClient, format: OutputFormat) -> Result<()> {
    let definitions = client.list_definitions().await?;
    output::print_list(
        &definitions,
        &format!("{:<12} {:<6} {:<32} DETAIL", "CODE", "KIND", "NAME"),
        "No definitions",
        definition_line,
        format,
    );
    Ok(())
}

fn definition_line(object: &EventObject) -> String {
    match object {
        EventObject::Template(t) => format!(
            "{:<12} {:<6} {:<32} {} {}",
            t.code, "tmpl", t.name, t.severity, t.message
        ),
        EventObject::Group(g) => {
            let members: Vec<String> = g.members.iter().map(|m| m.to_string()).collect();
            format!(
                "{:<12} {:<6} {:<32} [{}]",
                format!("{:#010x}", g.code),
                "group",
                g.name,
                members.join(", ")
            )
        }
    }
}

pub async fn recent(client: &DaemonClient, source: u32, format: OutputFormat) -> Result<()> {
    let events = client.recent_events(source).await?;
    output::print_list(
        &events,
        &format!("{:<10} {:<20} {:<9} MESSAGE", "ID", "TIME", "SEVERITY"),
        &format!("No recent events for source {}", source),
        event_line,
        format,
    );
    Ok(())
}

fn event_line(event: &Event) -> String {
    format!(
        "{:<10} {:<20} {:<9} {}",
        event.id(),
        event.timestamp().format("%Y-%m-%d %H:%M:%S"),
        event.severity(),
        event.message_text().unwrap_or_default()
    )
}

pub async fn status(client: &DaemonClient, format: OutputFormat) -> Result<()> {
    let version = client.hello().await?;
    let status = client.status().await?;
    let text = format!(
        "vigild {}\n  uptime: {}s\n  definitions: {}\n  queued: {}\n  processed: {}",
        version, status.uptime_secs, status.definitions, status.queued, status.processed
    );
    output::print_value(&status, &text, format);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::{EventGroup, EventTemplate, Severity};

    #[test]
    fn group_lines_show_hex_code_and_members() {
        let group = EventGroup::new(0x8000_0001, "Links", vec![1001, 1002]);
        let line = definition_line(&group.into());
        assert!(line.starts_with("0x80000001"));
        assert!(line.contains("[1001, 1002]"));
    }

    #[test]
    fn template_lines_show_severity_and_message() {
        let template = EventTemplate::new(1001, "LinkDown", Severity::Major)
            .with_message("Interface %1 is down");
        let line = definition_line(&template.into());
        assert!(line.starts_with("1001"));
        assert!(line.contains("MAJOR"));
        assert!(line.contains("Interface %1 is down"));
    }
}
