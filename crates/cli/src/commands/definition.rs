// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Definition management: `template`, `group`, `delete`, `reload`

use anyhow::Result;
use clap::Args;
use vigil_core::{DefinitionRequest, EventFlags, Severity};

use crate::client::{Change, DaemonClient};
use crate::output::{self, OutputFormat};

#[derive(Args, Debug)]
pub struct TemplateArgs {
    /// Template name (unique across templates and groups)
    pub name: String,

    /// Existing code to modify; omit to create a new template
    #[arg(long)]
    pub code: Option<u32>,

    /// Severity name (normal, warning, minor, major, critical) or number 0-4
    #[arg(short, long, default_value = "normal", value_parser = parse_severity)]
    pub severity: Severity,

    /// Message template with %-macros
    #[arg(short, long, default_value = "")]
    pub message: String,

    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Append every occurrence to the event log
    #[arg(long)]
    pub log: bool,

    /// Keep the message template unexpanded
    #[arg(long)]
    pub no_expand: bool,
}

impl TemplateArgs {
    pub fn to_request(&self) -> DefinitionRequest {
        let mut flags = EventFlags::empty();
        if self.log {
            flags = flags | EventFlags::LOG;
        }
        if self.no_expand {
            flags = flags | EventFlags::NO_EXPAND;
        }
        DefinitionRequest::template(self.name.clone(), self.severity, self.message.clone())
            .with_code(self.code.unwrap_or(0))
            .with_description(self.description.clone())
            .with_flags(flags)
    }
}

#[derive(Args, Debug)]
pub struct GroupArgs {
    /// Group name (unique across templates and groups)
    pub name: String,

    /// Existing code to modify; omit to create a new group
    #[arg(long)]
    pub code: Option<u32>,

    /// Member codes (templates or other groups); replaces the whole list
    #[arg(short = 'm', long = "member")]
    pub members: Vec<u32>,

    #[arg(short, long, default_value = "")]
    pub description: String,
}

impl GroupArgs {
    pub fn to_request(&self) -> DefinitionRequest {
        DefinitionRequest::group(self.name.clone(), self.members.clone())
            .with_code(self.code.unwrap_or(0))
            .with_description(self.description.clone())
    }
}

pub(crate) fn parse_severity(s: &str) -> Result<Severity, String> {
    if let Some(severity) = Severity::from_name(s) {
        return Ok(severity);
    }
    s.parse::<i32>()
        .ok()
        .and_then(|n| Severity::try_from(n).ok())
        .ok_or_else(|| format!("unknown severity `{s}`"))
}

pub async fn upsert(
    client: &DaemonClient,
    request: DefinitionRequest,
    format: OutputFormat,
) -> Result<()> {
    let change = client.upsert(request).await?;
    let verb = if change.old.is_some() {
        "Modified"
    } else {
        "Created"
    };
    print_change(&change, verb, format);
    Ok(())
}

pub async fn delete(client: &DaemonClient, code: u32, format: OutputFormat) -> Result<()> {
    let change = client.delete(code).await?;
    print_change(&change, "Deleted", format);
    Ok(())
}

pub async fn reload(client: &DaemonClient, format: OutputFormat) -> Result<()> {
    let count = client.reload().await?;
    output::print_value(
        &serde_json::json!({ "definitions": count }),
        &format!("Reloaded {} definitions", count),
        format,
    );
    Ok(())
}

fn print_change(change: &Change, verb: &str, format: OutputFormat) {
    output::print_value(change, &format!("{} definition {}", verb, change.code), format);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_accepts_names_and_numbers() {
        assert_eq!(parse_severity("MAJOR"), Ok(Severity::Major));
        assert_eq!(parse_severity("minor"), Ok(Severity::Minor));
        assert_eq!(parse_severity("4"), Ok(Severity::Critical));
        assert!(parse_severity("7").is_err());
        assert!(parse_severity("loud").is_err());
    }

    #[test]
    fn template_flags_follow_switches() {
        let args = TemplateArgs {
            name: "LinkDown".to_string(),
            code: Some(1001),
            severity: Severity::Major,
            message: "Interface %1 is down".to_string(),
            description: String::new(),
            log: true,
            no_expand: false,
        };
        let request = args.to_request();
        assert_eq!(request.code, 1001);
        assert!(!request.is_group);
        assert!(request.flags.contains(EventFlags::LOG));
        assert!(!request.flags.contains(EventFlags::NO_EXPAND));
    }

    #[test]
    fn group_without_code_asks_for_allocation() {
        let args = GroupArgs {
            name: "Links".to_string(),
            code: None,
            members: vec![1001, 1002],
            description: String::new(),
        };
        let request = args.to_request();
        assert_eq!(request.code, 0);
        assert!(request.is_group);
        assert_eq!(request.members, vec![1001, 1002]);
    }
}
