// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `vigil post <code> [-p name=value]...` - Post an event

use anyhow::Result;
use clap::Args;

use crate::client::DaemonClient;
use crate::output::{self, OutputFormat};

#[derive(Args, Debug)]
pub struct PostArgs {
    /// Event code (template only)
    pub code: u32,

    /// Source object id
    #[arg(short, long, default_value_t = 0)]
    pub source: u32,

    /// Data collection item id
    #[arg(long, default_value_t = 0)]
    pub dci: u32,

    /// Free-form user tag (at most 63 characters are kept)
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Named parameters (name=value), in order
    #[arg(short = 'p', long = "param", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,
}

pub(crate) fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid name=value: no `=` found in `{s}`"))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

pub async fn handle(client: &DaemonClient, args: PostArgs, format: OutputFormat) -> Result<()> {
    let event_id = client
        .post_event(args.code, args.source, args.dci, args.tag, args.params)
        .await?;

    output::print_value(
        &serde_json::json!({ "event_id": event_id }),
        &format!("Posted event {}", event_id),
        format,
    );
    Ok(())
}
