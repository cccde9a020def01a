// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print either a prepared text line or the value as JSON
pub fn print_value<T: Serialize>(value: &T, text: &str, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", text),
        OutputFormat::Json => print_json(value),
    }
}

/// Print a list of items, one text line each, or as a JSON array
pub fn print_list<T: Serialize>(
    items: &[T],
    header: &str,
    empty: &str,
    line: impl Fn(&T) -> String,
    format: OutputFormat,
) {
    match format {
        OutputFormat::Text if items.is_empty() => println!("{}", empty),
        OutputFormat::Text => {
            println!("{}", header);
            for item in items {
                println!("{}", line(item));
            }
        }
        OutputFormat::Json => print_json(&items),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    if let Ok(json) = serde_json::to_string_pretty(value) {
        println!("{}", json);
    }
}
