use std::io::{IsTerminal, Write};
use std::path::Path;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use msgrelay_codec::Message;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct MessageOutput<'a> {
    source: String,
    encoded_size: usize,
    message: &'a Message,
}

/// Print a decoded output-file record.
pub fn print_message(message: &Message, source: &Path, encoded_size: usize, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = MessageOutput {
                source: source.display().to_string(),
                encoded_size,
                message,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ID", "SENDER ID", "SENDER", "SIZE", "CONTENT"])
                .add_row(vec![
                    message.id.to_string(),
                    message.sender.id.to_string(),
                    message.sender.name.clone(),
                    encoded_size.to_string(),
                    message.content.clone(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "id={} sender={} ({}) size={} content={:?}",
                message.id, message.sender.id, message.sender.name, encoded_size, message.content
            );
        }
    }
}

/// Echo a relayed payload exactly as received, newline-terminated.
pub fn print_payload(data: &[u8]) {
    let mut out = std::io::stdout().lock();
    let _ = out.write_all(data);
    let _ = out.write_all(b"\n");
    let _ = out.flush();
}
