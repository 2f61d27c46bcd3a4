pub mod config;
pub mod insights;
pub mod recommend;
pub mod timeline;

use chrono::{DateTime, Utc};
use clap::Args;
use fittartans_core::{Config, Pipeline, SourceInputs};
use std::io::Read;
use std::path::PathBuf;

/// Arguments shared by every command that reads source records.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// JSON file with `calendar`, `eventbrite` and `groupx` record lists ("-" for stdin)
    #[arg(short, long)]
    pub input: PathBuf,
    /// Treat this RFC 3339 instant as the current time; earlier events are dropped
    #[arg(long, value_parser = parse_now)]
    pub now: Option<DateTime<Utc>>,
}

impl InputArgs {
    pub fn load(&self) -> Result<SourceInputs, Box<dyn std::error::Error>> {
        let content = if self.input.as_os_str() == "-" {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        } else {
            std::fs::read_to_string(&self.input)
                .map_err(|e| format!("cannot read {}: {e}", self.input.display()))?
        };
        Ok(serde_json::from_str(&content)?)
    }

    pub fn pipeline(&self, config: &Config) -> Pipeline {
        Pipeline::new(config.pipeline_options(self.now))
    }
}

fn parse_now(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {e}"))
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Write `content` to `output`, or stdout when no path is given.
pub fn write_output(output: Option<&PathBuf>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => {
            std::fs::write(path, content)?;
            eprintln!("wrote {}", path.display());
        }
        None => print!("{content}"),
    }
    Ok(())
}
