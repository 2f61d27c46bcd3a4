use chrono::{Days, NaiveDate, Utc};
use clap::{Subcommand, ValueEnum};
use fittartans_core::export::to_ical;
use fittartans_core::timeline::DateRange;
use fittartans_core::{zone, Config, EventSource};
use std::path::PathBuf;

use super::{print_json, write_output, InputArgs};

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SourceArg {
    Calendar,
    Eventbrite,
    Groupx,
}

impl From<SourceArg> for EventSource {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Calendar => EventSource::Calendar,
            SourceArg::Eventbrite => EventSource::EventbriteClass,
            SourceArg::Groupx => EventSource::GroupXClass,
        }
    }
}

#[derive(Subcommand)]
pub enum TimelineAction {
    /// Normalize raw records without merging
    Normalize {
        #[command(flatten)]
        input: InputArgs,
        /// Only this source (default: all)
        #[arg(long, value_enum)]
        source: Option<SourceArg>,
    },
    /// Merge every source into one conflict-free timeline
    Combine {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Free intervals inside the active window, per day
    Free {
        #[command(flatten)]
        input: InputArgs,
        /// First day (YYYY-MM-DD, default: today)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day inclusive (default: six days after --from)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Export the merged timeline as iCalendar
    Export {
        #[command(flatten)]
        input: InputArgs,
        /// Output .ics file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// The days `free` reports on: `first` through `to`, or a full week.
fn free_range(first: NaiveDate, to: Option<NaiveDate>) -> Result<DateRange, Box<dyn std::error::Error>> {
    let last = match to {
        Some(last) => last,
        None => first
            .checked_add_days(Days::new(6))
            .ok_or_else(|| format!("--from {first} leaves no room for a week"))?,
    };
    Ok(DateRange::new(first, last)?)
}

pub fn run(action: TimelineAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    match action {
        TimelineAction::Normalize { input, source } => {
            let normalized = input.pipeline(&config).normalize_all(&input.load()?);
            match source {
                Some(source) => print_json(normalized.get(source.into()))?,
                None => print_json(&normalized)?,
            }
        }
        TimelineAction::Combine { input } => {
            let report = input.pipeline(&config).combine(&input.load()?);
            print_json(&report)?;
        }
        TimelineAction::Free { input, from, to } => {
            let report = input.pipeline(&config).combine(&input.load()?);
            let first = from.unwrap_or_else(|| zone::local_date(config.timezone, input.now.unwrap_or_else(Utc::now)));
            let range = free_range(first, to)?;
            let days = config.free_time_computer()?.availability(&report.merged, range);
            print_json(&days)?;
        }
        TimelineAction::Export { input, output } => {
            let report = input.pipeline(&config).combine(&input.load()?);
            write_output(output.as_ref(), &to_ical(&report.merged))?;
        }
    }
    Ok(())
}
