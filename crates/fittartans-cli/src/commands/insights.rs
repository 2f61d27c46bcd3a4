use clap::Subcommand;
use fittartans_core::{compute_insights, Config};

use super::{print_json, InputArgs};

#[derive(Subcommand)]
pub enum InsightsAction {
    /// Weekly distribution, balance and hints for the merged timeline
    Show {
        #[command(flatten)]
        input: InputArgs,
    },
}

pub fn run(action: InsightsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    match action {
        InsightsAction::Show { input } => {
            let report = input.pipeline(&config).combine(&input.load()?);
            print_json(&compute_insights(&report.merged, config.timezone))?;
        }
    }
    Ok(())
}
