use clap::Subcommand;
use fittartans_core::export::to_ical;
use fittartans_core::{Config, WeeklyPlanner};
use std::path::PathBuf;

use super::{print_json, write_output, InputArgs};

#[derive(Subcommand)]
pub enum RecommendAction {
    /// Top-K classes that fit around the calendar
    List {
        #[command(flatten)]
        input: InputArgs,
        /// Override the configured number of results
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },
    /// Greedy weekly plan honoring the weekly cap and minimum gap
    Plan {
        #[command(flatten)]
        input: InputArgs,
        /// Write the plan as an .ics file instead of printing JSON
        #[arg(long)]
        ics: Option<PathBuf>,
    },
}

pub fn run(action: RecommendAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    match action {
        RecommendAction::List { input, top_k } => {
            let split = input.pipeline(&config).recommendation_inputs(&input.load()?);
            let mut scorer = config.scorer()?;
            if let Some(k) = top_k {
                scorer = scorer.with_top_k(k);
            }
            print_json(&scorer.recommend(&split.candidates, &split.timeline))?;
        }
        RecommendAction::Plan { input, ics } => {
            let split = input.pipeline(&config).recommendation_inputs(&input.load()?);
            let ranked = config.scorer()?.score_all(&split.candidates, &split.timeline);
            let plan = WeeklyPlanner::from_preference(&config.preferences, config.timezone).plan(&ranked);
            match ics {
                Some(path) => {
                    let events: Vec<_> = plan.into_iter().map(|r| r.event).collect();
                    write_output(Some(&path), &to_ical(&events))?;
                }
                None => print_json(&plan)?,
            }
        }
    }
    Ok(())
}
