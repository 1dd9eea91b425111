use biochem_study_core::planner::{BandOverrides, DifficultyBand};
use biochem_study_core::{SessionFile, StudyApi};
use clap::Subcommand;

use super::{load_api, parse_band_value};

#[derive(Subcommand)]
pub enum QuizAction {
    /// Request the next question and print the response as JSON
    Next {
        /// Topic id (repeatable)
        #[arg(long = "topic")]
        topics: Vec<String>,
        /// Focus area (repeatable)
        #[arg(long = "focus")]
        focus_areas: Vec<String>,
        /// Questions to plan for (defaults to planner.default_batch_size)
        #[arg(long)]
        batch: Option<i64>,
        /// Shuffle seed (defaults to the session seed)
        #[arg(long)]
        seed: Option<String>,
        /// Learner confidence in [0, 1] (defaults to planner.default_confidence)
        #[arg(long)]
        confidence: Option<f64>,
        /// Recent accuracy per band, e.g. core=0.4 (repeatable)
        #[arg(long = "performance", value_parser = parse_band_value)]
        performance: Vec<(DifficultyBand, f64)>,
        /// Difficulty mix override per band, e.g. advanced=0.5 (repeatable)
        #[arg(long = "mix", value_parser = parse_band_value)]
        mix: Vec<(DifficultyBand, f64)>,
    },
    /// Print the plan of the last request as JSON
    Plan,
    /// Forget the current session
    Reset,
}

fn overrides(pairs: Vec<(DifficultyBand, f64)>) -> Option<BandOverrides> {
    if pairs.is_empty() {
        None
    } else {
        Some(pairs.into_iter().collect())
    }
}

pub fn run(action: QuizAction) -> Result<(), Box<dyn std::error::Error>> {
    let session_file = SessionFile::default_location()?;

    match action {
        QuizAction::Next {
            topics,
            focus_areas,
            batch,
            seed,
            confidence,
            performance,
            mix,
        } => {
            let (config, api) = load_api()?;
            let mut session = session_file.load();

            let mut request = session.request();
            request.topic_ids = topics;
            request.focus_areas = focus_areas;
            request.batch_size = Some(batch.unwrap_or(config.planner.default_batch_size));
            if seed.is_some() {
                request.seed = seed;
            }
            request.learner_confidence =
                Some(confidence.unwrap_or(config.planner.default_confidence));
            request.recent_performance = overrides(performance);
            request.template_difficulty_mix = overrides(mix);

            let response = api.request_quiz_question(&request)?;
            session.apply_response(&response);
            session_file.save(&session)?;

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        QuizAction::Plan => {
            let session = session_file.load();
            match &session.last_plan {
                Some(plan) => println!("{}", serde_json::to_string_pretty(plan)?),
                None => println!("null"),
            }
        }
        QuizAction::Reset => {
            let mut session = session_file.load();
            session.reset();
            session_file.save(&session)?;
            println!("session reset");
        }
    }
    Ok(())
}
