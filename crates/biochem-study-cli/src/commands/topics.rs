use biochem_study_core::planner::{select_topics, TopicSelection};
use clap::Args;
use serde::Serialize;

use super::load_api;

#[derive(Args)]
pub struct TopicsArgs {
    /// Requested topic id (repeatable)
    #[arg(long = "topic")]
    topics: Vec<String>,
    /// Focus area (repeatable)
    #[arg(long = "focus")]
    focus_areas: Vec<String>,
    /// Maximum topics to return (defaults to planner.topic_limit)
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(Serialize)]
struct TopicListing {
    limit: usize,
    topics: Vec<String>,
}

pub fn run(args: TopicsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (config, api) = load_api()?;
    let limit = args.limit.unwrap_or(config.planner.topic_limit);

    let topics = select_topics(&TopicSelection {
        modules: &api.bank().modules,
        requested_topics: &args.topics,
        focus_areas: &args.focus_areas,
        limit,
    });

    let listing = TopicListing { limit, topics };
    println!("{}", serde_json::to_string_pretty(&listing)?);
    Ok(())
}
