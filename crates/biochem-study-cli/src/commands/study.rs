use biochem_study_core::StudyApi;

use super::load_api;

pub fn practice() -> Result<(), Box<dyn std::error::Error>> {
    let (_, api) = load_api()?;
    let questions = api.fetch_practice_questions()?;
    println!("{}", serde_json::to_string_pretty(&questions)?);
    Ok(())
}

pub fn flashcards() -> Result<(), Box<dyn std::error::Error>> {
    let (_, api) = load_api()?;
    println!("{}", serde_json::to_string_pretty(&api.bank().flashcards)?);
    Ok(())
}
