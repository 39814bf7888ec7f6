use serde::Serialize;

use crate::models::daily_entry::DailyEntry;
use crate::services::compliance::{ComplianceLevel, ComplianceResult};
use crate::services::generation::{GenerationError, GenerationRequest, TextGenerator};

const COACH_INSTRUCTIONS: &str = "You are a supportive and encouraging health coach. \
Based on the user's daily summary and reported data, write a short, uplifting and personalized \
motivational message. First acknowledge something they achieved today, then connect it to how \
they reported feeling, then offer one gentle suggestion for tomorrow. \
Write no more than 50 words. Reply with the message only.";

const MESSAGE_MAX_TOKENS: u32 = 300;

/// Everything the coach needs to write today's message.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MotivationalMessageInput {
    pub daily_summary: String,
    pub mood: String,
    pub fatigue_level: i32,
    pub pain_level: i32,
    pub hydration_compliance: ComplianceLevel,
    pub diet_compliance: ComplianceLevel,
    pub activity_compliance: ComplianceLevel,
    pub relaxation_compliance: ComplianceLevel,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MotivationalMessage {
    pub message: String,
}

pub fn build_request(entry: &DailyEntry, compliance: &ComplianceResult) -> MotivationalMessageInput {
    MotivationalMessageInput {
        daily_summary: compliance.summary_text.clone(),
        mood: entry
            .mood
            .map(|m| m.as_str().to_string())
            .unwrap_or_default(),
        fatigue_level: entry.fatigue_level,
        pain_level: entry.pain_level,
        hydration_compliance: compliance.hydration_compliance,
        diet_compliance: compliance.diet_compliance,
        activity_compliance: compliance.activity_compliance,
        relaxation_compliance: compliance.relaxation_compliance,
    }
}

pub fn render_prompt(input: &MotivationalMessageInput) -> String {
    format!(
        "Here is the user's daily summary:\n{}\n\n\
         Here is the user's reported data:\n\
         Mood: {}\n\
         Fatigue Level: {}\n\
         Pain Level: {}\n\
         Hydration Compliance: {}\n\
         Diet Compliance: {}\n\
         Activity Compliance: {}\n\
         Relaxation Compliance: {}",
        input.daily_summary,
        input.mood,
        input.fatigue_level,
        input.pain_level,
        input.hydration_compliance,
        input.diet_compliance,
        input.activity_compliance,
        input.relaxation_compliance,
    )
}

/// Makes exactly one generation call and returns its text verbatim.
pub async fn request_message(
    generator: &dyn TextGenerator,
    input: &MotivationalMessageInput,
) -> Result<MotivationalMessage, GenerationError> {
    let text = generator
        .generate(GenerationRequest {
            system: COACH_INSTRUCTIONS.to_string(),
            history: Vec::new(),
            prompt: render_prompt(input),
            max_tokens: MESSAGE_MAX_TOKENS,
        })
        .await?;

    let message = text.trim();
    if message.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }

    Ok(MotivationalMessage {
        message: message.to_string(),
    })
}
