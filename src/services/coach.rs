use crate::models::chat::ChatMessage;
use crate::services::generation::{GenerationRequest, TextGenerator};

/// Sent instead of an error whenever the coach cannot answer.
pub const COACH_FALLBACK_REPLY: &str =
    "Sorry, I didn't quite manage to answer that. Could you try again?";

const COACH_PERSONA: &str = "You are a friendly, supportive and empathetic health coach. \
Your goal is to help the user navigate their health journey.
- Be encouraging and positive.
- Provide helpful, safe and general health and wellness advice.
- Never give a medical diagnosis or prescribe treatment. For medical issues, always advise the user to consult a doctor or another qualified professional.
- Keep your responses concise and easy to understand.
- Respond in the same language the user writes in.
- If the user asks for encouragement, give a warm and uplifting message.";

const REPLY_MAX_TOKENS: u32 = 1024;

pub async fn converse(generator: &dyn TextGenerator, history: &[ChatMessage], message: &str) -> String {
    let request = GenerationRequest {
        system: COACH_PERSONA.to_string(),
        history: history.to_vec(),
        prompt: message.to_string(),
        max_tokens: REPLY_MAX_TOKENS,
    };

    match generator.generate(request).await {
        Ok(reply) if !reply.trim().is_empty() => reply.trim().to_string(),
        Ok(_) => {
            tracing::warn!("Coach returned an empty reply, using fallback");
            COACH_FALLBACK_REPLY.to_string()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Coach generation failed, using fallback");
            COACH_FALLBACK_REPLY.to_string()
        }
    }
}
