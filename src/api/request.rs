//! Request types for the chat endpoint.

use serde::{Deserialize, Serialize};

/// Phrases that start a consolidation when found in a chat message.
pub const TRIGGER_PHRASES: [&str; 6] = [
    "consolidado",
    "gerar excel",
    "planilha final",
    "vr consolidado",
    "gerar planilha",
    "consolidate",
];

/// Request body for `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Free text from the user.
    pub message: String,
}

/// Returns true if the message asks for a consolidation.
///
/// # Example
///
/// ```
/// use benefit_engine::api::is_consolidation_request;
///
/// assert!(is_consolidation_request("Quero a PLANILHA FINAL de maio"));
/// assert!(!is_consolidation_request("Quantos dias úteis tem o RJ?"));
/// ```
pub fn is_consolidation_request(message: &str) -> bool {
    let lowered = message.to_lowercase();
    TRIGGER_PHRASES.iter().any(|phrase| lowered.contains(phrase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_trigger_phrase_matches() {
        for phrase in TRIGGER_PHRASES {
            assert!(is_consolidation_request(&format!("por favor, {} agora", phrase)));
        }
    }

    #[test]
    fn test_trigger_is_case_insensitive() {
        assert!(is_consolidation_request("Gerar Excel"));
        assert!(is_consolidation_request("CONSOLIDATE"));
    }

    #[test]
    fn test_plain_question_is_pass_through() {
        assert!(!is_consolidation_request("qual o valor diário em SP?"));
        assert!(!is_consolidation_request(""));
    }
}
