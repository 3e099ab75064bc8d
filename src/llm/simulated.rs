use super::{GenerateRequest, GenerateResponse, Provider};

const DEFAULT_REPLY: &str = "I'm Ballie, your AI health assistant. I can provide personalized \
    health insights based on your blood sugar data and activity levels.";

/// Keyword groups checked in order; the first group with a hit answers.
const REPLIES: &[(&[&str], &str)] = &[
    (
        &["high", "spike"],
        "I noticed your blood sugar is higher than usual. Consider drinking water and going for \
         a short walk. Make sure your next meal is balanced with protein and fiber.",
    ),
    (
        &["low"],
        "Your blood sugar seems to be running low. Consider having a small snack with about 15g \
         of carbs, like a piece of fruit or a small glass of juice.",
    ),
    (
        &["breakfast", "morning"],
        "I noticed your breakfast had more carbs than usual (52g vs. your avg 35g). Also, you \
         took your insulin just 5 mins before eating rather than the recommended 15-20 mins. Try \
         giving insulin more time to work before eating tomorrow.",
    ),
    (
        &["exercise", "walk", "activity"],
        "Based on your data, moderate exercise helps lower your blood sugar by about 15 mg/dL. I \
         recommend 20-30 minutes of walking after meals when possible.",
    ),
    (
        &["medication", "insulin", "medicine"],
        "I see you've been consistent with your medication this week. Great job! Maintaining \
         this routine is crucial for stable blood sugar levels.",
    ),
    (
        &["diet", "food", "eat"],
        "Your diet patterns show lower glucose spikes when you eat meals with protein and fat \
         alongside carbs. Consider adding nuts, eggs, or avocado to your breakfast.",
    ),
];

/// Offline responder that answers from canned replies. Useful for demos and
/// for running the dashboard without any model credentials.
pub struct SimulatedProvider;

/// Matches against the user's question only; the enriched prompt mentions
/// every keyword through the reference text.
pub fn reply_for(question: &str) -> &'static str {
    let question = question.to_lowercase();
    REPLIES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| question.contains(k)))
        .map(|(_, reply)| *reply)
        .unwrap_or(DEFAULT_REPLY)
}

/// The prompt ends with the user's question after this marker.
pub const QUESTION_MARKER: &str = "User question:";

fn extract_question(prompt: &str) -> &str {
    prompt
        .rsplit_once(QUESTION_MARKER)
        .map(|(_, q)| q.trim())
        .unwrap_or(prompt)
}

#[async_trait::async_trait]
impl Provider for SimulatedProvider {
    async fn generate(&self, req: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        let content = reply_for(extract_question(&req.prompt)).to_string();

        Ok(GenerateResponse {
            content,
            model: "simulated-keyword".to_string(),
            input_tokens: 0,
            output_tokens: 0,
            finish_reason: "stop".to_string(),
            provider: String::new(),
        })
    }

    fn name(&self) -> &str {
        "simulated"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_priority() {
        assert!(reply_for("Why is my blood sugar high?").contains("higher than usual"));
        // "high" wins over "low" because it is checked first
        assert!(reply_for("high or low?").contains("higher than usual"));
        assert!(reply_for("I feel LOW").contains("running low"));
        assert!(reply_for("what about my morning numbers").contains("breakfast"));
        assert!(reply_for("should I walk more").contains("moderate exercise"));
        assert!(reply_for("did I take my insulin").contains("consistent with your medication"));
        assert!(reply_for("what food is good").contains("protein and fat"));
        assert_eq!(reply_for("hello there"), DEFAULT_REPLY);
    }

    #[tokio::test]
    async fn test_generate_uses_question_only() {
        let req = GenerateRequest {
            model: "any".to_string(),
            system: String::new(),
            prompt: format!(
                "Reference: low blood sugar is below 70 mg/dL.\n\n{QUESTION_MARKER} hello"
            ),
            temperature: 0.0,
            max_tokens: 10,
        };
        let resp = SimulatedProvider.generate(&req).await.unwrap();
        assert_eq!(resp.content, DEFAULT_REPLY);
        assert_eq!(resp.finish_reason, "stop");
    }
}
