use super::reference::MEDICAL_REFERENCE;
use crate::llm::simulated::QUESTION_MARKER;

pub const SYSTEM_INSTRUCTION: &str = "You are Ballie, a friendly diabetes management assistant \
    built into a personal health dashboard. Use the reference notes and the patient's current \
    data to answer the question. Be specific about the patient's numbers, keep the answer to \
    3-5 sentences, and avoid markdown. You are not a doctor: for medication dose changes, \
    severe symptoms or emergencies, tell the patient to contact their healthcare provider.";

/// Reference text, then the context block, then the question, in that order.
pub fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "{MEDICAL_REFERENCE}\n\
        Patient's current health data:\n\
        {context}\n\
        {QUESTION_MARKER} {question}"
    )
}
