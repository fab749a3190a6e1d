// orchestrator/src/prompts.rs

use expert_core::ChatMessage;

/// The persona prompt: the expert's instructions, then the question as asked.
pub fn get_persona_messages(system_prompt: &str, user_question: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(system_prompt),
        ChatMessage::user(user_question),
    ]
}
