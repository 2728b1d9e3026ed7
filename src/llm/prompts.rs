/// System prompt fixing the summarizer's role.
pub const SUMMARY_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that summarizes messages in one clear sentence.";

/// Build the deterministic user prompt for a message.
pub fn build_summary_prompt(message: &str) -> String {
    format!("Summarize this message in one clear sentence: {message}")
}
