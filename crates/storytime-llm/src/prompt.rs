//! Story prompt construction.

use crate::types::ChatMessage;

/// System instructions sent ahead of every prompt.
pub const STORY_SYSTEM_PROMPT: &str = "You are a helpful assistant that writes short stories for children.
The story should:
- Be no more than 700 words.
- Read like a kids story book.
- Use very simple words that a child can understand.
- Be fun, engaging, and age-appropriate.
- Avoid scary or inappropriate content.
Respond only with the story text.";

/// Build the message list for a story request. The user prompt is passed through verbatim.
pub fn build_story_messages(prompt: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(STORY_SYSTEM_PROMPT),
        ChatMessage::user(prompt),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_story_messages() {
        let messages = build_story_messages("  a bunny who learns to fly ");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.contains("no more than 700 words"));
        assert_eq!(messages[1].role, "user");
        assert_eq!(messages[1].content, "  a bunny who learns to fly ");
    }
}
