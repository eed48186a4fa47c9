//! Chat auto-naming from the first user message.
//!
//! A chat still carrying the configured default name is renamed exactly
//! once, when its first user-authored message arrives: the name becomes a
//! character-budget prefix of the prompt with an ellipsis marker appended
//! when truncation occurred. The budget counts characters, not bytes, so
//! truncation never splits a multi-byte sequence.

/// Marker appended when the prompt was longer than the budget.
pub const ELLIPSIS: &str = "...";

/// Derive a chat name from the first user prompt.
pub fn derive_chat_name(prompt: &str, max_chars: usize) -> String {
    let trimmed = prompt.trim();
    match trimmed.char_indices().nth(max_chars) {
        None => trimmed.to_string(),
        Some((idx, _)) => format!("{}{ELLIPSIS}", &trimmed[..idx]),
    }
}

/// Whether the chat should be auto-named by the message being appended.
///
/// True only when the name is still the default and no user message has
/// been stored before this one. A manual rename ends eligibility for good.
pub fn should_auto_name(chat_name: &str, default_name: &str, prior_user_messages: u32) -> bool {
    chat_name == default_name && prior_user_messages == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_prompt_truncated_with_ellipsis() {
        let prompt = "Explain quantum tunneling in detail please, including the math behind it";
        let name = derive_chat_name(prompt, 50);
        assert_eq!(name.chars().count(), 53);
        assert!(name.ends_with(ELLIPSIS));
        assert!(prompt.starts_with(name.trim_end_matches(ELLIPSIS)));
    }

    #[test]
    fn test_short_prompt_kept_whole() {
        let name = derive_chat_name("What is Rust?", 50);
        assert_eq!(name, "What is Rust?");
    }

    #[test]
    fn test_exact_budget_has_no_ellipsis() {
        let prompt = "x".repeat(50);
        let name = derive_chat_name(&prompt, 50);
        assert_eq!(name, prompt);
    }

    #[test]
    fn test_budget_counts_characters_not_bytes() {
        let prompt = "日本語のプロンプトです。とても長いので切り詰められます".repeat(3);
        let name = derive_chat_name(&prompt, 10);
        assert_eq!(name.chars().count(), 10 + ELLIPSIS.chars().count());
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        let name = derive_chat_name("  hello there  ", 50);
        assert_eq!(name, "hello there");
    }

    #[test]
    fn test_should_auto_name_only_first_default() {
        assert!(should_auto_name("New Chat", "New Chat", 0));
        assert!(!should_auto_name("New Chat", "New Chat", 1));
        assert!(!should_auto_name("Quantum tunneling...", "New Chat", 0));
    }
}
