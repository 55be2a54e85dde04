//! Trimming and blank checks applied at the command boundary

use thiserror::Error;

use super::models::CardDraft;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Deck title must not be blank")]
    EmptyTitle,

    #[error("Card question must not be blank")]
    EmptyQuestion,

    #[error("Card answer must not be blank")]
    EmptyAnswer,
}

fn trimmed(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Trim a deck title, rejecting blank input
pub fn deck_title(title: &str) -> Result<String, ValidationError> {
    trimmed(title).ok_or(ValidationError::EmptyTitle)
}

/// Trim both sides of a card; question is checked first
pub fn card_text(question: &str, answer: &str) -> Result<(String, String), ValidationError> {
    let question = trimmed(question).ok_or(ValidationError::EmptyQuestion)?;
    let answer = trimmed(answer).ok_or(ValidationError::EmptyAnswer)?;
    Ok((question, answer))
}

pub fn card_draft(draft: &CardDraft) -> Result<(String, String), ValidationError> {
    card_text(&draft.question, &draft.answer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_is_trimmed() {
        assert_eq!(deck_title("  Capitals  ").unwrap(), "Capitals");
    }

    #[test]
    fn test_blank_title_rejected() {
        assert_eq!(deck_title(""), Err(ValidationError::EmptyTitle));
        assert_eq!(deck_title(" \t\n "), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn test_card_text() {
        let (q, a) = card_text(" What is 2+2? ", "4\n").unwrap();
        assert_eq!(q, "What is 2+2?");
        assert_eq!(a, "4");
    }

    #[test]
    fn test_blank_card_sides_rejected() {
        assert_eq!(card_text("   ", "4"), Err(ValidationError::EmptyQuestion));
        assert_eq!(card_text("What is 2+2?", ""), Err(ValidationError::EmptyAnswer));
        // Both blank reports the question first
        assert_eq!(card_text("", ""), Err(ValidationError::EmptyQuestion));
    }
}
