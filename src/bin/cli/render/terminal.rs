use memodash_lib::{Card, Deck, DeckSummary};

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const GREEN: &str = "\x1b[32m";
    pub const BLUE: &str = "\x1b[34m";
    pub const MAGENTA: &str = "\x1b[35m";
}

/// Wrap text in a color when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// One line per deck: count, title, creation date
pub fn render_deck_row(deck: &DeckSummary, use_color: bool) -> String {
    let count = paint(&format!("{:>4}", deck.card_count), Color::BLUE, use_color);
    let created = paint(
        &deck.created_at.format("%Y-%m-%d").to_string(),
        Color::DIM,
        use_color,
    );
    format!("{}  {}  {}", count, paint(&deck.title, Color::BOLD, use_color), created)
}

/// Numbered question/answer pair
pub fn render_card(index: usize, card: &Card, use_color: bool) -> String {
    format!(
        "{:>3}. {}\n     {}",
        index + 1,
        paint(&card.question, Color::BOLD, use_color),
        paint(&card.answer, Color::DIM, use_color),
    )
}

pub fn render_deck(deck: &Deck, use_color: bool) -> String {
    let mut lines = vec![
        paint(&deck.title, Color::BOLD, use_color),
        paint(
            &format!(
                "{} cards, created {}",
                deck.cards.len(),
                deck.created_at.format("%Y-%m-%d %H:%M")
            ),
            Color::DIM,
            use_color,
        ),
        String::new(),
    ];

    if deck.cards.is_empty() {
        lines.push("This deck is empty.".to_string());
    } else {
        lines.extend(
            deck.cards
                .iter()
                .enumerate()
                .map(|(i, card)| render_card(i, card, use_color)),
        );
    }

    lines.join("\n")
}

/// Text progress bar, e.g. `3 / 10 [######--------------]`
pub fn render_progress(current: usize, total: usize, width: usize) -> String {
    let filled = if total == 0 { 0 } else { current * width / total };
    format!(
        "{} / {} [{}{}]",
        current,
        total,
        "#".repeat(filled),
        "-".repeat(width.saturating_sub(filled))
    )
}
