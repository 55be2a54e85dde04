use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph, Wrap};

use super::quiz_state::QuizTuiState;

const CARD_HEIGHT: u16 = 12;

pub fn draw(f: &mut Frame, state: &QuizTuiState) {
    let size = f.area();

    // Header (title + progress), card area, status bar
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(CARD_HEIGHT),
            Constraint::Length(1),
        ])
        .split(size);

    draw_header(f, outer[0], state);
    if state.driver.session().is_finished() {
        draw_finished(f, outer[1], state);
    } else {
        draw_card(f, outer[1], state);
    }
    draw_status(f, outer[2], state);
}

fn draw_header(f: &mut Frame, area: Rect, state: &QuizTuiState) {
    let (current, total) = state.driver.session().progress();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let title = Paragraph::new(format!(" Quiz: {}   {} / {}", state.deck_title, current, total))
        .style(Style::default().add_modifier(Modifier::BOLD));
    f.render_widget(title, rows[0]);

    let ratio = if total == 0 {
        0.0
    } else {
        current as f64 / total as f64
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Blue))
        .ratio(ratio.clamp(0.0, 1.0))
        .label("");
    f.render_widget(gauge, rows[1]);
}

/// Shift `area` by the drag offset, clipped to `bounds`
fn displaced(area: Rect, bounds: Rect, (dx, dy): (i32, i32)) -> Rect {
    let max_x = i32::from(bounds.right().saturating_sub(area.width));
    let max_y = i32::from(bounds.bottom().saturating_sub(area.height));
    let x = (i32::from(area.x) + dx).clamp(i32::from(bounds.x), max_x.max(i32::from(bounds.x)));
    let y = (i32::from(area.y) + dy).clamp(i32::from(bounds.y), max_y.max(i32::from(bounds.y)));
    Rect::new(x as u16, y as u16, area.width, area.height)
}

fn draw_card(f: &mut Frame, area: Rect, state: &QuizTuiState) {
    let session = state.driver.session();
    let Some(card) = session.current_card() else {
        return;
    };

    let width = area.width.saturating_sub(8).max(20).min(area.width);
    let height = CARD_HEIGHT.min(area.height);
    let centered = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );
    let card_area = displaced(centered, area, state.offset_cells());

    let (label, text, color) = if session.is_revealed() {
        ("ANSWER", card.answer.as_str(), Color::Green)
    } else {
        ("QUESTION", card.question.as_str(), Color::Magenta)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .title(format!(" {} ", label))
        .title_alignment(Alignment::Center);

    let body = Paragraph::new(format!("\n\n{}", text))
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().add_modifier(Modifier::BOLD));
    f.render_widget(body, card_area);
}

fn draw_finished(f: &mut Frame, area: Rect, state: &QuizTuiState) {
    let total = state.driver.session().len();
    let text = format!("\n\nQuiz complete!\n\nYou went through all {} cards.", total);
    let done = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Green));
    f.render_widget(done, area);
}

fn draw_status(f: &mut Frame, area: Rect, state: &QuizTuiState) {
    let hints = if state.driver.session().is_finished() {
        " Press any key to exit "
    } else if state.show_help {
        " Space: flip  Left/Right: swipe flip  Up/Down: dismiss  n: next  drag card with mouse  q: quit "
    } else {
        " Space: flip  Up/Down: next card  ?: help  q: quit "
    };

    let status = Paragraph::new(hints).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(status, area);
}
