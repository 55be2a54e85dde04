use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};

use memodash_lib::quiz::QuizEvent;

use super::quiz_state::QuizTuiState;

pub fn handle_key(state: &mut QuizTuiState, key: KeyEvent) {
    if state.driver.session().is_finished() {
        // Any key leaves the summary screen
        state.quit = true;
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => state.quit = true,
        KeyCode::Char(' ') | KeyCode::Enter => {
            state.send(QuizEvent::ToggleReveal);
        }
        KeyCode::Char('h') | KeyCode::Left => {
            let swipe = state.key_swipe(-1.0, 0.0);
            state.send(QuizEvent::HorizontalSwipe(swipe));
        }
        KeyCode::Char('l') | KeyCode::Right => {
            let swipe = state.key_swipe(1.0, 0.0);
            state.send(QuizEvent::HorizontalSwipe(swipe));
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.send(QuizEvent::DismissUp);
        }
        KeyCode::Char('j') | KeyCode::Down => {
            state.send(QuizEvent::DismissDown);
        }
        KeyCode::Char('n') | KeyCode::Tab => {
            state.send(QuizEvent::Advance);
        }
        KeyCode::Char('?') => state.show_help = !state.show_help,
        _ => {}
    }
}

pub fn handle_mouse(state: &mut QuizTuiState, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            state.drag_origin = Some((mouse.column, mouse.row));
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if let Some(offset) = state.drag_offset(mouse.column, mouse.row) {
                state.send(QuizEvent::DragUpdate(offset));
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if let Some(offset) = state.drag_offset(mouse.column, mouse.row) {
                state.send(QuizEvent::DragSettle(offset));
            }
            state.drag_origin = None;
        }
        _ => {}
    }
}
