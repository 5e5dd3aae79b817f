//! Key mapping from terminal events to host commands.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::engine::{Command, TaskField};
use crate::types::GameAction;

/// What a key press asks the host to do.
///
/// Game keys map straight to session [`Command`]s. Task keys act on the
/// task the host currently has selected, so the host resolves them.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    Session(Command),
    SelectPrev,
    SelectNext,
    ToggleSelected,
    DeleteSelected,
    AdjustSelected(TaskField, i8),
    /// Start typing the title of a new task
    BeginNewTask,
    Quit,
}

/// Keys while a task title is being typed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKey {
    Char(char),
    Backspace,
    Submit,
    Cancel,
}

/// Map keyboard input in play mode.
pub fn handle_key_event(key: KeyEvent) -> Option<HostCommand> {
    if should_quit(key) {
        return Some(HostCommand::Quit);
    }

    let action = |a| Some(HostCommand::Session(Command::Action(a)));
    match key.code {
        // Piece
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('a') => action(GameAction::MoveLeft),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('d') => action(GameAction::MoveRight),
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('w') => action(GameAction::Rotate),
        KeyCode::Char(' ') => action(GameAction::HardDrop),

        // Session
        KeyCode::Char('p') | KeyCode::Char('P') => Some(HostCommand::Session(Command::TogglePause)),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(HostCommand::Session(Command::Restart)),

        // Tasks
        KeyCode::Tab | KeyCode::Char('j') | KeyCode::Down => Some(HostCommand::SelectNext),
        KeyCode::BackTab => Some(HostCommand::SelectPrev),
        KeyCode::Enter => Some(HostCommand::ToggleSelected),
        KeyCode::Delete | KeyCode::Char('x') => Some(HostCommand::DeleteSelected),
        KeyCode::Char('n') => Some(HostCommand::BeginNewTask),
        KeyCode::Char('+') => Some(HostCommand::AdjustSelected(TaskField::Impact, 1)),
        KeyCode::Char('-') => Some(HostCommand::AdjustSelected(TaskField::Impact, -1)),
        KeyCode::Char('>') => Some(HostCommand::AdjustSelected(TaskField::Urgency, 1)),
        KeyCode::Char('<') => Some(HostCommand::AdjustSelected(TaskField::Urgency, -1)),
        KeyCode::Char('E') => Some(HostCommand::AdjustSelected(TaskField::Effort, 1)),
        KeyCode::Char('e') => Some(HostCommand::AdjustSelected(TaskField::Effort, -1)),

        _ => None,
    }
}

/// Map keyboard input while a title is being typed.
pub fn handle_entry_key(key: KeyEvent) -> Option<EntryKey> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return (key.code == KeyCode::Char('c')).then_some(EntryKey::Cancel);
    }
    match key.code {
        KeyCode::Enter => Some(EntryKey::Submit),
        KeyCode::Esc => Some(EntryKey::Cancel),
        KeyCode::Backspace => Some(EntryKey::Backspace),
        KeyCode::Char(c) if !c.is_control() => Some(EntryKey::Char(c)),
        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(a: GameAction) -> Option<HostCommand> {
        Some(HostCommand::Session(Command::Action(a)))
    }

    #[test]
    fn test_movement_keys() {
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Left)), game(GameAction::MoveLeft));
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Right)), game(GameAction::MoveRight));
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char('h'))), game(GameAction::MoveLeft));
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char('d'))), game(GameAction::MoveRight));
    }

    #[test]
    fn test_rotation_and_drop_keys() {
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Up)), game(GameAction::Rotate));
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char('w'))), game(GameAction::Rotate));
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char(' '))), game(GameAction::HardDrop));
    }

    #[test]
    fn test_session_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('p'))),
            Some(HostCommand::Session(Command::TogglePause))
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('R'))),
            Some(HostCommand::Session(Command::Restart))
        );
    }

    #[test]
    fn test_task_keys() {
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Tab)), Some(HostCommand::SelectNext));
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::BackTab)), Some(HostCommand::SelectPrev));
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Enter)), Some(HostCommand::ToggleSelected));
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char('x'))), Some(HostCommand::DeleteSelected));
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char('n'))), Some(HostCommand::BeginNewTask));
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('<'))),
            Some(HostCommand::AdjustSelected(TaskField::Urgency, -1))
        );
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char('?'))), None);
    }

    #[test]
    fn test_entry_keys() {
        assert_eq!(handle_entry_key(KeyEvent::from(KeyCode::Char('q'))), Some(EntryKey::Char('q')));
        assert_eq!(handle_entry_key(KeyEvent::from(KeyCode::Enter)), Some(EntryKey::Submit));
        assert_eq!(handle_entry_key(KeyEvent::from(KeyCode::Esc)), Some(EntryKey::Cancel));
        assert_eq!(handle_entry_key(KeyEvent::from(KeyCode::Backspace)), Some(EntryKey::Backspace));
        assert_eq!(
            handle_entry_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(EntryKey::Cancel)
        );
        assert_eq!(handle_entry_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL)), None);
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('x'))));
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Esc)), Some(HostCommand::Quit));
    }
}
