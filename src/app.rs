//! Host-side state around a [`Session`]: task selection, title entry and the
//! status line. Turns [`HostCommand`]s into session commands.

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::warn;

use crate::core::RandomSource;
use crate::engine::{Command, Outcome, Session, TaskDraft};
use crate::input::{EntryKey, HostCommand};
use crate::term::ViewState;
use crate::types::{Task, TaskId};

const MAX_TITLE_CHARS: usize = 60;

pub struct App<R: RandomSource> {
    session: Session<R>,
    selected: Option<TaskId>,
    entry: Option<String>,
    status: Option<String>,
    profile_dirty: bool,
    quit: bool,
}

impl<R: RandomSource> App<R> {
    pub fn new(session: Session<R>) -> Self {
        let selected = session.recommended().map(|t| t.id);
        Self {
            session,
            selected,
            entry: None,
            status: None,
            profile_dirty: false,
            quit: false,
        }
    }

    pub fn session(&self) -> &Session<R> {
        &self.session
    }

    pub fn selected(&self) -> Option<TaskId> {
        self.selected
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// True while a task title is being typed
    pub fn is_entering(&self) -> bool {
        self.entry.is_some()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Returns true once after any change that should be saved.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.profile_dirty)
    }

    /// Frame contents for the renderer. `ranked` is `self.session().ranked()`.
    pub fn view_state<'a>(&'a self, ranked: &'a [(&'a Task, f64)]) -> ViewState<'a> {
        ViewState::from_session(&self.session, ranked)
            .with_selected(self.selected)
            .with_entry(self.entry.as_deref())
            .with_status(self.status.as_deref())
    }

    pub fn tick(&mut self) {
        self.run(Command::Tick);
    }

    pub fn handle(&mut self, command: HostCommand) {
        match command {
            HostCommand::Session(cmd) => {
                self.run(cmd);
            }
            HostCommand::SelectNext => self.move_selection(1),
            HostCommand::SelectPrev => self.move_selection(-1),
            HostCommand::ToggleSelected => {
                if let Some(id) = self.selected {
                    self.run(Command::ToggleTask(id));
                }
            }
            HostCommand::DeleteSelected => {
                if let Some(id) = self.selected {
                    let next = self.neighbour_of(id);
                    if self.run(Command::DeleteTask(id)).is_some() {
                        self.selected = next;
                        self.status = Some("task deleted".to_string());
                    }
                }
            }
            HostCommand::AdjustSelected(field, delta) => {
                let edited = self
                    .selected
                    .and_then(|id| self.session.task(id))
                    .map(|task| field.adjusted(task, delta));
                if let Some(task) = edited {
                    self.run(Command::EditTask(task));
                }
            }
            HostCommand::BeginNewTask => {
                self.entry = Some(String::new());
            }
            HostCommand::Quit => self.quit = true,
        }
    }

    pub fn handle_entry(&mut self, key: EntryKey) {
        let Some(text) = self.entry.as_mut() else {
            return;
        };
        match key {
            EntryKey::Char(c) => {
                if text.chars().count() < MAX_TITLE_CHARS {
                    text.push(c);
                }
            }
            EntryKey::Backspace => {
                text.pop();
            }
            EntryKey::Cancel => self.entry = None,
            EntryKey::Submit => {
                let title = self.entry.take().unwrap_or_default();
                let mut draft = TaskDraft::new(title.trim());
                draft.created_at = unix_millis();
                if let Some(Outcome::TaskAdded(id)) = self.run(Command::AddTask(draft)) {
                    self.selected = Some(id);
                    self.status = Some("task added".to_string());
                }
            }
        }
    }

    /// Apply a command, recording errors in the status line.
    fn run(&mut self, command: Command) -> Option<Outcome> {
        let touches = command.touches_profile();
        let inventory_before = *self.session.inventory();
        match self.session.apply(command) {
            Ok(outcome) => {
                if touches || *self.session.inventory() != inventory_before {
                    self.profile_dirty = true;
                }
                if let Outcome::Rewarded { granted, .. } = &outcome {
                    let kinds: Vec<&str> = granted.iter().map(|k| k.as_str()).collect();
                    self.status = Some(format!("task done: +{} ({})", granted.len(), kinds.join(" ")));
                } else if let Outcome::Reopened(_) = outcome {
                    self.status = Some("task reopened".to_string());
                }
                Some(outcome)
            }
            Err(err) => {
                warn!(code = err.code(), %err, "command rejected");
                self.status = Some(format!("{}: {err}", err.code()));
                None
            }
        }
    }

    fn move_selection(&mut self, step: isize) {
        let ids: Vec<TaskId> = self.session.ranked().iter().map(|(t, _)| t.id).collect();
        if ids.is_empty() {
            self.selected = None;
            return;
        }
        let len = ids.len() as isize;
        let next = match self.selected.and_then(|id| ids.iter().position(|&x| x == id)) {
            Some(pos) => (pos as isize + step).rem_euclid(len),
            None => 0,
        };
        self.selected = Some(ids[next as usize]);
    }

    /// Task shown after `id` in ranked order, or before it when `id` is last.
    fn neighbour_of(&self, id: TaskId) -> Option<TaskId> {
        let ids: Vec<TaskId> = self.session.ranked().iter().map(|(t, _)| t.id).collect();
        let pos = ids.iter().position(|&x| x == id)?;
        ids.get(pos + 1)
            .or_else(|| pos.checked_sub(1).and_then(|p| ids.get(p)))
            .copied()
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
