//! The store: one document, its history and its observers
//!
//! All mutation goes through [`Store::dispatch`]. A batch is validated, applied
//! command by command, recorded as one undo step and only then announced to
//! observers. Observer callbacks run while the store is mutably borrowed, so
//! they cannot dispatch; follow-up commands have to be queued by the caller.

use super::canvas::CanvasState;
use super::command::{Command, validate};
use super::config::Config;
use super::document::Document;
use super::error::DispatchError;
use super::history::{Batch, History};
use super::observe::{ChangeLog, Field, Notification, Observers, SubscriptionHandle, Target};

#[derive(Debug)]
pub struct Store {
    document: Document,
    history: History,
    observers: Observers,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Store {
    /// Empty document sized and targeted from `config`
    pub fn new(config: &Config) -> Self {
        let canvas = CanvasState {
            width: config.canvas_width,
            height: config.canvas_height,
            database: config.database,
            ..CanvasState::default()
        };
        Self::with_document(Document::with_canvas(canvas), config)
    }

    /// Take ownership of a loaded document. Derived state (text widths,
    /// anchors and key markers) is recomputed once so every later state is
    /// consistent and undo can restore it exactly.
    pub fn with_document(mut document: Document, config: &Config) -> Self {
        let mut changes = ChangeLog::new();
        document.refresh_widths(&mut changes);
        document.refresh_column_keys(&mut changes);
        document.refresh_relationships(&mut changes);
        tracing::info!(
            tables = document.table_count(),
            relationships = document.relationship_count(),
            memos = document.memo_count(),
            "document loaded"
        );
        Self {
            document,
            history: History::new(config.history_limit),
            observers: Observers::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Apply a batch of commands as one undo step.
    ///
    /// Fails without touching the document when an add command reuses an id.
    /// `Undo`/`Redo` control commands split the batch and run in place.
    pub fn dispatch(
        &mut self,
        commands: impl IntoIterator<Item = Command>,
    ) -> Result<(), DispatchError> {
        let commands: Vec<Command> = commands.into_iter().collect();
        validate(&self.document, &commands)?;

        let mut batch = Vec::new();
        for command in commands {
            match command {
                Command::Undo => {
                    self.apply(std::mem::take(&mut batch));
                    self.undo();
                }
                Command::Redo => {
                    self.apply(std::mem::take(&mut batch));
                    self.redo();
                }
                command => batch.push(command),
            }
        }
        self.apply(batch);
        Ok(())
    }

    fn apply(&mut self, batch: Batch) {
        if batch.is_empty() {
            return;
        }
        let tracked = batch.iter().any(|command| !command.is_transient());
        let mut changes = ChangeLog::new();
        let inverse = self.run(&batch, &mut changes);
        if tracked {
            self.history.record(inverse);
        }
        self.observers.notify(changes);
    }

    /// Execute a batch, returning its inverse: the inverses of the recorded
    /// commands in reverse order
    fn run(&mut self, batch: &[Command], changes: &mut ChangeLog) -> Batch {
        let mut inverses = Vec::with_capacity(batch.len());
        for command in batch {
            let inverse = command.execute(&mut self.document, changes);
            if !command.is_transient() {
                inverses.push(inverse);
            }
        }
        inverses.into_iter().rev().flatten().collect()
    }

    /// Revert the most recent batch. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(batch) = self.history.pop_undo() else {
            return false;
        };
        let mut changes = ChangeLog::new();
        let redo = self.run(&batch, &mut changes);
        self.history.push_redo(redo);
        tracing::info!(
            undo = self.history.undo_len(),
            redo = self.history.redo_len(),
            "undo"
        );
        self.observers.notify(changes);
        true
    }

    /// Re-apply the most recently undone batch
    pub fn redo(&mut self) -> bool {
        let Some(batch) = self.history.pop_redo() else {
            return false;
        };
        let mut changes = ChangeLog::new();
        let undo = self.run(&batch, &mut changes);
        self.history.push_undo(undo);
        tracing::info!(
            undo = self.history.undo_len(),
            redo = self.history.redo_len(),
            "redo"
        );
        self.observers.notify(changes);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Call `callback` for every change of `target`
    pub fn observe(
        &mut self,
        target: Target,
        callback: impl FnMut(&Notification) + 'static,
    ) -> SubscriptionHandle {
        self.observers.observe(target, callback)
    }

    /// Call `callback` only when `field` of `target` changes
    pub fn observe_field(
        &mut self,
        target: Target,
        field: Field,
        callback: impl FnMut(&Notification) + 'static,
    ) -> SubscriptionHandle {
        self.observers.observe_field(target, field, callback)
    }

    pub fn unsubscribe(&mut self, handle: SubscriptionHandle) -> bool {
        self.observers.unsubscribe(handle)
    }
}
