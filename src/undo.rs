//! Undo/Redo system for layer and element operations.
//!
//! This module implements the Command pattern to enable undo/redo functionality.
//! Each mutation of the layer store is recorded as a [`Command`] carrying exactly
//! the data its inverse needs, so it can be undone and redone.

use std::collections::VecDeque;
use std::fmt;

use crate::constants::DEFAULT_MAX_UNDO_STEPS;
use crate::error::{EngineError, HistoryDirection, Result};
use crate::layers::LayerStore;
use crate::model::{AnnotationLayer, DrawingElement, LayerChange, LayerId, now_millis};

// ============================================================================
// Command Types
// ============================================================================

/// A command that can be undone and redone.
/// Each command stores enough information to reverse its effect.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// A layer was created
    AddLayer {
        /// The layer as created
        layer: AnnotationLayer,
        /// Insertion position in the store
        index: usize,
        /// Whether redo should make the layer active. Set at creation and
        /// refreshed each time the add is undone.
        activated: bool,
    },
    /// A layer was deleted
    RemoveLayer {
        /// The full removed layer (stored for undo)
        layer: AnnotationLayer,
        /// Insertion position it was removed from
        index: usize,
        /// Whether it was the active layer
        was_active: bool,
    },
    /// A layer property changed
    ModifyLayer {
        /// The layer ID
        layer_id: LayerId,
        /// Old and new value of the property
        change: LayerChange,
    },
    /// An element was appended to a layer
    AddElement {
        /// The owning layer
        layer_id: LayerId,
        /// The element that was added
        element: DrawingElement,
    },
    /// An element was removed from a layer
    RemoveElement {
        /// The owning layer
        layer_id: LayerId,
        /// The removed element (stored for undo)
        element: DrawingElement,
        /// Its position in the layer before removal
        index: usize,
    },
    /// An element was updated
    ModifyElement {
        /// The owning layer
        layer_id: LayerId,
        /// Snapshot before the update
        before: DrawingElement,
        /// Snapshot after the update
        after: DrawingElement,
    },
}

/// Type tag of a [`Command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    LayerAdd,
    LayerRemove,
    LayerModify,
    ElementAdd,
    ElementRemove,
    ElementModify,
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            CommandKind::LayerAdd => "layer_add",
            CommandKind::LayerRemove => "layer_remove",
            CommandKind::LayerModify => "layer_modify",
            CommandKind::ElementAdd => "element_add",
            CommandKind::ElementRemove => "element_remove",
            CommandKind::ElementModify => "element_modify",
        };
        f.write_str(tag)
    }
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::AddLayer { .. } => CommandKind::LayerAdd,
            Command::RemoveLayer { .. } => CommandKind::LayerRemove,
            Command::ModifyLayer { .. } => CommandKind::LayerModify,
            Command::AddElement { .. } => CommandKind::ElementAdd,
            Command::RemoveElement { .. } => CommandKind::ElementRemove,
            Command::ModifyElement { .. } => CommandKind::ElementModify,
        }
    }

    /// Get a human-readable description of this command
    pub fn description(&self) -> String {
        match self {
            Command::AddLayer { layer, .. } => format!("Add layer '{}'", layer.name),
            Command::RemoveLayer { layer, .. } => format!("Delete layer '{}'", layer.name),
            Command::ModifyLayer { change, .. } => format!("Change layer {}", change.property()),
            Command::AddElement { element, .. } => format!("Add {}", element.shape.name()),
            Command::RemoveElement { element, .. } => {
                format!("Delete {}", element.shape.name())
            }
            Command::ModifyElement { after, .. } => format!("Edit {}", after.shape.name()),
        }
    }
}

/// A recorded command with the time it was recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    pub command: Command,
    /// Milliseconds since the UNIX epoch.
    pub timestamp: u64,
}

impl HistoryRecord {
    pub fn new(command: Command) -> Self {
        Self {
            command,
            timestamp: now_millis(),
        }
    }

    pub fn kind(&self) -> CommandKind {
        self.command.kind()
    }
}

// ============================================================================
// Undo Stack
// ============================================================================

/// Configuration for the undo stack
#[derive(Debug, Clone)]
pub struct UndoConfig {
    /// Maximum number of commands to keep in history
    pub max_history: usize,
}

impl Default for UndoConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_UNDO_STEPS,
        }
    }
}

/// The undo/redo history stack.
///
/// Maintains two stacks:
/// - `undo_stack`: Commands that can be undone (most recent at the back)
/// - `redo_stack`: Commands that can be redone (most recent at the end)
///
/// When a new command is recorded, it's pushed to undo_stack and redo_stack is cleared.
/// Once undo_stack exceeds its capacity the oldest record is evicted.
#[derive(Debug, Clone, Default)]
pub struct UndoStack {
    /// Stack of records that can be undone
    undo_stack: VecDeque<HistoryRecord>,
    /// Stack of records that can be redone
    redo_stack: Vec<HistoryRecord>,
    /// Configuration
    config: UndoConfig,
}

impl UndoStack {
    /// Create a new empty undo stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration
    pub fn with_config(config: UndoConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Push a command to the undo stack.
    /// This clears the redo stack (can't redo after a new action).
    pub fn push(&mut self, command: Command) {
        log::debug!("📝 Undo: pushed '{}'", command.description());
        self.undo_stack.push_back(HistoryRecord::new(command));
        self.redo_stack.clear();
        self.enforce_limit();
    }

    fn enforce_limit(&mut self) {
        while self.undo_stack.len() > self.config.max_history.max(1) {
            if let Some(evicted) = self.undo_stack.pop_front() {
                log::debug!("Undo: evicted oldest '{}'", evicted.command.description());
            }
        }
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the description of the command that would be undone
    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.back().map(|r| r.command.description())
    }

    /// Get the description of the command that would be redone
    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.last().map(|r| r.command.description())
    }

    /// The record that would be undone next.
    pub fn peek_undo(&self) -> Option<&HistoryRecord> {
        self.undo_stack.back()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        log::debug!("🗑️ Undo history cleared");
    }

    /// Get the number of commands in undo history
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of commands in redo history
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_history(&self) -> usize {
        self.config.max_history
    }
}

// ============================================================================
// Undo/Redo Execution
// ============================================================================

/// Undo the most recent command by applying its inverse to the store.
///
/// On success the record moves to the redo stack. If the inverse cannot be
/// applied the record stays on the undo stack and the store is unchanged.
pub fn undo_command(stack: &mut UndoStack, store: &mut LayerStore) -> Result<CommandKind> {
    let mut record = stack
        .undo_stack
        .pop_back()
        .ok_or(EngineError::EmptyHistory(HistoryDirection::Undo))?;

    match apply_undo(&mut record.command, store) {
        Ok(()) => {
            log::debug!("⏪ Undo: '{}'", record.command.description());
            let kind = record.kind();
            stack.redo_stack.push(record);
            Ok(kind)
        }
        Err(e) => {
            log::warn!("Undo of '{}' failed: {}", record.command.description(), e);
            stack.undo_stack.push_back(record);
            Err(e)
        }
    }
}

/// Redo the most recently undone command by re-applying its forward effect.
pub fn redo_command(stack: &mut UndoStack, store: &mut LayerStore) -> Result<CommandKind> {
    let record = stack
        .redo_stack
        .pop()
        .ok_or(EngineError::EmptyHistory(HistoryDirection::Redo))?;

    match apply_redo(&record.command, store) {
        Ok(()) => {
            log::debug!("⏩ Redo: '{}'", record.command.description());
            let kind = record.kind();
            stack.undo_stack.push_back(record);
            stack.enforce_limit();
            Ok(kind)
        }
        Err(e) => {
            log::warn!("Redo of '{}' failed: {}", record.command.description(), e);
            stack.redo_stack.push(record);
            Err(e)
        }
    }
}

/// Apply the undo operation for a command
fn apply_undo(cmd: &mut Command, store: &mut LayerStore) -> Result<()> {
    match cmd {
        Command::AddLayer {
            layer, activated, ..
        } => {
            // Undo add = remove; redo restores whatever was active now
            let was_active = store.active_id() == Some(layer.id);
            store.remove_layer(layer.id)?;
            *activated = was_active;
        }
        Command::RemoveLayer {
            layer,
            index,
            was_active,
        } => {
            // Undo remove = reinsert at the original position
            store.insert_layer(*index, layer.clone())?;
            if *was_active {
                store.set_active(layer.id)?;
            }
        }
        Command::ModifyLayer { layer_id, change } => {
            change.revert(store.layer_mut(*layer_id)?);
        }
        Command::AddElement { layer_id, element } => {
            store.remove_element(*layer_id, element.id)?;
        }
        Command::RemoveElement {
            layer_id,
            element,
            index,
        } => {
            store.insert_element(*layer_id, *index, element.clone())?;
        }
        Command::ModifyElement {
            layer_id, before, ..
        } => {
            store.replace_element(*layer_id, before.clone())?;
        }
    }
    Ok(())
}

/// Apply the redo operation for a command
fn apply_redo(cmd: &Command, store: &mut LayerStore) -> Result<()> {
    match cmd {
        Command::AddLayer {
            layer,
            index,
            activated,
        } => {
            store.insert_layer(*index, layer.clone())?;
            if *activated {
                store.set_active(layer.id)?;
            }
        }
        Command::RemoveLayer { layer, .. } => {
            store.remove_layer(layer.id)?;
        }
        Command::ModifyLayer { layer_id, change } => {
            change.apply(store.layer_mut(*layer_id)?);
        }
        Command::AddElement { layer_id, element } => {
            let end = store.layer(*layer_id)?.elements.len();
            store.insert_element(*layer_id, end, element.clone())?;
        }
        Command::RemoveElement {
            layer_id, element, ..
        } => {
            store.remove_element(*layer_id, element.id)?;
        }
        Command::ModifyElement {
            layer_id, after, ..
        } => {
            store.replace_element(*layer_id, after.clone())?;
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
