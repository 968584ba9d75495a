//! Layer & history manager.
//!
//! [`Document`] owns the layer store and the undo stack. Every public mutation
//! validates its input, updates the store, and records exactly one [`Command`]
//! as a single step, so readers never see a store change without its record.

use pixnote_raster::Rgba;

use crate::constants::DEFAULT_MAX_UNDO_STEPS;
use crate::error::{EngineError, Result};
use crate::layers::LayerStore;
use crate::model::{
    AnnotationLayer, BlendMode, DrawingElement, ElementId, ElementShape, ElementStyle,
    ElementUpdate, LayerChange, LayerId,
};
use crate::undo::{Command, CommandKind, UndoConfig, UndoStack, redo_command, undo_command};

/// Ordered layers, their elements, and the linear undo/redo history.
#[derive(Debug, Clone)]
pub struct Document {
    store: LayerStore,
    history: UndoStack,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document with the default history capacity.
    pub fn new() -> Self {
        Self::with_max_undo_steps(DEFAULT_MAX_UNDO_STEPS)
    }

    /// Create an empty document keeping at most `max_undo_steps` records.
    pub fn with_max_undo_steps(max_undo_steps: usize) -> Self {
        Self {
            store: LayerStore::new(),
            history: UndoStack::with_config(UndoConfig {
                max_history: max_undo_steps.max(1),
            }),
        }
    }

    /// Create a document whose first layer, named `name`, already exists and
    /// is active. The initial layer is part of the starting state and is not
    /// recorded in history.
    pub fn with_base_layer(name: &str, max_undo_steps: usize) -> Result<Self> {
        let mut doc = Self::with_max_undo_steps(max_undo_steps);
        let layer = doc.new_layer(name, None)?;
        doc.store.insert_layer(0, layer)?;
        Ok(doc)
    }

    fn new_layer(&mut self, name: &str, order: Option<i32>) -> Result<AnnotationLayer> {
        if name.trim().is_empty() {
            return Err(EngineError::validation("layer name must not be empty"));
        }
        let order = order.unwrap_or(self.store.len() as i32);
        let id = self.store.allocate_layer_id();
        Ok(AnnotationLayer::new(id, name, order))
    }

    // ========================================================================
    // Layers
    // ========================================================================

    /// Create a layer. `order` defaults to the current layer count.
    /// The first layer of an empty document becomes active.
    pub fn create_layer(&mut self, name: &str, order: Option<i32>) -> Result<LayerId> {
        let layer = self.new_layer(name, order)?;
        let id = layer.id;
        let had_active = self.store.active_id().is_some();
        let index = self.store.insert_layer(self.store.len(), layer.clone())?;
        let activated = !had_active && self.store.active_id() == Some(id);

        log::debug!("Created layer {} '{}' (order {})", id, layer.name, layer.order);
        self.history.push(Command::AddLayer {
            layer,
            index,
            activated,
        });
        Ok(id)
    }

    /// Delete a layer and everything on it.
    pub fn delete_layer(&mut self, id: LayerId) -> Result<AnnotationLayer> {
        let was_active = self.store.active_id() == Some(id);
        let (index, layer) = self.store.remove_layer(id)?;

        log::debug!("Deleted layer {} '{}'", id, layer.name);
        self.history.push(Command::RemoveLayer {
            layer: layer.clone(),
            index,
            was_active,
        });
        Ok(layer)
    }

    pub fn layer(&self, id: LayerId) -> Result<&AnnotationLayer> {
        self.store.layer(id)
    }

    pub fn set_active_layer(&mut self, id: LayerId) -> Result<()> {
        self.store.set_active(id)
    }

    pub fn active_layer_id(&self) -> Option<LayerId> {
        self.store.active_id()
    }

    pub fn active_layer(&self) -> Result<&AnnotationLayer> {
        let id = self.store.active_id().ok_or(EngineError::NoActiveLayer)?;
        self.store.layer(id)
    }

    /// All layers sorted ascending by `order`; equal orders keep insertion order.
    pub fn all_layers(&self) -> Vec<&AnnotationLayer> {
        self.store.sorted()
    }

    pub fn layer_count(&self) -> usize {
        self.store.len()
    }

    fn modify_layer(&mut self, id: LayerId, change: LayerChange) -> Result<()> {
        change.apply(self.store.layer_mut(id)?);
        log::debug!("Layer {}: changed {}", id, change.property());
        self.history.push(Command::ModifyLayer {
            layer_id: id,
            change,
        });
        Ok(())
    }

    /// Flip visibility, returning the new value.
    pub fn toggle_layer_visibility(&mut self, id: LayerId) -> Result<bool> {
        let old = self.store.layer(id)?.visible;
        self.modify_layer(id, LayerChange::Visible { old, new: !old })?;
        Ok(!old)
    }

    /// Flip the lock, returning the new value.
    pub fn toggle_layer_lock(&mut self, id: LayerId) -> Result<bool> {
        let old = self.store.layer(id)?.locked;
        self.modify_layer(id, LayerChange::Locked { old, new: !old })?;
        Ok(!old)
    }

    pub fn set_layer_opacity(&mut self, id: LayerId, opacity: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&opacity) {
            return Err(EngineError::validation(format!(
                "opacity must be in [0, 1], got {}",
                opacity
            )));
        }
        let old = self.store.layer(id)?.opacity;
        self.modify_layer(id, LayerChange::Opacity { old, new: opacity })
    }

    pub fn rename_layer(&mut self, id: LayerId, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(EngineError::validation("layer name must not be empty"));
        }
        let old = self.store.layer(id)?.name.clone();
        self.modify_layer(
            id,
            LayerChange::Name {
                old,
                new: name.to_string(),
            },
        )
    }

    pub fn set_layer_blend_mode(&mut self, id: LayerId, mode: BlendMode) -> Result<()> {
        let old = self.store.layer(id)?.blend_mode;
        self.modify_layer(id, LayerChange::BlendMode { old, new: mode })
    }

    pub fn set_layer_order(&mut self, id: LayerId, order: i32) -> Result<()> {
        let old = self.store.layer(id)?.order;
        self.modify_layer(id, LayerChange::Order { old, new: order })
    }

    // ========================================================================
    // Elements
    // ========================================================================

    fn unlocked_layer(&self, id: LayerId) -> Result<&AnnotationLayer> {
        let layer = self.store.layer(id)?;
        if layer.locked {
            return Err(EngineError::LayerLocked { id });
        }
        Ok(layer)
    }

    /// Append a new element to a layer, returning its id.
    pub fn add_element(
        &mut self,
        layer_id: LayerId,
        shape: ElementShape,
        style: ElementStyle,
    ) -> Result<ElementId> {
        shape.validate()?;
        if !style.stroke_width.is_finite() || style.stroke_width < 0.0 {
            return Err(EngineError::validation("stroke width must be >= 0"));
        }
        let end = self.unlocked_layer(layer_id)?.elements.len();

        let element = DrawingElement::new(self.store.allocate_element_id(), shape, style);
        let id = element.id;
        self.store.insert_element(layer_id, end, element.clone())?;

        log::debug!("Layer {}: added {} {}", layer_id, element.shape.name(), id);
        self.history.push(Command::AddElement { layer_id, element });
        Ok(id)
    }

    /// Remove an element, returning it.
    pub fn remove_element(
        &mut self,
        layer_id: LayerId,
        element_id: ElementId,
    ) -> Result<DrawingElement> {
        self.unlocked_layer(layer_id)?;
        let (index, element) = self.store.remove_element(layer_id, element_id)?;

        log::debug!("Layer {}: removed element {} at {}", layer_id, element_id, index);
        self.history.push(Command::RemoveElement {
            layer_id,
            element: element.clone(),
            index,
        });
        Ok(element)
    }

    /// Apply field updates to an element and refresh its `updated_at`.
    pub fn update_element(
        &mut self,
        layer_id: LayerId,
        element_id: ElementId,
        updates: &[ElementUpdate],
    ) -> Result<&DrawingElement> {
        for update in updates {
            update.validate()?;
        }
        let before = self
            .unlocked_layer(layer_id)?
            .element(element_id)
            .cloned()
            .ok_or_else(|| EngineError::element_not_found(element_id))?;

        let mut after = before.clone();
        for update in updates {
            after.apply(update);
        }
        after.touch();
        self.store.replace_element(layer_id, after.clone())?;

        log::debug!(
            "Layer {}: updated element {} ({} changes)",
            layer_id,
            element_id,
            updates.len()
        );
        self.history.push(Command::ModifyElement {
            layer_id,
            before,
            after,
        });
        self.element(layer_id, element_id)
    }

    pub fn element(&self, layer_id: LayerId, element_id: ElementId) -> Result<&DrawingElement> {
        self.store
            .layer(layer_id)?
            .element(element_id)
            .ok_or_else(|| EngineError::element_not_found(element_id))
    }

    /// Convenience: append a stroke-colored element to the active layer.
    pub fn add_to_active(&mut self, shape: ElementShape, stroke: Rgba) -> Result<ElementId> {
        let id = self.store.active_id().ok_or(EngineError::NoActiveLayer)?;
        let style = ElementStyle {
            stroke,
            ..Default::default()
        };
        self.add_element(id, shape, style)
    }

    // ========================================================================
    // History
    // ========================================================================

    /// Undo the most recent mutation.
    pub fn undo(&mut self) -> Result<CommandKind> {
        undo_command(&mut self.history, &mut self.store)
    }

    /// Re-apply the most recently undone mutation.
    pub fn redo(&mut self) -> Result<CommandKind> {
        redo_command(&mut self.history, &mut self.store)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Drop all history without touching the layers.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub fn undo_description(&self) -> Option<String> {
        self.history.undo_description()
    }

    pub fn redo_description(&self) -> Option<String> {
        self.history.redo_description()
    }
}
