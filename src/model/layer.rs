//! Annotation layer data model.

use std::fmt;

use super::element::{DrawingElement, ElementId};

/// Unique identifier for a layer.
pub type LayerId = u64;

/// How a layer is composited over the layers below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
}

impl BlendMode {
    /// Get all blend modes.
    pub fn all() -> &'static [BlendMode] {
        &[
            BlendMode::Normal,
            BlendMode::Multiply,
            BlendMode::Screen,
            BlendMode::Overlay,
            BlendMode::Darken,
            BlendMode::Lighten,
        ]
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlendMode::Normal => "normal",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
            BlendMode::Darken => "darken",
            BlendMode::Lighten => "lighten",
        };
        f.write_str(name)
    }
}

/// An ordered, independently visible and lockable container of elements.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationLayer {
    pub id: LayerId,
    pub name: String,
    /// Elements in draw order.
    pub elements: Vec<DrawingElement>,
    pub visible: bool,
    pub locked: bool,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
    pub blend_mode: BlendMode,
    /// Compositing order, ascending. Need not be contiguous.
    pub order: i32,
}

impl AnnotationLayer {
    pub fn new(id: LayerId, name: impl Into<String>, order: i32) -> Self {
        Self {
            id,
            name: name.into(),
            elements: Vec::new(),
            visible: true,
            locked: false,
            opacity: 1.0,
            blend_mode: BlendMode::Normal,
            order,
        }
    }

    pub fn element(&self, id: ElementId) -> Option<&DrawingElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut DrawingElement> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Position of an element in draw order.
    pub fn element_index(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }
}

/// A change to one layer property, carrying both the old and new value.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerChange {
    Visible { old: bool, new: bool },
    Locked { old: bool, new: bool },
    Opacity { old: f32, new: f32 },
    Name { old: String, new: String },
    BlendMode { old: BlendMode, new: BlendMode },
    Order { old: i32, new: i32 },
}

impl LayerChange {
    /// Name of the changed property.
    pub fn property(&self) -> &'static str {
        match self {
            LayerChange::Visible { .. } => "visibility",
            LayerChange::Locked { .. } => "lock",
            LayerChange::Opacity { .. } => "opacity",
            LayerChange::Name { .. } => "name",
            LayerChange::BlendMode { .. } => "blend mode",
            LayerChange::Order { .. } => "order",
        }
    }

    /// Set the property to its new value.
    pub fn apply(&self, layer: &mut AnnotationLayer) {
        match self {
            LayerChange::Visible { new, .. } => layer.visible = *new,
            LayerChange::Locked { new, .. } => layer.locked = *new,
            LayerChange::Opacity { new, .. } => layer.opacity = *new,
            LayerChange::Name { new, .. } => layer.name = new.clone(),
            LayerChange::BlendMode { new, .. } => layer.blend_mode = *new,
            LayerChange::Order { new, .. } => layer.order = *new,
        }
    }

    /// Restore the property to its previous value.
    pub fn revert(&self, layer: &mut AnnotationLayer) {
        match self {
            LayerChange::Visible { old, .. } => layer.visible = *old,
            LayerChange::Locked { old, .. } => layer.locked = *old,
            LayerChange::Opacity { old, .. } => layer.opacity = *old,
            LayerChange::Name { old, .. } => layer.name = old.clone(),
            LayerChange::BlendMode { old, .. } => layer.blend_mode = *old,
            LayerChange::Order { old, .. } => layer.order = *old,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_layer_defaults() {
        let layer = AnnotationLayer::new(3, "Notes", 2);
        assert!(layer.visible);
        assert!(!layer.locked);
        assert_eq!(layer.opacity, 1.0);
        assert_eq!(layer.blend_mode, BlendMode::Normal);
        assert!(layer.elements.is_empty());
    }

    #[test]
    fn test_change_apply_and_revert() {
        let mut layer = AnnotationLayer::new(1, "A", 0);
        let change = LayerChange::Opacity { old: 1.0, new: 0.25 };
        change.apply(&mut layer);
        assert_eq!(layer.opacity, 0.25);
        change.revert(&mut layer);
        assert_eq!(layer.opacity, 1.0);

        let rename = LayerChange::Name {
            old: "A".into(),
            new: "B".into(),
        };
        rename.apply(&mut layer);
        assert_eq!(layer.name, "B");
        rename.revert(&mut layer);
        assert_eq!(layer.name, "A");
    }

    #[test]
    fn test_blend_mode_names() {
        assert_eq!(BlendMode::Multiply.to_string(), "multiply");
        assert_eq!(BlendMode::all().len(), 6);
    }
}
