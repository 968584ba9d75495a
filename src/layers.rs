//! Layer and element storage.
//!
//! [`LayerStore`] holds the raw document state: layers in insertion order and
//! the active layer. It performs no history bookkeeping; [`Document`](crate::Document)
//! wraps it and records every mutation. Each method either fails without
//! touching state or completes fully.

use crate::error::{EngineError, Result};
use crate::model::{AnnotationLayer, DrawingElement, ElementId, LayerId};

#[derive(Debug, Clone)]
pub struct LayerStore {
    /// Layers in insertion order. Compositing order is `AnnotationLayer::order`.
    layers: Vec<AnnotationLayer>,
    active: Option<LayerId>,
    next_layer_id: LayerId,
    next_element_id: ElementId,
}

impl Default for LayerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerStore {
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            active: None,
            next_layer_id: 1,
            next_element_id: 1,
        }
    }

    /// Allocate a fresh layer id. Ids are never reused.
    pub fn allocate_layer_id(&mut self) -> LayerId {
        let id = self.next_layer_id;
        self.next_layer_id += 1;
        id
    }

    /// Allocate a fresh element id. Ids are never reused.
    pub fn allocate_element_id(&mut self) -> ElementId {
        let id = self.next_element_id;
        self.next_element_id += 1;
        id
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &AnnotationLayer> {
        self.layers.iter()
    }

    fn position(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.position(id).is_some()
    }

    pub fn layer(&self, id: LayerId) -> Result<&AnnotationLayer> {
        self.layers
            .iter()
            .find(|l| l.id == id)
            .ok_or_else(|| EngineError::layer_not_found(id))
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Result<&mut AnnotationLayer> {
        self.layers
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| EngineError::layer_not_found(id))
    }

    pub fn active_id(&self) -> Option<LayerId> {
        self.active
    }

    pub fn set_active(&mut self, id: LayerId) -> Result<()> {
        if !self.contains(id) {
            return Err(EngineError::layer_not_found(id));
        }
        self.active = Some(id);
        Ok(())
    }

    /// Insert a layer at `index` in insertion order (clamped to the end).
    /// The first layer in an empty store becomes active.
    pub fn insert_layer(&mut self, index: usize, layer: AnnotationLayer) -> Result<usize> {
        if self.contains(layer.id) {
            return Err(EngineError::validation(format!(
                "layer {} already exists",
                layer.id
            )));
        }
        let index = index.min(self.layers.len());
        if self.active.is_none() {
            self.active = Some(layer.id);
        }
        self.next_layer_id = self.next_layer_id.max(layer.id + 1);
        self.layers.insert(index, layer);
        Ok(index)
    }

    /// Remove a layer, returning its insertion index and contents.
    ///
    /// If it was active, the earliest-inserted remaining layer becomes active,
    /// or none if the store is now empty.
    pub fn remove_layer(&mut self, id: LayerId) -> Result<(usize, AnnotationLayer)> {
        let index = self
            .position(id)
            .ok_or_else(|| EngineError::layer_not_found(id))?;
        let layer = self.layers.remove(index);
        if self.active == Some(id) {
            self.active = self.layers.first().map(|l| l.id);
            log::debug!("Active layer {} removed, now {:?}", id, self.active);
        }
        Ok((index, layer))
    }

    /// Layers sorted ascending by `order`, ties kept in insertion order.
    pub fn sorted(&self) -> Vec<&AnnotationLayer> {
        let mut layers: Vec<&AnnotationLayer> = self.layers.iter().collect();
        layers.sort_by_key(|l| l.order);
        layers
    }

    /// Insert an element at `index` within a layer (clamped to the end).
    pub fn insert_element(
        &mut self,
        layer_id: LayerId,
        index: usize,
        element: DrawingElement,
    ) -> Result<()> {
        let element_id = element.id;
        let layer = self.layer_mut(layer_id)?;
        if layer.element(element_id).is_some() {
            return Err(EngineError::validation(format!(
                "element {} already exists in layer {}",
                element_id, layer_id
            )));
        }
        let index = index.min(layer.elements.len());
        layer.elements.insert(index, element);
        self.next_element_id = self.next_element_id.max(element_id + 1);
        Ok(())
    }

    /// Remove an element, returning its index and contents.
    pub fn remove_element(
        &mut self,
        layer_id: LayerId,
        element_id: ElementId,
    ) -> Result<(usize, DrawingElement)> {
        let layer = self.layer_mut(layer_id)?;
        let index = layer
            .element_index(element_id)
            .ok_or_else(|| EngineError::element_not_found(element_id))?;
        Ok((index, layer.elements.remove(index)))
    }

    /// Replace an element with a snapshot of the same id, returning the old one.
    pub fn replace_element(
        &mut self,
        layer_id: LayerId,
        element: DrawingElement,
    ) -> Result<DrawingElement> {
        let layer = self.layer_mut(layer_id)?;
        let slot = layer
            .element_mut(element.id)
            .ok_or_else(|| EngineError::element_not_found(element.id))?;
        Ok(std::mem::replace(slot, element))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementShape, ElementStyle, Point};

    fn element(id: ElementId) -> DrawingElement {
        DrawingElement::new(
            id,
            ElementShape::Freehand {
                points: vec![Point::new(0.0, 0.0)],
            },
            ElementStyle::default(),
        )
    }

    #[test]
    fn test_first_layer_becomes_active() {
        let mut store = LayerStore::new();
        store.insert_layer(0, AnnotationLayer::new(1, "A", 0)).unwrap();
        store.insert_layer(1, AnnotationLayer::new(2, "B", 1)).unwrap();
        assert_eq!(store.active_id(), Some(1));
    }

    #[test]
    fn test_remove_active_reassigns_to_first() {
        let mut store = LayerStore::new();
        for id in 1..=3 {
            store
                .insert_layer(id as usize, AnnotationLayer::new(id, "L", 0))
                .unwrap();
        }
        store.set_active(2).unwrap();
        store.remove_layer(2).unwrap();
        assert_eq!(store.active_id(), Some(1));

        store.remove_layer(1).unwrap();
        store.remove_layer(3).unwrap();
        assert_eq!(store.active_id(), None);
    }

    #[test]
    fn test_sorted_is_stable() {
        let mut store = LayerStore::new();
        store.insert_layer(0, AnnotationLayer::new(1, "first", 5)).unwrap();
        store.insert_layer(1, AnnotationLayer::new(2, "second", 1)).unwrap();
        store.insert_layer(2, AnnotationLayer::new(3, "third", 5)).unwrap();
        let names: Vec<&str> = store.sorted().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["second", "first", "third"]);
    }

    #[test]
    fn test_element_insert_remove_replace() {
        let mut store = LayerStore::new();
        store.insert_layer(0, AnnotationLayer::new(1, "A", 0)).unwrap();
        store.insert_element(1, 0, element(1)).unwrap();
        store.insert_element(1, 1, element(2)).unwrap();
        store.insert_element(1, 1, element(3)).unwrap();

        let ids: Vec<ElementId> = store.layer(1).unwrap().elements.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3, 2]);

        let (index, removed) = store.remove_element(1, 3).unwrap();
        assert_eq!((index, removed.id), (1, 3));

        let mut replacement = element(2);
        replacement.style.stroke_width = 9.0;
        let old = store.replace_element(1, replacement).unwrap();
        assert_eq!(old.style.stroke_width, 2.0);
        assert_eq!(store.layer(1).unwrap().elements[1].style.stroke_width, 9.0);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut store = LayerStore::new();
        store.insert_layer(0, AnnotationLayer::new(1, "A", 0)).unwrap();
        assert!(store.insert_layer(0, AnnotationLayer::new(1, "B", 0)).is_err());
        store.insert_element(1, 0, element(1)).unwrap();
        assert!(store.insert_element(1, 0, element(1)).is_err());
    }

    #[test]
    fn test_missing_ids() {
        let mut store = LayerStore::new();
        assert!(matches!(
            store.remove_layer(9),
            Err(EngineError::NotFound { id: 9, .. })
        ));
        store.insert_layer(0, AnnotationLayer::new(1, "A", 0)).unwrap();
        assert!(matches!(
            store.remove_element(1, 42),
            Err(EngineError::NotFound { id: 42, .. })
        ));
        assert!(store.set_active(5).is_err());
    }
}
