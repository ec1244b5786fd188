//! Typed extension objects hosted by nodes
//!
//! A node keeps its components in attachment order. The graph moves a
//! component in on attach and hands it back (or drops it) on detach, telling
//! the component each time its host changes.

use std::any::Any;
use std::fmt::Debug;

use crate::config::ALL_LAYERS;
use crate::graph::{NodeId, SceneGraph};

/// Upcast helper so trait objects can be downcast to their concrete type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Something a node can host, such as a light or a collider.
pub trait Component: AsAny + Debug {
    /// Disabled components are skipped by enabled-only lookups.
    fn enabled(&self) -> bool {
        true
    }

    /// Layer bitmask used by masked lookups.
    fn layer(&self) -> u32 {
        ALL_LAYERS
    }

    /// The hosting node changed: `None -> Some` on attach, `Some -> None` on
    /// detach or host destruction.
    fn node_changed(&mut self, _old: Option<NodeId>, _new: Option<NodeId>) {}
}

fn is_match<C: Component>(component: &dyn Component, check_enabled: bool, layer_mask: u32) -> bool {
    component.as_any().is::<C>()
        && (!check_enabled || component.enabled())
        && component.layer() & layer_mask != 0
}

impl SceneGraph {
    /// Attach a component to `id`. Returns it back if the node is gone.
    pub fn add_component<C: Component>(&mut self, id: NodeId, component: C) -> Result<(), C> {
        let Some(node) = self.node_mut(id) else {
            return Err(component);
        };
        let mut boxed: Box<dyn Component> = Box::new(component);
        boxed.node_changed(None, Some(id));
        node.components.push(boxed);
        Ok(())
    }

    /// Detach the first component of type `C` and hand it back.
    pub fn take_component<C: Component>(&mut self, id: NodeId) -> Option<C> {
        let node = self.node_mut(id)?;
        let index = node
            .components
            .iter()
            .position(|c| (**c).as_any().is::<C>())?;

        let mut component = node.components.remove(index);
        component.node_changed(Some(id), None);
        component.into_any().downcast::<C>().ok().map(|c| *c)
    }

    /// Detach and drop every component of `id`.
    pub fn remove_components(&mut self, id: NodeId) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        for mut component in std::mem::take(&mut node.components) {
            component.node_changed(Some(id), None);
        }
    }

    /// First component of type `C` on `id`.
    ///
    /// With `check_enabled`, disabled components are skipped. Only
    /// components whose layer intersects `layer_mask` match.
    #[must_use]
    pub fn component<C: Component>(
        &self,
        id: NodeId,
        check_enabled: bool,
        layer_mask: u32,
    ) -> Option<&C> {
        self.node(id)?
            .components
            .iter()
            .find(|c| is_match::<C>(&***c, check_enabled, layer_mask))
            .and_then(|c| (**c).as_any().downcast_ref::<C>())
    }

    pub fn component_mut<C: Component>(&mut self, id: NodeId) -> Option<&mut C> {
        self.node_mut(id)?
            .components
            .iter_mut()
            .find_map(|c| (**c).as_any_mut().downcast_mut::<C>())
    }

    /// Every component of type `C` on `id`, in attachment order.
    pub fn components_of<C: Component>(&self, id: NodeId) -> impl Iterator<Item = &C> + '_ {
        self.node(id)
            .into_iter()
            .flat_map(|node| node.components.iter())
            .filter_map(|c| (**c).as_any().downcast_ref::<C>())
    }

    #[must_use]
    pub fn component_count(&self, id: NodeId) -> usize {
        self.node(id).map_or(0, |node| node.components.len())
    }
}
