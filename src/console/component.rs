//! Components
//!
//! A component is an object mounted on a console that receives a call
//! every tick and every frame. Components are keyed by their id and are
//! visited in id order.
//!
//! No console lock is held while a component callback runs, so callbacks
//! may freely print into consoles and mount or unmount components. The
//! set of components visited by a pass is fixed when the pass starts:
//! a component mounted during a pass is first visited by the next pass,
//! and a component unmounted during a pass is not called again.
//!
//! Update and draw are separate passes. A component mounted during the
//! update pass of a frame is already drawn by the draw pass of that same
//! frame; its first update happens in the next frame.

use std::sync::Arc;

use parking_lot::Mutex;

use super::{mouse_in_area, Console, ConsoleError, Node};

pub(crate) type SharedComponent = Arc<Mutex<Box<dyn Component>>>;

/// An object that can be mounted on a console
pub trait Component: Send {
    /// Stable identity used as the mount key
    fn id(&self) -> &str;

    /// Whether the component wants to be drawn
    fn should_draw(&self) -> bool;

    /// Whether the component asks to be unmounted
    fn should_close(&self) -> bool {
        false
    }

    /// Whether focus follows clicks (`true`) or is managed by the component
    fn focus_on_click(&self) -> bool;

    /// Top-left corner in console-local cells
    fn position(&self) -> (i32, i32);

    /// Size in cells
    fn size(&self) -> (i32, i32);

    fn has_focus(&self) -> bool;

    fn set_focus(&mut self, focus: bool);

    /// Per-tick update. Returning `false` unmounts the component.
    fn update(&mut self, console: &Console, elapsed: f64) -> bool;

    fn draw(&mut self, console: &Console, elapsed: f64);
}

impl Console {
    /// Mount a component, replacing any component with the same id
    pub fn add_component(&self, component: impl Component + 'static) -> Result<(), ConsoleError> {
        let node = self.node()?;
        let id = component.id().to_string();
        let component: Box<dyn Component> = Box::new(component);

        node.state
            .write()
            .components
            .insert(id.clone(), Arc::new(Mutex::new(component)));
        tracing::debug!("mounted component {:?}", id);
        Ok(())
    }

    /// Unmount the component with the given id
    pub fn remove_component(&self, id: &str) -> Result<(), ConsoleError> {
        let node = self.node()?;
        let removed = node.state.write().components.remove(id);
        match removed {
            Some(_) => {
                tracing::debug!("unmounted component {:?}", id);
                Ok(())
            }
            None => Err(ConsoleError::ComponentNotFound(id.to_string())),
        }
    }

    /// Whether a component with the given id is mounted
    pub fn has_component(&self, id: &str) -> bool {
        self.node()
            .map(|node| node.state.read().components.contains_key(id))
            .unwrap_or(false)
    }
}

impl Node {
    fn component_snapshot(&self) -> Vec<(String, SharedComponent)> {
        self.state
            .read()
            .components
            .iter()
            .map(|(id, component)| (id.clone(), Arc::clone(component)))
            .collect()
    }

    /// Whether `component` is still the one mounted under `id`
    fn is_mounted(&self, id: &str, component: &SharedComponent) -> bool {
        self.state
            .read()
            .components
            .get(id)
            .is_some_and(|mounted| Arc::ptr_eq(mounted, component))
    }

    /// Run focus handling and updates for this console's components, then
    /// recurse into sub-consoles
    pub(super) fn update_components(self: &Arc<Node>, clicked: bool, elapsed: f64) {
        let console = Console::from_node(self);
        let mouse = self.state.read().mouse;

        for (id, component) in self.component_snapshot() {
            if !self.is_mounted(&id, &component) {
                continue;
            }

            let keep = {
                let mut component = component.lock();
                let focus = if !component.should_draw() {
                    Some(false)
                } else if component.focus_on_click() && clicked {
                    let (x, y) = component.position();
                    let (width, height) = component.size();
                    Some(mouse_in_area(mouse, x, y, width, height))
                } else {
                    None
                };
                if let Some(focus) = focus {
                    if component.has_focus() != focus {
                        tracing::trace!("component {:?} focus: {}", id, focus);
                    }
                    component.set_focus(focus);
                }

                !component.should_close() && component.update(&console, elapsed)
            };

            if !keep {
                let mut state = self.state.write();
                if state
                    .components
                    .get(&id)
                    .is_some_and(|mounted| Arc::ptr_eq(mounted, &component))
                {
                    state.components.remove(&id);
                    tracing::debug!("component {:?} closed", id);
                }
            }
        }

        let children: Vec<_> = self
            .state
            .read()
            .children
            .iter()
            .map(|child| Arc::clone(&child.node))
            .collect();
        for child in children {
            child.update_components(clicked, elapsed);
        }
    }

    /// Draw this console's visible components into its buffer
    pub(super) fn draw_components(self: &Arc<Node>, elapsed: f64) {
        let console = Console::from_node(self);

        for (id, component) in self.component_snapshot() {
            if !self.is_mounted(&id, &component) {
                continue;
            }

            let mut component = component.lock();
            if component.should_draw() {
                component.draw(&console, elapsed);
            }
        }
    }
}
