//! Sub-console management
//!
//! Children are kept sorted ascending by priority with a stable sort, so
//! siblings of equal priority keep their insertion order and composite
//! order is deterministic.

use std::sync::Arc;

use super::{Child, Console, ConsoleError, Handle, Node, Role};

fn sort_children(children: &mut [Child]) {
    children.sort_by_key(|child| child.priority);
}

impl Console {
    /// Create a sub-console at `(x, y)` relative to this console.
    ///
    /// The rectangle must lie inside this console. The new sub-console
    /// starts with priority 0.
    pub fn create_sub_console(
        &self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<Console, ConsoleError> {
        if x < 0
            || y < 0
            || width <= 0
            || height <= 0
            || x.saturating_add(width) > self.width
            || y.saturating_add(height) > self.height
        {
            return Err(ConsoleError::SubConsoleOutOfBounds { x, y, width, height });
        }

        let node = self.node()?;
        let sub = Arc::new(Node::new(
            width,
            height,
            Arc::clone(&node.font),
            Role::Sub {
                parent: Arc::downgrade(&node),
            },
        ));
        let handle = Console::from_node(&sub);

        let mut state = node.state.write();
        state.children.push(Child {
            node: sub,
            x,
            y,
            priority: 0,
        });
        sort_children(&mut state.children);

        tracing::debug!("created {}x{} sub-console at ({}, {})", width, height, x, y);
        Ok(handle)
    }

    /// Remove a sub-console from this console. The removed console and
    /// all of its descendants become detached.
    pub fn remove_sub_console(&self, sub: &Console) -> Result<(), ConsoleError> {
        let node = self.node()?;
        let target = match &sub.handle {
            Handle::Sub(weak) => weak.upgrade(),
            Handle::Root(_) => None,
        }
        .ok_or(ConsoleError::SubConsoleNotFound)?;

        let removed = {
            let mut state = node.state.write();
            let index = state
                .children
                .iter()
                .position(|child| Arc::ptr_eq(&child.node, &target))
                .ok_or(ConsoleError::SubConsoleNotFound)?;
            let removed = state.children.swap_remove(index);
            sort_children(&mut state.children);
            removed
        };
        drop(target);

        tracing::debug!("removed sub-console at ({}, {})", removed.x, removed.y);
        Ok(())
    }

    /// Set the draw priority. A higher priority draws on top of siblings
    /// with a lower one. Only sub-consoles have a priority.
    pub fn set_priority(&self, priority: i32) -> Result<(), ConsoleError> {
        self.update_entry(|child| child.priority = priority)
    }

    /// Priority of a sub-console, `None` for the root
    pub fn priority(&self) -> Result<Option<i32>, ConsoleError> {
        if !self.is_sub_console() {
            return Ok(None);
        }
        let (parent, node) = self.parent_and_node()?;
        let state = parent.state.read();
        state
            .children
            .iter()
            .find(|child| Arc::ptr_eq(&child.node, &node))
            .map(|child| Some(child.priority))
            .ok_or(ConsoleError::Detached)
    }

    /// Offset of a sub-console inside its parent, `(0, 0)` for the root
    pub fn offset(&self) -> Result<(i32, i32), ConsoleError> {
        if !self.is_sub_console() {
            return Ok((0, 0));
        }
        let (parent, node) = self.parent_and_node()?;
        let state = parent.state.read();
        state
            .children
            .iter()
            .find(|child| Arc::ptr_eq(&child.node, &node))
            .map(|child| (child.x, child.y))
            .ok_or(ConsoleError::Detached)
    }

    /// Handles to the direct sub-consoles, in composite order
    pub fn sub_consoles(&self) -> Result<Vec<Console>, ConsoleError> {
        let node = self.node()?;
        let state = node.state.read();
        Ok(state
            .children
            .iter()
            .map(|child| Console::from_node(&child.node))
            .collect())
    }

    /// Modify this console's entry in its parent's child list and re-sort
    fn update_entry(&self, f: impl FnOnce(&mut Child)) -> Result<(), ConsoleError> {
        if !self.is_sub_console() {
            return Err(ConsoleError::PriorityOnRoot);
        }
        let (parent, node) = self.parent_and_node()?;

        let mut state = parent.state.write();
        let child = state
            .children
            .iter_mut()
            .find(|child| Arc::ptr_eq(&child.node, &node))
            .ok_or(ConsoleError::Detached)?;
        f(child);
        sort_children(&mut state.children);
        Ok(())
    }

    fn parent_and_node(&self) -> Result<(Arc<Node>, Arc<Node>), ConsoleError> {
        let node = self.node()?;
        let parent = match &node.role {
            Role::Sub { parent } => parent.upgrade(),
            Role::Root(_) => None,
        }
        .ok_or(ConsoleError::Detached)?;
        Ok((parent, node))
    }
}
