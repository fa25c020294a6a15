//! Console tree
//!
//! A console owns a grid of cells, an ordered list of sub-consoles and a
//! set of mounted components. The root console additionally carries the
//! frame hooks and window settings and is the only console that can be
//! started.
//!
//! # Locking
//!
//! Every console guards its buffer, child list and component map with
//! its own reader/writer lock. Locks are never held across a call into a
//! child console, a component callback or a hook, so application code may
//! mutate any console from any thread, including from inside those
//! callbacks.
//!
//! # Ownership
//!
//! The parent's child list holds the only strong reference to a
//! sub-console. [`Console`] handles to sub-consoles are non-owning: once
//! the sub-console is removed (or its parent goes away) every operation
//! on the handle fails with [`ConsoleError::Detached`].

mod component;
mod error;
mod frame;
mod layout;
mod tree;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};

use crate::core::{apply_all, Cell, Grid, Snapshot, Transform};
use crate::host::Font;

pub use component::Component;
pub use error::{ConsoleError, HookError};
pub use frame::{RenderHook, TickHook};
pub use layout::TAG_CENTER_COMPENSATION;

use component::SharedComponent;
use frame::RootState;

/// Mouse position reported when the cursor is outside a console
pub const MOUSE_OUTSIDE: (i32, i32) = (-1, -1);

/// A console in the tree
pub(crate) struct Node {
    width: i32,
    height: i32,
    font: Arc<dyn Font>,
    role: Role,
    state: RwLock<NodeState>,
}

enum Role {
    Root(Mutex<RootState>),
    Sub { parent: Weak<Node> },
}

/// Everything behind a console's lock
struct NodeState {
    buffer: Grid,
    /// Sorted ascending by priority, ties in insertion order
    children: Vec<Child>,
    components: BTreeMap<String, SharedComponent>,
    mouse: (i32, i32),
}

/// A sub-console entry in its parent's child list
#[derive(Clone)]
struct Child {
    node: Arc<Node>,
    x: i32,
    y: i32,
    priority: i32,
}

impl Node {
    fn new(width: i32, height: i32, font: Arc<dyn Font>, role: Role) -> Self {
        Self {
            width,
            height,
            font,
            role,
            state: RwLock::new(NodeState {
                buffer: Grid::new(width as usize, height as usize),
                children: Vec::new(),
                components: BTreeMap::new(),
                mouse: MOUSE_OUTSIDE,
            }),
        }
    }
}

#[derive(Clone)]
enum Handle {
    Root(Arc<Node>),
    Sub(Weak<Node>),
}

/// Handle to a root console or sub-console.
///
/// Cloning a handle is cheap; all clones refer to the same console.
#[derive(Clone)]
pub struct Console {
    handle: Handle,
    width: i32,
    height: i32,
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("sub_console", &self.is_sub_console())
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl Console {
    /// Create a new root console of `width` x `height` cells
    pub fn new(
        width: i32,
        height: i32,
        font: Arc<dyn Font>,
        title: impl Into<String>,
    ) -> Result<Self, ConsoleError> {
        if width <= 0 || height <= 0 {
            return Err(ConsoleError::InvalidSize { width, height });
        }

        let root = RootState::new(title.into());
        let node = Arc::new(Node::new(width, height, font, Role::Root(Mutex::new(root))));
        Ok(Self::from_node(&node))
    }

    /// Build a handle for a node: strong for the root, weak for sub-consoles
    fn from_node(node: &Arc<Node>) -> Self {
        let handle = match node.role {
            Role::Root(_) => Handle::Root(Arc::clone(node)),
            Role::Sub { .. } => Handle::Sub(Arc::downgrade(node)),
        };
        Self {
            handle,
            width: node.width,
            height: node.height,
        }
    }

    fn node(&self) -> Result<Arc<Node>, ConsoleError> {
        match &self.handle {
            Handle::Root(node) => Ok(Arc::clone(node)),
            Handle::Sub(weak) => weak.upgrade().ok_or(ConsoleError::Detached),
        }
    }

    /// Width in cells
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height in cells
    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn is_sub_console(&self) -> bool {
        matches!(self.handle, Handle::Sub(_))
    }

    /// Whether the console is still part of a tree
    pub fn is_attached(&self) -> bool {
        self.node().is_ok()
    }

    /// Whether both handles refer to the same console
    pub fn same_console(&self, other: &Console) -> bool {
        match (&self.handle, &other.handle) {
            (Handle::Root(a), Handle::Root(b)) => Arc::ptr_eq(a, b),
            (Handle::Sub(a), Handle::Sub(b)) => Weak::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Read a single cell
    pub fn cell(&self, x: i32, y: i32) -> Result<Cell, ConsoleError> {
        let node = self.node()?;
        let state = node.state.read();
        state
            .buffer
            .checked_position(x, y)
            .and_then(|(col, row)| state.buffer.cell(col, row))
            .copied()
            .ok_or(ConsoleError::OutOfBounds { x, y })
    }

    /// Snapshot of the console's own buffer
    pub fn snapshot(&self) -> Result<Snapshot, ConsoleError> {
        let node = self.node()?;
        let state = node.state.read();
        Ok(Snapshot::from_grid(&state.buffer))
    }

    /// Reset the whole console to empty cells
    pub fn clear_all(&self) -> Result<(), ConsoleError> {
        self.transform_all(&[Transform::Clear])
    }

    /// Reset part of the console to empty cells
    pub fn clear(&self, x: i32, y: i32, width: i32, height: i32) -> Result<(), ConsoleError> {
        self.transform_area(x, y, width, height, &[Transform::Clear])
    }

    /// Apply transforms to every cell in the console
    pub fn transform_all(&self, transforms: &[Transform]) -> Result<(), ConsoleError> {
        self.transform_area(0, 0, self.width, self.height, transforms)
    }

    /// Apply transforms to every cell in the given area.
    ///
    /// With no transforms the area is reset to empty cells. The first cell
    /// outside the console aborts the call; cells visited before it keep
    /// their new value.
    pub fn transform_area(
        &self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        transforms: &[Transform],
    ) -> Result<(), ConsoleError> {
        let node = self.node()?;
        let mut state = node.state.write();

        for px in 0..width {
            for py in 0..height {
                let (cx, cy) = (x.saturating_add(px), y.saturating_add(py));
                state.transform_cell(cx, cy, transforms)?;
            }
        }

        Ok(())
    }

    /// Apply transforms to a single cell
    pub fn transform(&self, x: i32, y: i32, transforms: &[Transform]) -> Result<(), ConsoleError> {
        if transforms.is_empty() {
            return Err(ConsoleError::NoTransform);
        }

        let node = self.node()?;
        let mut state = node.state.write();
        state.transform_cell(x, y, transforms)
    }

    /// The cell the mouse cursor was in at the last tick, or
    /// [`MOUSE_OUTSIDE`] if it was not inside this console
    pub fn mouse_position(&self) -> (i32, i32) {
        match self.node() {
            Ok(node) => node.state.read().mouse,
            Err(_) => MOUSE_OUTSIDE,
        }
    }

    /// Whether the mouse cursor is inside the given area
    pub fn mouse_in_area(&self, x: i32, y: i32, width: i32, height: i32) -> bool {
        mouse_in_area(self.mouse_position(), x, y, width, height)
    }
}

impl NodeState {
    /// Apply transforms to one cell; no transforms means reset to empty
    fn transform_cell(
        &mut self,
        x: i32,
        y: i32,
        transforms: &[Transform],
    ) -> Result<(), ConsoleError> {
        let cell = self
            .buffer
            .checked_position(x, y)
            .and_then(|(col, row)| self.buffer.cell_mut(col, row))
            .ok_or(ConsoleError::OutOfBounds { x, y })?;

        *cell = if transforms.is_empty() {
            Cell::EMPTY
        } else {
            apply_all(transforms, *cell)?
        };
        Ok(())
    }
}

fn mouse_in_area(mouse: (i32, i32), x: i32, y: i32, width: i32, height: i32) -> bool {
    let (mx, my) = mouse;
    mx >= x && my >= y && mx < x + width && my < y + height
}
