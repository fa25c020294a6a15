//! Tessera Console Engine
//!
//! A character-grid console engine for tile-based games and text UIs.
//! This crate provides:
//!
//! - `core`: Colors, cells, cell transforms and buffer snapshots
//! - `markup`: Inline color tag parser (`[[f:#rrggbb]]text`)
//! - `console`: Console tree with sub-consoles, priorities, components and
//!   frame hooks, plus markup-aware text layout
//! - `host`: Interfaces a windowing runtime implements to drive a console
//! - `headless`: A windowless host, recording surface and monospace font
//! - `app`: Configuration

pub mod app;
pub mod console;
pub mod core;
pub mod headless;
pub mod host;
pub mod markup;

pub use app::{Config, ConfigError};
pub use console::{Component, Console, ConsoleError, HookError, MOUSE_OUTSIDE};
pub use core::{Cell, Color, ColorError, Snapshot, Transform, TransformError};
pub use host::{Font, Game, GlyphKind, Host, Input, Surface};
