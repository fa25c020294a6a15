//! Frame cycle
//!
//! The host calls [`Console::update`] (game-logic tick) and then
//! [`Console::draw`] (render tick) on the root console once per frame.
//! Updates propagate the mouse position and component updates through the
//! tree; drawing composites every console into the host surface: first the
//! console's components draw into its buffer, then its backgrounds, then its
//! glyphs, then its sub-consoles in ascending priority.

use std::sync::Arc;

use parking_lot::Mutex;

use super::{Console, ConsoleError, Handle, HookError, Node, Role, MOUSE_OUTSIDE};
use crate::host::{Game, GlyphKind, Host, Input, Surface};

/// Hook called every tick with the root console and the elapsed seconds
/// per tick
pub type TickHook = Box<dyn FnMut(&Console, f64) -> Result<(), HookError> + Send>;

/// Hook called before or after the console renders, with the root console,
/// the target surface and the elapsed seconds per frame
pub type RenderHook =
    Box<dyn FnMut(&Console, &mut dyn Surface, f64) -> Result<(), HookError> + Send>;

/// State only the root console has
pub(crate) struct RootState {
    title: String,
    show_fps: bool,
    tick_hook: Option<TickHook>,
    pre_render_hook: Option<RenderHook>,
    post_render_hook: Option<RenderHook>,
}

impl RootState {
    pub(crate) fn new(title: String) -> Self {
        Self {
            title,
            show_fps: false,
            tick_hook: None,
            pre_render_hook: None,
            post_render_hook: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum RenderStage {
    Pre,
    Post,
}

fn render_hook_slot(root: &mut RootState, stage: RenderStage) -> &mut Option<RenderHook> {
    match stage {
        RenderStage::Pre => &mut root.pre_render_hook,
        RenderStage::Post => &mut root.post_render_hook,
    }
}

/// `value` if it is a usable duration, otherwise 0
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        0.0
    }
}

/// Seconds per tick, based on the slower of the configured and measured rate
pub fn elapsed_per_tick(input: &dyn Input) -> f64 {
    finite_or_zero(1.0 / input.max_tps().min(input.current_tps()))
}

/// Seconds per frame at the measured frame rate
pub fn elapsed_per_frame(input: &dyn Input) -> f64 {
    finite_or_zero(1.0 / input.current_fps())
}

impl Console {
    /// Root-only state, or an error naming `op` for sub-consoles
    fn root_state(&self, op: &'static str) -> Result<&Mutex<RootState>, ConsoleError> {
        match &self.handle {
            Handle::Root(node) => match &node.role {
                Role::Root(root) => Ok(root),
                Role::Sub { .. } => Err(ConsoleError::NotPermittedOnSubConsole(op)),
            },
            Handle::Sub(_) => Err(ConsoleError::NotPermittedOnSubConsole(op)),
        }
    }

    /// Set a hook that runs every tick, even when drawing is skipped. This
    /// is the place for game logic.
    ///
    /// The hook is stored in the root console, so it gets the root passed
    /// in rather than capturing a root handle. A captured root handle keeps
    /// the whole tree alive.
    pub fn set_tick_hook<F>(&self, hook: F) -> Result<(), ConsoleError>
    where
        F: FnMut(&Console, f64) -> Result<(), HookError> + Send + 'static,
    {
        self.root_state("set_tick_hook")?.lock().tick_hook = Some(Box::new(hook));
        Ok(())
    }

    /// Set a hook that runs before the console renders, e.g. to draw
    /// content below the console
    pub fn set_pre_render_hook<F>(&self, hook: F) -> Result<(), ConsoleError>
    where
        F: FnMut(&Console, &mut dyn Surface, f64) -> Result<(), HookError> + Send + 'static,
    {
        self.root_state("set_pre_render_hook")?.lock().pre_render_hook = Some(Box::new(hook));
        Ok(())
    }

    /// Set a hook that runs after the console finished rendering, e.g. to
    /// draw content over the console
    pub fn set_post_render_hook<F>(&self, hook: F) -> Result<(), ConsoleError>
    where
        F: FnMut(&Console, &mut dyn Surface, f64) -> Result<(), HookError> + Send + 'static,
    {
        self.root_state("set_post_render_hook")?.lock().post_render_hook = Some(Box::new(hook));
        Ok(())
    }

    pub fn has_tick_hook(&self) -> bool {
        self.root_state("has_tick_hook")
            .map(|root| root.lock().tick_hook.is_some())
            .unwrap_or(false)
    }

    /// Window title, `None` for sub-consoles
    pub fn title(&self) -> Option<String> {
        self.root_state("title").ok().map(|root| root.lock().title.clone())
    }

    pub fn set_title(&self, title: impl Into<String>) -> Result<(), ConsoleError> {
        self.root_state("set_title")?.lock().title = title.into();
        Ok(())
    }

    /// Draw the measured frame rate over the console
    pub fn set_show_fps(&self, show: bool) -> Result<(), ConsoleError> {
        self.root_state("set_show_fps")?.lock().show_fps = show;
        Ok(())
    }

    /// Size of the console in pixels
    pub fn pixel_size(&self) -> (u32, u32) {
        let (tile_width, tile_height) = match self.node() {
            Ok(node) => (node.font.tile_width(), node.font.tile_height()),
            Err(_) => (0, 0),
        };
        (
            (self.width as u32).saturating_mul(tile_width),
            (self.height as u32).saturating_mul(tile_height),
        )
    }

    /// Open the host window scaled by `scale` and run the host loop until
    /// it ends. Only the root console can be started.
    pub fn start(&self, scale: f64, host: &mut dyn Host) -> Result<(), ConsoleError> {
        let title = self.root_state("start")?.lock().title.clone();
        let (width, height) = self.pixel_size();

        host.set_window_size(
            (f64::from(width) * scale) as u32,
            (f64::from(height) * scale) as u32,
        );
        host.set_window_title(&title);

        tracing::info!("starting console {:?} ({}x{} cells)", title, self.width, self.height);
        let mut game = self.clone();
        host.run(&mut game)
    }

    /// Game-logic tick: propagate the mouse position and component updates
    /// through the tree, then run the tick hook.
    pub fn update(&self, input: &dyn Input) -> Result<(), ConsoleError> {
        let root = self.root_state("update")?;
        let node = self.node()?;
        let elapsed = elapsed_per_tick(input);

        let (px, py) = input.cursor_position();
        let tile_width = i32::try_from(node.font.tile_width().max(1)).unwrap_or(i32::MAX);
        let tile_height = i32::try_from(node.font.tile_height().max(1)).unwrap_or(i32::MAX);
        node.propagate_mouse(Some((px.div_euclid(tile_width), py.div_euclid(tile_height))));
        node.update_components(input.left_button_just_pressed(), elapsed);

        let hook = root.lock().tick_hook.take();
        if let Some(mut hook) = hook {
            let result = hook(self, elapsed);
            let mut root = root.lock();
            if root.tick_hook.is_none() {
                root.tick_hook = Some(hook);
            }
            result.map_err(ConsoleError::Hook)?;
        }

        Ok(())
    }

    /// Render tick: pre-render hook, the console tree, post-render hook and
    /// the optional frame rate overlay.
    pub fn draw(&self, surface: &mut dyn Surface, input: &dyn Input) -> Result<(), ConsoleError> {
        let root = self.root_state("draw")?;
        let node = self.node()?;
        let elapsed = elapsed_per_frame(input);

        run_render_hook(self, root, RenderStage::Pre, surface, elapsed)?;
        node.composite(surface, elapsed, 0, 0);
        run_render_hook(self, root, RenderStage::Post, surface, elapsed)?;

        if root.lock().show_fps {
            surface.debug_text(&format!("FPS: {:.2}", input.current_fps()));
        }

        Ok(())
    }
}

fn run_render_hook(
    console: &Console,
    root: &Mutex<RootState>,
    stage: RenderStage,
    surface: &mut dyn Surface,
    elapsed: f64,
) -> Result<(), ConsoleError> {
    let hook = render_hook_slot(&mut root.lock(), stage).take();
    let Some(mut hook) = hook else {
        return Ok(());
    };

    let result = hook(console, surface, elapsed);
    let mut root = root.lock();
    let slot = render_hook_slot(&mut root, stage);
    if slot.is_none() {
        *slot = Some(hook);
    }
    result.map_err(|err| {
        tracing::warn!("{:?} render hook failed: {}", stage, err);
        ConsoleError::Hook(err)
    })
}

impl Game for Console {
    fn update(&mut self, input: &dyn Input) -> Result<(), ConsoleError> {
        Console::update(self, input)
    }

    fn draw(&mut self, surface: &mut dyn Surface, input: &dyn Input) -> Result<(), ConsoleError> {
        Console::draw(self, surface, input)
    }

    fn layout(&self, _outside_width: u32, _outside_height: u32) -> (u32, u32) {
        self.pixel_size()
    }
}

impl Node {
    /// Store the local mouse cell and pass it on to sub-consoles.
    /// `None` means the cursor is outside this console.
    fn propagate_mouse(&self, position: Option<(i32, i32)>) {
        let inside = position
            .filter(|&(x, y)| x >= 0 && y >= 0 && x < self.width && y < self.height);

        let children: Vec<_> = {
            let mut state = self.state.write();
            state.mouse = inside.unwrap_or(MOUSE_OUTSIDE);
            state
                .children
                .iter()
                .map(|child| (Arc::clone(&child.node), child.x, child.y))
                .collect()
        };

        for (child, x, y) in children {
            child.propagate_mouse(inside.map(|(mx, my)| (mx - x, my - y)));
        }
    }

    /// Draw this console and its sub-consoles with the top-left corner at
    /// cell `(origin_x, origin_y)` of the surface
    fn composite(
        self: &Arc<Node>,
        surface: &mut dyn Surface,
        elapsed: f64,
        origin_x: i32,
        origin_y: i32,
    ) {
        self.draw_components(elapsed);

        let tile_width = f64::from(self.font.tile_width());
        let tile_height = f64::from(self.font.tile_height());
        let pixel = |col: usize, row: usize| {
            (
                f64::from(origin_x + col as i32) * tile_width,
                f64::from(origin_y + row as i32) * tile_height,
            )
        };

        let children: Vec<_> = {
            let state = self.state.read();

            for (col, row, cell) in state.buffer.iter() {
                if cell.bg.is_transparent() {
                    continue;
                }
                let (x, y) = pixel(col, row);
                surface.fill_rect(x, y, tile_width, tile_height, cell.bg);
            }

            for (col, row, cell) in state.buffer.iter() {
                let Some(kind) = self.font.glyph_kind(cell.ch) else {
                    continue;
                };
                let tint = match kind {
                    GlyphKind::Tile => None,
                    GlyphKind::Glyph => Some(cell.fg),
                };
                let (x, y) = pixel(col, row);
                surface.draw_glyph(cell.ch, kind, x, y, tint);
            }

            state
                .children
                .iter()
                .map(|child| (Arc::clone(&child.node), child.x, child.y))
                .collect()
        };

        for (child, x, y) in children {
            child.composite(surface, elapsed, origin_x + x, origin_y + y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::tests::root;
    use crate::headless::{InputState, MonospaceFont};

    struct NoInput;

    impl Input for NoInput {
        fn cursor_position(&self) -> (i32, i32) {
            (0, 0)
        }

        fn left_button_just_pressed(&self) -> bool {
            false
        }

        fn current_tps(&self) -> f64 {
            0.0
        }

        fn max_tps(&self) -> f64 {
            60.0
        }

        fn current_fps(&self) -> f64 {
            0.0
        }
    }

    #[test]
    fn test_elapsed_clamps_to_zero() {
        assert_eq!(elapsed_per_tick(&NoInput), 0.0);
        assert_eq!(elapsed_per_frame(&NoInput), 0.0);
    }

    #[test]
    fn test_elapsed_uses_slower_rate() {
        let input = InputState {
            tps: 30.0,
            max_tps: 60.0,
            fps: 50.0,
            ..InputState::default()
        };
        assert_eq!(elapsed_per_tick(&input), 1.0 / 30.0);
        assert_eq!(elapsed_per_frame(&input), 1.0 / 50.0);
    }

    #[test]
    fn test_root_only_operations_on_sub_console() {
        let console = root(10, 10);
        let sub = console.create_sub_console(0, 0, 5, 5).unwrap();

        assert!(matches!(
            sub.set_tick_hook(|_, _| Ok(())),
            Err(ConsoleError::NotPermittedOnSubConsole("set_tick_hook"))
        ));
        assert!(matches!(
            sub.set_pre_render_hook(|_, _, _| Ok(())),
            Err(ConsoleError::NotPermittedOnSubConsole(_))
        ));
        assert!(matches!(
            sub.set_post_render_hook(|_, _, _| Ok(())),
            Err(ConsoleError::NotPermittedOnSubConsole(_))
        ));
        assert!(!sub.has_tick_hook());
        assert_eq!(sub.title(), None);
        assert!(sub.set_title("x").is_err());
        assert!(sub.update(&NoInput).is_err());
    }

    #[test]
    fn test_mouse_propagation() {
        let console = root(10, 10);
        let sub = console.create_sub_console(2, 3, 4, 4).unwrap();
        let nested = sub.create_sub_console(1, 1, 2, 2).unwrap();
        let node = console.node().unwrap();

        node.propagate_mouse(Some((2, 3)));
        assert_eq!(console.mouse_position(), (2, 3));
        assert_eq!(sub.mouse_position(), (0, 0));
        assert_eq!(nested.mouse_position(), MOUSE_OUTSIDE);

        node.propagate_mouse(Some((4, 5)));
        assert_eq!(nested.mouse_position(), (1, 1));
        assert!(nested.mouse_in_area(1, 1, 1, 1));

        node.propagate_mouse(Some((1, 3)));
        assert_eq!(sub.mouse_position(), MOUSE_OUTSIDE);
        assert_eq!(nested.mouse_position(), MOUSE_OUTSIDE);

        node.propagate_mouse(Some((10, 0)));
        assert_eq!(console.mouse_position(), MOUSE_OUTSIDE);
    }

    #[test]
    fn test_update_converts_pixels_to_cells() {
        let console = root(10, 10);
        let input = InputState {
            cursor: (17, 33),
            ..InputState::default()
        };
        console.update(&input).unwrap();
        // 8x16 tiles
        assert_eq!(console.mouse_position(), (2, 2));

        let input = InputState {
            cursor: (-3, 5),
            ..InputState::default()
        };
        console.update(&input).unwrap();
        assert_eq!(console.mouse_position(), MOUSE_OUTSIDE);
    }

    #[test]
    fn test_tick_hook_error_propagates() {
        let console = root(4, 4);
        console
            .set_tick_hook(|_, _| Err("game over".into()))
            .unwrap();
        let err = console.update(&InputState::default()).unwrap_err();
        assert!(matches!(err, ConsoleError::Hook(_)));
        assert!(console.has_tick_hook());
    }

    #[test]
    fn test_tick_hook_may_mutate_console() {
        let console = root(4, 4);
        console
            .set_tick_hook(|root, _| {
                root.print(0, 0, "t", &[])?;
                Ok(())
            })
            .unwrap();
        console.update(&InputState::default()).unwrap();
        assert_eq!(console.cell(0, 0).unwrap().ch, 't');
    }

    #[test]
    fn test_hooks_do_not_keep_tree_alive() {
        let console = root(4, 4);
        let sub = console.create_sub_console(0, 0, 2, 2).unwrap();
        console
            .set_tick_hook(|root, _| {
                root.clear_all()?;
                Ok(())
            })
            .unwrap();
        console
            .set_post_render_hook(|root, surface, _| {
                surface.debug_text(&format!("{}x{}", root.width(), root.height()));
                Ok(())
            })
            .unwrap();
        console.update(&InputState::default()).unwrap();
        assert!(sub.is_attached());

        drop(console);
        assert!(!sub.is_attached());
    }

    #[test]
    fn test_pixel_size() {
        let console = root(10, 5);
        assert_eq!(console.pixel_size(), (80, 80));
        assert_eq!(Game::layout(&console, 1, 1), (80, 80));
    }

    #[test]
    fn test_pixel_size_saturates() {
        let font = MonospaceFont::new(u32::MAX, 16);
        let console = Console::new(3, 2, Arc::new(font), "huge").unwrap();
        assert_eq!(console.pixel_size(), (u32::MAX, 32));

        // Pixel to cell conversion still works with an oversized tile
        console.update(&InputState::default()).unwrap();
        assert_eq!(console.mouse_position(), (0, 0));
    }
}
