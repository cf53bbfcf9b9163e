//! Presentation layer: double-buffered, diff-based terminal renderer.
//!
//! How it works:
//!   1. Compose the next frame into `front` (array of Cell)
//!   2. Compare each cell with `back` (previous frame)
//!   3. Emit terminal commands only for cells that changed, batched with `queue!`
//!   4. Swap front/back
//!
//! Each level tile is two terminal columns wide. Actors are drawn over every
//! tile their bounding box covers.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::{Actor, ActorKind, ActorType, FireballKind};
use crate::domain::tile::Obstacle;
use crate::sim::level::{Level, Status};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Never produced by composition, so every position diffs.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::new(' ', Color::White, bg));
        }
    }
}

// ── Camera ──

/// Viewport into the level, in tiles. Follows the player with a dead zone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Camera {
    pub x: i32,
    pub y: i32,
    pub view_w: usize,
    pub view_h: usize,
}

impl Camera {
    pub fn follow(&mut self, target_x: i32, target_y: i32, world_w: usize, world_h: usize) {
        self.x = follow_axis(self.x, target_x, self.view_w, world_w);
        self.y = follow_axis(self.y, target_y, self.view_h, world_h);
    }
}

/// One axis of the camera: center small worlds, otherwise keep the target
/// inside the middle 60% and clamp to the world.
fn follow_axis(cam: i32, target: i32, view: usize, world: usize) -> i32 {
    let (view, world) = (view as i32, world as i32);
    if view == 0 {
        return cam;
    }
    if world <= view {
        return -((view - world) / 2);
    }
    let margin = view / 5;
    let mut cam = cam;
    if target < cam + margin {
        cam = target - margin;
    } else if target > cam + view - margin - 1 {
        cam = target - view + margin + 1;
    }
    cam.clamp(0, world - view)
}

// ── Renderer ──

const CELL_W: usize = 2;
const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const WALL_BG: Color = Color::Rgb { r: 110, g: 110, b: 120 };
const LAVA_BG: Color = Color::Rgb { r: 190, g: 40, b: 20 };

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    camera: Camera,
    enhanced_keys: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            camera: Camera::default(),
            enhanced_keys: false,
        }
    }

    /// Enter raw mode and the alternate screen. Returns whether the terminal
    /// reports key releases.
    pub fn init(&mut self) -> io::Result<bool> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                self.writer,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            self.enhanced_keys = true;
        }

        self.resize()?;
        Ok(self.enhanced_keys)
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if self.enhanced_keys {
            execute!(self.writer, PopKeyboardEnhancementFlags)?;
        }
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    /// Forget the previous frame: next render repaints everything.
    pub fn invalidate(&mut self) {
        self.back.cells.fill(Cell::INVALID);
    }

    fn resize(&mut self) -> io::Result<bool> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        let (tw, th) = (tw as usize, th as usize);
        if tw == self.front.width && th == self.front.height {
            return Ok(false);
        }
        self.front.resize(tw, th);
        self.back.resize(tw, th);
        self.invalidate();
        queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        Ok(true)
    }

    pub fn render(&mut self, level: &Level, title: &str) -> io::Result<()> {
        self.resize()?;

        let reserved_rows = MAP_ROW + 3;
        self.camera.view_w = (self.front.width / CELL_W).min(level.width());
        self.camera.view_h = self.front.height.saturating_sub(reserved_rows).max(1).min(level.height());
        if let Some(p) = level.player() {
            self.camera.follow(p.pos.x as i32, p.pos.y as i32, level.width(), level.height());
        }

        self.front.clear();
        compose(&mut self.front, &self.camera, level, title);
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }

                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

// ══════════════════════════════════════════════════════════════
// Composition (pure: level → frame buffer)
// ══════════════════════════════════════════════════════════════

fn compose(buf: &mut FrameBuffer, cam: &Camera, level: &Level, title: &str) {
    // ── HUD ──
    let coins = level.count_of(ActorType::Coin);
    let state = match level.status() {
        None => "",
        Some(Status::Won) => "CLEARED!",
        Some(Status::Lost) => "BURNED!",
    };
    buf.fill_row(HUD_ROW, HUD_BG);
    buf.put_str(0, HUD_ROW, &format!(" {title}  Coins left: {coins}  {state}"), Color::White, HUD_BG);

    // ── Terrain ──
    for vy in 0..cam.view_h {
        for vx in 0..cam.view_w {
            let (wx, wy) = (cam.x + vx as i32, cam.y + vy as i32);
            let tile = if wx >= 0 && wy >= 0 {
                level.grid().cell(wx as usize, wy as usize)
            } else {
                None
            };
            let bg = match tile {
                Some(Obstacle::Wall) => WALL_BG,
                Some(Obstacle::Lava) => LAVA_BG,
                None => Cell::BASE_BG,
            };
            put_tile(buf, vx, vy, Cell::new(' ', Color::White, bg));
        }
    }

    // ── Actors (list order; later actors draw on top) ──
    for actor in level.actors() {
        let glyph = actor_glyph(actor);
        let (x0, x1) = (actor.left().floor() as i32, actor.right().ceil() as i32);
        let (y0, y1) = (actor.top().floor() as i32, actor.bottom().ceil() as i32);
        for wy in y0..y1 {
            for wx in x0..x1 {
                let (vx, vy) = (wx - cam.x, wy - cam.y);
                if vx < 0 || vy < 0 || vx as usize >= cam.view_w || vy as usize >= cam.view_h {
                    continue;
                }
                let under = buf.get(vx as usize * CELL_W, MAP_ROW + vy as usize);
                put_tile(buf, vx as usize, vy as usize, Cell::new(glyph.0, glyph.1, under.bg));
            }
        }
    }

    // ── Help bar ──
    let help_row = MAP_ROW + cam.view_h + 1;
    buf.put_str(0, help_row, " ←/→ move  ↑/Space jump  R restart  Q quit", Color::DarkGrey, Cell::BASE_BG);
}

fn put_tile(buf: &mut FrameBuffer, vx: usize, vy: usize, cell: Cell) {
    let col = vx * CELL_W;
    let row = MAP_ROW + vy;
    buf.set(col, row, cell);
    buf.set(col + 1, row, cell);
}

fn actor_glyph(actor: &Actor) -> (char, Color) {
    match actor.kind {
        ActorKind::Base => ('#', Color::Grey),
        ActorKind::Player => ('@', Color::Cyan),
        ActorKind::Coin { .. } => ('o', Color::Yellow),
        ActorKind::Fireball { kind, .. } => match kind {
            FireballKind::Rain => ('v', Color::Red),
            FireballKind::Vertical => ('|', Color::Red),
            FireballKind::Horizontal | FireballKind::Plain => ('=', Color::Red),
        },
    }
}
