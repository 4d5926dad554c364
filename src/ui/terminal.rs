/// Terminal surface: rasterizes draw calls into a cell grid and writes
/// only the cells that changed since the last frame.
///
/// How it works:
///   1. Draw calls paint into the `front` buffer, scaled from the
///      720×480 canvas to the terminal size
///   2. `present` compares each cell with the `back` buffer
///   3. Only changed cells produce terminal commands, batched with `queue!`
///   4. Flush once, then swap front/back
///
/// Image keys are not loaded. Each key gets a `Look` (glyph, colours and
/// the part of its rectangle it covers), worked out once and cached.

use std::collections::HashMap;
use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::geometry::Rect;
use crate::error::GameError;

use super::renderer::{Surface, CANVAS_HEIGHT, CANVAS_WIDTH, GAME_OVER_IMAGE, WIN_IMAGE};

// ── Cell ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit background for empty cells. Using the same RGB for
    /// `Clear` and every blank cell keeps VTE terminals from showing
    /// gaps between rows.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Differs from every real cell; forces a full repaint.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };
}

// ── FrameBuffer ──

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

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut Cell> {
        if x < self.width && y < self.height {
            Some(&mut self.cells[y * self.width + x])
        } else {
            None
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if let Some(cell) = self.get_mut(x + i, y) {
                *cell = Cell { ch, fg, bg };
            }
        }
    }
}

// ── Looks ──

#[derive(Clone, Copy, PartialEq, Debug)]
enum Paint {
    /// Fill the covered area with the glyph.
    Fill,
    /// HUD bar: filled share from the percentage in the key.
    Bar(i32),
    /// Full-screen message.
    Screen(&'static str),
}

#[derive(Clone, Copy, PartialEq, Debug)]
struct Look {
    paint: Paint,
    glyph: char,
    fg: Color,
    /// `None` keeps whatever is underneath.
    bg: Option<Color>,
    /// Covered part of the rectangle as (left, right, top, bottom) fractions.
    area: (f32, f32, f32, f32),
    /// Draw a facing marker on the leading edge.
    facing: bool,
}

impl Look {
    const fn fill(glyph: char, fg: Color, bg: Option<Color>, area: (f32, f32, f32, f32)) -> Self {
        Look { paint: Paint::Fill, glyph, fg, bg, area, facing: false }
    }

    const fn facing(mut self) -> Self {
        self.facing = true;
        self
    }
}

const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb { r, g, b }
}

const FULL: (f32, f32, f32, f32) = (0.0, 1.0, 0.0, 1.0);

fn look_for(img: &str) -> Look {
    if img == GAME_OVER_IMAGE {
        return Look { paint: Paint::Screen("GAME OVER   [r] restart   [q] quit"), ..Look::fill(' ', rgb(255, 80, 80), Some(rgb(20, 10, 10)), FULL) };
    }
    if img == WIN_IMAGE {
        return Look { paint: Paint::Screen("YOU WIN!   [r] play again   [q] quit"), ..Look::fill(' ', rgb(255, 220, 60), Some(rgb(10, 30, 10)), FULL) };
    }
    if img.contains("7_statusbars") {
        let fg = if img.contains("health") {
            rgb(80, 220, 80)
        } else if img.contains("coin") {
            rgb(250, 210, 50)
        } else if img.contains("bottle") {
            rgb(230, 90, 40)
        } else {
            rgb(255, 140, 0)
        };
        let pct = trailing_number(img).unwrap_or(0);
        return Look { paint: Paint::Bar(pct), ..Look::fill('█', fg, None, (0.05, 0.95, 0.3, 0.7)) };
    }

    if img.contains("layers/air") {
        Look::fill(' ', Color::White, Some(rgb(120, 180, 230)), FULL)
    } else if img.contains("3_third_layer") {
        Look::fill('^', rgb(150, 140, 110), Some(rgb(190, 170, 120)), (0.0, 1.0, 0.55, 1.0))
    } else if img.contains("2_second_layer") {
        Look::fill('^', rgb(120, 100, 70), Some(rgb(170, 140, 90)), (0.0, 1.0, 0.7, 1.0))
    } else if img.contains("1_first_layer") {
        Look::fill('#', rgb(90, 60, 30), Some(rgb(140, 100, 60)), (0.0, 1.0, 0.88, 1.0))
    } else if img.contains("4_clouds") {
        Look::fill('~', rgb(200, 200, 210), Some(rgb(235, 240, 245)), (0.05, 0.95, 0.2, 0.6))
    } else if img.contains("2_character_pepe") {
        let fg = if img.contains("4_hurt") || img.contains("5_dead") {
            rgb(255, 90, 90)
        } else {
            rgb(250, 220, 120)
        };
        Look::fill('@', fg, None, (0.1, 0.9, 0.35, 0.97)).facing()
    } else if img.contains("4_enemie_boss_chicken") {
        Look::fill('W', rgb(230, 80, 60), None, (0.05, 0.95, 0.15, 1.0)).facing()
    } else if img.contains("chicken_small") {
        let glyph = if img.contains("dead") { 'x' } else { 'v' };
        Look::fill(glyph, rgb(240, 200, 120), None, (0.0, 1.0, 0.05, 1.0))
    } else if img.contains("3_enemies_chicken") {
        let glyph = if img.contains("dead") { 'x' } else { 'V' };
        Look::fill(glyph, rgb(200, 150, 90), None, (0.0, 1.0, 0.05, 1.0))
    } else if img.contains("8_coin") {
        Look::fill('o', rgb(255, 215, 0), None, (0.3, 0.7, 0.3, 0.7))
    } else if img.contains("bottle_splash") {
        Look::fill('*', rgb(255, 60, 30), None, FULL)
    } else if img.contains("6_salsa_bottle") {
        Look::fill('!', rgb(220, 40, 40), None, (0.2, 0.8, 0.1, 0.9))
    } else {
        Look::fill('?', Color::Magenta, None, FULL)
    }
}

/// `.../green/60.png` → 60, `.../orange80.png` → 80.
fn trailing_number(img: &str) -> Option<i32> {
    let stem = img.rsplit('/').next()?.split('.').next()?;
    let digits = stem.trim_start_matches(|c: char| !c.is_ascii_digit());
    digits.parse().ok()
}

// ── Surface ──

pub struct TerminalSurface {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    offset_x: f32,
    looks: HashMap<&'static str, Look>,
    full_repaint: bool,
    key_releases: bool,
}

impl TerminalSurface {
    pub fn new() -> Self {
        TerminalSurface {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            offset_x: 0.0,
            looks: HashMap::new(),
            full_repaint: true,
            key_releases: false,
        }
    }

    pub fn init(&mut self) -> Result<(), GameError> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;
        self.fit_terminal();
        Ok(())
    }

    /// Ask the terminal to report key releases. Returns whether it will.
    pub fn enable_key_releases(&mut self) -> bool {
        if !matches!(terminal::supports_keyboard_enhancement(), Ok(true)) {
            return false;
        }
        let flags = KeyboardEnhancementFlags::REPORT_EVENT_TYPES;
        self.key_releases = execute!(self.writer, PushKeyboardEnhancementFlags(flags)).is_ok();
        self.key_releases
    }

    pub fn cleanup(&mut self) -> Result<(), GameError> {
        if self.key_releases {
            execute!(self.writer, PopKeyboardEnhancementFlags)?;
            self.key_releases = false;
        }
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Centered one-line message on top of the last frame (pause notice).
    pub fn banner(&mut self, text: &str) {
        let width = text.chars().count() + 4;
        let x = self.front.width.saturating_sub(width) / 2;
        let y = self.front.height / 2;
        let padded = format!("  {text}  ");
        self.front.put_str(x, y, &padded, rgb(255, 220, 50), rgb(40, 40, 40));
    }

    /// Write the changed cells, then keep this frame as the diff base.
    pub fn present(&mut self) -> Result<(), GameError> {
        if self.full_repaint {
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.full_repaint = false;
        }
        self.flush_diff()?;
        self.back.cells.clone_from(&self.front.cells);
        Ok(())
    }

    fn fit_terminal(&mut self) {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        let (w, h) = (tw as usize, th as usize);
        if w != self.front.width || h != self.front.height || self.full_repaint {
            self.front.resize(w, h);
            self.back.resize(w, h);
            self.back.cells.fill(Cell::INVALID);
            self.full_repaint = true;
        }
    }

    fn look(&mut self, img: &'static str) -> Look {
        *self.looks.entry(img).or_insert_with(|| look_for(img))
    }

    /// Canvas rectangle → cell range, clipped to the buffer.
    fn cell_span(&self, left: f32, right: f32, top: f32, bottom: f32) -> (usize, usize, usize, usize) {
        let sx = self.front.width as f32 / CANVAS_WIDTH;
        let sy = self.front.height as f32 / CANVAS_HEIGHT;
        let clamp_x = |v: f32| (v * sx).round().clamp(0.0, self.front.width as f32) as usize;
        let clamp_y = |v: f32| (v * sy).round().clamp(0.0, self.front.height as f32) as usize;
        (clamp_x(left), clamp_x(right), clamp_y(top), clamp_y(bottom))
    }

    fn paint(&mut self, look: Look, rect: Rect, mirrored: bool) {
        let (l, r, t, b) = look.area;
        let left = rect.x + rect.width * l;
        let right = rect.x + rect.width * r;
        let top = rect.y + rect.height * t;
        let bottom = rect.y + rect.height * b;
        let (x0, x1, y0, y1) = self.cell_span(left, right, top, bottom);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let filled_to = match look.paint {
            Paint::Bar(pct) => x0 + (x1 - x0) * pct.clamp(0, 100) as usize / 100,
            _ => x1,
        };

        for y in y0..y1 {
            for x in x0..x1 {
                let Some(cell) = self.front.get_mut(x, y) else { continue };
                let ch = if x < filled_to { look.glyph } else { '░' };
                cell.ch = ch;
                cell.fg = look.fg;
                if let Some(bg) = look.bg {
                    cell.bg = bg;
                }
            }
        }

        if look.facing {
            let (edge, marker) = if mirrored { (x0, '<') } else { (x1 - 1, '>') };
            if let Some(cell) = self.front.get_mut(edge, y0) {
                cell.ch = marker;
            }
        }

        if let Paint::Screen(text) = look.paint {
            let bg = look.bg.unwrap_or(Cell::BASE_BG);
            let x = self.front.width.saturating_sub(text.chars().count()) / 2;
            self.front.put_str(x, self.front.height / 2, text, look.fg, bg);
        }
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut cursor: Option<(usize, usize)> = None;

        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }
                if cursor != Some((x, y)) {
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
                cursor = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }
}

impl Surface for TerminalSurface {
    fn clear(&mut self) {
        self.fit_terminal();
        self.front.clear();
        self.offset_x = 0.0;
    }

    fn translate(&mut self, dx: f32) {
        self.offset_x += dx;
    }

    fn draw_image(&mut self, img: &'static str, rect: Rect, mirrored: bool) {
        let look = self.look(img);
        let shifted = Rect { x: rect.x + self.offset_x, ..rect };
        self.paint(look, shifted, mirrored);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_percentages_come_from_the_key() {
        assert_eq!(trailing_number("img/7_statusbars/1_statusbar/2_statusbar_health/green/60.png"), Some(60));
        assert_eq!(trailing_number("img/7_statusbars/2_statusbar_endboss/orange/orange80.png"), Some(80));
        assert_eq!(trailing_number("img/8_coin/coin.png"), None);
    }

    #[test]
    fn looks_by_family() {
        assert_eq!(look_for("img/2_character_pepe/2_walk/W-21.png").glyph, '@');
        assert!(look_for("img/2_character_pepe/2_walk/W-21.png").facing);
        assert_eq!(look_for("img/3_enemies_chicken/chicken_small/2_dead/dead.png").glyph, 'x');
        assert_eq!(look_for("img/6_salsa_bottle/bottle_rotation/bottle_splash/1_bottle_splash.png").glyph, '*');
        assert!(matches!(look_for(GAME_OVER_IMAGE).paint, Paint::Screen(_)));
        assert_eq!(
            look_for("img/7_statusbars/1_statusbar/1_statusbar_coin/green/40.png").paint,
            Paint::Bar(40)
        );
    }

    #[test]
    fn translated_draws_land_shifted() {
        let mut s = TerminalSurface::new();
        s.front.resize(72, 48);
        s.translate(-100.0);
        s.draw_image("img/8_coin/coin_1.png", Rect::new(100.0, 0.0, 100.0, 100.0), false);
        // coin covers 0.3..0.7 of the rect: canvas x 30..70 → cells 3..7
        assert_eq!(s.front.get(3, 4).ch, 'o');
        assert_eq!(s.front.get(2, 4).ch, ' ');
        assert_eq!(s.front.get(7, 4).ch, ' ');
    }

    #[test]
    fn partial_bar_shows_remaining_track() {
        let mut s = TerminalSurface::new();
        s.front.resize(72, 48);
        s.draw_image(
            "img/7_statusbars/1_statusbar/2_statusbar_health/green/40.png",
            Rect::new(0.0, 0.0, 200.0, 60.0),
            false,
        );
        let row: String = (0..20).map(|x| s.front.get(x, 3).ch).collect();
        assert!(row.contains('█'));
        assert!(row.contains('░'));
    }
}
