//! Rendering layer: all terminal I/O lives here.
//!
//! The world is drawn through the camera at a fixed scale of world units per
//! terminal cell. Nothing here changes game state; this module only
//! translates it into terminal commands.

use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use wave_survivor::camera::Camera;
use wave_survivor::compute::GameState;
use wave_survivor::entities::{Bounds, Enemy, EnemyRole, GameStatus, PowerupKind, Rect, UpgradeKind};
use wave_survivor::constants::MAX_UPGRADE_LEVEL;
use wave_survivor::hooks::Renderer;

// ── Scale ─────────────────────────────────────────────────────────────────────

/// World units covered by one terminal column.
pub const CELL_W: f32 = 16.0;
/// World units covered by one terminal row. Cells are roughly twice as tall as wide.
pub const CELL_H: f32 = 32.0;

/// Viewport size in world units for a `cols × rows` terminal. Row 0 is the
/// HUD, rows 1 and `rows - 2` are the border, the last row is the hint line.
pub fn view_size(cols: u16, rows: u16) -> (f32, f32) {
    (
        f32::from(cols.saturating_sub(2)) * CELL_W,
        f32::from(rows.saturating_sub(4)) * CELL_H,
    )
}

/// World point under the centre of a terminal cell, or `None` outside the
/// play area.
pub fn cell_to_world(camera: &Camera, cols: u16, rows: u16, col: u16, row: u16) -> Option<(f32, f32)> {
    if col < 1 || col >= cols.saturating_sub(1) || row < 2 || row >= rows.saturating_sub(2) {
        return None;
    }
    let vx = (f32::from(col - 1) + 0.5) * CELL_W;
    let vy = (f32::from(row - 2) + 0.5) * CELL_H;
    Some(camera.to_world(vx, vy))
}

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_HEALTH: Color = Color::Red;
const C_HUD_AMMO: Color = Color::Cyan;
const C_HUD_STAMINA: Color = Color::Green;
const C_PLAYER: Color = Color::White;
const C_PLAYER_IMMUNE: Color = Color::Cyan;
const C_HIT_FLASH: Color = Color::White;
const C_BULLET: Color = Color::Cyan;
const C_BULLET_DOUBLE: Color = Color::Yellow;
const C_PROJECTILE: Color = Color::Magenta;
const C_HEALTH_BAR: Color = Color::Green;
const C_HEALTH_BAR_EMPTY: Color = Color::DarkGrey;
const C_HINT: Color = Color::DarkGrey;
const C_BANNER: Color = Color::Yellow;
const C_BUFF: Color = Color::Yellow;

/// Catalog colour names, or `#rrggbb`.
fn named_color(name: &str) -> Color {
    match name.to_ascii_lowercase().as_str() {
        "red" => Color::Red,
        "darkred" | "brown" => Color::DarkRed,
        "orange" => Color::DarkYellow,
        "yellow" => Color::Yellow,
        "green" => Color::Green,
        "darkgreen" => Color::DarkGreen,
        "blue" => Color::Blue,
        "cyan" => Color::Cyan,
        "purple" | "magenta" => Color::Magenta,
        "white" => Color::White,
        "gray" | "grey" => Color::Grey,
        "black" => Color::DarkGrey,
        other => parse_hex(other).unwrap_or(Color::Red),
    }
}

fn parse_hex(s: &str) -> Option<Color> {
    let s = s.strip_prefix('#')?;
    if s.len() != 6 || !s.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&s[0..2], 16).ok()?;
    let g = u8::from_str_radix(&s[2..4], 16).ok()?;
    let b = u8::from_str_radix(&s[4..6], 16).ok()?;
    Some(Color::Rgb { r, g, b })
}

// ── Renderer ──────────────────────────────────────────────────────────────────

pub struct TerminalRenderer<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    pub best_score: u32,
    /// Transient message shown on the hint line.
    pub banner: Option<String>,
    error: Option<io::Error>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, cols: u16, rows: u16, best_score: u32) -> Self {
        TerminalRenderer { out, cols, rows, best_score, banner: None, error: None }
    }

    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    /// Surface the first I/O error hit while drawing from inside `tick`.
    pub fn take_error(&mut self) -> io::Result<()> {
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Render one complete frame, overlays included.
    pub fn render(&mut self, state: &GameState) -> io::Result<()> {
        let view = View { camera: state.camera, cols: self.cols, rows: self.rows };
        let out = &mut self.out;
        out.queue(terminal::Clear(terminal::ClearType::All))?;

        draw_border(out, &view)?;
        draw_hud(out, state, self.cols, self.best_score)?;

        for powerup in &state.store.powerups {
            let (glyph, color) = powerup_glyph(powerup.kind);
            fill(out, &view, powerup.rect(), glyph, color)?;
        }
        for enemy in &state.store.enemies {
            draw_enemy(out, &view, enemy)?;
        }
        for bullet in &state.store.bullets {
            let color = if bullet.double { C_BULLET_DOUBLE } else { C_BULLET };
            fill(out, &view, bullet.rect(), '•', color)?;
        }
        for projectile in &state.store.projectiles {
            fill(out, &view, projectile.rect(), '*', C_PROJECTILE)?;
        }
        let player_color = if state.player.immune { C_PLAYER_IMMUNE } else { C_PLAYER };
        fill(out, &view, state.player.rect(), '@', player_color)?;

        draw_hint(out, self.rows, self.banner.as_deref())?;

        match state.status {
            GameStatus::Over { victory } => draw_game_over(out, &view, state.score, self.best_score, victory)?,
            GameStatus::Upgrading { picks_left } => draw_upgrades(out, &view, state, picks_left)?,
            _ if state.paused => draw_paused(out, &view)?,
            _ => {}
        }

        out.queue(style::ResetColor)?;
        out.queue(cursor::MoveTo(0, self.rows.saturating_sub(1)))?;
        out.flush()
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn draw(&mut self, state: &GameState) {
        if let Err(err) = self.render(state) {
            self.error.get_or_insert(err);
        }
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

struct View {
    camera: Camera,
    cols: u16,
    rows: u16,
}

impl View {
    fn play_cols(&self) -> i32 {
        i32::from(self.cols.saturating_sub(2))
    }

    fn play_rows(&self) -> i32 {
        i32::from(self.rows.saturating_sub(4))
    }

    /// Cell range `(c0, r0, c1, r1)` a world rect covers, in play-area cells,
    /// unclipped. Every rect covers at least one cell.
    fn cells(&self, r: Rect) -> (i32, i32, i32, i32) {
        let (vx, vy) = self.camera.to_view(r.x, r.y);
        let c0 = (vx / CELL_W).floor() as i32;
        let r0 = (vy / CELL_H).floor() as i32;
        let c1 = (((vx + r.w) / CELL_W).ceil() as i32 - 1).max(c0);
        let r1 = (((vy + r.h) / CELL_H).ceil() as i32 - 1).max(r0);
        (c0, r0, c1, r1)
    }
}

/// Paint every visible cell covered by `rect` with `glyph`.
fn fill<W: Write>(out: &mut W, view: &View, rect: Rect, glyph: char, color: Color) -> io::Result<()> {
    let (c0, r0, c1, r1) = view.cells(rect);
    let c0 = c0.max(0);
    let c1 = c1.min(view.play_cols() - 1);
    if c0 > c1 {
        return Ok(());
    }
    out.queue(style::SetForegroundColor(color))?;
    let run: String = std::iter::repeat(glyph).take((c1 - c0 + 1) as usize).collect();
    for row in r0.max(0)..=r1.min(view.play_rows() - 1) {
        out.queue(cursor::MoveTo((c0 + 1) as u16, (row + 2) as u16))?;
        out.queue(Print(&run))?;
    }
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &View) -> io::Result<()> {
    let w = view.cols as usize;
    let h = view.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, cols: u16, best: u32) -> io::Result<()> {
    let p = &state.player;

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!(
        "Score:{:>6}  Hi:{:>6}  Wave {}/{}  ",
        state.score,
        best.max(state.score),
        state.waves.wave_number(),
        state.wave_table.len()
    )))?;

    out.queue(style::SetForegroundColor(C_HUD_HEALTH))?;
    out.queue(Print(format!("HP {}/{}  ", p.health, p.max_health)))?;

    out.queue(style::SetForegroundColor(C_HUD_AMMO))?;
    let reloading = if p.is_reloading { " RELOADING" } else { "" };
    out.queue(Print(format!("Ammo {}/{}{}  ", p.ammo, p.reserve_ammo, reloading)))?;

    out.queue(style::SetForegroundColor(C_HUD_STAMINA))?;
    let pct = (p.stamina / p.max_stamina * 100.0).round() as u32;
    out.queue(Print(format!("Stamina {:>3}%", pct)))?;

    let mut buffs = String::new();
    if p.double_damage {
        buffs.push_str("[2x DMG]");
    }
    if p.immune {
        buffs.push_str("[IMMUNE]");
    }
    if p.triple_shot {
        buffs.push_str("[TRIPLE]");
    }
    if !buffs.is_empty() {
        let x = cols.saturating_sub(buffs.chars().count() as u16 + 1);
        out.queue(cursor::MoveTo(x, 0))?;
        out.queue(style::SetForegroundColor(C_BUFF))?;
        out.queue(Print(&buffs))?;
    }
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_enemy<W: Write>(out: &mut W, view: &View, enemy: &Enemy) -> io::Result<()> {
    let glyph = match enemy.role {
        EnemyRole::Plain => '█',
        EnemyRole::Summoner => '¤',
        EnemyRole::Juggernaut => '▓',
        EnemyRole::Thrower => '§',
        EnemyRole::Spitter => '▒',
    };
    let color = if enemy.hit_flash > 0 { C_HIT_FLASH } else { named_color(&enemy.color) };
    fill(out, view, enemy.rect(), glyph, color)?;

    // Health bar on the row above, only once damaged.
    if enemy.health >= enemy.max_health || enemy.max_health <= 0 {
        return Ok(());
    }
    let (c0, r0, c1, _) = view.cells(enemy.rect());
    let bar_row = r0 - 1;
    if bar_row < 0 || bar_row >= view.play_rows() || c0 < 0 || c1 >= view.play_cols() {
        return Ok(());
    }
    let width = (c1 - c0 + 1) as usize;
    let filled = ((enemy.health.max(0) as f32 / enemy.max_health as f32) * width as f32).ceil() as usize;
    out.queue(cursor::MoveTo((c0 + 1) as u16, (bar_row + 2) as u16))?;
    out.queue(style::SetForegroundColor(C_HEALTH_BAR))?;
    out.queue(Print("▬".repeat(filled)))?;
    out.queue(style::SetForegroundColor(C_HEALTH_BAR_EMPTY))?;
    out.queue(Print("▬".repeat(width.saturating_sub(filled))))?;
    Ok(())
}

fn powerup_glyph(kind: PowerupKind) -> (char, Color) {
    let glyph = match kind {
        PowerupKind::Ammo => 'A',
        PowerupKind::Health => '♥',
        PowerupKind::DoubleDamage => 'D',
        PowerupKind::Immunity => 'I',
        PowerupKind::TripleShot => 'T',
    };
    (glyph, named_color(kind.color()))
}

// ── Hint line (last row) ──────────────────────────────────────────────────────

fn draw_hint<W: Write>(out: &mut W, rows: u16, banner: Option<&str>) -> io::Result<()> {
    out.queue(cursor::MoveTo(1, rows.saturating_sub(1)))?;
    match banner {
        Some(text) => {
            out.queue(style::SetForegroundColor(C_BANNER))?;
            out.queue(Print(text))?;
        }
        None => {
            out.queue(style::SetForegroundColor(C_HINT))?;
            out.queue(Print(
                "WASD : Move (SHIFT sprint)   Arrows / Click : Shoot   R : Reload   P : Pause   Q : Quit",
            ))?;
        }
    }
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

/// Centre a block of coloured lines over the play area.
fn draw_box<W: Write>(out: &mut W, view: &View, lines: &[(String, Color)]) -> io::Result<()> {
    let cx = view.cols / 2;
    let start_row = (view.rows / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }
    Ok(())
}

fn draw_paused<W: Write>(out: &mut W, view: &View) -> io::Result<()> {
    let lines = [
        ("╔════════════════════╗".to_string(), Color::Cyan),
        ("║       PAUSED       ║".to_string(), Color::Cyan),
        ("╚════════════════════╝".to_string(), Color::Cyan),
        ("P / Esc - Resume   Q - Quit".to_string(), Color::White),
    ];
    draw_box(out, view, &lines)
}

fn draw_upgrades<W: Write>(out: &mut W, view: &View, state: &GameState, picks_left: u8) -> io::Result<()> {
    let mut lines = vec![
        ("╔════════════════════╗".to_string(), Color::Green),
        ("║      UPGRADES      ║".to_string(), Color::Green),
        ("╚════════════════════╝".to_string(), Color::Green),
        (format!("Picks left: {picks_left}"), Color::Yellow),
    ];
    for (i, kind) in UpgradeKind::ALL.iter().enumerate() {
        let level = state.player.upgrades.get(*kind);
        let pips: String = (0..MAX_UPGRADE_LEVEL).map(|l| if l < level { '■' } else { '□' }).collect();
        let color = if level >= MAX_UPGRADE_LEVEL { Color::DarkGrey } else { Color::White };
        lines.push((format!("[{}] {:<10} {}", i + 1, kind.label(), pips), color));
    }
    draw_box(out, view, &lines)
}

fn draw_game_over<W: Write>(out: &mut W, view: &View, score: u32, best: u32, victory: bool) -> io::Result<()> {
    let (title, title_color) = if victory {
        ("║      VICTORY!      ║", Color::Green)
    } else {
        ("║     GAME  OVER     ║", Color::Red)
    };
    let new_best = score >= best && score > 0;
    let best_line = if new_best {
        format!("★ NEW BEST: {:>6} ★", score)
    } else {
        format!("Best Score:  {:>6}", best)
    };
    let lines = [
        ("╔════════════════════╗".to_string(), title_color),
        (title.to_string(), title_color),
        ("╚════════════════════╝".to_string(), title_color),
        (format!("Final Score: {:>6}", score), Color::Yellow),
        (best_line, if new_best { Color::Yellow } else { Color::DarkGrey }),
        ("R - Play Again  Q - Quit".to_string(), Color::White),
    ];
    draw_box(out, view, &lines)
}
