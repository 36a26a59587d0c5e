/// Rendering layer.  All terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// world coordinates into terminal cells and state into terminal commands.
use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use coin_platformer::entities::{Enemy, GameState, GameStatus, Pose, Tint, Vec2};
use coin_platformer::level::Rect;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_COINS: Color = Color::DarkYellow;
const C_PLAYER: Color = Color::White;
const C_PLAYER_HURT: Color = Color::DarkGrey;
const C_PLATFORM: Color = Color::Green;
const C_COIN: Color = Color::Yellow;
const C_ENEMY_NORMAL: Color = Color::Magenta;
const C_ENEMY_AGGRESSIVE: Color = Color::Red;
const C_ENEMY_RETURNING: Color = Color::DarkYellow;
const C_PROJECTILE: Color = Color::Blue;
const C_HINT: Color = Color::DarkGrey;

/// Horizontal world pixels per terminal column.
const PX_PER_COL: f32 = 16.0;

/// First terminal row of the play area (row 0 is the HUD, row 1 the border).
const PLAY_TOP: u16 = 2;

/// Maps world pixels onto the visible slice of the terminal.  The camera
/// keeps the player centred horizontally, clamped to the world edges.
struct Viewport {
    camera_x: f32,
    px_per_row: f32,
    cols: u16,
    rows: u16,
}

impl Viewport {
    fn new(state: &GameState, width: u16, height: u16) -> Self {
        let world = state.world();
        let cols = width.saturating_sub(2).max(1);
        let rows = height.saturating_sub(PLAY_TOP + 2).max(1);
        let view_px = cols as f32 * PX_PER_COL;
        let max_camera = (world.x - view_px).max(0.0);
        let camera_x = (state.player.pos.x - view_px / 2.0).clamp(0.0, max_camera);
        Viewport {
            camera_x,
            px_per_row: world.y / rows as f32,
            cols,
            rows,
        }
    }

    /// Terminal cell for a world point, or `None` when off screen.
    fn cell(&self, p: Vec2) -> Option<(u16, u16)> {
        let col = ((p.x - self.camera_x) / PX_PER_COL).floor();
        let row = (p.y / self.px_per_row).floor();
        if col < 0.0 || row < 0.0 || col >= self.cols as f32 || row >= self.rows as f32 {
            return None;
        }
        Some((col as u16 + 1, row as u16 + PLAY_TOP))
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let view = Viewport::new(state, width, height);
    draw_border(out, &view)?;
    draw_hud(out, state)?;

    for platform in &state.platforms {
        draw_platform(out, &view, platform)?;
    }
    for coin in state.coins.iter().filter(|c| c.active) {
        draw_glyph(out, &view, coin.pos, C_COIN, "o")?;
    }
    for enemy in state.enemies.iter().filter(|e| e.active) {
        draw_enemy(out, &view, enemy)?;
    }
    for projectile in state.projectiles.slots.iter().filter(|p| p.active) {
        draw_glyph(out, &view, projectile.pos, C_PROJECTILE, "•")?;
    }
    draw_player(out, &view, state)?;
    draw_controls_hint(out, height)?;

    match state.progression.status() {
        GameStatus::Won => draw_banner(out, width, height, "    YOU  WIN!    ", Color::Green)?,
        GameStatus::Lost => draw_banner(out, width, height, "   GAME  OVER    ", Color::Red)?,
        GameStatus::Playing => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border & HUD ──────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.cols as usize;
    let bottom = PLAY_TOP + view.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;
    out.queue(cursor::MoveTo(0, PLAY_TOP - 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w))))?;
    for row in PLAY_TOP..bottom {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.cols + 1, row))?;
        out.queue(Print("│"))?;
    }
    out.queue(cursor::MoveTo(0, bottom))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w))))?;
    Ok(())
}

fn draw_hud<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    let progression = &state.progression;
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {:>6}", progression.score())))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(format!("   Lives: {}", "♥".repeat(progression.lives() as usize))))?;
    out.queue(style::SetForegroundColor(C_HUD_COINS))?;
    out.queue(Print(format!(
        "   Coins: {}/{}",
        state.coins.len() - state.active_coins(),
        state.coins.len()
    )))?;
    Ok(())
}

// ── Sprites ───────────────────────────────────────────────────────────────────

fn draw_glyph<W: Write>(
    out: &mut W,
    view: &Viewport,
    pos: Vec2,
    color: Color,
    glyph: &str,
) -> std::io::Result<()> {
    if let Some((col, row)) = view.cell(pos) {
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(glyph))?;
    }
    Ok(())
}

/// Platforms are drawn as a solid run of blocks along their top edge.
fn draw_platform<W: Write>(out: &mut W, view: &Viewport, platform: &Rect) -> std::io::Result<()> {
    let y = platform.top() + 1.0;
    let mut x = platform.left();
    out.queue(style::SetForegroundColor(C_PLATFORM))?;
    while x < platform.right() {
        if let Some((col, row)) = view.cell(Vec2::new(x, y)) {
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(Print("▀"))?;
        }
        x += PX_PER_COL;
    }
    Ok(())
}

fn draw_enemy<W: Write>(out: &mut W, view: &Viewport, enemy: &Enemy) -> std::io::Result<()> {
    let color = match enemy.ai.state.tint() {
        Tint::Normal => C_ENEMY_NORMAL,
        Tint::Aggressive => C_ENEMY_AGGRESSIVE,
        Tint::Returning => C_ENEMY_RETURNING,
    };
    draw_glyph(out, view, enemy.pos, color, "Ѫ")
}

fn draw_player<W: Write>(out: &mut W, view: &Viewport, state: &GameState) -> std::io::Result<()> {
    let player = &state.player;
    let (color, glyph) = if !player.active {
        (C_PLAYER_HURT, "x")
    } else {
        let glyph = match player.pose {
            Pose::Idle => "☺",
            Pose::Walk | Pose::Sprint => "☻",
            Pose::Airborne => "ᴥ",
        };
        (C_PLAYER, glyph)
    };
    draw_glyph(out, view, player.pos, color, glyph)
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "← → / A D : Move   Z : Sprint   SPACE / W : Jump   F / X : Fire   Q : Quit",
    ))?;
    Ok(())
}

// ── Win / game-over overlay ──────────────────────────────────────────────────

fn draw_banner<W: Write>(
    out: &mut W,
    width: u16,
    height: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let inner = text.chars().count();
    let lines = [
        format!("╔{}╗", "═".repeat(inner)),
        format!("║{}║", text),
        format!("╚{}╝", "═".repeat(inner)),
    ];
    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);
    out.queue(style::SetForegroundColor(color))?;
    for (i, line) in lines.iter().enumerate() {
        let col = cx.saturating_sub(line.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(Print(line))?;
    }
    Ok(())
}
