mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use rand::thread_rng;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use coin_platformer::arcade::ArcadeWorld;
use coin_platformer::compute::{init_state, tick};
use coin_platformer::config::{ConfigError, GameConfig};
use coin_platformer::input::InputSnapshot;

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

const CONFIG_ENV_VAR: &str = "COIN_PLATFORMER_CONFIG";
const LOG_ENV_VAR: &str = "COIN_PLATFORMER_LOG";

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 4 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 4;

#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|key| is_held(key_frame, key, frame))
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Quit,
}

fn show_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let lines: &[(&str, Color)] = &[
        ("★  COIN  PLATFORMER  ★", Color::Yellow),
        ("", Color::White),
        ("Collect every coin to win.", Color::White),
        ("Stomp enemies from above or shoot them.", Color::White),
        ("Touch one any other way and you lose a life.", Color::White),
        ("", Color::White),
        ("← → / A D : Move    Z : Sprint", Color::DarkGrey),
        ("SPACE / W / ↑ : Jump (twice in the air)", Color::DarkGrey),
        ("F / X : Fire    Q : Quit", Color::DarkGrey),
        ("", Color::White),
        ("Press ENTER to start", Color::Cyan),
    ];
    let top = cy.saturating_sub(lines.len() as u16 / 2);
    for (i, (text, color)) in lines.iter().enumerate() {
        out.queue(cursor::MoveTo(
            cx.saturating_sub(text.chars().count() as u16 / 2),
            top + i as u16,
        ))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*text))?;
    }
    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        if let Ok(Event::Key(KeyEvent { code, kind, .. })) = rx.recv() {
            if kind != KeyEventKind::Press {
                continue;
            }
            match code {
                KeyCode::Enter | KeyCode::Char(' ') => return Ok(MenuResult::Start),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            }
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// Input model: held keys (movement, sprint) go through a `key_frame` map
/// recording the frame of the last press/repeat event for every key, so
/// several keys can be held at once even on terminals without release
/// events.  Jump and fire are edge-triggered: only a fresh `Press` in the
/// current frame counts, never a repeat.
fn game_loop<W: Write>(
    out: &mut W,
    config: &GameConfig,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let mut rng = thread_rng();
    let mut world = ArcadeWorld::new(config);
    let mut state = init_state(config, None, &mut rng);
    info!(coins = state.coins.len(), enemies = state.enemies.len(), "game_started");

    let clock = Instant::now();
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut shift_frame: Option<u64> = None;
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let mut input = InputSnapshot::default();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code.clone(), frame);
                    if modifiers.contains(KeyModifiers::SHIFT) {
                        shift_frame = Some(frame);
                    }
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(());
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(());
                        }
                        KeyCode::Char(' ') | KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
                            input.jump_pressed = true;
                        }
                        KeyCode::Char('f')
                        | KeyCode::Char('F')
                        | KeyCode::Char('x')
                        | KeyCode::Char('X') => {
                            input.fire_pressed = true;
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code.clone(), frame);
                    if modifiers.contains(KeyModifiers::SHIFT) {
                        shift_frame = Some(frame);
                    }
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        input.left = any_held(
            &key_frame,
            &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
            frame,
        );
        input.right = any_held(
            &key_frame,
            &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
            frame,
        );
        let shifted = shift_frame.is_some_and(|f| frame.saturating_sub(f) <= HOLD_WINDOW);
        input.sprint = shifted
            || any_held(&key_frame, &[KeyCode::Char('z'), KeyCode::Char('Z')], frame);

        let now = clock.elapsed().as_millis() as u64;
        state = tick(&state, now, &input, &mut world, &mut rng);

        let (width, height) = terminal::size()?;
        display::render(out, &state, width, height)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    if let Err(err) = init_tracing() {
        eprintln!("logging disabled: {err}");
    }

    if let Err(err) = load_config().map_err(RunError::from).and_then(|c| run_terminal(&c)) {
        error!(error = %err, "run_failed");
        eprintln!("{err}");
        std::process::exit(1);
    }
}

/// Logs go to the file named by `COIN_PLATFORMER_LOG`; the terminal itself
/// is taken over by the game.  Without the variable nothing is recorded.
fn init_tracing() -> std::io::Result<()> {
    let Some(path) = std::env::var_os(LOG_ENV_VAR).map(PathBuf::from) else {
        return Ok(());
    };
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .compact()
        .init();
    Ok(())
}

fn load_config() -> Result<GameConfig, ConfigError> {
    match std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from) {
        Some(path) => {
            let config = GameConfig::load(&path)?;
            info!(path = %path.display(), "config_loaded");
            Ok(config)
        }
        None => Ok(GameConfig::default()),
    }
}

fn run_terminal(config: &GameConfig) -> Result<(), RunError> {
    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, config, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result.map_err(RunError::from)
}

fn run<W: Write>(
    out: &mut W,
    config: &GameConfig,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    match show_menu(out, rx)? {
        MenuResult::Quit => Ok(()),
        MenuResult::Start => game_loop(out, config, rx),
    }
}
