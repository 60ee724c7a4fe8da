mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use display::TerminalRenderer;
use wave_survivor::clock::{Clock, SystemClock};
use wave_survivor::compute::{
    choose_upgrade, fire_at, fire_due_timers, pause_game, request_reload, resume_game, start_game,
    tick, FrameOutcome, GameState,
};
use wave_survivor::config::{load_waves_or_default, EnemyCatalog, WorldConfig};
use wave_survivor::entities::{Bounds, UpgradeKind};
use wave_survivor::hooks::{GameEvent, GameHooks};
use wave_survivor::input::InputState;

/// ≈60 FPS: every speed and rate in the core is tuned per frame at this rate.
const FRAME: Duration = Duration::from_millis(16);

// ── Simultaneous-input constants ──────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

/// Min frames between shots while an arrow key is held.
const SHOOT_COOLDOWN: u32 = 10;

/// How far ahead of the player an arrow-key shot is aimed.
const ARROW_AIM_DISTANCE: f32 = 100.0;

/// How long a hook banner stays on the hint line.
const BANNER_MS: u64 = 1500;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "wave_survivor")]
#[command(about = "Top-down wave survival shooter in the terminal")]
struct Args {
    /// Enemy catalog JSON
    #[arg(long, default_value = "data/zombies.json")]
    zombies: PathBuf,

    /// Wave table JSON
    #[arg(long, default_value = "data/wave.json")]
    waves: PathBuf,

    /// Seed for every random roll (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Where log output goes; the terminal belongs to the game
    #[arg(long, default_value = "wave_survivor.log")]
    log_file: PathBuf,

    #[arg(long, default_value_t = 2000.0)]
    world_width: f32,

    #[arg(long, default_value_t = 1500.0)]
    world_height: f32,
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ── High-score persistence ────────────────────────────────────────────────────

fn high_score_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".wave_survivor_score")
}

fn load_high_score() -> u32 {
    std::fs::read_to_string(high_score_path())
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

fn save_high_score(score: u32) {
    if let Err(err) = std::fs::write(high_score_path(), score.to_string()) {
        tracing::warn!(%err, "could not save best score");
    }
}

// ── Hooks ─────────────────────────────────────────────────────────────────────

/// Turns core notifications into a short banner on the hint line.
struct HostHooks {
    started: Instant,
    banner: Option<(String, u64)>,
}

impl HostHooks {
    fn new() -> Self {
        HostHooks { started: Instant::now(), banner: None }
    }

    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn show(&mut self, text: String) {
        let until = self.now_ms() + BANNER_MS;
        self.banner = Some((text, until));
    }

    fn current(&mut self) -> Option<String> {
        let now = self.now_ms();
        if self.banner.as_ref().is_some_and(|(_, until)| *until <= now) {
            self.banner = None;
        }
        self.banner.as_ref().map(|(text, _)| text.clone())
    }
}

impl GameHooks for HostHooks {
    fn notify(&mut self, event: GameEvent) {
        tracing::trace!(?event, "hook");
        match event {
            GameEvent::WaveStarted(n) => self.show(format!("── WAVE {n} ──")),
            GameEvent::ReloadStarted => self.show("Reloading…".to_string()),
            GameEvent::Powerup(kind) => self.show(format!("Picked up {kind:?}")),
            GameEvent::Upgraded(kind) => self.show(format!("{} upgraded", kind.label())),
            GameEvent::PlayerHurt => self.show("Ouch!".to_string()),
            _ => {}
        }
    }

    fn game_ended(&mut self, victory: bool) {
        self.banner = None;
        tracing::info!(victory, "run finished");
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program, `false` → play again.
///
/// Input model: a `key_frame` map records the frame number of the last
/// press/repeat event for every key. Each frame the still-fresh keys become
/// the held `InputState`, so movement, sprint and arrow fire combine freely.
/// One-shot keys (reload, pause, upgrade picks) act on the press itself.
fn game_loop<W: Write>(
    renderer: &mut TerminalRenderer<W>,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
    clock: &impl Clock,
    rng: &mut StdRng,
    hooks: &mut HostHooks,
) -> anyhow::Result<bool> {
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut shoot_cooldown: u32 = 0;
    let mut frame: u64 = 0;
    let (cols, rows) = renderer.size();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    KeyEventKind::Press => {
                        key_frame.insert(code, frame);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(true);
                            }
                            KeyCode::Char('r') | KeyCode::Char('R') => {
                                if state.is_over() {
                                    return Ok(false);
                                }
                                request_reload(state, clock, hooks);
                            }
                            KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Esc => {
                                if !pause_game(state) {
                                    resume_game(state);
                                }
                            }
                            KeyCode::Char(c @ '1'..='5') => {
                                let index = c as usize - '1' as usize;
                                choose_upgrade(state, UpgradeKind::ALL[index], hooks);
                            }
                            _ => {}
                        }
                    }
                    KeyEventKind::Repeat => {
                        key_frame.insert(code, frame);
                    }
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                },
                Event::Mouse(MouseEvent { kind: MouseEventKind::Down(MouseButton::Left), column, row, .. }) => {
                    if let Some(target) = display::cell_to_world(&state.camera, cols, rows, column, row) {
                        fire_at(state, target, hooks);
                    }
                }
                _ => {}
            }
        }

        // ── Held keys → input snapshot ────────────────────────────────────────
        let held = |keys: &[KeyCode]| any_held(&key_frame, keys, frame);
        let input = InputState {
            left: held(&[KeyCode::Char('a'), KeyCode::Char('A')]),
            right: held(&[KeyCode::Char('d'), KeyCode::Char('D')]),
            up: held(&[KeyCode::Char('w'), KeyCode::Char('W')]),
            down: held(&[KeyCode::Char('s'), KeyCode::Char('S')]),
            sprint: held(&[
                KeyCode::Char('A'),
                KeyCode::Char('D'),
                KeyCode::Char('W'),
                KeyCode::Char('S'),
            ]),
        };

        let mut aim = (0.0f32, 0.0f32);
        if held(&[KeyCode::Left]) {
            aim.0 -= 1.0;
        }
        if held(&[KeyCode::Right]) {
            aim.0 += 1.0;
        }
        if held(&[KeyCode::Up]) {
            aim.1 -= 1.0;
        }
        if held(&[KeyCode::Down]) {
            aim.1 += 1.0;
        }
        if shoot_cooldown == 0 && aim != (0.0, 0.0) {
            let (cx, cy) = state.player.center();
            let target = (cx + aim.0 * ARROW_AIM_DISTANCE, cy + aim.1 * ARROW_AIM_DISTANCE);
            if fire_at(state, target, hooks) > 0 {
                shoot_cooldown = SHOOT_COOLDOWN;
            }
        }
        shoot_cooldown = shoot_cooldown.saturating_sub(1);

        // ── Timers, then the frame itself ─────────────────────────────────────
        fire_due_timers(state, clock, rng, hooks);
        renderer.banner = hooks.current();

        let outcome = tick(state, &input, clock, hooks, renderer, rng);
        renderer.take_error()?;
        if outcome != FrameOutcome::Advanced {
            // Paused, upgrading or over: the core drew nothing, show the overlay.
            renderer.render(state)?;
        }

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

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
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &rx, &args);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(err) = &result {
        tracing::error!("{err:#}");
    }
    result
}

fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>, args: &Args) -> anyhow::Result<()> {
    let mut high_score = load_high_score();

    let (cols, rows) = terminal::size().context("reading terminal size")?;
    let (view_width, view_height) = display::view_size(cols, rows);
    let world = WorldConfig {
        width: args.world_width,
        height: args.world_height,
        view_width,
        view_height,
    };
    let catalog = EnemyCatalog::load_or_default(&args.zombies);
    let waves = load_waves_or_default(&args.waves);
    let mut state = GameState::new(catalog, waves, world);

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let clock = SystemClock::new();
    let mut hooks = HostHooks::new();
    let mut renderer = TerminalRenderer::new(out, cols, rows, high_score);

    loop {
        start_game(&mut state, &mut rng, &mut hooks);
        let quit = game_loop(&mut renderer, &mut state, rx, &clock, &mut rng, &mut hooks)?;

        // Persist new high score if beaten
        if state.score > high_score {
            high_score = state.score;
            save_high_score(high_score);
            renderer.best_score = high_score;
        }

        if quit {
            break;
        }
    }
    Ok(())
}
