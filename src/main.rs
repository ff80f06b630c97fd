use std::fs::OpenOptions;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal, ExecutableCommand,
};
use log::{info, warn};
use rand::thread_rng;

use kittens::assets::AssetRegistry;
use kittens::config::Settings;
use kittens::engine::{Engine, Schedule};
use kittens::error::Result;
use kittens::input::key_code;
use kittens::surface::{Scale, TerminalSurface};

fn init_logging(settings: &Settings) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off"));
    // The alternate screen would swallow stderr, so prefer a file when given.
    if let Some(path) = &settings.log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

/// Milliseconds since the host clock started.
fn now_ms(clock: &Instant) -> u64 {
    clock.elapsed().as_millis() as u64
}

/// Forward one terminal event to the engine.  Returns `true` to quit.
fn on_event<R: rand::Rng>(engine: &mut Engine<'_, R>, event: Event, now: u64) -> bool {
    let Event::Key(KeyEvent {
        code,
        kind,
        modifiers,
        ..
    }) = event
    else {
        return false;
    };
    if kind == KeyEventKind::Release {
        return false;
    }
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => true,
        _ => {
            if let Some(code) = key_code(&code) {
                engine.handle_key(code, now);
            }
            false
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Drives frames at the configured rate while the game runs.  Once a frame
/// halts, no more frames run; the loop just waits for keys until a restart
/// (or quit) arrives.
fn game_loop<W: Write, R: rand::Rng>(
    out: &mut W,
    engine: &mut Engine<'_, R>,
    surface: &mut TerminalSurface,
    rx: &mpsc::Receiver<Event>,
    settings: &Settings,
) -> Result<()> {
    let clock = Instant::now();
    let frame = settings.frame_interval();

    loop {
        let frame_start = Instant::now();

        if !engine.is_running() {
            match rx.recv() {
                Ok(event) => {
                    if on_event(engine, event, now_ms(&clock)) {
                        return Ok(());
                    }
                }
                // Reader thread is gone; nothing can restart us.
                Err(_) => return Ok(()),
            }
            continue;
        }

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(event) = rx.try_recv() {
            if on_event(engine, event, now_ms(&clock)) {
                return Ok(());
            }
        }

        if engine.frame(now_ms(&clock), surface) == Schedule::Halt {
            info!("frame loop halted");
        }
        surface.present(out)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let settings = Settings::load()?;
    init_logging(&settings)?;

    let scale = Scale {
        px_per_col: settings.px_per_col,
        px_per_row: settings.px_per_row,
    };
    let assets = AssetRegistry::load(&settings.asset_dir, &scale);
    let mut surface = TerminalSurface::new(scale);

    let (need_cols, need_rows) = surface.size();
    let (cols, rows) = terminal::size()?;
    if cols < need_cols || rows <= need_rows {
        warn!(
            "terminal is {}x{}, playfield needs {}x{}",
            cols,
            rows,
            need_cols,
            need_rows + 1
        );
    }

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

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

    let mut engine = Engine::new(&assets, thread_rng(), 0);
    let result = game_loop(&mut out, &mut engine, &mut surface, &rx, &settings);

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
