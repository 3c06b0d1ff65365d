use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, QueueableCommand};
use maze_game::color::Rgba;
use maze_game::components::Direction;
use maze_game::config::{GameConfig, MAX_PLAYERS};
use maze_game::game::GameSession;
use maze_game::layout::Rect;
use maze_game::render::{Frame, Host, Layer, Shape};
use maze_game::vector::{CellPos, Vec2};
use std::fs::File;
use std::io::{self, Stdout, Write};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Terminal columns per maze cell.
const CELL_W: usize = 4;
/// Terminal rows per maze cell.
const CELL_H: usize = 2;
const INPUT_HOLD_MS: u64 = 160;
const POLL_MS: u64 = 4;

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Empty,
    Target,
    Wall,
    Floor,
    Player,
}

#[derive(Clone, Copy, PartialEq)]
struct Tile {
    glyph: Glyph,
    color: Color,
}

const EMPTY: Tile = Tile {
    glyph: Glyph::Empty,
    color: Color::Reset,
};

/// Collects what the session reports between two screen refreshes.
struct TerminalHost {
    frame: Option<Frame>,
    scores: Vec<u32>,
}

impl Host for TerminalHost {
    fn request_redraw(&mut self, frame: &Frame) {
        self.frame = Some(frame.clone());
    }

    fn on_score_changed(&mut self, player: usize, score: u32) {
        if let Some(slot) = self.scores.get_mut(player) {
            *slot = score;
        }
    }

    fn on_player_moved(&mut self, player: usize, position: CellPos) {
        tracing::trace!(player, x = position.x, y = position.y, "player moved");
    }
}

struct Renderer {
    width: usize,
    height: usize,
    last: Vec<Tile>,
    last_hud: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    /// Raster for a `cols x rows` maze: one character per lattice point, so
    /// wall lines land on whole character rows and columns.
    fn new(cols: usize, rows: usize) -> Self {
        let width = cols * CELL_W + 1;
        let height = rows * CELL_H + 1;
        Self {
            width,
            height,
            last: vec![EMPTY; width * height],
            last_hud: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }

    fn point(&self, i: usize, j: usize) -> Vec2 {
        Vec2::new(i as f64 / CELL_W as f64, j as f64 / CELL_H as f64)
    }

    fn rasterize(&self, frame: &Frame) -> Vec<Tile> {
        let mut tiles = vec![EMPTY; self.width * self.height];
        for command in &frame.commands {
            let glyph = match command.layer {
                Layer::Target => Glyph::Target,
                Layer::Wall => Glyph::Wall,
                Layer::Floor => Glyph::Floor,
                Layer::Player => Glyph::Player,
                Layer::Overlay => continue,
            };
            if command.color.a <= 0.0 {
                continue;
            }
            let tile = Tile {
                glyph,
                color: terminal_color(command.color),
            };
            for j in 0..self.height {
                for i in 0..self.width {
                    let p = self.point(i, j);
                    let covered = match &command.shape {
                        Shape::Rect(rect) if glyph == Glyph::Wall => rect.contains(p),
                        Shape::Rect(rect) => inside_open(rect, p),
                        Shape::Circle { center, radius } => center.distance(p) <= *radius,
                        Shape::WallOverlay => false,
                    };
                    if covered {
                        tiles[j * self.width + i] = tile;
                    }
                }
            }
        }
        tiles
    }
}

fn inside_open(rect: &Rect, p: Vec2) -> bool {
    p.x > rect.x && p.x < rect.right() && p.y > rect.y && p.y < rect.bottom()
}

fn terminal_color(color: Rgba) -> Color {
    Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

fn main() -> io::Result<()> {
    init_logging()?;
    let config = GameConfig::from_env();
    let mut session = GameSession::new(config).map_err(io::Error::other)?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;
    let enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        stdout.execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))?;
    }

    let result = run(&mut stdout, &mut session, enhanced);

    if enhanced {
        stdout.execute(PopKeyboardEnhancementFlags)?;
    }
    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

/// Logs go to the file named by `MAZE_LOG`; stdout belongs to the game.
fn init_logging() -> io::Result<()> {
    let Ok(path) = std::env::var("MAZE_LOG") else {
        return Ok(());
    };
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run(stdout: &mut Stdout, session: &mut GameSession, enhanced: bool) -> io::Result<()> {
    let config = session.config().clone();
    let mut host = TerminalHost {
        frame: None,
        scores: vec![0; config.players],
    };
    let mut renderer = Renderer::new(config.cols, config.rows);
    let mut held = HeldKeys::default();
    let clock = Instant::now();

    let (term_w, term_h) = terminal::size()?;
    session.on_resize(term_w as u32, term_h as u32);
    session.start(&mut host);

    loop {
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(key) => {
                    let pressed = match key.kind {
                        KeyEventKind::Press | KeyEventKind::Repeat => true,
                        KeyEventKind::Release => false,
                    };
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc if pressed => {
                            session.stop();
                            return Ok(());
                        }
                        KeyCode::Char('r') if pressed => {
                            held.clear();
                            session.regenerate(&mut host);
                        }
                        code => {
                            if let Some((player, dir)) = binding(code) {
                                if !enhanced && pressed {
                                    held.touch(player, dir);
                                }
                                route(session, player, dir, pressed);
                            }
                        }
                    }
                }
                Event::Resize(w, h) => {
                    session.on_resize(w as u32, h as u32);
                    renderer.needs_full = true;
                }
                _ => {}
            }
        }

        if !enhanced {
            for (player, dir) in held.expire(Duration::from_millis(INPUT_HOLD_MS)) {
                route(session, player, dir, false);
            }
        }

        session.tick(clock.elapsed().as_millis() as u64, &mut host);
        if let Some(frame) = host.frame.take() {
            render(stdout, &frame, &host.scores, &mut renderer)?;
        }

        thread::sleep(Duration::from_millis(POLL_MS));
    }
}

fn route(session: &mut GameSession, player: usize, dir: Direction, pressed: bool) {
    if let Err(err) = session.set_direction_pressed(player, dir, pressed) {
        tracing::trace!(%err, "input ignored");
    }
}

/// Key to `(player, direction)`.
fn binding(code: KeyCode) -> Option<(usize, Direction)> {
    let bound = match code {
        KeyCode::Char('w') => (0, Direction::Up),
        KeyCode::Char('a') => (0, Direction::Left),
        KeyCode::Char('s') => (0, Direction::Down),
        KeyCode::Char('d') => (0, Direction::Right),
        KeyCode::Up => (1, Direction::Up),
        KeyCode::Left => (1, Direction::Left),
        KeyCode::Down => (1, Direction::Down),
        KeyCode::Right => (1, Direction::Right),
        KeyCode::Char('t') => (2, Direction::Up),
        KeyCode::Char('f') => (2, Direction::Left),
        KeyCode::Char('g') => (2, Direction::Down),
        KeyCode::Char('h') => (2, Direction::Right),
        KeyCode::Char('i') => (3, Direction::Up),
        KeyCode::Char('j') => (3, Direction::Left),
        KeyCode::Char('k') => (3, Direction::Down),
        KeyCode::Char('l') => (3, Direction::Right),
        _ => return None,
    };
    Some(bound)
}

/// Release emulation for terminals that only report presses: a direction
/// stays held while press/repeat events keep arriving.
#[derive(Default)]
struct HeldKeys {
    last_seen: [[Option<Instant>; 4]; MAX_PLAYERS],
}

impl HeldKeys {
    fn touch(&mut self, player: usize, dir: Direction) {
        if let Some(slots) = self.last_seen.get_mut(player) {
            slots[idx_for_dir(dir)] = Some(Instant::now());
        }
    }

    fn expire(&mut self, hold: Duration) -> Vec<(usize, Direction)> {
        let now = Instant::now();
        let mut released = Vec::new();
        for (player, slots) in self.last_seen.iter_mut().enumerate() {
            for (idx, dir) in Direction::ALL.iter().enumerate() {
                if let Some(t) = slots[idx] {
                    if now.duration_since(t) > hold {
                        slots[idx] = None;
                        released.push((player, *dir));
                    }
                }
            }
        }
        released
    }

    fn clear(&mut self) {
        self.last_seen = Default::default();
    }
}

fn idx_for_dir(dir: Direction) -> usize {
    match dir {
        Direction::Up => 0,
        Direction::Left => 1,
        Direction::Down => 2,
        Direction::Right => 3,
    }
}

fn render(stdout: &mut Stdout, frame: &Frame, scores: &[u32], renderer: &mut Renderer) -> io::Result<()> {
    let needed_w = renderer.width as u16;
    let needed_h = (renderer.height + 1) as u16;

    stdout.queue(MoveTo(0, 0))?;

    let (term_w, term_h) = terminal::size()?;
    if term_w < needed_w || term_h < needed_h {
        stdout.queue(Clear(ClearType::All))?;
        let msg = format!(
            "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
            needed_w, needed_h, term_w, term_h
        );
        stdout.queue(Print(msg))?;
        stdout.flush()?;
        renderer.needs_full = true;
        return Ok(());
    }

    let origin_x = (term_w - needed_w) / 2;
    let origin_y = (term_h - needed_h) / 2 + 1;
    if origin_x != renderer.origin_x || origin_y != renderer.origin_y {
        renderer.origin_x = origin_x;
        renderer.origin_y = origin_y;
        renderer.needs_full = true;
    }
    if renderer.needs_full {
        stdout.queue(Clear(ClearType::All))?;
    }

    let mut hud = scores
        .iter()
        .enumerate()
        .map(|(i, score)| format!("P{}: {}", i + 1, score))
        .collect::<Vec<_>>()
        .join("  ");
    hud.push_str(&format!("  Time: {}s  (r new maze, q quit)", (frame.game_time_ms / 1000.0).floor()));
    let hud_w = UnicodeWidthStr::width(hud.as_str());
    if hud_w < renderer.width {
        hud.push_str(&" ".repeat(renderer.width - hud_w));
    }
    if renderer.needs_full || hud != renderer.last_hud {
        stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y - 1))?;
        stdout.queue(SetForegroundColor(Color::White))?;
        stdout.queue(Print(&hud))?;
        stdout.queue(ResetColor)?;
        renderer.last_hud = hud;
    }

    let tiles = renderer.rasterize(frame);
    for y in 0..renderer.height {
        for x in 0..renderer.width {
            let idx = y * renderer.width + x;
            let tile = tiles[idx];
            if renderer.needs_full || tile != renderer.last[idx] {
                renderer.last[idx] = tile;
                draw_tile(stdout, renderer, x, y, tile)?;
            }
        }
    }
    renderer.needs_full = false;

    stdout.flush()?;
    Ok(())
}

fn draw_tile(stdout: &mut Stdout, renderer: &Renderer, x: usize, y: usize, tile: Tile) -> io::Result<()> {
    let ch = match tile.glyph {
        Glyph::Empty => ' ',
        Glyph::Target => '+',
        Glyph::Wall => '█',
        Glyph::Floor => '░',
        Glyph::Player => '●',
    };
    stdout.queue(MoveTo(renderer.origin_x + x as u16, renderer.origin_y + y as u16))?;
    stdout.queue(SetForegroundColor(tile.color))?;
    if UnicodeWidthChar::width(ch).unwrap_or(0) == 1 {
        stdout.queue(Print(ch))?;
    } else {
        stdout.queue(Print(' '))?;
    }
    stdout.queue(ResetColor)?;
    Ok(())
}
