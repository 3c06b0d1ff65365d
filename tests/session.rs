use maze_game::components::Direction;
use maze_game::config::GameConfig;
use maze_game::game::{GameSession, TickOutcome};
use maze_game::render::{Frame, Host, Layer};
use maze_game::vector::CellPos;
use maze_game::MazeError;

#[derive(Default)]
struct RecordingHost {
    frames: Vec<Frame>,
    scores: Vec<(usize, u32)>,
    moves: Vec<(usize, CellPos)>,
}

impl Host for RecordingHost {
    fn request_redraw(&mut self, frame: &Frame) {
        self.frames.push(frame.clone());
    }

    fn on_score_changed(&mut self, player: usize, score: u32) {
        self.scores.push((player, score));
    }

    fn on_player_moved(&mut self, player: usize, position: CellPos) {
        self.moves.push((player, position));
    }
}

fn session(cols: usize, rows: usize) -> GameSession {
    GameSession::new(GameConfig {
        cols,
        rows,
        seed: Some(2024),
        ..GameConfig::default()
    })
    .unwrap()
}

/// Starts the session and burns the first tick, which is never simulated.
fn started(session: &mut GameSession, host: &mut RecordingHost, now_ms: u64) {
    session.start(host);
    assert_eq!(session.tick(now_ms, host), TickOutcome::Stalled);
}

#[test]
fn target_under_player_is_collected_and_replaced() {
    let mut session = session(2, 2);
    session.reset_targets([CellPos::new(0, 0)]);
    let mut host = RecordingHost::default();

    session.start(&mut host);

    assert_eq!(session.players()[0].score, 1);
    assert!(host.scores.contains(&(0, 1)));
    assert_eq!(session.targets().len(), session.config().targets);
    assert!(session.targets().iter().all(|t| !t.done));
}

#[test]
fn second_player_never_steals_claimed_target() {
    let mut session = GameSession::new(GameConfig {
        cols: 3,
        rows: 3,
        players: 2,
        seed: Some(5),
        ..GameConfig::default()
    })
    .unwrap();
    session.teleport_player(1, CellPos::new(0, 0)).unwrap();
    session.reset_targets([CellPos::new(0, 0)]);
    let mut host = RecordingHost::default();

    assert_eq!(session.check_target_collisions(&mut host), 1);
    assert_eq!(session.players()[0].score, 1);
    assert_eq!(session.players()[1].score, 0);
    assert_eq!(host.scores, vec![(0, 1)]);
}

#[test]
fn only_the_scoring_player_is_reported() {
    let mut session = GameSession::new(GameConfig {
        cols: 3,
        rows: 3,
        players: 2,
        seed: Some(9),
        ..GameConfig::default()
    })
    .unwrap();
    session.reset_targets([CellPos::new(2, 0)]);
    let mut host = RecordingHost::default();

    assert_eq!(session.check_target_collisions(&mut host), 1);
    assert_eq!(host.scores, vec![(1, 1)]);
}

#[test]
fn ticks_faster_than_frame_limit_do_nothing() {
    let mut session = session(4, 4);
    let mut host = RecordingHost::default();
    started(&mut session, &mut host, 1_000);
    session.set_direction_pressed(0, Direction::Right, true).unwrap();

    assert_eq!(session.tick(1_040, &mut host), TickOutcome::Advanced);
    let frames = host.frames.len();
    let time = session.game_time_ms();
    let players = session.players().to_vec();

    assert_eq!(session.tick(1_045, &mut host), TickOutcome::Throttled);
    assert_eq!(host.frames.len(), frames);
    assert_eq!(session.game_time_ms(), time);
    assert_eq!(session.players(), players.as_slice());
}

#[test]
fn long_gap_is_drawn_but_not_simulated() {
    let mut session = session(4, 4);
    let mut host = RecordingHost::default();
    started(&mut session, &mut host, 0);
    assert_eq!(session.tick(100, &mut host), TickOutcome::Advanced);

    assert_eq!(session.tick(1_200, &mut host), TickOutcome::Stalled);
    assert_eq!(session.game_time_ms(), 100.0);
    assert_eq!(host.frames.len(), 3);

    assert_eq!(session.tick(1_250, &mut host), TickOutcome::Advanced);
    assert_eq!(session.game_time_ms(), 150.0);
}

#[test]
fn stop_and_start_are_idempotent() {
    let mut session = session(4, 4);
    let mut host = RecordingHost::default();
    started(&mut session, &mut host, 0);
    session.start(&mut host);
    assert_eq!(session.tick(50, &mut host), TickOutcome::Advanced);

    session.stop();
    session.stop();
    assert!(!session.is_running());
    let frames = host.frames.len();
    assert_eq!(session.tick(100, &mut host), TickOutcome::Stopped);
    assert_eq!(host.frames.len(), frames);

    session.start(&mut host);
    assert_eq!(session.tick(150, &mut host), TickOutcome::Stalled);
    assert_eq!(session.game_time_ms(), 50.0);
    assert_eq!(session.tick(200, &mut host), TickOutcome::Advanced);
    assert_eq!(session.game_time_ms(), 100.0);
}

#[test]
fn resize_fits_display_and_restarts_frame_clock() {
    let mut session = session(20, 14);
    let mut host = RecordingHost::default();
    started(&mut session, &mut host, 0);

    session.on_resize(880, 1000);
    let fit = session.layout().display().unwrap();
    assert_eq!(fit.scale, 4.0);
    assert_eq!((fit.margin_left, fit.margin_top), (0, 180));
    assert_eq!(session.occupancy().width(), session.layout().base_width());
    assert_eq!(session.tick(40, &mut host), TickOutcome::Stalled);
}

#[test]
fn regenerate_keeps_a_perfect_maze_and_redraws() {
    let mut session = session(6, 5);
    let mut host = RecordingHost::default();
    let before: Vec<bool> = session.maze().walls().map(|(_, w)| w.hidden).collect();

    session.regenerate(&mut host);

    let after: Vec<bool> = session.maze().walls().map(|(_, w)| w.hidden).collect();
    assert_ne!(before, after);
    assert_eq!(session.maze().hidden_wall_count(), 6 * 5 - 1);
    assert_eq!(host.frames.len(), 1);
}

#[test]
fn input_for_missing_player_is_an_error() {
    let mut session = session(4, 4);
    assert_eq!(
        session.set_direction_pressed(3, Direction::Up, true),
        Err(MazeError::UnknownPlayer { index: 3, players: 1 })
    );
}

#[test]
fn held_direction_walks_down_a_corridor() {
    let mut session = session(3, 1);
    session.reset_targets([CellPos::new(2, 0)]);
    let mut host = RecordingHost::default();
    started(&mut session, &mut host, 0);
    session.set_direction_pressed(0, Direction::Right, true).unwrap();

    for step in 1..=60 {
        session.tick(step * 40, &mut host);
    }

    assert_eq!(session.players()[0].position, CellPos::new(2, 0));
    assert_eq!(host.moves, vec![(0, CellPos::new(1, 0)), (0, CellPos::new(2, 0))]);
    assert_eq!(session.players()[0].score, 1);

    let last = host.frames.last().unwrap();
    assert_eq!(last.layer(Layer::Player).count(), 1);
}
