use std::collections::{HashSet, VecDeque};

use maze_game::color::PLAYER_COLORS;
use maze_game::components::{Direction, Player};
use maze_game::config::GameConfig;
use maze_game::layout::{cell_rect, wall_rect, Layout};
use maze_game::maze::Maze;
use maze_game::occupancy::{Obstacles, OccupancyMap};
use maze_game::player::{SmoothController, CELL_CROSSING_THRESHOLD};
use maze_game::vector::{manhattan_distance, CellPos, Vec2};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

fn carved(rows: usize, cols: usize, seed: u64) -> Maze {
    let mut maze = Maze::new(rows, cols).unwrap();
    maze.randomize(&mut Pcg64Mcg::seed_from_u64(seed));
    maze
}

fn reachable(maze: &Maze) -> usize {
    let mut seen = HashSet::from([CellPos::new(0, 0)]);
    let mut queue = VecDeque::from([CellPos::new(0, 0)]);
    while let Some(pos) = queue.pop_front() {
        for next in maze.open_neighbors(pos) {
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen.len()
}

fn direction() -> impl Strategy<Value = Direction> {
    prop::sample::select(Direction::ALL.to_vec())
}

proptest! {
    #[test]
    fn carved_walls_form_spanning_tree(rows in 1usize..12, cols in 1usize..12, seed in any::<u64>()) {
        let maze = carved(rows, cols, seed);
        // Connected with exactly n - 1 edges means no cycles.
        prop_assert_eq!(maze.hidden_wall_count(), rows * cols - 1);
        prop_assert_eq!(reachable(&maze), rows * cols);
        prop_assert!(maze.walls().all(|(_, w)| !(w.hidden && w.is_boundary())));
    }

    #[test]
    fn same_seed_same_maze(rows in 1usize..10, cols in 1usize..10, seed in any::<u64>()) {
        let a = carved(rows, cols, seed);
        let b = carved(rows, cols, seed);
        let hidden = |m: &Maze| m.walls().map(|(_, w)| w.hidden).collect::<Vec<_>>();
        prop_assert_eq!(hidden(&a), hidden(&b));
    }

    #[test]
    fn adjacency_is_symmetric(
        rows in 1usize..8,
        cols in 1usize..8,
        seed in any::<u64>(),
        ax in -1i32..9, ay in -1i32..9, bx in -1i32..9, by in -1i32..9,
    ) {
        let maze = carved(rows, cols, seed);
        let a = CellPos::new(ax, ay);
        let b = CellPos::new(bx, by);
        prop_assert_eq!(maze.wall_between(a, b), maze.wall_between(b, a));
        prop_assert_eq!(maze.can_pass_between(a, b), maze.can_pass_between(b, a));
        if manhattan_distance(a, b) != 1 {
            prop_assert!(maze.wall_between(a, b).is_none());
        }
        if let Some(id) = maze.wall_between(a, b) {
            let cells: Vec<CellPos> = maze.wall(id).cells().collect();
            prop_assert!(cells.contains(&a) && cells.contains(&b));
        }
    }

    #[test]
    fn occupancy_matches_walls(rows in 1usize..10, cols in 1usize..10, seed in any::<u64>()) {
        let config = GameConfig::default();
        let maze = carved(rows, cols, seed);
        let layout = Layout::new(cols, rows, &config);
        let map = OccupancyMap::build(&maze, &layout, config.wall_width);

        for (_, wall) in maze.walls() {
            let rect = wall_rect(wall, config.wall_width);
            if wall.hidden {
                prop_assert!(!map.is_occupied(rect.center()), "hidden wall at {},{}", wall.x, wall.y);
            } else {
                for p in [
                    rect.center(),
                    Vec2::new(rect.x, rect.y),
                    Vec2::new(rect.right(), rect.y),
                    Vec2::new(rect.x, rect.bottom()),
                    Vec2::new(rect.right(), rect.bottom()),
                ] {
                    prop_assert!(map.is_occupied(p), "visible wall at {},{} misses {:?}", wall.x, wall.y, p);
                }
            }
        }
        for cell in maze.cells() {
            prop_assert!(!map.is_occupied(cell_rect(cell.pos).center()));
        }
    }

    #[test]
    fn smooth_movement_stays_inside_maze(
        rows in 1usize..7,
        cols in 1usize..7,
        seed in any::<u64>(),
        inputs in prop::collection::vec((direction(), any::<bool>(), 1u32..=1000), 1..300),
    ) {
        let config = GameConfig::default();
        let maze = carved(rows, cols, seed);
        let layout = Layout::new(cols, rows, &config);
        let map = OccupancyMap::build(&maze, &layout, config.wall_width);
        let mut player = Player::new(0, CellPos::new(0, 0), config.player_size, PLAYER_COLORS[0]);
        let mut controller = SmoothController::new(config.movement_speed);

        for (dir, pressed, dt) in inputs {
            controller.set_pressed(dir, pressed);
            controller.advance(&mut player, &map, dt as f64);
            prop_assert!(maze.contains(player.position), "left the maze at {:?}", player.position);
            prop_assert!(player.offset.magnitude() < CELL_CROSSING_THRESHOLD);
        }
    }
}
