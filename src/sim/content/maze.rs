//! Love maze layout, gate questions and guard placement

use glam::IVec2;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::consts::{MAZE_GUARDS, MAZE_SIZE};

/// Contents of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    Open,
    Wall,
    Finish,
    Gate,
}

// 0 = open, 1 = wall, 2 = finish, 3 = gate. Indexed [y][x].
const LAYOUT: [[u8; MAZE_SIZE]; MAZE_SIZE] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 1, 0, 0, 0, 2],
    [1, 0, 1, 0, 1, 0, 1, 1, 1, 0, 1, 0, 1, 0, 1],
    [1, 0, 1, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1, 0, 1],
    [1, 0, 1, 1, 1, 1, 1, 0, 1, 1, 1, 0, 1, 0, 1],
    [1, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1],
    [1, 1, 1, 0, 1, 0, 1, 1, 1, 0, 1, 1, 1, 0, 1],
    [1, 0, 0, 0, 1, 0, 0, 3, 0, 0, 1, 0, 0, 0, 1],
    [1, 0, 1, 1, 1, 1, 1, 0, 1, 1, 1, 1, 1, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 3, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 0, 1, 1, 1, 0, 1, 1, 1, 0, 1, 1, 1],
    [1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1],
    [1, 0, 1, 1, 1, 0, 1, 1, 1, 0, 1, 1, 1, 0, 1],
    [0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

pub const START: IVec2 = IVec2::new(1, 13);
pub const FINISH: IVec2 = IVec2::new(14, 1);

/// Guards never spawn closer than this (Manhattan) to the start
const GUARD_START_CLEARANCE: i32 = 4;
/// How far a patrol reaches from its spawn cell
const PATROL_REACH: i32 = 2;

/// A locked gate and the question that opens it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GateSpec {
    pub pos: IVec2,
    pub prompt: &'static str,
    pub options: &'static [&'static str],
    #[serde(skip)]
    pub correct: usize,
}

pub const GATES: [GateSpec; 2] = [
    GateSpec {
        pos: IVec2::new(7, 7),
        prompt: "What is the color most associated with love?",
        options: &["Blue", "Red", "Green", "Yellow"],
        correct: 1,
    },
    GateSpec {
        pos: IVec2::new(7, 9),
        prompt: "Which symbol represents love?",
        options: &["Star", "Heart", "Circle", "Square"],
        correct: 1,
    },
];

/// Tile at `pos`; anything off the grid is a wall
pub fn tile_at(pos: IVec2) -> Tile {
    let size = MAZE_SIZE as i32;
    if pos.x < 0 || pos.y < 0 || pos.x >= size || pos.y >= size {
        return Tile::Wall;
    }
    match LAYOUT[pos.y as usize][pos.x as usize] {
        0 => Tile::Open,
        2 => Tile::Finish,
        3 => Tile::Gate,
        _ => Tile::Wall,
    }
}

/// Row-major tiles, for rendering
pub fn tiles() -> Vec<Vec<Tile>> {
    (0..MAZE_SIZE as i32)
        .map(|y| (0..MAZE_SIZE as i32).map(|x| tile_at(IVec2::new(x, y))).collect())
        .collect()
}

/// Gate index at `pos`, if any
pub fn gate_at(pos: IVec2) -> Option<usize> {
    GATES.iter().position(|g| g.pos == pos)
}

fn manhattan(a: IVec2, b: IVec2) -> i32 {
    let d = (a - b).abs();
    d.x + d.y
}

/// A guard walking a fixed ping-pong patrol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guard {
    pub id: u32,
    pub patrol: Vec<IVec2>,
    pub step: usize,
}

impl Guard {
    pub fn pos(&self) -> IVec2 {
        self.patrol[self.step % self.patrol.len()]
    }

    /// Advance one patrol step
    pub fn advance(&mut self) {
        self.step = (self.step + 1) % self.patrol.len();
    }
}

/// Patrol from `origin` along its longest straight open run (`a, b, c, b`)
fn patrol_from(origin: IVec2) -> Vec<IVec2> {
    let mut best: Vec<IVec2> = Vec::new();
    for dir in [IVec2::X, IVec2::NEG_X, IVec2::Y, IVec2::NEG_Y] {
        let run: Vec<IVec2> = (1..=PATROL_REACH)
            .map(|n| origin + dir * n)
            .take_while(|&p| tile_at(p) == Tile::Open)
            .collect();
        if run.len() > best.len() {
            best = run;
        }
    }

    let mut patrol = vec![origin];
    patrol.extend(best.iter().copied());
    if best.len() > 1 {
        // Walk back through the middle cells
        patrol.extend(best.iter().rev().skip(1).copied());
    }
    patrol
}

/// Place [`MAZE_GUARDS`] guards on distinct open cells well away from the start
pub fn spawn_guards(rng: &mut impl Rng) -> Vec<Guard> {
    let mut candidates: Vec<IVec2> = (0..MAZE_SIZE as i32)
        .flat_map(|y| (0..MAZE_SIZE as i32).map(move |x| IVec2::new(x, y)))
        .filter(|&p| tile_at(p) == Tile::Open && manhattan(p, START) >= GUARD_START_CLEARANCE)
        .collect();
    candidates.shuffle(rng);

    candidates
        .into_iter()
        .take(MAZE_GUARDS)
        .enumerate()
        .map(|(i, origin)| Guard {
            id: i as u32 + 1,
            patrol: patrol_from(origin),
            step: 0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_layout_landmarks() {
        assert_eq!(tile_at(START), Tile::Open);
        assert_eq!(tile_at(FINISH), Tile::Finish);
        for gate in &GATES {
            assert_eq!(tile_at(gate.pos), Tile::Gate);
        }
        assert_eq!(tile_at(IVec2::new(-1, 3)), Tile::Wall);
        assert_eq!(tile_at(IVec2::new(3, 15)), Tile::Wall);
        assert_eq!(gate_at(IVec2::new(7, 9)), Some(1));
        assert_eq!(gate_at(START), None);
    }

    #[test]
    fn test_patrol_ping_pongs() {
        // (3,3) has open cells to the right at (4,3) and (5,3)
        let patrol = patrol_from(IVec2::new(3, 3));
        assert_eq!(patrol.len(), 4);
        assert_eq!(patrol[0], IVec2::new(3, 3));
        assert_eq!(patrol[1], patrol[3]);

        let mut guard = Guard {
            id: 1,
            patrol,
            step: 0,
        };
        let start = guard.pos();
        for _ in 0..4 {
            guard.advance();
        }
        assert_eq!(guard.pos(), start);
    }

    proptest! {
        #[test]
        fn prop_guards_walk_open_cells(seed: u64) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let guards = spawn_guards(&mut rng);
            prop_assert_eq!(guards.len(), MAZE_GUARDS);

            let origins: Vec<IVec2> = guards.iter().map(Guard::pos).collect();
            for (i, a) in origins.iter().enumerate() {
                prop_assert!(manhattan(*a, START) >= GUARD_START_CLEARANCE);
                prop_assert!(origins[i + 1..].iter().all(|b| b != a));
            }
            for guard in &guards {
                prop_assert!(!guard.patrol.is_empty());
                for cell in &guard.patrol {
                    prop_assert_eq!(tile_at(*cell), Tile::Open);
                    prop_assert_ne!(*cell, START);
                }
            }
        }
    }
}
