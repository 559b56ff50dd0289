//! Connectivity graph over a board snapshot plus the four sides
//!
//! A graph is built per evaluation and dropped afterwards. It carries the
//! scratch state the path engines in [`crate::paths`] need: a per-node
//! distance array and the incumbent bound of the depth-first search.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Color, Move, Side, NEIGHBOR_OFFSETS};

/// A graph vertex: a real cell or one of the virtual sides
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Node {
    Cell(Move),
    Side(Side),
}

impl Node {
    pub fn side(self) -> Option<Side> {
        match self {
            Node::Side(s) => Some(s),
            Node::Cell(_) => None,
        }
    }
}

/// Board snapshot seen from one player's point of view
#[derive(Clone, Debug)]
pub struct ConnectivityGraph {
    board: Board,
    player: Color,
    /// Best known distance from the search start, indexed by [`Self::index`]
    pub(crate) distance: Vec<f32>,
    /// Best complete distance found by the depth-first engine
    pub min_path_distance: f32,
}

impl ConnectivityGraph {
    pub fn new(board: &Board, player: Color) -> Self {
        let n = board.size();
        Self {
            board: board.clone(),
            player,
            distance: vec![f32::INFINITY; n * n + Side::ALL.len()],
            min_path_distance: f32::INFINITY,
        }
    }

    pub fn size(&self) -> usize {
        self.board.size()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self) -> Color {
        self.player
    }

    /// Switch the travelling player; scratch state is left for the caller
    /// to reset.
    pub fn set_player(&mut self, player: Color) {
        self.player = player;
    }

    /// Forget every distance and the incumbent bound
    pub fn reset(&mut self) {
        self.distance.fill(f32::INFINITY);
        self.min_path_distance = f32::INFINITY;
    }

    pub fn node_count(&self) -> usize {
        self.distance.len()
    }

    /// Dense index: cells row-major, then the sides
    pub fn index(&self, node: Node) -> usize {
        let n = self.size();
        match node {
            Node::Cell(mv) => mv.row * n + mv.col,
            Node::Side(side) => n * n + side.index(),
        }
    }

    pub fn color(&self, node: Node) -> Color {
        match node {
            Node::Cell(mv) => self.board.get(mv),
            Node::Side(side) => side.color(),
        }
    }

    /// Cost of stepping into `node`: 0 on the player's own color, 1 on a
    /// free cell, `None` when the opponent holds it.
    pub fn entry_cost(&self, node: Node) -> Option<f32> {
        let color = self.color(node);
        if color == self.player {
            Some(0.0)
        } else if color == Color::Free {
            Some(1.0)
        } else {
            None
        }
    }

    pub fn distance_of(&self, node: Node) -> f32 {
        self.distance[self.index(node)]
    }

    /// Adjacent nodes. Off-grid offsets resolve to the side they cross,
    /// rows first.
    pub fn neighbors(&self, node: Node) -> Vec<Node> {
        let n = self.size();
        match node {
            Node::Side(Side::Top) => (0..n).map(|c| Node::Cell(Move::new(0, c))).collect(),
            Node::Side(Side::Bottom) => (0..n).map(|c| Node::Cell(Move::new(n - 1, c))).collect(),
            Node::Side(Side::Left) => (0..n).map(|r| Node::Cell(Move::new(r, 0))).collect(),
            Node::Side(Side::Right) => (0..n).map(|r| Node::Cell(Move::new(r, n - 1))).collect(),
            Node::Cell(mv) => {
                let mut out = Vec::with_capacity(NEIGHBOR_OFFSETS.len());
                for (dr, dc) in NEIGHBOR_OFFSETS {
                    let row = mv.row as isize + dr;
                    let col = mv.col as isize + dc;
                    let next = if row < 0 {
                        Node::Side(Side::Top)
                    } else if row >= n as isize {
                        Node::Side(Side::Bottom)
                    } else if col < 0 {
                        Node::Side(Side::Left)
                    } else if col >= n as isize {
                        Node::Side(Side::Right)
                    } else {
                        Node::Cell(Move::new(row as usize, col as usize))
                    };
                    if !out.contains(&next) {
                        out.push(next);
                    }
                }
                out
            }
        }
    }

    /// Every node, cells row-major then the sides
    pub fn nodes(&self) -> impl Iterator<Item = Node> + '_ {
        self.board
            .cells()
            .map(|(mv, _)| Node::Cell(mv))
            .chain(Side::ALL.into_iter().map(Node::Side))
    }

    /// Admissible distance estimate toward `goal` for the current player
    pub fn estimator(&self, goal: Side) -> GoalEstimator {
        let n = self.size();
        let mut friendly_rows = vec![false; n];
        let mut friendly_cols = vec![false; n];
        for (mv, color) in self.board.cells() {
            if color == self.player {
                friendly_rows[mv.row] = true;
                friendly_cols[mv.col] = true;
            }
        }
        GoalEstimator {
            goal,
            size: n,
            friendly_rows,
            friendly_cols,
        }
    }

    pub fn goal_estimate(&self, node: Node, goal: Side) -> f32 {
        self.estimator(goal).estimate(node)
    }
}

/// Lower bound on the free cells still needed to walk from a node to the
/// goal side: the rows (or columns) between them that hold no friendly
/// stone. Every route crosses each of those lines and pays at least one
/// free cell there, so the bound never overestimates.
#[derive(Clone, Debug)]
pub struct GoalEstimator {
    goal: Side,
    size: usize,
    friendly_rows: Vec<bool>,
    friendly_cols: Vec<bool>,
}

impl GoalEstimator {
    /// Zero on the goal, infinite on any other side
    pub fn estimate(&self, node: Node) -> f32 {
        let mv = match node {
            Node::Side(s) if s == self.goal => return 0.0,
            Node::Side(_) => return f32::INFINITY,
            Node::Cell(mv) => mv,
        };
        let n = self.size;
        let (lines, friendly) = match self.goal {
            Side::Top => (0..mv.row, &self.friendly_rows),
            Side::Bottom => (mv.row + 1..n, &self.friendly_rows),
            Side::Left => (0..mv.col, &self.friendly_cols),
            Side::Right => (mv.col + 1..n, &self.friendly_cols),
        };
        lines.filter(|&line| !friendly[line]).count() as f32
    }
}
