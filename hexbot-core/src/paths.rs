//! Shortest-path engines over a [`ConnectivityGraph`]
//!
//! All three engines share the cost rule of [`ConnectivityGraph::entry_cost`]
//! and measure the same thing: how many free cells the current player still
//! has to claim to join two sides.
//!
//! - [`ConnectivityGraph::uniform_cost`]: Dijkstra, distance only
//! - [`ConnectivityGraph::heuristic_path`]: A*, returns the route itself
//! - [`ConnectivityGraph::depth_first`]: branch-and-bound on the incumbent

use serde::{Deserialize, Serialize};

use crate::board::{Board, Color, Move, Side};
use crate::frontier::PriorityFrontier;
use crate::graph::{ConnectivityGraph, GoalEstimator, Node};

/// Which engine computes connection costs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathEngine {
    UniformCost,
    Heuristic,
    #[default]
    DepthFirst,
}

/// How the depth-first engine avoids revisiting nodes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisitPolicy {
    /// Re-enter a node only when arriving strictly cheaper than before.
    /// Finds the true minimum.
    #[default]
    Exact,
    /// One visited set shared by every branch of the recursion. A node
    /// reached in one branch is never tried by a sibling, so the result can
    /// overestimate the true distance.
    SharedVisited,
}

/// Route between two sides, start first
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    pub nodes: Vec<Node>,
    pub cost: f32,
}

impl Path {
    /// Free cells along the route, in order
    pub fn free_cells<'a>(&'a self, board: &'a Board) -> impl Iterator<Item = Move> + 'a {
        self.nodes.iter().filter_map(move |node| match node {
            Node::Cell(mv) if board.is_free(*mv) => Some(*mv),
            _ => None,
        })
    }
}

impl ConnectivityGraph {
    /// Connection cost of the current player between its two sides
    pub fn connection_cost(&mut self, engine: PathEngine, policy: VisitPolicy) -> f32 {
        let Some((near, far)) = self.player().sides() else {
            return f32::INFINITY;
        };
        match engine {
            PathEngine::UniformCost => self.uniform_cost(near, far),
            PathEngine::Heuristic => self
                .heuristic_path(near, far)
                .map_or(f32::INFINITY, |path| path.cost),
            PathEngine::DepthFirst => {
                self.min_path_distance = f32::INFINITY;
                self.depth_first(near, far, policy)
            }
        }
    }

    // ========================================================================
    // UNIFORM COST
    // ========================================================================

    /// Dijkstra from `start` until `end` is settled. Infinite when `end`
    /// cannot be reached.
    pub fn uniform_cost(&mut self, start: Side, end: Side) -> f32 {
        self.distance.fill(f32::INFINITY);

        let mut frontier = PriorityFrontier::new();
        for node in self.nodes() {
            frontier.push(node, f32::INFINITY);
        }
        let start = Node::Side(start);
        let start_idx = self.index(start);
        self.distance[start_idx] = 0.0;
        frontier.push(start, 0.0);

        let end = Node::Side(end);
        while let Some((current, dist)) = frontier.pop() {
            if dist.is_infinite() {
                break;
            }
            if current == end {
                return dist;
            }

            for neighbor in self.neighbors(current) {
                if !frontier.contains(neighbor) {
                    continue;
                }
                let Some(cost) = self.entry_cost(neighbor) else {
                    frontier.remove(neighbor);
                    continue;
                };
                let candidate = dist + cost;
                let idx = self.index(neighbor);
                if candidate < self.distance[idx] {
                    self.distance[idx] = candidate;
                    frontier.push(neighbor, candidate);
                }
            }
        }

        f32::INFINITY
    }

    // ========================================================================
    // A*
    // ========================================================================

    /// A* from `start` to `goal`; `None` when no route exists
    pub fn heuristic_path(&mut self, start: Side, goal: Side) -> Option<Path> {
        self.distance.fill(f32::INFINITY);
        let estimator = self.estimator(goal);
        let count = self.node_count();
        let mut closed = vec![false; count];
        let mut predecessor: Vec<Option<Node>> = vec![None; count];
        let mut frontier = PriorityFrontier::new();

        let start = Node::Side(start);
        let start_idx = self.index(start);
        self.distance[start_idx] = 0.0;
        frontier.push(start, 0.0);

        let goal = Node::Side(goal);
        while let Some((current, _)) = frontier.pop() {
            let current_idx = self.index(current);
            if closed[current_idx] {
                continue;
            }
            closed[current_idx] = true;

            if current == goal {
                let mut nodes = vec![current];
                let mut cursor = current_idx;
                while let Some(prev) = predecessor[cursor] {
                    nodes.push(prev);
                    cursor = self.index(prev);
                }
                nodes.reverse();
                return Some(Path {
                    nodes,
                    cost: self.distance[current_idx],
                });
            }

            for neighbor in self.neighbors(current) {
                let Some(cost) = self.entry_cost(neighbor) else {
                    continue;
                };
                let idx = self.index(neighbor);
                if closed[idx] {
                    continue;
                }
                let tentative = self.distance[current_idx] + cost;
                if tentative < self.distance[idx] {
                    self.distance[idx] = tentative;
                    predecessor[idx] = Some(current);
                    frontier.push(neighbor, tentative + estimator.estimate(neighbor));
                }
            }
        }

        None
    }

    // ========================================================================
    // BOUNDED DEPTH-FIRST
    // ========================================================================

    /// Backtracking search from `start` to `goal`, pruned by the incumbent
    /// `min_path_distance`. The incumbent is not reset here: a finite value
    /// set by the caller acts as an upper bound. Returns the incumbent.
    pub fn depth_first(&mut self, start: Side, goal: Side, policy: VisitPolicy) -> f32 {
        self.distance.fill(f32::INFINITY);
        let estimator = self.estimator(goal);
        let start = Node::Side(start);
        let start_idx = self.index(start);
        self.distance[start_idx] = 0.0;
        self.descend(start, goal, 0.0, policy, &estimator);
        self.min_path_distance
    }

    fn descend(
        &mut self,
        current: Node,
        goal: Side,
        distance: f32,
        policy: VisitPolicy,
        estimator: &GoalEstimator,
    ) {
        if current == Node::Side(goal) {
            if distance < self.min_path_distance {
                self.min_path_distance = distance;
            }
            return;
        }
        if distance > self.min_path_distance {
            return;
        }

        // Cheapest step first, then the one closest to the goal
        let mut steps: Vec<(Node, f32, f32)> = self
            .neighbors(current)
            .into_iter()
            .filter_map(|n| self.entry_cost(n).map(|c| (n, c, estimator.estimate(n))))
            .collect();
        steps.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.2.total_cmp(&b.2)));

        for (neighbor, cost, _) in steps {
            let idx = self.index(neighbor);
            let next = distance + cost;
            let seen = match policy {
                VisitPolicy::Exact => next >= self.distance[idx],
                VisitPolicy::SharedVisited => self.distance[idx].is_finite(),
            };
            if seen {
                continue;
            }
            self.distance[idx] = next;
            self.descend(neighbor, goal, next, policy, estimator);
        }
    }
}

/// Connection cost of `color` on `board` with a fresh graph
pub fn connection_cost(board: &Board, color: Color, engine: PathEngine, policy: VisitPolicy) -> f32 {
    ConnectivityGraph::new(board, color).connection_cost(engine, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    const ENGINES: [PathEngine; 3] = [
        PathEngine::UniformCost,
        PathEngine::Heuristic,
        PathEngine::DepthFirst,
    ];

    fn random_board(size: usize, fill: f64, rng: &mut ChaCha8Rng) -> Board {
        let mut board = Board::new(size);
        for row in 0..size {
            for col in 0..size {
                if rng.gen_bool(fill) {
                    let color = if rng.gen_bool(0.5) { Color::Red } else { Color::Blue };
                    board.place(Move::new(row, col), color);
                }
            }
        }
        board
    }

    #[test]
    fn test_empty_board_costs_size() {
        for size in 1..=7 {
            let board = Board::new(size);
            for color in [Color::Red, Color::Blue] {
                for engine in ENGINES {
                    let cost = connection_cost(&board, color, engine, VisitPolicy::Exact);
                    assert_eq!(cost, size as f32, "{:?} {:?} on {}x{}", engine, color, size, size);
                }
            }
        }
    }

    #[test]
    fn test_engines_agree_on_random_boards() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for trial in 0..60 {
            let size = 2 + trial % 6;
            let board = random_board(size, 0.45, &mut rng);
            for color in [Color::Red, Color::Blue] {
                let dijkstra = connection_cost(&board, color, PathEngine::UniformCost, VisitPolicy::Exact);
                let astar = connection_cost(&board, color, PathEngine::Heuristic, VisitPolicy::Exact);
                let dfs = connection_cost(&board, color, PathEngine::DepthFirst, VisitPolicy::Exact);
                assert_eq!(dijkstra, astar, "trial {} {:?}\n{}", trial, color, board);
                assert_eq!(dijkstra, dfs, "trial {} {:?}\n{}", trial, color, board);
            }
        }
    }

    #[test]
    fn test_shared_visited_never_underestimates() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..40 {
            let board = random_board(5, 0.35, &mut rng);
            for color in [Color::Red, Color::Blue] {
                let exact = connection_cost(&board, color, PathEngine::DepthFirst, VisitPolicy::Exact);
                let shared = connection_cost(&board, color, PathEngine::DepthFirst, VisitPolicy::SharedVisited);
                assert!(shared >= exact, "{} < {}\n{}", shared, exact, board);
            }
        }
    }

    #[test]
    fn test_blocked_path_is_infinite() {
        // Blue wall across row 1 cuts every red route
        let board = Board::from_rows(&["000", "BBB", "000"]).unwrap();
        for engine in ENGINES {
            let cost = connection_cost(&board, Color::Red, engine, VisitPolicy::Exact);
            assert!(cost.is_infinite(), "{:?} returned {}", engine, cost);
        }
        let blue = connection_cost(&board, Color::Blue, PathEngine::UniformCost, VisitPolicy::Exact);
        assert_eq!(blue, 0.0);
    }

    #[test]
    fn test_own_stones_are_free_to_cross() {
        let board = Board::from_rows(&["0R00", "0R00", "0000", "0000"]).unwrap();
        for engine in ENGINES {
            assert_eq!(connection_cost(&board, Color::Red, engine, VisitPolicy::Exact), 2.0);
        }
    }

    #[test]
    fn test_heuristic_path_shape() {
        let board = Board::from_rows(&["R00", "0B0", "000"]).unwrap();
        let mut graph = ConnectivityGraph::new(&board, Color::Red);
        let path = graph.heuristic_path(Side::Bottom, Side::Top).unwrap();
        assert_eq!(path.nodes.first(), Some(&Node::Side(Side::Bottom)));
        assert_eq!(path.nodes.last(), Some(&Node::Side(Side::Top)));
        assert_eq!(path.free_cells(&board).count() as f32, path.cost);
        for pair in path.nodes.windows(2) {
            assert!(graph.neighbors(pair[0]).contains(&pair[1]));
        }
    }

    #[test]
    fn test_heuristic_path_none_when_blocked() {
        let board = Board::from_rows(&["B0", "B0"]).unwrap();
        let mut graph = ConnectivityGraph::new(&board, Color::Red);
        assert!(graph.heuristic_path(Side::Bottom, Side::Top).is_some());

        let board = Board::from_rows(&["BB", "00"]).unwrap();
        let mut graph = ConnectivityGraph::new(&board, Color::Red);
        assert!(graph.heuristic_path(Side::Bottom, Side::Top).is_none());
    }

    #[test]
    fn test_depth_first_respects_caller_bound() {
        let board = Board::new(4);
        let mut graph = ConnectivityGraph::new(&board, Color::Red);
        graph.min_path_distance = 2.0;
        // No route at or below the bound: the bound comes back untouched
        assert_eq!(graph.depth_first(Side::Bottom, Side::Top, VisitPolicy::Exact), 2.0);
        graph.reset();
        assert_eq!(graph.depth_first(Side::Bottom, Side::Top, VisitPolicy::Exact), 4.0);
    }

    #[test]
    fn test_uniform_cost_records_distances() {
        let board = Board::new(3);
        let mut graph = ConnectivityGraph::new(&board, Color::Blue);
        assert_eq!(graph.uniform_cost(Side::Right, Side::Left), 3.0);
        assert_eq!(graph.distance_of(Node::Cell(Move::new(0, 2))), 1.0);
    }
}
