use tracing::trace;

use crate::cell::{Grid, Point};

/// Why a walk stopped short of its end cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOutcome {
    Reached,
    DeadEnd,
    StepLimit,
}

/// A single random walk over the grid, tagging every cell it claims.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    start: Point,
    end: Point,
    class: String,
    cells: Vec<Point>,
}

impl Path {
    pub fn new(start: Point, end: Point, class: impl Into<String>) -> Self {
        Self {
            start,
            end,
            class: class.into(),
            cells: Vec::new(),
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    /// Cells claimed so far, in walk order.
    pub fn cells(&self) -> &[Point] {
        &self.cells
    }

    /// The walk finished on its end cell.
    pub fn is_valid(&self) -> bool {
        self.cells.last() == Some(&self.end)
    }

    /// Walk from start toward end. Returns `true` once the end is claimed.
    ///
    /// `bias` is the chance that a step heads straight for the end instead of
    /// picking a random open neighbour.
    pub fn generate(&mut self, grid: &mut Grid, rng: &mut fastrand::Rng, bias: f64) -> bool {
        self.walk(grid, rng, bias) == WalkOutcome::Reached
    }

    pub fn walk(&mut self, grid: &mut Grid, rng: &mut fastrand::Rng, bias: f64) -> WalkOutcome {
        let max_steps = grid.area();
        let mut current = self.start;
        let mut steps = 0;

        while current != self.end {
            self.register(grid, current);
            steps += 1;
            if steps >= max_steps {
                trace!(class = %self.class, steps, "walk hit step limit");
                return WalkOutcome::StepLimit;
            }
            match self.next(grid, rng, bias, current) {
                Some(next) => current = next,
                None => {
                    trace!(class = %self.class, at = %current, "walk dead end");
                    return WalkOutcome::DeadEnd;
                }
            }
        }

        self.register(grid, self.end);
        WalkOutcome::Reached
    }

    fn register(&mut self, grid: &mut Grid, p: Point) {
        if let Some(cell) = grid.get_mut(p) {
            cell.is_path = true;
            cell.add_class(self.class.as_str());
            self.cells.push(p);
        }
    }

    fn next(&self, grid: &mut Grid, rng: &mut fastrand::Rng, bias: f64, from: Point) -> Option<Point> {
        let [left, right, up, down] = from.neighbours();
        let mut candidates = Vec::with_capacity(4);
        for (p, tag) in [(left, None), (right, None), (up, Some("to-top")), (down, Some("to-bottom"))] {
            if !grid.is_open(p) {
                continue;
            }
            if p == self.end {
                if let (Some(tag), Some(cell)) = (tag, grid.get_mut(p)) {
                    cell.add_class(tag);
                }
                return Some(p);
            }
            candidates.push(p);
        }

        if candidates.is_empty() {
            return None;
        }
        if bias > 0.0 && rng.f64() < bias {
            return self.straightest(&candidates);
        }
        rng.shuffle(&mut candidates);
        candidates.first().copied()
    }

    /// Candidate closest to the end by Manhattan distance. On a tie the one
    /// on the end's row or column wins, then the earliest in walk order.
    fn straightest(&self, candidates: &[Point]) -> Option<Point> {
        let end = self.end;
        candidates.iter().copied().min_by_key(|p| {
            let aligned = p.x == end.x || p.y == end.y;
            (p.manhattan(end), !aligned)
        })
    }

    /// Path cell nearest to `target` (Euclidean).
    pub fn closest(&self, target: Point) -> Option<Point> {
        let mut best: Option<(Point, f64)> = None;
        for &p in &self.cells {
            let d = p.distance(target);
            if best.is_none_or(|(_, min)| d < min) {
                best = Some((p, d));
            }
        }
        best.map(|(p, _)| p)
    }

    /// Path cell furthest from `target` (Euclidean).
    pub fn farthest(&self, target: Point) -> Option<Point> {
        let mut best: Option<(Point, f64)> = None;
        for &p in &self.cells {
            let d = p.distance(target);
            if best.is_none_or(|(_, max)| d > max) {
                best = Some((p, d));
            }
        }
        best.map(|(p, _)| p)
    }
}
