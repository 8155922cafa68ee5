use std::collections::{BTreeSet, VecDeque};

use tracing::{debug, info, info_span, warn};

use crate::cell::{Cell, Grid, Point};
use crate::config::{LabyrinthConfig, MAX_SIDE};
use crate::path::Path;

pub const MAIN_PATH: &str = "path-main";
pub const SECOND_PATH: &str = "path-main2";
pub const CLOSING_PATH: &str = "closing-path";
pub const NOISE_PATH: &str = "noise0";
pub const CLOSEST: &str = "closest";

/// A maze carved by overlapping random walks.
///
/// Two main walks head for the middle of the right edge and for the end.
/// Closing walks patch a miss, then noise walks grow dead ends off every
/// claimed cell.
#[derive(Debug, Clone)]
pub struct Labyrinth {
    config: LabyrinthConfig,
    grid: Grid,
    start: Point,
    end: Point,
    paths: Vec<Path>,
    rng: fastrand::Rng,
}

impl Labyrinth {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_config(LabyrinthConfig {
            width,
            height,
            ..LabyrinthConfig::default()
        })
    }

    /// Build an empty grid. Sides are clamped to `1..=MAX_SIDE`.
    pub fn with_config(mut config: LabyrinthConfig) -> Self {
        let width = config.width.clamp(1, MAX_SIDE);
        let height = config.height.clamp(1, MAX_SIDE);
        if (width, height) != (config.width, config.height) {
            warn!(
                requested_width = config.width,
                requested_height = config.height,
                width,
                height,
                "labyrinth size clamped"
            );
        }
        config.width = width;
        config.height = height;
        Self {
            grid: Grid::new(width, height),
            start: Point::new(0, 0),
            end: Point::new(width as i32 - 1, height as i32 - 1),
            paths: Vec::new(),
            rng: fastrand::Rng::with_seed(config.seed),
            config,
        }
    }

    pub fn config(&self) -> &LabyrinthConfig {
        &self.config
    }

    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cell(&self, x: i32, y: i32) -> Option<&Cell> {
        self.grid.cell(x, y)
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    /// Move the start cell. Points outside the grid are ignored.
    pub fn set_start(&mut self, p: Point) -> &mut Self {
        if self.grid.contains(p) {
            self.start = p;
        }
        self
    }

    /// Move the end cell. Points outside the grid are ignored.
    pub fn set_end(&mut self, p: Point) -> &mut Self {
        if self.grid.contains(p) {
            self.end = p;
        }
        self
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// Drop every path and start over with a fresh grid.
    pub fn reset(&mut self) {
        self.paths.clear();
        self.grid = Grid::new(self.grid.width(), self.grid.height());
    }

    /// Carve the maze. Returns `true` when start and end are connected.
    pub fn generate(&mut self) -> bool {
        let _span = info_span!(
            "labyrinth_generate",
            width = self.grid.width(),
            height = self.grid.height(),
            seed = self.config.seed
        )
        .entered();

        let attempts = self.config.max_attempts.max(1);
        for attempt in 1..=attempts {
            if attempt > 1 || !self.paths.is_empty() {
                self.reset();
            }
            self.carve_main_paths();
            if self.is_solvable() {
                self.add_noise();
                info!(
                    attempt,
                    paths = self.paths.len(),
                    cells = self.grid.path_count(),
                    "labyrinth generated"
                );
                return self.is_solvable();
            }
            debug!(attempt, "end unreachable, regenerating");
        }

        warn!(attempts, "labyrinth has no route from start to end");
        false
    }

    fn carve_main_paths(&mut self) {
        let middle = Point::new(self.grid.width() as i32 - 1, self.grid.height() as i32 / 2);
        self.walk(self.start, middle, MAIN_PATH);
        if !self.walk(self.start, self.end, SECOND_PATH) {
            self.close_path();
        }
    }

    fn walk(&mut self, from: Point, to: Point, class: &str) -> bool {
        let mut path = Path::new(from, to, class);
        let reached = path.generate(&mut self.grid, &mut self.rng, self.config.bias);
        self.paths.push(path);
        reached
    }

    /// Retry from existing path cells until a walk lands on the end,
    /// alternating between the closest and the farthest cell.
    fn close_path(&mut self) -> bool {
        let mut prefer_far = false;
        for _ in 0..self.config.closing_attempts {
            let from = if prefer_far {
                self.farthest(self.end)
            } else {
                self.closest(self.end)
            };
            prefer_far = !prefer_far;

            let Some(from) = from else {
                return false;
            };
            if let Some(cell) = self.grid.get_mut(from) {
                cell.add_class(CLOSEST);
            }
            if self.walk(from, self.end, CLOSING_PATH) {
                return true;
            }
        }
        false
    }

    fn add_noise(&mut self) {
        for _ in 0..self.config.noise_rounds {
            let mut seen = BTreeSet::new();
            let origins: Vec<Point> = self
                .paths
                .iter()
                .flat_map(|p| p.cells().iter().copied())
                .filter(|p| seen.insert(*p))
                .collect();
            for origin in origins {
                self.walk(origin, self.end, NOISE_PATH);
            }
        }
    }

    /// Path cell nearest to `target` across every path.
    pub fn closest(&self, target: Point) -> Option<Point> {
        self.paths
            .iter()
            .filter_map(|p| p.closest(target))
            .min_by(|a, b| a.distance(target).total_cmp(&b.distance(target)))
    }

    /// Path cell furthest from `target` across every path.
    pub fn farthest(&self, target: Point) -> Option<Point> {
        self.paths
            .iter()
            .filter_map(|p| p.farthest(target))
            .max_by(|a, b| a.distance(target).total_cmp(&b.distance(target)))
    }

    /// Breadth-first search from start to end over path cells.
    pub fn is_solvable(&self) -> bool {
        if !self.grid.is_path(self.start) || !self.grid.is_path(self.end) {
            return false;
        }
        let mut visited = BTreeSet::from([self.start]);
        let mut queue = VecDeque::from([self.start]);
        while let Some(p) = queue.pop_front() {
            if p == self.end {
                return true;
            }
            for n in p.neighbours() {
                if self.grid.is_path(n) && visited.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        false
    }
}

impl Default for Labyrinth {
    fn default() -> Self {
        Self::with_config(LabyrinthConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generated(width: u32, height: u32, seed: u64) -> Labyrinth {
        let mut labyrinth = Labyrinth::with_config(LabyrinthConfig {
            width,
            height,
            seed,
            ..LabyrinthConfig::default()
        });
        labyrinth.generate();
        labyrinth
    }

    #[test]
    fn oversized_grids_are_clamped() {
        let labyrinth = Labyrinth::new(100_000, 0);
        assert_eq!((labyrinth.width(), labyrinth.height()), (MAX_SIDE, 1));
        assert_eq!(labyrinth.end(), Point::new(MAX_SIDE as i32 - 1, 0));
        assert_eq!(labyrinth.grid().area(), MAX_SIDE as usize);
        assert_eq!(labyrinth.config().width, MAX_SIDE);
    }

    #[test]
    fn corners_are_start_and_end() {
        let labyrinth = Labyrinth::new(10, 6);
        assert_eq!(labyrinth.start(), Point::new(0, 0));
        assert_eq!(labyrinth.end(), Point::new(9, 5));
        assert!(labyrinth.paths().is_empty());
        assert!(!labyrinth.is_solvable());
    }

    #[test]
    fn generate_true_implies_solvable() {
        for seed in 0..30 {
            let mut labyrinth = Labyrinth::with_config(LabyrinthConfig {
                width: 12,
                height: 12,
                seed,
                ..LabyrinthConfig::default()
            });
            let ok = labyrinth.generate();
            assert_eq!(ok, labyrinth.is_solvable(), "seed {seed}");
        }
    }

    #[test]
    fn regenerating_starts_from_scratch() {
        let mut labyrinth = generated(10, 10, 5);
        let first = labyrinth.paths().len();
        assert!(first >= 2);
        labyrinth.generate();
        assert_eq!(&labyrinth.paths()[0].class(), &MAIN_PATH);
    }

    #[test]
    fn small_mazes_are_solved() {
        let solved = (0..20)
            .filter(|seed| {
                let mut labyrinth = Labyrinth::with_config(LabyrinthConfig {
                    width: 8,
                    height: 8,
                    seed: *seed,
                    ..LabyrinthConfig::default()
                });
                labyrinth.generate()
            })
            .count();
        assert!(solved >= 15, "only {solved}/20 solved");
    }

    #[test]
    fn main_paths_come_first() {
        let labyrinth = generated(10, 10, 4);
        let classes: Vec<&str> = labyrinth.paths().iter().map(Path::class).collect();
        assert_eq!(&classes[..2], [MAIN_PATH, SECOND_PATH]);
        assert_eq!(labyrinth.paths()[0].end(), Point::new(9, 5));
        assert!(classes.iter().skip(2).all(|c| *c == CLOSING_PATH || *c == NOISE_PATH));
    }

    #[test]
    fn same_seed_same_maze() {
        let a = generated(16, 16, 42);
        let b = generated(16, 16, 42);
        assert_eq!(a.grid(), b.grid());
    }

    #[test]
    fn noise_is_optional() {
        let mut labyrinth = Labyrinth::with_config(LabyrinthConfig {
            width: 10,
            height: 10,
            noise_rounds: 0,
            ..LabyrinthConfig::default()
        });
        if labyrinth.generate() {
            assert!(labyrinth.paths().iter().all(|p| p.class() != NOISE_PATH));
        }
    }

    #[test]
    fn reset_clears_paths() {
        let mut labyrinth = generated(8, 8, 1);
        labyrinth.reset();
        assert!(labyrinth.paths().is_empty());
        assert_eq!(labyrinth.grid().path_count(), 0);
    }

    #[test]
    fn single_cell_is_trivially_solved() {
        let mut labyrinth = Labyrinth::new(1, 1);
        assert!(labyrinth.generate());
        assert!(labyrinth.cell(0, 0).unwrap().is_path);
    }

    #[test]
    fn set_start_ignores_points_off_grid() {
        let mut labyrinth = Labyrinth::new(4, 4);
        labyrinth.set_start(Point::new(9, 9)).set_end(Point::new(2, 3));
        assert_eq!(labyrinth.start(), Point::new(0, 0));
        assert_eq!(labyrinth.end(), Point::new(2, 3));
    }

    #[test]
    fn closest_and_farthest_span_all_paths() {
        let labyrinth = generated(10, 10, 2);
        let end = labyrinth.end();
        let closest = labyrinth.closest(end).unwrap();
        let farthest = labyrinth.farthest(end).unwrap();
        assert!(closest.distance(end) <= farthest.distance(end));
        assert!(labyrinth.grid().is_path(closest));
    }
}
