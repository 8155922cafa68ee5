use tracing::debug;

use crate::item::Item;
use crate::viewport::{DEFAULT_SCENE, Viewport};

const CUBE_HEIGHT: f64 = 100.0;
const AXE_LENGTH: f64 = 4000.0;
const AXE_THICKNESS: f64 = 4.0;

/// State of one board cell during generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellState {
    #[default]
    Empty,
    Enabled,
    /// Already covered by a merged cuboid.
    Merged,
}

/// A grid of blocks laid out on the default scene of a viewport.
///
/// With optimisation on, horizontal runs of two or more enabled cells become
/// one wide cuboid, then the leftover cells are merged column-wise, so the
/// board is drawn with far fewer boxes than cells.
#[derive(Debug, Clone)]
pub struct MatrixBoard {
    width: usize,
    height: usize,
    cell_size: f64,
    optimize: bool,
    cells: Vec<CellState>,
}

impl MatrixBoard {
    pub fn new(width: usize, height: usize, cell_size: f64) -> Self {
        Self {
            width,
            height,
            cell_size,
            optimize: true,
            cells: vec![CellState::Empty; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn set_optimize(&mut self, optimize: bool) -> &mut Self {
        self.optimize = optimize;
        self
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then_some(y * self.width + x)
    }

    /// Mark a cell as filled. Out-of-range cells are ignored.
    pub fn enable(&mut self, x: usize, y: usize) -> &mut Self {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = CellState::Enabled;
        }
        self
    }

    pub fn disable(&mut self, x: usize, y: usize) -> &mut Self {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = CellState::Empty;
        }
        self
    }

    pub fn enabled(&self, x: usize, y: usize) -> bool {
        self.index(x, y)
            .is_some_and(|i| self.cells[i] == CellState::Enabled)
    }

    /// Add the board's blocks, borders and axes to the viewport's default scene.
    /// Returns the number of items added.
    pub fn generate(&self, viewport: &mut Viewport) -> usize {
        let before = viewport.items().len();
        if self.optimize {
            self.generate_merged(viewport);
        } else {
            self.generate_cubes(viewport);
        }
        self.add_borders(viewport);
        self.add_axes(viewport);
        let added = viewport.items().len() - before;
        debug!(width = self.width, height = self.height, optimize = self.optimize, added, "board generated");
        added
    }

    fn generate_cubes(&self, viewport: &mut Viewport) {
        let cell = self.cell_size;
        for y in 0..self.height {
            for x in 0..self.width {
                if !self.enabled(x, y) {
                    continue;
                }
                let mut cube = Item::cube(cell, Some(CUBE_HEIGHT));
                if let Some(c) = cube.as_cuboid_mut() {
                    c.set_top_content(format!("{x}:{y}"));
                }
                viewport.add_item(cube, x as f64 * cell, y as f64 * cell, cell, false, DEFAULT_SCENE);
            }
        }
    }

    fn generate_merged(&self, viewport: &mut Viewport) {
        let cell = self.cell_size;
        let mut cells = self.cells.clone();

        for y in 0..self.height {
            let row = y * self.width;
            let mut x = 0;
            while x < self.width {
                let left = x;
                while x < self.width && cells[row + x] == CellState::Enabled {
                    x += 1;
                }
                let len = x - left;
                if len >= 2 {
                    for state in &mut cells[row + left..row + x] {
                        *state = CellState::Merged;
                    }
                    viewport.add_item(
                        Item::cuboid(len as f64 * cell, cell, cell),
                        left as f64 * cell,
                        y as f64 * cell,
                        cell,
                        false,
                        DEFAULT_SCENE,
                    );
                }
                if len == 0 {
                    x += 1;
                }
            }
        }

        for x in 0..self.width {
            let mut y = 0;
            while y < self.height {
                let top = y;
                while y < self.height && cells[y * self.width + x] == CellState::Enabled {
                    cells[y * self.width + x] = CellState::Merged;
                    y += 1;
                }
                let len = y - top;
                if len > 0 {
                    viewport.add_item(
                        Item::cuboid(cell, len as f64 * cell, cell),
                        x as f64 * cell,
                        top as f64 * cell,
                        cell,
                        false,
                        DEFAULT_SCENE,
                    );
                } else {
                    y += 1;
                }
            }
        }
    }

    fn add_borders(&self, viewport: &mut Viewport) {
        let cell = self.cell_size;
        let (w, h) = (self.width as f64, self.height as f64);
        let half = cell * 0.5;
        let borders = [
            (Item::cuboid(cell * w, half, half), 0.0, -half.trunc()),
            (Item::cuboid(cell * w, half, half), 0.0, h * cell.trunc()),
            (Item::cuboid(half, cell * (h + 1.0), half), -half, -cell.trunc() * 0.5),
            (Item::cuboid(half, cell * (h + 1.0), half), w * cell, -cell.trunc() * 0.5),
        ];
        for (mut border, x, y) in borders {
            border.add_class("matrix-border");
            viewport.add_item(border, x, y, half, false, DEFAULT_SCENE);
        }
    }

    fn add_axes(&self, viewport: &mut Viewport) {
        let ow = self.width as f64 * self.cell_size;
        let oh = self.height as f64 * self.cell_size;
        let half = AXE_LENGTH / 2.0;
        let t = AXE_THICKNESS;
        let axes = [
            (Item::cuboid(t, t, AXE_LENGTH), ow / 2.0, oh / 2.0, half),
            (Item::cuboid(AXE_LENGTH, t, t), -half + ow / 2.0, oh / 2.0, 0.0),
            (Item::cuboid(t, AXE_LENGTH, t), ow / 2.0, -half + oh / 2.0, 0.0),
        ];
        for (mut axe, x, y, z) in axes {
            axe.add_class("axe");
            viewport.add_item(axe, x, y, z, false, DEFAULT_SCENE);
        }
    }
}
