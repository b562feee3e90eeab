use crate::rng::Rng;
use crate::types::{MazeSnapshot, Vec2};

const CARVE_STEPS: [(i32, i32); 4] = [(0, -2), (2, 0), (0, 2), (-2, 0)];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Wall,
    Open,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    pub cols: i32,
    pub rows: i32,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn filled(cols: i32, rows: i32) -> Self {
        let cols = cols.max(0);
        let rows = rows.max(0);
        Self {
            cols,
            rows,
            cells: vec![Cell::Wall; cols as usize * rows as usize],
        }
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.cols && y < self.rows
    }

    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        if !self.in_bounds(x, y) {
            return None;
        }
        self.cells.get((y * self.cols + x) as usize).copied()
    }

    pub fn is_open(&self, x: i32, y: i32) -> bool {
        self.cell(x, y) == Some(Cell::Open)
    }

    pub fn set(&mut self, x: i32, y: i32, cell: Cell) {
        if self.in_bounds(x, y) {
            let idx = (y * self.cols + x) as usize;
            self.cells[idx] = cell;
        }
    }

    pub fn open_cells(&self) -> Vec<Vec2> {
        let mut out = Vec::new();
        for y in 0..self.rows {
            for x in 0..self.cols {
                if self.is_open(x, y) {
                    out.push(Vec2 { x, y });
                }
            }
        }
        out
    }

    /// True when every cell in the rectangle spanned by the two corners is open.
    pub fn is_rect_open(&self, a: Vec2, b: Vec2) -> bool {
        for y in a.y.min(b.y)..=a.y.max(b.y) {
            for x in a.x.min(b.x)..=a.x.max(b.x) {
                if !self.is_open(x, y) {
                    return false;
                }
            }
        }
        true
    }

    fn is_carvable(&self, x: i32, y: i32) -> bool {
        x > 0 && y > 0 && x < self.cols - 1 && y < self.rows - 1
    }
}

struct CarveFrame {
    x: i32,
    y: i32,
    steps: [(i32, i32); 4],
    next: usize,
}

/// Carves a perfect maze with an explicit-stack backtracker seeded at (1,1).
///
/// Grids smaller than 3x3 have no interior and come back as solid wall; the
/// caller decides whether that is acceptable.
pub fn generate_maze(cols: i32, rows: i32, rng: &mut Rng) -> Grid {
    let mut grid = Grid::filled(cols, rows);
    if !grid.is_carvable(1, 1) {
        return grid;
    }

    grid.set(1, 1, Cell::Open);
    let mut stack = vec![new_frame(1, 1, rng)];

    while let Some(frame) = stack.last_mut() {
        if frame.next >= frame.steps.len() {
            stack.pop();
            continue;
        }
        let (dx, dy) = frame.steps[frame.next];
        frame.next += 1;
        let (x, y) = (frame.x, frame.y);
        let nx = x + dx;
        let ny = y + dy;
        if !grid.is_carvable(nx, ny) || grid.is_open(nx, ny) {
            continue;
        }
        grid.set(x + dx / 2, y + dy / 2, Cell::Open);
        grid.set(nx, ny, Cell::Open);
        stack.push(new_frame(nx, ny, rng));
    }

    grid
}

fn new_frame(x: i32, y: i32, rng: &mut Rng) -> CarveFrame {
    let mut steps = CARVE_STEPS;
    rng.shuffle(&mut steps);
    CarveFrame {
        x,
        y,
        steps,
        next: 0,
    }
}

pub fn to_snapshot(grid: &Grid, cell_size: u32) -> MazeSnapshot {
    let maze = (0..grid.rows)
        .map(|y| {
            (0..grid.cols)
                .map(|x| u8::from(grid.is_open(x, y)))
                .collect()
        })
        .collect();
    MazeSnapshot {
        maze,
        cols: grid.cols,
        rows: grid.rows,
        cell_size,
    }
}
