//! Ordering skeleton pixels along the stroke they belong to.
//!
//! Skeleton pixels come out of the thinning pass in row-major scan order. Tracing
//! chains them greedily: start at an endpoint, step to an unvisited 8-neighbour
//! while one exists, otherwise jump to the nearest unvisited pixel. Unvisited
//! pixels are bucketed by grid cell so a jump only inspects nearby cells.
use std::collections::HashMap;

use glam::IVec2;

/// Orthogonal neighbours first so straight runs are followed before diagonals.
const STEPS: [IVec2; 8] = [
    IVec2::new(1, 0),
    IVec2::new(0, 1),
    IVec2::new(-1, 0),
    IVec2::new(0, -1),
    IVec2::new(1, 1),
    IVec2::new(-1, 1),
    IVec2::new(-1, -1),
    IVec2::new(1, -1),
];

/// Side of the square buckets used by nearest-unvisited queries.
const CELL: i32 = 16;

/// Reorder `points` so consecutive entries follow the stroke.
///
/// The output is a permutation of the input. Ties are broken by scan order, so the
/// result is deterministic.
pub fn trace_order(points: &[IVec2]) -> Vec<IVec2> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let index_of: HashMap<(i32, i32), usize> = points
        .iter()
        .enumerate()
        .map(|(i, p)| ((p.x, p.y), i))
        .collect();

    let neighbour_count = |p: IVec2| {
        STEPS
            .iter()
            .filter(|s| index_of.contains_key(&((p + **s).x, (p + **s).y)))
            .count()
    };

    let start = points
        .iter()
        .position(|p| neighbour_count(*p) <= 1)
        .unwrap_or(0);

    let mut visited = vec![false; points.len()];
    let mut unvisited = CellGrid::new(points);
    let mut out = Vec::with_capacity(points.len());
    let mut current = start;

    loop {
        visited[current] = true;
        unvisited.remove(points, current);
        out.push(points[current]);
        if out.len() == points.len() {
            break;
        }

        let here = points[current];
        let next = STEPS.iter().find_map(|s| {
            let n = here + *s;
            index_of
                .get(&(n.x, n.y))
                .copied()
                .filter(|&i| !visited[i])
        });

        current = match next.or_else(|| unvisited.nearest(points, here)) {
            Some(i) => i,
            None => break,
        };
    }

    out
}

/// Point indices bucketed by `CELL`×`CELL` cell over the bounding box of the points.
struct CellGrid {
    origin: IVec2,
    cols: i32,
    rows: i32,
    cells: Vec<Vec<usize>>,
}

impl CellGrid {
    fn new(points: &[IVec2]) -> Self {
        let min = points.iter().copied().fold(IVec2::MAX, IVec2::min);
        let max = points.iter().copied().fold(IVec2::MIN, IVec2::max);
        let cols = (max.x - min.x) / CELL + 1;
        let rows = (max.y - min.y) / CELL + 1;
        let mut grid = Self {
            origin: min,
            cols,
            rows,
            cells: vec![Vec::new(); (cols as usize) * (rows as usize)],
        };
        for (i, p) in points.iter().enumerate() {
            let slot = grid.slot(grid.cell_of(*p));
            grid.cells[slot].push(i);
        }
        grid
    }

    #[inline]
    fn cell_of(&self, p: IVec2) -> IVec2 {
        (p - self.origin) / CELL
    }

    #[inline]
    fn slot(&self, cell: IVec2) -> usize {
        (cell.y * self.cols + cell.x) as usize
    }

    fn remove(&mut self, points: &[IVec2], index: usize) {
        let slot = self.slot(self.cell_of(points[index]));
        let bucket = &mut self.cells[slot];
        if let Some(pos) = bucket.iter().position(|&i| i == index) {
            bucket.remove(pos);
        }
    }

    /// Closest remaining point to `from`, which must lie inside the grid; ties
    /// go to the lowest index.
    ///
    /// Cells are scanned in rings of growing Chebyshev radius. Ring `r + 1`
    /// lies at least `r * CELL + 1` pixels away on one axis, which bounds the
    /// search once a candidate is closer than that.
    fn nearest(&self, points: &[IVec2], from: IVec2) -> Option<usize> {
        let center = self.cell_of(from);
        let mut best: Option<(i64, usize)> = None;

        let consider = |cell: IVec2, best: &mut Option<(i64, usize)>| {
            if cell.x < 0 || cell.y < 0 || cell.x >= self.cols || cell.y >= self.rows {
                return;
            }
            for &i in &self.cells[self.slot(cell)] {
                let d = (points[i] - from).as_i64vec2();
                let candidate = (d.x * d.x + d.y * d.y, i);
                if best.is_none_or(|b| candidate < b) {
                    *best = Some(candidate);
                }
            }
        };

        for r in 0..=self.cols.max(self.rows) {
            for dy in -r..=r {
                let y = center.y + dy;
                if dy.abs() == r {
                    for dx in -r..=r {
                        consider(IVec2::new(center.x + dx, y), &mut best);
                    }
                } else {
                    consider(IVec2::new(center.x - r, y), &mut best);
                    consider(IVec2::new(center.x + r, y), &mut best);
                }
            }
            if let Some((d2, _)) = best {
                let reach = i64::from(r * CELL + 1);
                if d2 < reach * reach {
                    break;
                }
            }
        }

        best.map(|(_, i)| i)
    }
}
