//! Layout feature extraction.
//!
//! Derives the fixed-length numeric feature vector consumed by the validity
//! classifier. The vector order is part of the classifier training contract
//! and must not change between training and inference; indices are named by
//! the `F_*` constants below.
//!
//! Extraction is deterministic and side-effect free: repeated calls on an
//! unchanged layout return identical vectors.

use crate::geometry::{contained_in, min_wall_distance, overlap_area, overlaps};
use crate::room::{Placement, Room};
use serde::{Deserialize, Serialize};

/// Length of the feature vector.
pub const FEATURE_LEN: usize = 9;

/// Total pairwise furniture-furniture overlap area.
pub const F_PAIRWISE_OVERLAP_AREA: usize = 0;
/// Count of furniture-vs-fixed-element overlaps.
pub const F_FIXED_OVERLAP_COUNT: usize = 1;
/// Count of items not fully inside the room.
pub const F_OUT_OF_BOUNDS_COUNT: usize = 2;
/// Fraction of items with at least one edge flush against a wall.
pub const F_FLUSH_WALL_FRACTION: usize = 3;
/// Largest clear corridor width, normalized to `[0, 1]`.
pub const F_CORRIDOR_ESTIMATE: usize = 4;
/// Furniture footprint area over room area.
pub const F_UTILIZATION_RATIO: usize = 5;
/// Mean over items of the minimum distance to a wall.
pub const F_MEAN_WALL_DISTANCE: usize = 6;
/// Mean pairwise center-to-center distance.
pub const F_MEAN_PAIR_DISTANCE: usize = 7;
/// Free-cell fraction of the occupancy grid.
pub const F_FREE_CELL_FRACTION: usize = 8;

/// Tunables for feature extraction and the grid-based walkability estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Distance within which an item edge counts as flush against a wall.
    pub wall_tolerance: f64,
    /// Number of grid cells along the longer room axis.
    pub grid_resolution: usize,
    /// Corridor width considered fully comfortable (normalization ceiling).
    pub min_corridor_width: f64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            wall_tolerance: 2.0,
            grid_resolution: 64,
            min_corridor_width: 70.0,
        }
    }
}

impl FeatureConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flush-wall tolerance.
    pub fn with_wall_tolerance(mut self, tolerance: f64) -> Self {
        self.wall_tolerance = tolerance;
        self
    }

    /// Sets the occupancy grid resolution.
    pub fn with_grid_resolution(mut self, resolution: usize) -> Self {
        self.grid_resolution = resolution.max(4);
        self
    }

    /// Sets the comfortable corridor width.
    pub fn with_min_corridor_width(mut self, width: f64) -> Self {
        self.min_corridor_width = width;
        self
    }
}

/// Coarse boolean occupancy grid over the room floor.
///
/// Cells covered by furniture effective bounds or fixed elements are marked
/// occupied. Used for the walkability features.
#[derive(Debug)]
pub struct OccupancyGrid {
    cols: usize,
    rows: usize,
    cell: f64,
    occupied: Vec<bool>,
}

impl OccupancyGrid {
    /// Builds the grid for a room and a set of placements.
    pub fn build(room: &Room, placements: &[Placement], resolution: usize) -> Self {
        let longer = room.width.max(room.height);
        let cell = longer / resolution.max(4) as f64;
        let cols = (room.width / cell).ceil() as usize;
        let rows = (room.height / cell).ceil() as usize;

        let mut grid = Self {
            cols,
            rows,
            cell,
            occupied: vec![false; cols * rows],
        };

        for element in &room.fixed_elements {
            grid.mark(element.rect.effective_bounds());
        }
        for (item, placement) in room.furniture.iter().zip(placements) {
            grid.mark(item.rect_at(placement).effective_bounds());
        }

        grid
    }

    fn mark(&mut self, bounds: (f64, f64, f64, f64)) {
        let (x1, y1, x2, y2) = bounds;

        let c1 = ((x1 / self.cell).floor().max(0.0) as usize).min(self.cols);
        let c2 = ((x2 / self.cell).ceil().max(0.0) as usize).min(self.cols);
        let r1 = ((y1 / self.cell).floor().max(0.0) as usize).min(self.rows);
        let r2 = ((y2 / self.cell).ceil().max(0.0) as usize).min(self.rows);

        for r in r1..r2 {
            for c in c1..c2 {
                self.occupied[r * self.cols + c] = true;
            }
        }
    }

    /// Fraction of cells not covered by any furniture or fixed element.
    pub fn free_fraction(&self) -> f64 {
        if self.occupied.is_empty() {
            return 0.0;
        }
        let free = self.occupied.iter().filter(|&&o| !o).count();
        free as f64 / self.occupied.len() as f64
    }

    fn row_is_free(&self, r: usize) -> bool {
        (0..self.cols).all(|c| !self.occupied[r * self.cols + c])
    }

    fn col_is_free(&self, c: usize) -> bool {
        (0..self.rows).all(|r| !self.occupied[r * self.cols + c])
    }

    /// Width of the largest clear straight corridor spanning the room, in
    /// room units.
    ///
    /// Measured as the thickest contiguous band of fully-free rows
    /// (horizontal corridor) or fully-free columns (vertical corridor),
    /// whichever is wider.
    pub fn corridor_width(&self) -> f64 {
        let mut best = 0usize;

        let mut run = 0usize;
        for r in 0..self.rows {
            if self.row_is_free(r) {
                run += 1;
                best = best.max(run);
            } else {
                run = 0;
            }
        }

        run = 0;
        for c in 0..self.cols {
            if self.col_is_free(c) {
                run += 1;
                best = best.max(run);
            } else {
                run = 0;
            }
        }

        best as f64 * self.cell
    }
}

/// Extracts the feature vector for a candidate layout.
///
/// `placements` must be index-aligned with `room.furniture`.
pub fn extract_features(
    room: &Room,
    placements: &[Placement],
    cfg: &FeatureConfig,
) -> [f64; FEATURE_LEN] {
    let mut features = [0.0; FEATURE_LEN];

    let rects: Vec<_> = room
        .furniture
        .iter()
        .zip(placements)
        .map(|(item, placement)| item.rect_at(placement))
        .collect();

    // Pairwise overlap area, canonical i < j order
    let mut pairwise_area = 0.0;
    for i in 0..rects.len() {
        for j in (i + 1)..rects.len() {
            pairwise_area += overlap_area(&rects[i], &rects[j]);
        }
    }
    features[F_PAIRWISE_OVERLAP_AREA] = pairwise_area;

    let mut fixed_overlap_count = 0usize;
    for rect in &rects {
        for element in &room.fixed_elements {
            if overlaps(rect, &element.rect) {
                fixed_overlap_count += 1;
            }
        }
    }
    features[F_FIXED_OVERLAP_COUNT] = fixed_overlap_count as f64;

    let out_of_bounds = rects
        .iter()
        .filter(|r| !contained_in(r, room.width, room.height))
        .count();
    features[F_OUT_OF_BOUNDS_COUNT] = out_of_bounds as f64;

    let n = rects.len();
    if n > 0 {
        let flush = rects
            .iter()
            .filter(|r| min_wall_distance(r, room.width, room.height).abs() <= cfg.wall_tolerance)
            .count();
        features[F_FLUSH_WALL_FRACTION] = flush as f64 / n as f64;

        let wall_sum: f64 = rects
            .iter()
            .map(|r| min_wall_distance(r, room.width, room.height))
            .sum();
        features[F_MEAN_WALL_DISTANCE] = wall_sum / n as f64;
    }

    if n > 1 {
        let centers: Vec<_> = rects.iter().map(|r| r.center()).collect();
        let mut sum = 0.0;
        let mut pairs = 0usize;
        for i in 0..centers.len() {
            for j in (i + 1)..centers.len() {
                let dx = centers[j].0 - centers[i].0;
                let dy = centers[j].1 - centers[i].1;
                sum += (dx * dx + dy * dy).sqrt();
                pairs += 1;
            }
        }
        features[F_MEAN_PAIR_DISTANCE] = sum / pairs as f64;
    }

    let grid = OccupancyGrid::build(room, placements, cfg.grid_resolution);
    features[F_CORRIDOR_ESTIMATE] = (grid.corridor_width() / cfg.min_corridor_width).clamp(0.0, 1.0);
    features[F_FREE_CELL_FRACTION] = grid.free_fraction();

    features[F_UTILIZATION_RATIO] = room.footprint_area() / room.area();

    features
}
