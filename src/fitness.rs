//! Multi-term fitness evaluation.
//!
//! Combines geometric penalties and rewards with the validity classifier's
//! probability into a single scalar, higher is better. Penalty weights are
//! orders of magnitude above the reward weights so that overlapping or
//! out-of-bounds layouts can never outscore an overlap-free one: the total
//! attainable reward is bounded by [`FitnessWeights::max_reward`], while
//! penalties grow linearly with the offending area.

use crate::classifier::{ValidityClassifier, NEUTRAL_SCORE};
use crate::features::{extract_features, FeatureConfig, F_CORRIDOR_ESTIMATE, F_UTILIZATION_RATIO};
use crate::geometry::{outside_area, overlap_area, Rect};
use crate::room::{Placement, Room};
use serde::{Deserialize, Serialize};

/// Weights of the fitness terms.
///
/// The contract is dominance, not the exact values: `w_overlap`, `w_fixed`
/// and `w_bounds` are per-unit-area and must dwarf the bounded rewards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitnessWeights {
    /// Penalty per unit of furniture-furniture overlap area.
    pub w_overlap: f64,
    /// Penalty per unit of furniture-fixed-element overlap area.
    pub w_fixed: f64,
    /// Penalty per unit of area outside the room.
    pub w_bounds: f64,
    /// Reward for the flush-against-wall item fraction.
    pub w_wall: f64,
    /// Reward for the normalized clear-corridor estimate.
    pub w_walkability: f64,
    /// Reward for space utilization up to the ceiling.
    pub w_utilization: f64,
    /// Reward for the classifier's validity probability.
    pub w_classifier: f64,
    /// Utilization ratio beyond which additional density earns nothing.
    pub utilization_ceiling: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            w_overlap: 1000.0,
            w_fixed: 1000.0,
            w_bounds: 1000.0,
            w_wall: 20.0,
            w_walkability: 30.0,
            w_utilization: 25.0,
            w_classifier: 15.0,
            utilization_ceiling: 0.6,
        }
    }
}

impl FitnessWeights {
    /// Creates weights with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Upper bound on the total reward any layout can earn.
    ///
    /// Any overlap area larger than `max_reward() / w_overlap` outweighs
    /// every reward, which is what keeps invalid layouts below valid ones.
    pub fn max_reward(&self) -> f64 {
        self.w_wall
            + self.w_walkability
            + self.w_utilization * self.utilization_ceiling
            + self.w_classifier
    }
}

/// Per-layout fitness breakdown. Produced fresh per evaluation, never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessReport {
    /// Combined furniture-furniture and furniture-fixed overlap penalty
    /// (non-positive).
    pub overlap_penalty: f64,
    /// Out-of-bounds penalty, proportional to the outside area
    /// (non-positive).
    pub out_of_bounds_penalty: f64,
    /// Wall-alignment reward (non-negative).
    pub wall_reward: f64,
    /// Walkability reward (non-negative).
    pub walkability_reward: f64,
    /// Utilization reward (non-negative).
    pub utilization_reward: f64,
    /// Raw classifier probability in `[0, 1]`.
    pub classifier_score: f64,
    /// Weighted classifier term.
    pub classifier_term: f64,
    /// Sum of all terms.
    pub combined: f64,
}

/// Evaluates a candidate layout.
///
/// Deterministic and pure with respect to its inputs; the classifier is
/// treated as a pure function of the feature vector. A classifier failure
/// mid-run (feature contract mismatch) degrades to the neutral score rather
/// than aborting the evaluation.
pub fn evaluate(
    room: &Room,
    placements: &[Placement],
    classifier: &dyn ValidityClassifier,
    weights: &FitnessWeights,
    feature_cfg: &FeatureConfig,
) -> FitnessReport {
    let rects: Vec<_> = room
        .furniture
        .iter()
        .zip(placements)
        .map(|(item, placement)| item.rect_at(placement))
        .collect();

    let mut pair_area = 0.0;
    for i in 0..rects.len() {
        for j in (i + 1)..rects.len() {
            pair_area += overlap_area(&rects[i], &rects[j]);
        }
    }

    let mut fixed_area = 0.0;
    for rect in &rects {
        for element in &room.fixed_elements {
            fixed_area += overlap_area(rect, &element.rect);
        }
    }

    let outside: f64 = rects
        .iter()
        .map(|r| outside_area(r, room.width, room.height))
        .sum();

    let overlap_penalty = -(weights.w_overlap * pair_area + weights.w_fixed * fixed_area);
    let out_of_bounds_penalty = -weights.w_bounds * outside;

    let wall_reward = weights.w_wall * clear_flush_fraction(room, &rects, feature_cfg.wall_tolerance);

    let features = extract_features(room, placements, feature_cfg);
    let walkability_reward = weights.w_walkability * features[F_CORRIDOR_ESTIMATE];
    let utilization_reward = weights.w_utilization
        * features[F_UTILIZATION_RATIO].clamp(0.0, weights.utilization_ceiling);

    let classifier_score = classifier
        .predict_probability(&features)
        .unwrap_or(NEUTRAL_SCORE);
    let classifier_term = weights.w_classifier * classifier_score;

    let combined = overlap_penalty
        + out_of_bounds_penalty
        + wall_reward
        + walkability_reward
        + utilization_reward
        + classifier_term;

    FitnessReport {
        overlap_penalty,
        out_of_bounds_penalty,
        wall_reward,
        walkability_reward,
        utilization_reward,
        classifier_score,
        classifier_term,
        combined,
    }
}

/// Fraction of items flush against a wall whose flush span is not taken by a
/// fixed element on that wall.
///
/// A door or window opening claims its projection on the wall it touches;
/// furniture parked across that span earns no alignment credit there.
fn clear_flush_fraction(room: &Room, rects: &[Rect], tolerance: f64) -> f64 {
    if rects.is_empty() {
        return 0.0;
    }

    // Intervals occupied by fixed elements, per wall: south, north, west, east
    let mut wall_spans: [Vec<(f64, f64)>; 4] = Default::default();
    for element in &room.fixed_elements {
        let (x1, y1, x2, y2) = element.rect.effective_bounds();
        if y1 <= tolerance {
            wall_spans[0].push((x1, x2));
        }
        if room.height - y2 <= tolerance {
            wall_spans[1].push((x1, x2));
        }
        if x1 <= tolerance {
            wall_spans[2].push((y1, y2));
        }
        if room.width - x2 <= tolerance {
            wall_spans[3].push((y1, y2));
        }
    }

    let spans_clear = |spans: &[(f64, f64)], lo: f64, hi: f64| {
        spans.iter().all(|&(a, b)| hi.min(b) - lo.max(a) <= 0.0)
    };

    let flush = rects
        .iter()
        .filter(|rect| {
            let (x1, y1, x2, y2) = rect.effective_bounds();

            (y1.abs() <= tolerance && spans_clear(&wall_spans[0], x1, x2))
                || ((room.height - y2).abs() <= tolerance && spans_clear(&wall_spans[1], x1, x2))
                || (x1.abs() <= tolerance && spans_clear(&wall_spans[2], y1, y2))
                || ((room.width - x2).abs() <= tolerance && spans_clear(&wall_spans[3], y1, y2))
        })
        .count();

    flush as f64 / rects.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::NeutralClassifier;
    use crate::geometry::Rotation;
    use crate::room::{FixedElement, FixedKind, FurnitureItem};

    fn eval(room: &Room, placements: &[Placement]) -> FitnessReport {
        evaluate(
            room,
            placements,
            &NeutralClassifier,
            &FitnessWeights::default(),
            &FeatureConfig::default(),
        )
    }

    fn room_two_squares() -> Room {
        Room::new(300.0, 300.0)
            .with_furniture(FurnitureItem::new("a", "table", 100.0, 100.0))
            .with_furniture(FurnitureItem::new("b", "table", 100.0, 100.0))
    }

    #[test]
    fn test_combined_is_sum_of_terms() {
        let room = room_two_squares();
        let placements = vec![
            Placement::new(0.0, 0.0, Rotation::R0),
            Placement::new(150.0, 150.0, Rotation::R0),
        ];
        let report = eval(&room, &placements);

        let sum = report.overlap_penalty
            + report.out_of_bounds_penalty
            + report.wall_reward
            + report.walkability_reward
            + report.utilization_reward
            + report.classifier_term;
        assert!((report.combined - sum).abs() < 1e-9);
    }

    #[test]
    fn test_overlap_dominance() {
        let room = room_two_squares();

        // Clean but unremarkable layout: floating mid-room, no wall credit
        let clean = vec![
            Placement::new(30.0, 30.0, Rotation::R0),
            Placement::new(160.0, 160.0, Rotation::R0),
        ];
        // Overlapping layout with every reward it can grab
        let overlapping = vec![
            Placement::new(0.0, 0.0, Rotation::R0),
            Placement::new(50.0, 50.0, Rotation::R0),
        ];

        let clean_report = eval(&room, &clean);
        let overlap_report = eval(&room, &overlapping);

        assert_eq!(clean_report.overlap_penalty, 0.0);
        assert!(overlap_report.overlap_penalty < 0.0);
        assert!(clean_report.combined > overlap_report.combined);
    }

    #[test]
    fn test_out_of_bounds_proportional() {
        let room = room_two_squares();
        let slightly_out = vec![
            Placement::new(-10.0, 0.0, Rotation::R0),
            Placement::new(150.0, 150.0, Rotation::R0),
        ];
        let far_out = vec![
            Placement::new(-50.0, 0.0, Rotation::R0),
            Placement::new(150.0, 150.0, Rotation::R0),
        ];

        let a = eval(&room, &slightly_out);
        let b = eval(&room, &far_out);
        assert!(a.out_of_bounds_penalty < 0.0);
        assert!(b.out_of_bounds_penalty < a.out_of_bounds_penalty);
    }

    #[test]
    fn test_no_bounds_penalty_for_contained_placements() {
        // Coordinates with no exact float representation must still yield a
        // penalty of exactly zero when every item is inside the room.
        let room = room_two_squares();
        let contained = vec![
            Placement::new(76.200_000_000_000_07, 10.1, Rotation::R0),
            Placement::new(190.3, 190.700_000_000_000_02, Rotation::R0),
        ];

        let report = eval(&room, &contained);
        assert_eq!(report.out_of_bounds_penalty, 0.0);
    }

    #[test]
    fn test_wall_reward_excludes_door_span() {
        let room = Room::new(400.0, 300.0)
            .with_fixed_element(FixedElement::new(FixedKind::Door, 150.0, 0.0, 50.0, 10.0))
            .with_furniture(FurnitureItem::new("bed", "bed", 180.0, 120.0));

        // Flush on the south wall but parked across the door span
        let over_door = vec![Placement::new(100.0, 0.0, Rotation::R0)];
        // Flush on the north wall, away from the door
        let clear_wall = vec![Placement::new(100.0, 180.0, Rotation::R0)];

        let a = eval(&room, &over_door);
        let b = eval(&room, &clear_wall);
        assert_eq!(a.wall_reward, 0.0);
        assert!(b.wall_reward > 0.0);
    }

    #[test]
    fn test_max_reward_bounds_rewards() {
        let room = room_two_squares();
        let placements = vec![
            Placement::new(0.0, 0.0, Rotation::R0),
            Placement::new(200.0, 200.0, Rotation::R0),
        ];
        let weights = FitnessWeights::default();
        let report = eval(&room, &placements);

        let rewards = report.wall_reward
            + report.walkability_reward
            + report.utilization_reward
            + report.classifier_term;
        assert!(rewards <= weights.max_reward() + 1e-9);
    }

    #[test]
    fn test_classifier_neutral_score_recorded() {
        let room = room_two_squares();
        let placements = vec![
            Placement::new(0.0, 0.0, Rotation::R0),
            Placement::new(150.0, 150.0, Rotation::R0),
        ];
        let report = eval(&room, &placements);
        assert_eq!(report.classifier_score, NEUTRAL_SCORE);
    }
}
