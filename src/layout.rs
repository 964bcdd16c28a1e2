//! Layout chromosome and the GA problem wiring it to a room.
//!
//! A [`Layout`] is one candidate arrangement: an ordered placement per
//! furniture item, index-aligned with [`Room::furniture`]. The
//! [`LayoutProblem`] owns the room template, fitness weights, and the loaded
//! classifier, and supplies the GA operators.

use crate::classifier::ValidityClassifier;
use crate::features::FeatureConfig;
use crate::fitness::{evaluate, FitnessReport, FitnessWeights};
use crate::ga::{GaProblem, Individual};
use crate::geometry::Rotation;
use crate::room::{FurnitureItem, Placement, Room};
use rand::Rng;

/// One candidate layout: the GA chromosome.
///
/// Owns its placement data exclusively and caches its fitness report; the
/// cache is dropped whenever a placement changes.
#[derive(Debug, Clone)]
pub struct Layout {
    placements: Vec<Placement>,
    report: Option<FitnessReport>,
}

impl Layout {
    /// Creates a layout from raw placements, unevaluated.
    pub fn new(placements: Vec<Placement>) -> Self {
        Self {
            placements,
            report: None,
        }
    }

    /// The placements, index-aligned with the room's furniture list.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// The cached fitness report, if this layout has been evaluated.
    pub fn report(&self) -> Option<&FitnessReport> {
        self.report.as_ref()
    }

    fn set_report(&mut self, report: FitnessReport) {
        self.report = Some(report);
    }

    fn invalidate(&mut self) {
        self.report = None;
    }
}

impl Individual for Layout {
    fn fitness(&self) -> f64 {
        self.report
            .as_ref()
            .map(|r| r.combined)
            .unwrap_or(f64::NEG_INFINITY)
    }

    /// Exact fitness ties go to the layout with less overlap.
    fn tie_breaker(&self) -> f64 {
        self.report
            .as_ref()
            .map(|r| r.overlap_penalty)
            .unwrap_or(f64::NEG_INFINITY)
    }
}

/// GA problem for furniture layout optimization.
pub struct LayoutProblem {
    room: Room,
    weights: FitnessWeights,
    feature_cfg: FeatureConfig,
    classifier: Box<dyn ValidityClassifier>,
    mutation_rate: f64,
    /// Maximum position perturbation per mutation, in room units.
    position_step: (f64, f64),
}

impl LayoutProblem {
    /// Creates a new layout problem.
    pub fn new(
        room: Room,
        weights: FitnessWeights,
        feature_cfg: FeatureConfig,
        classifier: Box<dyn ValidityClassifier>,
        mutation_rate: f64,
    ) -> Self {
        // Perturbations of ~15% of each room dimension keep mutation local
        // while still escaping poor neighborhoods.
        let position_step = (room.width * 0.15, room.height * 0.15);
        Self {
            room,
            weights,
            feature_cfg,
            classifier,
            mutation_rate,
            position_step,
        }
    }

    /// The room template.
    pub fn room(&self) -> &Room {
        &self.room
    }

    /// Valid placement span for an item at the given rotation: positions in
    /// `[0, span]` keep the item in-bounds. Zero span when the item does not
    /// fit; it then sits at the wall and pays the out-of-bounds penalty.
    fn placement_span(&self, item: &FurnitureItem, rotation: Rotation) -> (f64, f64) {
        let (w, h) = if rotation.swaps_axes() {
            (item.height, item.width)
        } else {
            (item.width, item.height)
        };
        ((self.room.width - w).max(0.0), (self.room.height - h).max(0.0))
    }

    fn random_placement<R: Rng>(&self, item: &FurnitureItem, rng: &mut R) -> Placement {
        let rotation = Rotation::ALL[rng.gen_range(0..Rotation::ALL.len())];
        let (span_x, span_y) = self.placement_span(item, rotation);
        Placement::new(
            rng.gen_range(0.0..=span_x),
            rng.gen_range(0.0..=span_y),
            rotation,
        )
    }

    fn clamp_placement(&self, item: &FurnitureItem, placement: &mut Placement) {
        let (span_x, span_y) = self.placement_span(item, placement.rotation);
        placement.x = placement.x.clamp(0.0, span_x);
        placement.y = placement.y.clamp(0.0, span_y);
    }
}

impl GaProblem for LayoutProblem {
    type Individual = Layout;

    fn random_individual<R: Rng>(&self, rng: &mut R) -> Layout {
        let placements = self
            .room
            .furniture
            .iter()
            .map(|item| self.random_placement(item, rng))
            .collect();
        Layout::new(placements)
    }

    /// Uniform crossover: each item's placement comes from either parent
    /// with equal probability.
    fn crossover<R: Rng>(&self, a: &Layout, b: &Layout, rng: &mut R) -> Layout {
        let placements = a
            .placements
            .iter()
            .zip(&b.placements)
            .map(|(pa, pb)| if rng.gen::<bool>() { *pa } else { *pb })
            .collect();
        Layout::new(placements)
    }

    /// Per-item mutation: a bounded position delta clamped in-bounds, and an
    /// independent rotation re-roll. Items are never removed.
    fn mutate<R: Rng>(&self, layout: &mut Layout, rng: &mut R) {
        let mut changed = false;

        for (item, placement) in self.room.furniture.iter().zip(&mut layout.placements) {
            if rng.gen::<f64>() < self.mutation_rate {
                placement.x += rng.gen_range(-self.position_step.0..=self.position_step.0);
                placement.y += rng.gen_range(-self.position_step.1..=self.position_step.1);
                self.clamp_placement(item, placement);
                changed = true;
            }

            if rng.gen::<f64>() < self.mutation_rate {
                placement.rotation = Rotation::ALL[rng.gen_range(0..Rotation::ALL.len())];
                self.clamp_placement(item, placement);
                changed = true;
            }
        }

        if changed {
            layout.invalidate();
        }
    }

    fn evaluate(&self, layout: &mut Layout) {
        if layout.report.is_some() {
            return;
        }
        let report = evaluate(
            &self.room,
            &layout.placements,
            self.classifier.as_ref(),
            &self.weights,
            &self.feature_cfg,
        );
        layout.set_report(report);
    }

    fn on_generation(&self, generation: u32, best: &Layout) {
        log::debug!(
            "generation {}: best fitness {:.3}",
            generation,
            best.fitness()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::NeutralClassifier;
    use crate::geometry::contained_in;
    use crate::room::FurnitureItem;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn problem() -> LayoutProblem {
        let room = Room::new(400.0, 300.0)
            .with_furniture(FurnitureItem::new("bed", "bed", 180.0, 120.0))
            .with_furniture(FurnitureItem::new("desk", "desk", 140.0, 70.0));
        LayoutProblem::new(
            room,
            FitnessWeights::default(),
            FeatureConfig::default(),
            Box::new(NeutralClassifier),
            0.5,
        )
    }

    fn assert_all_in_bounds(problem: &LayoutProblem, layout: &Layout) {
        for (item, placement) in problem.room.furniture.iter().zip(layout.placements()) {
            let rect = item.rect_at(placement);
            assert!(
                contained_in(&rect, problem.room.width, problem.room.height),
                "item {} out of bounds at {:?}",
                item.id,
                placement
            );
        }
    }

    #[test]
    fn test_random_individuals_in_bounds() {
        let problem = problem();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let layout = problem.random_individual(&mut rng);
            assert_eq!(layout.placements().len(), 2);
            assert_all_in_bounds(&problem, &layout);
        }
    }

    #[test]
    fn test_mutation_keeps_items_in_bounds() {
        let problem = problem();
        let mut rng = StdRng::seed_from_u64(9);
        let mut layout = problem.random_individual(&mut rng);

        for _ in 0..200 {
            problem.mutate(&mut layout, &mut rng);
            assert_all_in_bounds(&problem, &layout);
        }
    }

    #[test]
    fn test_mutation_invalidates_cached_report() {
        let problem = problem();
        let mut rng = StdRng::seed_from_u64(5);
        let mut layout = problem.random_individual(&mut rng);

        problem.evaluate(&mut layout);
        assert!(layout.report().is_some());

        // High mutation rate makes a gene change near-certain over a few tries
        let mut mutated = false;
        for _ in 0..20 {
            problem.mutate(&mut layout, &mut rng);
            if layout.report().is_none() {
                mutated = true;
                break;
            }
        }
        assert!(mutated);
    }

    #[test]
    fn test_crossover_takes_genes_from_parents() {
        let problem = problem();
        let mut rng = StdRng::seed_from_u64(17);

        let a = problem.random_individual(&mut rng);
        let b = problem.random_individual(&mut rng);
        let child = problem.crossover(&a, &b, &mut rng);

        for (i, placement) in child.placements().iter().enumerate() {
            assert!(
                *placement == a.placements()[i] || *placement == b.placements()[i],
                "child gene {} matches neither parent",
                i
            );
        }
    }

    #[test]
    fn test_unevaluated_layout_has_no_fitness() {
        let problem = problem();
        let mut rng = StdRng::seed_from_u64(21);
        let layout = problem.random_individual(&mut rng);
        assert_eq!(layout.fitness(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_oversized_item_pinned_at_origin() {
        let room = Room::new(50.0, 50.0).with_furniture(FurnitureItem::new("x", "wardrobe", 80.0, 80.0));
        let problem = LayoutProblem::new(
            room,
            FitnessWeights::default(),
            FeatureConfig::default(),
            Box::new(NeutralClassifier),
            0.5,
        );
        let mut rng = StdRng::seed_from_u64(1);
        let layout = problem.random_individual(&mut rng);
        assert_eq!(layout.placements()[0].x, 0.0);
        assert_eq!(layout.placements()[0].y, 0.0);
    }
}
