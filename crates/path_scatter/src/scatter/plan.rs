//! The placement plan: one record per placed image.
use glam::{IVec2, Vec2};

/// One image placement: where, which image, and how it is jittered.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Path point the placement was derived from.
    pub point: IVec2,
    /// Index into the candidate image pool.
    pub image_index: usize,
    /// Pixel offset added to `point` before centering.
    pub offset: Vec2,
    /// Counter-clockwise rotation in degrees.
    pub rotation_degrees: f32,
    /// Scale factors for width and height.
    pub scale: Vec2,
}

impl Placement {
    /// Create a placement with no jitter.
    pub fn new(point: IVec2, image_index: usize) -> Self {
        Self {
            point,
            image_index,
            offset: Vec2::ZERO,
            rotation_degrees: 0.0,
            scale: Vec2::ONE,
        }
    }

    /// Point the transformed image is centered on.
    pub fn target(&self) -> Vec2 {
        self.point.as_vec2() + self.offset
    }
}

/// Ordered placements. Order is z-order: later placements draw on top.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementPlan {
    pub placements: Vec<Placement>,
}

impl PlacementPlan {
    pub fn new() -> Self {
        Self {
            placements: Vec::new(),
        }
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placements.push(placement);
        self
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Placement> {
        self.placements.iter()
    }

    /// Image indices in placement order.
    pub fn image_indices(&self) -> Vec<usize> {
        self.placements.iter().map(|p| p.image_index).collect()
    }
}

impl<'a> IntoIterator for &'a PlacementPlan {
    type Item = &'a Placement;
    type IntoIter = std::slice::Iter<'a, Placement>;

    fn into_iter(self) -> Self::IntoIter {
        self.placements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_adds_offset_to_point() {
        let mut p = Placement::new(IVec2::new(10, 20), 0);
        p.offset = Vec2::new(-2.5, 3.0);
        assert_eq!(p.target(), Vec2::new(7.5, 23.0));
    }

    #[test]
    fn plan_builder_keeps_order() {
        let plan = PlacementPlan::new()
            .with_placement(Placement::new(IVec2::ZERO, 2))
            .with_placement(Placement::new(IVec2::ONE, 0));
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.image_indices(), vec![2, 0]);
        assert_eq!((&plan).into_iter().count(), 2);
    }
}
