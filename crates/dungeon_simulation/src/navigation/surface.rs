//! Walkable surface sampling (navmesh capability contract)

use bevy::prelude::*;

/// sampleNearestWalkable(point, searchRadius) -> point?
pub trait WalkableSurface: Send + Sync {
    fn sample_nearest_walkable(&self, point: Vec3, search_radius: f32) -> Option<Vec3>;
}

/// Resource: текущий navmesh уровня
///
/// `unbaked()` — navmesh отсутствует, sampling всегда None
/// (телепорты деградируют до raw warp).
#[derive(Resource, Default)]
pub struct NavMesh {
    surface: Option<Box<dyn WalkableSurface>>,
}

impl NavMesh {
    pub fn new(surface: impl WalkableSurface + 'static) -> Self {
        Self {
            surface: Some(Box::new(surface)),
        }
    }

    pub fn unbaked() -> Self {
        Self { surface: None }
    }

    pub fn is_baked(&self) -> bool {
        self.surface.is_some()
    }

    pub fn sample_nearest_walkable(&self, point: Vec3, search_radius: f32) -> Option<Vec3> {
        self.surface
            .as_ref()
            .and_then(|surface| surface.sample_nearest_walkable(point, search_radius))
    }
}

/// Горизонтальный прямоугольник пола (XZ bounds + высота)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkableRect {
    pub min: Vec2,
    pub max: Vec2,
    pub height: f32,
}

impl WalkableRect {
    pub fn new(min: Vec2, max: Vec2, height: f32) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
            height,
        }
    }

    /// Ближайшая точка на прямоугольнике
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        Vec3::new(
            point.x.clamp(self.min.x, self.max.x),
            self.height,
            point.z.clamp(self.min.y, self.max.y),
        )
    }
}

/// Простой navmesh: набор walkable прямоугольников
///
/// Достаточно для уровней-коридоров (checkpoint obstacle course).
#[derive(Debug, Clone, Default)]
pub struct WalkableRegions {
    pub rects: Vec<WalkableRect>,
}

impl WalkableRegions {
    pub fn new(rects: Vec<WalkableRect>) -> Self {
        Self { rects }
    }
}

impl WalkableSurface for WalkableRegions {
    fn sample_nearest_walkable(&self, point: Vec3, search_radius: f32) -> Option<Vec3> {
        self.rects
            .iter()
            .map(|rect| rect.closest_point(point))
            .map(|candidate| (candidate, candidate.distance(point)))
            .filter(|(_, distance)| *distance <= search_radius)
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(candidate, _)| candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> WalkableRegions {
        WalkableRegions::new(vec![
            WalkableRect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0), 0.0),
            WalkableRect::new(Vec2::new(20.0, 0.0), Vec2::new(30.0, 10.0), 5.0),
        ])
    }

    #[test]
    fn test_sample_projects_onto_floor() {
        let sample = floor().sample_nearest_walkable(Vec3::new(5.0, 1.0, 5.0), 2.0);
        assert_eq!(sample, Some(Vec3::new(5.0, 0.0, 5.0)));
    }

    #[test]
    fn test_sample_outside_radius_is_none() {
        let sample = floor().sample_nearest_walkable(Vec3::new(15.0, 0.0, 5.0), 2.0);
        assert_eq!(sample, None);
    }

    #[test]
    fn test_sample_picks_nearest_rect() {
        let sample = floor().sample_nearest_walkable(Vec3::new(21.0, 4.0, 5.0), 2.0);
        assert_eq!(sample, Some(Vec3::new(21.0, 5.0, 5.0)));
    }

    #[test]
    fn test_unbaked_navmesh_samples_nothing() {
        let navmesh = NavMesh::unbaked();
        assert!(!navmesh.is_baked());
        assert_eq!(navmesh.sample_nearest_walkable(Vec3::ZERO, 100.0), None);
    }
}
