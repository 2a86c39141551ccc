use std::cell::Cell;
use std::rc::Rc;

use px_core::{BoundingBox, Ray, Vector3};

/// Something pickable with a world-space bounding volume.
#[derive(Clone, Debug)]
pub struct SceneObject {
    pub name: String,
    pub bounds: BoundingBox,
}

impl SceneObject {
    pub fn cube(name: impl Into<String>, center: Vector3, half_size: f64) -> Self {
        let half = Vector3::new(half_size, half_size, half_size);
        Self {
            name: name.into(),
            bounds: BoundingBox::new(center - half, center + half),
        }
    }
}

/// Scene contents plus the clock that camera bindings read.
pub struct SceneState {
    pub objects: Vec<SceneObject>,
    /// Seconds since the animation started.
    pub clock: Rc<Cell<f64>>,
}

impl SceneState {
    pub fn demo() -> Self {
        Self {
            objects: vec![
                SceneObject::cube("center", Vector3::ZERO, 1.0),
                SceneObject::cube("east", Vector3::new(4.0, 0.0, 0.0), 0.5),
                SceneObject::cube("west", Vector3::new(-4.0, 0.0, 0.0), 0.5),
                SceneObject::cube("north", Vector3::new(0.0, 0.0, -4.0), 0.5),
            ],
            clock: Rc::new(Cell::new(0.0)),
        }
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(
            self.objects
                .iter()
                .flat_map(|o| [o.bounds.min, o.bounds.max]),
        )
    }

    /// Nearest object hit by `ray`, with the hit distance.
    pub fn pick(&self, ray: &Ray) -> Option<(&SceneObject, f64)> {
        self.objects
            .iter()
            .filter_map(|o| ray.intersect_box(&o.bounds).map(|t| (o, t)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}
