//! Axis-aligned bounding boxes.
//!
//! The collision gate and the visibility ray-caster both work purely on
//! world-space AABBs derived from an object's transformed hull corners.

use cgmath::Vector3;

/// World-space axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    /// Reduce a set of points to their per-axis min/max corners.
    ///
    /// Returns `None` for an empty point set.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vector3<f32>>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut min = first;
        let mut max = first;
        for p in points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }
        Some(Self { min, max })
    }

    /// Inclusive overlap test on all three axis intervals.
    ///
    /// Touching corners count as overlap. This is deliberate: a placement
    /// that merely grazes another object still fails the collision gate
    /// and adjacency has to come from an explicit touching relation.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    pub fn extent(&self) -> Vector3<f32> {
        self.max - self.min
    }

    /// Slab-method ray intersection.
    ///
    /// Returns the (entry, exit) distances along `dir`, with the entry
    /// clamped to zero when the origin already lies inside the box.
    /// `None` if the box is missed or lies entirely behind the origin.
    pub fn ray_span(&self, origin: Vector3<f32>, dir: Vector3<f32>) -> Option<(f32, f32)> {
        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;
        for axis in 0..3 {
            let o = origin[axis];
            let d = dir[axis];
            if d.abs() < 1e-8 {
                // Parallel to this slab: must already be within it.
                if o < self.min[axis] || o > self.max[axis] {
                    return None;
                }
            } else {
                let inv = 1.0 / d;
                let t0 = (self.min[axis] - o) * inv;
                let t1 = (self.max[axis] - o) * inv;
                let (near, far) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
                t_min = t_min.max(near);
                t_max = t_max.min(far);
                if t_min > t_max {
                    return None;
                }
            }
        }
        if t_max < 0.0 {
            None
        } else {
            Some((t_min.max(0.0), t_max))
        }
    }
}
