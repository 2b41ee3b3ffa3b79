//! Shape resources: hulls and directional rays per shape and pose.
//!
//! The placement engine never touches meshes directly; it asks a
//! [`ShapeProvider`] for a local hull (corner points) and a set of
//! directional rays for a shape/pose pair. Swapping the provider swaps
//! the geometry backend without touching the placement algorithm.

use cgmath::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// The closed set of object shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Block,
    Wedge,
    Pyramid,
}

impl Shape {
    pub fn from_ident(ident: &str) -> Option<Self> {
        match ident {
            "block" => Some(Shape::Block),
            "wedge" => Some(Shape::Wedge),
            "pyramid" => Some(Shape::Pyramid),
            _ => None,
        }
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Shape::Block => "block",
            Shape::Wedge => "wedge",
            Shape::Pyramid => "pyramid",
        };
        write!(f, "{}", name)
    }
}

/// Pose of an object; selects which hull variant is instantiated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pose {
    Upright,
    UpsideDown,
    Flat,
    Cheesecake,
}

impl Pose {
    pub fn from_ident(ident: &str) -> Option<Self> {
        match ident {
            "upright" => Some(Pose::Upright),
            "upside_down" => Some(Pose::UpsideDown),
            "flat" => Some(Pose::Flat),
            "cheesecake" => Some(Pose::Cheesecake),
            _ => None,
        }
    }
}

impl std::fmt::Display for Pose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Pose::Upright => "upright",
            Pose::UpsideDown => "upside_down",
            Pose::Flat => "flat",
            Pose::Cheesecake => "cheesecake",
        };
        write!(f, "{}", name)
    }
}

/// A directional ray in the owning object's local space.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vector3<f32>,
    pub dir: Vector3<f32>,
}

/// Geometry backend boundary.
///
/// Implementations supply the local hull corners and the pointing rays
/// for every valid shape/pose combination. Invalid combinations are a
/// typed error, not a panic.
pub trait ShapeProvider {
    fn hull(&self, shape: Shape, pose: Pose) -> Result<Vec<Vector3<f32>>, GeometryError>;
    fn rays(&self, shape: Shape, pose: Pose) -> Result<Vec<Ray>, GeometryError>;
}

/// Analytic stand-in for a mesh-backed provider.
///
/// Hulls are the eight corners of a per-shape, per-pose box, centered on
/// the object origin in x/y and resting on it in z, so a freshly created
/// object already sits on the ground plane. Good enough for AABB
/// collision and flush-contact placement; a renderer-backed provider can
/// replace it without any change to the engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct CatalogProvider;

fn box_corners(half: Vector3<f32>) -> Vec<Vector3<f32>> {
    let mut corners = Vec::with_capacity(8);
    for &x in &[-half.x, half.x] {
        for &y in &[-half.y, half.y] {
            for &z in &[0.0, 2.0 * half.z] {
                corners.push(Vector3::new(x, y, z));
            }
        }
    }
    corners
}

impl CatalogProvider {
    fn half_extents(shape: Shape, pose: Pose) -> Result<Vector3<f32>, GeometryError> {
        let half = match (shape, pose) {
            // Tall one-by-one-by-two block.
            (Shape::Block, Pose::Upright) | (Shape::Block, Pose::UpsideDown) => {
                Vector3::new(0.5, 0.5, 1.0)
            }
            (Shape::Block, Pose::Flat) => Vector3::new(1.0, 0.5, 0.5),
            // Wedge: long axis x, slope facing +x.
            (Shape::Wedge, Pose::Upright) => Vector3::new(1.0, 0.5, 0.5),
            (Shape::Wedge, Pose::Cheesecake) => Vector3::new(0.5, 0.5, 1.0),
            (Shape::Wedge, Pose::Flat) => Vector3::new(1.0, 0.55, 0.45),
            (Shape::Pyramid, Pose::Upright) => Vector3::new(0.7, 0.7, 0.6),
            // Tipped over, apex along +x.
            (Shape::Pyramid, Pose::Flat) => Vector3::new(0.6, 0.7, 0.7),
            _ => return Err(GeometryError::InvalidPose { shape, pose }),
        };
        Ok(half)
    }
}

impl ShapeProvider for CatalogProvider {
    fn hull(&self, shape: Shape, pose: Pose) -> Result<Vec<Vector3<f32>>, GeometryError> {
        Self::half_extents(shape, pose).map(box_corners)
    }

    fn rays(&self, shape: Shape, pose: Pose) -> Result<Vec<Ray>, GeometryError> {
        // Validate the combination even for shapes without rays.
        let half = Self::half_extents(shape, pose)?;
        let center = Vector3::new(0.0, 0.0, half.z);
        let rays = match (shape, pose) {
            // One ray per slant face plus the apex.
            (Shape::Pyramid, Pose::Upright) => vec![
                Ray { origin: center, dir: Vector3::unit_x() },
                Ray { origin: center, dir: -Vector3::unit_x() },
                Ray { origin: center, dir: Vector3::unit_y() },
                Ray { origin: center, dir: -Vector3::unit_y() },
                Ray { origin: center, dir: Vector3::unit_z() },
            ],
            // Tip ray only.
            (Shape::Pyramid, Pose::Flat) => vec![Ray { origin: center, dir: Vector3::unit_x() }],
            // Unreachable: half_extents already rejected the combination.
            (Shape::Pyramid, _) => vec![],
            (Shape::Wedge, _) => vec![Ray { origin: center, dir: Vector3::unit_x() }],
            // Blocks do not point.
            (Shape::Block, _) => vec![],
        };
        Ok(rays)
    }
}
