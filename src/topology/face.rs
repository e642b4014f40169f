use crate::geometry::surface::Plane;

use super::wire::WireId;

slotmap::new_key_type! {
    /// Unique identifier for a face in the topology store.
    pub struct FaceId;
}

/// The geometric surface associated with a face.
#[derive(Debug, Clone)]
pub enum FaceSurface {
    /// A planar surface.
    Plane(Plane),
    /// Any other surface kind; carries the STEP entity name.
    Other(String),
}

/// Data associated with a topological face.
///
/// A face is a region on a surface, bounded by an outer wire and optionally
/// inner wires (holes). A face read without any bound has no outer wire.
#[derive(Debug, Clone)]
pub struct FaceData {
    /// The geometric surface on which this face lies.
    pub surface: FaceSurface,
    /// The outer boundary wire.
    pub outer_wire: Option<WireId>,
    /// Inner boundary wires (holes).
    pub inner_wires: Vec<WireId>,
    /// If `true`, the face normal agrees with the surface normal.
    pub same_sense: bool,
}

impl FaceData {
    /// Iterates over all boundary wires, outer wire first.
    pub fn wires(&self) -> impl Iterator<Item = WireId> + '_ {
        self.outer_wire.into_iter().chain(self.inner_wires.iter().copied())
    }
}
