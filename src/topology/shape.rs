use crate::error::TopologyError;

use super::{EdgeId, FaceId, ShellId, SolidId, TopologyStore, VertexId, WireId};

/// Kind of a topological shape, ordered from the most to the least complex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShapeKind {
    Compound,
    Solid,
    Shell,
    Face,
    Wire,
    Edge,
    Vertex,
}

/// A handle to any topological shape held in a [`TopologyStore`].
///
/// `Compound` groups the top-level items of an imported file; every other
/// variant refers to an entity in the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Compound(Vec<Shape>),
    Solid(SolidId),
    Shell(ShellId),
    Face(FaceId),
    Wire(WireId),
    Edge(EdgeId),
    Vertex(VertexId),
}

impl Shape {
    /// Returns the kind of this shape.
    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Compound(_) => ShapeKind::Compound,
            Self::Solid(_) => ShapeKind::Solid,
            Self::Shell(_) => ShapeKind::Shell,
            Self::Face(_) => ShapeKind::Face,
            Self::Wire(_) => ShapeKind::Wire,
            Self::Edge(_) => ShapeKind::Edge,
            Self::Vertex(_) => ShapeKind::Vertex,
        }
    }

    /// Returns `true` if the shape holds no entity at all, i.e. it is a
    /// compound whose members are all (recursively) empty compounds.
    #[must_use]
    pub fn is_null(&self) -> bool {
        match self {
            Self::Compound(members) => members.iter().all(Shape::is_null),
            _ => false,
        }
    }

    /// Returns the face id if this shape is a face.
    #[must_use]
    pub fn as_face(&self) -> Option<FaceId> {
        match self {
            Self::Face(id) => Some(*id),
            _ => None,
        }
    }

    /// Returns the wire id if this shape is a wire.
    #[must_use]
    pub fn as_wire(&self) -> Option<WireId> {
        match self {
            Self::Wire(id) => Some(*id),
            _ => None,
        }
    }
}

/// Depth-first iterator over the sub-shapes of one kind.
///
/// Children are visited in stored order, so results are deterministic. A
/// matching shape is yielded without descending into it, and the root itself
/// is yielded if it already has the requested kind. Iteration is lazy, so
/// callers can stop as soon as they have seen enough.
pub struct Explorer<'a> {
    store: &'a TopologyStore,
    kind: ShapeKind,
    stack: Vec<Shape>,
}

impl<'a> Explorer<'a> {
    pub(super) fn new(store: &'a TopologyStore, root: &Shape, kind: ShapeKind) -> Self {
        Self {
            store,
            kind,
            stack: vec![root.clone()],
        }
    }
}

impl Iterator for Explorer<'_> {
    type Item = Result<Shape, TopologyError>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(shape) = self.stack.pop() {
            let kind = shape.kind();
            if kind == self.kind {
                return Some(Ok(shape));
            }
            // Nothing of the wanted kind lives below a less complex shape.
            if kind > self.kind {
                continue;
            }
            match self.store.children(&shape) {
                Ok(children) => self.stack.extend(children.into_iter().rev()),
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}
