use std::error::Error;
use std::fmt;

use crate::handle::{LineId, SectorId, SideId, VertexId};

/// Why an editing call was rejected. A rejected call leaves the editable map
/// exactly as it was.
#[derive(Debug, Clone, PartialEq)]
pub enum EditError {
    /// No map is being edited (`begin` was not called, or `end` already ran)
    NotEditing,
    VertexOutOfRange(VertexId),
    SideOutOfRange(SideId),
    SectorOutOfRange(SectorId),
    LineOutOfRange(LineId),
    /// Both ends of a linedef are the same vertex
    SameVertex(VertexId),
    /// The linedef's ends are distinct vertices at the same position
    ZeroLength(VertexId, VertexId),
    /// Each sidedef may belong to one linedef only
    SideInUse(SideId),
    /// The line already belongs to a polyobj
    LineInPolyobj(LineId),
    /// A polyobj needs at least one line
    NoLines,
    /// Batch vertex creation needs at least one position
    NoVertexes,
    UnknownObject(String),
    UnknownProperty { object: String, property: String },
}

impl Error for EditError {}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::NotEditing => write!(f, "no map is being edited"),
            EditError::VertexOutOfRange(v) => write!(f, "vertex {} does not exist", v),
            EditError::SideOutOfRange(s) => write!(f, "sidedef {} does not exist", s),
            EditError::SectorOutOfRange(s) => write!(f, "sector {} does not exist", s),
            EditError::LineOutOfRange(l) => write!(f, "linedef {} does not exist", l),
            EditError::SameVertex(v) => write!(f, "linedef starts and ends at vertex {}", v),
            EditError::ZeroLength(a, b) => {
                write!(f, "linedef from vertex {} to {} has zero length", a, b)
            }
            EditError::SideInUse(s) => write!(f, "sidedef {} already belongs to a linedef", s),
            EditError::LineInPolyobj(l) => {
                write!(f, "linedef {} already belongs to a polyobj", l)
            }
            EditError::NoLines => write!(f, "polyobj has no lines"),
            EditError::NoVertexes => write!(f, "no vertex positions given"),
            EditError::UnknownObject(o) => write!(f, "unknown game object \"{}\"", o),
            EditError::UnknownProperty { object, property } => {
                write!(f, "{} has no property \"{}\"", object, property)
            }
        }
    }
}

/// Why `end` could not produce a map
#[derive(Debug, Clone, PartialEq)]
pub enum BuildError {
    NotEditing,
    /// The partitioner gave up. The map can not be loaded
    BspFailed,
}

impl Error for BuildError {}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::NotEditing => write!(f, "no map is being edited"),
            BuildError::BspFailed => write!(f, "BSP build failed"),
        }
    }
}
