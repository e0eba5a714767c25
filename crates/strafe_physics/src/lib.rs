//! # strafe_physics - Spatial Queries
//!
//! The simulation never owns level geometry; it asks a [`SpatialQuery`]
//! surface for ray hits, floor heights and blocked space. Two surfaces
//! ship with the crate:
//!
//! - [`OpenField`]: an endless flat floor with nothing on it
//! - [`LevelGeometry`]: a bounded arena of static axis-aligned boxes
//!
//! # Example
//!
//! ```ignore
//! use strafe_physics::prelude::*;
//!
//! let level = LevelGeometry::arena(30.0)
//!     .with_collider(AABB::new(Vec3::new(-1.0, 0.0, -6.0), Vec3::new(1.0, 2.0, -4.0)));
//!
//! let visible = level.line_of_sight(Vec3::new(0.0, 1.6, 0.0), Vec3::new(0.0, 1.6, -10.0));
//! assert!(!visible);
//! ```

pub mod level;
pub mod query;

pub use level::*;
pub use query::*;

pub mod prelude {
    //! Common imports for spatial queries
    pub use crate::level::LevelGeometry;
    pub use crate::query::{slide_move, OpenField, RaycastHit, SpatialQuery};
    pub use strafe_math::{Ray, Vec3, AABB};
}
