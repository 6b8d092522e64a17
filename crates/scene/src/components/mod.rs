pub mod drawable3d;
pub mod light;
pub mod name;
pub mod transform;
pub mod visibility;

pub use drawable3d::*;
pub use light::*;
pub use name::*;
pub use transform::*;
pub use visibility::*;
