pub mod components;
pub mod entity;
pub mod mesh;
pub mod picking;
pub mod prefabs;
pub mod world;

pub use world::*;
