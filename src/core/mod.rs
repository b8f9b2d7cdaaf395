//! Core rotation types.

mod builder;
mod resolver;
mod rotator;

pub use builder::KeyWheelBuilder;
pub use resolver::Resolver;
pub use rotator::{KeyWheel, NextKeyRequest, Rotation};
