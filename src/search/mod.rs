//! Resource matching and ranking

mod matcher;
mod ranking;
mod resource;

pub use matcher::ResourceMatcher;
pub use ranking::rank;
pub use resource::{CourseResource, ResourceMetadata};
