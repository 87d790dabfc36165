pub mod diff;
pub mod identity;
pub mod normalize;
pub mod visited;
