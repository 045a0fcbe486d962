pub mod feed_forward;
pub mod pom;

pub use feed_forward::FeedForwardLayer;
pub use pom::{PomGradients, PomLayer};
