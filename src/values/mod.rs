mod bytes;
mod node;

pub(crate) use node::Link;
pub use {bytes::*, node::Node};
