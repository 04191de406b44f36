mod graph;
mod path;

pub use graph::ArcIndex;
pub use graph::Graph;
pub use graph::VertexIndex;
pub use path::Path;
pub use path::PathNode;
