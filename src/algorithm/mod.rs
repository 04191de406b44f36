mod dijkstra;
mod yens;

pub use dijkstra::Dijkstra;
pub use yens::Yens;
