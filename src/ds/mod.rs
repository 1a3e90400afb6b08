mod sparse_map;

pub use sparse_map::SparseMap;
