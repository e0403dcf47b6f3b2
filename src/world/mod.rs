//! Chunk storage: region files and the world-level cache over them.

pub mod chunk;
pub mod io;
pub mod world;

pub use chunk::{AirChunk, EmptyChunk};
pub use io::region::{RegionCoord, RegionOptions, RegionStore, Timestamp};
pub use world::WorldStore;
