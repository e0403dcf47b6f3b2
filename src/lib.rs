pub mod nbt;
pub mod world;
pub mod ioext;
pub mod error;
pub mod macros;

pub use flate2;

pub use error::StoreError;
pub use error::StoreResult;
pub use error::ErrorKind;
