//! I/O wrappers used while writing archives.

pub mod counting;
pub mod sized;

pub use counting::CountingWriter;
pub use sized::SizedReader;
