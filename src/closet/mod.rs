pub mod stats;
pub mod store;

pub use store::{ ClosetStore, ClothMatch };
