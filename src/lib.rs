pub mod closet;
pub mod core;
pub mod persistence;

pub use closet::{ ClosetStore, ClothMatch };
pub use self::core::{ Category, Closet, Cloth, StorageBox, TansuError, BOX_COUNT };
