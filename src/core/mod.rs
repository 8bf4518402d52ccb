pub mod errors;
pub mod models;

pub use errors::TansuError;
pub use models::{ Category, Closet, Cloth, StorageBox, BOX_COUNT };
