pub mod serialization;
pub mod store;

pub use store::Store;
