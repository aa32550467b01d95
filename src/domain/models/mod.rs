pub mod bucket;
pub mod object;

pub use bucket::Bucket;
pub use object::{object_key_from_path, StorageObject};
