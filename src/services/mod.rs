mod bucket_use_cases;
mod object_use_cases;

pub use bucket_use_cases::BucketUseCases;
pub use object_use_cases::ObjectUseCases;
