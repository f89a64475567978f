mod bucket_name;
mod object_name;
mod retention_period;

pub use bucket_name::BucketName;
pub use object_name::ObjectName;
pub use retention_period::RetentionPeriod;
