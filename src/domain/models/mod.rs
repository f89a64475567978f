pub mod bucket;
pub mod object;
pub mod operation;

pub use bucket::{BucketInfo, RetentionPolicy, RetentionState};
pub use object::{HoldKind, ObjectInfo};
pub use operation::{OperationOutcome, PolicyOperation};
