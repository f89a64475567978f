mod policy_errors;
mod storage_errors;
mod validation_errors;

pub use policy_errors::*;
pub use storage_errors::*;
pub use validation_errors::*;
