mod bucket_policy_service_impl;

pub use bucket_policy_service_impl::{BucketPolicyController, BucketPolicyControllerBuilder};
