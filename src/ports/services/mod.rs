mod bucket_policy_service;

pub use bucket_policy_service::BucketPolicyService;
