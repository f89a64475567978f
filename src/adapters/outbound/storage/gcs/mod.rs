//! Storage collaborator backed by the Cloud Storage JSON API.

pub mod dto;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header, Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use self::dto::{BucketCreationConfig, BucketResource, ErrorWrapper, ObjectResource};
use super::error::StoreError;
use crate::{
    domain::{
        errors::{StorageError, StorageResult},
        models::{BucketInfo, HoldKind, ObjectInfo},
        value_objects::{BucketName, ObjectName, RetentionPeriod},
    },
    ports::storage::StorageService,
};

pub const DEFAULT_ENDPOINT: &str = "https://storage.googleapis.com";

/// Connection settings for the JSON API
#[derive(Debug, Clone, bon::Builder)]
pub struct GcsConfig {
    /// Scheme and host, without the `/storage/v1` suffix
    #[builder(into, default = DEFAULT_ENDPOINT.to_string())]
    pub endpoint: String,
    /// OAuth2 bearer token sent with every request
    #[builder(into)]
    pub access_token: Option<String>,
    /// Project that owns newly created buckets
    #[builder(into)]
    pub project: Option<String>,
    /// Project billed for requests against requester-pays buckets
    #[builder(into)]
    pub user_project: Option<String>,
}

impl Default for GcsConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Adapter that implements StorageService over HTTP
#[derive(Clone)]
pub struct GcsStorageService {
    client: Client,
    config: GcsConfig,
}

fn bucket_error(bucket: &BucketName, err: StoreError) -> StorageError {
    match err {
        StoreError::Api {
            status: 404,
            message,
        } => StorageError::BucketNotFound {
            bucket: bucket.clone(),
            message,
        },
        other => other.into(),
    }
}

/// An object request can 404 on either the bucket or the object; the
/// service says which in the message ("The specified bucket does not exist."
/// vs "No such object: ...").
fn names_missing_bucket(message: &str) -> bool {
    !message.contains("No such object") && message.to_lowercase().contains("bucket")
}

fn object_error(bucket: &BucketName, object: &ObjectName, err: StoreError) -> StorageError {
    match err {
        StoreError::Api {
            status: 404,
            message,
        } if names_missing_bucket(&message) => StorageError::BucketNotFound {
            bucket: bucket.clone(),
            message,
        },
        StoreError::Api {
            status: 404,
            message,
        } => StorageError::ObjectNotFound {
            bucket: bucket.clone(),
            object: object.clone(),
            message,
        },
        other => other.into(),
    }
}

impl GcsStorageService {
    pub fn new(config: GcsConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Use a preconfigured client (timeouts, proxies, ...)
    pub fn with_client(client: Client, config: GcsConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &GcsConfig {
        &self.config
    }

    fn endpoint(&self) -> &str {
        self.config.endpoint.trim_end_matches('/')
    }

    fn bucket_url(&self, bucket: &BucketName) -> String {
        format!("{}/storage/v1/b/{}", self.endpoint(), bucket)
    }

    fn object_url(&self, bucket: &BucketName, object: &ObjectName) -> String {
        format!("{}/o/{}", self.bucket_url(bucket), object.encoded())
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        debug!("{} {}", method, url);
        let mut builder = self.client.request(method, url);
        if let Some(token) = &self.config.access_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(user_project) = &self.config.user_project {
            builder = builder.query(&[("userProject", user_project)]);
        }
        builder
    }

    async fn send_raw(&self, builder: RequestBuilder) -> Result<String, StoreError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        let message = match serde_json::from_str::<ErrorWrapper>(&body) {
            Ok(wrapper) => wrapper.error.message,
            Err(_) if !body.trim().is_empty() => body,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
        };
        Err(StoreError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, StoreError> {
        let body = self.send_raw(builder).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn send_bucket(
        &self,
        bucket: &BucketName,
        builder: RequestBuilder,
    ) -> StorageResult<BucketInfo> {
        let resource: BucketResource = self
            .send(builder)
            .await
            .map_err(|e| bucket_error(bucket, e))?;
        Ok(BucketInfo::try_from(resource)?)
    }

    async fn send_object(
        &self,
        bucket: &BucketName,
        object: &ObjectName,
        builder: RequestBuilder,
    ) -> StorageResult<ObjectInfo> {
        let resource: ObjectResource = self
            .send(builder)
            .await
            .map_err(|e| object_error(bucket, object, e))?;
        Ok(ObjectInfo::try_from(resource)?)
    }
}

#[async_trait]
impl StorageService for GcsStorageService {
    async fn create_bucket(&self, bucket: &BucketName) -> StorageResult<BucketInfo> {
        let project = self
            .config
            .project
            .as_ref()
            .ok_or_else(|| StorageError::InvalidRequest {
                message: "a project is required to create buckets".to_string(),
            })?;

        let builder = self
            .request(Method::POST, format!("{}/storage/v1/b", self.endpoint()))
            .query(&[("project", project)])
            .json(&BucketCreationConfig {
                name: bucket.to_string(),
            });

        self.send_bucket(bucket, builder).await.map_err(|e| match e {
            StorageError::Conflict { message } => StorageError::BucketAlreadyExists {
                bucket: bucket.clone(),
                message,
            },
            other => other,
        })
    }

    async fn delete_bucket(&self, bucket: &BucketName) -> StorageResult<()> {
        let builder = self.request(Method::DELETE, self.bucket_url(bucket));
        self.send_raw(builder)
            .await
            .map_err(|e| bucket_error(bucket, e))?;
        Ok(())
    }

    async fn get_bucket(&self, bucket: &BucketName) -> StorageResult<BucketInfo> {
        let builder = self.request(Method::GET, self.bucket_url(bucket));
        self.send_bucket(bucket, builder).await
    }

    async fn upload_object(
        &self,
        bucket: &BucketName,
        object: &ObjectName,
        data: Bytes,
        content_type: Option<&str>,
    ) -> StorageResult<ObjectInfo> {
        let url = format!("{}/upload/storage/v1/b/{}/o", self.endpoint(), bucket);
        let builder = self
            .request(Method::POST, url)
            .query(&[("uploadType", "media"), ("name", object.as_str())])
            .header(
                header::CONTENT_TYPE,
                content_type.unwrap_or("application/octet-stream"),
            )
            .body(data);

        self.send_object(bucket, object, builder).await
    }

    async fn get_object(
        &self,
        bucket: &BucketName,
        object: &ObjectName,
    ) -> StorageResult<ObjectInfo> {
        let builder = self.request(Method::GET, self.object_url(bucket, object));
        self.send_object(bucket, object, builder).await
    }

    async fn delete_object(&self, bucket: &BucketName, object: &ObjectName) -> StorageResult<()> {
        let builder = self.request(Method::DELETE, self.object_url(bucket, object));
        self.send_raw(builder)
            .await
            .map_err(|e| object_error(bucket, object, e))?;
        Ok(())
    }

    async fn patch_retention_policy(
        &self,
        bucket: &BucketName,
        period: Option<RetentionPeriod>,
    ) -> StorageResult<BucketInfo> {
        let body = match period {
            Some(period) => json!({ "retentionPolicy": { "retentionPeriod": period.to_string() } }),
            None => json!({ "retentionPolicy": null }),
        };
        let builder = self
            .request(Method::PATCH, self.bucket_url(bucket))
            .json(&body);

        self.send_bucket(bucket, builder).await
    }

    async fn lock_retention_policy(
        &self,
        bucket: &BucketName,
        if_metageneration_match: i64,
    ) -> StorageResult<BucketInfo> {
        let url = format!("{}/lockRetentionPolicy", self.bucket_url(bucket));
        let builder = self
            .request(Method::POST, url)
            .query(&[("ifMetagenerationMatch", if_metageneration_match)])
            .header(header::CONTENT_LENGTH, "0");

        self.send_bucket(bucket, builder).await
    }

    async fn patch_default_event_based_hold(
        &self,
        bucket: &BucketName,
        enabled: bool,
    ) -> StorageResult<BucketInfo> {
        let builder = self
            .request(Method::PATCH, self.bucket_url(bucket))
            .json(&json!({ "defaultEventBasedHold": enabled }));

        self.send_bucket(bucket, builder).await
    }

    async fn patch_object_hold(
        &self,
        bucket: &BucketName,
        object: &ObjectName,
        kind: HoldKind,
        enabled: bool,
    ) -> StorageResult<ObjectInfo> {
        let mut body = serde_json::Map::new();
        body.insert(kind.field_name().to_string(), json!(enabled));
        let builder = self
            .request(Method::PATCH, self.object_url(bucket, object))
            .json(&body);

        self.send_object(bucket, object, builder).await
    }
}
