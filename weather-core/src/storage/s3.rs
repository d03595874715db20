use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{
    Client,
    config::Region,
    error::DisplayErrorContext,
    primitives::ByteStream,
    types::{BucketLocationConstraint, CreateBucketConfiguration},
};

use crate::{Config, error::StorageError};

use super::ObjectStore;

/// S3 refuses an explicit location constraint for its default region.
const UNCONSTRAINED_REGION: &str = "us-east-1";

/// [`ObjectStore`] backed by a single Amazon S3 bucket.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
    region: String,
}

impl S3Store {
    pub fn new(client: Client, bucket: String, region: String) -> Self {
        Self { client, bucket, region }
    }

    /// Build a client from the standard AWS credential chain, pinned to the configured region.
    pub async fn from_config(config: &Config) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        Self::new(
            Client::new(&sdk_config),
            config.bucket_name.clone(),
            config.region.clone(),
        )
    }

    fn request_error<E>(&self, operation: &'static str, err: E) -> StorageError
    where
        E: std::error::Error,
    {
        StorageError::Request {
            operation,
            bucket: self.bucket.clone(),
            message: DisplayErrorContext(&err).to_string(),
        }
    }
}

fn location_constraint(region: &str) -> Option<CreateBucketConfiguration> {
    if region == UNCONSTRAINED_REGION {
        return None;
    }

    Some(
        CreateBucketConfiguration::builder()
            .location_constraint(BucketLocationConstraint::from(region))
            .build(),
    )
}

#[async_trait]
impl ObjectStore for S3Store {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn region(&self) -> &str {
        &self.region
    }

    async fn head_bucket(&self) -> Result<(), StorageError> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| self.request_error("HeadBucket", e))?;

        Ok(())
    }

    async fn create_bucket(&self) -> Result<(), StorageError> {
        self.client
            .create_bucket()
            .bucket(&self.bucket)
            .set_create_bucket_configuration(location_constraint(&self.region))
            .send()
            .await
            .map_err(|e| self.request_error("CreateBucket", e))?;

        Ok(())
    }

    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| self.request_error("PutObject", e))?;

        Ok(())
    }
}
