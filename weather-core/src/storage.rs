use async_trait::async_trait;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::fmt::Debug;

use crate::error::StorageError;

pub mod s3;

pub use s3::S3Store;

pub const CSV_CONTENT_TYPE: &str = "text/csv";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Characters escaped within a single path segment of an object URL.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A single bucket in an object store.
#[async_trait]
pub trait ObjectStore: Send + Sync + Debug {
    fn bucket(&self) -> &str;

    fn region(&self) -> &str;

    /// Succeeds only if the bucket exists and is reachable.
    async fn head_bucket(&self) -> Result<(), StorageError>;

    async fn create_bucket(&self) -> Result<(), StorageError>;

    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), StorageError>;

    /// Public HTTPS URL of an object in this bucket.
    fn object_url(&self, key: &str) -> String {
        public_object_url(self.bucket(), self.region(), key)
    }
}

pub fn public_object_url(bucket: &str, region: &str, key: &str) -> String {
    let path = key
        .split('/')
        .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/");

    format!("https://{bucket}.s3.{region}.amazonaws.com/{path}")
}
