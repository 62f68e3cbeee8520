//! S3 object store client
//!
//! Implements [`ObjectStore`] on top of the AWS SDK. Transport, signing and retry
//! behaviour are whatever the SDK client is configured with.

use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::operation::head_object::HeadObjectError;
use aws_sdk_s3::primitives::{ByteStream, DateTime};
use bytes::Bytes;
use log::{debug, info};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::config::VolumeConfig;
use crate::error::StoreError;
use crate::store::{ObjectBody, ObjectListing, ObjectMeta, ObjectStore, ObjectSummary};

const FALLBACK_REGION: &str = "us-east-1";
const CREDENTIALS_PROVIDER: &str = "rax-s3-volume";

#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds an SDK client from static credentials and the optional endpoint/region.
    pub async fn from_config(config: &VolumeConfig) -> Self {
        let credentials = Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None,
            None,
            CREDENTIALS_PROVIDER,
        );
        let region = RegionProviderChain::first_try(config.region.clone().map(Region::new))
            .or_default_provider()
            .or_else(Region::new(FALLBACK_REGION));

        let shared = aws_config::defaults(BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(region)
            .load()
            .await;

        let mut builder =
            aws_sdk_s3::config::Builder::from(&shared).force_path_style(config.force_path_style);
        if let Some(endpoint) = config.endpoint.as_deref().filter(|e| !e.is_empty()) {
            builder = builder.endpoint_url(endpoint);
        }

        info!(
            "S3 client configured (endpoint: {}, path-style: {})",
            config.endpoint.as_deref().unwrap_or("default"),
            config.force_path_style
        );

        Self::new(Client::from_conf(builder.build()))
    }
}

fn to_system_time(value: Option<&DateTime>) -> Option<SystemTime> {
    let value = value?;
    u64::try_from(value.secs())
        .ok()
        .map(|secs| UNIX_EPOCH + Duration::from_secs(secs))
}

fn to_length(value: Option<i64>) -> u64 {
    value.and_then(|v| u64::try_from(v).ok()).unwrap_or(0)
}

/// Maps an SDK failure, treating the service's "missing key" answers as `NotFound`.
fn map_sdk_error<E, R>(
    key: &str,
    err: SdkError<E, R>,
    is_missing: impl Fn(&E) -> bool,
) -> StoreError
where
    E: std::error::Error + ProvideErrorMetadata + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    match &err {
        SdkError::ServiceError(service) if is_missing(service.err()) => {
            StoreError::NotFound(key.to_string())
        }
        SdkError::ServiceError(service) => StoreError::Service(format!(
            "{}: {}",
            service.err().code().unwrap_or("Unknown"),
            service.err().message().unwrap_or("no message")
        )),
        _ => StoreError::Transport(DisplayErrorContext(&err).to_string()),
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectMeta, StoreError> {
        let output = self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| map_sdk_error(key, e, HeadObjectError::is_not_found))?;

        Ok(ObjectMeta {
            content_length: to_length(output.content_length()),
            content_type: output.content_type().map(str::to_string),
            last_modified: to_system_time(output.last_modified()),
        })
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectBody, StoreError> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| map_sdk_error(key, e, GetObjectError::is_no_such_key))?;

        let content_type = output.content_type().map(str::to_string);
        let body = output
            .body
            .collect()
            .await
            .map_err(|e| StoreError::Transport(format!("reading body of {}: {}", key, e)))?
            .into_bytes();

        Ok(ObjectBody {
            content_length: body.len() as u64,
            body,
            content_type,
        })
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> Result<(), StoreError> {
        let length = body.len() as i64;
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_length(length)
            .set_content_type(content_type.map(str::to_string))
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| map_sdk_error(key, e, |_| false))?;
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StoreError> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| map_sdk_error(key, e, |_| false))?;
        Ok(())
    }

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        delimiter: Option<char>,
    ) -> Result<ObjectListing, StoreError> {
        let mut listing = ObjectListing::default();
        let mut continuation: Option<String> = None;

        loop {
            let output = self
                .client
                .list_objects_v2()
                .bucket(bucket)
                .prefix(prefix)
                .set_delimiter(delimiter.map(String::from))
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|e| map_sdk_error(prefix, e, |_| false))?;

            for object in output.contents() {
                if let Some(key) = object.key() {
                    listing.objects.push(ObjectSummary {
                        key: key.to_string(),
                        size: to_length(object.size()),
                        last_modified: to_system_time(object.last_modified()),
                    });
                }
            }
            listing.common_prefixes.extend(
                output
                    .common_prefixes()
                    .iter()
                    .filter_map(|p| p.prefix().map(str::to_string)),
            );

            match output.next_continuation_token() {
                Some(token) if output.is_truncated().unwrap_or(false) => {
                    debug!("Listing {} continues after token {}", prefix, token);
                    continuation = Some(token.to_string());
                }
                _ => break,
            }
        }

        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::error::ErrorMetadata;
    use aws_sdk_s3::types::error::NotFound;

    fn head_error(err: HeadObjectError) -> SdkError<HeadObjectError, ()> {
        SdkError::service_error(err, ())
    }

    #[test]
    fn test_missing_key_maps_to_not_found() {
        let err = head_error(HeadObjectError::NotFound(NotFound::builder().build()));
        let mapped = map_sdk_error("docs/a.txt", err, HeadObjectError::is_not_found);
        assert!(matches!(mapped, StoreError::NotFound(key) if key == "docs/a.txt"));
    }

    #[test]
    fn test_other_service_errors_keep_code_and_message() {
        let meta = ErrorMetadata::builder()
            .code("AccessDenied")
            .message("denied")
            .build();
        let err = head_error(HeadObjectError::generic(meta));
        let mapped = map_sdk_error("docs/a.txt", err, HeadObjectError::is_not_found);
        assert!(matches!(mapped, StoreError::Service(msg) if msg == "AccessDenied: denied"));
    }

    #[test]
    fn test_non_service_failures_map_to_transport() {
        let err: SdkError<HeadObjectError, ()> = SdkError::timeout_error("timed out");
        let mapped = map_sdk_error("docs/a.txt", err, HeadObjectError::is_not_found);
        assert!(matches!(mapped, StoreError::Transport(_)));
    }

    #[test]
    fn test_conversions_clamp_invalid_values() {
        assert_eq!(to_length(Some(-1)), 0);
        assert_eq!(to_length(Some(42)), 42);
        assert_eq!(to_system_time(Some(&DateTime::from_secs(-5))), None);
        assert_eq!(
            to_system_time(Some(&DateTime::from_secs(60))),
            Some(UNIX_EPOCH + Duration::from_secs(60))
        );
    }
}
