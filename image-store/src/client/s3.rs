//! S3 implementation of the object client, over the AWS SDK.

use crate::client::{ObjectClient, PutReceipt};
use crate::error::StoreError;
use crate::error::StoreError::{NotFoundError, StorageWriteError};
use aws_config::BehaviorVersion;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::{error, info};

#[derive(Debug, Clone)]
pub struct S3ObjectClient {
    client: Client,
}

impl S3ObjectClient {
    /// Wrap a pre-configured handle. The handle is used as supplied and is
    /// never re-constructed.
    pub fn new(client: Client) -> S3ObjectClient {
        S3ObjectClient { client }
    }

    /// Build a client from ambient environment configuration (region,
    /// credentials) via the SDK's default provider chain.
    pub async fn from_env() -> S3ObjectClient {
        info!("Initializing S3 client from environment configuration.");
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        S3ObjectClient {
            client: Client::new(&config),
        }
    }
}

impl ObjectClient for S3ObjectClient {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                let err = err.into_service_error();
                if err.is_no_such_key() || err.code() == Some("NoSuchBucket") {
                    error!("No object at {bucket}/{key}");
                } else {
                    error!(
                        "Storage read failed for {bucket}/{key}: {}",
                        DisplayErrorContext(&err)
                    );
                }
                NotFoundError {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                }
            })?;

        let body = output.body.collect().await.map_err(|err| {
            error!("Could not read object body from {bucket}/{key}: {err}");
            NotFoundError {
                bucket: bucket.to_string(),
                key: key.to_string(),
            }
        })?;

        Ok(body.into_bytes().to_vec())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
    ) -> Result<PutReceipt, StoreError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map(|output| PutReceipt {
                e_tag: output.e_tag().map(String::from),
                version_id: output.version_id().map(String::from),
            })
            .map_err(|err| {
                error!(
                    "Storage write failed for {bucket}/{key}: {}",
                    DisplayErrorContext(&err)
                );
                StorageWriteError {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                }
            })
    }
}
