use crate::error::StoreError;

pub mod s3;

/// Response metadata the backend reports for a completed write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutReceipt {
    pub e_tag: Option<String>,
    pub version_id: Option<String>,
}

/// An authenticated capability for fetching and storing whole objects.
#[allow(async_fn_in_trait)]
pub trait ObjectClient {
    /// Retrieve the full byte content of the object at `bucket`/`key`.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Store `body` as the full content of the object at `bucket`/`key`,
    /// replacing whatever was there.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
    ) -> Result<PutReceipt, StoreError>;
}
