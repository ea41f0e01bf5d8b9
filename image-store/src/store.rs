use crate::client::s3::S3ObjectClient;
use crate::client::{ObjectClient, PutReceipt};
use crate::codec;
use crate::error::StoreError;
use crate::error::StoreError::{DecodeError, EncodeError};
use image::DynamicImage;
use tracing::{error, info, instrument};

/// Output format used when the caller does not name one.
pub const DEFAULT_FORMAT: &str = "png";

/// Reads a decoded image out of a bucket.
#[allow(async_fn_in_trait)]
pub trait ImageReader {
    async fn read(&self, bucket: &str, key: &str) -> Result<DynamicImage, StoreError>;
}

/// Encodes an image and stores it in a bucket.
#[allow(async_fn_in_trait)]
pub trait ImageWriter {
    async fn write(
        &self,
        bucket: &str,
        key: &str,
        image: &DynamicImage,
        format: Option<&str>,
    ) -> Result<PutReceipt, StoreError>;
}

/// The storage adapter: one client handle, decode on the way out of the
/// bucket, encode on the way in. Holds no other state.
#[derive(Debug, Clone)]
pub struct ImageStore<C = S3ObjectClient> {
    client: C,
}

impl ImageStore<S3ObjectClient> {
    /// Build a store whose client comes from ambient environment
    /// configuration. Only for callers that have no client to supply.
    pub async fn from_env() -> ImageStore<S3ObjectClient> {
        ImageStore::new(S3ObjectClient::from_env().await)
    }
}

impl<C> ImageStore<C> {
    /// Wrap a supplied client; nothing is constructed on the caller's
    /// behalf and the client is never replaced.
    pub fn new(client: C) -> ImageStore<C> {
        ImageStore { client }
    }
}

impl<C: ObjectClient> ImageReader for ImageStore<C> {
    /// Fetch the object at `bucket`/`key` and decode it into an image.
    #[instrument(skip(self))]
    async fn read(&self, bucket: &str, key: &str) -> Result<DynamicImage, StoreError> {
        info!("Reading image from bucket={bucket}, key={key}");
        let bytes = self.client.get_object(bucket, key).await?;

        codec::decode(&bytes).map_err(|err| {
            error!("Could not decode image at {bucket}/{key}: {err}");
            DecodeError {
                bucket: bucket.to_string(),
                key: key.to_string(),
            }
        })
    }
}

impl<C: ObjectClient> ImageWriter for ImageStore<C> {
    /// Encode `image` in `format` (PNG when unspecified) and store it at
    /// `bucket`/`key`, replacing any existing object.
    #[instrument(skip(self, image))]
    async fn write(
        &self,
        bucket: &str,
        key: &str,
        image: &DynamicImage,
        format: Option<&str>,
    ) -> Result<PutReceipt, StoreError> {
        let format = format.unwrap_or(DEFAULT_FORMAT);
        let target = codec::parse_format(format).ok_or_else(|| {
            error!("Unsupported output format {format:?} for {bucket}/{key}");
            EncodeError {
                format: format.to_string(),
            }
        })?;

        let body = codec::encode(image, target).map_err(|err| {
            error!("Could not encode image for {bucket}/{key} as {format:?}: {err}");
            EncodeError {
                format: format.to_string(),
            }
        })?;

        info!("Writing image to bucket={bucket}, key={key}");
        self.client.put_object(bucket, key, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use image::{Rgb, RgbImage};

    /// Stands in for the S3 client so the adapter can be exercised offline.
    #[derive(Default)]
    struct MemoryClient {
        objects: Mutex<HashMap<(String, String), Vec<u8>>>,
        uploads: AtomicUsize,
    }

    impl ObjectClient for MemoryClient {
        async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError> {
            self.objects
                .lock()
                .unwrap()
                .get(&(bucket.to_string(), key.to_string()))
                .cloned()
                .ok_or(StoreError::NotFoundError {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                })
        }

        async fn put_object(
            &self,
            bucket: &str,
            key: &str,
            body: Vec<u8>,
        ) -> Result<PutReceipt, StoreError> {
            self.uploads.fetch_add(1, Ordering::SeqCst);
            self.objects
                .lock()
                .unwrap()
                .insert((bucket.to_string(), key.to_string()), body);
            Ok(PutReceipt {
                e_tag: Some(String::from("\"memory-1\"")),
                version_id: None,
            })
        }
    }

    fn red_square() -> DynamicImage {
        let mut img = RgbImage::new(2, 2);
        for pixel in img.pixels_mut() {
            *pixel = Rgb([255, 0, 0]);
        }
        DynamicImage::ImageRgb8(img)
    }

    fn stored_bytes(store: &ImageStore<MemoryClient>, bucket: &str, key: &str) -> Vec<u8> {
        store
            .client
            .objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .unwrap()
    }

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let store = ImageStore::new(MemoryClient::default());
        store
            .write("test-bucket", "img.png", &red_square(), Some("png"))
            .await
            .unwrap();

        let image = store.read("test-bucket", "img.png").await.unwrap();
        assert_eq!((image.width(), image.height()), (2, 2));
        assert!(image.to_rgb8().pixels().all(|px| *px == Rgb([255, 0, 0])));
    }

    #[tokio::test]
    async fn read_missing_key_is_not_found() {
        let store = ImageStore::new(MemoryClient::default());

        let err = store.read("test-bucket", "missing.png").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFoundError { .. }));
    }

    #[tokio::test]
    async fn unknown_format_fails_before_any_upload() {
        let store = ImageStore::new(MemoryClient::default());

        let err = store
            .write("test-bucket", "img.bin", &red_square(), Some("tga2000"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::EncodeError { .. }));
        assert_eq!(store.client.uploads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn read_rejects_non_image_bytes() {
        let client = MemoryClient::default();
        client.objects.lock().unwrap().insert(
            (String::from("test-bucket"), String::from("notes.txt")),
            Vec::from(&b"plain text, not pixels"[..]),
        );
        let store = ImageStore::new(client);

        let err = store.read("test-bucket", "notes.txt").await.unwrap_err();
        assert!(matches!(err, StoreError::DecodeError { .. }));
    }

    #[tokio::test]
    async fn default_format_is_png() {
        let store = ImageStore::new(MemoryClient::default());
        store
            .write("test-bucket", "img", &red_square(), None)
            .await
            .unwrap();

        let stored = stored_bytes(&store, "test-bucket", "img");
        assert_eq!(&stored[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[tokio::test]
    async fn write_returns_the_backend_receipt() {
        let store = ImageStore::new(MemoryClient::default());

        let receipt = store
            .write("test-bucket", "img.png", &red_square(), Some("png"))
            .await
            .unwrap();
        assert_eq!(receipt.e_tag.as_deref(), Some("\"memory-1\""));
        assert_eq!(receipt.version_id, None);
    }

    #[tokio::test]
    async fn write_replaces_an_existing_object() {
        let store = ImageStore::new(MemoryClient::default());
        store
            .write("test-bucket", "img", &red_square(), Some("png"))
            .await
            .unwrap();
        store
            .write("test-bucket", "img", &red_square(), Some("jpeg"))
            .await
            .unwrap();

        // JPEG start-of-image marker: the second write won.
        let stored = stored_bytes(&store, "test-bucket", "img");
        assert_eq!(&stored[..2], b"\xff\xd8");
        assert_eq!(store.client.uploads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn supplied_client_serves_every_call() {
        let store = ImageStore::new(MemoryClient::default());
        store
            .write("test-bucket", "img.png", &red_square(), Some("png"))
            .await
            .unwrap();
        store.read("test-bucket", "img.png").await.unwrap();

        assert_eq!(store.client.uploads.load(Ordering::SeqCst), 1);
    }
}
