//! Images in and out of S3 object storage.
//!
//! A thin adapter pair around the AWS SDK and the `image` codec: fetch an
//! object by bucket/key and decode it, or encode an image and store it at a
//! bucket/key. Nothing else — no caching, no retries, no resizing.

pub mod client;
pub mod codec;
pub mod error;
pub mod store;

pub use client::s3::S3ObjectClient;
pub use client::{ObjectClient, PutReceipt};
pub use error::StoreError;
pub use store::{ImageReader, ImageStore, ImageWriter, DEFAULT_FORMAT};
