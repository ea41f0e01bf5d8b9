use crate::error::StoreError::{DecodeError, EncodeError, NotFoundError, StorageWriteError};
use std::error;
use std::fmt::{Display, Formatter};

/// Everything that can go wrong while moving an image in or out of a bucket.
#[derive(Debug)]
pub enum StoreError {
    NotFoundError { bucket: String, key: String },
    DecodeError { bucket: String, key: String },
    EncodeError { format: String },
    StorageWriteError { bucket: String, key: String },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NotFoundError { bucket, key } => {
                write!(f, "Image not found at {bucket}/{key}.")
            }
            DecodeError { bucket, key } => {
                write!(f, "Image at {bucket}/{key} could not be decoded.")
            }
            EncodeError { format } => {
                write!(f, "Image could not be encoded as {format:?}.")
            }
            StorageWriteError { bucket, key } => {
                write!(f, "Image could not be written to {bucket}/{key}.")
            }
        }
    }
}

impl error::Error for StoreError {}
