use thiserror::Error;

#[derive(Error, Debug)]
pub enum MosaicError {
    #[error("Invalid image metadata: {0}")]
    InvalidMetadata(String),

    #[error("Cannot build a mosaic from an empty image set")]
    EmptyImageSet,

    #[error("Failed to load image metadata: {0}")]
    MetadataParse(String),

    #[error("Failed to open photograph: {0}")]
    AssetUnavailable(String),

    #[error("Failed to encode output raster: {0}")]
    EncodeError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MosaicError>;
