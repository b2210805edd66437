use thiserror::Error;

use crate::geometry::PaddedRegion;

/// Coarse classification of a [`CropError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    ResourceLoadFailure,
    ClassifierLoadFailure,
    DependencyInitFailure,
    DetectionFailure,
    InvalidRegion,
    EncodeFailure,
}

/// Every message starts with `Error: ` so callers that only show the
/// rendered text still see a recognisable failure.
#[derive(Debug, Error)]
pub enum CropError {
    #[error("Error: {0}")]
    InvalidArgument(String),

    #[error("Error: Loading input image failed.\n{0}")]
    ImageLoad(#[source] image::ImageError),

    #[error("Error: Pre-Trained Classifier file failed to load.\n{0}")]
    ClassifierLoad(String),

    #[error("Error: Loading face detector failed.\n{0}")]
    DependencyInit(String),

    #[error("Error: Face detection failed.\n{0}")]
    Detection(String),

    #[error("Error: Crop region {region} is outside the {width}x{height} image.")]
    InvalidRegion {
        region: PaddedRegion,
        width: u32,
        height: u32,
    },

    #[error("Error: Encoding output image failed.\n{0}")]
    Encode(#[source] image::ImageError),
}

impl CropError {
    pub(crate) fn factor_too_low() -> Self {
        Self::InvalidArgument(
            "Scaling Factor passed is too low, should be greater than 0.".to_string(),
        )
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::ImageLoad(_) => ErrorKind::ResourceLoadFailure,
            Self::ClassifierLoad(_) => ErrorKind::ClassifierLoadFailure,
            Self::DependencyInit(_) => ErrorKind::DependencyInitFailure,
            Self::Detection(_) => ErrorKind::DetectionFailure,
            Self::InvalidRegion { .. } => ErrorKind::InvalidRegion,
            Self::Encode(_) => ErrorKind::EncodeFailure,
        }
    }
}
