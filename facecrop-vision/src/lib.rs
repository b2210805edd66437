pub mod detector;
pub mod encode;
pub mod error;
pub mod geometry;
pub mod naming;
pub mod pipeline;

#[cfg(feature = "opencv")]
pub mod cascade;
#[cfg(feature = "rustface")]
pub mod seeta;

// Re-export commonly used types
pub use detector::{load_classifier, DetectorSettings, FaceDetector, DEFAULT_CLASSIFIER};
pub use error::{CropError, ErrorKind};
pub use geometry::{compute_padded_region, CropRegion, ImageBounds, PaddedRegion, Point, Rect};
pub use pipeline::{
    crop, open_image, validate_factor, CropOptions, CroppedFace, FaceCropper, FaceRegion,
};
