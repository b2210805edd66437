pub mod config;
pub mod output;

// Re-export vision types for convenience
pub use facecrop_vision::{
    crop, geometry, naming, open_image, validate_factor, CropError, CropOptions, CroppedFace,
    DetectorSettings, FaceCropper, FaceDetector,
};
