use std::path::Path;

use image::GrayImage;

use crate::error::CropError;
use crate::geometry::Rect;

/// Pluggable face detection backend.
///
/// Implementations return face boxes in pixel coordinates of `gray`. The order
/// of the returned list decides the order (and numbering) of the crops.
pub trait FaceDetector {
    fn detect(&mut self, gray: &GrayImage) -> Result<Vec<Rect>, CropError>;
}

impl<D: FaceDetector + ?Sized> FaceDetector for Box<D> {
    fn detect(&mut self, gray: &GrayImage) -> Result<Vec<Rect>, CropError> {
        (**self).detect(gray)
    }
}

/// Tuning shared by the detector backends.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetectorSettings {
    /// Smallest face edge in pixels; 0 keeps the backend default.
    pub min_face_size: u32,
}

/// Classifier file used when the caller does not name one. The file is not
/// shipped, `resources/README.md` says where to fetch it.
#[cfg(feature = "opencv")]
pub const DEFAULT_CLASSIFIER: &str = "resources/haarcascade_frontalface_default.xml";
#[cfg(not(feature = "opencv"))]
pub const DEFAULT_CLASSIFIER: &str = "resources/seeta_fd_frontal_v1.0.bin";

/// Load a pre-trained classifier and wrap it in the matching backend.
///
/// `.xml` files are OpenCV Haar cascades, everything else is treated as a
/// SeetaFace model.
pub fn load_classifier(
    path: &Path,
    settings: DetectorSettings,
) -> Result<Box<dyn FaceDetector>, CropError> {
    std::fs::metadata(path)
        .map_err(|e| CropError::ClassifierLoad(format!("{}: {}", path.display(), e)))?;

    let is_haar = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));

    log::debug!("Loading pre-trained classifier {}", path.display());

    if is_haar {
        load_haar(path, settings)
    } else {
        load_seeta(path, settings)
    }
}

#[cfg(feature = "opencv")]
fn load_haar(path: &Path, settings: DetectorSettings) -> Result<Box<dyn FaceDetector>, CropError> {
    Ok(Box::new(crate::cascade::HaarCascadeDetector::load(
        path, settings,
    )?))
}

#[cfg(not(feature = "opencv"))]
fn load_haar(path: &Path, _settings: DetectorSettings) -> Result<Box<dyn FaceDetector>, CropError> {
    Err(CropError::DependencyInit(format!(
        "{} is a Haar cascade, rebuild with the `opencv` feature to use it",
        path.display()
    )))
}

#[cfg(feature = "rustface")]
fn load_seeta(path: &Path, settings: DetectorSettings) -> Result<Box<dyn FaceDetector>, CropError> {
    Ok(Box::new(crate::seeta::SeetaDetector::load(path, settings)?))
}

#[cfg(not(feature = "rustface"))]
fn load_seeta(path: &Path, _settings: DetectorSettings) -> Result<Box<dyn FaceDetector>, CropError> {
    Err(CropError::DependencyInit(format!(
        "{} is a SeetaFace model, rebuild with the `rustface` feature to use it",
        path.display()
    )))
}
