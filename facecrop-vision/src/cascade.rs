use std::path::Path;

use image::GrayImage;
use opencv::core::{Mat, Size, Vector};
use opencv::objdetect::CascadeClassifier;
use opencv::prelude::*;

use crate::detector::{DetectorSettings, FaceDetector};
use crate::error::CropError;
use crate::geometry::Rect;

const SCALE_FACTOR: f64 = 1.1;
const MIN_NEIGHBORS: i32 = 3;

/// OpenCV Haar cascade detector (`haarcascade_frontalface_default.xml` and friends).
pub struct HaarCascadeDetector {
    classifier: CascadeClassifier,
    min_size: Size,
}

impl HaarCascadeDetector {
    pub fn load(path: &Path, settings: DetectorSettings) -> Result<Self, CropError> {
        let mut classifier = CascadeClassifier::default()
            .map_err(|e| CropError::DependencyInit(e.to_string()))?;

        let loaded = classifier
            .load(&path.to_string_lossy())
            .map_err(|e| CropError::ClassifierLoad(format!("{}: {}", path.display(), e)))?;
        if !loaded || classifier.empty().unwrap_or(true) {
            return Err(CropError::ClassifierLoad(format!(
                "{}: not a cascade classifier",
                path.display()
            )));
        }

        let side = settings.min_face_size as i32;
        Ok(Self {
            classifier,
            min_size: Size::new(side, side),
        })
    }
}

impl FaceDetector for HaarCascadeDetector {
    fn detect(&mut self, gray: &GrayImage) -> Result<Vec<Rect>, CropError> {
        let to_err = |e: opencv::Error| CropError::Detection(e.to_string());

        let mat = Mat::from_slice(gray.as_raw())
            .map_err(to_err)?
            .reshape(1, gray.height() as i32)
            .map_err(to_err)?
            .clone_pointee();

        let mut faces = Vector::<opencv::core::Rect>::new();
        self.classifier
            .detect_multi_scale(
                &mat,
                &mut faces,
                SCALE_FACTOR,
                MIN_NEIGHBORS,
                0,
                self.min_size,
                Size::new(0, 0),
            )
            .map_err(to_err)?;

        Ok(faces
            .iter()
            .map(|r| Rect::new(r.x, r.y, r.width, r.height))
            .collect())
    }
}
