use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::GrayImage;

use crate::detector::{DetectorSettings, FaceDetector};
use crate::error::CropError;
use crate::geometry::{ImageBounds, Rect};

const MIN_FACE_SIZE: u32 = 20;
const SCORE_THRESHOLD: f64 = 2.0;
const PYRAMID_SCALE_FACTOR: f32 = 0.8;
const WINDOW_STEP: u32 = 4;

/// Face detector backed by the `rustface` crate (SeetaFace funnel cascade).
pub struct SeetaDetector {
    detector: Box<dyn rustface::Detector>,
}

impl SeetaDetector {
    /// Read a SeetaFace model (e.g. `seeta_fd_frontal_v1.0.bin`) from disk.
    pub fn load(path: &Path, settings: DetectorSettings) -> Result<Self, CropError> {
        let file = File::open(path)
            .map_err(|e| CropError::ClassifierLoad(format!("{}: {}", path.display(), e)))?;
        let model = rustface::read_model(BufReader::new(file))
            .map_err(|e| CropError::ClassifierLoad(format!("{}: {}", path.display(), e)))?;

        let mut detector = rustface::create_detector_with_model(model);
        let min_face_size = match settings.min_face_size {
            0 => MIN_FACE_SIZE,
            size => size,
        };
        detector.set_min_face_size(min_face_size);
        detector.set_score_thresh(SCORE_THRESHOLD);
        detector.set_pyramid_scale_factor(PYRAMID_SCALE_FACTOR);
        detector.set_slide_window_step(WINDOW_STEP, WINDOW_STEP);

        Ok(Self { detector })
    }
}

impl FaceDetector for SeetaDetector {
    fn detect(&mut self, gray: &GrayImage) -> Result<Vec<Rect>, CropError> {
        let (width, height) = gray.dimensions();
        let faces = self
            .detector
            .detect(&rustface::ImageData::new(gray.as_raw(), width, height));

        let boxes = faces.iter().map(|face| {
            let bbox = face.bbox();
            Rect::new(
                bbox.x(),
                bbox.y(),
                bbox.width() as i32,
                bbox.height() as i32,
            )
        });
        Ok(clip_to_image(boxes, ImageBounds::new(width, height)))
    }
}

/// Box regression can push a face past the image edge. Keep the visible part
/// of each box and drop boxes that fall entirely outside.
fn clip_to_image(boxes: impl IntoIterator<Item = Rect>, bounds: ImageBounds) -> Vec<Rect> {
    boxes
        .into_iter()
        .filter_map(|rect| {
            let clipped = rect.clip_to(bounds);
            if clipped != Some(rect) {
                log::debug!("Clipped face box {:?} to {:?}", rect, clipped);
            }
            clipped
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn corrupt_model_is_classifier_failure() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = SeetaDetector::load(file.path(), DetectorSettings::default())
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::ClassifierLoadFailure);
    }

    #[test]
    fn edge_boxes_are_clipped() {
        let bounds = ImageBounds::new(300, 300);
        let boxes = clip_to_image(
            [
                Rect::new(250, 40, 100, 100),
                Rect::new(20, 20, 80, 80),
                Rect::new(320, 40, 50, 50),
            ],
            bounds,
        );
        assert_eq!(
            boxes,
            vec![Rect::new(250, 40, 50, 100), Rect::new(20, 20, 80, 80)]
        );
    }

    #[test]
    fn clipped_box_can_be_cropped() {
        let bounds = ImageBounds::new(300, 300);
        let boxes = clip_to_image([Rect::new(250, 40, 100, 100)], bounds);
        let region = crate::geometry::compute_padded_region(boxes[0], bounds, 1.0);
        assert!(region.to_crop_region(bounds).is_some());
    }
}
