use std::path::Path;

use image::{DynamicImage, GenericImageView};

use crate::detector::{load_classifier, DetectorSettings, FaceDetector};
use crate::encode::{self, OutputFormat};
use crate::error::CropError;
use crate::geometry::{compute_padded_region, CropRegion, ImageBounds, PaddedRegion, Rect};
use crate::naming;

/// Per-call cropping parameters.
#[derive(Debug, Clone)]
pub struct CropOptions {
    /// Output file name; numbered per face when several faces are found.
    pub name: String,
    pub mime_type: String,
    /// Encoder quality, 0.0 to 1.0 (JPEG only).
    pub quality: f32,
    /// Padding multiplier, 1.0 crops the detection box exactly.
    pub factor: f64,
}

impl Default for CropOptions {
    fn default() -> Self {
        Self {
            name: "output.jpg".to_string(),
            mime_type: "image/jpeg".to_string(),
            quality: 0.95,
            factor: 1.0,
        }
    }
}

impl CropOptions {
    /// Check the options and resolve the output format. Runs before any
    /// image or classifier is loaded.
    pub fn validate(&self) -> Result<OutputFormat, CropError> {
        validate_factor(self.factor)?;
        encode::validate_quality(self.quality)?;
        OutputFormat::from_mime(&self.mime_type)
    }
}

/// Reject padding factors that are zero, negative or NaN.
pub fn validate_factor(factor: f64) -> Result<(), CropError> {
    if factor.is_nan() || factor <= 0.0 {
        return Err(CropError::factor_too_low());
    }
    Ok(())
}

/// One encoded face crop.
#[derive(Debug, Clone)]
pub struct CroppedFace {
    /// Position in detection order.
    pub index: usize,
    pub detection: Rect,
    pub region: CropRegion,
    pub file_name: String,
    pub data: Vec<u8>,
}

/// A detected face together with the region that would be cropped for it.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct FaceRegion {
    pub detection: Rect,
    pub region: PaddedRegion,
}

/// Face cropping pipeline: decode → detect → pad → crop → encode.
pub struct FaceCropper {
    detector: Box<dyn FaceDetector>,
}

impl FaceCropper {
    pub fn new(detector: Box<dyn FaceDetector>) -> Self {
        Self { detector }
    }

    /// Build a cropper around a classifier file, see [`load_classifier`].
    pub fn from_classifier(path: &Path, settings: DetectorSettings) -> Result<Self, CropError> {
        Ok(Self::new(load_classifier(path, settings)?))
    }

    /// Crop every face found in the image file at `path`.
    pub fn crop_file(
        &mut self,
        path: &Path,
        options: &CropOptions,
    ) -> Result<Vec<CroppedFace>, CropError> {
        let format = options.validate()?;
        let img = open_image(path)?;
        self.crop_decoded(&img, options, format)
    }

    /// Crop every face found in an already decoded image.
    pub fn crop_image(
        &mut self,
        img: &DynamicImage,
        options: &CropOptions,
    ) -> Result<Vec<CroppedFace>, CropError> {
        let format = options.validate()?;
        self.crop_decoded(img, options, format)
    }

    /// Detect faces and compute their padded regions without cropping.
    pub fn regions(
        &mut self,
        img: &DynamicImage,
        factor: f64,
    ) -> Result<Vec<FaceRegion>, CropError> {
        validate_factor(factor)?;
        let (width, height) = img.dimensions();
        let bounds = ImageBounds::new(width, height);

        Ok(self
            .detect(img)?
            .into_iter()
            .map(|detection| FaceRegion {
                detection,
                region: compute_padded_region(detection, bounds, factor),
            })
            .collect())
    }

    fn detect(&mut self, img: &DynamicImage) -> Result<Vec<Rect>, CropError> {
        let gray = img.to_luma8();
        log::info!("Processing...");
        let faces = self.detector.detect(&gray)?;
        log::debug!("Detected {} face(s)", faces.len());
        Ok(faces)
    }

    fn crop_decoded(
        &mut self,
        img: &DynamicImage,
        options: &CropOptions,
        format: OutputFormat,
    ) -> Result<Vec<CroppedFace>, CropError> {
        let faces = self.detect(img)?;
        crop_faces(img, &faces, options, format)
    }
}

/// Decode the image at `path`.
pub fn open_image(path: &Path) -> Result<DynamicImage, CropError> {
    log::debug!("Loading file {}", path.display());
    image::open(path).map_err(CropError::ImageLoad)
}

fn crop_faces(
    img: &DynamicImage,
    faces: &[Rect],
    options: &CropOptions,
    format: OutputFormat,
) -> Result<Vec<CroppedFace>, CropError> {
    let (width, height) = img.dimensions();
    let bounds = ImageBounds::new(width, height);

    let mut crops = Vec::with_capacity(faces.len());
    for (index, &detection) in faces.iter().enumerate() {
        let padded = compute_padded_region(detection, bounds, options.factor);
        let region = padded
            .to_crop_region(bounds)
            .ok_or_else(|| CropError::InvalidRegion {
                region: padded,
                width,
                height,
            })?;

        log::info!("Rendering output image...");
        let face = img.crop_imm(region.x, region.y, region.width, region.height);
        log::info!("Source File dimension: {}x{}", width, height);
        log::info!(
            "Destination File dimension: {}x{}",
            face.width(),
            face.height()
        );

        let data = encode::encode_image(&face, format, options.quality)?;
        let file_name = naming::output_name(&options.name, index, faces.len());
        log::info!("{} created successfully.", file_name);

        crops.push(CroppedFace {
            index,
            detection,
            region,
            file_name,
            data,
        });
    }

    Ok(crops)
}

/// One-shot cropping: validate, load the image, load the classifier, crop.
///
/// Returns one encoded buffer per face in detection order. Failures are
/// logged and returned; nothing is returned for faces cropped before a
/// failure.
pub fn crop(
    file: &Path,
    options: &CropOptions,
    classifier: &Path,
) -> Result<Vec<Vec<u8>>, CropError> {
    match crop_with_classifier(file, options, classifier) {
        Ok(faces) => Ok(faces.into_iter().map(|face| face.data).collect()),
        Err(e) => {
            log::error!("{}", e);
            Err(e)
        }
    }
}

fn crop_with_classifier(
    file: &Path,
    options: &CropOptions,
    classifier: &Path,
) -> Result<Vec<CroppedFace>, CropError> {
    let format = options.validate()?;
    let img = open_image(file)?;
    let mut cropper = FaceCropper::from_classifier(classifier, DetectorSettings::default())?;
    cropper.crop_decoded(&img, options, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use image::RgbImage;

    struct FixedDetector(Vec<Rect>);

    impl FaceDetector for FixedDetector {
        fn detect(&mut self, _gray: &image::GrayImage) -> Result<Vec<Rect>, CropError> {
            Ok(self.0.clone())
        }
    }

    fn canvas(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        }))
    }

    fn cropper(faces: Vec<Rect>) -> FaceCropper {
        FaceCropper::new(Box::new(FixedDetector(faces)))
    }

    #[test]
    fn default_options() {
        let opts = CropOptions::default();
        assert_eq!(opts.name, "output.jpg");
        assert_eq!(opts.mime_type, "image/jpeg");
        assert!((opts.quality - 0.95).abs() < f32::EPSILON);
        assert_eq!(opts.factor, 1.0);
        assert_eq!(opts.validate().unwrap(), OutputFormat::Jpeg);
    }

    #[test]
    fn factor_must_be_positive() {
        for factor in [0.0, -10.0, f64::NAN] {
            let opts = CropOptions {
                factor,
                ..Default::default()
            };
            let err = opts.validate().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
            assert!(err
                .to_string()
                .contains("Factor passed is too low, should be greater than 0."));
        }
    }

    #[test]
    fn single_face_padded_crop() {
        let mut cropper = cropper(vec![Rect::new(100, 100, 200, 200)]);
        let opts = CropOptions {
            factor: 1.2,
            ..Default::default()
        };
        let faces = cropper.crop_image(&canvas(500, 500), &opts).unwrap();
        assert_eq!(faces.len(), 1);
        let face = &faces[0];
        assert_eq!(
            face.region,
            CropRegion {
                x: 60,
                y: 60,
                width: 280,
                height: 280
            }
        );
        assert_eq!(face.file_name, "output.jpg");
        let decoded = image::load_from_memory(&face.data).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (280, 280));
    }

    #[test]
    fn faces_follow_detection_order() {
        let detections = vec![
            Rect::new(300, 50, 60, 60),
            Rect::new(20, 20, 40, 40),
            Rect::new(150, 200, 80, 80),
        ];
        let mut cropper = cropper(detections.clone());
        let opts = CropOptions {
            name: "faces/out.png".to_string(),
            mime_type: "image/png".to_string(),
            ..Default::default()
        };
        let faces = cropper.crop_image(&canvas(400, 300), &opts).unwrap();

        assert_eq!(faces.len(), 3);
        for (i, face) in faces.iter().enumerate() {
            assert_eq!(face.index, i);
            assert_eq!(face.detection, detections[i]);
            assert_eq!(face.file_name, format!("faces/out-{}.png", i + 1));
            assert_eq!(&face.data[1..4], b"PNG");
        }
    }

    #[test]
    fn crop_keeps_source_pixels() {
        let img = canvas(64, 64);
        let mut cropper = cropper(vec![Rect::new(10, 20, 16, 16)]);
        let opts = CropOptions {
            mime_type: "image/png".to_string(),
            ..Default::default()
        };
        let faces = cropper.crop_image(&img, &opts).unwrap();
        let decoded = image::load_from_memory(&faces[0].data).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (16, 16));
        assert_eq!(decoded.get_pixel(0, 0), &image::Rgb([10, 20, 128]));
        assert_eq!(decoded.get_pixel(15, 15), &image::Rgb([25, 35, 128]));
    }

    #[test]
    fn no_faces_is_empty_result() {
        let mut cropper = cropper(vec![]);
        let faces = cropper
            .crop_image(&canvas(50, 50), &CropOptions::default())
            .unwrap();
        assert!(faces.is_empty());
    }

    #[test]
    fn degenerate_region_is_rejected() {
        let mut cropper = cropper(vec![Rect::new(10, 10, 20, 20)]);
        let opts = CropOptions {
            factor: 0.4,
            ..Default::default()
        };
        let err = cropper.crop_image(&canvas(50, 50), &opts).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRegion);
    }

    #[test]
    fn invalid_options_checked_before_detection() {
        struct Panicking;
        impl FaceDetector for Panicking {
            fn detect(&mut self, _gray: &image::GrayImage) -> Result<Vec<Rect>, CropError> {
                panic!("detector must not run");
            }
        }

        let mut cropper = FaceCropper::new(Box::new(Panicking));
        let opts = CropOptions {
            mime_type: "image/bmp".to_string(),
            ..Default::default()
        };
        let err = cropper.crop_image(&canvas(10, 10), &opts).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn regions_report_padding() {
        let mut cropper = cropper(vec![Rect::new(10, 10, 200, 200)]);
        let regions = cropper.regions(&canvas(500, 500), 2.0).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].region.p1, crate::geometry::Point::new(0, 0));
        assert_eq!(regions[0].region.p2, crate::geometry::Point::new(220, 220));
    }

    #[test]
    fn regions_check_factor_before_detection() {
        struct Panicking;
        impl FaceDetector for Panicking {
            fn detect(&mut self, _gray: &image::GrayImage) -> Result<Vec<Rect>, CropError> {
                panic!("detector must not run");
            }
        }

        let mut cropper = FaceCropper::new(Box::new(Panicking));
        let err = cropper.regions(&canvas(10, 10), -10.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(validate_factor(1.0).is_ok());
        assert!(validate_factor(f64::NAN).is_err());
    }

    #[test]
    fn unreadable_image_keeps_prefix() {
        let err = open_image(Path::new("./invalid-file-name")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceLoadFailure);
        assert!(err.to_string().starts_with("Error: Loading input image failed."));
    }

    #[test]
    fn one_shot_rejects_factor_first() {
        let err = crop(
            Path::new("./invalid-file-name"),
            &CropOptions {
                factor: -10.0,
                ..Default::default()
            },
            Path::new("./missing.xml"),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
