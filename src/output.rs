use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use facecrop_vision::CroppedFace;

/// Write each crop to its `file_name`, resolved against `base` when relative.
/// Returns the written paths in detection order.
pub fn write_faces(faces: &[CroppedFace], base: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(faces.len());
    for face in faces {
        let path = base.join(&face.file_name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(&path, &face.data)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!(
            "Face {} written to {} ({} bytes)",
            face.index + 1,
            path.display(),
            face.data.len()
        );
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use facecrop_vision::{CropRegion, Rect};

    fn face(index: usize, file_name: &str) -> CroppedFace {
        CroppedFace {
            index,
            detection: Rect::new(0, 0, 4, 4),
            region: CropRegion {
                x: 0,
                y: 0,
                width: 4,
                height: 4,
            },
            file_name: file_name.to_string(),
            data: vec![index as u8; 8],
        }
    }

    #[test]
    fn writes_every_face() {
        let dir = tempfile::tempdir().unwrap();
        let faces = [face(0, "out/face-1.jpg"), face(1, "out/face-2.jpg")];

        let written = write_faces(&faces, dir.path()).unwrap();

        assert_eq!(written.len(), 2);
        assert_eq!(written[1], dir.path().join("out/face-2.jpg"));
        assert_eq!(std::fs::read(&written[0]).unwrap(), vec![0u8; 8]);
        assert_eq!(std::fs::read(&written[1]).unwrap(), vec![1u8; 8]);
    }
}
