use std::path::Path;

/// File name for the face at `index` out of `total` detections.
///
/// A single face keeps `hint` as is. With several faces `-{index + 1}` is
/// inserted before the extension of the last path component, so
/// `out/face.jpg` becomes `out/face-1.jpg`, `out/face-2.jpg`, ...
///
/// The extension is everything from the last dot of the file name, so a
/// dot file such as `.jpg` is all extension and becomes `-1.jpg`. A
/// trailing dot is not an extension.
pub fn output_name(hint: &str, index: usize, total: usize) -> String {
    if total <= 1 {
        return hint.to_string();
    }

    let suffix = format!("-{}", index + 1);
    let path = Path::new(hint);
    let Some(file_name) = path.file_name().map(|name| name.to_string_lossy()) else {
        return format!("{}{}", hint, suffix);
    };

    match file_name.rfind('.') {
        Some(dot) if dot + 1 < file_name.len() => {
            let (stem, ext) = file_name.split_at(dot);
            let numbered = format!("{}{}{}", stem, suffix, ext);
            path.with_file_name(numbered).to_string_lossy().into_owned()
        }
        _ => format!("{}{}", hint, suffix),
    }
}
