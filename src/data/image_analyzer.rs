const IMAGE_FORMATS: [(&str, &[u8]); 3] = [
    ("bmp", b"BM"),
    ("png", &[137, 80, 78, 71]),
    ("jpeg", &[255, 216, 255]),
];

/// Recognizes the encoded image formats the native decoder accepts by their magic bytes.
pub struct ImageAnalyzer;

impl ImageAnalyzer {
    pub fn image_format(image_data: &[u8]) -> Option<&'static str> {
        if image_data.len() <= 3 {
            return None;
        }
        IMAGE_FORMATS
            .iter()
            .find(|(_, magic)| image_data.starts_with(magic))
            .map(|(name, _)| *name)
    }

    pub fn is_valid_image_format(image_data: &[u8]) -> bool {
        Self::image_format(image_data).is_some()
    }
}
