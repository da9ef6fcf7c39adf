//! Image loading and tensor conversion.
//!
//! The scaling is the training recipe's input distribution: bytes map to
//! [0, 1] and then to [-1, 1] via (x - 0.5) / 0.5, in that order. Both
//! steps must stay separate so the values match the trained model exactly.

use std::path::Path;

use candle_core::{DType, Device, Tensor};
use image::RgbImage;
use image::imageops::FilterType;

use crate::error::ClassifyError;

/// Spatial resolution the classifier was trained on.
pub const INPUT_SIZE: u32 = 28;

/// Decodes an image file into a normalized `(3, 28, 28)` float tensor on
/// the CPU. The original resolution and aspect ratio are discarded.
pub fn load_image(path: &Path) -> Result<Tensor, ClassifyError> {
    let reader = image::io::Reader::open(path).map_err(|source| ClassifyError::ImageRead {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = reader.decode().map_err(|source| ClassifyError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })?;
    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(ClassifyError::EmptyImage {
            path: path.to_path_buf(),
        });
    }

    let img = decoded
        .resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::Triangle)
        .to_rgb8();
    to_tensor(img)
}

/// Converts a decoded RGB image to a CHW float tensor in [-1, 1].
pub fn to_tensor(img: RgbImage) -> Result<Tensor, ClassifyError> {
    let (width, height) = img.dimensions();
    let data = img.into_raw();
    let pixels = Tensor::from_vec(data, (height as usize, width as usize, 3), &Device::Cpu)?
        .permute((2, 0, 1))?
        .to_dtype(DType::F32)?;
    let unit = (pixels / 255.0)?;
    Ok(((unit - 0.5)? / 0.5)?)
}
