use std::path::Path;

use candle_core::{DType, Device};
use candle_nn::{VarBuilder, VarMap};
use image::{Rgb, RgbImage};

use candle_pathmnist::{NUM_CLASSES, resnet18};

/// Writes randomly initialized resnet18 weights to `path` so the full
/// load-and-classify path runs without shipping a real checkpoint.
#[allow(dead_code)]
pub fn write_random_weights(path: &Path) -> candle_core::Result<()> {
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
    let _ = resnet18(vb, NUM_CLASSES)?;
    varmap.save(path)
}

/// Writes a small synthetic RGB tile. The dimensions deliberately differ
/// from the model input so the resize path is exercised.
#[allow(dead_code)]
pub fn write_test_image(path: &Path) -> Result<(), image::ImageError> {
    let img = RgbImage::from_fn(64, 48, |x, y| {
        Rgb([(x * 4) as u8, (y * 5) as u8, ((x + y) * 2) as u8])
    });
    img.save(path)
}
