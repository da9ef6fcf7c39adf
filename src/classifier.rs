//! End-to-end tissue classification: weights in, prediction out.

use std::path::Path;

use candle_core::{D, DType, Device, IndexOp, Module};
use candle_nn::VarBuilder;
use tracing::{debug, info};

use crate::error::ClassifyError;
use crate::labels::{NUM_CLASSES, class_label};
use crate::preprocess;
use crate::resnet::{TissueResNet, resnet18};

/// Outcome of a single forward pass.
#[derive(Debug, Clone)]
pub struct Prediction {
    /// Index of the highest-probability class.
    pub class_index: usize,
    /// Human-readable label, `None` when the index is outside the table.
    pub label: Option<&'static str>,
    /// Probability of the predicted class, as a percentage in [0, 100].
    pub confidence: f32,
    /// Full softmax distribution, one entry per class.
    pub probabilities: Vec<f32>,
}

/// A loaded model bound to the device it will run on.
#[derive(Debug)]
pub struct TissueClassifier {
    model: TissueResNet,
    device: Device,
}

impl TissueClassifier {
    /// Loads pretrained weights and binds the model to the accelerator when
    /// one is present, the CPU otherwise. The choice is a runtime capability
    /// check and is made exactly once.
    pub fn load(weights: &Path) -> Result<Self, ClassifyError> {
        let device = if candle_core::utils::cuda_is_available() {
            info!("CUDA available, running on GPU");
            Device::new_cuda(0)?
        } else {
            info!("no accelerator found, running on CPU");
            Device::Cpu
        };

        let vb = load_weights(weights, &device)?;
        let model = resnet18(vb, NUM_CLASSES)?;
        Ok(Self { model, device })
    }

    /// Classifies a single image file: decode, normalize, forward pass,
    /// softmax. Ranking is a stable descending sort, so equal probabilities
    /// resolve to the first-occurring class index.
    pub fn classify(&self, image: &Path) -> Result<Prediction, ClassifyError> {
        let input = preprocess::load_image(image)?
            .to_device(&self.device)?
            .unsqueeze(0)?;

        let logits = self.model.forward(&input)?;
        let probabilities = candle_nn::ops::softmax(&logits, D::Minus1)?
            .i(0)?
            .to_vec1::<f32>()?;

        let mut ranked = probabilities.iter().copied().enumerate().collect::<Vec<_>>();
        ranked.sort_by(|(_, p1), (_, p2)| p2.total_cmp(p1));
        for &(index, p) in ranked.iter() {
            debug!("{:38}: {:.2}%", class_label(index).unwrap_or("?"), 100.0 * p);
        }

        let (class_index, top) = ranked.first().copied().unwrap_or_default();
        Ok(Prediction {
            class_index,
            label: class_label(class_index),
            confidence: 100.0 * top,
            probabilities,
        })
    }

    pub fn device(&self) -> &Device {
        &self.device
    }
}

/// Reads a weight artifact into a VarBuilder. PyTorch checkpoints go through
/// candle's pickle loader; everything else is treated as safetensors.
fn load_weights(path: &Path, device: &Device) -> Result<VarBuilder<'static>, ClassifyError> {
    let vb = match path.extension().and_then(|ext| ext.to_str()) {
        Some("pt") | Some("pth") => VarBuilder::from_pth(path, DType::F32, device)?,
        _ => unsafe { VarBuilder::from_mmaped_safetensors(&[path], DType::F32, device)? },
    };
    Ok(vb)
}
