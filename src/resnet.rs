//! Basic-block ResNet sized for 28x28 tiles.
//!
//! Layer naming (conv1/bn1/layerN/fc) follows the PyTorch reference models,
//! so exported checkpoints map directly onto the VarBuilder paths. The stem
//! is the small-input variant: a 3x3 stride-1 convolution and no max-pool,
//! which keeps enough spatial extent for 28x28 inputs.

use candle_core::{D, Module, Result, Tensor};
use candle_nn as nn;
use nn::{BatchNorm, Conv2d, Linear, VarBuilder, batch_norm};

use crate::sequential::{Sequential, seq};

fn conv2d(
    in_planes: usize,
    out_planes: usize,
    ksize: usize,
    padding: usize,
    stride: usize,
    vb: VarBuilder,
) -> Result<Conv2d> {
    let cfg = nn::Conv2dConfig {
        stride,
        padding,
        ..Default::default()
    };
    nn::conv2d_no_bias(in_planes, out_planes, ksize, cfg, vb)
}

/// 1x1 projection used when a block changes resolution or width.
#[derive(Debug, Clone)]
struct Downsample {
    conv: Conv2d,
    bn: BatchNorm,
}

impl Module for Downsample {
    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        xs.apply(&self.conv)?.apply_t(&self.bn, false)
    }
}

fn downsample(
    in_planes: usize,
    out_planes: usize,
    stride: usize,
    vb: VarBuilder,
) -> Result<Option<Downsample>> {
    if stride != 1 || in_planes != out_planes {
        let conv = conv2d(in_planes, out_planes, 1, 0, stride, vb.pp("0"))?;
        let bn = batch_norm(out_planes, 1e-5, vb.pp("1"))?;
        Ok(Some(Downsample { conv, bn }))
    } else {
        Ok(None)
    }
}

#[derive(Debug, Clone)]
pub struct BasicBlock {
    conv1: Conv2d,
    bn1: BatchNorm,
    conv2: Conv2d,
    bn2: BatchNorm,
    downsample: Option<Downsample>,
}

impl BasicBlock {
    pub fn new(vb: VarBuilder, in_planes: usize, out_planes: usize, stride: usize) -> Result<Self> {
        let conv1 = conv2d(in_planes, out_planes, 3, 1, stride, vb.pp("conv1"))?;
        let bn1 = batch_norm(out_planes, 1e-5, vb.pp("bn1"))?;
        let conv2 = conv2d(out_planes, out_planes, 3, 1, 1, vb.pp("conv2"))?;
        let bn2 = batch_norm(out_planes, 1e-5, vb.pp("bn2"))?;
        let downsample = downsample(in_planes, out_planes, stride, vb.pp("downsample"))?;

        Ok(Self {
            conv1,
            bn1,
            conv2,
            bn2,
            downsample,
        })
    }
}

impl Module for BasicBlock {
    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let ys = xs
            .apply(&self.conv1)?
            .apply_t(&self.bn1, false)?
            .relu()?
            .apply(&self.conv2)?
            .apply_t(&self.bn2, false)?;

        match &self.downsample {
            Some(projection) => (xs.apply(projection)? + ys)?.relu(),
            None => (ys + xs)?.relu(),
        }
    }
}

fn stage(
    vb: VarBuilder,
    in_planes: usize,
    out_planes: usize,
    stride: usize,
    blocks: usize,
) -> Result<Sequential<BasicBlock>> {
    let mut layers = seq(blocks);
    for index in 0..blocks {
        let block_in = if index == 0 { in_planes } else { out_planes };
        let block_stride = if index == 0 { stride } else { 1 };
        layers = layers.push(BasicBlock::new(
            vb.pp(index.to_string()),
            block_in,
            out_planes,
            block_stride,
        )?);
    }
    Ok(layers)
}

/// Residual classifier over tissue tiles. Spatial extent shrinks 28 -> 14 ->
/// 7 -> 4 through the strided stages before global average pooling.
#[derive(Debug, Clone)]
pub struct TissueResNet {
    conv1: Conv2d,
    bn1: BatchNorm,
    layer1: Sequential<BasicBlock>,
    layer2: Sequential<BasicBlock>,
    layer3: Sequential<BasicBlock>,
    layer4: Sequential<BasicBlock>,
    fc: Linear,
}

impl TissueResNet {
    pub fn new(
        vb: VarBuilder,
        num_classes: usize,
        c1: usize,
        c2: usize,
        c3: usize,
        c4: usize,
    ) -> Result<Self> {
        let conv1 = conv2d(3, 64, 3, 1, 1, vb.pp("conv1"))?;
        let bn1 = batch_norm(64, 1e-5, vb.pp("bn1"))?;
        let layer1 = stage(vb.pp("layer1"), 64, 64, 1, c1)?;
        let layer2 = stage(vb.pp("layer2"), 64, 128, 2, c2)?;
        let layer3 = stage(vb.pp("layer3"), 128, 256, 2, c3)?;
        let layer4 = stage(vb.pp("layer4"), 256, 512, 2, c4)?;
        let fc = nn::linear(512, num_classes, vb.pp("fc"))?;

        Ok(Self {
            conv1,
            bn1,
            layer1,
            layer2,
            layer3,
            layer4,
            fc,
        })
    }
}

impl Module for TissueResNet {
    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let xs = xs.apply(&self.conv1)?;
        let xs = xs.apply_t(&self.bn1, false)?;
        let xs = xs.relu()?;

        let xs = xs.apply(&self.layer1)?;
        let xs = xs.apply(&self.layer2)?;
        let xs = xs.apply(&self.layer3)?;
        let xs = xs.apply(&self.layer4)?;

        // Equivalent to adaptive_avg_pool2d([1, 1]) -> squeeze(-1) -> squeeze(-1)
        let xs = xs.mean(D::Minus1)?;
        let xs = xs.mean(D::Minus1)?;

        xs.apply(&self.fc)
    }
}

/// ResNet-18 stage layout.
pub fn resnet18(vb: VarBuilder, num_classes: usize) -> Result<TissueResNet> {
    TissueResNet::new(vb, num_classes, 2, 2, 2, 2)
}

/// ResNet-34 stage layout.
pub fn resnet34(vb: VarBuilder, num_classes: usize) -> Result<TissueResNet> {
    TissueResNet::new(vb, num_classes, 3, 4, 6, 3)
}
