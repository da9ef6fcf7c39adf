//! Colorectal tissue classification for 28x28 PathMNIST tiles.
//!
//! Loads pretrained ResNet weights with candle, preprocesses one image to
//! the normalized grid the model was trained on, runs a single forward pass
//! and reports the predicted tissue class with a confidence score.

pub mod classifier;
pub mod error;
pub mod labels;
pub mod preprocess;
pub mod resnet;
pub mod sequential;

pub use classifier::{Prediction, TissueClassifier};
pub use error::ClassifyError;
pub use labels::{CLASS_LABELS, NUM_CLASSES, class_label};
pub use resnet::{TissueResNet, resnet18, resnet34};
