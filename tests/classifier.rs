use std::collections::HashMap;
use std::fs;
use std::path::Path;

use candle_core::{DType, Device, Tensor};
use candle_nn::{VarBuilder, VarMap};

use candle_pathmnist::{
    ClassifyError, NUM_CLASSES, TissueClassifier, class_label, preprocess, resnet18,
};

mod common;

#[test]
fn classifies_within_bounds_and_is_deterministic() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let weights = dir.path().join("resnet18.safetensors");
    let image = dir.path().join("tile.png");
    common::write_random_weights(&weights)?;
    common::write_test_image(&image)?;

    let classifier = TissueClassifier::load(&weights)?;
    let first = classifier.classify(&image)?;

    assert!(first.class_index < NUM_CLASSES);
    assert!((0.0..=100.0).contains(&first.confidence));
    assert_eq!(first.probabilities.len(), NUM_CLASSES);
    let total: f32 = first.probabilities.iter().sum();
    assert!((total - 1.0).abs() < 1e-4);
    assert_eq!(first.label, class_label(first.class_index));

    let second = classifier.classify(&image)?;
    assert_eq!(first.class_index, second.class_index);
    assert_eq!(first.confidence, second.confidence);
    Ok(())
}

#[test]
fn decode_failure_short_circuits_inference() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let weights = dir.path().join("resnet18.safetensors");
    let bogus = dir.path().join("not_an_image.png");
    common::write_random_weights(&weights)?;
    fs::write(&bogus, b"plainly not pixels")?;

    let classifier = TissueClassifier::load(&weights)?;
    let err = classifier.classify(&bogus).unwrap_err();
    assert!(matches!(err, ClassifyError::ImageDecode { .. }));
    Ok(())
}

#[test]
fn missing_image_is_a_read_error() {
    let err = preprocess::load_image(Path::new("/no/such/tile.png")).unwrap_err();
    assert!(matches!(err, ClassifyError::ImageRead { .. }));
}

#[test]
fn missing_weights_fail_to_load() {
    let err = TissueClassifier::load(Path::new("/no/such/model.safetensors")).unwrap_err();
    assert!(matches!(err, ClassifyError::Candle(_)));
}

// All-zero weights drive every logit to zero, so the softmax is uniform and
// the tie must resolve to the first class in the table.
#[test]
fn uniform_scores_resolve_to_the_first_class() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let weights = dir.path().join("zeros.safetensors");
    let image = dir.path().join("tile.png");
    common::write_test_image(&image)?;

    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
    let _ = resnet18(vb, NUM_CLASSES)?;
    let zeros = varmap
        .data()
        .lock()
        .unwrap()
        .iter()
        .map(|(name, var)| {
            Ok((
                name.clone(),
                Tensor::zeros(var.dims(), DType::F32, &Device::Cpu)?,
            ))
        })
        .collect::<candle_core::Result<HashMap<String, Tensor>>>()?;
    candle_core::safetensors::save(&zeros, &weights)?;

    let classifier = TissueClassifier::load(&weights)?;
    let prediction = classifier.classify(&image)?;

    assert_eq!(prediction.class_index, 0);
    assert_eq!(prediction.label, Some("adipose"));
    let uniform = 100.0 / NUM_CLASSES as f32;
    assert!((prediction.confidence - uniform).abs() < 1e-3);
    Ok(())
}
