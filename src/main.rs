use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use candle_pathmnist::TissueClassifier;

/// Classify a colorectal histopathology tile into one of the nine PathMNIST
/// tissue categories.
#[derive(Parser)]
#[command(name = "candle-pathmnist")]
#[command(about = "Classifies a histopathology image with a pretrained ResNet")]
struct Args {
    /// Path to the pretrained weights (.safetensors, .pt or .pth)
    model: PathBuf,

    /// Path to the image to classify
    image: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let classifier = TissueClassifier::load(&args.model)
        .with_context(|| format!("failed to load model {}", args.model.display()))?;
    let prediction = classifier
        .classify(&args.image)
        .with_context(|| format!("failed to classify {}", args.image.display()))?;
    info!("inference completed");

    println!("Predicted class index: {}", prediction.class_index);
    if let Some(label) = prediction.label {
        println!("Predicted class: {label}");
    }
    println!("Confidence: {:.2} %", prediction.confidence);
    Ok(())
}
