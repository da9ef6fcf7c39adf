//! Tissue categories of the PathMNIST colorectal dataset, in training
//! label order. The order is fixed by the dataset and must not change.

pub const CLASS_LABELS: [&str; 9] = [
    "adipose",
    "background",
    "debris",
    "lymphocytes",
    "mucus",
    "smooth muscle",
    "normal colon mucosa",
    "cancer-associated stroma",
    "colorectal adenocarcinoma epithelium",
];

pub const NUM_CLASSES: usize = CLASS_LABELS.len();

/// Label for a predicted class index, or `None` when the index falls
/// outside the table.
pub fn class_label(index: usize) -> Option<&'static str> {
    CLASS_LABELS.get(index).copied()
}
