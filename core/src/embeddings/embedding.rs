use serde::{Deserialize, Serialize};

use crate::chunker::Segment;

/// A segment paired with the vector computed for its text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    pub segment: Segment,
    pub embedded_data: Vec<f64>,
}

impl Embedding {
    pub fn new(segment: Segment, embedded_data: Vec<f64>) -> Self {
        Self {
            segment,
            embedded_data,
        }
    }

    pub fn dimensions(&self) -> usize {
        self.embedded_data.len()
    }
}
