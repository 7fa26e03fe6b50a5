//! Cosine similarity over normalized vectors.

/// Cosine similarity of two L2-normalized vectors is their dot product.
/// Vectors of different lengths are compared over the common prefix.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
