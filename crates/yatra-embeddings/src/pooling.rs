//! Pooling of token-level model outputs into one sentence vector.

use ndarray::{Array1, ArrayView2};

/// Mean of the token embeddings whose attention mask is 1, L2-normalized.
///
/// `token_embeddings` is `[seq_len, hidden]`. Mask entries past `seq_len` are
/// ignored; tokens past the end of the mask count as padding. An all-padding
/// input yields a zero vector.
pub fn mean_pool(token_embeddings: ArrayView2<'_, f32>, attention_mask: &[i64]) -> Vec<f32> {
    let hidden_size = token_embeddings.ncols();
    let mut sum = Array1::<f32>::zeros(hidden_size);
    let mut count = 0.0f32;

    for (row, &mask) in token_embeddings.rows().into_iter().zip(attention_mask) {
        if mask == 1 {
            sum += &row;
            count += 1.0;
        }
    }

    if count > 0.0 {
        sum /= count;
    }

    let mut pooled = sum.to_vec();
    l2_normalize(&mut pooled);
    pooled
}

/// Scale `vector` to unit length in place. Zero vectors are left unchanged.
pub fn l2_normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in vector.iter_mut() {
            *v /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_mean_pool_ignores_masked_tokens() {
        let tokens = array![[1.0f32, 2.0, 3.0, 4.0], [5.0, 6.0, 7.0, 8.0]];
        let pooled = mean_pool(tokens.view(), &[1, 0]);

        let norm = (1.0f32 + 4.0 + 9.0 + 16.0).sqrt();
        let expected = [1.0 / norm, 2.0 / norm, 3.0 / norm, 4.0 / norm];
        for (a, b) in pooled.iter().zip(expected) {
            assert!((a - b).abs() < 1e-5, "a={} b={}", a, b);
        }
    }

    #[test]
    fn test_mean_pool_averages_then_normalizes() {
        let tokens = array![[2.0f32, 0.0], [0.0, 2.0]];
        let pooled = mean_pool(tokens.view(), &[1, 1]);

        let expected = 1.0 / 2.0f32.sqrt();
        assert!((pooled[0] - expected).abs() < 1e-5);
        assert!((pooled[1] - expected).abs() < 1e-5);
    }

    #[test]
    fn test_mean_pool_unit_length() {
        let tokens = array![[0.3f32, -1.2, 4.0], [2.5, 0.1, -0.7], [9.0, 9.0, 9.0]];
        let pooled = mean_pool(tokens.view(), &[1, 1, 0]);

        let norm: f32 = pooled.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_mean_pool_all_padding() {
        let tokens = array![[1.0f32, 1.0], [1.0, 1.0]];
        let pooled = mean_pool(tokens.view(), &[0, 0]);
        assert_eq!(pooled, vec![0.0, 0.0]);
    }

    #[test]
    fn test_mean_pool_short_mask() {
        let tokens = array![[3.0f32, 4.0], [100.0, 100.0]];
        let pooled = mean_pool(tokens.view(), &[1]);
        assert!((pooled[0] - 0.6).abs() < 1e-5);
        assert!((pooled[1] - 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_l2_normalize_zero_vector() {
        let mut v = vec![0.0f32; 3];
        l2_normalize(&mut v);
        assert_eq!(v, vec![0.0; 3]);
    }
}
