use mnemo_shared::{APP_ENV, AppError};

/// Threshold for determining if L2 normalization is needed.
const L2_NORM_TOLERANCE: f32 = 1e-6;

/// Process an embedding vector so it matches `APP_ENV.embedding_dim` and is
/// L2 normalized.
///
/// - If longer than the target: truncate and L2 normalize.
/// - If equal: normalize only if not already unit length.
/// - If shorter: the provider returned fewer dimensions than configured,
///   which is a misconfiguration we can't silently paper over.
pub fn process_embedding(vec: Vec<f32>) -> Result<Vec<f32>, AppError> {
  process_embedding_to(vec, APP_ENV.embedding_dim as usize)
}

fn process_embedding_to(mut vec: Vec<f32>, target_dim: usize) -> Result<Vec<f32>, AppError> {
  match vec.len() {
    d if d > target_dim => {
      vec.truncate(target_dim);
      l2_normalize(&mut vec);
      Ok(vec)
    }
    d if d == target_dim => {
      let norm_sq: f32 = vec.iter().map(|x| x * x).sum();
      if (norm_sq - 1.0).abs() > L2_NORM_TOLERANCE {
        l2_normalize(&mut vec);
      }
      Ok(vec)
    }
    d => Err(AppError::new(anyhow::anyhow!(
      "embedding dimension {d} is less than configured {target_dim}"
    ))),
  }
}

/// L2 normalize a vector in-place.
fn l2_normalize(vec: &mut [f32]) {
  let norm_sq: f32 = vec.iter().map(|x| x * x).sum();
  let norm = norm_sq.sqrt();
  if norm > 1e-12 {
    for x in vec.iter_mut() {
      *x /= norm;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn normalizes_exact_length_vector() {
    let v = vec![1.0_f32; 8];
    let processed = process_embedding_to(v, 8).unwrap();
    let norm_sq: f32 = processed.iter().map(|x| x * x).sum();
    assert!((norm_sq - 1.0).abs() < 1e-4);
  }

  #[test]
  fn truncates_and_renormalizes_longer_vector() {
    let v = vec![1.0_f32; 16];
    let processed = process_embedding_to(v, 8).unwrap();
    assert_eq!(processed.len(), 8);
    let norm_sq: f32 = processed.iter().map(|x| x * x).sum();
    assert!((norm_sq - 1.0).abs() < 1e-4);
  }

  #[test]
  fn rejects_short_vector() {
    assert!(process_embedding_to(vec![1.0, 2.0], 8).is_err());
  }
}
