use posereg_3d::metrics::{compare_poses, compute_add, summarize, ErrorSummary, PoseErrors};
use posereg_3d::{PoseVector, TranslationScale};
use posereg_image::Image;
use posereg_imgproc::normalize::cast_and_scale;

use crate::error::DatasetError;
use crate::pairing::LabeledSample;

/// A model predicting poses from normalized RGB images.
pub trait PoseRegressor {
    /// Error returned by the model.
    type Error: std::error::Error;

    /// Predict one pose per image. Images hold RGB values in `[0, 1]`.
    fn predict(&self, batch: &[Image<f32, 3>]) -> Result<Vec<PoseVector>, Self::Error>;
}

/// Per-sample pose errors of a model on a set of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    /// Errors in sample order.
    pub errors: Vec<PoseErrors>,
    /// Aggregate statistics, `None` for an empty set.
    pub summary: Option<ErrorSummary>,
}

/// Per-sample ADD of a model on a set of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct AddReport {
    /// ADD in sample order.
    pub distances: Vec<f64>,
    /// Mean ADD, `None` for an empty set.
    pub mean: Option<f64>,
}

fn predict_all<M: PoseRegressor>(
    model: &M,
    samples: &[LabeledSample],
    batch_size: usize,
) -> Result<Vec<PoseVector>, DatasetError> {
    if batch_size == 0 {
        return Err(DatasetError::Config(
            "batch size must be at least 1".to_string(),
        ));
    }

    let mut predictions = Vec::with_capacity(samples.len());
    for chunk in samples.chunks(batch_size) {
        let batch = chunk
            .iter()
            .map(|s| cast_and_scale(&s.sample.image))
            .collect::<Result<Vec<_>, _>>()?;

        let poses = model
            .predict(&batch)
            .map_err(|e| DatasetError::Model(e.to_string()))?;
        if poses.len() != batch.len() {
            return Err(DatasetError::Model(format!(
                "{} poses predicted for {} images",
                poses.len(),
                batch.len()
            )));
        }
        predictions.extend(poses);
    }
    Ok(predictions)
}

/// Evaluate a model with the translation and rotation errors.
///
/// Images are normalized to `[0, 1]` and fed to the model in batches of `batch_size`.
/// Every prediction is compared with the label of its sample with
/// [`compare_poses`], the same metric used at inference time.
pub fn evaluate<M: PoseRegressor>(
    model: &M,
    samples: &[LabeledSample],
    ts: &TranslationScale,
    batch_size: usize,
) -> Result<EvaluationReport, DatasetError> {
    let predictions = predict_all(model, samples, batch_size)?;

    let errors = predictions
        .iter()
        .zip(samples.iter())
        .map(|(pred, labeled)| compare_poses(pred, &labeled.pose, ts))
        .collect::<Result<Vec<_>, _>>()?;

    let summary = summarize(&errors);
    if let Some(s) = &summary {
        log::info!(
            "evaluated {} samples: translation mean {:.4} median {:.4}, rotation mean {:.3} median {:.3} deg",
            s.count,
            s.mean_translation,
            s.median_translation,
            s.mean_rotation_deg,
            s.median_rotation_deg
        );
    }

    Ok(EvaluationReport { errors, summary })
}

/// Evaluate a model with the mesh-based ADD metric.
pub fn evaluate_add<M: PoseRegressor>(
    model: &M,
    samples: &[LabeledSample],
    mesh: &[[f64; 3]],
    ts: &TranslationScale,
    batch_size: usize,
) -> Result<AddReport, DatasetError> {
    let predictions = predict_all(model, samples, batch_size)?;

    let distances = predictions
        .iter()
        .zip(samples.iter())
        .map(|(pred, labeled)| compute_add(&labeled.pose, pred, mesh, ts))
        .collect::<Result<Vec<_>, _>>()?;

    let mean = (!distances.is_empty())
        .then(|| distances.iter().sum::<f64>() / distances.len() as f64);

    Ok(AddReport { distances, mean })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::split::Sample;
    use posereg_image::ImageSize;

    /// Predicts a pose whose x translation is the mean red value of the image.
    struct MeanRed;

    #[derive(Debug, thiserror::Error)]
    #[error("empty batch")]
    struct EmptyBatch;

    impl PoseRegressor for MeanRed {
        type Error = EmptyBatch;

        fn predict(&self, batch: &[Image<f32, 3>]) -> Result<Vec<PoseVector>, Self::Error> {
            if batch.is_empty() {
                return Err(EmptyBatch);
            }
            Ok(batch
                .iter()
                .map(|img| {
                    let red = img.as_slice().iter().step_by(3).sum::<f32>()
                        / img.size().area() as f32;
                    PoseVector::from([0.0, 0.0, 0.0, red as f64, 0.0, 0.0])
                })
                .collect())
        }
    }

    /// Always returns a single pose.
    struct OnePose;

    impl PoseRegressor for OnePose {
        type Error = EmptyBatch;

        fn predict(&self, _batch: &[Image<f32, 3>]) -> Result<Vec<PoseVector>, Self::Error> {
            Ok(vec![PoseVector::default()])
        }
    }

    fn labeled(red: u8, tx: f64) -> Result<LabeledSample, DatasetError> {
        Ok(LabeledSample {
            sample: Sample {
                file_name: "0000_style01.png".to_string(),
                id: "0000".to_string(),
                style: "style01".to_string(),
                image: Image::new(
                    ImageSize {
                        width: 1,
                        height: 1,
                    },
                    vec![red, 0, 0],
                )?,
            },
            pose: PoseVector::from([0.0, 0.0, 0.0, tx, 0.0, 0.0]),
            augmented: false,
        })
    }

    #[test]
    fn evaluate_perfect_model() -> Result<(), DatasetError> {
        let samples = vec![labeled(0, 0.0)?, labeled(255, 1.0)?, labeled(0, 0.0)?];
        let report = evaluate(&MeanRed, &samples, &TranslationScale::default(), 2)?;
        assert_eq!(report.errors.len(), 3);
        let summary = report.summary.ok_or(DatasetError::Model("no summary".into()))?;
        assert_eq!(summary.count, 3);
        approx::assert_relative_eq!(summary.mean_translation, 0.0, epsilon = 1e-6);
        Ok(())
    }

    #[test]
    fn evaluate_reports_errors() -> Result<(), DatasetError> {
        let samples = vec![labeled(255, 0.0)?];
        let ts = TranslationScale::new([10.0, 1.0, 1.0])?;
        let report = evaluate(&MeanRed, &samples, &ts, 8)?;
        approx::assert_relative_eq!(report.errors[0].translation, 10.0, epsilon = 1e-5);
        Ok(())
    }

    #[test]
    fn evaluate_add_with_mesh() -> Result<(), DatasetError> {
        let samples = vec![labeled(255, 0.0)?, labeled(0, 0.0)?];
        let mesh = [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]];
        let report = evaluate_add(&MeanRed, &samples, &mesh, &TranslationScale::default(), 1)?;
        approx::assert_relative_eq!(report.distances[0], 1.0, epsilon = 1e-6);
        approx::assert_relative_eq!(report.distances[1], 0.0, epsilon = 1e-6);
        assert_eq!(report.mean.map(|m| (m * 1e6).round() / 1e6), Some(0.5));
        Ok(())
    }

    #[test]
    fn evaluate_rejects_wrong_prediction_count() -> Result<(), DatasetError> {
        let samples = vec![labeled(0, 0.0)?, labeled(0, 0.0)?];
        assert!(matches!(
            evaluate(&OnePose, &samples, &TranslationScale::default(), 2),
            Err(DatasetError::Model(_))
        ));
        assert!(matches!(
            evaluate(&OnePose, &samples, &TranslationScale::default(), 0),
            Err(DatasetError::Config(_))
        ));
        Ok(())
    }

    #[test]
    fn evaluate_empty_set() -> Result<(), DatasetError> {
        let report = evaluate(&MeanRed, &[], &TranslationScale::default(), 4)?;
        assert!(report.errors.is_empty());
        assert_eq!(report.summary, None);
        Ok(())
    }
}
