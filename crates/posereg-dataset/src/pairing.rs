use posereg_3d::PoseVector;

use crate::error::DatasetError;
use crate::labels::PoseTable;
use crate::split::Sample;

/// A sample joined to its pose label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSample {
    /// The preprocessed image and its metadata.
    pub sample: Sample,
    /// The normalized pose of the sample.
    pub pose: PoseVector,
    /// Whether the image is a deformed copy of another sample.
    pub augmented: bool,
}

/// Join the samples of a bucket with the rows of a pose table.
///
/// Row `i` of the table labels sample `i`. The join fails instead of silently pairing an
/// image with the pose of another sample.
///
/// # Errors
///
/// [`DatasetError::LabelImageMismatch`] if the counts differ or if the id of a sample
/// differs from the label id of its row.
pub fn pair_samples(
    samples: Vec<Sample>,
    table: &PoseTable,
) -> Result<Vec<LabeledSample>, DatasetError> {
    if samples.len() != table.len() {
        return Err(DatasetError::LabelImageMismatch(format!(
            "{} images but {} label rows",
            samples.len(),
            table.len()
        )));
    }

    samples
        .into_iter()
        .zip(table.poses.iter().zip(table.ids.iter()))
        .enumerate()
        .map(|(row, (sample, (pose, id)))| {
            if sample.id != *id {
                return Err(DatasetError::LabelImageMismatch(format!(
                    "row {row}: image {} has id {} but the label id is {id}",
                    sample.file_name, sample.id
                )));
            }
            Ok(LabeledSample {
                sample,
                pose: *pose,
                augmented: false,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use posereg_image::Image;

    fn sample(id: &str) -> Result<Sample, DatasetError> {
        Ok(Sample {
            file_name: format!("{id}_style02.png"),
            id: id.to_string(),
            style: "style02".to_string(),
            image: Image::from_size_val([2, 2].into(), 0)?,
        })
    }

    fn table(ids: &[&str]) -> PoseTable {
        PoseTable {
            poses: ids
                .iter()
                .enumerate()
                .map(|(i, _)| PoseVector::from([0.0, 0.0, 0.0, i as f64, 0.0, 0.0]))
                .collect(),
            keys: (0..ids.len() as i64).collect(),
            ids: ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn pair_matching_rows() -> Result<(), DatasetError> {
        let samples = vec![sample("0000")?, sample("0000")?, sample("0001")?];
        let labeled = pair_samples(samples, &table(&["0000", "0000", "0001"]))?;
        assert_eq!(labeled.len(), 3);
        assert_eq!(labeled[2].pose.translation[0], 2.0);
        assert!(!labeled[0].augmented);
        Ok(())
    }

    #[test]
    fn pair_count_mismatch() -> Result<(), DatasetError> {
        let samples = vec![sample("0000")?];
        assert!(matches!(
            pair_samples(samples, &table(&["0000", "0001"])),
            Err(DatasetError::LabelImageMismatch(_))
        ));
        Ok(())
    }

    #[test]
    fn pair_id_mismatch() -> Result<(), DatasetError> {
        let samples = vec![sample("0000")?, sample("0002")?];
        match pair_samples(samples, &table(&["0000", "0001"])) {
            Err(DatasetError::LabelImageMismatch(msg)) => assert!(msg.starts_with("row 1")),
            other => panic!("unexpected result: {other:?}"),
        }
        Ok(())
    }
}
