use posereg_imgproc::augment::{elastic_transform, ElasticParams};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::error::DatasetError;
use crate::pairing::LabeledSample;

/// Append one elastically deformed copy of every sample.
///
/// The copies follow the originals in the same order and carry the unchanged pose of
/// their source: the deformation does not move the object in a way the label describes.
/// One seed per sample is drawn from `rng` up front, so the result only depends on the
/// state of `rng` and not on the thread scheduling.
///
/// # Errors
///
/// [`DatasetError::Augment`] if a deformation fails.
pub fn augment_samples<R: Rng + ?Sized>(
    mut samples: Vec<LabeledSample>,
    params: &ElasticParams,
    rng: &mut R,
) -> Result<Vec<LabeledSample>, DatasetError> {
    let seeds = (0..samples.len())
        .map(|_| rng.random::<u64>())
        .collect::<Vec<_>>();

    let deformed = samples
        .par_iter()
        .zip(seeds.par_iter())
        .map(|(labeled, seed)| -> Result<LabeledSample, DatasetError> {
            let mut rng = StdRng::seed_from_u64(*seed);
            let image = elastic_transform(&labeled.sample.image, params, &mut rng)?;
            let mut copy = labeled.clone();
            copy.sample.image = image;
            copy.augmented = true;
            Ok(copy)
        })
        .collect::<Result<Vec<_>, _>>()?;

    log::info!("added {} deformed samples", deformed.len());
    samples.extend(deformed);
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::split::Sample;
    use posereg_3d::PoseVector;
    use posereg_image::{Image, ImageSize};

    fn labeled(value: u8, t: f64) -> Result<LabeledSample, DatasetError> {
        let size = ImageSize {
            width: 12,
            height: 12,
        };
        let data = (0..size.area() * 3).map(|i| (i % 251) as u8 ^ value).collect();
        Ok(LabeledSample {
            sample: Sample {
                file_name: "0000_style02.png".to_string(),
                id: "0000".to_string(),
                style: "style02".to_string(),
                image: Image::new(size, data)?,
            },
            pose: PoseVector::from([0.1, 0.2, 0.3, t, 0.0, 0.0]),
            augmented: false,
        })
    }

    #[test]
    fn augment_doubles_and_keeps_labels() -> Result<(), DatasetError> {
        let samples = vec![labeled(0, 1.0)?, labeled(7, 2.0)?];
        let params = ElasticParams::from_image_height(12, 2.0, 0.08, 0.08);
        let mut rng = StdRng::seed_from_u64(45);
        let out = augment_samples(samples.clone(), &params, &mut rng)?;

        assert_eq!(out.len(), 4);
        assert_eq!(out[..2], samples[..]);
        for (copy, source) in out[2..].iter().zip(samples.iter()) {
            assert!(copy.augmented);
            assert_eq!(copy.pose, source.pose);
            assert_eq!(copy.sample.id, source.sample.id);
            assert_eq!(copy.sample.image.size(), source.sample.image.size());
        }
        Ok(())
    }

    #[test]
    fn augment_is_reproducible() -> Result<(), DatasetError> {
        let samples = vec![labeled(3, 0.0)?, labeled(9, 0.5)?, labeled(1, 1.5)?];
        let params = ElasticParams::from_image_height(12, 2.0, 0.08, 0.08);
        let a = augment_samples(samples.clone(), &params, &mut StdRng::seed_from_u64(1))?;
        let b = augment_samples(samples, &params, &mut StdRng::seed_from_u64(1))?;
        assert_eq!(a, b);
        Ok(())
    }
}
