use std::path::{Path, PathBuf};

use posereg_image::{Image, ImageSize};
use posereg_imgproc::preprocess::{preprocess, PreprocessParams};
use posereg_io::functional::{is_png_path, read_image};
use rayon::prelude::*;

use crate::error::DatasetError;

/// Separators trimmed around the style tag when deriving a sample id.
const ID_SEPARATORS: &[char] = &['_', '-', '.'];

/// Options of [`load_and_split`].
#[derive(Debug, Clone, PartialEq)]
pub struct SplitParams {
    /// Size of the preprocessed images.
    pub size: ImageSize,
    /// Number of directory entries to consider, counted in sorted order. `None` uses all.
    pub limit: Option<usize>,
    /// Number of distinct styles rendered for every pose.
    pub total_styles: usize,
    /// Style tags of the training bucket.
    pub train_styles: Vec<String>,
    /// Style tags of the validation bucket.
    pub valid_styles: Vec<String>,
    /// Whether the circular mask is applied.
    pub apply_mask: bool,
}

impl SplitParams {
    fn validate(&self) -> Result<(), DatasetError> {
        if self.total_styles == 0 {
            return Err(DatasetError::InvalidStyles(
                "the total style count must be positive".to_string(),
            ));
        }
        if self
            .train_styles
            .iter()
            .chain(self.valid_styles.iter())
            .any(|tag| tag.is_empty())
        {
            return Err(DatasetError::InvalidStyles(
                "style tags must not be empty".to_string(),
            ));
        }
        let tagged = self.train_styles.len() + self.valid_styles.len();
        if tagged > self.total_styles {
            return Err(DatasetError::InvalidStyles(format!(
                "{tagged} style tags for {} styles",
                self.total_styles
            )));
        }
        Ok(())
    }

    /// Expected bucket size for `n` considered entries and `bucket_styles` tags.
    fn capacity(&self, n: usize, bucket_styles: usize) -> usize {
        (n as f64 * (bucket_styles as f64 / self.total_styles as f64)) as usize
    }
}

/// A preprocessed image with the key used to join it with its label.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// File name of the image inside the dataset directory.
    pub file_name: String,
    /// Label id of the image.
    pub id: String,
    /// The style tag that selected the bucket.
    pub style: String,
    /// The preprocessed image.
    pub image: Image<u8, 3>,
}

/// Training and validation samples, each in sorted file name order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetSplit {
    /// Samples whose name carries a training tag.
    pub train: Vec<Sample>,
    /// Samples whose name carries a validation tag.
    pub valid: Vec<Sample>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucket {
    Train,
    Valid,
}

/// Derive the label id of an image from its file name and style tag.
///
/// The extension and the first occurrence of `style` are removed from the file name. The
/// remaining parts are trimmed of `_`, `-` and `.` and, if both are non-empty, joined
/// with `_`.
///
/// # Example
///
/// ```
/// use posereg_dataset::split::sample_id;
///
/// assert_eq!(sample_id("0042_style03.png", "style03"), "0042");
/// assert_eq!(sample_id("style03-0042.png", "style03"), "0042");
/// assert_eq!(sample_id("duck_style03_0042.png", "style03"), "duck_0042");
/// ```
pub fn sample_id(file_name: &str, style: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);

    let Some(pos) = stem.find(style) else {
        return stem.trim_matches(ID_SEPARATORS).to_string();
    };

    let prefix = stem[..pos].trim_matches(ID_SEPARATORS);
    let suffix = stem[pos + style.len()..].trim_matches(ID_SEPARATORS);
    match (prefix.is_empty(), suffix.is_empty()) {
        (true, _) => suffix.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{prefix}_{suffix}"),
    }
}

/// Pick the bucket of a file name. Validation tags take precedence.
fn classify<'a>(file_name: &str, params: &'a SplitParams) -> Option<(Bucket, &'a str)> {
    if let Some(tag) = params
        .valid_styles
        .iter()
        .find(|tag| file_name.contains(tag.as_str()))
    {
        return Some((Bucket::Valid, tag.as_str()));
    }
    params
        .train_styles
        .iter()
        .find(|tag| file_name.contains(tag.as_str()))
        .map(|tag| (Bucket::Train, tag.as_str()))
}

/// Lists the files of a directory sorted by file name.
fn sorted_files(dir: &Path) -> Result<Vec<(String, PathBuf)>, DatasetError> {
    let io_err = |source| DatasetError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        if !entry.file_type().map_err(io_err)?.is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            log::warn!("skipping non UTF-8 file name {:?}", entry.file_name());
            continue;
        };
        files.push((name, entry.path()));
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}

fn load_sample(
    file_name: String,
    style: String,
    path: &Path,
    params: &PreprocessParams,
) -> Result<Sample, DatasetError> {
    let decoded = read_image(path).map_err(|source| DatasetError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let image = preprocess(&decoded, params).map_err(|source| DatasetError::Preprocess {
        path: path.to_path_buf(),
        source,
    })?;
    let id = sample_id(&file_name, &style);
    Ok(Sample {
        file_name,
        id,
        style,
        image,
    })
}

/// Load the images of a directory and split them by style tag.
///
/// Files are visited in lexicographic order and only the first `params.limit` entries are
/// considered. Every `.png` among them is decoded, preprocessed and assigned to the
/// validation bucket if its name contains a validation tag, else to the training bucket if
/// it contains a training tag. Other files are skipped.
///
/// Decoding runs in parallel; both buckets keep the sorted order.
///
/// # Errors
///
/// * [`DatasetError::InvalidStyles`] for an unusable style configuration.
/// * [`DatasetError::Io`] if the directory cannot be listed.
/// * [`DatasetError::Decode`] or [`DatasetError::Preprocess`] if an image cannot be loaded.
pub fn load_and_split(
    dir: impl AsRef<Path>,
    params: &SplitParams,
) -> Result<DatasetSplit, DatasetError> {
    params.validate()?;

    let dir = dir.as_ref();
    let files = sorted_files(dir)?;
    let n = params.limit.map_or(files.len(), |l| l.min(files.len()));

    let selected = files
        .into_iter()
        .take(n)
        .filter_map(|(name, path)| {
            if !is_png_path(&path) {
                log::debug!("skipping {name}: not a png file");
                return None;
            }
            match classify(&name, params) {
                Some((bucket, tag)) => Some((bucket, tag.to_string(), name, path)),
                None => {
                    log::debug!("skipping {name}: no style tag matches");
                    None
                }
            }
        })
        .collect::<Vec<_>>();

    let preprocess_params = PreprocessParams {
        size: params.size,
        apply_mask: params.apply_mask,
        ..Default::default()
    };

    let loaded = selected
        .into_par_iter()
        .map(|(bucket, style, file_name, path)| {
            load_sample(file_name, style, &path, &preprocess_params).map(|s| (bucket, s))
        })
        .collect::<Result<Vec<_>, DatasetError>>()?;

    let train_capacity = params.capacity(n, params.train_styles.len());
    let valid_capacity = params.capacity(n, params.valid_styles.len());

    let mut split = DatasetSplit {
        train: Vec::with_capacity(train_capacity),
        valid: Vec::with_capacity(valid_capacity),
    };
    for (bucket, sample) in loaded {
        match bucket {
            Bucket::Train => split.train.push(sample),
            Bucket::Valid => split.valid.push(sample),
        }
    }

    for (name, len, capacity) in [
        ("train", split.train.len(), train_capacity),
        ("valid", split.valid.len(), valid_capacity),
    ] {
        if len > capacity {
            log::warn!("{name} bucket holds {len} samples, more than the {capacity} expected");
        }
    }

    log::info!(
        "loaded {} train and {} valid samples from {}",
        split.train.len(),
        split.valid.len(),
        dir.display()
    );

    Ok(split)
}
