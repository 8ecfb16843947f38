use std::path::Path;

use posereg_3d::{PoseVector, TranslationScale};
use serde_json::{Map, Value};

use crate::error::DatasetError;

/// Number of degrees of freedom of a pose label.
pub const POSE_DOFS: usize = 6;

/// One record of the label store.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelEntry {
    /// The sample id.
    pub id: String,
    /// Order key of the sample, increasing along the store.
    pub order_key: i64,
    /// Raw pose values `[rx, ry, rz, tx, ty, tz]`.
    pub pose: Vec<f64>,
}

/// The pose labels of a dataset in their stored order.
///
/// The store is a JSON object `{ "<id>": [<order_key>, [rx, ry, rz, tx, ty, tz]], ... }`
/// whose key order is significant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelStore {
    entries: Vec<LabelEntry>,
}

impl LabelStore {
    /// Parse a label store from a JSON string.
    ///
    /// # Example
    ///
    /// ```
    /// use posereg_dataset::LabelStore;
    ///
    /// let store = LabelStore::from_json_str(
    ///     r#"{"0001": [1, [0, 0, 0, 1, 2, 3]], "0000": [2, [0, 0, 0, 0, 0, 0]]}"#,
    /// )
    /// .unwrap();
    /// assert_eq!(store.len(), 2);
    /// assert_eq!(store.entries()[0].id, "0001");
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, DatasetError> {
        Self::from_json_impl(json, Path::new("<memory>"))
    }

    /// Read a label store from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_impl(&json, path)
    }

    fn from_json_impl(json: &str, path: &Path) -> Result<Self, DatasetError> {
        let json_err = |source| DatasetError::Json {
            path: path.to_path_buf(),
            source,
        };

        let map: Map<String, Value> = serde_json::from_str(json).map_err(json_err)?;
        let entries = map
            .into_iter()
            .map(|(id, value)| -> Result<LabelEntry, DatasetError> {
                let (order_key, pose) =
                    serde_json::from_value::<(i64, Vec<f64>)>(value).map_err(json_err)?;
                Ok(LabelEntry {
                    id,
                    order_key,
                    pose,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { entries })
    }

    /// The records in stored order.
    pub fn entries(&self) -> &[LabelEntry] {
        &self.entries
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store has no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Options of [`load_poses`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseParams {
    /// Number of values per pose. Must be 6.
    pub dofs: usize,
    /// Maximum number of emitted rows. `None` emits every row.
    pub limit: Option<usize>,
    /// How many consecutive rows every label is repeated for.
    pub duplicate: usize,
    /// Scale the translations are divided by.
    pub ts: TranslationScale,
}

impl Default for PoseParams {
    fn default() -> Self {
        Self {
            dofs: POSE_DOFS,
            limit: None,
            duplicate: 1,
            ts: TranslationScale::default(),
        }
    }
}

/// Poses in row order together with the order key and id of every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoseTable {
    /// Normalized poses.
    pub poses: Vec<PoseVector>,
    /// Order key of every row.
    pub keys: Vec<i64>,
    /// Label id of every row.
    pub ids: Vec<String>,
}

impl PoseTable {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// Check that the order keys never decrease from one row to the next.
    ///
    /// # Errors
    ///
    /// [`DatasetError::LabelOrderViolation`] naming the first offending row.
    pub fn verify_key_order(&self) -> Result<(), DatasetError> {
        match self.keys.windows(2).position(|pair| pair[1] < pair[0]) {
            Some(i) => Err(DatasetError::LabelOrderViolation {
                row: i + 1,
                previous: self.keys[i],
                current: self.keys[i + 1],
            }),
            None => Ok(()),
        }
    }
}

/// Build the pose table of a label store.
///
/// Every label is validated, its translation divided by `params.ts` and emitted
/// `params.duplicate` times in a row.
///
/// # Errors
///
/// * [`DatasetError::UnsupportedDofs`] unless `params.dofs` is 6.
/// * [`DatasetError::Config`] if `params.duplicate` is zero.
/// * [`DatasetError::InvalidPose`] for a label with the wrong number of values.
pub fn poses_from_store(
    store: &LabelStore,
    params: &PoseParams,
) -> Result<PoseTable, DatasetError> {
    if params.dofs != POSE_DOFS {
        return Err(DatasetError::UnsupportedDofs(params.dofs));
    }
    if params.duplicate == 0 {
        return Err(DatasetError::Config(
            "pose duplicate factor must be at least 1".to_string(),
        ));
    }

    let rows = store.len() * params.duplicate;
    let rows = params.limit.map_or(rows, |l| l.min(rows));

    let mut table = PoseTable {
        poses: Vec::with_capacity(rows),
        keys: Vec::with_capacity(rows),
        ids: Vec::with_capacity(rows),
    };

    for entry in store.entries() {
        if table.len() >= rows {
            break;
        }
        if entry.pose.len() != params.dofs {
            return Err(DatasetError::InvalidPose {
                id: entry.id.clone(),
                len: entry.pose.len(),
                expected: params.dofs,
            });
        }

        let mut pose = PoseVector::from_slice(&entry.pose)?;
        pose.translation = params.ts.normalize(&pose.translation);

        for _ in 0..params.duplicate.min(rows - table.len()) {
            table.poses.push(pose);
            table.keys.push(entry.order_key);
            table.ids.push(entry.id.clone());
        }
    }

    Ok(table)
}

/// Load the pose table of a JSON label store.
///
/// See [`poses_from_store`] for the row layout.
pub fn load_poses(
    path: impl AsRef<Path>,
    params: &PoseParams,
) -> Result<PoseTable, DatasetError> {
    let path = path.as_ref();
    let store = LabelStore::from_json_file(path)?;
    let table = poses_from_store(&store, params)?;
    log::info!(
        "loaded {} pose rows from {} labels in {}",
        table.len(),
        store.len(),
        path.display()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABELS: &str = r#"{
        "0002": [0, [0.1, 0.2, 0.3, 10.0, 20.0, 30.0]],
        "0000": [1, [0.0, 0.0, 0.0, 2.0, 4.0, 6.0]],
        "0001": [2, [1.0, 0.0, 0.0, -2.0, 0.0, 2.0]]
    }"#;

    #[test]
    fn store_keeps_key_order() -> Result<(), DatasetError> {
        let store = LabelStore::from_json_str(LABELS)?;
        let ids = store.entries().iter().map(|e| e.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["0002", "0000", "0001"]);
        assert_eq!(store.entries()[2].order_key, 2);
        Ok(())
    }

    #[test]
    fn store_rejects_malformed_json() {
        assert!(matches!(
            LabelStore::from_json_str(r#"{"0000": [0, "pose"]}"#),
            Err(DatasetError::Json { .. })
        ));
        assert!(matches!(
            LabelStore::from_json_str("[1, 2]"),
            Err(DatasetError::Json { .. })
        ));
    }

    #[test]
    fn poses_duplicate_contiguously() -> Result<(), DatasetError> {
        let store = LabelStore::from_json_str(LABELS)?;
        let params = PoseParams {
            duplicate: 3,
            ..Default::default()
        };
        let table = poses_from_store(&store, &params)?;
        assert_eq!(table.len(), 9);
        assert_eq!(table.keys, vec![0, 0, 0, 1, 1, 1, 2, 2, 2]);
        assert_eq!(table.ids[3..6], ["0000", "0000", "0000"]);
        assert_eq!(table.poses[0], table.poses[2]);
        table.verify_key_order()?;
        Ok(())
    }

    #[test]
    fn poses_divide_translation() -> Result<(), DatasetError> {
        let store = LabelStore::from_json_str(LABELS)?;
        let params = PoseParams {
            ts: TranslationScale::new([2.0, 4.0, 6.0])?,
            ..Default::default()
        };
        let table = poses_from_store(&store, &params)?;
        assert_eq!(table.poses[1].translation, [1.0, 1.0, 1.0]);
        assert_eq!(table.poses[1].rotation, [0.0, 0.0, 0.0]);
        Ok(())
    }

    #[test]
    fn poses_limit_caps_rows() -> Result<(), DatasetError> {
        let store = LabelStore::from_json_str(LABELS)?;
        let params = PoseParams {
            duplicate: 2,
            limit: Some(3),
            ..Default::default()
        };
        let table = poses_from_store(&store, &params)?;
        assert_eq!(table.ids, vec!["0002", "0002", "0000"]);
        Ok(())
    }

    #[test]
    fn poses_reject_bad_dofs() -> Result<(), DatasetError> {
        let store = LabelStore::from_json_str(LABELS)?;
        let params = PoseParams {
            dofs: 7,
            ..Default::default()
        };
        assert!(matches!(
            poses_from_store(&store, &params),
            Err(DatasetError::UnsupportedDofs(7))
        ));

        let store = LabelStore::from_json_str(r#"{"0000": [0, [1.0, 2.0]]}"#)?;
        assert!(matches!(
            poses_from_store(&store, &PoseParams::default()),
            Err(DatasetError::InvalidPose { len: 2, .. })
        ));
        Ok(())
    }

    #[test]
    fn key_order_violation() -> Result<(), DatasetError> {
        let store = LabelStore::from_json_str(
            r#"{"a": [3, [0, 0, 0, 0, 0, 0]], "b": [1, [0, 0, 0, 0, 0, 0]]}"#,
        )?;
        let table = poses_from_store(&store, &PoseParams::default())?;
        assert!(matches!(
            table.verify_key_order(),
            Err(DatasetError::LabelOrderViolation {
                row: 1,
                previous: 3,
                current: 1
            })
        ));
        Ok(())
    }

    #[test]
    fn load_poses_from_file() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join("poses.json");
        std::fs::write(&path, LABELS)?;
        let table = load_poses(&path, &PoseParams::default())?;
        assert_eq!(table.len(), 3);

        assert!(matches!(
            load_poses(tmp_dir.path().join("missing.json"), &PoseParams::default()),
            Err(DatasetError::Io { .. })
        ));
        Ok(())
    }
}
