use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

/// Error types for the OBJ module.
#[derive(Debug, thiserror::Error)]
pub enum ObjError {
    /// Error reading the file
    #[error("error reading {}: {source}", .path.display())]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// Error reading a line of the stream
    #[error("error reading line {line}: {source}")]
    Read {
        /// One based line number.
        line: usize,
        /// The underlying error.
        source: std::io::Error,
    },

    /// A vertex record could not be parsed
    #[error("Malformed vertex at line {line}: {content}")]
    MeshParse {
        /// One based line number of the record.
        line: usize,
        /// The offending line.
        content: String,
    },
}

/// Read the vertices of a Wavefront OBJ file.
///
/// # Arguments
///
/// * `path` - The path to the .obj file.
///
/// # Returns
///
/// The vertex positions in file order.
pub fn read_obj_vertices(path: impl AsRef<Path>) -> Result<Vec<[f64; 3]>, ObjError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ObjError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let vertices = parse_obj_vertices(BufReader::new(file))?;
    log::debug!("read {} vertices from {}", vertices.len(), path.display());
    Ok(vertices)
}

/// Parse the `v` records of an OBJ stream.
///
/// Normals, texture coordinates, faces, comments and any other record are skipped. A
/// fourth homogeneous coordinate is accepted and ignored.
///
/// # Example
///
/// ```
/// use posereg_3d::io::obj::parse_obj_vertices;
///
/// let data = "# cube\nv 1 2 3\nvn 0 0 1\nv 4 5 6 1.0\nf 1 2 3\n";
/// let vertices = parse_obj_vertices(data.as_bytes()).unwrap();
/// assert_eq!(vertices, vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
/// ```
pub fn parse_obj_vertices(reader: impl BufRead) -> Result<Vec<[f64; 3]>, ObjError> {
    let mut vertices = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| ObjError::Read { line: i + 1, source })?;
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some("v") {
            continue;
        }

        let coords = tokens
            .take(4)
            .map(str::parse::<f64>)
            .collect::<Result<Vec<_>, _>>();

        match coords.as_deref() {
            Ok([x, y, z, ..]) => vertices.push([*x, *y, *z]),
            _ => {
                return Err(ObjError::MeshParse {
                    line: i + 1,
                    content: line,
                })
            }
        }
    }
    Ok(vertices)
}
