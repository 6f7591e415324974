use crate::math::Vec3;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("model has no faces")]
    Empty,
}

/// Triangle mesh ready for drawing
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub triangles: Vec<[usize; 3]>,
}

impl Mesh {
    pub fn load(path: &Path) -> Result<Mesh, ModelError> {
        let source = std::fs::read_to_string(path)?;
        Mesh::parse(&source)
    }

    /// Parses the vertex and face statements of a Wavefront OBJ file.
    ///
    /// Polygons are split into triangle fans. Texture and normal references
    /// are accepted and ignored; other statements are skipped.
    pub fn parse(source: &str) -> Result<Mesh, ModelError> {
        let mut positions = Vec::new();
        let mut triangles = Vec::new();

        for (index, raw) in source.lines().enumerate() {
            let line = index + 1;
            let mut fields = raw.split_whitespace();
            match fields.next() {
                Some("v") => {
                    let mut position = [0.0; 3];
                    for axis in position.iter_mut() {
                        let field = fields
                            .next()
                            .ok_or_else(|| parse_error(line, "vertex needs 3 coordinates"))?;
                        *axis = field
                            .parse()
                            .map_err(|_| parse_error(line, format!("bad coordinate '{field}'")))?;
                    }
                    positions.push(position);
                }
                Some("f") => {
                    let corners = fields
                        .map(|field| resolve_index(field, positions.len(), line))
                        .collect::<Result<Vec<_>, _>>()?;
                    if corners.len() < 3 {
                        return Err(parse_error(line, "face needs at least 3 vertices"));
                    }
                    for pair in corners[1..].windows(2) {
                        triangles.push([corners[0], pair[0], pair[1]]);
                    }
                }
                _ => {}
            }
        }

        if triangles.is_empty() {
            return Err(ModelError::Empty);
        }
        Ok(Mesh {
            positions,
            triangles,
        })
    }
}

fn parse_error(line: usize, message: impl Into<String>) -> ModelError {
    ModelError::Parse {
        line,
        message: message.into(),
    }
}

/// Turns a 1-based (or negative, relative) face reference into a vertex index
fn resolve_index(field: &str, vertex_count: usize, line: usize) -> Result<usize, ModelError> {
    let position = field.split('/').next().unwrap_or_default();
    let value: i64 = position
        .parse()
        .map_err(|_| parse_error(line, format!("bad face index '{field}'")))?;
    let resolved = match value {
        v if v > 0 => v - 1,
        v if v < 0 => vertex_count as i64 + v,
        _ => -1,
    };
    if resolved < 0 || resolved >= vertex_count as i64 {
        return Err(parse_error(line, format!("face index {value} out of range")));
    }
    Ok(resolved as usize)
}
