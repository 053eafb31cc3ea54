use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::domain::types::{Coordinate, CoordinateStore};
use crate::error::{TspError, TspResult};

/// Header records of a TSPLIB-style instance file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceHeader {
    pub name: Option<String>,
    pub comment: Option<String>,
    pub problem_type: Option<String>,
    pub edge_weight_type: Option<String>,
    pub dimension: usize,
}

#[derive(Debug, Clone)]
pub struct Instance {
    pub header: InstanceHeader,
    pub coordinates: CoordinateStore,
}

impl Instance {
    pub fn dim(&self) -> usize {
        self.header.dimension
    }

    pub fn from_path(path: impl AsRef<Path>) -> TspResult<Self> {
        let path = path.as_ref();
        info!("Reading instance from {}", path.display());
        let file = File::open(path)?;
        read_instance(BufReader::new(file))
    }
}

/// Reads `KEY : VALUE` header lines up to `NODE_COORD_SECTION`, then
/// `DIMENSION` rows of `index x y`.
///
/// Coordinates may be plain integers (`37`) or exponent notation
/// (`2.00000e+02`); the latter are rounded to the nearest integer.
pub fn read_instance<R: BufRead>(reader: R) -> TspResult<Instance> {
    let mut lines = reader.lines().enumerate().map(|(idx, line)| (idx + 1, line));

    let header = read_header(&mut lines)?;
    let coordinates = read_coordinates(&mut lines, header.dimension)?;

    info!(
        "Loaded instance {} with {} cities",
        header.name.as_deref().unwrap_or("<unnamed>"),
        header.dimension
    );

    Ok(Instance {
        header,
        coordinates: CoordinateStore::new(coordinates),
    })
}

fn read_header<I>(lines: &mut I) -> TspResult<InstanceHeader>
where
    I: Iterator<Item = (usize, io::Result<String>)>,
{
    let mut header = InstanceHeader::default();
    let mut dimension: Option<usize> = None;
    let mut last_line = 0;
    let mut found_section = false;

    for (line_no, line) in lines.by_ref() {
        let line = line?;
        last_line = line_no;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("NODE_COORD_SECTION") {
            found_section = true;
            break;
        }

        let Some((key, value)) = trimmed.split_once(':') else {
            return Err(TspError::Instance {
                line: line_no,
                reason: format!("expected 'KEY : VALUE', found '{}'", trimmed),
            });
        };
        let value = value.trim().to_string();

        match key.trim().to_ascii_uppercase().as_str() {
            "NAME" => header.name = Some(value),
            "COMMENT" => header.comment = Some(value),
            "TYPE" => header.problem_type = Some(value),
            "EDGE_WEIGHT_TYPE" => header.edge_weight_type = Some(value),
            "DIMENSION" => {
                let dim = value.parse::<usize>().map_err(|e| TspError::Instance {
                    line: line_no,
                    reason: format!("DIMENSION '{}' is not a positive integer: {}", value, e),
                })?;
                dimension = Some(dim);
            }
            other => debug!("Ignoring header key '{}'", other),
        }
    }

    if !found_section {
        return Err(TspError::Instance {
            line: last_line,
            reason: "missing NODE_COORD_SECTION".to_string(),
        });
    }

    let dimension = dimension.ok_or_else(|| TspError::Instance {
        line: last_line,
        reason: "missing DIMENSION header".to_string(),
    })?;
    if dimension == 0 {
        return Err(TspError::InvalidDimension {
            dim: 0,
            reason: "instance declares no cities".to_string(),
        });
    }

    if let Some(kind) = &header.edge_weight_type {
        if !kind.eq_ignore_ascii_case("EUC_2D") {
            warn!("EDGE_WEIGHT_TYPE {} treated as EUC_2D", kind);
        }
    }

    header.dimension = dimension;
    Ok(header)
}

fn read_coordinates<I>(lines: &mut I, dim: usize) -> TspResult<Vec<Coordinate>>
where
    I: Iterator<Item = (usize, io::Result<String>)>,
{
    let mut coords: Vec<Coordinate> = Vec::new();
    coords
        .try_reserve_exact(dim)
        .map_err(|source| TspError::AllocationFailure {
            what: "coordinate store",
            dim,
            source,
        })?;
    let mut last_line = 0;

    for (line_no, line) in lines.by_ref() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("EOF") {
            break;
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        let index = tokens[0].parse::<usize>();

        if coords.len() == dim {
            // A trailing section (e.g. DISPLAY_DATA_SECTION) ends the coordinates.
            if index.is_err() {
                debug!("Stopping at line {}: '{}'", line_no, trimmed);
                break;
            }
            warn!(
                "Coordinate row at line {} exceeds DIMENSION {}",
                line_no, dim
            );
            return Err(TspError::Instance {
                line: line_no,
                reason: format!("more than {} coordinate rows before EOF", dim),
            });
        }

        last_line = line_no;
        if tokens.len() < 3 {
            return Err(TspError::Instance {
                line: line_no,
                reason: format!("expected 'index x y', found '{}'", trimmed),
            });
        }

        let index = index.map_err(|e| TspError::Instance {
            line: line_no,
            reason: format!("node index '{}' is not a positive integer: {}", tokens[0], e),
        })?;
        if index != coords.len() + 1 {
            warn!(
                "Node index {} at line {} out of sequence, expected {}",
                index,
                line_no,
                coords.len() + 1
            );
        }

        let parse = |token: &str| {
            parse_coordinate(token).map_err(|reason| TspError::Instance {
                line: line_no,
                reason,
            })
        };
        coords.push((parse(tokens[1])?, parse(tokens[2])?));
    }

    if coords.len() != dim {
        return Err(TspError::Instance {
            line: last_line,
            reason: format!("expected {} coordinate rows, found {}", dim, coords.len()),
        });
    }

    Ok(coords)
}

/// Parse one coordinate token, plain integer or exponent notation.
pub fn parse_coordinate(token: &str) -> Result<i64, String> {
    let token = token.trim();
    if let Ok(value) = token.parse::<i64>() {
        return Ok(value);
    }
    convert_exponent_to_int(token)
}

/// `"2.00000e+02"` -> `200`. Rounds to the nearest integer.
pub fn convert_exponent_to_int(token: &str) -> Result<i64, String> {
    let value = token
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("'{}' is not a number: {}", token, e))?;

    if !value.is_finite() || value.abs() >= i64::MAX as f64 {
        return Err(format!("'{}' is out of range for a coordinate", token));
    }

    Ok(value.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: &str = "NAME : square4
COMMENT : unit square
TYPE : TSP
DIMENSION : 4
EDGE_WEIGHT_TYPE : EUC_2D
NODE_COORD_SECTION
1 0 0
2 0 1
3 1 1
4 1 0
EOF
";

    const EXPONENT: &str = "NAME: pcb3
DIMENSION: 3
NODE_COORD_SECTION
1 2.00000e+02 4.00000e+02
2 2.00000e+02 3.50000e+02
3 1.00000e+02 4.00000e+02
EOF
";

    #[test]
    fn test_reads_plain_instance() {
        let instance = read_instance(PLAIN.as_bytes()).unwrap();
        assert_eq!(instance.dim(), 4);
        assert_eq!(instance.header.name.as_deref(), Some("square4"));
        assert_eq!(instance.header.comment.as_deref(), Some("unit square"));
        assert_eq!(instance.header.edge_weight_type.as_deref(), Some("EUC_2D"));
        assert_eq!(
            instance.coordinates.as_slice(),
            &[(0, 0), (0, 1), (1, 1), (1, 0)]
        );
    }

    #[test]
    fn test_reads_exponent_instance() {
        let instance = read_instance(EXPONENT.as_bytes()).unwrap();
        assert_eq!(instance.dim(), 3);
        assert_eq!(
            instance.coordinates.as_slice(),
            &[(200, 400), (200, 350), (100, 400)]
        );
    }

    #[test]
    fn test_convert_exponent_to_int() {
        assert_eq!(convert_exponent_to_int("2.00000e+02"), Ok(200));
        assert_eq!(convert_exponent_to_int("1.2345E+03"), Ok(1235));
        assert_eq!(convert_exponent_to_int("-5.0e-01"), Ok(-1));
        assert!(convert_exponent_to_int("abc").is_err());
        assert!(convert_exponent_to_int("inf").is_err());
    }

    #[test]
    fn test_missing_dimension() {
        let text = "NAME : x\nNODE_COORD_SECTION\n1 0 0\n";
        assert!(matches!(
            read_instance(text.as_bytes()),
            Err(TspError::Instance { .. })
        ));
    }

    #[test]
    fn test_too_few_rows() {
        let text = "DIMENSION : 3\nNODE_COORD_SECTION\n1 0 0\n2 1 1\nEOF\n";
        let err = read_instance(text.as_bytes()).unwrap_err();
        assert!(matches!(err, TspError::Instance { line: 4, .. }));
    }

    #[test]
    fn test_bad_token_reports_line() {
        let text = "DIMENSION : 2\nNODE_COORD_SECTION\n1 0 0\n2 x 1\n";
        let err = read_instance(text.as_bytes()).unwrap_err();
        assert!(matches!(err, TspError::Instance { line: 4, .. }));
    }

    #[test]
    fn test_zero_dimension() {
        let text = "DIMENSION : 0\nNODE_COORD_SECTION\nEOF\n";
        assert!(matches!(
            read_instance(text.as_bytes()),
            Err(TspError::InvalidDimension { dim: 0, .. })
        ));
    }

    #[test]
    fn test_extra_rows_rejected() {
        let text = "DIMENSION : 2\nNODE_COORD_SECTION\n1 0 0\n2 3 4\n3 6 8\nEOF\n";
        let err = read_instance(text.as_bytes()).unwrap_err();
        assert!(matches!(err, TspError::Instance { line: 5, .. }));
    }

    #[test]
    fn test_bad_index_rejected() {
        let text = "DIMENSION : 2\nNODE_COORD_SECTION\n1 0 0\nB 3 4\n";
        let err = read_instance(text.as_bytes()).unwrap_err();
        assert!(matches!(err, TspError::Instance { line: 4, .. }));
    }

    #[test]
    fn test_trailing_section_ends_coordinates() {
        let text = "DIMENSION : 2\nNODE_COORD_SECTION\n1 0 0\n2 3 4\nDISPLAY_DATA_SECTION\n1 0 0\n";
        let instance = read_instance(text.as_bytes()).unwrap();
        assert_eq!(instance.coordinates.as_slice(), &[(0, 0), (3, 4)]);
    }
}
