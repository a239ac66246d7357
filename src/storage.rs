//! Flat-file persistence: shader sources and the transform grid.
//!
//! The grid file holds 16 whitespace-separated decimal values, four per line,
//! in row-major order. There is no versioning and no validation; a truncated
//! or malformed file simply stops the read early and leaves the remaining
//! cells at their prior in-memory values.

use std::fmt::Write as _;
use std::path::Path;

/// Reads a text file into a single string buffer.
pub fn read_text<P: AsRef<Path>>(path: P) -> Result<String, String> {
    std::fs::read_to_string(&path)
        .map_err(|e| format!("failed to read {}: {e}", path.as_ref().display()))
}

/// Writes a text file, overwriting any previous contents.
pub fn write_text<P: AsRef<Path>>(path: P, contents: &str) -> Result<(), String> {
    std::fs::write(&path, contents)
        .map_err(|e| format!("failed to write {}: {e}", path.as_ref().display()))
}

/// Serializes the grid as 16 whitespace-separated values, 4 per line.
pub fn write_matrix<P: AsRef<Path>>(path: P, grid: &[[f32; 4]; 4]) -> Result<(), String> {
    let mut out = String::new();
    for row in grid {
        for value in row {
            // Display gives the shortest representation that parses back to
            // the same f32, so write->read round-trips exactly.
            let _ = write!(out, "{value} ");
        }
        out.push('\n');
    }
    write_text(path, &out)
}

/// Fills the grid from a matrix file, row-major.
///
/// Parsing stops silently at the first missing or malformed token; cells that
/// were already parsed keep their new values, everything after keeps whatever
/// the grid held before the call.
pub fn read_matrix<P: AsRef<Path>>(path: P, grid: &mut [[f32; 4]; 4]) {
    let Ok(text) = std::fs::read_to_string(&path) else {
        log::warn!("no matrix file at {}", path.as_ref().display());
        return;
    };

    let mut tokens = text.split_whitespace();
    'read: for row in grid.iter_mut() {
        for cell in row.iter_mut() {
            match tokens.next().and_then(|t| t.parse::<f32>().ok()) {
                Some(value) => *cell = value,
                None => break 'read,
            }
        }
    }
}

/// Persists the current shader sources and grid in one go.
pub fn save_all(
    vertex_path: &str,
    fragment_path: &str,
    matrix_path: &str,
    vertex_src: &str,
    fragment_src: &str,
    grid: &[[f32; 4]; 4],
) -> Result<(), String> {
    write_text(vertex_path, vertex_src)?;
    write_text(fragment_path, fragment_src)?;
    write_matrix(matrix_path, grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("shaderlab-test-{}-{name}", std::process::id()));
        path
    }

    #[test]
    fn matrix_round_trips_exactly() {
        let path = temp_path("roundtrip.txt");
        let grid = [
            [1.0, 0.0, 0.0, 0.5],
            [0.0, 1.5, 0.0, -0.25],
            [0.125, 0.0, 1.0, 0.0],
            [0.0, 3.0e-7, 0.0, 1.0],
        ];
        write_matrix(&path, &grid).unwrap();

        let mut read_back = [[9.0f32; 4]; 4];
        read_matrix(&path, &mut read_back);
        assert_eq!(grid, read_back);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn matrix_file_has_four_values_per_line() {
        let path = temp_path("layout.txt");
        write_matrix(&path, &[[2.0; 4]; 4]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        for line in lines {
            assert_eq!(line.split_whitespace().count(), 4);
        }
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn truncated_matrix_leaves_remaining_cells_alone() {
        let path = temp_path("truncated.txt");
        std::fs::write(&path, "1 2 3 4\n5 6\n").unwrap();

        let mut grid = [[-1.0f32; 4]; 4];
        read_matrix(&path, &mut grid);
        assert_eq!(grid[0], [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(grid[1][0], 5.0);
        assert_eq!(grid[1][1], 6.0);
        // everything after the underrun keeps its prior value
        assert_eq!(grid[1][2], -1.0);
        assert_eq!(grid[3], [-1.0; 4]);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn malformed_token_stops_the_read() {
        let path = temp_path("malformed.txt");
        std::fs::write(&path, "1 2 potato 4 5 6 7 8").unwrap();

        let mut grid = [[0.0f32; 4]; 4];
        read_matrix(&path, &mut grid);
        assert_eq!(grid[0][0], 1.0);
        assert_eq!(grid[0][1], 2.0);
        // the bad token halts parsing, later good tokens are not consumed
        assert_eq!(grid[0][2], 0.0);
        assert_eq!(grid[0][3], 0.0);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_matrix_file_is_silent() {
        let mut grid = [[7.0f32; 4]; 4];
        read_matrix(temp_path("does-not-exist.txt"), &mut grid);
        assert_eq!(grid, [[7.0; 4]; 4]);
    }

    #[test]
    fn save_all_writes_all_three_files() {
        let vs = temp_path("save.vs");
        let fs = temp_path("save.fs");
        let mat = temp_path("save-matrix.txt");
        save_all(
            vs.to_str().unwrap(),
            fs.to_str().unwrap(),
            mat.to_str().unwrap(),
            "vertex source",
            "fragment source",
            &[[1.0; 4]; 4],
        )
        .unwrap();

        assert_eq!(read_text(&vs).unwrap(), "vertex source");
        assert_eq!(read_text(&fs).unwrap(), "fragment source");
        assert!(mat.exists());

        for p in [vs, fs, mat] {
            let _ = std::fs::remove_file(p);
        }
    }
}
