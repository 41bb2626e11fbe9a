//! 2-D latitude/longitude grids.

use netcdf_store::Field;

use crate::error::{ArchiveError, Result};

/// Latitude and longitude of every grid point, row-major with
/// row = latitude index and column = longitude index.
#[derive(Debug, Clone, PartialEq)]
pub struct LatLonGrid {
    rows: usize,
    cols: usize,
    lat: Vec<f64>,
    lon: Vec<f64>,
}

impl LatLonGrid {
    /// Expand 1-D coordinate vectors into full 2-D grids.
    ///
    /// Every row of the longitude grid is `lon` and every column of the latitude
    /// grid is `lat`.
    pub fn from_vectors(lat: &[f64], lon: &[f64]) -> Self {
        let rows = lat.len();
        let cols = lon.len();

        let mut lat_grid = Vec::with_capacity(rows * cols);
        let mut lon_grid = Vec::with_capacity(rows * cols);
        for &row_lat in lat {
            lat_grid.extend(std::iter::repeat(row_lat).take(cols));
            lon_grid.extend_from_slice(lon);
        }

        Self {
            rows,
            cols,
            lat: lat_grid,
            lon: lon_grid,
        }
    }

    /// Wrap already-expanded 2-D grids.
    pub fn from_arrays(rows: usize, cols: usize, lat: Vec<f64>, lon: Vec<f64>) -> Result<Self> {
        let expected = rows * cols;
        if lat.len() != expected || lon.len() != expected {
            return Err(ArchiveError::ShapeMismatch(format!(
                "a {}x{} grid needs {} points, got {} latitudes and {} longitudes",
                rows,
                cols,
                expected,
                lat.len(),
                lon.len()
            )));
        }
        Ok(Self {
            rows,
            cols,
            lat,
            lon,
        })
    }

    /// Build a grid from coordinate variables that are either both 1-D vectors or
    /// both 2-D arrays of the same shape.
    pub fn from_fields(lat: &Field, lon: &Field) -> Result<Self> {
        match (lat.shape(), lon.shape()) {
            ([_], [_]) => Ok(Self::from_vectors(lat.values(), lon.values())),
            ([rows, cols], [lon_rows, lon_cols]) if rows == lon_rows && cols == lon_cols => {
                Self::from_arrays(*rows, *cols, lat.values().to_vec(), lon.values().to_vec())
            }
            (lat_shape, lon_shape) => Err(ArchiveError::ShapeMismatch(format!(
                "latitude {:?} and longitude {:?} must both be 1-D or share one 2-D shape",
                lat_shape, lon_shape
            ))),
        }
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn lat(&self) -> &[f64] {
        &self.lat
    }

    pub fn lon(&self) -> &[f64] {
        &self.lon
    }

    pub fn lat_at(&self, row: usize, col: usize) -> Option<f64> {
        self.index(row, col).map(|i| self.lat[i])
    }

    pub fn lon_at(&self, row: usize, col: usize) -> Option<f64> {
        self.index(row, col).map(|i| self.lon[i])
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_shape_and_values() {
        let lat = [10.0, 20.0, 30.0];
        let lon = [-5.0, 0.0, 5.0, 10.0];
        let grid = LatLonGrid::from_vectors(&lat, &lon);

        assert_eq!(grid.shape(), (3, 4));
        assert_eq!(grid.lat().len(), 12);
        assert_eq!(grid.lon().len(), 12);

        // Every row of lon equals the lon vector
        for row in 0..3 {
            let lon_row: Vec<f64> = (0..4).map(|c| grid.lon_at(row, c).unwrap()).collect();
            assert_eq!(lon_row, lon);
        }
        // Every column of lat equals the lat vector
        for col in 0..4 {
            let lat_col: Vec<f64> = (0..3).map(|r| grid.lat_at(r, col).unwrap()).collect();
            assert_eq!(lat_col, lat);
        }
    }

    #[test]
    fn test_expand_single_point() {
        let grid = LatLonGrid::from_vectors(&[45.0], &[-8.0]);
        assert_eq!(grid.shape(), (1, 1));
        assert_eq!(grid.lat(), &[45.0]);
        assert_eq!(grid.lon(), &[-8.0]);
    }

    #[test]
    fn test_out_of_range_lookup() {
        let grid = LatLonGrid::from_vectors(&[1.0, 2.0], &[3.0]);
        assert_eq!(grid.lat_at(2, 0), None);
        assert_eq!(grid.lon_at(0, 1), None);
    }

    #[test]
    fn test_from_fields_2d() {
        let lat = Field::new(vec![2, 2], vec![1.0, 1.0, 2.0, 2.0]).unwrap();
        let lon = Field::new(vec![2, 2], vec![5.0, 6.0, 5.0, 6.0]).unwrap();
        let grid = LatLonGrid::from_fields(&lat, &lon).unwrap();
        assert_eq!(grid.shape(), (2, 2));
        assert_eq!(grid.lat_at(1, 0), Some(2.0));
        assert_eq!(grid.lon_at(1, 1), Some(6.0));
    }

    #[test]
    fn test_from_fields_1d_matches_from_vectors() {
        let lat = Field::vector(vec![1.0, 2.0]);
        let lon = Field::vector(vec![7.0, 8.0, 9.0]);
        let grid = LatLonGrid::from_fields(&lat, &lon).unwrap();
        assert_eq!(grid, LatLonGrid::from_vectors(&[1.0, 2.0], &[7.0, 8.0, 9.0]));
    }

    #[test]
    fn test_from_fields_rejects_mixed_rank() {
        let lat = Field::vector(vec![1.0, 2.0]);
        let lon = Field::new(vec![2, 1], vec![0.0, 0.0]).unwrap();
        assert!(matches!(
            LatLonGrid::from_fields(&lat, &lon),
            Err(ArchiveError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_from_arrays_checks_length() {
        assert!(LatLonGrid::from_arrays(2, 2, vec![0.0; 4], vec![0.0; 3]).is_err());
    }
}
