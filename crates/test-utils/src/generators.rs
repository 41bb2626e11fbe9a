//! Synthetic wind samples with predictable values.

/// One file's worth of wind data on a regular grid.
///
/// `uwind`/`vwind` are `(time, lat, lon)` in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct WindSample {
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    pub uwind: Vec<f32>,
    pub vwind: Vec<f32>,
}

impl WindSample {
    pub fn time_steps(&self) -> usize {
        let points = self.lat.len() * self.lon.len();
        if points == 0 {
            0
        } else {
            self.uwind.len() / points
        }
    }

    /// Latitude expanded to `(lat, lon)`.
    pub fn lat_grid(&self) -> Vec<f64> {
        self.lat
            .iter()
            .flat_map(|&lat| std::iter::repeat(lat).take(self.lon.len()))
            .collect()
    }

    /// Longitude expanded to `(lat, lon)`.
    pub fn lon_grid(&self) -> Vec<f64> {
        self.lat.iter().flat_map(|_| self.lon.iter().copied()).collect()
    }
}

/// Creates a wind sample whose values encode their own position.
///
/// `uwind = tag * 1000 + t * 100 + row * 10 + col` and `vwind = -uwind`, so a
/// value read back from a merged file identifies the sample (`tag`), time step,
/// and grid cell it came from.
///
/// # Example
///
/// ```
/// use test_utils::wind_sample;
///
/// let sample = wind_sample(2, 3, 4, 1);
/// assert_eq!(sample.uwind.len(), 2 * 3 * 4);
/// assert_eq!(sample.uwind[0], 1000.0);
/// assert_eq!(sample.uwind[12 + 4 + 2], 1112.0); // t=1, row=1, col=2
/// assert_eq!(sample.vwind[1], -1001.0);
/// ```
pub fn wind_sample(time_steps: usize, rows: usize, cols: usize, tag: u32) -> WindSample {
    let lat = (0..rows).map(|r| 40.0 + r as f64 * 0.25).collect();
    let lon = (0..cols).map(|c| -10.0 + c as f64 * 0.25).collect();

    let mut uwind = Vec::with_capacity(time_steps * rows * cols);
    for t in 0..time_steps {
        for row in 0..rows {
            for col in 0..cols {
                uwind.push((tag * 1000) as f32 + (t * 100 + row * 10 + col) as f32);
            }
        }
    }
    let vwind = uwind.iter().map(|u| -u).collect();

    WindSample {
        lat,
        lon,
        uwind,
        vwind,
    }
}
