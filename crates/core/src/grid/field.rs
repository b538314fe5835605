//! Row-major 2D field storage
//!
//! Every per-cell quantity of the forest grid (status, fuel, humidity,
//! temperature) is a [`FieldData`] of the same shape. Shapes are fixed at
//! construction; only the values change.

/// Row-major field of `rows × cols` values
#[derive(Debug, Clone, PartialEq)]
pub struct FieldData<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T: Copy> FieldData<T> {
    /// Create a field with every cell set to `value`
    pub fn with_value(rows: usize, cols: usize, value: T) -> Self {
        Self {
            data: vec![value; rows * cols],
            rows,
            cols,
        }
    }

    /// Create a field from a generator called once per `(row, col)` in row-major order
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                data.push(f(row, col));
            }
        }
        Self { data, rows, cols }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Get value at grid position
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        assert!(
            row < self.rows && col < self.cols,
            "Coordinates out of bounds"
        );
        self.data[row * self.cols + col]
    }

    /// Set value at grid position
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        assert!(
            row < self.rows && col < self.cols,
            "Coordinates out of bounds"
        );
        self.data[row * self.cols + col] = value;
    }

    /// Fill entire field with a value
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Iterate rows as slices
    pub fn rows_iter(&self) -> std::slice::Chunks<'_, T> {
        self.data.chunks(self.cols.max(1))
    }
}

impl FieldData<f32> {
    /// Arithmetic mean, accumulated in `f64`. Empty fields average to `0.0`.
    pub fn mean(&self) -> f32 {
        mean(&self.data)
    }
}

/// Arithmetic mean of a slice, accumulated in `f64`.
pub fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: f64 = values.iter().map(|&v| f64::from(v)).sum();
    (sum / values.len() as f64) as f32
}
