use anyhow::{Result, anyhow, bail};

/// Dense row-major tensor of f32 values.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Vec<usize>,
    data: Vec<f32>,
}

impl Tensor {
    pub fn new(shape: Vec<usize>, data: Vec<f32>) -> Result<Self> {
        let mut expected = 1usize;
        for &dim in &shape {
            expected = expected
                .checked_mul(dim)
                .ok_or_else(|| anyhow!("tensor shape {:?} overflows element count", shape))?;
        }
        if data.len() != expected {
            bail!(
                "tensor data length {} does not match shape {:?} ({} elements)",
                data.len(),
                shape,
                expected
            );
        }
        Ok(Self { shape, data })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Length of the leading (sample) axis.
    pub fn batch_len(&self) -> usize {
        self.shape.first().copied().unwrap_or(0)
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Keeps the earliest `len` entries along the leading axis.
    pub fn truncate_head(&self, len: usize) -> Result<Tensor> {
        if len > self.batch_len() {
            bail!(
                "cannot truncate leading axis to {} (length {})",
                len,
                self.batch_len()
            );
        }
        let stride: usize = self.shape[1..].iter().product();
        let mut shape = self.shape.clone();
        shape[0] = len;
        Ok(Tensor {
            shape,
            data: self.data[..len * stride].to_vec(),
        })
    }
}

/// Row-major 2-D array, the shape every tensor is flattened into before
/// table assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Matrix {
    pub fn new(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self> {
        let expected = rows
            .checked_mul(cols)
            .ok_or_else(|| anyhow!("matrix {}x{} overflows element count", rows, cols))?;
        if data.len() != expected {
            bail!(
                "matrix data length {} does not match {}x{}",
                data.len(),
                rows,
                cols
            );
        }
        Ok(Self { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn at(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.cols + col]
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }
}
