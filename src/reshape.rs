//! Alignment and reshape of forecast tensors.
//!
//! Input tensors are (sample, window, location, channel). Output is one
//! (sample * pred_len) x location matrix per tensor plus a flat time
//! axis of matching row count, all row-index-aligned.

use anyhow::{Context, Result, bail};

use crate::tensor::{Matrix, Tensor};

#[derive(Debug, Clone)]
pub struct Reshaped {
    /// One matrix per input tensor, in input order.
    pub matrices: Vec<Matrix>,
    pub timestamps: Vec<i64>,
    pub min_len: usize,
    pub locations: usize,
}

/// The three reshaped series the table assembler consumes, plus the
/// shared time column.
#[derive(Debug, Clone)]
pub struct AlignedSet {
    pub observed: Matrix,
    pub predicted_net: Matrix,
    pub predicted_ambient: Matrix,
    pub timestamps: Vec<i64>,
    pub min_len: usize,
    pub locations: usize,
}

/// Common leading length across all tensors and the time axis.
pub fn min_batch_len(tensors: &[&Tensor], times: &[i64]) -> usize {
    tensors
        .iter()
        .map(|t| t.batch_len())
        .chain(std::iter::once(times.len()))
        .min()
        .unwrap_or(0)
}

/// Selects the last `pred_len` window steps and the first channel, then
/// flattens to (batch * pred_len) rows by `locations` columns.
pub fn window_columns(tensor: &Tensor, pred_len: usize) -> Result<Matrix> {
    let [batch, window, locations, channels] = match tensor.shape() {
        &[a, b, c, d] => [a, b, c, d],
        _ => bail!("expected a 4-D tensor, got shape {:?}", tensor.shape()),
    };
    if channels == 0 {
        bail!("tensor has zero channels");
    }
    if pred_len == 0 || pred_len > window {
        bail!(
            "pred_len {} outside forecast window of {} steps",
            pred_len,
            window
        );
    }

    let data = tensor.data();
    let mut out = Vec::with_capacity(batch * pred_len * locations);
    for sample in 0..batch {
        for step in (window - pred_len)..window {
            let base = (sample * window + step) * locations * channels;
            for loc in 0..locations {
                out.push(data[base + loc * channels]);
            }
        }
    }
    Matrix::new(batch * pred_len, locations, out)
}

/// Each timestamp covers a whole forecast window: it is repeated `k`
/// times contiguously rather than advanced per step.
pub fn repeat_each(times: &[i64], k: usize) -> Vec<i64> {
    let mut out = Vec::with_capacity(times.len() * k);
    for &t in times {
        for _ in 0..k {
            out.push(t);
        }
    }
    out
}

/// Head-truncates every tensor to the common minimum leading length,
/// then reshapes each and expands the time axis to match.
pub fn align_and_reshape(tensors: &[&Tensor], times: &[i64], pred_len: usize) -> Result<Reshaped> {
    if tensors.is_empty() {
        bail!("no tensors to align");
    }
    for tensor in tensors {
        if tensor.ndim() != 4 {
            bail!("expected 4-D tensors, got shape {:?}", tensor.shape());
        }
    }
    let locations = tensors[0].shape()[2];
    for tensor in &tensors[1..] {
        if tensor.shape()[2] != locations {
            bail!(
                "location axis mismatch: {} vs {}",
                tensor.shape()[2],
                locations
            );
        }
    }

    let min_len = min_batch_len(tensors, times);
    let mut matrices = Vec::with_capacity(tensors.len());
    for tensor in tensors {
        let truncated = tensor
            .truncate_head(min_len)
            .context("failed to truncate tensor to common length")?;
        matrices.push(window_columns(&truncated, pred_len)?);
    }
    let timestamps = repeat_each(&times[..min_len], pred_len);

    Ok(Reshaped {
        matrices,
        timestamps,
        min_len,
        locations,
    })
}
