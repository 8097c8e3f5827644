use anyhow::{Context, Result, bail};

use crate::tensor::Tensor;

const MAGIC: &[u8] = b"\x93NUMPY";

#[derive(Debug, Clone)]
pub enum NpyData {
    F32(Vec<f32>),
    F64(Vec<f64>),
    I32(Vec<i32>),
    I64(Vec<i64>),
}

/// A decoded NPY blob: shape plus typed payload.
#[derive(Debug, Clone)]
pub struct NpyArray {
    pub shape: Vec<usize>,
    pub data: NpyData,
}

impl NpyArray {
    pub fn len(&self) -> usize {
        match &self.data {
            NpyData::F32(v) => v.len(),
            NpyData::F64(v) => v.len(),
            NpyData::I32(v) => v.len(),
            NpyData::I64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Model outputs are consumed as f32 regardless of on-disk dtype.
    pub fn into_tensor(self) -> Result<Tensor> {
        let data: Vec<f32> = match self.data {
            NpyData::F32(v) => v,
            NpyData::F64(v) => v.into_iter().map(|x| x as f32).collect(),
            NpyData::I32(v) => v.into_iter().map(|x| x as f32).collect(),
            NpyData::I64(v) => v.into_iter().map(|x| x as f32).collect(),
        };
        Tensor::new(self.shape, data)
    }

    /// Unix seconds from a 1-D time array.
    pub fn into_timestamps(self) -> Result<Vec<i64>> {
        if self.shape.len() != 1 {
            bail!("time array must be 1-D, got shape {:?}", self.shape);
        }
        Ok(match self.data {
            NpyData::I64(v) => v,
            NpyData::I32(v) => v.into_iter().map(i64::from).collect(),
            NpyData::F64(v) => v.into_iter().map(|x| x as i64).collect(),
            NpyData::F32(v) => v.into_iter().map(|x| x as i64).collect(),
        })
    }
}

/// Parses NPY format versions 1-3, little-endian C-order arrays only.
pub fn parse(bytes: &[u8]) -> Result<NpyArray> {
    if bytes.len() < 10 || &bytes[..6] != MAGIC {
        bail!("not an NPY file");
    }
    let major = bytes[6];
    let (header_len, header_start): (usize, usize) = match major {
        1 => (u16::from_le_bytes([bytes[8], bytes[9]]) as usize, 10),
        2 | 3 => {
            if bytes.len() < 12 {
                bail!("NPY header truncated");
            }
            (
                u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize,
                12,
            )
        }
        other => bail!("unsupported NPY format version {}", other),
    };
    let header_end = header_start
        .checked_add(header_len)
        .filter(|&end| end <= bytes.len())
        .context("NPY header truncated")?;
    let header =
        std::str::from_utf8(&bytes[header_start..header_end]).context("NPY header is not UTF-8")?;

    let descr = field_str(header, "descr")?;
    if field_bool(header, "fortran_order")? {
        bail!("Fortran-order NPY input is not supported");
    }
    let shape = parse_shape(header)?;

    let mut count = 1usize;
    for &dim in &shape {
        count = count
            .checked_mul(dim)
            .context("NPY shape overflows element count")?;
    }
    let data = decode(&descr, count, &bytes[header_end..])?;
    Ok(NpyArray { shape, data })
}

fn field_str(header: &str, key: &str) -> Result<String> {
    let rest = after_key(header, key)?;
    let quote = rest
        .chars()
        .next()
        .filter(|c| *c == '\'' || *c == '"')
        .with_context(|| format!("NPY header field '{}' is not a string", key))?;
    let body = &rest[1..];
    let end = body
        .find(quote)
        .with_context(|| format!("unterminated string for NPY header field '{}'", key))?;
    Ok(body[..end].to_string())
}

fn field_bool(header: &str, key: &str) -> Result<bool> {
    let rest = after_key(header, key)?;
    if rest.starts_with("True") {
        Ok(true)
    } else if rest.starts_with("False") {
        Ok(false)
    } else {
        bail!("NPY header field '{}' is not a boolean", key)
    }
}

fn parse_shape(header: &str) -> Result<Vec<usize>> {
    let rest = after_key(header, "shape")?;
    if !rest.starts_with('(') {
        bail!("NPY header field 'shape' is not a tuple");
    }
    let end = rest
        .find(')')
        .context("unterminated tuple for NPY header field 'shape'")?;
    let mut shape = Vec::new();
    for part in rest[1..end].split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let dim: usize = part
            .parse()
            .with_context(|| format!("invalid NPY shape dimension '{}'", part))?;
        shape.push(dim);
    }
    Ok(shape)
}

fn after_key<'a>(header: &'a str, key: &str) -> Result<&'a str> {
    let needle = format!("'{}'", key);
    let pos = header
        .find(&needle)
        .with_context(|| format!("NPY header missing field '{}'", key))?;
    let rest = &header[pos + needle.len()..];
    let colon = rest
        .find(':')
        .with_context(|| format!("NPY header field '{}' missing value", key))?;
    Ok(rest[colon + 1..].trim_start())
}

fn decode(descr: &str, count: usize, payload: &[u8]) -> Result<NpyData> {
    let elem_bytes = match descr {
        "<f4" | "<i4" => 4,
        "<f8" | "<i8" => 8,
        other => bail!("unsupported NPY dtype '{}'", other),
    };
    let expected = count
        .checked_mul(elem_bytes)
        .context("NPY payload size overflows")?;
    if payload.len() != expected {
        bail!(
            "NPY payload size mismatch: expected {} bytes, found {}",
            expected,
            payload.len()
        );
    }
    Ok(match descr {
        "<f4" => NpyData::F32(
            payload
                .chunks_exact(4)
                .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ),
        "<f8" => NpyData::F64(
            payload
                .chunks_exact(8)
                .map(|c| f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
                .collect(),
        ),
        "<i4" => NpyData::I32(
            payload
                .chunks_exact(4)
                .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ),
        "<i8" => NpyData::I64(
            payload
                .chunks_exact(8)
                .map(|c| i64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
                .collect(),
        ),
        _ => unreachable!("dtype checked above"),
    })
}
