#![allow(dead_code)]

use std::path::Path;

fn shape_tuple(shape: &[usize]) -> String {
    match shape.len() {
        1 => format!("({},)", shape[0]),
        _ => format!(
            "({})",
            shape
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

pub fn npy_custom(descr: &str, fortran_order: bool, shape: &[usize], payload: &[u8]) -> Vec<u8> {
    let mut header = format!(
        "{{'descr': '{}', 'fortran_order': {}, 'shape': {}, }}",
        descr,
        if fortran_order { "True" } else { "False" },
        shape_tuple(shape)
    );
    let total = 10 + header.len() + 1;
    let pad = (64 - total % 64) % 64;
    header.push_str(&" ".repeat(pad));
    header.push('\n');

    let mut out = Vec::new();
    out.extend_from_slice(b"\x93NUMPY");
    out.push(1);
    out.push(0);
    out.extend_from_slice(&(header.len() as u16).to_le_bytes());
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(payload);
    out
}

pub fn npy_f32(shape: &[usize], data: &[f32]) -> Vec<u8> {
    let payload: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
    npy_custom("<f4", false, shape, &payload)
}

pub fn npy_f64(shape: &[usize], data: &[f64]) -> Vec<u8> {
    let payload: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
    npy_custom("<f8", false, shape, &payload)
}

pub fn npy_i64(shape: &[usize], data: &[i64]) -> Vec<u8> {
    let payload: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
    npy_custom("<i8", false, shape, &payload)
}

/// Same layout with the 4-byte length prefix of NPY format v2.
pub fn npy_f32_v2(shape: &[usize], data: &[f32]) -> Vec<u8> {
    let mut header = format!(
        "{{'descr': '<f4', 'fortran_order': False, 'shape': {}, }}",
        shape_tuple(shape)
    );
    let total = 12 + header.len() + 1;
    let pad = (64 - total % 64) % 64;
    header.push_str(&" ".repeat(pad));
    header.push('\n');

    let mut out = Vec::new();
    out.extend_from_slice(b"\x93NUMPY");
    out.push(2);
    out.push(0);
    out.extend_from_slice(&(header.len() as u32).to_le_bytes());
    out.extend_from_slice(header.as_bytes());
    for v in data {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

pub fn write_file(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, bytes).unwrap();
}

/// (batch, window, locations, 1) tensor with value
/// sample*1000 + step*10 + location, exactly representable in f32.
pub fn forecast_values(batch: usize, window: usize, locations: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(batch * window * locations);
    for sample in 0..batch {
        for step in 0..window {
            for loc in 0..locations {
                data.push((sample * 1000 + step * 10 + loc) as f32);
            }
        }
    }
    data
}

/// Seeds a local bucket mirror with the four input blobs used by the
/// end-to-end scenarios: net = base values + 7, ambient = base values,
/// label = base values + 1.
pub fn seed_bucket(root: &Path, batch: usize, window: usize, locations: usize) {
    let base = forecast_values(batch, window, locations);
    let net: Vec<f32> = base.iter().map(|v| v + 7.0).collect();
    let label: Vec<f32> = base.iter().map(|v| v + 1.0).collect();
    let shape = [batch, window, locations, 1];
    // 2017-01-01 01:00:00 UTC, hourly
    let time: Vec<i64> = (0..batch as i64).map(|i| 1483232400 + i * 3600).collect();

    write_file(&root.join("pm25gnn/predict.npy"), &npy_f32(&shape, &net));
    write_file(
        &root.join("pm25gnn-ambient/predict.npy"),
        &npy_f32(&shape, &base),
    );
    write_file(
        &root.join("pm25gnn-ambient/label.npy"),
        &npy_f32(&shape, &label),
    );
    write_file(&root.join("pm25gnn/time.npy"), &npy_i64(&[batch], &time));
}

pub fn write_locations_file(path: &Path) {
    write_file(
        path,
        b",location_id,city_name\n0,840060070007,Chico\n1,840060101002,Yuba City\n",
    );
}
