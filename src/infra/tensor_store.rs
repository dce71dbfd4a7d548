// ============================================================
// Layer 6 — Tensor Store
// ============================================================
// Persists a conversation tensor [N, L, D] as delimited text.
//
// The tensor is flattened to N*L rows of D comma-separated
// values, preceded by a one-line shape header:
//
//   # shape: 2,3,4
//   0.1,0.2,0.3,0.4      ← line 0, word 0
//   0.5,0.6,0.7,0.8      ← line 0, word 1
//   ...                  ← 6 rows in total
//
// The header makes the file self-describing: read() rebuilds
// the 3D tensor without any caller-side bookkeeping. Files
// written without a header (plain 2D CSV) can still be read by
// passing the shape explicitly.
//
// Values are written with Rust's shortest round-trip float
// formatting, so read(write(t)) reproduces t exactly.

use burn::tensor::{backend::Backend, Tensor, TensorData};
use std::{
    fs,
    io::{BufWriter, Write},
    path::Path,
};

use crate::data::line_codec::tensor_values;
use crate::domain::error::CodecError;
use crate::domain::token::TensorShape;

const SHAPE_HEADER: &str = "# shape:";

pub struct TensorStore;

impl TensorStore {
    /// Write a conversation tensor to `path`, returning its shape.
    pub fn write<B: Backend>(path: impl AsRef<Path>, tensor: Tensor<B, 3>) -> Result<TensorShape, CodecError> {
        let shape  = TensorShape::from(tensor.dims());
        let values = tensor_values(tensor)?;
        Self::write_values(path, shape, &values)?;
        Ok(shape)
    }

    /// Write row-major values with the given shape.
    pub fn write_values(path: impl AsRef<Path>, shape: TensorShape, values: &[f32]) -> Result<(), CodecError> {
        let path = path.as_ref();
        if shape.element_count() != Some(values.len()) {
            return Err(CodecError::ShapeMismatch {
                expected: shape.dims().to_vec(),
                actual:   vec![values.len()],
            });
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| CodecError::io(parent, e))?;
        }

        let io_err = |e| CodecError::io(path, e);
        let file   = fs::File::create(path).map_err(io_err)?;
        let mut w  = BufWriter::new(file);

        writeln!(w, "{} {},{},{}", SHAPE_HEADER, shape.lines, shape.words_in_sentence, shape.dimension)
            .map_err(io_err)?;

        if shape.dimension > 0 {
            for row in values.chunks(shape.dimension) {
                let line = row.iter().map(f32::to_string).collect::<Vec<_>>().join(",");
                writeln!(w, "{line}").map_err(io_err)?;
            }
        }
        w.flush().map_err(io_err)?;

        tracing::info!("Wrote tensor of shape {} to '{}'", shape, path.display());
        Ok(())
    }

    /// Read a tensor written by `write`.
    pub fn read<B: Backend>(path: impl AsRef<Path>, device: &B::Device) -> Result<Tensor<B, 3>, CodecError> {
        Self::read_with_shape(path, None, device)
    }

    /// Read a tensor, using `shape` when the file has no header.
    /// If both are present they must agree.
    pub fn read_with_shape<B: Backend>(
        path:   impl AsRef<Path>,
        shape:  Option<TensorShape>,
        device: &B::Device,
    ) -> Result<Tensor<B, 3>, CodecError> {
        let (shape, values) = Self::read_values(path, shape)?;
        Ok(Tensor::from_data(TensorData::new(values, shape.dims()), device))
    }

    pub fn read_values(
        path:  impl AsRef<Path>,
        shape: Option<TensorShape>,
    ) -> Result<(TensorShape, Vec<f32>), CodecError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| CodecError::io(path, e))?;
        let parse_err = |line: usize, message: String| CodecError::Parse {
            path: path.to_path_buf(),
            line,
            message,
        };

        let mut lines  = text.lines().enumerate().peekable();
        let header     = match lines.peek().map(|&(_, line)| line) {
            Some(first) if first.starts_with(SHAPE_HEADER) => {
                let dims = parse_header(&first[SHAPE_HEADER.len()..])
                    .ok_or_else(|| parse_err(1, format!("bad shape header '{first}'")))?;
                lines.next();
                Some(dims)
            }
            _ => None,
        };

        let shape = match (header, shape) {
            (Some(h), Some(given)) if h != given => {
                return Err(CodecError::ShapeMismatch {
                    expected: given.dims().to_vec(),
                    actual:   h.dims().to_vec(),
                });
            }
            (Some(h), _)    => h,
            (None, Some(s)) => s,
            (None, None)    => {
                return Err(parse_err(1, "no shape header and no shape supplied".to_string()));
            }
        };

        // Header values are untrusted: check the product, reserve nothing up front
        let expected_rows = shape
            .element_count()
            .and(shape.rows())
            .ok_or_else(|| parse_err(1, format!("shape {shape} is too large")))?;

        let mut values = Vec::new();
        let mut rows   = 0usize;
        for (i, line) in lines {
            if line.trim().is_empty() {
                continue;
            }
            let row = line
                .split(',')
                .map(|v| v.trim().parse::<f32>())
                .collect::<Result<Vec<f32>, _>>()
                .map_err(|e| parse_err(i + 1, e.to_string()))?;
            if row.len() != shape.dimension {
                return Err(parse_err(
                    i + 1,
                    format!("expected {} values, found {}", shape.dimension, row.len()),
                ));
            }
            values.extend(row);
            rows += 1;
        }

        if rows != expected_rows {
            return Err(CodecError::ShapeMismatch {
                expected: shape.dims().to_vec(),
                actual:   vec![rows, shape.dimension],
            });
        }

        tracing::debug!("Read tensor of shape {} from '{}'", shape, path.display());
        Ok((shape, values))
    }
}

/// Parse "N,L,D" (whitespace tolerated).
fn parse_header(s: &str) -> Option<TensorShape> {
    let dims: Vec<usize> = s
        .split(',')
        .map(|d| d.trim().parse().ok())
        .collect::<Option<_>>()?;
    match dims.as_slice() {
        [n, l, d] => Some(TensorShape::new(*n, *l, *d)),
        _         => None,
    }
}
