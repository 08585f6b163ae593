//! Payload codec
//!
//! Interprets a byte buffer as contiguous little-endian scalars of one
//! element type, and the inverse. Buffers whose length is not a multiple of
//! the element width are rejected rather than truncated.

use half::f16;
use num_complex::Complex64;

use super::registry::{ElementType, ScalarKind};
use crate::errors::{ErrorKind, Violation};

/// Decoded payload, widened to 64-bit lanes per kind
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    Bool(Vec<bool>),
    Int(Vec<i64>),
    Uint(Vec<u64>),
    Float(Vec<f64>),
    Complex(Vec<Complex64>),
}

impl Samples {
    pub fn len(&self) -> usize {
        match self {
            Samples::Bool(v) => v.len(),
            Samples::Int(v) => v.len(),
            Samples::Uint(v) => v.len(),
            Samples::Float(v) => v.len(),
            Samples::Complex(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> ScalarKind {
        match self {
            Samples::Bool(_) => ScalarKind::Bool,
            Samples::Int(_) => ScalarKind::Int,
            Samples::Uint(_) => ScalarKind::Uint,
            Samples::Float(_) => ScalarKind::Float,
            Samples::Complex(_) => ScalarKind::Complex,
        }
    }

    pub fn as_ints(&self) -> Option<&[i64]> {
        match self {
            Samples::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_uints(&self) -> Option<&[u64]> {
        match self {
            Samples::Uint(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_floats(&self) -> Option<&[f64]> {
        match self {
            Samples::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_complex(&self) -> Option<&[Complex64]> {
        match self {
            Samples::Complex(v) => Some(v),
            _ => None,
        }
    }
}

fn le<const N: usize>(chunk: &[u8]) -> [u8; N] {
    let mut buf = [0u8; N];
    buf.copy_from_slice(&chunk[..N]);
    buf
}

/// Decodes `buffer` as a sequence of `ty` scalars.
///
/// # Errors
///
/// `MisalignedPayload` when `buffer.len()` is not a multiple of the width.
pub fn decode(buffer: &[u8], ty: &ElementType) -> Result<Samples, Violation> {
    let width = ty.width();
    if buffer.len() % width != 0 {
        return Err(Violation::new(
            ErrorKind::MisalignedPayload,
            format!("byte length to be a multiple of {} ({})", width, ty.name()),
            format!("{} bytes", buffer.len()),
        ));
    }

    let chunks = buffer.chunks_exact(width);
    let samples = match (ty.kind(), width) {
        (ScalarKind::Bool, _) => Samples::Bool(chunks.map(|c| c[0] != 0).collect()),
        (ScalarKind::Int, 1) => Samples::Int(chunks.map(|c| i8::from_le_bytes(le(c)) as i64).collect()),
        (ScalarKind::Int, 2) => Samples::Int(chunks.map(|c| i16::from_le_bytes(le(c)) as i64).collect()),
        (ScalarKind::Int, 4) => Samples::Int(chunks.map(|c| i32::from_le_bytes(le(c)) as i64).collect()),
        (ScalarKind::Int, _) => Samples::Int(chunks.map(|c| i64::from_le_bytes(le(c))).collect()),
        (ScalarKind::Uint, 1) => Samples::Uint(chunks.map(|c| c[0] as u64).collect()),
        (ScalarKind::Uint, 2) => Samples::Uint(chunks.map(|c| u16::from_le_bytes(le(c)) as u64).collect()),
        (ScalarKind::Uint, 4) => Samples::Uint(chunks.map(|c| u32::from_le_bytes(le(c)) as u64).collect()),
        (ScalarKind::Uint, _) => Samples::Uint(chunks.map(|c| u64::from_le_bytes(le(c))).collect()),
        (ScalarKind::Float, 2) => Samples::Float(chunks.map(|c| f16::from_le_bytes(le(c)).to_f64()).collect()),
        (ScalarKind::Float, 4) => Samples::Float(chunks.map(|c| f32::from_le_bytes(le(c)) as f64).collect()),
        (ScalarKind::Float, _) => Samples::Float(chunks.map(|c| f64::from_le_bytes(le(c))).collect()),
        (ScalarKind::Complex, 8) => Samples::Complex(
            chunks
                .map(|c| {
                    Complex64::new(
                        f32::from_le_bytes(le(c)) as f64,
                        f32::from_le_bytes(le(&c[4..])) as f64,
                    )
                })
                .collect(),
        ),
        (ScalarKind::Complex, _) => Samples::Complex(
            chunks
                .map(|c| Complex64::new(f64::from_le_bytes(le(c)), f64::from_le_bytes(le(&c[8..]))))
                .collect(),
        ),
    };

    Ok(samples)
}

fn narrow<T: TryFrom<S>, S: Copy + ToString>(value: S, ty: &ElementType) -> Result<T, Violation> {
    T::try_from(value).map_err(|_| {
        Violation::range(format!("value representable as {}", ty.name()), value.to_string())
    })
}

fn narrow_f16(value: f64, ty: &ElementType) -> Result<f16, Violation> {
    if value.is_finite() && value.abs() > f16::MAX.to_f64() {
        return Err(Violation::range(
            format!("value representable as {}", ty.name()),
            value.to_string(),
        ));
    }
    Ok(f16::from_f64(value))
}

fn narrow_f32(value: f64, ty: &ElementType) -> Result<f32, Violation> {
    if value.is_finite() && value.abs() > f32::MAX as f64 {
        return Err(Violation::range(
            format!("value representable as {}", ty.name()),
            value.to_string(),
        ));
    }
    Ok(value as f32)
}

/// Encodes `samples` as contiguous little-endian `ty` scalars.
///
/// # Errors
///
/// `TypeMismatch` when the sample kind differs from the element kind,
/// `RangeViolation` when a value does not fit the element width.
pub fn encode(samples: &Samples, ty: &ElementType) -> Result<Vec<u8>, Violation> {
    if samples.kind() != ty.kind() {
        return Err(Violation::type_mismatch(
            format!("{} samples for {}", ty.kind(), ty.name()),
            format!("{} samples", samples.kind()),
        ));
    }

    let mut out = Vec::with_capacity(samples.len() * ty.width());

    match (samples, ty.width()) {
        (Samples::Bool(values), _) => out.extend(values.iter().map(|&b| b as u8)),
        (Samples::Int(values), width) => {
            for &v in values {
                match width {
                    1 => out.extend_from_slice(&narrow::<i8, _>(v, ty)?.to_le_bytes()),
                    2 => out.extend_from_slice(&narrow::<i16, _>(v, ty)?.to_le_bytes()),
                    4 => out.extend_from_slice(&narrow::<i32, _>(v, ty)?.to_le_bytes()),
                    _ => out.extend_from_slice(&v.to_le_bytes()),
                }
            }
        }
        (Samples::Uint(values), width) => {
            for &v in values {
                match width {
                    1 => out.push(narrow::<u8, _>(v, ty)?),
                    2 => out.extend_from_slice(&narrow::<u16, _>(v, ty)?.to_le_bytes()),
                    4 => out.extend_from_slice(&narrow::<u32, _>(v, ty)?.to_le_bytes()),
                    _ => out.extend_from_slice(&v.to_le_bytes()),
                }
            }
        }
        (Samples::Float(values), 2) => {
            for &v in values {
                out.extend_from_slice(&narrow_f16(v, ty)?.to_le_bytes());
            }
        }
        (Samples::Float(values), 4) => {
            for &v in values {
                out.extend_from_slice(&narrow_f32(v, ty)?.to_le_bytes());
            }
        }
        (Samples::Float(values), _) => {
            for &v in values {
                out.extend_from_slice(&v.to_le_bytes());
            }
        }
        (Samples::Complex(values), 8) => {
            for c in values {
                out.extend_from_slice(&narrow_f32(c.re, ty)?.to_le_bytes());
                out.extend_from_slice(&narrow_f32(c.im, ty)?.to_le_bytes());
            }
        }
        (Samples::Complex(values), _) => {
            for c in values {
                out.extend_from_slice(&c.re.to_le_bytes());
                out.extend_from_slice(&c.im.to_le_bytes());
            }
        }
    }

    Ok(out)
}
