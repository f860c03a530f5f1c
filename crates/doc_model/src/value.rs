//! Typed values presented inside paragraphs
//!
//! The presentation layer only reads values. Every value carries a
//! [`ValueKind`] tag which the generator registry uses as its dispatch key,
//! and the `try_to_*` accessors perform the safe conversions renderers rely
//! on when a value does not have the exact type they expect.

use crate::{DocModelError, Result};
use serde::{Deserialize, Serialize};

// =============================================================================
// Complex numbers
// =============================================================================

/// A complex number with double precision parts
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Complex {
    pub real: f64,
    pub imag: f64,
}

impl Complex {
    pub const fn new(real: f64, imag: f64) -> Self {
        Self { real, imag }
    }

    /// Scale both parts by a real factor
    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.real * factor, self.imag * factor)
    }
}

// =============================================================================
// Matrices
// =============================================================================

/// A dense row-major matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix<T> {
    rows: usize,
    columns: usize,
    data: Vec<T>,
}

impl<T> Matrix<T> {
    /// Create a matrix from row-major coefficients.
    pub fn new(rows: usize, columns: usize, data: Vec<T>) -> Result<Self> {
        if rows.checked_mul(columns) != Some(data.len()) {
            return Err(DocModelError::InvalidDimensions {
                rows,
                columns,
                len: data.len(),
            });
        }

        Ok(Self { rows, columns, data })
    }

    /// Build a matrix by evaluating `f(row, column)` for every coefficient
    pub fn from_fn(rows: usize, columns: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(rows * columns);
        for row in 0..rows {
            for column in 0..columns {
                data.push(f(row, column));
            }
        }
        Self { rows, columns, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Coefficient at `(row, column)`, zero based
    pub fn at(&self, row: usize, column: usize) -> Option<&T> {
        if row < self.rows && column < self.columns {
            self.data.get(row * self.columns + column)
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// =============================================================================
// Values
// =============================================================================

/// Runtime type tag of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Boolean,
    Integer,
    Real,
    Complex,
    Text,
    BooleanMatrix,
    IntegerMatrix,
    RealMatrix,
    ComplexMatrix,
    Set,
    Tuple,
    /// A value whose type the presentation layer does not know
    Opaque,
}

impl ValueKind {
    /// Number of kinds, used to size dispatch tables
    pub const COUNT: usize = 12;

    pub const ALL: [ValueKind; Self::COUNT] = [
        ValueKind::Boolean,
        ValueKind::Integer,
        ValueKind::Real,
        ValueKind::Complex,
        ValueKind::Text,
        ValueKind::BooleanMatrix,
        ValueKind::IntegerMatrix,
        ValueKind::RealMatrix,
        ValueKind::ComplexMatrix,
        ValueKind::Set,
        ValueKind::Tuple,
        ValueKind::Opaque,
    ];

    /// Dense index of this kind
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn is_matrix(self) -> bool {
        matches!(
            self,
            ValueKind::BooleanMatrix
                | ValueKind::IntegerMatrix
                | ValueKind::RealMatrix
                | ValueKind::ComplexMatrix
        )
    }
}

/// A discriminated value as supplied by the document model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Complex(Complex),
    Text(String),
    BooleanMatrix(Matrix<bool>),
    IntegerMatrix(Matrix<i64>),
    RealMatrix(Matrix<f64>),
    ComplexMatrix(Matrix<Complex>),
    Set(Vec<Value>),
    Tuple(Vec<Value>),
    /// A value produced by a type this layer has no knowledge of
    Opaque { type_id: u16 },
}

impl Value {
    /// Get the runtime type tag
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Integer(_) => ValueKind::Integer,
            Self::Real(_) => ValueKind::Real,
            Self::Complex(_) => ValueKind::Complex,
            Self::Text(_) => ValueKind::Text,
            Self::BooleanMatrix(_) => ValueKind::BooleanMatrix,
            Self::IntegerMatrix(_) => ValueKind::IntegerMatrix,
            Self::RealMatrix(_) => ValueKind::RealMatrix,
            Self::ComplexMatrix(_) => ValueKind::ComplexMatrix,
            Self::Set(_) => ValueKind::Set,
            Self::Tuple(_) => ValueKind::Tuple,
            Self::Opaque { .. } => ValueKind::Opaque,
        }
    }

    pub fn try_to_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            Self::Integer(i) => Some(*i != 0),
            _ => None,
        }
    }

    pub fn try_to_integer(&self) -> Option<i64> {
        match self {
            Self::Boolean(b) => Some(i64::from(*b)),
            Self::Integer(i) => Some(*i),
            Self::Real(r) if r.fract() == 0.0 && r.is_finite() => Some(*r as i64),
            _ => None,
        }
    }

    pub fn try_to_real(&self) -> Option<f64> {
        match self {
            Self::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Integer(i) => Some(*i as f64),
            Self::Real(r) => Some(*r),
            Self::Complex(c) if c.imag == 0.0 => Some(c.real),
            _ => None,
        }
    }

    pub fn try_to_complex(&self) -> Option<Complex> {
        match self {
            Self::Complex(c) => Some(*c),
            other => other.try_to_real().map(|r| Complex::new(r, 0.0)),
        }
    }

    pub fn try_to_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Members of a set or tuple
    pub fn members(&self) -> Option<&[Value]> {
        match self {
            Self::Set(members) | Self::Tuple(members) => Some(members),
            _ => None,
        }
    }

    /// Interpret a tuple as a string.
    ///
    /// Succeeds when every member is either text or an integer holding a
    /// valid Unicode scalar value.
    pub fn tuple_as_string(&self) -> Option<String> {
        let Self::Tuple(members) = self else {
            return None;
        };

        let mut result = String::new();
        for member in members {
            match member {
                Self::Text(s) => result.push_str(s),
                Self::Integer(code) => {
                    let ch = u32::try_from(*code).ok().and_then(char::from_u32)?;
                    result.push(ch);
                }
                _ => return None,
            }
        }
        Some(result)
    }
}
