//! Numeric values and their self-describing binary codec (component A).
//!
//! A [`NumericValue`] is either a scalar integer, a scalar float, or a
//! rectangular n-dimensional [`NumericArray`]. Integers are encoded in 4
//! bytes, floats in 8 — this crate mirrors that width in its in-memory
//! representation (`i32`/`f64`) so that encode/decode round-trips without
//! silent truncation.

use crate::error::{KernelError, Result};

const MAX_SHAPE_LEN: usize = 127;
const DIM_WIDTH: usize = 4;
const INT_WIDTH: usize = 4;
const FLOAT_WIDTH: usize = 8;

/// A numeric value: a scalar or an n-dimensional array of one element kind.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericValue {
    Int(i32),
    Float(f64),
    Array(NumericArray),
}

/// A rectangular n-dimensional array of a single element kind, stored
/// row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericArray {
    pub shape: Vec<u32>,
    pub data: ArrayData,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    Int(Vec<i32>),
    Float(Vec<f64>),
}

impl NumericArray {
    pub fn len(&self) -> usize {
        match &self.data {
            ArrayData::Int(v) => v.len(),
            ArrayData::Float(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_int(&self) -> bool {
        matches!(self.data, ArrayData::Int(_))
    }
}

impl NumericValue {
    /// True for `Int`/`Float`, false for `Array`.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, NumericValue::Array(_))
    }

    /// Elementwise application of a scalar operation, broadcasting a scalar
    /// against an array or requiring identical shapes for array-array pairs.
    fn broadcast(
        &self,
        other: &NumericValue,
        op: impl Fn(f64, f64) -> f64,
        int_op: impl Fn(i32, i32) -> i32,
    ) -> Result<NumericValue> {
        match (self, other) {
            (NumericValue::Int(a), NumericValue::Int(b)) => Ok(NumericValue::Int(int_op(*a, *b))),
            (NumericValue::Array(a), NumericValue::Array(b)) => {
                if a.shape != b.shape {
                    return Err(KernelError::Evaluation(format!(
                        "shape mismatch: {:?} vs {:?}",
                        a.shape, b.shape
                    )));
                }
                elementwise_pair(a, b, op, int_op)
            }
            (NumericValue::Array(a), scalar) => broadcast_scalar(a, scalar, &op, &int_op, true),
            (scalar, NumericValue::Array(b)) => broadcast_scalar(b, scalar, &op, &int_op, false),
            _ => {
                let (x, y) = (self.as_f64(), other.as_f64());
                Ok(NumericValue::Float(op(x, y)))
            }
        }
    }

    pub fn add(&self, other: &NumericValue) -> Result<NumericValue> {
        self.broadcast(other, |a, b| a + b, |a, b| a.wrapping_add(b))
    }

    pub fn sub(&self, other: &NumericValue) -> Result<NumericValue> {
        self.broadcast(other, |a, b| a - b, |a, b| a.wrapping_sub(b))
    }

    pub fn mul(&self, other: &NumericValue) -> Result<NumericValue> {
        self.broadcast(other, |a, b| a * b, |a, b| a.wrapping_mul(b))
    }

    /// Division is always true division (matches Python's `/`, which never
    /// stays integral): `6 / 2` is `Float(3.0)`, not `Int(3)`, and this holds
    /// elementwise for arrays too — `int_op`-based truncation never applies
    /// to `Divide`.
    pub fn div(&self, other: &NumericValue) -> Result<NumericValue> {
        match (self, other) {
            (NumericValue::Int(a), NumericValue::Int(b)) => {
                if *b == 0 {
                    return Err(KernelError::Evaluation("division by zero".into()));
                }
                Ok(NumericValue::Float(*a as f64 / *b as f64))
            }
            (NumericValue::Array(a), NumericValue::Array(b)) => {
                if a.shape != b.shape {
                    return Err(KernelError::Evaluation(format!(
                        "shape mismatch: {:?} vs {:?}",
                        a.shape, b.shape
                    )));
                }
                let x = to_f64_vec(&a.data);
                let y = to_f64_vec(&b.data);
                Ok(NumericValue::Array(NumericArray {
                    shape: a.shape.clone(),
                    data: ArrayData::Float(x.iter().zip(&y).map(|(p, q)| p / q).collect()),
                }))
            }
            (NumericValue::Array(a), scalar) => {
                let s = scalar.as_f64();
                let data = to_f64_vec(&a.data).iter().map(|v| v / s).collect();
                Ok(NumericValue::Array(NumericArray {
                    shape: a.shape.clone(),
                    data: ArrayData::Float(data),
                }))
            }
            (scalar, NumericValue::Array(b)) => {
                let s = scalar.as_f64();
                let data = to_f64_vec(&b.data).iter().map(|v| s / v).collect();
                Ok(NumericValue::Array(NumericArray {
                    shape: b.shape.clone(),
                    data: ArrayData::Float(data),
                }))
            }
            _ => Ok(NumericValue::Float(self.as_f64() / other.as_f64())),
        }
    }

    /// Floor modulo: the result's sign follows the divisor, matching
    /// Python's `%` (not `rem_euclid`, which is always non-negative). A
    /// scalar zero divisor is a `KernelError::Evaluation`, mirroring `div`;
    /// `numpy`'s array-backed `%` by zero does not raise, so the array path
    /// keeps coercing to `0`.
    pub fn rem(&self, other: &NumericValue) -> Result<NumericValue> {
        if let (NumericValue::Int(_), NumericValue::Int(b)) = (self, other) {
            if *b == 0 {
                return Err(KernelError::Evaluation("modulo by zero".into()));
            }
        }
        self.broadcast(
            other,
            floor_mod_f64,
            |a, b| if b == 0 { 0 } else { floor_mod_i32(a, b) },
        )
    }

    pub fn pow(&self, other: &NumericValue) -> Result<NumericValue> {
        match (self, other) {
            (NumericValue::Int(a), NumericValue::Int(b)) if *b >= 0 => {
                Ok(NumericValue::Int(a.wrapping_pow(*b as u32)))
            }
            (NumericValue::Int(a), NumericValue::Int(b)) => {
                Ok(NumericValue::Float((*a as f64).powi(*b)))
            }
            _ => self.broadcast(other, |a, b| a.powf(b), |a, b| a.wrapping_pow(b.max(0) as u32)),
        }
    }

    fn unary(&self, op: impl Fn(f64) -> f64) -> NumericValue {
        match self {
            NumericValue::Int(a) => NumericValue::Float(op(*a as f64)),
            NumericValue::Float(a) => NumericValue::Float(op(*a)),
            NumericValue::Array(a) => {
                let data: Vec<f64> = match &a.data {
                    ArrayData::Int(v) => v.iter().map(|x| op(*x as f64)).collect(),
                    ArrayData::Float(v) => v.iter().map(|x| op(*x)).collect(),
                };
                NumericValue::Array(NumericArray {
                    shape: a.shape.clone(),
                    data: ArrayData::Float(data),
                })
            }
        }
    }

    pub fn neg(&self) -> NumericValue {
        match self {
            NumericValue::Int(a) => NumericValue::Int(-a),
            NumericValue::Float(a) => NumericValue::Float(-a),
            NumericValue::Array(a) => match &a.data {
                ArrayData::Int(v) => NumericValue::Array(NumericArray {
                    shape: a.shape.clone(),
                    data: ArrayData::Int(v.iter().map(|x| -x).collect()),
                }),
                ArrayData::Float(v) => NumericValue::Array(NumericArray {
                    shape: a.shape.clone(),
                    data: ArrayData::Float(v.iter().map(|x| -x).collect()),
                }),
            },
        }
    }

    pub fn exp(&self) -> NumericValue {
        self.unary(f64::exp)
    }

    pub fn log(&self) -> NumericValue {
        self.unary(f64::ln)
    }

    pub fn sin(&self) -> NumericValue {
        self.unary(f64::sin)
    }

    pub fn cos(&self) -> NumericValue {
        self.unary(f64::cos)
    }

    /// Elementwise absolute value. A transcription bug in one variant of the
    /// original implementation called the logarithm here instead; this
    /// kernel always computes the absolute value, as the component design
    /// requires.
    pub fn abs(&self) -> NumericValue {
        match self {
            NumericValue::Int(a) => NumericValue::Int(a.abs()),
            NumericValue::Float(a) => NumericValue::Float(a.abs()),
            NumericValue::Array(a) => match &a.data {
                ArrayData::Int(v) => NumericValue::Array(NumericArray {
                    shape: a.shape.clone(),
                    data: ArrayData::Int(v.iter().map(|x| x.abs()).collect()),
                }),
                ArrayData::Float(v) => NumericValue::Array(NumericArray {
                    shape: a.shape.clone(),
                    data: ArrayData::Float(v.iter().map(|x| x.abs()).collect()),
                }),
            },
        }
    }

    pub fn sign(&self) -> NumericValue {
        match self {
            NumericValue::Int(a) => NumericValue::Int(a.signum()),
            NumericValue::Float(a) => NumericValue::Float(if *a > 0.0 {
                1.0
            } else if *a < 0.0 {
                -1.0
            } else {
                0.0
            }),
            NumericValue::Array(a) => match &a.data {
                ArrayData::Int(v) => NumericValue::Array(NumericArray {
                    shape: a.shape.clone(),
                    data: ArrayData::Int(v.iter().map(|x| x.signum()).collect()),
                }),
                ArrayData::Float(v) => NumericValue::Array(NumericArray {
                    shape: a.shape.clone(),
                    data: ArrayData::Float(
                        v.iter()
                            .map(|x| if *x > 0.0 { 1.0 } else if *x < 0.0 { -1.0 } else { 0.0 })
                            .collect(),
                    ),
                }),
            },
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            NumericValue::Int(a) => *a == 0,
            NumericValue::Float(a) => *a == 0.0,
            NumericValue::Array(_) => false,
        }
    }

    pub fn is_one(&self) -> bool {
        match self {
            NumericValue::Int(a) => *a == 1,
            NumericValue::Float(a) => *a == 1.0,
            NumericValue::Array(_) => false,
        }
    }

    fn as_f64(&self) -> f64 {
        match self {
            NumericValue::Int(a) => *a as f64,
            NumericValue::Float(a) => *a,
            NumericValue::Array(_) => f64::NAN,
        }
    }

    // -- codec --------------------------------------------------------

    /// Encode this value per the numeric wire format (§4.A).
    pub fn encode(&self) -> Result<Vec<u8>> {
        match self {
            NumericValue::Int(v) => Ok(encode_scalar_or_array(0, &[], &ArrayData::Int(vec![*v]))),
            NumericValue::Float(v) => {
                Ok(encode_scalar_or_array(1, &[], &ArrayData::Float(vec![*v])))
            }
            NumericValue::Array(arr) => {
                if arr.shape.len() > MAX_SHAPE_LEN {
                    return Err(KernelError::Encode(format!(
                        "too many dimensions in array ({})",
                        arr.shape.len()
                    )));
                }
                let kind_bit = if arr.is_int() { 0 } else { 1 };
                Ok(encode_scalar_or_array(kind_bit, &arr.shape, &arr.data))
            }
        }
    }

    /// Decode a value from the front of `data`, returning the value and the
    /// number of bytes consumed.
    pub fn decode(data: &[u8]) -> Result<(NumericValue, usize)> {
        if data.is_empty() {
            return Err(KernelError::Decode("empty numeric payload".into()));
        }
        let kind_bit = data[0] & 1;
        let shape_len = (data[0] >> 1) as usize;

        let shape_end = 1 + shape_len * DIM_WIDTH;
        if data.len() < shape_end {
            return Err(KernelError::Decode("truncated numeric shape".into()));
        }
        let mut shape = Vec::with_capacity(shape_len);
        for i in 0..shape_len {
            let start = 1 + i * DIM_WIDTH;
            let dim = u32::from_be_bytes(data[start..start + DIM_WIDTH].try_into().unwrap());
            shape.push(dim);
        }

        let count: usize = shape.iter().map(|&d| d as usize).product();
        let elem_width = if kind_bit == 0 { INT_WIDTH } else { FLOAT_WIDTH };
        let data_end = shape_end + elem_width * count;
        if data.len() < data_end {
            return Err(KernelError::Decode("truncated numeric payload".into()));
        }
        let payload = &data[shape_end..data_end];

        if kind_bit == 0 {
            let values: Vec<i32> = payload
                .chunks_exact(INT_WIDTH)
                .map(|c| i32::from_be_bytes(c.try_into().unwrap()))
                .collect();
            if shape_len == 0 {
                Ok((NumericValue::Int(values[0]), data_end))
            } else {
                Ok((
                    NumericValue::Array(NumericArray {
                        shape,
                        data: ArrayData::Int(values),
                    }),
                    data_end,
                ))
            }
        } else {
            let values: Vec<f64> = payload
                .chunks_exact(FLOAT_WIDTH)
                .map(|c| f64::from_be_bytes(c.try_into().unwrap()))
                .collect();
            if shape_len == 0 {
                Ok((NumericValue::Float(values[0]), data_end))
            } else {
                Ok((
                    NumericValue::Array(NumericArray {
                        shape,
                        data: ArrayData::Float(values),
                    }),
                    data_end,
                ))
            }
        }
    }
}

fn encode_scalar_or_array(kind_bit: u8, shape: &[u32], data: &ArrayData) -> Vec<u8> {
    let mut out = Vec::new();
    let shape_len = shape.len() as u8;
    out.push((shape_len << 1) | kind_bit);
    for dim in shape {
        out.extend_from_slice(&dim.to_be_bytes());
    }
    match data {
        ArrayData::Int(v) => {
            for x in v {
                out.extend_from_slice(&x.to_be_bytes());
            }
        }
        ArrayData::Float(v) => {
            for x in v {
                out.extend_from_slice(&x.to_be_bytes());
            }
        }
    }
    out
}

fn elementwise_pair(
    a: &NumericArray,
    b: &NumericArray,
    op: impl Fn(f64, f64) -> f64,
    int_op: impl Fn(i32, i32) -> i32,
) -> Result<NumericValue> {
    match (&a.data, &b.data) {
        (ArrayData::Int(x), ArrayData::Int(y)) => Ok(NumericValue::Array(NumericArray {
            shape: a.shape.clone(),
            data: ArrayData::Int(x.iter().zip(y).map(|(p, q)| int_op(*p, *q)).collect()),
        })),
        _ => {
            let x = to_f64_vec(&a.data);
            let y = to_f64_vec(&b.data);
            Ok(NumericValue::Array(NumericArray {
                shape: a.shape.clone(),
                data: ArrayData::Float(x.iter().zip(&y).map(|(p, q)| op(*p, *q)).collect()),
            }))
        }
    }
}

fn broadcast_scalar(
    arr: &NumericArray,
    scalar: &NumericValue,
    op: &impl Fn(f64, f64) -> f64,
    int_op: &impl Fn(i32, i32) -> i32,
    array_is_lhs: bool,
) -> Result<NumericValue> {
    match (&arr.data, scalar) {
        (ArrayData::Int(v), NumericValue::Int(s)) => {
            let data = v
                .iter()
                .map(|x| if array_is_lhs { int_op(*x, *s) } else { int_op(*s, *x) })
                .collect();
            Ok(NumericValue::Array(NumericArray {
                shape: arr.shape.clone(),
                data: ArrayData::Int(data),
            }))
        }
        _ => {
            let s = scalar.as_f64();
            let x = to_f64_vec(&arr.data);
            let data = x
                .iter()
                .map(|v| if array_is_lhs { op(*v, s) } else { op(s, *v) })
                .collect();
            Ok(NumericValue::Array(NumericArray {
                shape: arr.shape.clone(),
                data: ArrayData::Float(data),
            }))
        }
    }
}

fn to_f64_vec(data: &ArrayData) -> Vec<f64> {
    match data {
        ArrayData::Int(v) => v.iter().map(|x| *x as f64).collect(),
        ArrayData::Float(v) => v.clone(),
    }
}

/// `a % b` with the result's sign following `b`, Python-style.
fn floor_mod_i32(a: i32, b: i32) -> i32 {
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        r + b
    } else {
        r
    }
}

/// `a % b` with the result's sign following `b`, Python-style.
fn floor_mod_f64(a: f64, b: f64) -> f64 {
    let r = a % b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) {
        r + b
    } else {
        r
    }
}

impl From<i32> for NumericValue {
    fn from(v: i32) -> Self {
        NumericValue::Int(v)
    }
}

impl From<i64> for NumericValue {
    fn from(v: i64) -> Self {
        NumericValue::Int(v as i32)
    }
}

impl From<f64> for NumericValue {
    fn from(v: f64) -> Self {
        NumericValue::Float(v)
    }
}

impl From<NumericArray> for NumericValue {
    fn from(v: NumericArray) -> Self {
        NumericValue::Array(v)
    }
}
