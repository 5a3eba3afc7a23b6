use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, Result};

/// One entry of a [`Matrix`]: either a number or a nested matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Element {
    Scalar(f64),
    Nested(Matrix),
}

impl Element {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Element::Scalar(x) => Some(*x),
            Element::Nested(_) => None,
        }
    }

    pub fn as_matrix(&self) -> Option<&Matrix> {
        match self {
            Element::Scalar(_) => None,
            Element::Nested(m) => Some(m),
        }
    }
}

impl From<f64> for Element {
    fn from(x: f64) -> Self {
        Element::Scalar(x)
    }
}

impl From<Matrix> for Element {
    fn from(m: Matrix) -> Self {
        Element::Nested(m)
    }
}

/// A jagged, arbitrarily nested numeric container.
///
/// A flat vector is a matrix of scalars, a weight matrix is a matrix of such
/// vectors, and a per-layer gradient is a matrix of weight matrices. Rows may
/// have independent lengths; element-wise operations only require that both
/// operands are [`similar`](Matrix::similar).
///
/// Serializes as plain nested JSON arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Matrix {
    items: Vec<Element>,
}

impl Matrix {
    pub fn new() -> Matrix {
        Matrix { items: Vec::new() }
    }

    /// Flat vector of scalars.
    pub fn from_vec(values: Vec<f64>) -> Matrix {
        values.into_iter().collect()
    }

    /// Two-level matrix, one nested vector per row.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Matrix {
        rows.into_iter().map(Matrix::from_vec).collect()
    }

    /// `n × n` matrix with 1.0 on the diagonal and 0.0 elsewhere.
    pub fn identity(n: usize) -> Matrix {
        (0..n)
            .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect::<Matrix>())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.items.iter()
    }

    pub fn append(&mut self, value: impl Into<Element>) {
        self.items.push(value.into());
    }

    pub fn prepend(&mut self, value: impl Into<Element>) {
        self.items.insert(0, value.into());
    }

    pub fn get(&self, index: usize) -> Result<&Element> {
        self.items.get(index).ok_or(NetworkError::IndexOutOfRange {
            index,
            len: self.items.len(),
        })
    }

    pub fn get_scalar(&self, index: usize) -> Result<f64> {
        self.get(index)?
            .as_scalar()
            .ok_or_else(|| NetworkError::shape(format!("element {index} is a matrix, expected a scalar")))
    }

    pub fn get_matrix(&self, index: usize) -> Result<&Matrix> {
        self.get(index)?
            .as_matrix()
            .ok_or_else(|| NetworkError::shape(format!("element {index} is a scalar, expected a matrix")))
    }

    pub fn get_matrix_mut(&mut self, index: usize) -> Result<&mut Matrix> {
        let len = self.items.len();
        match self.items.get_mut(index) {
            Some(Element::Nested(m)) => Ok(m),
            Some(Element::Scalar(_)) => Err(NetworkError::shape(format!(
                "element {index} is a scalar, expected a matrix"
            ))),
            None => Err(NetworkError::IndexOutOfRange { index, len }),
        }
    }

    /// Replaces the element at `index`. Never grows the matrix.
    pub fn set(&mut self, index: usize, value: impl Into<Element>) -> Result<()> {
        let len = self.items.len();
        let slot = self
            .items
            .get_mut(index)
            .ok_or(NetworkError::IndexOutOfRange { index, len })?;
        *slot = value.into();
        Ok(())
    }

    /// Same shape, every scalar zero.
    pub fn shape(&self) -> Matrix {
        self.fill(0.0)
    }

    /// Same shape, every scalar `value`.
    pub fn fill(&self, value: f64) -> Matrix {
        self.apply(|_| value)
    }

    pub fn apply<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        self.map_scalars(&functor)
    }

    fn map_scalars(&self, functor: &dyn Fn(f64) -> f64) -> Matrix {
        self.items
            .iter()
            .map(|e| match e {
                Element::Scalar(x) => Element::Scalar(functor(*x)),
                Element::Nested(m) => Element::Nested(m.map_scalars(functor)),
            })
            .collect()
    }

    /// Every scalar multiplied by `factor`; same as `product(shape().fill(factor))`.
    pub fn scale(&self, factor: f64) -> Matrix {
        self.apply(|x| x * factor)
    }

    /// Element-wise (Hadamard) product.
    pub fn product(&self, other: &Matrix) -> Result<Matrix> {
        self.zip_with(other, &|a: f64, b: f64| a * b, "product")
    }

    pub fn add(&self, other: &Matrix) -> Result<Matrix> {
        self.zip_with(other, &|a: f64, b: f64| a + b, "add")
    }

    pub fn sub(&self, other: &Matrix) -> Result<Matrix> {
        self.zip_with(other, &|a: f64, b: f64| a - b, "sub")
    }

    fn zip_with(&self, other: &Matrix, op: &dyn Fn(f64, f64) -> f64, name: &str) -> Result<Matrix> {
        if self.len() != other.len() {
            return Err(NetworkError::shape(format!(
                "{name} of matrices with {} and {} elements",
                self.len(),
                other.len()
            )));
        }
        self.items
            .iter()
            .zip(other.items.iter())
            .map(|pair| match pair {
                (Element::Scalar(a), Element::Scalar(b)) => Ok(Element::Scalar(op(*a, *b))),
                (Element::Nested(a), Element::Nested(b)) => a.zip_with(b, op, name).map(Element::Nested),
                _ => Err(NetworkError::shape(format!("{name} of a scalar with a matrix"))),
            })
            .collect::<Result<Vec<_>>>()
            .map(|items| Matrix { items })
    }

    /// Sum of every scalar at every depth.
    pub fn sum(&self) -> f64 {
        self.items
            .iter()
            .map(|e| match e {
                Element::Scalar(x) => *x,
                Element::Nested(m) => m.sum(),
            })
            .sum()
    }

    /// The `index`-th scalar of every row, as a flat vector.
    pub fn column(&self, index: usize) -> Result<Matrix> {
        self.items
            .iter()
            .enumerate()
            .map(|(row, e)| match e {
                Element::Nested(m) => m.get_scalar(index),
                Element::Scalar(_) => Err(NetworkError::shape(format!(
                    "column {index} requested but row {row} is a scalar"
                ))),
            })
            .collect()
    }

    pub fn similar(&self, other: &Matrix) -> bool {
        self.len() == other.len()
            && self.items.iter().zip(other.items.iter()).all(|pair| match pair {
                (Element::Scalar(_), Element::Scalar(_)) => true,
                (Element::Nested(a), Element::Nested(b)) => a.similar(b),
                _ => false,
            })
    }

    /// Scalars of a flat vector.
    pub fn to_vec(&self) -> Result<Vec<f64>> {
        (0..self.len()).map(|i| self.get_scalar(i)).collect()
    }
}

impl<E: Into<Element>> FromIterator<E> for Matrix {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Matrix {
            items: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<E: Into<Element>> Extend<E> for Matrix {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        self.items.extend(iter.into_iter().map(Into::into));
    }
}

impl From<Vec<f64>> for Matrix {
    fn from(values: Vec<f64>) -> Self {
        Matrix::from_vec(values)
    }
}
