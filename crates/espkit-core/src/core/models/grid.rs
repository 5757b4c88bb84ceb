use crate::core::units::LengthUnit;
use nalgebra::{Point3, Vector3};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GridError {
    #[error("Grid with {len} values cannot be reshaped into M x 3 points")]
    UnsupportedGrid { len: usize },

    #[error("No van der Waals radius for element '{symbol}' (atom {index})")]
    UnsupportedElement { symbol: String, index: usize },

    #[error("Cannot generate a grid around a conformer without atoms")]
    Empty,

    #[error("Invalid grid settings: {0}")]
    InvalidSettings(String),
}

/// Ordered points in 3-space at which the potential is evaluated.
///
/// A grid is either supplied by the caller or generated from a conformer, and is not
/// modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    points: Vec<Point3<f64>>,
    unit: LengthUnit,
}

impl Grid {
    pub fn new(points: Vec<Point3<f64>>, unit: LengthUnit) -> Self {
        Self { points, unit }
    }

    /// Reshapes a flat `[x0, y0, z0, x1, ...]` array into points.
    pub fn from_flat(values: &[f64], unit: LengthUnit) -> Result<Self, GridError> {
        if values.len() % 3 != 0 {
            return Err(GridError::UnsupportedGrid { len: values.len() });
        }
        let points = values
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();
        Ok(Self { points, unit })
    }

    pub fn from_nested(values: &[[f64; 3]], unit: LengthUnit) -> Self {
        Self {
            points: values.iter().map(|&p| Point3::from(p)).collect(),
            unit,
        }
    }

    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn unit(&self) -> LengthUnit {
        self.unit
    }

    pub fn to_nested(&self) -> Vec<[f64; 3]> {
        self.points.iter().map(|p| [p.x, p.y, p.z]).collect()
    }

    /// Returns the same points expressed in `unit`.
    pub fn converted_to(&self, unit: LengthUnit) -> Self {
        if unit == self.unit {
            return self.clone();
        }
        Self {
            points: self
                .points
                .iter()
                .map(|p| p.map(|c| self.unit.convert(c, unit)))
                .collect(),
            unit,
        }
    }

    pub fn translated(&self, offset: &Vector3<f64>) -> Self {
        Self {
            points: self.points.iter().map(|p| p + offset).collect(),
            unit: self.unit,
        }
    }
}
