//! Size Estimation Module
//!
//! Approximate in-memory footprint estimation for statistics. Values are
//! classified once into a finite set of shapes, and each shape maps to a
//! configurable constant cost. The result is explicitly approximate: it
//! exists for observability, never for capacity enforcement.

use std::collections::{BTreeMap, HashMap};

// == Size Costs ==
/// Per-shape constants used by the estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeCosts {
    /// Cost of a numeric or boolean value
    pub numeric: usize,
    /// Cost per element of a sequence
    pub array_element: usize,
    /// Cost per field of a mapping
    pub object_entry: usize,
    /// Cost of any value with no better classification
    pub fallback: usize,
}

impl Default for SizeCosts {
    fn default() -> Self {
        Self {
            numeric: 8,
            array_element: 40,
            object_entry: 80,
            fallback: 8,
        }
    }
}

// == Size Class ==
/// Finite classification of a value's shape, evaluated once per value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
    /// Textual value carrying its character length
    Text(usize),
    /// Number or boolean
    Numeric,
    /// Sequence carrying its element count
    Sequence(usize),
    /// Mapping carrying its field count
    Mapping(usize),
    /// Anything else
    Other,
}

impl SizeClass {
    /// Converts the classification into an estimated byte count.
    pub fn cost(self, costs: &SizeCosts) -> usize {
        match self {
            Self::Text(chars) => chars,
            Self::Numeric => costs.numeric,
            Self::Sequence(len) => costs.array_element * len,
            Self::Mapping(fields) => costs.object_entry * fields,
            Self::Other => costs.fallback,
        }
    }
}

// == Estimate Size Trait ==
/// Classifies a value for the approximate size estimator.
///
/// Implemented for the common shapes a cache stores; custom value types
/// implement it by reporting the closest [`SizeClass`].
pub trait EstimateSize {
    /// Returns the shape classification of this value.
    fn size_class(&self) -> SizeClass;
}

/// Estimates the footprint of a canonical key: its character length.
pub fn estimate_key_size(key: &str) -> usize {
    key.chars().count()
}

/// Estimates the footprint of a value under the given cost table.
pub fn estimate_value_size<V: EstimateSize>(value: &V, costs: &SizeCosts) -> usize {
    value.size_class().cost(costs)
}

// == Implementations ==
impl EstimateSize for String {
    fn size_class(&self) -> SizeClass {
        SizeClass::Text(self.chars().count())
    }
}

impl EstimateSize for bool {
    fn size_class(&self) -> SizeClass {
        SizeClass::Numeric
    }
}

macro_rules! impl_numeric_size {
    ($($num:ty),*) => {
        $(
            impl EstimateSize for $num {
                fn size_class(&self) -> SizeClass {
                    SizeClass::Numeric
                }
            }
        )*
    };
}

impl_numeric_size!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl<T> EstimateSize for Vec<T> {
    fn size_class(&self) -> SizeClass {
        SizeClass::Sequence(self.len())
    }
}

impl<K, V, S> EstimateSize for HashMap<K, V, S> {
    fn size_class(&self) -> SizeClass {
        SizeClass::Mapping(self.len())
    }
}

impl<K, V> EstimateSize for BTreeMap<K, V> {
    fn size_class(&self) -> SizeClass {
        SizeClass::Mapping(self.len())
    }
}

impl EstimateSize for serde_json::Value {
    fn size_class(&self) -> SizeClass {
        match self {
            serde_json::Value::String(s) => SizeClass::Text(s.chars().count()),
            serde_json::Value::Number(_) | serde_json::Value::Bool(_) => SizeClass::Numeric,
            serde_json::Value::Array(items) => SizeClass::Sequence(items.len()),
            serde_json::Value::Object(fields) => SizeClass::Mapping(fields.len()),
            serde_json::Value::Null => SizeClass::Other,
        }
    }
}
