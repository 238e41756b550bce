// Copyright 2025 Cowboy AI, LLC.

//! Dimension space points and sets of them

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::errors::DimensionSpaceError;

/// One concrete combination of dimension values, e.g. `{"language": "en_US"}`
///
/// Immutable value type. The hash is derived from the sorted coordinates, so two points
/// with equal coordinates always share it and it can key maps everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct DimensionSpacePoint {
    coordinates: BTreeMap<String, String>,
    hash: String,
}

impl DimensionSpacePoint {
    /// Create a point from `(dimension, value)` pairs
    pub fn new<K, V>(coordinates: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::from_coordinates(
            coordinates
                .into_iter()
                .map(|(dimension, value)| (dimension.into(), value.into()))
                .collect(),
        )
    }

    /// The point of a repository without dimensions
    pub fn empty() -> Self {
        Self::from_coordinates(BTreeMap::new())
    }

    /// Parse a point from its JSON object form
    pub fn from_json_str(json: &str) -> Result<Self, DimensionSpaceError> {
        let coordinates: BTreeMap<String, String> = serde_json::from_str(json)
            .map_err(|e| DimensionSpaceError::MalformedDimensionSpacePoint(e.to_string()))?;
        Ok(Self::from_coordinates(coordinates))
    }

    fn from_coordinates(coordinates: BTreeMap<String, String>) -> Self {
        let mut hasher = blake3::Hasher::new();
        for (dimension, value) in &coordinates {
            hasher.update(&(dimension.len() as u64).to_le_bytes());
            hasher.update(dimension.as_bytes());
            hasher.update(&(value.len() as u64).to_le_bytes());
            hasher.update(value.as_bytes());
        }
        Self {
            coordinates,
            hash: hasher.finalize().to_hex().to_string(),
        }
    }

    /// Coordinates sorted by dimension identifier
    pub fn coordinates(&self) -> &BTreeMap<String, String> {
        &self.coordinates
    }

    /// The value chosen for a dimension
    pub fn coordinate(&self, dimension: &str) -> Option<&str> {
        self.coordinates.get(dimension).map(String::as_str)
    }

    /// Stable content hash
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Number of coordinates
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    /// Whether the point has no coordinates
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// A copy of this point with one coordinate replaced
    pub fn vary(&self, dimension: impl Into<String>, value: impl Into<String>) -> Self {
        let mut coordinates = self.coordinates.clone();
        coordinates.insert(dimension.into(), value.into());
        Self::from_coordinates(coordinates)
    }

    /// JSON object form
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.coordinates
                .iter()
                .map(|(dimension, value)| (dimension.clone(), serde_json::Value::from(value.as_str())))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, String>> for DimensionSpacePoint {
    fn from(coordinates: BTreeMap<String, String>) -> Self {
        Self::from_coordinates(coordinates)
    }
}

impl From<DimensionSpacePoint> for BTreeMap<String, String> {
    fn from(point: DimensionSpacePoint) -> Self {
        point.coordinates
    }
}

impl fmt::Display for DimensionSpacePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

/// A set of dimension space points, indexed by hash
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "Vec<DimensionSpacePoint>",
    into = "Vec<DimensionSpacePoint>"
)]
pub struct DimensionSpacePointSet {
    points: IndexMap<String, DimensionSpacePoint>,
}

impl DimensionSpacePointSet {
    /// Create a set, dropping duplicates
    pub fn new(points: impl IntoIterator<Item = DimensionSpacePoint>) -> Self {
        points.into_iter().collect()
    }

    /// Whether the set contains the point
    pub fn contains(&self, point: &DimensionSpacePoint) -> bool {
        self.points.contains_key(point.hash())
    }

    /// Whether the set contains a point with the given hash
    pub fn contains_hash(&self, hash: &str) -> bool {
        self.points.contains_key(hash)
    }

    /// Look up a point by hash
    pub fn get(&self, hash: &str) -> Option<&DimensionSpacePoint> {
        self.points.get(hash)
    }

    /// Points indexed by hash
    pub fn points(&self) -> &IndexMap<String, DimensionSpacePoint> {
        &self.points
    }

    /// Iterate over the points in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &DimensionSpacePoint> {
        self.points.values()
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points contained in either set
    pub fn union(&self, other: &DimensionSpacePointSet) -> DimensionSpacePointSet {
        self.iter().chain(other.iter()).cloned().collect()
    }

    /// Points contained in both sets
    pub fn intersect(&self, other: &DimensionSpacePointSet) -> DimensionSpacePointSet {
        self.iter()
            .filter(|point| other.contains(point))
            .cloned()
            .collect()
    }

    pub(crate) fn insert(&mut self, point: DimensionSpacePoint) {
        self.points.insert(point.hash().to_string(), point);
    }
}

impl FromIterator<DimensionSpacePoint> for DimensionSpacePointSet {
    fn from_iter<I: IntoIterator<Item = DimensionSpacePoint>>(iter: I) -> Self {
        let mut set = Self::default();
        for point in iter {
            set.insert(point);
        }
        set
    }
}

impl<'a> IntoIterator for &'a DimensionSpacePointSet {
    type Item = &'a DimensionSpacePoint;
    type IntoIter = indexmap::map::Values<'a, String, DimensionSpacePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.values()
    }
}

impl From<Vec<DimensionSpacePoint>> for DimensionSpacePointSet {
    fn from(points: Vec<DimensionSpacePoint>) -> Self {
        points.into_iter().collect()
    }
}

impl From<DimensionSpacePointSet> for Vec<DimensionSpacePoint> {
    fn from(set: DimensionSpacePointSet) -> Self {
        set.points.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_independent_of_coordinate_order() {
        let left = DimensionSpacePoint::new([("language", "en"), ("market", "US")]);
        let right = DimensionSpacePoint::new([("market", "US"), ("language", "en")]);

        assert_eq!(left, right);
        assert_eq!(left.hash(), right.hash());
        assert_ne!(
            left.hash(),
            DimensionSpacePoint::new([("language", "en"), ("market", "GB")]).hash()
        );
    }

    #[test]
    fn hash_does_not_confuse_boundaries() {
        let left = DimensionSpacePoint::new([("ab", "c")]);
        let right = DimensionSpacePoint::new([("a", "bc")]);
        assert_ne!(left.hash(), right.hash());
    }

    #[test]
    fn vary_replaces_a_single_coordinate() {
        let point = DimensionSpacePoint::new([("language", "en"), ("market", "US")]);
        let varied = point.vary("language", "de");

        assert_eq!(varied.coordinate("language"), Some("de"));
        assert_eq!(varied.coordinate("market"), Some("US"));
        assert_eq!(point.coordinate("language"), Some("en"));
    }

    #[test]
    fn json_form_round_trips_with_hash() {
        let point = DimensionSpacePoint::from_json_str(r#"{"language":"en"}"#).unwrap();
        assert_eq!(point.to_string(), r#"{"language":"en"}"#);

        let decoded: DimensionSpacePoint =
            serde_json::from_value(serde_json::to_value(&point).unwrap()).unwrap();
        assert_eq!(decoded.hash(), point.hash());
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            DimensionSpacePoint::from_json_str("[1, 2]"),
            Err(DimensionSpaceError::MalformedDimensionSpacePoint(_))
        ));
    }

    #[test]
    fn set_equality_ignores_order() {
        let en = DimensionSpacePoint::new([("language", "en")]);
        let de = DimensionSpacePoint::new([("language", "de")]);

        let left = DimensionSpacePointSet::new([en.clone(), de.clone()]);
        let right = DimensionSpacePointSet::new([de.clone(), en.clone(), en.clone()]);
        assert_eq!(left, right);
        assert_eq!(left.len(), 2);

        let only_en = DimensionSpacePointSet::new([en.clone()]);
        assert_eq!(left.intersect(&only_en), only_en);
        assert_eq!(only_en.union(&DimensionSpacePointSet::new([de])), left);
    }
}
