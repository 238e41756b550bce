// Copyright 2025 Cowboy AI, LLC.

//! Integration tests for the inter-dimensional variation graph
//!
//! Fixture: two dimensions of identical shape
//!
//! ```mermaid
//! graph TD
//!     V1[value1] --> V11[value1.1]
//!     V11 --> V111[value1.1.1]
//!     V1 --> V12[value1.2]
//! ```

use cim_content_repository::dimension::{
    ContentDimensionId, ContentDimensionValueSpecializationDepth,
};
use cim_content_repository::dimension_space::build_weighted_points;
use cim_content_repository::{
    ConfigurationBasedContentDimensionSource, ContentDimensionSource,
    ContentDimensionZookeeper, ContentSubgraphVariationWeight, DimensionSpaceError,
    DimensionSpacePoint, DimensionSpacePointSet, InterDimensionalVariationGraph, VariantType,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use test_case::test_case;

const TWO_DIMENSIONS: &str = r#"{
    "dimensionA": {
        "values": {
            "value1": {
                "specializations": {
                    "value1.1": { "specializations": { "value1.1.1": {} } },
                    "value1.2": {}
                }
            }
        }
    },
    "dimensionB": {
        "values": {
            "value1": {
                "specializations": {
                    "value1.1": { "specializations": { "value1.1.1": {} } },
                    "value1.2": {}
                }
            }
        }
    }
}"#;

const VALUES: [&str; 4] = ["value1", "value1.1", "value1.1.1", "value1.2"];

fn source() -> ConfigurationBasedContentDimensionSource {
    ConfigurationBasedContentDimensionSource::from_json_str(TWO_DIMENSIONS).unwrap()
}

fn graph() -> InterDimensionalVariationGraph {
    InterDimensionalVariationGraph::from_source(&source()).unwrap()
}

fn point(a: &str, b: &str) -> DimensionSpacePoint {
    DimensionSpacePoint::new([("dimensionA", a), ("dimensionB", b)])
}

fn all_points() -> Vec<DimensionSpacePoint> {
    VALUES
        .iter()
        .flat_map(|a| VALUES.iter().map(move |b| point(a, b)))
        .collect()
}

#[test]
fn allowed_subspace_is_the_full_product() {
    let zookeeper = ContentDimensionZookeeper::new(&source());
    assert_eq!(zookeeper.allowed_dimension_subspace().len(), 16);

    let graph = graph();
    assert_eq!(graph.get_dimension_space_points().len(), 16);
    assert_eq!(graph.weight_normalization_base(), 3);
    for point in all_points() {
        assert!(graph.contains(&point), "missing {point}");
    }
}

#[test]
fn specialization_set_of_the_root_is_everything() {
    let graph = graph();
    let root = point("value1", "value1");

    let set = graph.get_specialization_set(&root, true, None).unwrap();
    assert_eq!(set, DimensionSpacePointSet::new(all_points()));

    let without_origin = graph.get_specialization_set(&root, false, None).unwrap();
    assert_eq!(without_origin.len(), 15);
    assert!(!without_origin.contains(&root));
}

#[test]
fn specialization_set_of_an_inner_point() {
    let graph = graph();
    let origin = point("value1.1", "value1.1");

    let set = graph.get_specialization_set(&origin, true, None).unwrap();
    assert_eq!(
        set,
        DimensionSpacePointSet::new([
            point("value1.1", "value1.1"),
            point("value1.1", "value1.1.1"),
            point("value1.1.1", "value1.1"),
            point("value1.1.1", "value1.1.1"),
        ])
    );
}

#[test]
fn specialization_set_of_a_leaf() {
    let graph = graph();
    let leaf = point("value1.1.1", "value1.1.1");

    assert!(graph
        .get_specialization_set(&leaf, false, None)
        .unwrap()
        .is_empty());
    assert_eq!(
        graph.get_specialization_set(&leaf, true, None).unwrap(),
        DimensionSpacePointSet::new([leaf.clone()])
    );
}

#[test]
fn specialization_set_leaves_out_excluded_points() {
    let graph = graph();
    let origin = point("value1.1", "value1.1");
    let excluded = DimensionSpacePointSet::new([
        point("value1.1.1", "value1.1"),
        point("value1.1.1", "value1.1.1"),
    ]);

    let set = graph
        .get_specialization_set(&origin, true, Some(&excluded))
        .unwrap();
    assert_eq!(
        set,
        DimensionSpacePointSet::new([
            point("value1.1", "value1.1"),
            point("value1.1", "value1.1.1"),
        ])
    );
}

#[test]
fn weighted_specializations_of_the_root() {
    let graph = graph();
    let weighted = graph
        .get_weighted_specializations(&point("value1", "value1"))
        .unwrap();

    let expected: [(u64, Vec<DimensionSpacePoint>); 8] = [
        (1, vec![point("value1", "value1.1"), point("value1", "value1.2")]),
        (2, vec![point("value1", "value1.1.1")]),
        (3, vec![point("value1.1", "value1"), point("value1.2", "value1")]),
        (4, vec![
            point("value1.1", "value1.1"),
            point("value1.1", "value1.2"),
            point("value1.2", "value1.1"),
            point("value1.2", "value1.2"),
        ]),
        (5, vec![point("value1.1", "value1.1.1"), point("value1.2", "value1.1.1")]),
        (6, vec![point("value1.1.1", "value1")]),
        (7, vec![point("value1.1.1", "value1.1"), point("value1.1.1", "value1.2")]),
        (8, vec![point("value1.1.1", "value1.1.1")]),
    ];
    assert_eq!(weighted.len(), expected.len());
    for (weight, points) in expected {
        assert_eq!(
            weighted.get(&weight),
            Some(&DimensionSpacePointSet::new(points)),
            "weight {weight}"
        );
    }
}

#[test]
fn weighted_generalizations_of_an_inner_point() {
    let graph = graph();
    let weighted = graph
        .get_weighted_generalizations(&point("value1.1", "value1.1.1"))
        .unwrap();

    let expected: Vec<(u64, DimensionSpacePoint)> = vec![
        (1, point("value1.1", "value1.1")),
        (2, point("value1.1", "value1")),
        (3, point("value1", "value1.1.1")),
        (4, point("value1", "value1.1")),
        (5, point("value1", "value1")),
    ];
    assert_eq!(weighted.into_iter().collect::<Vec<_>>(), expected);
}

#[test_case("value1", "value1", None; "root has none")]
#[test_case("value1.1", "value1", Some(("value1", "value1")); "single step in a")]
#[test_case("value1", "value1.1.1", Some(("value1", "value1.1")); "single step in b")]
#[test_case("value1.1", "value1.1", Some(("value1.1", "value1")); "lower priority dimension first")]
#[test_case("value1.1.1", "value1.2", Some(("value1.1.1", "value1")); "peer branch in b")]
fn primary_generalization(a: &str, b: &str, expected: Option<(&str, &str)>) {
    let graph = graph();
    let primary = graph.get_primary_generalization(&point(a, b)).unwrap();
    assert_eq!(primary, expected.map(|(a, b)| point(a, b)));
}

#[test_case(("value1.1", "value1"), ("value1", "value1"), VariantType::Specialization; "specialization")]
#[test_case(("value1", "value1"), ("value1.1", "value1"), VariantType::Generalization; "generalization")]
#[test_case(("value1.2", "value1"), ("value1.1", "value1"), VariantType::Peer; "sibling values")]
#[test_case(("value1.1", "value1"), ("value1", "value1.1"), VariantType::Peer; "crossed depths")]
#[test_case(("value1.2", "value1.2"), ("value1.2", "value1.2"), VariantType::Same; "same")]
fn variant_types(subject: (&str, &str), object: (&str, &str), expected: VariantType) {
    let graph = graph();
    assert_eq!(
        graph
            .get_variant_type(&point(subject.0, subject.1), &point(object.0, object.1))
            .unwrap(),
        expected
    );
}

#[test]
fn root_generalizations() {
    let graph = graph();
    assert_eq!(
        graph.get_root_generalizations(),
        DimensionSpacePointSet::new([point("value1", "value1")])
    );
}

#[test]
fn points_outside_the_subspace_are_rejected() {
    let graph = graph();
    let outside = point("value2", "value1");

    let err = graph.get_primary_generalization(&outside).unwrap_err();
    assert!(matches!(err, DimensionSpaceError::DimensionSpacePointNotFound { .. }));
    assert!(graph
        .get_variant_type(&outside, &point("value1", "value1"))
        .is_err());
    assert!(graph.get_specialization_set(&outside, true, None).is_err());
    assert!(graph.get_weighted_generalizations(&outside).is_err());
}

#[test]
fn without_dimensions_there_is_exactly_the_empty_point() {
    let source = ConfigurationBasedContentDimensionSource::from_json_str("{}").unwrap();
    let graph = InterDimensionalVariationGraph::from_source(&source).unwrap();
    let empty = DimensionSpacePoint::empty();

    assert_eq!(
        graph.get_dimension_space_points(),
        &DimensionSpacePointSet::new([empty.clone()])
    );
    assert_eq!(graph.get_variant_type(&empty, &empty).unwrap(), VariantType::Same);
    assert_eq!(graph.get_primary_generalization(&empty).unwrap(), None);
    assert_eq!(
        graph.get_specialization_set(&empty, true, None).unwrap(),
        DimensionSpacePointSet::new([empty])
    );
}

#[test]
fn constraints_restrict_the_subspace() {
    let source = ConfigurationBasedContentDimensionSource::from_json_str(
        r#"{
            "market": {
                "values": {
                    "world": {
                        "specializations": {
                            "ch": {
                                "constraints": {
                                    "language": { "*": false, "de": true, "fr": true }
                                }
                            },
                            "lu": {}
                        }
                    }
                }
            },
            "language": {
                "values": {
                    "en": { "specializations": { "de": {}, "fr": {} } }
                }
            }
        }"#,
    )
    .unwrap();
    let graph = InterDimensionalVariationGraph::from_source(&source).unwrap();

    let market_language = |market: &str, language: &str| {
        DimensionSpacePoint::new([("market", market), ("language", language)])
    };
    assert_eq!(graph.get_dimension_space_points().len(), 8);
    assert!(!graph.contains(&market_language("ch", "en")));
    assert!(graph.contains(&market_language("ch", "de")));
    assert_eq!(
        graph
            .get_primary_generalization(&market_language("ch", "de"))
            .unwrap(),
        Some(market_language("world", "de"))
    );
    assert_eq!(
        graph
            .get_specialization_set(&market_language("world", "en"), false, None)
            .unwrap()
            .len(),
        7
    );
}

#[test]
fn weighted_points_carry_depths_in_priority_order() {
    let source = source();
    let dimensions = source.get_content_dimensions_ordered_by_priority();
    let subspace = ContentDimensionZookeeper::from_dimensions(&dimensions)
        .allowed_dimension_subspace()
        .clone();

    let weighted = build_weighted_points(&subspace, &dimensions).unwrap();
    let target = point("value1.1.1", "value1.2");
    let weighted_point = weighted.get(target.hash()).unwrap();

    let a = ContentDimensionId::new("dimensionA").unwrap();
    let b = ContentDimensionId::new("dimensionB").unwrap();
    assert_eq!(
        weighted_point.weight(),
        &ContentSubgraphVariationWeight::new([
            (a, ContentDimensionValueSpecializationDepth(2)),
            (b, ContentDimensionValueSpecializationDepth(1)),
        ])
    );
    assert_eq!(weighted_point.weight().normalize(3), 7);
}

fn weight_strategy() -> impl Strategy<Value = (Vec<u32>, Vec<u32>)> {
    (1usize..5).prop_flat_map(|len| {
        (
            proptest::collection::vec(0u32..9, len),
            proptest::collection::vec(0u32..9, len),
        )
    })
}

fn weight(depths: &[u32]) -> ContentSubgraphVariationWeight {
    ContentSubgraphVariationWeight::new(depths.iter().enumerate().map(|(i, depth)| {
        (
            ContentDimensionId::new(format!("d{i}")).unwrap(),
            ContentDimensionValueSpecializationDepth(*depth),
        )
    }))
}

proptest! {
    #[test]
    fn normalize_is_monotonic_in_priority_order((left, right) in weight_strategy()) {
        let base = 10;
        let (l, r) = (weight(&left), weight(&right));
        prop_assert_eq!(left.cmp(&right), l.normalize(base).cmp(&r.normalize(base)));
    }

    #[test]
    fn decrease_by_inverts_addition((left, right) in weight_strategy()) {
        let sum: Vec<u32> = left.iter().zip(&right).map(|(l, r)| l + r).collect();
        let decreased = weight(&sum).decrease_by(&weight(&right)).unwrap();
        prop_assert_eq!(decreased, weight(&left));
    }

    #[test]
    fn variant_types_are_symmetric(subject in 0usize..16, object in 0usize..16) {
        let graph = graph();
        let points = all_points();
        let (p, q) = (&points[subject], &points[object]);
        let forward = graph.get_variant_type(p, q).unwrap();
        let backward = graph.get_variant_type(q, p).unwrap();
        let expected = match forward {
            VariantType::Same => VariantType::Same,
            VariantType::Specialization => VariantType::Generalization,
            VariantType::Generalization => VariantType::Specialization,
            VariantType::Peer => VariantType::Peer,
        };
        prop_assert_eq!(backward, expected);
        if forward == VariantType::Specialization {
            prop_assert!(graph.get_indexed_specializations(q).unwrap().contains(p));
            prop_assert!(graph.get_indexed_generalizations(p).unwrap().contains(q));
        }
    }

    #[test]
    fn primary_generalization_has_minimal_weight(index in 0usize..16) {
        let graph = graph();
        let point = &all_points()[index];
        let weighted = graph.get_weighted_generalizations(point).unwrap();
        match graph.get_primary_generalization(point).unwrap() {
            None => prop_assert!(weighted.is_empty()),
            Some(primary) => {
                let (_, nearest) = weighted.iter().next().unwrap();
                prop_assert_eq!(&primary, nearest);
                prop_assert_eq!(
                    graph.get_variant_type(point, &primary).unwrap(),
                    VariantType::Specialization
                );
            }
        }
    }
}
