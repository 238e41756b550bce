// Copyright 2025 Cowboy AI, LLC.

//! Loading a repository from a configuration file

use cim_content_repository::{
    ContentRepository, ContentRepositoryConfig, DimensionSpacePoint, VariantType,
};
use pretty_assertions::assert_eq;
use std::fs;

const SITE_CONFIG: &str = r#"{
    "contentDimensions": {
        "language": {
            "label": "Language",
            "values": {
                "mul": {
                    "label": "Multilingual",
                    "specializations": {
                        "de": { "specializations": { "gsw": {} } },
                        "en": {}
                    }
                }
            }
        },
        "audience": {
            "values": {
                "all": { "specializations": { "members": {} } }
            }
        }
    },
    "workspaceTableName": "cr_site_p_workspace",
    "workspaceCacheCapacity": 32
}"#;

#[test]
fn repository_from_config_file() {
    let path = std::env::temp_dir().join(format!(
        "content-repository-{}.json",
        uuid::Uuid::new_v4()
    ));
    fs::write(&path, SITE_CONFIG).unwrap();
    let config = ContentRepositoryConfig::from_path(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(config.workspace_table_name, "cr_site_p_workspace");
    assert_eq!(config.workspace_cache_capacity, 32);

    let repository = ContentRepository::in_memory(&config).unwrap();
    let graph = repository.variation_graph();
    assert_eq!(graph.get_dimension_space_points().len(), 8);
    assert_eq!(graph.weight_normalization_base(), 3);

    let point = |language: &str, audience: &str| {
        DimensionSpacePoint::new([("language", language), ("audience", audience)])
    };
    assert_eq!(
        graph
            .get_primary_generalization(&point("gsw", "members"))
            .unwrap(),
        Some(point("gsw", "all"))
    );
    assert_eq!(
        graph
            .get_variant_type(&point("en", "all"), &point("de", "members"))
            .unwrap(),
        VariantType::Peer
    );

    let language = graph.dimensions()[0].clone();
    assert_eq!(language.id().as_str(), "language");
    assert_eq!(
        language.get_configuration_value("label"),
        Some(&serde_json::json!("Language"))
    );
}

#[test]
fn malformed_dimensions_prevent_startup() {
    let config = ContentRepositoryConfig::from_json_str(
        r#"{"contentDimensions": {"language": {"values": {"mul": {"specializations": "de"}}}}}"#,
    );
    assert!(config.is_err());
}
