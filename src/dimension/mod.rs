// Copyright 2025 Cowboy AI, LLC.

//! Content dimensions
//!
//! A content dimension is one configured axis of variation (language, market, audience).
//! Its values form a specialization forest: `en_US` specializes `en`, and every value
//! knows its specialization depth, i.e. its distance from the most general value.
//!
//! ```mermaid
//! graph TD
//!     en[en, depth 0] --> en_US[en_US, depth 1]
//!     en --> en_GB[en_GB, depth 1]
//!     de[de, depth 0]
//! ```

mod content_dimension;
mod errors;
mod source;
mod value;

pub use content_dimension::ContentDimension;
pub use errors::DimensionError;
#[cfg(test)]
pub use source::MockContentDimensionSource;
pub use source::{
    ConfigurationBasedContentDimensionSource, ContentDimensionSource, DimensionConfiguration,
    DimensionValueConfiguration, DimensionsConfiguration, WILDCARD_CONSTRAINT_KEY,
};
pub use value::{
    ContentDimensionConstraintSet, ContentDimensionConstraints, ContentDimensionId,
    ContentDimensionValue, ContentDimensionValueSpecializationDepth,
    ContentDimensionValueVariationEdge,
};
