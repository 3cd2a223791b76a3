//! Skeleton document loading.
//!
//! The skeleton is a valid, placeholder-filled UBL-TR invoice shipped with
//! the crate as a versioned asset — changes to it are schema changes. A
//! template never caches its parsed tree: every invoice gets an
//! independently mutable copy, so no state can leak across renders.

use std::borrow::Cow;
use std::path::Path;

use super::dom::Element;
use crate::core::EfaturaError;

/// The packaged skeleton document.
const PACKAGED_SKELETON: &str = include_str!("skeleton.xml");

/// An invoice skeleton: the raw XML source a render instantiates from.
#[derive(Debug, Clone)]
pub struct Template {
    source: Cow<'static, str>,
}

impl Template {
    /// The skeleton shipped with the crate.
    pub fn packaged() -> Self {
        Self {
            source: Cow::Borrowed(PACKAGED_SKELETON),
        }
    }

    /// Load a replacement skeleton from disk.
    pub fn from_path(path: &Path) -> Result<Self, EfaturaError> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            EfaturaError::Configuration(format!(
                "invoice template '{}' could not be read: {e}",
                path.display()
            ))
        })?;
        Ok(Self {
            source: Cow::Owned(source),
        })
    }

    /// Use an in-memory skeleton source.
    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: Cow::Owned(source.into()),
        }
    }

    /// Parse a fresh, independently mutable tree.
    ///
    /// Called once per invoice; the result is never shared or reused.
    pub fn instantiate(&self) -> Result<Element, EfaturaError> {
        Element::parse(&self.source).map_err(|e| {
            EfaturaError::Configuration(format!("invoice template is not valid XML: {e}"))
        })
    }
}
