//! Named, reusable style bundles with single inheritance.

use std::sync::Arc;

use crate::error::StyleResult;
use crate::normalize::PropertyNormalizer;
use crate::value::{StyleMap, StyleValue};

/// A reusable style snapshot, optionally derived from a parent class.
///
/// Classes are immutable and shared by reference between widgets:
///
/// ```
/// use vss::{StyleClass, style};
///
/// let primary = StyleClass::builder("Primary")
///     .extend(style! { "bg" => "#0078d4", "radius" => 4, "padding" => (12, 6) })
///     .build();
/// let secondary = StyleClass::builder("Secondary")
///     .parent(&primary)
///     .set("bg", "#6c757d")
///     .build();
///
/// assert_eq!(secondary.chain().len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct StyleClass {
    name: String,
    style: StyleMap,
    parent: Option<Arc<StyleClass>>,
}

impl StyleClass {
    pub fn new(name: impl Into<String>, style: StyleMap) -> Self {
        Self {
            name: name.into(),
            style,
            parent: None,
        }
    }

    pub fn builder(name: impl Into<String>) -> StyleClassBuilder {
        StyleClassBuilder {
            name: name.into(),
            style: StyleMap::new(),
            parent: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The properties declared on this class only.
    pub fn style(&self) -> &StyleMap {
        &self.style
    }

    pub fn parent(&self) -> Option<&Arc<StyleClass>> {
        self.parent.as_ref()
    }

    /// The inheritance chain, root ancestor first and `self` last.
    pub fn chain(&self) -> Vec<&StyleClass> {
        let mut chain = vec![self];
        let mut current = self.parent.as_deref();
        while let Some(class) = current {
            chain.push(class);
            current = class.parent.as_deref();
        }
        chain.reverse();
        chain
    }

    /// The effective normalized style: every level of the chain, parent before
    /// child.
    pub fn flatten(&self) -> StyleResult<StyleMap> {
        let normalizer = PropertyNormalizer::new();
        let mut flat = StyleMap::new();
        for class in self.chain() {
            flat.deep_merge(normalizer.normalize(class.style())?);
        }
        Ok(flat)
    }
}

/// Builder for [`StyleClass`].
#[derive(Debug)]
pub struct StyleClassBuilder {
    name: String,
    style: StyleMap,
    parent: Option<Arc<StyleClass>>,
}

impl StyleClassBuilder {
    pub fn parent(mut self, parent: &Arc<StyleClass>) -> Self {
        self.parent = Some(Arc::clone(parent));
        self
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.style.insert(key, value);
        self
    }

    pub fn extend(mut self, style: StyleMap) -> Self {
        self.style.extend(style);
        self
    }

    pub fn build(self) -> Arc<StyleClass> {
        Arc::new(StyleClass {
            name: self.name,
            style: self.style,
            parent: self.parent,
        })
    }
}
