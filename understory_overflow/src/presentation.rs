// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural element descriptors for the rendering layer.
//!
//! ## Overview
//!
//! The sensors only work if the elements around them are shaped a certain
//! way: a column flex container, a bounded viewport that scrolls on its own,
//! and a content box that grows to its natural size. This module produces
//! [`ElementProps`] (attributes plus style) for each of those elements so a
//! toolkit can build them without re-deriving the rules.
//!
//! Consumer [`Presentation`] is layered in two different ways:
//!
//! - On the container it goes *over* the structural style, except that
//!   `display` stays `flex` unless the container is hidden (or the consumer
//!   asked for `display: none`).
//! - On the content box it goes *under* the structural style, which always wins.
//!
//! The viewport and tolerance inset take no consumer input.

use alloc::collections::BTreeMap;
use alloc::string::String;

use crate::tolerance::Tolerance;

/// An ordered set of CSS declarations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Style {
    decls: BTreeMap<String, String>,
}

impl Style {
    /// An empty style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, property: &str, value: impl Into<String>) -> Self {
        self.set(property, value);
        self
    }

    /// Set `property`, replacing any previous value.
    pub fn set(&mut self, property: &str, value: impl Into<String>) {
        self.decls.insert(property.into(), value.into());
    }

    /// Value of `property`, if declared.
    pub fn get(&self, property: &str) -> Option<&str> {
        self.decls.get(property).map(String::as_str)
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    /// True if nothing is declared.
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Declarations in property order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.decls.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `self` with every declaration of `over` applied on top.
    #[must_use]
    pub fn layered(&self, over: &Self) -> Self {
        let mut out = self.clone();
        for (k, v) in over.iter() {
            out.set(k, v);
        }
        out
    }

    /// Inline CSS text, e.g. `"display: flex; position: relative"`.
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                out.push_str("; ");
            }
            out.push_str(k);
            out.push_str(": ");
            out.push_str(v);
        }
        out
    }
}

/// Consumer pass-through presentation for an element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Presentation {
    /// Class list, emitted as the `class` attribute.
    pub class: Option<String>,
    /// Inline style.
    pub style: Style,
    /// Arbitrary native attributes.
    pub attributes: BTreeMap<String, String>,
}

impl Presentation {
    /// Builder: set the class list.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Builder: set one style declaration.
    #[must_use]
    pub fn with_style(mut self, property: &str, value: impl Into<String>) -> Self {
        self.style.set(property, value);
        self
    }

    /// Builder: set one attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

/// Final attributes and style for one element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementProps {
    /// Attributes, including `class` and the `data-overflow-*` marker.
    pub attributes: BTreeMap<String, String>,
    /// Inline style.
    pub style: Style,
}

impl ElementProps {
    fn marked(marker: &str) -> Self {
        let mut props = Self::default();
        props.attributes.insert(marker.into(), String::new());
        props
    }

    fn pass_through(&mut self, user: &Presentation) {
        for (k, v) in &user.attributes {
            self.attributes.insert(k.clone(), v.clone());
        }
        if let Some(class) = &user.class {
            self.attributes.insert("class".into(), class.clone());
        }
    }

    /// Value of attribute `name`, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Marker attribute on the outer container.
pub const WRAPPER_ATTR: &str = "data-overflow-wrapper";
/// Marker attribute on the scroll viewport.
pub const VIEWPORT_ATTR: &str = "data-overflow-viewport";
/// Marker attribute on the content box.
pub const CONTENT_ATTR: &str = "data-overflow-content";
/// Marker attribute on the tolerance inset.
pub const TOLERANCE_ATTR: &str = "data-overflow-tolerance";

fn container_style() -> Style {
    Style::new()
        .with("display", "flex")
        .with("flex-direction", "column")
        .with("position", "relative")
}

fn viewport_style() -> Style {
    Style::new()
        .with("position", "relative")
        .with("flex-basis", "100%")
        .with("flex-shrink", "1")
        .with("flex-grow", "0")
        .with("overflow", "auto")
}

fn content_style() -> Style {
    Style::new()
        .with("display", "inline-block")
        .with("position", "relative")
}

/// Props for the outer container.
///
/// `hidden` removes the container from layout without unmounting anything.
pub fn container(user: &Presentation, hidden: bool) -> ElementProps {
    let mut props = ElementProps::marked(WRAPPER_ATTR);
    props.pass_through(user);
    if hidden {
        props.attributes.insert("hidden".into(), String::new());
    }
    let display = if hidden || user.style.get("display") == Some("none") {
        "none"
    } else {
        "flex"
    };
    props.style = container_style().layered(&user.style).with("display", display);
    props
}

/// Props for the scroll viewport, which is the sensors' root.
pub fn viewport() -> ElementProps {
    let mut props = ElementProps::marked(VIEWPORT_ATTR);
    props.style = viewport_style();
    props
}

/// Props for the content box.
pub fn content(user: &Presentation) -> ElementProps {
    let mut props = ElementProps::marked(CONTENT_ATTR);
    props.pass_through(user);
    props.style = user.style.layered(&content_style());
    props
}

/// Props for the tolerance inset, or `None` when `tolerance` is zero.
///
/// The inset is a transparent, non-interactive box behind the content,
/// offset by the tolerance from each edge of the content box.
pub fn tolerance_inset(tolerance: &Tolerance) -> Option<ElementProps> {
    if tolerance.is_zero() {
        return None;
    }
    let offset = tolerance.to_css();
    let mut props = ElementProps::marked(TOLERANCE_ATTR);
    props.style = Style::new()
        .with("position", "absolute")
        .with("top", offset.clone())
        .with("left", offset.clone())
        .with("right", offset.clone())
        .with("bottom", offset)
        .with("background", "transparent")
        .with("pointer-events", "none")
        .with("z-index", "-1");
    Some(props)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tolerance::LengthUnit;

    #[test]
    fn container_layers_user_style_over_structure() {
        let user = Presentation::default()
            .with_style("max-height", "500px")
            .with_style("position", "absolute")
            .with_class("shadowed")
            .with_attribute("id", "list");
        let props = container(&user, false);
        assert_eq!(props.style.get("max-height"), Some("500px"));
        assert_eq!(props.style.get("position"), Some("absolute"));
        assert_eq!(props.style.get("flex-direction"), Some("column"));
        assert_eq!(props.style.get("display"), Some("flex"));
        assert_eq!(props.attribute(WRAPPER_ATTR), Some(""));
        assert_eq!(props.attribute("class"), Some("shadowed"));
        assert_eq!(props.attribute("id"), Some("list"));
        assert_eq!(props.attribute("hidden"), None);
    }

    #[test]
    fn display_stays_flex_unless_hidden() {
        let grid = Presentation::default().with_style("display", "grid");
        assert_eq!(container(&grid, false).style.get("display"), Some("flex"));

        let none = Presentation::default().with_style("display", "none");
        assert_eq!(container(&none, false).style.get("display"), Some("none"));

        let hidden = container(&Presentation::default(), true);
        assert_eq!(hidden.style.get("display"), Some("none"));
        assert_eq!(hidden.attribute("hidden"), Some(""));
    }

    #[test]
    fn content_structure_wins() {
        let user = Presentation::default()
            .with_style("display", "block")
            .with_style("padding", "8px");
        let props = content(&user);
        assert_eq!(props.style.get("display"), Some("inline-block"));
        assert_eq!(props.style.get("position"), Some("relative"));
        assert_eq!(props.style.get("padding"), Some("8px"));
        assert_eq!(props.attribute(CONTENT_ATTR), Some(""));
    }

    #[test]
    fn viewport_scrolls_independently() {
        let props = viewport();
        assert_eq!(props.style.get("overflow"), Some("auto"));
        assert_eq!(props.style.get("flex-basis"), Some("100%"));
        assert_eq!(props.attribute(VIEWPORT_ATTR), Some(""));
    }

    #[test]
    fn tolerance_inset_only_when_nonzero() {
        assert_eq!(tolerance_inset(&Tolerance::ZERO), None);
        let props = tolerance_inset(&Tolerance::new(1.0, LengthUnit::Em)).unwrap();
        for side in ["top", "left", "right", "bottom"] {
            assert_eq!(props.style.get(side), Some("1em"), "{side}");
        }
        assert_eq!(props.style.get("pointer-events"), Some("none"));
        assert_eq!(props.style.get("z-index"), Some("-1"));
    }

    #[test]
    fn css_text_is_sorted() {
        let s = Style::new().with("z-index", "1").with("color", "red");
        assert_eq!(s.to_css(), "color: red; z-index: 1");
        assert_eq!(s.len(), 2);
    }
}
