// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tolerance: treating "almost at the edge" as "at the edge".
//!
//! ## Overview
//!
//! With a tolerance of `T`, the sensors do not watch the content box itself
//! but a box inset by `T` from each of its four edges. Scrolling to within
//! `T` of an edge then moves that inset edge inside the viewport, so the
//! corresponding direction reports `false` although up to `T` units of real
//! overflow remain. This is useful when content carries generous padding.
//!
//! ## Lengths
//!
//! A tolerance is a non-negative number of pixels or a length string:
//! `"12px"`, `"1em"` (content font size), `"0.5rem"` (root font size) or
//! `"5%"` (of the content box width for left/right, height for top/bottom).
//! A bare number string is read as pixels, and exponents such as `1e1px` are
//! accepted.
//!
//! Parsing with [`str::parse`] is strict and reports a [`ToleranceError`].
//! [`Tolerance::parse_lenient`] logs the problem and falls back to zero, which
//! is what every engine entry point does with malformed input.
//!
//! ```
//! use understory_overflow::tolerance::{LengthUnit, Tolerance};
//!
//! let t: Tolerance = "1.5em".parse().unwrap();
//! assert_eq!(t.unit(), LengthUnit::Em);
//! assert!(!t.is_zero());
//!
//! assert!("wide".parse::<Tolerance>().is_err());
//! assert!(Tolerance::parse_lenient("wide").is_zero());
//! ```

use core::fmt;
use core::str::FromStr;

use alloc::string::{String, ToString};
use kurbo::{Insets, Rect, Size};

use crate::host::{ElementId, Host};

/// Unit of a [`Tolerance`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum LengthUnit {
    /// CSS pixels.
    #[default]
    Px,
    /// Multiples of the content element's font size.
    Em,
    /// Multiples of the root font size.
    Rem,
    /// Percentage of the content box along the inset's axis.
    Percent,
}

impl LengthUnit {
    /// CSS suffix for this unit.
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::Em => "em",
            Self::Rem => "rem",
            Self::Percent => "%",
        }
    }

    fn from_suffix(s: &str) -> Option<Self> {
        [Self::Px, Self::Em, Self::Rem, Self::Percent]
            .into_iter()
            .find(|u| s.eq_ignore_ascii_case(u.suffix()))
    }
}

/// Errors from parsing a tolerance string.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ToleranceError {
    /// The input was empty or whitespace.
    #[error("tolerance is empty")]
    Empty,
    /// The input did not start with a number.
    #[error("tolerance `{0}` does not start with a number")]
    MissingNumber(String),
    /// The number was followed by something other than a known unit.
    #[error("unknown length unit `{0}`")]
    UnknownUnit(String),
    /// The value was below zero.
    #[error("tolerance must not be negative")]
    Negative,
    /// The number overflowed to infinity.
    #[error("tolerance must be finite")]
    NonFinite,
}

/// Inset distance within which remaining scroll is treated as zero.
///
/// The default is zero, meaning the content box itself is watched.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Tolerance {
    value: f64,
    unit: LengthUnit,
}

/// Measurements a [`Tolerance`] resolves against.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ResolveBasis {
    /// Font size of the content element, for `em`.
    pub font_size: f64,
    /// Font size of the document root, for `rem`.
    pub root_font_size: f64,
    /// Size of the content box, for `%`.
    pub box_size: Size,
}

impl Tolerance {
    /// No tolerance.
    pub const ZERO: Self = Self {
        value: 0.0,
        unit: LengthUnit::Px,
    };

    /// A pixel tolerance. Negative or non-finite values become zero.
    pub fn px(value: f64) -> Self {
        Self::new(value, LengthUnit::Px)
    }

    /// A tolerance in `unit`. Negative or non-finite values become zero.
    pub fn new(value: f64, unit: LengthUnit) -> Self {
        if !value.is_finite() || value < 0.0 {
            log::warn!("ignoring tolerance {value}{}; using 0", unit.suffix());
            return Self::ZERO;
        }
        Self { value, unit }
    }

    /// Parse `s`, logging and falling back to zero when it is malformed.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_else(|err| {
            log::warn!("ignoring malformed tolerance {s:?}: {err}");
            Self::ZERO
        })
    }

    /// Numeric part.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Unit part.
    pub fn unit(&self) -> LengthUnit {
        self.unit
    }

    /// True if no inset boundary is needed.
    pub fn is_zero(&self) -> bool {
        self.value == 0.0
    }

    /// Resolve to pixel insets for a box described by `basis`.
    pub fn resolve(&self, basis: &ResolveBasis) -> Insets {
        let (x, y) = match self.unit {
            LengthUnit::Px => (self.value, self.value),
            LengthUnit::Em => {
                let v = self.value * basis.font_size;
                (v, v)
            }
            LengthUnit::Rem => {
                let v = self.value * basis.root_font_size;
                (v, v)
            }
            LengthUnit::Percent => (
                basis.box_size.width * self.value / 100.0,
                basis.box_size.height * self.value / 100.0,
            ),
        };
        Insets::uniform_xy(x, y)
    }

    /// CSS text for the inset offsets, e.g. `"10px"`.
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Tolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

impl From<f64> for Tolerance {
    fn from(value: f64) -> Self {
        Self::px(value)
    }
}

impl From<u32> for Tolerance {
    fn from(value: u32) -> Self {
        Self::px(f64::from(value))
    }
}

impl FromStr for Tolerance {
    type Err = ToleranceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ToleranceError::Empty);
        }
        let (number, suffix) = s.split_at(number_len(s));
        let value: f64 = number
            .parse()
            .map_err(|_| ToleranceError::MissingNumber(s.into()))?;
        let suffix = suffix.trim();
        let unit = if suffix.is_empty() {
            LengthUnit::Px
        } else {
            LengthUnit::from_suffix(suffix)
                .ok_or_else(|| ToleranceError::UnknownUnit(suffix.into()))?
        };
        if !value.is_finite() {
            return Err(ToleranceError::NonFinite);
        }
        if value < 0.0 {
            return Err(ToleranceError::Negative);
        }
        Ok(Self { value, unit })
    }
}

/// Length of the leading CSS number in `s`, including an exponent.
///
/// An `e` only starts an exponent when digits follow, so `1em` stays `1` + `em`.
fn number_len(s: &str) -> usize {
    let b = s.as_bytes();
    let digits_from = |mut i: usize| {
        while b.get(i).is_some_and(|c| c.is_ascii_digit() || *c == b'.') {
            i += 1;
        }
        i
    };
    let mut end = digits_from(usize::from(matches!(b.first(), Some(b'+' | b'-'))));
    if matches!(b.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(b.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        if b.get(exp).is_some_and(u8::is_ascii_digit) {
            end = digits_from(exp);
        }
    }
    end
}

/// The rectangle the sensors actually observe.
///
/// Identity matters: switching between the two variants (tolerance turned
/// on or off) makes the sensors detach and re-attach. Changing a non-zero
/// tolerance to another non-zero value keeps the identity; the new inset is
/// simply picked up on the next layout pass.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum WatchBoundary {
    /// The content box itself.
    Content(ElementId),
    /// The content box shrunk by the tolerance on every side.
    ToleranceInset(ElementId),
}

impl WatchBoundary {
    /// Pick the boundary for `content` under `tolerance`.
    pub fn for_content(content: ElementId, tolerance: &Tolerance) -> Self {
        if tolerance.is_zero() {
            Self::Content(content)
        } else {
            Self::ToleranceInset(content)
        }
    }

    /// The content element this boundary derives from.
    pub fn content(self) -> ElementId {
        match self {
            Self::Content(e) | Self::ToleranceInset(e) => e,
        }
    }

    /// Current client rectangle of the boundary, or `None` if unmounted.
    pub fn client_rect<H: Host + ?Sized>(&self, host: &H, tolerance: &Tolerance) -> Option<Rect> {
        let content = self.content();
        let rect = host.client_rect(content)?;
        match self {
            Self::Content(_) => Some(rect),
            Self::ToleranceInset(_) => {
                let basis = ResolveBasis {
                    font_size: host.font_size(content),
                    root_font_size: host.root_font_size(),
                    box_size: rect.size(),
                };
                Some(inset_rect(rect, tolerance.resolve(&basis)))
            }
        }
    }
}

/// Shrink `rect` by `insets`, collapsing to zero size rather than inverting.
///
/// This mirrors an absolutely positioned box whose `left`/`right` (or
/// `top`/`bottom`) offsets together exceed its containing block.
pub fn inset_rect(rect: Rect, insets: Insets) -> Rect {
    let x0 = rect.x0 + insets.x0;
    let y0 = rect.y0 + insets.y0;
    let x1 = (rect.x1 - insets.x1).max(x0);
    let y1 = (rect.y1 - insets.y1).max(y0);
    Rect::new(x0, y0, x1, y1)
}
