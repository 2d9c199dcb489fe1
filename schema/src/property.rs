//! Property identifiers, semantic kinds, and value representations.

use std::fmt;

/// A stable property identifier.
///
/// Identifiers are globally unique across every entity kind and append-only:
/// the flag stream is positional, so a raw value is never reused or
/// reordered once a protocol version has shipped. Canonical encode/decode
/// order is ascending raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum PropertyId {
    // Base properties, shared by every entity kind. `LastEdited` sorts
    // before every mutable property so the stale gate is decided before any
    // value it guards.
    Created = 0,
    LastEdited = 1,
    Position = 2,
    Dimensions = 3,
    Rotation = 4,
    Velocity = 5,
    Gravity = 6,
    Damping = 7,
    Lifetime = 8,
    Visible = 9,
    Locked = 10,
    Script = 11,

    // Kind extensions. Appended after the base set, never renumbered.
    Color = 12,
    Intensity = 13,
    IsSpotlight = 14,
    Exponent = 15,
    Cutoff = 16,
    Text = 17,
    LineHeight = 18,
    TextColor = 19,
    BackgroundColor = 20,
    BillboardMode = 21,
    ModelUrl = 22,
    AnimationUrl = 23,
    AnimationFps = 24,
    AnimationPlaying = 25,
}

impl PropertyId {
    /// Returns the raw wire identifier (the flag bit index).
    #[must_use]
    pub const fn raw(self) -> u16 {
        self as u16
    }

    /// Looks up a property identifier from its raw value.
    ///
    /// Returns `None` for values this catalog version does not know; an
    /// append-only catalog guarantees those sort after every known id.
    #[must_use]
    pub const fn from_raw(raw: u16) -> Option<Self> {
        match raw {
            0 => Some(Self::Created),
            1 => Some(Self::LastEdited),
            2 => Some(Self::Position),
            3 => Some(Self::Dimensions),
            4 => Some(Self::Rotation),
            5 => Some(Self::Velocity),
            6 => Some(Self::Gravity),
            7 => Some(Self::Damping),
            8 => Some(Self::Lifetime),
            9 => Some(Self::Visible),
            10 => Some(Self::Locked),
            11 => Some(Self::Script),
            12 => Some(Self::Color),
            13 => Some(Self::Intensity),
            14 => Some(Self::IsSpotlight),
            15 => Some(Self::Exponent),
            16 => Some(Self::Cutoff),
            17 => Some(Self::Text),
            18 => Some(Self::LineHeight),
            19 => Some(Self::TextColor),
            20 => Some(Self::BackgroundColor),
            21 => Some(Self::BillboardMode),
            22 => Some(Self::ModelUrl),
            23 => Some(Self::AnimationUrl),
            24 => Some(Self::AnimationFps),
            25 => Some(Self::AnimationPlaying),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// The semantic type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PropertyKind {
    /// Boolean, one byte on the wire.
    Bool,
    /// 32-bit float, little-endian.
    F32,
    /// Microsecond timestamp, byte-count coded.
    Timestamp,
    /// Three-component float vector.
    Vec3,
    /// Four-component quaternion.
    Quat,
    /// 8-bit RGB color.
    Rgb,
    /// UTF-8 string with a byte-count coded length.
    Str,
    /// Enumerated value, one byte, range-checked against `count`.
    Enum {
        /// Number of valid raw values (`0..count`).
        count: u8,
    },
}

/// A three-component vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Creates a vector with all components set to `value`.
    #[must_use]
    pub const fn splat(value: f32) -> Self {
        Self::new(value, value, value)
    }
}

/// A rotation quaternion.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Billboard orientation for text surfaces.
///
/// The semantic mapping behind the enum-coded `BillboardMode` property;
/// encoder and decoder must agree on these raw values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum BillboardMode {
    /// Fixed in world space.
    #[default]
    Flat = 0,
    /// Rotates about the up axis to face the viewer.
    Yaw = 1,
    /// Fully faces the viewer.
    Full = 2,
}

impl BillboardMode {
    /// Number of valid raw values.
    pub const COUNT: u8 = 3;

    /// Looks up a mode from its raw wire value.
    #[must_use]
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Flat),
            1 => Some(Self::Yaw),
            2 => Some(Self::Full),
            _ => None,
        }
    }
}

/// A property value in decoded form.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PropertyValue {
    Bool(bool),
    F32(f32),
    Timestamp(u64),
    Vec3(Vec3),
    Quat(Quat),
    Rgb(Rgb),
    Str(String),
    Enum(u8),
}

impl PropertyValue {
    /// Returns the semantic kind this value satisfies.
    ///
    /// `Enum` values report a count of zero; kind compatibility for enums is
    /// checked against the descriptor's declared count, not the value.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::F32(_) => "f32",
            Self::Timestamp(_) => "timestamp",
            Self::Vec3(_) => "vec3",
            Self::Quat(_) => "quat",
            Self::Rgb(_) => "rgb",
            Self::Str(_) => "str",
            Self::Enum(_) => "enum",
        }
    }

    /// Returns `true` if this value matches the given semantic kind.
    #[must_use]
    pub const fn matches(&self, kind: PropertyKind) -> bool {
        matches!(
            (self, kind),
            (Self::Bool(_), PropertyKind::Bool)
                | (Self::F32(_), PropertyKind::F32)
                | (Self::Timestamp(_), PropertyKind::Timestamp)
                | (Self::Vec3(_), PropertyKind::Vec3)
                | (Self::Quat(_), PropertyKind::Quat)
                | (Self::Rgb(_), PropertyKind::Rgb)
                | (Self::Str(_), PropertyKind::Str)
                | (Self::Enum(_), PropertyKind::Enum { .. })
        )
    }
}
