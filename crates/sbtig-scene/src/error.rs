//! Scene build and scene-description parse errors.

use crate::builder::Layer;

/// Invariant violations detected before or during a scene build.
///
/// A build that returns one of these produces no scene at all.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SceneError {
    #[error("{layer} radius must be positive, got {radius}")]
    NonPositiveRadius { layer: Layer, radius: f64 },

    #[error("{outer} radius {outer_radius} must exceed {inner} radius {inner_radius}")]
    ShellOrdering {
        inner: Layer,
        inner_radius: f64,
        outer: Layer,
        outer_radius: f64,
    },

    #[error("scattering {channel} channel {value} is outside (0, 1]")]
    ChannelOutOfRange { channel: &'static str, value: f64 },

    #[error("{layer} {name} = {value} is outside [{min}, {max}]")]
    CoefficientOutOfRange {
        layer: Layer,
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{layer} {name} must be finite, got {value}")]
    NonFinite {
        layer: Layer,
        name: &'static str,
        value: f64,
    },

    #[error("{resource} image path is empty")]
    EmptyResource { resource: &'static str },

    #[error("image path {path:?} contains a double quote")]
    InvalidResourcePath { path: String },

    #[error("cannot tell the image format of {path:?} from its extension")]
    UnknownImageFormat { path: String },
}

/// Failures while reading a scene description back into a [`crate::PlanetScene`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("syntax error at byte {offset} near {near:?}")]
    Syntax { offset: usize, near: String },

    #[error("reference to undeclared object {0}")]
    UnknownReference(String),

    #[error("object {0} is declared twice")]
    DuplicateDeclaration(String),

    #[error("scene description declares nothing")]
    NoRoot,
}
