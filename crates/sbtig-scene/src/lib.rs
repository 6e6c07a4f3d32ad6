//! Planet scene graph for an external ray tracer.
//!
//! [`PlanetSceneBuilder`] assembles a textured surface, a cloud shell and an
//! optional hollow haze shell whose Rayleigh medium comes from
//! [`ScatteringModel`]. The resulting [`PlanetScene`] is written out with
//! [`sdl::emit`]. Image files are only referenced by path, never opened.

mod builder;
mod error;
mod node;
mod scattering;
pub mod sdl;

pub use builder::{
    DEFAULT_BUMP_SIZE, DEFAULT_CLOUD_OFFSET, DEFAULT_CLOUD_TRANSMIT, DEFAULT_SURFACE_ROTATION_DEG,
    ImageSet, Layer, PlanetParams, PlanetSceneBuilder, build_atmosphere, build_clouds,
    build_surface,
};
pub use error::{ParseError, SceneError};
pub use node::{
    BumpMap, Finish, ImageFormat, ImageMap, ImageRef, Interpolation, LeafObject, MapType,
    Material, Pigment, PlanetScene, Primitive, ScatteringType, SceneNode, Solidity, Transform,
    VolumetricMedium,
};
pub use scattering::{
    DEFAULT_DENSITY, DEFAULT_EXTINCTION, DEFAULT_SHELL_OFFSET, LAMBDA_BLUE_NM, LAMBDA_GREEN_NM,
    LAMBDA_RED_NM, ScatteringModel, ScatteringShell, compute_scattering, rayleigh_color,
};
