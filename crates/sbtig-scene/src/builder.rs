//! Planet composite assembly: surface, haze shell, and cloud shell.
//!
//! Each layer has its own builder function taking only the values it needs.
//! [`PlanetSceneBuilder::build`] validates the nesting invariants first and
//! returns either a complete [`PlanetScene`] or an error, never a partial one.

use std::fmt;

use glam::DVec3;
use sbtig_config::{Config, FinishConfig};
use tracing::{debug, info};

use crate::error::SceneError;
use crate::node::{
    BumpMap, Finish, ImageMap, ImageRef, LeafObject, Material, Pigment, PlanetScene, Primitive,
    SceneNode, Solidity, Transform,
};
use crate::scattering::ScatteringModel;

/// Default height of the cloud shell above the surface.
pub const DEFAULT_CLOUD_OFFSET: f64 = 10.0;
/// Default surface rotation about the vertical axis, in degrees.
pub const DEFAULT_SURFACE_ROTATION_DEG: f64 = 25.0;
pub const DEFAULT_BUMP_SIZE: f64 = 0.05;
pub const DEFAULT_CLOUD_TRANSMIT: f64 = 0.8;

/// One of the three concentric planet layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    Surface,
    Clouds,
    Atmosphere,
}

impl Layer {
    /// Name of the layer's declaration in the scene description.
    pub fn declaration_name(self) -> &'static str {
        match self {
            Self::Surface => "Surface",
            Self::Clouds => "Clouds",
            Self::Atmosphere => "Atmosphere",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Surface => "surface",
            Self::Clouds => "cloud shell",
            Self::Atmosphere => "atmosphere shell",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// The three texture images a planet references.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageSet {
    pub surface_color: ImageRef,
    pub topography: ImageRef,
    pub clouds: ImageRef,
}

impl ImageSet {
    /// Spherically mapped images at the given paths.
    pub fn new(surface_color: &str, topography: &str, clouds: &str) -> Result<Self, SceneError> {
        Ok(Self {
            surface_color: image_ref("surface color", surface_color)?,
            topography: image_ref("topography", topography)?,
            clouds: image_ref("cloud coverage", clouds)?,
        })
    }

    /// Image paths under `images_path`, named after the selected resolutions.
    pub fn from_config(config: &Config) -> Result<Self, SceneError> {
        let images_path = &config.path_management.images_path;
        let dir = images_path.trim_end_matches('/');
        let res = &config.resolution_configuration;
        // A path made only of slashes is the filesystem root
        let join = |file: String| {
            if images_path.is_empty() {
                file
            } else {
                format!("{dir}/{file}")
            }
        };
        Self::new(
            &join(format!("earth_color_{}.tif", res.earth_texture_resolution)),
            &join(format!("topography_{}.png", res.earth_topography_resolution)),
            &join(format!("earth_clouds_{}.tif", res.earth_clouds_resolution)),
        )
    }

    fn validate(&self) -> Result<(), SceneError> {
        check_path("surface color", &self.surface_color.path)?;
        check_path("topography", &self.topography.path)?;
        check_path("cloud coverage", &self.clouds.path)
    }
}

fn image_ref(resource: &'static str, path: &str) -> Result<ImageRef, SceneError> {
    check_path(resource, path)?;
    ImageRef::spherical(path).ok_or_else(|| SceneError::UnknownImageFormat {
        path: path.to_string(),
    })
}

fn check_path(resource: &'static str, path: &str) -> Result<(), SceneError> {
    if path.trim().is_empty() {
        return Err(SceneError::EmptyResource { resource });
    }
    if path.contains('"') {
        return Err(SceneError::InvalidResourcePath {
            path: path.to_string(),
        });
    }
    Ok(())
}

impl From<&FinishConfig> for Finish {
    fn from(config: &FinishConfig) -> Self {
        Self {
            ambient: config.ambient,
            diffuse: config.diffuse,
            specular: config.specular,
            roughness: config.roughness,
        }
    }
}

/// Everything the builder needs. Plain values; no config lookups happen later.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanetParams {
    /// Surface sphere radius.
    pub radius: f64,
    pub cloud_offset: f64,
    pub surface_rotation_deg: f64,
    pub bump_size: f64,
    pub surface_finish: Finish,
    pub cloud_finish: Finish,
    pub cloud_transmit: f64,
    /// `None` leaves the haze shell out entirely.
    pub scattering: Option<ScatteringModel>,
    pub images: ImageSet,
}

impl PlanetParams {
    /// Earth-sized planet (radius 6371) with the stock tuning values.
    pub fn earth(images: ImageSet) -> Self {
        Self {
            radius: 6371.0,
            cloud_offset: DEFAULT_CLOUD_OFFSET,
            surface_rotation_deg: DEFAULT_SURFACE_ROTATION_DEG,
            bump_size: DEFAULT_BUMP_SIZE,
            surface_finish: Finish {
                ambient: Some(0.0),
                diffuse: Some(0.8),
                specular: Some(0.2),
                roughness: Some(0.05),
            },
            cloud_finish: Finish {
                ambient: Some(0.0),
                diffuse: Some(0.7),
                specular: Some(0.2),
                roughness: None,
            },
            cloud_transmit: DEFAULT_CLOUD_TRANSMIT,
            scattering: Some(ScatteringModel::default()),
            images,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, SceneError> {
        let planet = &config.planet;
        let scattering = config
            .resolution_configuration
            .modelize_scattering
            .then_some(ScatteringModel {
                shell_offset: planet.atmosphere_offset,
                extinction: planet.haze_extinction,
                density: planet.haze_density,
            });

        Ok(Self {
            radius: planet.radius,
            cloud_offset: planet.cloud_offset,
            surface_rotation_deg: planet.surface_rotation_deg,
            bump_size: planet.bump_size,
            surface_finish: Finish::from(&planet.surface_finish),
            cloud_finish: Finish::from(&planet.cloud_finish),
            cloud_transmit: planet.cloud_transmit,
            scattering,
            images: ImageSet::from_config(config)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Layer builders
// ---------------------------------------------------------------------------

/// Solid textured sphere: color map, topography bump map, fixed rotation about y.
pub fn build_surface(
    radius: f64,
    rotation_deg: f64,
    bump_size: f64,
    finish: Finish,
    color_map: ImageRef,
    topography: ImageRef,
) -> LeafObject {
    LeafObject {
        name: Layer::Surface.declaration_name().to_string(),
        primitive: Primitive::sphere_at_origin(radius),
        material: Material {
            pigment: Pigment::ImageMap(ImageMap {
                image: color_map,
                transmit_all: None,
            }),
            finish,
            normal: Some(BumpMap {
                image: topography,
                bump_size,
            }),
        },
        solidity: Solidity::Solid,
        interior: None,
        transforms: vec![Transform::Rotate(DVec3::new(0.0, rotation_deg, 0.0))],
    }
}

/// Invisible hollow shell whose only visible effect is its scattering medium.
pub fn build_atmosphere(surface_radius: f64, model: &ScatteringModel) -> LeafObject {
    let shell = model.compute(surface_radius);
    LeafObject {
        name: Layer::Atmosphere.declaration_name().to_string(),
        primitive: Primitive::sphere_at_origin(shell.shell_radius),
        material: Material {
            pigment: Pigment::transparent(),
            finish: Finish {
                ambient: Some(0.0),
                diffuse: Some(0.0),
                ..Finish::default()
            },
            normal: None,
        },
        solidity: Solidity::Hollow,
        interior: Some(shell.medium),
        transforms: Vec::new(),
    }
}

/// Thin hollow shell textured with a partially transmissive cloud map.
pub fn build_clouds(
    surface_radius: f64,
    offset: f64,
    transmit: f64,
    finish: Finish,
    coverage: ImageRef,
) -> LeafObject {
    LeafObject {
        name: Layer::Clouds.declaration_name().to_string(),
        primitive: Primitive::sphere_at_origin(surface_radius + offset),
        material: Material {
            pigment: Pigment::ImageMap(ImageMap {
                image: coverage,
                transmit_all: Some(transmit),
            }),
            finish,
            normal: None,
        },
        solidity: Solidity::Hollow,
        interior: None,
        transforms: Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// PlanetSceneBuilder
// ---------------------------------------------------------------------------

/// Builds a [`PlanetScene`] from fixed parameters.
///
/// `build` is pure: the same parameters always give an equal scene, and
/// caching the result is left to the caller.
#[derive(Clone, Debug)]
pub struct PlanetSceneBuilder {
    params: PlanetParams,
}

impl PlanetSceneBuilder {
    pub fn new(params: PlanetParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &PlanetParams {
        &self.params
    }

    /// Check radius ordering, channel ranges, coefficients and image paths.
    pub fn validate(&self) -> Result<(), SceneError> {
        let p = &self.params;

        check_finite(Layer::Surface, "radius", p.radius)?;
        if p.radius <= 0.0 {
            return Err(SceneError::NonPositiveRadius {
                layer: Layer::Surface,
                radius: p.radius,
            });
        }
        check_finite(Layer::Surface, "rotation", p.surface_rotation_deg)?;
        check_finite(Layer::Surface, "bump_size", p.bump_size)?;
        check_finish(Layer::Surface, &p.surface_finish)?;

        check_finite(Layer::Clouds, "offset", p.cloud_offset)?;
        let cloud_radius = p.radius + p.cloud_offset;
        check_finite(Layer::Clouds, "radius", cloud_radius)?;
        check_nested(Layer::Surface, p.radius, Layer::Clouds, cloud_radius)?;
        check_range(Layer::Clouds, "transmit", p.cloud_transmit, 0.0, 1.0)?;
        check_finish(Layer::Clouds, &p.cloud_finish)?;

        if let Some(model) = &p.scattering {
            check_finite(Layer::Atmosphere, "offset", model.shell_offset)?;
            let shell = model.compute(p.radius);
            check_finite(Layer::Atmosphere, "radius", shell.shell_radius)?;
            check_nested(Layer::Clouds, cloud_radius, Layer::Atmosphere, shell.shell_radius)?;
            check_finite(Layer::Atmosphere, "extinction", model.extinction)?;
            check_range(Layer::Atmosphere, "extinction", model.extinction, 0.0, f64::INFINITY)?;
            check_finite(Layer::Atmosphere, "density", model.density)?;
            check_range(Layer::Atmosphere, "density", model.density, 0.0, f64::INFINITY)?;
            check_channels(shell.medium.color)?;
        }

        p.images.validate()
    }

    /// Validate, then assemble `[clouds, [surface, atmosphere]]`.
    ///
    /// With scattering disabled the composite is `[clouds, surface]`.
    pub fn build(&self) -> Result<PlanetScene, SceneError> {
        self.validate()?;
        let p = &self.params;

        let surface = build_surface(
            p.radius,
            p.surface_rotation_deg,
            p.bump_size,
            p.surface_finish,
            p.images.surface_color.clone(),
            p.images.topography.clone(),
        );
        debug!(radius = p.radius, "built surface layer");

        let clouds = build_clouds(
            p.radius,
            p.cloud_offset,
            p.cloud_transmit,
            p.cloud_finish,
            p.images.clouds.clone(),
        );
        debug!(radius = clouds.primitive.radius(), "built cloud layer");

        let inner = match &p.scattering {
            Some(model) => {
                let atmosphere = build_atmosphere(p.radius, model);
                debug!(radius = atmosphere.primitive.radius(), "built atmosphere layer");
                SceneNode::Group(vec![SceneNode::Leaf(surface), SceneNode::Leaf(atmosphere)])
            }
            None => SceneNode::Leaf(surface),
        };

        let scene = PlanetScene::from_root(SceneNode::Group(vec![SceneNode::Leaf(clouds), inner]));
        info!(
            leaves = scene.leaf_count(),
            scattering = p.scattering.is_some(),
            "planet scene built"
        );
        Ok(scene)
    }
}

fn check_finite(layer: Layer, name: &'static str, value: f64) -> Result<(), SceneError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SceneError::NonFinite { layer, name, value })
    }
}

fn check_range(
    layer: Layer,
    name: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), SceneError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(SceneError::CoefficientOutOfRange {
            layer,
            name,
            value,
            min,
            max,
        })
    }
}

fn check_finish(layer: Layer, finish: &Finish) -> Result<(), SceneError> {
    finish
        .coefficients()
        .try_for_each(|(name, value)| check_range(layer, name, value, 0.0, 1.0))
}

fn check_nested(
    inner: Layer,
    inner_radius: f64,
    outer: Layer,
    outer_radius: f64,
) -> Result<(), SceneError> {
    if outer_radius > inner_radius {
        Ok(())
    } else {
        Err(SceneError::ShellOrdering {
            inner,
            inner_radius,
            outer,
            outer_radius,
        })
    }
}

fn check_channels(color: DVec3) -> Result<(), SceneError> {
    for (channel, value) in ["red", "green", "blue"].into_iter().zip(color.to_array()) {
        if !(value > 0.0 && value <= 1.0) {
            return Err(SceneError::ChannelOutOfRange { channel, value });
        }
    }
    Ok(())
}
