//! Scene graph types: primitives, materials, media, and the leaf/group tree.
//!
//! Every value here is plain data. Nodes own their materials and media, so a
//! built [`PlanetScene`] shares nothing and cannot be edited through its API.

use std::path::Path;

use glam::{DVec3, DVec4};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// A geometric shape.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Primitive {
    /// Sphere with a center and a non-negative radius.
    Sphere { center: DVec3, radius: f64 },
}

impl Primitive {
    /// Sphere centered at the origin.
    pub fn sphere_at_origin(radius: f64) -> Self {
        Self::Sphere {
            center: DVec3::ZERO,
            radius,
        }
    }

    /// Bounding radius measured from the shape's center.
    pub fn radius(&self) -> f64 {
        match self {
            Self::Sphere { radius, .. } => *radius,
        }
    }
}

/// Transform applied after the shape and its material.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum Transform {
    /// Rotation in degrees about the x, y and z axes, applied in that order.
    Rotate(DVec3),
}

// ---------------------------------------------------------------------------
// Image resources
// ---------------------------------------------------------------------------

/// Image file formats understood by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ImageFormat {
    Gif,
    Tga,
    Png,
    Jpeg,
    Tiff,
    Ppm,
    Exr,
    Hdr,
}

impl ImageFormat {
    const ALL: [ImageFormat; 8] = [
        Self::Gif,
        Self::Tga,
        Self::Png,
        Self::Jpeg,
        Self::Tiff,
        Self::Ppm,
        Self::Exr,
        Self::Hdr,
    ];

    /// Keyword used in the scene description.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Gif => "gif",
            Self::Tga => "tga",
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Tiff => "tiff",
            Self::Ppm => "ppm",
            Self::Exr => "exr",
            Self::Hdr => "hdr",
        }
    }

    /// Inverse of [`keyword`](Self::keyword).
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.keyword() == keyword)
    }

    /// Guess the format from a file extension (case-insensitive).
    pub fn from_path(path: &str) -> Option<Self> {
        let ext = Path::new(path).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "gif" => Some(Self::Gif),
            "tga" => Some(Self::Tga),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "tif" | "tiff" => Some(Self::Tiff),
            "ppm" => Some(Self::Ppm),
            "exr" => Some(Self::Exr),
            "hdr" => Some(Self::Hdr),
            _ => None,
        }
    }
}

/// How an image is wrapped onto the shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum MapType {
    Planar,
    Spherical,
    Cylindrical,
    Torus,
}

impl MapType {
    pub fn code(self) -> u8 {
        match self {
            Self::Planar => 0,
            Self::Spherical => 1,
            Self::Cylindrical => 2,
            Self::Torus => 5,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Planar),
            1 => Some(Self::Spherical),
            2 => Some(Self::Cylindrical),
            5 => Some(Self::Torus),
            _ => None,
        }
    }
}

/// Texel interpolation mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Interpolation {
    Bilinear,
    NormalizedDistance,
}

impl Interpolation {
    pub fn code(self) -> u8 {
        match self {
            Self::Bilinear => 2,
            Self::NormalizedDistance => 4,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            2 => Some(Self::Bilinear),
            4 => Some(Self::NormalizedDistance),
            _ => None,
        }
    }
}

/// Opaque reference to an external image. The file is never opened here.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ImageRef {
    pub format: ImageFormat,
    pub path: String,
    pub map_type: MapType,
    pub interpolation: Interpolation,
}

impl ImageRef {
    /// Spherically mapped, bilinearly interpolated image; format from the extension.
    pub fn spherical(path: impl Into<String>) -> Option<Self> {
        let path = path.into();
        let format = ImageFormat::from_path(&path)?;
        Some(Self {
            format,
            path,
            map_type: MapType::Spherical,
            interpolation: Interpolation::Bilinear,
        })
    }
}

// ---------------------------------------------------------------------------
// Material
// ---------------------------------------------------------------------------

/// Image-sourced pigment.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ImageMap {
    pub image: ImageRef,
    /// Transmission applied to every palette entry, in `[0, 1]`.
    pub transmit_all: Option<f64>,
}

/// Color source of a material.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Pigment {
    /// Flat color: red, green, blue, transmit.
    Rgbt(DVec4),
    ImageMap(ImageMap),
}

impl Pigment {
    /// Black with full transmission: contributes nothing to the image.
    pub fn transparent() -> Self {
        Self::Rgbt(DVec4::new(0.0, 0.0, 0.0, 1.0))
    }
}

/// Surface-normal perturbation from a height image.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BumpMap {
    pub image: ImageRef,
    pub bump_size: f64,
}

/// Lighting coefficients. `None` leaves the renderer default in place.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Finish {
    pub ambient: Option<f64>,
    pub diffuse: Option<f64>,
    pub specular: Option<f64>,
    pub roughness: Option<f64>,
}

impl Finish {
    /// Names in emission order.
    pub const COEFFICIENTS: [&'static str; 4] = ["ambient", "diffuse", "specular", "roughness"];

    /// Set coefficients as `(name, value)` pairs in emission order.
    pub fn coefficients(&self) -> impl Iterator<Item = (&'static str, f64)> {
        let values = [self.ambient, self.diffuse, self.specular, self.roughness];
        Self::COEFFICIENTS
            .into_iter()
            .zip(values)
            .filter_map(|(name, value)| value.map(|v| (name, v)))
    }

    /// Set a coefficient by name. Returns `false` for an unknown name.
    pub fn set(&mut self, name: &str, value: f64) -> bool {
        let slot = match name {
            "ambient" => &mut self.ambient,
            "diffuse" => &mut self.diffuse,
            "specular" => &mut self.specular,
            "roughness" => &mut self.roughness,
            _ => return false,
        };
        *slot = Some(value);
        true
    }
}

/// The visual skin of one object.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Material {
    pub pigment: Pigment,
    pub finish: Finish,
    pub normal: Option<BumpMap>,
}

// ---------------------------------------------------------------------------
// Media
// ---------------------------------------------------------------------------

/// Scattering phase function, with the renderer's numeric codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ScatteringType {
    Isotropic,
    MieHazy,
    MieMurky,
    /// Code 4. Older scene files labelled Rayleigh haze with code 1, which the
    /// renderer reads as isotropic.
    Rayleigh,
    HenyeyGreenstein,
}

impl ScatteringType {
    pub fn code(self) -> u8 {
        match self {
            Self::Isotropic => 1,
            Self::MieHazy => 2,
            Self::MieMurky => 3,
            Self::Rayleigh => 4,
            Self::HenyeyGreenstein => 5,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Isotropic),
            2 => Some(Self::MieHazy),
            3 => Some(Self::MieMurky),
            4 => Some(Self::Rayleigh),
            5 => Some(Self::HenyeyGreenstein),
            _ => None,
        }
    }
}

/// Participating medium filling a hollow object.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VolumetricMedium {
    pub scattering_type: ScatteringType,
    /// Per-channel scattering color.
    pub color: DVec3,
    /// Extinction coefficient, `>= 0`.
    pub extinction: f64,
    /// Constant per-channel density, each `>= 0`.
    pub density: DVec3,
}

// ---------------------------------------------------------------------------
// Scene graph
// ---------------------------------------------------------------------------

/// Whether the inside of an object is filled or may hold a medium.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Solidity {
    Solid,
    Hollow,
}

/// A shape with its material, solidity, optional medium and transforms.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LeafObject {
    /// Declaration name in the emitted scene description.
    pub name: String,
    pub primitive: Primitive,
    pub material: Material,
    pub solidity: Solidity,
    pub interior: Option<VolumetricMedium>,
    pub transforms: Vec<Transform>,
}

/// A node of the scene tree.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum SceneNode {
    Leaf(LeafObject),
    /// Union of children, in compositing order.
    Group(Vec<SceneNode>),
}

impl SceneNode {
    /// Depth-first leaf iteration, in child order.
    pub fn leaves(&self) -> Vec<&LeafObject> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a LeafObject>) {
        match self {
            Self::Leaf(leaf) => out.push(leaf),
            Self::Group(children) => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
        }
    }
}

/// Finished planet composite. Read-only once built.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlanetScene {
    root: SceneNode,
}

impl PlanetScene {
    pub(crate) fn from_root(root: SceneNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &SceneNode {
        &self.root
    }

    pub fn leaves(&self) -> Vec<&LeafObject> {
        self.root.leaves()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }

    /// Leaf with the given declaration name.
    pub fn leaf(&self, name: &str) -> Option<&LeafObject> {
        self.leaves().into_iter().find(|leaf| leaf.name == name)
    }
}
