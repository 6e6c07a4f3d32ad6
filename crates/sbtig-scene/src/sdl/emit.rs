//! Scene description writer.

use std::fmt::{self, Write};

use glam::{DVec3, DVec4};

use crate::node::{
    BumpMap, Finish, ImageMap, ImageRef, LeafObject, Material, Pigment, PlanetScene, Primitive,
    SceneNode, Solidity, Transform, VolumetricMedium,
};

/// Name the composite is declared under.
pub const ROOT_NAME: &str = "Planet";

const INDENT: &str = "  ";

/// Render the scene as renderer declarations: one `#declare` per leaf, then the root union.
pub fn emit(scene: &PlanetScene) -> String {
    scene.to_string()
}

impl fmt::Display for PlanetScene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for leaf in self.leaves() {
            write_leaf(f, leaf)?;
            writeln!(f)?;
        }
        write!(f, "#declare {ROOT_NAME} = ")?;
        write_node(f, self.root(), 0)?;
        writeln!(f)
    }
}

fn write_leaf(out: &mut impl Write, leaf: &LeafObject) -> fmt::Result {
    writeln!(out, "#declare {} = object {{", leaf.name)?;
    line(out, 1, format_args!("{}", Geometry(&leaf.primitive)))?;
    write_material(out, &leaf.material)?;
    if leaf.solidity == Solidity::Hollow {
        line(out, 1, format_args!("hollow"))?;
    }
    if let Some(medium) = &leaf.interior {
        write_interior(out, medium)?;
    }
    for transform in &leaf.transforms {
        match transform {
            Transform::Rotate(angles) => line(out, 1, format_args!("rotate {}", V3(*angles)))?,
        }
    }
    writeln!(out, "}}")
}

fn write_material(out: &mut impl Write, material: &Material) -> fmt::Result {
    line(out, 1, format_args!("texture {{"))?;
    match &material.pigment {
        Pigment::Rgbt(color) => line(out, 2, format_args!("pigment {{ rgbt {} }}", V4(*color)))?,
        Pigment::ImageMap(map) => line(out, 2, format_args!("pigment {{ {} }}", Map(map)))?,
    }
    line(out, 2, format_args!("finish {{{}}}", FinishClause(&material.finish)))?;
    if let Some(bump) = &material.normal {
        line(out, 2, format_args!("normal {{ {} }}", Bump(bump)))?;
    }
    line(out, 1, format_args!("}}"))
}

fn write_interior(out: &mut impl Write, medium: &VolumetricMedium) -> fmt::Result {
    line(out, 1, format_args!("interior {{"))?;
    line(out, 2, format_args!("media {{"))?;
    line(
        out,
        3,
        format_args!(
            "scattering {{ {}, rgb {} extinction {} }}",
            medium.scattering_type.code(),
            V3(medium.color),
            medium.extinction
        ),
    )?;
    line(out, 3, format_args!("density {{ rgb {} }}", V3(medium.density)))?;
    line(out, 2, format_args!("}}"))?;
    line(out, 1, format_args!("}}"))
}

fn write_node(out: &mut impl Write, node: &SceneNode, depth: usize) -> fmt::Result {
    match node {
        SceneNode::Leaf(leaf) => write!(out, "object {{ {} }}", leaf.name),
        SceneNode::Group(children) => {
            writeln!(out, "union {{")?;
            for child in children {
                out.write_str(&INDENT.repeat(depth + 1))?;
                write_node(out, child, depth + 1)?;
                writeln!(out)?;
            }
            write!(out, "{}}}", INDENT.repeat(depth))
        }
    }
}

fn line(out: &mut impl Write, depth: usize, args: fmt::Arguments<'_>) -> fmt::Result {
    writeln!(out, "{}{}", INDENT.repeat(depth), args)
}

// Clause formatters.

struct V3(DVec3);

impl fmt::Display for V3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}, {}>", self.0.x, self.0.y, self.0.z)
    }
}

struct V4(DVec4);

impl fmt::Display for V4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}, {}, {}>", self.0.x, self.0.y, self.0.z, self.0.w)
    }
}

struct Geometry<'a>(&'a Primitive);

impl fmt::Display for Geometry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Primitive::Sphere { center, radius } => {
                write!(f, "sphere {{ {}, {} }}", V3(*center), radius)
            }
        }
    }
}

struct Image<'a>(&'a ImageRef);

impl fmt::Display for Image<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let image = self.0;
        write!(
            f,
            "{} \"{}\" map_type {} interpolate {}",
            image.format.keyword(),
            image.path,
            image.map_type.code(),
            image.interpolation.code()
        )
    }
}

struct Map<'a>(&'a ImageMap);

impl fmt::Display for Map<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "image_map {{ {}", Image(&self.0.image))?;
        if let Some(transmit) = self.0.transmit_all {
            write!(f, " transmit all {transmit}")?;
        }
        f.write_str(" }")
    }
}

struct Bump<'a>(&'a BumpMap);

impl fmt::Display for Bump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bump_map {{ {} bump_size {} }}",
            Image(&self.0.image),
            self.0.bump_size
        )
    }
}

struct FinishClause<'a>(&'a Finish);

impl fmt::Display for FinishClause<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.0.coefficients() {
            write!(f, " {name} {value}")?;
        }
        f.write_str(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{ImageSet, PlanetParams, PlanetSceneBuilder};

    fn earth_scene(scattering: bool) -> PlanetScene {
        let images = ImageSet::new(
            "/resources/images/earth_color_43K.tif",
            "/resources/images/topography_21K.png",
            "/resources/images/earth_clouds_43K.tif",
        )
        .unwrap();
        let mut params = PlanetParams::earth(images);
        if !scattering {
            params.scattering = None;
        }
        PlanetSceneBuilder::new(params).build().unwrap()
    }

    #[test]
    fn test_surface_clause_order() {
        let text = emit(&earth_scene(true));
        let start = text.find("#declare Surface").unwrap();
        let end = start + text[start..].find("\n}\n").unwrap();
        let surface = &text[start..end];

        let sphere = surface.find("sphere { <0, 0, 0>, 6371 }").unwrap();
        let pigment = surface
            .find("pigment { image_map { tiff \"/resources/images/earth_color_43K.tif\" map_type 1 interpolate 2 } }")
            .unwrap();
        let finish = surface
            .find("finish { ambient 0 diffuse 0.8 specular 0.2 roughness 0.05 }")
            .unwrap();
        let normal = surface
            .find("normal { bump_map { png \"/resources/images/topography_21K.png\" map_type 1 interpolate 2 bump_size 0.05 } }")
            .unwrap();
        let rotate = surface.find("rotate <0, 25, 0>").unwrap();

        assert!(sphere < pigment && pigment < finish && finish < normal && normal < rotate);
        assert!(!surface.contains("hollow"));
        assert!(!surface.contains("interior"));
    }

    #[test]
    fn test_atmosphere_interior() {
        let text = emit(&earth_scene(true));
        let start = text.find("#declare Atmosphere").unwrap();
        let atmosphere = &text[start..];

        assert!(atmosphere.contains("sphere { <0, 0, 0>, 6421 }"));
        assert!(atmosphere.contains("pigment { rgbt <0, 0, 0, 1> }"));
        assert!(atmosphere.contains("finish { ambient 0 diffuse 0 }"));
        let hollow = atmosphere.find("hollow").unwrap();
        let interior = atmosphere.find("interior {").unwrap();
        assert!(hollow < interior);
        assert!(atmosphere.contains("scattering { 4, rgb <"));
        assert!(atmosphere.contains("extinction 1 }"));
        assert!(atmosphere.contains("density { rgb <0.001, 0.001, 0.001> }"));
    }

    #[test]
    fn test_cloud_transmit_clause() {
        let text = emit(&earth_scene(true));
        assert!(text.contains(
            "image_map { tiff \"/resources/images/earth_clouds_43K.tif\" map_type 1 interpolate 2 transmit all 0.8 }"
        ));
    }

    #[test]
    fn test_root_union_structure() {
        let text = emit(&earth_scene(true));
        let root = &text[text.find("#declare Planet").unwrap()..];
        assert_eq!(
            root,
            "#declare Planet = union {\n  object { Clouds }\n  union {\n    object { Surface }\n    object { Atmosphere }\n  }\n}\n"
        );
    }

    #[test]
    fn test_root_without_scattering() {
        let text = emit(&earth_scene(false));
        assert!(!text.contains("Atmosphere"));
        assert!(text.ends_with("#declare Planet = union {\n  object { Clouds }\n  object { Surface }\n}\n"));
    }

    #[test]
    fn test_leaves_declared_before_root() {
        let text = emit(&earth_scene(true));
        let clouds = text.find("#declare Clouds").unwrap();
        let surface = text.find("#declare Surface").unwrap();
        let atmosphere = text.find("#declare Atmosphere").unwrap();
        let root = text.find("#declare Planet").unwrap();
        assert!(clouds < surface && surface < atmosphere && atmosphere < root);
    }
}
