//! Scene description reader for the subset [`super::emit`] writes.
//!
//! Whitespace and `//` comments are insignificant. Object references resolve
//! against earlier declarations, and the last declaration is the root.

use std::collections::HashMap;

use glam::{DVec3, DVec4};
use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{alpha1, alphanumeric1, char, multispace1, not_line_ending, satisfy},
    combinator::{map, map_opt, not, opt, recognize, value},
    multi::{many0, many0_count, many1},
    number::complete::double,
    sequence::{delimited, pair, preceded, terminated, tuple},
};

use crate::error::ParseError;
use crate::node::{
    BumpMap, Finish, ImageFormat, ImageMap, ImageRef, Interpolation, LeafObject, MapType,
    Material, Pigment, PlanetScene, Primitive, ScatteringType, SceneNode, Solidity, Transform,
    VolumetricMedium,
};

type Res<'a, T> = IResult<&'a str, T>;

type LeafBody = (
    Primitive,
    Material,
    Option<&'static str>,
    Option<VolumetricMedium>,
    Vec<Transform>,
);

enum Declaration {
    Leaf(LeafBody),
    Node(NodeExpr),
}

enum NodeExpr {
    Ref(String),
    Union(Vec<NodeExpr>),
}

/// Parse a scene description back into a [`PlanetScene`].
pub fn parse(input: &str) -> Result<PlanetScene, ParseError> {
    let (rest, declarations) =
        many0(declaration)(input).map_err(|e| syntax_error(input, e))?;
    let (rest, ()) = sp(rest).map_err(|e| syntax_error(input, e))?;
    if !rest.is_empty() {
        return Err(syntax_at(input, rest));
    }
    resolve(declarations)
}

fn resolve(declarations: Vec<(&str, Declaration)>) -> Result<PlanetScene, ParseError> {
    let mut declared: HashMap<String, SceneNode> = HashMap::new();
    let mut root = None;

    for (name, declaration) in declarations {
        let node = match declaration {
            Declaration::Leaf((primitive, material, hollow, interior, transforms)) => {
                SceneNode::Leaf(LeafObject {
                    name: name.to_string(),
                    primitive,
                    material,
                    solidity: if hollow.is_some() {
                        Solidity::Hollow
                    } else {
                        Solidity::Solid
                    },
                    interior,
                    transforms,
                })
            }
            Declaration::Node(expr) => resolve_expr(&expr, &declared)?,
        };
        if declared.insert(name.to_string(), node.clone()).is_some() {
            return Err(ParseError::DuplicateDeclaration(name.to_string()));
        }
        root = Some(node);
    }

    root.map(PlanetScene::from_root).ok_or(ParseError::NoRoot)
}

fn resolve_expr(
    expr: &NodeExpr,
    declared: &HashMap<String, SceneNode>,
) -> Result<SceneNode, ParseError> {
    match expr {
        NodeExpr::Ref(name) => declared
            .get(name)
            .cloned()
            .ok_or_else(|| ParseError::UnknownReference(name.clone())),
        NodeExpr::Union(children) => children
            .iter()
            .map(|child| resolve_expr(child, declared))
            .collect::<Result<Vec<_>, _>>()
            .map(SceneNode::Group),
    }
}

fn syntax_error(input: &str, err: nom::Err<nom::error::Error<&str>>) -> ParseError {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => syntax_at(input, e.input),
        nom::Err::Incomplete(_) => syntax_at(input, ""),
    }
}

fn syntax_at(input: &str, rest: &str) -> ParseError {
    ParseError::Syntax {
        offset: input.len() - rest.len(),
        near: rest.chars().take(32).collect(),
    }
}

// ---------------------------------------------------------------------------
// Lexical helpers
// ---------------------------------------------------------------------------

fn sp(i: &str) -> Res<'_, ()> {
    value((), many0_count(alt((multispace1, comment))))(i)
}

fn comment(i: &str) -> Res<'_, &str> {
    recognize(pair(tag("//"), not_line_ending))(i)
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> Res<'a, &'a str> {
    preceded(sp, terminated(tag(word), not(satisfy(is_ident_char))))
}

fn symbol<'a>(s: &'static str) -> impl FnMut(&'a str) -> Res<'a, &'a str> {
    preceded(sp, tag(s))
}

fn braced<'a, O, F>(name: &'static str, inner: F) -> impl FnMut(&'a str) -> Res<'a, O>
where
    F: FnMut(&'a str) -> Res<'a, O>,
{
    delimited(pair(keyword(name), symbol("{")), inner, symbol("}"))
}

fn identifier(i: &str) -> Res<'_, &str> {
    preceded(
        sp,
        recognize(pair(
            alt((alpha1, tag("_"))),
            many0_count(alt((alphanumeric1, tag("_")))),
        )),
    )(i)
}

fn quoted(i: &str) -> Res<'_, &str> {
    preceded(sp, delimited(char('"'), take_while(|c: char| c != '"'), char('"')))(i)
}

fn number(i: &str) -> Res<'_, f64> {
    preceded(sp, double)(i)
}

fn code(i: &str) -> Res<'_, u8> {
    preceded(sp, nom::character::complete::u8)(i)
}

fn vector3(i: &str) -> Res<'_, DVec3> {
    map(
        tuple((
            symbol("<"),
            number,
            symbol(","),
            number,
            symbol(","),
            number,
            symbol(">"),
        )),
        |(_, x, _, y, _, z, _)| DVec3::new(x, y, z),
    )(i)
}

fn vector4(i: &str) -> Res<'_, DVec4> {
    map(
        tuple((
            symbol("<"),
            number,
            symbol(","),
            number,
            symbol(","),
            number,
            symbol(","),
            number,
            symbol(">"),
        )),
        |(_, x, _, y, _, z, _, w, _)| DVec4::new(x, y, z, w),
    )(i)
}

// ---------------------------------------------------------------------------
// Clauses
// ---------------------------------------------------------------------------

fn sphere(i: &str) -> Res<'_, Primitive> {
    map(
        braced("sphere", tuple((vector3, symbol(","), number))),
        |(center, _, radius)| Primitive::Sphere { center, radius },
    )(i)
}

fn image_ref(i: &str) -> Res<'_, ImageRef> {
    map(
        tuple((
            map_opt(identifier, ImageFormat::from_keyword),
            quoted,
            preceded(keyword("map_type"), map_opt(code, MapType::from_code)),
            preceded(
                keyword("interpolate"),
                map_opt(code, Interpolation::from_code),
            ),
        )),
        |(format, path, map_type, interpolation)| ImageRef {
            format,
            path: path.to_string(),
            map_type,
            interpolation,
        },
    )(i)
}

fn image_map(i: &str) -> Res<'_, ImageMap> {
    map(
        braced(
            "image_map",
            pair(
                image_ref,
                opt(preceded(pair(keyword("transmit"), keyword("all")), number)),
            ),
        ),
        |(image, transmit_all)| ImageMap {
            image,
            transmit_all,
        },
    )(i)
}

fn pigment(i: &str) -> Res<'_, Pigment> {
    braced(
        "pigment",
        alt((
            map(preceded(keyword("rgbt"), vector4), Pigment::Rgbt),
            map(image_map, Pigment::ImageMap),
        )),
    )(i)
}

fn finish(i: &str) -> Res<'_, Finish> {
    let coefficient = alt((
        keyword("ambient"),
        keyword("diffuse"),
        keyword("specular"),
        keyword("roughness"),
    ));
    map(braced("finish", many0(pair(coefficient, number))), |pairs| {
        let mut finish = Finish::default();
        for (name, value) in pairs {
            finish.set(name, value);
        }
        finish
    })(i)
}

fn normal(i: &str) -> Res<'_, BumpMap> {
    braced(
        "normal",
        map(
            braced(
                "bump_map",
                pair(image_ref, preceded(keyword("bump_size"), number)),
            ),
            |(image, bump_size)| BumpMap { image, bump_size },
        ),
    )(i)
}

fn texture(i: &str) -> Res<'_, Material> {
    map(
        braced("texture", tuple((pigment, finish, opt(normal)))),
        |(pigment, finish, normal)| Material {
            pigment,
            finish,
            normal,
        },
    )(i)
}

fn interior(i: &str) -> Res<'_, VolumetricMedium> {
    let scattering = braced(
        "scattering",
        tuple((
            map_opt(code, ScatteringType::from_code),
            symbol(","),
            preceded(keyword("rgb"), vector3),
            preceded(keyword("extinction"), number),
        )),
    );
    let density = braced("density", preceded(keyword("rgb"), vector3));

    braced(
        "interior",
        braced(
            "media",
            map(
                pair(scattering, density),
                |((scattering_type, _, color, extinction), density)| VolumetricMedium {
                    scattering_type,
                    color,
                    extinction,
                    density,
                },
            ),
        ),
    )(i)
}

fn transform(i: &str) -> Res<'_, Transform> {
    map(preceded(keyword("rotate"), vector3), Transform::Rotate)(i)
}

fn hollow(i: &str) -> Res<'_, &'static str> {
    value("hollow", keyword("hollow"))(i)
}

fn leaf_object(i: &str) -> Res<'_, LeafBody> {
    braced(
        "object",
        tuple((sphere, texture, opt(hollow), opt(interior), many0(transform))),
    )(i)
}

fn node_expr(i: &str) -> Res<'_, NodeExpr> {
    alt((
        map(braced("object", identifier), |name| {
            NodeExpr::Ref(name.to_string())
        }),
        map(braced("union", many1(node_expr)), NodeExpr::Union),
    ))(i)
}

fn declaration(i: &str) -> Res<'_, (&str, Declaration)> {
    preceded(
        keyword("#declare"),
        pair(
            terminated(identifier, symbol("=")),
            alt((
                map(leaf_object, Declaration::Leaf),
                map(node_expr, Declaration::Node),
            )),
        ),
    )(i)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"
// hand-written scene
#declare Ball = object {
  sphere { <0, 0, 0>, 2.5 }
  texture {
    pigment { rgbt <1, 0.5, 0, 0> }
    finish { diffuse 0.6 }
  }
}

#declare Shell = object {
  sphere { <0, 0, 0>, 3 }
  texture { pigment { rgbt <0, 0, 0, 1> } finish { } }
  hollow
  interior { media {
    scattering { 4, rgb <0.25, 0.5, 1> extinction 1 }
    density { rgb <0.001, 0.001, 0.001> }
  } }
}

#declare Planet = union { object { Ball } object { Shell } }
"#;

    #[test]
    fn test_parse_small_scene() {
        let scene = parse(SMALL).unwrap();
        assert_eq!(scene.leaf_count(), 2);

        let ball = scene.leaf("Ball").unwrap();
        assert_eq!(ball.primitive.radius(), 2.5);
        assert_eq!(ball.solidity, Solidity::Solid);
        assert_eq!(ball.material.finish.diffuse, Some(0.6));
        assert_eq!(ball.material.finish.ambient, None);

        let shell = scene.leaf("Shell").unwrap();
        assert_eq!(shell.solidity, Solidity::Hollow);
        let medium = shell.interior.as_ref().unwrap();
        assert_eq!(medium.scattering_type, ScatteringType::Rayleigh);
        assert_eq!(medium.color, DVec3::new(0.25, 0.5, 1.0));
    }

    #[test]
    fn test_parse_image_clauses() {
        let text = r#"
#declare Ground = object {
  sphere { <0, 0, 0>, 10 }
  texture {
    pigment { image_map { tiff "/img/color.tif" map_type 1 interpolate 2 transmit all 0.8 } }
    finish { ambient 0 specular 0.2 }
    normal { bump_map { png "/img/topo.png" map_type 1 interpolate 4 bump_size 0.05 } }
  }
  rotate <0, 25, 0>
}
"#;
        let scene = parse(text).unwrap();
        let ground = scene.leaf("Ground").unwrap();
        let Pigment::ImageMap(map) = &ground.material.pigment else {
            panic!("expected image map");
        };
        assert_eq!(map.image.format, ImageFormat::Tiff);
        assert_eq!(map.image.path, "/img/color.tif");
        assert_eq!(map.transmit_all, Some(0.8));
        let bump = ground.material.normal.as_ref().unwrap();
        assert_eq!(bump.image.interpolation, Interpolation::NormalizedDistance);
        assert_eq!(ground.transforms, [Transform::Rotate(DVec3::new(0.0, 25.0, 0.0))]);
        // A lone leaf declaration is its own root.
        assert!(matches!(scene.root(), SceneNode::Leaf(_)));
    }

    #[test]
    fn test_unknown_reference() {
        let err = parse("#declare Planet = union { object { Missing } }").unwrap_err();
        assert_eq!(err, ParseError::UnknownReference("Missing".to_string()));
    }

    #[test]
    fn test_empty_input_has_no_root() {
        assert_eq!(parse("  // nothing\n").unwrap_err(), ParseError::NoRoot);
    }

    #[test]
    fn test_syntax_error_reports_offset() {
        let err = parse("#declare Ball = object { cube { } }").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { offset: 0, .. }));
    }

    #[test]
    fn test_unknown_scattering_code_rejected() {
        let text = SMALL.replace("scattering { 4,", "scattering { 9,");
        assert!(matches!(parse(&text), Err(ParseError::Syntax { .. })));
    }

    #[test]
    fn test_duplicate_declaration_rejected() {
        let text = format!("{SMALL}\n#declare Ball = union {{ object {{ Shell }} }}");
        assert_eq!(
            parse(&text).unwrap_err(),
            ParseError::DuplicateDeclaration("Ball".to_string())
        );
    }

    #[test]
    fn test_keywords_need_boundaries() {
        // `rgbtx` is not `rgbt`.
        let text = SMALL.replace("rgbt <1, 0.5, 0, 0>", "rgbtx <1, 0.5, 0, 0>");
        assert!(parse(&text).is_err());
    }
}
