use sbtig_config::Config;
use sbtig_scene::{
    Layer, PlanetParams, PlanetSceneBuilder, SceneError, SceneNode, Solidity, compute_scattering,
    rayleigh_color, sdl,
};

fn scene_from_config(config: &Config) -> Result<sbtig_scene::PlanetScene, SceneError> {
    let params = PlanetParams::from_config(config)?;
    PlanetSceneBuilder::new(params).build()
}

fn radius(scene: &sbtig_scene::PlanetScene, layer: Layer) -> f64 {
    scene
        .leaf(layer.declaration_name())
        .unwrap()
        .primitive
        .radius()
}

#[test]
fn earth_scenario_from_default_config() {
    let scene = scene_from_config(&Config::default()).unwrap();

    assert_eq!(scene.leaf_count(), 3);
    assert_eq!(radius(&scene, Layer::Surface), 6371.0);
    assert_eq!(radius(&scene, Layer::Clouds), 6381.0);
    assert_eq!(radius(&scene, Layer::Atmosphere), 6421.0);

    let medium = scene.leaf("Atmosphere").unwrap().interior.clone().unwrap();
    let expected = [(460.0_f64 / 650.0).powi(4), (460.0_f64 / 555.0).powi(4), 1.0];
    assert_eq!(medium.color.to_array(), expected);
    assert_eq!(medium.color, rayleigh_color());
}

#[test]
fn scattering_shell_matches_model() {
    let scene = scene_from_config(&Config::default()).unwrap();
    let shell = compute_scattering(6371.0);
    let atmosphere = scene.leaf("Atmosphere").unwrap();
    assert_eq!(atmosphere.primitive.radius(), shell.shell_radius);
    assert_eq!(atmosphere.interior.as_ref(), Some(&shell.medium));
}

#[test]
fn hollow_leaves_carry_medium_only_for_atmosphere() {
    let scene = scene_from_config(&Config::default()).unwrap();
    for leaf in scene.leaves() {
        if leaf.interior.is_some() {
            assert_eq!(leaf.solidity, Solidity::Hollow, "{} has a medium", leaf.name);
            assert_eq!(leaf.name, "Atmosphere");
        }
    }
}

#[test]
fn disabling_scattering_leaves_surface_and_clouds() {
    let mut config = Config::default();
    config.resolution_configuration.modelize_scattering = false;
    let scene = scene_from_config(&config).unwrap();

    let names: Vec<&str> = scene.leaves().iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, ["Clouds", "Surface"]);
}

#[test]
fn invalid_radius_from_config_fails() {
    let mut config = Config::default();
    config.planet.radius = 0.0;
    assert!(matches!(
        scene_from_config(&config),
        Err(SceneError::NonPositiveRadius { .. })
    ));

    config.planet.radius = -1.0;
    assert!(scene_from_config(&config).is_err());
}

#[test]
fn emitted_scene_parses_back_to_same_structure() {
    let scene = scene_from_config(&Config::default()).unwrap();
    let text = sdl::emit(&scene);
    let parsed = sdl::parse(&text).unwrap();
    assert_eq!(parsed, scene);
}

#[test]
fn round_trip_without_scattering_and_custom_values() {
    let mut config = Config::default();
    config.resolution_configuration.modelize_scattering = false;
    config.planet.radius = 3389.5;
    config.planet.surface_rotation_deg = -12.75;
    config.planet.cloud_finish.roughness = Some(0.125);
    config.planet.surface_finish.ambient = None;
    let scene = scene_from_config(&config).unwrap();

    let parsed = sdl::parse(&sdl::emit(&scene)).unwrap();
    assert_eq!(parsed, scene);
}

#[test]
fn parse_ignores_formatting() {
    let scene = scene_from_config(&Config::default()).unwrap();
    let text = sdl::emit(&scene);
    let squashed: String = text
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n  // reformatted\n");
    assert_eq!(sdl::parse(&squashed).unwrap(), scene);
}

#[test]
fn repeated_builds_emit_identical_text() {
    let config = Config::default();
    let first = sdl::emit(&scene_from_config(&config).unwrap());
    let second = sdl::emit(&scene_from_config(&config).unwrap());
    assert_eq!(first, second);
}

#[test]
fn scene_serializes_as_ron() {
    let scene = scene_from_config(&Config::default()).unwrap();
    let text = ron::to_string(&scene).unwrap();
    assert!(text.contains("Rayleigh"));
    assert!(matches!(scene.root(), SceneNode::Group(children) if children.len() == 2));
}
