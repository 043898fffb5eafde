use std::fs;
use std::path::PathBuf;
use std::process;

use prism_core::RenderConfig;
use prism_renderer::{build_world, render, Camera, ImageBuffer, RenderSettings};
use rand::rngs::StdRng;
use rand::SeedableRng;

const CONFIG: &str = r#"{
    "file_name": "scene.ppm",
    "img_width": 24,
    "aspect": 2.0,
    "samples_per_pixel": 3,
    "max_depth": 6,
    "seed": 99,
    "workers": 2,
    "camera": {
        "look_from": {"x": 0, "y": 1, "z": 4},
        "look_at": [0, 0, -1],
        "vfov": 45,
        "aperture": 0.05,
        "focus_dist": 5
    },
    "world": {
        "random": false,
        "static": [
            {"type": "sphere", "center": [0, -100.5, -1], "radius": 100,
             "mat": {"type": "lambertian", "albedo": [0.8, 0.8, 0.0]}},
            {"type": "sphere", "center": {"x": 0, "y": 0, "z": -1}, "radius": 0.5,
             "mat": {"type": "metal", "albedo": [0.8, 0.6, 0.2], "fuzz": 0.2}},
            {"type": "triangle", "v0": [-2, 0, -2], "v1": [-1, 0, -2], "v2": [-1.5, 1, -2],
             "mat": {"type": "dielectric", "refindex": 1.5}},
            {"type": "rectangle", "a": [1, -0.5, -2], "w": [2, -0.5, -2], "h": [0, 1, 0],
             "material": {"type": "lambertian", "albedo": [0.1, 0.2, 0.5]}}
        ]
    }
}"#;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("prism-{}-{name}", process::id()))
}

fn render_config(config: &RenderConfig) -> ImageBuffer {
    let seed = config.seed_or_clock();
    let primitives = config.world.primitives(&mut StdRng::seed_from_u64(seed));
    let world = build_world(&primitives);
    let camera = Camera::from_description(&config.camera, config.pixel_aspect_ratio());

    let settings = RenderSettings {
        image_width: config.img_width,
        image_height: config.image_height(),
        samples_per_pixel: config.samples_per_pixel,
        max_depth: config.max_depth,
        workers: config.workers,
        seed: Some(seed),
    };
    let pixels = render(&world, &camera, &settings).unwrap();
    ImageBuffer::from_pixels(
        settings.image_width,
        settings.image_height,
        &pixels,
        settings.samples_per_pixel,
    )
    .unwrap()
}

#[test]
fn config_to_ppm() {
    let config = RenderConfig::from_json(CONFIG).unwrap();
    assert_eq!(config.image_height(), 12);
    assert_eq!(config.world.primitives(&mut StdRng::seed_from_u64(0)).len(), 4);

    let image = render_config(&config);
    assert_eq!((image.width(), image.height()), (24, 12));

    let path = temp_path("scene.ppm");
    image.save(&path).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    fs::remove_file(&path).ok();

    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("P3"));
    assert_eq!(lines.next(), Some("24 12"));
    assert_eq!(lines.next(), Some("255"));

    let rows: Vec<_> = lines.collect();
    assert_eq!(rows.len(), 24 * 12);
    for row in rows {
        let channels: Vec<u32> = row.split(' ').map(|v| v.parse().unwrap()).collect();
        assert_eq!(channels.len(), 3);
        assert!(channels.iter().all(|&c| c <= 255));
    }
}

#[test]
fn config_to_png() {
    let config = RenderConfig::from_json(CONFIG).unwrap();
    let image = render_config(&config);

    let path = temp_path("scene.png");
    image.save(&path).unwrap();

    let decoded = image::open(&path).unwrap().to_rgb8();
    fs::remove_file(&path).ok();

    assert_eq!(decoded.dimensions(), (24, 12));
    assert_eq!(decoded.into_raw(), image.to_rgb8());
}

#[test]
fn invalid_config_fails_before_rendering() {
    let bad = CONFIG.replace("\"fuzz\": 0.2", "\"fuzz\": 1.5");
    let err = RenderConfig::from_json(&bad).unwrap_err();
    assert!(err.to_string().contains("fuzz"), "{err}");

    let unknown = CONFIG.replace("\"type\": \"metal\"", "\"type\": \"plastic\"");
    assert!(RenderConfig::from_json(&unknown).is_err());
}
