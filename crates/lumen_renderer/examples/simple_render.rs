//! Simple path tracer example.
//!
//! Renders three spheres on a ground plane and saves the result as PPM.
//!
//! ```text
//! cargo run --release -p lumen_renderer --example simple_render
//! ```

use std::sync::Arc;

use lumen_renderer::{
    render, Background, BvhNode, Camera, Color, Dielectric, Hittable, Lambertian, Material,
    Metal, RenderSettings, Sphere, Vec3,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    println!("Lumen Path Tracer - Simple Example");
    println!("==================================");

    // Build the scene
    let start = std::time::Instant::now();
    let world = build_scene();
    println!("Scene built in {:?}", start.elapsed());

    // Set up camera
    let mut camera = Camera::new()
        .with_resolution(400, 225)
        .with_position(
            Vec3::new(13.0, 2.0, 3.0), // look_from
            Vec3::new(0.0, 0.0, 0.0),  // look_at
            Vec3::new(0.0, 1.0, 0.0),  // vup
        )
        .with_fov(20.0);
    camera.initialize()?;

    let settings = RenderSettings {
        samples_per_pixel: 36,
        max_depth: 10,
        background: Background::sky(),
        ..Default::default()
    };

    let start = std::time::Instant::now();
    let image = render(&camera, &world, &settings)?;
    println!("Rendered in {:?}", start.elapsed());

    let filename = "output.ppm";
    image.save_ppm(filename)?;
    println!("Saved to {}", filename);

    Ok(())
}

fn build_scene() -> BvhNode {
    let ground: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5)));
    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    let brown: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1)));
    let steel: Arc<dyn Material> = Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0));

    let objects: Vec<Arc<dyn Hittable>> = vec![
        Arc::new(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, ground)),
        Arc::new(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, glass)),
        Arc::new(Sphere::new(Vec3::new(-4.0, 1.0, 0.0), 1.0, brown)),
        Arc::new(Sphere::new(Vec3::new(4.0, 1.0, 0.0), 1.0, steel)),
    ];

    BvhNode::new(objects)
}
