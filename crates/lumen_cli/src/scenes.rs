//! Catalogue of programmatic demo scenes.

use std::f32::consts::FRAC_PI_4;
use std::path::Path;
use std::sync::Arc;

use clap::ValueEnum;
use lumen_renderer::random::{gen_f32, gen_range, random_vec};
use lumen_renderer::{
    Background, BvhNode, Camera, Circle, Color, ConstantMedium, Cuboid, Cylinder, DefaultChecker,
    Dielectric, DiffuseLight, FaceMaterials, Hittable, HittableList, ImageTexture, Lambertian,
    Material, Metal, PerlinTexture, Quad, RenderResult, Rotate, Sphere, Texture, Translate,
    Triangle, Vec3,
};
use rand::RngCore;

/// Scenes selectable with `--scene`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    ThreeLambertianSpheres,
    ThreeMetalSpheres,
    ThreeDielectricSpheres,
    ThreeLambertianQuads,
    ThreeMetalQuads,
    ThreeDielectricQuads,
    ThreeLambertianCircles,
    ThreeMetalCircles,
    ThreeDielectricCircles,
    /// Random small spheres tested one by one
    SpheresWorld,
    /// Random small spheres behind a BVH
    SpheresWorldBvh,
    Lights,
    Cornell,
    /// Cylinders, triangles and a box with per-face materials
    Shapes,
    /// Box field, textured and volumetric spheres, rotated sphere cluster
    Final,
}

/// A world plus the camera and render defaults it was designed for.
pub struct Scene {
    pub world: Arc<dyn Hittable>,
    pub camera: Camera,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    pub background: Background,
}

/// Build a scene. `rng` drives every random placement and the noise tables.
pub fn build(
    kind: SceneKind,
    texture_path: Option<&Path>,
    rng: &mut dyn RngCore,
) -> RenderResult<Scene> {
    use SceneKind::*;

    let scene = match kind {
        ThreeLambertianSpheres => three_objects(Shape::Sphere, Surface::Lambertian, texture_path, rng),
        ThreeMetalSpheres => three_objects(Shape::Sphere, Surface::Metal, texture_path, rng),
        ThreeDielectricSpheres => three_objects(Shape::Sphere, Surface::Dielectric, texture_path, rng),
        ThreeLambertianQuads => three_objects(Shape::Quad, Surface::Lambertian, texture_path, rng),
        ThreeMetalQuads => three_objects(Shape::Quad, Surface::Metal, texture_path, rng),
        ThreeDielectricQuads => three_objects(Shape::Quad, Surface::Dielectric, texture_path, rng),
        ThreeLambertianCircles => three_objects(Shape::Circle, Surface::Lambertian, texture_path, rng),
        ThreeMetalCircles => three_objects(Shape::Circle, Surface::Metal, texture_path, rng),
        ThreeDielectricCircles => three_objects(Shape::Circle, Surface::Dielectric, texture_path, rng),
        SpheresWorld => spheres_world(false, rng),
        SpheresWorldBvh => spheres_world(true, rng),
        Lights => lights(rng),
        Cornell => cornell()?,
        Shapes => shapes(rng)?,
        Final => final_scene(texture_path, rng)?,
    };

    log::info!("Built scene {:?}", kind);
    Ok(scene)
}

/// Image texture from `path`, or the default checker when none is given.
fn surface_texture(path: Option<&Path>) -> Arc<dyn Texture> {
    match path {
        Some(path) => Arc::new(ImageTexture::new(path)),
        None => Arc::new(DefaultChecker::new()),
    }
}

fn lambertian(albedo: Color) -> Arc<dyn Material> {
    Arc::new(Lambertian::new(albedo))
}

#[derive(Clone, Copy)]
enum Shape {
    Sphere,
    Quad,
    Circle,
}

#[derive(Clone, Copy)]
enum Surface {
    Lambertian,
    Metal,
    Dielectric,
}

/// Left plain, centre white textured, right blue textured.
fn three_materials(surface: Surface, texture: Arc<dyn Texture>) -> [Arc<dyn Material>; 3] {
    let blue = Color::new(0.0, 0.5, 0.8);
    match surface {
        Surface::Lambertian => [
            Arc::new(Lambertian::new(blue)),
            Arc::new(Lambertian::with_texture(Color::ONE, texture.clone())),
            Arc::new(Lambertian::with_texture(blue, texture)),
        ],
        Surface::Metal => [
            Arc::new(Metal::new(blue, 0.0)),
            Arc::new(Metal::with_texture(Color::ONE, texture.clone(), 0.0)),
            Arc::new(Metal::with_texture(blue, texture, 0.0)),
        ],
        Surface::Dielectric => [
            Arc::new(Dielectric::with_albedo(1.5, blue)),
            Arc::new(Dielectric::with_texture(1.5, Color::ONE, texture.clone())),
            Arc::new(Dielectric::with_texture(1.5, blue, texture)),
        ],
    }
}

/// One shared object instanced three times with different materials.
fn three_objects(
    shape: Shape,
    surface: Surface,
    texture_path: Option<&Path>,
    rng: &mut dyn RngCore,
) -> Scene {
    let perlin: Arc<dyn Texture> = Arc::new(PerlinTexture::new(rng));
    let ground_mat = Arc::new(Lambertian::with_texture(Color::splat(0.5), perlin));
    // Every instance overrides this
    let placeholder = lambertian(Color::splat(0.5));

    let object: Arc<dyn Hittable> = match shape {
        Shape::Sphere => Arc::new(Sphere::new(Vec3::ZERO, 0.5, placeholder)),
        Shape::Quad => Arc::new(Rotate::new(
            Arc::new(Quad::new(
                Vec3::new(-0.5, -0.5, 0.0),
                Vec3::X,
                Vec3::Y,
                placeholder,
            )),
            Vec3::Y,
            FRAC_PI_4,
        )),
        Shape::Circle => Arc::new(Rotate::new(
            Arc::new(Circle::new(Vec3::ZERO, 0.5, Vec3::Z, placeholder)),
            Vec3::Y,
            FRAC_PI_4,
        )),
    };

    let mut world = HittableList::new();
    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        ground_mat,
    )));

    let offsets = [-1.0, 0.0, 1.0];
    for (x, material) in offsets
        .into_iter()
        .zip(three_materials(surface, surface_texture(texture_path)))
    {
        world.add(Arc::new(
            Translate::new(object.clone(), Vec3::new(x, 0.5, 0.0)).with_material(material),
        ));
    }

    Scene {
        world: Arc::new(world),
        camera: Camera::new()
            .with_resolution(1000, 600)
            .with_position(Vec3::new(0.0, 0.5, 5.0), Vec3::new(0.0, 0.3, 0.0), Vec3::Y)
            .with_fov(45.0),
        samples_per_pixel: 256,
        max_depth: 64,
        background: Background::sky(),
    }
}

/// The classic field of small random spheres around three large ones.
fn spheres_world(use_bvh: bool, rng: &mut dyn RngCore) -> Scene {
    let mut world = HittableList::new();
    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        lambertian(Color::splat(0.5)),
    )));

    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = gen_f32(rng);
            let center = Vec3::new(
                a as f32 + 0.9 * gen_f32(rng),
                0.2,
                b as f32 + 0.9 * gen_f32(rng),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let material: Arc<dyn Material> = if choose_mat < 0.8 {
                // diffuse
                let albedo = random_vec(rng, 0.0, 1.0) * random_vec(rng, 0.0, 1.0);
                lambertian(albedo)
            } else if choose_mat < 0.95 {
                // metal
                let albedo = random_vec(rng, 0.5, 1.0);
                let fuzz = gen_range(rng, 0.0, 0.5);
                Arc::new(Metal::new(albedo, fuzz))
            } else {
                glass.clone()
            };
            world.add(Arc::new(Sphere::new(center, 0.2, material)));
        }
    }

    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, glass)));
    world.add(Arc::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        lambertian(Color::new(0.4, 0.2, 0.1)),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    log::debug!("Spheres world holds {} objects", world.len());
    let world: Arc<dyn Hittable> = if use_bvh {
        Arc::new(BvhNode::from_list(&world))
    } else {
        Arc::new(world)
    };

    Scene {
        world,
        camera: Camera::new()
            .with_resolution(1200, 1000)
            .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
            .with_fov(90.0),
        samples_per_pixel: 1024,
        max_depth: 128,
        background: Background::sky(),
    }
}

/// Noise-textured spheres lit by an area light and a small glowing sphere.
fn lights(rng: &mut dyn RngCore) -> Scene {
    let noise: Arc<dyn Texture> = Arc::new(PerlinTexture::new(rng));
    let marble: Arc<dyn Material> = Arc::new(Lambertian::textured(noise));
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(15.0)));

    let mut world = HittableList::new();
    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        marble.clone(),
    )));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, marble)));
    world.add(Arc::new(Quad::new(
        Vec3::new(3.0, 1.0, 0.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
        light.clone(),
    )));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 3.0, 0.0), 0.5, light)));

    Scene {
        world: Arc::new(world),
        camera: Camera::new()
            .with_resolution(1000, 800)
            .with_position(Vec3::new(5.0, 2.0, 15.0), Vec3::new(0.0, 0.5, 0.0), Vec3::Y)
            .with_fov(90.0),
        samples_per_pixel: 512,
        max_depth: 64,
        background: Background::black(),
    }
}

/// Rotated box of half extents `half`, turned by `degrees` about +Y and
/// moved to `offset`, reporting `material`.
fn placed_box(
    half: Vec3,
    degrees: f32,
    offset: Vec3,
    material: Arc<dyn Material>,
) -> RenderResult<Arc<dyn Hittable>> {
    let cuboid = Cuboid::new(-half, half, material.clone())?;
    let rotated = Rotate::y_degrees(Arc::new(cuboid), degrees);
    Ok(Arc::new(
        Translate::new(Arc::new(rotated), offset).with_material(material),
    ))
}

/// Five walls, a ceiling light and two rotated boxes.
fn cornell() -> RenderResult<Scene> {
    let red = lambertian(Color::new(0.65, 0.05, 0.05));
    let white = lambertian(Color::splat(0.73));
    let green = lambertian(Color::new(0.12, 0.45, 0.15));
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(15.0)));

    let depth = Vec3::new(0.0, 0.0, -555.0);
    let up = Vec3::new(0.0, 555.0, 0.0);
    let across = Vec3::new(555.0, 0.0, 0.0);

    let objects: Vec<Arc<dyn Hittable>> = vec![
        Arc::new(Quad::new(Vec3::ZERO, depth, up, green)),
        Arc::new(Quad::new(Vec3::new(555.0, 0.0, 0.0), depth, up, red)),
        Arc::new(Quad::new(Vec3::new(0.0, 555.0, 0.0), across, depth, white.clone())),
        Arc::new(Quad::new(Vec3::ZERO, across, depth, white.clone())),
        Arc::new(Quad::new(Vec3::new(0.0, 0.0, -555.0), across, up, white.clone())),
        Arc::new(Quad::new(
            Vec3::new(225.0, 554.0, -225.0),
            Vec3::new(100.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -100.0),
            light,
        )),
        placed_box(
            Vec3::new(82.5, 165.0, 82.5),
            15.0,
            Vec3::new((265.0 + 82.5) / 2.0, 165.0, -(295.0 + 82.5)),
            white.clone(),
        )?,
        placed_box(
            Vec3::splat(82.5),
            -18.0,
            Vec3::new(265.0 + 82.5, 82.5, -(295.0 + 82.5) / 2.0),
            white,
        )?,
    ];

    Ok(Scene {
        world: Arc::new(BvhNode::new(objects)),
        camera: Camera::new()
            .with_resolution(800, 800)
            .with_position(
                Vec3::new(278.0, 278.0, 1500.0),
                Vec3::new(278.0, 278.0, 0.0),
                Vec3::Y,
            )
            .with_fov(45.0),
        samples_per_pixel: 128,
        max_depth: 64,
        background: Background::black(),
    })
}

/// Cylinders, a triangle pair and a box with one glowing face.
fn shapes(rng: &mut dyn RngCore) -> RenderResult<Scene> {
    let checker: Arc<dyn Texture> = Arc::new(DefaultChecker::new());
    let noise: Arc<dyn Texture> = Arc::new(PerlinTexture::new(rng));
    let ground = Arc::new(Lambertian::with_texture(Color::splat(0.8), checker));
    let copper: Arc<dyn Material> = Arc::new(Metal::new(Color::new(0.8, 0.5, 0.3), 0.2));
    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    let marble: Arc<dyn Material> = Arc::new(Lambertian::textured(noise));
    let lamp: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(4.0)));

    let mut world = HittableList::new();
    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        ground,
    )));

    world.add(Arc::new(Cylinder::new(
        Vec3::new(-1.2, 0.0, 0.0),
        Vec3::Y,
        1.2,
        0.4,
        copper,
    )));
    world.add(Arc::new(Rotate::new(
        Arc::new(Cylinder::new(Vec3::ZERO, Vec3::X, 0.8, 0.25, glass.clone())),
        Vec3::Z,
        FRAC_PI_4,
    )));

    // Two triangles folded into a tent
    let apex_a = Vec3::new(1.0, 1.0, -0.5);
    let apex_b = Vec3::new(1.0, 1.0, 0.5);
    world.add(Arc::new(Triangle::from_vertices(
        Vec3::new(0.6, 0.0, -0.5),
        Vec3::new(0.6, 0.0, 0.5),
        apex_b,
        marble.clone(),
    )));
    world.add(Arc::new(Triangle::from_vertices(
        Vec3::new(0.6, 0.0, -0.5),
        apex_b,
        apex_a,
        marble.clone(),
    )));
    world.add(Arc::new(Triangle::from_vertices(
        Vec3::new(1.4, 0.0, 0.5),
        Vec3::new(1.4, 0.0, -0.5),
        apex_a,
        glass,
    )));

    let faces: FaceMaterials = [
        marble.clone(),
        marble.clone(),
        marble.clone(),
        marble.clone(),
        lamp.clone(),
        marble,
    ];
    world.add(Arc::new(Rotate::y_degrees(
        Arc::new(Cuboid::with_face_materials(
            Vec3::new(-0.3, 0.0, -1.8),
            Vec3::new(0.3, 0.6, -1.2),
            faces,
        )?),
        20.0,
    )));

    world.add(Arc::new(Circle::new(
        Vec3::new(0.0, 3.0, 0.0),
        1.0,
        Vec3::NEG_Y,
        lamp,
    )));

    Ok(Scene {
        world: Arc::new(BvhNode::from_list(&world)),
        camera: Camera::new()
            .with_resolution(1000, 600)
            .with_position(Vec3::new(0.0, 1.5, 5.0), Vec3::new(0.0, 0.5, 0.0), Vec3::Y)
            .with_fov(45.0),
        samples_per_pixel: 256,
        max_depth: 64,
        background: Background::Solid(Color::splat(0.1)),
    })
}

/// Box field under a ceiling light with one of every material and texture.
fn final_scene(texture_path: Option<&Path>, rng: &mut dyn RngCore) -> RenderResult<Scene> {
    let ground = lambertian(Color::new(0.48, 0.83, 0.53));

    let mut objects: Vec<Arc<dyn Hittable>> = Vec::new();
    let boxes_per_side = 20;
    for i in 0..boxes_per_side {
        for j in 0..boxes_per_side {
            let w = 100.0;
            let x0 = -1000.0 + i as f32 * w;
            let z0 = -1000.0 + j as f32 * w;
            let y1 = gen_range(rng, 1.0, 101.0);
            objects.push(Arc::new(Cuboid::new(
                Vec3::new(x0, 0.0, z0),
                Vec3::new(x0 + w, y1, z0 + w),
                ground.clone(),
            )?));
        }
    }

    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(7.0)));
    objects.push(Arc::new(Quad::new(
        Vec3::new(123.0, 554.0, 147.0),
        Vec3::new(300.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 265.0),
        light,
    )));

    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    objects.push(Arc::new(Sphere::new(
        Vec3::new(400.0, 400.0, 200.0),
        50.0,
        lambertian(Color::new(0.7, 0.3, 0.1)),
    )));
    objects.push(Arc::new(Sphere::new(
        Vec3::new(260.0, 150.0, 45.0),
        50.0,
        glass.clone(),
    )));
    objects.push(Arc::new(Sphere::new(
        Vec3::new(0.0, 150.0, 145.0),
        50.0,
        Arc::new(Metal::new(Color::new(0.8, 0.8, 0.9), 1.0)),
    )));

    // Glass shell filled with blue smoke
    let boundary: Arc<dyn Hittable> =
        Arc::new(Sphere::new(Vec3::new(360.0, 150.0, 145.0), 70.0, glass));
    objects.push(boundary.clone());
    objects.push(Arc::new(ConstantMedium::new(
        boundary,
        0.2,
        lambertian(Color::new(0.2, 0.4, 0.9)),
    )));

    objects.push(Arc::new(Sphere::new(
        Vec3::new(400.0, 200.0, 400.0),
        100.0,
        Arc::new(Lambertian::textured(surface_texture(texture_path))),
    )));

    let noise: Arc<dyn Texture> = Arc::new(PerlinTexture::new(rng));
    objects.push(Arc::new(Sphere::new(
        Vec3::new(220.0, 280.0, 300.0),
        80.0,
        Arc::new(Lambertian::textured(noise)),
    )));

    let white = lambertian(Color::splat(0.73));
    let cluster: Vec<Arc<dyn Hittable>> = (0..1000)
        .map(|_| {
            Arc::new(Sphere::new(random_vec(rng, -82.5, 82.5), 10.0, white.clone()))
                as Arc<dyn Hittable>
        })
        .collect();
    let cluster = Rotate::y_degrees(Arc::new(BvhNode::new(cluster)), 15.0);
    objects.push(Arc::new(
        Translate::new(Arc::new(cluster), Vec3::new(-100.0, 270.0, 395.0)).with_material(white),
    ));

    Ok(Scene {
        world: Arc::new(BvhNode::new(objects)),
        camera: Camera::new()
            .with_resolution(1200, 1000)
            .with_position(
                Vec3::new(478.0, 278.0, -600.0),
                Vec3::new(278.0, 278.0, 0.0),
                Vec3::Y,
            )
            .with_fov(60.0),
        samples_per_pixel: 1024,
        max_depth: 64,
        background: Background::black(),
    })
}
