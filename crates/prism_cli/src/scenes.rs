//! Built-in demo scenes.

use clap::ValueEnum;
use prism_math::sampling::{gen_f64, gen_range, random_vector};
use prism_renderer::{Color, Material, Point, RenderSettings, Scene, SceneError, Vector};
use rand::RngCore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// Ground plane, a grid of small random spheres and three large ones
    Showcase,
    /// Three spheres on a ground sphere, shot with depth of field
    Simple,
}

impl SceneKind {
    /// Camera and quality settings that frame this scene.
    pub fn default_settings(self) -> RenderSettings {
        match self {
            SceneKind::Showcase => RenderSettings {
                image_width: 1200,
                image_height: 675,
                samples_num: 100,
                render_depth: 50,
                vfov: 40.0,
                lookfrom: Point::new(13.0, 2.0, 3.0),
                lookat: Point::ZERO,
                vup: Vector::Y,
                defocus_angle: 0.0,
                focus_dist: 10.0,
                seed: None,
            },
            SceneKind::Simple => RenderSettings {
                image_width: 800,
                image_height: 450,
                samples_num: 100,
                render_depth: 50,
                vfov: 20.0,
                lookfrom: Point::new(-2.0, 2.0, 1.0),
                lookat: Point::new(0.0, 0.0, -1.0),
                vup: Vector::Y,
                defocus_angle: 10.0,
                focus_dist: 3.4,
                seed: None,
            },
        }
    }

    pub fn build(self, rng: &mut dyn RngCore) -> Result<Scene, SceneError> {
        match self {
            SceneKind::Showcase => showcase(rng),
            SceneKind::Simple => simple(),
        }
    }
}

fn showcase(rng: &mut dyn RngCore) -> Result<Scene, SceneError> {
    let mut scene = Scene::new();

    let ground = scene.register_material(Material::matte(Color::splat(0.5)));
    scene.add_sphere(Point::new(0.0, -10000.0, 0.0), 10000.0, ground)?;

    // Small spheres, kept clear of the metal sphere
    for a in -15..11 {
        for b in -15..11 {
            let choose_mat = gen_f64(rng);
            let center = Point::new(
                a as f64 + 0.9 * gen_f64(rng),
                0.2,
                b as f64 + 0.9 * gen_f64(rng),
            );

            if (center - Point::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let material = if choose_mat < 0.8 {
                let albedo = random_vector(rng, 0.0, 1.0) * random_vector(rng, 0.0, 1.0);
                Material::matte(albedo)
            } else if choose_mat < 0.91 {
                let albedo = random_vector(rng, 0.5, 1.0);
                Material::metal(albedo, gen_range(rng, 0.0, 0.4))
            } else {
                Material::glass(1.5)?
            };

            let id = scene.register_material(material);
            scene.add_sphere(center, 0.2, id)?;
        }
    }

    let glass = scene.register_material(Material::glass(1.5)?);
    scene.add_sphere(Point::new(0.0, 1.0, 0.0), 1.0, glass)?;

    let matte = scene.register_material(Material::matte(Color::new(0.4, 0.2, 0.1)));
    scene.add_sphere(Point::new(-4.0, 1.0, 0.0), 1.0, matte)?;

    let metal = scene.register_material(Material::metal(Color::new(0.7, 0.6, 0.5), 0.0));
    scene.add_sphere(Point::new(4.0, 1.0, 0.0), 1.0, metal)?;

    log::info!(
        "Built showcase scene: {} objects, {} materials",
        scene.len(),
        scene.material_count()
    );
    Ok(scene)
}

fn simple() -> Result<Scene, SceneError> {
    let mut scene = Scene::new();

    let ground = scene.register_material(Material::matte(Color::new(0.8, 0.8, 0.0)));
    let center = scene.register_material(Material::matte(Color::new(0.1, 0.2, 0.5)));
    let left = scene.register_material(Material::glass(1.5)?);
    let bubble = scene.register_material(Material::glass(1.0 / 1.5)?);
    let right = scene.register_material(Material::metal(Color::new(0.8, 0.6, 0.2), 1.0));

    scene.add_sphere(Point::new(0.0, -100.5, -1.0), 100.0, ground)?;
    scene.add_sphere(Point::new(0.0, 0.0, -1.2), 0.5, center)?;
    scene.add_sphere(Point::new(-1.0, 0.0, -1.0), 0.5, left)?;
    scene.add_sphere(Point::new(-1.0, 0.0, -1.0), 0.4, bubble)?;
    scene.add_sphere(Point::new(1.0, 0.0, -1.0), 0.5, right)?;

    log::info!("Built simple scene: {} objects", scene.len());
    Ok(scene)
}
