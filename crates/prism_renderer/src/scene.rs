//! Scene: a material registry plus the objects that reference it.

use crate::{
    hittable::{HitRecord, Hittable},
    Material, MaterialId, SceneError, Sphere,
};
use prism_math::{Interval, Point, Ray};
use std::sync::atomic::{AtomicU64, Ordering};

// Zero is left for `MaterialId::default()`
static NEXT_SCENE_ID: AtomicU64 = AtomicU64::new(1);

fn next_scene_id() -> u64 {
    NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed)
}

/// A collection of objects acting as one aggregate hittable.
///
/// The scene owns its materials; objects refer to them through the
/// [`MaterialId`] handles returned by [`Scene::register_material`], so a
/// material always outlives every hit record that names it.
#[derive(Debug, Clone)]
pub struct Scene {
    id: u64,
    materials: Vec<Material>,
    objects: Vec<Sphere>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            id: next_scene_id(),
            materials: Vec::new(),
            objects: Vec::new(),
        }
    }
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a material and return its handle.
    pub fn register_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId {
            scene: self.id,
            index: self.materials.len() - 1,
        }
    }

    /// Look up a registered material.
    ///
    /// Returns `None` for handles issued by another scene, or before the
    /// last [`Scene::clear`].
    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        if id.scene != self.id {
            return None;
        }
        self.materials.get(id.index)
    }

    /// Add a sphere whose material must already be registered here.
    pub fn add(&mut self, sphere: Sphere) -> Result<(), SceneError> {
        if self.material(sphere.material()).is_none() {
            return Err(SceneError::UnknownMaterial(sphere.material()));
        }
        self.objects.push(sphere);
        Ok(())
    }

    /// Build and add a sphere in one step.
    pub fn add_sphere(
        &mut self,
        center: Point,
        radius: f64,
        material: MaterialId,
    ) -> Result<(), SceneError> {
        self.add(Sphere::new(center, radius, material)?)
    }

    /// Objects in insertion order.
    pub fn objects(&self) -> &[Sphere] {
        &self.objects
    }

    /// Number of registered materials.
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the scene has no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Remove all objects and materials. Handles issued so far are retired.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.materials.clear();
        self.id = next_scene_id();
    }
}

impl Hittable for Scene {
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        // Every child is tested against a range that shrinks to the best hit so far
        for object in &self.objects {
            let interval = Interval::new(ray_t.min, closest_so_far);
            if object.hit(ray, interval, rec) {
                hit_anything = true;
                closest_so_far = rec.t;
            }
        }

        hit_anything
    }
}
