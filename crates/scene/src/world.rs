use crate::components::{Drawable3D, Light, Name, Transform, Visibility};
use crate::entity::EntityId;
use foundation::handles::Handle;

/// Flat component storage indexed by entity index.
///
/// Entities are spawned once during scene assembly and never despawned, so
/// a handle is just the slot index.
#[derive(Debug, Default)]
pub struct World {
    next_index: u32,
    transforms: Vec<Option<Transform>>,
    visibility: Vec<Option<Visibility>>,
    names: Vec<Option<Name>>,
    drawables_3d: Vec<Option<Drawable3D>>,
    lights: Vec<Option<Light>>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self) -> EntityId {
        let id = EntityId(Handle::new(self.next_index));
        self.next_index += 1;
        self.ensure_capacity(id.index() as usize);
        id
    }

    pub fn entity_count(&self) -> usize {
        self.next_index as usize
    }

    pub fn set_transform(&mut self, entity: EntityId, transform: Transform) {
        self.ensure_capacity(entity.index() as usize);
        self.transforms[entity.index() as usize] = Some(transform);
    }

    pub fn set_visibility(&mut self, entity: EntityId, visibility: Visibility) {
        self.ensure_capacity(entity.index() as usize);
        self.visibility[entity.index() as usize] = Some(visibility);
    }

    pub fn set_name(&mut self, entity: EntityId, name: Name) {
        self.ensure_capacity(entity.index() as usize);
        self.names[entity.index() as usize] = Some(name);
    }

    pub fn set_drawable_3d(&mut self, entity: EntityId, drawable: Drawable3D) {
        self.ensure_capacity(entity.index() as usize);
        self.drawables_3d[entity.index() as usize] = Some(drawable);
    }

    pub fn set_light(&mut self, entity: EntityId, light: Light) {
        self.ensure_capacity(entity.index() as usize);
        self.lights[entity.index() as usize] = Some(light);
    }

    pub fn transform(&self, entity: EntityId) -> Option<Transform> {
        self.transforms.get(entity.index() as usize).and_then(|t| *t)
    }

    pub fn name(&self, entity: EntityId) -> Option<Name> {
        self.names.get(entity.index() as usize).and_then(|n| *n)
    }

    pub fn drawable_3d(&self, entity: EntityId) -> Option<Drawable3D> {
        self.drawables_3d.get(entity.index() as usize).and_then(|d| *d)
    }

    pub fn is_visible(&self, entity: EntityId) -> bool {
        self.is_visible_index(entity.index() as usize)
    }

    /// Visible drawables with a transform, in entity index order.
    pub fn drawables_3d(&self) -> Vec<(EntityId, Transform, Drawable3D)> {
        let mut out = Vec::new();
        for (idx, drawable) in self.drawables_3d.iter().enumerate() {
            let Some(drawable) = drawable else { continue };
            let Some(transform) = self.transforms.get(idx).and_then(|t| *t) else {
                continue;
            };
            if !self.is_visible_index(idx) {
                continue;
            }

            out.push((EntityId(Handle::new(idx as u32)), transform, *drawable));
        }
        out
    }

    /// Lights of visible entities, in entity index order.
    pub fn lights(&self) -> Vec<Light> {
        self.lights
            .iter()
            .enumerate()
            .filter(|(idx, _)| self.is_visible_index(*idx))
            .filter_map(|(_, light)| *light)
            .collect()
    }

    fn is_visible_index(&self, idx: usize) -> bool {
        self.visibility
            .get(idx)
            .and_then(|v| *v)
            .map(|v| v.visible)
            .unwrap_or(true)
    }

    fn ensure_capacity(&mut self, idx: usize) {
        if self.transforms.len() <= idx {
            let new_len = idx + 1;
            self.transforms.resize(new_len, None);
            self.visibility.resize(new_len, None);
            self.names.resize(new_len, None);
            self.drawables_3d.resize(new_len, None);
            self.lights.resize(new_len, None);
        }
    }
}
