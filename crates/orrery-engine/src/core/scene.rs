use crate::api::types::EntityId;
use crate::components::entity::Entity;

/// Flat entity store. The orrery holds a few hundred bodies at most, so
/// lookups are linear scans and removal does not preserve order.
pub struct Scene {
    entities: Vec<Entity>,
}

impl Scene {
    pub fn new() -> Self {
        Self { entities: Vec::with_capacity(256) }
    }

    pub fn spawn(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let slot = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.swap_remove(slot))
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Entities whose tag equals `tag`.
    pub fn tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Entity> + 'a {
        self.entities.iter().filter(move |e| e.tag == tag)
    }

    /// Show or hide a whole group. Returns the group size.
    pub fn set_visible_by_tag(&mut self, tag: &str, visible: bool) -> usize {
        let mut touched = 0;
        for e in self.entities.iter_mut().filter(|e| e.tag == tag) {
            e.visible = visible;
            touched += 1;
        }
        touched
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn solar() -> Scene {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_tag("star"));
        for i in 2..5 {
            scene.spawn(Entity::new(EntityId(i)).with_tag("planet").with_pos(Vec3::X * i as f32 * 10.0));
        }
        scene
    }

    #[test]
    fn lookup_by_id_after_swap_remove() {
        let mut scene = solar();
        assert!(scene.despawn(EntityId(2)).is_some());
        assert!(scene.despawn(EntityId(2)).is_none());
        assert_eq!(scene.len(), 3);
        assert_eq!(scene.get(EntityId(4)).map(|e| e.pos), Some(Vec3::X * 40.0));
        scene.get_mut(EntityId(3)).unwrap().pos = Vec3::ZERO;
        assert_eq!(scene.get(EntityId(3)).unwrap().pos, Vec3::ZERO);
    }

    #[test]
    fn group_visibility() {
        let mut scene = solar();
        assert_eq!(scene.tagged("planet").count(), 3);
        assert_eq!(scene.set_visible_by_tag("planet", false), 3);
        assert!(scene.tagged("planet").all(|e| !e.visible));
        assert!(scene.tagged("star").all(|e| e.visible));
        assert_eq!(scene.set_visible_by_tag("comet", false), 0);
        scene.clear();
        assert!(scene.is_empty());
    }
}
