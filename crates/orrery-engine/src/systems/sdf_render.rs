use crate::components::entity::Entity;
use crate::renderer::camera::OrbitCamera;
use crate::renderer::sdf_instance::{SDFBuffer, SDFInstance};

/// Projected instance paired with its depth for sorting.
struct RenderItem {
    depth: f32,
    instance: SDFInstance,
}

/// Build the SDF instance buffer from visible entities with meshes.
///
/// Entities are projected through the camera and sorted back-to-front
/// (painter's algorithm) so the host can draw them in buffer order.
pub fn build_sdf_buffer<'a>(
    entities: impl Iterator<Item = &'a Entity>,
    camera: &OrbitCamera,
    buffer: &mut SDFBuffer,
) {
    let view_rot = camera.view_rotation();
    let mut items: Vec<RenderItem> = Vec::new();

    for entity in entities {
        if !entity.active || !entity.visible {
            continue;
        }
        let mesh = match &entity.mesh {
            Some(m) => m,
            None => continue,
        };
        if mesh.alpha <= 0.0 {
            continue;
        }
        let proj = match camera.project(entity.pos) {
            Some(p) => p,
            None => continue,
        };
        let girth = entity.scale.x.abs().max(entity.scale.z.abs());
        if girth <= 0.0 {
            continue;
        }
        let q = (view_rot * entity.orientation()).normalize();
        items.push(RenderItem {
            depth: proj.depth,
            instance: SDFInstance {
                x: proj.pos.x,
                y: proj.pos.y,
                radius: mesh.shape.radius() * girth * proj.scale,
                depth: proj.depth,
                r: mesh.color.r,
                g: mesh.color.g,
                b: mesh.color.b,
                alpha: mesh.alpha,
                accent_r: mesh.accent.r,
                accent_g: mesh.accent.g,
                accent_b: mesh.accent.b,
                energy: mesh.energy,
                shininess: mesh.shininess,
                emissive: mesh.emissive,
                shape: mesh.shape.shape_id(),
                stretch: mesh.shape.aspect() * entity.scale.y / girth,
                qx: q.x,
                qy: q.y,
                qz: q.z,
                qw: q.w,
            },
        });
    }

    // Farther first
    items.sort_by(|a, b| b.depth.partial_cmp(&a.depth).unwrap_or(std::cmp::Ordering::Equal));

    let dropped = buffer.fill(items.into_iter().map(|item| item.instance));
    if dropped > 0 {
        log::warn!("SDF buffer full, {} instances dropped", dropped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EntityId;
    use crate::components::mesh::{MeshComponent, SDFShape};
    use crate::core::color::Rgb;
    use glam::Vec3;

    fn camera() -> OrbitCamera {
        let mut cam = OrbitCamera::new(800.0, 600.0);
        cam.set_position(Vec3::new(0.0, 0.0, 100.0));
        cam
    }

    fn ball(id: u32, pos: Vec3) -> Entity {
        Entity::new(EntityId(id))
            .with_pos(pos)
            .with_mesh(MeshComponent::new(SDFShape::Sphere { radius: 2.0 }, Rgb::new(1.0, 0.0, 0.0)))
    }

    #[test]
    fn projects_mesh_entity() {
        let entities = vec![ball(1, Vec3::ZERO)];
        let mut buffer = SDFBuffer::with_capacity(16);
        build_sdf_buffer(entities.iter(), &camera(), &mut buffer);

        assert_eq!(buffer.instance_count(), 1);
        let inst = buffer.as_slice()[0];
        assert!((inst.x - 400.0).abs() < 1e-2);
        assert!((inst.y - 300.0).abs() < 1e-2);
        assert!(inst.radius > 0.0);
        assert_eq!(inst.r, 1.0);
        assert_eq!(inst.stretch, 1.0);
    }

    #[test]
    fn skips_hidden_inactive_and_meshless() {
        let e1 = Entity::new(EntityId(1));
        let mut e2 = ball(2, Vec3::ZERO);
        e2.active = false;
        let e3 = ball(3, Vec3::ZERO).with_visible(false);
        let e4 = ball(4, Vec3::ZERO);

        let entities = vec![e1, e2, e3, e4];
        let mut buffer = SDFBuffer::with_capacity(16);
        build_sdf_buffer(entities.iter(), &camera(), &mut buffer);
        assert_eq!(buffer.instance_count(), 1);
    }

    #[test]
    fn sorts_back_to_front() {
        let entities = vec![ball(1, Vec3::new(0.0, 0.0, 40.0)), ball(2, Vec3::new(0.0, 0.0, -40.0))];
        let mut buffer = SDFBuffer::with_capacity(16);
        build_sdf_buffer(entities.iter(), &camera(), &mut buffer);

        let s = buffer.as_slice();
        assert_eq!(s.len(), 2);
        assert!(s[0].depth > s[1].depth);
        assert!(s[0].radius < s[1].radius);
    }

    #[test]
    fn stretch_follows_y_scale() {
        let e = ball(1, Vec3::ZERO).with_scale(Vec3::new(1.0, 3.0, 1.0));
        let mut buffer = SDFBuffer::with_capacity(16);
        build_sdf_buffer(std::iter::once(&e), &camera(), &mut buffer);
        assert_eq!(buffer.as_slice()[0].stretch, 3.0);
    }
}
