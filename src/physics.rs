use glam::Vec3;
use rapier3d::prelude::*;

/// Collision group for the character's own capsule. Ground probes never include it.
pub const CHARACTER_GROUP: Group = Group::GROUP_32;

fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

fn to_vec3(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// Rapier world holding static ground and dynamic character bodies.
pub struct PhysicsWorld {
    pub gravity: Vector<Real>,
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    pub fn new(gravity_y: f32) -> Self {
        Self {
            gravity: vector![0.0, -gravity_y, 0.0],
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Static box collider on the given layer bits.
    pub fn add_ground_box(&mut self, center: Vec3, half_extents: Vec3, layer: u32) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(to_vector(center))
            .collision_groups(InteractionGroups::new(
                Group::from_bits_truncate(layer),
                Group::ALL,
            ))
            .friction(0.0)
            .build();
        let handle = self.collider_set.insert(collider);
        self.query_pipeline.update(&self.collider_set);
        handle
    }

    /// Dynamic capsule body standing with its origin at `spawn`. `height` is the full capsule height.
    pub fn add_character(&mut self, spawn: Vec3, height: f32, radius: f32) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(to_vector(spawn))
            .build();
        let handle = self.rigid_body_set.insert(body);

        // half_height is the cylinder part: total = 2 * half_height + 2 * radius
        let half_height = (height / 2.0 - radius).max(0.0);
        let collider = ColliderBuilder::capsule_y(half_height, radius)
            .collision_groups(InteractionGroups::new(CHARACTER_GROUP, Group::ALL))
            .friction(0.0)
            .build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        self.query_pipeline.update(&self.collider_set);
        handle
    }

    /// Hand vertical control to the caller: no engine gravity, no tipping over.
    pub fn disable_gravity(&mut self, handle: RigidBodyHandle) -> bool {
        let Some(body) = self.rigid_body_set.get_mut(handle) else {
            return false;
        };
        body.set_gravity_scale(0.0, true);
        body.lock_rotations(true, true);
        true
    }

    pub fn linear_velocity(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set.get(handle).map(|body| to_vec3(body.linvel()))
    }

    pub fn set_linear_velocity(&mut self, handle: RigidBodyHandle, velocity: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_linvel(to_vector(velocity), true);
        }
    }

    pub fn translation(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set
            .get(handle)
            .map(|body| to_vec3(body.translation()))
    }

    /// Downward ray from the body origin, hitting only colliders on `layer`.
    pub fn probe_ground(&self, handle: RigidBodyHandle, max_distance: f32, layer: u32) -> bool {
        let Some(body) = self.rigid_body_set.get(handle) else {
            return false;
        };
        let origin = body.translation();
        let ray = Ray::new(point![origin.x, origin.y, origin.z], vector![0.0, -1.0, 0.0]);

        let filter = QueryFilter::default()
            .exclude_rigid_body(handle)
            .exclude_sensors()
            .groups(InteractionGroups::new(
                Group::ALL,
                Group::from_bits_truncate(layer),
            ));

        self.query_pipeline
            .cast_ray(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                filter,
            )
            .is_some()
    }

    /// Steps the simulation forward by dt seconds
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYER: u32 = 0b0001;

    fn world_with_floor() -> PhysicsWorld {
        let mut world = PhysicsWorld::new(20.0);
        // top face at y = 0
        world.add_ground_box(Vec3::new(0.0, -0.5, 0.0), Vec3::new(50.0, 0.5, 50.0), LAYER);
        world
    }

    #[test]
    fn test_probe_hits_floor_within_reach() {
        let mut world = world_with_floor();
        let body = world.add_character(Vec3::new(0.0, 1.0, 0.0), 2.0, 0.5);
        assert!(world.probe_ground(body, 1.01, LAYER));
    }

    #[test]
    fn test_probe_misses_when_high() {
        let mut world = world_with_floor();
        let body = world.add_character(Vec3::new(0.0, 5.0, 0.0), 2.0, 0.5);
        assert!(!world.probe_ground(body, 1.01, LAYER));
    }

    #[test]
    fn test_probe_ignores_other_layers() {
        let mut world = PhysicsWorld::new(20.0);
        world.add_ground_box(Vec3::new(0.0, -0.5, 0.0), Vec3::new(50.0, 0.5, 50.0), 0b0100);
        let body = world.add_character(Vec3::new(0.0, 1.0, 0.0), 2.0, 0.5);
        assert!(!world.probe_ground(body, 1.01, LAYER));
        assert!(world.probe_ground(body, 1.01, 0b0100));
    }

    #[test]
    fn test_probe_ignores_own_capsule() {
        let mut world = PhysicsWorld::new(20.0);
        let body = world.add_character(Vec3::new(0.0, 1.0, 0.0), 2.0, 0.5);
        assert!(!world.probe_ground(body, 1.01, u32::MAX));
    }

    #[test]
    fn test_velocity_roundtrip_and_gravity_off() {
        let mut world = PhysicsWorld::new(20.0);
        let body = world.add_character(Vec3::new(0.0, 10.0, 0.0), 2.0, 0.5);
        assert!(world.disable_gravity(body));
        world.set_linear_velocity(body, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(world.linear_velocity(body), Some(Vec3::new(1.0, 0.0, 0.0)));

        for _ in 0..10 {
            world.step(1.0 / 60.0);
        }
        let velocity = world.linear_velocity(body).unwrap();
        assert!(velocity.y.abs() < 1e-4);
        let position = world.translation(body).unwrap();
        assert!(position.x > 0.1);
        assert!((position.y - 10.0).abs() < 1e-3);
    }
}
