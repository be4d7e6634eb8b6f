use approx::assert_relative_eq;
use phys_bridge::{
    error::BridgeError, BodyHandle, BodyKind, Bridge, BridgeConfig, DistanceJointDef, Handle,
    HandleKind, JointHandle, Material, ShapeDescriptor, ShapeInfo, ShapeKind, Vec2, WorldHandle,
};

const DT: f32 = 1.0 / 60.0;

fn solid() -> Material {
    Material::new(0.3, 0.0, 1.0)
}

/// A world without gravity holding one dynamic ball at `(x, y)`
fn ball_world(bridge: &mut Bridge, x: f32, y: f32) -> (WorldHandle, BodyHandle) {
    let world = bridge.create_world(0.0, 0.0, false).unwrap();
    let body = bridge.create_body(world, BodyKind::Dynamic, x, y).unwrap();
    bridge
        .create_fixture(world, body, ShapeDescriptor::circle(0.5), solid())
        .unwrap();
    (world, body)
}

#[test]
fn test_handles_are_unique_per_kind() {
    let mut bridge = Bridge::new();
    let w1 = bridge.create_world(0.0, -10.0, true).unwrap();
    let w2 = bridge.create_world(0.0, -10.0, true).unwrap();
    assert_ne!(w1, w2);

    // Body handles are unique across worlds
    let a = bridge.create_body(w1, BodyKind::Dynamic, 0.0, 0.0).unwrap();
    let b = bridge.create_body(w2, BodyKind::Dynamic, 0.0, 0.0).unwrap();
    let c = bridge.create_body(w1, BodyKind::Static, 0.0, 0.0).unwrap();
    assert_ne!(a, b);
    assert_ne!(b, c);
    assert_ne!(a, c);

    let fa = bridge.create_fixture(w1, a, ShapeDescriptor::circle(1.0), solid()).unwrap();
    let fb = bridge.create_fixture(w2, b, ShapeDescriptor::circle(1.0), solid()).unwrap();
    assert_ne!(fa, fb);

    // Never negative
    for raw in [w1.to_raw(), w2.to_raw(), a.to_raw(), b.to_raw(), c.to_raw(), fa.to_raw(), fb.to_raw()] {
        assert!(raw >= 0);
    }
}

#[test]
fn test_released_handles_are_not_reissued() {
    let mut bridge = Bridge::new();
    let world = bridge.create_world(0.0, -10.0, true).unwrap();
    let first = bridge.create_body(world, BodyKind::Dynamic, 0.0, 0.0).unwrap();
    bridge.delete_body(world, first).unwrap();

    let second = bridge.create_body(world, BodyKind::Dynamic, 0.0, 0.0).unwrap();
    assert_ne!(first, second);
    assert_eq!(
        bridge.linear_velocity(world, first),
        Err(BridgeError::BodyNotFound(first))
    );
}

#[test]
fn test_world_settings_read_back() {
    let mut bridge = Bridge::new();
    let world = bridge.create_world(1.0, -9.8, false).unwrap();

    assert_eq!(bridge.gravity(world).unwrap(), Vec2::new(1.0, -9.8));
    assert!(!bridge.allows_sleep(world).unwrap());
    assert!(!bridge.is_continuous(world).unwrap());

    bridge.set_gravity(world, 0.0, -20.0).unwrap();
    bridge.set_continuous(world, true).unwrap();
    assert_eq!(bridge.gravity(world).unwrap(), Vec2::new(0.0, -20.0));
    assert!(bridge.is_continuous(world).unwrap());
}

#[test]
fn test_step_reports_every_body_once() {
    let mut bridge = Bridge::new();
    let world = bridge.create_world(0.0, -10.0, true).unwrap();
    let mut bodies = Vec::new();
    for i in 0..5 {
        let kind = if i == 0 { BodyKind::Static } else { BodyKind::Dynamic };
        let body = bridge.create_body(world, kind, i as f32 * 3.0, 10.0).unwrap();
        bridge.create_fixture(world, body, ShapeDescriptor::rect(1.0, 1.0), solid()).unwrap();
        bodies.push(body);
    }

    let snapshot = bridge.step(world, DT, 8, 3).unwrap();
    assert_eq!(snapshot.len(), bodies.len());
    for body in &bodies {
        assert_eq!(snapshot.iter().filter(|p| p.body == *body).count(), 1);
    }

    // Flat layout: count followed by four values per body
    let flat = snapshot.to_flat();
    assert_eq!(flat.len(), 1 + 4 * bodies.len());
    assert_eq!(flat[0], bodies.len() as f64);
}

#[test]
fn test_step_applies_gravity() {
    let mut bridge = Bridge::new();
    let world = bridge.create_world(0.0, -10.0, false).unwrap();
    let ground = bridge.create_body(world, BodyKind::Static, 0.0, 0.0).unwrap();
    let ball = bridge.create_body(world, BodyKind::Dynamic, 0.0, 10.0).unwrap();
    bridge.create_fixture(world, ball, ShapeDescriptor::circle(0.5), solid()).unwrap();

    let mut snapshot = bridge.step(world, DT, 8, 3).unwrap();
    for _ in 0..29 {
        snapshot = bridge.step(world, DT, 8, 3).unwrap();
    }

    let pose = snapshot.pose_of(ball).unwrap();
    assert!(pose.y < 10.0);
    assert!(bridge.linear_velocity(world, ball).unwrap().y < 0.0);

    // Static bodies never move
    let ground_pose = snapshot.pose_of(ground).unwrap();
    assert_relative_eq!(ground_pose.x, 0.0);
    assert_relative_eq!(ground_pose.y, 0.0);
}

#[test]
fn test_step_with_zero_dt_does_not_advance() {
    let mut bridge = Bridge::new();
    let world = bridge.create_world(0.0, -10.0, true).unwrap();
    let body = bridge.create_body(world, BodyKind::Dynamic, 2.0, 5.0).unwrap();
    bridge.create_fixture(world, body, ShapeDescriptor::circle(0.5), solid()).unwrap();

    let snapshot = bridge.step(world, 0.0, 8, 3).unwrap();
    let pose = snapshot.pose_of(body).unwrap();
    assert_relative_eq!(pose.x, 2.0);
    assert_relative_eq!(pose.y, 5.0);
    assert_eq!(bridge.registry().world(world).unwrap().step_count(), 0);
}

#[test]
fn test_step_rejects_bad_time_step() {
    let mut bridge = Bridge::new();
    let world = bridge.create_world(0.0, -10.0, true).unwrap();
    for dt in [-DT, f32::NAN, f32::INFINITY] {
        assert!(matches!(
            bridge.step(world, dt, 8, 3),
            Err(BridgeError::InvalidParameter(_))
        ));
    }
    assert_eq!(bridge.registry().world(world).unwrap().step_count(), 0);
}

#[test]
fn test_step_clamps_iterations() {
    let mut bridge = Bridge::new();
    let (world, body) = ball_world(&mut bridge, 0.0, 0.0);
    let snapshot = bridge.step(world, DT, 0, 0).unwrap();
    assert!(snapshot.pose_of(body).is_some());
    assert_eq!(bridge.registry().world(world).unwrap().step_count(), 1);
}

#[test]
fn test_box_fixture_reads_back_half_extents() {
    let mut bridge = Bridge::new();
    let world = bridge.create_world(0.0, -10.0, true).unwrap();
    let body = bridge.create_body(world, BodyKind::Dynamic, 0.0, 0.0).unwrap();
    let fixture = bridge
        .create_fixture(world, body, ShapeDescriptor::rect(2.0, 4.0), solid())
        .unwrap();

    let shape = bridge.fixture_shape(world, fixture).unwrap();
    assert_eq!(shape.kind(), ShapeKind::Box);
    let half = shape.half_extents().unwrap();
    assert_relative_eq!(half.x, 1.0);
    assert_relative_eq!(half.y, 2.0);

    let circle = bridge
        .create_fixture(world, body, ShapeDescriptor::circle(0.75), solid())
        .unwrap();
    assert_eq!(bridge.fixture_shape(world, circle).unwrap(), ShapeInfo::Circle { radius: 0.75 });
    assert_eq!(bridge.fixtures_of(world, body).unwrap(), vec![fixture, circle]);
    assert_eq!(bridge.fixture_body(world, circle).unwrap(), body);
}

#[test]
fn test_unsupported_shapes_are_rejected() {
    let mut bridge = Bridge::new();
    let world = bridge.create_world(0.0, -10.0, true).unwrap();
    let body = bridge.create_body(world, BodyKind::Dynamic, 0.0, 0.0).unwrap();

    for kind in [ShapeKind::Edge, ShapeKind::Polygon] {
        let result = bridge.create_fixture(world, body, ShapeDescriptor::new(kind, 1.0, 1.0), solid());
        assert!(matches!(result, Err(BridgeError::UnsupportedShapeKind(_))));
    }
    assert!(matches!(
        ShapeDescriptor::parse("triangle", 1.0, 1.0),
        Err(BridgeError::UnsupportedShapeKind(name)) if name == "triangle"
    ));

    // The shape is checked before the handles
    let missing = WorldHandle::from_raw(77).unwrap();
    let result = bridge.create_fixture(missing, body, ShapeDescriptor::new(ShapeKind::Edge, 1.0, 1.0), solid());
    assert!(matches!(result, Err(BridgeError::UnsupportedShapeKind(_))));

    assert!(bridge.registry().fixtures().is_empty());
}

#[test]
fn test_invalid_shape_parameters() {
    let mut bridge = Bridge::new();
    let world = bridge.create_world(0.0, -10.0, true).unwrap();
    let body = bridge.create_body(world, BodyKind::Dynamic, 0.0, 0.0).unwrap();

    for shape in [ShapeDescriptor::circle(0.0), ShapeDescriptor::rect(1.0, -2.0), ShapeDescriptor::circle(f32::NAN)] {
        assert!(matches!(
            bridge.create_fixture(world, body, shape, solid()),
            Err(BridgeError::InvalidParameter(_))
        ));
    }
    assert!(matches!(
        bridge.create_fixture(world, body, ShapeDescriptor::circle(1.0), Material::new(-1.0, 0.0, 1.0)),
        Err(BridgeError::InvalidParameter(_))
    ));
    assert!(bridge.registry().fixtures().is_empty());
}

#[test]
fn test_velocity_round_trip_before_step() {
    let mut bridge = Bridge::new();
    let (world, body) = ball_world(&mut bridge, 0.0, 0.0);

    bridge.set_linear_velocity(world, body, 3.0, 4.0).unwrap();
    let v = bridge.linear_velocity(world, body).unwrap();
    assert_relative_eq!(v.x, 3.0);
    assert_relative_eq!(v.y, 4.0);

    bridge.set_angular_velocity(world, body, 1.5).unwrap();
    assert_relative_eq!(bridge.angular_velocity(world, body).unwrap(), 1.5);
}

#[test]
fn test_transform_round_trip() {
    let mut bridge = Bridge::new();
    let (world, body) = ball_world(&mut bridge, 0.0, 0.0);

    bridge.set_body_transform(world, body, 4.0, -2.0, 0.5).unwrap();
    let position = bridge.position(world, body).unwrap();
    assert_relative_eq!(position.x, 4.0);
    assert_relative_eq!(position.y, -2.0);
    assert_relative_eq!(bridge.angle(world, body).unwrap(), 0.5, epsilon = 1.0e-6);
}

#[test]
fn test_body_flags() {
    let mut bridge = Bridge::new();
    let (world, body) = ball_world(&mut bridge, 0.0, 0.0);
    assert_eq!(bridge.body_kind(world, body).unwrap(), BodyKind::Dynamic);

    bridge.set_awake(world, body, false).unwrap();
    assert!(!bridge.is_awake(world, body).unwrap());
    bridge.set_awake(world, body, true).unwrap();
    assert!(bridge.is_awake(world, body).unwrap());

    assert!(bridge.is_active(world, body).unwrap());
    bridge.set_active(world, body, false).unwrap();
    assert!(!bridge.is_active(world, body).unwrap());

    bridge.set_linear_damping(world, body, 0.25).unwrap();
    assert_relative_eq!(bridge.linear_damping(world, body).unwrap(), 0.25);
}

#[test]
fn test_mass_centers() {
    let mut bridge = Bridge::new();
    let (world, body) = ball_world(&mut bridge, 2.0, 3.0);
    bridge.step(world, DT, 8, 3).unwrap();

    let center = bridge.world_center(world, body).unwrap();
    assert_relative_eq!(center.x, 2.0, epsilon = 1.0e-4);
    assert_relative_eq!(center.y, 3.0, epsilon = 1.0e-4);

    let local = bridge.local_center(world, body).unwrap();
    assert_relative_eq!(local.x, 0.0, epsilon = 1.0e-4);
    assert_relative_eq!(local.y, 0.0, epsilon = 1.0e-4);
}

#[test]
fn test_impulse_changes_velocity() {
    let mut bridge = Bridge::new();
    let (world, body) = ball_world(&mut bridge, 0.0, 0.0);

    bridge.apply_linear_impulse(world, body, 2.0, 0.0, 0.0, 0.0, true).unwrap();
    bridge.step(world, DT, 8, 3).unwrap();
    assert!(bridge.linear_velocity(world, body).unwrap().x > 0.0);
}

#[test]
fn test_forces_are_cleared_after_each_step() {
    let mut bridge = Bridge::new();
    let (world, body) = ball_world(&mut bridge, 0.0, 0.0);

    bridge.apply_force_to_center(world, body, 10.0, 0.0, true).unwrap();
    bridge.step(world, DT, 8, 3).unwrap();
    let after_first = bridge.linear_velocity(world, body).unwrap().x;
    assert!(after_first > 0.0);

    bridge.step(world, DT, 8, 3).unwrap();
    let after_second = bridge.linear_velocity(world, body).unwrap().x;
    assert_relative_eq!(after_second, after_first, epsilon = 1.0e-5);
}

#[test]
fn test_forces_persist_without_auto_clear() {
    let config = BridgeConfig {
        auto_clear_forces: false,
        ..BridgeConfig::default()
    };
    let mut bridge = Bridge::with_config(config);
    let (world, body) = ball_world(&mut bridge, 0.0, 0.0);

    bridge.apply_force_to_center(world, body, 10.0, 0.0, true).unwrap();
    bridge.step(world, DT, 8, 3).unwrap();
    let after_first = bridge.linear_velocity(world, body).unwrap().x;
    bridge.step(world, DT, 8, 3).unwrap();
    assert!(bridge.linear_velocity(world, body).unwrap().x > after_first);

    // Until cleared explicitly
    bridge.clear_forces(world).unwrap();
    let before = bridge.linear_velocity(world, body).unwrap().x;
    bridge.step(world, DT, 8, 3).unwrap();
    assert_relative_eq!(bridge.linear_velocity(world, body).unwrap().x, before, epsilon = 1.0e-5);
}

#[test]
fn test_fixture_mutators_update_material() {
    let mut bridge = Bridge::new();
    let world = bridge.create_world(0.0, -10.0, true).unwrap();
    let body = bridge.create_body(world, BodyKind::Dynamic, 0.0, 0.0).unwrap();
    let fixture = bridge
        .create_fixture(world, body, ShapeDescriptor::circle(1.0), Material::default())
        .unwrap();
    assert_eq!(bridge.fixture_material(world, fixture).unwrap(), Material::default());

    bridge.set_sensor(world, fixture, true).unwrap();
    bridge.set_density(world, fixture, 2.0).unwrap();
    bridge.set_friction(world, fixture, 0.6).unwrap();
    bridge.set_restitution(world, fixture, 0.4).unwrap();

    let material = bridge.fixture_material(world, fixture).unwrap();
    assert_eq!(material, Material::new(0.6, 0.4, 2.0).sensor());

    assert!(matches!(
        bridge.set_density(world, fixture, -1.0),
        Err(BridgeError::InvalidParameter(_))
    ));
    assert_relative_eq!(bridge.fixture_material(world, fixture).unwrap().density, 2.0);
}

#[test]
fn test_delete_body_releases_fixtures_and_joints() {
    let mut bridge = Bridge::new();
    let world = bridge.create_world(0.0, -10.0, true).unwrap();
    let a = bridge.create_body(world, BodyKind::Dynamic, 0.0, 0.0).unwrap();
    let b = bridge.create_body(world, BodyKind::Dynamic, 2.0, 0.0).unwrap();
    let fa = bridge.create_fixture(world, a, ShapeDescriptor::circle(0.5), solid()).unwrap();
    let fb = bridge.create_fixture(world, b, ShapeDescriptor::circle(0.5), solid()).unwrap();
    let joint = bridge.create_distance_joint(world, a, b).unwrap();

    bridge.delete_body(world, a).unwrap();

    let gone = Err::<(), _>(BridgeError::BodyNotFound(a));
    assert_eq!(bridge.set_body_transform(world, a, 1.0, 1.0, 0.0), gone);
    assert_eq!(bridge.position(world, a).map(|_| ()), gone);
    assert_eq!(bridge.angle(world, a).map(|_| ()), gone);
    assert_eq!(bridge.set_linear_velocity(world, a, 1.0, 0.0), gone);
    assert_eq!(bridge.linear_velocity(world, a).map(|_| ()), gone);
    assert_eq!(bridge.set_angular_velocity(world, a, 1.0), gone);
    assert_eq!(bridge.angular_velocity(world, a).map(|_| ()), gone);
    assert_eq!(bridge.apply_linear_impulse(world, a, 1.0, 0.0, 0.0, 0.0, true), gone);
    assert_eq!(bridge.apply_force_to_center(world, a, 1.0, 0.0, true), gone);
    assert_eq!(bridge.set_linear_damping(world, a, 0.5), gone);
    assert_eq!(bridge.linear_damping(world, a).map(|_| ()), gone);
    assert_eq!(bridge.set_active(world, a, false), gone);
    assert_eq!(bridge.is_active(world, a).map(|_| ()), gone);
    assert_eq!(bridge.set_awake(world, a, true), gone);
    assert_eq!(bridge.is_awake(world, a).map(|_| ()), gone);
    assert_eq!(bridge.world_center(world, a).map(|_| ()), gone);
    assert_eq!(bridge.local_center(world, a).map(|_| ()), gone);
    assert_eq!(bridge.body_kind(world, a).map(|_| ()), gone);
    assert_eq!(bridge.object_contacts(world, a).map(|_| ()), gone);
    assert_eq!(bridge.fixtures_of(world, a).map(|_| ()), gone);
    assert_eq!(
        bridge.create_fixture(world, a, ShapeDescriptor::circle(0.5), solid()).map(|_| ()),
        gone
    );
    assert_eq!(bridge.create_distance_joint(world, a, b).map(|_| ()), gone);
    assert_eq!(bridge.delete_body(world, a), gone);
    assert_eq!(bridge.fixture_material(world, fa), Err(BridgeError::FixtureNotFound(fa)));
    assert_eq!(bridge.set_friction(world, fa, 0.5), Err(BridgeError::FixtureNotFound(fa)));
    assert_eq!(bridge.joint_bodies(world, joint), Err(BridgeError::JointNotFound(joint)));

    // The other body is untouched
    assert!(bridge.fixture_material(world, fb).is_ok());
    let snapshot = bridge.step(world, DT, 8, 3).unwrap();
    assert_eq!(snapshot.len(), 1);
    assert!(snapshot.pose_of(a).is_none());
    assert!(snapshot.pose_of(b).is_some());
}

#[test]
fn test_delete_fixture() {
    let mut bridge = Bridge::new();
    let world = bridge.create_world(0.0, -10.0, true).unwrap();
    let body = bridge.create_body(world, BodyKind::Dynamic, 0.0, 0.0).unwrap();
    let fixture = bridge.create_fixture(world, body, ShapeDescriptor::circle(0.5), solid()).unwrap();

    bridge.delete_fixture(world, fixture).unwrap();
    assert!(bridge.fixtures_of(world, body).unwrap().is_empty());
    assert_eq!(bridge.delete_fixture(world, fixture), Err(BridgeError::FixtureNotFound(fixture)));
    assert!(bridge.linear_velocity(world, body).is_ok());
}

#[test]
fn test_unknown_world_is_reported_everywhere() {
    let mut bridge = Bridge::new();
    let (world, body) = ball_world(&mut bridge, 0.0, 0.0);
    let fixture = bridge.fixtures_of(world, body).unwrap()[0];
    let missing = WorldHandle::from_raw(42).unwrap();
    let not_found = Err::<(), _>(BridgeError::WorldNotFound(missing));

    assert_eq!(bridge.create_body(missing, BodyKind::Dynamic, 0.0, 0.0).map(|_| ()), not_found);
    assert_eq!(bridge.delete_body(missing, body), not_found);
    assert_eq!(bridge.step(missing, DT, 8, 3).map(|_| ()), not_found);
    assert_eq!(bridge.last_contacts(missing).map(|_| ()), not_found);
    assert_eq!(bridge.object_contacts(missing, body).map(|_| ()), not_found);
    assert_eq!(bridge.set_gravity(missing, 0.0, 1.0), not_found);
    assert_eq!(bridge.set_continuous(missing, true), not_found);
    assert_eq!(bridge.clear_forces(missing), not_found);
    assert_eq!(bridge.set_linear_velocity(missing, body, 1.0, 1.0), not_found);
    assert_eq!(bridge.linear_velocity(missing, body).map(|_| ()), not_found);
    assert_eq!(bridge.set_body_transform(missing, body, 1.0, 1.0, 0.5), not_found);
    assert_eq!(bridge.position(missing, body).map(|_| ()), not_found);
    assert_eq!(bridge.angle(missing, body).map(|_| ()), not_found);
    assert_eq!(bridge.set_angular_velocity(missing, body, 1.0), not_found);
    assert_eq!(bridge.angular_velocity(missing, body).map(|_| ()), not_found);
    assert_eq!(bridge.apply_linear_impulse(missing, body, 1.0, 0.0, 0.0, 0.0, true), not_found);
    assert_eq!(bridge.apply_force_to_center(missing, body, 1.0, 0.0, true), not_found);
    assert_eq!(bridge.set_linear_damping(missing, body, 0.5), not_found);
    assert_eq!(bridge.linear_damping(missing, body).map(|_| ()), not_found);
    assert_eq!(bridge.set_active(missing, body, false), not_found);
    assert_eq!(bridge.is_active(missing, body).map(|_| ()), not_found);
    assert_eq!(bridge.set_awake(missing, body, false), not_found);
    assert_eq!(bridge.is_awake(missing, body).map(|_| ()), not_found);
    assert_eq!(bridge.world_center(missing, body).map(|_| ()), not_found);
    assert_eq!(bridge.local_center(missing, body).map(|_| ()), not_found);
    assert_eq!(bridge.body_kind(missing, body).map(|_| ()), not_found);
    assert_eq!(bridge.set_sensor(missing, fixture, true), not_found);
    assert_eq!(bridge.set_density(missing, fixture, 2.0), not_found);
    assert_eq!(bridge.set_friction(missing, fixture, 0.1), not_found);
    assert_eq!(bridge.set_restitution(missing, fixture, 0.5), not_found);
    assert_eq!(bridge.fixture_material(missing, fixture).map(|_| ()), not_found);
    assert_eq!(bridge.fixture_shape(missing, fixture).map(|_| ()), not_found);
    assert_eq!(bridge.delete_fixture(missing, fixture), not_found);
    assert_eq!(bridge.delete_joint(missing, JointHandle::from_raw(0).unwrap()), not_found);
    assert_eq!(
        bridge.create_fixture(missing, body, ShapeDescriptor::circle(1.0), solid()).map(|_| ()),
        not_found
    );
    assert_eq!(bridge.create_distance_joint(missing, body, body).map(|_| ()), not_found);
    assert_eq!(bridge.destroy_world(missing), not_found);

    // Nothing was created, released or changed
    assert_eq!(bridge.fixture_material(world, fixture).unwrap(), solid());
    assert!(bridge.is_active(world, body).unwrap());
    assert_eq!(bridge.registry().worlds().len(), 1);
    assert_eq!(bridge.registry().bodies().len(), 1);
    assert_eq!(bridge.registry().fixtures().len(), 1);
    assert!(bridge.registry().joints().is_empty());
}

#[test]
fn test_body_of_another_world_is_not_found() {
    let mut bridge = Bridge::new();
    let (world_a, body) = ball_world(&mut bridge, 0.0, 0.0);
    let world_b = bridge.create_world(0.0, -10.0, true).unwrap();

    assert_eq!(bridge.linear_velocity(world_b, body).map(|_| ()), Err(BridgeError::BodyNotFound(body)));
    assert_eq!(bridge.delete_body(world_b, body), Err(BridgeError::BodyNotFound(body)));
    assert!(bridge.linear_velocity(world_a, body).is_ok());
}

#[test]
fn test_negative_raw_handles_are_invalid() {
    assert_eq!(
        WorldHandle::from_raw(-1),
        Err(BridgeError::InvalidHandle { kind: HandleKind::World, raw: -1 })
    );
    assert_eq!(
        BodyHandle::from_raw(-5),
        Err(BridgeError::InvalidHandle { kind: HandleKind::Body, raw: -5 })
    );
    assert_eq!(BodyHandle::from_raw(3).unwrap().to_raw(), 3);
}

#[test]
fn test_destroy_world_cascades() {
    let mut bridge = Bridge::new();
    let (world, body) = ball_world(&mut bridge, 0.0, 0.0);
    let other = bridge.create_body(world, BodyKind::Dynamic, 3.0, 0.0).unwrap();
    bridge.create_fixture(world, other, ShapeDescriptor::circle(0.5), solid()).unwrap();
    bridge.create_distance_joint(world, body, other).unwrap();

    let (survivor_world, survivor) = ball_world(&mut bridge, 0.0, 0.0);

    bridge.destroy_world(world).unwrap();
    assert_eq!(bridge.worlds(), vec![survivor_world]);
    assert_eq!(bridge.linear_velocity(world, body).map(|_| ()), Err(BridgeError::WorldNotFound(world)));
    assert!(bridge.registry().joints().is_empty());
    assert_eq!(bridge.registry().bodies().handles(), vec![survivor]);
    assert_eq!(bridge.registry().fixtures().len(), 1);
    assert!(bridge.step(survivor_world, DT, 8, 3).is_ok());
}

#[test]
fn test_fresh_world_has_no_contacts() {
    let mut bridge = Bridge::new();
    let world = bridge.create_world(0.0, -10.0, true).unwrap();
    let contacts = bridge.last_contacts(world).unwrap();
    assert!(contacts.is_empty());
    assert_eq!(contacts.to_flat(), vec![0]);
}

#[test]
fn test_falling_box_touches_ground() {
    let mut bridge = Bridge::new();
    let world = bridge.create_world(0.0, -10.0, false).unwrap();
    let ground = bridge.create_body(world, BodyKind::Static, 0.0, 0.0).unwrap();
    let ground_fixture = bridge
        .create_fixture(world, ground, ShapeDescriptor::rect(20.0, 1.0), solid())
        .unwrap();
    let crate_body = bridge.create_body(world, BodyKind::Dynamic, 0.0, 2.0).unwrap();
    let crate_fixture = bridge
        .create_fixture(world, crate_body, ShapeDescriptor::rect(1.0, 1.0), solid())
        .unwrap();

    for _ in 0..120 {
        bridge.step(world, DT, 8, 3).unwrap();
    }

    let contacts = bridge.last_contacts(world).unwrap();
    let contact = contacts.between(ground_fixture, crate_fixture).unwrap();
    assert!(contact.touching);
    assert_eq!(contact.other(crate_fixture), Some(ground_fixture));
    assert!(contacts.touching().count() >= 1);

    assert!(bridge.object_contacts(world, crate_body).unwrap().contains(&ground));
    assert!(bridge.object_contacts(world, ground).unwrap().contains(&crate_body));

    // Resting on the ground top at y = 0.5
    let y = bridge.position(world, crate_body).unwrap().y;
    assert_relative_eq!(y, 1.0, epsilon = 0.05);
}

#[test]
fn test_sensor_overlap_is_reported() {
    let mut bridge = Bridge::new();
    let world = bridge.create_world(0.0, 0.0, false).unwrap();
    let zone = bridge.create_body(world, BodyKind::Static, 0.0, 0.0).unwrap();
    let zone_fixture = bridge
        .create_fixture(world, zone, ShapeDescriptor::rect(4.0, 4.0), solid().sensor())
        .unwrap();
    let ball = bridge.create_body(world, BodyKind::Dynamic, 0.0, 0.0).unwrap();
    let ball_fixture = bridge.create_fixture(world, ball, ShapeDescriptor::circle(0.5), solid()).unwrap();

    bridge.step(world, DT, 8, 3).unwrap();

    let contacts = bridge.last_contacts(world).unwrap();
    let overlap = contacts.between(zone_fixture, ball_fixture).unwrap();
    assert!(overlap.touching);
}

#[test]
fn test_distance_joint_holds_bodies_together() {
    let mut bridge = Bridge::new();
    let world = bridge.create_world(0.0, 0.0, false).unwrap();
    let a = bridge.create_body(world, BodyKind::Dynamic, 0.0, 0.0).unwrap();
    let b = bridge.create_body(world, BodyKind::Dynamic, 2.0, 0.0).unwrap();
    bridge.create_fixture(world, a, ShapeDescriptor::circle(0.5), solid()).unwrap();
    bridge.create_fixture(world, b, ShapeDescriptor::circle(0.5), solid()).unwrap();

    let joint = bridge.create_distance_joint(world, a, b).unwrap();
    assert_eq!(bridge.joint_bodies(world, joint).unwrap(), (a, b));

    bridge.set_linear_velocity(world, b, 5.0, 0.0).unwrap();
    for _ in 0..60 {
        bridge.step(world, DT, 8, 3).unwrap();
    }
    // The pair moves off together at the rest length
    let distance = (bridge.position(world, b).unwrap() - bridge.position(world, a).unwrap()).norm();
    assert_relative_eq!(distance, 2.0, epsilon = 0.05);
    let va = bridge.linear_velocity(world, a).unwrap();
    let vb = bridge.linear_velocity(world, b).unwrap();
    assert_relative_eq!(va.x, vb.x, epsilon = 0.1);
    assert!(va.x > 0.0);

    bridge.delete_joint(world, joint).unwrap();
    assert_eq!(bridge.delete_joint(world, joint), Err(BridgeError::JointNotFound(joint)));
}

#[test]
fn test_distance_joint_validation() {
    let mut bridge = Bridge::new();
    let world = bridge.create_world(0.0, 0.0, true).unwrap();
    let a = bridge.create_body(world, BodyKind::Dynamic, 0.0, 0.0).unwrap();
    let b = bridge.create_body(world, BodyKind::Dynamic, 1.0, 0.0).unwrap();

    assert!(matches!(
        bridge.create_distance_joint(world, a, a),
        Err(BridgeError::InvalidParameter(_))
    ));
    let bad = DistanceJointDef::new(-1.0, 0.0);
    assert!(matches!(
        bridge.create_distance_joint_with(world, a, b, bad),
        Err(BridgeError::InvalidParameter(_))
    ));
    let good = DistanceJointDef::new(500.0, 10.0)
        .with_length(1.5)
        .with_anchors(Vec2::new(0.1, 0.0), Vec2::zeros());
    assert!(bridge.create_distance_joint_with(world, a, b, good).is_ok());
    assert_eq!(bridge.registry().joints().len(), 1);
}

#[test]
fn test_dynamic_body_without_density_gets_unit_mass() {
    let mut bridge = Bridge::new();
    let world = bridge.create_world(0.0, 0.0, false).unwrap();
    let body = bridge.create_body(world, BodyKind::Dynamic, 0.0, 10.0).unwrap();
    bridge
        .create_fixture(world, body, ShapeDescriptor::circle(0.5), Material::default())
        .unwrap();
    bridge.step(world, DT, 8, 3).unwrap();

    bridge.apply_linear_impulse(world, body, 5.0, 0.0, 0.0, 10.0, true).unwrap();
    bridge.step(world, DT, 8, 3).unwrap();
    assert_relative_eq!(bridge.linear_velocity(world, body).unwrap().x, 5.0, epsilon = 1.0e-3);
    assert!(bridge.position(world, body).unwrap().x > 0.0);
}

#[test]
fn test_dense_fixture_replaces_unit_mass() {
    let mut bridge = Bridge::new();
    let world = bridge.create_world(0.0, 0.0, false).unwrap();
    let body = bridge.create_body(world, BodyKind::Dynamic, 0.0, 0.0).unwrap();
    let fixture = bridge
        .create_fixture(world, body, ShapeDescriptor::circle(0.5), Material::default())
        .unwrap();
    bridge.set_density(world, fixture, 1.0).unwrap();
    bridge.step(world, DT, 8, 3).unwrap();

    // Mass of a unit-density circle of radius 0.5
    let mass = std::f32::consts::PI * 0.25;
    bridge.apply_linear_impulse(world, body, 1.0, 0.0, 0.0, 0.0, true).unwrap();
    bridge.step(world, DT, 8, 3).unwrap();
    assert_relative_eq!(bridge.linear_velocity(world, body).unwrap().x, 1.0 / mass, epsilon = 1.0e-3);
}

#[test]
fn test_dynamic_body_without_density_falls() {
    let mut bridge = Bridge::new();
    let world = bridge.create_world(0.0, -10.0, false).unwrap();
    let body = bridge.create_body(world, BodyKind::Dynamic, 0.0, 10.0).unwrap();
    bridge
        .create_fixture(world, body, ShapeDescriptor::circle(0.5), Material::default())
        .unwrap();

    for _ in 0..60 {
        bridge.step(world, DT, 8, 3).unwrap();
    }
    assert!(bridge.position(world, body).unwrap().y < 9.0);
    assert!(bridge.linear_velocity(world, body).unwrap().y < -5.0);
}

#[cfg(feature = "protocol")]
#[test]
fn test_fixture_message_without_density_falls() {
    use phys_bridge::protocol::handle_message;

    let mut bridge = Bridge::new();
    assert_eq!(
        handle_message(&mut bridge, r#"{"command": "createWorld", "param1": 0, "param2": -10, "param3": false}"#),
        r#"{"data":0}"#
    );
    assert_eq!(
        handle_message(
            &mut bridge,
            r#"{"command": "createBody", "param1": 0, "param2": {"type": 2, "position": {"x": 0, "y": 10}}}"#
        ),
        r#"{"data":0}"#
    );
    assert_eq!(
        handle_message(
            &mut bridge,
            r#"{"command": "createFixture", "param1": 0, "param2": 0, "param3": {"shape": {"type": "circle", "radius": 0.5}}}"#
        ),
        r#"{"data":0}"#
    );

    for _ in 0..60 {
        handle_message(&mut bridge, r#"{"command": "step", "param1": 0, "param2": 0.016666668, "param3": 8, "param4": 3}"#);
    }

    let world = WorldHandle::from_raw(0).unwrap();
    let body = BodyHandle::from_raw(0).unwrap();
    assert_relative_eq!(bridge.fixture_material(world, bridge.fixtures_of(world, body).unwrap()[0]).unwrap().density, 0.0);
    assert!(bridge.position(world, body).unwrap().y < 9.0);
}
