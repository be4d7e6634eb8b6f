use serde_json::{json, Value};
use tracing::{trace, warn};

use super::{Command, ProtocolError};
use crate::bodies::Material;
use crate::core::{Bridge, Handle, Snapshot};
use crate::collision::ContactList;
use crate::Vec2;

const KEY_DATA: &str = "data";
const KEY_ERROR: &str = "error";
const VALUE_SUCCESS: &str = "success";

/// Decodes a message, runs it and encodes the reply.
///
/// Never fails: every error is reported as `{"error": "..."}`.
pub fn handle_message(bridge: &mut Bridge, message: &str) -> String {
    let reply = Command::parse(message).and_then(|command| execute(bridge, command));
    match reply {
        Ok(data) => {
            trace!(message, "message handled");
            json!({ KEY_DATA: data }).to_string()
        }
        Err(err) => {
            warn!(error = %err, message, "message rejected");
            json!({ KEY_ERROR: err.to_string() }).to_string()
        }
    }
}

/// Runs a decoded command and returns the value for the `data` field
pub fn execute(bridge: &mut Bridge, command: Command) -> Result<Value, ProtocolError> {
    let success = || Value::from(VALUE_SUCCESS);

    let data = match command {
        Command::CreateWorld { gravity_x, gravity_y, allow_sleep } => {
            json!(bridge.create_world(gravity_x, gravity_y, allow_sleep)?.to_raw())
        }
        Command::DestroyWorld { world } => {
            bridge.destroy_world(world)?;
            success()
        }
        Command::SetContinuous { world, enabled } => {
            bridge.set_continuous(world, enabled)?;
            success()
        }
        Command::SetGravity { world, x, y } => {
            bridge.set_gravity(world, x, y)?;
            success()
        }
        Command::ClearForces { world } => {
            bridge.clear_forces(world)?;
            success()
        }
        Command::Step { world, dt, velocity_iterations, position_iterations } => {
            snapshot_data(&bridge.step(world, dt, velocity_iterations, position_iterations)?)
        }
        Command::GetLastContacts { world } => contacts_data(&bridge.last_contacts(world)?),

        Command::CreateBody { world, kind, x, y } => json!(bridge.create_body(world, kind, x, y)?.to_raw()),
        Command::DeleteBody { world, body } => {
            bridge.delete_body(world, body)?;
            success()
        }
        Command::SetBodyTransform { world, body, x, y, angle } => {
            bridge.set_body_transform(world, body, x, y, angle)?;
            success()
        }
        Command::SetLinearVelocity { world, body, x, y } => {
            bridge.set_linear_velocity(world, body, x, y)?;
            success()
        }
        Command::GetLinearVelocity { world, body } => point_data(bridge.linear_velocity(world, body)?),
        Command::SetAngularVelocity { world, body, omega } => {
            bridge.set_angular_velocity(world, body, omega)?;
            success()
        }
        Command::GetAngularVelocity { world, body } => json!(bridge.angular_velocity(world, body)?),
        Command::ApplyImpulse { world, body, impulse_x, impulse_y, point_x, point_y, wake } => {
            bridge.apply_linear_impulse(world, body, impulse_x, impulse_y, point_x, point_y, wake)?;
            success()
        }
        Command::ApplyForceToCenter { world, body, x, y, wake } => {
            bridge.apply_force_to_center(world, body, x, y, wake)?;
            success()
        }
        Command::SetLinearDamping { world, body, damping } => {
            bridge.set_linear_damping(world, body, damping)?;
            success()
        }
        Command::SetActive { world, body, active } => {
            bridge.set_active(world, body, active)?;
            success()
        }
        Command::SetAwake { world, body, awake } => {
            bridge.set_awake(world, body, awake)?;
            success()
        }
        Command::IsAwake { world, body } => json!(bridge.is_awake(world, body)?),
        Command::GetWorldCenter { world, body } => point_data(bridge.world_center(world, body)?),
        Command::GetLocalCenter { world, body } => point_data(bridge.local_center(world, body)?),
        Command::GetObjectContacts { world, body } => {
            let others: Vec<i32> = bridge
                .object_contacts(world, body)?
                .into_iter()
                .map(Handle::to_raw)
                .collect();
            json!(others)
        }

        Command::CreateFixture { world, body, fixture } => {
            let shape = fixture.shape.descriptor()?;
            let mut material = Material::new(fixture.friction, fixture.restitution, fixture.density);
            material.is_sensor = fixture.is_sensor;
            json!(bridge.create_fixture(world, body, shape, material)?.to_raw())
        }
        Command::DeleteFixture { world, fixture } => {
            bridge.delete_fixture(world, fixture)?;
            success()
        }
        Command::SetSensor { world, fixture, is_sensor } => {
            bridge.set_sensor(world, fixture, is_sensor)?;
            success()
        }
        Command::SetDensity { world, fixture, density } => {
            bridge.set_density(world, fixture, density)?;
            success()
        }
        Command::SetFriction { world, fixture, friction } => {
            bridge.set_friction(world, fixture, friction)?;
            success()
        }
        Command::SetRestitution { world, fixture, restitution } => {
            bridge.set_restitution(world, fixture, restitution)?;
            success()
        }

        Command::CreateDistanceJoint { world, body_a, body_b } => {
            json!(bridge.create_distance_joint(world, body_a, body_b)?.to_raw())
        }
        Command::DeleteJoint { world, joint } => {
            bridge.delete_joint(world, joint)?;
            success()
        }
    };
    Ok(data)
}

/// `[count, id, x, y, angle, ...]` with integer count and ids
fn snapshot_data(snapshot: &Snapshot) -> Value {
    let mut data = Vec::with_capacity(1 + snapshot.len() * 4);
    data.push(json!(snapshot.len()));
    for pose in snapshot.iter() {
        data.push(json!(pose.body.to_raw()));
        data.push(json!(pose.x));
        data.push(json!(pose.y));
        data.push(json!(pose.angle));
    }
    Value::Array(data)
}

/// `[count, fixtureA, fixtureB, touching, ...]` with `touching` as a boolean
fn contacts_data(contacts: &ContactList) -> Value {
    let mut data = Vec::with_capacity(1 + contacts.len() * 3);
    data.push(json!(contacts.len()));
    for contact in contacts.iter() {
        data.push(json!(contact.fixture_a.to_raw()));
        data.push(json!(contact.fixture_b.to_raw()));
        data.push(json!(contact.touching));
    }
    Value::Array(data)
}

fn point_data(point: Vec2) -> Value {
    json!([point.x, point.y])
}
