#[cfg(feature = "protocol")]
use serde::{Serialize, Deserialize};
use rapier2d::prelude::ColliderHandle;

use crate::core::{BodyHandle, Bridge, FixtureHandle, Handle, World, WorldHandle};
use crate::error::BridgeError;
use crate::Result;

/// A contact between two fixtures as currently tracked by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "protocol", derive(Serialize, Deserialize))]
pub struct Contact {
    /// The first fixture in the contact
    pub fixture_a: FixtureHandle,

    /// The second fixture in the contact
    pub fixture_b: FixtureHandle,

    /// Whether the fixtures actually touch (or overlap, for sensors)
    pub touching: bool,
}

impl Contact {
    /// Checks if this contact involves the specified fixture
    pub fn contains(&self, fixture: FixtureHandle) -> bool {
        self.fixture_a == fixture || self.fixture_b == fixture
    }

    /// Returns the other fixture of the contact
    pub fn other(&self, fixture: FixtureHandle) -> Option<FixtureHandle> {
        if self.fixture_a == fixture {
            Some(self.fixture_b)
        } else if self.fixture_b == fixture {
            Some(self.fixture_a)
        } else {
            None
        }
    }
}

/// The contacts of a world at query time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "protocol", derive(Serialize, Deserialize))]
pub struct ContactList {
    pub contacts: Vec<Contact>,
}

impl ContactList {
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.iter()
    }

    /// Returns the contacts that are actually touching
    pub fn touching(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.iter().filter(|c| c.touching)
    }

    /// Finds the contact between two fixtures, in either order
    pub fn between(&self, a: FixtureHandle, b: FixtureHandle) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.contains(a) && c.other(a) == Some(b))
    }

    /// Flattens into the length-prefixed layout `[count, a, b, touching, ...]`
    /// with `touching` encoded as 0 or 1
    pub fn to_flat(&self) -> Vec<i32> {
        let mut flat = Vec::with_capacity(1 + self.contacts.len() * 3);
        flat.push(self.contacts.len() as i32);
        for contact in &self.contacts {
            flat.push(contact.fixture_a.to_raw());
            flat.push(contact.fixture_b.to_raw());
            flat.push(contact.touching as i32);
        }
        flat
    }
}

fn fixture_of(world: &World, collider: ColliderHandle) -> Option<FixtureHandle> {
    world
        .collider(collider)
        .and_then(|c| FixtureHandle::from_tag(c.user_data))
}

fn body_of(world: &World, collider: ColliderHandle) -> Option<BodyHandle> {
    let parent = world.collider(collider)?.parent()?;
    BodyHandle::from_tag(world.body(parent)?.user_data)
}

impl Bridge {
    /// Lists the contacts the engine currently tracks for a world.
    ///
    /// Only pairs present at call time are reported; nothing is accumulated
    /// between steps. Sensor overlaps are listed with the solid contacts.
    pub fn last_contacts(&self, world: WorldHandle) -> Result<ContactList> {
        let target = self.registry.world(world)?;
        let mut contacts = Vec::new();

        for pair in target.narrow_phase.contact_pairs() {
            if let (Some(a), Some(b)) = (
                fixture_of(target, pair.collider1),
                fixture_of(target, pair.collider2),
            ) {
                contacts.push(Contact {
                    fixture_a: a,
                    fixture_b: b,
                    touching: pair.has_any_active_contact,
                });
            }
        }
        for (collider1, collider2, intersecting) in target.narrow_phase.intersection_pairs() {
            if let (Some(a), Some(b)) = (fixture_of(target, collider1), fixture_of(target, collider2)) {
                contacts.push(Contact {
                    fixture_a: a,
                    fixture_b: b,
                    touching: intersecting,
                });
            }
        }

        Ok(ContactList { contacts })
    }

    /// Lists the body on the other side of every contact of a body.
    ///
    /// One entry per contact, so a body touching another through two fixtures
    /// appears twice.
    pub fn object_contacts(&self, world: WorldHandle, body: BodyHandle) -> Result<Vec<BodyHandle>> {
        let record = self.registry.body(world, body)?;
        let target = self.registry.world(world)?;
        let native = target
            .body(record.native)
            .ok_or(BridgeError::BodyNotFound(body))?;

        let mut others = Vec::new();
        for &collider in native.colliders() {
            for pair in target.narrow_phase.contact_pairs_with(collider) {
                let other = if pair.collider1 == collider {
                    pair.collider2
                } else {
                    pair.collider1
                };
                others.extend(body_of(target, other));
            }
            for (collider1, collider2, _) in target.narrow_phase.intersection_pairs_with(collider) {
                let other = if collider1 == collider { collider2 } else { collider1 };
                others.extend(body_of(target, other));
            }
        }

        Ok(others)
    }
}
