use glam::DVec3;
use tracing::{trace, trace_span};

use crate::aabb::Aabb;
use crate::body::{BodyHandle, PhysicsBody};
use crate::config::PhysicsConfig;
use crate::error::PhysicsError;

/// How one contact was resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit vector along the contact axis, pointing away from the other body.
    pub normal: DVec3,
    pub penetration: f64,
    /// Whether the body was moving into the other one and bounced.
    pub bounced: bool,
}

/// Summary of one simulation step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    pub contacts: usize,
    pub bounces: usize,
    pub sleeping: usize,
}

/// Owns every body and advances them in fixed phases: integrate, then
/// resolve contacts.
#[derive(Debug)]
pub struct PhysicsWorld {
    config: PhysicsConfig,
    dynamic: Vec<(BodyHandle, PhysicsBody)>,
    fixed: Vec<(BodyHandle, PhysicsBody)>,
    next_handle: u64,
    rng: fastrand::Rng,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

impl PhysicsWorld {
    pub fn new(config: PhysicsConfig) -> Self {
        let rng = fastrand::Rng::with_seed(config.seed);
        Self {
            config,
            dynamic: Vec::new(),
            fixed: Vec::new(),
            next_handle: 0,
            rng,
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Add a body. Zero-mass bodies join the static set.
    pub fn add_body(&mut self, body: PhysicsBody) -> BodyHandle {
        self.next_handle += 1;
        let handle = BodyHandle(self.next_handle);
        if body.is_static() {
            self.fixed.push((handle, body));
        } else {
            self.dynamic.push((handle, body));
        }
        handle
    }

    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<PhysicsBody, PhysicsError> {
        for set in [&mut self.dynamic, &mut self.fixed] {
            if let Some(i) = set.iter().position(|(h, _)| *h == handle) {
                return Ok(set.remove(i).1);
            }
        }
        Err(PhysicsError::UnknownBody(handle))
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&PhysicsBody> {
        self.dynamic
            .iter()
            .chain(&self.fixed)
            .find(|(h, _)| *h == handle)
            .map(|(_, b)| b)
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut PhysicsBody> {
        self.dynamic
            .iter_mut()
            .chain(&mut self.fixed)
            .find(|(h, _)| *h == handle)
            .map(|(_, b)| b)
    }

    /// Add to a body's velocity and wake it.
    pub fn apply_impulse(&mut self, handle: BodyHandle, delta_v: DVec3) -> Result<(), PhysicsError> {
        let body = self
            .body_mut(handle)
            .ok_or(PhysicsError::UnknownBody(handle))?;
        if !body.is_static() {
            body.velocity += delta_v;
            body.is_sleeping = false;
            body.is_on_ground = false;
        }
        Ok(())
    }

    /// Every body with its handle, dynamic bodies first.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &PhysicsBody)> {
        self.dynamic
            .iter()
            .chain(&self.fixed)
            .map(|(h, b)| (*h, b))
    }

    pub fn len(&self) -> usize {
        self.dynamic.len() + self.fixed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Advance the simulation by `dt` seconds.
    pub fn step(&mut self, dt: f64) -> Result<StepStats, PhysicsError> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(PhysicsError::InvalidTimeStep(dt));
        }
        let _span = trace_span!("physics_step", dt, bodies = self.len()).entered();
        let mut stats = StepStats::default();

        for (_, body) in &mut self.dynamic {
            if body.is_sleeping {
                continue;
            }
            body.is_colliding = false;
            integrate(body, &self.config, dt);
        }

        for i in 0..self.dynamic.len() {
            if self.dynamic[i].1.is_sleeping {
                continue;
            }
            for (_, fixed) in &self.fixed {
                if let Some(contact) = resolve(&mut self.dynamic[i].1, fixed, &self.config, &mut self.rng) {
                    stats.record(contact);
                }
            }
            for j in 0..self.dynamic.len() {
                let other = self.dynamic[j].1;
                if i == j || other.is_sleeping {
                    continue;
                }
                if let Some(contact) = resolve(&mut self.dynamic[i].1, &other, &self.config, &mut self.rng) {
                    stats.record(contact);
                }
            }
        }

        for (_, body) in &mut self.dynamic {
            if !body.is_sleeping {
                settle(body, &self.config);
            }
        }
        stats.sleeping = self.dynamic.iter().filter(|(_, b)| b.is_sleeping).count();
        Ok(stats)
    }
}

impl StepStats {
    fn record(&mut self, contact: Contact) {
        self.contacts += 1;
        if contact.bounced {
            self.bounces += 1;
        }
    }
}

fn integrate(body: &mut PhysicsBody, config: &PhysicsConfig, dt: f64) {
    body.velocity += config.gravity * dt;
    body.velocity *= config.linear_damping;
    body.position += body.velocity * dt;

    body.angular_velocity *= config.angular_damping;
    body.rotation += body.angular_velocity * dt;
}

/// Put a slow, grounded body to sleep. Runs after contact resolution.
fn settle(body: &mut PhysicsBody, config: &PhysicsConfig) {
    if body.is_on_ground
        && body.velocity.length() < config.sleep_threshold
        && body.angular_velocity.length() < config.angular_sleep_threshold
    {
        body.velocity = DVec3::ZERO;
        body.angular_velocity = DVec3::ZERO;
        body.is_sleeping = true;
    }
}

/// Push `body` out of `other` along the axis of least penetration and
/// bounce it if it was moving inward. Only `body` is changed.
fn resolve(
    body: &mut PhysicsBody,
    other: &PhysicsBody,
    config: &PhysicsConfig,
    rng: &mut fastrand::Rng,
) -> Option<Contact> {
    let a = Aabb::from_body(body);
    let b = Aabb::from_body(other);
    if !a.overlaps(&b) || body.is_static() {
        return None;
    }
    body.is_sleeping = false;

    let depth = a.overlap_depths(&b);
    let axis = if depth.x < depth.y && depth.x < depth.z {
        0
    } else if depth.y < depth.z {
        1
    } else {
        2
    };
    let sign = if body.position[axis] < other.position[axis] { -1.0 } else { 1.0 };
    let mut normal = DVec3::ZERO;
    normal[axis] = sign;
    let penetration = depth[axis];
    if axis == 1 && sign < 0.0 && other.is_static() {
        body.is_on_ground = true;
    }

    separate(body, &b, axis, sign);

    let dot = body.velocity.dot(normal);
    let bounced = dot < 0.0;
    if bounced {
        body.velocity -= (1.0 + config.restitution) * dot * normal;
        body.velocity.x *= 1.0 - config.friction;
        body.velocity.z *= 1.0 - config.friction;

        let impact = dot.abs() / 100.0;
        body.angular_velocity += DVec3::new(
            (rng.f64() - 0.5) * impact,
            (rng.f64() - 0.5) * impact,
            (rng.f64() - 0.5) * impact,
        );
        body.is_colliding = true;
    }
    trace!(?normal, penetration, bounced, "contact resolved");

    Some(Contact {
        normal,
        penetration,
        bounced,
    })
}

/// Put `body` flush against `other` on `axis`, stepping outward until the
/// strict overlap test no longer holds.
fn separate(body: &mut PhysicsBody, other: &Aabb, axis: usize, sign: f64) {
    let half = body.size[axis] / 2.0;
    let face = if sign > 0.0 { other.max[axis] } else { other.min[axis] };
    let clear = |p: f64| {
        if sign > 0.0 {
            p - half >= face
        } else {
            p + half <= face
        }
    };
    let mut p = face + sign * half;
    while !clear(p) {
        p += sign * p.abs().max(1.0) * f64::EPSILON;
    }
    body.position[axis] = p;
}
