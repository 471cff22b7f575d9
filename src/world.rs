//! Collision pipeline tying the broadphase and narrowphase together.
//!
//! # Pipeline
//!
//! A frame looks like this:
//!
//! 1. [`CollisionWorld::begin_frame`] clears the spatial hash
//! 2. [`CollisionWorld::insert`] every body with its current pose
//! 3. [`CollisionWorld::find_contacts`] pairs bodies through the hash, tests
//!    each pair exactly and measures penetration with EPA
//! 4. [`CollisionWorld::sweep`] answers continuous queries for moving boxes
//!
//! No response is applied; callers decide what to do with the contacts.

use std::hash::Hash;

use glam::Vec2;
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::broadphase::SpatialHash;
use crate::collider::{Collider, Rectangle};
use crate::config::CollisionConfig;
use crate::contact::Contact;
use crate::error::CollisionResult;
use crate::narrowphase::collider_contact_vector;
use crate::sweep::{sweep_test, SweepResult};
use crate::transform::Transform2D;

/// Bodies inserted for the current frame, queried for contacts and sweeps.
pub struct CollisionWorld<T> {
    config: CollisionConfig,
    hash: SpatialHash<T>,
}

impl<T> CollisionWorld<T>
where
    T: Eq + Hash + Clone,
{
    /// Create an empty world. Fails if the configured cell size is invalid.
    pub fn new(config: CollisionConfig) -> CollisionResult<Self> {
        let hash = SpatialHash::new(config.cell_size)?;
        Ok(Self { config, hash })
    }

    #[inline]
    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    #[inline]
    pub fn spatial_hash(&self) -> &SpatialHash<T> {
        &self.hash
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.hash.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hash.is_empty()
    }

    /// Forget every body from the previous frame.
    pub fn begin_frame(&mut self) {
        self.hash.clear();
    }

    /// Add or replace a body for this frame.
    pub fn insert(&mut self, id: T, collider: impl Into<Collider>, transform: Transform2D) {
        self.hash.insert(id, collider, transform);
    }

    /// Every overlapping pair of bodies, each reported once.
    ///
    /// The contact normal points from `id_a` toward `id_b`.
    pub fn find_contacts(&self) -> Vec<Contact<T>> {
        let mut contacts = Vec::new();
        let mut tested: FxHashSet<(&T, &T)> = FxHashSet::default();
        let mut candidates = 0usize;

        for (id, collider, transform) in self.hash.iter() {
            for (other_id, other_collider, other_transform) in
                self.hash.retrieve(id, collider, transform)
            {
                // Canonical ordering to avoid duplicates
                if tested.contains(&(other_id, id)) || !tested.insert((id, other_id)) {
                    continue;
                }
                candidates += 1;

                if let Some(mtv) = collider_contact_vector(
                    collider,
                    transform,
                    other_collider,
                    other_transform,
                    &self.config,
                ) {
                    contacts.push(Contact::from_mtv(id.clone(), other_id.clone(), mtv));
                }
            }
        }

        debug!(
            "Collision frame: {} bodies, {} candidate pairs, {} contacts",
            self.hash.len(),
            candidates,
            contacts.len()
        );

        contacts
    }

    /// Sweep an axis-aligned rectangle through the current bodies.
    pub fn sweep(
        &self,
        rectangle: &Rectangle,
        transform: &Transform2D,
        ray: Vec2,
    ) -> SweepResult<T> {
        sweep_test(&self.hash, rectangle, transform, ray)
    }
}
