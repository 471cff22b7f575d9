//! Contact data reported by the collision world.

use glam::Vec2;

/// Overlap between two bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct Contact<T> {
    pub id_a: T,
    pub id_b: T,
    /// Unit direction from A toward B. Zero for touching bodies.
    pub normal: Vec2,
    /// Penetration depth.
    pub penetration: f32,
}

impl<T> Contact<T> {
    /// Build a contact from a minimum translation vector pointing from A to B.
    pub fn from_mtv(id_a: T, id_b: T, mtv: Vec2) -> Self {
        Self {
            id_a,
            id_b,
            normal: mtv.normalize_or_zero(),
            penetration: mtv.length(),
        }
    }

    /// Translation that moves A out of B.
    #[inline]
    pub fn separation(&self) -> Vec2 {
        -self.normal * self.penetration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_from_mtv() {
        let contact = Contact::from_mtv(1, 2, Vec2::new(0.0, 3.0));
        assert_eq!(contact.normal, Vec2::Y);
        assert_eq!(contact.penetration, 3.0);
        assert_eq!(contact.separation(), Vec2::new(0.0, -3.0));

        let touching = Contact::from_mtv(1, 2, Vec2::ZERO);
        assert_eq!(touching.normal, Vec2::ZERO);
        assert_eq!(touching.penetration, 0.0);
    }
}
