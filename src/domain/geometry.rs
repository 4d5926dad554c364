/// Axis-aligned boxes and hitbox collision.
///
/// Every entity exposes its visual bounds; a per-type inset shrinks those
/// bounds to the part of the sprite that actually counts for contact.
/// The overlap test itself knows nothing about entity types.

/// Axis-aligned rectangle in world pixels. `y` grows downwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Shrink by per-side insets. Insets wider than the box leave a negative
    /// width; such a box only overlaps bodies spanning the whole gap.
    pub fn inset(&self, i: Insets) -> Rect {
        Rect {
            x: self.x + i.left,
            y: self.y + i.top,
            width: self.width - i.left - i.right,
            height: self.height - i.top - i.bottom,
        }
    }

    /// Strict overlap on both axes. Touching edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.right() > other.x
            && self.bottom() > other.y
            && self.x < other.right()
            && self.y < other.bottom()
    }
}

/// Transparent padding around a sprite, per side.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Insets {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Insets {
    pub const ZERO: Insets = Insets { left: 0.0, right: 0.0, top: 0.0, bottom: 0.0 };

    pub const fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Insets { left, right, top, bottom }
    }
}

/// Anything that takes part in collision checks.
pub trait Hitboxed {
    /// Full visual bounding box.
    fn bounds(&self) -> Rect;

    /// Per-type padding. Types without artwork padding keep the default.
    fn insets(&self) -> Insets {
        Insets::ZERO
    }

    fn hitbox(&self) -> Rect {
        self.bounds().inset(self.insets())
    }
}

/// Generic hitbox collision.
pub fn collides<A, B>(a: &A, b: &B) -> bool
where
    A: Hitboxed + ?Sized,
    B: Hitboxed + ?Sized,
{
    a.hitbox().overlaps(&b.hitbox())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct Boxed {
        bounds: Rect,
        insets: Insets,
    }

    impl Hitboxed for Boxed {
        fn bounds(&self) -> Rect { self.bounds }
        fn insets(&self) -> Insets { self.insets }
    }

    struct Plain(Rect);

    impl Hitboxed for Plain {
        fn bounds(&self) -> Rect { self.0 }
    }

    #[test]
    fn touching_edges_do_not_collide() {
        let a = Plain(Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = Plain(Rect::new(10.0, 0.0, 10.0, 10.0));
        let c = Plain(Rect::new(0.0, 10.0, 10.0, 10.0));
        assert!(!collides(&a, &b));
        assert!(!collides(&a, &c));
    }

    #[test]
    fn overlap_by_a_fraction_collides() {
        let a = Plain(Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = Plain(Rect::new(9.5, 9.5, 10.0, 10.0));
        assert!(collides(&a, &b));
    }

    #[test]
    fn default_insets_are_zero() {
        let a = Plain(Rect::new(3.0, 4.0, 5.0, 6.0));
        assert_eq!(a.hitbox(), a.bounds());
    }

    #[test]
    fn insets_can_separate_overlapping_sprites() {
        let a = Boxed {
            bounds: Rect::new(0.0, 0.0, 100.0, 100.0),
            insets: Insets::new(0.0, 30.0, 0.0, 0.0),
        };
        let b = Plain(Rect::new(75.0, 0.0, 50.0, 50.0));
        assert!(a.bounds().overlaps(&b.bounds()));
        assert!(!collides(&a, &b));
    }

    fn rect() -> impl Strategy<Value = Rect> {
        (-500.0f32..500.0, -500.0f32..500.0, 1.0f32..300.0, 1.0f32..300.0)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    fn insets() -> impl Strategy<Value = Insets> {
        (0.0f32..40.0, 0.0f32..40.0, 0.0f32..40.0, 0.0f32..40.0)
            .prop_map(|(l, r, t, b)| Insets::new(l, r, t, b))
    }

    proptest! {
        #[test]
        fn collision_is_symmetric(ra in rect(), ia in insets(), rb in rect(), ib in insets()) {
            let a = Boxed { bounds: ra, insets: ia };
            let b = Boxed { bounds: rb, insets: ib };
            prop_assert_eq!(collides(&a, &b), collides(&b, &a));
        }

        #[test]
        fn hitbox_never_grows(r in rect(), i in insets()) {
            let h = Boxed { bounds: r, insets: i }.hitbox();
            prop_assert!(h.x >= r.x);
            prop_assert!(h.y >= r.y);
            prop_assert!(h.right() <= r.right());
            prop_assert!(h.bottom() <= r.bottom());
        }
    }
}
