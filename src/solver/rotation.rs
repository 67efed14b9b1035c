//! Givens rotations for the incremental QR factorization.

use num_traits::Float;

/// A 2×2 Givens rotation, stored as its cosine/sine pair.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rotation<T> {
    pub cos: T,
    pub sin: T,
}

impl<T: Float> Rotation<T> {
    /// The rotation sending the pair (x, y) to (r, 0).
    ///
    /// A zero pivot (|x| below machine epsilon) yields the degenerate swap
    /// rotation (cos = 0, sin = 1), which maps (0, y) to (y, 0).
    pub fn zeroing(x: T, y: T) -> Self {
        if x.abs() < T::epsilon() {
            return Rotation { cos: T::zero(), sin: T::one() };
        }
        let r = (x * x + y * y).sqrt();
        let cos = x.abs() / r;
        let sin = cos * y / x;
        Rotation { cos, sin }
    }

    /// Apply the rotation to the pair (x, y).
    pub fn apply(&self, x: T, y: T) -> (T, T) {
        (self.cos * x + self.sin * y, self.cos * y - self.sin * x)
    }
}
