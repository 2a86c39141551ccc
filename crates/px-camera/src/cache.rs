use std::rc::Rc;

use px_core::Matrix4;

/// Memoized matrix with an explicit clean/dirty state.
///
/// A contributing mutation moves `Clean -> Dirty`; the next read moves
/// `Dirty -> Clean` and keeps the computed snapshot. Reads of a clean slot
/// hand out the same `Rc`, so callers can check identity with `Rc::ptr_eq`.
#[derive(Debug, Default)]
pub enum MatrixCache {
    #[default]
    Dirty,
    Clean(Rc<Matrix4>),
}

impl MatrixCache {
    pub fn invalidate(&mut self) {
        *self = Self::Dirty;
    }

    pub fn is_clean(&self) -> bool {
        matches!(self, Self::Clean(_))
    }

    pub fn get_or_update(&mut self, compute: impl FnOnce() -> Matrix4) -> Rc<Matrix4> {
        match self {
            Self::Clean(matrix) => Rc::clone(matrix),
            Self::Dirty => {
                let matrix = Rc::new(compute());
                *self = Self::Clean(Rc::clone(&matrix));
                matrix
            }
        }
    }
}
