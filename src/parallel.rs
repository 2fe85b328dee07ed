use std::cell::UnsafeCell;

/// A cell that hands out concurrent `&mut` views of the same value. Sound
/// only when the caller can prove every concurrent access touches a
/// disjoint part of `T` — here, disjoint tiles of the same framebuffer —
/// which is a property the type system can't express for a shared slice.
pub struct TrustedThreadSafe<T> {
    inner: UnsafeCell<T>,
}

impl<T> TrustedThreadSafe<T> {
    pub fn new(value: T) -> TrustedThreadSafe<T> {
        TrustedThreadSafe { inner: UnsafeCell::new(value) }
    }

    pub fn as_mut(&self) -> &mut T {
        unsafe { &mut *self.inner.get() }
    }
}

unsafe impl<T> Send for TrustedThreadSafe<T> {}

unsafe impl<T> Sync for TrustedThreadSafe<T> {}
