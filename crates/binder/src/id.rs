//! Opaque handles for controllers and views.
//!
//! Both are plain `u64` keys into engine-owned stores; neither carries any
//! meaning outside the [`Binder`](crate::Binder) that allocated it.

/// Stable identity of a controller record in the engine's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ControllerId(u64);

impl ControllerId {
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

/// Stable identity of a view owned by a controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ViewId(u64);

impl ViewId {
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}
