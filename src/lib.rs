//! Facade crate: re-exports the binding engine and the markup tree it
//! operates on.

pub use binder;
pub use markup;

pub use binder::{Binder, BinderConfig};
