//! Declarative binding layer between a markup tree and controller records,
//! plus the filtered publish/subscribe routing that lets a view's events
//! reach only the controllers that logically own it, directly or through
//! any depth of delegation.
//!
//! The engine is single-threaded and synchronous: `parse`, `place`,
//! delegate creation/destruction, and publish dispatch all run to
//! completion on the calling thread. Handlers receive published arguments
//! only and cannot re-enter the engine, so a handler can never mutate a
//! delegate list that a dispatch in the same call stack is scanning.

pub mod bus;
pub mod topics;
pub mod value;

mod controller;
mod engine;
mod error;
mod history;
mod id;
mod place;
mod registry;
mod route;
mod view;

mod parse;

pub use crate::bus::{Arg, Handler, Origin, Publication};
pub use crate::controller::DelegateSpec;
pub use crate::engine::{BIND_ATTR, Binder, BinderConfig, GROUP_ATTR, TYPE_ATTR};
pub use crate::error::BinderError;
pub use crate::id::{ControllerId, ViewId};
pub use crate::place::{Content, Position};
pub use crate::registry::{BuiltController, ClassDescriptor, ClassSpec, Factory};
pub use crate::topics::Topic;
pub use crate::value::{FuncRef, TypeTag, Value, coerce, infer_type};
pub use crate::view::Views;
