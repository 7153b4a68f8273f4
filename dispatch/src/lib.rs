//! Boundary between the decomposition registry and the hosting runtime's
//! dispatcher.
//!
//! The registry needs two things from a dispatcher: a textual dump of the
//! kernels registered for an operator, and a way to install a callable as the
//! operator's abstract (meta) kernel. [`Dispatcher`] captures exactly that.
//! [`InMemoryDispatcher`] is a self-contained implementation used by tests and
//! by hosts that do not have a dispatcher of their own.

pub mod dispatcher;
pub mod error;
pub mod key;
pub mod memory;


pub use dispatcher::Dispatcher;
pub use error::{Error, Result};
pub use key::DispatchKey;
pub use memory::{InMemoryDispatcher, KernelSlot};
