// Per-connection state, and the configuration of the reactor that owns it.

mod connect_context;
mod reactor_configuration;

pub(crate) use connect_context::{ConnState, ConnectContext};
pub use reactor_configuration::ReactorConfiguration;
