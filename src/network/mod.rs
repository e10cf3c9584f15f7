pub use client::{Client, CommandErrors};
pub use future::Future;
pub use protocol::{Protocol, Resp2, Resp3};
pub use response::MemoryParameters;

pub(crate) mod buffer;
pub(crate) mod client;
pub(crate) mod future;
pub(crate) mod protocol;
pub(crate) mod response;
pub(crate) mod timeout;
