//! # Subscriptions
//!
//! This crate supports subscribing to channels and patterns (s. [Redis Pub/Sub](https://redis.io/docs/manual/pubsub/)).
//!
//! A subscription is a blocking call on the [Client](crate::network::Client). Callbacks are
//! registered per event type and invoked in the order Redis sends the events. The call returns
//! once no subscription is left.
//!
//! ```no_run
//!# use embedded_nal::SocketAddr;
//!# use core::str::FromStr;
//!# use embedded_nal::TcpClientStack;
//!# use std_embedded_nal::Stack;
//!# use std_embedded_time::StandardClock;
//!# use embedded_redis_pubsub::network::{Client, Resp3};
//!# use embedded_redis_pubsub::subscription::{Error, Flow};
//!#
//!# let mut stack = Stack::default();
//!# let clock = StandardClock::default();
//!# let mut socket = stack.socket().unwrap();
//!# nb::block!(stack.connect(&mut socket, SocketAddr::from_str("127.0.0.1:6379").unwrap())).unwrap();
//! let client = Client::new(&mut stack, &mut socket, Resp3 {}, Some(&clock));
//!
//! let mut received = 0;
//! let counter = &mut received;
//!
//! let result: Result<(), Error<()>> = client.subscribe(["first_channel", "second_channel"], move |callbacks| {
//!     callbacks
//!         .on_subscribe(|_, channel, total| {
//!             println!("Subscribed to {:?}, {} subscriptions in total", channel, total);
//!             Ok(Flow::Continue)
//!         })
//!         .on_message(move |controller, _channel, payload| {
//!             *counter += 1;
//!             if payload.as_ref() == b"quit" {
//!                 controller.unsubscribe_all()?;
//!             }
//!             Ok(Flow::Continue)
//!         });
//! });
//! ```
//!
//! ## Nested (un)subscriptions
//!
//! Callbacks receive a [Controller] which (un)subscribes channels and patterns while the
//! subscription is running. The confirmations are dispatched by the same loop.
//! Starting a new subscription on the client from inside a callback fails with
//! [Error::CommandNotAllowed], as do regular commands
//! ([CommandErrors::CommandNotAllowed](crate::network::CommandErrors::CommandNotAllowed)).
//!
//! ## Stopping
//!
//! Returning [Flow::Stop] terminates the subscription the event belongs to (the channel, or the
//! pattern in case of pattern events). Other subscriptions are not affected.
//!
//! ## Errors
//!
//! If a callback fails, all channels and patterns are unsubscribed and the outstanding confirmations
//! are consumed before the error is returned. So the connection can be used for regular commands
//! afterwards. Fatal errors (s. [Error::is_fatal]), especially timeouts, leave the connection
//! unusable.
pub use client::Error;
pub use controller::Controller;
pub use events::{DecodeError, PushEvent, ToPushEvent};
pub use registry::{Callbacks, Flow};

pub(crate) mod client;
pub(crate) mod controller;
pub(crate) mod dispatcher;
pub(crate) mod events;
pub(crate) mod registry;
pub(crate) mod session;

#[cfg(test)]
mod tests;
