//! This crate offers a non-blocking Redis Pub/Sub client for no_std targets.
//! Both RESP2 and RESP3 protocol are supported.
//!
//! This crate consists of three parts:
//! * [network module](crate::network) for network details (client, response management, timeouts)
//! * [commands module](crate::commands) for Redis command abstractions (PUBLISH, PUBSUB introspection)
//! * [subscription module](crate::subscription) for the callback driven subscription engine
//!
//! ```no_run
//!# use embedded_nal::SocketAddr;
//!# use core::str::FromStr;
//!# use embedded_nal::TcpClientStack;
//!# use std_embedded_nal::Stack;
//!# use std_embedded_time::StandardClock;
//!# use embedded_redis_pubsub::network::{Client, Resp2};
//!#
//! let mut stack = Stack::default();
//! let clock = StandardClock::default();
//!
//! let mut socket = stack.socket().unwrap();
//! nb::block!(stack.connect(&mut socket, SocketAddr::from_str("127.0.0.1:6379").unwrap())).unwrap();
//!
//! let client = Client::new(&mut stack, &mut socket, Resp2 {}, Some(&clock));
//! let receivers = client.publish("news", "hello").unwrap().wait().unwrap();
//! ```
#![cfg_attr(all(not(test), not(feature = "mock")), no_std)]
#![cfg_attr(feature = "strict", deny(warnings))]

extern crate alloc;

/// # Redis command abstractions
///
/// This crates includes abstractions for the Pub/Sub related commands
/// [PUBLISH](crate::commands::pubsub::PublishCommand),
/// [PUBSUB NUMSUB](crate::commands::pubsub::NumSubCommand),
/// [PUBSUB NUMPAT](crate::commands::pubsub::NumPatCommand) and
/// [PUBSUB CHANNELS](crate::commands::pubsub::ChannelsCommand).
///
/// Each abstraction is implementing the [Command](crate::commands::Command) trait.
///
/// For executing arbitrary commands, [CustomCommand](crate::commands::custom) may be used.
/// As alternative you can create new commands by implementing the [Command](crate::commands::Command) trait.
pub mod commands;

/// # Client and connection logic
///
/// ## Client
///
/// The [Client](crate::network::Client) wraps an already connected socket.
/// Both [RESP2](https://redis.io/docs/reference/protocol-spec/) and [RESP3](https://github.com/antirez/RESP3/blob/master/spec.md)
/// protocol are supported. Switching the connection to RESP3 (HELLO 3) and authentication are up to the caller.
///
/// Creating a new client requires the following things:
/// * A network stack implementing [embedded-nal](<https://docs.rs/embedded-nal/latest/embedded_nal/>) and a connected socket
/// * A clock implementing [embedded-time](<https://docs.rs/embedded-time/latest/embedded_time/>). Optional if no timeout is used.
///
/// ### Timeout
///
/// The client includes a timeout mechanism. This allows setting a time limit for responses from the Redis server:
///
/// ```no_run
///# use embedded_nal::SocketAddr;
///# use core::str::FromStr;
///# use embedded_nal::TcpClientStack;
///# use embedded_time::duration::Extensions;
///# use std_embedded_nal::Stack;
///# use std_embedded_time::StandardClock;
///# use embedded_redis_pubsub::network::{Client, Resp3};
///#
///# let mut stack = Stack::default();
///# let clock = StandardClock::default();
///# let mut socket = stack.socket().unwrap();
///# nb::block!(stack.connect(&mut socket, SocketAddr::from_str("127.0.0.1:6379").unwrap())).unwrap();
/// let client = Client::new(&mut stack, &mut socket, Resp3 {}, Some(&clock)).timeout(500_000.microseconds());
/// ```
///
/// ## Non-blocking response management
///
/// Redis server responses are managed as [Future](crate::network::Future). This allows executing multiple commands non-blocking
/// simultaneously and handle responses in any order at any point in time:
/// ```no_run
///# use embedded_nal::SocketAddr;
///# use core::str::FromStr;
///# use embedded_nal::TcpClientStack;
///# use std_embedded_nal::Stack;
///# use std_embedded_time::StandardClock;
///# use embedded_redis_pubsub::network::{Client, Resp2};
///#
///# let mut stack = Stack::default();
///# let clock = StandardClock::default();
///# let mut socket = stack.socket().unwrap();
///# nb::block!(stack.connect(&mut socket, SocketAddr::from_str("127.0.0.1:6379").unwrap())).unwrap();
///# let client = Client::new(&mut stack, &mut socket, Resp2 {}, Some(&clock));
/// let future1 = client.publish("news", "first").unwrap();
/// let future2 = client.pubsub_numpat().unwrap();
///
/// let _ = future2.wait();
/// let _ = future1.wait();
/// ```
///
/// ### Timeout error
///
/// In the event of a timeout error, all remaining futures will be invalidated, as the assignment of
/// responses can no longer be guaranteed. In case of a invalidated future [InvalidFuture](crate::network::CommandErrors::InvalidFuture)
/// error is returned when calling `wait()`.
///
/// ### Subscription mode
///
/// While a subscription is running, regular commands fail with
/// [CommandNotAllowed](crate::network::CommandErrors::CommandNotAllowed). A subscription can only be started
/// once all futures are resolved or dropped.
pub mod network;

/// # Pub/Sub subscriptions
///
/// Callback driven subscriptions to channels and patterns. See [Client::subscribe](crate::network::Client::subscribe).
pub mod subscription;
