use crate::commands::builder::CommandBuilder;
use crate::network::protocol::Protocol;
use crate::network::timeout::{Timeout, TimeoutError};
use crate::network::{Client, CommandErrors};
use crate::subscription::dispatcher::Dispatcher;
use crate::subscription::events::ToPushEvent;
use crate::subscription::registry::Callbacks;
use crate::subscription::session::{collect, Kind};
use alloc::vec::Vec;
use bytes::Bytes;
use embedded_nal::TcpClientStack;
use embedded_time::duration::Microseconds;
use embedded_time::Clock;
use tracing::debug;

/// Subscription errors
///
/// E is the error type of the callbacks, use `()` if the callbacks never fail.
#[derive(Debug, Eq, PartialEq, Clone)]
pub enum Error<E> {
    /// No callback was registered
    MissingRegistration,
    /// Subscription to an empty list of channels/patterns
    EmptySubscription,
    /// Unsubscribing while no subscription of that kind (channel or pattern) exists
    NoActiveSubscription,
    /// A subscription is already running on this connection, so only (un)subscribing using the
    /// [Controller](crate::subscription::Controller) is possible
    CommandNotAllowed,
    /// The deadline expired. *The connection is unusable afterwards and needs to be reestablished*.
    Timeout,
    /// Redis sent data violating the RESP or Pub/Sub specification
    ProtocolViolation,
    /// Low level network error
    TcpError,
    /// Upstream timer/clock failure or missing clock
    ClockError,
    /// Any other error of the underlying connection (e.g. Redis error response)
    Command(CommandErrors),
    /// Error returned by a callback
    Handler(E),
}

impl<E> Error<E> {
    /// True if the error breaks the connection
    ///
    /// Fatal errors abort the subscription immediately. Replies may still be outstanding, so
    /// the client refuses any further command with [CommandErrors::ConnectionUnusable].
    /// On all other errors the subscriptions are terminated cleanly and the client stays usable.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Timeout | Error::ProtocolViolation | Error::TcpError | Error::ClockError | Error::Command(_)
        )
    }
}

impl<E> From<CommandErrors> for Error<E> {
    fn from(error: CommandErrors) -> Self {
        match error {
            CommandErrors::TcpError => Error::TcpError,
            CommandErrors::ProtocolViolation => Error::ProtocolViolation,
            CommandErrors::CommandNotAllowed => Error::CommandNotAllowed,
            CommandErrors::Timeout => Error::Timeout,
            CommandErrors::TimerError => Error::ClockError,
            error => Error::Command(error),
        }
    }
}

impl<E> From<TimeoutError> for Error<E> {
    fn from(_: TimeoutError) -> Self {
        Error::ClockError
    }
}

impl<'a, N, C, P> Client<'a, N, C, P>
where
    N: TcpClientStack,
    C: Clock,
    P: Protocol,
    <P as Protocol>::FrameType: From<CommandBuilder>,
    <P as Protocol>::FrameType: ToPushEvent,
{
    /// Subscribes to the given channels and dispatches events to the registered callbacks
    ///
    /// Blocks until all subscriptions are terminated, either by unsubscribing in a callback
    /// or by returning [Flow::Stop](crate::subscription::Flow::Stop).
    pub fn subscribe<'h, E, I, B, R>(&self, channels: I, register: R) -> Result<(), Error<E>>
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
        R: FnOnce(&mut Callbacks<'h, E>),
    {
        self.listen(Kind::Channel, collect(channels), register, None)
    }

    /// Subscribes to the given glob-style patterns, s. [Client::subscribe]
    pub fn psubscribe<'h, E, I, B, R>(&self, patterns: I, register: R) -> Result<(), Error<E>>
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
        R: FnOnce(&mut Callbacks<'h, E>),
    {
        self.listen(Kind::Pattern, collect(patterns), register, None)
    }

    /// Like [Client::subscribe], but the whole call is bounded by the given duration
    ///
    /// Fails with [Error::Timeout] on expiry, which leaves the connection unusable.
    /// Requires a clock, a zero duration disables the deadline.
    pub fn subscribe_with_timeout<'h, E, I, B, R>(
        &self,
        timeout: Microseconds,
        channels: I,
        register: R,
    ) -> Result<(), Error<E>>
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
        R: FnOnce(&mut Callbacks<'h, E>),
    {
        self.listen(Kind::Channel, collect(channels), register, Some(timeout))
    }

    /// Like [Client::psubscribe], but the whole call is bounded by the given duration
    pub fn psubscribe_with_timeout<'h, E, I, B, R>(
        &self,
        timeout: Microseconds,
        patterns: I,
        register: R,
    ) -> Result<(), Error<E>>
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
        R: FnOnce(&mut Callbacks<'h, E>),
    {
        self.listen(Kind::Pattern, collect(patterns), register, Some(timeout))
    }

    fn listen<'h, E, R>(
        &self,
        kind: Kind,
        names: Vec<Bytes>,
        register: R,
        timeout: Option<Microseconds>,
    ) -> Result<(), Error<E>>
    where
        R: FnOnce(&mut Callbacks<'h, E>),
    {
        if names.is_empty() {
            return Err(Error::EmptySubscription);
        }

        let mut callbacks = Callbacks::new();
        register(&mut callbacks);
        if callbacks.is_empty() {
            return Err(Error::MissingRegistration);
        }

        let deadline = match timeout {
            None => Timeout::unbounded(),
            Some(duration) => Timeout::deadline(self.clock, duration)?,
        };

        debug!(?kind, count = names.len(), "starting subscription");
        Dispatcher::new(callbacks, deadline).run(self, kind, names)
    }
}
