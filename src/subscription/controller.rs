use crate::commands::builder::CommandBuilder;
use crate::network::buffer::Network;
use crate::network::protocol::Protocol;
use crate::network::CommandErrors;
use crate::subscription::client::Error;
use crate::subscription::session::{collect, Kind, SubscriptionSession};
use alloc::vec::Vec;
use bytes::Bytes;
use core::fmt::{Debug, Formatter};
use core::marker::PhantomData;
use embedded_nal::TcpClientStack;
use tracing::debug;

/// Sends (un)subscribe commands on the connection owned by the running subscription
pub(crate) trait CommandSink {
    fn send_command(&self, command: CommandBuilder) -> Result<(), CommandErrors>;
}

impl<N: TcpClientStack, P: Protocol> CommandSink for Network<'_, N, P>
where
    P::FrameType: From<CommandBuilder>,
{
    fn send_command(&self, command: CommandBuilder) -> Result<(), CommandErrors> {
        self.send_frame(command.into())
    }
}

/// Handle for changing the running subscription from inside callbacks
///
/// Commands are sent immediately. The confirmations are processed by the same subscription
/// loop, so the corresponding callbacks are invoked once Redis answers.
///
/// ```no_run
///# use embedded_nal::SocketAddr;
///# use core::str::FromStr;
///# use embedded_nal::TcpClientStack;
///# use std_embedded_nal::Stack;
///# use std_embedded_time::StandardClock;
///# use embedded_redis_pubsub::network::{Client, Resp3};
///# use embedded_redis_pubsub::subscription::{Error, Flow};
///#
///# let mut stack = Stack::default();
///# let clock = StandardClock::default();
///# let mut socket = stack.socket().unwrap();
///# nb::block!(stack.connect(&mut socket, SocketAddr::from_str("127.0.0.1:6379").unwrap())).unwrap();
/// let client = Client::new(&mut stack, &mut socket, Resp3 {}, Some(&clock));
///
/// let result: Result<(), Error<()>> = client.subscribe(["control"], |callbacks| {
///     callbacks.on_message(|controller, _channel, payload| {
///         match payload.as_ref() {
///             b"join" => controller.subscribe(["news"])?,
///             b"leave" => controller.unsubscribe_all()?,
///             _ => {}
///         }
///         Ok(Flow::Continue)
///     });
/// });
/// ```
pub struct Controller<'c, E> {
    sink: &'c dyn CommandSink,
    session: &'c mut SubscriptionSession,
    _error: PhantomData<fn() -> E>,
}

impl<'c, E> Controller<'c, E> {
    pub(crate) fn new(sink: &'c dyn CommandSink, session: &'c mut SubscriptionSession) -> Self {
        Self {
            sink,
            session,
            _error: PhantomData,
        }
    }

    /// Subscribes to the given channels
    pub fn subscribe<I, B>(&mut self, channels: I) -> Result<(), Error<E>>
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        self.extend(Kind::Channel, collect(channels))
    }

    /// Subscribes to the given glob-style patterns
    pub fn psubscribe<I, B>(&mut self, patterns: I) -> Result<(), Error<E>>
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        self.extend(Kind::Pattern, collect(patterns))
    }

    /// Unsubscribes from the given channels. An empty list unsubscribes from all channels.
    ///
    /// Fails with [Error::NoActiveSubscription] if no channel is subscribed.
    pub fn unsubscribe<I, B>(&mut self, channels: I) -> Result<(), Error<E>>
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        self.retract(Kind::Channel, collect(channels))
    }

    /// Unsubscribes from the given patterns. An empty list unsubscribes from all patterns.
    ///
    /// Fails with [Error::NoActiveSubscription] if no pattern is subscribed.
    pub fn punsubscribe<I, B>(&mut self, patterns: I) -> Result<(), Error<E>>
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        self.retract(Kind::Pattern, collect(patterns))
    }

    /// Unsubscribes from all channels
    pub fn unsubscribe_all(&mut self) -> Result<(), Error<E>> {
        self.retract(Kind::Channel, Vec::new())
    }

    /// Unsubscribes from all patterns
    pub fn punsubscribe_all(&mut self) -> Result<(), Error<E>> {
        self.retract(Kind::Pattern, Vec::new())
    }

    /// Confirmed channel subscriptions
    pub fn channels(&self) -> Vec<Bytes> {
        self.session.names(Kind::Channel)
    }

    /// Confirmed pattern subscriptions
    pub fn patterns(&self) -> Vec<Bytes> {
        self.session.names(Kind::Pattern)
    }

    /// Total number of subscriptions reported by the last channel confirmation
    pub fn last_channel_count(&self) -> Option<usize> {
        self.session.last_count(Kind::Channel)
    }

    /// Total number of subscriptions reported by the last pattern confirmation
    pub fn last_pattern_count(&self) -> Option<usize> {
        self.session.last_count(Kind::Pattern)
    }

    pub(crate) fn extend(&mut self, kind: Kind, names: Vec<Bytes>) -> Result<(), Error<E>> {
        if names.is_empty() {
            return Err(Error::EmptySubscription);
        }

        debug!(keyword = kind.subscribe_keyword(), count = names.len(), "sending subscription");
        self.sink
            .send_command(CommandBuilder::new(kind.subscribe_keyword()).args(&names))?;
        self.session.subscribing(kind, &names);
        Ok(())
    }

    pub(crate) fn retract(&mut self, kind: Kind, names: Vec<Bytes>) -> Result<(), Error<E>> {
        if !self.session.has_any(kind) {
            return Err(Error::NoActiveSubscription);
        }

        debug!(keyword = kind.unsubscribe_keyword(), count = names.len(), "sending unsubscription");
        self.sink
            .send_command(CommandBuilder::new(kind.unsubscribe_keyword()).args(&names))?;
        self.session.unsubscribing(kind, &names);
        Ok(())
    }
}

impl<E> Debug for Controller<'_, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Controller").field("session", &self.session).finish()
    }
}
