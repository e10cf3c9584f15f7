//! Abstraction of Pub/Sub request/response commands.
//!
//! Covers [PUBLISH](<https://redis.io/commands/publish/>) and the introspection commands
//! [PUBSUB NUMSUB](<https://redis.io/commands/pubsub-numsub/>),
//! [PUBSUB NUMPAT](<https://redis.io/commands/pubsub-numpat/>) and
//! [PUBSUB CHANNELS](<https://redis.io/commands/pubsub-channels/>).
//!
//! These are regular commands: they can't be issued on a connection while it is in subscription
//! mode and fail with [CommandNotAllowed](crate::network::CommandErrors::CommandNotAllowed) in that case.
//!
//! # Publishing
//! ```no_run
//!# use embedded_nal::SocketAddr;
//!# use core::str::FromStr;
//!# use embedded_nal::TcpClientStack;
//!# use std_embedded_nal::Stack;
//!# use std_embedded_time::StandardClock;
//!# use embedded_redis_pubsub::commands::pubsub::PublishCommand;
//!# use embedded_redis_pubsub::network::{Client, Resp2};
//!#
//!# let mut stack = Stack::default();
//!# let clock = StandardClock::default();
//!# let mut socket = stack.socket().unwrap();
//!# nb::block!(stack.connect(&mut socket, SocketAddr::from_str("127.0.0.1:6379").unwrap())).unwrap();
//! let client = Client::new(&mut stack, &mut socket, Resp2 {}, Some(&clock));
//!
//! // Returns the number of clients that received the message
//! let receivers = client.send(PublishCommand::new("news", "hello")).unwrap().wait().unwrap();
//!
//! // Shorthand
//! let _ = client.publish("news", "hello").unwrap().wait();
//! ```
//! # Subscriber counts
//! ```no_run
//!# use embedded_nal::SocketAddr;
//!# use core::str::FromStr;
//!# use embedded_nal::TcpClientStack;
//!# use std_embedded_nal::Stack;
//!# use std_embedded_time::StandardClock;
//!# use embedded_redis_pubsub::network::{Client, Resp2};
//!#
//!# let mut stack = Stack::default();
//!# let clock = StandardClock::default();
//!# let mut socket = stack.socket().unwrap();
//!# nb::block!(stack.connect(&mut socket, SocketAddr::from_str("127.0.0.1:6379").unwrap())).unwrap();
//! let client = Client::new(&mut stack, &mut socket, Resp2 {}, Some(&clock));
//!
//! let counts = client.pubsub_numsub(["news", "weather"]).unwrap().wait().unwrap();
//! assert_eq!(Some(0), counts.get("weather"));
//! ```
use crate::commands::builder::{CommandBuilder, ToInteger, ToStringBytes};
use crate::commands::{Command, ResponseTypeError};
use crate::network::client::{Client, CommandErrors};
use crate::network::future::Future;
use crate::network::protocol::Protocol;
use alloc::vec::Vec;
use bytes::Bytes;
use embedded_nal::TcpClientStack;
use embedded_time::Clock;
use redis_protocol::resp2::types::Frame as Resp2Frame;
use redis_protocol::resp3::types::Frame as Resp3Frame;

/// Abstraction for PUBLISH command
#[derive(Debug)]
pub struct PublishCommand {
    channel: Bytes,
    message: Bytes,
}

impl PublishCommand {
    pub fn new<C, M>(channel: C, message: M) -> Self
    where
        Bytes: From<C>,
        Bytes: From<M>,
    {
        PublishCommand {
            channel: channel.into(),
            message: message.into(),
        }
    }
}

impl<F> Command<F> for PublishCommand
where
    F: From<CommandBuilder> + ToInteger,
{
    /// the number of clients that received the message
    type Response = i64;

    fn encode(&self) -> F {
        CommandBuilder::new("PUBLISH").arg(&self.channel).arg(&self.message).into()
    }

    fn eval_response(&self, frame: F) -> Result<Self::Response, ResponseTypeError> {
        frame.to_integer().ok_or(ResponseTypeError {})
    }
}

/// Abstraction for PUBSUB NUMSUB command
#[derive(Debug)]
pub struct NumSubCommand {
    channels: Vec<Bytes>,
}

impl NumSubCommand {
    pub fn new<I, B>(channels: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        NumSubCommand {
            channels: channels.into_iter().map(Into::into).collect(),
        }
    }
}

/// Number of subscribers per channel, in order of the requested channels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberCounts {
    inner: Vec<(Bytes, i64)>,
}

impl SubscriberCounts {
    /// Returns the subscriber count of the given channel, None if the channel was not part of the request
    pub fn get(&self, channel: &str) -> Option<i64> {
        self.inner
            .iter()
            .find(|(name, _)| name.as_ref() == channel.as_bytes())
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Bytes, i64)> {
        self.inner.iter()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<F> Command<F> for NumSubCommand
where
    F: From<CommandBuilder> + ToCountPairs,
{
    type Response = SubscriberCounts;

    fn encode(&self) -> F {
        CommandBuilder::new("PUBSUB").arg_static("NUMSUB").args(&self.channels).into()
    }

    fn eval_response(&self, frame: F) -> Result<Self::Response, ResponseTypeError> {
        let pairs = frame.to_count_pairs().ok_or(ResponseTypeError {})?;

        // RESP3 maps are unordered, so the request order is restored
        let mut inner = Vec::with_capacity(self.channels.len());
        for channel in &self.channels {
            let count = pairs
                .iter()
                .find(|(name, _)| name == channel)
                .map(|(_, count)| *count)
                .ok_or(ResponseTypeError {})?;
            inner.push((channel.clone(), count));
        }

        Ok(SubscriberCounts { inner })
    }
}

/// Abstraction for PUBSUB NUMPAT command
#[derive(Debug, Default)]
pub struct NumPatCommand {}

impl<F> Command<F> for NumPatCommand
where
    F: From<CommandBuilder> + ToInteger,
{
    /// Number of unique patterns all clients are subscribed to
    type Response = i64;

    fn encode(&self) -> F {
        CommandBuilder::new("PUBSUB").arg_static("NUMPAT").into()
    }

    fn eval_response(&self, frame: F) -> Result<Self::Response, ResponseTypeError> {
        frame.to_integer().ok_or(ResponseTypeError {})
    }
}

/// Abstraction for PUBSUB CHANNELS command
#[derive(Debug)]
pub struct ChannelsCommand {
    pattern: Option<Bytes>,
}

impl ChannelsCommand {
    /// Lists all active channels, optionally filtered by the given glob-style pattern
    pub fn new(pattern: Option<Bytes>) -> Self {
        ChannelsCommand { pattern }
    }
}

impl<F> Command<F> for ChannelsCommand
where
    F: From<CommandBuilder> + ToStringList,
{
    /// Active channels (channels with at least one subscriber)
    type Response = Vec<Bytes>;

    fn encode(&self) -> F {
        CommandBuilder::new("PUBSUB")
            .arg_static("CHANNELS")
            .arg_option(self.pattern.as_ref())
            .into()
    }

    fn eval_response(&self, frame: F) -> Result<Self::Response, ResponseTypeError> {
        frame.to_string_list().ok_or(ResponseTypeError {})
    }
}

/// Unification for extracting the flat (name, count) pairs of PUBSUB NUMSUB replies
pub trait ToCountPairs {
    /// None in case the frame has an unexpected shape
    fn to_count_pairs(&self) -> Option<Vec<(Bytes, i64)>>;
}

impl ToCountPairs for Resp2Frame {
    fn to_count_pairs(&self) -> Option<Vec<(Bytes, i64)>> {
        match self {
            Resp2Frame::Array(data) => flat_pairs(data),
            _ => None,
        }
    }
}

impl ToCountPairs for Resp3Frame {
    fn to_count_pairs(&self) -> Option<Vec<(Bytes, i64)>> {
        match self {
            Resp3Frame::Array { data, attributes: _ } => flat_pairs(data),
            Resp3Frame::Map { data, attributes: _ } => data
                .iter()
                .map(|(name, count)| Some((name.to_string_bytes()?, count.to_integer()?)))
                .collect(),
            _ => None,
        }
    }
}

fn flat_pairs<F: ToStringBytes + ToInteger>(data: &[F]) -> Option<Vec<(Bytes, i64)>> {
    if data.len() % 2 != 0 {
        return None;
    }

    data.chunks(2)
        .map(|pair| Some((pair[0].to_string_bytes()?, pair[1].to_integer()?)))
        .collect()
}

/// Unification for extracting string arrays
pub trait ToStringList {
    /// None in case the frame is no array or contains non-string elements
    fn to_string_list(&self) -> Option<Vec<Bytes>>;
}

impl ToStringList for Resp2Frame {
    fn to_string_list(&self) -> Option<Vec<Bytes>> {
        match self {
            Resp2Frame::Array(data) => data.iter().map(ToStringBytes::to_string_bytes).collect(),
            _ => None,
        }
    }
}

impl ToStringList for Resp3Frame {
    fn to_string_list(&self) -> Option<Vec<Bytes>> {
        match self {
            Resp3Frame::Array { data, attributes: _ } => data.iter().map(ToStringBytes::to_string_bytes).collect(),
            Resp3Frame::Set { data, attributes: _ } => data.iter().map(ToStringBytes::to_string_bytes).collect(),
            _ => None,
        }
    }
}

impl<'a, N: TcpClientStack, C: Clock, P: Protocol> Client<'a, N, C, P> {
    /// Shorthand for [PublishCommand]
    pub fn publish<K, V>(
        &'a self,
        channel: K,
        message: V,
    ) -> Result<Future<'a, N, C, P, PublishCommand>, CommandErrors>
    where
        <P as Protocol>::FrameType: ToInteger,
        <P as Protocol>::FrameType: From<CommandBuilder>,
        Bytes: From<K>,
        Bytes: From<V>,
    {
        self.send(PublishCommand::new(channel, message))
    }

    /// Shorthand for [NumSubCommand]
    pub fn pubsub_numsub<I, B>(&'a self, channels: I) -> Result<Future<'a, N, C, P, NumSubCommand>, CommandErrors>
    where
        <P as Protocol>::FrameType: ToCountPairs,
        <P as Protocol>::FrameType: From<CommandBuilder>,
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        self.send(NumSubCommand::new(channels))
    }

    /// Shorthand for [NumPatCommand]
    pub fn pubsub_numpat(&'a self) -> Result<Future<'a, N, C, P, NumPatCommand>, CommandErrors>
    where
        <P as Protocol>::FrameType: ToInteger,
        <P as Protocol>::FrameType: From<CommandBuilder>,
    {
        self.send(NumPatCommand::default())
    }

    /// Shorthand for [ChannelsCommand]
    pub fn pubsub_channels(
        &'a self,
        pattern: Option<Bytes>,
    ) -> Result<Future<'a, N, C, P, ChannelsCommand>, CommandErrors>
    where
        <P as Protocol>::FrameType: ToStringList,
        <P as Protocol>::FrameType: From<CommandBuilder>,
    {
        self.send(ChannelsCommand::new(pattern))
    }
}
