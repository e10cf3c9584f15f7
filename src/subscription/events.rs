use crate::subscription::session::{Ack, Kind};
use bytes::Bytes;
use redis_protocol::resp2::types::Frame as Resp2Frame;
use redis_protocol::resp3::types::Frame as Resp3Frame;

/// A decoded Pub/Sub push event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushEvent {
    /// Confirmation of a channel subscription. Total is the number of subscriptions reported by Redis.
    Subscribed { name: Bytes, total: usize },
    /// Confirmation of a channel unsubscription. Name is empty if nothing was subscribed.
    Unsubscribed { name: Bytes, total: usize },
    /// A message published to a subscribed channel
    Message { channel: Bytes, payload: Bytes },
    /// Confirmation of a pattern subscription
    PSubscribed { pattern: Bytes, total: usize },
    /// Confirmation of a pattern unsubscription. Pattern is empty if nothing was subscribed.
    PUnsubscribed { pattern: Bytes, total: usize },
    /// A message published to a channel matching a subscribed pattern
    PMessage {
        pattern: Bytes,
        channel: Bytes,
        payload: Bytes,
    },
    /// Any frame which is not a known Pub/Sub reply (e.g. pong). Ignored by the dispatcher.
    Unknown,
}

impl PushEvent {
    /// Splits (un)subscribe confirmations into their parts. Any other event is returned unchanged as error.
    pub(crate) fn into_ack(self) -> Result<(Kind, Ack, Bytes, usize), PushEvent> {
        match self {
            PushEvent::Subscribed { name, total } => Ok((Kind::Channel, Ack::Subscribe, name, total)),
            PushEvent::Unsubscribed { name, total } => Ok((Kind::Channel, Ack::Unsubscribe, name, total)),
            PushEvent::PSubscribed { pattern, total } => Ok((Kind::Pattern, Ack::Subscribe, pattern, total)),
            PushEvent::PUnsubscribed { pattern, total } => Ok((Kind::Pattern, Ack::Unsubscribe, pattern, total)),
            event => Err(event),
        }
    }
}

/// Errors related for decoding push messages
#[derive(Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// Invalid message format (violation of RESP2 or RESP3 specification)
    ProtocolViolation,
    /// The given subscription count overflows usize
    IntegerOverflow,
}

/// Decodes frames to push events
pub trait ToPushEvent {
    /// Tries to decode the frame to a push event
    fn decode_push(self) -> Result<PushEvent, DecodeError>
    where
        Self: Sized,
    {
        Decoder::new(self).decode()
    }

    /// Returns the inner elements if the frame is shaped like a Pub/Sub reply
    fn as_pubsub_array(&self) -> Option<&[Self]>
    where
        Self: Sized;

    /// Validates that the frame is a string type and clones the inner Bytes value
    fn byte_string(&self) -> Result<Bytes, DecodeError>;

    /// Validates that the frame is a number type and returns the inner value
    fn number(&self) -> Result<i64, DecodeError>;

    fn is_null_frame(&self) -> bool;
}

impl ToPushEvent for Resp2Frame {
    fn as_pubsub_array(&self) -> Option<&[Self]> {
        match self {
            Resp2Frame::Array(data) => Some(data),
            _ => None,
        }
    }

    fn byte_string(&self) -> Result<Bytes, DecodeError> {
        match self {
            Resp2Frame::BulkString(data) | Resp2Frame::SimpleString(data) => Ok(data.clone()),
            _ => Err(DecodeError::ProtocolViolation),
        }
    }

    fn number(&self) -> Result<i64, DecodeError> {
        match self {
            Resp2Frame::Integer(number) => Ok(*number),
            _ => Err(DecodeError::ProtocolViolation),
        }
    }

    fn is_null_frame(&self) -> bool {
        self.is_null()
    }
}

impl ToPushEvent for Resp3Frame {
    fn as_pubsub_array(&self) -> Option<&[Self]> {
        match self {
            Resp3Frame::Push { data, attributes: _ } => Some(data),
            _ => None,
        }
    }

    fn byte_string(&self) -> Result<Bytes, DecodeError> {
        match self {
            Resp3Frame::BlobString { data, attributes: _ } | Resp3Frame::SimpleString { data, attributes: _ } => {
                Ok(data.clone())
            }
            _ => Err(DecodeError::ProtocolViolation),
        }
    }

    fn number(&self) -> Result<i64, DecodeError> {
        match self {
            Resp3Frame::Number { data, attributes: _ } => Ok(*data),
            _ => Err(DecodeError::ProtocolViolation),
        }
    }

    fn is_null_frame(&self) -> bool {
        self.is_null()
    }
}

/// Generic push event decoder for RESP2 + RESP3 frames
struct Decoder<F: ToPushEvent> {
    frame: F,
}

impl<F: ToPushEvent> Decoder<F> {
    pub fn new(frame: F) -> Self {
        Self { frame }
    }

    pub fn decode(self) -> Result<PushEvent, DecodeError> {
        let data = match self.frame.as_pubsub_array() {
            Some(data) => data,
            None => return Ok(PushEvent::Unknown),
        };

        // Arrays of other types (e.g. integers) are no Pub/Sub replies
        let kind = match data.first().map(ToPushEvent::byte_string) {
            Some(Ok(kind)) => kind,
            _ => return Ok(PushEvent::Unknown),
        };

        match &kind[..] {
            b"subscribe" => Ok(PushEvent::Subscribed {
                name: self.name(data)?,
                total: self.total(data)?,
            }),
            b"unsubscribe" => Ok(PushEvent::Unsubscribed {
                name: self.name(data)?,
                total: self.total(data)?,
            }),
            b"psubscribe" => Ok(PushEvent::PSubscribed {
                pattern: self.name(data)?,
                total: self.total(data)?,
            }),
            b"punsubscribe" => Ok(PushEvent::PUnsubscribed {
                pattern: self.name(data)?,
                total: self.total(data)?,
            }),
            b"message" => {
                let (channel, payload) = (self.element(data, 1)?, self.element(data, 2)?);
                Ok(PushEvent::Message { channel, payload })
            }
            b"pmessage" => Ok(PushEvent::PMessage {
                pattern: self.element(data, 1)?,
                channel: self.element(data, 2)?,
                payload: self.element(data, 3)?,
            }),
            _ => Ok(PushEvent::Unknown),
        }
    }

    /// Channel or pattern name of a confirmation. Nil (bare unsubscribe without subscriptions) is decoded as empty name.
    fn name(&self, data: &[F]) -> Result<Bytes, DecodeError> {
        match data.get(1) {
            Some(frame) if frame.is_null_frame() => Ok(Bytes::new()),
            Some(frame) => frame.byte_string(),
            None => Err(DecodeError::ProtocolViolation),
        }
    }

    /// Total subscription count of a confirmation
    fn total(&self, data: &[F]) -> Result<usize, DecodeError> {
        let count = data.get(2).ok_or(DecodeError::ProtocolViolation)?.number()?;
        if count.is_negative() {
            return Err(DecodeError::ProtocolViolation);
        }

        usize::try_from(count).map_err(|_| DecodeError::IntegerOverflow)
    }

    fn element(&self, data: &[F], index: usize) -> Result<Bytes, DecodeError> {
        data.get(index).ok_or(DecodeError::ProtocolViolation)?.byte_string()
    }
}
