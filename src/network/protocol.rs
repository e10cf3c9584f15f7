use crate::network::client::CommandErrors;
use alloc::string::{String, ToString};
use bytes::{Bytes, BytesMut};
use redis_protocol::resp2::types::Frame as Resp2Frame;
use redis_protocol::resp3::types::DecodedFrame;
use redis_protocol::resp3::types::Frame as Resp3Frame;
use redis_protocol::types::RedisProtocolError;
use redis_protocol::{resp2, resp3};

/// Generic wrapper for redis-protocol encode/decode methods
pub trait Protocol: Clone {
    type FrameType;

    /// Decodes bytes to Frame
    fn decode(&self, data: &Bytes) -> Result<Option<(Self::FrameType, usize)>, RedisProtocolError>;

    /// Encodes Frame to buffer
    fn encode_bytes(&self, buf: &mut BytesMut, frame: &Self::FrameType) -> Result<usize, RedisProtocolError>;

    /// Wraps error replies to [CommandErrors::ErrorResponse]
    fn assert_error(&self, frame: &Self::FrameType) -> Result<(), CommandErrors>;
}

/// Abstraction for RESP2 protocol
///
/// In subscription mode Redis answers with plain arrays.
#[derive(Clone, Debug)]
pub struct Resp2 {}

impl Protocol for Resp2 {
    type FrameType = Resp2Frame;

    fn decode(&self, data: &Bytes) -> Result<Option<(Self::FrameType, usize)>, RedisProtocolError> {
        resp2::decode::decode(data)
    }

    fn encode_bytes(&self, buf: &mut BytesMut, frame: &Self::FrameType) -> Result<usize, RedisProtocolError> {
        resp2::encode::encode_bytes(buf, frame)
    }

    fn assert_error(&self, frame: &Self::FrameType) -> Result<(), CommandErrors> {
        match frame {
            Resp2Frame::Error(message) => Err(CommandErrors::ErrorResponse(message.to_string())),
            _ => Ok(()),
        }
    }
}

/// Abstraction for RESP3 protocol
///
/// In subscription mode Redis delivers confirmations and messages as push frames.
/// The caller is responsible for switching the connection to RESP3 (HELLO 3) beforehand.
#[derive(Clone, Debug)]
pub struct Resp3 {}

impl Protocol for Resp3 {
    type FrameType = Resp3Frame;

    /// Only complete frames are decoded, streamed frames are reported as incomplete (None)
    fn decode(&self, data: &Bytes) -> Result<Option<(Self::FrameType, usize)>, RedisProtocolError> {
        match resp3::decode::streaming::decode(data)? {
            Some((DecodedFrame::Complete(frame), size)) => Ok(Some((frame, size))),
            Some((DecodedFrame::Streaming(_), _)) | None => Ok(None),
        }
    }

    fn encode_bytes(&self, buf: &mut BytesMut, frame: &Self::FrameType) -> Result<usize, RedisProtocolError> {
        resp3::encode::complete::encode_bytes(buf, frame)
    }

    fn assert_error(&self, frame: &Self::FrameType) -> Result<(), CommandErrors> {
        match frame {
            Resp3Frame::BlobError { data, attributes: _ } => Err(CommandErrors::ErrorResponse(
                String::from_utf8_lossy(data).to_string(),
            )),
            Resp3Frame::SimpleError { data, attributes: _ } => Err(CommandErrors::ErrorResponse(data.to_string())),
            _ => Ok(()),
        }
    }
}
