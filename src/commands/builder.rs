//! Builder for constructing RESP2/3 frames
//!
//! Used internally for all commands, including SUBSCRIBE and UNSUBSCRIBE of the
//! [subscription engine](crate::subscription). It can also be used to execute
//! arbitrary commands, see [CustomCommand](crate::commands::custom).
//!
//! ```
//! use embedded_redis_pubsub::commands::builder::CommandBuilder;
//! use redis_protocol::resp2::types::Frame as Resp2Frame;
//!
//! let _frame: Resp2Frame = CommandBuilder::new("PUBSUB")
//!     .arg_static("NUMSUB")
//!     .arg_static("news")
//!     .into();
//! ```
use crate::commands::custom::CustomCommand;
use alloc::vec;
use alloc::vec::Vec;
use bytes::Bytes;
use redis_protocol::resp2::types::Frame as Resp2Frame;
use redis_protocol::resp3::types::Frame as Resp3Frame;

/// Builder for constructing RESP2/3 frames
#[derive(Clone, Default, Debug)]
pub struct CommandBuilder {
    pub(crate) elements: Vec<Bytes>,
}

impl CommandBuilder {
    pub fn new(keyword: &'static str) -> Self {
        CommandBuilder {
            elements: vec![Bytes::from_static(keyword.as_bytes())],
        }
    }

    /// Converts builder to command ready for being sent by Client
    pub fn to_command(self) -> CustomCommand {
        self.into()
    }

    /// Adds a static argument
    pub fn arg_static(mut self, arg: &'static str) -> Self {
        self.elements.push(Bytes::from_static(arg.as_bytes()));
        self
    }

    /// Adds a byte argument
    /// Note: Besides static, the most efficient way caused by the nature how Bytes cloning is working
    pub fn arg(mut self, arg: &Bytes) -> Self {
        self.elements.push(arg.clone());
        self
    }

    /// Just adding byte if option is Some
    pub fn arg_option(mut self, arg: Option<&Bytes>) -> Self {
        if let Some(inner) = arg {
            self.elements.push(inner.clone());
        }
        self
    }

    /// Adds all given arguments in order
    pub fn args<'b, I>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = &'b Bytes>,
    {
        self.elements.extend(args.into_iter().cloned());
        self
    }
}

impl From<CommandBuilder> for Resp2Frame {
    fn from(builder: CommandBuilder) -> Self {
        Resp2Frame::Array(builder.elements.into_iter().map(Resp2Frame::BulkString).collect())
    }
}

impl From<CommandBuilder> for Resp3Frame {
    fn from(builder: CommandBuilder) -> Self {
        let frames = builder
            .elements
            .into_iter()
            .map(|data| Resp3Frame::BlobString { data, attributes: None })
            .collect();

        Resp3Frame::Array {
            data: frames,
            attributes: None,
        }
    }
}

impl From<CommandBuilder> for CustomCommand {
    fn from(builder: CommandBuilder) -> Self {
        CustomCommand::new(builder)
    }
}

/// Unification for extracting integer value of Frames
pub trait ToInteger {
    /// Returns the inner integer value, None in case frame is not integer type
    fn to_integer(&self) -> Option<i64>;
}

impl ToInteger for Resp2Frame {
    fn to_integer(&self) -> Option<i64> {
        match self {
            Resp2Frame::Integer(number) => Some(*number),
            _ => None,
        }
    }
}

impl ToInteger for Resp3Frame {
    fn to_integer(&self) -> Option<i64> {
        match self {
            Resp3Frame::Number { data, attributes: _ } => Some(*data),
            _ => None,
        }
    }
}

/// Trait for string extraction of RESP2/3 frames
pub trait ToStringBytes {
    /// Extracts Bytes of simple or bulk/blob strings
    /// None if frame is no string type
    fn to_string_bytes(&self) -> Option<Bytes>;
}

impl ToStringBytes for Resp2Frame {
    fn to_string_bytes(&self) -> Option<Bytes> {
        match self {
            Resp2Frame::BulkString(data) | Resp2Frame::SimpleString(data) => Some(data.clone()),
            _ => None,
        }
    }
}

impl ToStringBytes for Resp3Frame {
    fn to_string_bytes(&self) -> Option<Bytes> {
        match self {
            Resp3Frame::BlobString { data, attributes: _ } | Resp3Frame::SimpleString { data, attributes: _ } => {
                Some(data.clone())
            }
            _ => None,
        }
    }
}
