//! Abstraction for arbitrary commands.
//!
//! [CustomCommand] in combination with [CommandBuilder] can be used for executing arbitrary commands.
//! The response is not evaluated, so the pure [Resp2Frame](redis_protocol::resp2::types::Frame)
//! or [Resp3Frame](redis_protocol::resp3::types::Frame) is returned. Error responses are intercepted
//! and converted to [CommandErrors::ErrorResponse](crate::network::CommandErrors::ErrorResponse).
//!
//! Like any other command, custom commands are rejected with
//! [CommandNotAllowed](crate::network::CommandErrors::CommandNotAllowed) while the connection is in
//! subscription mode.
//!
//! ```no_run
//!# use embedded_nal::SocketAddr;
//!# use core::str::FromStr;
//!# use embedded_nal::TcpClientStack;
//!# use std_embedded_nal::Stack;
//!# use std_embedded_time::StandardClock;
//!# use embedded_redis_pubsub::commands::builder::CommandBuilder;
//!# use embedded_redis_pubsub::network::{Client, Resp2};
//!#
//!# let mut stack = Stack::default();
//!# let clock = StandardClock::default();
//!# let mut socket = stack.socket().unwrap();
//!# nb::block!(stack.connect(&mut socket, SocketAddr::from_str("127.0.0.1:6379").unwrap())).unwrap();
//! let client = Client::new(&mut stack, &mut socket, Resp2 {}, Some(&clock));
//!
//! let command = CommandBuilder::new("ECHO").arg_static("Hello World!").to_command();
//! let response = client.send(command).unwrap().wait().unwrap();
//! assert_eq!("Hello World!", response.to_string().unwrap());
//! ```
use crate::commands::builder::CommandBuilder;
use crate::commands::{Command, ResponseTypeError};

/// Abstraction for arbitrary commands.
#[derive(Debug)]
pub struct CustomCommand {
    builder: CommandBuilder,
}

impl CustomCommand {
    pub fn new(builder: CommandBuilder) -> Self {
        CustomCommand { builder }
    }
}

impl<F> Command<F> for CustomCommand
where
    F: From<CommandBuilder>,
{
    type Response = F;

    fn encode(&self) -> F {
        self.builder.clone().into()
    }

    fn eval_response(&self, frame: F) -> Result<Self::Response, ResponseTypeError> {
        Ok(frame)
    }
}
