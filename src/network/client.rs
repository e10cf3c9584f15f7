use crate::commands::Command;
use crate::network::buffer::Network;
use crate::network::future::Future;
use crate::network::protocol::Protocol;
use crate::network::response::MemoryParameters;
use crate::network::timeout::{Timeout, TimeoutError};
use alloc::string::String;
use core::cell::RefCell;
use core::fmt::{Debug, Formatter};
use embedded_nal::TcpClientStack;
use embedded_time::duration::{Extensions, Microseconds};
use embedded_time::Clock;

/// Error handling for command execution
#[derive(Debug, Eq, PartialEq, Clone)]
pub enum CommandErrors {
    /// No response within expected time frame
    /// *Is recommended to create a new client/connection in this case*.
    Timeout,
    /// Failed encoding TX command
    EncodingCommandFailed,
    /// Received an invalid response violating the RESP protocol. Ideally this should never happen.
    /// The following causes are conceivable
    /// * Bug in this library (e.g. incomplete implementation of RESP protocol)
    /// * Redis server bug
    /// * Network failure. As we are using TCP, only a network stack bug or other exotic causes (e.g. bit flip) is reasonable.
    /// *Is recommended to create a new client/connection in this case*.
    ProtocolViolation,
    /// Future is no longer valid. This happens on fatal problems like timeouts or faulty responses, on which message<->future
    /// mapping can no longer be guaranteed
    /// *Is recommended to create a new client/connection in this case*.
    InvalidFuture,
    /// Low level network error
    TcpError,
    /// Upstream timer/clock failure
    TimerError,
    /// Received an unexpected response incompatible with the command specification
    CommandResponseViolation,
    /// Redis error response. Inner value is the error message received.
    ErrorResponse(String),
    /// Response buffer overflow. The received/unparsed data exceeded the configured memory limits.
    BufferOverflow,
    /// The connection is in subscription mode, only (P)SUBSCRIBE and (P)UNSUBSCRIBE are allowed
    CommandNotAllowed,
    /// A subscription was aborted while replies were still pending (e.g. on timeout).
    /// *A new client/connection is required*.
    ConnectionUnusable,
    /// Replies to previously sent commands are still outstanding, so subscription mode can not be entered.
    /// Wait for (or drop) all futures first.
    PendingResponses,
}

/// Client to execute Redis commands and to run subscriptions
///
/// The client wraps an already connected socket. Connection establishment, authentication and
/// protocol switching (HELLO) are up to the caller.
pub struct Client<'a, N: TcpClientStack, C: Clock, P: Protocol> {
    pub(crate) network: Network<'a, N, P>,
    pub(crate) clock: Option<&'a C>,

    /// Max. time waiting for response
    pub(crate) timeout_duration: Microseconds,
}

impl<'a, N: TcpClientStack, C: Clock, P: Protocol> Client<'a, N, C, P> {
    /// Creates a new client on top of a connected socket
    ///
    /// The clock is optional as long as no timeout is used.
    pub fn new(stack: &'a mut N, socket: &'a mut N::TcpSocket, protocol: P, clock: Option<&'a C>) -> Self {
        Client {
            network: Network::new(
                RefCell::new(stack),
                RefCell::new(socket),
                protocol,
                MemoryParameters::default(),
            ),
            clock,
            timeout_duration: 0.microseconds(),
        }
    }

    /// Sets the max. duration waiting for Redis responses. Zero disables the timeout.
    pub fn timeout(mut self, timeout: Microseconds) -> Self {
        self.timeout_duration = timeout;
        self
    }

    /// Sets the memory limits of the response buffer
    pub fn memory(self, memory: MemoryParameters) -> Self {
        self.network.set_memory(memory);
        self
    }

    /// Sends the given command non-blocking
    pub fn send<Cmd>(&'a self, command: Cmd) -> Result<Future<'a, N, C, P, Cmd>, CommandErrors>
    where
        Cmd: Command<P::FrameType>,
    {
        let id = self.network.send(command.encode())?;

        Ok(Future::new(
            id,
            command,
            self.network.get_protocol(),
            &self.network,
            Timeout::new(self.clock, self.timeout_duration)?,
        ))
    }

    /// Waiting on any dropped futures to leave a clean state
    pub fn close(&self) {
        if !self.network.remaining_dropped_futures() {
            return;
        }

        let timer = match Timeout::new(self.clock, self.timeout_duration) {
            Ok(timer) => timer,
            Err(_) => {
                return;
            }
        };

        while self.network.remaining_dropped_futures() && !timer.expired().unwrap_or(true) {
            self.network.handle_dropped_futures();
        }
    }
}

impl From<TimeoutError> for CommandErrors {
    fn from(_: TimeoutError) -> Self {
        CommandErrors::TimerError
    }
}

impl<N: TcpClientStack, C: Clock, P: Protocol> Debug for Client<'_, N, C, P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Client")
            .field("network", &self.network)
            .field("timeout_duration", &self.timeout_duration)
            .finish()
    }
}
