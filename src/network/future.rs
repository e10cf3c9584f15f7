use crate::commands::Command;
use crate::network::buffer::Network;
use crate::network::client::CommandErrors;
use crate::network::protocol::Protocol;
use crate::network::timeout::Timeout;
use embedded_nal::TcpClientStack;
use embedded_time::Clock;

/// Position of a reply in the stream of replies received in command mode
#[derive(Clone, Debug)]
pub(crate) struct Identity {
    /// Bumped whenever the reply mapping breaks (timeouts, faulty data, abandoned subscriptions)
    pub series: usize,

    pub index: usize,
}

/// Pending reply of a command sent in command mode
///
/// Futures are created by [Client::send](crate::network::Client::send) and its shorthands
/// (e.g. [Client::publish](crate::network::Client::publish)). While a subscription is running, sending fails
/// with [CommandNotAllowed](CommandErrors::CommandNotAllowed), so no future is ever mapped to a push message.
pub struct Future<'a, N: TcpClientStack, C: Clock, P: Protocol, Cmd: Command<P::FrameType>> {
    id: Identity,
    command: Cmd,
    protocol: P,
    network: &'a Network<'a, N, P>,
    timeout: Timeout<'a, C>,

    /// Error caught by ready(), handed out by wait()
    error: Option<CommandErrors>,

    /// Reply was taken (or is going to be). Otherwise the reply is discarded later on.
    wait_called: bool,
}

impl<'a, N: TcpClientStack, C: Clock, P: Protocol, Cmd: Command<P::FrameType>> Future<'a, N, C, P, Cmd> {
    pub(crate) fn new(
        id: Identity,
        command: Cmd,
        protocol: P,
        network: &'a Network<'a, N, P>,
        timeout: Timeout<'a, C>,
    ) -> Future<'a, N, C, P, Cmd> {
        Self {
            id,
            command,
            protocol,
            network,
            timeout,
            error: None,
            wait_called: false,
        }
    }

    /// Blocks until the reply is received and evaluates it
    ///
    /// Fails with
    /// * [Timeout](CommandErrors::Timeout) if the client's reply timeout expired. All pending futures are invalidated.
    /// * [ErrorResponse](CommandErrors::ErrorResponse) if Redis replied with an error
    /// * [ConnectionUnusable](CommandErrors::ConnectionUnusable) if a subscription failed fatally in the meantime
    /// * [InvalidFuture](CommandErrors::InvalidFuture) if the reply mapping got lost for other reasons
    pub fn wait(mut self) -> Result<Cmd::Response, CommandErrors> {
        self.wait_called = true;

        if let Some(error) = self.error.take() {
            return Err(error);
        }

        self.process(true)?;

        let frame = self.network.take_frame(&self.id).ok_or(CommandErrors::InvalidFuture)?;
        self.protocol.assert_error(&frame)?;

        self.command
            .eval_response(frame)
            .map_err(|_| CommandErrors::CommandResponseViolation)
    }

    /// Reads the socket without blocking. Returns true once [Future::wait] would not block anymore.
    pub fn ready(&mut self) -> bool {
        let result = self.process(false).and_then(|_| self.network.is_complete(&self.id));

        match result {
            Ok(complete) => complete,
            Err(error) => {
                // wait() reports it
                self.error = Some(error);
                true
            }
        }
    }

    fn process(&mut self, block: bool) -> Result<(), CommandErrors> {
        self.network.assert_command_mode()?;

        while !self.network.is_complete(&self.id)? {
            let received = self.network.receive_chunk();

            if self.network.is_buffer_full() {
                return Err(CommandErrors::BufferOverflow);
            }

            match received {
                Ok(()) => {}
                Err(nb::Error::Other(_)) => return Err(CommandErrors::TcpError),
                Err(nb::Error::WouldBlock) if self.timeout.expired()? => {
                    self.network.invalidate_futures();
                    return Err(CommandErrors::Timeout);
                }
                Err(nb::Error::WouldBlock) if !block => return Ok(()),
                Err(nb::Error::WouldBlock) => {}
            }
        }

        Ok(())
    }
}

impl<N: TcpClientStack, C: Clock, P: Protocol, Cmd: Command<P::FrameType>> Drop for Future<'_, N, C, P, Cmd> {
    fn drop(&mut self) {
        if !self.wait_called {
            self.network.drop_future(self.id.clone());
        }
    }
}
