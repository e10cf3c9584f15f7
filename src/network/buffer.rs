use crate::network::client::CommandErrors;
use crate::network::future::Identity;
use crate::network::protocol::Protocol;
use crate::network::response::{MemoryParameters, ResponseBuffer};
use alloc::vec;
use alloc::vec::Vec;
use bytes::BytesMut;
use core::cell::RefCell;
use core::fmt::{Debug, Formatter};
use core::ops::DerefMut;
use embedded_nal::TcpClientStack;
use tracing::{debug, warn};

/// Protocol state of the connection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Regular request/response mode
    Command,
    /// A subscription dispatch loop owns the connection
    Subscribed,
    /// A subscription was abandoned with unread replies. The connection needs to be reestablished.
    Defunct,
}

/// Manages interaction between network stack and response buffer
pub(crate) struct Network<'a, N: TcpClientStack, P: Protocol> {
    protocol: P,
    stack: RefCell<&'a mut N>,
    socket: RefCell<&'a mut N::TcpSocket>,
    buffer: RefCell<ResponseBuffer<P>>,

    mode: RefCell<Mode>,

    /// Current valid Future series
    current_series: RefCell<usize>,

    /// Index of next Future
    next_index: RefCell<usize>,

    /// Indicates a pending buffer clearance on fatal errors
    clear_buffer: RefCell<bool>,

    /// List of dropped futures, which did not call wait()
    /// For not leaking memory, response data of this futures is dropped on next send() call
    dropped_futures: RefCell<Vec<Identity>>,
}

impl<'a, N: TcpClientStack, P: Protocol> Network<'a, N, P> {
    pub(crate) fn new(
        stack: RefCell<&'a mut N>,
        socket: RefCell<&'a mut N::TcpSocket>,
        protocol: P,
        memory: MemoryParameters,
    ) -> Self {
        Network {
            protocol: protocol.clone(),
            stack,
            socket,
            buffer: RefCell::new(ResponseBuffer::new(protocol, memory)),
            mode: RefCell::new(Mode::Command),
            current_series: RefCell::new(0),
            next_index: RefCell::new(0),
            clear_buffer: RefCell::new(false),
            dropped_futures: RefCell::new(vec![]),
        }
    }

    /// Replaces the response buffer using the given limits
    pub(crate) fn set_memory(&self, memory: MemoryParameters) {
        *self.buffer.borrow_mut() = ResponseBuffer::new(self.protocol.clone(), memory);
    }

    /// Appends up to 32 bytes of socket data to the response buffer
    pub(crate) fn receive_chunk(&self) -> nb::Result<(), N::Error> {
        let mut local_buffer: [u8; 32] = [0; 32];
        let mut stack = self.stack.borrow_mut();
        let mut socket = self.socket.borrow_mut();

        let byte_count = stack.receive(socket.deref_mut(), &mut local_buffer)?;
        self.buffer.borrow_mut().append(&local_buffer[0..byte_count]);
        Ok(())
    }

    /// Returns true if the memory limit is reached
    pub(crate) fn is_buffer_full(&self) -> bool {
        self.buffer.borrow().is_full()
    }

    /// Encodes and sends the given command as request with a future mapped response
    pub(crate) fn send(&self, frame: P::FrameType) -> Result<Identity, CommandErrors> {
        self.assert_command_mode()?;
        self.clear_invalidated();

        // Handle dropped futures for not leaking memory
        self.handle_dropped_futures();

        self.send_frame(frame)?;

        let identity = Identity {
            series: *self.current_series.borrow(),
            index: *self.next_index.borrow(),
        };
        *self.next_index.borrow_mut() += 1;
        Ok(identity)
    }

    /// Raw network logic for sending a frame
    pub(crate) fn send_frame(&self, frame: P::FrameType) -> Result<(), CommandErrors> {
        let mut buffer = BytesMut::new();
        if self.protocol.encode_bytes(&mut buffer, &frame).is_err() {
            return Err(CommandErrors::EncodingCommandFailed);
        }

        let mut stack = self.stack.borrow_mut();
        let mut socket = self.socket.borrow_mut();

        if stack.send(socket.deref_mut(), buffer.as_ref()).is_err() {
            return Err(CommandErrors::TcpError);
        };

        Ok(())
    }

    /// Returns the next frame in receive order.
    /// Socket data is read in chunks only until one frame is complete, so a burst of push messages
    /// is consumed at the pace of dispatching. None is returned if no complete frame is available yet.
    pub(crate) fn next_frame(&self) -> Result<Option<P::FrameType>, CommandErrors> {
        loop {
            if let Some(frame) = self.take_next_frame() {
                return Ok(Some(frame));
            }

            match self.receive_chunk() {
                Ok(()) => {}
                Err(nb::Error::WouldBlock) => return Ok(None),
                Err(nb::Error::Other(_)) => return Err(CommandErrors::TcpError),
            }

            let buffer = self.buffer.borrow();
            if buffer.is_faulty() {
                return Err(CommandErrors::ProtocolViolation);
            }

            // Only incomplete frame data counts here, parsed frames are taken one by one
            if buffer.is_partial_full() {
                return Err(CommandErrors::BufferOverflow);
            }
        }
    }

    /// Is the message of the given future complete?
    pub(crate) fn is_complete(&self, id: &Identity) -> Result<bool, CommandErrors> {
        if *self.current_series.borrow() != id.series {
            return Err(CommandErrors::InvalidFuture);
        }

        if self.buffer.borrow().is_complete(id.index) {
            return Ok(true);
        }

        if self.buffer.borrow().is_faulty() {
            self.invalidate_futures();
            return Err(CommandErrors::ProtocolViolation);
        }

        Ok(false)
    }

    /// Takes the message mapped to the future
    /// None is returned in case if message has been already taken or message is not complete yet
    pub(crate) fn take_frame(&self, id: &Identity) -> Option<P::FrameType> {
        if *self.current_series.borrow() != id.series {
            return None;
        }

        self.buffer.borrow_mut().take_frame(id.index)
    }

    /// Takes and returns the next frame if existing.
    pub(crate) fn take_next_frame(&self) -> Option<P::FrameType> {
        self.buffer.borrow_mut().take_next_frame()
    }

    /// Switches to subscription mode
    ///
    /// Fails if the connection is not in request/response mode or if replies of previous commands are
    /// still outstanding, as they would get consumed by the dispatch loop.
    pub(crate) fn enter_subscription(&self) -> Result<(), CommandErrors> {
        self.assert_command_mode()?;
        self.clear_invalidated();
        self.handle_dropped_futures();

        if self.has_pending_responses() {
            return Err(CommandErrors::PendingResponses);
        }

        debug!("entering subscription mode");
        *self.mode.borrow_mut() = Mode::Subscribed;
        Ok(())
    }

    /// Returns to request/response mode after all subscriptions got confirmed as terminated
    pub(crate) fn leave_subscription(&self) {
        let buffer = self.buffer.borrow();

        if buffer.pending_frame_count() == 0 {
            // Push frames were consumed without futures, so the future index is synchronized
            *self.next_index.borrow_mut() = buffer.next_index();
        } else {
            drop(buffer);
            warn!("unexpected frames left after subscription, invalidating");
            self.invalidate_futures();
        }

        debug!("leaving subscription mode");
        *self.mode.borrow_mut() = Mode::Command;
    }

    /// Marks the connection as unusable, as unread subscription replies may be pending
    pub(crate) fn abandon_subscription(&self) {
        warn!("subscription abandoned, connection is no longer usable");
        *self.mode.borrow_mut() = Mode::Defunct;
        self.invalidate_futures();
    }

    pub(crate) fn mode(&self) -> Mode {
        *self.mode.borrow()
    }

    pub(crate) fn assert_command_mode(&self) -> Result<(), CommandErrors> {
        match self.mode() {
            Mode::Command => Ok(()),
            Mode::Subscribed => Err(CommandErrors::CommandNotAllowed),
            Mode::Defunct => Err(CommandErrors::ConnectionUnusable),
        }
    }

    /// True if any reply of a sent command was not taken yet
    fn has_pending_responses(&self) -> bool {
        let buffer = self.buffer.borrow();

        self.remaining_dropped_futures()
            || buffer.pending_frame_count() > 0
            || buffer.next_index() != *self.next_index.borrow()
    }

    /// In case of fatal errors all current futures are invalidated
    pub(crate) fn invalidate_futures(&self) {
        *self.current_series.borrow_mut() += 1;
        *self.next_index.borrow_mut() = 0;
        *self.clear_buffer.borrow_mut() = true;
    }

    /// Future was dropped before fully fetching response data
    pub(crate) fn drop_future(&self, id: Identity) {
        self.dropped_futures.borrow_mut().push(id);
    }

    /// Drops response data of dropped futures
    pub fn handle_dropped_futures(&self) {
        if self.dropped_futures.borrow().is_empty() {
            return;
        }

        self.receive_all();
        let mut buffer = self.buffer.borrow_mut();
        let current_series = *self.current_series.borrow();

        self.dropped_futures.borrow_mut().retain(|id| {
            // Future got invalidated in the meanwhile
            if id.series != current_series {
                return false;
            }

            // Clearing response data
            if buffer.is_complete(id.index) {
                buffer.take_frame(id.index);
                return false;
            }

            true
        })
    }

    /// Returns true if there are any remaining dropped futures
    pub fn remaining_dropped_futures(&self) -> bool {
        !self.dropped_futures.borrow().is_empty()
    }

    /// Receives all pending socket data
    pub fn receive_all(&self) {
        while self.receive_chunk().is_ok() {}
    }

    /// A fatal error invalidated the current series, so everything needs to be cleared
    fn clear_invalidated(&self) {
        if *self.clear_buffer.borrow() {
            self.clear_socket();
            *self.clear_buffer.borrow_mut() = false;
        }
    }

    /// Clears buffer and pending socket data
    fn clear_socket(&self) {
        let mut stack = self.stack.borrow_mut();
        let mut socket = self.socket.borrow_mut();
        let mut local_buffer: [u8; 32] = [0; 32];

        while stack.receive(socket.deref_mut(), &mut local_buffer).is_ok() {}

        self.buffer.borrow_mut().clear();
    }

    pub fn get_protocol(&self) -> P {
        self.protocol.clone()
    }

    #[cfg(test)]
    pub fn get_dropped_future_count(&self) -> usize {
        self.dropped_futures.borrow().len()
    }

    #[cfg(test)]
    pub fn get_pending_frame_count(&self) -> usize {
        self.buffer.borrow().pending_frame_count()
    }
}

impl<N: TcpClientStack, P: Protocol> Debug for Network<'_, N, P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Network").field("mode", &self.mode()).finish()
    }
}
