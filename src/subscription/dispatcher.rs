use crate::commands::builder::CommandBuilder;
use crate::network::buffer::Network;
use crate::network::protocol::Protocol;
use crate::network::timeout::Timeout;
use crate::network::Client;
use crate::subscription::client::Error;
use crate::subscription::controller::Controller;
use crate::subscription::events::{PushEvent, ToPushEvent};
use crate::subscription::registry::{Callbacks, Flow};
use crate::subscription::session::{Ack, Kind, SubscriptionSession};
use alloc::vec;
use alloc::vec::Vec;
use bytes::Bytes;
use embedded_nal::TcpClientStack;
use embedded_time::Clock;
use tracing::{debug, trace, warn};

/// Dispatch loop state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum State {
    /// Initial command sent, waiting for the first confirmation
    Entering,
    Active,
    /// Unsubscribing everything after a callback error
    Draining,
    Terminated,
}

/// Runs one top-level subscription until all subscriptions are terminated
pub(crate) struct Dispatcher<'h, 't, C: Clock, E> {
    callbacks: Callbacks<'h, E>,
    session: SubscriptionSession,
    state: State,

    /// Bounds the whole call
    deadline: Timeout<'t, C>,
}

impl<'h, 't, C: Clock, E> Dispatcher<'h, 't, C, E> {
    pub(crate) fn new(callbacks: Callbacks<'h, E>, deadline: Timeout<'t, C>) -> Self {
        Self {
            callbacks,
            session: SubscriptionSession::new(),
            state: State::Entering,
            deadline,
        }
    }

    /// Switches the connection to subscription mode, processes events and returns to command mode.
    ///
    /// The connection is left usable unless a fatal error occurred (s. [Error::is_fatal]).
    pub(crate) fn run<N, P>(mut self, client: &Client<'_, N, C, P>, kind: Kind, names: Vec<Bytes>) -> Result<(), Error<E>>
    where
        N: TcpClientStack,
        P: Protocol,
        P::FrameType: From<CommandBuilder> + ToPushEvent,
    {
        client.network.enter_subscription()?;

        let result = self.guard(client, kind, names);
        match &result {
            Err(error) if error.is_fatal() => client.network.abandon_subscription(),
            _ => client.network.leave_subscription(),
        }

        self.transition(State::Terminated);
        result
    }

    /// Drains all subscriptions on recoverable errors before passing the error on
    fn guard<N, P>(&mut self, client: &Client<'_, N, C, P>, kind: Kind, names: Vec<Bytes>) -> Result<(), Error<E>>
    where
        N: TcpClientStack,
        P: Protocol,
        P::FrameType: From<CommandBuilder> + ToPushEvent,
    {
        let mut result = Controller::new(&client.network, &mut self.session).extend(kind, names);
        if result.is_ok() {
            result = self.listen(&client.network);
        }

        match result {
            Err(error) if !error.is_fatal() => {
                debug!("callback failed, draining subscriptions");
                self.drain(client)?;
                Err(error)
            }
            result => result,
        }
    }

    fn listen<N, P>(&mut self, network: &Network<'_, N, P>) -> Result<(), Error<E>>
    where
        N: TcpClientStack,
        P: Protocol,
        P::FrameType: From<CommandBuilder> + ToPushEvent,
    {
        while !self.session.is_exhausted() {
            if self.deadline.expired()? {
                warn!("subscription deadline expired");
                return Err(Error::Timeout);
            }

            if let Some(event) = self.next_event(network)? {
                self.dispatch(network, event)?;
            }
        }

        Ok(())
    }

    fn dispatch<N, P>(&mut self, network: &Network<'_, N, P>, event: PushEvent) -> Result<(), Error<E>>
    where
        N: TcpClientStack,
        P: Protocol,
        P::FrameType: From<CommandBuilder>,
    {
        match event.into_ack() {
            Ok((kind, ack, name, total)) => self.acknowledge(network, kind, ack, name, total),
            Err(PushEvent::Message { channel, payload }) => {
                if self.session.is_stopped(Kind::Channel, &channel) {
                    trace!("discarding message of stopped channel");
                    return Ok(());
                }

                let mut controller = Controller::new(network, &mut self.session);
                let flow = self.callbacks.message(&mut controller, &channel, &payload)?;
                self.apply(network, Kind::Channel, &channel, flow)
            }
            Err(PushEvent::PMessage {
                pattern,
                channel,
                payload,
            }) => {
                if self.session.is_stopped(Kind::Pattern, &pattern) {
                    trace!("discarding message of stopped pattern");
                    return Ok(());
                }

                let mut controller = Controller::new(network, &mut self.session);
                let flow = self.callbacks.pmessage(&mut controller, &pattern, &channel, &payload)?;
                self.apply(network, Kind::Pattern, &pattern, flow)
            }
            Err(_) => {
                debug!("ignoring non Pub/Sub frame");
                Ok(())
            }
        }
    }

    fn acknowledge<N, P>(
        &mut self,
        network: &Network<'_, N, P>,
        kind: Kind,
        ack: Ack,
        name: Bytes,
        total: usize,
    ) -> Result<(), Error<E>>
    where
        N: TcpClientStack,
        P: Protocol,
        P::FrameType: From<CommandBuilder>,
    {
        trace!(?kind, ?ack, total, "confirmation received");
        self.session.apply_ack(kind, ack, &name, total);

        if self.state == State::Entering {
            self.transition(State::Active);
        }

        if self.session.is_stopped(kind, &name) {
            if ack == Ack::Unsubscribe {
                self.session.release_stopped(kind, &name);
            }
            return Ok(());
        }

        let mut controller = Controller::new(network, &mut self.session);
        let flow = self.callbacks.ack(kind, ack, &mut controller, &name, total)?;
        self.apply(network, kind, &name, flow)
    }

    /// Unsubscribes the single subscription the callback asked to stop
    fn apply<N, P>(&mut self, network: &Network<'_, N, P>, kind: Kind, name: &Bytes, flow: Flow) -> Result<(), Error<E>>
    where
        N: TcpClientStack,
        P: Protocol,
        P::FrameType: From<CommandBuilder>,
    {
        if flow == Flow::Continue || !self.session.is_tracked(kind, name) {
            return Ok(());
        }

        if !self.session.stop(kind, name) {
            return Ok(());
        }

        debug!(?kind, "subscription stopped by callback");
        Controller::new(network, &mut self.session).retract(kind, vec![name.clone()])
    }

    /// Unsubscribes everything and consumes all outstanding confirmations. Messages are discarded.
    fn drain<N, P>(&mut self, client: &Client<'_, N, C, P>) -> Result<(), Error<E>>
    where
        N: TcpClientStack,
        P: Protocol,
        P::FrameType: From<CommandBuilder> + ToPushEvent,
    {
        self.transition(State::Draining);
        let timeout = Timeout::new(client.clock, client.timeout_duration)?;

        for kind in [Kind::Channel, Kind::Pattern] {
            if self.session.needs_unsubscribe(kind) {
                Controller::<E>::new(&client.network, &mut self.session).retract(kind, Vec::new())?;
            }
        }

        while !self.session.is_exhausted() {
            if self.deadline.expired()? || timeout.expired()? {
                warn!("draining subscriptions timed out");
                return Err(Error::Timeout);
            }

            let event = match self.next_event(&client.network)? {
                None => continue,
                Some(event) => event,
            };

            match event.into_ack() {
                Ok((kind, ack, name, total)) => self.session.apply_ack(kind, ack, &name, total),
                Err(_) => trace!("discarding event while draining"),
            }
        }

        Ok(())
    }

    /// Returns the next push event, None if no complete frame is available yet
    fn next_event<N, P>(&self, network: &Network<'_, N, P>) -> Result<Option<PushEvent>, Error<E>>
    where
        N: TcpClientStack,
        P: Protocol,
        P::FrameType: ToPushEvent,
    {
        let frame = match network.next_frame()? {
            None => return Ok(None),
            Some(frame) => frame,
        };

        network.get_protocol().assert_error(&frame)?;

        match frame.decode_push() {
            Ok(event) => Ok(Some(event)),
            Err(error) => {
                warn!(?error, "failed decoding push event");
                Err(Error::ProtocolViolation)
            }
        }
    }

    fn transition(&mut self, state: State) {
        debug!(from = ?self.state, to = ?state, "subscription state changed");
        self.state = state;
    }
}
