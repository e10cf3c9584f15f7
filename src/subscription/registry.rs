use crate::subscription::client::Error;
use crate::subscription::controller::Controller;
use crate::subscription::session::{Ack, Kind};
use alloc::boxed::Box;
use bytes::Bytes;
use core::fmt::{Debug, Formatter};

/// Control flow signal returned by callbacks
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Flow {
    /// Keep receiving events
    #[default]
    Continue,
    /// Stops the subscription the event belongs to. Other subscriptions are not affected.
    Stop,
}

type AckHandler<'h, E> = Box<dyn FnMut(&mut Controller<'_, E>, &Bytes, usize) -> Result<Flow, Error<E>> + 'h>;
type MessageHandler<'h, E> = Box<dyn FnMut(&mut Controller<'_, E>, &Bytes, &Bytes) -> Result<Flow, Error<E>> + 'h>;
type PatternMessageHandler<'h, E> =
    Box<dyn FnMut(&mut Controller<'_, E>, &Bytes, &Bytes, &Bytes) -> Result<Flow, Error<E>> + 'h>;

/// Callbacks of a subscription, one per event type
///
/// Handlers receive a [Controller] for (un)subscribing from inside the running subscription.
/// Registering a handler twice replaces the previous one. Events without handler are ignored.
pub struct Callbacks<'h, E> {
    subscribe: Option<AckHandler<'h, E>>,
    unsubscribe: Option<AckHandler<'h, E>>,
    message: Option<MessageHandler<'h, E>>,
    psubscribe: Option<AckHandler<'h, E>>,
    punsubscribe: Option<AckHandler<'h, E>>,
    pmessage: Option<PatternMessageHandler<'h, E>>,
}

impl<'h, E> Callbacks<'h, E> {
    pub(crate) fn new() -> Self {
        Self {
            subscribe: None,
            unsubscribe: None,
            message: None,
            psubscribe: None,
            punsubscribe: None,
            pmessage: None,
        }
    }

    /// Called on subscribe confirmation with channel name and total number of subscriptions
    pub fn on_subscribe<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&mut Controller<'_, E>, &Bytes, usize) -> Result<Flow, Error<E>> + 'h,
    {
        self.subscribe = Some(Box::new(handler));
        self
    }

    /// Called on unsubscribe confirmation with channel name and total number of remaining subscriptions
    pub fn on_unsubscribe<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&mut Controller<'_, E>, &Bytes, usize) -> Result<Flow, Error<E>> + 'h,
    {
        self.unsubscribe = Some(Box::new(handler));
        self
    }

    /// Called with channel and payload of published messages
    pub fn on_message<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&mut Controller<'_, E>, &Bytes, &Bytes) -> Result<Flow, Error<E>> + 'h,
    {
        self.message = Some(Box::new(handler));
        self
    }

    /// Called on pattern subscribe confirmation with pattern and total number of subscriptions
    pub fn on_psubscribe<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&mut Controller<'_, E>, &Bytes, usize) -> Result<Flow, Error<E>> + 'h,
    {
        self.psubscribe = Some(Box::new(handler));
        self
    }

    /// Called on pattern unsubscribe confirmation with pattern and total number of remaining subscriptions
    pub fn on_punsubscribe<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&mut Controller<'_, E>, &Bytes, usize) -> Result<Flow, Error<E>> + 'h,
    {
        self.punsubscribe = Some(Box::new(handler));
        self
    }

    /// Called with pattern, channel and payload of messages matching a subscribed pattern
    pub fn on_pmessage<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&mut Controller<'_, E>, &Bytes, &Bytes, &Bytes) -> Result<Flow, Error<E>> + 'h,
    {
        self.pmessage = Some(Box::new(handler));
        self
    }

    /// True if no handler was registered at all
    pub(crate) fn is_empty(&self) -> bool {
        self.subscribe.is_none()
            && self.unsubscribe.is_none()
            && self.message.is_none()
            && self.psubscribe.is_none()
            && self.punsubscribe.is_none()
            && self.pmessage.is_none()
    }

    pub(crate) fn ack(
        &mut self,
        kind: Kind,
        ack: Ack,
        controller: &mut Controller<'_, E>,
        name: &Bytes,
        total: usize,
    ) -> Result<Flow, Error<E>> {
        let handler = match (kind, ack) {
            (Kind::Channel, Ack::Subscribe) => &mut self.subscribe,
            (Kind::Channel, Ack::Unsubscribe) => &mut self.unsubscribe,
            (Kind::Pattern, Ack::Subscribe) => &mut self.psubscribe,
            (Kind::Pattern, Ack::Unsubscribe) => &mut self.punsubscribe,
        };

        match handler {
            Some(handler) => handler(controller, name, total),
            None => Ok(Flow::Continue),
        }
    }

    pub(crate) fn message(
        &mut self,
        controller: &mut Controller<'_, E>,
        channel: &Bytes,
        payload: &Bytes,
    ) -> Result<Flow, Error<E>> {
        match &mut self.message {
            Some(handler) => handler(controller, channel, payload),
            None => Ok(Flow::Continue),
        }
    }

    pub(crate) fn pmessage(
        &mut self,
        controller: &mut Controller<'_, E>,
        pattern: &Bytes,
        channel: &Bytes,
        payload: &Bytes,
    ) -> Result<Flow, Error<E>> {
        match &mut self.pmessage {
            Some(handler) => handler(controller, pattern, channel, payload),
            None => Ok(Flow::Continue),
        }
    }
}

impl<E> Default for Callbacks<'_, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Debug for Callbacks<'_, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Callbacks")
            .field("subscribe", &self.subscribe.is_some())
            .field("unsubscribe", &self.unsubscribe.is_some())
            .field("message", &self.message.is_some())
            .field("psubscribe", &self.psubscribe.is_some())
            .field("punsubscribe", &self.punsubscribe.is_some())
            .field("pmessage", &self.pmessage.is_some())
            .finish()
    }
}
