use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use bytes::Bytes;
use tracing::warn;

/// Subscription target type
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Kind {
    Channel,
    Pattern,
}

impl Kind {
    pub(crate) fn subscribe_keyword(self) -> &'static str {
        match self {
            Kind::Channel => "SUBSCRIBE",
            Kind::Pattern => "PSUBSCRIBE",
        }
    }

    pub(crate) fn unsubscribe_keyword(self) -> &'static str {
        match self {
            Kind::Channel => "UNSUBSCRIBE",
            Kind::Pattern => "PUNSUBSCRIBE",
        }
    }
}

/// Type of confirmation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Ack {
    Subscribe,
    Unsubscribe,
}

/// Subscription state of one top-level subscribe call
#[derive(Debug, Default)]
pub(crate) struct SubscriptionSession {
    channels: BTreeSet<Bytes>,
    patterns: BTreeSet<Bytes>,

    /// Last total reported by Redis on a channel confirmation
    last_channel_count: Option<usize>,

    /// Last total reported by Redis on a pattern confirmation
    last_pattern_count: Option<usize>,

    /// Sent but not yet confirmed subscriptions
    pending: Vec<(Kind, Bytes)>,

    /// Explicitly unsubscribed names, whose confirmation is outstanding
    leaving: Vec<(Kind, Bytes)>,

    /// Number of outstanding confirmations of bare (un-named) unsubscribe commands
    awaiting_bare: usize,

    /// Subscriptions as Redis holds them once all sent commands are processed
    intended: BTreeSet<(Kind, Bytes)>,

    /// Subscriptions terminated by a callback, whose events are discarded until confirmed
    stopped: Vec<(Kind, Bytes)>,
}

impl SubscriptionSession {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers sent SUBSCRIBE/PSUBSCRIBE commands
    pub(crate) fn subscribing(&mut self, kind: Kind, names: &[Bytes]) {
        self.pending.extend(names.iter().map(|name| (kind, name.clone())));
        self.intended.extend(names.iter().map(|name| (kind, name.clone())));
    }

    /// Registers sent UNSUBSCRIBE/PUNSUBSCRIBE commands. Empty names means all of the given kind.
    pub(crate) fn unsubscribing(&mut self, kind: Kind, names: &[Bytes]) {
        if names.is_empty() {
            self.awaiting_bare += self.bare_ack_count(kind);
            self.intended.retain(|(k, _)| *k != kind);
            return;
        }

        for name in names {
            self.intended.remove(&(kind, name.clone()));
        }
        self.leaving.extend(names.iter().map(|name| (kind, name.clone())));
    }

    /// Redis confirms a bare unsubscribe once per subscription existing when the command is processed,
    /// or once with nil if there is none. Names covered by an earlier bare unsubscribe are gone by then.
    fn bare_ack_count(&self, kind: Kind) -> usize {
        self.intended.iter().filter(|(k, _)| *k == kind).count().max(1)
    }

    /// True if Redis still holds subscriptions of the given kind after processing all sent commands
    pub(crate) fn needs_unsubscribe(&self, kind: Kind) -> bool {
        self.intended.iter().any(|(k, _)| *k == kind)
    }

    /// Applies a confirmation received by Redis
    pub(crate) fn apply_ack(&mut self, kind: Kind, ack: Ack, name: &Bytes, total: usize) {
        match ack {
            Ack::Subscribe => {
                if let Some(position) = self.pending.iter().position(|(k, n)| *k == kind && n == name) {
                    self.pending.remove(position);
                }
                self.set_mut(kind).insert(name.clone());
            }
            Ack::Unsubscribe => {
                self.set_mut(kind).remove(name);

                match self.leaving.iter().position(|(k, n)| *k == kind && n == name) {
                    Some(position) => {
                        self.leaving.remove(position);
                    }
                    None => self.awaiting_bare = self.awaiting_bare.saturating_sub(1),
                }
            }
        }

        match kind {
            Kind::Channel => self.last_channel_count = Some(total),
            Kind::Pattern => self.last_pattern_count = Some(total),
        }

        let tracked = self.channels.len() + self.patterns.len();
        if total != tracked {
            warn!(total, tracked, "subscription count reported by Redis differs from local state");
        }
    }

    /// True if nothing is subscribed and no confirmation is outstanding
    pub(crate) fn is_exhausted(&self) -> bool {
        self.channels.is_empty()
            && self.patterns.is_empty()
            && self.pending.is_empty()
            && self.leaving.is_empty()
            && self.awaiting_bare == 0
    }

    /// True if any subscription of the given kind is active or requested
    pub(crate) fn has_any(&self, kind: Kind) -> bool {
        !self.set(kind).is_empty() || self.pending.iter().any(|(k, _)| *k == kind)
    }

    pub(crate) fn is_tracked(&self, kind: Kind, name: &Bytes) -> bool {
        self.set(kind).contains(name)
    }

    /// Marks a subscription as stopped. Returns false if it was already stopped.
    pub(crate) fn stop(&mut self, kind: Kind, name: &Bytes) -> bool {
        if self.is_stopped(kind, name) {
            return false;
        }

        self.stopped.push((kind, name.clone()));
        true
    }

    pub(crate) fn is_stopped(&self, kind: Kind, name: &Bytes) -> bool {
        self.stopped.iter().any(|(k, n)| *k == kind && n == name)
    }

    /// Forgets the stop mark, as the subscription was confirmed as terminated
    pub(crate) fn release_stopped(&mut self, kind: Kind, name: &Bytes) {
        self.stopped.retain(|(k, n)| !(*k == kind && n == name));
    }

    pub(crate) fn last_count(&self, kind: Kind) -> Option<usize> {
        match kind {
            Kind::Channel => self.last_channel_count,
            Kind::Pattern => self.last_pattern_count,
        }
    }

    /// Confirmed subscriptions of the given kind in lexicographic order
    pub(crate) fn names(&self, kind: Kind) -> Vec<Bytes> {
        self.set(kind).iter().cloned().collect()
    }

    fn set(&self, kind: Kind) -> &BTreeSet<Bytes> {
        match kind {
            Kind::Channel => &self.channels,
            Kind::Pattern => &self.patterns,
        }
    }

    fn set_mut(&mut self, kind: Kind) -> &mut BTreeSet<Bytes> {
        match kind {
            Kind::Channel => &mut self.channels,
            Kind::Pattern => &mut self.patterns,
        }
    }
}

/// Converts the given names to Bytes
pub(crate) fn collect<I, B>(names: I) -> Vec<Bytes>
where
    I: IntoIterator<Item = B>,
    B: Into<Bytes>,
{
    names.into_iter().map(Into::into).collect()
}
