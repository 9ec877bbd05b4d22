//! Synchronous topic bus and the subscription-duplication cache.
//!
//! The bus stores per-topic subscriber lists; dispatch itself lives in the
//! engine's routing layer, which needs the controller tree to decide
//! applicability. Handlers receive published arguments only — they cannot
//! re-enter the engine, so dispatch can never observe a delegate list
//! mutating under its own scan.

use crate::id::{ControllerId, ViewId};
use crate::topics::Topic;
use crate::value::Value;
use markup::Node;
use std::collections::{HashMap, HashSet};

/// The controller-assigned identity marker on a publication. Publications
/// that bypass `publish` carry no origin and fail dispatch with a
/// protocol error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    Controller(ControllerId),
    View(ViewId),
}

/// One published argument.
#[derive(Clone, Debug, PartialEq)]
pub enum Arg {
    Value(Value),
    Markup(Box<Node>),
    Null,
}

#[derive(Debug)]
pub struct Publication {
    pub origin: Option<Origin>,
    pub args: Vec<Arg>,
}

pub type Handler = Box<dyn FnMut(&[Arg])>;

pub(crate) struct Subscription {
    pub subscriber: ControllerId,
    pub method: String,
    pub handler: Handler,
}

#[derive(Default)]
pub(crate) struct Bus {
    by_topic: HashMap<&'static str, Vec<Subscription>>,
}

impl Bus {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn subscribe(&mut self, topic: Topic, subscription: Subscription) {
        self.by_topic
            .entry(topic.as_str())
            .or_default()
            .push(subscription);
    }

    pub(crate) fn subscriptions_mut(&mut self, topic: Topic) -> Option<&mut Vec<Subscription>> {
        self.by_topic.get_mut(topic.as_str())
    }

    /// Drop every subscription held by a controller, across all topics.
    pub(crate) fn remove_subscriber(&mut self, subscriber: ControllerId) {
        for subscriptions in self.by_topic.values_mut() {
            subscriptions.retain(|s| s.subscriber != subscriber);
        }
    }
}

/// Name-indexed cache of (context, method) subscription pairs, consulted
/// by the history registrar's duplicate-registration check.
#[derive(Debug, Default)]
pub(crate) struct SubscriptionCache {
    pairs: HashSet<(ControllerId, String)>,
}

impl SubscriptionCache {
    pub(crate) fn add(&mut self, context: ControllerId, method: &str) {
        self.pairs.insert((context, method.to_string()));
    }

    pub(crate) fn contains(&self, context: ControllerId, method: &str) -> bool {
        self.pairs.contains(&(context, method.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_subscriber_clears_all_topics() {
        let mut bus = Bus::new();
        let a = ControllerId::from_raw(1);
        let b = ControllerId::from_raw(2);
        let t1 = Topic("t1");
        let t2 = Topic("t2");

        for topic in [t1, t2] {
            bus.subscribe(
                topic,
                Subscription {
                    subscriber: a,
                    method: "m".to_string(),
                    handler: Box::new(|_| {}),
                },
            );
            bus.subscribe(
                topic,
                Subscription {
                    subscriber: b,
                    method: "m".to_string(),
                    handler: Box::new(|_| {}),
                },
            );
        }

        bus.remove_subscriber(a);
        for topic in [t1, t2] {
            let subs = bus.subscriptions_mut(topic).unwrap();
            assert_eq!(subs.len(), 1);
            assert_eq!(subs[0].subscriber, b);
        }
    }

    #[test]
    fn subscription_cache_tracks_pairs() {
        let mut cache = SubscriptionCache::default();
        let c = ControllerId::from_raw(1);

        assert!(!cache.contains(c, "on_travel"));
        cache.add(c, "on_travel");
        assert!(cache.contains(c, "on_travel"));
        assert!(!cache.contains(c, "other"));
        assert!(!cache.contains(ControllerId::from_raw(2), "on_travel"));
    }
}
