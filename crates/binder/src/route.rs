//! Event routing: subscription, publication, and the applicability rules
//! that decide which subscribers a publication reaches.
//!
//! A publication is either self-directed (the origin controller is the
//! subscriber itself) or view-originated, in which case it applies to a
//! subscriber whose own view, parent's view, or any transitive delegate's
//! view matches the origin.

use crate::bus::{Arg, Handler, Origin, Publication, Subscription};
use crate::controller::Controllers;
use crate::engine::Binder;
use crate::error::BinderError;
use crate::id::{ControllerId, ViewId};
use crate::topics::{self, Topic};

impl Binder {
    /// Subscribe a controller's named method to a topic.
    pub fn subscribe(
        &mut self,
        topic: Topic,
        context: ControllerId,
        method: &str,
        handler: Handler,
    ) -> Result<(), BinderError> {
        if !self.controllers.is_live(context) {
            return Err(BinderError::Configuration(format!(
                "subscription by unknown controller {context:?}"
            )));
        }
        if self.travel.contains(context, method) {
            return Err(BinderError::Configuration(format!(
                "{method:?} on {context:?} is already registered as a travel handler"
            )));
        }
        self.cache.add(context, method);
        self.bus.subscribe(
            topic,
            Subscription {
                subscriber: context,
                method: method.to_string(),
                handler,
            },
        );
        log::trace!(
            target: "binder.route",
            "{context:?} subscribed {method:?} to '{topic}'"
        );
        Ok(())
    }

    /// Publish on behalf of a controller. The controller id is stamped on
    /// the publication as its origin.
    pub fn publish(
        &mut self,
        controller: ControllerId,
        topic: Topic,
        args: Vec<Arg>,
    ) -> Result<(), BinderError> {
        self.dispatch(
            topic,
            Publication {
                origin: Some(Origin::Controller(controller)),
                args,
            },
        )
    }

    /// Publish on behalf of a view, typically a user-interaction event.
    pub fn publish_from_view(
        &mut self,
        view: ViewId,
        topic: Topic,
        args: Vec<Arg>,
    ) -> Result<(), BinderError> {
        self.dispatch(
            topic,
            Publication {
                origin: Some(Origin::View(view)),
                args,
            },
        )
    }

    /// Publish without an origin. Dispatch refuses to route such a
    /// publication to any subscriber; this exists for code that has not
    /// yet been moved onto `publish`.
    pub fn publish_raw(&mut self, topic: Topic, args: Vec<Arg>) -> Result<(), BinderError> {
        self.dispatch(topic, Publication { origin: None, args })
    }

    fn dispatch(&mut self, topic: Topic, publication: Publication) -> Result<(), BinderError> {
        let controllers = &self.controllers;
        let Some(subscriptions) = self.bus.subscriptions_mut(topic) else {
            return Ok(());
        };
        for subscription in subscriptions.iter_mut() {
            let Some(origin) = publication.origin else {
                return Err(BinderError::Protocol(format!(
                    "publication on '{topic}' carries no origin; publish through a controller or view"
                )));
            };
            let deliver = match origin {
                // A controller's own publication always reaches it.
                Origin::Controller(c) if c == subscription.subscriber => true,
                _ => origin_applies(controllers, subscription.subscriber, origin),
            };
            if !deliver {
                log::trace!(
                    target: "binder.route",
                    "'{topic}' from {origin:?} not applicable to {:?}",
                    subscription.subscriber
                );
                continue;
            }
            log::trace!(
                target: "binder.route",
                "'{topic}' -> {:?}::{}",
                subscription.subscriber,
                subscription.method
            );
            (subscription.handler)(&publication.args);
        }
        Ok(())
    }

    /// Whether a publication from `origin` would reach `controller`,
    /// ignoring the self-directed shortcut.
    pub fn is_applicable(&self, controller: ControllerId, origin: Origin) -> bool {
        origin_applies(&self.controllers, controller, origin)
    }

    /// Register a back/forward travel handler for a controller method.
    /// Refused when the pair already holds a topic subscription, since the
    /// travel callback would then fire the method twice.
    pub fn init_history_handler(
        &mut self,
        controller: ControllerId,
        method: &str,
    ) -> Result<(), BinderError> {
        if self.cache.contains(controller, method) {
            return Err(BinderError::Configuration(format!(
                "travel handler {method:?} for {controller:?} conflicts with an existing subscription"
            )));
        }
        self.travel.register_travel(controller, method);
        Ok(())
    }

    pub fn has_travel_handler(&self, controller: ControllerId) -> bool {
        self.travel.is_registered(controller)
    }

    /// Publish the controller's pre-binding markup snapshot so its view
    /// can rewind to the authored state.
    pub fn restore_initial_state(&mut self, controller: ControllerId) -> Result<(), BinderError> {
        let snapshot = self
            .controllers
            .get(controller)
            .ok_or_else(|| {
                BinderError::Configuration(format!("unknown controller {controller:?}"))
            })?
            .original_snapshot
            .clone();
        let arg = match snapshot {
            Some(node) => Arg::Markup(node),
            None => Arg::Null,
        };
        self.publish(controller, topics::RESTORE_INITIAL_STATE, vec![arg])
    }
}

/// View-originated applicability: the subscriber's own view, its parent's
/// view, or any transitive delegate's view.
fn origin_applies(controllers: &Controllers, subscriber: ControllerId, origin: Origin) -> bool {
    let Origin::View(view) = origin else {
        // Another controller's publication is only ever self-directed.
        return false;
    };
    let Some(record) = controllers.get(subscriber) else {
        return false;
    };
    if record.view == Some(view) {
        return true;
    }
    if let Some(parent) = record.parent {
        if let Some(parent_record) = controllers.get(parent) {
            if parent_record.view == Some(view) {
                return true;
            }
        }
    }
    delegate_applies(controllers, view, &record.delegates)
}

fn delegate_applies(controllers: &Controllers, view: ViewId, delegates: &[ControllerId]) -> bool {
    for &delegate in delegates {
        // Stale ids can linger briefly during teardown; skip them.
        let Some(record) = controllers.get(delegate) else {
            continue;
        };
        if record.view == Some(view) {
            return true;
        }
        if delegate_applies(controllers, view, &record.delegates) {
            return true;
        }
    }
    false
}
