//! Event-routing coverage: applicability of publications across the
//! delegate tree, the origin protocol check, and history-handler
//! registration.

use binder::{
    Arg, Binder, BinderError, BuiltController, ClassSpec, ControllerId, DelegateSpec, Origin,
    Topic, Value,
};
use std::cell::RefCell;
use std::rc::Rc;

const PING: Topic = Topic("test/ping");

fn class(name: &str) -> ClassSpec {
    ClassSpec {
        name: name.to_string(),
        defaults: vec![("label".to_string(), Value::Str(String::new()))],
        factory: Box::new(|views| {
            Ok(BuiltController {
                view: Some(views.create()),
            })
        }),
    }
}

fn engine_with(markup_text: &str) -> Binder {
    let mut binder = Binder::new(markup_text);
    binder.register_class(class("widget"));
    binder.parse().unwrap();
    binder
}

fn controller_of(binder: &Binder, html_id: &str) -> ControllerId {
    let element = binder.element_by_html_id(html_id).unwrap();
    binder.controller_at(element).unwrap()
}

/// Subscribe with a counter, returning the shared hit list.
fn record_hits(
    binder: &mut Binder,
    topic: Topic,
    context: ControllerId,
) -> Rc<RefCell<Vec<Vec<Arg>>>> {
    let hits = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&hits);
    binder
        .subscribe(
            topic,
            context,
            "on_ping",
            Box::new(move |args| sink.borrow_mut().push(args.to_vec())),
        )
        .unwrap();
    hits
}

#[test]
fn controller_publication_is_self_directed() {
    let mut binder = engine_with(
        r#"<div id="a" data-controller="widget"></div>
           <div id="b" data-controller="widget"></div>"#,
    );
    let a = controller_of(&binder, "a");
    let b = controller_of(&binder, "b");
    let a_hits = record_hits(&mut binder, PING, a);
    let b_hits = record_hits(&mut binder, PING, b);

    binder
        .publish(a, PING, vec![Arg::Value(Value::Num(7.0))])
        .unwrap();

    assert_eq!(a_hits.borrow().len(), 1);
    assert_eq!(a_hits.borrow()[0], vec![Arg::Value(Value::Num(7.0))]);
    // Another controller's publication never reaches a foreign subscriber.
    assert!(b_hits.borrow().is_empty());
}

#[test]
fn view_publication_reaches_its_own_controller() {
    let mut binder = engine_with(
        r#"<div id="a" data-controller="widget"></div>
           <div id="b" data-controller="widget"></div>"#,
    );
    let a = controller_of(&binder, "a");
    let b = controller_of(&binder, "b");
    let a_hits = record_hits(&mut binder, PING, a);
    let b_hits = record_hits(&mut binder, PING, b);

    let a_view = binder.view_of(a).unwrap();
    binder.publish_from_view(a_view, PING, Vec::new()).unwrap();

    assert_eq!(a_hits.borrow().len(), 1);
    assert!(b_hits.borrow().is_empty());
}

#[test]
fn parent_view_publication_reaches_the_delegate() {
    let mut binder = engine_with(r#"<div id="a" data-controller="widget"></div>"#);
    let parent = controller_of(&binder, "a");
    let delegate = binder
        .create_delegate(
            parent,
            DelegateSpec {
                class_name: Some("widget".to_string()),
                ..DelegateSpec::default()
            },
        )
        .unwrap()
        .unwrap();
    let hits = record_hits(&mut binder, PING, delegate);

    let parent_view = binder.view_of(parent).unwrap();
    binder
        .publish_from_view(parent_view, PING, Vec::new())
        .unwrap();
    assert_eq!(hits.borrow().len(), 1);
}

#[test]
fn delegate_view_publication_reaches_transitive_ancestors() {
    let mut binder = engine_with(r#"<div id="a" data-controller="widget"></div>"#);
    let root = controller_of(&binder, "a");
    let child = binder
        .create_delegate(
            root,
            DelegateSpec {
                class_name: Some("widget".to_string()),
                ..DelegateSpec::default()
            },
        )
        .unwrap()
        .unwrap();
    let grandchild = binder
        .create_delegate(
            child,
            DelegateSpec {
                class_name: Some("widget".to_string()),
                ..DelegateSpec::default()
            },
        )
        .unwrap()
        .unwrap();
    let hits = record_hits(&mut binder, PING, root);

    // Two levels down, reached through the recursive delegate walk.
    let deep_view = binder.view_of(grandchild).unwrap();
    binder
        .publish_from_view(deep_view, PING, Vec::new())
        .unwrap();
    assert_eq!(hits.borrow().len(), 1);

    assert!(binder.is_applicable(root, Origin::View(deep_view)));
    assert!(!binder.is_applicable(grandchild, Origin::Controller(root)));

    // Destroying the middle delegate takes the whole branch with it and
    // removes it from the root's delegate list.
    binder.destroy(child).unwrap();
    assert!(!binder.is_live(grandchild));
    assert!(binder.delegates_of(root).is_empty());
    assert!(!binder.is_applicable(root, Origin::View(deep_view)));
}

#[test]
fn unrelated_view_publication_is_filtered_out() {
    let mut binder = engine_with(
        r#"<div id="a" data-controller="widget"></div>
           <div id="b" data-controller="widget"></div>"#,
    );
    let a = controller_of(&binder, "a");
    let b = controller_of(&binder, "b");
    let a_hits = record_hits(&mut binder, PING, a);

    let b_view = binder.view_of(b).unwrap();
    binder.publish_from_view(b_view, PING, Vec::new()).unwrap();
    assert!(a_hits.borrow().is_empty());
}

#[test]
fn originless_publication_fails_the_protocol_check() {
    let mut binder = engine_with(r#"<div id="a" data-controller="widget"></div>"#);

    // No subscribers on the topic: nothing to misroute, so no error.
    binder.publish_raw(PING, Vec::new()).unwrap();

    let a = controller_of(&binder, "a");
    let hits = record_hits(&mut binder, PING, a);
    let err = binder.publish_raw(PING, Vec::new()).unwrap_err();
    assert!(matches!(err, BinderError::Protocol(_)));
    assert!(hits.borrow().is_empty());
}

#[test]
fn subscribing_a_dead_controller_is_refused() {
    let mut binder = engine_with(r#"<div id="a" data-controller="widget"></div>"#);
    let a = controller_of(&binder, "a");
    binder.destroy(a).unwrap();

    let err = binder
        .subscribe(PING, a, "on_ping", Box::new(|_| {}))
        .unwrap_err();
    assert!(matches!(err, BinderError::Configuration(_)));
}

#[test]
fn destroy_drops_the_controllers_subscriptions() {
    let mut binder = engine_with(
        r#"<div id="a" data-controller="widget"></div>
           <div id="b" data-controller="widget"></div>"#,
    );
    let a = controller_of(&binder, "a");
    let b = controller_of(&binder, "b");
    let a_hits = record_hits(&mut binder, PING, a);
    let b_hits = record_hits(&mut binder, PING, b);

    let b_view = binder.view_of(b).unwrap();
    binder.destroy(a).unwrap();
    binder.publish_from_view(b_view, PING, Vec::new()).unwrap();

    assert!(a_hits.borrow().is_empty());
    assert_eq!(b_hits.borrow().len(), 1);
}

#[test]
fn history_handler_conflicts_with_an_existing_subscription() {
    let mut binder = engine_with(r#"<div id="a" data-controller="widget"></div>"#);
    let a = controller_of(&binder, "a");

    binder.init_history_handler(a, "on_travel").unwrap();
    assert!(binder.has_travel_handler(a));

    // The reverse direction is refused too: a travel-handler method
    // cannot then be subscribed.
    let err = binder
        .subscribe(PING, a, "on_travel", Box::new(|_| {}))
        .unwrap_err();
    assert!(matches!(err, BinderError::Configuration(_)));

    binder
        .subscribe(PING, a, "on_ping", Box::new(|_| {}))
        .unwrap();
    let err = binder.init_history_handler(a, "on_ping").unwrap_err();
    assert!(matches!(err, BinderError::Configuration(_)));
}

#[test]
fn restore_initial_state_publishes_the_authored_snapshot() {
    let mut binder = engine_with(
        r#"<div id="a" data-controller="widget" label="authored"><b>x</b></div>"#,
    );
    let a = controller_of(&binder, "a");
    let hits = record_hits(&mut binder, binder::topics::RESTORE_INITIAL_STATE, a);

    binder.restore_initial_state(a).unwrap();

    let hits = hits.borrow();
    assert_eq!(hits.len(), 1);
    match &hits[0][..] {
        [Arg::Markup(node)] => {
            assert_eq!(node.attr("label"), Some("authored"));
            assert_eq!(node.children().unwrap().len(), 1);
        }
        other => panic!("expected a markup snapshot, got {other:?}"),
    }
}

#[test]
fn restore_initial_state_without_an_element_publishes_null() {
    let mut binder = engine_with(r#"<div id="a" data-controller="widget"></div>"#);
    let parent = controller_of(&binder, "a");
    let delegate = binder
        .create_delegate(
            parent,
            DelegateSpec {
                class_name: Some("widget".to_string()),
                inject_data: false,
                ..DelegateSpec::default()
            },
        )
        .unwrap()
        .unwrap();
    let hits = record_hits(&mut binder, binder::topics::RESTORE_INITIAL_STATE, delegate);

    binder.restore_initial_state(delegate).unwrap();
    assert_eq!(hits.borrow()[0], vec![Arg::Null]);
}
