//! Rendering views from the fixture directory.

#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use mailcraft::{Error, TemplateRenderer, ViewParams};
use mailcraft_view::ViewRenderer;
use proptest::prelude::*;
use serde_json::json;

fn views() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/views")
}

fn params(value: serde_json::Value) -> ViewParams {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

#[test]
fn test_render_top_level_view() {
    let renderer = ViewRenderer::new(views());
    let html = renderer
        .render("test1", &params(json!({ "name": "Ada" })))
        .unwrap();
    assert_eq!(html.trim_end(), "<p>Hello Ada</p>");
}

#[test]
fn test_render_nested_view() {
    let renderer = ViewRenderer::new(views());
    let html = renderer
        .render(
            "emails.welcome",
            &params(json!({ "title": "Welcome", "items": ["one", "two"] })),
        )
        .unwrap();

    assert!(html.contains("<h1>Welcome</h1>"));
    assert!(html.contains("<li>one</li><li>two</li>"));
}

#[test]
fn test_render_escapes_parameters() {
    let renderer = ViewRenderer::new(views());
    let html = renderer
        .render("test1", &params(json!({ "name": "<script>" })))
        .unwrap();
    assert!(html.contains("&lt;script&gt;"));
    assert!(!html.contains("<script>"));
}

#[test]
fn test_missing_variable_is_lenient_by_default() {
    let renderer = ViewRenderer::new(views());
    let html = renderer.render("test1", &ViewParams::new()).unwrap();
    assert_eq!(html.trim_end(), "<p>Hello </p>");
}

#[test]
fn test_strict_variables() {
    let renderer = ViewRenderer::new(views()).with_strict_variables();
    let err = renderer.render("test1", &ViewParams::new()).unwrap_err();
    assert_eq!(err.view, "test1");
}

#[test]
fn test_missing_view() {
    let renderer = ViewRenderer::new(views());
    let err = renderer
        .render("emails.nowhere", &ViewParams::new())
        .unwrap_err();
    assert_eq!(err.view, "emails.nowhere");
    assert!(err.message.contains("not found"), "{}", err.message);
    assert!(err.message.contains("nowhere.html"), "{}", err.message);
}

#[test]
fn test_broken_view() {
    let renderer = ViewRenderer::new(views());
    let err = renderer
        .render("emails.broken", &ViewParams::new())
        .unwrap_err();
    assert_eq!(err.view, "emails.broken");
}

#[test]
fn test_with_view_sets_content() {
    let transport = mailcraft_smtp::localhost().with_renderer(ViewRenderer::new(views()));
    let message = transport
        .create_message()
        .with_view("test1", Some(&params(json!({ "name": "Grace" }))))
        .unwrap();

    assert_eq!(message.content().trim_end(), "<p>Hello Grace</p>");
}

#[test]
fn test_with_view_missing_view_fails() {
    let transport = mailcraft_smtp::localhost().with_renderer(ViewRenderer::new(views()));
    let message = transport.create_message().with_content("<p>kept</p>");

    let err = message.with_view("nope", None).unwrap_err();
    assert!(matches!(err, Error::TemplateRender(ref e) if e.view == "nope"));
    assert_eq!(message.content(), "<p>kept</p>");
}

proptest! {
    #[test]
    fn prop_parameters_never_inject_markup(name in "[a-zA-Z0-9<>&\" ]{0,24}") {
        let renderer = ViewRenderer::new(views());
        let html = renderer.render("test1", &params(json!({ "name": name }))).unwrap();
        prop_assert_eq!(html.matches('<').count(), 2);
        prop_assert_eq!(html.matches('>').count(), 2);
    }
}
