// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the device dispatcher using wiremock.

use std::time::{Duration, Instant};

use ledroom_lib::{Color, DeviceDispatcher, DeviceFamily, REQUEST_TIMEOUT};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn ok_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    server
}

fn red() -> Color {
    Color::new(0.0, 1.0, 1.0, 0.0)
}

#[tokio::test]
async fn fan_out_reaches_every_endpoint() {
    let a = ok_server().await;
    let b = ok_server().await;
    let c = ok_server().await;

    let dispatcher = DeviceDispatcher::new(
        DeviceFamily::Rgbw,
        vec![a.uri(), b.uri(), c.uri()],
        Vec::new(),
    )
    .unwrap();

    dispatcher.dispatch_color(&red(), 0).await;

    for server in [&a, &b, &c] {
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url.path(), "/s/ff00000000");
    }
}

#[tokio::test]
async fn stalled_endpoint_does_not_block_the_others() {
    let a = ok_server().await;
    let b = ok_server().await;

    let stalled = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&stalled)
        .await;

    let dispatcher = DeviceDispatcher::new(
        DeviceFamily::Rgbw,
        vec![a.uri(), stalled.uri(), b.uri()],
        Vec::new(),
    )
    .unwrap();

    let start = Instant::now();
    dispatcher.dispatch_color(&red(), 0).await;
    let elapsed = start.elapsed();

    // Completion is capped by the per-request timeout, not the stall
    assert!(
        elapsed < REQUEST_TIMEOUT + Duration::from_secs(2),
        "dispatch took {elapsed:?}"
    );
    assert_eq!(a.received_requests().await.unwrap().len(), 1);
    assert_eq!(b.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn failing_endpoint_is_absorbed() {
    let healthy = ok_server().await;

    let broken = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&broken)
        .await;

    let dispatcher = DeviceDispatcher::new(
        DeviceFamily::Rgbw,
        vec![broken.uri(), healthy.uri()],
        Vec::new(),
    )
    .unwrap();

    // Completes normally; the 500 is logged and dropped
    dispatcher.dispatch_color(&red(), 0).await;

    assert_eq!(healthy.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn unreachable_endpoint_is_absorbed() {
    let healthy = ok_server().await;

    let dispatcher = DeviceDispatcher::new(
        DeviceFamily::Rgbw,
        // Nothing listens on this port
        vec!["http://127.0.0.1:9".to_string(), healthy.uri()],
        Vec::new(),
    )
    .unwrap();

    dispatcher.dispatch_color(&red(), 0).await;

    assert_eq!(healthy.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn fade_parameter_is_appended_when_nonzero() {
    let server = ok_server().await;
    let dispatcher =
        DeviceDispatcher::new(DeviceFamily::Rgbw, vec![server.uri()], Vec::new()).unwrap();

    dispatcher.dispatch_color(&red(), 300).await;
    dispatcher.dispatch_color(&red(), 0).await;

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.path(), "/s/ff00000000/colorFadeMs/300");
    assert_eq!(requests[1].url.path(), "/s/ff00000000");
}

#[tokio::test]
async fn cct_family_uses_cct_encoding() {
    let server = ok_server().await;
    let dispatcher =
        DeviceDispatcher::new(DeviceFamily::Cct, vec![server.uri()], Vec::new()).unwrap();

    // Hue 0 is fully warm
    dispatcher.dispatch_color(&red(), 0).await;

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.path(), "/s/ff00ff00");
}

#[tokio::test]
async fn closet_command_shape() {
    let closet = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&closet)
        .await;

    let dispatcher =
        DeviceDispatcher::new(DeviceFamily::RgbwCloset, Vec::new(), vec![closet.uri()]).unwrap();

    dispatcher.dispatch_closet_brightness(200).await;
    // At the noise floor the device is told to stay off
    dispatcher.dispatch_closet_brightness(2).await;

    let requests = closet.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].url.path(), "/json/state");

    let first: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(first["on"], serde_json::json!(true));
    assert_eq!(first["bri"], serde_json::json!("200"));

    let second: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
    assert_eq!(second["on"], serde_json::json!(false));
    assert_eq!(second["bri"], serde_json::json!("2"));
}
