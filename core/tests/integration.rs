//! Lookups against the live mock server with every transform strategy.
//!
//! # Design
//! Each test starts the mock server on a random port in a background thread
//! with its own tokio runtime, then drives `ZippoClient` over real HTTP. The
//! tests themselves stay synchronous: `FutureTransform` blocks on its own
//! runtime and must not run inside another one.

use std::net::SocketAddr;

use mock_server::{AppState, Fixture, Hits, StatusCode};
use zippo_core::{
    BufferedTransform, Country, FutureTransform, PostcodeRecord, RequestBuilder, ResponseTransform,
    Strategy, StreamingTransform, TransformError, ZippoClient, ZippoConfig,
};

/// Start the mock server with `state` on a random port.
fn spawn_server(state: AppState) -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, state).await
        })
        .unwrap();
    });

    addr
}

fn clients(addr: SocketAddr) -> Vec<(Strategy, ZippoClient<Box<dyn ResponseTransform>>)> {
    Strategy::ALL
        .into_iter()
        .map(|strategy| {
            let config = ZippoConfig {
                base_url: format!("http://{addr}"),
                strategy,
            };
            (strategy, ZippoClient::from_config(&config).unwrap())
        })
        .collect()
}

fn hits(hits: &Hits) -> Vec<String> {
    hits.blocking_read().clone()
}

#[test]
fn germany_scenario_with_every_strategy() {
    let addr = spawn_server(AppState::sample());

    for (strategy, client) in clients(addr) {
        let records = client
            .fetch_country_data(Country::Germany, &["22880", "22305"])
            .unwrap();

        assert_eq!(records.len(), 2, "{strategy}");
        assert_eq!(records[0].postcode, "22880", "{strategy}");
        assert_eq!(records[0].country, "Germany", "{strategy}");
        assert_eq!(records[0].places[0].name, "Wedel", "{strategy}");
        assert_eq!(records[0].places[0].state_abbreviation, "SH", "{strategy}");
        assert_eq!(records[1].postcode, "22305", "{strategy}");
        assert_eq!(records[1].places[0].name, "Hamburg Barmbek-Nord", "{strategy}");
        assert_eq!(records[1].places[0].state_abbreviation, "HH", "{strategy}");
    }
}

#[test]
fn denmark_scenario_with_every_strategy() {
    let addr = spawn_server(AppState::sample());

    for (strategy, client) in clients(addr) {
        let records = client.fetch_country_data(Country::Denmark, &["2400"]).unwrap();

        assert_eq!(records.len(), 1, "{strategy}");
        assert_eq!(records[0].postcode, "2400", "{strategy}");
        assert_eq!(records[0].places.len(), 1, "{strategy}");
        assert!(records[0].places[0].name.contains("København"), "{strategy}");
        assert_eq!(records[0].places[0].state, "", "{strategy}");
    }
}

#[test]
fn strategies_decode_identically() {
    let addr = spawn_server(AppState::sample());
    let builder = RequestBuilder::new(&format!("http://{addr}")).unwrap();
    let locator = builder.build(Country::Netherlands, "1012").unwrap();

    let buffered = BufferedTransform.transform(&locator).unwrap();
    let future = FutureTransform::new().unwrap().transform(&locator).unwrap();
    let streaming = StreamingTransform.transform(&locator).unwrap();

    assert_eq!(buffered, future);
    assert_eq!(buffered, streaming);
    assert_eq!(buffered.places[0].name, "Amsterdam");
}

#[test]
fn output_follows_input_order() {
    let addr = spawn_server(AppState::sample());
    let zips = ["22305", "22880", "22305"];

    for (strategy, client) in clients(addr) {
        let records = client.fetch_country_data(Country::Germany, &zips).unwrap();
        let postcodes: Vec<&str> = records.iter().map(|r| r.postcode.as_str()).collect();
        assert_eq!(postcodes, zips, "{strategy}");
    }
}

#[test]
fn fetch_all_over_http() {
    let addr = spawn_server(AppState::sample());
    let client = ZippoClient::new(
        RequestBuilder::new(&format!("http://{addr}")).unwrap(),
        StreamingTransform,
    );

    let batches = client
        .fetch_all(&[
            (Country::Germany, vec!["22880", "22305"]),
            (Country::Denmark, vec!["2400"]),
        ])
        .unwrap();

    let counts: Vec<(Country, usize)> = batches.iter().map(|(c, r)| (*c, r.len())).collect();
    assert_eq!(counts, [(Country::Germany, 2), (Country::Denmark, 1)]);
}

#[test]
fn second_zip_failure_stops_the_batch() {
    for strategy in Strategy::ALL {
        let state = AppState::sample().with_fixture(
            "de",
            "22305",
            Fixture::raw(StatusCode::INTERNAL_SERVER_ERROR, "internal error"),
        );
        let server_hits = state.hits();
        let addr = spawn_server(state);
        let client = ZippoClient::from_config(&ZippoConfig {
            base_url: format!("http://{addr}"),
            strategy,
        })
        .unwrap();

        let err = client
            .fetch_country_data(Country::Germany, &["22880", "22305", "10115"])
            .unwrap_err();

        assert_eq!(err.zip, "22305", "{strategy}");
        assert_eq!(err.index, 1, "{strategy}");
        assert!(err.source.is_dispatch(), "{strategy}: {err}");
        assert!(
            matches!(err.source, TransformError::Status { status: 500, ref body } if body == "internal error"),
            "{strategy}: {err}"
        );
        assert_eq!(hits(&server_hits), ["de/22880", "de/22305"], "{strategy}");
    }
}

#[test]
fn malformed_json_is_a_decode_failure() {
    let state = AppState::sample().with_fixture(
        "de",
        "99999",
        Fixture::raw(StatusCode::OK, "{\"post code\": "),
    );
    let addr = spawn_server(state);

    for (strategy, client) in clients(addr) {
        let err = client
            .fetch_country_data(Country::Germany, &["99999"])
            .unwrap_err();
        assert!(err.source.is_decode(), "{strategy}: {err}");
        assert!(!err.source.is_dispatch(), "{strategy}");
    }
}

/// A Latin-1 encoded body: it arrives intact but is not UTF-8 JSON.
const LATIN1_BODY: &[u8] =
    b"{\"post code\":\"2400\",\"country\":\"Denmark\",\"places\":[{\"place name\":\"K\xf8benhavn NV\"}]}";

#[test]
fn non_utf8_body_is_a_decode_failure() {
    let state = AppState::default().with_fixture("dk", "2400", Fixture::bytes(StatusCode::OK, LATIN1_BODY));
    let addr = spawn_server(state);

    for (strategy, client) in clients(addr) {
        let err = client
            .fetch_country_data(Country::Denmark, &["2400"])
            .unwrap_err();
        assert!(err.source.is_decode(), "{strategy}: {err}");
        assert!(!err.source.is_dispatch(), "{strategy}: {err}");
    }
}

#[test]
fn non_utf8_error_body_is_kept_in_status() {
    let state = AppState::default().with_fixture(
        "dk",
        "2400",
        Fixture::bytes(StatusCode::BAD_GATEWAY, b"K\xf8benhavn down"),
    );
    let addr = spawn_server(state);

    for (strategy, client) in clients(addr) {
        let err = client
            .fetch_country_data(Country::Denmark, &["2400"])
            .unwrap_err();
        assert!(
            matches!(err.source, TransformError::Status { status: 502, ref body } if body == "K\u{FFFD}benhavn down"),
            "{strategy}: {err}"
        );
    }
}

#[test]
fn unknown_zip_is_not_found() {
    let addr = spawn_server(AppState::sample());

    for (strategy, client) in clients(addr) {
        let err = client
            .fetch_country_data(Country::Netherlands, &["0000"])
            .unwrap_err();
        assert!(err.source.is_not_found(), "{strategy}: {err}");
    }
}

#[test]
fn special_characters_in_zip_round_trip() {
    let zip = "AB 1/2?x#y%z";
    let body = mock_server::record(zip, "Germany", "DE", serde_json::json!([]));
    let state = AppState::default().with_fixture("de", zip, Fixture::json(body));
    let server_hits = state.hits();
    let addr = spawn_server(state);

    for (strategy, client) in clients(addr) {
        let records: Vec<PostcodeRecord> = client.fetch_country_data(Country::Germany, &[zip]).unwrap();
        assert_eq!(records[0].postcode, zip, "{strategy}");
        assert!(records[0].places.is_empty(), "{strategy}");
    }
    assert_eq!(hits(&server_hits), vec![format!("de/{zip}"); 3]);
}

#[test]
fn zips_with_tabs_or_line_breaks_are_never_sent() {
    let state = AppState::sample();
    let server_hits = state.hits();
    let addr = spawn_server(state);

    for (strategy, client) in clients(addr) {
        for zip in ["22\n880", "22\t880", "22880\r", "\t", "\t.."] {
            let err = client
                .fetch_country_data(Country::Germany, &[zip])
                .unwrap_err();
            assert!(
                matches!(err.source, TransformError::MalformedRequest(_)),
                "{strategy} {zip:?}: {err}"
            );
        }
    }
    assert!(hits(&server_hits).is_empty());
}

#[test]
fn unreachable_service_is_a_dispatch_failure() {
    // Bind and drop to get a port nothing listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();

    for (strategy, client) in clients(addr) {
        let err = client
            .fetch_country_data(Country::Germany, &["22880"])
            .unwrap_err();
        assert!(
            matches!(err.source, TransformError::Transport(_)),
            "{strategy}: {err}"
        );
    }
}
