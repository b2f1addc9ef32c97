use super::*;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use axum::{
    extract::{Path, State},
    http::StatusCode as HttpStatus,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use shared::domain::NOT_AVAILABLE;
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct MockApi {
    hits: Arc<AtomicUsize>,
}

fn country_json(name: &str, capital: &str, population: u64, region: &str) -> Value {
    json!({
        "name": {"common": name, "official": format!("Official {name}")},
        "capital": [capital],
        "population": population,
        "region": region,
        "flags": {
            "png": format!("https://flagcdn.com/w320/{}.png", name.to_lowercase()),
            "svg": format!("https://flagcdn.com/{}.svg", name.to_lowercase()),
            "alt": format!("The flag of {name}")
        }
    })
}

async fn country_by_name(State(api): State<MockApi>, Path(name): Path<String>) -> Response {
    api.hits.fetch_add(1, Ordering::SeqCst);
    match name.as_str() {
        "France" => Json(json!([country_json("France", "Paris", 67_391_582, "Europe")]))
            .into_response(),
        "United States" => Json(json!([country_json(
            "United States",
            "Washington, D.C.",
            329_484_123,
            "Americas"
        )]))
        .into_response(),
        "Sparse" => Json(json!([{"flags": {"svg": "https://flagcdn.com/xx.svg"}}])).into_response(),
        "Empty" => Json(json!([])).into_response(),
        "Flagless" => Json(json!([{"name": {"common": "Flagless"}, "capital": ["Nowhere"]}]))
            .into_response(),
        "Mixed" => Json(json!([
            {"name": {"common": "Mixed"}, "flags": {"svg": "https://flagcdn.com/mx.svg"}},
            {"name": {"common": "Other"}, "population": 1.5, "capital": "not a list"}
        ]))
        .into_response(),
        "BadFirst" => Json(json!([
            {"name": "not an object", "flags": {"svg": "https://flagcdn.com/bf.svg"}}
        ]))
        .into_response(),
        "Garbled" => (HttpStatus::OK, "<html>not json</html>").into_response(),
        "Teapot" => HttpStatus::SERVICE_UNAVAILABLE.into_response(),
        "Slowland" => {
            tokio::time::sleep(Duration::from_millis(300)).await;
            Json(json!([country_json("Slowland", "Drift", 12, "Oceania")])).into_response()
        }
        _ => (
            HttpStatus::NOT_FOUND,
            Json(json!({"status": 404, "message": "Not Found"})),
        )
            .into_response(),
    }
}

async fn spawn_country_api() -> anyhow::Result<(String, MockApi)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let api = MockApi::default();
    let app = Router::new()
        .route("/v3.1/name/:country", get(country_by_name))
        .with_state(api.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}/v3.1"), api))
}

async fn controller() -> (LookupController<CountryClient>, MockApi) {
    let (base_url, api) = spawn_country_api().await.expect("spawn api");
    (LookupController::new(CountryClient::new(base_url)), api)
}

#[derive(Default)]
struct RecordingSurface {
    fields: HashMap<DisplayField, String>,
    flag_visible: Option<bool>,
    flag: Option<FlagRef>,
    info_visible: bool,
}

impl RecordingSurface {
    fn field(&self, field: DisplayField) -> &str {
        self.fields.get(&field).map(String::as_str).unwrap_or("")
    }

    fn assert_cleared(&self) {
        for field in DisplayField::COUNTRY {
            assert_eq!(self.field(field), "", "{field:?} should be cleared");
        }
        assert_eq!(self.flag_visible, Some(false));
    }
}

impl DisplaySurface for RecordingSurface {
    fn set_field(&mut self, field: DisplayField, value: &str) {
        self.fields.insert(field, value.to_string());
    }

    fn set_flag_visible(&mut self, visible: bool) {
        self.flag_visible = Some(visible);
    }

    fn set_flag_source(&mut self, flag: &FlagRef) {
        self.flag = Some(flag.clone());
    }

    fn set_info_visible(&mut self, visible: bool) {
        self.info_visible = visible;
    }
}

struct CountingLookup {
    calls: AtomicUsize,
}

#[async_trait]
impl CountryLookup for CountingLookup {
    async fn find_by_name(&self, _query: &Query) -> Result<Option<CountryRecord>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }
}

#[tokio::test]
async fn found_country_populates_every_field() {
    let (controller, _api) = controller().await;
    let mut surface = RecordingSurface::default();

    let completed = controller.lookup_and_render("  France ", &mut surface).await;

    assert_eq!(completed.query.as_ref().map(Query::as_str), Some("France"));
    assert_eq!(surface.field(DisplayField::CountryName), "France");
    assert_eq!(surface.field(DisplayField::CapitalCity), "Capital: Paris");
    assert_eq!(surface.field(DisplayField::Population), "Population: 67,391,582");
    assert_eq!(surface.field(DisplayField::Region), "Region: Europe");
    assert_eq!(surface.field(DisplayField::ErrorMessage), "");
    assert_eq!(surface.flag_visible, Some(true));
    assert!(surface.info_visible);

    let flag = surface.flag.expect("flag source");
    assert_eq!(flag.svg_url, "https://flagcdn.com/france.svg");
    assert_eq!(flag.png_url.as_deref(), Some("https://flagcdn.com/w320/france.png"));
    assert_eq!(flag.alt, "Flag of France");
}

#[tokio::test]
async fn query_with_spaces_reaches_the_api_decoded() {
    let (controller, _api) = controller().await;
    let mut surface = RecordingSurface::default();

    controller.lookup_and_render("United States", &mut surface).await;

    assert_eq!(surface.field(DisplayField::CountryName), "United States");
    assert_eq!(
        surface.field(DisplayField::CapitalCity),
        "Capital: Washington, D.C."
    );
}

#[tokio::test]
async fn sparse_record_renders_fallbacks() {
    let (controller, _api) = controller().await;
    let mut surface = RecordingSurface::default();

    controller.lookup_and_render("Sparse", &mut surface).await;

    assert_eq!(surface.field(DisplayField::CountryName), NOT_AVAILABLE);
    assert_eq!(surface.field(DisplayField::CapitalCity), "Capital: N/A");
    assert_eq!(surface.field(DisplayField::Population), "Population: N/A");
    assert_eq!(surface.field(DisplayField::Region), "Region: N/A");
    assert_eq!(surface.flag_visible, Some(true));
}

#[tokio::test]
async fn grouping_separator_is_configurable() {
    let (base_url, _api) = spawn_country_api().await.expect("spawn api");
    let controller = LookupController::new(CountryClient::new(base_url)).with_grouping_separator('.');
    let mut surface = RecordingSurface::default();

    controller.lookup_and_render("France", &mut surface).await;

    assert_eq!(surface.field(DisplayField::Population), "Population: 67.391.582");
}

#[tokio::test]
async fn blank_input_clears_without_network_call() {
    let controller = LookupController::new(CountingLookup {
        calls: AtomicUsize::new(0),
    });
    let mut surface = RecordingSurface::default();
    surface.set_field(DisplayField::CountryName, "Stale");
    surface.set_field(DisplayField::ErrorMessage, "old error");

    let completed = controller.lookup_and_render("   \t", &mut surface).await;

    assert_eq!(completed.query, None);
    assert_eq!(completed.state, DisplayState::blank());
    assert_eq!(controller.lookup_service().calls.load(Ordering::SeqCst), 0);
    surface.assert_cleared();
    assert_eq!(surface.field(DisplayField::ErrorMessage), "");
}

#[tokio::test]
async fn not_found_names_the_query() {
    let (controller, api) = controller().await;
    let mut surface = RecordingSurface::default();
    controller.lookup_and_render("France", &mut surface).await;

    controller.lookup_and_render("Atlantis", &mut surface).await;

    assert_eq!(
        surface.field(DisplayField::ErrorMessage),
        "Country \"Atlantis\" not found. Please check the spelling."
    );
    surface.assert_cleared();
    assert_eq!(api.hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn other_http_failures_report_status_code() {
    let (controller, _api) = controller().await;

    let err = controller
        .fetch_country(&Query::parse("Teapot").expect("query"))
        .await
        .expect_err("must fail");
    assert_eq!(err, LookupError::fetch(503, "Service Unavailable"));

    let mut surface = RecordingSurface::default();
    controller.lookup_and_render("Teapot", &mut surface).await;
    assert!(surface.field(DisplayField::ErrorMessage).contains("503"));
    surface.assert_cleared();
}

#[tokio::test]
async fn empty_flagless_and_garbled_bodies_are_data_unavailable() {
    let (controller, _api) = controller().await;

    for name in ["Empty", "Flagless", "Garbled", "BadFirst"] {
        let query = Query::parse(name).expect("query");
        let err = controller.fetch_country(&query).await.expect_err("must fail");
        assert_eq!(err, LookupError::DataUnavailable, "{name}");

        let mut surface = RecordingSurface::default();
        controller.lookup_and_render(name, &mut surface).await;
        assert_eq!(
            surface.field(DisplayField::ErrorMessage),
            "Country data or flag information not available for this search."
        );
        surface.assert_cleared();
    }
}

#[tokio::test]
async fn connection_failure_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let controller = LookupController::new(CountryClient::new(format!("http://{addr}/v3.1")));
    let err = controller
        .fetch_country(&Query::parse("France").expect("query"))
        .await
        .expect_err("must fail");

    assert!(matches!(err, LookupError::Transport { .. }), "{err:?}");
    assert!(err.to_string().starts_with("Failed to fetch data: "));

    let mut surface = RecordingSurface::default();
    surface.set_field(DisplayField::CountryName, "France");
    surface.set_flag_visible(true);
    let completed = controller.lookup_and_render("France", &mut surface).await;

    assert!(!completed.state.is_populated());
    assert!(surface
        .field(DisplayField::ErrorMessage)
        .starts_with("Failed to fetch data: "));
    surface.assert_cleared();
}

#[tokio::test]
async fn only_the_first_record_is_decoded() {
    let (controller, _api) = controller().await;
    let mut surface = RecordingSurface::default();

    let completed = controller.lookup_and_render("Mixed", &mut surface).await;

    assert!(completed.state.is_populated());
    assert_eq!(surface.field(DisplayField::CountryName), "Mixed");
    assert_eq!(
        surface.field(DisplayField::Population),
        format!("Population: {NOT_AVAILABLE}")
    );
    assert_eq!(surface.field(DisplayField::ErrorMessage), "");
    assert_eq!(
        surface.flag.as_ref().map(|f| f.svg_url.as_str()),
        Some("https://flagcdn.com/mx.svg")
    );
}

#[tokio::test]
async fn stale_response_is_not_rendered() {
    let (base_url, _api) = spawn_country_api().await.expect("spawn api");
    let controller = Arc::new(LookupController::new(CountryClient::new(base_url)));

    let slow = {
        let controller = Arc::clone(&controller);
        tokio::spawn(async move { controller.lookup("Slowland").await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    let fast = controller.lookup("France").await;
    let slow = slow.await.expect("join slow lookup");
    assert!(slow.ticket < fast.ticket);
    assert!(slow.state.is_populated());

    let mut surface = RecordingSurface::default();
    assert!(controller.render_if_current(&fast, &mut surface));
    assert!(!controller.render_if_current(&slow, &mut surface));
    assert_eq!(surface.field(DisplayField::CountryName), "France");
}

#[test]
fn sequencer_only_honours_latest_ticket() {
    let sequencer = LookupSequencer::default();
    let first = sequencer.issue();
    assert!(sequencer.is_current(first));

    let second = sequencer.issue();
    assert!(!sequencer.is_current(first));
    assert!(sequencer.is_current(second));
    assert_eq!(second.value(), first.value() + 1);
}

#[test]
fn endpoint_appends_trimmed_query() {
    let client = CountryClient::new("https://restcountries.com/v3.1/");
    let query = Query::parse(" New Zealand ").expect("query");
    assert_eq!(
        client.endpoint_for(&query),
        "https://restcountries.com/v3.1/name/New Zealand"
    );
    assert_eq!(CountryClient::default().api_base_url(), DEFAULT_API_BASE_URL);
}
