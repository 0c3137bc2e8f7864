//! Single binary web server: bracket engine over a JSON REST API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080), DEFAULT_FORMAT (single_elim | double_elim).

use actix_web::{
    delete, get, post,
    web::{Bytes, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use bracket_engine_web::{
    advance, bracket_plan, bracket_status, create_bracket, import_roster, list_bracket_matches,
    open_matches, parse_roster, report_result, resolve_by_code, EngineError, EntrantId, Event,
    EventId, Format, MatchId, MatchStore, MemoryStore, StoreError,
};
use serde::Deserialize;
use std::str::FromStr;

/// Shared in-memory store: many events by id.
type AppState = Data<MemoryStore>;

/// Settings read from the environment at startup.
#[derive(Clone, Debug)]
struct AppConfig {
    host: String,
    port: u16,
    default_format: Format,
}

impl AppConfig {
    fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
        let port = match std::env::var("PORT") {
            Ok(p) => p.parse().unwrap_or_else(|_| {
                log::warn!("PORT={:?} is not a port number, using {}", p, default_port());
                default_port()
            }),
            Err(_) => default_port(),
        };
        let default_format = match std::env::var("DEFAULT_FORMAT") {
            Ok(f) => Format::from_str(&f).unwrap_or_else(|e| {
                log::warn!("{}; using {}", e, Format::default());
                Format::default()
            }),
            Err(_) => Format::default(),
        };
        Self {
            host,
            port,
            default_format,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateEventBody {
    name: String,
    #[serde(default)]
    format: Option<String>,
}

#[derive(Deserialize)]
struct AddEntrantBody {
    name: String,
    #[serde(default)]
    seed: Option<u32>,
}

#[derive(Deserialize, Default)]
struct ShuffleSeedsBody {
    #[serde(default)]
    rng_seed: Option<u64>,
}

#[derive(Deserialize)]
struct ReportByCodeBody {
    code: String,
    winner_seed: u32,
    #[serde(default)]
    reporter: Option<String>,
}

#[derive(Deserialize)]
struct ReportResultBody {
    winner: EntrantId,
    #[serde(default)]
    reporter: Option<String>,
}

/// Path segment: event id (e.g. /api/events/{id})
#[derive(Deserialize)]
struct EventPath {
    id: EventId,
}

/// Path segments: event id and entrant id (e.g. /api/events/{id}/entrants/{entrant_id})
#[derive(Deserialize)]
struct EventEntrantPath {
    id: EventId,
    entrant_id: EntrantId,
}

/// Path segment: match id (e.g. /api/matches/{match_id})
#[derive(Deserialize)]
struct MatchPath {
    match_id: MatchId,
}

/// Map an engine error to a JSON error response.
fn error_response(e: &EngineError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        EngineError::Setup(_) | EngineError::Validation(_) | EngineError::Roster(_) => {
            HttpResponse::BadRequest().json(body)
        }
        EngineError::NotFound(_) | EngineError::Store(StoreError::EventNotFound(_)) => {
            HttpResponse::NotFound().json(body)
        }
        EngineError::AlreadyExists(_) => HttpResponse::Conflict().json(body),
        EngineError::Store(_) => {
            log::error!("store failure: {}", e);
            HttpResponse::InternalServerError().json(body)
        }
    }
}

/// Current event as JSON, or the error.
fn event_response(state: &MemoryStore, id: EventId) -> HttpResponse {
    match state.get_event(id) {
        Ok(Some(event)) => HttpResponse::Ok().json(event),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({ "error": "No event" })),
        Err(e) => error_response(&e.into()),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "bracket-engine-web",
    })
}

/// Create a new event (returns it with id; client stores id for subsequent requests).
#[post("/api/events")]
async fn api_create_event(
    state: AppState,
    config: Data<AppConfig>,
    body: Json<CreateEventBody>,
) -> HttpResponse {
    let format = match body.format.as_deref() {
        Some(f) => match Format::from_str(f) {
            Ok(f) => f,
            Err(e) => return error_response(&e),
        },
        None => config.default_format,
    };
    let name = body.name.trim();
    if name.is_empty() {
        return error_response(&EngineError::Setup("event name must not be empty".into()));
    }
    let event = Event::new(name, format);
    match state.insert_event(event) {
        Ok(id) => {
            log::info!("event {} created ({})", id, format);
            event_response(&state, id)
        }
        Err(e) => error_response(&e.into()),
    }
}

/// All events, oldest first.
#[get("/api/events")]
async fn api_list_events(state: AppState) -> HttpResponse {
    match state.events() {
        Ok(events) => HttpResponse::Ok().json(events),
        Err(e) => error_response(&e.into()),
    }
}

/// Get an event (roster included) by id.
#[get("/api/events/{id}")]
async fn api_get_event(state: AppState, path: Path<EventPath>) -> HttpResponse {
    event_response(&state, path.id)
}

/// Register an entrant (only before the bracket exists).
#[post("/api/events/{id}/entrants")]
async fn api_add_entrant(
    state: AppState,
    path: Path<EventPath>,
    body: Json<AddEntrantBody>,
) -> HttpResponse {
    match state.update_event(path.id, |e| e.add_entrant(body.name.as_str(), body.seed)) {
        Ok(_) => event_response(&state, path.id),
        Err(e) => error_response(&e),
    }
}

/// Remove an entrant by id (only before the bracket exists).
#[delete("/api/events/{id}/entrants/{entrant_id}")]
async fn api_remove_entrant(state: AppState, path: Path<EventEntrantPath>) -> HttpResponse {
    match state.update_event(path.id, |e| e.remove_entrant(path.entrant_id)) {
        Ok(()) => event_response(&state, path.id),
        Err(e) => error_response(&e),
    }
}

/// Import entrants from a CSV body (`name,seed` header).
#[post("/api/events/{id}/entrants/import")]
async fn api_import_entrants(state: AppState, path: Path<EventPath>, body: Bytes) -> HttpResponse {
    let entries = match parse_roster(body.as_ref()) {
        Ok(entries) => entries,
        Err(e) => return error_response(&e),
    };
    match state.update_event(path.id, |e| import_roster(e, entries)) {
        Ok(ids) => {
            log::info!("event {}: imported {} entrant(s)", path.id, ids.len());
            event_response(&state, path.id)
        }
        Err(e) => error_response(&e),
    }
}

/// Assign seeds 1..N in random order (reproducible with `rng_seed`).
#[post("/api/events/{id}/seeds/shuffle")]
async fn api_shuffle_seeds(
    state: AppState,
    path: Path<EventPath>,
    body: Option<Json<ShuffleSeedsBody>>,
) -> HttpResponse {
    let rng_seed = body.and_then(|b| b.rng_seed);
    let result = state.update_event(path.id, |e| {
        e.shuffle_seeds(rng_seed);
        Ok(())
    });
    match result {
        Ok(()) => event_response(&state, path.id),
        Err(e) => error_response(&e),
    }
}

/// Create the bracket (one-time).
#[post("/api/events/{id}/bracket")]
async fn api_create_bracket(state: AppState, path: Path<EventPath>) -> HttpResponse {
    let result = create_bracket(state.get_ref(), path.id)
        .and_then(|()| list_bracket_matches(state.get_ref(), path.id));
    match result {
        Ok(matches) => HttpResponse::Created().json(matches),
        Err(e) => error_response(&e),
    }
}

/// All matches of the event, with codes, names and seeds.
#[get("/api/events/{id}/bracket")]
async fn api_get_bracket(state: AppState, path: Path<EventPath>) -> HttpResponse {
    match list_bracket_matches(state.get_ref(), path.id) {
        Ok(matches) => HttpResponse::Ok().json(matches),
        Err(e) => error_response(&e),
    }
}

/// Nominal topology for the current roster.
#[get("/api/events/{id}/plan")]
async fn api_get_plan(state: AppState, path: Path<EventPath>) -> HttpResponse {
    match bracket_plan(state.get_ref(), path.id) {
        Ok(plan) => HttpResponse::Ok().json(plan),
        Err(e) => error_response(&e),
    }
}

/// Progress and champion.
#[get("/api/events/{id}/status")]
async fn api_get_status(state: AppState, path: Path<EventPath>) -> HttpResponse {
    match bracket_status(state.get_ref(), path.id) {
        Ok(status) => HttpResponse::Ok().json(status),
        Err(e) => error_response(&e),
    }
}

/// Matches waiting for a result.
#[get("/api/events/{id}/matches/open")]
async fn api_open_matches(state: AppState, path: Path<EventPath>) -> HttpResponse {
    match open_matches(state.get_ref(), path.id) {
        Ok(matches) => HttpResponse::Ok().json(matches),
        Err(e) => error_response(&e),
    }
}

/// Run advancement (safe at any time).
#[post("/api/events/{id}/advance")]
async fn api_advance(state: AppState, path: Path<EventPath>) -> HttpResponse {
    match advance(state.get_ref(), path.id) {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => error_response(&e),
    }
}

/// Report a winner by match code (`W1-02`) and seed.
#[post("/api/events/{id}/report")]
async fn api_report_by_code(
    state: AppState,
    path: Path<EventPath>,
    body: Json<ReportByCodeBody>,
) -> HttpResponse {
    let result = resolve_by_code(
        state.get_ref(),
        path.id,
        &body.code,
        body.winner_seed,
        body.reporter.as_deref(),
    );
    match result.and_then(|_| list_bracket_matches(state.get_ref(), path.id)) {
        Ok(matches) => HttpResponse::Ok().json(matches),
        Err(e) => error_response(&e),
    }
}

/// Report a winner by match id and entrant id.
#[post("/api/matches/{match_id}/result")]
async fn api_report_result(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<ReportResultBody>,
) -> HttpResponse {
    let result = report_result(
        state.get_ref(),
        path.match_id,
        body.winner,
        body.reporter.as_deref(),
    );
    match result.and_then(|()| state.get_match(path.match_id).map_err(EngineError::from)) {
        Ok(Some(m)) => HttpResponse::Ok().json(m),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({ "error": "No match" })),
        Err(e) => error_response(&e),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env();
    log::info!(
        "Starting server at http://{}:{} (default format {})",
        config.host,
        config.port,
        config.default_format
    );

    let state = Data::new(MemoryStore::new());
    let config_data = Data::new(config.clone());

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(config_data.clone())
            .service(api_health)
            .service(api_list_events)
            .service(api_create_event)
            .service(api_get_event)
            .service(api_add_entrant)
            .service(api_remove_entrant)
            .service(api_import_entrants)
            .service(api_shuffle_seeds)
            .service(api_create_bracket)
            .service(api_get_bracket)
            .service(api_get_plan)
            .service(api_get_status)
            .service(api_open_matches)
            .service(api_advance)
            .service(api_report_by_code)
            .service(api_report_result)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
