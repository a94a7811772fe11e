use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use chrono::Local;
use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::berths::{Berth, BerthFilters, BerthStatus, BerthStore, Filter, Pier};
use crate::bookings::dates::today;
use crate::bookings::{
    BookingFilter, BookingLedger, BookingStatus, BookingStatusUpdate, BookingStorage, CreateBookingRequest,
};
use crate::error::ApiError;
use crate::overview::{booked_berth_ids, booking_stats, harbor_kpis, BookingStats, HarborKpis, StatsWindow};
use crate::realtime::{spawn_ticker, LiveFeed};
use crate::settings::Settings;

/// Shared state of the running service. Lock order: ledger, then berths.
pub struct AppState {
    pub berths: Mutex<BerthStore>,
    pub ledger: Mutex<BookingLedger>,
    pub live: Arc<Mutex<LiveFeed>>,
    pub storage: BookingStorage,
}

impl AppState {
    /// Restores bookings from storage and reconciles the berths against them
    pub fn load(storage: BookingStorage, nightly_rate: f64) -> Self {
        let bookings = storage.load();
        let berths = BerthStore::new(&bookings);

        AppState {
            berths: Mutex::new(berths),
            ledger: Mutex::new(BookingLedger::new(bookings, nightly_rate)),
            live: Arc::new(Mutex::new(LiveFeed::default())),
            storage,
        }
    }

    /// Berth store with statuses valid for today. Takes the ledger lock
    /// first and releases it before returning.
    fn berths_for_today(&self) -> MutexGuard<'_, BerthStore> {
        let ledger = self.ledger.lock();
        let mut store = self.berths.lock();
        store.refresh_for_day(ledger.bookings(), today());
        store
    }

    /// Applies a change to a copy of the ledger, persists it and only then
    /// swaps it in and re-runs reconciliation
    fn update_ledger<T, F>(&self, change: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut BookingLedger) -> Result<T, ApiError>,
    {
        let mut ledger = self.ledger.lock();
        let mut next = ledger.clone();
        let result = change(&mut next)?;

        self.storage.save(next.bookings())?;
        *ledger = next;

        self.berths.lock().update_berths_with_bookings(ledger.bookings());
        tracing::debug!(bookings = ledger.bookings().len(), "berths reconciled");
        Ok(result)
    }
}

/// Berth as shown on the dashboard
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BerthView {
    pub id: String,
    pub pier: Pier,
    pub lat: f64,
    pub lng: f64,
    pub status: BerthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub booking_status: BerthStatus,
    pub manual: bool,
}

impl From<&Berth> for BerthView {
    fn from(berth: &Berth) -> Self {
        BerthView {
            id: berth.id.clone(),
            pier: berth.pier,
            lat: berth.lat,
            lng: berth.lng,
            status: berth.effective_status(),
            end_date: berth.effective_end_date().map(str::to_string),
            booking_status: berth.status,
            manual: berth.manual_override.is_some(),
        }
    }
}

#[derive(Serialize)]
pub struct BerthListResponse {
    filters: BerthFilters,
    berths: Vec<BerthView>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiltersRequest {
    selected_pier: Option<Filter<Pier>>,
    search_query: Option<String>,
    status_filter: Option<Filter<BerthStatus>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BerthStatusRequest {
    status: BerthStatus,
    end_date: Option<String>,
}

#[derive(Deserialize)]
pub struct BulkStatusRequest {
    status: BerthStatus,
}

#[derive(Deserialize)]
pub struct BookingStatusRequest {
    status: BookingStatusUpdate,
}

/// Spot status in the dashboard's Danish vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotStatus {
    Ledig,
    Optaget,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotStatusRequest {
    status: SpotStatus,
    expected_return_at: Option<String>,
}

#[derive(Serialize)]
pub struct PierSummary {
    pier: Pier,
    berths: usize,
    available: usize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingQuery {
    status: Option<Filter<BookingStatus>>,
    spot_id: Option<Filter<String>>,
}

#[derive(Deserialize)]
pub struct StatsQuery {
    window: Option<StatsWindow>,
    berth: Option<Filter<String>>,
}

#[derive(Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    stats: BookingStats,
    berth_ids: Vec<String>,
}

#[derive(Serialize)]
pub struct KpiResponse {
    harbor: HarborKpis,
    simulated: LiveFeed,
}

fn success() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"success": true}))
}

fn berth_list(store: &BerthStore) -> BerthListResponse {
    BerthListResponse {
        filters: store.filters().clone(),
        berths: store.visible_berths().into_iter().map(BerthView::from).collect(),
    }
}

fn berth_not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("Berth not found: {}", id))
}

// Berths currently passing the dashboard filters
async fn list_berths(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let store = state.berths_for_today();
    Ok(HttpResponse::Ok().json(berth_list(&store)))
}

async fn get_berth(id: web::Path<String>, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let store = state.berths_for_today();
    let berth = store.berth_by_id(&id).ok_or_else(|| berth_not_found(&id))?;
    Ok(HttpResponse::Ok().json(BerthView::from(berth)))
}

async fn update_filters(
    req: web::Json<FiltersRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();
    let mut store = state.berths_for_today();

    if let Some(pier) = req.selected_pier {
        store.set_selected_pier(pier);
    }
    if let Some(query) = req.search_query {
        store.set_search_query(query);
    }
    if let Some(status) = req.status_filter {
        store.set_status_filter(status);
    }

    Ok(HttpResponse::Ok().json(berth_list(&store)))
}

async fn set_berth_status(
    id: web::Path<String>,
    req: web::Json<BerthStatusRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();
    let mut store = state.berths_for_today();
    if store.berth_by_id(&id).is_none() {
        return Err(berth_not_found(&id));
    }

    store.set_berth_status(&id, req.status, req.end_date);
    tracing::info!(berth = %id, status = %req.status, "manual berth status set");

    let berth = store.berth_by_id(&id).ok_or_else(|| berth_not_found(&id))?;
    Ok(HttpResponse::Ok().json(BerthView::from(berth)))
}

async fn clear_berth_override(id: web::Path<String>, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let mut store = state.berths_for_today();
    if store.berth_by_id(&id).is_none() {
        return Err(berth_not_found(&id));
    }

    store.clear_override(&id);
    let berth = store.berth_by_id(&id).ok_or_else(|| berth_not_found(&id))?;
    Ok(HttpResponse::Ok().json(BerthView::from(berth)))
}

async fn set_visible_status(
    req: web::Json<BulkStatusRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let mut store = state.berths_for_today();
    let updated = store.visible_berths().len();
    store.set_all_visible_status(req.status);
    tracing::info!(updated, status = %req.status, "bulk berth status set");

    Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "updated": updated})))
}

async fn set_pier_status(
    pier: web::Path<String>,
    req: web::Json<BulkStatusRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let pier: Pier = pier.parse().map_err(ApiError::Validation)?;
    state.berths_for_today().set_pier_status(pier, req.status);
    tracing::info!(pier = %pier, status = %req.status, "pier status set");
    Ok(success())
}

async fn reset_berths(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let mut store = state.berths_for_today();
    store.reset_berths();
    tracing::info!("berths reset to reference data");
    Ok(HttpResponse::Ok().json(berth_list(&store)))
}

async fn list_piers(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let store = state.berths_for_today();
    let on_map: Vec<&Berth> = store.state().berths.iter().filter(|b| b.is_on_map()).collect();

    let piers: Vec<PierSummary> = Pier::ALL
        .iter()
        .map(|&pier| {
            let berths: Vec<&&Berth> = on_map.iter().filter(|b| b.pier == pier).collect();
            PierSummary {
                pier,
                berths: berths.len(),
                available: berths
                    .iter()
                    .filter(|b| b.effective_status() == BerthStatus::Available)
                    .count(),
            }
        })
        .collect();

    Ok(HttpResponse::Ok().json(piers))
}

async fn get_kpis(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let harbor = {
        let ledger = state.ledger.lock();
        let mut store = state.berths.lock();
        store.refresh_for_day(ledger.bookings(), today());
        harbor_kpis(&store.visible_berths(), ledger.bookings(), Local::now())
    };
    let simulated = state.live.lock().clone();

    Ok(HttpResponse::Ok().json(KpiResponse { harbor, simulated }))
}

// ?status=reserved&spotId=42, either may be "all" or left out
async fn list_bookings(
    query: web::Query<BookingQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();
    let filter = BookingFilter {
        status: query.status.unwrap_or_default(),
        spot_id: query.spot_id.unwrap_or_default(),
    };

    let ledger = state.ledger.lock();
    Ok(HttpResponse::Ok().json(ledger.find(&filter)))
}

async fn list_berth_bookings(id: web::Path<String>, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let ledger = state.ledger.lock();
    if state.berths.lock().berth_by_id(&id).is_none() {
        return Err(berth_not_found(&id));
    }

    let filter = BookingFilter {
        spot_id: Filter::Only(id.into_inner()),
        ..BookingFilter::default()
    };
    Ok(HttpResponse::Ok().json(ledger.find(&filter)))
}

async fn get_stats(query: web::Query<StatsQuery>, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();
    let ledger = state.ledger.lock();

    let stats = booking_stats(
        ledger.bookings(),
        query.window.unwrap_or_default(),
        &query.berth.unwrap_or_default(),
        Local::now(),
    );
    Ok(HttpResponse::Ok().json(StatsResponse {
        stats,
        berth_ids: booked_berth_ids(ledger.bookings()),
    }))
}

// Create booking endpoint
async fn create_booking(
    req: web::Json<CreateBookingRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();

    let known_berth = state.berths.lock().berth_by_id(&req.spot_id).is_some();
    if !known_berth {
        return Err(ApiError::Validation(format!("Unknown berth: {}", req.spot_id)));
    }

    let booking = state.update_ledger(|ledger| Ok(ledger.create(req, Local::now())?))?;
    tracing::info!(
        booking = %booking.id,
        berth = %booking.spot_id,
        guest = %booking.guest_name,
        "booking created"
    );

    Ok(HttpResponse::Created().json(booking))
}

// Check-in, check-out and cancel
async fn update_booking_status(
    id: web::Path<String>,
    req: web::Json<BookingStatusRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let update = req.status;
    state.update_ledger(|ledger| {
        ledger.update_status(&id, update, Local::now())?;
        Ok(())
    })?;
    tracing::info!(booking = %id, status = ?update, "booking status updated");

    Ok(success())
}

// Spot status from the status modal: ledig frees the berth, optaget marks it occupied
async fn update_spot_status(
    spot_id: web::Path<String>,
    req: web::Json<SpotStatusRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();
    let mut store = state.berths_for_today();
    if store.berth_by_id(&spot_id).is_none() {
        return Err(ApiError::NotFound(format!("Spot not found: {}", spot_id)));
    }

    match req.status {
        SpotStatus::Ledig => {
            store.set_berth_status(&spot_id, BerthStatus::Available, req.expected_return_at)
        }
        SpotStatus::Optaget => store.set_berth_status(&spot_id, BerthStatus::Occupied, None),
    }
    tracing::info!(spot = %spot_id, status = ?req.status, "spot status updated");

    Ok(success())
}

/// Registers every admin API route
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::Validation(err.to_string()).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        ApiError::Validation(err.to_string()).into()
    }))
    .route("/api/admin/berths", web::get().to(list_berths))
    .route("/api/admin/berths/filters", web::put().to(update_filters))
    .route("/api/admin/berths/reset", web::post().to(reset_berths))
    .route("/api/admin/berths/visible/status", web::post().to(set_visible_status))
    .route("/api/admin/berths/{id}", web::get().to(get_berth))
    .route("/api/admin/berths/{id}/status", web::post().to(set_berth_status))
    .route("/api/admin/berths/{id}/override", web::delete().to(clear_berth_override))
    .route("/api/admin/berths/{id}/bookings", web::get().to(list_berth_bookings))
    .route("/api/admin/piers", web::get().to(list_piers))
    .route("/api/admin/piers/{pier}/status", web::post().to(set_pier_status))
    .route("/api/admin/kpis", web::get().to(get_kpis))
    .route("/api/admin/stats", web::get().to(get_stats))
    .route("/api/admin/bookings", web::get().to(list_bookings))
    .route("/api/admin/bookings", web::post().to(create_booking))
    .route("/api/admin/bookings/{id}", web::patch().to(update_booking_status))
    .route("/api/admin/spots/{spot_id}/status", web::post().to(update_spot_status));
}

pub async fn start_server(settings: Settings) -> std::io::Result<()> {
    let state = AppState::load(
        BookingStorage::new(&settings.storage.bookings_path),
        settings.pricing.nightly_rate,
    );

    let ticker = settings.realtime.enabled.then(|| {
        spawn_ticker(
            state.live.clone(),
            Duration::from_secs(settings.realtime.interval_secs.max(1)),
            settings.realtime.seed,
        )
    });

    let app_state = web::Data::new(state);
    let address = settings.api.listener_address();
    tracing::info!(address = %address, "starting harbor admin server");

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(routes)
    });
    if let Some(workers) = settings.api.num_workers {
        server = server.workers(workers);
    }

    let result = server.bind(address)?.run().await;

    if let Some(ticker) = ticker {
        ticker.abort();
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::Duration as ChronoDuration;
    use crate::bookings::{Booking, BookingStatus};

    fn state_in(dir: &tempfile::TempDir) -> web::Data<AppState> {
        let storage = BookingStorage::new(dir.path().join("bookings.json"));
        web::Data::new(AppState::load(storage, 350.0))
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(App::new().app_data($state.clone()).configure(routes)).await
        };
    }

    fn today_booking_body(spot: &str) -> serde_json::Value {
        let now = Local::now();
        serde_json::json!({
            "spotId": spot,
            "guestName": "Louise Hansen",
            "guestPhone": "+45 56789012",
            "startAt": (now - ChronoDuration::hours(2)).to_rfc3339(),
            "endAt": (now + ChronoDuration::days(2)).to_rfc3339(),
        })
    }

    #[actix_web::test]
    async fn created_booking_marks_berth_booked() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(&dir);
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/admin/bookings")
            .set_json(today_booking_body("33"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let booking: Booking = test::read_body_json(resp).await;
        assert_eq!(booking.status, BookingStatus::Reserved);

        let req = test::TestRequest::get().uri("/api/admin/berths/33").to_request();
        let berth: BerthView = test::call_and_read_body_json(&app, req).await;
        assert_eq!(berth.status, BerthStatus::Booked);
        assert_eq!(berth.end_date.as_deref(), Some(booking.end_at.as_str()));

        // Persisted for the next start
        let saved = BookingStorage::new(dir.path().join("bookings.json")).load();
        assert!(saved.iter().any(|b| b.id == booking.id));
    }

    #[actix_web::test]
    async fn overlapping_booking_is_a_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(&dir);
        let app = app!(state);

        for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
            let req = test::TestRequest::post()
                .uri("/api/admin/bookings")
                .set_json(today_booking_body("50"))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), expected);
        }
        assert_eq!(state.ledger.lock().bookings().len(), 6);
    }

    #[actix_web::test]
    async fn malformed_booking_body_is_a_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(&dir);
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/admin/bookings")
            .set_json(serde_json::json!({"spotId": "12"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn booking_for_unknown_berth_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(&dir);
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/admin/bookings")
            .set_json(today_booking_body("500"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn cancelling_frees_the_berth() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(&dir);
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/admin/bookings")
            .set_json(today_booking_body("60"))
            .to_request();
        let booking: Booking = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::patch()
            .uri(&format!("/api/admin/bookings/{}", booking.id))
            .set_json(serde_json::json!({"status": "cancelled"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let berth_status = state.berths.lock().berth_by_id("60").map(|b| b.effective_status());
        assert_eq!(berth_status, Some(BerthStatus::Available));
        let cancelled = state.ledger.lock().get(&booking.id).map(|b| b.status);
        assert_eq!(cancelled, Some(BookingStatus::Cancelled));
    }

    #[actix_web::test]
    async fn patching_unknown_booking_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(&dir);
        let app = app!(state);

        let req = test::TestRequest::patch()
            .uri("/api/admin/bookings/booking-404")
            .set_json(serde_json::json!({"status": "checked_in"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::patch()
            .uri("/api/admin/bookings/booking-1")
            .set_json(serde_json::json!({"status": "booked"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn spot_status_sets_manual_override() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(&dir);
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/admin/spots/7/status")
            .set_json(serde_json::json!({"status": "optaget"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/api/admin/spots/8/status")
            .set_json(serde_json::json!({"status": "ledig", "expectedReturnAt": "2025-10-20T18:00:00Z"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/api/admin/berths/7").to_request();
        let seven: BerthView = test::call_and_read_body_json(&app, req).await;
        assert_eq!(seven.status, BerthStatus::Occupied);
        assert!(seven.manual);

        let req = test::TestRequest::get().uri("/api/admin/berths/8").to_request();
        let eight: BerthView = test::call_and_read_body_json(&app, req).await;
        assert_eq!(eight.status, BerthStatus::Available);
        assert_eq!(eight.end_date.as_deref(), Some("2025-10-20T18:00:00Z"));

        let req = test::TestRequest::post()
            .uri("/api/admin/spots/NOPE/status")
            .set_json(serde_json::json!({"status": "ledig"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::delete().uri("/api/admin/berths/7/override").to_request();
        let seven: BerthView = test::call_and_read_body_json(&app, req).await;
        assert!(!seven.manual);
    }

    #[actix_web::test]
    async fn filters_drive_the_berth_list_and_bulk_updates() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(&dir);
        let app = app!(state);

        let req = test::TestRequest::put()
            .uri("/api/admin/berths/filters")
            .set_json(serde_json::json!({"selectedPier": "Bro 4"}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["berths"].as_array().map(Vec::len), Some(16));
        assert_eq!(body["filters"]["selectedPier"], "Bro 4");

        let req = test::TestRequest::post()
            .uri("/api/admin/berths/visible/status")
            .set_json(serde_json::json!({"status": "occupied"}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["updated"], 16);

        let store = state.berths.lock();
        assert_eq!(store.berth_by_id("82").map(|b| b.effective_status()), Some(BerthStatus::Occupied));
        assert_eq!(store.berth_by_id("81").map(|b| b.effective_status()), Some(BerthStatus::Available));
    }

    #[actix_web::test]
    async fn pier_status_rejects_unknown_piers() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(&dir);
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/admin/piers/Bro%2099/status")
            .set_json(serde_json::json!({"status": "occupied"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/admin/piers/Bro%209/status")
            .set_json(serde_json::json!({"status": "occupied"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/api/admin/piers").to_request();
        let piers: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(piers[3]["pier"], "Bro 9");
        assert_eq!(piers[3]["berths"], 16);
        assert_eq!(piers[3]["available"], 0);
    }

    #[actix_web::test]
    async fn kpis_report_harbor_and_simulated_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(&dir);
        let app = app!(state);

        let req = test::TestRequest::get().uri("/api/admin/kpis").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["harbor"]["available_spots"], 125);
        assert_eq!(body["simulated"]["kpis"]["revenue_today"], 2500.0);
    }

    #[actix_web::test]
    async fn failed_save_leaves_ledger_and_berths_untouched() {
        let dir = tempfile::tempdir().unwrap();
        // A plain file where the storage directory should be
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();
        let storage = BookingStorage::new(blocker.join("bookings.json"));
        let state = web::Data::new(AppState::load(storage, 350.0));
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/admin/bookings")
            .set_json(today_booking_body("33"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Internal server error");

        assert_eq!(state.ledger.lock().bookings().len(), 5);
        let berth_status = state.berths.lock().berth_by_id("33").map(|b| b.effective_status());
        assert_eq!(berth_status, Some(BerthStatus::Available));
    }

    #[actix_web::test]
    async fn bookings_can_be_filtered_by_status_and_berth() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(&dir);
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/admin/bookings")
            .set_json(today_booking_body("42"))
            .to_request();
        let created: Booking = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::get().uri("/api/admin/bookings").to_request();
        let all: Vec<Booking> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(all.len(), 6);

        let req = test::TestRequest::get()
            .uri("/api/admin/bookings?status=reserved")
            .to_request();
        let reserved: Vec<Booking> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(reserved.len(), 1);
        assert_eq!(reserved[0].id, created.id);

        let req = test::TestRequest::get()
            .uri("/api/admin/bookings?status=all&spotId=42")
            .to_request();
        let on_42: Vec<Booking> = test::call_and_read_body_json(&app, req).await;
        let ids: Vec<&str> = on_42.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["booking-4", created.id.as_str()]);

        let req = test::TestRequest::get().uri("/api/admin/berths/42/bookings").to_request();
        let berth_bookings: Vec<Booking> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(berth_bookings, on_42);

        let req = test::TestRequest::get().uri("/api/admin/berths/GONE/bookings").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get()
            .uri("/api/admin/bookings?status=sunk")
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn stats_cover_the_requested_window_and_berth() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(&dir);
        let app = app!(state);

        let mut revenue = 0.0;
        for spot in ["50", "51"] {
            let req = test::TestRequest::post()
                .uri("/api/admin/bookings")
                .set_json(today_booking_body(spot))
                .to_request();
            let booking: Booking = test::call_and_read_body_json(&app, req).await;
            revenue += booking.amount;
        }

        // Reference bookings were all created in 2025
        let req = test::TestRequest::get().uri("/api/admin/stats?window=day").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["window"], "day");
        assert_eq!(body["total_bookings"], 2);
        assert_eq!(body["total_revenue"], revenue);
        assert_eq!(body["average_revenue"], revenue / 2.0);
        assert_eq!(body["berths"].as_array().map(Vec::len), Some(2));
        assert_eq!(
            body["berth_ids"],
            serde_json::json!(["12", "18", "25", "42", "50", "51", "67"])
        );

        let req = test::TestRequest::get()
            .uri("/api/admin/stats?window=year&berth=51")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total_bookings"], 1);

        let req = test::TestRequest::get().uri("/api/admin/stats?window=week").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }
}
