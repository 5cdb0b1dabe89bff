use std::sync::Arc;

use axum::{
    extract::{FromRequest, Json, Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::AppError;
use crate::login::LoginDetails;
use crate::ride::OfferForm;
use crate::session::{Session, View};
use crate::views::{ChatView, ConversationSummary, Participant, ProfileView, RideCard, RideList};

// -----------------------------------------------------------------------------
// Request / response bodies
// -----------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct SessionResponse {
    user: Option<Participant>,
    view: View,
}

/// JSON body whose parse failures render like any other validation error.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
struct Form<T>(T);

#[derive(Debug, Deserialize)]
struct ViewRequest {
    view: View,
}

#[derive(Debug, Deserialize)]
struct SendMessageRequest {
    text: String,
}

// -----------------------------------------------------------------------------
// Server state
// -----------------------------------------------------------------------------

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/login", post(login))
        .route("/session", get(current_session))
        .route("/view", put(set_view))
        .route("/rides", get(ride_board).post(offer_ride))
        .route("/rides/mine", get(my_rides))
        .route("/rides/:id/chat", post(start_chat))
        .route("/conversations", get(conversations))
        .route("/conversations/:id/open", post(open_conversation))
        .route("/chat/messages", post(send_message))
        .route("/chat", get(active_chat).delete(close_chat))
        .route("/profile", get(profile))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn session_response(session: &Session) -> SessionResponse {
    SessionResponse {
        user: session.current_user().ok().map(Participant::from),
        view: session.view(),
    }
}

// -----------------------------------------------------------------------------
// Handlers
// -----------------------------------------------------------------------------

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn login(
    State(state): State<AppState>,
    Form(details): Form<LoginDetails>,
) -> Result<Json<SessionResponse>, AppError> {
    details.require_fields()?;
    let mut session = state.session.lock().await;
    session.login(details)?;
    Ok(Json(session_response(&session)))
}

async fn current_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let session = state.session.lock().await;
    Json(session_response(&session))
}

async fn set_view(
    State(state): State<AppState>,
    Form(request): Form<ViewRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let mut session = state.session.lock().await;
    session.set_view(request.view)?;
    Ok(Json(session_response(&session)))
}

async fn ride_board(State(state): State<AppState>) -> Result<Json<RideList>, AppError> {
    let session = state.session.lock().await;
    session.current_user()?;
    Ok(Json(RideList::new("Available Rides", session.rides().all())))
}

async fn my_rides(State(state): State<AppState>) -> Result<Json<RideList>, AppError> {
    let session = state.session.lock().await;
    let list = RideList::new("My Rides", session.my_rides()?);
    Ok(Json(list))
}

async fn offer_ride(
    State(state): State<AppState>,
    Form(form): Form<OfferForm>,
) -> Result<(StatusCode, Json<RideCard>), AppError> {
    let mut session = state.session.lock().await;
    session.current_user()?;
    let details = form.into_details()?;
    let ride = session.offer_ride(details)?;
    Ok((StatusCode::CREATED, Json(RideCard::from_ride(&ride))))
}

async fn start_chat(
    State(state): State<AppState>,
    Path(ride_id): Path<String>,
) -> Result<Json<ChatView>, AppError> {
    let mut session = state.session.lock().await;
    let conversation = session.start_chat(&ride_id)?;
    let viewer = session.current_user()?;
    Ok(Json(ChatView::new(&conversation, &viewer.id)))
}

async fn conversations(
    State(state): State<AppState>,
) -> Result<Json<Vec<ConversationSummary>>, AppError> {
    let session = state.session.lock().await;
    let viewer = session.current_user()?;
    let summaries = session
        .my_conversations()?
        .map(|c| ConversationSummary::new(c, &viewer.id))
        .collect();
    Ok(Json(summaries))
}

async fn open_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Result<Json<ChatView>, AppError> {
    let mut session = state.session.lock().await;
    let conversation = session.open_conversation(&conversation_id)?;
    let viewer = session.current_user()?;
    Ok(Json(ChatView::new(&conversation, &viewer.id)))
}

async fn send_message(
    State(state): State<AppState>,
    Form(request): Form<SendMessageRequest>,
) -> Result<Json<ChatView>, AppError> {
    let mut session = state.session.lock().await;
    let conversation = session.send_message(&request.text)?;
    let viewer = session.current_user()?;
    Ok(Json(ChatView::new(&conversation, &viewer.id)))
}

async fn active_chat(State(state): State<AppState>) -> Result<Json<ChatView>, AppError> {
    let session = state.session.lock().await;
    let viewer = session.current_user()?;
    let conversation = session
        .active_conversation()
        .ok_or(AppError::NoActiveConversation)?;
    Ok(Json(ChatView::new(conversation, &viewer.id)))
}

async fn close_chat(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    let mut session = state.session.lock().await;
    session.current_user()?;
    session.close_chat();
    info!("Chat closed");
    Ok(StatusCode::NO_CONTENT)
}

async fn profile(State(state): State<AppState>) -> Result<Json<ProfileView>, AppError> {
    let session = state.session.lock().await;
    Ok(Json(ProfileView::from(session.current_user()?)))
}
