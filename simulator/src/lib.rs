//! Local HTTP backend for the provably-fair dice game.
//!
//! Each core operation maps to one request/response pair with JSON
//! payloads. The raw server seed is withheld from every response until it
//! is revealed by seed rotation. Bets on one session are serialized behind
//! a per-session lock so the nonce advances by exactly one per round and no
//! partial update is ever observable.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use axum::{
    extract::{Path, State as AxumState},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

use fairdie_engine::{InvalidBet, SeedError, Session, VerifyError};
use fairdie_types::api::{
    BetRequest, BetResponse, ClientSeedRequest, ErrorResponse, NewSessionRequest, ResetRequest,
    RotateResponse, RoundView, SessionView, VerifyRequest, VerifyResponse,
};
use fairdie_types::INITIAL_BALANCE;

/// Error surfaced by simulator operations.
#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("session not found: {0}")]
    SessionNotFound(Uuid),
    #[error(transparent)]
    InvalidBet(#[from] InvalidBet),
    #[error(transparent)]
    Seed(#[from] SeedError),
    #[error(transparent)]
    Verify(#[from] VerifyError),
    #[error("client seed must not be empty")]
    EmptyClientSeed,
    #[error("session lock poisoned")]
    LockPoisoned,
}

impl IntoResponse for SimulatorError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::SessionNotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidBet(_) | Self::Verify(_) | Self::EmptyClientSeed => {
                StatusCode::BAD_REQUEST
            }
            Self::Seed(_) | Self::LockPoisoned => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

/// In-memory session store. One mutex per session serializes bets; the
/// outer map lock is only held long enough to look a session up.
pub struct Simulator {
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<Session>>>>,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulator {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    fn lookup(&self, id: &Uuid) -> Result<Arc<Mutex<Session>>, SimulatorError> {
        let sessions = self.sessions.read().map_err(|e| {
            tracing::error!("Failed to acquire read lock on session map: {}", e);
            SimulatorError::LockPoisoned
        })?;
        sessions
            .get(id)
            .cloned()
            .ok_or(SimulatorError::SessionNotFound(*id))
    }

    fn view(id: Uuid, session: &Session) -> SessionView {
        let active_seed = session.server_seed();
        SessionView {
            id,
            server_seed_hash: session.commitment().to_string(),
            client_seed: session.client_seed().to_string(),
            nonce: session.nonce(),
            balance: session.balance(),
            bet_amount: session.bet_amount(),
            previous_rolls: session
                .history()
                .iter()
                .map(|round| RoundView::redacting(round, active_seed))
                .collect(),
            last_hash: session.last_hash().to_string(),
        }
    }

    pub fn create_session(
        &self,
        initial_balance: Option<u64>,
    ) -> Result<SessionView, SimulatorError> {
        let session = Session::new(initial_balance.unwrap_or(INITIAL_BALANCE))?;
        let id = Uuid::new_v4();
        let view = Self::view(id, &session);

        let mut sessions = self.sessions.write().map_err(|e| {
            tracing::error!("Failed to acquire write lock on session map: {}", e);
            SimulatorError::LockPoisoned
        })?;
        sessions.insert(id, Arc::new(Mutex::new(session)));
        tracing::info!(%id, "session created");
        Ok(view)
    }

    pub fn session_view(&self, id: Uuid) -> Result<SessionView, SimulatorError> {
        let session = self.lookup(&id)?;
        let session = session.lock().map_err(|_| SimulatorError::LockPoisoned)?;
        Ok(Self::view(id, &session))
    }

    pub fn place_bet(&self, id: Uuid, amount: u64) -> Result<BetResponse, SimulatorError> {
        let session = self.lookup(&id)?;
        let mut session = session.lock().map_err(|_| SimulatorError::LockPoisoned)?;
        let round = session.place_bet(amount)?;
        Ok(BetResponse {
            round: RoundView::redacting(&round, session.server_seed()),
            balance: session.balance(),
            nonce: session.nonce(),
        })
    }

    pub fn change_client_seed(
        &self,
        id: Uuid,
        seed: String,
    ) -> Result<SessionView, SimulatorError> {
        if seed.is_empty() {
            return Err(SimulatorError::EmptyClientSeed);
        }
        let session = self.lookup(&id)?;
        let mut session = session.lock().map_err(|_| SimulatorError::LockPoisoned)?;
        session.change_client_seed(seed);
        Ok(Self::view(id, &session))
    }

    pub fn rotate_seeds(&self, id: Uuid) -> Result<RotateResponse, SimulatorError> {
        let session = self.lookup(&id)?;
        let mut session = session.lock().map_err(|_| SimulatorError::LockPoisoned)?;
        let revealed_server_seed = session.rotate_seeds()?;
        Ok(RotateResponse {
            revealed_server_seed,
            session: Self::view(id, &session),
        })
    }

    pub fn reset_balance(
        &self,
        id: Uuid,
        amount: Option<u64>,
    ) -> Result<SessionView, SimulatorError> {
        let session = self.lookup(&id)?;
        let mut session = session.lock().map_err(|_| SimulatorError::LockPoisoned)?;
        let stake = amount.unwrap_or(session.initial_balance());
        session.reset_balance(stake);
        Ok(Self::view(id, &session))
    }

    pub fn verify(&self, request: VerifyRequest) -> Result<VerifyResponse, SimulatorError> {
        let report = fairdie_engine::verify(&request.round, request.commitment.as_deref())?;
        Ok(VerifyResponse { report })
    }
}

pub struct Api {
    simulator: Arc<Simulator>,
}

impl Api {
    pub fn new(simulator: Arc<Simulator>) -> Self {
        Self { simulator }
    }

    pub fn router(&self) -> Router {
        // Configure CORS
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]);

        Router::new()
            .route("/session", post(create_session))
            .route("/session/:id", get(get_session))
            .route("/session/:id/bet", post(place_bet))
            .route("/session/:id/client-seed", post(change_client_seed))
            .route("/session/:id/rotate", post(rotate_seeds))
            .route("/session/:id/reset", post(reset_balance))
            .route("/verify", post(verify_round))
            .layer(cors)
            .with_state(self.simulator.clone())
    }
}

async fn create_session(
    AxumState(simulator): AxumState<Arc<Simulator>>,
    Json(request): Json<NewSessionRequest>,
) -> Result<Json<SessionView>, SimulatorError> {
    Ok(Json(simulator.create_session(request.initial_balance)?))
}

async fn get_session(
    AxumState(simulator): AxumState<Arc<Simulator>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, SimulatorError> {
    Ok(Json(simulator.session_view(id)?))
}

async fn place_bet(
    AxumState(simulator): AxumState<Arc<Simulator>>,
    Path(id): Path<Uuid>,
    Json(request): Json<BetRequest>,
) -> Result<Json<BetResponse>, SimulatorError> {
    Ok(Json(simulator.place_bet(id, request.amount)?))
}

async fn change_client_seed(
    AxumState(simulator): AxumState<Arc<Simulator>>,
    Path(id): Path<Uuid>,
    Json(request): Json<ClientSeedRequest>,
) -> Result<Json<SessionView>, SimulatorError> {
    Ok(Json(simulator.change_client_seed(id, request.seed)?))
}

async fn rotate_seeds(
    AxumState(simulator): AxumState<Arc<Simulator>>,
    Path(id): Path<Uuid>,
) -> Result<Json<RotateResponse>, SimulatorError> {
    Ok(Json(simulator.rotate_seeds(id)?))
}

async fn reset_balance(
    AxumState(simulator): AxumState<Arc<Simulator>>,
    Path(id): Path<Uuid>,
    Json(request): Json<ResetRequest>,
) -> Result<Json<SessionView>, SimulatorError> {
    Ok(Json(simulator.reset_balance(id, request.amount)?))
}

async fn verify_round(
    AxumState(simulator): AxumState<Arc<Simulator>>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, SimulatorError> {
    Ok(Json(simulator.verify(request)?))
}
