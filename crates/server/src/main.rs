// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Gift Fund Coordinator server.
//!
//! Hosts the HTTP boundary for the channel gateway (`POST /events`), the
//! WebSocket delivery stream (`GET /live`), the collector's CSV report, and
//! the wall-clock scheduler for notification and purge runs. Process-wide
//! handles live in one explicit [`AppState`] built at startup and attached
//! to every request — no ambient singletons.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod live;
mod scheduler;

use axum::{
    Json, Router,
    extract::{Query, State as AxumState},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveTime;
use chrono_tz::Tz;
use clap::Parser;
use gift_fund_api::{
    InboundEvent, OutboundMessage, Secrets, SessionStore, dispatch, require_active_collector,
    resolve_context, transfers_report_csv,
};
use gift_fund_persistence::Persistence;
use serde::Deserialize;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::limit::GlobalConcurrencyLimitLayer;
use tracing::{error, info};

use live::{OutboundBroadcaster, live_handler};
use scheduler::Schedule;

/// Gift Fund Coordinator - backend for community birthday coordination
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Identity key of the bootstrap service user
    #[arg(long)]
    service_user_id: i64,

    /// Secret phrase redeemable for the admin role
    #[arg(long)]
    admin_phrase: String,

    /// Secret phrase redeemable for the service-user role
    #[arg(long)]
    service_phrase: String,

    /// Timezone the schedule times are declared in
    #[arg(long, default_value = "Europe/Moscow")]
    timezone: String,

    /// Local wall-clock time of the daily notification runs (HH:MM)
    #[arg(long, default_value = "11:07")]
    notify_time: String,

    /// Local wall-clock time of the nightly purge run (HH:MM)
    #[arg(long, default_value = "00:00")]
    purge_time: String,
}

/// Application state shared across handlers.
///
/// The persistence layer and session store are wrapped in async mutexes so
/// concurrent requests serialize at the entity-store boundary.
#[derive(Clone)]
pub struct AppState {
    /// The persistence layer.
    pub persistence: Arc<Mutex<Persistence>>,
    /// The ephemeral per-identity workflow sessions.
    pub sessions: Arc<Mutex<SessionStore>>,
    /// Secret phrases for role redemption.
    pub secrets: Arc<Secrets>,
    /// The outbound delivery stream.
    pub broadcaster: Arc<OutboundBroadcaster>,
}

impl axum::extract::FromRef<AppState> for Arc<OutboundBroadcaster> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.broadcaster)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Args = Args::parse();

    let Ok(timezone) = args.timezone.parse::<Tz>() else {
        error!(timezone = %args.timezone, "Unknown timezone");
        return ExitCode::FAILURE;
    };
    let Ok(notify_time) = NaiveTime::parse_from_str(&args.notify_time, "%H:%M") else {
        error!(notify_time = %args.notify_time, "Invalid notification time, expected HH:MM");
        return ExitCode::FAILURE;
    };
    let Ok(purge_time) = NaiveTime::parse_from_str(&args.purge_time, "%H:%M") else {
        error!(purge_time = %args.purge_time, "Invalid purge time, expected HH:MM");
        return ExitCode::FAILURE;
    };

    let persistence_result = args.database.as_ref().map_or_else(
        Persistence::new_in_memory,
        Persistence::new_with_file,
    );
    let mut persistence: Persistence = match persistence_result {
        Ok(persistence) => persistence,
        Err(err) => {
            error!(%err, "Failed to initialize the database");
            return ExitCode::FAILURE;
        }
    };

    // Designate the bootstrap support contact unless one is already set.
    if let Err(err) = persistence.seed_service_user(args.service_user_id) {
        error!(%err, "Failed to seed the service user");
        return ExitCode::FAILURE;
    }

    let state = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        sessions: Arc::new(Mutex::new(SessionStore::new())),
        secrets: Arc::new(Secrets {
            admin_phrase: args.admin_phrase,
            service_phrase: args.service_phrase,
        }),
        broadcaster: Arc::new(OutboundBroadcaster::new()),
    };

    let schedule = Schedule {
        timezone,
        notify_time,
        purge_time,
    };
    tokio::spawn(scheduler::run(
        state.clone(),
        Arc::clone(&state.broadcaster),
        schedule,
    ));

    let app: Router = Router::new()
        .route("/events", post(events_handler))
        .route("/live", get(live_handler))
        .route("/reports/transfers.csv", get(transfers_csv_handler))
        .route("/health", get(health_handler))
        .layer(GlobalConcurrencyLimitLayer::new(256))
        .with_state(state);

    let addr: String = format!("0.0.0.0:{}", args.port);
    info!(%addr, "Starting server");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(%err, %addr, "Failed to bind");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = axum::serve(listener, app).await {
        error!(%err, "Server error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Handles one inbound gateway event.
///
/// All outbound messages are returned in the response body; messages
/// addressed to identities other than the event's sender are additionally
/// pushed on the delivery stream so the gateway can deliver them without
/// correlating the response.
async fn events_handler(
    AxumState(state): AxumState<AppState>,
    Json(event): Json<InboundEvent>,
) -> Json<Vec<OutboundMessage>> {
    let messages: Vec<OutboundMessage> = {
        let mut persistence = state.persistence.lock().await;
        let mut sessions = state.sessions.lock().await;
        dispatch(
            &mut persistence,
            &mut sessions,
            &state.secrets,
            &event,
            time::OffsetDateTime::now_utc(),
        )
    };

    for message in &messages {
        if message.recipient != event.identity {
            state.broadcaster.deliver(message);
        }
    }

    Json(messages)
}

/// Query parameters for the CSV report.
#[derive(Debug, Deserialize)]
struct ReportQuery {
    /// The requesting identity; must be the active collector.
    identity: i64,
}

/// Serves the transfer ledger as CSV to the active collector.
async fn transfers_csv_handler(
    AxumState(state): AxumState<AppState>,
    Query(query): Query<ReportQuery>,
) -> Response {
    let mut persistence = state.persistence.lock().await;

    let ctx = match resolve_context(&mut persistence, query.identity) {
        Ok(ctx) => ctx,
        Err(err) => {
            error!(identity = query.identity, %err, "Context resolution failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "server error").into_response();
        }
    };

    if require_active_collector(&ctx).is_err() {
        return (
            StatusCode::FORBIDDEN,
            "the transfer report is available to the active collector only",
        )
            .into_response();
    }

    match transfers_report_csv(&mut persistence) {
        Ok(csv) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
            csv,
        )
            .into_response(),
        Err(err) => {
            error!(%err, "Failed to build the CSV report");
            (StatusCode::INTERNAL_SERVER_ERROR, "server error").into_response()
        }
    }
}

/// Liveness probe.
async fn health_handler() -> &'static str {
    "OK"
}
