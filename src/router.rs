use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::db::ReceiptStorage;
use crate::handlers::receipts::{create_receipt, download_pdf, index, preview};
use crate::handlers::setup::{setup_form, submit_setup};
use crate::service::org_profile::OrgProfileStore;

/// Shared handler state: the record store and the organization profile.
#[derive(Clone)]
pub struct ReceiptState {
    pub storage: ReceiptStorage,
    pub profile: OrgProfileStore,
}

impl ReceiptState {
    pub fn new(storage: ReceiptStorage, profile: OrgProfileStore) -> Self {
        Self { storage, profile }
    }
}

pub fn receipt_router(state: ReceiptState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/create", post(create_receipt))
        .route("/receipt/{id}", get(preview))
        .route("/receipt/{id}/pdf", get(download_pdf))
        .route("/setup", get(setup_form).post(submit_setup))
        .route("/healthz", get(|| async { "ok" }))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
