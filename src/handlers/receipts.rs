use askama::Template;
use axum::{
    Form,
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::info;

use crate::db::models::{DEFAULT_ITEM_DESC, OrgDetails, Receipt};
use crate::pdf::{self, FOOTER_TEXT, format_amount};
use crate::service::intake::ReceiptForm;
use crate::{ReceiptError, router::ReceiptState};

/// Number of receipts listed on the index page.
pub const RECENT_LIMIT: u32 = 10;

#[derive(Template)]
#[template(path = "index.html")]
struct IndexPage {
    profile: Option<OrgDetails>,
    receipts: Vec<Receipt>,
    default_item_desc: &'static str,
}

#[derive(Template)]
#[template(path = "receipt.html")]
struct ReceiptPage {
    rows: [(&'static str, String); 8],
    amount: String,
    paid_amount: String,
    footer: &'static str,
    r: Receipt,
}

/// GET / -> entry form plus the most recent receipts.
pub async fn index(State(state): State<ReceiptState>) -> Result<Html<String>, ReceiptError> {
    let page = IndexPage {
        profile: state.profile.get().await,
        receipts: state.storage.list_recent(RECENT_LIMIT).await?,
        default_item_desc: DEFAULT_ITEM_DESC,
    };
    Ok(Html(page.render()?))
}

/// POST /create -> validate, store, then redirect to the preview.
pub async fn create_receipt(
    State(state): State<ReceiptState>,
    Form(form): Form<ReceiptForm>,
) -> Result<Redirect, ReceiptError> {
    let profile = state.profile.get().await;
    let new = form.into_new_receipt(profile)?;
    let id = state.storage.create(new).await?;
    info!(receipt_id = id, "receipt saved");
    Ok(Redirect::to(&format!("/receipt/{id}")))
}

async fn load(state: &ReceiptState, id: i64) -> Result<Receipt, ReceiptError> {
    state
        .storage
        .get_by_id(id)
        .await?
        .ok_or(ReceiptError::NotFound(id))
}

/// GET /receipt/{id} -> HTML preview.
pub async fn preview(
    State(state): State<ReceiptState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, ReceiptError> {
    let receipt = load(&state, id).await?;
    let page = ReceiptPage {
        rows: receipt.info_rows(),
        amount: format_amount(receipt.amount),
        paid_amount: format_amount(receipt.paid_amount),
        footer: FOOTER_TEXT,
        r: receipt,
    };
    Ok(Html(page.render()?))
}

/// GET /receipt/{id}/pdf -> PDF attachment.
pub async fn download_pdf(
    State(state): State<ReceiptState>,
    Path(id): Path<i64>,
) -> Result<Response, ReceiptError> {
    let receipt = load(&state, id).await?;
    let bytes = pdf::render(&receipt)?;
    info!(receipt_id = id, size = bytes.len(), "rendered receipt pdf");

    let disposition = format!("attachment; filename=\"receipt_{id}.pdf\"");
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
