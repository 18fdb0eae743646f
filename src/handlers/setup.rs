use askama::Template;
use axum::{
    Form,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::info;

use crate::service::intake::SetupForm;
use crate::{ReceiptError, router::ReceiptState};

#[derive(Template)]
#[template(path = "setup.html")]
struct SetupPage {}

/// GET /setup -> one-time profile form, or back to the index once configured.
pub async fn setup_form(State(state): State<ReceiptState>) -> Result<Response, ReceiptError> {
    if state.profile.is_configured().await {
        return Ok(Redirect::to("/").into_response());
    }
    Ok(Html(SetupPage {}.render()?).into_response())
}

/// POST /setup -> persist the profile; rejected once one exists.
pub async fn submit_setup(
    State(state): State<ReceiptState>,
    Form(form): Form<SetupForm>,
) -> Result<Redirect, ReceiptError> {
    if state.profile.is_configured().await {
        return Err(ReceiptError::AlreadyConfigured);
    }
    let profile = form.into_profile()?;
    let org_name = profile.org_name.clone();
    state.profile.setup(profile).await?;
    info!(org = %org_name, "organization setup complete");
    Ok(Redirect::to("/"))
}
