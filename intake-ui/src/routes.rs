//! HTTP route handlers for the form API.

use std::collections::BTreeSet;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post, put};
use intake::context::IntakeError;
use intake::core::answers::AnswerRecord;
use intake::core::fields::{FieldId, FieldPatch};
use intake::core::types::Step;
use intake::core::wizard::WizardController;
use intake::io::submitter::Submission;
use intake::session::Session;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::state::AppState;

/// Build the API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/config", get(get_config))
        .route("/session", get(get_session))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/wizard", get(get_wizard))
        .route("/wizard/advance", post(advance))
        .route("/wizard/retreat", post(retreat))
        .route("/wizard/jump", post(jump))
        .route("/wizard/field", put(set_field))
        .route("/wizard/active/{step}", get(get_active))
        .route("/wizard/submit", post(submit))
}

async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Serialize)]
struct ConfigResponse {
    client_id: String,
}

/// GET /api/config - values the browser needs to start the login flow.
async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        client_id: state.client_id.clone(),
    })
}

/// GET /api/session - current authentication state (token never included).
async fn get_session(State(state): State<AppState>) -> Json<Session> {
    Json(state.ctx.session())
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    credential: Option<String>,
}

/// POST /api/login - identity provider callback forwarding the credential.
async fn login(State(state): State<AppState>, Json(body): Json<LoginRequest>) -> Json<Session> {
    let session = state
        .ctx
        .login_with_credential(body.credential.as_deref())
        .await;
    Json(session)
}

/// POST /api/logout - forget the session and its persisted token.
async fn logout(State(state): State<AppState>) -> Result<Json<Session>, StatusCode> {
    state.ctx.logout().map(Json).map_err(|err| {
        warn!(error = %format!("{err:#}"), "logout failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

#[derive(Debug, Serialize)]
struct WizardView {
    current_step: Step,
    answers: AnswerRecord,
    active: BTreeSet<FieldId>,
}

impl WizardView {
    fn of(wizard: &WizardController) -> Self {
        let current_step = wizard.current_step();
        Self {
            current_step,
            answers: wizard.answers().clone(),
            active: wizard.active_fields(current_step),
        }
    }
}

/// GET /api/wizard - current step, answers and fields shown on that step.
async fn get_wizard(State(state): State<AppState>) -> Result<Json<WizardView>, StatusCode> {
    state
        .ctx
        .with_wizard(|wizard| WizardView::of(wizard))
        .map(Json)
        .map_err(status_for)
}

/// POST /api/wizard/advance - next step (stays on the last one).
async fn advance(State(state): State<AppState>) -> Result<Json<WizardView>, StatusCode> {
    state
        .ctx
        .with_wizard(|wizard| {
            wizard.advance();
            WizardView::of(wizard)
        })
        .map(Json)
        .map_err(status_for)
}

/// POST /api/wizard/retreat - previous step (stays on the first one).
async fn retreat(State(state): State<AppState>) -> Result<Json<WizardView>, StatusCode> {
    state
        .ctx
        .with_wizard(|wizard| {
            wizard.retreat();
            WizardView::of(wizard)
        })
        .map(Json)
        .map_err(status_for)
}

#[derive(Debug, Deserialize)]
struct JumpRequest {
    step: Step,
}

#[derive(Debug, Serialize)]
struct JumpResponse {
    accepted: bool,
    wizard: WizardView,
}

/// POST /api/wizard/jump - revisit the current or an earlier step.
async fn jump(
    State(state): State<AppState>,
    Json(body): Json<JumpRequest>,
) -> Result<Json<JumpResponse>, StatusCode> {
    state
        .ctx
        .with_wizard(|wizard| JumpResponse {
            accepted: wizard.jump_to(body.step),
            wizard: WizardView::of(wizard),
        })
        .map(Json)
        .map_err(status_for)
}

/// PUT /api/wizard/field - apply one typed field patch.
async fn set_field(
    State(state): State<AppState>,
    Json(patch): Json<FieldPatch>,
) -> Result<Json<WizardView>, StatusCode> {
    state.ctx.set_field(patch).map_err(status_for)?;
    get_wizard(State(state)).await
}

/// GET /api/wizard/active/{step} - fields relevant on `step` right now.
async fn get_active(
    State(state): State<AppState>,
    Path(step): Path<Step>,
) -> Result<Json<BTreeSet<FieldId>>, StatusCode> {
    state
        .ctx
        .with_wizard(|wizard| wizard.active_fields(step))
        .map(Json)
        .map_err(status_for)
}

/// POST /api/wizard/submit - hand the answers off from the last step and start over.
async fn submit(State(state): State<AppState>) -> Result<Json<Submission>, StatusCode> {
    state.ctx.submit().map(Json).map_err(status_for)
}

fn status_for(err: IntakeError) -> StatusCode {
    match err {
        IntakeError::NotAuthenticated => StatusCode::UNAUTHORIZED,
        IntakeError::NotAtTerminalStep => StatusCode::CONFLICT,
        IntakeError::Field(err) => {
            warn!(error = %err, "field rejected");
            StatusCode::UNPROCESSABLE_ENTITY
        }
        IntakeError::Submission(err) => {
            warn!(error = %format!("{err:#}"), "submission failed");
            StatusCode::BAD_GATEWAY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake::context::IntakeContext;
    use intake::core::types::{Answer, PartnerMode};
    use intake::session::SessionGate;
    use intake::submit::SubmissionHandler;
    use intake::test_support::{MemoryTokenStore, RecordingSubmitter, ScriptedVerifier, names};

    fn app_state(recorder: &RecordingSubmitter) -> AppState {
        let gate = SessionGate::new(
            ScriptedVerifier::new(vec![Ok(names(&["Ana"]))]),
            MemoryTokenStore::default(),
        );
        let ctx = IntakeContext::new(gate, SubmissionHandler::new(recorder.clone()));
        AppState::new(ctx, "client-123".to_string())
    }

    async fn logged_in(recorder: &RecordingSubmitter) -> AppState {
        let state = app_state(recorder);
        let Json(session) = login(
            State(state.clone()),
            Json(LoginRequest {
                credential: Some("cred".to_string()),
            }),
        )
        .await;
        assert!(session.authenticated);
        state
    }

    #[tokio::test]
    async fn wizard_requires_login() {
        let state = app_state(&RecordingSubmitter::default());
        let err = get_wizard(State(state)).await.expect_err("gated");
        assert_eq!(err, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn config_exposes_client_id() {
        let state = app_state(&RecordingSubmitter::default());
        let Json(config) = get_config(State(state)).await;
        assert_eq!(config.client_id, "client-123");
    }

    #[tokio::test]
    async fn field_patch_updates_active_fields() {
        let state = logged_in(&RecordingSubmitter::default()).await;
        let Json(view) = set_field(
            State(state.clone()),
            Json(FieldPatch::PartnerMode(Some(PartnerMode::Existing))),
        )
        .await
        .expect("patch");

        assert_eq!(view.current_step, Step::Partner);
        assert_eq!(view.active, BTreeSet::from([FieldId::SelectedPartner]));

        let err = set_field(
            State(state),
            Json(FieldPatch::SelectedPartner("Zoe".to_string())),
        )
        .await
        .expect_err("unknown partner");
        assert_eq!(err, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn jump_ahead_is_rejected() {
        let state = logged_in(&RecordingSubmitter::default()).await;
        let Json(response) = jump(State(state.clone()), Json(JumpRequest { step: Step::Plan }))
            .await
            .expect("jump");
        assert!(!response.accepted);
        assert_eq!(response.wizard.current_step, Step::Partner);

        advance(State(state.clone())).await.expect("advance");
        let Json(response) = jump(State(state), Json(JumpRequest { step: Step::Partner }))
            .await
            .expect("jump");
        assert!(response.accepted);
        assert_eq!(response.wizard.current_step, Step::Partner);
    }

    #[tokio::test]
    async fn submit_before_last_step_conflicts() {
        let recorder = RecordingSubmitter::default();
        let state = logged_in(&recorder).await;
        advance(State(state.clone())).await.expect("advance");

        let err = submit(State(state.clone())).await.expect_err("plan step");

        assert_eq!(err, StatusCode::CONFLICT);
        assert!(recorder.received().is_empty());
        let Json(view) = get_wizard(State(state)).await.expect("wizard kept");
        assert_eq!(view.current_step, Step::Plan);
    }

    #[tokio::test]
    async fn submit_resets_wizard() {
        let recorder = RecordingSubmitter::default();
        let state = logged_in(&recorder).await;
        set_field(
            State(state.clone()),
            Json(FieldPatch::HasPlan(Some(Answer::Yes))),
        )
        .await
        .expect("patch");
        advance(State(state.clone())).await.expect("advance");
        let Json(active) = get_active(State(state.clone()), Path(Step::Plan))
            .await
            .expect("active");
        assert_eq!(active.len(), 3);
        let Json(view) = advance(State(state.clone())).await.expect("advance");
        assert_eq!(view.current_step, Step::Encounter);

        let Json(submission) = submit(State(state.clone())).await.expect("submit");
        assert_eq!(submission.answers.plan.has_plan, Some(Answer::Yes));
        assert_eq!(recorder.received().len(), 1);

        let Json(view) = get_wizard(State(state)).await.expect("fresh wizard");
        assert_eq!(view.current_step, Step::Partner);
        assert_eq!(view.answers, AnswerRecord::default());
    }
}
