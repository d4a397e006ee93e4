//! Rating submission
//!
//! One validation/coercion step at the boundary turns the raw form into an
//! [`EvaluationRecord`] or a client error; only a valid record reaches the
//! store. Persistence is an upsert on (session, item), so a respondent who
//! revisits a page and corrects an answer overwrites the earlier row
//! instead of duplicating it.

use axum::extract::State;
use axum::response::Redirect;
use axum::Form;
use serde::Deserialize;
use tracing::info;

use crate::store::EvaluationRecord;
use crate::{AppState, Error, Result};

/// Raw form fields as posted by the evaluation page. Numeric fields arrive
/// as strings and are coerced in [`SubmitForm::to_record`].
///
/// The item snapshot (derivedId, className, metricName, caseName) is taken
/// from the client as submitted, not re-derived from the position — see
/// DESIGN.md for the trust decision.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitForm {
    pub session_id: String,
    pub derived_id: String,
    pub class_name: String,
    pub metric_name: String,
    pub case_name: String,
    pub comparative_rating: String,
    pub test_rating: String,
    pub comparison_rating: String,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub next_position_hint: Option<String>,
}

fn coerce_int(field: &str, raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| Error::InvalidInput(format!("Field '{}' must be an integer, got '{}'", field, raw)))
}

impl SubmitForm {
    /// Coerce and assemble the record, or fail with a client error before
    /// any storage call happens.
    fn to_record(&self) -> Result<EvaluationRecord> {
        Ok(EvaluationRecord {
            session_identifier: coerce_int("sessionId", &self.session_id)?,
            eval_id: self.derived_id.clone(),
            item_class: self.class_name.clone(),
            item_metric: self.metric_name.clone(),
            item_case: self.case_name.clone(),
            comparative_rating: self.comparative_rating.clone(),
            test_rating: coerce_int("testRating", &self.test_rating)?,
            comparison_rating: coerce_int("comparisonRating", &self.comparison_rating)?,
            comments: self.comments.trim().to_string(),
        })
    }

    /// Next cursor position, or None for the terminal transition. Absent,
    /// empty, and the "none" sentinel (either spelling) all mean terminal.
    fn next_position(&self) -> Result<Option<i64>> {
        match self.next_position_hint.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(hint) if hint.eq_ignore_ascii_case("none") => Ok(None),
            Some(hint) => coerce_int("nextPositionHint", hint).map(Some),
        }
    }
}

/// POST /api/submit
///
/// Persists one rating and redirects to the next item, or to /complete when
/// there is none. A storage failure surfaces as a 500 without advancing the
/// cursor; a coercion failure is a 400 and never reaches the store.
pub async fn submit(State(state): State<AppState>, Form(form): Form<SubmitForm>) -> Result<Redirect> {
    let record = form.to_record()?;
    let next = form.next_position()?;

    let store = state
        .store
        .as_ref()
        .ok_or_else(|| Error::Config("no record store configured".to_string()))?;

    store.upsert_record(&record).await?;
    info!(
        "Stored evaluation ({}, {})",
        record.session_identifier, record.eval_id
    );

    match next {
        Some(position) => Ok(Redirect::to(&format!("/evaluate/{}", position))),
        None => Ok(Redirect::to("/complete")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_form() -> SubmitForm {
        SubmitForm {
            session_id: "7".to_string(),
            derived_id: "CC-AHIQ-case1".to_string(),
            class_name: "Copra Cake".to_string(),
            metric_name: "AHIQ".to_string(),
            case_name: "case1".to_string(),
            comparative_rating: "test".to_string(),
            test_rating: "4".to_string(),
            comparison_rating: "3".to_string(),
            comments: "  looks sharper  ".to_string(),
            next_position_hint: Some("1".to_string()),
        }
    }

    #[test]
    fn coercion_builds_a_typed_record() {
        let record = sample_form().to_record().unwrap();
        assert_eq!(record.session_identifier, 7);
        assert_eq!(record.test_rating, 4);
        assert_eq!(record.comparison_rating, 3);
        assert_eq!(record.comments, "looks sharper");
    }

    #[test]
    fn non_integer_rating_is_a_client_error() {
        let mut form = sample_form();
        form.test_rating = "four".to_string();
        match form.to_record() {
            Err(Error::InvalidInput(msg)) => assert!(msg.contains("testRating")),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn non_integer_session_id_is_a_client_error() {
        let mut form = sample_form();
        form.session_id = "abc".to_string();
        assert!(matches!(form.to_record(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn hint_sentinels_mean_terminal() {
        let mut form = sample_form();
        assert_eq!(form.next_position().unwrap(), Some(1));

        form.next_position_hint = Some("none".to_string());
        assert_eq!(form.next_position().unwrap(), None);

        form.next_position_hint = Some("None".to_string());
        assert_eq!(form.next_position().unwrap(), None);

        form.next_position_hint = Some(String::new());
        assert_eq!(form.next_position().unwrap(), None);

        form.next_position_hint = None;
        assert_eq!(form.next_position().unwrap(), None);
    }

    #[test]
    fn garbage_hint_is_a_client_error() {
        let mut form = sample_form();
        form.next_position_hint = Some("soon".to_string());
        assert!(matches!(form.next_position(), Err(Error::InvalidInput(_))));
    }
}
