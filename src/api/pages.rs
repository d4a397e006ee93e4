//! Page-serving routes
//!
//! Navigation is a single integer cursor over the catalog: `/` redirects to
//! the first item, `/evaluate/:position` renders one comparison task, and
//! `/complete` is the terminal page. Pages are static HTML templates carried
//! in the binary with per-item token substitution.

use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::catalog::EvaluationItem;
use crate::AppState;

const INDEX_HTML: &str = include_str!("../ui/index.html");
const COMPLETE_HTML: &str = include_str!("../ui/complete.html");
const EMPTY_HTML: &str = include_str!("../ui/empty.html");

/// GET /
///
/// Redirects to the first item. An empty catalog renders a "no items" page
/// instead of redirecting, so the out-of-range redirect cannot loop back
/// here forever.
pub async fn home(State(state): State<AppState>) -> Response {
    if state.catalog.is_empty() {
        return Html(EMPTY_HTML).into_response();
    }
    Redirect::to("/evaluate/0").into_response()
}

/// GET /evaluate/:position
///
/// Renders the page for one item. Out-of-range positions (negative or past
/// the end alike) redirect home rather than erroring.
pub async fn evaluate_item(
    State(state): State<AppState>,
    Path(position): Path<i64>,
) -> Response {
    let Some(item) = state.catalog.get(position) else {
        return Redirect::to("/").into_response();
    };

    let position = item.position;
    let previous = state.catalog.previous(position);
    let next = state.catalog.next(position);

    Html(render_item_page(item, state.catalog.len(), previous, next)).into_response()
}

/// GET /complete
pub async fn complete() -> Html<&'static str> {
    Html(COMPLETE_HTML)
}

/// Minimal HTML escaping for values substituted into the page. Catalog
/// fields come from filenames, but they still pass through here.
fn html_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn render_item_page(
    item: &EvaluationItem,
    total: usize,
    previous: Option<usize>,
    next: Option<usize>,
) -> String {
    let previous_html = match previous {
        Some(p) => format!(
            "<a class=\"nav-link\" href=\"/evaluate/{}\">&larr; Previous</a>",
            p
        ),
        None => "<span class=\"nav-link disabled\">&larr; Previous</span>".to_string(),
    };
    // The sentinel "none" routes the final submission to /complete
    let next_hint = match next {
        Some(n) => n.to_string(),
        None => "none".to_string(),
    };

    INDEX_HTML
        .replace("{{POSITION_DISPLAY}}", &(item.position + 1).to_string())
        .replace("{{TOTAL}}", &total.to_string())
        .replace("{{EVAL_ID}}", &html_escape(&item.derived_id))
        .replace("{{CLASS_NAME}}", &html_escape(&item.class_name))
        .replace("{{METRIC_NAME}}", &html_escape(&item.metric_name))
        .replace("{{CASE_NAME}}", &html_escape(&item.case_name))
        .replace("{{IMAGE_URL}}", &html_escape(&item.asset_location))
        .replace("{{PREV_HTML}}", &previous_html)
        .replace("{{NEXT_HINT}}", &next_hint)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> EvaluationItem {
        EvaluationItem {
            position: 0,
            class_name: "Copra Cake".to_string(),
            metric_name: "AHIQ".to_string(),
            case_name: "case1".to_string(),
            derived_id: "CC-AHIQ-case1".to_string(),
            asset_location: "https://images.example.com/eval/Copra_Cake__AHIQ__case1.png"
                .to_string(),
        }
    }

    #[test]
    fn renders_item_fields_and_next_hint() {
        let page = render_item_page(&sample_item(), 3, None, Some(1));
        assert!(page.contains("CC-AHIQ-case1"));
        assert!(page.contains("Copra Cake"));
        assert!(page.contains("name=\"nextPositionHint\" value=\"1\""));
        assert!(!page.contains("{{"));
    }

    #[test]
    fn last_item_gets_none_sentinel() {
        let mut item = sample_item();
        item.position = 2;
        let page = render_item_page(&item, 3, Some(1), None);
        assert!(page.contains("name=\"nextPositionHint\" value=\"none\""));
        assert!(page.contains("/evaluate/1"));
    }

    #[test]
    fn escaping_covers_markup_characters() {
        assert_eq!(html_escape("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
    }
}
