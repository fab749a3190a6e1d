// server/src/page.rs

use html_escape::{encode_double_quoted_attribute, encode_text};
use orchestrator::submission::{self, Outcome};
use orchestrator::PersonaRegistry;

const DOCUMENT_TITLE: &str = "専門家LLMアプリ";

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 0; display: flex; }
aside { width: 18rem; padding: 1.5rem; background: #f0f2f6; min-height: 100vh; box-sizing: border-box; }
main { max-width: 46rem; padding: 1.5rem 2rem; }
textarea { width: 100%; box-sizing: border-box; font-size: 1rem; }
.info { background: #e8f0fe; padding: .75rem 1rem; border-radius: .4rem; white-space: pre-wrap; }
.warning { background: #fff8e1; padding: .75rem 1rem; border-radius: .4rem; }
.error { background: #fdecea; padding: .75rem 1rem; border-radius: .4rem; }
"#;

/// Renders the whole page. `selected` must be a registered persona name.
pub fn render(registry: &PersonaRegistry, selected: &str, question: &str, outcome: Option<&Outcome>) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str("<!DOCTYPE html>\n<html lang=\"ja\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n", DOCUMENT_TITLE, STYLE));
    html.push_str("<form method=\"post\" action=\"/\" style=\"display: contents\">\n");

    // Sidebar: persona selector.
    html.push_str(&format!(
        "<aside>\n<h2>{}</h2>\n<fieldset>\n<legend>{}</legend>\n",
        submission::SELECTOR_HEADER,
        submission::SELECTOR_LABEL
    ));
    for name in registry.list_personas() {
        let checked = if name == selected { " checked" } else { "" };
        html.push_str(&format!(
            "<label><input type=\"radio\" name=\"persona\" value=\"{}\"{}> {}</label><br>\n",
            encode_double_quoted_attribute(name),
            checked,
            encode_text(name)
        ));
    }
    html.push_str(&format!(
        "</fieldset>\n<p class=\"info\">{}</p>\n</aside>\n",
        encode_text(&submission::selected_info(selected))
    ));

    html.push_str("<main>\n");
    html.push_str(&format!("<h1>{}</h1>\n", submission::PAGE_TITLE));
    html.push_str(&render_overview());
    html.push_str(&format!(
        "<label for=\"question\">{}</label>\n<textarea id=\"question\" name=\"question\" rows=\"7\">{}</textarea>\n",
        submission::QUESTION_LABEL,
        encode_text(question)
    ));
    html.push_str(&format!("<p><button type=\"submit\">{}</button></p>\n", submission::SUBMIT_LABEL));

    if let Some(outcome) = outcome {
        html.push_str(&render_outcome(outcome));
    }

    html.push_str("</main>\n</form>\n</body>\n</html>\n");
    html
}

fn render_overview() -> String {
    let steps: String = submission::USAGE_STEPS
        .iter()
        .map(|step| format!("<li>{}</li>\n", step))
        .collect();
    format!(
        "<section>\n<h3>{}</h3>\n<p>{}</p>\n<h3>{}</h3>\n<ol>\n{}</ol>\n</section>\n",
        submission::OVERVIEW_HEADING,
        submission::OVERVIEW,
        submission::USAGE_HEADING,
        steps
    )
}

fn render_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::MissingQuestion { warning } => {
            format!("<p class=\"warning\" role=\"alert\">{}</p>\n", encode_text(warning))
        }
        Outcome::Answered { persona, text } => answer_block(persona, text),
        Outcome::Failed { persona, error, placeholder } => format!(
            "<p class=\"error\" role=\"alert\">{}</p>\n{}",
            encode_text(error),
            answer_block(persona, placeholder)
        ),
    }
}

fn answer_block(persona: &str, text: &str) -> String {
    format!(
        "<section id=\"answer\">\n<h3>{}</h3>\n<div class=\"info\">{}</div>\n</section>\n",
        encode_text(&submission::answer_heading(persona)),
        encode_text(text)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_only_the_selected_persona() {
        let registry = PersonaRegistry::builtin();
        let html = render(&registry, "歴史学者", "", None);
        assert!(html.contains("value=\"歴史学者\" checked"));
        assert!(!html.contains("value=\"テック系ジャーナリスト\" checked"));
        assert!(html.contains("選択中の専門家: 歴史学者"));
        assert!(!html.contains("id=\"answer\""));
    }

    #[test]
    fn overview_describes_the_page_layout() {
        let html = render(&PersonaRegistry::builtin(), "歴史学者", "", None);
        assert!(html.contains("このWebアプリは、ユーザーが選択した専門家"));
        assert!(html.contains("<li>左側のサイドバーで、"));
        assert!(html.contains("<li>中央のテキストエリアに質問を入力します。</li>"));
        assert!(html.contains("「回答を生成」ボタンをクリックすると"));
    }

    #[test]
    fn user_text_is_escaped() {
        let registry = PersonaRegistry::builtin();
        let outcome = Outcome::Answered {
            persona: "歴史学者".to_string(),
            text: "<script>alert(1)</script>".to_string(),
        };
        let html = render(&registry, "歴史学者", "</textarea><b>", Some(&outcome));
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("&lt;/textarea&gt;&lt;b&gt;</textarea>"));
    }

    #[test]
    fn failure_shows_error_then_placeholder_answer() {
        let registry = PersonaRegistry::builtin();
        let outcome = Outcome::Failed {
            persona: "歴史学者".to_string(),
            error: "LLMの実行中にエラーが発生しました: RateLimitError - quota".to_string(),
            placeholder: submission::FAILURE_PLACEHOLDER,
        };
        let html = render(&registry, "歴史学者", "q", Some(&outcome));
        let error_at = html.find("RateLimitError - quota").unwrap();
        let placeholder_at = html.find(submission::FAILURE_PLACEHOLDER).unwrap();
        assert!(error_at < placeholder_at);
        assert!(html.contains("🤖 AIの回答 (歴史学者)"));
    }
}
