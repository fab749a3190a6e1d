// orchestrator/src/submission.rs

//! What happens when the user presses "回答を生成".
//!
//! Both front ends route a submission through [`handle`] and only decide how
//! to draw the resulting [`Outcome`].

use expert_core::{ExpertError, QueryRequest};
use serde::Serialize;

use crate::orchestrator::ResponseService;

pub const PAGE_TITLE: &str = "👨‍💼 専門家パーソナリティ選択型LLMアプリ";
pub const SELECTOR_HEADER: &str = "専門家の選択";
pub const SELECTOR_LABEL: &str = "LLMに誰の振る舞いをさせますか？";
pub const QUESTION_LABEL: &str = "ここに質問を入力してください：";
pub const SUBMIT_LABEL: &str = "回答を生成";
pub const MISSING_QUESTION_WARNING: &str = "質問内容を入力してください。";
pub const FAILURE_PLACEHOLDER: &str = "回答の取得に失敗しました。詳細なエラーは上記メッセージを確認してください。";
pub const STARTUP_FAILURE_PREFIX: &str = "OpenAIモデルの初期化に失敗しました。APIキーを確認してください";

pub const OVERVIEW_HEADING: &str = "アプリケーションの概要";
pub const OVERVIEW: &str = "このWebアプリは、ユーザーが選択した専門家（ペルソナ）の視点に基づいて、質問に回答するLLM（大規模言語モデル）インターフェースです。質問の内容に合わせて専門家を切り替えることで、多角的な視点からの情報を得ることができます。";
pub const USAGE_HEADING: &str = "操作方法";
pub const USAGE_STEPS: [&str; 3] = [
    "左側のサイドバーで、回答してほしい専門家（テック系ジャーナリスト、歴史学者、ビジネスコンサルタント）をラジオボタンで選択します。",
    "中央のテキストエリアに質問を入力します。",
    "「回答を生成」ボタンをクリックすると、選択した専門家のシステムメッセージがLLMに渡され、そのペルソナに基づいた回答が表示されます。",
];

pub fn selected_info(persona: &str) -> String {
    format!("選択中の専門家: {}", persona)
}

pub fn progress_message(persona: &str) -> String {
    format!("AI ({}) が回答を考え中です...", persona)
}

pub fn answer_heading(persona: &str) -> String {
    format!("🤖 AIの回答 ({})", persona)
}

pub fn error_message(err: &ExpertError) -> String {
    format!("LLMの実行中にエラーが発生しました: {} - {}", err.kind_name(), err.detail())
}

pub fn startup_failure_message(err: &ExpertError) -> String {
    format!("{}: {}", STARTUP_FAILURE_PREFIX, err)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Nothing was sent; the user has to type a question first.
    MissingQuestion { warning: &'static str },
    Answered { persona: String, text: String },
    /// The error is shown above the placeholder, which stands in for the answer.
    Failed { persona: String, error: String, placeholder: &'static str },
}

impl Outcome {
    /// The text drawn in the answer slot, if any.
    pub fn answer_text(&self) -> Option<&str> {
        match self {
            Outcome::MissingQuestion { .. } => None,
            Outcome::Answered { text, .. } => Some(text),
            Outcome::Failed { placeholder, .. } => Some(placeholder),
        }
    }
}

/// Validates the submission, asks the service, and turns any error into
/// something displayable. Never fails: the caller stays usable afterwards.
pub async fn handle(service: &ResponseService, request: &QueryRequest) -> Outcome {
    if !request.has_question() {
        tracing::info!("[Submission] Empty question; nothing sent");
        return Outcome::MissingQuestion { warning: MISSING_QUESTION_WARNING };
    }

    tracing::info!("[Submission] {}", progress_message(&request.persona));
    match service.get_response(&request.question, &request.persona).await {
        Ok(text) => Outcome::Answered { persona: request.persona.clone(), text },
        Err(e) => {
            tracing::warn!("[Submission] Showing failure to user: {}", e);
            Outcome::Failed {
                persona: request.persona.clone(),
                error: error_message(&e),
                placeholder: FAILURE_PLACEHOLDER,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experts::PersonaRegistry;
    use crate::orchestrator::tests::ScriptedBackend;
    use expert_core::ExternalFailureKind;
    use std::sync::Arc;

    fn service_with(backend: Arc<ScriptedBackend>) -> ResponseService {
        ResponseService::new(PersonaRegistry::builtin(), backend)
    }

    #[tokio::test]
    async fn empty_question_warns_without_calling_the_service() {
        let backend = Arc::new(ScriptedBackend::default());
        let service = service_with(backend.clone());

        let outcome = handle(&service, &QueryRequest::new("歴史学者", "")).await;
        assert_eq!(outcome, Outcome::MissingQuestion { warning: MISSING_QUESTION_WARNING });
        assert_eq!(outcome.answer_text(), None);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn whitespace_question_is_sent_as_typed() {
        let backend = Arc::new(ScriptedBackend::default());
        let service = service_with(backend.clone());

        let outcome = handle(&service, &QueryRequest::new("歴史学者", " \n")).await;
        assert!(matches!(outcome, Outcome::Answered { .. }));
        assert_eq!(backend.call_count(), 1);
        assert_eq!(backend.calls.lock().unwrap()[0][1], expert_core::ChatMessage::user(" \n"));
    }

    #[tokio::test]
    async fn answer_is_displayed_unmodified() {
        let backend = Arc::new(ScriptedBackend::with_script(vec![Ok("  量子の答え\n".to_string())]));
        let service = service_with(backend);

        let outcome = handle(&service, &QueryRequest::new("テック系ジャーナリスト", "量子コンピュータとは？")).await;
        assert_eq!(
            outcome,
            Outcome::Answered {
                persona: "テック系ジャーナリスト".to_string(),
                text: "  量子の答え\n".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn failure_shows_kind_message_and_placeholder() {
        let backend = Arc::new(ScriptedBackend::with_script(vec![Err(ExpertError::external(
            ExternalFailureKind::Authentication,
            "Incorrect API key provided",
        ))]));
        let service = service_with(backend);

        let outcome = handle(&service, &QueryRequest::new("歴史学者", "q")).await;
        match &outcome {
            Outcome::Failed { persona, error, placeholder } => {
                assert_eq!(persona, "歴史学者");
                assert_eq!(
                    error,
                    "LLMの実行中にエラーが発生しました: AuthenticationError - Incorrect API key provided"
                );
                assert_eq!(*placeholder, FAILURE_PLACEHOLDER);
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(outcome.answer_text(), Some(FAILURE_PLACEHOLDER));
    }

    #[tokio::test]
    async fn unknown_persona_is_reported_not_panicked() {
        let service = service_with(Arc::new(ScriptedBackend::default()));
        let outcome = handle(&service, &QueryRequest::new("料理人", "q")).await;
        match outcome {
            Outcome::Failed { error, .. } => assert!(error.contains("UnknownPersonaError")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn display_strings() {
        assert_eq!(answer_heading("歴史学者"), "🤖 AIの回答 (歴史学者)");
        assert_eq!(progress_message("歴史学者"), "AI (歴史学者) が回答を考え中です...");
        assert_eq!(
            startup_failure_message(&ExpertError::configuration("OPENAI_API_KEY is not set")),
            "OpenAIモデルの初期化に失敗しました。APIキーを確認してください: OPENAI_API_KEY is not set"
        );
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let value = serde_json::to_value(Outcome::MissingQuestion { warning: MISSING_QUESTION_WARNING }).unwrap();
        assert_eq!(value["status"], "missing_question");
    }
}
