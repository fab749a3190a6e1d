// orchestrator/src/orchestrator.rs

use std::sync::Arc;

use expert_core::{ChatBackend, ExpertError};

use crate::cache::MemoCache;
use crate::experts::PersonaRegistry;
use crate::prompts;

/// Answers questions in the voice of a chosen expert.
///
/// Answers are memoized per exact (question, persona) pair for the lifetime
/// of the service, so a persona prompt edited after an answer is cached does
/// not affect that answer. Failed calls are never memoized.
pub struct ResponseService {
    registry: PersonaRegistry,
    backend: Arc<dyn ChatBackend>,
    cache: MemoCache,
}

impl ResponseService {
    pub fn new(registry: PersonaRegistry, backend: Arc<dyn ChatBackend>) -> Self {
        tracing::info!(
            "[ResponseService] Ready with {} personas via '{}' backend",
            registry.profiles().len(),
            backend.name()
        );
        Self {
            registry,
            backend,
            cache: MemoCache::new(),
        }
    }

    pub fn registry(&self) -> &PersonaRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &MemoCache {
        &self.cache
    }

    /// Returns the expert's answer to `question`.
    ///
    /// The question is forwarded as given; emptiness is the caller's concern.
    pub async fn get_response(&self, question: &str, persona_key: &str) -> Result<String, ExpertError> {
        // Unknown personas are rejected before they can claim a cache slot.
        let system_prompt = self.registry.get_system_prompt(persona_key)?;
        if self.cache.contains(question, persona_key) {
            tracing::debug!("[ResponseService] Cache hit for persona '{}'", persona_key);
        }

        self.cache
            .get_or_try_init(question, persona_key, || async {
                let messages = prompts::get_persona_messages(system_prompt, question);

                tracing::info!("[ResponseService] Asking '{}' via {} backend...", persona_key, self.backend.name());
                match self.backend.complete(&messages).await {
                    Ok(text) => {
                        tracing::info!("[ResponseService] Received {} chars from '{}'", text.chars().count(), persona_key);
                        Ok(text)
                    }
                    Err(e) => {
                        tracing::error!("[ResponseService] Backend call for '{}' failed: {}", persona_key, e);
                        Err(e)
                    }
                }
            })
            .await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::experts::tech_journalist;
    use async_trait::async_trait;
    use expert_core::{ChatMessage, ExternalFailureKind};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Backend double: records every prompt and replays scripted results.
    /// With no script left it answers "answer #N".
    #[derive(Default)]
    pub(crate) struct ScriptedBackend {
        pub calls: Mutex<Vec<Vec<ChatMessage>>>,
        pub script: Mutex<VecDeque<Result<String, ExpertError>>>,
        pub delay: Option<Duration>,
    }

    impl ScriptedBackend {
        pub fn with_script(script: Vec<Result<String, ExpertError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                ..Default::default()
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        fn name(&self) -> &'static str { "scripted" }

        async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ExpertError> {
            let n = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(messages.to_vec());
                calls.len()
            };
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let scripted = self.script.lock().unwrap().pop_front();
            scripted.unwrap_or_else(|| Ok(format!("answer #{}", n)))
        }
    }

    fn service_with(backend: Arc<ScriptedBackend>) -> ResponseService {
        ResponseService::new(PersonaRegistry::builtin(), backend)
    }

    #[tokio::test]
    async fn builds_system_then_user_prompt_and_returns_completion_verbatim() {
        let backend = Arc::new(ScriptedBackend::with_script(vec![Ok("量子ビットで計算します！".to_string())]));
        let service = service_with(backend.clone());

        let text = service.get_response("量子コンピュータとは？", tech_journalist::NAME).await.unwrap();
        assert_eq!(text, "量子ビットで計算します！");

        let calls = backend.calls.lock().unwrap();
        assert_eq!(
            calls[0],
            vec![
                ChatMessage::system(tech_journalist::SYSTEM_PROMPT),
                ChatMessage::user("量子コンピュータとは？"),
            ]
        );
    }

    #[tokio::test]
    async fn identical_requests_call_the_backend_once() {
        let backend = Arc::new(ScriptedBackend::default());
        let service = service_with(backend.clone());

        let first = service.get_response("鎌倉幕府は？", "歴史学者").await.unwrap();
        let second = service.get_response("鎌倉幕府は？", "歴史学者").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn same_question_different_persona_is_a_separate_entry() {
        let backend = Arc::new(ScriptedBackend::default());
        let service = service_with(backend.clone());

        let journalist = service.get_response("AIの未来は？", "テック系ジャーナリスト").await.unwrap();
        let consultant = service.get_response("AIの未来は？", "ビジネスコンサルタント").await.unwrap();

        assert_ne!(journalist, consultant);
        assert_eq!(backend.call_count(), 2);
        assert_eq!(service.cache().len(), 2);
    }

    #[tokio::test]
    async fn failed_call_is_retried_on_the_next_identical_request() {
        let backend = Arc::new(ScriptedBackend::with_script(vec![
            Err(ExpertError::external(ExternalFailureKind::Connection, "connection reset")),
            Ok("second time lucky".to_string()),
        ]));
        let service = service_with(backend.clone());

        let err = service.get_response("q", "歴史学者").await.unwrap_err();
        assert_eq!(err.kind_name(), "APIConnectionError");
        assert!(service.cache().is_empty());
        assert_eq!(service.cache().slot_count(), 0);

        let text = service.get_response("q", "歴史学者").await.unwrap();
        assert_eq!(text, "second time lucky");
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test]
    async fn unknown_persona_never_reaches_the_backend() {
        let backend = Arc::new(ScriptedBackend::default());
        let service = service_with(backend.clone());

        let err = service.get_response("q", "料理人").await.unwrap_err();
        assert!(matches!(err, ExpertError::UnknownPersona { ref key } if key == "料理人"));
        assert_eq!(backend.call_count(), 0);
        assert!(service.cache().is_empty());
    }

    #[tokio::test]
    async fn rejected_requests_do_not_grow_the_cache() {
        let backend = Arc::new(ScriptedBackend::with_script(
            (0..50)
                .map(|_| Err(ExpertError::external(ExternalFailureKind::RateLimit, "slow down")))
                .collect(),
        ));
        let service = service_with(backend.clone());

        for i in 0..50 {
            let question = format!("q{}", i);
            assert!(service.get_response(&question, "料理人").await.is_err());
            assert!(service.get_response(&question, "歴史学者").await.is_err());
        }

        assert_eq!(backend.call_count(), 50);
        assert_eq!(service.cache().slot_count(), 0);
    }

    #[tokio::test]
    async fn concurrent_identical_requests_share_one_call() {
        let backend = Arc::new(ScriptedBackend {
            delay: Some(Duration::from_millis(50)),
            ..Default::default()
        });
        let service = service_with(backend.clone());

        let (a, b, c) = tokio::join!(
            service.get_response("q", "歴史学者"),
            service.get_response("q", "歴史学者"),
            service.get_response("q", "歴史学者"),
        );
        assert_eq!(a.unwrap(), "answer #1");
        assert_eq!(b.unwrap(), "answer #1");
        assert_eq!(c.unwrap(), "answer #1");
        assert_eq!(backend.call_count(), 1);
    }
}
