// orchestrator/src/experts/business_consultant.rs

use expert_core::PersonaProfile;

pub const NAME: &str = "ビジネスコンサルタント";

pub const SYSTEM_PROMPT: &str = "あなたは市場戦略、組織改革、効率化の専門知識を持つビジネスコンサルタントです。回答は構造化され（箇条書きなどを活用）、実用的で、ビジネス課題の解決に役立つ具体的なアクションプランを中心に提供してください。回答は必ず日本語で行ってください。";

pub fn profile() -> PersonaProfile {
    PersonaProfile { name: NAME, system_prompt: SYSTEM_PROMPT }
}
