// orchestrator/src/experts/mod.rs

pub mod business_consultant;
pub mod historian;
pub mod tech_journalist;

use expert_core::{ExpertError, PersonaProfile};

/// Every built-in prompt ends with this directive.
pub const ANSWER_LANGUAGE_DIRECTIVE: &str = "回答は必ず日本語で行ってください。";

/// Read-only lookup over the fixed set of expert personas.
///
/// Order matters: the first profile is what a selector shows as default.
#[derive(Debug, Clone)]
pub struct PersonaRegistry {
    profiles: Vec<PersonaProfile>,
}

impl PersonaRegistry {
    /// The three built-in experts, in display order.
    pub fn builtin() -> Self {
        Self {
            profiles: vec![
                tech_journalist::profile(),
                historian::profile(),
                business_consultant::profile(),
            ],
        }
    }

    pub fn list_personas(&self) -> Vec<&'static str> {
        self.profiles.iter().map(|p| p.name).collect()
    }

    pub fn get_system_prompt(&self, key: &str) -> Result<&'static str, ExpertError> {
        self.profiles
            .iter()
            .find(|p| p.name == key)
            .map(|p| p.system_prompt)
            .ok_or_else(|| ExpertError::UnknownPersona { key: key.to_string() })
    }

    pub fn default_persona(&self) -> &'static str {
        self.profiles[0].name
    }

    pub fn contains(&self, key: &str) -> bool {
        self.profiles.iter().any(|p| p.name == key)
    }

    pub fn profiles(&self) -> &[PersonaProfile] {
        &self.profiles
    }
}

impl Default for PersonaRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
