//! Configuration — read once from the environment at startup, then shared
//! immutably. No component reads ambient environment state after this.

use secrecy::SecretString;

use crate::error::ConfigError;

/// System instruction pinning the assistant's persona. Identical for every
/// generation call and never derived from the user's message.
pub const SYSTEM_PROMPT: &str = "Vous êtes Mathieu Lantoine, agent immobilier spécialisé à Nice (06). \
     Vous répondez en tant qu'assistant virtuel de Mathieu Lantoine. \
     Vous devez répondre en français de manière factuelle, professionnelle et modeste. \
     Si une question sort du domaine de l'immobilier ou du droit immobilier \
     français, expliquez poliment que vous ne pouvez répondre qu'à ce type de question.";

/// Legal disclaimer appended to every substantive reply.
pub const DISCLAIMER: &str = "⚠️ Les informations fournies par cet assistant virtuel sont données à titre \
     informatif uniquement et ne sauraient constituer un conseil juridique, fiscal \
     ou immobilier personnalisé. Pour toute décision engageant des conséquences \
     juridiques ou financières, il est fortement recommandé de consulter un \
     professionnel qualifié (avocat, notaire, expert-comptable). Aucune \
     responsabilité ne pourra être retenue à l'encontre de l'auteur ou de l'éditeur \
     de ce service en cas d'erreur ou d'omission.";

/// Fixed greeting for the `/start` command. Sent verbatim, no disclaimer.
pub const WELCOME_MESSAGE: &str = "Bonjour! Je suis l'assistant virtuel de Mathieu Lantoine, agent immobilier \
     spécialisé à Nice (06). Posez-moi vos questions sur l'immobilier, le droit \
     immobilier, la fiscalité immobilière ou les SCI et je ferai de mon mieux \
     pour vous répondre.";

/// Fixed capability description for the `/help` command.
pub const HELP_MESSAGE: &str = "Je suis un assistant virtuel spécialisé en droit et fiscalité immobiliers. \
     Posez votre question de manière claire et je vous fournirai une réponse \
     aussi précise que possible, accompagnée d'un disclaimer juridique obligatoire.";

/// Fallback returned in place of generated content whenever the generation
/// backend call fails for any reason.
pub const GENERATION_APOLOGY: &str = "Je rencontre actuellement un problème pour générer une réponse via le modèle. \
     Veuillez réessayer plus tard.";

/// Reply for unclassified pipeline faults. The user never sees a raw error.
pub const GENERIC_ERROR_REPLY: &str =
    "Une erreur inattendue est survenue. Veuillez réessayer plus tard.";

/// Terms whose presence in an inbound message triggers an operator alert.
/// Ordered — the first match in list order wins.
pub const DEFAULT_SENSITIVE_KEYWORDS: &[&str] = &["procès", "avocat", "litige"];

/// Assistant configuration. Built once in `main`, immutable thereafter.
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot credential. Mandatory.
    pub telegram_token: SecretString,
    /// Generation backend credential. Mandatory.
    pub openai_api_key: SecretString,
    /// Chat that receives sensitive-keyword alerts. Absent ⇒ alerting is a no-op.
    pub alert_chat_id: Option<String>,
    /// Generation model identifier.
    pub model: String,
    /// Maximum output tokens per generation call.
    pub max_output_tokens: u32,
    /// Sampling temperature — low variance, favors consistency.
    pub temperature: f32,
    /// Port for the `/health` endpoint.
    pub health_port: u16,
    /// Sensitive terms, in match-priority order.
    pub keywords: Vec<String>,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// Missing `TELEGRAM_TOKEN` or `OPENAI_API_KEY` is a fatal error — the
    /// process must not begin serving without them.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::build(|key| std::env::var(key).ok())
    }

    /// Build the configuration from a variable lookup. Split out so tests
    /// can drive it without mutating the process environment.
    fn build(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let telegram_token = get("TELEGRAM_TOKEN")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("TELEGRAM_TOKEN".into()))?;
        let openai_api_key = get("OPENAI_API_KEY")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("OPENAI_API_KEY".into()))?;

        let alert_chat_id = get("ADMIN_CHAT_ID").filter(|v| !v.is_empty());

        let model = get("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o".to_string());

        let max_output_tokens = parse_or_default(&get, "MAX_OUTPUT_TOKENS", 800)?;
        let temperature = parse_or_default(&get, "GENERATION_TEMPERATURE", 0.3)?;
        let health_port = parse_or_default(&get, "HEALTH_PORT", 8080)?;

        let keywords = match get("SENSITIVE_KEYWORDS") {
            Some(raw) => parse_keywords(&raw),
            None => DEFAULT_SENSITIVE_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
        };

        Ok(Self {
            telegram_token: SecretString::from(telegram_token),
            openai_api_key: SecretString::from(openai_api_key),
            alert_chat_id,
            model,
            max_output_tokens,
            temperature,
            health_port,
            keywords,
        })
    }
}

/// Parse an optional numeric variable, falling back to a default when unset.
fn parse_or_default<T: std::str::FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match get(key) {
        Some(raw) => raw.parse().map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{e}"),
        }),
        None => Ok(default),
    }
}

/// Parse a comma-separated keyword list, dropping empty entries.
fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn missing_telegram_token_is_fatal() {
        let result = Config::build(env(&[("OPENAI_API_KEY", "sk-test")]));
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(ref k)) if k == "TELEGRAM_TOKEN"));
    }

    #[test]
    fn missing_openai_key_is_fatal() {
        let result = Config::build(env(&[("TELEGRAM_TOKEN", "123:ABC")]));
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(ref k)) if k == "OPENAI_API_KEY"));
    }

    #[test]
    fn empty_credential_treated_as_missing() {
        let result = Config::build(env(&[
            ("TELEGRAM_TOKEN", ""),
            ("OPENAI_API_KEY", "sk-test"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn defaults_applied_when_optional_vars_unset() {
        let config = Config::build(env(&[
            ("TELEGRAM_TOKEN", "123:ABC"),
            ("OPENAI_API_KEY", "sk-test"),
        ]))
        .unwrap();

        assert!(config.alert_chat_id.is_none());
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.max_output_tokens, 800);
        assert!((config.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.health_port, 8080);
        assert_eq!(config.keywords, vec!["procès", "avocat", "litige"]);
    }

    #[test]
    fn optional_vars_override_defaults() {
        let config = Config::build(env(&[
            ("TELEGRAM_TOKEN", "123:ABC"),
            ("OPENAI_API_KEY", "sk-test"),
            ("ADMIN_CHAT_ID", "987654"),
            ("OPENAI_MODEL", "gpt-4o-mini"),
            ("MAX_OUTPUT_TOKENS", "400"),
            ("GENERATION_TEMPERATURE", "0.7"),
            ("HEALTH_PORT", "9000"),
            ("SENSITIVE_KEYWORDS", "expulsion, saisie"),
        ]))
        .unwrap();

        assert_eq!(config.alert_chat_id.as_deref(), Some("987654"));
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_output_tokens, 400);
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.health_port, 9000);
        assert_eq!(config.keywords, vec!["expulsion", "saisie"]);
    }

    #[test]
    fn invalid_numeric_value_is_rejected() {
        let result = Config::build(env(&[
            ("TELEGRAM_TOKEN", "123:ABC"),
            ("OPENAI_API_KEY", "sk-test"),
            ("MAX_OUTPUT_TOKENS", "beaucoup"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "MAX_OUTPUT_TOKENS"
        ));
    }

    #[test]
    fn keyword_list_parsing_trims_and_drops_empties() {
        assert_eq!(
            parse_keywords(" procès ,avocat,, litige "),
            vec!["procès", "avocat", "litige"]
        );
    }

    #[test]
    fn disclaimer_recommends_a_professional() {
        assert!(DISCLAIMER.contains("professionnel qualifié"));
    }
}
