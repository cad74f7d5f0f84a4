//! Reply composition — every substantive reply carries the legal disclaimer.

use crate::config;

/// Append the fixed disclaimer after a blank-line separator.
///
/// Applied unconditionally, including to the fallback apology. Pure function
/// of its input and the static disclaimer text.
pub fn compose_reply(generated_text: &str) -> String {
    format!("{generated_text}\n\n{}", config::DISCLAIMER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_ends_with_disclaimer_after_blank_line() {
        let reply = compose_reply("Le prix moyen est d'environ 5000€/m².");
        assert_eq!(
            reply,
            format!(
                "Le prix moyen est d'environ 5000€/m².\n\n{}",
                config::DISCLAIMER
            )
        );
    }

    #[test]
    fn apology_also_gets_the_disclaimer() {
        let reply = compose_reply(config::GENERATION_APOLOGY);
        assert!(reply.starts_with(config::GENERATION_APOLOGY));
        assert!(reply.ends_with(config::DISCLAIMER));
        assert!(reply.contains("\n\n"));
    }

    #[test]
    fn composition_is_idempotent_over_its_input() {
        let once = compose_reply("même texte");
        let twice = compose_reply("même texte");
        assert_eq!(once, twice);
    }
}
