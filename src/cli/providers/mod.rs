//! Providers command - shows which providers are configured and in what role

use crate::domain::ai::role_label;
use crate::domain::{AiProvider, ProviderConfig};

/// Print configured providers in fallback order
pub fn run() -> anyhow::Result<()> {
    let config = super::bootstrap()?;
    let service = crate::create_ai_service(&config)?;

    print!("{}", render(&service.registry().list_configured()));

    Ok(())
}

fn render(configured: &[ProviderConfig]) -> String {
    let order = AiProvider::PRIORITY
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(" -> ");

    let mut out = format!("Fallback order: {}\n", order);

    if configured.is_empty() {
        out.push_str("No AI providers configured. Set one of: ");
        out.push_str(
            &AiProvider::PRIORITY
                .iter()
                .map(|p| p.env_var())
                .collect::<Vec<_>>()
                .join(", "),
        );
        out.push('\n');
        return out;
    }

    for (position, config) in configured.iter().enumerate() {
        out.push_str(&format!(
            "{:<9} {} ({})\n",
            format!("{}:", role_label(position)),
            config.provider.display_name(),
            config.model_string()
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_roles() {
        let configured = vec![
            ProviderConfig::new(AiProvider::DeepSeek, "deepseek-chat", "d"),
            ProviderConfig::new(AiProvider::OpenAi, "gpt-4o-mini", "o"),
        ];

        let out = render(&configured);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "Fallback order: gemini -> deepseek -> openai");
        assert!(lines[1].starts_with("Primary:"));
        assert!(lines[1].contains("deepseek/deepseek-chat"));
        assert!(lines[2].starts_with("Backup:"));
        assert!(lines[2].contains("openai/gpt-4o-mini"));
    }

    #[test]
    fn test_render_empty() {
        let out = render(&[]);
        assert!(out.contains("No AI providers configured"));
        assert!(out.contains("GEMINI_API_KEY, DEEPSEEK_API_KEY, OPENAI_API_KEY"));
    }
}
