//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, TriageArgs};
use crate::error::Result;
use crate::intent::IntentLabel;
use crate::priority::PriorityLevel;
use crate::routing::Category;
use crate::ticket::TicketSeed;
use crate::triage::ClassificationResult;

/// Result structure for a single classification.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClassifyOutput {
    #[serde(flatten)]
    pub result: ClassificationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket: Option<TicketSeed>,
}

/// One line of a batch run.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchItem {
    pub line: usize,
    #[serde(flatten)]
    pub result: ClassificationResult,
}

/// Result structure for a batch run.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchOutput {
    pub items: Vec<BatchItem>,
    pub total: usize,
    pub grievances: usize,
    pub semantic: usize,
    pub duration_ms: u64,
}

/// One row of the intent catalog.
#[derive(Debug, Serialize, Deserialize)]
pub struct IntentSummary {
    pub label: IntentLabel,
    pub category: Category,
    pub priority_tier: PriorityLevel,
    pub routing_target: String,
    pub department: String,
    pub description: String,
}

/// Result structure for configuration validation.
#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigCheckResult {
    pub path: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Human-readable rendering of a command result.
pub trait HumanOutput {
    fn render_human(&self, args: &TriageArgs) -> String;
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + HumanOutput>(
    message: &str,
    result: &T,
    args: &TriageArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 1 {
                println!("{message}");
                println!();
            }
            print!("{}", result.render_human(args));
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

fn output_json<T: Serialize>(result: &T, args: &TriageArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

fn render_classification(result: &ClassificationResult, verbose: bool) -> String {
    let mut out = String::new();
    let tags: Vec<&str> = result.tags().iter().map(|t| t.as_str()).collect();

    out.push_str(&format!(
        "Intent:     {} ({:.3})\n",
        result.primary_intent(),
        result.confidence()
    ));
    out.push_str(&format!("Tags:       {}\n", tags.join(", ")));
    out.push_str(&format!("Priority:   {}\n", result.priority()));
    out.push_str(&format!("Category:   {}\n", result.category()));
    out.push_str(&format!(
        "Routing:    {} ({})\n",
        result.routing_target(),
        result.department()
    ));

    if result.entities().is_empty() {
        out.push_str("Entities:   none\n");
    } else {
        out.push_str("Entities:\n");
        for (entity_type, value) in result.entities().iter() {
            out.push_str(&format!("  {:<10} {value}\n", entity_type.as_str()));
        }
    }

    if verbose {
        out.push_str(&format!("Path:       {:?}\n", result.path()));
        if let Some(reason) = result.degraded_reason() {
            out.push_str(&format!("Degraded:   {reason}\n"));
        }
        for intent in result.intents() {
            out.push_str(&format!("  {:<18} {:.3}\n", intent.label.as_str(), intent.score));
        }
    }

    out
}

impl HumanOutput for ClassifyOutput {
    fn render_human(&self, args: &TriageArgs) -> String {
        let mut out = render_classification(&self.result, args.verbosity() > 1);
        if let Some(ticket) = &self.ticket {
            out.push_str(&format!(
                "Ticket:     {} [{}] created {}\n",
                ticket.id,
                ticket.status,
                ticket.created_at.to_rfc3339()
            ));
        }
        out
    }
}

impl HumanOutput for BatchOutput {
    fn render_human(&self, args: &TriageArgs) -> String {
        let mut out = String::new();
        for item in &self.items {
            out.push_str(&format!(
                "{:>4}  {:<18} {:<6} {:<9} {:<18} {}\n",
                item.line,
                item.result.primary_intent().as_str(),
                item.result.priority().as_str(),
                item.result.category().as_str(),
                item.result.routing_target(),
                truncate(item.result.raw_input(), 48)
            ));
        }
        if args.verbosity() > 0 {
            out.push_str(&format!(
                "\n{} utterances, {} grievances, {} semantic, {} ms\n",
                self.total, self.grievances, self.semantic, self.duration_ms
            ));
        }
        out
    }
}

impl HumanOutput for Vec<IntentSummary> {
    fn render_human(&self, _args: &TriageArgs) -> String {
        let mut out = format!(
            "{:<18} {:<9} {:<6} {:<18} {}\n",
            "INTENT", "CATEGORY", "TIER", "ROUTING", "DEPARTMENT"
        );
        for summary in self {
            out.push_str(&format!(
                "{:<18} {:<9} {:<6} {:<18} {}\n",
                summary.label.as_str(),
                summary.category.as_str(),
                summary.priority_tier.as_str(),
                summary.routing_target,
                summary.department
            ));
        }
        out
    }
}

impl HumanOutput for ConfigCheckResult {
    fn render_human(&self, _args: &TriageArgs) -> String {
        match &self.error {
            None => format!("{}: ok\n", self.path),
            Some(error) => format!("{}: invalid: {error}\n", self.path),
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
        // Multi-byte characters are not split.
        assert_eq!(truncate("₹₹₹₹₹₹₹₹₹₹", 5), "₹₹...");
    }

    #[test]
    fn test_config_check_rendering() {
        let args = TriageArgs::try_parse_from(["triage", "intents"]).unwrap();
        let ok = ConfigCheckResult {
            path: "a.json".to_string(),
            valid: true,
            error: None,
        };
        assert_eq!(ok.render_human(&args), "a.json: ok\n");

        let bad = ConfigCheckResult {
            path: "b.json".to_string(),
            valid: false,
            error: Some("missing route".to_string()),
        };
        assert_eq!(bad.render_human(&args), "b.json: invalid: missing route\n");
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            serde_json::json!({"path": "a.json", "valid": true})
        );
    }

    #[tokio::test]
    async fn test_classification_rendering() {
        let classifier =
            crate::triage::TicketClassifier::new(crate::config::TriageConfig::default()).unwrap();
        let result = classifier
            .classify_query("Bill mein 200 rupees extra charge hai")
            .await;

        let text = render_classification(&result, false);
        assert!(text.contains("Intent:     BILLING_COMPLAINT"));
        assert!(text.contains("Routing:    billing_team (Billing Department)"));
        assert!(text.contains("amount     200"));
        assert!(!text.contains("Path:"));
    }
}
