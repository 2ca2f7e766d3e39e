//! End-to-end classification scenarios on both the keyword and semantic paths.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{ConceptEmbedder, FailingEmbedder, SlowEmbedder};
use ticket_triage::classifier::ClassificationPath;
use ticket_triage::config::TriageConfig;
use ticket_triage::entity::EntityType;
use ticket_triage::intent::IntentLabel;
use ticket_triage::priority::PriorityLevel;
use ticket_triage::routing::Category;
use ticket_triage::ticket::{TicketSeed, TicketStatus};
use ticket_triage::triage::TicketClassifier;

fn keyword_classifier() -> TicketClassifier {
    TicketClassifier::new(TriageConfig::default()).unwrap()
}

fn semantic_classifier() -> TicketClassifier {
    TicketClassifier::with_embedder(TriageConfig::default(), Arc::new(ConceptEmbedder)).unwrap()
}

#[tokio::test]
async fn test_network_and_recharge_complaint() {
    let text = "Mera internet bahut slow hai aur 500 rupees ka recharge bhi nahi ho raha";

    for (classifier, path) in [
        (keyword_classifier(), ClassificationPath::Keyword),
        (semantic_classifier(), ClassificationPath::Semantic),
    ] {
        let result = classifier.classify_query(text).await;

        assert_eq!(result.path(), path);
        assert_eq!(
            result.tags(),
            &[IntentLabel::NetworkIssue, IntentLabel::RechargeRequest]
        );
        assert_eq!(result.primary_intent(), IntentLabel::NetworkIssue);
        assert_eq!(result.priority(), PriorityLevel::High);
        assert_eq!(result.category(), Category::Grievance);
        assert_eq!(result.routing_target(), "technical_support");

        let entities = result.entities();
        assert_eq!(entities.get(EntityType::Service), Some("internet"));
        assert_eq!(entities.get(EntityType::Issue), Some("slow"));
        assert_eq!(entities.get(EntityType::Amount), Some("500"));
        assert_eq!(entities.len(), 3);
    }
}

#[tokio::test]
async fn test_semantic_confidence_is_cosine() {
    let result = semantic_classifier()
        .classify_query("Mera internet bahut slow hai aur 500 rupees ka recharge bhi nahi ho raha")
        .await;

    // Two network concepts and one recharge concept.
    let intents = result.intents();
    assert!((intents[0].score - 2.0 / 5f32.sqrt()).abs() < 1e-5);
    assert!((intents[1].score - 1.0 / 5f32.sqrt()).abs() < 1e-5);
    assert_eq!(result.confidence(), intents[0].score);
    assert!(result.degraded_reason().is_none());
}

#[tokio::test]
async fn test_balance_query() {
    for classifier in [keyword_classifier(), semantic_classifier()] {
        let result = classifier.classify_query("Kitna data bacha hai?").await;

        assert_eq!(result.primary_intent(), IntentLabel::BalanceQuery);
        assert_eq!(result.priority(), PriorityLevel::Low);
        assert_eq!(result.category(), Category::Query);
        assert_eq!(result.routing_target(), "automated_system");

        // "data" is part of the service vocabulary; nothing else is extracted.
        let entities = result.entities();
        assert!(!entities.contains(EntityType::Amount));
        assert!(!entities.contains(EntityType::Issue));
        assert!(!entities.contains(EntityType::PlanName));
        assert!(!entities.contains(EntityType::Timeframe));
    }
}

#[tokio::test]
async fn test_billing_complaint() {
    for classifier in [keyword_classifier(), semantic_classifier()] {
        let result = classifier
            .classify_query("Bill mein 200 rupees extra charge hai")
            .await;

        assert_eq!(result.primary_intent(), IntentLabel::BillingComplaint);
        assert_eq!(result.priority(), PriorityLevel::High);
        assert_eq!(result.category(), Category::Grievance);
        assert_eq!(result.routing_target(), "billing_team");
        assert_eq!(result.department(), "Billing Department");

        let entities = result.entities();
        assert_eq!(entities.get(EntityType::Amount), Some("200"));
        assert_eq!(entities.get(EntityType::Issue), Some("extra charge"));
        assert_eq!(entities.len(), 2);
    }
}

#[tokio::test]
async fn test_empty_input() {
    for classifier in [keyword_classifier(), semantic_classifier()] {
        let result = classifier.classify_query("").await;

        assert_eq!(result.primary_intent(), IntentLabel::SupportRequest);
        assert_eq!(result.tags(), &[IntentLabel::SupportRequest]);
        assert!(result.entities().is_empty());
        assert_eq!(result.priority(), PriorityLevel::Low);
        assert_eq!(result.category(), Category::Query);
        assert_eq!(result.path(), ClassificationPath::EmptyInput);
    }
}

#[tokio::test]
async fn test_sim_problem_without_backend() {
    let result = keyword_classifier()
        .classify_query("SIM card kaam nahi kar raha")
        .await;

    assert_eq!(result.path(), ClassificationPath::Keyword);
    assert_eq!(result.primary_intent(), IntentLabel::TechnicalSupport);
    assert_eq!(result.priority(), PriorityLevel::High);
    assert_eq!(result.category(), Category::Grievance);
    assert_eq!(result.entities().get(EntityType::Device), Some("sim card"));
    assert_eq!(
        result.entities().get(EntityType::Issue),
        Some("kaam nahi kar raha")
    );
    assert_eq!(
        keyword_classifier()
            .priority_resolver()
            .urgent_keyword("SIM card kaam nahi kar raha"),
        Some("kaam nahi kar raha")
    );
}

#[tokio::test]
async fn test_failing_backend_degrades_to_keywords() {
    let classifier =
        TicketClassifier::with_embedder(TriageConfig::default(), Arc::new(FailingEmbedder))
            .unwrap();

    assert!(classifier.warm_up().await.is_err());

    let result = classifier.classify_query("SIM card kaam nahi kar raha").await;
    assert_eq!(result.path(), ClassificationPath::Keyword);
    assert_eq!(result.primary_intent(), IntentLabel::TechnicalSupport);
    assert!(
        result
            .degraded_reason()
            .unwrap()
            .contains("connection refused")
    );
}

#[tokio::test]
async fn test_slow_backend_times_out_to_keywords() {
    let mut config = TriageConfig::default();
    config.embedding.timeout_ms = 50;
    let classifier = TicketClassifier::with_embedder(
        config,
        Arc::new(SlowEmbedder {
            delay: Duration::from_millis(500),
        }),
    )
    .unwrap();

    let result = classifier
        .classify_query("Bill mein 200 rupees extra charge hai")
        .await;

    assert_eq!(result.path(), ClassificationPath::Keyword);
    assert_eq!(result.primary_intent(), IntentLabel::BillingComplaint);
    assert!(result.degraded_reason().unwrap().contains("longer than"));
}

#[tokio::test]
async fn test_nothing_over_threshold_falls_back() {
    let result = semantic_classifier().classify_query("namaste ji").await;

    assert_eq!(result.path(), ClassificationPath::Keyword);
    assert_eq!(result.primary_intent(), IntentLabel::SupportRequest);
    assert_eq!(result.confidence(), 0.0);
    assert!(result.degraded_reason().unwrap().contains("threshold"));
    assert_eq!(result.priority(), PriorityLevel::Medium);
}

#[tokio::test]
async fn test_plan_change_with_plan_name() {
    let result = keyword_classifier()
        .classify_query("I want to upgrade to Jio Premium")
        .await;

    assert_eq!(result.primary_intent(), IntentLabel::PlanChange);
    assert_eq!(result.priority(), PriorityLevel::Medium);
    assert_eq!(result.routing_target(), "sales_team");
    assert_eq!(
        result.entities().get(EntityType::PlanName),
        Some("Jio Premium")
    );
}

#[tokio::test]
async fn test_ticket_seeds() {
    let classifier = keyword_classifier();

    let grievance = classifier
        .classify_query("network down since morning")
        .await;
    let seed = TicketSeed::from_result(&grievance);
    assert_eq!(seed.status, TicketStatus::Open);
    assert_eq!(seed.department, "Network Operations");
    assert_eq!(seed.entities.get(EntityType::Timeframe), Some("since morning"));

    let query = classifier.classify_query("koi cashback offer hai?").await;
    let seed = TicketSeed::from_result(&query);
    assert_eq!(seed.category, Category::Query);
    assert_eq!(seed.status, TicketStatus::Resolved);
    assert_eq!(seed.complaint_type, IntentLabel::OfferInquiry);
}
