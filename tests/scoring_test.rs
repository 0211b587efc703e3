//! Tests for the relevance rule set

use chrono::{Duration, TimeZone, Utc};
use media_search_core::error::AppError;
use media_search_core::query::QueryNode;
use media_search_core::scoring::{
    BoostMode, ExistenceBoost, RelevanceScorer, ScoreMode, ScoringConfig, ScoringDocument,
    TermBoost,
};

fn config() -> ScoringConfig {
    let mut config = ScoringConfig::default();
    config.existence = ExistenceBoost {
        field: "locations".to_string(),
        boost: 2.0,
    };
    config.term_boosts = vec![
        TermBoost {
            field: "type".to_string(),
            value: "BROADCAST".to_string(),
            boost: 1.5,
        },
        TermBoost {
            field: "avType".to_string(),
            value: "VIDEO".to_string(),
            boost: 0.5,
        },
    ];
    config.decay.field = "sortDate".to_string();
    config.decay.scale_secs = 10 * 24 * 3600;
    config.decay.offset_secs = 24 * 3600;
    config.decay.decay = 0.5;
    config.max_boost = 10.0;
    config
}

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

#[test]
fn test_rules_sum_then_multiply() {
    let query = RelevanceScorer::new(&config()).unwrap().wrap(QueryNode::match_all());
    assert_eq!(query.score_mode, ScoreMode::Sum);
    assert_eq!(query.boost_mode, BoostMode::Multiply);

    let doc = ScoringDocument::new("VPRO_1")
        .with_value("locations", "https://example.org/a.mp4")
        .with_value("type", "BROADCAST")
        .with_value("avType", "VIDEO")
        .with_date("sortDate", now() - Duration::hours(2));

    // existence 2.0 + type 1.5 + avType 0.5 + fresh decay 1.0
    let multiplier = query.multiplier(&doc, now());
    assert!((multiplier - 5.0).abs() < 1e-9);
    // multiplied into the base score, not added to it
    assert!((query.score(3.0, &doc, now()) - 15.0).abs() < 1e-9);
}

#[test]
fn test_only_matching_rules_contribute() {
    let query = RelevanceScorer::new(&config()).unwrap().wrap(QueryNode::match_all());
    let doc = ScoringDocument::new("VPRO_2")
        .with_value("type", "CLIP")
        .with_date("sortDate", now() - Duration::days(11));

    // Only the decay applies, at the configured decay value
    let multiplier = query.multiplier(&doc, now());
    assert!((multiplier - 0.5).abs() < 1e-9);
}

#[test]
fn test_multiplier_never_exceeds_max_boost() {
    let mut capped = config();
    capped.max_boost = 2.5;
    let query = RelevanceScorer::new(&capped).unwrap().wrap(QueryNode::match_all());

    let variants = [
        ScoringDocument::new("a"),
        ScoringDocument::new("b").with_value("locations", "x"),
        ScoringDocument::new("c")
            .with_value("locations", "x")
            .with_value("type", "BROADCAST")
            .with_value("avType", "VIDEO"),
        ScoringDocument::new("d")
            .with_value("type", "BROADCAST")
            .with_date("sortDate", now() + Duration::days(400)),
    ];
    for doc in &variants {
        for offset_days in [-1000, -30, -1, 0, 1, 30, 1000] {
            let at = now() + Duration::days(offset_days);
            let multiplier = query.multiplier(doc, at);
            assert!(multiplier <= 2.5, "{} at {}: {}", doc.id, at, multiplier);
            assert!(multiplier >= 0.0);
        }
    }
}

#[test]
fn test_invalid_rule_parameters_rejected() {
    let mut bad_decay = config();
    bad_decay.decay.decay = 1.5;
    assert!(matches!(
        RelevanceScorer::new(&bad_decay),
        Err(AppError::InvalidArgument(_))
    ));

    let mut bad_scale = config();
    bad_scale.decay.scale_secs = 0;
    assert!(RelevanceScorer::new(&bad_scale).is_err());

    let mut bad_max = config();
    bad_max.max_boost = -1.0;
    assert!(RelevanceScorer::new(&bad_max).is_err());
}

#[test]
fn test_wrapped_query_shape() {
    let base = QueryNode::term("type", "CLIP");
    let wrapped = RelevanceScorer::new(&ScoringConfig::default())
        .unwrap()
        .wrap(base.clone());
    assert_eq!(wrapped.query, base);

    let json = serde_json::to_value(&wrapped).unwrap();
    assert_eq!(json["functions"][0]["weight"]["filter"]["exists"]["field"], "locations.programUrl");
    assert_eq!(json["functions"][3]["gauss"]["origin"], "now");
    assert_eq!(json["max_boost"], 4.0);
}

#[test]
fn test_deterministic_given_now() {
    let query = RelevanceScorer::new(&config()).unwrap().wrap(QueryNode::match_all());
    let doc = ScoringDocument::new("e").with_date("sortDate", now() - Duration::days(20));
    assert_eq!(query.multiplier(&doc, now()), query.multiplier(&doc, now()));
}
