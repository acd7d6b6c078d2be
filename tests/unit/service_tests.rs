/*!
 * Tests for the per-window translation service: prompts, retry, and
 * response mapping
 */

use aquarelle::errors::TranslationError;
use aquarelle::glossary::Glossary;
use aquarelle::phase::PhaseLabel;
use aquarelle::providers::{MockBehavior, MockProvider};
use aquarelle::subtitle_processor::SubtitleCollection;
use aquarelle::translation::document::SubtitleDocument;
use aquarelle::translation::planner::Window;
use aquarelle::translation::service::{RetryPolicy, TranslationService};
use crate::common;
use crate::common::mock_providers::RecordingProvider;

fn document(cues: usize) -> SubtitleDocument {
    let texts = common::neutral_texts(cues);
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    let collection = SubtitleCollection::new("test.srt".into(), common::entries_from_texts(&refs));
    SubtitleDocument::from_collection(&collection)
}

fn window(range: std::ops::Range<usize>, core: std::ops::Range<usize>) -> Window {
    Window {
        range,
        core,
        phase: PhaseLabel::Paint,
    }
}

fn fast_retry(retry_count: usize) -> RetryPolicy {
    RetryPolicy {
        retry_count,
        retry_backoff_ms: 1,
    }
}

#[tokio::test]
async fn test_translateWindow_withWorkingProvider_shouldMapCoreCues() {
    let service = TranslationService::new(MockProvider::new(MockBehavior::Working), fast_retry(0));
    let doc = document(10);

    let result = service
        .translate_window(&doc, &window(0..8, 3..8), 0, &Glossary::new())
        .await
        .unwrap();

    assert_eq!(result.window_index, 0);
    let ids: Vec<usize> = result.translations.iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, vec![4, 5, 6, 7, 8]);
    assert_eq!(result.translations[0].1, "translated 4");
}

#[tokio::test]
async fn test_translateWindow_withIntermittentProvider_shouldRetryAndSucceed() {
    let provider = MockProvider::new(MockBehavior::Intermittent { fail_every: 3 });
    let service = TranslationService::new(provider, fast_retry(3));
    let doc = document(6);

    // Calls 3 and 6 fail; every window still completes within the retry budget
    for i in 0..4 {
        let result = service
            .translate_window(&doc, &window(0..6, 0..6), i, &Glossary::new())
            .await;
        assert!(result.is_ok(), "window {} failed: {:?}", i, result.err());
    }
}

#[tokio::test]
async fn test_translateWindow_withAlwaysFailingProvider_shouldExhaustRetries() {
    let provider = MockProvider::new(MockBehavior::Failing);
    let service = TranslationService::new(provider, fast_retry(2));
    let doc = document(4);

    let result = service
        .translate_window(&doc, &window(0..4, 0..4), 0, &Glossary::new())
        .await;

    assert!(matches!(result, Err(TranslationError::Provider(_))));
    // First attempt plus two retries
    assert_eq!(service.provider().call_count(), 3);
}

#[tokio::test]
async fn test_translateWindow_withCountMismatch_shouldFailWithoutRetry() {
    let provider = MockProvider::new(MockBehavior::CountMismatch);
    let service = TranslationService::new(provider, fast_retry(3));
    let doc = document(5);

    let result = service
        .translate_window(&doc, &window(0..5, 0..5), 2, &Glossary::new())
        .await;

    match result {
        Err(TranslationError::CountMismatch { window, expected, actual }) => {
            assert_eq!(window, 2);
            assert_eq!(expected, 5);
            assert_eq!(actual, 4);
        }
        other => panic!("expected CountMismatch, got: {:?}", other),
    }
    // A mismatched response is not retried
    assert_eq!(service.provider().call_count(), 1);
}

#[tokio::test]
async fn test_translateWindow_withMalformedResponse_shouldFailWithoutRetry() {
    let provider = MockProvider::new(MockBehavior::Malformed);
    let service = TranslationService::new(provider, fast_retry(3));
    let doc = document(3);

    let result = service
        .translate_window(&doc, &window(0..3, 0..3), 0, &Glossary::new())
        .await;

    assert!(matches!(result, Err(TranslationError::Provider(_))));
    assert_eq!(service.provider().call_count(), 1);
}

#[tokio::test]
async fn test_translateWindow_shouldSendContextAndPhaseConditionedPrompt() {
    let provider = RecordingProvider::new();
    let service = TranslationService::new(provider, fast_retry(0));
    let doc = document(10);

    service
        .translate_window(&doc, &window(2..8, 4..8), 0, &Glossary::new())
        .await
        .unwrap();

    let prompts = service.provider().prompts();
    assert_eq!(prompts.len(), 1);
    let (system, user) = &prompts[0];

    assert!(system.contains("PAINT phase"));
    // Context cues 3 and 4 precede the translate marker; cores follow it
    let marker = user.find("Translate these lines:").unwrap();
    assert!(user.find("[3]").unwrap() < marker);
    assert!(user.find("[5]").unwrap() > marker);
    assert!(user.contains("[8]"));
}

#[tokio::test]
async fn test_translateWindow_withGlossary_shouldIncludeApplicableTermsOnly() {
    let provider = RecordingProvider::new();
    let service = TranslationService::new(provider, fast_retry(0));

    let texts = vec!["从浅到深晕染", "注意留白"];
    let collection =
        SubtitleCollection::new("test.srt".into(), common::entries_from_texts(&texts));
    let doc = SubtitleDocument::from_collection(&collection);

    let glossary = Glossary::parse_csv(
        "Chinese,English\n晕染,wet blending\n没出现的词,unused term\n",
    )
    .unwrap();

    service
        .translate_window(&doc, &window(0..2, 0..2), 0, &glossary)
        .await
        .unwrap();

    let (system, _) = &service.provider().prompts()[0];
    assert!(system.contains("晕染 -> wet blending"));
    assert!(!system.contains("unused term"));
}
