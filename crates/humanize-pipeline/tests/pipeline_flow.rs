use std::sync::Arc;
use std::time::Duration;

use humanize_pipeline::{
    mocks, HashingEmbedder, HumanizeError, Humanizer, ModelError, ModelRegistry, NullSink,
    PipelineConfig, RecordingSink, RuleParser, ScriptedGenerator, StageOutcome,
};
use humanize_types::{HumanizationRequest, PipelineStep, ProgressEvent, StyleProfile};

fn humanizer_with(structural: ScriptedGenerator, authenticity: ScriptedGenerator) -> Humanizer {
    let models = Arc::new(mocks::registry_with(structural, authenticity));
    Humanizer::new(
        models,
        PipelineConfig {
            voice_seed: Some(11),
            ..PipelineConfig::default()
        },
    )
}

#[tokio::test]
async fn short_text_only_gets_vocabulary_changes() {
    let structural = ScriptedGenerator::echo();
    let humanizer = humanizer_with(structural.clone(), ScriptedGenerator::passthrough());
    let sink = RecordingSink::new();

    let input = "We utilize the shared cluster for builds. \
                 The team reviews failures every single morning. \
                 Most fixes land before lunch on weekdays.";
    let outcome = humanizer
        .humanize(HumanizationRequest::new(input, "writer-1"), &sink)
        .await
        .unwrap();

    let expected = input.replace("utilize", "use");
    assert_eq!(outcome.text, expected);
    assert!(outcome.similarity_score >= 0.85);
    assert!(!outcome.reverted);
    assert_eq!(structural.call_count(), 0);

    match sink.events().last() {
        Some(ProgressEvent::Complete {
            text,
            user_patterns,
            ..
        }) => {
            assert_eq!(text, &expected);
            assert_eq!(user_patterns.sentence_length_sample, vec![7, 7, 7]);
        }
        other => panic!("expected complete event, got {other:?}"),
    }
}

#[tokio::test]
async fn progress_order_without_profile() {
    let humanizer = humanizer_with(ScriptedGenerator::echo(), ScriptedGenerator::passthrough());
    let sink = RecordingSink::new();
    humanizer
        .humanize(HumanizationRequest::new("A plain sentence.", ""), &sink)
        .await
        .unwrap();

    let mut expected = vec![PipelineStep::Analyzing];
    expected.extend(humanize_pipeline::TRANSFORM_ORDER);
    expected.push(PipelineStep::Coherence);
    assert_eq!(sink.steps(), expected);
    assert!(sink.events().last().unwrap().is_terminal());
}

#[tokio::test]
async fn progress_order_with_profile() {
    let humanizer = humanizer_with(ScriptedGenerator::echo(), ScriptedGenerator::passthrough());
    let sink = RecordingSink::new();
    let profile = StyleProfile::default().with_common_phrases(["to be honest"]);
    let request = HumanizationRequest::new("A plain sentence.", "").with_patterns(profile.clone());

    let outcome = humanizer.humanize(request, &sink).await.unwrap();
    assert_eq!(sink.steps().first(), Some(&PipelineStep::Structural));
    assert!(!sink.steps().contains(&PipelineStep::Analyzing));
    assert_eq!(outcome.profile, profile);
}

#[tokio::test]
async fn unrelated_rewrite_is_reverted() {
    let humanizer = humanizer_with(
        ScriptedGenerator::echo(),
        ScriptedGenerator::fixed("Penguins swim quickly through icy water."),
    );
    let input = "The committee approved the annual budget on Tuesday.";
    let outcome = humanizer
        .humanize(HumanizationRequest::new(input, ""), &NullSink)
        .await
        .unwrap();

    assert!(outcome.reverted);
    assert_eq!(outcome.text, input);
    assert!(outcome.similarity_score < 0.85);
}

#[tokio::test]
async fn generation_failure_ends_with_error_event() {
    let humanizer = humanizer_with(
        ScriptedGenerator::echo(),
        ScriptedGenerator::failing("connection refused"),
    );
    let sink = RecordingSink::new();
    let err = humanizer
        .humanize(HumanizationRequest::new("Some text.", ""), &sink)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        HumanizeError::GenerationFailure {
            step: PipelineStep::Authenticity,
            ..
        }
    ));
    let events = sink.events();
    assert!(matches!(events.last(), Some(ProgressEvent::Error { message }) if message.contains("connection refused")));
    assert!(!events
        .iter()
        .any(|event| matches!(event, ProgressEvent::Complete { .. })));
    assert!(!sink.steps().contains(&PipelineStep::Voice));
}

#[tokio::test(start_paused = true)]
async fn slow_model_times_out() {
    let models = Arc::new(mocks::registry_with(
        ScriptedGenerator::echo(),
        ScriptedGenerator::passthrough().with_delay(Duration::from_secs(600)),
    ));
    let humanizer = Humanizer::new(
        models,
        PipelineConfig {
            model_timeout: Duration::from_secs(2),
            ..PipelineConfig::default()
        },
    );

    let err = humanizer
        .humanize(HumanizationRequest::new("Quick one.", ""), &NullSink)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        HumanizeError::GenerationFailure {
            source: ModelError::Timeout(_),
            ..
        }
    ));
}

#[tokio::test]
async fn missing_generator_is_model_unavailable() {
    let models = ModelRegistry::builder()
        .parser(Arc::new(RuleParser::new()))
        .embedder(Arc::new(HashingEmbedder::default()))
        .build();
    let humanizer = Humanizer::new(Arc::new(models), PipelineConfig::default());
    let err = humanizer
        .humanize(HumanizationRequest::new("Some text.", ""), &NullSink)
        .await
        .unwrap_err();
    assert!(matches!(err, HumanizeError::ModelUnavailable(_)));
}

#[tokio::test]
async fn empty_authenticity_result_falls_back() {
    let humanizer = humanizer_with(ScriptedGenerator::echo(), ScriptedGenerator::fixed(""));
    let outcome = humanizer
        .humanize(HumanizationRequest::new("It does implement things.", ""), &NullSink)
        .await
        .unwrap();

    assert!(outcome
        .stages
        .iter()
        .any(|(step, result)| *step == PipelineStep::Authenticity
            && matches!(result, StageOutcome::FellBack(_))));
    assert_eq!(outcome.stages[1], (PipelineStep::Vocabulary, StageOutcome::Applied));
}

#[tokio::test]
async fn concurrent_requests_share_models() {
    let humanizer = Arc::new(humanizer_with(
        ScriptedGenerator::echo(),
        ScriptedGenerator::passthrough(),
    ));
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let humanizer = humanizer.clone();
            tokio::spawn(async move {
                let text = format!("Request number {i} should facilitate progress.");
                humanizer
                    .humanize(HumanizationRequest::new(text, ""), &NullSink)
                    .await
            })
        })
        .collect();

    for handle in handles {
        let outcome = handle.await.unwrap().unwrap();
        assert!(!outcome.text.contains("facilitate") || outcome.reverted);
    }
}
