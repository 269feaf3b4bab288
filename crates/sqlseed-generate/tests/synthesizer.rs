use std::sync::Arc;
use std::time::Duration;

use sqlseed_core::{ColumnDescriptor, Value};
use sqlseed_generate::{
    AttemptFailure, ExhaustedPolicy, GenerateOptions, ScriptedBackend, SynthesisError, ValueSource,
    ValueSynthesizer,
};

fn column(name: &str, declared_type: &str, pk: bool) -> ColumnDescriptor {
    ColumnDescriptor {
        ordinal_position: 0,
        name: name.to_string(),
        declared_type: declared_type.to_string(),
        is_primary_key: pk,
        is_not_null: false,
        default: None,
    }
}

fn fast_options() -> GenerateOptions {
    GenerateOptions {
        retry_delay_ms: 0,
        timeout_ms: 1_000,
        pause_every_rows: 0,
        ..GenerateOptions::default()
    }
}

#[tokio::test]
async fn integer_primary_key_skips_backend() {
    let backend = Arc::new(ScriptedBackend::always("ignored"));
    let synthesizer = ValueSynthesizer::new(backend.clone(), fast_options());
    let id = column("id", "INTEGER", true);

    for row_index in [0_u64, 1, 7, 99] {
        let synthesized = synthesizer
            .synthesize(&id, row_index)
            .await
            .expect("pk value");
        assert_eq!(synthesized.value, Value::Int(row_index as i64 + 1));
        assert_eq!(synthesized.source, ValueSource::PrimaryKey);
        assert_eq!(synthesized.attempts, 0);
    }
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn text_primary_key_is_synthesized() {
    let backend = Arc::new(ScriptedBackend::always("SKU-1"));
    let synthesizer = ValueSynthesizer::new(backend.clone(), fast_options());

    let synthesized = synthesizer
        .synthesize(&column("code", "TEXT", true), 0)
        .await
        .expect("text pk");
    assert_eq!(synthesized.value, Value::Text("SKU-1".to_string()));
    assert_eq!(backend.calls(), 1);
}

#[tokio::test]
async fn retries_until_a_token_parses() {
    let backend = Arc::new(ScriptedBackend::sequence(["abc", "", "37 years"]));
    let synthesizer = ValueSynthesizer::new(backend.clone(), fast_options());

    let synthesized = synthesizer
        .synthesize(&column("age", "INTEGER", false), 0)
        .await
        .expect("third attempt parses");
    assert_eq!(synthesized.value, Value::Int(37));
    assert_eq!(synthesized.source, ValueSource::Model);
    assert_eq!(synthesized.attempts, 3);
    assert_eq!(backend.calls(), 3);
    assert!(backend.prompts().iter().all(|prompt| prompt == "34\n"));
}

#[tokio::test]
async fn unparsable_decimal_exhausts_after_five_attempts() {
    let backend = Arc::new(ScriptedBackend::always("not-a-number"));
    let synthesizer = ValueSynthesizer::new(backend.clone(), fast_options());

    let err = synthesizer
        .synthesize(&column("salary", "REAL", false), 3)
        .await
        .expect_err("must fail closed");

    let SynthesisError::Exhausted {
        column,
        row_index,
        attempts,
        last_cause,
    } = err
    else {
        panic!("expected exhaustion");
    };
    assert_eq!(column, "salary");
    assert_eq!(row_index, 3);
    assert_eq!(attempts, 5);
    assert!(matches!(last_cause, AttemptFailure::TypeMismatch { .. }));
    assert_eq!(backend.calls(), 5);
}

#[tokio::test]
async fn slow_backend_times_out_each_attempt() {
    let backend =
        Arc::new(ScriptedBackend::always("Bob").with_delay(Duration::from_millis(500)));
    let options = GenerateOptions {
        max_attempts: 2,
        timeout_ms: 20,
        ..fast_options()
    };
    let synthesizer = ValueSynthesizer::new(backend.clone(), options);

    let err = synthesizer
        .synthesize(&column("name", "TEXT", false), 0)
        .await
        .expect_err("every attempt times out");

    let SynthesisError::Exhausted { last_cause, .. } = err else {
        panic!("expected exhaustion");
    };
    assert!(matches!(last_cause, AttemptFailure::Timeout(_)));
    assert_eq!(backend.calls(), 2);
}

#[tokio::test]
async fn substitute_mock_policy_fills_value_of_declared_kind() {
    let backend = Arc::new(ScriptedBackend::always("???"));
    let options = GenerateOptions {
        on_exhausted: ExhaustedPolicy::SubstituteMock,
        ..fast_options()
    };
    let synthesizer = ValueSynthesizer::new(backend.clone(), options);

    let salary = synthesizer
        .synthesize(&column("salary", "REAL", false), 0)
        .await
        .expect("mock value");
    assert_eq!(salary.source, ValueSource::Mock);
    assert!(matches!(salary.value, Value::Decimal(_)));

    let quantity = synthesizer
        .synthesize(&column("quantity", "INT", false), 0)
        .await
        .expect("mock value");
    assert!(matches!(quantity.value, Value::Int(_)));

    let again = synthesizer
        .synthesize(&column("salary", "REAL", false), 0)
        .await
        .expect("mock value");
    assert_eq!(again.value, salary.value, "mock values are deterministic");
}

#[tokio::test]
async fn backend_errors_count_as_failed_attempts() {
    let backend = Arc::new(ScriptedBackend::sequence(Vec::<String>::new()));
    let synthesizer = ValueSynthesizer::new(backend.clone(), fast_options());

    let err = synthesizer
        .synthesize(&column("city", "TEXT", false), 0)
        .await
        .expect_err("empty script always errors");
    let SynthesisError::Exhausted { last_cause, .. } = err else {
        panic!("expected exhaustion");
    };
    assert!(matches!(last_cause, AttemptFailure::Backend(_)));
    assert_eq!(backend.calls(), 5);
}

#[tokio::test]
async fn integer_primary_key_near_i64_max_does_not_wrap() {
    let backend = Arc::new(ScriptedBackend::always("ignored"));
    let synthesizer = ValueSynthesizer::new(backend.clone(), fast_options());
    let id = column("id", "INTEGER", true);

    let last = synthesizer
        .synthesize(&id, i64::MAX as u64 - 1)
        .await
        .expect("largest key");
    assert_eq!(last.value, Value::Int(i64::MAX));

    for row_index in [i64::MAX as u64, u64::MAX] {
        let err = synthesizer
            .synthesize(&id, row_index)
            .await
            .expect_err("key out of range");
        assert!(matches!(
            err,
            SynthesisError::KeyOverflow { ref column, row_index: index }
                if column == "id" && index == row_index
        ));
    }
    assert_eq!(backend.calls(), 0);
}
