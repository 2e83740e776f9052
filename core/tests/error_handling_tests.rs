// tests/error_handling_tests.rs
mod common;

use checkout::{CheckoutError, ContextData, Pipeline, PipelineControl, PipelineResult};
use common::*;
use serial_test::serial;

#[tokio::test]
#[serial]
async fn test_pipeline_run_catches_handler_missing() {
  setup_tracing();
  let pipeline = Pipeline::<StepTrace, TestError>::new(&[("missing", false, None)]);
  let result = pipeline.run(ContextData::new(StepTrace::default())).await;
  match result {
    Err(TestError::Checkout(s)) => {
      assert!(s.contains("HandlerMissing"));
      assert!(s.contains("missing"));
    }
    other => panic!("Expected TestError::Checkout(HandlerMissing), got {:?}", other),
  }
}

#[tokio::test]
#[serial]
async fn test_pipeline_with_checkout_error_type() {
  setup_tracing();
  let mut pipeline = Pipeline::<StepTrace, CheckoutError>::new(&[("task", false, None)]);
  pipeline.on_root("task", |ctx: ContextData<StepTrace>| {
    Box::pin(async move {
      ctx.write().visited.push("task".to_string());
      Ok::<PipelineControl, CheckoutError>(PipelineControl::Continue)
    })
  });
  let ctx = ContextData::new(StepTrace::default());
  assert!(matches!(pipeline.run(ctx.clone()).await, Ok(PipelineResult::Completed)));
  assert_eq!(ctx.read().visited, vec!["task"]);

  let mut failing = Pipeline::<StepTrace, CheckoutError>::new(&[("fail_task", false, None)]);
  failing.on_root("fail_task", |_ctx| {
    Box::pin(async move { Err(CheckoutError::Internal("Intentional failure".to_string())) })
  });
  match failing.run(ContextData::new(StepTrace::default())).await {
    Err(CheckoutError::Internal(s)) => assert_eq!(s, "Intentional failure"),
    other => panic!("Expected CheckoutError::Internal, got {:?}", other),
  }
}

#[tokio::test]
#[serial]
async fn test_anyhow_errors_convert_to_handler_error() {
  setup_tracing();
  let mut pipeline = Pipeline::<StepTrace, CheckoutError>::new(&[("lookup", false, None)]);
  pipeline.on_root("lookup", |_ctx: ContextData<StepTrace>| {
    Box::pin(async move { Err::<PipelineControl, _>(anyhow::anyhow!("lookup table unavailable")) })
  });

  let err = pipeline
    .run(ContextData::new(StepTrace::default()))
    .await
    .unwrap_err();
  assert!(matches!(err, CheckoutError::HandlerError { .. }));
  assert!(err.to_string().contains("lookup table unavailable"));
}

#[test]
fn test_gateway_error_keeps_source() {
  let err = CheckoutError::gateway("activeOrder", anyhow::anyhow!("connection reset"));
  assert_eq!(
    err.to_string(),
    "Gateway call 'activeOrder' failed. Source: connection reset"
  );
  let source = std::error::Error::source(&err).map(|s| s.to_string());
  assert_eq!(source.as_deref(), Some("connection reset"));
}

#[test]
fn test_user_facing_messages() {
  assert_eq!(
    CheckoutError::UnknownAction {
      action: Some("applyCoupon".to_string())
    }
    .to_string(),
    "Unknown checkout action: Some(\"applyCoupon\")"
  );
  assert_eq!(
    CheckoutError::PaymentNotReady {
      reason: "incomplete steps: shipping".to_string()
    }
    .to_string(),
    "Cannot proceed to payment: incomplete steps: shipping"
  );
}
