use async_trait::async_trait;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use relay_core::{RelayError, SupportedModel};
use relay_llm::llm::groq::GroqBackend;
use relay_llm::llm::lazy::LazyCompletionClient;
use relay_llm::template::InMemoryTemplates;
use relay_llm::chat::FALLBACK_REPLY;
use relay_llm::{
    ChatAssistant, ChatRequest, CompletionBackend, CompletionConfig, ComposedPrompt,
    GenerationParams, PromptOptimizer, ReverseAnalyzer, ReverseRequest,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 记录下来的上游请求 (Authorization 头, 请求体)
type Seen = Arc<Mutex<Vec<(Option<String>, Value)>>>;

/// 启动一个假的 OpenAI 兼容服务，返回 base_url 和收到的请求
async fn spawn_fake_upstream(status: StatusCode, reply: Value) -> (String, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let seen_in_handler = seen.clone();

    let app = Router::new().route(
        "/v1/chat/completions",
        post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let seen = seen_in_handler.clone();
            let reply = reply.clone();
            async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                seen.lock().unwrap().push((auth, body));
                (status, Json(reply))
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/v1/", addr), seen)
}

fn completion(content: Value) -> Value {
    json!({
        "id": "chatcmpl-test",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
    })
}

fn config(base_url: &str) -> CompletionConfig {
    CompletionConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
        ..CompletionConfig::default()
    }
}

#[tokio::test]
async fn groq_backend_sends_openai_request_and_cleans_reply() {
    let (base_url, seen) = spawn_fake_upstream(
        StatusCode::OK,
        completion(json!("```\nA tabby cat, studio lighting --ar 3:2\n```")),
    )
    .await;
    let backend = GroqBackend::new("test-key", &config(&base_url)).unwrap();

    let text = backend
        .complete(
            ComposedPrompt::Text("Rewrite for Midjourney:\n\nUSER PROMPT:\na cat".into()),
            GenerationParams::new(0.7, Some(2000)),
        )
        .await
        .unwrap();
    assert_eq!(text, "A tabby cat, studio lighting --ar 3:2");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let (auth, body) = &seen[0];
    assert_eq!(auth.as_deref(), Some("Bearer test-key"));
    assert_eq!(body["model"], "llama-3.1-8b-instant");
    assert_eq!(body["max_tokens"], 2000);
    assert_eq!(body["messages"][0]["role"], "user");
    assert_eq!(
        body["messages"][0]["content"],
        "Rewrite for Midjourney:\n\nUSER PROMPT:\na cat"
    );
    assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
}

#[tokio::test]
async fn non_success_status_is_upstream_error() {
    let (base_url, _) = spawn_fake_upstream(
        StatusCode::TOO_MANY_REQUESTS,
        json!({"error": {"message": "rate limited"}}),
    )
    .await;
    let backend = GroqBackend::new("test-key", &config(&base_url)).unwrap();

    let err = backend
        .complete(ComposedPrompt::Text("hi".into()), GenerationParams::default())
        .await
        .unwrap_err();
    let RelayError::Upstream(message) = err else {
        panic!("expected upstream error, got {:?}", err);
    };
    assert!(message.contains("429"));
    assert!(message.contains("rate limited"));
}

#[tokio::test]
async fn null_or_missing_content_is_empty_completion() {
    for reply in [completion(Value::Null), completion(json!("   ")), json!({"choices": []})] {
        let (base_url, _) = spawn_fake_upstream(StatusCode::OK, reply).await;
        let backend = GroqBackend::new("test-key", &config(&base_url)).unwrap();
        let result = backend
            .complete(ComposedPrompt::Text("hi".into()), GenerationParams::default())
            .await;
        assert_eq!(result, Err(RelayError::EmptyCompletion));
    }
}

#[tokio::test]
async fn unreachable_upstream_is_upstream_error() {
    // 端口 9 (discard) 本地通常没有服务
    let backend = GroqBackend::new("test-key", &config("http://127.0.0.1:9")).unwrap();
    let result = backend
        .complete(ComposedPrompt::Text("hi".into()), GenerationParams::default())
        .await;
    assert!(matches!(result, Err(RelayError::Upstream(_))));
}

#[tokio::test]
async fn lazy_client_builds_once_from_env() {
    let (base_url, seen) = spawn_fake_upstream(StatusCode::OK, completion(json!("ok"))).await;
    let var = "RELAY_LLM_TEST_LAZY_KEY";
    std::env::set_var(var, "lazy-key");

    let client = Arc::new(LazyCompletionClient::new(CompletionConfig {
        api_key_env: var.to_string(),
        ..config(&base_url)
    }));
    assert!(!client.is_initialized());

    // 并发首次调用，只会构建一次
    let calls = (0..4).map(|_| {
        let client = client.clone();
        async move {
            client
                .complete(ComposedPrompt::Text("hi".into()), GenerationParams::default())
                .await
        }
    });
    for result in futures::future::join_all(calls).await {
        assert_eq!(result.unwrap(), "ok");
    }
    assert!(client.is_initialized());

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 4);
    assert!(seen.iter().all(|(auth, _)| auth.as_deref() == Some("Bearer lazy-key")));
}

/// 记录收到的 Prompt，并把 Prompt 原文作为补全结果返回
struct EchoBackend {
    delay: Duration,
    prompts: Mutex<Vec<ComposedPrompt>>,
}

#[async_trait]
impl CompletionBackend for EchoBackend {
    async fn complete(
        &self,
        prompt: ComposedPrompt,
        _params: GenerationParams,
    ) -> Result<String, RelayError> {
        self.prompts.lock().unwrap().push(prompt.clone());
        tokio::time::sleep(self.delay).await;
        Ok(prompt.text())
    }
}

#[tokio::test]
async fn optimizer_composes_template_with_prompt() {
    let backend = Arc::new(EchoBackend {
        delay: Duration::ZERO,
        prompts: Mutex::new(Vec::new()),
    });
    let templates = Arc::new(InMemoryTemplates::new([("midjourney", "Rewrite for Midjourney:")]));
    let optimizer = PromptOptimizer::new(templates, backend.clone(), GenerationParams::default());

    let out = optimizer.optimize(SupportedModel::Midjourney, "a cat").await.unwrap();
    assert!(out.contains("Rewrite for Midjourney:"));
    assert!(out.contains("a cat"));

    // 没有模板的模型返回 TemplateNotFound，不会调用补全服务
    let err = optimizer.optimize(SupportedModel::Sora, "a cat").await.unwrap_err();
    assert_eq!(err, RelayError::TemplateNotFound("sora".into()));
    assert_eq!(backend.prompts.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn concurrent_optimizations_do_not_cross_contaminate() {
    let backend = Arc::new(EchoBackend {
        delay: Duration::from_millis(20),
        prompts: Mutex::new(Vec::new()),
    });
    let templates = Arc::new(InMemoryTemplates::new([
        ("midjourney", "MJ TEMPLATE"),
        ("cursor", "CURSOR TEMPLATE"),
    ]));
    let optimizer = PromptOptimizer::new(templates, backend, GenerationParams::default());

    let (mj, cursor) = tokio::join!(
        optimizer.optimize(SupportedModel::Midjourney, "draw a fox"),
        optimizer.optimize(SupportedModel::Cursor, "refactor the parser"),
    );
    let (mj, cursor) = (mj.unwrap(), cursor.unwrap());

    assert!(mj.contains("MJ TEMPLATE") && mj.contains("draw a fox"));
    assert!(!mj.contains("CURSOR TEMPLATE") && !mj.contains("refactor the parser"));
    assert!(cursor.contains("CURSOR TEMPLATE") && cursor.contains("refactor the parser"));
    assert!(!cursor.contains("MJ TEMPLATE") && !cursor.contains("draw a fox"));
}

#[tokio::test]
async fn reverse_analyzer_round_trip_through_fake_upstream() {
    let analysis = json!({
        "reconstructed_prompt": "isometric city, neon",
        "style_breakdown": "synthwave",
        "tech_stack": ["Stable Diffusion XL"],
        "ai_probability": 0.92,
        "extra_notes": "likely upscaled"
    });
    let fenced = format!("```json\n{}\n```", analysis);
    let (base_url, seen) = spawn_fake_upstream(StatusCode::OK, completion(json!(fenced))).await;
    let backend = Arc::new(GroqBackend::new("test-key", &config(&base_url)).unwrap());
    let analyzer = ReverseAnalyzer::new(backend);

    let result = analyzer
        .analyze(&ReverseRequest {
            mode: "image".into(),
            target: "https://example.com/city.png".into(),
            notes: Some("poster".into()),
            creativity: 100,
            depth: 70,
            detect_ai: "strict".into(),
        })
        .await
        .unwrap();
    assert_eq!(result.reconstructed_prompt, "isometric city, neon");
    assert_eq!(result.tech_stack, Some(vec!["Stable Diffusion XL".to_string()]));
    assert_eq!(result.ai_probability, Some(0.92));

    let seen = seen.lock().unwrap();
    let body = &seen[0].1;
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["role"], "user");
    assert_eq!(body["temperature"].as_f64(), Some(1.0));
    assert!(body.get("max_tokens").is_none());
}

#[tokio::test]
async fn reverse_analyzer_degrades_on_plain_text() {
    let (base_url, _) = spawn_fake_upstream(StatusCode::OK, completion(json!("not json"))).await;
    let backend = Arc::new(GroqBackend::new("test-key", &config(&base_url)).unwrap());
    let analyzer = ReverseAnalyzer::new(backend);

    let result = analyzer
        .analyze(&ReverseRequest {
            mode: "article".into(),
            target: "Some article text".into(),
            notes: None,
            creativity: 40,
            depth: 70,
            detect_ai: "balanced".into(),
        })
        .await
        .unwrap();
    assert_eq!(result.reconstructed_prompt, "");
    assert_eq!(result.tech_stack, None);
    assert_eq!(result.ai_probability, None);
    assert_eq!(result.extra_notes.as_deref(), Some("not json"));
}

#[tokio::test]
async fn chat_reply_uses_persona_and_fixed_params() {
    let (base_url, seen) =
        spawn_fake_upstream(StatusCode::OK, completion(json!("  Meow! Try the optimizer.  "))).await;
    let backend = Arc::new(GroqBackend::new("test-key", &config(&base_url)).unwrap());
    let assistant = ChatAssistant::new(backend);

    let reply = assistant
        .reply(&ChatRequest {
            message: "What can I do here?".into(),
            source: Some("home".into()),
        })
        .await
        .unwrap();
    assert_eq!(reply, "Meow! Try the optimizer.");

    let seen = seen.lock().unwrap();
    let body = &seen[0].1;
    assert_eq!(body["messages"][0]["role"], "system");
    assert!(body["messages"][1]["content"]
        .as_str()
        .unwrap()
        .ends_with("Source: home. Message: What can I do here?"));
    assert!((body["temperature"].as_f64().unwrap() - 0.4).abs() < 1e-6);
    assert_eq!(body["max_tokens"], 600);
}

#[tokio::test]
async fn chat_falls_back_when_upstream_returns_no_text() {
    for reply in [completion(Value::Null), json!({"choices": []})] {
        let (base_url, _) = spawn_fake_upstream(StatusCode::OK, reply).await;
        let backend = Arc::new(GroqBackend::new("test-key", &config(&base_url)).unwrap());
        let assistant = ChatAssistant::new(backend);

        let reply = assistant
            .reply(&ChatRequest { message: "hi".into(), source: None })
            .await
            .unwrap();
        assert_eq!(reply, FALLBACK_REPLY);
    }
}

#[tokio::test]
async fn chat_surfaces_upstream_status_errors() {
    let (base_url, _) =
        spawn_fake_upstream(StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "boom"})).await;
    let backend = Arc::new(GroqBackend::new("test-key", &config(&base_url)).unwrap());
    let assistant = ChatAssistant::new(backend);

    let err = assistant
        .reply(&ChatRequest { message: "hi".into(), source: None })
        .await
        .unwrap_err();
    assert!(matches!(err, RelayError::Upstream(_)), "{:?}", err);
}
