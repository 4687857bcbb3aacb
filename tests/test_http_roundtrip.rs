//! The quiz service talking HTTP to a loopback chat-completions server

use serde_json::Value;
use talequiz::llm::test_server::{CannedResponse, TestServer};
use talequiz::{Config, QuizService, Source};
use talequiz_engine::testing::{question_reply, story_reply};

fn config_for(server: &TestServer) -> Config {
    Config::builder()
        .base_url(server.base_url())
        .max_retries(0)
        .pacing_ms(0)
        .seed(5)
        .build()
        .unwrap()
}

async fn service_for(server: &TestServer) -> QuizService {
    let config = config_for(server);
    let backend = talequiz::llm::from_config(&config).unwrap();
    QuizService::from_config(&config, backend)
}

#[tokio::test]
async fn model_round_over_http() {
    let server = TestServer::start(vec![
        CannedResponse::ok_content("สวัสดีครับ"),
        CannedResponse::ok_content(&story_reply("ลิงน้อยช่วยเพื่อนข้ามลำธาร", "เพื่อนแท้ช่วยกันยามลำบาก")),
        CannedResponse::ok_content(&question_reply(
            "ลิงน้อยสอนอะไรเรา?",
            ["ความโลภ", "เพื่อนแท้ช่วยกันยามลำบาก", "ความเกียจคร้าน", "ความกลัว"],
            1,
            "เพื่อนแท้ช่วยกันยามลำบาก",
        )),
    ])
    .await;
    let mut service = service_for(&server).await;

    assert!(service.probe().await);
    let items = service
        .generate_question_set("นิทานมิตรภาพ", &["เพื่อนแท้".to_string()], 1, None)
        .await;

    let item = &items[0];
    assert_eq!(item.story_title, "นิทานมิตรภาพ - เพื่อนแท้");
    assert_eq!(item.story_content, "ลิงน้อยช่วยเพื่อนข้ามลำธาร");
    assert_eq!(item.correct_index, 1);
    assert_eq!(item.story_source, Source::Model);
    assert_eq!(item.question_source, Source::Model);

    let bodies: Vec<Value> = server
        .requests()
        .await
        .iter()
        .map(|b| serde_json::from_str(b).unwrap())
        .collect();
    assert_eq!(bodies.len(), 3);
    assert_eq!(bodies[0]["messages"][0]["content"], "Hi");
    assert_eq!(bodies[0]["max_tokens"], 5);
    assert_eq!(bodies[1]["messages"][0]["role"], "system");
    assert_eq!(bodies[1]["max_tokens"], 500);
    assert_eq!(bodies[2]["max_tokens"], 400);
    for body in &bodies {
        assert_eq!(body["stream"], false);
        assert_eq!(body["model"], "local-model");
    }
}

#[tokio::test]
async fn server_errors_fall_back_per_step() {
    let server = TestServer::start(vec![
        CannedResponse::ok_content("สวัสดีครับ"),
        CannedResponse::status(500),
        CannedResponse::ok_body(r#"{"choices":[]}"#),
    ])
    .await;
    let mut service = service_for(&server).await;

    assert!(service.probe().await);
    let items = service.generate_question_set("นิทานสัตว์", &[], 2, None).await;

    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|item| item.is_fallback()));
    for item in &items {
        assert_eq!(item.options[item.correct_index], item.moral);
    }
    // Server gone after its script: later rounds fail to connect, state unchanged
    assert!(service.state().is_online);
}

#[tokio::test]
async fn probe_against_error_status_goes_offline() {
    let server = TestServer::start(vec![CannedResponse::status(404)]).await;
    let mut service = service_for(&server).await;

    assert!(!service.probe().await);
    assert!(service.state().use_fallback);
}
