use fichas_tecnicas::clients::{configure, TextGenerator};
use fichas_tecnicas::{enrich, Config, Credential, ItemTable, Record};
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENDPOINT: &str = "/v1beta/models/gemini-1.5-pro-latest:generateContent";

fn client_for(server: &MockServer) -> Box<dyn TextGenerator> {
    let config = Config {
        api_base_url: server.uri(),
        ..Config::default()
    };
    configure(&config, &Credential::new("test-key").unwrap()).unwrap()
}

#[tokio::test]
async fn test_complete_returns_trimmed_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "generationConfig": {"temperature": 0.6, "topK": 1, "maxOutputTokens": 8192}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"parts": [{"text": "\n Qué Evalúa:\nSuma.  "}]},
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let text = client.complete("Analiza el ítem").await.unwrap();

    assert_eq!(text, "Qué Evalúa:\nSuma.");
}

#[tokio::test]
async fn test_server_error_is_generation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let err = client_for(&server).complete("hola").await.unwrap_err();

    assert_eq!(err.model, "gemini-1.5-pro-latest");
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_blocked_prompt_is_generation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).complete("hola").await.unwrap_err();

    assert!(err.to_string().contains("SAFETY"));
}

fn reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{
            "content": {"parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    }))
}

#[tokio::test]
async fn test_enrich_entry_point_runs_both_passes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(body_string_contains("Ruta cognitiva para la respuesta correcta"))
        .respond_with(reply(
            "Qué Evalúa:\nSuma.\nRuta Cognitiva Correcta:\nSuma dos y dos.\nAnálisis de Opciones No Válidas:\nA resta.",
        ))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(body_string_contains("INSTRUCCIONES PARA GENERAR LAS RECOMENDACIONES"))
        .and(body_string_contains("A resta."))
        .respond_with(reply(
            "RECOMENDACIÓN PARA FORTALECER\nContar fichas.\nRECOMENDACIÓN PARA AVANZAR\nFracciones.",
        ))
        .expect(2)
        .mount(&server)
        .await;

    let records: Vec<Record> = vec![
        serde_json::from_value(json!({"ItemId": "MAT-01", "Pregunta": "¿2 + 2?"})).unwrap(),
        serde_json::from_value(json!({"ItemId": "MAT-02", "Pregunta": "¿3 + 1?"})).unwrap(),
    ];
    let config = Config {
        api_base_url: server.uri(),
        request_delay_ms: 0,
        ..Config::default()
    };

    let table = enrich(ItemTable::new(records), &Credential::new("test-key").unwrap(), &config)
        .await
        .unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(
        table.columns(),
        &[
            "ItemId",
            "Pregunta",
            "Que_Evalua",
            "Justificacion_Correcta",
            "Analisis_Distractores",
            "Recomendacion_Fortalecer",
            "Recomendacion_Avanzar"
        ]
    );
    let last = &table.records()[1];
    assert_eq!(last.text("Que_Evalua").as_deref(), Some("Suma."));
    assert_eq!(last.text("Analisis_Distractores").as_deref(), Some("A resta."));
    assert_eq!(
        last.text("Recomendacion_Avanzar").as_deref(),
        Some("RECOMENDACIÓN PARA AVANZAR\nFracciones.")
    );
}
