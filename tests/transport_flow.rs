//! Transport-level tests over a real TCP socket.

use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use trendcast::application::ml::predictor::HorizonClassifier;
use trendcast::application::normalizer::RequestNormalizer;
use trendcast::application::scoring::MultiHorizonScorer;
use trendcast::application::service::PredictionService;
use trendcast::domain::schema::FeatureSchema;
use trendcast::domain::table::FeatureVector;
use trendcast::infrastructure::observability::Metrics;
use trendcast::infrastructure::transport::LineServer;

struct FixedProbability(f64);

impl HorizonClassifier for FixedProbability {
    fn predict_proba(&self, _features: &FeatureVector) -> Result<f64, String> {
        Ok(self.0)
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

async fn spawn_server() -> std::net::SocketAddr {
    let schema = FeatureSchema::new(vec!["a".to_string()]).unwrap();
    let scorer = MultiHorizonScorer::new(
        Arc::new(FixedProbability(0.7)),
        Arc::new(FixedProbability(0.7)),
        Arc::new(FixedProbability(0.7)),
    );
    let service = Arc::new(PredictionService::new(
        Arc::new(schema),
        RequestNormalizer::new("日期"),
        scorer,
        Metrics::new().unwrap(),
    ));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = LineServer::new(service);
    tokio::spawn(async move {
        let _ = server.serve(listener).await;
    });
    addr
}

async fn roundtrip(addr: std::net::SocketAddr, lines: &[&str]) -> Vec<Value> {
    let stream = TcpStream::connect(addr).await.unwrap();
    let (reader, mut writer) = stream.into_split();
    let mut replies = BufReader::new(reader).lines();

    let mut parsed = Vec::new();
    for line in lines {
        writer.write_all(line.as_bytes()).await.unwrap();
        writer.write_all(b"\n").await.unwrap();
        let reply = replies.next_line().await.unwrap().unwrap();
        parsed.push(serde_json::from_str(&reply).unwrap());
    }
    parsed
}

#[tokio::test]
async fn test_health_probe_over_tcp() {
    let addr = spawn_server().await;
    let replies = roundtrip(addr, &["health"]).await;
    assert_eq!(replies[0]["status"], "ok");
}

#[tokio::test]
async fn test_prediction_and_errors_share_one_connection() {
    let addr = spawn_server().await;
    let replies = roundtrip(
        addr,
        &[
            r#"{"rows":[{"日期":"2025-01-28","a":1.0}]}"#,
            r#"{"rows":[]}"#,
            "{not json",
        ],
    )
    .await;

    assert_eq!(replies[0]["prob_5d"], 0.7);
    assert_eq!(replies[0]["label_5d"], 1);

    assert_eq!(replies[1]["error"], "empty_input");
    assert_eq!(replies[1]["status"], 400);

    assert_eq!(replies[2]["error"], "bad_request");
}

#[tokio::test]
async fn test_concurrent_connections_get_consistent_answers() {
    let addr = spawn_server().await;
    let request = r#"{"rows":[{"日期":"2025-01-28","a":1.0}]}"#;

    let mut handles = Vec::new();
    for _ in 0..8 {
        handles.push(tokio::spawn(async move {
            roundtrip(addr, &[request]).await.remove(0)
        }));
    }
    for handle in handles {
        let reply = handle.await.unwrap();
        assert_eq!(reply["prob_1d"], 0.7);
        assert_eq!(reply["label_20d"], 1);
    }
}
