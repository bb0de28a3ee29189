use serde_json::json;
use wiremock::{
    matchers::{body_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

use assessment_recommender::{
    client::HttpApiClient,
    evaluation::{
        generate_predictions, mean_recall_at_k, read_queries, read_query_urls, write_predictions,
    },
};

#[tokio::test]
async fn test_predict_then_score() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/recommend"))
        .and(body_json(json!({ "query": "Java developer", "top_k": null, "balance": null })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": "Java developer",
            "recommendations": [
                { "assessment_name": "Core Java", "url": "https://example.com/java" },
                { "assessment_name": "OPQ32r", "url": "https://example.com/opq" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/recommend"))
        .and(body_json(json!({ "query": "SQL analyst", "top_k": null, "balance": null })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "recommendations": null })))
        .expect(1)
        .mount(&server)
        .await;

    let test_csv = "Query\nJava developer\nSQL analyst\n";
    let queries = read_queries(test_csv.as_bytes()).unwrap();
    let client = HttpApiClient::new(server.uri());

    let rows = generate_predictions(&client, &queries).await.unwrap();
    let mut predictions_csv = Vec::new();
    write_predictions(&mut predictions_csv, &rows).unwrap();

    let labelled = "\
Query,Assessment_url
Java developer,https://example.com/java
Java developer,https://example.com/spring
SQL analyst,https://example.com/sql
";
    let ground_truth = read_query_urls(labelled.as_bytes()).unwrap();
    let predictions = read_query_urls(predictions_csv.as_slice()).unwrap();

    // java finds 1 of 2, sql finds nothing
    assert_eq!(mean_recall_at_k(&ground_truth, &predictions, 10), 0.25);
    assert_eq!(mean_recall_at_k(&ground_truth, &predictions, 1), 0.25);
}
