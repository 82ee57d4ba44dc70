use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use riverguard::location::MockGeocoder;
use riverguard::submit::{
    Backend, Receipt, ReplyPayload, ReportPayload, SimulatedBackend, TopicPayload,
};
use riverguard::{AppState, Config};

// ---

/// Serve the router on an ephemeral port and return its base URL.
async fn spawn(backend: impl Backend + 'static) -> Result<String> {
    // ---
    let state = AppState::new(
        Config::default(),
        Arc::new(backend),
        Arc::new(MockGeocoder::new(Duration::ZERO)),
    );
    let app = riverguard::router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(format!("http://{addr}"))
}

#[derive(Debug, Deserialize)]
struct Notification {
    title: String,
    description: String,
    variant: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Draft {
    step: String,
    step_number: u8,
    images: Vec<Value>,
    can_add_more_images: bool,
}

#[derive(Debug, Deserialize)]
struct Created {
    id: String,
}

/// Simulated backend that counts the reports it receives.
struct CountingBackend {
    inner: SimulatedBackend,
    reports: Arc<AtomicUsize>,
}

#[async_trait]
impl Backend for CountingBackend {
    async fn submit_report(&self, payload: ReportPayload) -> riverguard::error::Result<Receipt> {
        self.reports.fetch_add(1, Ordering::SeqCst);
        self.inner.submit_report(payload).await
    }

    async fn create_topic(&self, payload: TopicPayload) -> riverguard::error::Result<Receipt> {
        self.inner.create_topic(payload).await
    }

    async fn post_reply(&self, payload: ReplyPayload) -> riverguard::error::Result<Receipt> {
        self.inner.post_reply(payload).await
    }
}

async fn new_draft(client: &Client, base: &str) -> Result<String> {
    let created: Created = client
        .post(format!("{base}/reports/drafts"))
        .send()
        .await?
        .json()
        .await?;
    Ok(created.id)
}

#[tokio::test]
async fn health_endpoint_ok() -> Result<()> {
    // ---
    let base = spawn(SimulatedBackend::instant()).await?;
    let body: Value = Client::new()
        .get(format!("{base}/health"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn map_filters_ganga_severity_three_to_five() -> Result<()> {
    // ---
    let base = spawn(SimulatedBackend::instant()).await?;
    let url = format!("{base}/map?river=Ganga&severity_min=3&severity_max=5");

    let body: Value = Client::new().get(&url).send().await?.json().await?;

    let ids: Vec<u64> = body["reports"]
        .as_array()
        .expect("reports array")
        .iter()
        .map(|r| r["id"].as_u64().expect("id"))
        .collect();
    assert_eq!(ids, [2], "unexpected reports from {url}");

    let markers = body["plan"]["markers"].as_array().expect("markers array");
    assert_eq!(markers.len(), 1);
    assert_eq!(body["plan"]["view"]["zoom"], 5);
    assert_eq!(body["legend"].as_array().map(Vec::len), Some(5));

    let picked: Value = Client::new()
        .get(format!("{base}/reports/2"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(picked["river"], "Ganga");
    Ok(())
}

#[tokio::test]
async fn reports_endpoint_rejects_unknown_type() -> Result<()> {
    // ---
    let base = spawn(SimulatedBackend::instant()).await?;
    let client = Client::new();

    let all: Value = client.get(format!("{base}/reports")).send().await?.json().await?;
    assert_eq!(all["reports"].as_array().map(Vec::len), Some(5));

    let resp = client.get(format!("{base}/reports?type=radioactive")).send().await?;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let n: Notification = resp.json().await?;
    assert_eq!(n.variant, "destructive");
    Ok(())
}

#[tokio::test]
async fn wizard_submits_yamuna_report_and_redirects() -> Result<()> {
    // ---
    let base = spawn(SimulatedBackend::instant()).await?;
    let client = Client::new();
    let id = new_draft(&client, &base).await?;
    let draft_url = format!("{base}/reports/drafts/{id}");

    let draft: Draft = client
        .patch(&draft_url)
        .json(&json!({
            "riverName": "Yamuna",
            "pollutionType": "industrial",
            "description": "test",
            "severityLevel": 3
        }))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(draft.step, "basicInfo");

    // submit is unreachable before the evidence step
    let early = client.post(format!("{draft_url}/submit")).send().await?;
    assert_eq!(early.status(), StatusCode::CONFLICT);

    for expected in [2, 3, 3] {
        let draft: Draft = client
            .post(format!("{draft_url}/next"))
            .send()
            .await?
            .json()
            .await?;
        assert_eq!(draft.step_number, expected);
    }

    let resp = client.post(format!("{draft_url}/submit")).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await?;
    assert_eq!(body["redirect"], "/report/success");
    assert_eq!(body["notification"]["title"], "Report submitted successfully!");
    assert_eq!(body["pointsEarned"], 30);

    let gone = client.get(&draft_url).send().await?;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn failed_submission_keeps_draft_for_retry() -> Result<()> {
    // ---
    let base = spawn(SimulatedBackend::instant().failing("Please try again later")).await?;
    let client = Client::new();
    let id = new_draft(&client, &base).await?;
    let draft_url = format!("{base}/reports/drafts/{id}");

    client.post(format!("{draft_url}/next")).send().await?;
    client.post(format!("{draft_url}/next")).send().await?;

    let resp = client.post(format!("{draft_url}/submit")).send().await?;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let n: Notification = resp.json().await?;
    assert_eq!(n.title, "Error submitting report");
    assert_eq!(n.description, "Please try again later");

    let draft: Draft = client.get(&draft_url).send().await?.json().await?;
    assert_eq!(draft.step, "evidence");
    Ok(())
}

#[tokio::test]
async fn image_uploads_are_capped_and_removable() -> Result<()> {
    // ---
    let base = spawn(SimulatedBackend::instant()).await?;
    let client = Client::new();
    let id = new_draft(&client, &base).await?;
    let images_url = format!("{base}/reports/drafts/{id}/images");

    let files: Vec<Value> = (0..7)
        .map(|i| {
            json!({
                "name": format!("photo{i}.jpg"),
                "contentType": "image/jpeg",
                "sizeBytes": 100
            })
        })
        .chain([json!({ "name": "clip.mp4", "contentType": "video/mp4" })])
        .collect();

    let draft: Draft = client
        .post(&images_url)
        .json(&json!({ "files": files, "source": "drop" }))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(draft.images.len(), 5);
    assert!(!draft.can_add_more_images);
    assert_eq!(draft.images[0]["name"], "photo0.jpg");

    let draft: Draft = client.delete(format!("{images_url}/0")).send().await?.json().await?;
    assert_eq!(draft.images.len(), 4);
    assert_eq!(draft.images[0]["name"], "photo1.jpg");

    let missing = client.delete(format!("{images_url}/9")).send().await?;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn draft_location_from_device_and_search() -> Result<()> {
    // ---
    let base = spawn(SimulatedBackend::instant()).await?;
    let client = Client::new();
    let id = new_draft(&client, &base).await?;
    let location_url = format!("{base}/reports/drafts/{id}/location");

    let body: Value = client
        .post(&location_url)
        .json(&json!({ "position": { "lat": 28.5355, "lng": 77.3910 } }))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["notification"]["title"], "Location detected");
    assert_eq!(body["draft"]["location"]["lat"], 28.5355);

    let unsupported = client.post(&location_url).json(&json!({})).send().await?;
    assert_eq!(unsupported.status(), StatusCode::NOT_IMPLEMENTED);

    let blank = client
        .post(format!("{location_url}/search"))
        .json(&json!({ "query": "  " }))
        .send()
        .await?;
    assert_eq!(blank.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let found: Value = client
        .post(format!("{location_url}/search"))
        .json(&json!({ "query": "Okhla Barrage" }))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(found["location"]["address"], "Okhla Barrage");
    Ok(())
}

#[tokio::test]
async fn history_snapshot_uses_nearest_year() -> Result<()> {
    // ---
    let base = spawn(SimulatedBackend::instant()).await?;
    let client = Client::new();

    let body: Value = client
        .get(format!("{base}/history/ganga?year=1995"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["year"], 1995);
    assert_eq!(body["waterQuality"]["year"], 2000);

    let clamped: Value = client
        .get(format!("{base}/history/ganga?year=2100"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(clamped["year"], 2023);

    let missing = client.get(format!("{base}/history/thames")).send().await?;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn community_search_and_reply() -> Result<()> {
    // ---
    let base = spawn(SimulatedBackend::instant()).await?;
    let client = Client::new();

    let found: Value = client
        .get(format!("{base}/community/discussions?q=YAMUNA"))
        .send()
        .await?
        .json()
        .await?;
    let titles: Vec<&str> = found["discussions"]
        .as_array()
        .expect("discussions array")
        .iter()
        .filter_map(|d| d["title"].as_str())
        .collect();
    assert!(titles.contains(&"Industrial waste found in Yamuna near Okhla"));

    let empty = client
        .post(format!("{base}/community/discussions/1/replies"))
        .json(&json!({ "content": "   " }))
        .send()
        .await?;
    assert_eq!(empty.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let n: Notification = empty.json().await?;
    assert_eq!(n.title, "Empty reply");

    let posted = client
        .post(format!("{base}/community/discussions/1/replies"))
        .json(&json!({ "content": "I can join on Saturday" }))
        .send()
        .await?;
    assert_eq!(posted.status(), StatusCode::CREATED);
    let body: Value = posted.json().await?;
    assert_eq!(body["notification"]["title"], "Reply posted");

    let topic: Value = client
        .post(format!("{base}/community/topics"))
        .json(&json!({
            "title": "Weekend cleanup at Okhla",
            "category": "Cleanup Events",
            "content": "Meet at 7am",
            "tags": "yamuna, volunteer"
        }))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(topic["redirect"], "/community");
    Ok(())
}

#[tokio::test]
async fn geocode_rejects_blank_query() -> Result<()> {
    // ---
    let base = spawn(SimulatedBackend::instant()).await?;
    let resp = Client::new().get(format!("{base}/geocode?q=")).send().await?;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submits_accept_each_draft_once() -> Result<()> {
    // ---
    const DRAFTS: usize = 40;
    const SUBMITS_PER_DRAFT: usize = 8;

    let reports = Arc::new(AtomicUsize::new(0));
    let base = spawn(CountingBackend {
        inner: SimulatedBackend::instant(),
        reports: Arc::clone(&reports),
    })
    .await?;
    let client = Client::new();

    for _ in 0..DRAFTS {
        let id = new_draft(&client, &base).await?;
        let draft_url = format!("{base}/reports/drafts/{id}");
        client.post(format!("{draft_url}/next")).send().await?;
        client.post(format!("{draft_url}/next")).send().await?;

        let mut submits = Vec::with_capacity(SUBMITS_PER_DRAFT);
        for _ in 0..SUBMITS_PER_DRAFT {
            let client = client.clone();
            let url = format!("{draft_url}/submit");
            submits.push(tokio::spawn(async move {
                client.post(url).send().await.map(|r| r.status())
            }));
        }

        let mut accepted = 0;
        for submit in submits {
            let status = submit.await??;
            match status {
                StatusCode::OK => accepted += 1,
                StatusCode::CONFLICT | StatusCode::NOT_FOUND => {}
                other => panic!("unexpected status {other} for draft {id}"),
            }
        }
        assert_eq!(accepted, 1, "draft {id} accepted {accepted} times");
    }

    assert_eq!(reports.load(Ordering::SeqCst), DRAFTS);
    Ok(())
}

#[tokio::test]
async fn malformed_input_gets_validation_notification() -> Result<()> {
    // ---
    let base = spawn(SimulatedBackend::instant()).await?;
    let client = Client::new();
    let id = new_draft(&client, &base).await?;
    let draft_url = format!("{base}/reports/drafts/{id}");

    let out_of_range = client
        .patch(&draft_url)
        .json(&json!({ "riverName": "Ganga", "severityLevel": 9 }))
        .send()
        .await?;
    assert_eq!(out_of_range.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let n: Notification = out_of_range.json().await?;
    assert_eq!(n.title, "Invalid request");
    assert_eq!(n.variant, "destructive");

    let draft: Draft = client.get(&draft_url).send().await?.json().await?;
    assert_eq!(draft.step, "basicInfo");

    let bad_files = client
        .post(format!("{draft_url}/images"))
        .json(&json!({ "files": "photo.jpg" }))
        .send()
        .await?;
    assert_eq!(bad_files.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let n: Notification = bad_files.json().await?;
    assert_eq!(n.variant, "destructive");

    let not_json = client
        .post(format!("{base}/community/topics"))
        .body("title=hello")
        .send()
        .await?;
    assert_eq!(not_json.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let n: Notification = not_json.json().await?;
    assert_eq!(n.title, "Invalid request");

    for url in [
        format!("{base}/reports?severity_min=abc"),
        format!("{base}/map?zoom=close"),
        format!("{base}/history/ganga?year=recent"),
    ] {
        let resp = client.get(&url).send().await?;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY, "{url}");
        let n: Notification = resp.json().await?;
        assert_eq!(n.title, "Invalid request", "{url}");
        assert_eq!(n.variant, "destructive", "{url}");
        assert!(!n.description.is_empty(), "{url}");
    }
    Ok(())
}
