//! Demo quick-start and upload flow against a scripted backend.

mod common;

use std::sync::Arc;

use common::{jobs_api, receipt, service_error, task, ticket};
use sentiscope_core::routes::Route;
use sentiscope_dashboard::{CsvUpload, DemoLauncher, LaunchOutcome, UploadFlow};

// ---------------------------------------------------------------------------
// Test: demo shortcut
// ---------------------------------------------------------------------------

#[tokio::test]
async fn demo_runs_load_analyze_navigate() {
    let (jobs, nav) = jobs_api();
    let launcher = Arc::new(DemoLauncher::new(jobs.clone(), nav.clone()));

    let launch = tokio::spawn({
        let launcher = launcher.clone();
        async move { launcher.launch().await }
    });
    jobs.demos.next().await.succeed(receipt("demo-file"));
    let analysis = jobs.analyses.next().await;
    assert_eq!(analysis.request, "demo-file");
    assert!(launcher.is_loading());
    analysis.succeed(ticket("task-42"));

    assert_eq!(launch.await.unwrap(), LaunchOutcome::Started(task("task-42")));
    assert!(!launcher.is_loading());
    assert_eq!(nav.routes(), vec![Route::analysis(task("task-42"))]);
}

#[tokio::test]
async fn demo_invoked_twice_runs_once() {
    let (jobs, nav) = jobs_api();
    let launcher = Arc::new(DemoLauncher::new(jobs.clone(), nav.clone()));

    let first = tokio::spawn({
        let launcher = launcher.clone();
        async move { launcher.launch().await }
    });
    let demo = jobs.demos.next().await;

    // The route re-delivered while the first sequence is parked.
    let auto = launcher
        .handle_route(&Route::parse("/upload?autoLoadDemo=true").unwrap())
        .await;
    assert_eq!(auto, Some(LaunchOutcome::AlreadyRunning));
    assert_eq!(launcher.launch().await, LaunchOutcome::AlreadyRunning);

    demo.succeed(receipt("demo-file"));
    jobs.analyses.next().await.succeed(ticket("task-1"));
    assert_eq!(first.await.unwrap(), LaunchOutcome::Started(task("task-1")));

    assert_eq!(jobs.demos.total(), 1);
    assert_eq!(jobs.analyses.total(), 1);
    assert_eq!(nav.routes().len(), 1);
}

#[tokio::test]
async fn demo_failure_releases_guard_without_navigating() {
    let (jobs, nav) = jobs_api();
    let launcher = Arc::new(DemoLauncher::new(jobs.clone(), nav.clone()));

    let launch = tokio::spawn({
        let launcher = launcher.clone();
        async move { launcher.launch().await }
    });
    jobs.demos.next().await.fail(service_error("Sample file missing"));

    assert_eq!(
        launch.await.unwrap(),
        LaunchOutcome::Failed("Sample file missing".into())
    );
    assert!(!launcher.is_loading());
    assert!(nav.routes().is_empty());
    assert_eq!(jobs.analyses.total(), 0);

    // A later attempt is allowed again.
    let again = tokio::spawn({
        let launcher = launcher.clone();
        async move { launcher.launch().await }
    });
    jobs.demos.next().await.succeed(receipt("demo-file"));
    jobs.analyses.next().await.succeed(ticket("task-2"));
    assert_eq!(again.await.unwrap(), LaunchOutcome::Started(task("task-2")));
}

#[tokio::test]
async fn plain_upload_route_does_not_launch() {
    let (jobs, nav) = jobs_api();
    let launcher = DemoLauncher::new(jobs.clone(), nav.clone());

    assert_eq!(launcher.handle_route(&Route::upload()).await, None);
    assert_eq!(launcher.handle_route(&Route::analysis(task("x"))).await, None);
    assert_eq!(jobs.demos.total(), 0);
}

// ---------------------------------------------------------------------------
// Test: upload flow
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_submits_file_then_analysis() {
    let (jobs, nav) = jobs_api();
    let flow = Arc::new(UploadFlow::new(jobs.clone(), nav.clone()));
    let upload = CsvUpload::new("reviews.csv", b"content\ngreat\n".to_vec()).unwrap();

    let submit = tokio::spawn({
        let flow = flow.clone();
        async move { flow.submit(upload).await }
    });
    let call = jobs.uploads.next().await;
    assert_eq!(call.request, ("reviews.csv".to_string(), 14));

    // A second submit while the first is in flight is rejected.
    let duplicate = CsvUpload::new("other.csv", b"x".to_vec()).unwrap();
    assert_eq!(flow.submit(duplicate).await, LaunchOutcome::AlreadyRunning);

    call.succeed(receipt("file-7"));
    let analysis = jobs.analyses.next().await;
    assert_eq!(analysis.request, "file-7");
    analysis.succeed(ticket("task-7"));

    assert_eq!(submit.await.unwrap(), LaunchOutcome::Started(task("task-7")));
    assert_eq!(nav.routes(), vec![Route::analysis(task("task-7"))]);
    assert_eq!(jobs.uploads.total(), 1);
}

#[tokio::test]
async fn analysis_failure_after_upload_is_reported() {
    let (jobs, nav) = jobs_api();
    let flow = Arc::new(UploadFlow::new(jobs.clone(), nav.clone()));
    let upload = CsvUpload::new("reviews.csv", b"content\n".to_vec()).unwrap();

    let submit = tokio::spawn({
        let flow = flow.clone();
        async move { flow.submit(upload).await }
    });
    jobs.uploads.next().await.succeed(receipt("file-8"));
    jobs.analyses.next().await.fail(service_error("File has no content column"));

    assert_eq!(
        submit.await.unwrap(),
        LaunchOutcome::Failed("File has no content column".into())
    );
    assert!(!flow.is_uploading());
    assert!(nav.routes().is_empty());
}
