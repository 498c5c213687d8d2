use anyhow::{Context, Result};
use clap::ArgMatches;
use orderdesk_router::{ExtractionResult, RoutingEngine, RoutingService};
use serde_json::json;
use std::path::{Path, PathBuf};

/// Route every input through one shared service
///
/// Files are read and parsed concurrently on blocking worker threads, then
/// routed one at a time in input order, so the same inputs and roster always
/// produce the same assignments. Output follows input order.
pub async fn run(matches: &ArgMatches) -> Result<()> {
    let config = super::load_config(matches)?;
    super::init_tracing(&config.logging);

    let roster_path = PathBuf::from(
        matches
            .get_one::<String>("roster")
            .expect("roster argument is required"),
    );
    let inputs: Vec<PathBuf> = matches
        .get_many::<String>("inputs")
        .expect("inputs argument is required")
        .map(PathBuf::from)
        .collect();

    let roster = super::read_roster(&roster_path)?;
    let service = RoutingService::new(RoutingEngine::new(&config)?, roster);

    let (decisions, failures) = route_files(&service, inputs).await?;

    let final_roster = service.roster();
    let report = json!({
        "decisions": decisions,
        "roster": final_roster,
        "statistics": service.statistics(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    if matches.get_flag("write-roster") {
        super::write_roster(&roster_path, &final_roster)?;
    }

    if failures > 0 {
        anyhow::bail!("{} of {} documents could not be routed", failures, decisions.len());
    }
    Ok(())
}

/// Parse all inputs in parallel, then route them sequentially in input order
///
/// Returns one report entry per input and the number of inputs that failed.
async fn route_files(
    service: &RoutingService,
    inputs: Vec<PathBuf>,
) -> Result<(Vec<serde_json::Value>, usize)> {
    let handles: Vec<_> = inputs
        .into_iter()
        .map(|path| {
            tokio::task::spawn_blocking(move || {
                let extraction = super::read_extraction(&path);
                (path, extraction)
            })
        })
        .collect();

    let mut decisions = Vec::with_capacity(handles.len());
    let mut failures = 0usize;
    for handle in handles {
        let (path, extraction) = handle.await.context("parsing task panicked")?;
        match extraction.and_then(|extraction| route_one(service, &path, &extraction)) {
            Ok(entry) => decisions.push(entry),
            Err(e) => {
                failures += 1;
                tracing::error!("{:#}", e);
                decisions.push(json!({ "file": path.display().to_string(), "error": format!("{:#}", e) }));
            }
        }
    }
    Ok((decisions, failures))
}

fn route_one(
    service: &RoutingService,
    path: &Path,
    extraction: &ExtractionResult,
) -> Result<serde_json::Value> {
    let decision = service
        .route(extraction)
        .with_context(|| format!("failed to route {}", path.display()))?;
    Ok(json!({
        "file": path.display().to_string(),
        "decision": decision,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderdesk_router::{Role, RouterConfig, TeamMember, TeamRoster};
    use std::io::Write;

    fn write_extraction(dir: &tempfile::TempDir, name: &str, pages: u32) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"{{"poNumber":"{}","pageCount":{}}}"#, name, pages).unwrap();
        path
    }

    fn create_test_service() -> RoutingService {
        let roster = TeamRoster::new(vec![
            TeamMember::new("o1", "A", Role::OrderEntry),
            TeamMember::new("o2", "B", Role::OrderEntry),
        ]);
        RoutingService::new(RoutingEngine::new(&RouterConfig::default()).unwrap(), roster)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_batch_routes_in_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let large = write_extraction(&dir, "x.json", 5);
        let small = write_extraction(&dir, "y.json", 1);

        for _ in 0..20 {
            let service = create_test_service();
            let (decisions, failures) = route_files(&service, vec![large.clone(), small.clone()])
                .await
                .unwrap();

            assert_eq!(failures, 0);
            assert_eq!(decisions[0]["decision"]["route"], "A");
            assert_eq!(decisions[1]["decision"]["route"], "B");

            let roster = service.roster();
            assert_eq!(roster.find_by_name("A").unwrap().total_pages, 5);
            assert_eq!(roster.find_by_name("B").unwrap().total_pages, 1);
        }
    }

    #[tokio::test]
    async fn test_unreadable_input_does_not_stop_batch() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_extraction(&dir, "good.json", 3);
        let missing = dir.path().join("missing.json");

        let service = create_test_service();
        let (decisions, failures) = route_files(&service, vec![missing, good]).await.unwrap();

        assert_eq!(failures, 1);
        assert!(decisions[0]["error"].as_str().unwrap().contains("failed to read extraction"));
        assert_eq!(decisions[1]["decision"]["route"], "A");
        assert_eq!(service.statistics().total_decisions, 1);
    }
}
