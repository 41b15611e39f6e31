use crate::gui_bridge::model::VisualizationModel;
use crate::workflow::config::WorkflowConfig;
use crate::workflow::runner::Runner;
use log::{error, info};
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

pub fn bind_address(port: u16) -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], port))
}

fn store(state: &RwLock<VisualizationModel>, model: VisualizationModel) {
    match state.write() {
        Ok(mut guard) => *guard = model,
        Err(poisoned) => *poisoned.into_inner() = model,
    }
}

fn load(state: &RwLock<VisualizationModel>) -> VisualizationModel {
    match state.read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Runs a workflow received over HTTP. Remote clients must send their
/// schedule inline; file-backed sources are refused.
fn simulate_request(
    runner: &Runner,
    workflow: &WorkflowConfig,
) -> anyhow::Result<VisualizationModel> {
    if workflow.schedule.reads_local_file() {
        anyhow::bail!("csv schedules must be sent inline as csv_text, not as a file path");
    }
    let result = runner.execute(workflow)?;
    Ok(VisualizationModel::from(&result))
}

/// Holds the latest results and serves them to an external charting client.
pub struct GuiBridge {
    state: Arc<RwLock<VisualizationModel>>,
}

impl GuiBridge {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(VisualizationModel::default())),
        }
    }

    /// Starts the HTTP endpoint on a background thread.
    ///
    /// `GET /report` returns the current model; `POST /simulate` accepts a
    /// workflow config with an inline schedule, reruns it, and replaces the
    /// model.
    pub fn serve(&self, runner: Arc<Runner>, addr: SocketAddr) {
        let state_for_filter = self.state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());
        let runner_filter = warp::any().map(move || runner.clone());

        let get_route = warp::path("report")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: Arc<RwLock<VisualizationModel>>| warp::reply::json(&load(&state)));

        let post_route = warp::path("simulate")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter)
            .and(runner_filter)
            .map(
                |workflow: WorkflowConfig,
                 state: Arc<RwLock<VisualizationModel>>,
                 runner: Arc<Runner>| match simulate_request(&runner, &workflow) {
                    Ok(model) => {
                        store(&state, model.clone());
                        warp::reply::with_status(warp::reply::json(&model), StatusCode::OK)
                    }
                    Err(err) => {
                        error!("simulate request rejected: {:#}", err);
                        warp::reply::with_status(
                            warp::reply::json(&json!({
                                "status": "error",
                                "message": format!("{:#}", err),
                            })),
                            StatusCode::BAD_REQUEST,
                        )
                    }
                },
            );

        thread::spawn(move || {
            let routes = get_route.or(post_route);
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("failed to build bridge runtime: {}", err);
                    return;
                }
            };
            runtime.block_on(async move {
                info!("results bridge listening on {}", addr);
                warp::serve(routes).run(addr).await;
            });
        });
    }

    pub fn publish(&self, model: VisualizationModel) {
        info!(
            "publishing {} scenario series over {} months",
            model.series.len(),
            model.months.len()
        );
        store(&self.state, model);
    }

    pub fn publish_status(&self, message: &str) {
        println!("[bridge] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> VisualizationModel {
        load(&self.state)
    }
}

impl Default for GuiBridge {
    fn default() -> Self {
        Self::new()
    }
}
