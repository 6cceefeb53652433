use anyhow::{ensure, Result};
use config::ReplayConfig;
use rill_pipeline::{online_score_with, OnlineScoreConfig};
use rill_stages::metrics::Mae;
use rill_util::{load_env, LoadedEnv};
use stream::SalesStream;
use tracing::{error, info};

mod config;
mod model;
mod stream;

fn main() {
	let config_res = match load_env::<ReplayConfig>() {
		Ok(x) => x,

		#[expect(clippy::print_stdout)]
		Err(err) => {
			println!("Error while loading .env: {err}");
			std::process::exit(1);
		}
	};

	let config = config_res.get_config().clone();

	tracing_subscriber::fmt()
		.with_env_filter(config.replay_loglevel.get_config())
		.without_time()
		.with_ansi(true)
		.init();

	// Do this now, logging wasn't available earlier
	match config_res {
		LoadedEnv::FoundFile { config, path } => {
			info!(message = "Loaded config from .env", ?path, ?config);
		}
		LoadedEnv::OnlyVars(config) => {
			info!(
				message = "No `.env` found, loaded config from environment",
				?config
			);
		}
	};

	if let Err(error) = run(&config) {
		error!(message = "Replay failed", ?error);
		std::process::exit(1);
	}
}

fn run(config: &ReplayConfig) -> Result<()> {
	ensure!(config.replay_stores > 0, "replay_stores must be positive");

	let mut pipeline = model::build(config)?;
	info!(
		message = "Built pipeline",
		pipeline = %pipeline.name(),
		graph = ?pipeline.graph().stage_names()
	);

	let stream = SalesStream::new(config.replay_seed, config.replay_stores)?
		.take(config.replay_records);

	let mut metric = Mae::new();
	online_score_with(
		stream,
		&mut pipeline,
		&mut metric,
		OnlineScoreConfig {
			log_every: Some(config.replay_log_every),
		},
	)?;

	info!(message = "Replay finished", records = config.replay_records, %metric);
	return Ok(());
}
