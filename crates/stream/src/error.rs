use rayon::ThreadPoolBuildError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
	#[error("invalid pipeline option {option}: {reason}")]
	InvalidOptions {
		option: &'static str,
		reason: &'static str,
	},
	#[error("failed to build scoring thread pool")]
	ThreadPool(#[from] ThreadPoolBuildError),
	#[error("failed to spawn scoring thread")]
	Spawn(#[source] std::io::Error),
}
