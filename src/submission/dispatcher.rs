//! Fixed-size worker pool that turns submissions into rate-limited, authenticated requests.
//!
//! Workers pull jobs from one shared queue. Each job waits for a limiter slot (dropping
//! the handle abandons the wait), then runs its network exchange as a separate task so a
//! panic resolves the handle with [`DispatchError::WorkerLost`] while the worker keeps
//! serving the queue.

// crates.io
use tokio::{
	sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
	task::JoinHandle,
};
// self
use crate::{
	_prelude::*,
	config::Endpoints,
	error::{ConfigError, DispatchError, HttpStage},
	ext::{BearerSigner, RequestSignerExt},
	http::ReqwestHttpClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	rate_limit::RateLimiter,
	submission::{SubmissionHandle, SubmissionRequest, SubmissionResult, handle::Resolver},
	token::TokenSource,
};

type JobQueue = Arc<AsyncMutex<UnboundedReceiver<Job>>>;

struct Job {
	request: SubmissionRequest,
	resolver: Resolver,
}

/// Everything one submission needs once it has been admitted.
struct UnitOfWork {
	http: ReqwestHttpClient,
	tokens: Arc<dyn TokenSource>,
	create_document: Url,
}
impl UnitOfWork {
	async fn execute(self: Arc<Self>, request: SubmissionRequest) -> Result<SubmissionResult> {
		const KIND: FlowKind = FlowKind::Submission;

		let span = FlowSpan::new(KIND, "execute");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result: Result<SubmissionResult> = span
			.instrument(async {
				let token = self.tokens.token(request.signature()).await?;
				let mut url = self.create_document.clone();

				url.query_pairs_mut().append_pair("pg", request.product_group().as_str());

				let builder = self
					.http
					.post(url)
					.header(reqwest::header::CONTENT_TYPE, "application/json")
					.body(request.to_body()?);
				let builder = BearerSigner.attach_token(builder, &token)?;

				self.http.send(HttpStage::Submission, builder).await?.json::<SubmissionResult>()
			})
			.await;

		match &result {
			Ok(_) => {
				obs::record_flow_outcome(KIND, FlowOutcome::Success);
				obs::debug_event(KIND, "submitted");
			},
			Err(e) => {
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);
				obs::failure_event(KIND, "submission_failed", e);
			},
		}

		result
	}
}

/// Worker pool sized to the limiter capacity.
pub struct Dispatcher {
	sender: Mutex<Option<UnboundedSender<Job>>>,
	workers: Mutex<Vec<JoinHandle<()>>>,
	worker_count: usize,
}
impl Dispatcher {
	/// Spawns one worker per admission slot on the current Tokio runtime.
	///
	/// `tokens` is usually the shared [`TokenManager`](crate::token::TokenManager); any
	/// [`TokenSource`] can stand in for it.
	pub fn new(
		limiter: Arc<RateLimiter>,
		tokens: Arc<dyn TokenSource>,
		http: ReqwestHttpClient,
		endpoints: &Endpoints,
	) -> Result<Self, ConfigError> {
		let runtime = tokio::runtime::Handle::try_current().map_err(|_| ConfigError::NoRuntime)?;
		let worker_count = usize::try_from(limiter.capacity()).unwrap_or(usize::MAX);
		let (sender, receiver) = mpsc::unbounded_channel();
		let queue: JobQueue = Arc::new(AsyncMutex::new(receiver));
		let unit =
			Arc::new(UnitOfWork { http, tokens, create_document: endpoints.create_document.clone() });
		let workers = (0..worker_count)
			.map(|_| runtime.spawn(run_worker(queue.clone(), limiter.clone(), unit.clone())))
			.collect();

		Ok(Self {
			sender: Mutex::new(Some(sender)),
			workers: Mutex::new(workers),
			worker_count,
		})
	}

	/// Queues `request` and returns its handle without waiting.
	pub fn submit(&self, request: SubmissionRequest) -> Result<SubmissionHandle> {
		let sender = self.sender.lock();
		let sender = sender.as_ref().ok_or(DispatchError::Closed)?;
		let (resolver, handle) = super::handle::channel();

		sender.send(Job { request, resolver }).map_err(|_| DispatchError::Closed)?;

		Ok(handle)
	}

	/// Stops accepting submissions and waits until queued work has drained.
	pub async fn shutdown(&self) {
		drop(self.sender.lock().take());

		let workers = std::mem::take(&mut *self.workers.lock());

		for worker in workers {
			let _ = worker.await;
		}
	}

	/// Returns `true` once [`shutdown`](Self::shutdown) has been called.
	pub fn is_closed(&self) -> bool {
		self.sender.lock().is_none()
	}

	/// Number of workers in the pool.
	pub fn workers(&self) -> usize {
		self.worker_count
	}
}
impl Debug for Dispatcher {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Dispatcher")
			.field("workers", &self.worker_count)
			.field("closed", &self.is_closed())
			.finish()
	}
}

async fn run_worker(queue: JobQueue, limiter: Arc<RateLimiter>, unit: Arc<UnitOfWork>) {
	loop {
		let job = queue.lock().await.recv().await;
		let Some(Job { request, mut resolver }) = job else {
			break;
		};

		let admitted = !resolver.is_cancelled()
			&& tokio::select! {
				biased;
				_ = resolver.cancelled() => false,
				_ = limiter.acquire() => true,
			};

		if !admitted {
			obs::record_flow_outcome(FlowKind::Submission, FlowOutcome::Cancelled);
			obs::debug_event(FlowKind::Submission, "cancelled_before_admission");

			continue;
		}

		let outcome = match tokio::spawn(unit.clone().execute(request)).await {
			Ok(outcome) => outcome,
			Err(e) => Err(DispatchError::WorkerLost { reason: e.to_string() }.into()),
		};

		resolver.resolve(outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		config::{ClientConfig, RateLimitConfig},
		document::{IntroduceGoodsDocument, ProductGroup},
		token::{ConcatSigner, TokenManager},
	};

	fn dispatcher(admissions: u32) -> Dispatcher {
		let config = ClientConfig::new(
			Url::parse("http://127.0.0.1:9/issuer").expect("Issuer fixture should parse."),
			Url::parse("http://127.0.0.1:9/host").expect("Host fixture should parse."),
		)
		.with_rate(RateLimitConfig::new(Duration::from_secs(60), admissions));
		let endpoints = config.validate().expect("Fixture config should validate.");
		let http =
			ReqwestHttpClient::from_config(&config).expect("Fixture HTTP client should build.");
		let limiter =
			Arc::new(RateLimiter::new(config.rate).expect("Fixture limiter should build."));
		let tokens = Arc::new(
			TokenManager::new(http.clone(), &endpoints, config.token, Arc::new(ConcatSigner))
				.expect("Fixture token manager should build."),
		);

		Dispatcher::new(limiter, tokens, http, &endpoints).expect("Dispatcher should start.")
	}

	fn request() -> SubmissionRequest {
		SubmissionRequest::introduce_goods(
			"sig",
			IntroduceGoodsDocument::default(),
			ProductGroup::Milk,
		)
		.expect("Request fixture should be valid.")
	}

	#[test]
	fn construction_requires_a_runtime() {
		let config = ClientConfig::default();
		let endpoints = config.validate().expect("Default config should validate.");
		let http =
			ReqwestHttpClient::from_config(&config).expect("Default HTTP client should build.");
		let limiter = Arc::new(RateLimiter::new(config.rate).expect("Limiter should build."));
		let tokens = Arc::new(
			TokenManager::new(http.clone(), &endpoints, config.token, Arc::new(ConcatSigner))
				.expect("Token manager should build."),
		);
		let err = Dispatcher::new(limiter, tokens, http, &endpoints)
			.expect_err("Starting workers outside a runtime should fail.");

		assert!(matches!(err, ConfigError::NoRuntime));
	}

	#[tokio::test]
	async fn pool_size_matches_capacity() {
		let dispatcher = dispatcher(3);

		assert_eq!(dispatcher.workers(), 3);
		assert!(!dispatcher.is_closed());
	}

	#[tokio::test]
	async fn submit_after_shutdown_is_rejected() {
		let dispatcher = dispatcher(2);

		dispatcher.shutdown().await;

		let err = dispatcher.submit(request()).expect_err("A closed dispatcher should refuse work.");

		assert!(matches!(err, Error::Dispatch(DispatchError::Closed)));
		assert!(dispatcher.is_closed());
	}
}
