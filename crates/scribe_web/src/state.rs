use scribe_scrapers::Pipeline;
use tokio::sync::Mutex;

pub struct AppState {
    pub pipeline: Pipeline,
    /// Held for the whole of a scrape or enhancement run; one batch at a time.
    pub run_lock: Mutex<()>,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            run_lock: Mutex::new(()),
        }
    }
}
