use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use eframe::egui;

use crate::data::loader::{self, DataSource};
use crate::state::{LoadOutcome, LoadRequest};

/// Runs year loads off the UI thread. Each request gets its own worker;
/// results come back over one channel in completion order.
pub struct Fetcher {
    tx: Sender<LoadOutcome>,
    rx: Receiver<LoadOutcome>,
}

impl Default for Fetcher {
    fn default() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }
}

impl Fetcher {
    /// Start loading `request.year` from `source`. When `ctx` is given the UI
    /// is woken up once the result is ready.
    pub fn spawn(&self, source: DataSource, request: LoadRequest, ctx: Option<egui::Context>) {
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = loader::load_year(&source, &request.year);
            if tx.send(LoadOutcome { request, result }).is_err() {
                log::debug!("Fetch finished after the UI went away");
                return;
            }
            if let Some(ctx) = ctx {
                ctx.request_repaint();
            }
        });
    }

    /// Next finished load, without blocking.
    pub fn poll(&self) -> Option<LoadOutcome> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn delivers_results_in_completion_order() {
        let dir = std::env::temp_dir().join(format!("score-explorer-fetch-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("2024.json"), r#"{"columns":["a"],"data":[{"a":1},{"a":2}]}"#).unwrap();

        let fetcher = Fetcher::default();
        let source = DataSource::Directory(dir.clone());
        fetcher.spawn(source.clone(), LoadRequest { id: 1, year: "2024".into() }, None);
        let got = fetcher.rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(got.request.id, 1);
        assert_eq!(got.result.unwrap().len(), 2);

        fetcher.spawn(source, LoadRequest { id: 2, year: "1999".into() }, None);
        let got = fetcher.rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(got.request.id, 2);
        assert!(got.result.is_err());
        assert!(fetcher.poll().is_none());

        let _ = std::fs::remove_dir_all(dir);
    }
}
