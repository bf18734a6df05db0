//! Runtime - executes commands and feeds results back into `update`
//!
//! The model is only touched on the thread that owns the [`Runtime`]. Side
//! effects run on short-lived worker threads which post exactly one result
//! message each over an mpsc channel.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::bridge::{
    process_image_file, read_directory, read_file, save_file, word_to_markdown, DocumentConverter,
    DocxConverter, OcrClient,
};
use crate::commands::Cmd;
use crate::fs_watcher::{FileWatcher, DEFAULT_WATCH_DEBOUNCE};
use crate::messages::{FileMsg, LoadedContent, Msg, OutlineMsg, WorkspaceMsg};
use crate::model::AppModel;
use crate::update::update;

pub struct Runtime {
    model: AppModel,
    result_tx: Sender<Msg>,
    result_rx: Receiver<Msg>,
    /// Workers spawned whose result has not been processed yet
    in_flight: usize,
    converter: Arc<dyn DocumentConverter>,
    ocr: OcrClient,
    /// Created on the first watch request
    watcher: Option<FileWatcher>,
}

impl Runtime {
    pub fn new(model: AppModel) -> Self {
        Self::with_converter(model, Arc::new(DocxConverter))
    }

    /// Use a different Word converter (e.g. one that shells out to a tool)
    pub fn with_converter(model: AppModel, converter: Arc<dyn DocumentConverter>) -> Self {
        let (result_tx, result_rx) = mpsc::channel();
        let ocr = model.config.ocr.client();
        Self {
            model,
            result_tx,
            result_rx,
            in_flight: 0,
            converter,
            ocr,
            watcher: None,
        }
    }

    pub fn model(&self) -> &AppModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut AppModel {
        &mut self.model
    }

    pub fn into_model(self) -> AppModel {
        self.model
    }

    /// Number of workers still running
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Run one message through `update` and execute the resulting command
    pub fn dispatch(&mut self, msg: Msg) {
        if let Some(cmd) = update(&mut self.model, msg) {
            self.process_cmd(cmd);
        }
    }

    /// Process finished worker results and file change events without
    /// blocking. Returns the number of messages handled.
    pub fn poll(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(msg) = self.result_rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            self.dispatch(msg);
            handled += 1;
        }

        let changed = self
            .watcher
            .as_ref()
            .map(FileWatcher::poll_events)
            .unwrap_or_default();
        for path in changed {
            self.dispatch(Msg::File(FileMsg::ExternallyModified(path)));
            handled += 1;
        }
        handled
    }

    /// Block until every spawned worker (and whatever they trigger) is done,
    /// or `timeout` passes. Returns `true` when idle.
    pub fn run_until_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.result_rx.recv_timeout(remaining) {
                Ok(msg) => {
                    self.in_flight -= 1;
                    self.dispatch(msg);
                }
                Err(RecvTimeoutError::Timeout) => {
                    tracing::warn!(in_flight = self.in_flight, "timed out waiting for workers");
                    return false;
                }
                // Unreachable while we hold a sender
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
        true
    }

    fn spawn<F>(&mut self, job: F)
    where
        F: FnOnce() -> Msg + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.result_tx.clone();
        thread::spawn(move || {
            let _ = tx.send(job());
        });
    }

    fn process_cmd(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::None => {}
            Cmd::LoadFile { path } => self.spawn(move || {
                let result = read_file(&path)
                    .map(LoadedContent::Text)
                    .map_err(|e| e.to_string());
                Msg::File(FileMsg::Loaded { path, result })
            }),
            Cmd::ConvertDocument { path, format } => {
                let converter = Arc::clone(&self.converter);
                self.spawn(move || {
                    let result = word_to_markdown(converter.as_ref(), &path, format)
                        .map(|markdown| LoadedContent::Word { markdown, format })
                        .map_err(|e| e.to_string());
                    Msg::File(FileMsg::Loaded { path, result })
                })
            }
            Cmd::ProcessImage { path } => self.spawn(move || {
                let result = process_image_file(&path)
                    .map(LoadedContent::Image)
                    .map_err(|e| e.to_string());
                Msg::File(FileMsg::Loaded { path, result })
            }),
            Cmd::SaveFile { tab, path, content } => self.spawn(move || {
                let result = save_file(&path, &content).map_err(|e| e.to_string());
                Msg::File(FileMsg::Saved { tab, content, result })
            }),
            Cmd::ReloadFile { path } => self.spawn(move || {
                let result = read_file(&path).map_err(|e| e.to_string());
                Msg::File(FileMsg::Reloaded { path, result })
            }),
            Cmd::ReadDirectory { path } => self.spawn(move || {
                let result = read_directory(&path).map_err(|e| e.to_string());
                Msg::Workspace(WorkspaceMsg::Listed { dir: path, result })
            }),
            Cmd::PerformOcr { path } => {
                let client = self.ocr.clone();
                self.spawn(move || {
                    let result = client.perform_ocr(&path).map_err(|e| e.to_string());
                    Msg::File(FileMsg::OcrCompleted { path, result })
                })
            }
            Cmd::DebouncedOutline { token, delay_ms } => self.spawn(move || {
                thread::sleep(Duration::from_millis(delay_ms));
                Msg::Outline(OutlineMsg::Refresh { token })
            }),
            Cmd::WatchFile { path } => self.watch(path),
            Cmd::UnwatchFile { path } => {
                if let Some(watcher) = &mut self.watcher {
                    watcher.unwatch(&path);
                }
            }
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd);
                }
            }
        }
    }

    fn watch(&mut self, path: PathBuf) {
        if self.watcher.is_none() {
            match FileWatcher::new(DEFAULT_WATCH_DEBOUNCE) {
                Ok(watcher) => self.watcher = Some(watcher),
                Err(e) => {
                    tracing::warn!("Failed to start file watcher: {}", e);
                    return;
                }
            }
        }
        if let Some(watcher) = &mut self.watcher {
            if let Err(e) = watcher.watch(&path) {
                tracing::warn!(path = %path.display(), "Failed to watch file: {}", e);
            }
        }
    }
}
