use crate::{AssetError, MatcapImage, load_matcap, load_road};
use roadfly_scene::RoadModel;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

/// Everything the app needs before the first animated frame.
#[derive(Debug, Clone)]
pub struct LoadedAssets {
    pub road: RoadModel,
    pub matcap: Option<MatcapImage>,
}

enum Loaded {
    Road(Result<RoadModel, AssetError>),
    Matcap(Result<MatcapImage, AssetError>),
}

/// Background loader for the road model and the optional matcap.
///
/// Each asset loads on its own thread. The owner polls from its frame loop;
/// the first error is reported once and ends the load.
pub struct LoadingManager {
    rx: Receiver<Loaded>,
    road_url: String,
    total: usize,
    road: Option<RoadModel>,
    matcap: Option<MatcapImage>,
    finished: bool,
}

impl LoadingManager {
    pub fn start(road_path: impl Into<PathBuf>, matcap_path: Option<PathBuf>) -> Self {
        let road_path = road_path.into();
        let road_url = road_path.display().to_string();
        let (tx, rx) = mpsc::channel();

        let road_tx = tx.clone();
        thread::spawn(move || {
            let _ = road_tx.send(Loaded::Road(load_road(&road_path)));
        });

        let total = match matcap_path {
            Some(path) => {
                thread::spawn(move || {
                    let _ = tx.send(Loaded::Matcap(load_matcap(&path)));
                });
                2
            }
            None => 1,
        };

        tracing::info!("loading {total} asset(s), road: {road_url}");
        Self {
            rx,
            road_url,
            total,
            road: None,
            matcap: None,
            finished: false,
        }
    }

    /// Items loaded so far and the total expected.
    pub fn progress(&self) -> (usize, usize) {
        let done = usize::from(self.road.is_some()) + usize::from(self.matcap.is_some());
        (done, self.total)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Collect finished loads without blocking.
    ///
    /// Returns `Ok(Some(_))` exactly once when everything has loaded. After
    /// that, or after an error, it returns `Ok(None)`.
    pub fn poll(&mut self) -> Result<Option<LoadedAssets>, AssetError> {
        if self.finished {
            return Ok(None);
        }
        loop {
            match self.rx.try_recv() {
                Ok(msg) => self.accept(msg)?,
                Err(TryRecvError::Empty) => return Ok(self.take_if_complete()),
                Err(TryRecvError::Disconnected) => {
                    return self.take_if_complete().map(Some).ok_or_else(|| self.interrupted());
                }
            }
        }
    }

    /// Block until everything has loaded.
    pub fn wait(mut self) -> Result<LoadedAssets, AssetError> {
        if let Some(assets) = self.poll()? {
            return Ok(assets);
        }
        while !self.finished {
            match self.rx.recv() {
                Ok(msg) => self.accept(msg)?,
                Err(_) => return Err(self.interrupted()),
            }
            if let Some(assets) = self.take_if_complete() {
                return Ok(assets);
            }
        }
        Err(self.interrupted())
    }

    fn accept(&mut self, msg: Loaded) -> Result<(), AssetError> {
        let result = match msg {
            Loaded::Road(r) => r.map(|road| self.road = Some(road)),
            Loaded::Matcap(r) => r.map(|m| self.matcap = Some(m)),
        };
        match result {
            Ok(()) => {
                let (done, total) = self.progress();
                tracing::info!("loaded {done}/{total}");
                Ok(())
            }
            Err(e) => {
                self.finished = true;
                tracing::error!("{e}");
                Err(e)
            }
        }
    }

    fn take_if_complete(&mut self) -> Option<LoadedAssets> {
        let (done, total) = self.progress();
        if self.finished || done < total {
            return None;
        }
        self.finished = true;
        let road = self.road.take()?;
        Some(LoadedAssets {
            road,
            matcap: self.matcap.take(),
        })
    }

    fn interrupted(&mut self) -> AssetError {
        self.finished = true;
        AssetError::Interrupted {
            url: self.road_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{write_matcap, write_road};

    #[test]
    fn loads_road_and_matcap() {
        let dir = tempfile::tempdir().unwrap();
        let road = write_road(dir.path());
        let matcap = write_matcap(dir.path());

        let manager = LoadingManager::start(road, Some(matcap));
        assert_eq!(manager.progress().1, 2);
        let assets = manager.wait().unwrap();
        assert_eq!(assets.road.len(), 2);
        assert_eq!(assets.matcap.map(|m| m.width), Some(4));
    }

    #[test]
    fn matcap_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let assets = LoadingManager::start(write_road(dir.path()), None)
            .wait()
            .unwrap();
        assert!(assets.matcap.is_none());
    }

    #[test]
    fn poll_reports_completion_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = LoadingManager::start(write_road(dir.path()), None);

        let mut loaded = None;
        for _ in 0..1000 {
            if let Some(assets) = manager.poll().unwrap() {
                loaded = Some(assets);
                break;
            }
            thread::sleep(std::time::Duration::from_millis(5));
        }
        assert!(loaded.is_some());
        assert!(manager.is_finished());
        assert!(manager.poll().unwrap().is_none());
    }

    #[test]
    fn load_error_is_reported() {
        let err = LoadingManager::start("/nonexistent/road.glb", None)
            .wait()
            .unwrap_err();
        assert_eq!(err.url(), "/nonexistent/road.glb");
    }
}
