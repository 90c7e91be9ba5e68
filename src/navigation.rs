//! Navigation state machine over the discovery result.
//!
//! The controller owns the single live [`NavigationState`] and mediates
//! every transition. The discovery scan is the only background operation:
//! it is dispatched to a blocking task and its result is applied by
//! [`NavigationController::poll`], called from the event loop. At most one
//! scan is in flight per controller; a `request_gallery()` issued while the
//! grid is loading is ignored. A generation counter makes sure a scan that
//! finishes after `back()` (or after a newer scan started) is dropped
//! instead of being applied to a state it no longer belongs to.

use crate::domain::{MediaEntry, ScanError, Scanner};
use crate::error::{Result, StatusViewError};
use crate::permission::PermissionProbe;
use std::sync::Arc;
use tokio::sync::oneshot;

/// The single live screen state. Exactly one is current at any time.
///
/// `Detail` carries the grid result it was entered from, so `close()` can
/// restore the exact grid without re-discovering; the presentation layer
/// only reads `selected` while in `Detail`.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationState {
    Home,
    Grid {
        loading: bool,
        result: Vec<MediaEntry>,
    },
    Detail {
        selected: MediaEntry,
        result: Vec<MediaEntry>,
    },
}

impl NavigationState {
    fn describe(&self) -> &'static str {
        match self {
            NavigationState::Home => "Home",
            NavigationState::Grid { .. } => "Grid",
            NavigationState::Detail { .. } => "Detail",
        }
    }
}

/// Transient, non-state-changing events for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    PermissionRequired,
    DiscoveryFailed(String),
}

type ScanOutcome = std::result::Result<Vec<MediaEntry>, ScanError>;

pub struct NavigationController {
    state: NavigationState,
    scanner: Arc<dyn Scanner>,
    permission: Arc<dyn PermissionProbe>,
    runtime: tokio::runtime::Runtime,
    /// Receiver for the in-flight scan, tagged with the generation that
    /// started it.
    pending: Option<(u64, oneshot::Receiver<ScanOutcome>)>,
    generation: u64,
    notices: Vec<Notice>,
}

impl NavigationController {
    pub fn new(scanner: Arc<dyn Scanner>, permission: Arc<dyn PermissionProbe>) -> Result<Self> {
        let runtime = tokio::runtime::Runtime::new()?;

        Ok(Self {
            state: NavigationState::Home,
            scanner,
            permission,
            runtime,
            pending: None,
            generation: 0,
            notices: Vec::new(),
        })
    }

    /// Read-only view of the current screen state.
    pub fn current_state(&self) -> &NavigationState {
        &self.state
    }

    /// Drains queued notices. Each notice is delivered exactly once.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// From `Home`: checks the permission flag and, if granted, enters a
    /// loading `Grid` and dispatches the scan in the background. Without
    /// permission the state is untouched and a single `PermissionRequired`
    /// notice is queued; discovery is never invoked.
    ///
    /// While the grid is already loading the call is ignored (single scan
    /// in flight, re-entrant requests dropped). From any other state it is
    /// a contract violation.
    pub fn request_gallery(&mut self) -> Result<()> {
        match &self.state {
            NavigationState::Home => {}
            NavigationState::Grid { loading: true, .. } => return Ok(()),
            other => return Err(invalid_transition("request_gallery()", other)),
        }

        // Snapshot the flag once; it is not re-checked mid-scan.
        if !self.permission.current() {
            self.notices.push(Notice::PermissionRequired);
            return Ok(());
        }

        self.state = NavigationState::Grid {
            loading: true,
            result: Vec::new(),
        };
        self.generation += 1;

        let scanner = Arc::clone(&self.scanner);
        let (tx, rx) = oneshot::channel();
        self.runtime.spawn_blocking(move || {
            let _ = tx.send(scanner.scan());
        });
        self.pending = Some((self.generation, rx));

        Ok(())
    }

    /// Applies a finished scan, if any. Call once per event-loop tick.
    ///
    /// A completion whose generation no longer matches, or that arrives
    /// when the loading grid is gone, is dropped without touching state.
    pub fn poll(&mut self) {
        let Some((started_at, rx)) = self.pending.as_mut() else {
            return;
        };
        let started_at = *started_at;

        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(oneshot::error::TryRecvError::Empty) => return,
            Err(oneshot::error::TryRecvError::Closed) => Err(ScanError(std::io::Error::other(
                "scan task stopped before producing a result",
            ))),
        };
        self.pending = None;

        if started_at != self.generation {
            return;
        }
        if !matches!(self.state, NavigationState::Grid { loading: true, .. }) {
            return;
        }

        match outcome {
            Ok(result) => {
                self.state = NavigationState::Grid {
                    loading: false,
                    result,
                };
            }
            Err(e) => {
                // Stay on the grid with an empty result; the failure is a
                // one-shot notice, not a navigation change.
                self.state = NavigationState::Grid {
                    loading: false,
                    result: Vec::new(),
                };
                self.notices.push(Notice::DiscoveryFailed(e.to_string()));
            }
        }
    }

    /// From `Grid`: enters `Detail` for an entry of the current result.
    /// Selecting an entry that is not in the result is a contract
    /// violation.
    pub fn select_entry(&mut self, entry: &MediaEntry) -> Result<()> {
        let NavigationState::Grid { result, .. } = &self.state else {
            return Err(invalid_transition("select_entry()", &self.state));
        };

        let selected = result
            .iter()
            .find(|e| e.path == entry.path)
            .cloned()
            .ok_or_else(|| {
                StatusViewError::InvalidTransition(format!(
                    "select_entry() for {} which is not in the current result",
                    entry.path.display()
                ))
            })?;

        if let NavigationState::Grid { result, .. } =
            std::mem::replace(&mut self.state, NavigationState::Home)
        {
            self.state = NavigationState::Detail { selected, result };
        }
        Ok(())
    }

    /// From `Grid`: returns to `Home` unconditionally, discarding the
    /// result and any in-flight scan. Re-entering the grid triggers a
    /// fresh discovery.
    pub fn back(&mut self) -> Result<()> {
        if !matches!(self.state, NavigationState::Grid { .. }) {
            return Err(invalid_transition("back()", &self.state));
        }

        // Invalidate an outstanding scan so its completion is dropped.
        self.generation += 1;
        self.pending = None;
        self.state = NavigationState::Home;
        Ok(())
    }

    /// From `Detail`: returns to the grid that preceded the selection,
    /// with the retained result and no re-discovery.
    pub fn close(&mut self) -> Result<()> {
        if !matches!(self.state, NavigationState::Detail { .. }) {
            return Err(invalid_transition("close()", &self.state));
        }

        if let NavigationState::Detail { result, .. } =
            std::mem::replace(&mut self.state, NavigationState::Home)
        {
            self.state = NavigationState::Grid {
                loading: false,
                result,
            };
        }
        Ok(())
    }
}

fn invalid_transition(op: &str, state: &NavigationState) -> StatusViewError {
    StatusViewError::InvalidTransition(format!("{} while in {}", op, state.describe()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MediaKind;
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn entry(name: &str, secs: i64) -> MediaEntry {
        MediaEntry {
            path: PathBuf::from(format!("/w/Media/.Statuses/{}", name)),
            name: name.to_string(),
            kind: MediaKind::from_name(name).unwrap_or(MediaKind::Image),
            modified_date: Utc.timestamp_opt(secs, 0).unwrap(),
        }
    }

    /// Returns a fixed result, counting invocations, with an optional
    /// delay to keep the scan observable in its loading phase.
    struct FixedScanner {
        entries: Vec<MediaEntry>,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl FixedScanner {
        fn new(entries: Vec<MediaEntry>) -> Arc<Self> {
            Arc::new(Self {
                entries,
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            })
        }

        fn slow(entries: Vec<MediaEntry>, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                entries,
                delay,
                calls: AtomicUsize::new(0),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Scanner for FixedScanner {
        fn scan(&self) -> std::result::Result<Vec<MediaEntry>, ScanError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                std::thread::sleep(self.delay);
            }
            Ok(self.entries.clone())
        }
    }

    struct FailingScanner;

    impl Scanner for FailingScanner {
        fn scan(&self) -> std::result::Result<Vec<MediaEntry>, ScanError> {
            Err(ScanError(std::io::Error::other("storage subsystem gone")))
        }
    }

    struct FixedPermission(bool);

    impl PermissionProbe for FixedPermission {
        fn current(&self) -> bool {
            self.0
        }
    }

    fn controller(
        scanner: Arc<dyn Scanner>,
        granted: bool,
    ) -> NavigationController {
        NavigationController::new(scanner, Arc::new(FixedPermission(granted))).unwrap()
    }

    /// Polls until the grid stops loading or the timeout passes.
    fn wait_for_grid(ctrl: &mut NavigationController) {
        for _ in 0..200 {
            ctrl.poll();
            if !matches!(
                ctrl.current_state(),
                NavigationState::Grid { loading: true, .. }
            ) {
                return;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        panic!("scan did not complete within timeout");
    }

    #[test]
    fn test_initial_state_is_home() {
        let ctrl = controller(FixedScanner::new(vec![]), true);
        assert_eq!(*ctrl.current_state(), NavigationState::Home);
    }

    #[test]
    fn test_request_gallery_without_permission() {
        let scanner = FixedScanner::new(vec![entry("a.jpg", 100)]);
        let mut ctrl = controller(scanner.clone(), false);

        ctrl.request_gallery().unwrap();

        assert_eq!(*ctrl.current_state(), NavigationState::Home);
        assert_eq!(ctrl.take_notices(), vec![Notice::PermissionRequired]);
        assert!(ctrl.take_notices().is_empty());
        assert_eq!(scanner.call_count(), 0);
    }

    #[test]
    fn test_request_gallery_enters_loading_grid() {
        let scanner = FixedScanner::slow(vec![], Duration::from_millis(100));
        let mut ctrl = controller(scanner, true);

        ctrl.request_gallery().unwrap();

        assert_eq!(
            *ctrl.current_state(),
            NavigationState::Grid {
                loading: true,
                result: vec![],
            }
        );
    }

    #[test]
    fn test_scan_completion_fills_grid() {
        let entries = vec![entry("b.mp4", 200), entry("a.jpg", 100)];
        let mut ctrl = controller(FixedScanner::new(entries.clone()), true);

        ctrl.request_gallery().unwrap();
        wait_for_grid(&mut ctrl);

        assert_eq!(
            *ctrl.current_state(),
            NavigationState::Grid {
                loading: false,
                result: entries,
            }
        );
        assert!(ctrl.take_notices().is_empty());
    }

    #[test]
    fn test_empty_result_is_a_normal_grid() {
        let mut ctrl = controller(FixedScanner::new(vec![]), true);

        ctrl.request_gallery().unwrap();
        wait_for_grid(&mut ctrl);

        assert_eq!(
            *ctrl.current_state(),
            NavigationState::Grid {
                loading: false,
                result: vec![],
            }
        );
        assert!(ctrl.take_notices().is_empty());
    }

    #[test]
    fn test_scan_failure_stays_on_empty_grid_with_notice() {
        let mut ctrl = controller(Arc::new(FailingScanner), true);

        ctrl.request_gallery().unwrap();
        wait_for_grid(&mut ctrl);

        assert_eq!(
            *ctrl.current_state(),
            NavigationState::Grid {
                loading: false,
                result: vec![],
            }
        );
        let notices = ctrl.take_notices();
        assert_eq!(notices.len(), 1);
        assert!(matches!(notices[0], Notice::DiscoveryFailed(_)));
    }

    #[test]
    fn test_select_and_close_round_trip() {
        let entries = vec![entry("x.jpg", 300), entry("y.mp4", 200)];
        let mut ctrl = controller(FixedScanner::new(entries.clone()), true);

        ctrl.request_gallery().unwrap();
        wait_for_grid(&mut ctrl);

        ctrl.select_entry(&entries[1]).unwrap();
        assert_eq!(
            *ctrl.current_state(),
            NavigationState::Detail {
                selected: entries[1].clone(),
                result: entries.clone(),
            }
        );

        ctrl.close().unwrap();
        assert_eq!(
            *ctrl.current_state(),
            NavigationState::Grid {
                loading: false,
                result: entries,
            }
        );
    }

    #[test]
    fn test_select_entry_outside_result_is_rejected() {
        let entries = vec![entry("x.jpg", 300)];
        let mut ctrl = controller(FixedScanner::new(entries), true);

        ctrl.request_gallery().unwrap();
        wait_for_grid(&mut ctrl);

        let stranger = entry("not-there.jpg", 50);
        let err = ctrl.select_entry(&stranger).unwrap_err();
        assert!(matches!(err, StatusViewError::InvalidTransition(_)));

        // State untouched by the rejected call.
        assert!(matches!(
            ctrl.current_state(),
            NavigationState::Grid { loading: false, .. }
        ));
    }

    #[test]
    fn test_select_entry_in_home_is_rejected() {
        let mut ctrl = controller(FixedScanner::new(vec![]), true);

        let err = ctrl.select_entry(&entry("a.jpg", 1)).unwrap_err();
        assert!(matches!(err, StatusViewError::InvalidTransition(_)));
    }

    #[test]
    fn test_close_outside_detail_is_rejected() {
        let mut ctrl = controller(FixedScanner::new(vec![]), true);
        assert!(ctrl.close().is_err());

        ctrl.request_gallery().unwrap();
        wait_for_grid(&mut ctrl);
        assert!(ctrl.close().is_err());
    }

    #[test]
    fn test_back_from_grid_lands_on_home() {
        let mut ctrl = controller(FixedScanner::new(vec![entry("a.jpg", 1)]), true);

        ctrl.request_gallery().unwrap();
        wait_for_grid(&mut ctrl);

        ctrl.back().unwrap();
        assert_eq!(*ctrl.current_state(), NavigationState::Home);
    }

    #[test]
    fn test_back_from_empty_grid_lands_on_home() {
        let mut ctrl = controller(FixedScanner::new(vec![]), true);

        ctrl.request_gallery().unwrap();
        wait_for_grid(&mut ctrl);

        ctrl.back().unwrap();
        assert_eq!(*ctrl.current_state(), NavigationState::Home);
    }

    #[test]
    fn test_back_outside_grid_is_rejected() {
        let mut ctrl = controller(FixedScanner::new(vec![]), true);
        assert!(ctrl.back().is_err());
    }

    #[test]
    fn test_reentrant_request_while_loading_is_ignored() {
        let scanner = FixedScanner::slow(vec![entry("a.jpg", 1)], Duration::from_millis(100));
        let mut ctrl = controller(scanner.clone(), true);

        ctrl.request_gallery().unwrap();
        ctrl.request_gallery().unwrap();
        ctrl.request_gallery().unwrap();

        wait_for_grid(&mut ctrl);

        assert_eq!(scanner.call_count(), 1);
        assert!(matches!(
            ctrl.current_state(),
            NavigationState::Grid { loading: false, .. }
        ));
    }

    #[test]
    fn test_completion_after_back_is_dropped() {
        let scanner = FixedScanner::slow(vec![entry("a.jpg", 1)], Duration::from_millis(80));
        let mut ctrl = controller(scanner, true);

        ctrl.request_gallery().unwrap();
        ctrl.back().unwrap();
        assert_eq!(*ctrl.current_state(), NavigationState::Home);

        // Let the background scan finish, then keep polling; the stale
        // completion must never resurrect the grid.
        std::thread::sleep(Duration::from_millis(150));
        for _ in 0..5 {
            ctrl.poll();
        }

        assert_eq!(*ctrl.current_state(), NavigationState::Home);
        assert!(ctrl.take_notices().is_empty());
    }

    #[test]
    fn test_fresh_discovery_after_back_and_reentry() {
        let scanner = FixedScanner::new(vec![entry("a.jpg", 1)]);
        let mut ctrl = controller(scanner.clone(), true);

        ctrl.request_gallery().unwrap();
        wait_for_grid(&mut ctrl);
        ctrl.back().unwrap();
        ctrl.request_gallery().unwrap();
        wait_for_grid(&mut ctrl);

        // No cache: each grid entry is a fresh scan.
        assert_eq!(scanner.call_count(), 2);
    }

    #[test]
    fn test_request_gallery_from_detail_is_rejected() {
        let entries = vec![entry("x.jpg", 1)];
        let mut ctrl = controller(FixedScanner::new(entries.clone()), true);

        ctrl.request_gallery().unwrap();
        wait_for_grid(&mut ctrl);
        ctrl.select_entry(&entries[0]).unwrap();

        assert!(ctrl.request_gallery().is_err());
    }
}
