use std::collections::HashSet;

use crate::models::domain::{Detector, Violation, ViolationKind};

/// Platform events forwarded by the host. Which of them count as violations
/// depends on the enabled detectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrowserSignal {
    VisibilityHidden,
    WindowBlur,
    FullscreenExited,
    Copy,
    Cut,
    Paste,
    ContextMenu,
    BeforePrint,
    DevToolsShortcut,
    WindowResized {
        outer_width: u32,
        inner_width: u32,
        outer_height: u32,
        inner_height: u32,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonitorConfig {
    pub detectors: HashSet<Detector>,
    pub max_violations: usize,
    pub devtools_threshold_px: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            detectors: Detector::ALL.into_iter().collect(),
            max_violations: 3,
            devtools_threshold_px: 160,
        }
    }
}

pub type ViolationCallback = Box<dyn FnMut(&Violation, usize) + Send>;

/// Counts anti-malpractice events for one attempt.
///
/// The monitor only records and reports. Terminating the attempt once the
/// limit is reached is up to the owner of the attempt.
pub struct ViolationMonitor {
    config: MonitorConfig,
    violations: Vec<Violation>,
    exceeded: bool,
    pending_warning: Option<Violation>,
    devtools_open: bool,
    active: bool,
    on_violation: Option<ViolationCallback>,
}

impl std::fmt::Debug for ViolationMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViolationMonitor")
            .field("config", &self.config)
            .field("count", &self.violations.len())
            .field("exceeded", &self.exceeded)
            .field("active", &self.active)
            .finish()
    }
}

impl ViolationMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            violations: Vec::new(),
            exceeded: false,
            pending_warning: None,
            devtools_open: false,
            active: false,
            on_violation: None,
        }
    }

    pub fn with_callback(mut self, callback: ViolationCallback) -> Self {
        self.on_violation = Some(callback);
        self
    }

    pub fn set_callback(&mut self, callback: ViolationCallback) {
        self.on_violation = Some(callback);
    }

    pub fn start(&mut self) {
        self.active = true;
    }

    /// Detaches from further signals. Recorded violations are kept.
    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn count(&self) -> usize {
        self.violations.len()
    }

    pub fn exceeded(&self) -> bool {
        self.exceeded
    }

    pub fn max_violations(&self) -> usize {
        self.config.max_violations
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn pending_warning(&self) -> Option<&Violation> {
        self.pending_warning.as_ref()
    }

    /// The learner chose to continue after a warning.
    pub fn acknowledge(&mut self) -> Option<Violation> {
        self.pending_warning.take()
    }

    /// Feeds one host signal through the enabled detectors. Returns the
    /// recorded violation, if the signal produced one.
    pub fn observe(&mut self, signal: BrowserSignal) -> Option<Violation> {
        if !self.active {
            return None;
        }

        let kind = self.classify(signal)?;
        if !self.config.detectors.contains(&kind.detector()) {
            log::debug!("Ignoring {:?}: detector disabled", kind);
            return None;
        }

        Some(self.record(kind))
    }

    /// Fullscreen is requested on a best-effort basis; a refusal never blocks
    /// the attempt.
    pub fn fullscreen_request_failed(&self, reason: &str) {
        log::warn!("Fullscreen request was rejected: {}", reason);
    }

    fn classify(&mut self, signal: BrowserSignal) -> Option<ViolationKind> {
        match signal {
            BrowserSignal::VisibilityHidden => Some(ViolationKind::TabSwitch),
            BrowserSignal::WindowBlur => Some(ViolationKind::WindowBlur),
            BrowserSignal::FullscreenExited => Some(ViolationKind::FullscreenExit),
            BrowserSignal::Copy => Some(ViolationKind::CopyAttempt),
            BrowserSignal::Cut => Some(ViolationKind::CutAttempt),
            BrowserSignal::Paste => Some(ViolationKind::PasteAttempt),
            BrowserSignal::ContextMenu => Some(ViolationKind::ContextMenu),
            BrowserSignal::BeforePrint => Some(ViolationKind::PrintAttempt),
            BrowserSignal::DevToolsShortcut => Some(ViolationKind::DevToolsOpen),
            BrowserSignal::WindowResized {
                outer_width,
                inner_width,
                outer_height,
                inner_height,
            } => {
                let threshold = self.config.devtools_threshold_px;
                let docked = outer_width.saturating_sub(inner_width) > threshold
                    || outer_height.saturating_sub(inner_height) > threshold;

                // Only the closed -> open edge counts; re-arms once closed.
                let opened = docked && !self.devtools_open;
                self.devtools_open = docked;
                opened.then_some(ViolationKind::DevToolsOpen)
            }
        }
    }

    fn record(&mut self, kind: ViolationKind) -> Violation {
        let violation = Violation::new(kind);
        self.violations.push(violation.clone());
        let count = self.violations.len();

        log::warn!(
            "Violation {}/{} recorded: {:?}",
            count,
            self.config.max_violations,
            kind
        );

        if !self.exceeded && count >= self.config.max_violations {
            self.exceeded = true;
            log::warn!("Maximum violations reached ({})", self.config.max_violations);
        }

        self.pending_warning = Some(violation.clone());

        if let Some(callback) = self.on_violation.as_mut() {
            callback(&violation, count);
        }

        violation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn active_monitor(config: MonitorConfig) -> ViolationMonitor {
        let mut monitor = ViolationMonitor::new(config);
        monitor.start();
        monitor
    }

    fn resized(outer_width: u32, inner_width: u32) -> BrowserSignal {
        BrowserSignal::WindowResized {
            outer_width,
            inner_width,
            outer_height: 900,
            inner_height: 880,
        }
    }

    #[test]
    fn count_equals_number_of_firings() {
        let mut monitor = active_monitor(MonitorConfig {
            max_violations: 100,
            ..Default::default()
        });
        let signals = [
            BrowserSignal::VisibilityHidden,
            BrowserSignal::Copy,
            BrowserSignal::Paste,
            BrowserSignal::ContextMenu,
            BrowserSignal::FullscreenExited,
        ];

        for signal in signals {
            assert!(monitor.observe(signal).is_some());
        }

        assert_eq!(monitor.count(), 5);
        assert!(!monitor.exceeded());
    }

    #[test]
    fn exceeded_is_sticky_once_limit_reached() {
        let mut monitor = active_monitor(MonitorConfig {
            max_violations: 2,
            ..Default::default()
        });

        monitor.observe(BrowserSignal::WindowBlur);
        assert!(!monitor.exceeded());

        monitor.observe(BrowserSignal::WindowBlur);
        assert!(monitor.exceeded());

        monitor.acknowledge();
        monitor.stop();
        assert!(monitor.exceeded());
        assert_eq!(monitor.count(), 2);
    }

    #[test]
    fn callback_runs_synchronously_with_running_count() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut monitor = ViolationMonitor::new(MonitorConfig::default()).with_callback(Box::new(
            move |violation, count| {
                sink.lock().unwrap().push((violation.kind, count));
            },
        ));
        monitor.start();

        monitor.observe(BrowserSignal::VisibilityHidden);
        monitor.observe(BrowserSignal::Cut);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                (ViolationKind::TabSwitch, 1),
                (ViolationKind::CutAttempt, 2)
            ]
        );
    }

    #[test]
    fn disabled_detectors_and_inactive_monitor_ignore_signals() {
        let mut monitor = ViolationMonitor::new(MonitorConfig {
            detectors: [Detector::Fullscreen].into_iter().collect(),
            ..Default::default()
        });

        assert!(monitor.observe(BrowserSignal::FullscreenExited).is_none());

        monitor.start();
        assert!(monitor.observe(BrowserSignal::Copy).is_none());
        assert!(monitor.observe(BrowserSignal::FullscreenExited).is_some());

        monitor.stop();
        assert!(monitor.observe(BrowserSignal::FullscreenExited).is_none());
        assert_eq!(monitor.count(), 1);
    }

    #[test]
    fn acknowledge_clears_pending_warning_only() {
        let mut monitor = active_monitor(MonitorConfig::default());
        monitor.observe(BrowserSignal::BeforePrint);

        let warning = monitor.acknowledge().expect("warning should be pending");
        assert_eq!(warning.kind, ViolationKind::PrintAttempt);
        assert!(monitor.pending_warning().is_none());
        assert_eq!(monitor.count(), 1);
    }

    #[test]
    fn devtools_heuristic_fires_on_open_edge_only() {
        let mut monitor = active_monitor(MonitorConfig {
            max_violations: 10,
            ..Default::default()
        });

        assert!(monitor.observe(resized(1400, 1390)).is_none());
        assert!(monitor.observe(resized(1400, 1000)).is_some());
        // Still docked: no new violation.
        assert!(monitor.observe(resized(1400, 990)).is_none());
        // Closed, then reopened.
        assert!(monitor.observe(resized(1400, 1395)).is_none());
        assert!(monitor.observe(resized(1400, 1100)).is_some());

        assert_eq!(monitor.count(), 2);
    }

    #[test]
    fn fullscreen_failure_is_not_a_violation() {
        let monitor = active_monitor(MonitorConfig::default());
        monitor.fullscreen_request_failed("permission denied");
        assert_eq!(monitor.count(), 0);
    }
}
