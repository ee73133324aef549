//! Terminal stand-ins for the browser's toast area and router.

use hr_client::{Notifier, Toast};
use session_store::Navigator;

/// Prints toasts to stderr, keeping stdout for command output.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, toast: Toast) {
        let mark = if toast.is_destructive() { "✗" } else { "✓" };
        eprintln!("{} {}", mark, toast);
    }
}

/// There is no page to leave in a terminal; report where the browser would go.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate_hard(&self, route: &str) {
        eprintln!("→ {}", route);
    }
}
