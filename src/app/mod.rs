pub mod components;
pub mod dashboard;
pub mod shell;

pub use components::{render_dashboard, InfoCard, WillActions, WillDetails};
pub use dashboard::{Alert, AlertKind, Dashboard, WillForm};
pub use shell::{run_shell, ShellCommand};
