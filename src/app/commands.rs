//! Inbound commands to the power controller.
//!
//! These are the host's manual power requests (G-code M80 / M81, a
//! front-panel switch, an RPC call) that the
//! [`PowerController`](crate::power::controller::PowerController) routes
//! through the same sequencing procedures the poll loop uses.

/// Commands that external adapters can send into the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerCommand {
    /// Energize the rail now and restart the cool-down window (M80).
    PowerOn,

    /// De-energize the rail now (M81).  If activity is still present the
    /// next poll powers it back on.
    PowerOff,
}

impl PowerCommand {
    /// Reason string recorded in diagnostics.
    pub const fn reason(self) -> &'static str {
        match self {
            Self::PowerOn => "command: power on (M80)",
            Self::PowerOff => "command: power off (M81)",
        }
    }
}
